use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ledger::{Command, FileStore, FixedCredentials, Ledger, Outcome, TransactionForm};
use tokio::sync::mpsc;

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    ui::{self, keymap::AppAction},
};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    NewAccount,
    NewTransaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    /// Password shown in clear text instead of bullets.
    pub reveal_password: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionField {
    #[default]
    DateOfEntry,
    DueOn,
    Reference,
    Description,
    Debit,
    Credit,
    Remarks,
}

impl TransactionField {
    pub const ALL: [TransactionField; 7] = [
        Self::DateOfEntry,
        Self::DueOn,
        Self::Reference,
        Self::Description,
        Self::Debit,
        Self::Credit,
        Self::Remarks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::DateOfEntry => "Date of entry",
            Self::DueOn => "Due on",
            Self::Reference => "Reference",
            Self::Description => "Description",
            Self::Debit => "Debit",
            Self::Credit => "Credit",
            Self::Remarks => "Remarks",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::DateOfEntry | Self::DueOn => "YYYY-MM-DD",
            Self::Reference => "INV-001",
            Self::Description => "Transaction details",
            Self::Debit | Self::Credit => "0.00",
            Self::Remarks => "Additional notes...",
        }
    }

    fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn value(self, form: &TransactionForm) -> &str {
        match self {
            Self::DateOfEntry => &form.date_of_entry,
            Self::DueOn => &form.due_on,
            Self::Reference => &form.reference,
            Self::Description => &form.description,
            Self::Debit => &form.debit,
            Self::Credit => &form.credit,
            Self::Remarks => &form.remarks,
        }
    }

    fn value_mut(self, form: &mut TransactionForm) -> &mut String {
        match self {
            Self::DateOfEntry => &mut form.date_of_entry,
            Self::DueOn => &mut form.due_on,
            Self::Reference => &mut form.reference,
            Self::Description => &mut form.description,
            Self::Debit => &mut form.debit,
            Self::Credit => &mut form.credit,
            Self::Remarks => &mut form.remarks,
        }
    }
}

#[derive(Debug, Default)]
pub struct TransactionFormState {
    pub form: TransactionForm,
    pub focus: TransactionField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    shown_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub modal: Option<Modal>,
    pub login: LoginState,
    pub ledger: Ledger,
    /// Highlighted row of the account list (display order).
    pub cursor: usize,
    pub account_name: String,
    pub transaction_form: TransactionFormState,
    pub toast: Option<ToastState>,
    /// Requests sent and not yet answered.
    pub in_flight: usize,
    pub base_url: String,
}

impl AppState {
    fn show_toast(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    /// Id of the account under the cursor.
    pub fn cursor_account_id(&self) -> Option<String> {
        self.ledger
            .ordered_accounts()
            .get(self.cursor)
            .map(|account| account.id.clone())
    }

    fn clamp_cursor(&mut self) {
        let len = self.ledger.registry().accounts().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn cursor_to_selection(&mut self) {
        let Some(selected) = self.ledger.selection() else {
            return;
        };
        if let Some(index) = self
            .ledger
            .ordered_accounts()
            .iter()
            .position(|account| &account.id == selected)
        {
            self.cursor = index;
        }
    }
}

pub struct App {
    client: Client,
    pub state: AppState,
    outcomes_tx: mpsc::UnboundedSender<Outcome>,
    outcomes_rx: mpsc::UnboundedReceiver<Outcome>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let store = FileStore::open(&config.state_path)?;
        let auth = FixedCredentials::new(config.auth_username, config.auth_password);
        let ledger = Ledger::load(Box::new(store), Box::new(auth));
        Ok(Self::from_parts(client, ledger, config.username, config.base_url))
    }

    fn from_parts(client: Client, ledger: Ledger, username: String, base_url: String) -> Self {
        let screen = if ledger.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Login
        };
        let state = AppState {
            screen,
            modal: None,
            login: LoginState {
                username,
                ..LoginState::default()
            },
            ledger,
            cursor: 0,
            account_name: String::new(),
            transaction_form: TransactionFormState::default(),
            toast: None,
            in_flight: 0,
            base_url,
        };

        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            client,
            state,
            outcomes_tx,
            outcomes_rx,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let startup = self.state.ledger.start();
        self.dispatch(startup);
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    _ => {}
                }
            }

            while let Ok(outcome) = self.outcomes_rx.try_recv() {
                self.handle_outcome(outcome);
            }
            self.expire_toast();
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Runs every command on its own task; results come back through the
    /// outcome channel and are applied by the event loop one at a time.
    fn dispatch(&mut self, commands: Vec<Command>) {
        for command in commands {
            tracing::debug!("dispatching {command:?}");
            self.state.in_flight += 1;
            let client = self.client.clone();
            let outcomes = self.outcomes_tx.clone();
            tokio::spawn(async move {
                let outcome = command.execute(&client).await;
                // The receiver only goes away on shutdown.
                let _ = outcomes.send(outcome);
            });
        }
    }

    fn handle_outcome(&mut self, outcome: Outcome) {
        self.state.in_flight = self.state.in_flight.saturating_sub(1);

        let succeeded = outcome.is_success();
        match &outcome {
            Outcome::AccountCreated(_) if succeeded => {
                self.state.modal = None;
                self.state.account_name.clear();
            }
            Outcome::TransactionCreated { .. } if succeeded => {
                self.state.modal = None;
                self.state.transaction_form = TransactionFormState::default();
                self.state.show_toast("Transaction added", ToastLevel::Success);
            }
            _ => {}
        }

        let follow_ups = self.state.ledger.apply(outcome);
        self.after_change(follow_ups);
    }

    /// Dispatches follow-ups and refreshes everything derived from the
    /// ledger state.
    fn after_change(&mut self, commands: Vec<Command>) {
        let selection_changed = commands
            .iter()
            .any(|command| matches!(command, Command::LoadTransactions { .. }));
        self.dispatch(commands);
        if selection_changed {
            self.state.cursor_to_selection();
        }
        self.state.clamp_cursor();

        if let Some(err) = self.state.ledger.error() {
            let message = err.to_string();
            self.state.show_toast(message, ToastLevel::Error);
            self.state.ledger.dismiss_error();
        }
        // A transaction form for an account that can no longer transact is
        // closed rather than left open.
        if self.state.modal == Some(Modal::NewTransaction) && !self.state.ledger.can_transact() {
            self.state.modal = None;
        }
    }

    fn expire_toast(&mut self) {
        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|toast| toast.shown_at.elapsed() >= TOAST_TTL)
        {
            self.state.toast = None;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = ui::keymap::map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        match (self.state.screen, self.state.modal) {
            (Screen::Login, _) => self.handle_login_key(action),
            (Screen::Dashboard, Some(Modal::NewAccount)) => self.handle_account_form_key(action),
            (Screen::Dashboard, Some(Modal::NewTransaction)) => {
                self.handle_transaction_form_key(action)
            }
            (Screen::Dashboard, None) => self.handle_dashboard_key(action),
        }
    }

    fn handle_login_key(&mut self, action: AppAction) {
        let login = &mut self.state.login;
        match action {
            AppAction::NextField => {
                login.focus = match login.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            AppAction::Backspace => {
                active_login_field(login).pop();
            }
            AppAction::Input(ch) => active_login_field(login).push(ch),
            AppAction::Submit => self.attempt_login(),
            AppAction::ToggleReveal => login.reveal_password = !login.reveal_password,
            AppAction::Cancel => login.message = None,
            _ => {}
        }
    }

    fn attempt_login(&mut self) {
        let username = self.state.login.username.clone();
        let password = self.state.login.password.clone();
        match self.state.ledger.login(&username, &password) {
            Ok(commands) => {
                self.state.login.message = None;
                self.state.screen = Screen::Dashboard;
                self.state.cursor = 0;
                self.after_change(commands);
            }
            Err(err) => self.state.login.message = Some(err.to_string()),
        }
    }

    fn logout(&mut self) {
        self.state.ledger.logout();
        self.state.login = LoginState::default();
        self.state.modal = None;
        self.state.cursor = 0;
        self.state.screen = Screen::Login;
    }

    fn handle_dashboard_key(&mut self, action: AppAction) {
        match action {
            AppAction::Up | AppAction::Input('k') => {
                self.state.cursor = self.state.cursor.saturating_sub(1);
            }
            AppAction::Down | AppAction::Input('j') => {
                self.state.cursor += 1;
                self.state.clamp_cursor();
            }
            AppAction::Submit => {
                if let Some(id) = self.state.cursor_account_id() {
                    if self.state.ledger.locks().is_locked(&id) {
                        self.state
                            .show_toast("Account is locked, unlock it first", ToastLevel::Info);
                    } else {
                        let commands = self.state.ledger.select(id);
                        self.after_change(commands);
                    }
                }
            }
            AppAction::Input('l') => {
                if let Some(id) = self.state.cursor_account_id() {
                    let commands = self.state.ledger.toggle_lock(&id);
                    self.after_change(commands);
                }
            }
            AppAction::Input('a') => {
                self.state.account_name.clear();
                self.state.modal = Some(Modal::NewAccount);
            }
            AppAction::Input('n') => {
                if self.state.ledger.can_transact() {
                    self.state.modal = Some(Modal::NewTransaction);
                } else {
                    self.state
                        .show_toast("Select an unlocked account first", ToastLevel::Info);
                }
            }
            AppAction::Input('r') => {
                let mut commands = vec![self.state.ledger.load_accounts()];
                commands.extend(self.state.ledger.load_transactions());
                self.after_change(commands);
            }
            AppAction::Input('o') => self.logout(),
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Cancel => self.state.toast = None,
            _ => {}
        }
    }

    fn handle_account_form_key(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => self.state.modal = None,
            AppAction::Backspace => {
                self.state.account_name.pop();
            }
            AppAction::Input(ch) => self.state.account_name.push(ch),
            AppAction::Submit => match self.state.ledger.create_account(&self.state.account_name) {
                Ok(command) => self.dispatch(vec![command]),
                Err(err) => self.state.show_toast(err.to_string(), ToastLevel::Error),
            },
            _ => {}
        }
    }

    fn handle_transaction_form_key(&mut self, action: AppAction) {
        let form_state = &mut self.state.transaction_form;
        match action {
            AppAction::Cancel => self.state.modal = None,
            AppAction::NextField | AppAction::Down => form_state.focus = form_state.focus.next(),
            AppAction::Backspace => {
                form_state.focus.value_mut(&mut form_state.form).pop();
            }
            AppAction::Input(ch) => form_state.focus.value_mut(&mut form_state.form).push(ch),
            AppAction::Submit => {
                match self.state.ledger.add_transaction(&self.state.transaction_form.form) {
                    Ok(command) => self.dispatch(vec![command]),
                    Err(err) => self.state.show_toast(err.to_string(), ToastLevel::Error),
                }
            }
            _ => {}
        }
    }
}

fn active_login_field(login: &mut LoginState) -> &mut String {
    match login.focus {
        LoginField::Username => &mut login.username,
        LoginField::Password => &mut login.password,
    }
}
