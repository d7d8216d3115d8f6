//! The client state as a whole.
//!
//! [`Ledger`] ties the session gate, the account registry and the transaction
//! view together, persists identity and locks after every change and keeps the
//! transaction view following the selection. Operations that need the backend
//! return [`Command`]s; results come back through [`Ledger::apply`].

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Account, AccountId, AccountRegistry, AuthenticationProvider, Command, Identity,
    KeyValueStore, LedgerError, LockMap, Outcome, Result, SessionGate, Totals,
    Transaction, TransactionForm, TransactionView, can_transact,
};

pub const AUTH_KEY: &str = "ledger_auth";
pub const LOCKS_KEY: &str = "ledger_locked_accounts";

pub struct Ledger {
    session: SessionGate,
    registry: AccountRegistry,
    transactions: TransactionView,
    store: Box<dyn KeyValueStore + Send>,
    /// Last error to show the user; cleared when a fetch starts.
    error: Option<String>,
}

impl Ledger {
    /// Restores identity and locks from `store`.
    ///
    /// Unreadable values fall back to defaults so a damaged store never keeps
    /// the client from starting.
    pub fn load(
        store: Box<dyn KeyValueStore + Send>,
        auth: Box<dyn AuthenticationProvider + Send + Sync>,
    ) -> Self {
        let identity: Option<Identity> = read_key(store.as_ref(), AUTH_KEY);
        let locks: LockMap = read_key(store.as_ref(), LOCKS_KEY);
        tracing::debug!(
            "restored state: identity={:?}, {} locked accounts",
            identity.as_ref().map(|i| i.username.as_str()),
            locks.len()
        );

        Self {
            session: SessionGate::new(identity, auth),
            registry: AccountRegistry::new(locks),
            transactions: TransactionView::default(),
            store,
            error: None,
        }
    }

    /// Commands to run right after startup: the account load for a restored
    /// session.
    pub fn start(&mut self) -> Vec<Command> {
        self.enter_session()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    pub fn transactions(&self) -> &TransactionView {
        &self.transactions
    }

    pub fn ordered_accounts(&self) -> Vec<&Account> {
        self.registry.ordered_accounts()
    }

    pub fn selection(&self) -> Option<&AccountId> {
        self.registry.selection()
    }

    pub fn selected_account(&self) -> Option<&Account> {
        self.registry.selected_account()
    }

    pub fn locks(&self) -> &LockMap {
        self.registry.locks()
    }

    /// Transactions currently shown, possibly stale while a reload runs.
    pub fn visible_transactions(&self) -> &[Transaction] {
        self.transactions.items()
    }

    pub fn totals(&self) -> Totals {
        self.transactions.totals()
    }

    pub fn can_transact(&self) -> bool {
        can_transact(self.registry.selection(), self.registry.locks())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Signs in and, on the transition into `Authenticated`, returns the
    /// account load.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Vec<Command>> {
        let identity = self.session.login(username, password)?.clone();
        self.persist(AUTH_KEY, &Some(identity));
        Ok(self.enter_session())
    }

    /// Signs out and clears the selection, which also clears the transaction
    /// list.
    pub fn logout(&mut self) {
        self.session.logout();
        self.persist(AUTH_KEY, &None::<Identity>);
        self.registry.clear_selection();
        // Clearing never produces a fetch.
        let _ = self.follow_selection();
    }

    pub fn load_accounts(&mut self) -> Command {
        self.error = None;
        self.registry.load_accounts()
    }

    /// Reloads the transactions of the current selection.
    pub fn load_transactions(&mut self) -> Option<Command> {
        self.error = None;
        self.transactions.load_transactions()
    }

    pub fn select(&mut self, id: impl Into<AccountId>) -> Vec<Command> {
        self.registry.select(id);
        self.follow_selection()
    }

    /// Flips the lock of `id`, persists the lock map and, when the selection
    /// moved as a consequence, returns the fetch for the new selection.
    pub fn toggle_lock(&mut self, id: &str) -> Vec<Command> {
        let locked = self.registry.toggle_lock(id);
        tracing::info!("account {id} {}", if locked { "locked" } else { "unlocked" });
        let locks = self.registry.locks().clone();
        self.persist(LOCKS_KEY, &locks);
        self.follow_selection()
    }

    pub fn create_account(&mut self, name: &str) -> Result<Command> {
        self.registry.create_account(name)
    }

    /// Builds the create request for the selected account.
    ///
    /// Refused unless [`can_transact`] holds for the current state.
    pub fn add_transaction(&mut self, form: &TransactionForm) -> Result<Command> {
        let account_id = match self.registry.selection() {
            Some(id) if self.can_transact() => id.clone(),
            Some(_) => {
                return Err(LedgerError::Validation(
                    "The selected account is locked".to_string(),
                ));
            }
            None => {
                return Err(LedgerError::Validation("No account selected".to_string()));
            }
        };
        Ok(Command::CreateTransaction(form.to_request(&account_id)?))
    }

    /// Feeds a completed request back into the state and returns any
    /// follow-up requests.
    ///
    /// Results that complete after a logout are dropped: an anonymous client
    /// holds no selection and issues no requests.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Command> {
        if !self.session.is_authenticated() {
            tracing::debug!("dropping result received while signed out: {outcome:?}");
            return Vec::new();
        }
        let result = match outcome {
            Outcome::Accounts(result) => self.registry.finish_load(result),
            Outcome::Transactions { account_id, result } => {
                self.transactions.finish_load(&account_id, result)
            }
            Outcome::AccountCreated(result) => self.registry.finish_create(result),
            Outcome::TransactionCreated { account_id, result } => match result {
                Ok(created) => {
                    tracing::info!("created transaction {} on {account_id}", created.id);
                    if self.transactions.target() == Some(&account_id) {
                        return self.transactions.load_transactions().into_iter().collect();
                    }
                    Ok(())
                }
                Err(err) => Err(LedgerError::create("add transaction", err)),
            },
        };

        if let Err(err) = result {
            tracing::warn!("{err}");
            self.error = Some(err.to_string());
        }
        self.follow_selection()
    }

    /// Runs `commands` and every follow-up against `remote` until nothing is
    /// left, one at a time.
    #[cfg(test)]
    pub(crate) async fn run<R: crate::RemoteLedger>(&mut self, remote: &R, commands: Vec<Command>) {
        let mut queue: std::collections::VecDeque<Command> = commands.into();
        while let Some(command) = queue.pop_front() {
            let outcome = command.execute(remote).await;
            queue.extend(self.apply(outcome));
        }
    }

    fn enter_session(&mut self) -> Vec<Command> {
        if self.session.take_entered() {
            vec![self.load_accounts()]
        } else {
            Vec::new()
        }
    }

    /// Retargets the transaction view whenever the selection changed.
    fn follow_selection(&mut self) -> Vec<Command> {
        let selection = self.registry.selection().cloned();
        if self.transactions.target() == selection.as_ref() {
            return Vec::new();
        }
        self.transactions
            .retarget(selection.as_ref())
            .into_iter()
            .collect()
    }

    fn persist<T: Serialize>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_value(value)
            .map_err(|err| LedgerError::Storage(err.to_string()))
            .and_then(|value| self.store.set(key, value));
        if let Err(err) = result {
            tracing::warn!("failed to persist {key}: {err}");
            self.error = Some(err.to_string());
        }
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("session", &self.session)
            .field("registry", &self.registry)
            .field("transactions", &self.transactions)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

fn read_key<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match store.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::warn!("ignoring stored {key}: {err}");
            T::default()
        }),
    }
}
