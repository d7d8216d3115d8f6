pub mod components;
pub mod keymap;
pub mod screens;

mod format;
mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::Paragraph,
};

use crate::app::{AppState, Modal, Screen};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    match state.screen {
        Screen::Login => screens::login::render(frame, area, state, &theme),
        Screen::Dashboard => render_shell(frame, area, state, &theme),
    }
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Min(0),    // Accounts and transactions
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    screens::dashboard::render_info_bar(frame, layout[0], state, theme);
    screens::dashboard::render(frame, layout[1], state, theme);
    render_bottom_bar(frame, layout[2], state, theme);

    match state.modal {
        Some(Modal::NewAccount) => screens::forms::render_account_form(frame, area, state, theme),
        Some(Modal::NewTransaction) => {
            screens::forms::render_transaction_form(frame, area, state, theme)
        }
        None => {}
    }
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    use components::hints::{self, common};

    let context = match state.modal {
        Some(_) => common::form_editing(),
        None => common::dashboard(state.ledger.can_transact()),
    };
    let mut parts = hints::hints_to_spans(&context, theme);
    if state.modal.is_none() {
        parts.push(hints::hint_separator(theme));
        parts.extend(hints::hints_to_spans(&common::quit(), theme));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
