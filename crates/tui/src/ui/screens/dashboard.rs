use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{components::card::Card, screens::transactions, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Min(0)])
        .split(area);

    render_accounts(frame, body[0], state, theme);
    transactions::render(frame, body[1], state, theme);
}

pub fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let ledger = &state.ledger;
    let user = ledger
        .identity()
        .map(|identity| identity.username.as_str())
        .unwrap_or("-");

    let mut line = vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Account", Style::default().fg(theme.text_muted)),
    ];
    match ledger.selected_account() {
        Some(account) => {
            line.push(Span::raw(format!(": {}", account.name)));
            if ledger.locks().is_locked(&account.id) {
                line.push(Span::styled(" (locked)", Style::default().fg(theme.locked)));
            }
        }
        None => line.push(Span::raw(": none")),
    }
    line.push(Span::raw("  "));
    line.push(Span::styled("Server", Style::default().fg(theme.text_muted)));
    line.push(Span::raw(format!(": {}", state.base_url)));

    let loading = ledger.registry().is_loading()
        || ledger.transactions().is_loading()
        || state.in_flight > 0;
    if loading {
        line.push(Span::styled("  loading…", Style::default().fg(theme.accent)));
    }

    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

fn render_accounts(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let ledger = &state.ledger;
    let block = Card::new("Accounts", theme).focused(state.modal.is_none()).block();
    let accounts = ledger.ordered_accounts();

    if accounts.is_empty() {
        let text = if ledger.registry().is_loading() {
            "Loading accounts…"
        } else {
            "No accounts yet. Press a to create one."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme.dim))).block(block),
            area,
        );
        return;
    }

    let selected = ledger.selection();
    let items = accounts
        .iter()
        .map(|account| {
            let locked = ledger.locks().is_locked(&account.id);
            let is_selected = selected == Some(&account.id);

            let marker = if locked {
                Span::styled("🔒 ", Style::default().fg(theme.locked))
            } else {
                Span::raw("   ")
            };
            let name_style = if is_selected {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else if locked {
                Style::default().fg(theme.dim)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(account.name.clone(), name_style),
            ]))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.cursor.min(items.len() - 1)));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}
