use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table},
};

use api_types::transaction::Transaction;

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            money::{styled_balance, styled_entry},
        },
        format::{display_date, display_optional_date, or_blank},
        theme::Theme,
    },
};

const HEADERS: [&str; 8] = [
    "Date",
    "Reference",
    "Description",
    "Debit",
    "Credit",
    "Due on",
    "Remarks",
    "Balance",
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_totals(frame, layout[0], state, theme);
    render_table(frame, layout[1], state, theme);
}

fn render_totals(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let totals = state.ledger.totals();
    StatCard::new("Debit", styled_entry(totals.debit, theme.negative, theme), theme)
        .render(frame, cards[0]);
    StatCard::new("Credit", styled_entry(totals.credit, theme.positive, theme), theme)
        .render(frame, cards[1]);
    StatCard::new("Balance", styled_balance(totals.balance, theme), theme)
        .render(frame, cards[2]);
}

fn render_table(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let ledger = &state.ledger;
    let items = ledger.visible_transactions();
    let title = table_title(
        ledger.selected_account().map(|a| a.name.as_str()),
        items.len(),
        ledger.transactions().is_loading(),
    );
    let block = Card::new(&title, theme).block();

    let empty_text = if ledger.selection().is_none() {
        Some("Select an account to view its transactions.")
    } else if items.is_empty() && ledger.transactions().is_loading() {
        Some("Loading transactions…")
    } else if items.is_empty() {
        Some("No transactions yet. Press n to add one.")
    } else {
        None
    };
    if let Some(text) = empty_text {
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme.dim))).block(block),
            area,
        );
        return;
    }

    let header = Row::new(HEADERS.map(Cell::from))
        .style(Style::default().fg(theme.text_muted).add_modifier(Modifier::BOLD));
    let rows = items.iter().map(|tx| transaction_row(tx, theme));
    let widths = [
        Constraint::Length(13),
        Constraint::Length(12),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(13),
        Constraint::Min(10),
        Constraint::Length(13),
    ];

    let table = Table::new(rows, widths).header(header).block(block).column_spacing(1);
    frame.render_widget(table, area);
}

/// `Transactions · Rent · 3 records`, or `Loading…` in place of the count
/// while a fetch runs.
fn table_title(account: Option<&str>, count: usize, loading: bool) -> String {
    let Some(name) = account else {
        return "Transactions".to_string();
    };
    let status = match (loading, count) {
        (true, _) => "Loading…".to_string(),
        (false, 1) => "1 record".to_string(),
        (false, n) => format!("{n} records"),
    };
    format!("Transactions · {name} · {status}")
}

fn transaction_row<'a>(tx: &'a Transaction, theme: &Theme) -> Row<'a> {
    Row::new(vec![
        Cell::from(display_date(&tx.date_of_entry)),
        Cell::from(or_blank(&tx.reference)),
        Cell::from(or_blank(&tx.description)),
        Cell::from(styled_entry(tx.debit, theme.negative, theme)),
        Cell::from(styled_entry(tx.credit, theme.positive, theme)),
        Cell::from(display_optional_date(tx.due_on.as_deref())),
        Cell::from(or_blank(&tx.remarks)),
        Cell::from(styled_balance(tx.balance, theme)),
    ])
    .style(Style::default().fg(theme.text))
}
