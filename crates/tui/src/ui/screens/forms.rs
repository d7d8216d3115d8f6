use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Clear, Paragraph},
};

use crate::{
    app::{AppState, TransactionField},
    ui::{
        components::{
            card::Card,
            hints,
            modal::{centered_box, render_input},
        },
        theme::Theme,
    },
};

pub fn render_account_form(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let rect = centered_box(50, 6, area);
    frame.render_widget(Clear, rect);
    let block = Card::new("New account", theme).focused(true).block();
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .margin(1)
        .split(inner);

    render_input(
        frame,
        rows[0],
        "Name",
        &state.account_name,
        "Account name",
        true,
        theme,
    );
    render_form_hints(frame, rows[2], theme);
}

pub fn render_transaction_form(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    theme: &Theme,
) {
    let fields = TransactionField::ALL;
    let rect = centered_box(60, fields.len() as u16 + 6, area);
    frame.render_widget(Clear, rect);

    let title = state
        .ledger
        .selected_account()
        .map_or_else(|| "New transaction".to_string(), |a| format!("New transaction · {}", a.name));
    let block = Card::new(&title, theme).focused(true).block();
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let mut constraints = vec![Constraint::Length(1); fields.len()];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    let form_state = &state.transaction_form;
    for (row, field) in rows.iter().zip(fields) {
        render_input(
            frame,
            *row,
            field.label(),
            field.value(&form_state.form),
            field.placeholder(),
            form_state.focus == field,
            theme,
        );
    }
    render_form_hints(frame, rows[fields.len() + 1], theme);
}

fn render_form_hints(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let spans = hints::hints_to_spans(&hints::common::form_editing(), theme);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
