use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, LoginField},
    ui::{
        components::{hints, modal::centered_box},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card_area = centered_box(40, 7, area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(" ledger login ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Username
            Constraint::Length(1),
            Constraint::Length(1), // Password
        ])
        .margin(1)
        .split(inner);

    let login = &state.login;
    render_input(
        frame,
        rows[0],
        "user",
        &login.username,
        false,
        login.focus == LoginField::Username,
        theme,
    );
    render_input(
        frame,
        rows[2],
        "pass",
        &login.password,
        !login.reveal_password,
        login.focus == LoginField::Password,
        theme,
    );

    let below = |offset: u16| Rect {
        x: card_area.x,
        y: card_area.y.saturating_add(card_area.height + offset),
        width: card_area.width,
        height: 1,
    };

    if let Some(message) = &login.message {
        frame.render_widget(
            Paragraph::new(Span::styled(message.as_str(), Style::default().fg(theme.error)))
                .alignment(Alignment::Center),
            below(1),
        );
    }

    let mut spans = hints::hints_to_spans(&hints::common::form_editing()[..2], theme);
    spans.push(hints::hint_separator(theme));
    let reveal = if login.reveal_password { "hide" } else { "show" };
    spans.extend(hints::hints_to_spans(
        &[
            hints::KeyHint::new("Ctrl+R", reveal),
            hints::KeyHint::new("Ctrl+C", "quit"),
        ],
        theme,
    ));
    frame.render_widget(
        Paragraph::new(ratatui::text::Line::from(spans)).alignment(Alignment::Center),
        below(3),
    );
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    masked: bool,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };
    let shown = if masked {
        mask_password(value)
    } else {
        value.to_string()
    };

    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let line = ratatui::text::Line::from(vec![
        Span::styled(format!("{label}  "), Style::default().fg(theme.dim)),
        Span::styled(format!("{shown}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// One bullet per character.
fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}
