use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// Centers a `width` x `height` box inside `area`, shrinking it to fit.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// One `label: value` input row. An empty value shows its placeholder.
pub fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
    theme: &Theme,
) {
    let label_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let cursor = if focused { "│" } else { "" };

    let mut spans = vec![Span::styled(format!("{label:<14}"), label_style)];
    if value.is_empty() {
        spans.push(Span::styled(cursor, Style::default().fg(theme.accent)));
        spans.push(Span::styled(placeholder.to_string(), Style::default().fg(theme.dim)));
    } else {
        spans.push(Span::styled(
            format!("{value}{cursor}"),
            Style::default().fg(theme.text),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
