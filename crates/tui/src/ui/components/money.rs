use api_types::Amount;
use ratatui::{
    style::{Color, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// A balance colored by sign. Zero stays neutral.
#[must_use]
pub fn styled_balance(amount: Amount, theme: &Theme) -> Span<'static> {
    let color = if amount.is_negative() {
        theme.negative
    } else if amount.is_zero() {
        theme.text
    } else {
        theme.positive
    };
    Span::styled(amount.grouped(), Style::default().fg(color))
}

/// A debit or credit column value. Zero is dimmed so the side that moved
/// stands out.
#[must_use]
pub fn styled_entry(amount: Amount, color: Color, theme: &Theme) -> Span<'static> {
    let color = if amount.is_zero() { theme.dim } else { color };
    Span::styled(amount.grouped(), Style::default().fg(color))
}
