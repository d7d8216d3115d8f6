use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub mod common {
    use super::KeyHint;

    pub fn dashboard(can_transact: bool) -> Vec<KeyHint> {
        let mut hints = vec![
            KeyHint::new("↑↓", "move"),
            KeyHint::new("Enter", "select"),
            KeyHint::new("l", "lock"),
            KeyHint::new("a", "account"),
        ];
        if can_transact {
            hints.push(KeyHint::new("n", "transaction"));
        }
        hints.push(KeyHint::new("r", "reload"));
        hints.push(KeyHint::new("o", "logout"));
        hints
    }

    pub fn form_editing() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("Enter", "save"),
            KeyHint::new("Esc", "cancel"),
        ]
    }

    pub fn quit() -> Vec<KeyHint> {
        vec![KeyHint::new("q", "quit")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_hint_follows_guard() {
        let has_n = |hints: Vec<KeyHint>| hints.iter().any(|hint| hint.key == "n");
        assert!(has_n(common::dashboard(true)));
        assert!(!has_n(common::dashboard(false)));
    }
}
