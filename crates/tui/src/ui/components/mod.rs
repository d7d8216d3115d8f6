pub mod card;
pub mod hints;
pub mod modal;
pub mod money;
pub mod toast;
