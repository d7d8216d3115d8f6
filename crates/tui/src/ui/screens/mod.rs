pub mod dashboard;
pub mod forms;
pub mod login;
pub mod transactions;
