//! Port to the ledger backend and the request/response values exchanged with
//! it.
//!
//! The state never calls the backend directly. Operations return a
//! [`Command`]; whoever drives the state runs it with [`Command::execute`]
//! (inline or on a background task) and hands the resulting [`Outcome`] back
//! to [`Ledger::apply`](crate::Ledger::apply).

use std::future::Future;

use thiserror::Error;

use crate::{Account, AccountId, AccountNew, Transaction, TransactionNew};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("server unreachable: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Request/response contract of the backend.
///
/// | Operation | Request |
/// |---|---|
/// | [`list_accounts`](Self::list_accounts) | `GET /api/accounts` |
/// | [`list_transactions`](Self::list_transactions) | `GET /api/transactions/{accountId}` |
/// | [`create_account`](Self::create_account) | `POST /api/accounts` |
/// | [`create_transaction`](Self::create_transaction) | `POST /api/transactions` |
pub trait RemoteLedger {
    fn list_accounts(&self) -> impl Future<Output = Result<Vec<Account>, RemoteError>> + Send;

    /// Transactions of one account, oldest first.
    fn list_transactions(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<Vec<Transaction>, RemoteError>> + Send;

    fn create_account(
        &self,
        payload: &AccountNew,
    ) -> impl Future<Output = Result<Account, RemoteError>> + Send;

    fn create_transaction(
        &self,
        payload: &TransactionNew,
    ) -> impl Future<Output = Result<Transaction, RemoteError>> + Send;
}

/// A request the state wants performed against the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadAccounts,
    /// Tagged with the account it was issued for.
    LoadTransactions { account_id: AccountId },
    CreateAccount(AccountNew),
    CreateTransaction(TransactionNew),
}

/// The completed counterpart of a [`Command`].
#[derive(Debug)]
pub enum Outcome {
    Accounts(Result<Vec<Account>, RemoteError>),
    Transactions {
        account_id: AccountId,
        result: Result<Vec<Transaction>, RemoteError>,
    },
    AccountCreated(Result<Account, RemoteError>),
    TransactionCreated {
        account_id: AccountId,
        result: Result<Transaction, RemoteError>,
    },
}

impl Command {
    pub async fn execute<R: RemoteLedger + ?Sized>(self, remote: &R) -> Outcome {
        match self {
            Self::LoadAccounts => Outcome::Accounts(remote.list_accounts().await),
            Self::LoadTransactions { account_id } => {
                let result = remote.list_transactions(&account_id).await;
                Outcome::Transactions { account_id, result }
            }
            Self::CreateAccount(payload) => {
                Outcome::AccountCreated(remote.create_account(&payload).await)
            }
            Self::CreateTransaction(payload) => {
                let result = remote.create_transaction(&payload).await;
                Outcome::TransactionCreated {
                    account_id: payload.account_id,
                    result,
                }
            }
        }
    }
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Self::Accounts(result) => result.is_ok(),
            Self::Transactions { result, .. } => result.is_ok(),
            Self::AccountCreated(result) => result.is_ok(),
            Self::TransactionCreated { result, .. } => result.is_ok(),
        }
    }
}
