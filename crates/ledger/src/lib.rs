//! Client-side state of the ledger application.
//!
//! The crate owns everything the front end needs to decide *what* to show and
//! *which* requests to send: the account registry with its lock map and
//! selection, the transaction view with its derived totals, the session gate
//! and the local persistence of identity and locks. Talking to the backend is
//! left to an implementation of [`RemoteLedger`]; the state never awaits a
//! request itself but emits [`Command`]s and consumes [`Outcome`]s, so a front
//! end can run requests in the background and feed results back in any order.

pub use api_types::{
    AccountId, Amount,
    account::{Account, AccountNew},
    transaction::{Transaction, TransactionNew},
};
pub use auth::{AuthenticationProvider, FixedCredentials};
pub use error::LedgerError;
pub use guard::can_transact;
pub use locks::LockMap;
pub use registry::{AccountRegistry, compare_names};
pub use remote::{Command, Outcome, RemoteError, RemoteLedger};
pub use session::{Identity, SessionGate};
pub use state::{AUTH_KEY, LOCKS_KEY, Ledger};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use transactions::{Totals, TransactionForm, TransactionView, totals};

mod auth;
mod error;
mod guard;
mod locks;
mod registry;
mod remote;
mod session;
mod state;
mod store;
mod transactions;

#[cfg(test)]
mod testing;

pub type Result<T> = std::result::Result<T, LedgerError>;
