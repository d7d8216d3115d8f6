//! Wire types spoken by the ledger backend.
//!
//! Field names follow the backend's JSON (`_id`, camelCase); the Rust side
//! uses snake_case and converts through serde attributes.

use serde::{Deserialize, Deserializer, Serialize};

pub use money::{Amount, AmountError};

mod money;

/// Opaque server-assigned account identifier.
pub type AccountId = String;

/// Reads `null` or a missing field as an empty string.
fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub mod account {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Account {
        #[serde(rename = "_id")]
        pub id: AccountId,
        pub name: String,
    }

    /// Request body for `POST /api/accounts`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        #[serde(rename = "_id")]
        pub id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub account_id: Option<AccountId>,
        #[serde(default, deserialize_with = "nullable_string")]
        pub date_of_entry: String,
        #[serde(default)]
        pub due_on: Option<String>,
        #[serde(default, deserialize_with = "nullable_string")]
        pub reference: String,
        #[serde(default, deserialize_with = "nullable_string")]
        pub description: String,
        #[serde(default)]
        pub debit: Amount,
        #[serde(default)]
        pub credit: Amount,
        #[serde(default, deserialize_with = "nullable_string")]
        pub remarks: String,
        /// Running balance computed by the server as of this entry.
        #[serde(default)]
        pub balance: Amount,
    }

    /// Request body for `POST /api/transactions`.
    ///
    /// `due_on` is always serialized, as `null` when absent.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub account_id: AccountId,
        pub date_of_entry: String,
        pub due_on: Option<String>,
        pub reference: String,
        pub description: String,
        pub debit: Amount,
        pub credit: Amount,
        pub remarks: String,
    }
}

/// Error payload some backend routes attach to non-2xx responses.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn into_text(self) -> Option<String> {
        self.error.or(self.message)
    }
}
