//! Transaction list of the selected account and the figures derived from it.

use crate::{AccountId, Amount, Command, LedgerError, RemoteError, Result, Transaction, TransactionNew};

/// Aggregates shown above the transaction table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub debit: Amount,
    pub credit: Amount,
    /// Running balance of the last transaction in server order.
    pub balance: Amount,
}

/// Derives [`Totals`] from a server-ordered list. The balance is taken from
/// the server, never recomputed here.
pub fn totals(items: &[Transaction]) -> Totals {
    Totals {
        debit: items.iter().map(|tx| tx.debit).sum(),
        credit: items.iter().map(|tx| tx.credit).sum(),
        balance: items.last().map(|tx| tx.balance).unwrap_or_default(),
    }
}

#[derive(Debug, Default)]
pub struct TransactionView {
    /// Account the list is currently fetched for; follows the selection.
    target: Option<AccountId>,
    items: Vec<Transaction>,
    loading: bool,
}

impl TransactionView {
    pub fn target(&self) -> Option<&AccountId> {
        self.target.as_ref()
    }

    pub fn items(&self) -> &[Transaction] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn totals(&self) -> Totals {
        totals(&self.items)
    }

    /// Points the view at a new selection.
    ///
    /// Moving to `None` clears the list without a fetch. Moving to an account
    /// returns the fetch for it; the previous list stays visible until that
    /// fetch succeeds.
    pub fn retarget(&mut self, selection: Option<&AccountId>) -> Option<Command> {
        self.target = selection.cloned();
        match &self.target {
            Some(_) => self.load_transactions(),
            None => {
                self.items.clear();
                self.loading = false;
                None
            }
        }
    }

    /// Fetch for the current target, if any.
    pub fn load_transactions(&mut self) -> Option<Command> {
        let account_id = self.target.clone()?;
        self.loading = true;
        Some(Command::LoadTransactions { account_id })
    }

    /// Applies the result of a [`Command::LoadTransactions`].
    ///
    /// A response for an account other than the current target arrived after
    /// the selection moved on and is dropped without touching the view.
    pub fn finish_load(
        &mut self,
        account_id: &str,
        result: std::result::Result<Vec<Transaction>, RemoteError>,
    ) -> Result<()> {
        if self.target.as_deref() != Some(account_id) {
            tracing::debug!(
                "dropping stale transactions for {account_id}, target is {:?}",
                self.target
            );
            return Ok(());
        }

        self.loading = false;
        let items = result.map_err(|err| LedgerError::load("transactions", err))?;
        tracing::debug!("loaded {} transactions for {account_id}", items.len());
        self.items = items;
        Ok(())
    }
}

/// Raw text of the new-transaction form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub date_of_entry: String,
    pub due_on: String,
    pub reference: String,
    pub description: String,
    pub debit: String,
    pub credit: String,
    pub remarks: String,
}

impl TransactionForm {
    /// Builds the request body for `account_id`.
    ///
    /// Blank amounts become 0 and a blank due date is sent as `null`; other
    /// blank fields are sent as empty strings. Only amounts that do not parse,
    /// or are negative, are rejected.
    pub fn to_request(&self, account_id: &str) -> Result<TransactionNew> {
        let due_on = self.due_on.trim();
        Ok(TransactionNew {
            account_id: account_id.to_string(),
            date_of_entry: self.date_of_entry.trim().to_string(),
            due_on: (!due_on.is_empty()).then(|| due_on.to_string()),
            reference: self.reference.trim().to_string(),
            description: self.description.trim().to_string(),
            debit: parse_amount("debit", &self.debit)?,
            credit: parse_amount("credit", &self.credit)?,
            remarks: self.remarks.trim().to_string(),
        })
    }
}

fn parse_amount(field: &str, raw: &str) -> Result<Amount> {
    if raw.trim().is_empty() {
        return Ok(Amount::ZERO);
    }
    let amount: Amount = raw
        .parse()
        .map_err(|err| LedgerError::Validation(format!("Invalid {field}: {err}")))?;
    if amount.is_negative() {
        return Err(LedgerError::Validation(format!("{field} must not be negative")));
    }
    Ok(amount)
}
