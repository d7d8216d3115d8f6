//! In-memory backend double shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    Account, AccountNew, Amount, RemoteError, RemoteLedger, Transaction, TransactionNew,
};

pub fn account(id: &str, name: &str) -> Account {
    Account {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn transaction(id: &str, debit: i64, credit: i64, balance: i64) -> Transaction {
    Transaction {
        id: id.to_string(),
        account_id: None,
        date_of_entry: "2024-01-01T00:00:00.000Z".to_string(),
        due_on: None,
        reference: String::new(),
        description: String::new(),
        debit: Amount::new(debit),
        credit: Amount::new(credit),
        remarks: String::new(),
        balance: Amount::new(balance),
    }
}

/// Behaves like the backend: keeps accounts and transactions, computes the
/// running balance on insert, and can be told to fail the next call.
#[derive(Default)]
pub struct FakeRemote {
    accounts: Mutex<Vec<Account>>,
    transactions: Mutex<HashMap<String, Vec<Transaction>>>,
    sent: Mutex<Vec<TransactionNew>>,
    fail_next: Mutex<Option<RemoteError>>,
    account_loads: AtomicUsize,
    created_accounts: AtomicUsize,
}

impl FakeRemote {
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let remote = Self::default();
        remote.set_accounts(accounts);
        remote
    }

    pub fn set_accounts(&self, accounts: Vec<Account>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    pub fn set_transactions(&self, account_id: &str, items: Vec<Transaction>) {
        self.transactions
            .lock()
            .unwrap()
            .insert(account_id.to_string(), items);
    }

    pub fn fail_next(&self, err: RemoteError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn account_loads(&self) -> usize {
        self.account_loads.load(Ordering::SeqCst)
    }

    pub fn created_accounts(&self) -> usize {
        self.created_accounts.load(Ordering::SeqCst)
    }

    pub fn sent_transactions(&self) -> Vec<TransactionNew> {
        self.sent.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), RemoteError> {
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl RemoteLedger for FakeRemote {
    async fn list_accounts(&self) -> Result<Vec<Account>, RemoteError> {
        self.account_loads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn list_transactions(&self, account_id: &str) -> Result<Vec<Transaction>, RemoteError> {
        self.check()?;
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .get(account_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_account(&self, payload: &AccountNew) -> Result<Account, RemoteError> {
        self.check()?;
        let n = self.created_accounts.fetch_add(1, Ordering::SeqCst);
        let created = account(&format!("new-{n}"), &payload.name);
        self.accounts.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn create_transaction(&self, payload: &TransactionNew) -> Result<Transaction, RemoteError> {
        self.check()?;
        self.sent.lock().unwrap().push(payload.clone());

        let mut transactions = self.transactions.lock().unwrap();
        let items = transactions.entry(payload.account_id.clone()).or_default();
        let previous = items.last().map(|tx| tx.balance).unwrap_or_default();
        let created = Transaction {
            id: format!("tx-{}", items.len()),
            account_id: Some(payload.account_id.clone()),
            date_of_entry: payload.date_of_entry.clone(),
            due_on: payload.due_on.clone(),
            reference: payload.reference.clone(),
            description: payload.description.clone(),
            debit: payload.debit,
            credit: payload.credit,
            remarks: payload.remarks.clone(),
            balance: Amount::new(previous.cents() + payload.credit.cents() - payload.debit.cents()),
        };
        items.push(created.clone());
        Ok(created)
    }
}
