//! Account registry: the cached account list, the lock map and the selection.
//!
//! Invariant: after every [`finish_load`](AccountRegistry::finish_load) and
//! [`toggle_lock`](AccountRegistry::toggle_lock) the selection is either
//! `None` or the id of an unlocked account present in the list.
//! [`select`](AccountRegistry::select) trusts its caller.

use std::cmp::Ordering;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{
    Account, AccountId, AccountNew, Command, LedgerError, LockMap, RemoteError, Result,
};

#[derive(Debug, Default)]
pub struct AccountRegistry {
    /// Fetch order, with created accounts appended.
    accounts: Vec<Account>,
    locks: LockMap,
    selection: Option<AccountId>,
    loading: bool,
}

impl AccountRegistry {
    pub fn new(locks: LockMap) -> Self {
        Self {
            locks,
            ..Self::default()
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn locks(&self) -> &LockMap {
        &self.locks
    }

    pub fn selection(&self) -> Option<&AccountId> {
        self.selection.as_ref()
    }

    pub fn selected_account(&self) -> Option<&Account> {
        let id = self.selection.as_ref()?;
        self.find(id)
    }

    pub fn find(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn is_locked(&self, id: &str) -> bool {
        self.locks.is_locked(id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Marks the list as loading and returns the fetch to run.
    pub fn load_accounts(&mut self) -> Command {
        self.loading = true;
        Command::LoadAccounts
    }

    /// Applies the result of a [`Command::LoadAccounts`].
    ///
    /// On failure the cached list and the selection are left untouched.
    pub fn finish_load(&mut self, result: std::result::Result<Vec<Account>, RemoteError>) -> Result<()> {
        self.loading = false;
        let accounts = result.map_err(|err| LedgerError::load("accounts", err))?;
        tracing::debug!("loaded {} accounts", accounts.len());
        self.accounts = accounts;

        if let Some(selected) = self.selection.as_deref() {
            let exists = self.find(selected).is_some();
            if !exists || self.locks.is_locked(selected) {
                tracing::debug!("selection {selected} no longer valid, clearing");
                self.selection = None;
            }
        }
        Ok(())
    }

    /// Accounts in display order: unlocked first, then locked, each group
    /// ascending by name. Ties keep fetch order.
    pub fn ordered_accounts(&self) -> Vec<&Account> {
        let mut ordered: Vec<&Account> = self.accounts.iter().collect();
        // `sort_by` is stable, so identical names keep fetch order.
        ordered.sort_by(|a, b| {
            self.locks
                .is_locked(&a.id)
                .cmp(&self.locks.is_locked(&b.id))
                .then_with(|| compare_names(&a.name, &b.name))
        });
        ordered
    }

    /// Validates `name` and returns the create request. Nothing is sent or
    /// changed when the trimmed name is empty.
    pub fn create_account(&self, name: &str) -> Result<Command> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation(
                "Account name must not be empty".to_string(),
            ));
        }
        Ok(Command::CreateAccount(AccountNew {
            name: name.to_string(),
        }))
    }

    /// Applies the result of a [`Command::CreateAccount`]: the new account is
    /// appended and selected. New accounts are never locked.
    pub fn finish_create(&mut self, result: std::result::Result<Account, RemoteError>) -> Result<()> {
        let account = result.map_err(|err| LedgerError::create("create account", err))?;
        tracing::info!("created account {} ({})", account.name, account.id);
        self.selection = Some(account.id.clone());
        self.accounts.push(account);
        Ok(())
    }

    /// Flips the lock of `id` and returns whether it is now locked.
    ///
    /// Locking the selected account moves the selection to the first unlocked
    /// account in fetch order, or clears it when none is left.
    pub fn toggle_lock(&mut self, id: &str) -> bool {
        let locked = self.locks.toggle(id);
        if locked && self.selection.as_deref() == Some(id) {
            self.selection = self
                .accounts
                .iter()
                .find(|account| !self.locks.is_locked(&account.id))
                .map(|account| account.id.clone());
            tracing::debug!("selected account {id} locked, selection now {:?}", self.selection);
        }
        locked
    }

    pub fn select(&mut self, id: impl Into<AccountId>) {
        self.selection = Some(id.into());
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }
}

/// Locale-aware name comparison.
///
/// Names compare first ignoring case and accents, then by accents, then
/// lowercase before uppercase, so `"apple" < "Apple" < "Äpple" < "banana"`.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| folded(a).cmp(&folded(b)))
        .then_with(|| case_pattern(a).cmp(&case_pattern(b)))
}

fn base_letters(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn folded(name: &str) -> String {
    name.nfd().flat_map(char::to_lowercase).collect()
}

fn case_pattern(name: &str) -> Vec<bool> {
    name.chars().map(char::is_uppercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::account;

    fn registry(accounts: &[(&str, &str)], locked: &[&str]) -> AccountRegistry {
        let mut registry = AccountRegistry::new(locked.iter().copied().collect());
        registry
            .finish_load(Ok(accounts
                .iter()
                .map(|(id, name)| account(id, name))
                .collect()))
            .unwrap();
        registry
    }

    fn names(registry: &AccountRegistry) -> Vec<&str> {
        registry
            .ordered_accounts()
            .into_iter()
            .map(|account| account.name.as_str())
            .collect()
    }

    fn assert_selection_invariant(registry: &AccountRegistry) {
        if let Some(id) = registry.selection() {
            assert!(registry.find(id).is_some(), "selection {id} not in list");
            assert!(!registry.is_locked(id), "selection {id} is locked");
        }
    }

    #[test]
    fn orders_by_name_when_nothing_locked() {
        let registry = registry(&[("1", "B"), ("2", "A")], &[]);
        assert_eq!(names(&registry), vec!["A", "B"]);
    }

    #[test]
    fn locked_accounts_sort_last() {
        let registry = registry(&[("1", "Alpha"), ("2", "Zulu"), ("3", "Mike")], &["1"]);
        assert_eq!(names(&registry), vec!["Mike", "Zulu", "Alpha"]);
    }

    #[test]
    fn identical_names_keep_fetch_order() {
        let registry = registry(&[("1", "Same"), ("2", "Other"), ("3", "Same")], &[]);
        let ids: Vec<&str> = registry
            .ordered_accounts()
            .into_iter()
            .map(|account| account.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn name_comparison_ignores_case_and_accents_first() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Écurie", "ecurie"), Ordering::Greater);
        assert_eq!(compare_names("Écurie", "Farm"), Ordering::Less);
        assert_eq!(compare_names("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_names("Travel", "Travel"), Ordering::Equal);
    }

    #[test]
    fn locking_selected_moves_to_first_unlocked_in_fetch_order() {
        let mut registry = registry(&[("1", "Zeta"), ("2", "Beta"), ("3", "Alpha")], &[]);
        registry.select("1");

        assert!(registry.toggle_lock("1"));
        // Fetch order picks "2" even though "3" sorts first by name.
        assert_eq!(registry.selection().map(String::as_str), Some("2"));
    }

    #[test]
    fn locking_only_unlocked_selected_clears_selection() {
        let mut registry = registry(&[("1", "A"), ("2", "B")], &["2"]);
        registry.select("1");

        registry.toggle_lock("1");
        assert_eq!(registry.selection(), None);
    }

    #[test]
    fn locking_other_account_keeps_selection() {
        let mut registry = registry(&[("1", "A"), ("2", "B")], &[]);
        registry.select("1");

        registry.toggle_lock("2");
        assert_eq!(registry.selection().map(String::as_str), Some("1"));
    }

    #[test]
    fn unlocking_selected_keeps_selection() {
        let mut registry = registry(&[("1", "A"), ("2", "B")], &[]);
        registry.select("1");
        registry.toggle_lock("2");
        registry.toggle_lock("2");
        assert_eq!(registry.selection().map(String::as_str), Some("1"));
    }

    #[test]
    fn reload_clears_vanished_selection() {
        let mut registry = registry(&[("1", "A"), ("2", "B")], &[]);
        registry.select("2");

        registry.finish_load(Ok(vec![account("1", "A")])).unwrap();
        assert_eq!(registry.selection(), None);
    }

    #[test]
    fn reload_keeps_valid_selection() {
        let mut registry = registry(&[("1", "A"), ("2", "B")], &[]);
        registry.select("2");

        registry
            .finish_load(Ok(vec![account("2", "B"), account("3", "C")]))
            .unwrap();
        assert_eq!(registry.selection().map(String::as_str), Some("2"));
        assert_eq!(registry.accounts().len(), 2);
    }

    #[test]
    fn reload_clears_selection_locked_outside_toggle() {
        let mut registry = registry(&[("1", "A"), ("2", "B")], &["2"]);
        // `select` does not validate; the next load does.
        registry.select("2");
        registry
            .finish_load(Ok(vec![account("1", "A"), account("2", "B")]))
            .unwrap();
        assert_eq!(registry.selection(), None);
    }

    #[test]
    fn failed_reload_keeps_list_and_selection() {
        let mut registry = registry(&[("1", "A")], &[]);
        registry.select("1");
        registry.load_accounts();
        assert!(registry.is_loading());

        let err = registry
            .finish_load(Err(RemoteError::Transport("offline".to_string())))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Load(_)));
        assert!(!registry.is_loading());
        assert_eq!(registry.accounts().len(), 1);
        assert_eq!(registry.selection().map(String::as_str), Some("1"));
    }

    #[test]
    fn blank_account_name_is_rejected_locally() {
        let registry = registry(&[], &[]);
        let err = registry.create_account("   ").unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn create_trims_name_and_selects_new_account() {
        let mut registry = registry(&[("1", "A")], &[]);
        let command = registry.create_account("  Travel Fund ").unwrap();
        assert_eq!(
            command,
            Command::CreateAccount(AccountNew {
                name: "Travel Fund".to_string()
            })
        );

        registry.finish_create(Ok(account("9", "Travel Fund"))).unwrap();
        assert_eq!(registry.selection().map(String::as_str), Some("9"));
        assert_eq!(registry.accounts().last().map(|a| a.id.as_str()), Some("9"));
    }

    #[test]
    fn failed_create_changes_nothing() {
        let mut registry = registry(&[("1", "A")], &[]);
        registry.select("1");
        let err = registry
            .finish_create(Err(RemoteError::Status {
                status: 500,
                message: "boom".to_string(),
            }))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Create(_)));
        assert_eq!(registry.accounts().len(), 1);
        assert_eq!(registry.selection().map(String::as_str), Some("1"));
    }

    #[test]
    fn selection_invariant_holds_for_every_lock_state() {
        let ids = ["1", "2", "3"];
        // Every subset of locked accounts, every starting selection.
        for mask in 0..(1u8 << ids.len()) {
            let locked: Vec<&str> = ids
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u8 << *i) != 0)
                .map(|(_, id)| *id)
                .collect();

            for start in ids {
                if locked.contains(&start) {
                    continue;
                }
                for toggled in ids {
                    let mut registry =
                        registry(&[("1", "C"), ("2", "B"), ("3", "A")], &locked);
                    registry.select(start);
                    assert_selection_invariant(&registry);

                    registry.toggle_lock(toggled);
                    assert_selection_invariant(&registry);

                    registry
                        .finish_load(Ok(vec![account("1", "C"), account("3", "A")]))
                        .unwrap();
                    assert_selection_invariant(&registry);
                }
            }
        }
    }
}
