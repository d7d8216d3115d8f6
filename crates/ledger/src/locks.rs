use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Client-local set of locked accounts.
///
/// Serialized as a JSON object mapping account ids to `true`. Unlocking
/// removes the key, so a `false` entry never exists; any `false` entries found
/// in persisted data are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<AccountId, bool>", into = "BTreeMap<AccountId, bool>")]
pub struct LockMap(BTreeSet<AccountId>);

impl LockMap {
    pub fn is_locked(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn lock(&mut self, id: &str) {
        self.0.insert(id.to_string());
    }

    pub fn unlock(&mut self, id: &str) {
        self.0.remove(id);
    }

    /// Flips the flag for `id` and returns whether it is now locked.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<AccountId, bool>> for LockMap {
    fn from(map: BTreeMap<AccountId, bool>) -> Self {
        Self(
            map.into_iter()
                .filter_map(|(id, locked)| locked.then_some(id))
                .collect(),
        )
    }
}

impl From<LockMap> for BTreeMap<AccountId, bool> {
    fn from(locks: LockMap) -> Self {
        locks.0.into_iter().map(|id| (id, true)).collect()
    }
}

impl<S: Into<AccountId>> FromIterator<S> for LockMap {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
