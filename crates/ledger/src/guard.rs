use crate::{AccountId, LockMap};

/// Whether a new transaction may be created right now.
///
/// Recomputed from the current selection and lock map at every call site;
/// the result is never stored.
pub fn can_transact(selection: Option<&AccountId>, locks: &LockMap) -> bool {
    match selection {
        Some(id) => !locks.is_locked(id),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_selection_cannot_transact() {
        assert!(!can_transact(None, &LockMap::default()));
    }

    #[test]
    fn locked_selection_cannot_transact() {
        let mut locks = LockMap::default();
        locks.lock("1");
        assert!(!can_transact(Some(&"1".to_string()), &locks));
        assert!(can_transact(Some(&"2".to_string()), &locks));
    }

    #[test]
    fn unlocking_restores_permission() {
        let mut locks = LockMap::default();
        let id = "1".to_string();
        locks.toggle(&id);
        assert!(!can_transact(Some(&id), &locks));
        locks.toggle(&id);
        assert!(can_transact(Some(&id), &locks));
    }
}
