//! # Favorites Bookkeeping
//!
//! The in-memory set of favorited supplier ids, with optimistic toggles that
//! can be confirmed, coerced or rolled back once the server answers.
//!
//! ## Toggle Lifecycle
//! ```text
//! apply_optimistic(id) ──► UI shows new state immediately
//!          │
//!          ▼ remote add/remove
//!   ┌──────┴───────────────┬──────────────────────┬─────────────────┐
//!   │ 2xx                  │ 409 on add           │ other failure   │
//!   │ confirm(toggle)      │ 404 on remove        │ rollback(toggle)│
//!   │                      │ coerce(toggle, fav)  │                 │
//!   └──────────────────────┴──────────────────────┴─────────────────┘
//! ```
//!
//! A refresh that lands while a toggle is in flight re-applies the toggle on
//! top of the server's set, so the last local mutation wins until it settles.
//!
//! Every toggle carries a sequence number. Settling a toggle that a newer
//! toggle of the same id has superseded leaves membership alone.

use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};

/// Record of one optimistic flip, returned by [`FavoriteSet::apply_optimistic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggle {
    pub supplier_id: String,
    /// Membership before the flip.
    pub was_favorite: bool,
    /// Membership after the flip.
    pub now_favorite: bool,
    seq: u64,
}

impl PendingToggle {
    /// True when the flip added the id (so the remote call is an add).
    pub fn is_add(&self) -> bool {
        self.now_favorite
    }
}

/// Favorited supplier ids plus refresh bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct FavoriteSet {
    ids: HashSet<String>,
    last_refreshed: Option<DateTime<Utc>>,
    pending: HashMap<String, PendingToggle>,
    next_seq: u64,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_favorite(&self, supplier_id: &str) -> bool {
        self.ids.contains(supplier_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in sorted order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn has_pending(&self, supplier_id: &str) -> bool {
        self.pending.contains_key(supplier_id)
    }

    /// Whether the set should be fetched again.
    ///
    /// True when it was never fetched, is empty, or is older than `staleness`.
    pub fn needs_refresh(&self, now: DateTime<Utc>, staleness: Duration) -> bool {
        match self.last_refreshed {
            None => true,
            Some(_) if self.ids.is_empty() => true,
            Some(at) => now - at > staleness,
        }
    }

    /// Flips membership now and records how to undo it.
    pub fn apply_optimistic(&mut self, supplier_id: &str) -> PendingToggle {
        let was_favorite = self.is_favorite(supplier_id);
        self.set_member(supplier_id, !was_favorite);

        self.next_seq += 1;
        let toggle = PendingToggle {
            supplier_id: supplier_id.to_string(),
            was_favorite,
            now_favorite: !was_favorite,
            seq: self.next_seq,
        };
        self.pending
            .insert(supplier_id.to_string(), toggle.clone());
        toggle
    }

    /// The server agreed; the optimistic state stands.
    pub fn confirm(&mut self, toggle: &PendingToggle) {
        self.settle(toggle);
    }

    /// The server reported the id is already (or no longer) a favorite.
    pub fn coerce(&mut self, toggle: &PendingToggle, favorited: bool) {
        if self.settle(toggle) {
            self.set_member(&toggle.supplier_id, favorited);
        }
    }

    /// The remote call failed; restore the state before the flip.
    pub fn rollback(&mut self, toggle: &PendingToggle) {
        if self.settle(toggle) {
            self.set_member(&toggle.supplier_id, toggle.was_favorite);
        }
    }

    /// Replaces the set with a fresh server copy taken at `now`.
    ///
    /// In-flight toggles are re-applied on top.
    pub fn replace_all<I>(&mut self, ids: I, now: DateTime<Utc>)
    where
        I: IntoIterator<Item = String>,
    {
        self.ids = ids.into_iter().collect();
        let overrides: Vec<(String, bool)> = self
            .pending
            .values()
            .map(|t| (t.supplier_id.clone(), t.now_favorite))
            .collect();
        for (id, favorited) in overrides {
            self.set_member(&id, favorited);
        }
        self.last_refreshed = Some(now);
    }

    /// Forgets everything (logout).
    pub fn clear(&mut self) {
        self.ids.clear();
        self.pending.clear();
        self.last_refreshed = None;
    }

    /// Removes the pending record if `toggle` is still the latest for its id.
    fn settle(&mut self, toggle: &PendingToggle) -> bool {
        match self.pending.get(&toggle.supplier_id) {
            Some(current) if current.seq == toggle.seq => {
                self.pending.remove(&toggle.supplier_id);
                true
            }
            _ => false,
        }
    }

    fn set_member(&mut self, supplier_id: &str, favorited: bool) {
        if favorited {
            self.ids.insert(supplier_id.to_string());
        } else {
            self.ids.remove(supplier_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn loaded(ids: &[&str]) -> FavoriteSet {
        let mut set = FavoriteSet::new();
        set.replace_all(ids.iter().map(|s| s.to_string()), t0());
        set
    }

    #[test]
    fn test_needs_refresh() {
        let staleness = Duration::seconds(30);
        assert!(FavoriteSet::new().needs_refresh(t0(), staleness));

        let set = loaded(&["a"]);
        assert!(!set.needs_refresh(t0() + Duration::seconds(30), staleness));
        assert!(set.needs_refresh(t0() + Duration::seconds(31), staleness));

        let empty = loaded(&[]);
        assert!(empty.needs_refresh(t0(), staleness));
    }

    #[test]
    fn test_optimistic_add_then_confirm() {
        let mut set = loaded(&[]);
        let toggle = set.apply_optimistic("s1");
        assert!(toggle.is_add());
        assert!(set.is_favorite("s1"));
        assert!(set.has_pending("s1"));

        set.confirm(&toggle);
        assert!(set.is_favorite("s1"));
        assert!(!set.has_pending("s1"));
    }

    #[test]
    fn test_rollback_restores_previous_state() {
        let mut set = loaded(&["s1"]);
        let toggle = set.apply_optimistic("s1");
        assert!(!set.is_favorite("s1"));

        set.rollback(&toggle);
        assert!(set.is_favorite("s1"));
        assert!(!set.has_pending("s1"));
    }

    #[test]
    fn test_coerce_forces_state() {
        let mut set = loaded(&["s1"]);
        let toggle = set.apply_optimistic("s1");
        set.coerce(&toggle, false);
        assert!(!set.is_favorite("s1"));

        let toggle = set.apply_optimistic("s2");
        set.coerce(&toggle, true);
        assert!(set.is_favorite("s2"));
    }

    #[test]
    fn test_superseded_toggle_does_not_rollback() {
        let mut set = loaded(&[]);
        let first = set.apply_optimistic("s1"); // add
        let second = set.apply_optimistic("s1"); // remove
        assert!(!set.is_favorite("s1"));

        // The add fails after the remove was issued; the newer toggle owns state.
        set.rollback(&first);
        assert!(!set.is_favorite("s1"));
        assert!(set.has_pending("s1"));

        set.confirm(&second);
        assert!(!set.has_pending("s1"));
    }

    #[test]
    fn test_refresh_reapplies_pending_toggles() {
        let mut set = loaded(&["s1"]);
        let add = set.apply_optimistic("s2");
        let remove = set.apply_optimistic("s1");

        // Server snapshot taken before either call landed.
        set.replace_all(vec!["s1".to_string(), "s3".to_string()], t0() + Duration::seconds(5));
        assert!(set.is_favorite("s2"));
        assert!(!set.is_favorite("s1"));
        assert!(set.is_favorite("s3"));
        assert_eq!(set.last_refreshed(), Some(t0() + Duration::seconds(5)));

        set.confirm(&add);
        set.confirm(&remove);
        assert_eq!(set.ids(), vec!["s2".to_string(), "s3".to_string()]);
    }

    #[test]
    fn test_clear() {
        let mut set = loaded(&["s1", "s2"]);
        set.apply_optimistic("s3");
        set.clear();
        assert!(set.is_empty());
        assert!(!set.has_pending("s3"));
        assert_eq!(set.last_refreshed(), None);
    }
}
