//! In-memory stand-in for a persisted table.
//!
//! Models under test keep a `static` [`Table`] and forward their
//! [`Persistence`](workbench::Persistence) methods to it:
//!
//! ```
//! use workbench::{Model, Overrides, Persistence, PersistenceError};
//! use workbench_test_helpers::Table;
//!
//! static USERS: Table<User> = Table::new();
//!
//! #[derive(Debug, Default, Clone, Model)]
//! struct User {
//!     name: Option<String>,
//! }
//!
//! impl Persistence for User {
//!     fn save(&mut self) -> Option<bool> {
//!         USERS.save(self)
//!     }
//!
//!     fn find_where(filter: &Overrides) -> Option<Result<Vec<Self>, PersistenceError>> {
//!         USERS.find_where(filter)
//!     }
//! }
//!
//! let mut bob = User { name: Some("Bob".into()) };
//! bob.save();
//! let found = USERS.find_where(&workbench::overrides! { "name" => "Bob" });
//! assert!(matches!(found, Some(Ok(rows)) if rows.len() == 1));
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use workbench::{Attributes, Overrides, PersistenceError};

/// Rows of one model type plus call counters.
#[derive(Debug)]
pub struct Table<T> {
    rows: Mutex<Vec<T>>,
    saves: AtomicUsize,
    queries: AtomicUsize,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `true` when every key in `filter` reads back from `row` as the
/// same JSON value.
#[must_use]
pub fn matches<T: Attributes>(row: &T, filter: &Overrides) -> bool {
    filter
        .iter()
        .all(|(key, value)| row.attribute(key).as_ref() == Some(value))
}

impl<T> Table<T> {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            saves: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    /// Returns `true` when no rows are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    /// Number of [`Table::save`] calls since the last [`Table::clear`].
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of [`Table::find_where`] calls since the last [`Table::clear`].
    #[must_use]
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Removes every row and zeroes the counters.
    pub fn clear(&self) {
        self.rows.lock().clear();
        self.saves.store(0, Ordering::SeqCst);
        self.queries.store(0, Ordering::SeqCst);
    }
}

impl<T: Attributes + Clone> Table<T> {
    /// Stores `row` without counting it as a save.
    pub fn insert(&self, row: T) {
        self.rows.lock().push(row);
    }

    /// Stores a copy of `row` and counts the save.
    ///
    /// Always reports success, mirroring an ordinary save.
    #[expect(
        clippy::unnecessary_wraps,
        reason = "matches the shape of Persistence::save"
    )]
    pub fn save(&self, row: &T) -> Option<bool> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.insert(row.clone());
        Some(true)
    }

    /// Rows matching `filter` exactly, in insertion order.
    #[expect(
        clippy::unnecessary_wraps,
        reason = "matches the shape of Persistence::find_where"
    )]
    pub fn find_where(&self, filter: &Overrides) -> Option<Result<Vec<T>, PersistenceError>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock();
        Some(Ok(rows.iter().filter(|row| matches(*row, filter)).cloned().collect()))
    }

    /// Copy of every stored row.
    #[must_use]
    pub fn rows(&self) -> Vec<T> {
        self.rows.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workbench::{Model, Persistence, overrides};

    #[derive(Debug, Default, Clone, PartialEq, Model)]
    struct Row {
        name: Option<String>,
        age: Option<u32>,
    }

    impl Persistence for Row {}

    fn row(name: &str, age: u32) -> Row {
        Row {
            name: Some(name.to_owned()),
            age: Some(age),
        }
    }

    #[test]
    fn filters_on_every_key() {
        let table = Table::new();
        table.insert(row("Bob", 30));
        table.insert(row("Bob", 40));
        table.insert(row("Ann", 30));
        let Some(Ok(found)) = table.find_where(&overrides! { "name" => "Bob", "age" => 40 })
        else {
            panic!("query should succeed");
        };
        assert_eq!(found, vec![row("Bob", 40)]);
        assert_eq!(table.queries(), 1);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let table = Table::new();
        table.insert(row("Bob", 30));
        table.insert(row("Ann", 30));
        assert!(matches!(table.find_where(&overrides! {}), Some(Ok(rows)) if rows.len() == 2));
    }

    #[test]
    fn unknown_keys_never_match() {
        let table = Table::new();
        table.insert(row("Bob", 30));
        assert!(matches!(
            table.find_where(&overrides! { "nickname" => "Bobby" }),
            Some(Ok(rows)) if rows.is_empty()
        ));
    }

    #[test]
    fn save_counts_and_clear_resets() {
        let table = Table::new();
        assert_eq!(table.save(&row("Bob", 30)), Some(true));
        assert_eq!((table.len(), table.saves()), (1, 1));
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.saves(), 0);
    }
}
