//! Ordered contract tables
//!
//! `Table` keeps rows ordered by their primary key. `IndexedTable` adds a
//! secondary index of `(secondary key, primary key)` pairs that is updated
//! on every mutation, so ordered walks never re-sort. `ScopedTable` groups
//! tables by a scope name.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use sys_core::Name;

/// A row addressed by an account name
pub trait Row: Clone {
    fn primary_key(&self) -> Name;
}

/// A row with a derived ordering key
pub trait Indexed: Row {
    type Key: Ord + Clone + Debug;

    fn secondary_key(&self) -> Self::Key;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<R> {
    rows: BTreeMap<Name, R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<R: Row> Table<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &Name) -> Option<&R> {
        self.rows.get(key)
    }

    pub fn get_mut(&mut self, key: &Name) -> Option<&mut R> {
        self.rows.get_mut(key)
    }

    pub fn contains(&self, key: &Name) -> bool {
        self.rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    /// Insert or replace, returning the previous row
    pub fn upsert(&mut self, row: R) -> Option<R> {
        self.rows.insert(row.primary_key(), row)
    }

    pub fn remove(&mut self, key: &Name) -> Option<R> {
        self.rows.remove(key)
    }
}

pub struct IndexedTable<R: Indexed> {
    rows: BTreeMap<Name, R>,
    index: BTreeSet<(R::Key, Name)>,
}

impl<R: Indexed> Default for IndexedTable<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            index: BTreeSet::new(),
        }
    }
}

impl<R: Indexed> Clone for IndexedTable<R> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            index: self.index.clone(),
        }
    }
}

impl<R: Indexed + Debug> Debug for IndexedTable<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.rows.iter()).finish()
    }
}

impl<R: Indexed> IndexedTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_rows(rows: BTreeMap<Name, R>) -> Self {
        let index = rows
            .iter()
            .map(|(key, row)| (row.secondary_key(), *key))
            .collect();
        Self { rows, index }
    }

    pub fn get(&self, key: &Name) -> Option<&R> {
        self.rows.get(key)
    }

    pub fn contains(&self, key: &Name) -> bool {
        self.rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in primary-key order
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    /// Rows in secondary-key order, ties broken by primary key
    pub fn iter_by_secondary(&self) -> impl Iterator<Item = &R> {
        self.index.iter().filter_map(|(_, key)| self.rows.get(key))
    }

    /// First row whose secondary key is not less than `key`
    pub fn lower_bound(&self, key: R::Key) -> Option<&R> {
        self.index
            .range((key, Name::default())..)
            .next()
            .and_then(|(_, primary)| self.rows.get(primary))
    }

    pub fn upsert(&mut self, row: R) -> Option<R> {
        let previous = self.remove(&row.primary_key());
        self.index.insert((row.secondary_key(), row.primary_key()));
        self.rows.insert(row.primary_key(), row);
        previous
    }

    /// Apply `f` to the row and re-index it. The primary key must not change.
    pub fn modify<F: FnOnce(&mut R)>(&mut self, key: &Name, f: F) -> Option<&R> {
        let row = self.rows.get_mut(key)?;
        let old_secondary = row.secondary_key();
        f(row);
        debug_assert_eq!(row.primary_key(), *key);
        let new_secondary = row.secondary_key();
        if old_secondary != new_secondary {
            self.index.remove(&(old_secondary, *key));
            self.index.insert((new_secondary, *key));
        }
        self.rows.get(key)
    }

    pub fn remove(&mut self, key: &Name) -> Option<R> {
        let row = self.rows.remove(key)?;
        self.index.remove(&(row.secondary_key(), *key));
        Some(row)
    }
}

impl<R: Indexed + Serialize> Serialize for IndexedTable<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

impl<'de, R: Indexed + Deserialize<'de>> Deserialize<'de> for IndexedTable<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = BTreeMap::<Name, R>::deserialize(deserializer)?;
        Ok(Self::from_rows(rows))
    }
}

/// Tables partitioned by a scope name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopedTable<R> {
    scopes: BTreeMap<Name, Table<R>>,
}

impl<R> Default for ScopedTable<R> {
    fn default() -> Self {
        Self {
            scopes: BTreeMap::new(),
        }
    }
}

impl<R: Row> ScopedTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: &Name, key: &Name) -> Option<&R> {
        self.scopes.get(scope).and_then(|t| t.get(key))
    }

    pub fn get_mut(&mut self, scope: &Name, key: &Name) -> Option<&mut R> {
        self.scopes.get_mut(scope).and_then(|t| t.get_mut(key))
    }

    pub fn upsert(&mut self, scope: Name, row: R) -> Option<R> {
        self.scopes.entry(scope).or_default().upsert(row)
    }

    /// Remove a row; an emptied scope is dropped
    pub fn remove(&mut self, scope: &Name, key: &Name) -> Option<R> {
        let table = self.scopes.get_mut(scope)?;
        let row = table.remove(key);
        if table.is_empty() {
            self.scopes.remove(scope);
        }
        row
    }

    pub fn scope(&self, scope: &Name) -> impl Iterator<Item = &R> {
        self.scopes.get(scope).into_iter().flat_map(|t| t.iter())
    }

    /// Every row with its scope
    pub fn iter(&self) -> impl Iterator<Item = (Name, &R)> {
        self.scopes
            .iter()
            .flat_map(|(scope, t)| t.iter().map(move |row| (*scope, row)))
    }

    pub fn len(&self) -> usize {
        self.scopes.values().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Score {
        owner: Name,
        points: i64,
    }

    impl Row for Score {
        fn primary_key(&self) -> Name {
            self.owner
        }
    }

    impl Indexed for Score {
        type Key = Reverse<i64>;

        fn secondary_key(&self) -> Self::Key {
            Reverse(self.points)
        }
    }

    fn score(owner: &str, points: i64) -> Score {
        Score {
            owner: Name::constant(owner),
            points,
        }
    }

    fn order(table: &IndexedTable<Score>) -> Vec<String> {
        table
            .iter_by_secondary()
            .map(|s| s.owner.to_string())
            .collect()
    }

    #[test]
    fn test_table_upsert_and_remove() {
        let mut table = Table::new();
        assert!(table.upsert(score("alice", 1)).is_none());
        assert_eq!(table.upsert(score("alice", 3)).unwrap().points, 1);
        assert_eq!(table.get(&Name::constant("alice")).unwrap().points, 3);
        assert!(table.remove(&Name::constant("alice")).is_some());
        assert!(table.is_empty());
    }

    #[test]
    fn test_index_follows_modifications() {
        let mut table = IndexedTable::new();
        table.upsert(score("alice", 10));
        table.upsert(score("bob", 30));
        table.upsert(score("carol", 20));
        assert_eq!(order(&table), vec!["bob", "carol", "alice"]);

        table.modify(&Name::constant("alice"), |s| s.points = 40);
        assert_eq!(order(&table), vec!["alice", "bob", "carol"]);

        table.remove(&Name::constant("bob"));
        assert_eq!(order(&table), vec!["alice", "carol"]);
        assert!(table.modify(&Name::constant("bob"), |s| s.points = 1).is_none());
    }

    #[test]
    fn test_ties_break_by_primary_key() {
        let mut table = IndexedTable::new();
        table.upsert(score("carol", 5));
        table.upsert(score("alice", 5));
        table.upsert(score("bob", 5));
        assert_eq!(order(&table), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_lower_bound() {
        let mut table = IndexedTable::new();
        table.upsert(score("alice", 10));
        table.upsert(score("bob", 30));
        assert_eq!(table.lower_bound(Reverse(20)).unwrap().owner, Name::constant("alice"));
        assert!(table.lower_bound(Reverse(5)).is_none());
    }

    #[test]
    fn test_index_rebuilt_on_deserialize() {
        let mut table = IndexedTable::new();
        table.upsert(score("alice", 10));
        table.upsert(score("bob", 30));
        let json = serde_json::to_string(&table).unwrap();
        let back: IndexedTable<Score> = serde_json::from_str(&json).unwrap();
        assert_eq!(order(&back), vec!["bob", "alice"]);
    }

    #[test]
    fn test_scoped_table() {
        let mut scoped = ScopedTable::new();
        let alice = Name::constant("alice");
        let bob = Name::constant("bob");
        scoped.upsert(alice, score("bob", 1));
        scoped.upsert(alice, score("carol", 2));
        scoped.upsert(bob, score("alice", 3));
        assert_eq!(scoped.len(), 3);
        assert_eq!(scoped.scope(&alice).count(), 2);
        assert_eq!(scoped.get(&bob, &alice).unwrap().points, 3);

        scoped.remove(&bob, &alice);
        assert_eq!(scoped.scope(&bob).count(), 0);
        assert_eq!(scoped.iter().count(), 2);
    }
}
