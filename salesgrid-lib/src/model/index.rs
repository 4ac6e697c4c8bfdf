//! Index tables: id to display name lookups

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::value_key;

/// Maps an entity id to its display value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct IndexTable(BTreeMap<String, String>);

impl IndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a display value; numeric and string ids are treated alike.
    pub fn get(&self, id: &Value) -> Option<&str> {
        self.0.get(&value_key(id)).map(String::as_str)
    }

    /// Display values in id order.
    pub fn names(&self) -> Vec<String> {
        self.0.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IndexTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The two lookup tables the grid denormalizes against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indexes {
    pub sellers: IndexTable,
    pub customers: IndexTable,
}

impl Indexes {
    /// Option-set name of the sellers table.
    pub const SELLERS: &'static str = "sellers";
    /// Option-set name of the customers table.
    pub const CUSTOMERS: &'static str = "customers";

    pub fn new(sellers: IndexTable, customers: IndexTable) -> Self {
        Self { sellers, customers }
    }

    /// Looks a table up by the option-set name used in column descriptors.
    pub fn get(&self, name: &str) -> Option<&IndexTable> {
        match name {
            Self::SELLERS => Some(&self.sellers),
            Self::CUSTOMERS => Some(&self.customers),
            _ => None,
        }
    }

    /// Iterates `(name, table)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &IndexTable)> {
        [(Self::SELLERS, &self.sellers), (Self::CUSTOMERS, &self.customers)].into_iter()
    }
}
