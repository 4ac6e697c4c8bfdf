//! Query parameters accumulated across plugins

use std::collections::BTreeMap;

/// String key/value parameters sent with a record fetch.
///
/// Keys are kept sorted, so two queries holding the same pairs serialize to
/// byte-identical strings regardless of the order contributions arrived in.
/// Builder methods consume and return the query, so a contribution never
/// mutates a mapping someone else still holds.
///
/// # Example
///
/// ```
/// use salesgrid_lib::model::Query;
///
/// let query = Query::new()
///     .with("page", 2)
///     .with("limit", 10)
///     .with("filter[seller]", "Alice Smith");
///
/// assert_eq!(query.to_query_string(), "filter%5Bseller%5D=Alice+Smith&limit=10&page=2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query {
    params: BTreeMap<String, String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a query with `key` set to `value`; an existing key is overwritten.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Returns a query with every pair of `other` applied on top (last write wins).
    pub fn merge(mut self, other: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(other);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Canonical `application/x-www-form-urlencoded` form of the query.
    ///
    /// Used both as the URL query string and as the memoization key.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Query {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), |q, (k, v)| q.with(k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independent_serialization() {
        let a = Query::new().with("sort", "date:up").with("page", 1);
        let b = Query::new().with("page", 1).with("sort", "date:up");
        assert_eq!(a, b);
        assert_eq!(a.to_query_string(), b.to_query_string());
    }

    #[test]
    fn test_last_write_wins() {
        let query = Query::new().with("page", 1).with("page", 3);
        assert_eq!(query.get("page"), Some("3"));
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn test_empty() {
        assert_eq!(Query::new().to_query_string(), "");
    }
}
