//! Insertion-ordered key registry with multi-key aliasing.
//!
//! Values live in an arena; each key maps to an index into that arena, so
//! `"v verbose"` makes two keys share one value without shared ownership.

use indexmap::IndexMap;

use crate::error::{ParseError, ParseResult};

#[derive(Debug, Clone)]
pub struct Registry<V> {
    values: Vec<V>,
    keys: IndexMap<String, usize>,
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            keys: IndexMap::new(),
        }
    }
}

impl<V> Registry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every whitespace-separated key in `names` to `value`.
    ///
    /// Fails without modifying the registry if `names` holds no key or any
    /// key is already bound. Returns the value's arena index.
    pub fn insert(&mut self, names: &str, value: V) -> ParseResult<usize> {
        let keys = split_keys(names);
        if keys.is_empty() {
            return Err(ParseError::EmptyName);
        }
        for (i, key) in keys.iter().enumerate() {
            if self.keys.contains_key(*key) || keys[..i].contains(key) {
                return Err(ParseError::DuplicateKey {
                    key: key.to_string(),
                });
            }
        }

        let index = self.values.len();
        self.values.push(value);
        for key in keys {
            self.keys.insert(key.to_string(), index);
        }
        Ok(index)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.keys.get(key).map(|&i| &self.values[i])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.keys.get(key).map(|&i| &mut self.values[i])
    }

    /// `(key, value)` pairs in insertion order. Aliased values appear once
    /// per key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.keys
            .iter()
            .map(|(k, &i)| (k.as_str(), &self.values[i]))
    }

    /// Distinct values in registration order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.values.iter()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn split_keys(names: &str) -> Vec<&str> {
    names.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_share_one_value() {
        let mut reg = Registry::new();
        let idx = reg.insert("v verbose", 1).unwrap();
        assert_eq!(idx, 0);
        assert!(reg.contains("v"));
        assert!(reg.contains("verbose"));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.values().count(), 1);

        *reg.get_mut("v").unwrap() = 5;
        assert_eq!(reg.get("verbose"), Some(&5));
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut reg = Registry::new();
        reg.insert("zeta", 'z').unwrap();
        reg.insert("a  alpha", 'a').unwrap();
        let keys: Vec<&str> = reg.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "a", "alpha"]);
    }

    #[test]
    fn duplicate_keys_are_rejected_atomically() {
        let mut reg = Registry::new();
        reg.insert("o output", 1).unwrap();

        let err = reg.insert("x output", 2).unwrap_err();
        match err {
            ParseError::DuplicateKey { key } => assert_eq!(key, "output"),
            other => panic!("expected DuplicateKey, got: {other:?}"),
        }
        assert!(!reg.contains("x"));
        assert_eq!(reg.values().count(), 1);

        let err = reg.insert("y y", 3).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateKey { .. }));
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut reg: Registry<u8> = Registry::new();
        assert!(matches!(reg.insert("   ", 0), Err(ParseError::EmptyName)));
        assert!(reg.is_empty());
        assert_eq!(reg.get("anything"), None);
    }
}
