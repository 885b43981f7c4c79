// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! String collations
//!
//! A [`Collation`] decides how names and string values compare, test equal
//! and hash. Table names, column names, parameter names, keywords and string
//! values all go through the same case-insensitive default.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hasher;
use std::sync::{Arc, LazyLock};

use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;

/// Comparison, equality and hashing strategy for strings
///
/// `hash` must agree with `equals`: two strings the collation considers
/// equal must hash to the same value.
pub trait Collation: Send + Sync + fmt::Debug {
    /// Collation name
    fn name(&self) -> &str;

    /// Total order over strings
    fn compare(&self, left: &str, right: &str) -> Ordering;

    /// Equality consistent with [`Collation::compare`]
    fn equals(&self, left: &str, right: &str) -> bool {
        self.compare(left, right) == Ordering::Equal
    }

    /// Hash consistent with [`Collation::equals`]
    fn hash(&self, value: &str) -> u64;
}

/// Case-insensitive, culture-invariant collation
///
/// Characters are compared by their Unicode lowercase mapping, with no
/// locale-specific rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl Collation for CaseInsensitive {
    fn name(&self) -> &str {
        "SQL_Latin1_General_CP1_CI_AS"
    }

    fn compare(&self, left: &str, right: &str) -> Ordering {
        left.chars()
            .flat_map(char::to_lowercase)
            .cmp(right.chars().flat_map(char::to_lowercase))
    }

    fn equals(&self, left: &str, right: &str) -> bool {
        if left.is_ascii() && right.is_ascii() {
            return left.eq_ignore_ascii_case(right);
        }
        self.compare(left, right) == Ordering::Equal
    }

    fn hash(&self, value: &str) -> u64 {
        let mut hasher = FxHasher::default();
        for c in value.chars().flat_map(char::to_lowercase) {
            hasher.write_u32(c as u32);
        }
        hasher.finish()
    }
}

static DEFAULT_COLLATION: LazyLock<Arc<dyn Collation>> =
    LazyLock::new(|| Arc::new(CaseInsensitive));

/// The collation used wherever no other one is configured
pub fn default_collation() -> Arc<dyn Collation> {
    Arc::clone(&DEFAULT_COLLATION)
}

/// Map keyed by strings under a collation
///
/// Keys keep their original spelling; lookups match any spelling the
/// collation considers equal.
pub struct CollatedMap<V> {
    collation: Arc<dyn Collation>,
    buckets: FxHashMap<u64, SmallVec<[(String, V); 1]>>,
    len: usize,
}

impl<V> CollatedMap<V> {
    /// Create an empty map under the default collation
    pub fn new() -> Self {
        Self::with_collation(default_collation())
    }

    /// Create an empty map under the given collation
    pub fn with_collation(collation: Arc<dyn Collation>) -> Self {
        Self {
            collation,
            buckets: FxHashMap::default(),
            len: 0,
        }
    }

    /// The collation keys are compared with
    pub fn collation(&self) -> &Arc<dyn Collation> {
        &self.collation
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Look up an entry, returning the stored key spelling with the value
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        let bucket = self.buckets.get(&self.collation.hash(key))?;
        bucket
            .iter()
            .find(|(stored, _)| self.collation.equals(stored, key))
            .map(|(stored, value)| (stored.as_str(), value))
    }

    /// Look up a value by key for mutation
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let collation = &self.collation;
        let bucket = self.buckets.get_mut(&collation.hash(key))?;
        bucket
            .iter_mut()
            .find(|(stored, _)| collation.equals(stored, key))
            .map(|(_, value)| value)
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get_key_value(key).is_some()
    }

    /// Insert a value, returning the previous one for an equal key
    ///
    /// The first spelling of a key is kept when a value is replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let collation = &self.collation;
        let bucket = self.buckets.entry(collation.hash(&key)).or_default();
        if let Some((_, existing)) = bucket
            .iter_mut()
            .find(|(stored, _)| collation.equals(stored, &key))
        {
            return Some(std::mem::replace(existing, value));
        }
        bucket.push((key, value));
        self.len += 1;
        None
    }

    /// Remove an entry, returning its value
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let hash = self.collation.hash(key);
        let bucket = self.buckets.get_mut(&hash)?;
        let index = bucket
            .iter()
            .position(|(stored, _)| self.collation.equals(stored, key))?;
        let (_, value) = bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(&hash);
        }
        self.len -= 1;
        Some(value)
    }

    /// Iterate over entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.iter().map(|(key, value)| (key.as_str(), value)))
    }
}

impl<V> Default for CollatedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for CollatedMap<V> {
    fn clone(&self) -> Self {
        Self {
            collation: Arc::clone(&self.collation),
            buckets: self.buckets.clone(),
            len: self.len,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for CollatedMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for CollatedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_compare() {
        let c = CaseInsensitive;
        assert_eq!(c.compare("abc", "ABC"), Ordering::Equal);
        assert_eq!(c.compare("abc", "ABD"), Ordering::Less);
        assert_eq!(c.compare("b", "A"), Ordering::Greater);
        assert!(c.equals("Systypes", "SYSTYPES"));
        assert!(c.equals("Ärger", "äRGER"));
        assert!(!c.equals("abc", "abcd"));
    }

    #[test]
    fn test_hash_agrees_with_equality() {
        let c = CaseInsensitive;
        assert_eq!(c.hash("MyTable"), c.hash("mytable"));
        assert_eq!(c.hash("ÄRGER"), c.hash("ärger"));
    }

    #[test]
    fn test_collated_map_lookup() {
        let mut map = CollatedMap::new();
        assert!(map.insert("Users", 1).is_none());
        assert_eq!(map.get("users"), Some(&1));
        assert_eq!(map.get("USERS"), Some(&1));
        assert_eq!(map.get_key_value("uSeRs").map(|(k, _)| k), Some("Users"));
        assert!(map.get("user").is_none());
    }

    #[test]
    fn test_collated_map_replace_keeps_first_spelling() {
        let mut map = CollatedMap::new();
        map.insert("Name", 1);
        assert_eq!(map.insert("NAME", 2), Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_key_value("name"), Some(("Name", &2)));
    }

    #[test]
    fn test_collated_map_remove() {
        let mut map: CollatedMap<i32> = [("a", 1), ("B", 2)].into_iter().collect();
        assert_eq!(map.remove("b"), Some(2));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key("B"));
        if let Some(v) = map.get_mut("A") {
            *v = 10;
        }
        assert_eq!(map.get("a"), Some(&10));
    }
}
