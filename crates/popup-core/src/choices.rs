#![forbid(unsafe_code)]

//! List-or-map choice input for select, checkbox and radio dialogs.

/// Ordered key → label mapping.
///
/// Insertion order is display order. Re-inserting a key replaces its label
/// but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceMap {
    entries: Vec<(String, String)>,
}

impl ChoiceMap {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a choice, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = label,
            None => self.entries.push((key, label)),
        }
    }

    /// Label for a key.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, label)| label.as_str())
    }

    /// Whether the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, label)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, L: Into<String>> FromIterator<(K, L)> for ChoiceMap {
    fn from_iter<I: IntoIterator<Item = (K, L)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, label) in iter {
            map.insert(key, label);
        }
        map
    }
}

/// Choices as a caller supplies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choices {
    /// Each string is both key and label.
    List(Vec<String>),
    /// Explicit key → label pairs.
    Map(ChoiceMap),
}

impl Choices {
    /// Collapse to the uniform key → label form.
    ///
    /// A list keeps its order; a repeated entry stays at its first position.
    #[must_use]
    pub fn normalize(self) -> ChoiceMap {
        match self {
            Self::List(items) => items.into_iter().map(|s| (s.clone(), s)).collect(),
            Self::Map(map) => map,
        }
    }
}

impl From<Vec<String>> for Choices {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for Choices {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Choices {
    fn from(items: [&str; N]) -> Self {
        Self::List(items.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Choices {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::Map(pairs.into_iter().collect())
    }
}

impl From<ChoiceMap> for Choices {
    fn from(map: ChoiceMap) -> Self {
        Self::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn map_passes_through() {
        let map: ChoiceMap = [("x", "X"), ("y", "Y")].into_iter().collect();
        assert_eq!(Choices::Map(map.clone()).normalize(), map);
        assert_eq!(map.label("y"), Some("Y"));
        assert_eq!(map.label("z"), None);
    }

    #[test]
    fn repeated_list_entry_keeps_first_position() {
        let map = Choices::from(["b", "a", "b"]).normalize();
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn map_reinsert_replaces_label() {
        let mut map = ChoiceMap::new();
        map.insert("k", "one");
        map.insert("j", "two");
        map.insert("k", "three");
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![("k", "three"), ("j", "two")]);
    }

    proptest! {
        #[test]
        fn list_is_identity_pairs(items in proptest::collection::vec("[a-z0-9 ]{0,6}", 0..12)) {
            let from_list = Choices::List(items.clone()).normalize();
            let explicit: ChoiceMap = items.iter().map(|s| (s.as_str(), s.as_str())).collect();
            prop_assert_eq!(&from_list, &explicit);
            for (key, label) in from_list.iter() {
                prop_assert_eq!(key, label);
            }
        }
    }
}
