use serde::Serialize;
use std::collections::BTreeMap;

/// Custom properties attached to a tile or tileset.
///
/// Values are kept as the text Tiled wrote; the typed getters parse on access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    /// Empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, value: String) {
        self.0.insert(name, value);
    }

    /// Raw string value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value parsed as a Tiled bool (`true` / `false`).
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.parse().ok()
    }

    /// Value parsed as an integer.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.parse().ok()
    }

    /// Value parsed as a float.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name)?.parse().ok()
    }

    /// True when `name` is set to exactly `value`.
    pub fn matches(&self, name: &str, value: &str) -> bool {
        self.get(name) == Some(value)
    }

    /// Iterate `(name, value)` pairs, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no property is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_parse_on_access() {
        let mut props = Properties::new();
        props.insert("solid".into(), "true".into());
        props.insert("damage".into(), "12".into());
        props.insert("speed".into(), "1.5".into());
        props.insert("ground_type".into(), "stone".into());

        assert_eq!(props.get_bool("solid"), Some(true));
        assert_eq!(props.get_i64("damage"), Some(12));
        assert_eq!(props.get_f32("speed"), Some(1.5));
        assert_eq!(props.get_i64("ground_type"), None);
        assert!(props.matches("ground_type", "stone"));
        assert!(!props.matches("ground_type", "grass"));
        assert_eq!(props.len(), 4);
    }
}
