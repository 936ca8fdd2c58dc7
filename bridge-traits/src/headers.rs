//! Header Container Abstraction
//!
//! Outgoing requests may carry their headers in different container shapes
//! depending on where they were built: a structured map, or an ordered list
//! of pairs as produced by older call sites. [`HeaderBag`] hides that
//! difference so interceptors and classifiers only ever see `get`/`set`.
//!
//! Header names are compared case-insensitively in every implementation.

use std::collections::HashMap;

/// Minimal mutable view over a set of HTTP headers.
///
/// # Example
///
/// ```
/// use bridge_traits::headers::HeaderBag;
/// use std::collections::HashMap;
///
/// let mut headers: HashMap<String, String> = HashMap::new();
/// headers.set("Accept", "application/json");
/// assert_eq!(HeaderBag::get(&headers, "accept"), Some("application/json"));
/// ```
pub trait HeaderBag {
    /// Look up a header value, ignoring name case
    fn get(&self, name: &str) -> Option<&str>;

    /// Insert or replace a header, dropping any differently-cased duplicates
    fn set(&mut self, name: &str, value: &str);

    /// Remove a header, returning its previous value
    fn remove(&mut self, name: &str) -> Option<String>;

    /// Check whether a header is present
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl HeaderBag for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn set(&mut self, name: &str, value: &str) {
        self.retain(|key, _| !key.eq_ignore_ascii_case(name));
        self.insert(name.to_string(), value.to_string());
    }

    fn remove(&mut self, name: &str) -> Option<String> {
        let key = self
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned()?;
        HashMap::remove(self, &key)
    }
}

/// Legacy list-of-pairs shape.
impl HeaderBag for Vec<(String, String)> {
    fn get(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn set(&mut self, name: &str, value: &str) {
        self.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.push((name.to_string(), value.to_string()));
    }

    fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        let (_, value) = Vec::remove(self, index);
        self.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(bag: &mut dyn HeaderBag) {
        bag.set("Authorization", "Basic abc");
        assert_eq!(bag.get("authorization"), Some("Basic abc"));

        bag.set("AUTHORIZATION", "Basic xyz");
        assert_eq!(bag.get("Authorization"), Some("Basic xyz"));

        assert_eq!(bag.remove("authorization"), Some("Basic xyz".to_string()));
        assert!(!bag.contains("Authorization"));
        assert_eq!(bag.remove("authorization"), None);
    }

    #[test]
    fn test_map_header_bag() {
        let mut headers: HashMap<String, String> = HashMap::new();
        exercise(&mut headers);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_legacy_pair_header_bag() {
        let mut headers: Vec<(String, String)> = vec![("Accept".into(), "text/html".into())];
        exercise(&mut headers);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("accept"), Some("text/html"));
    }

    #[test]
    fn test_set_replaces_case_variants() {
        let mut headers: Vec<(String, String)> = vec![
            ("x-token".into(), "a".into()),
            ("X-Token".into(), "b".into()),
        ];
        headers.set("X-TOKEN", "c");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-token"), Some("c"));
    }
}
