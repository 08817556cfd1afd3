use anyhow::{anyhow, bail, Result};
use regex::Regex;

#[derive(Debug, Clone)]
struct Entry<V> {
    pattern: String,
    regex: Result<Regex, regex::Error>,
    value: V,
}

/// Insertion-ordered map from a category label (or a regex pattern over the
/// full key) to a visual attribute value. Built once per chart and read-only
/// during drawing; insertion order is the tie-break for fuzzy resolution.
/// Patterns are compiled when inserted; a pattern that fails to compile only
/// surfaces its error once fuzzy resolution actually needs it.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap<V> {
    entries: Vec<Entry<V>>,
}

impl<V> AttributeMap<V> {
    pub fn new() -> Self {
        AttributeMap {
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces an entry; a replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let pattern = key.into();
        match self.entries.iter_mut().find(|e| e.pattern == pattern) {
            Some(entry) => entry.value = value,
            None => {
                let regex = Regex::new(&pattern);
                self.entries.push(Entry {
                    pattern,
                    regex,
                    value,
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|e| e.pattern == key)
            .map(|e| &e.value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Resolve the attribute for a bar identified by `key`, with `top_label`
    /// supplying outer context (the subplot's own category value).
    ///
    /// Exact match on the innermost label wins. Otherwise every map key is
    /// treated as a regex and scored by the total character length of its
    /// matches across every label of (top_label, key...); the best score
    /// wins, ties going to the first-registered entry. With no matches at
    /// all, every score is zero and the first entry wins; callers wanting a
    /// deterministic default should register a catch-all pattern.
    pub fn resolve(&self, top_label: &str, key: &[String]) -> Result<&V> {
        if self.entries.is_empty() {
            bail!("Cannot resolve an attribute from an empty mapping");
        }
        let innermost = key.last().map(String::as_str).unwrap_or_default();
        if let Some(value) = self.get(innermost) {
            return Ok(value);
        }

        let mut best: Option<(usize, &V)> = None;
        for entry in &self.entries {
            let regex = entry.regex.as_ref().map_err(|err| {
                anyhow!("Invalid attribute pattern '{}': {}", entry.pattern, err)
            })?;
            let score: usize = std::iter::once(top_label)
                .chain(key.iter().map(String::as_str))
                .flat_map(|label| regex.find_iter(label))
                .map(|m| m.len())
                .sum();
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, &entry.value));
            }
        }
        Ok(best
            .map(|(_, value)| value)
            .unwrap_or(&self.entries[0].value))
    }
}

impl<V> FromIterator<(String, V)> for AttributeMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = AttributeMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'de, V: serde::Deserialize<'de>> serde::Deserialize<'de> for AttributeMap<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // A sequence of pairs keeps insertion order, which a JSON object
        // would not guarantee.
        let entries = Vec::<(String, V)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn map(entries: &[(&str, &str)]) -> AttributeMap<String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_mapping_fails() {
        let map: AttributeMap<String> = AttributeMap::new();
        assert!(map.resolve("", &key(&["foo"])).is_err());
    }

    #[test]
    fn test_exact_innermost_match_wins() {
        let map = map(&[("foo.*", "red"), ("foobar", "blue")]);
        assert_eq!(map.resolve("", &key(&["foobar"])).unwrap(), "blue");
    }

    #[test]
    fn test_longest_total_match_wins() {
        // "foo.*" swallows the whole label, "bar" only three characters.
        let map = map(&[("bar", "blue"), ("foo.*", "red")]);
        assert_eq!(map.resolve("", &key(&["foobarbaz"])).unwrap(), "red");
    }

    #[test]
    fn test_tie_resolves_to_first_registered() {
        let map = map(&[("aaa", "first"), ("bbb", "second")]);
        assert_eq!(map.resolve("", &key(&["aaabbb"])).unwrap(), "first");
    }

    #[test]
    fn test_no_match_falls_back_to_first_entry() {
        let map = map(&[("xyz", "fallback"), ("uvw", "other")]);
        assert_eq!(map.resolve("", &key(&["nothing"])).unwrap(), "fallback");
    }

    #[test]
    fn test_top_label_contributes_to_score() {
        let map = map(&[("mouse", "grey"), ("cat", "orange")]);
        assert_eq!(
            map.resolve("mouse-study", &key(&["run-1"])).unwrap(),
            "grey"
        );
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let map = map(&[("(", "broken")]);
        assert!(map.resolve("", &key(&["anything"])).is_err());
    }

    #[test]
    fn test_exact_match_skips_broken_patterns() {
        let map = map(&[("(", "broken"), ("cnn", "green")]);
        assert_eq!(map.resolve("", &key(&["cnn"])).unwrap(), "green");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = map(&[("a", "1"), ("b", "2")]);
        map.insert("a", "3".to_string());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a").unwrap(), "3");
    }
}
