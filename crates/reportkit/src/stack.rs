//! Ordered, keyed storage for report entries.
//!
//! [`ReportStack`] behaves like an associative array: entries keep their
//! insertion order, a named key overwrites in place, and unkeyed entries are
//! appended under the next free numeric index.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::error::ReportError;

/// Key of a single entry in a [`ReportStack`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportKey {
    Index(u64),
    Name(String),
}

impl ReportKey {
    /// Interpret a caller-supplied key.
    ///
    /// Empty strings mean "no key". Canonical decimal integers (`"0"`,
    /// `"17"`, but not `"017"` or `"+1"`) become [`ReportKey::Index`].
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let canonical =
            raw == "0" || (!raw.starts_with('0') && raw.bytes().all(|b| b.is_ascii_digit()));
        if canonical && let Ok(index) = raw.parse::<u64>() {
            return Some(Self::Index(index));
        }
        Some(Self::Name(raw.to_string()))
    }

    /// Digit-only names become indices so `"5"` and `5` share a slot.
    fn normalized(self) -> Self {
        match self {
            Self::Name(name) => Self::parse(&name).unwrap_or(Self::Name(name)),
            index => index,
        }
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// One typed payload in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    #[serde(rename = "type")]
    pub content_type: String,
    pub payload: serde_json::Value,
}

/// Insertion-ordered collection of [`ReportEntry`] values.
///
/// Serializes as a JSON object whose keys appear in insertion order.
#[derive(Debug, Clone)]
pub struct ReportStack {
    entries: Vec<(ReportKey, ReportEntry)>,
    positions: HashMap<ReportKey, usize>,
    /// Next index for unkeyed entries; `None` once `u64::MAX` is taken.
    next_index: Option<u64>,
}

impl Default for ReportStack {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            next_index: Some(0),
        }
    }
}

impl ReportStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entry` under `key`, or under the next numeric index when
    /// `key` is `None`. Returns the key actually used.
    ///
    /// An existing entry with the same key is replaced and keeps its
    /// position. Unkeyed inserts fail with [`ReportError::IndexExhausted`]
    /// once the largest index has been used; nothing is overwritten.
    pub fn insert(
        &mut self,
        key: Option<ReportKey>,
        entry: ReportEntry,
    ) -> Result<ReportKey, ReportError> {
        let key = match key {
            Some(key) => key.normalized(),
            None => ReportKey::Index(self.next_index.ok_or(ReportError::IndexExhausted)?),
        };
        if let ReportKey::Index(i) = key
            && self.next_index.is_some_and(|next| i >= next)
        {
            self.next_index = i.checked_add(1);
        }

        let existing = self.positions.get(&key).copied();
        match existing {
            Some(pos) => self.entries[pos].1 = entry,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key.clone(), entry));
            }
        }
        Ok(key)
    }

    pub fn get(&self, key: &ReportKey) -> Option<&ReportEntry> {
        self.positions.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ReportKey, &ReportEntry)> {
        self.entries.iter().map(|(k, e)| (k, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Numbering restarts at index 0.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
        self.next_index = Some(0);
    }
}

impl Serialize for ReportStack {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(&key.to_string(), entry)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entry(payload: serde_json::Value) -> ReportEntry {
        ReportEntry {
            content_type: "data".into(),
            payload,
        }
    }

    #[test]
    fn key_parsing() {
        assert_eq!(ReportKey::parse(""), None);
        assert_eq!(ReportKey::parse("0"), Some(ReportKey::Index(0)));
        assert_eq!(ReportKey::parse("42"), Some(ReportKey::Index(42)));
        assert_eq!(ReportKey::parse("042"), Some(ReportKey::Name("042".into())));
        assert_eq!(ReportKey::parse("-1"), Some(ReportKey::Name("-1".into())));
        assert_eq!(ReportKey::parse("foo"), Some(ReportKey::Name("foo".into())));
    }

    #[test]
    fn unkeyed_entries_get_sequential_indices() {
        let mut stack = ReportStack::new();
        assert_eq!(stack.insert(None, entry(json!(1))).unwrap(), ReportKey::Index(0));
        assert_eq!(stack.insert(None, entry(json!(2))).unwrap(), ReportKey::Index(1));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn named_key_overwrites_in_place() {
        let mut stack = ReportStack::new();
        stack.insert(None, entry(json!("first"))).unwrap();
        let foo = ReportKey::Name("foo".into());
        stack.insert(Some(foo.clone()), entry(json!("old"))).unwrap();
        stack.insert(None, entry(json!("last"))).unwrap();
        stack.insert(Some(foo.clone()), entry(json!("new"))).unwrap();

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.get(&foo).unwrap().payload, json!("new"));
        let keys: Vec<String> = stack.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["0", "foo", "1"]);
    }

    #[test]
    fn explicit_index_advances_counter() {
        let mut stack = ReportStack::new();
        stack.insert(Some(ReportKey::Index(5)), entry(json!("five"))).unwrap();
        assert_eq!(stack.insert(None, entry(json!("six"))).unwrap(), ReportKey::Index(6));
        // Lower explicit index does not rewind the counter.
        stack.insert(Some(ReportKey::Index(2)), entry(json!("two"))).unwrap();
        assert_eq!(stack.insert(None, entry(json!("seven"))).unwrap(), ReportKey::Index(7));
    }

    #[test]
    fn clear_restarts_numbering() {
        let mut stack = ReportStack::new();
        stack.insert(None, entry(json!(1))).unwrap();
        stack.insert(None, entry(json!(2))).unwrap();
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.insert(None, entry(json!(3))).unwrap(), ReportKey::Index(0));
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut stack = ReportStack::new();
        stack.insert(Some(ReportKey::Name("z".into())), entry(json!(1))).unwrap();
        stack.insert(None, entry(json!(2))).unwrap();
        let text = serde_json::to_string(&stack).unwrap();
        assert_eq!(
            text,
            r#"{"z":{"type":"data","payload":1},"0":{"type":"data","payload":2}}"#
        );
    }

    #[test]
    fn largest_index_is_never_overwritten_by_append() {
        let mut stack = ReportStack::new();
        let max = ReportKey::parse("18446744073709551615").unwrap();
        assert_eq!(max, ReportKey::Index(u64::MAX));
        stack.insert(Some(max.clone()), entry(json!("keyed"))).unwrap();

        let err = stack.insert(None, entry(json!("unkeyed"))).unwrap_err();
        assert!(matches!(err, ReportError::IndexExhausted));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.get(&max).unwrap().payload, json!("keyed"));
    }

    #[test]
    fn last_free_index_is_used_once() {
        let mut stack = ReportStack::new();
        stack
            .insert(Some(ReportKey::Index(u64::MAX - 1)), entry(json!(1)))
            .unwrap();
        assert_eq!(
            stack.insert(None, entry(json!(2))).unwrap(),
            ReportKey::Index(u64::MAX)
        );
        assert!(stack.insert(None, entry(json!(3))).is_err());
        assert_eq!(stack.len(), 2);
        // Keyed inserts still work after the counter runs out.
        stack.insert(Some(ReportKey::Name("tail".into())), entry(json!(4))).unwrap();
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn digit_names_share_slot_with_indices() {
        let mut stack = ReportStack::new();
        stack.insert(Some(ReportKey::Index(5)), entry(json!("index"))).unwrap();
        let used = stack
            .insert(Some(ReportKey::Name("5".into())), entry(json!("name")))
            .unwrap();

        assert_eq!(used, ReportKey::Index(5));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.get(&ReportKey::Index(5)).unwrap().payload, json!("name"));
        assert_eq!(
            serde_json::to_string(&stack).unwrap(),
            r#"{"5":{"type":"data","payload":"name"}}"#
        );
    }
}
