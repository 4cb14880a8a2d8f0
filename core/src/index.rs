use crate::location::{Location, LocationCode};
use crate::model::Documented;
use crate::tokenizer::{is_indexable, normalize_text, words};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Traversal-order id of a generated page.
pub type PageId = u32;

/// One place a word was seen: a page plus where on that page.
/// Serialized as `[page_id, location_code]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(PageId, LocationCode)", into = "(PageId, LocationCode)")]
pub struct Occurrence {
    pub page_id: PageId,
    pub location: LocationCode,
}

impl Occurrence {
    pub fn new(page_id: PageId, location: LocationCode) -> Self { Self { page_id, location } }
}

impl From<(PageId, LocationCode)> for Occurrence {
    fn from((page_id, location): (PageId, LocationCode)) -> Self { Self { page_id, location } }
}

impl From<Occurrence> for (PageId, LocationCode) {
    fn from(o: Occurrence) -> Self { (o.page_id, o.location) }
}

/// word -> set of occurrences. Grows by insertion only.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    words: HashMap<String, BTreeSet<Occurrence>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Index the description, name and (for fields) enum encoding text of a
    /// node. `field_idx` is the position of a field within its register and
    /// should be 0 for anything else.
    pub fn add_node<N: Documented + ?Sized>(&mut self, node: &N, page_id: PageId, field_idx: u32) {
        let is_field = node.is_field();

        if let Some(text) = node.desc().filter(|t| !t.is_empty()) {
            self.add_text(text, page_id, Location::description(is_field, field_idx).code());
        }
        if let Some(text) = node.name().filter(|t| !t.is_empty()) {
            self.add_text(text, page_id, Location::name(is_field, field_idx).code());
        }

        if !is_field {
            return;
        }
        for member in node.encode().unwrap_or_default() {
            let loc = Location::enum_name(field_idx).code();
            self.add_text(&member.name, page_id, loc);
            if let Some(alias) = member.rdl_name.as_deref().filter(|t| !t.is_empty()) {
                self.add_text(alias, page_id, loc);
            }
            if let Some(desc) = member.rdl_desc.as_deref().filter(|t| !t.is_empty()) {
                self.add_text(desc, page_id, Location::enum_description(field_idx).code());
            }
        }
    }

    /// Index every word of `text`, including the segments of snake_case
    /// identifiers.
    pub fn add_text(&mut self, text: &str, page_id: PageId, location: LocationCode) {
        let normalized = normalize_text(text);
        for word in words(&normalized) {
            self.add_word(word, page_id, location);
        }
    }

    /// Record one occurrence of `word`. Short words and stop words are
    /// discarded; re-adding an existing occurrence is a no-op.
    pub fn add_word(&mut self, word: &str, page_id: PageId, location: LocationCode) {
        if !is_indexable(word) {
            return;
        }
        let occurrence = Occurrence::new(page_id, location);
        match self.words.get_mut(word) {
            Some(set) => {
                set.insert(occurrence);
            }
            None => {
                self.words.insert(word.to_owned(), BTreeSet::from([occurrence]));
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<&BTreeSet<Occurrence>> { self.words.get(word) }

    pub fn contains(&self, word: &str) -> bool { self.words.contains_key(word) }

    /// Number of distinct words.
    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn words(&self) -> impl Iterator<Item = &str> { self.words.keys().map(String::as_str) }

    /// Union `other` into this index.
    pub fn merge(&mut self, other: InvertedIndex) {
        for (word, occurrences) in other.words {
            self.words.entry(word).or_default().extend(occurrences);
        }
    }

    /// All entries sorted by word.
    pub fn into_sorted(self) -> Vec<(String, BTreeSet<Occurrence>)> {
        let mut entries: Vec<_> = self.words.into_iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Log the words occurring in the most places.
    pub fn debug_stats(&self, top: usize) {
        let mut counts: Vec<(usize, &str)> = self.words.iter().map(|(w, o)| (o.len(), w.as_str())).collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        tracing::debug!(unique_words = counts.len(), "search index statistics");
        for (count, word) in counts.into_iter().take(top) {
            tracing::debug!(word, count, "frequent word");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnumMember, FieldNode};
    use std::collections::BTreeMap;

    fn field(desc: &str, encode: Vec<EnumMember>) -> FieldNode {
        FieldNode {
            inst_name: "mode".into(),
            name: Some("Operating mode".into()),
            desc: Some(desc.into()),
            lsb: 0,
            msb: 1,
            reset: None,
            encode: Some(encode),
            ispresent: true,
            properties: BTreeMap::new(),
        }
    }

    #[test]
    fn duplicate_occurrence_is_noop() {
        let mut idx = InvertedIndex::new();
        idx.add_word("status", 1, 0);
        idx.add_word("status", 1, 0);
        assert_eq!(idx.get("status").unwrap().len(), 1);
        idx.add_word("status", 1, 1);
        assert_eq!(idx.get("status").unwrap().len(), 2);
    }

    #[test]
    fn filtered_words_never_become_keys() {
        let mut idx = InvertedIndex::new();
        idx.add_text("It is the an of TX flag", 0, 0);
        assert!(!idx.contains("the"));
        assert!(!idx.contains("tx"));
        assert!(!idx.contains("is"));
        assert!(idx.contains("flag"));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn field_enum_text_uses_enum_locations() {
        let mut idx = InvertedIndex::new();
        let member = EnumMember {
            name: "TURBO".into(),
            value: 2,
            rdl_name: Some("Turbo boost".into()),
            rdl_desc: Some("Overclocked operation".into()),
        };
        idx.add_node(&field("Selects speed", vec![member]), 7, 3);

        let desc = Location::description(true, 3).code();
        let name = Location::name(true, 3).code();
        let enum_name = Location::enum_name(3).code();
        let enum_desc = Location::enum_description(3).code();

        assert!(idx.get("selects").unwrap().contains(&Occurrence::new(7, desc)));
        assert!(idx.get("operating").unwrap().contains(&Occurrence::new(7, name)));
        assert!(idx.get("turbo").unwrap().contains(&Occurrence::new(7, enum_name)));
        assert!(idx.get("boost").unwrap().contains(&Occurrence::new(7, enum_name)));
        assert!(idx.get("overclocked").unwrap().contains(&Occurrence::new(7, enum_desc)));
    }

    #[test]
    fn merge_is_set_union() {
        let mut a = InvertedIndex::new();
        a.add_word("clock", 0, 0);
        let mut b = InvertedIndex::new();
        b.add_word("clock", 0, 0);
        b.add_word("clock", 2, 1);
        b.add_word("reset", 2, 1);
        a.merge(b);
        assert_eq!(a.get("clock").unwrap().len(), 2);
        assert_eq!(a.len(), 2);
    }
}
