//! Grouping of indexed words by their 3 character prefix.

use crate::index::{InvertedIndex, Occurrence};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};

pub const PREFIX_LEN: usize = 3;

/// A word and every place it occurs. Serialized as
/// `[word, [[page_id, location_code], ...]]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, Vec<Occurrence>)")]
pub struct WordEntry {
    pub word: String,
    pub occurrences: Vec<Occurrence>,
}

impl From<(String, Vec<Occurrence>)> for WordEntry {
    fn from((word, occurrences): (String, Vec<Occurrence>)) -> Self { Self { word, occurrences } }
}

impl Serialize for WordEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(2)?;
        t.serialize_element(&self.word)?;
        t.serialize_element(&self.occurrences)?;
        t.end()
    }
}

/// All words sharing one prefix, sorted alphabetically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub prefix: String,
    pub entries: Vec<WordEntry>,
}

impl Bucket {
    pub fn word_count(&self) -> usize { self.entries.len() }
}

/// First `PREFIX_LEN` characters of `word` (the whole word if shorter).
pub fn prefix_of(word: &str) -> &str {
    match word.char_indices().nth(PREFIX_LEN) {
        Some((end, _)) => &word[..end],
        None => word,
    }
}

/// Partition the index into prefix buckets. Buckets come out ordered by
/// prefix and words within a bucket are in byte order.
pub fn bucketize(index: InvertedIndex) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    for (word, occurrences) in index.into_sorted() {
        let prefix = prefix_of(&word).to_owned();
        let entry = WordEntry { word, occurrences: occurrences.into_iter().collect() };
        if let Some(bucket) = buckets.last_mut().filter(|b| b.prefix == prefix) {
            bucket.entries.push(entry);
            continue;
        }
        buckets.push(Bucket { prefix, entries: vec![entry] });
    }
    buckets
}

/// Log the largest buckets.
pub fn debug_stats(buckets: &[Bucket], top: usize) {
    let mut counts: Vec<(usize, &str)> = buckets.iter().map(|b| (b.word_count(), b.prefix.as_str())).collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));
    tracing::debug!(prefix_buckets = counts.len(), "bucket statistics");
    for (count, prefix) in counts.into_iter().take(top) {
        tracing::debug!(prefix, count, "large bucket");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_counts_characters() {
        assert_eq!(prefix_of("status"), "sta");
        assert_eq!(prefix_of("żółw"), "żół");
        assert_eq!(prefix_of("ab"), "ab");
    }

    #[test]
    fn groups_sorted_words_by_prefix() {
        let mut idx = InvertedIndex::new();
        for (i, w) in ["status", "stage", "clock", "stall", "clear", "enable"].iter().enumerate() {
            idx.add_word(w, i as u32, 0);
        }
        let buckets = bucketize(idx);
        let prefixes: Vec<&str> = buckets.iter().map(|b| b.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["cle", "clo", "ena", "sta"]);
        let sta: Vec<&str> = buckets[3].entries.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(sta, vec!["stage", "stall", "status"]);
    }

    #[test]
    fn word_entry_json_shape() {
        let e = WordEntry { word: "clock".into(), occurrences: vec![Occurrence::new(0, 1), Occurrence::new(4, 10)] };
        assert_eq!(serde_json::to_string(&e).unwrap(), r#"["clock",[[0,1],[4,10]]]"#);
        let back: WordEntry = serde_json::from_str(r#"["clock",[[0,1],[4,10]]]"#).unwrap();
        assert_eq!(back, e);
    }
}
