//! Reads a written search index the way the browser does: one manifest, then
//! only the shard that can hold the query's prefix.

use crate::bucket::prefix_of;
use crate::index::Occurrence;
use crate::persist::{load_manifest, load_shard, OutputPaths};
use crate::shard::short_hash;
use crate::tokenizer::{is_indexable, normalize_text};
use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub word: String,
    pub occurrences: Vec<Occurrence>,
}

/// Shard that holds `prefix`, if any: the first boundary hash `>=` the
/// prefix's short hash.
pub fn shard_for_prefix(manifest: &[u32], prefix: &str) -> Option<usize> {
    let hash = short_hash(prefix);
    let n = manifest.partition_point(|&boundary| boundary < hash);
    (n < manifest.len()).then_some(n)
}

/// Every indexed word starting with one of the query's words. Query words
/// that could never be indexed are ignored.
pub fn lookup(paths: &OutputPaths, query: &str) -> Result<Vec<SearchHit>> {
    let manifest = load_manifest(paths)?;
    let normalized = normalize_text(query);
    let mut hits = Vec::new();

    for term in normalized.split_whitespace().filter(|t| is_indexable(t)) {
        let prefix = prefix_of(term);
        let Some(n) = shard_for_prefix(&manifest, prefix) else {
            continue;
        };
        let mut shard = load_shard(paths, n)?;
        let Some(entries) = shard.remove(prefix) else {
            continue;
        };
        tracing::debug!(term, shard = n, candidates = entries.len(), "scanning bucket");
        hits.extend(
            entries
                .into_iter()
                .filter(|e| e.word.starts_with(term))
                .map(|e| SearchHit { word: e.word, occurrences: e.occurrences }),
        );
    }
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_boundary_not_below_hash() {
        let h = short_hash("abc");
        assert_eq!(shard_for_prefix(&[h - 1, h, h + 1], "abc"), Some(1));
        assert_eq!(shard_for_prefix(&[h + 5], "abc"), Some(0));
        assert_eq!(shard_for_prefix(&[h - 1], "abc"), None);
        assert_eq!(shard_for_prefix(&[], "abc"), None);
    }
}
