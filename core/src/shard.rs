//! Partitioning of prefix buckets into search shard files.
//!
//! Buckets are ordered by a short hash of their prefix rather than by the
//! prefix itself, which spreads alphabetically dense regions across files.
//! Shards are cut whenever the running word count reaches the threshold, and
//! the short hash of the last prefix in each shard is recorded in the
//! manifest. A client hashes the prefix of its search term, picks the first
//! manifest entry `>=` that hash and fetches the shard at that position.

use crate::bucket::Bucket;
use crate::persist::{save_manifest, save_shard, OutputPaths};
use anyhow::Result;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

/// Rough number of words per shard file.
pub const WORDS_PER_FILE_THRESHOLD: usize = 500;

const SHORT_HASH_MASK: u32 = 0x0fff_ffff;

/// Last 7 hex digits (28 bits) of the SHA-1 of `prefix`. Small enough to
/// stay positive in a signed 32-bit integer.
pub fn short_hash(prefix: &str) -> u32 {
    let digest = Sha1::digest(prefix.as_bytes());
    let tail = [digest[16], digest[17], digest[18], digest[19]];
    u32::from_be_bytes(tail) & SHORT_HASH_MASK
}

/// Buckets written together into one `bkt-<n>.json` file. Serialized as a
/// JSON object keyed by prefix, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shard {
    pub buckets: Vec<Bucket>,
    /// Short hash of the last prefix added.
    pub boundary_hash: u32,
}

impl Shard {
    pub fn word_count(&self) -> usize { self.buckets.iter().map(Bucket::word_count).sum() }
}

impl Serialize for Shard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.prefix, &bucket.entries)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardPlan {
    pub shards: Vec<Shard>,
}

impl ShardPlan {
    /// Boundary hashes in shard order. Ascending by construction.
    pub fn manifest(&self) -> Vec<u32> { self.shards.iter().map(|s| s.boundary_hash).collect() }

    pub fn word_count(&self) -> usize { self.shards.iter().map(Shard::word_count).sum() }
}

/// Assign buckets to shards. Prefixes whose short hashes collide always land
/// in the same shard, so a shard may overshoot `threshold`.
pub fn plan_shards(buckets: Vec<Bucket>, threshold: usize) -> ShardPlan {
    let mut by_hash: BTreeMap<u32, Vec<Bucket>> = BTreeMap::new();
    for bucket in buckets {
        by_hash.entry(short_hash(&bucket.prefix)).or_default().push(bucket);
    }
    plan_hashed(by_hash, threshold)
}

/// Cut hash groups, already in ascending hash order, into shards. A group is
/// never split.
pub fn plan_hashed(by_hash: BTreeMap<u32, Vec<Bucket>>, threshold: usize) -> ShardPlan {
    let mut plan = ShardPlan::default();
    let mut pending = Shard::default();
    let mut word_count = 0;
    for (hash, group) in by_hash {
        word_count += group.iter().map(Bucket::word_count).sum::<usize>();
        pending.buckets.extend(group);
        pending.boundary_hash = hash;

        if word_count >= threshold {
            plan.shards.push(std::mem::take(&mut pending));
            word_count = 0;
        }
    }
    if !pending.buckets.is_empty() {
        plan.shards.push(pending);
    }
    plan
}

/// Writes the shard files and the manifest of a search index.
pub struct ShardWriter {
    threshold: usize,
}

impl ShardWriter {
    pub fn new(threshold: usize) -> Self { Self { threshold } }

    /// Plan and write every shard, then the manifest. Any I/O error aborts
    /// the write. Returns the plan that was written.
    pub fn write(&self, buckets: Vec<Bucket>, paths: &OutputPaths) -> Result<ShardPlan> {
        let plan = plan_shards(buckets, self.threshold);
        for (n, shard) in plan.shards.iter().enumerate() {
            save_shard(paths, n, shard)?;
            tracing::debug!(shard = n, buckets = shard.buckets.len(), words = shard.word_count(), boundary = shard.boundary_hash, "wrote search shard");
        }
        save_manifest(paths, &plan.manifest())?;
        Ok(plan)
    }
}
