//! Search index builder for register map documentation.
//!
//! The register map tree is walked once ([`walk`]), assigning page ids and
//! feeding node text to an [`InvertedIndex`]. The finished index is grouped
//! into prefix buckets ([`bucket`]) and written as a set of small JSON shards
//! plus a manifest ([`shard`]) that a browser can query without loading the
//! whole index.

pub mod bucket;
pub mod export;
pub mod index;
pub mod location;
pub mod lookup;
pub mod model;
pub mod persist;
pub mod ral;
pub mod shard;
pub mod tokenizer;
pub mod value;
pub mod walk;

pub use export::{export, ExportOptions, ExportSummary};
pub use index::{InvertedIndex, Occurrence, PageId};
pub use location::{Location, LocationCode};
pub use model::{AddressableNode, Documented, EnumMember, FieldNode, NodeKind};
pub use shard::{ShardWriter, WORDS_PER_FILE_THRESHOLD};
pub use value::PropertyValue;
