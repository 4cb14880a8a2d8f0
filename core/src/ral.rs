//! Flattened node table consumed by the client-side page scripts.

use crate::index::PageId;
use serde::{Serialize, Serializer};

/// Integer written as a lowercase hex string so clients can load it as a
/// `BigInt` without losing precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigHex(pub u128);

impl Serialize for BigHex {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{:x}", self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldDisplay {
    /// Hexadecimal
    #[serde(rename = "H")]
    Hex,
    /// Enumerated
    #[serde(rename = "E")]
    Enum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RalField {
    pub name: String,
    pub lsb: u32,
    pub msb: u32,
    pub reset: BigHex,
    pub disp: FieldDisplay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RalEntry {
    pub parent: Option<PageId>,
    pub children: Vec<PageId>,
    pub name: String,
    pub offset: BigHex,
    pub size: BigHex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dims: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stride: Option<BigHex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idxs: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<RalField>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub title: String,
}

/// Everything written to `js/data.js`. `entries` is indexed by page id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RalData {
    pub entries: Vec<RalEntry>,
    pub root_ids: Vec<PageId>,
    pub page_info: PageInfo,
}
