//! Read-only register map tree consumed by the exporter.
//!
//! Trees are loaded from JSON. Addresses, sizes and values are `u128` and may
//! be given either as JSON integers or as hex strings (`"0x1000"`, `"1000"`).

use crate::value::PropertyValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named property values of a node, by property name.
pub type PropertyValueMap = BTreeMap<String, PropertyValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Addrmap,
    Regfile,
    Mem,
    Reg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayInfo {
    pub dims: Vec<u64>,
    #[serde(with = "hex")]
    pub stride: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    #[serde(default, with = "hex")]
    pub value: u128,
    /// Human readable alias of the member.
    #[serde(default)]
    pub rdl_name: Option<String>,
    #[serde(default)]
    pub rdl_desc: Option<String>,
}

/// Field reset value. References to other signals/fields cannot be
/// evaluated statically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResetValue {
    Reference { r#ref: String },
    Constant(#[serde(with = "hex")] u128),
}

impl ResetValue {
    /// Constant reset value, or 0 for a reference.
    pub fn constant_or_zero(&self) -> u128 {
        match self {
            ResetValue::Constant(v) => *v,
            ResetValue::Reference { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldNode {
    pub inst_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    pub lsb: u32,
    pub msb: u32,
    #[serde(default)]
    pub reset: Option<ResetValue>,
    #[serde(default)]
    pub encode: Option<Vec<EnumMember>>,
    #[serde(default = "present")]
    pub ispresent: bool,
    #[serde(default)]
    pub properties: PropertyValueMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressableNode {
    pub kind: NodeKind,
    pub inst_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default, with = "hex")]
    pub offset: u128,
    #[serde(with = "hex")]
    pub size: u128,
    #[serde(default)]
    pub array: Option<ArrayInfo>,
    #[serde(default = "present")]
    pub ispresent: bool,
    #[serde(default)]
    pub children: Vec<AddressableNode>,
    #[serde(default)]
    pub fields: Vec<FieldNode>,
    #[serde(default)]
    pub properties: PropertyValueMap,
}

fn present() -> bool { true }

impl AddressableNode {
    /// The `name` property, falling back to the instance name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.inst_name)
    }

    pub fn is_reg(&self) -> bool { self.kind == NodeKind::Reg }
}

/// Text a documentation node exposes to the search indexer.
pub trait Documented {
    fn name(&self) -> Option<&str>;
    fn desc(&self) -> Option<&str>;
    fn is_field(&self) -> bool { false }
    fn encode(&self) -> Option<&[EnumMember]> { None }
}

impl Documented for AddressableNode {
    fn name(&self) -> Option<&str> { self.name.as_deref() }
    fn desc(&self) -> Option<&str> { self.desc.as_deref() }
}

impl Documented for FieldNode {
    fn name(&self) -> Option<&str> { self.name.as_deref() }
    fn desc(&self) -> Option<&str> { self.desc.as_deref() }
    fn is_field(&self) -> bool { true }
    fn encode(&self) -> Option<&[EnumMember]> { self.encode.as_deref() }
}

/// `u128` as a lowercase hex string without prefix. Deserializes from either
/// a JSON integer or a hex string with optional `0x`.
pub mod hex {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{v:x}"))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Str(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Int(v) => Ok(u128::from(v)),
            Raw::Str(s) => parse(&s).map_err(de::Error::custom),
        }
    }

    pub fn parse(s: &str) -> Result<u128, String> {
        let t = s.trim();
        let digits = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")).unwrap_or(t);
        u128::from_str_radix(&digits.replace('_', ""), 16)
            .map_err(|e| format!("invalid hex integer {s:?}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_register() {
        let json = r#"{
            "kind": "reg", "inst_name": "ctrl", "offset": "0x10", "size": 4,
            "fields": [
                {"inst_name": "en", "lsb": 0, "msb": 0, "reset": 1},
                {"inst_name": "mode", "lsb": 1, "msb": 2, "reset": {"ref": "top.other.f"},
                 "encode": [{"name": "IDLE", "value": 0}, {"name": "RUN", "value": "0x1", "rdl_desc": "Running"}]}
            ]
        }"#;
        let node: AddressableNode = serde_json::from_str(json).unwrap();
        assert!(node.is_reg());
        assert_eq!(node.offset, 0x10);
        assert_eq!(node.size, 4);
        assert!(node.ispresent);
        assert_eq!(node.display_name(), "ctrl");
        assert_eq!(node.fields[0].reset.as_ref().unwrap().constant_or_zero(), 1);
        assert_eq!(node.fields[1].reset.as_ref().unwrap().constant_or_zero(), 0);
        let encode = node.fields[1].encode().unwrap();
        assert_eq!(encode[1].value, 1);
        assert_eq!(encode[1].rdl_desc.as_deref(), Some("Running"));
    }

    #[test]
    fn hex_accepts_values_beyond_u64() {
        assert_eq!(hex::parse("0x1_0000_0000_0000_0000").unwrap(), 1u128 << 64);
        assert!(hex::parse("zz").is_err());
    }
}
