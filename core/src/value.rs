//! Property values attached to register map nodes and their display form.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("null is not a property value")]
    Null,
    #[error("unsupported number {0}: only non-negative integers are allowed")]
    Number(String),
    #[error("unrecognized property value object with keys [{0}]")]
    Object(String),
    #[error("malformed {kind} value: {reason}")]
    Malformed { kind: &'static str, reason: String },
}

/// Closed set of property value kinds.
///
/// JSON encoding:
///
/// | kind               | JSON                                                    |
/// |--------------------|---------------------------------------------------------|
/// | integer            | `16`                                                    |
/// | boolean            | `true`                                                  |
/// | text               | `"text"`                                                |
/// | ordered list       | `[..]`                                                  |
/// | enum value         | `{"enum": {"type": "T", "member": "m"}}` (`type` optional) |
/// | struct value       | `{"struct": {"type": "T", "members": [["k", v], ..]}}`  |
/// | node reference     | `{"ref": "top.blk.reg"}`                                |
/// | property reference | `{"prop_ref": {"node": "top.blk.reg", "name": "intr"}}` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum PropertyValue {
    Integer(u64),
    Boolean(bool),
    Text(String),
    List(Vec<PropertyValue>),
    /// Builtin enums have no type name.
    EnumValue { type_name: Option<String>, member: String },
    Struct { type_name: String, members: Vec<(String, PropertyValue)> },
    NodeRef(String),
    PropertyRef { node: String, property: String },
}

impl PropertyValue {
    /// Display form of the value. References are rendered relative to
    /// `owner_path`, the hierarchical path of the node owning the property.
    pub fn stringify(&self, owner_path: &str) -> String {
        match self {
            PropertyValue::Integer(v) => v.to_string(),
            PropertyValue::Boolean(b) => b.to_string(),
            PropertyValue::Text(s) => format!("\"{s}\""),
            PropertyValue::List(items) => {
                let elements: Vec<String> = items.iter().map(|v| v.stringify(owner_path)).collect();
                format!("[{}]", elements.join(", "))
            }
            PropertyValue::EnumValue { type_name: Some(t), member } => format!("{t}::{member}"),
            PropertyValue::EnumValue { type_name: None, member } => member.clone(),
            PropertyValue::Struct { type_name, members } => {
                let elements: Vec<String> = members
                    .iter()
                    .map(|(k, v)| format!("{k}:{}", v.stringify(owner_path)))
                    .collect();
                format!("{type_name}'{{{}}}", elements.join(", "))
            }
            PropertyValue::NodeRef(path) => relative_path(path, owner_path),
            PropertyValue::PropertyRef { node, property } => {
                format!("{}->{property}", relative_path(node, owner_path))
            }
        }
    }
}

/// Path of `target` as seen from `owner`: one `^` per level up to the common
/// ancestor, then the remaining segments of `target`.
pub fn relative_path(target: &str, owner: &str) -> String {
    let t: Vec<&str> = target.split('.').collect();
    let o: Vec<&str> = owner.split('.').collect();
    let common = t.iter().zip(&o).take_while(|(a, b)| a == b).count();
    let ups = std::iter::repeat("^").take(o.len() - common);
    ups.chain(t[common..].iter().copied()).collect::<Vec<_>>().join(".")
}

fn malformed(kind: &'static str, reason: impl Into<String>) -> ValueError {
    ValueError::Malformed { kind, reason: reason.into() }
}

fn str_field(obj: &serde_json::Map<String, Value>, key: &str, kind: &'static str) -> Result<String, ValueError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(malformed(kind, format!("missing string \"{key}\""))),
    }
}

impl TryFrom<Value> for PropertyValue {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Err(ValueError::Null),
            Value::Bool(b) => Ok(PropertyValue::Boolean(b)),
            Value::Number(n) => n.as_u64().map(PropertyValue::Integer).ok_or_else(|| ValueError::Number(n.to_string())),
            Value::String(s) => Ok(PropertyValue::Text(s)),
            Value::Array(items) => Ok(PropertyValue::List(
                items.into_iter().map(PropertyValue::try_from).collect::<Result<_, _>>()?,
            )),
            Value::Object(mut obj) => {
                if obj.len() != 1 {
                    return Err(ValueError::Object(obj.keys().cloned().collect::<Vec<_>>().join(", ")));
                }
                let (key, inner) = obj.iter_mut().next().map(|(k, v)| (k.clone(), v.take())).ok_or(ValueError::Null)?;
                match (key.as_str(), inner) {
                    ("ref", Value::String(path)) => Ok(PropertyValue::NodeRef(path)),
                    ("ref", _) => Err(malformed("ref", "expected a path string")),
                    ("enum", Value::Object(e)) => Ok(PropertyValue::EnumValue {
                        type_name: e.get("type").and_then(Value::as_str).map(str::to_owned),
                        member: str_field(&e, "member", "enum")?,
                    }),
                    ("prop_ref", Value::Object(p)) => Ok(PropertyValue::PropertyRef {
                        node: str_field(&p, "node", "prop_ref")?,
                        property: str_field(&p, "name", "prop_ref")?,
                    }),
                    ("struct", Value::Object(mut s)) => {
                        let type_name = str_field(&s, "type", "struct")?;
                        let members = match s.remove("members") {
                            Some(Value::Array(pairs)) => pairs
                                .into_iter()
                                .map(|pair| match pair {
                                    Value::Array(mut kv) if kv.len() == 2 => {
                                        let v = kv.pop().unwrap_or(Value::Null);
                                        match kv.pop() {
                                            Some(Value::String(k)) => Ok((k, PropertyValue::try_from(v)?)),
                                            _ => Err(malformed("struct", "member name must be a string")),
                                        }
                                    }
                                    _ => Err(malformed("struct", "members must be [name, value] pairs")),
                                })
                                .collect::<Result<_, _>>()?,
                            None => Vec::new(),
                            Some(_) => return Err(malformed("struct", "members must be an array")),
                        };
                        Ok(PropertyValue::Struct { type_name, members })
                    }
                    (other, _) => Err(ValueError::Object(other.to_owned())),
                }
            }
        }
    }
}

impl From<PropertyValue> for Value {
    fn from(v: PropertyValue) -> Self {
        use serde_json::json;
        match v {
            PropertyValue::Integer(i) => json!(i),
            PropertyValue::Boolean(b) => json!(b),
            PropertyValue::Text(s) => json!(s),
            PropertyValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            PropertyValue::EnumValue { type_name: Some(t), member } => json!({"enum": {"type": t, "member": member}}),
            PropertyValue::EnumValue { type_name: None, member } => json!({"enum": {"member": member}}),
            PropertyValue::Struct { type_name, members } => {
                let pairs: Vec<Value> = members.into_iter().map(|(k, v)| json!([k, Value::from(v)])).collect();
                json!({"struct": {"type": type_name, "members": pairs}})
            }
            PropertyValue::NodeRef(path) => json!({"ref": path}),
            PropertyValue::PropertyRef { node, property } => json!({"prop_ref": {"node": node, "name": property}}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> PropertyValue { PropertyValue::try_from(v).unwrap() }

    #[test]
    fn scalars() {
        assert_eq!(parse(json!(42)).stringify("top"), "42");
        assert_eq!(parse(json!(true)).stringify("top"), "true");
        assert_eq!(parse(json!("hi")).stringify("top"), "\"hi\"");
        assert_eq!(parse(json!([1, false, "x"])).stringify("top"), "[1, false, \"x\"]");
    }

    #[test]
    fn enums_and_structs() {
        assert_eq!(parse(json!({"enum": {"member": "rw"}})).stringify("top"), "rw");
        assert_eq!(parse(json!({"enum": {"type": "mode_e", "member": "FAST"}})).stringify("top"), "mode_e::FAST");
        let s = parse(json!({"struct": {"type": "cfg_t", "members": [["width", 8], ["signed", false]]}}));
        assert_eq!(s.stringify("top"), "cfg_t'{width:8, signed:false}");
    }

    #[test]
    fn references_are_relative_to_owner() {
        let r = parse(json!({"ref": "top.blk.status"}));
        assert_eq!(r.stringify("top.blk.ctrl.en"), "^.^.status");
        let p = parse(json!({"prop_ref": {"node": "top.irq.ev", "name": "intr"}}));
        assert_eq!(p.stringify("top.blk.ctrl"), "^.^.irq.ev->intr");
        assert_eq!(relative_path("top.a.b", "top"), "a.b");
    }

    #[test]
    fn rejects_unrepresentable_values() {
        assert_eq!(PropertyValue::try_from(json!(null)), Err(ValueError::Null));
        assert!(matches!(PropertyValue::try_from(json!(1.5)), Err(ValueError::Number(_))));
        assert!(matches!(PropertyValue::try_from(json!(-3)), Err(ValueError::Number(_))));
        assert!(matches!(PropertyValue::try_from(json!({"blob": 1})), Err(ValueError::Object(_))));
        assert!(matches!(PropertyValue::try_from(json!({"ref": 3})), Err(ValueError::Malformed { .. })));
        assert!(serde_json::from_str::<PropertyValue>("[1, null]").is_err());
    }

    #[test]
    fn json_shape_survives_serialization() {
        let v = parse(json!({"struct": {"type": "t", "members": [["a", {"ref": "x.y"}]]}}));
        let back: PropertyValue = serde_json::from_value(Value::from(v.clone())).unwrap();
        assert_eq!(back, v);
    }
}
