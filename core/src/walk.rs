//! Depth-first numbering of the register map tree.
//!
//! Every visited node gets the next page id in pre-order. While walking, the
//! node table for `data.js` is built, node and field text is fed to the
//! search index, and a page descriptor is collected for each node.

use crate::index::{InvertedIndex, PageId};
use crate::model::{AddressableNode, FieldNode, PropertyValueMap};
use crate::ral::{BigHex, FieldDisplay, RalData, RalEntry, RalField};
use serde::Serialize;
use sha1::{Digest, Sha1};

/// Data handed to the page templates for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub id: PageId,
    pub path: String,
    /// SHA-1 of `path`; names the page file.
    pub uid: String,
    /// Extra documented properties set on the node, stringified.
    pub properties: Vec<(String, String)>,
    /// Same, per field, for fields that set any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldProperties>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldProperties {
    pub name: String,
    pub properties: Vec<(String, String)>,
}

/// Hex SHA-1 of a hierarchical node path.
pub fn node_uid(path: &str) -> String {
    format!("{:x}", Sha1::digest(path.as_bytes()))
}

#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub skip_not_present: bool,
    pub extra_doc_properties: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self { Self { skip_not_present: true, extra_doc_properties: Vec::new() } }
}

/// Mutable state threaded through one traversal.
#[derive(Debug, Default)]
pub struct WalkContext {
    next_id: PageId,
    path: Vec<String>,
}

impl WalkContext {
    pub fn new() -> Self { Self::default() }

    fn allocate_id(&mut self) -> PageId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn path(&self) -> String { self.path.join(".") }
}

/// Output of a complete walk.
#[derive(Debug, Default)]
pub struct RegisterMapWalk {
    pub ral: RalData,
    pub index: InvertedIndex,
    pub pages: Vec<PageDescriptor>,
}

pub struct TreeNumberer<'a> {
    options: &'a WalkOptions,
    ctx: WalkContext,
    out: RegisterMapWalk,
}

impl<'a> TreeNumberer<'a> {
    pub fn new(options: &'a WalkOptions) -> Self {
        Self { options, ctx: WalkContext::new(), out: RegisterMapWalk::default() }
    }

    /// Number `root` and everything below it. Roots share one id sequence.
    pub fn visit_root(&mut self, root: &AddressableNode) -> PageId {
        self.visit(root, None)
    }

    pub fn finish(self) -> RegisterMapWalk { self.out }

    fn present<'n, T: 'n>(&self, items: &'n [T], is_present: fn(&T) -> bool) -> impl Iterator<Item = &'n T> {
        let skip = self.options.skip_not_present;
        items.iter().filter(move |n| !skip || is_present(n))
    }

    fn visit(&mut self, node: &AddressableNode, parent: Option<PageId>) -> PageId {
        let this_id = self.ctx.allocate_id();
        self.ctx.path.push(node.inst_name.clone());
        let path = self.ctx.path();

        self.out.index.add_node(node, this_id, 0);

        let mut entry = RalEntry {
            parent,
            children: Vec::new(),
            name: node.inst_name.clone(),
            offset: BigHex(node.offset),
            size: BigHex(node.size),
            dims: None,
            stride: None,
            idxs: None,
            fields: None,
        };
        if let Some(array) = &node.array {
            entry.dims = Some(array.dims.clone());
            entry.stride = Some(BigHex(array.stride));
            entry.idxs = Some(vec![0; array.dims.len()]);
        }

        let mut page = PageDescriptor {
            id: this_id,
            uid: node_uid(&path),
            properties: self.documented(&node.properties, &path),
            path,
            fields: Vec::new(),
        };

        if node.is_reg() {
            let fields: Vec<&FieldNode> = self.present(&node.fields, |f| f.ispresent).collect();
            let mut ral_fields = Vec::with_capacity(fields.len());
            for (i, field) in fields.into_iter().enumerate() {
                self.out.index.add_node(field, this_id, i as u32);
                ral_fields.push(ral_field(field));

                let field_path = format!("{}.{}", page.path, field.inst_name);
                let properties = self.documented(&field.properties, &field_path);
                if !properties.is_empty() {
                    page.fields.push(FieldProperties { name: field.inst_name.clone(), properties });
                }
            }
            entry.fields = Some(ral_fields);
        }

        // Reserve the slot now so the table stays in page id order
        let slot = self.out.ral.entries.len();
        self.out.ral.entries.push(entry);
        if parent.is_none() {
            self.out.ral.root_ids.push(this_id);
        }

        let children: Vec<&AddressableNode> = self.present(&node.children, |c| c.ispresent).collect();
        for child in children {
            let child_id = self.visit(child, Some(this_id));
            self.out.ral.entries[slot].children.push(child_id);
        }

        self.out.pages.push(page);
        self.ctx.path.pop();
        this_id
    }

    fn documented(&self, properties: &PropertyValueMap, owner_path: &str) -> Vec<(String, String)> {
        self.options
            .extra_doc_properties
            .iter()
            .filter_map(|name| properties.get(name).map(|v| (name.clone(), v.stringify(owner_path))))
            .collect()
    }
}

fn ral_field(field: &FieldNode) -> RalField {
    // Symbolic reset values cannot be shown by the client; they read as 0
    let reset = field.reset.as_ref().map_or(0, |r| r.constant_or_zero());
    let encoded = field.encode.is_some();
    RalField {
        name: field.inst_name.clone(),
        lsb: field.lsb,
        msb: field.msb,
        reset: BigHex(reset),
        disp: if encoded { FieldDisplay::Enum } else { FieldDisplay::Hex },
        encode: encoded.then_some(true),
    }
}

/// Walk all roots in order with a single id sequence.
pub fn walk(roots: &[AddressableNode], options: &WalkOptions) -> RegisterMapWalk {
    let mut numberer = TreeNumberer::new(options);
    for root in roots {
        numberer.visit_root(root);
    }
    numberer.finish()
}
