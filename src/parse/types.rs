//! Entity tree produced by the scanner and consumed by the graph page.
//!
//! Parsing is tolerant: any well-formed JSON document becomes a tree. Fields
//! with an unexpected shape read as absent (domain `data` values are still
//! kept for re-serialization), and unknown `type` tags land in
//! [`EntityNode::Unknown`] with their original tag kept for display.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::flags::{DomainDetails, DomainFlags};

/// Free-form `data` bag of a node.
pub type Attributes = Map<String, Value>;

pub const FLAGS_KEY: &str = "flags";
pub const TAKEOVER_PLATFORM_KEY: &str = "possible_takeover_platform";
/// Key the scanner's takeover module writes the platform under.
pub const LEGACY_TAKEOVER_KEY: &str = "possible_takeover";

// Converting and serializing recurse once per level; the stack is grown on
// demand so trees of any depth stay safe.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

// =============================================================================
// KIND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Domain,
    Email,
    File,
    Unknown,
}

impl EntityKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "domain" => EntityKind::Domain,
            "email" => EntityKind::Email,
            "file" => EntityKind::File,
            _ => EntityKind::Unknown,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Domain => write!(f, "domain"),
            EntityKind::Email => write!(f, "email"),
            EntityKind::File => write!(f, "file"),
            EntityKind::Unknown => write!(f, "unknown"),
        }
    }
}

// =============================================================================
// NODE BASE + PAYLOADS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct NodeBase<D> {
    pub value: String,
    pub connections: Vec<EntityNode>,
    pub data: D,
}

impl<D: Default> NodeBase<D> {
    pub fn new(value: impl Into<String>) -> Self {
        NodeBase {
            value: value.into(),
            connections: Vec::new(),
            data: D::default(),
        }
    }
}

/// `data` of a domain node. Keys other than the flags and the takeover
/// platform are kept in `extra` untouched, as is a flags or platform value
/// of the wrong shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DomainData {
    pub flags: DomainFlags,
    pub possible_takeover_platform: Option<String>,
    pub extra: Attributes,
}

impl DomainData {
    pub fn platform(&self) -> Option<&str> {
        self.possible_takeover_platform.as_deref()
    }

    pub fn into_attributes(self) -> Attributes {
        let mut attrs = self.extra;
        attrs
            .entry(FLAGS_KEY)
            .or_insert_with(|| Value::from(self.flags.bits()));
        if let Some(platform) = self.possible_takeover_platform {
            attrs.insert(TAKEOVER_PLATFORM_KEY.to_string(), Value::String(platform));
        }
        attrs
    }
}

impl From<Attributes> for DomainData {
    fn from(mut attrs: Attributes) -> Self {
        let flags = match attrs.remove(FLAGS_KEY) {
            Some(v) => match v.as_u64() {
                Some(bits) => DomainFlags::from_bits(bits),
                None => {
                    debug!(flags = %v, "keeping non-integer domain flags as data");
                    attrs.insert(FLAGS_KEY.to_string(), v);
                    DomainFlags::EMPTY
                }
            },
            None => DomainFlags::EMPTY,
        };

        let platform = if attrs.contains_key(TAKEOVER_PLATFORM_KEY) {
            take_string(&mut attrs, TAKEOVER_PLATFORM_KEY)
        } else {
            take_string(&mut attrs, LEGACY_TAKEOVER_KEY)
        };

        DomainData {
            flags,
            possible_takeover_platform: platform,
            extra: attrs,
        }
    }
}

/// Takes a string value out of `attrs`; any other value stays where it was.
fn take_string(attrs: &mut Attributes, key: &str) -> Option<String> {
    match attrs.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            debug!(key, value = %other, "keeping non-string attribute as data");
            attrs.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

impl Serialize for DomainData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.extra.contains_key(FLAGS_KEY) {
            map.serialize_entry(FLAGS_KEY, &self.flags)?;
        }
        if let Some(platform) = &self.possible_takeover_platform {
            map.serialize_entry(TAKEOVER_PLATFORM_KEY, platform)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// ENTITY NODE: tagged union over domain/email/file/unknown
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum EntityNode {
    Domain(NodeBase<DomainData>),
    Email(NodeBase<Attributes>),
    File(NodeBase<Attributes>),
    Unknown {
        type_name: String,
        node: NodeBase<Attributes>,
    },
}

impl EntityNode {
    pub fn domain(value: impl Into<String>) -> Self {
        EntityNode::Domain(NodeBase::new(value))
    }

    pub fn email(value: impl Into<String>) -> Self {
        EntityNode::Email(NodeBase::new(value))
    }

    pub fn file(value: impl Into<String>) -> Self {
        EntityNode::File(NodeBase::new(value))
    }

    /// Node for any `type` tag. Known tags give their typed variant, so the
    /// result reads back the same after a JSON round-trip.
    pub fn of_type(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        let type_name = type_name.into();
        match EntityKind::from_type_name(&type_name) {
            EntityKind::Domain => EntityNode::domain(value),
            EntityKind::Email => EntityNode::email(value),
            EntityKind::File => EntityNode::file(value),
            EntityKind::Unknown => EntityNode::Unknown {
                type_name,
                node: NodeBase::new(value),
            },
        }
    }

    pub fn with_connection(mut self, child: EntityNode) -> Self {
        self.connections_mut().push(child);
        self
    }

    /// Set one `data` key. Flags and takeover keys on domain nodes are
    /// re-decoded.
    pub fn with_data(self, key: impl Into<String>, value: Value) -> Self {
        match self {
            EntityNode::Domain(mut n) => {
                let mut attrs = std::mem::take(&mut n.data).into_attributes();
                attrs.insert(key.into(), value);
                n.data = DomainData::from(attrs);
                EntityNode::Domain(n)
            }
            mut other => {
                if let Some(attrs) = other.attributes_mut() {
                    attrs.insert(key.into(), value);
                }
                other
            }
        }
    }

    pub fn with_flags(self, flags: DomainFlags) -> Self {
        self.with_data(FLAGS_KEY, Value::from(flags.bits()))
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityNode::Domain(_) => EntityKind::Domain,
            EntityNode::Email(_) => EntityKind::Email,
            EntityNode::File(_) => EntityKind::File,
            EntityNode::Unknown { .. } => EntityKind::Unknown,
        }
    }

    /// The `type` tag as it appeared in the document.
    pub fn type_name(&self) -> &str {
        match self {
            EntityNode::Domain(_) => "domain",
            EntityNode::Email(_) => "email",
            EntityNode::File(_) => "file",
            EntityNode::Unknown { type_name, .. } => type_name,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            EntityNode::Domain(n) => &n.value,
            EntityNode::Email(n) | EntityNode::File(n) | EntityNode::Unknown { node: n, .. } => {
                &n.value
            }
        }
    }

    pub fn connections(&self) -> &[EntityNode] {
        match self {
            EntityNode::Domain(n) => &n.connections,
            EntityNode::Email(n) | EntityNode::File(n) | EntityNode::Unknown { node: n, .. } => {
                &n.connections
            }
        }
    }

    fn connections_mut(&mut self) -> &mut Vec<EntityNode> {
        match self {
            EntityNode::Domain(n) => &mut n.connections,
            EntityNode::Email(n) | EntityNode::File(n) | EntityNode::Unknown { node: n, .. } => {
                &mut n.connections
            }
        }
    }

    /// Raw `data` of a non-domain node.
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            EntityNode::Domain(_) => None,
            EntityNode::Email(n) | EntityNode::File(n) | EntityNode::Unknown { node: n, .. } => {
                Some(&n.data)
            }
        }
    }

    fn attributes_mut(&mut self) -> Option<&mut Attributes> {
        match self {
            EntityNode::Domain(_) => None,
            EntityNode::Email(n) | EntityNode::File(n) | EntityNode::Unknown { node: n, .. } => {
                Some(&mut n.data)
            }
        }
    }

    pub fn domain_data(&self) -> Option<&DomainData> {
        match self {
            EntityNode::Domain(n) => Some(&n.data),
            _ => None,
        }
    }

    /// Flags of a domain node; empty for every other kind.
    pub fn flags(&self) -> DomainFlags {
        self.domain_data().map(|d| d.flags).unwrap_or_default()
    }

    pub fn domain_details(&self) -> Option<DomainDetails> {
        self.domain_data()
            .map(|d| DomainDetails::decode(self.value(), d.flags, d.platform()))
    }

    pub fn is_leaf(&self) -> bool {
        self.connections().is_empty()
    }

    /// Pre-order walk starting with `self`.
    pub fn iter(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Levels in the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.connections().iter().map(|c| (c, level + 1)));
        }
        deepest
    }

    /// First node in pre-order with the given type tag and value.
    pub fn find(&self, type_name: &str, value: &str) -> Option<&EntityNode> {
        self.iter()
            .find(|n| n.type_name() == type_name && n.value() == value)
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a EntityNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a EntityNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.connections().iter().rev());
        Some(node)
    }
}

impl From<Value> for EntityNode {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            debug!("node is not a JSON object, reading it as an empty unknown node");
            return EntityNode::of_type("", "");
        };

        let type_name = match fields.remove("type") {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };
        let value = match fields.remove("value") {
            Some(Value::String(s)) => s,
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            _ => String::new(),
        };
        let connections = match fields.remove("connections") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || EntityNode::from(item)))
                .collect(),
            _ => Vec::new(),
        };
        let data = match fields.remove("data") {
            Some(Value::Object(map)) => map,
            _ => Attributes::new(),
        };

        match EntityKind::from_type_name(&type_name) {
            EntityKind::Domain => EntityNode::Domain(NodeBase {
                value,
                connections,
                data: DomainData::from(data),
            }),
            EntityKind::Email => EntityNode::Email(NodeBase {
                value,
                connections,
                data,
            }),
            EntityKind::File => EntityNode::File(NodeBase {
                value,
                connections,
                data,
            }),
            EntityKind::Unknown => EntityNode::Unknown {
                type_name,
                node: NodeBase {
                    value,
                    connections,
                    data,
                },
            },
        }
    }
}

impl Serialize for EntityNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            let mut s = serializer.serialize_struct("EntityNode", 4)?;
            s.serialize_field("type", self.type_name())?;
            s.serialize_field("value", self.value())?;
            s.serialize_field("connections", self.connections())?;
            match self {
                EntityNode::Domain(n) => s.serialize_field("data", &n.data)?,
                EntityNode::Email(n) | EntityNode::File(n) | EntityNode::Unknown { node: n, .. } => {
                    s.serialize_field("data", &n.data)?
                }
            }
            s.end()
        })
    }
}
