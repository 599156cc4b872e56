/*!
 * Permission Types
 * Core records and reference types for permission resolution
 */

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use std::fmt;
use std::time::SystemTime;
use uuid::Uuid;

/// Primary key of a stored permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionId {
    Int(u64),
    Uuid(Uuid),
}

impl PermissionId {
    /// Parse the textual form of a key (`"42"` or a hyphenated UUID)
    pub fn parse(raw: &str) -> Option<Self> {
        if let Ok(n) = raw.parse::<u64>() {
            return Some(PermissionId::Int(n));
        }
        Uuid::parse_str(raw).ok().map(PermissionId::Uuid)
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionId::Int(n) => write!(f, "{n}"),
            PermissionId::Uuid(u) => write!(f, "{}", u.hyphenated()),
        }
    }
}

impl From<u64> for PermissionId {
    fn from(n: u64) -> Self {
        PermissionId::Int(n)
    }
}

impl From<Uuid> for PermissionId {
    fn from(u: Uuid) -> Self {
        PermissionId::Uuid(u)
    }
}

/// Stored permission
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form classification tag, e.g. "User"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<SystemTime>,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<SystemTime>,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<SystemTime>,
}

impl Permission {
    /// Soft-deleted rows stay in storage but are invisible to lookups
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Same stored row
    pub fn is(&self, other: &Permission) -> bool {
        self.id == other.id
    }
}

/// Attributes for a permission that does not exist yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewPermission {
    pub name: String,
    /// Derived from `name` when absent
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl NewPermission {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Partial update of a stored permission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PermissionUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub model: Option<String>,
}

/// Polymorphic reference to a permission-bearing entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity type, e.g. "User"
    pub kind: String,
    pub id: String,
}

impl EntityRef {
    pub fn new(kind: impl Into<String>, id: impl ToString) -> Self {
        Self {
            kind: kind.into(),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// Edge between an entity and a permission
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub entity: EntityRef,
    pub permission_id: PermissionId,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<SystemTime>,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<SystemTime>,
}

/// Normalized permission reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionReference {
    Identifier(PermissionId),
    Slug(String),
    Handle(Permission),
}

impl PermissionReference {
    /// Whether this reference denotes `permission`
    ///
    /// Identifiers also match a slug equal to their text, so `"42"` finds
    /// either the row with key 42 or the row slugged `42`.
    pub fn matches(&self, permission: &Permission) -> bool {
        match self {
            PermissionReference::Identifier(id) => {
                permission.id == *id || permission.slug == id.to_string()
            }
            PermissionReference::Slug(slug) => permission.slug == *slug,
            PermissionReference::Handle(handle) => handle.is(permission),
        }
    }
}

impl From<Permission> for PermissionReference {
    fn from(permission: Permission) -> Self {
        PermissionReference::Handle(permission)
    }
}

/// Caller input before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum PermissionInput {
    Null,
    Int(i64),
    Id(PermissionId),
    Str(String),
    Handle(Permission),
    List(Vec<PermissionInput>),
    /// Any other shape; dropped during normalization
    Unsupported,
}

impl PermissionInput {
    /// No elements at all once lists are flattened
    ///
    /// `Null` counts as an element; only empty (nested) lists are empty.
    pub fn is_empty(&self) -> bool {
        match self {
            PermissionInput::List(items) => items.iter().all(PermissionInput::is_empty),
            _ => false,
        }
    }

    /// Shorthand for an empty list
    pub fn none() -> Self {
        PermissionInput::List(Vec::new())
    }
}

impl From<i64> for PermissionInput {
    fn from(n: i64) -> Self {
        PermissionInput::Int(n)
    }
}

impl From<i32> for PermissionInput {
    fn from(n: i32) -> Self {
        PermissionInput::Int(i64::from(n))
    }
}

impl From<u32> for PermissionInput {
    fn from(n: u32) -> Self {
        PermissionInput::Int(i64::from(n))
    }
}

impl From<u64> for PermissionInput {
    fn from(n: u64) -> Self {
        PermissionInput::Id(PermissionId::Int(n))
    }
}

impl From<Uuid> for PermissionInput {
    fn from(u: Uuid) -> Self {
        PermissionInput::Id(PermissionId::Uuid(u))
    }
}

impl From<PermissionId> for PermissionInput {
    fn from(id: PermissionId) -> Self {
        PermissionInput::Id(id)
    }
}

impl From<&PermissionId> for PermissionInput {
    fn from(id: &PermissionId) -> Self {
        PermissionInput::Id(*id)
    }
}

impl From<&str> for PermissionInput {
    fn from(s: &str) -> Self {
        PermissionInput::Str(s.to_string())
    }
}

impl From<String> for PermissionInput {
    fn from(s: String) -> Self {
        PermissionInput::Str(s)
    }
}

impl From<&String> for PermissionInput {
    fn from(s: &String) -> Self {
        PermissionInput::Str(s.clone())
    }
}

impl From<Permission> for PermissionInput {
    fn from(permission: Permission) -> Self {
        PermissionInput::Handle(permission)
    }
}

impl From<&Permission> for PermissionInput {
    fn from(permission: &Permission) -> Self {
        PermissionInput::Handle(permission.clone())
    }
}

impl From<PermissionReference> for PermissionInput {
    fn from(reference: PermissionReference) -> Self {
        match reference {
            PermissionReference::Identifier(id) => PermissionInput::Id(id),
            PermissionReference::Slug(slug) => PermissionInput::Str(slug),
            PermissionReference::Handle(permission) => PermissionInput::Handle(permission),
        }
    }
}

impl<T: Into<PermissionInput>> From<Option<T>> for PermissionInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(PermissionInput::Null, Into::into)
    }
}

impl<T: Into<PermissionInput>> From<Vec<T>> for PermissionInput {
    fn from(items: Vec<T>) -> Self {
        PermissionInput::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PermissionInput>, const N: usize> From<[T; N]> for PermissionInput {
    fn from(items: [T; N]) -> Self {
        PermissionInput::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<PermissionInput>> From<&[T]> for PermissionInput {
    fn from(items: &[T]) -> Self {
        PermissionInput::List(items.iter().cloned().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for PermissionInput {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => PermissionInput::Null,
            Value::Number(n) => match (n.as_u64(), n.as_i64()) {
                (Some(u), _) => PermissionInput::Id(PermissionId::Int(u)),
                (None, Some(i)) => PermissionInput::Int(i),
                _ => PermissionInput::Unsupported,
            },
            Value::String(s) => PermissionInput::Str(s),
            Value::Array(items) => {
                PermissionInput::List(items.into_iter().map(PermissionInput::from).collect())
            }
            Value::Bool(_) | Value::Object(_) => PermissionInput::Unsupported,
        }
    }
}
