/*!
 * Subject
 * Stock permission-bearing entity
 */

use super::types::{EntityRef, Permission, PermissionReference, Permissionable};
use std::fmt;
use std::sync::Arc;

/// Generic authorization hook, e.g. a policy check
pub type FallbackPolicy = Arc<dyn Fn(&[PermissionReference]) -> bool + Send + Sync>;

/// Any actor that can hold permissions
#[derive(Clone)]
pub struct Subject {
    entity: EntityRef,
    permissions: Option<Vec<Permission>>,
    policy: Option<FallbackPolicy>,
}

impl Subject {
    pub fn new(kind: impl Into<String>, id: impl ToString) -> Self {
        Self {
            entity: EntityRef::new(kind, id),
            permissions: None,
            policy: None,
        }
    }

    /// Attach a generic authorization policy used by `authorize`
    pub fn with_policy<F>(mut self, policy: F) -> Self
    where
        F: Fn(&[PermissionReference]) -> bool + Send + Sync + 'static,
    {
        self.policy = Some(Arc::new(policy));
        self
    }

    /// Whether the permission set has been loaded
    pub fn is_loaded(&self) -> bool {
        self.permissions.is_some()
    }

    /// Drop the cached set so the next check reloads it
    pub fn forget_permissions(&mut self) {
        self.permissions = None;
    }

    /// Slugs of the cached set
    pub fn slugs(&self) -> Vec<&str> {
        self.permissions
            .iter()
            .flatten()
            .map(|p| p.slug.as_str())
            .collect()
    }
}

impl Permissionable for Subject {
    fn entity_ref(&self) -> EntityRef {
        self.entity.clone()
    }

    fn loaded_permissions(&self) -> Option<&[Permission]> {
        self.permissions.as_deref()
    }

    fn set_loaded_permissions(&mut self, permissions: Vec<Permission>) {
        self.permissions = Some(permissions);
    }

    fn authorize_fallback(&self, abilities: &[PermissionReference]) -> Option<bool> {
        self.policy.as_ref().map(|policy| policy(abilities))
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("entity", &self.entity)
            .field("permissions", &self.permissions)
            .field("policy", &self.policy.is_some())
            .finish()
    }
}
