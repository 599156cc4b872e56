/*!
 * Permission Service
 * Administrative operations over stored permissions
 */

use super::reference::normalize_references;
use super::slug::slugify;
use super::types::{
    EntityRef, NewPermission, Permission, PermissionInput, PermissionReference, PermissionStore,
    PermissionUpdate,
};
use crate::core::errors::CanResult;
use crate::core::CanConfig;
use std::sync::Arc;
use tracing::{debug, info};

/// CRUD facade over a permission store
pub struct PermissionService<S: PermissionStore> {
    store: Arc<S>,
    config: CanConfig,
}

impl<S: PermissionStore> PermissionService<S> {
    pub fn new(store: Arc<S>, config: CanConfig) -> Self {
        Self { store, config }
    }

    /// Every live permission
    pub fn index(&self) -> CanResult<Vec<Permission>> {
        self.store.all()
    }

    /// Permission by key, slug or handle
    ///
    /// Only the first reference in `input` is considered.
    pub fn show(&self, input: impl Into<PermissionInput>) -> CanResult<Option<Permission>> {
        let Some(reference) = normalize_references(input).into_iter().next() else {
            return Ok(None);
        };

        let found = match reference {
            PermissionReference::Handle(permission) => {
                return Ok((!permission.is_trashed()).then_some(permission));
            }
            PermissionReference::Identifier(id) => self
                .store
                .find_many_by_id_or_slug(&[id], &[id.to_string()])?,
            PermissionReference::Slug(slug) => self.store.find_many_by_id_or_slug(&[], &[slug])?,
        };
        Ok(found.into_iter().next())
    }

    pub fn store(&self, permission: NewPermission) -> CanResult<Permission> {
        let stored = self.store.insert(permission)?;
        info!(slug = %stored.slug, "Created permission");
        Ok(stored)
    }

    /// Apply `changes` to `permission` and persist
    pub fn update(
        &self,
        permission: &Permission,
        changes: PermissionUpdate,
    ) -> CanResult<Permission> {
        let mut updated = permission.clone();
        if let Some(name) = changes.name {
            updated.name = name;
        }
        if let Some(slug) = changes.slug {
            updated.slug = slug;
        }
        if changes.description.is_some() {
            updated.description = changes.description;
        }
        if changes.model.is_some() {
            updated.model = changes.model;
        }
        self.store.save(&updated)
    }

    /// Trash the permission when soft deletes are on, remove it otherwise
    pub fn delete(&self, permission: &Permission) -> CanResult<bool> {
        if self.config.soft_deletes {
            self.store.soft_delete(&permission.id)
        } else {
            self.store.force_delete(&permission.id)
        }
    }

    pub fn force_delete(&self, permission: &Permission) -> CanResult<bool> {
        self.store.force_delete(&permission.id)
    }

    pub fn restore(&self, permission: &Permission) -> CanResult<bool> {
        self.store.restore(&permission.id)
    }

    /// Remove every permission and assignment
    pub fn truncate(&self) -> CanResult<()> {
        debug!("Truncating permissions");
        self.store.truncate()
    }

    /// Live permission by slug, after normalizing `raw`
    ///
    /// `find_by_slug("CreateUsers")` finds `create.users`.
    pub fn find_by_slug(&self, raw: &str) -> CanResult<Option<Permission>> {
        self.store.find_by_slug(&slugify(raw, self.config.separator))
    }

    /// Entities of `kind` that hold `permission`
    pub fn permissionables(&self, permission: &Permission, kind: &str) -> CanResult<Vec<EntityRef>> {
        self.store.permissionables(&permission.id, kind)
    }
}
