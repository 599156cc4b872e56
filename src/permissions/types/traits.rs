/*!
 * Permission Traits
 * Storage and entity seams used by the resolver
 */

use super::core::{EntityRef, NewPermission, Permission, PermissionId, PermissionReference};
use crate::core::errors::CanResult;

/// Storage capability the resolver needs
///
/// Implementations never see a partial failure policy from the resolver:
/// any error is returned to the caller unchanged.
pub trait PermissionRepository: Send + Sync {
    /// Live permissions whose key is in `ids` or whose slug is in `slugs`
    fn find_many_by_id_or_slug(
        &self,
        ids: &[PermissionId],
        slugs: &[String],
    ) -> CanResult<Vec<Permission>>;

    /// Create edges from `entity` to every permission in `ids`
    fn attach_assignments(&self, entity: &EntityRef, ids: &[PermissionId]) -> CanResult<()>;

    /// Remove edges from `entity`; an empty `ids` removes all of them
    fn detach_assignments(&self, entity: &EntityRef, ids: &[PermissionId]) -> CanResult<()>;

    /// Live permissions currently assigned to `entity`, in attach order
    fn load_assigned(&self, entity: &EntityRef) -> CanResult<Vec<Permission>>;
}

/// Administrative storage operations
pub trait PermissionStore: PermissionRepository {
    /// Every live permission
    fn all(&self) -> CanResult<Vec<Permission>>;

    /// Live permission by exact slug
    fn find_by_slug(&self, slug: &str) -> CanResult<Option<Permission>>;

    /// Insert a permission, passing its slug (or name) through the slug transform
    fn insert(&self, permission: NewPermission) -> CanResult<Permission>;

    /// Overwrite a stored row with `permission`, re-normalizing the slug
    fn save(&self, permission: &Permission) -> CanResult<Permission>;

    /// Mark as trashed; false when the row is missing or already trashed
    fn soft_delete(&self, id: &PermissionId) -> CanResult<bool>;

    /// Remove the row and its edges; false when missing
    fn force_delete(&self, id: &PermissionId) -> CanResult<bool>;

    /// Clear the trashed marker; false when missing or not trashed
    fn restore(&self, id: &PermissionId) -> CanResult<bool>;

    /// Remove every permission and edge
    fn truncate(&self) -> CanResult<()>;

    /// Entities of `kind` holding the permission
    fn permissionables(&self, id: &PermissionId, kind: &str) -> CanResult<Vec<EntityRef>>;
}

/// Permission-bearing entity
///
/// The loaded set is a cache: it is only refreshed by the resolver when
/// reload-on-update is enabled, or when the caller asks for it.
pub trait Permissionable {
    fn entity_ref(&self) -> EntityRef;

    /// Cached assignments, `None` until first loaded
    fn loaded_permissions(&self) -> Option<&[Permission]>;

    fn set_loaded_permissions(&mut self, permissions: Vec<Permission>);

    /// Generic authorization used when no permission matches the abilities
    fn authorize_fallback(&self, _abilities: &[PermissionReference]) -> Option<bool> {
        None
    }
}
