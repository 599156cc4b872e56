/*!
 * Can - Permission Library
 * Many-to-many permissions for any permission-bearing entity
 */

pub mod core;
pub mod monitoring;
pub mod permissions;

// Re-exports
pub use crate::core::{CanConfig, CanError, CanResult, KeyKind};
pub use monitoring::init_tracing;
pub use permissions::{
    EntityRef, MemoryRepository, NewPermission, Permission, PermissionId, PermissionInput,
    PermissionReference, PermissionRepository, PermissionResolver, PermissionService,
    PermissionStore, Permissionable, Subject,
};
