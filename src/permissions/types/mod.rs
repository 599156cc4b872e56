/*!
 * Permission Types Module
 * Core types and traits for the permission system
 */

mod core;
mod traits;

pub use self::core::{
    Assignment, EntityRef, NewPermission, Permission, PermissionId, PermissionInput,
    PermissionReference, PermissionUpdate,
};
pub use self::traits::{PermissionRepository, PermissionStore, Permissionable};
