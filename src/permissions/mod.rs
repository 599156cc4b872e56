/*!
 * Permissions Module
 * Permission references, resolution and assignment management
 *
 * Any entity implementing [`Permissionable`] can hold permissions. Callers
 * pass references in whatever shape they have (keys, slugs, delimited slug
 * strings, loaded permissions, nested lists) and the resolver normalizes
 * them, looks them up in one batch and applies set semantics against the
 * entity's loaded assignments.
 *
 * ## Usage
 * ```
 * use can_permissions::permissions::{
 *     MemoryRepository, PermissionResolver, Subject, seed,
 * };
 * use can_permissions::CanConfig;
 * use std::sync::Arc;
 *
 * let config = CanConfig::default();
 * let repo = Arc::new(MemoryRepository::new(config.clone()));
 * seed(repo.as_ref(), config.separator).unwrap();
 *
 * let resolver = PermissionResolver::new(repo, config);
 * let mut user = Subject::new("User", 1);
 *
 * assert!(resolver.attach(&mut user, "create.users|edit.users").unwrap());
 * assert!(resolver.has_all(&mut user, ["create.users", "edit.users"]).unwrap());
 * assert!(resolver.check_method(&mut user, "canEditUsers").unwrap());
 * ```
 */

pub mod guard;
pub mod reference;
pub mod repository;
pub mod resolver;
pub mod seeder;
pub mod service;
pub mod slug;
pub mod subject;
pub mod types;

// Re-export commonly used items
pub use guard::require_permission;
pub use reference::normalize_references;
pub use repository::{MemoryRepository, QueryStats};
pub use resolver::PermissionResolver;
pub use seeder::{default_permissions, seed};
pub use service::PermissionService;
pub use slug::slugify;
pub use subject::{FallbackPolicy, Subject};
pub use types::{
    Assignment, EntityRef, NewPermission, Permission, PermissionId, PermissionInput,
    PermissionReference, PermissionRepository, PermissionStore, PermissionUpdate, Permissionable,
};
