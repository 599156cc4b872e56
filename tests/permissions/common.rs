/*!
 * Shared fixtures
 */

use can_permissions::permissions::seed;
use can_permissions::{CanConfig, KeyKind, MemoryRepository, PermissionResolver};
use std::sync::Arc;

pub struct Fixture {
    pub repo: Arc<MemoryRepository>,
    pub resolver: PermissionResolver<MemoryRepository>,
}

/// Seeded memory repository with integer keys 1..=12
pub fn fixture() -> Fixture {
    fixture_with(CanConfig::default())
}

pub fn fixture_with(config: CanConfig) -> Fixture {
    let config = config.with_key_kind(KeyKind::Integer);
    let repo = Arc::new(MemoryRepository::new(config.clone()));
    seed(repo.as_ref(), config.separator).expect("seeding memory repository");
    repo.reset_stats();
    Fixture {
        resolver: PermissionResolver::new(Arc::clone(&repo), config),
        repo,
    }
}

/// Slugs in seed order
pub const SLUGS: [&str; 12] = [
    "view.users",
    "create.users",
    "edit.users",
    "delete.users",
    "restore.users",
    "destroy.users",
    "view.permissions",
    "create.permissions",
    "edit.permissions",
    "delete.permissions",
    "restore.permissions",
    "destroy.permissions",
];
