/*!
 * Memory Repository
 * In-process permission storage with query accounting
 *
 * Every trait call counts as one read or one write, which makes the
 * batching guarantees of the resolver observable in tests.
 */

use super::slug::slugify;
use super::types::{
    Assignment, EntityRef, NewPermission, Permission, PermissionId, PermissionRepository,
    PermissionStore,
};
use crate::core::errors::{CanError, CanResult};
use crate::core::{CanConfig, KeyKind};
use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::debug;
use uuid::Uuid;

/// Storage call counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    pub reads: u64,
    pub writes: u64,
}

impl QueryStats {
    pub fn total(&self) -> u64 {
        self.reads + self.writes
    }
}

/// Permission storage held in memory
pub struct MemoryRepository {
    config: CanConfig,
    /// Rows in insertion order, trashed ones included
    permissions: RwLock<Vec<Permission>>,
    /// Edges per entity in attach order
    assignments: DashMap<EntityRef, Vec<Assignment>, RandomState>,
    next_id: AtomicU64,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl MemoryRepository {
    pub fn new(config: CanConfig) -> Self {
        Self {
            config,
            permissions: RwLock::new(Vec::new()),
            assignments: DashMap::with_hasher(RandomState::new()),
            next_id: AtomicU64::new(0),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CanConfig {
        &self.config
    }

    /// Counters since creation or the last reset
    pub fn stats(&self) -> QueryStats {
        QueryStats {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }

    pub fn reset_stats(&self) {
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
    }

    /// Raw edge count for an entity, without touching the counters
    pub fn assignment_count(&self, entity: &EntityRef) -> usize {
        self.assignments.get(entity).map(|a| a.len()).unwrap_or(0)
    }

    /// Raw edges for an entity, without touching the counters
    pub fn assignments_of(&self, entity: &EntityRef) -> Vec<Assignment> {
        self.assignments
            .get(entity)
            .map(|a| a.value().clone())
            .unwrap_or_default()
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    fn write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    fn now(&self) -> Option<SystemTime> {
        self.config.timestamps.then(SystemTime::now)
    }

    fn mint_id(&self) -> PermissionId {
        match self.config.key_kind {
            KeyKind::Integer => PermissionId::Int(self.next_id.fetch_add(1, Ordering::Relaxed) + 1),
            KeyKind::Uuid => PermissionId::Uuid(Uuid::new_v4()),
        }
    }

    fn slug_taken(rows: &[Permission], slug: &str, except: Option<&PermissionId>) -> bool {
        rows.iter()
            .any(|p| p.slug == slug && Some(&p.id) != except)
    }
}

impl PermissionRepository for MemoryRepository {
    fn find_many_by_id_or_slug(
        &self,
        ids: &[PermissionId],
        slugs: &[String],
    ) -> CanResult<Vec<Permission>> {
        self.read();
        let rows = self.permissions.read();
        Ok(rows
            .iter()
            .filter(|p| !p.is_trashed())
            .filter(|p| ids.contains(&p.id) || slugs.iter().any(|s| *s == p.slug))
            .cloned()
            .collect())
    }

    fn attach_assignments(&self, entity: &EntityRef, ids: &[PermissionId]) -> CanResult<()> {
        self.write();
        {
            let rows = self.permissions.read();
            if let Some(missing) = ids.iter().find(|id| !rows.iter().any(|p| p.id == **id)) {
                return Err(CanError::repository(format!(
                    "permission {missing} does not exist"
                )));
            }
        }

        let now = self.now();
        let mut edges = self.assignments.entry(entity.clone()).or_default();
        for id in ids {
            // edges are unique per (entity, permission) in this store
            if edges.iter().any(|a| a.permission_id == *id) {
                continue;
            }
            edges.push(Assignment {
                entity: entity.clone(),
                permission_id: *id,
                created_at: now,
                updated_at: now,
            });
        }
        Ok(())
    }

    fn detach_assignments(&self, entity: &EntityRef, ids: &[PermissionId]) -> CanResult<()> {
        self.write();
        if ids.is_empty() {
            self.assignments.remove(entity);
        } else if let Some(mut edges) = self.assignments.get_mut(entity) {
            edges.retain(|a| !ids.contains(&a.permission_id));
        }
        Ok(())
    }

    fn load_assigned(&self, entity: &EntityRef) -> CanResult<Vec<Permission>> {
        self.read();
        // copy the ids out so the shard guard is released before the rows lock
        let ids: Vec<PermissionId> = match self.assignments.get(entity) {
            Some(edges) => edges.iter().map(|a| a.permission_id).collect(),
            None => return Ok(Vec::new()),
        };
        let rows = self.permissions.read();
        Ok(ids
            .iter()
            .filter_map(|id| rows.iter().find(|p| p.id == *id))
            .filter(|p| !p.is_trashed())
            .cloned()
            .collect())
    }
}

impl PermissionStore for MemoryRepository {
    fn all(&self) -> CanResult<Vec<Permission>> {
        self.read();
        Ok(self
            .permissions
            .read()
            .iter()
            .filter(|p| !p.is_trashed())
            .cloned()
            .collect())
    }

    fn find_by_slug(&self, slug: &str) -> CanResult<Option<Permission>> {
        self.read();
        Ok(self
            .permissions
            .read()
            .iter()
            .find(|p| !p.is_trashed() && p.slug == slug)
            .cloned())
    }

    fn insert(&self, permission: NewPermission) -> CanResult<Permission> {
        self.write();
        let separator = self.config.separator;
        let slug = slugify(permission.slug.as_deref().unwrap_or(&permission.name), separator);

        let mut rows = self.permissions.write();
        if Self::slug_taken(&rows, &slug, None) {
            return Err(CanError::DuplicateSlug { slug });
        }

        let now = self.now();
        let stored = Permission {
            id: self.mint_id(),
            name: permission.name,
            slug,
            description: permission.description,
            model: permission.model,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(stored.clone());
        debug!(id = %stored.id, slug = %stored.slug, "Stored permission");
        Ok(stored)
    }

    fn save(&self, permission: &Permission) -> CanResult<Permission> {
        self.write();
        let mut rows = self.permissions.write();
        let slug = slugify(&permission.slug, self.config.separator);
        if Self::slug_taken(&rows, &slug, Some(&permission.id)) {
            return Err(CanError::DuplicateSlug { slug });
        }

        let row = rows
            .iter_mut()
            .find(|p| p.id == permission.id)
            .ok_or_else(|| CanError::NotFound {
                id: permission.id.to_string(),
            })?;
        *row = Permission {
            slug,
            updated_at: self.now().or(permission.updated_at),
            ..permission.clone()
        };
        Ok(row.clone())
    }

    fn soft_delete(&self, id: &PermissionId) -> CanResult<bool> {
        self.write();
        let mut rows = self.permissions.write();
        match rows.iter_mut().find(|p| p.id == *id && !p.is_trashed()) {
            Some(row) => {
                row.deleted_at = Some(SystemTime::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn force_delete(&self, id: &PermissionId) -> CanResult<bool> {
        self.write();
        {
            let mut rows = self.permissions.write();
            let before = rows.len();
            rows.retain(|p| p.id != *id);
            if rows.len() == before {
                return Ok(false);
            }
        }
        for mut edges in self.assignments.iter_mut() {
            edges.retain(|a| a.permission_id != *id);
        }
        Ok(true)
    }

    fn restore(&self, id: &PermissionId) -> CanResult<bool> {
        self.write();
        let mut rows = self.permissions.write();
        match rows.iter_mut().find(|p| p.id == *id && p.is_trashed()) {
            Some(row) => {
                row.deleted_at = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn truncate(&self) -> CanResult<()> {
        self.write();
        self.permissions.write().clear();
        self.assignments.clear();
        Ok(())
    }

    fn permissionables(&self, id: &PermissionId, kind: &str) -> CanResult<Vec<EntityRef>> {
        self.read();
        let mut holders: Vec<EntityRef> = self
            .assignments
            .iter()
            .filter(|entry| entry.key().kind == kind)
            .filter(|entry| entry.value().iter().any(|a| a.permission_id == *id))
            .map(|entry| entry.key().clone())
            .collect();
        holders.sort();
        Ok(holders)
    }
}
