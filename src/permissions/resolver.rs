/*!
 * Permission Resolver
 * Resolves permission references and applies attach/detach/query semantics
 *
 * Every operation is synchronous and bounded: at most one batched lookup
 * and one batched write per call, plus the optional reload afterwards.
 * Membership checks run against the entity's loaded set and never touch
 * storage once that set is loaded.
 *
 * There is no locking. Two callers mutating the same entity at once can
 * produce duplicate or lost edges; the at-most-once guarantee comes only
 * from filtering against the loaded set before writing.
 */

use super::reference::normalize_references;
use super::slug::slugify;
use super::types::{
    Permission, PermissionId, PermissionInput, PermissionReference, PermissionRepository,
    Permissionable,
};
use crate::core::errors::{CanError, CanResult};
use crate::core::limits::METHOD_MARKER;
use crate::core::CanConfig;
use ahash::AHashSet;
use std::sync::Arc;
use tracing::debug;

/// Resolves references and mutates assignments through a repository
pub struct PermissionResolver<R: PermissionRepository> {
    repository: Arc<R>,
    config: CanConfig,
}

impl<R: PermissionRepository> Clone for PermissionResolver<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
        }
    }
}

impl<R: PermissionRepository> PermissionResolver<R> {
    pub fn new(repository: Arc<R>, config: CanConfig) -> Self {
        debug!(separator = %config.separator, load_on_update = config.load_on_update, "Initializing permission resolver");
        Self { repository, config }
    }

    pub fn config(&self) -> &CanConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// See [`normalize_references`]
    pub fn normalize_references(&self, input: impl Into<PermissionInput>) -> Vec<PermissionReference> {
        normalize_references(input)
    }

    /// Turn references into stored permissions with a single lookup
    ///
    /// Handles to live permissions are kept without a lookup; trashed
    /// handles are dropped. Identifiers and slugs go to storage in one
    /// batch, and nothing is queried when there is nothing to look up.
    /// Unmatched references vanish. The result holds each permission once.
    pub fn resolve_to_permissions(
        &self,
        refs: &[PermissionReference],
    ) -> CanResult<Vec<Permission>> {
        let mut resolved = Vec::new();
        let mut ids = Vec::new();
        let mut slugs = Vec::new();
        let mut seen_ids = AHashSet::new();
        let mut seen_slugs = AHashSet::new();

        for reference in refs {
            match reference {
                PermissionReference::Handle(permission) => {
                    if !permission.is_trashed() {
                        resolved.push(permission.clone());
                    }
                }
                PermissionReference::Identifier(id) => {
                    if seen_ids.insert(*id) {
                        ids.push(*id);
                    }
                    // keys are also matched against slugs
                    let text = id.to_string();
                    if seen_slugs.insert(text.clone()) {
                        slugs.push(text);
                    }
                }
                PermissionReference::Slug(slug) => {
                    if seen_slugs.insert(slug.clone()) {
                        slugs.push(slug.clone());
                    }
                }
            }
        }

        if !ids.is_empty() || !slugs.is_empty() {
            let found = self.repository.find_many_by_id_or_slug(&ids, &slugs)?;
            debug!(
                requested = ids.len() + slugs.len(),
                found = found.len(),
                "Resolved permission references"
            );
            resolved.extend(found);
        }

        let mut unique = AHashSet::with_capacity(resolved.len());
        resolved.retain(|p: &Permission| unique.insert(p.id));
        Ok(resolved)
    }

    /// Refresh the entity's cached set from storage
    pub fn load_permissions<E: Permissionable>(&self, entity: &mut E) -> CanResult<()> {
        let permissions = self.repository.load_assigned(&entity.entity_ref())?;
        entity.set_loaded_permissions(permissions);
        Ok(())
    }

    fn ensure_loaded<E: Permissionable>(&self, entity: &mut E) -> CanResult<()> {
        if entity.loaded_permissions().is_none() {
            self.load_permissions(entity)?;
        }
        Ok(())
    }

    fn reload_if_configured<E: Permissionable>(&self, entity: &mut E) -> CanResult<()> {
        if self.config.load_on_update {
            self.load_permissions(entity)?;
        }
        Ok(())
    }

    fn assigned_ids<E: Permissionable>(entity: &E) -> AHashSet<PermissionId> {
        entity
            .loaded_permissions()
            .unwrap_or_default()
            .iter()
            .map(|p| p.id)
            .collect()
    }

    /// Attach permissions not yet held by the entity
    ///
    /// Returns true iff at least one new edge was written.
    pub fn attach<E: Permissionable>(
        &self,
        entity: &mut E,
        input: impl Into<PermissionInput>,
    ) -> CanResult<bool> {
        let refs = normalize_references(input);
        let permissions = self.resolve_to_permissions(&refs)?;
        if permissions.is_empty() {
            return Ok(false);
        }

        self.ensure_loaded(entity)?;
        let assigned = Self::assigned_ids(entity);
        let pending: Vec<PermissionId> = permissions
            .iter()
            .map(|p| p.id)
            .filter(|id| !assigned.contains(id))
            .collect();
        if pending.is_empty() {
            return Ok(false);
        }

        let target = entity.entity_ref();
        self.repository.attach_assignments(&target, &pending)?;
        debug!(entity = %target, count = pending.len(), "Attached permissions");

        self.reload_if_configured(entity)?;
        Ok(true)
    }

    /// Detach the referenced permissions the entity currently holds
    ///
    /// An empty input (nothing left after flattening lists) detaches
    /// everything. Returns true iff an edge was removed.
    pub fn detach<E: Permissionable>(
        &self,
        entity: &mut E,
        input: impl Into<PermissionInput>,
    ) -> CanResult<bool> {
        let input = input.into();
        if input.is_empty() {
            return self.detach_all(entity);
        }

        let refs = normalize_references(input);
        if refs.is_empty() {
            return Ok(false);
        }

        // The loaded set already carries ids and slugs, so matching the raw
        // references against it equals resolving then filtering.
        self.ensure_loaded(entity)?;
        let held: Vec<PermissionId> = entity
            .loaded_permissions()
            .unwrap_or_default()
            .iter()
            .filter(|p| refs.iter().any(|r| r.matches(p)))
            .map(|p| p.id)
            .collect();
        if held.is_empty() {
            return Ok(false);
        }

        let target = entity.entity_ref();
        self.repository.detach_assignments(&target, &held)?;
        debug!(entity = %target, count = held.len(), "Detached permissions");

        self.reload_if_configured(entity)?;
        Ok(true)
    }

    /// Detach every permission; false when the entity holds none
    pub fn detach_all<E: Permissionable>(&self, entity: &mut E) -> CanResult<bool> {
        self.ensure_loaded(entity)?;
        if entity.loaded_permissions().unwrap_or_default().is_empty() {
            return Ok(false);
        }

        let target = entity.entity_ref();
        self.repository.detach_assignments(&target, &[])?;
        debug!(entity = %target, "Detached all permissions");

        self.reload_if_configured(entity)?;
        Ok(true)
    }

    /// Replace the entity's permissions with the resolvable part of `input`
    ///
    /// Runs as detach-all then attach with no transaction around them: a
    /// failure in the second step leaves the entity with fewer permissions.
    /// Without reload-on-update the cached set may be stale, so it is
    /// refreshed before the detach step.
    pub fn sync<E: Permissionable>(
        &self,
        entity: &mut E,
        input: impl Into<PermissionInput>,
    ) -> CanResult<()> {
        if !self.config.load_on_update {
            self.load_permissions(entity)?;
        }
        if self.detach_all(entity)? && !self.config.load_on_update {
            entity.set_loaded_permissions(Vec::new());
        }
        self.attach(entity, input)?;
        Ok(())
    }

    /// Whether the entity holds at least one referenced permission
    pub fn has_any<E: Permissionable>(
        &self,
        entity: &mut E,
        input: impl Into<PermissionInput>,
    ) -> CanResult<bool> {
        let refs = normalize_references(input);
        if refs.is_empty() {
            return Ok(false);
        }
        self.ensure_loaded(entity)?;
        let loaded = entity.loaded_permissions().unwrap_or_default();
        Ok(refs.iter().any(|r| loaded.iter().any(|p| r.matches(p))))
    }

    /// Whether the entity holds every referenced permission
    ///
    /// False when nothing is referenced.
    pub fn has_all<E: Permissionable>(
        &self,
        entity: &mut E,
        input: impl Into<PermissionInput>,
    ) -> CanResult<bool> {
        let refs = normalize_references(input);
        if refs.is_empty() {
            return Ok(false);
        }
        self.ensure_loaded(entity)?;
        let loaded = entity.loaded_permissions().unwrap_or_default();
        Ok(refs.iter().all(|r| loaded.iter().any(|p| r.matches(p))))
    }

    /// `has_all` when `all` is set, `has_any` otherwise
    pub fn has<E: Permissionable>(
        &self,
        entity: &mut E,
        input: impl Into<PermissionInput>,
        all: bool,
    ) -> CanResult<bool> {
        if all {
            self.has_all(entity, input)
        } else {
            self.has_any(entity, input)
        }
    }

    /// Whether the entity holds the permission with exactly this slug
    pub fn has_slug<E: Permissionable>(&self, entity: &mut E, slug: &str) -> CanResult<bool> {
        self.ensure_loaded(entity)?;
        Ok(entity
            .loaded_permissions()
            .unwrap_or_default()
            .iter()
            .any(|p| p.slug == slug))
    }

    /// Name-based check such as `canCreateUsers`
    ///
    /// The part after `can` goes through the slug transform and into
    /// `has_any`. Names without the marker, or with nothing after it,
    /// are an [`CanError::UnhandledDynamicCall`].
    pub fn check_method<E: Permissionable>(&self, entity: &mut E, method: &str) -> CanResult<bool> {
        let slug = method
            .strip_prefix(METHOD_MARKER)
            .map(|rest| slugify(rest, self.config.separator))
            .filter(|slug| !slug.is_empty())
            .ok_or_else(|| CanError::UnhandledDynamicCall {
                method: method.to_string(),
            })?;
        self.has_any(entity, slug)
    }

    /// Ability check that prefers permissions over generic authorization
    ///
    /// With `extend_can_method` on, abilities that resolve to stored
    /// permissions are checked with `has`. Otherwise the entity's own
    /// fallback decides, and an entity without one is denied.
    pub fn authorize<E: Permissionable>(
        &self,
        entity: &mut E,
        abilities: impl Into<PermissionInput>,
        strict_all: bool,
    ) -> CanResult<bool> {
        let refs = normalize_references(abilities);

        if self.config.extend_can_method {
            let resolved = self.resolve_to_permissions(&refs)?;
            if !resolved.is_empty() {
                return self.has(entity, resolved, strict_all);
            }
        }

        Ok(entity.authorize_fallback(&refs).unwrap_or(false))
    }
}
