/*!
 * Guard
 * Route-guard decision: let a subject through when it holds a required permission
 */

use super::resolver::PermissionResolver;
use super::types::{PermissionRepository, Permissionable};
use crate::core::errors::{CanError, CanResult};
use tracing::warn;

/// Pass when an authenticated subject holds any of `tokens`
///
/// `None` stands for an unauthenticated request. Each token may itself be
/// a `,`/`|` delimited list.
pub fn require_permission<R, E>(
    resolver: &PermissionResolver<R>,
    subject: Option<&mut E>,
    tokens: &[&str],
) -> CanResult<()>
where
    R: PermissionRepository,
    E: Permissionable,
{
    if let Some(subject) = subject {
        if resolver.has_any(subject, tokens)? {
            return Ok(());
        }
    }

    let required = tokens.join(",");
    warn!(%required, "Permission check failed");
    Err(CanError::Forbidden { required })
}
