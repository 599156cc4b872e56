/*!
 * Seeder
 * Default permission catalogue
 */

use super::types::{NewPermission, PermissionStore};
use crate::core::errors::CanResult;
use tracing::info;

const ACTIONS: [&str; 6] = ["view", "create", "edit", "delete", "restore", "destroy"];

const SUBJECTS: [(&str, &str); 2] = [("users", "User"), ("permissions", "Permission")];

/// The stock permissions: every action on users, then on permissions
///
/// Slugs join action and subject with `separator`.
pub fn default_permissions(separator: char) -> Vec<NewPermission> {
    SUBJECTS
        .iter()
        .flat_map(|(plural, model)| {
            ACTIONS.iter().map(move |action| {
                let description = match *action {
                    "create" => format!("Can create new {plural}"),
                    _ => format!("Can {action} {plural}"),
                };
                NewPermission::new(format!("Can {} {}", capitalize(action), capitalize(plural)))
                    .with_slug(format!("{action}{separator}{plural}"))
                    .with_description(description)
                    .with_model(*model)
            })
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Insert each catalogue entry whose slug is not stored yet
///
/// Returns how many were inserted; running it again inserts nothing.
pub fn seed<S: PermissionStore + ?Sized>(store: &S, separator: char) -> CanResult<usize> {
    let mut inserted = 0;
    for permission in default_permissions(separator) {
        let slug = permission.slug.clone().unwrap_or_default();
        if store.find_by_slug(&slug)?.is_some() {
            continue;
        }
        store.insert(permission)?;
        inserted += 1;
    }
    info!(inserted, "Seeded default permissions");
    Ok(inserted)
}
