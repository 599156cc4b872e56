/*!
 * Reference Normalization
 * Flattens arbitrary caller input into permission references
 */

use super::types::{PermissionId, PermissionInput, PermissionReference};
use crate::core::limits::REFERENCE_DELIMITERS;

/// Flatten `input` into references, preserving encounter order
///
/// Strings split on `,` and `|`; pieces are trimmed and empty pieces
/// dropped. A piece that reads as a key becomes an identifier, anything
/// else a slug. `Null`, negative integers and unsupported shapes are
/// dropped silently. Duplicates are kept.
pub fn normalize_references(input: impl Into<PermissionInput>) -> Vec<PermissionReference> {
    let mut out = Vec::new();
    flatten_into(input.into(), &mut out);
    out
}

fn flatten_into(input: PermissionInput, out: &mut Vec<PermissionReference>) {
    match input {
        PermissionInput::List(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        PermissionInput::Str(raw) => split_into(&raw, out),
        PermissionInput::Int(n) => {
            if let Ok(n) = u64::try_from(n) {
                out.push(PermissionReference::Identifier(PermissionId::Int(n)));
            }
        }
        PermissionInput::Id(id) => out.push(PermissionReference::Identifier(id)),
        PermissionInput::Handle(permission) => out.push(PermissionReference::Handle(permission)),
        PermissionInput::Null | PermissionInput::Unsupported => {}
    }
}

fn split_into(raw: &str, out: &mut Vec<PermissionReference>) {
    for piece in raw.split(&REFERENCE_DELIMITERS[..]) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        out.push(match PermissionId::parse(piece) {
            Some(id) => PermissionReference::Identifier(id),
            None => PermissionReference::Slug(piece.to_string()),
        });
    }
}
