/*!
 * Can - Demo Entry Point
 *
 * Seeds the default permissions into memory, attaches the references given
 * on the command line to a demo user and prints the outcome as JSON:
 *
 * ```text
 * can "create.users,edit.users" canDeleteUsers
 * ```
 *
 * Arguments starting with `can` followed by an uppercase letter are treated
 * as name-based checks instead of references.
 */

use can_permissions::core::limits::METHOD_MARKER;
use can_permissions::permissions::seed;
use can_permissions::{init_tracing, CanConfig, MemoryRepository, PermissionResolver, Subject};
use miette::IntoDiagnostic;
use std::sync::Arc;
use tracing::info;

fn is_method_name(arg: &str) -> bool {
    arg.strip_prefix(METHOD_MARKER)
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_uppercase)
}

fn main() -> miette::Result<()> {
    init_tracing();

    let config = CanConfig::from_env()?;
    let repo = Arc::new(MemoryRepository::new(config.clone()));
    let seeded = seed(repo.as_ref(), config.separator)?;
    info!(seeded, "Memory repository ready");

    let resolver = PermissionResolver::new(Arc::clone(&repo), config);
    let mut user = Subject::new("User", 1);

    let (checks, references): (Vec<String>, Vec<String>) =
        std::env::args().skip(1).partition(|arg| is_method_name(arg));

    let attached = resolver.attach(&mut user, references)?;
    resolver.load_permissions(&mut user)?;

    let mut results = serde_json::Map::new();
    for method in checks {
        let allowed = resolver.check_method(&mut user, &method)?;
        results.insert(method, allowed.into());
    }

    let report = serde_json::json!({
        "attached": attached,
        "permissions": user.slugs(),
        "checks": results,
        "queries": repo.stats(),
    });
    println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
    Ok(())
}
