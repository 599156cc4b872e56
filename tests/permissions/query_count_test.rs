/*!
 * Query Count Tests
 * Storage round-trips per resolver operation
 */

use super::common::{fixture, fixture_with};
use can_permissions::permissions::QueryStats;
use can_permissions::{CanConfig, PermissionStore, Subject};
use pretty_assertions::assert_eq;

#[test]
fn test_checks_on_loaded_entity_never_query() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    f.resolver.attach(&mut user, "view.users,edit.users").unwrap();
    f.repo.reset_stats();

    f.resolver.has_any(&mut user, "view.users").unwrap();
    f.resolver.has_all(&mut user, "view.users,edit.users").unwrap();
    f.resolver.has(&mut user, [1u64, 2u64], true).unwrap();
    f.resolver.has_slug(&mut user, "edit.users").unwrap();
    f.resolver.check_method(&mut user, "canViewUsers").unwrap();

    assert_eq!(f.repo.stats(), QueryStats::default());
}

#[test]
fn test_first_check_loads_once() {
    let f = fixture();
    let mut user = Subject::new("User", 1);

    f.resolver.has_any(&mut user, "view.users").unwrap();
    f.resolver.has_any(&mut user, "edit.users").unwrap();
    assert_eq!(f.repo.stats(), QueryStats { reads: 1, writes: 0 });
}

#[test]
fn test_attach_handles_single_write() {
    let f = fixture_with(CanConfig::default().with_load_on_update(false));
    let handles = f.repo.all().unwrap();
    let mut user = Subject::new("User", 1);
    f.resolver.load_permissions(&mut user).unwrap();
    f.repo.reset_stats();

    assert!(f.resolver.attach(&mut user, &handles[..]).unwrap());
    assert_eq!(f.repo.stats(), QueryStats { reads: 0, writes: 1 });
}

#[test]
fn test_attach_references_single_lookup() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    f.resolver.load_permissions(&mut user).unwrap();
    f.repo.reset_stats();

    f.resolver
        .attach(&mut user, "view.users,create.users,edit.users,4,5")
        .unwrap();

    // one batched lookup, one write, one reload
    assert_eq!(f.repo.stats(), QueryStats { reads: 2, writes: 1 });
}

#[test]
fn test_detach_single_write() {
    let f = fixture_with(CanConfig::default().with_load_on_update(false));
    let handles = f.repo.all().unwrap();
    let mut user = Subject::new("User", 1);
    f.resolver.attach(&mut user, &handles[..]).unwrap();
    f.resolver.load_permissions(&mut user).unwrap();
    f.repo.reset_stats();

    assert!(f.resolver.detach(&mut user, &handles[..6]).unwrap());
    assert_eq!(f.repo.stats(), QueryStats { reads: 0, writes: 1 });

    f.resolver.load_permissions(&mut user).unwrap();
    assert_eq!(user.slugs().len(), 6);
}

#[test]
fn test_noop_mutations_never_write() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    f.resolver.attach(&mut user, "view.users").unwrap();
    f.repo.reset_stats();

    assert!(!f.resolver.attach(&mut user, "view.users").unwrap());
    assert!(!f.resolver.detach(&mut user, "edit.users").unwrap());
    assert_eq!(f.repo.stats().writes, 0);
}
