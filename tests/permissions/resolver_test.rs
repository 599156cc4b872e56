/*!
 * Resolver Integration Tests
 */

use super::common::{fixture, fixture_with};
use can_permissions::{
    CanConfig, CanError, PermissionId, PermissionInput, PermissionStore, Permissionable, Subject,
};
use pretty_assertions::assert_eq;

#[test]
fn test_example_scenario() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    f.resolver.attach(&mut user, "create.users").unwrap();

    assert!(f.resolver.has(&mut user, "create.users", false).unwrap());
    assert!(!f.resolver.has(&mut user, "delete.users", false).unwrap());

    assert!(f.resolver.attach(&mut user, "delete.users").unwrap());
    assert!(f
        .resolver
        .has_all(&mut user, ["create.users", "delete.users"])
        .unwrap());

    assert!(f.resolver.detach(&mut user, PermissionInput::none()).unwrap());
    assert!(!f.resolver.has_any(&mut user, "create.users").unwrap());
}

#[test]
fn test_attach_by_id_slug_and_handle() {
    let f = fixture();
    let mut user = Subject::new("User", 1);

    assert!(f.resolver.attach(&mut user, 2u64).unwrap());
    assert_eq!(user.slugs(), vec!["create.users"]);

    assert!(f.resolver.attach(&mut user, "3").unwrap());
    assert!(f.resolver.attach(&mut user, "delete.users").unwrap());

    let handle = f.repo.find_by_slug("view.users").unwrap().unwrap();
    assert!(f.resolver.attach(&mut user, &handle).unwrap());

    assert_eq!(
        user.slugs(),
        vec!["create.users", "edit.users", "delete.users", "view.users"]
    );
}

#[test]
fn test_attach_already_attached() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    f.resolver.attach(&mut user, 2u64).unwrap();

    assert!(!f.resolver.attach(&mut user, 2u64).unwrap());
    assert!(!f.resolver.attach(&mut user, "create.users").unwrap());
    assert_eq!(f.repo.assignment_count(&user.entity_ref()), 1);
}

#[test]
fn test_attach_unknown() {
    let f = fixture();
    let mut user = Subject::new("User", 1);

    assert!(!f.resolver.attach(&mut user, 999u64).unwrap());
    assert!(!f.resolver.attach(&mut user, "fly.planes").unwrap());
    assert!(!f.resolver.attach(&mut user, PermissionInput::Null).unwrap());
    assert!(user.slugs().is_empty());
}

#[test]
fn test_attach_many_shapes() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    let handle = f.repo.find_by_slug("restore.users").unwrap().unwrap();

    let input = PermissionInput::List(vec![
        PermissionInput::from(1u64),
        PermissionInput::from("create.users|edit.users"),
        PermissionInput::List(vec![PermissionInput::from(&handle), "fly.planes".into()]),
    ]);
    assert!(f.resolver.attach(&mut user, input).unwrap());
    assert!(f
        .resolver
        .has_all(
            &mut user,
            "view.users,create.users,edit.users,restore.users"
        )
        .unwrap());
    assert_eq!(user.slugs().len(), 4);
}

#[test]
fn test_attach_partially_attached() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    f.resolver.attach(&mut user, "view.users").unwrap();

    assert!(f
        .resolver
        .attach(&mut user, "view.users,edit.users")
        .unwrap());
    assert_eq!(f.repo.assignment_count(&user.entity_ref()), 2);
}

#[test]
fn test_attach_without_reload_keeps_stale_set() {
    let f = fixture_with(CanConfig::default().with_load_on_update(false));
    let mut user = Subject::new("User", 1);

    assert!(f.resolver.attach(&mut user, "view.users").unwrap());
    assert!(user.slugs().is_empty());

    f.resolver.load_permissions(&mut user).unwrap();
    assert_eq!(user.slugs(), vec!["view.users"]);
}

#[test]
fn test_detach_variants() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    f.resolver
        .attach(&mut user, "view.users,create.users,edit.users,delete.users")
        .unwrap();

    assert!(f.resolver.detach(&mut user, 1u64).unwrap());
    assert!(f.resolver.detach(&mut user, "create.users").unwrap());
    assert!(!f.resolver.detach(&mut user, "create.users").unwrap());
    assert!(!f.resolver.detach(&mut user, "fly.planes").unwrap());
    assert!(!f.resolver.detach(&mut user, PermissionInput::Null).unwrap());
    assert_eq!(user.slugs(), vec!["edit.users", "delete.users"]);

    assert!(f
        .resolver
        .detach(&mut user, vec![Vec::<&str>::new()])
        .unwrap());
    assert!(user.slugs().is_empty());
}

#[test]
fn test_detach_all() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    assert!(!f.resolver.detach_all(&mut user).unwrap());

    f.resolver.attach(&mut user, "view.users,edit.users").unwrap();
    assert!(f.resolver.detach_all(&mut user).unwrap());
    assert!(!f.resolver.has_any(&mut user, "view.users,edit.users").unwrap());
    assert!(!f.resolver.detach_all(&mut user).unwrap());
}

#[test]
fn test_detach_leaves_other_entities() {
    let f = fixture();
    let mut alice = Subject::new("User", 1);
    let mut team = Subject::new("Team", 1);
    f.resolver.attach(&mut alice, "view.users").unwrap();
    f.resolver.attach(&mut team, "view.users").unwrap();

    f.resolver.detach_all(&mut alice).unwrap();
    assert!(f.resolver.has_any(&mut team, "view.users").unwrap());
}

#[test]
fn test_sync() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    f.resolver.attach(&mut user, "view.users,edit.users").unwrap();

    f.resolver
        .sync(&mut user, "edit.users,delete.users,fly.planes")
        .unwrap();
    let mut slugs = user.slugs();
    slugs.sort();
    assert_eq!(slugs, vec!["delete.users", "edit.users"]);

    f.resolver.sync(&mut user, PermissionInput::none()).unwrap();
    assert!(user.slugs().is_empty());
}

#[test]
fn test_has_any_and_all() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    f.resolver.attach(&mut user, "view.users,edit.users").unwrap();

    assert!(f.resolver.has_any(&mut user, "fly.planes|edit.users").unwrap());
    assert!(f.resolver.has_any(&mut user, 1u64).unwrap());
    assert!(!f.resolver.has_any(&mut user, "fly.planes").unwrap());

    assert!(f.resolver.has_all(&mut user, [1u64, 3u64]).unwrap());
    assert!(!f.resolver.has_all(&mut user, "view.users,fly.planes").unwrap());
    assert!(f.resolver.has(&mut user, "view.users,edit.users", true).unwrap());
    assert!(!f.resolver.has(&mut user, "view.users,delete.users", true).unwrap());
    assert!(f.resolver.has(&mut user, "view.users,delete.users", false).unwrap());

    let id = PermissionId::Int(3);
    assert!(f.resolver.has_any(&mut user, id).unwrap());
    assert!(f.resolver.has_slug(&mut user, "edit.users").unwrap());
    assert!(!f.resolver.has_slug(&mut user, "edit").unwrap());
}

#[test]
fn test_check_method() {
    let f = fixture();
    let mut user = Subject::new("User", 1);
    f.resolver.attach(&mut user, "create.users").unwrap();

    assert!(f.resolver.check_method(&mut user, "canCreateUsers").unwrap());
    assert!(!f.resolver.check_method(&mut user, "canDeleteUsers").unwrap());

    let err = f
        .resolver
        .check_method(&mut user, "createUsers")
        .unwrap_err();
    assert_eq!(
        err,
        CanError::UnhandledDynamicCall {
            method: "createUsers".into()
        }
    );
}

#[test]
fn test_authorize() {
    let f = fixture();
    let mut user = Subject::new("User", 1).with_policy(|_| true);
    f.resolver.attach(&mut user, "view.users").unwrap();

    assert!(f.resolver.authorize(&mut user, "view.users", false).unwrap());
    assert!(!f.resolver.authorize(&mut user, "edit.users", false).unwrap());
    assert!(!f
        .resolver
        .authorize(&mut user, "view.users,edit.users", true)
        .unwrap());
    // nothing resolves, so the policy decides
    assert!(f.resolver.authorize(&mut user, "publish-post", false).unwrap());
}

#[test]
fn test_sync_without_reload_replaces_stored_edges() {
    let f = fixture_with(CanConfig::default().with_load_on_update(false));
    let mut user = Subject::new("User", 1);
    f.resolver.load_permissions(&mut user).unwrap();
    f.resolver.attach(&mut user, "view.users").unwrap();

    f.resolver.sync(&mut user, "edit.users").unwrap();
    f.resolver.load_permissions(&mut user).unwrap();

    assert_eq!(user.slugs(), vec!["edit.users"]);
    assert_eq!(f.repo.assignment_count(&user.entity_ref()), 1);
}
