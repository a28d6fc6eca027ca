//! Request-scoped user permission tests
//!
//! Exercises the per-user API that takes a table on every call.

use std::sync::Arc;
use tables_authz::access_control::{
    InMemoryAclStore, PermissionResolver, Scope, StaticGroupMembership, StaticIdentity, TableId,
    TablePermission, TableRole, TablesUserPermissions, UserIdentity,
};
use tables_authz::error::{AccessError, PermissionDeniedError};

fn store() -> InMemoryAclStore {
    let mut store = InMemoryAclStore::new();
    store
        .grant(TableId::new("households"), Scope::Default, TableRole::FilteredReader)
        .grant(
            TableId::new("households"),
            Scope::user("supervisor@example.org"),
            TableRole::UnfilteredWriter,
        )
        .grant(
            TableId::new("visits"),
            Scope::user("alice@example.org"),
            TableRole::FilteredWriter,
        )
        .grant(
            TableId::new("visits"),
            Scope::group("field-staff"),
            TableRole::UnfilteredReader,
        );
    store
}

fn permissions_for(identity: StaticIdentity) -> TablesUserPermissions {
    TablesUserPermissions::for_current_user(&identity, PermissionResolver::new(Arc::new(store())))
}

#[tokio::test]
async fn test_check_permission_returns_ok_when_granted() {
    let mut perms = permissions_for(StaticIdentity::user("alice@example.org"));

    perms
        .check_permission(&TableId::new("households"), TablePermission::ReadRow)
        .await
        .unwrap();
    perms
        .check_permission(&TableId::new("visits"), TablePermission::WriteRow)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_check_permission_denies_with_table_context() {
    let mut perms = permissions_for(StaticIdentity::user("bob@example.org"));

    let err = perms
        .check_permission(&TableId::new("visits"), TablePermission::ReadRow)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AccessError::PermissionDenied(PermissionDeniedError::Table {
            table: TableId::new("visits"),
            permission: TablePermission::ReadRow,
            user: Some(UserIdentity::new("bob@example.org")),
        })
    );
}

#[tokio::test]
async fn test_has_permission_never_raises_denial() {
    let mut perms = permissions_for(StaticIdentity::anonymous());

    for permission in TablePermission::all() {
        let granted = perms
            .has_permission(&TableId::new("visits"), *permission)
            .await
            .unwrap();
        assert!(!granted);
    }
}

#[tokio::test]
async fn test_check_filter_returns_ok_for_own_row() {
    let mut perms = permissions_for(StaticIdentity::user("alice@example.org"));

    perms
        .check_filter(
            &TableId::new("households"),
            TablePermission::UnfilteredRead,
            "uuid:0001",
            Some(&Scope::user("alice@example.org")),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_check_filter_denies_other_users_row() {
    let mut perms = permissions_for(StaticIdentity::user("alice@example.org"));

    let err = perms
        .check_filter(
            &TableId::new("households"),
            TablePermission::UnfilteredWrite,
            "uuid:0002",
            Some(&Scope::user("bob@example.org")),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AccessError::PermissionDenied(PermissionDeniedError::Row {
            row_id: "uuid:0002".to_string(),
            user: Some(UserIdentity::new("alice@example.org")),
        })
    );
}

#[tokio::test]
async fn test_supervisor_reaches_every_row() {
    let mut perms = permissions_for(StaticIdentity::user("supervisor@example.org"));
    let households = TableId::new("households");

    for filter in [None, Some(Scope::Empty), Some(Scope::user("alice@example.org"))] {
        perms
            .check_filter(
                &households,
                TablePermission::UnfilteredDelete,
                "uuid:0003",
                filter.as_ref(),
            )
            .await
            .unwrap();
    }
    assert_eq!(perms.cached_tables(), 1);
}

#[tokio::test]
async fn test_group_membership_grants_and_scopes() {
    let alice = UserIdentity::new("alice@example.org");
    let groups = StaticGroupMembership::new().with_member(alice.clone(), "field-staff");
    let resolver = PermissionResolver::with_groups(Arc::new(store()), Arc::new(groups));
    let mut perms = TablesUserPermissions::new(Some(alice), resolver);

    assert!(
        perms
            .has_permission(&TableId::new("visits"), TablePermission::UnfilteredRead)
            .await
            .unwrap()
    );
    assert!(perms.has_filter_scope(&Scope::group("field-staff")).await.unwrap());
    assert!(!perms.has_filter_scope(&Scope::group("supervisors")).await.unwrap());
}

#[tokio::test]
async fn test_identity_from_account_username() {
    let identity = UserIdentity::from_account(None, Some("mitch"));
    let perms = permissions_for(StaticIdentity::new(identity));

    assert_eq!(
        perms.user_identity(),
        Some(&UserIdentity::new("username:mitch"))
    );
    assert_eq!(
        perms.scopes().await.unwrap(),
        vec![Scope::Default, Scope::user("username:mitch")]
    );
}

#[tokio::test]
async fn test_anonymous_caller_has_no_user_scope() {
    let mut store = store();
    store.grant(TableId::new("visits"), Scope::User(None), TableRole::Owner);
    let mut perms = TablesUserPermissions::for_current_user(
        &StaticIdentity::anonymous(),
        PermissionResolver::new(Arc::new(store)),
    );

    assert_eq!(perms.scopes().await.unwrap(), vec![Scope::Default]);
    assert!(perms.has_filter_scope(&Scope::Default).await.unwrap());
    assert!(!perms.has_filter_scope(&Scope::User(None)).await.unwrap());

    // A USER grant without a user never reaches an anonymous caller
    assert!(
        !perms
            .has_permission(&TableId::new("visits"), TablePermission::ReadRow)
            .await
            .unwrap()
    );
}
