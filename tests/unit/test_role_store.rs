#[cfg(test)]
mod tests {
    use forms_api::models::{EntityId, RoleKind};
    use forms_api::services::{CoreError, GrantOutcome, RoleService};
    use forms_api::storage::{MemoryStorageBackend, StorageBackend};
    use std::sync::Arc;

    fn service() -> (RoleService, Arc<MemoryStorageBackend>) {
        let storage = Arc::new(MemoryStorageBackend::new());
        (RoleService::new(storage.clone()), storage)
    }

    #[tokio::test]
    async fn test_grant_creates_then_replaces() {
        let (roles, storage) = service();
        let form = EntityId::generate();
        let user = EntityId::generate();

        let (outcome, grant) = roles.grant(&form, &user, RoleKind::Editor).await.unwrap();
        assert_eq!(outcome, GrantOutcome::Created);
        assert_eq!(grant.role, RoleKind::Editor);

        let (outcome, grant) = roles.grant(&form, &user, RoleKind::Owner).await.unwrap();
        assert_eq!(outcome, GrantOutcome::Updated);
        assert_eq!(grant.role, RoleKind::Owner);

        // Exactly one row per (form, user), carrying the latest role.
        let stored = storage.list_roles_for_form(&form).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].role, RoleKind::Owner);
    }

    #[tokio::test]
    async fn test_grants_to_different_users_coexist() {
        let (roles, storage) = service();
        let form = EntityId::generate();
        let alice = EntityId::generate();
        let bob = EntityId::generate();

        roles.grant(&form, &alice, RoleKind::Owner).await.unwrap();
        roles.grant(&form, &bob, RoleKind::Editor).await.unwrap();

        assert_eq!(storage.list_roles_for_form(&form).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_revoke_without_grant_fails_and_leaves_storage_unchanged() {
        let (roles, storage) = service();
        let form = EntityId::generate();
        let user = EntityId::generate();

        let result = roles.revoke(&form, &user).await;
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
        assert!(storage.list_roles_for_form(&form).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_revoke_removes_the_grant() {
        let (roles, storage) = service();
        let form = EntityId::generate();
        let user = EntityId::generate();

        roles.grant(&form, &user, RoleKind::Editor).await.unwrap();
        let removed = roles.revoke(&form, &user).await.unwrap();
        assert_eq!(removed.role, RoleKind::Editor);
        assert!(storage.list_roles_for_form(&form).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_grant_cannot_be_revoked() {
        let (roles, storage) = service();
        let form = EntityId::generate();
        let owner = EntityId::generate();

        roles.grant(&form, &owner, RoleKind::Owner).await.unwrap();
        let result = roles.revoke(&form, &owner).await;
        assert!(matches!(result, Err(CoreError::Forbidden(_))));

        // The grant survives.
        let stored = storage.get_form_role(&form, &owner).await.unwrap();
        assert_eq!(stored.unwrap().role, RoleKind::Owner);
    }

    #[tokio::test]
    async fn test_role_lookups() {
        let (roles, _storage) = service();
        let form = EntityId::generate();
        let user = EntityId::generate();

        assert!(!roles.any_role(&form, &user).await.unwrap());

        roles.grant(&form, &user, RoleKind::Editor).await.unwrap();

        assert!(roles.any_role(&form, &user).await.unwrap());
        assert!(roles.has_role(&form, &user, RoleKind::Editor).await.unwrap());
        assert!(!roles.has_role(&form, &user, RoleKind::Owner).await.unwrap());
    }
}
