//! Cross-crate scenarios over the in-memory adapters.
//!
//! Session → gate → roster engine → mutation coordinator, wired the way a
//! front end would wire them.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use roster_auth::{
        AuthorizationState, Decision, Identity, IdentityProvider, Role, RoleAdminError, RoleAdministrator,
        RoleAssignment, RoleResolutionError, RoleSet, Route, SessionStore, visible_routes,
    };
    use roster_core::UserId;
    use roster_directory::{
        DepartmentCatalog, DepartmentDraft, EmployeeDraft, EmployeeStatus, MutationCoordinator, RosterEngine,
        RosterStats, RosterStore,
    };

    use crate::{InMemoryDepartmentStore, InMemoryIdentityProvider, InMemoryRosterStore, RosterConfig};

    struct Roster {
        store: Arc<InMemoryRosterStore>,
        engine: Arc<RosterEngine>,
        coordinator: MutationCoordinator,
    }

    async fn roster(employees: usize) -> Roster {
        roster_observability::init_default();

        let store = Arc::new(InMemoryRosterStore::new());
        for n in 1..=employees {
            store.seed(
                EmployeeDraft::new(format!("Employee {n:02}"), format!("e{n}@example.com"), "Engineer")
                    .with_department(if n % 2 == 0 { "Engineering" } else { "Sales" }),
            );
        }
        let config = RosterConfig::default();
        let engine = Arc::new(RosterEngine::new(store.clone(), config.initial_query()));
        engine.refresh().await.unwrap();
        let coordinator = MutationCoordinator::new(store.clone(), engine.clone());

        Roster {
            store,
            engine,
            coordinator,
        }
    }

    /// Holds role resolution for selected users until released.
    #[derive(Default)]
    struct GatedProvider {
        inner: InMemoryIdentityProvider,
        gates: Mutex<HashMap<UserId, oneshot::Receiver<()>>>,
    }

    impl GatedProvider {
        fn hold(&self, user_id: UserId) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(user_id, rx);
            tx
        }
    }

    #[async_trait]
    impl IdentityProvider for GatedProvider {
        async fn current_identity(&self) -> Result<Option<Identity>, RoleResolutionError> {
            self.inner.current_identity().await
        }

        async fn resolve_roles(&self, user_id: UserId) -> Result<Vec<RoleAssignment>, RoleResolutionError> {
            let gate = self.gates.lock().unwrap().remove(&user_id);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.inner.resolve_roles(user_id).await
        }
    }

    fn highest(state: &AuthorizationState) -> Option<Role> {
        state.roles().map(RoleSet::highest)
    }

    #[tokio::test]
    async fn deleting_a_full_first_page_leaves_an_empty_roster() {
        let r = roster(10).await;
        r.engine.select_all(true);

        let notice = r.coordinator.delete_selected().await.unwrap();

        assert_eq!(notice.message, "10 employee(s) deleted successfully");
        let view = r.engine.view();
        assert_eq!(view.query.page, 1);
        assert!(view.rows.is_empty());
        assert_eq!(view.total_count, 0);
        assert!(r.store.is_empty());
    }

    #[tokio::test]
    async fn deleting_one_of_ten_keeps_page_one() {
        let r = roster(10).await;
        let first = r.engine.view().rows[0].id;

        let notice = r.coordinator.delete(first).await.unwrap();

        assert_eq!(notice.message, "Employee deleted successfully");
        let view = r.engine.view();
        assert_eq!(view.query.page, 1);
        assert_eq!(view.total_count, 9);
        assert_eq!(view.rows.len(), 9);
    }

    #[tokio::test]
    async fn deleting_the_only_row_on_page_two_returns_to_page_one() {
        let r = roster(11).await;
        r.engine.set_page(2).await.unwrap();
        let view = r.engine.view();
        assert_eq!(view.rows.len(), 1);

        r.coordinator.delete(view.rows[0].id).await.unwrap();

        let view = r.engine.view();
        assert_eq!(view.query.page, 1);
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.page_count(), 1);
    }

    #[tokio::test]
    async fn bulk_status_change_updates_rows_and_clears_selection() {
        let r = roster(6).await;
        let picked: Vec<_> = r.engine.view().rows.iter().take(3).map(|row| row.id).collect();
        for id in &picked {
            assert!(r.engine.select(*id, true));
        }

        let notice = r.coordinator.set_status_selected(EmployeeStatus::OnLeave).await.unwrap();

        assert_eq!(notice.message, "3 employee(s) status updated to on_leave");
        let view = r.engine.view();
        assert!(view.selection.is_empty());
        for id in picked {
            let row = view.rows.iter().find(|row| row.id == id).unwrap();
            assert_eq!(row.status, EmployeeStatus::OnLeave);
        }
    }

    #[tokio::test]
    async fn rows_deleted_elsewhere_surface_as_partial_failure() {
        let r = roster(4).await;
        r.engine.select_all(true);
        let gone = r.engine.view().rows[0].id;
        r.store.delete_by_id(gone).await.unwrap();

        let err = r.coordinator.delete_selected().await.unwrap_err();

        assert_eq!(err.rejected_ids(), &[gone]);
        assert!(r.engine.selection().is_empty());
        assert_eq!(r.engine.view().total_count, 0);
    }

    #[tokio::test]
    async fn later_sign_in_wins_over_slow_role_lookup() {
        let provider = Arc::new(GatedProvider::default());
        let a = Identity::new(UserId::new(), "a@example.com");
        let b = Identity::new(UserId::new(), "b@example.com");
        provider.inner.assign(a.id, vec![RoleAssignment::new(Role::Admin)]);
        provider.inner.assign(b.id, vec![RoleAssignment::new(Role::Employee)]);
        let release_a = provider.hold(a.id);

        let session = SessionStore::new(provider.clone());
        tokio::join!(session.handle_event(provider.inner.sign_in(a)), async {
            session.handle_event(provider.inner.sign_in(b.clone())).await;
            let _ = release_a.send(());
        });

        assert_eq!(session.identity(), Some(b));
        assert_eq!(highest(&session.current()), Some(Role::Employee));
        assert_eq!(Route::UserManagement.decide(&session.current()), Decision::Deny);
    }

    #[tokio::test]
    async fn user_without_assignments_gets_employee_routes_only() {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let session = SessionStore::new(provider.clone());
        let user = Identity::new(UserId::new(), "new@example.com");

        let state = session.handle_event(provider.sign_in(user)).await;

        assert_eq!(highest(&state), Some(Role::Employee));
        assert_eq!(visible_routes(&state), vec![Route::Dashboard, Route::Profile]);
    }

    #[tokio::test]
    async fn restored_manager_session_opens_roster_routes() {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let manager = Identity::new(UserId::new(), "m@example.com");
        provider.assign(manager.id, vec![RoleAssignment::new(Role::Manager)]);
        provider.sign_in(manager);

        let session = SessionStore::new(provider.clone());
        assert_eq!(Route::Employees.decide(&session.current()), Decision::Pending);

        let state = session.restore().await;
        assert_eq!(Route::Employees.decide(&state), Decision::Allow);
        assert_eq!(Route::Settings.decide(&state), Decision::Deny);
    }

    #[tokio::test]
    async fn admin_demoting_themselves_loses_admin_routes() {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let admin = Identity::new(UserId::new(), "root@example.com");
        let other = UserId::new();
        provider.assign(admin.id, vec![RoleAssignment::new(Role::Admin)]);

        let session = Arc::new(SessionStore::new(provider.clone()));
        session.handle_event(provider.sign_in(admin.clone())).await;
        let administrator = RoleAdministrator::new(provider.clone(), session.clone());

        administrator.set_role(other, RoleAssignment::new(Role::Manager)).await.unwrap();
        assert_eq!(provider.resolve_roles(other).await.unwrap()[0].role, Role::Manager);

        administrator.set_role(admin.id, RoleAssignment::new(Role::Employee)).await.unwrap();
        assert_eq!(highest(&session.current()), Some(Role::Employee));

        let err = administrator.set_role(other, RoleAssignment::new(Role::Admin)).await.unwrap_err();
        assert_eq!(err, RoleAdminError::Forbidden);
    }

    #[tokio::test]
    async fn admin_sees_every_known_user_with_effective_role() {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let admin = Identity::new(UserId::new(), "root@example.com");
        let newcomer = Identity::new(UserId::new(), "new@example.com");
        provider.assign(admin.id, vec![RoleAssignment::new(Role::Admin)]);
        provider.register(newcomer.clone());

        let session = Arc::new(SessionStore::new(provider.clone()));
        session.handle_event(provider.sign_in(admin)).await;
        let administrator = RoleAdministrator::new(provider.clone(), session);

        let users = administrator.list_users().await.unwrap();
        let roles: Vec<(&str, Role)> = users.iter().map(|u| (u.email.as_str(), u.role)).collect();
        assert_eq!(roles, vec![("new@example.com", Role::Employee), ("root@example.com", Role::Admin)]);
    }

    #[tokio::test]
    async fn dashboard_stats_and_departments_agree() {
        let r = roster(5).await;
        let departments = Arc::new(InMemoryDepartmentStore::with_roster(r.store.clone()));
        let catalog = DepartmentCatalog::new(departments.clone());
        catalog.create(DepartmentDraft::new("Sales")).await.unwrap();
        catalog.create(DepartmentDraft::new("Engineering")).await.unwrap();

        let listings = catalog.list().await.unwrap();
        let counts: Vec<(String, u64)> = listings
            .into_iter()
            .map(|l| (l.department.name, l.member_count))
            .collect();
        assert_eq!(counts, vec![("Engineering".to_string(), 2), ("Sales".to_string(), 3)]);

        let stats = RosterStats::load(r.store.as_ref(), departments.as_ref()).await.unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.departments, 2);
        assert_eq!(stats.by_department.get("Sales"), Some(&3));
    }
}
