//! [`DirectoryRepository`] for [`MemoryStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::MemoryStore;
use crate::domain::ports::{DirectoryRepository, DirectoryRepositoryError};
use crate::domain::{NewUser, Unit, UnitDraft, UnitId, User, UserId, UserProfile};

#[async_trait]
impl DirectoryRepository for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, DirectoryRepositoryError> {
        let directory = self.directory.read().await;
        Ok(directory
            .users
            .values()
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, DirectoryRepositoryError> {
        let directory = self.directory.read().await;
        Ok(directory.users.get(&user_id).map(|stored| stored.user.clone()))
    }

    async fn create_user(
        &self,
        user: &NewUser,
        now: DateTime<Utc>,
    ) -> Result<User, DirectoryRepositoryError> {
        let mut directory = self.directory.write().await;
        if directory.email_taken(user.profile.email(), None) {
            return Err(DirectoryRepositoryError::duplicate_email(user.profile.email()));
        }
        Ok(directory.insert_user(&user.profile, user.password.clone(), now))
    }

    async fn update_user(
        &self,
        user_id: UserId,
        profile: &UserProfile,
    ) -> Result<Option<User>, DirectoryRepositoryError> {
        let mut directory = self.directory.write().await;
        if !directory.users.contains_key(&user_id) {
            return Ok(None);
        }
        if directory.email_taken(profile.email(), Some(user_id)) {
            return Err(DirectoryRepositoryError::duplicate_email(profile.email()));
        }
        Ok(directory.users.get_mut(&user_id).map(|stored| {
            stored.user.name = profile.name().to_owned();
            stored.user.email = profile.email().to_owned();
            stored.user.role = profile.role();
            stored.user.clone()
        }))
    }

    async fn delete_user(&self, user_id: UserId) -> Result<bool, DirectoryRepositoryError> {
        let mut directory = self.directory.write().await;
        if !directory.users.contains_key(&user_id) {
            return Ok(false);
        }
        if self.references_user(user_id).await {
            return Err(DirectoryRepositoryError::user_in_use(user_id));
        }
        directory.users.remove(&user_id);
        for unit in directory.units.values_mut() {
            if unit.training_contact == Some(user_id) {
                unit.training_contact = None;
            }
        }
        Ok(true)
    }

    async fn list_units(&self) -> Result<Vec<Unit>, DirectoryRepositoryError> {
        let directory = self.directory.read().await;
        Ok(directory
            .units
            .values()
            .map(|unit| directory.unit_view(unit))
            .collect())
    }

    async fn create_unit(&self, draft: &UnitDraft) -> Result<Unit, DirectoryRepositoryError> {
        let mut directory = self.directory.write().await;
        ensure_contact_exists(&directory, draft)?;
        let id = directory.insert_unit(draft);
        unit_by_id(&directory, id)
    }

    async fn update_unit(
        &self,
        unit_id: UnitId,
        draft: &UnitDraft,
    ) -> Result<Option<Unit>, DirectoryRepositoryError> {
        let mut directory = self.directory.write().await;
        if !directory.units.contains_key(&unit_id) {
            return Ok(None);
        }
        ensure_contact_exists(&directory, draft)?;
        if let Some(unit) = directory.units.get_mut(&unit_id) {
            unit.name = draft.name().to_owned();
            unit.training_contact = draft.training_contact();
        }
        unit_by_id(&directory, unit_id).map(Some)
    }

    async fn delete_unit(&self, unit_id: UnitId) -> Result<bool, DirectoryRepositoryError> {
        Ok(self.directory.write().await.units.remove(&unit_id).is_some())
    }
}

fn ensure_contact_exists(
    directory: &super::store::Directory,
    draft: &UnitDraft,
) -> Result<(), DirectoryRepositoryError> {
    match draft.training_contact() {
        Some(user_id) if !directory.users.contains_key(&user_id) => {
            Err(DirectoryRepositoryError::unknown_user(user_id))
        }
        _ => Ok(()),
    }
}

fn unit_by_id(
    directory: &super::store::Directory,
    unit_id: UnitId,
) -> Result<Unit, DirectoryRepositoryError> {
    directory
        .units
        .get(&unit_id)
        .map(|unit| directory.unit_view(unit))
        .ok_or_else(|| DirectoryRepositoryError::query(format!("unit {unit_id} vanished")))
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::WorkflowRepository;
    use crate::domain::workflow::initial_task;
    use crate::domain::{ContractDraft, Role};
    use crate::test_support::fixture_timestamp;

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::seeded(fixture_timestamp())
    }

    fn profile(email: &str) -> UserProfile {
        UserProfile::new("Deniz Aksoy", email, Role::Biyomedikal).expect("valid profile")
    }

    #[rstest]
    #[tokio::test]
    async fn seeded_directory_has_one_user_per_role(store: MemoryStore) {
        let users = store.list_users().await.expect("listing");
        let roles: Vec<Role> = users.iter().map(|user| user.role).collect();
        assert_eq!(roles, Role::ALL.to_vec());
        assert_eq!(users[0].id, UserId::new(1));

        let units = store.list_units().await.expect("listing");
        assert_eq!(units[0].trainer_name.as_deref(), Some("Osman Güven"));
        assert_eq!(units[1].trainer_name.as_deref(), Some("Selin Kalite"));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_emails_are_rejected(store: MemoryStore) {
        let err = store
            .create_user(
                &NewUser {
                    profile: profile("ik@hastane.local"),
                    password: None,
                },
                fixture_timestamp(),
            )
            .await
            .expect_err("email taken");
        assert_eq!(err, DirectoryRepositoryError::duplicate_email("ik@hastane.local"));
    }

    #[rstest]
    #[tokio::test]
    async fn updating_a_user_may_keep_their_own_email(store: MemoryStore) {
        let updated = store
            .update_user(UserId::new(3), &profile("ik@hastane.local"))
            .await
            .expect("update")
            .expect("user exists");
        assert_eq!(updated.name, "Deniz Aksoy");
        assert_eq!(updated.role, Role::Biyomedikal);

        let err = store
            .update_user(UserId::new(3), &profile("kalite@hastane.local"))
            .await
            .expect_err("email belongs to someone else");
        assert!(matches!(err, DirectoryRepositoryError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn referenced_users_cannot_be_deleted(store: MemoryStore) {
        let draft = ContractDraft::new("Dr. Ece Tan", "Nöroloji", "2025-04-01", UserId::new(1))
            .expect("valid draft");
        store
            .create_contract(&draft, &initial_task(UserId::new(1)), fixture_timestamp())
            .await
            .expect("contract created");

        let err = store.delete_user(UserId::new(1)).await.expect_err("creator is referenced");
        assert_eq!(err, DirectoryRepositoryError::user_in_use(UserId::new(1)));
        assert!(store.delete_user(UserId::new(7)).await.expect("unreferenced"));
        assert!(!store.delete_user(UserId::new(7)).await.expect("already gone"));
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_training_contact_clears_the_unit_link(store: MemoryStore) {
        assert!(store.delete_user(UserId::new(9)).await.expect("delete"));
        let units = store.list_units().await.expect("listing");
        assert_eq!(units[0].training_contact_user_id, None);
        assert_eq!(units[0].trainer_name, None);
    }

    #[rstest]
    #[tokio::test]
    async fn units_require_an_existing_contact(store: MemoryStore) {
        let draft = UnitDraft::new("Enfeksiyon Kontrol", Some(UserId::new(404))).expect("valid");
        let err = store.create_unit(&draft).await.expect_err("no such user");
        assert_eq!(err, DirectoryRepositoryError::unknown_user(UserId::new(404)));

        let draft = UnitDraft::new("Enfeksiyon Kontrol", None).expect("valid");
        let unit = store.create_unit(&draft).await.expect("created");
        assert_eq!(unit.id, UnitId::new(3));
        assert!(store.delete_unit(unit.id).await.expect("delete"));
        assert!(
            store
                .update_unit(unit.id, &draft)
                .await
                .expect("update")
                .is_none()
        );
    }
}
