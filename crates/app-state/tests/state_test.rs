//! Application state tests over real services and in-memory storage.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use app_state::CareState;
use care_service_lib::CareDb;
use common::{AppError, BusConfig, ServiceConfig};
use domain::{
    Gender, NewElderlyProfile, NewTask, TaskPriority, TaskStatus, TaskType, Theme, UserRole,
    PRIMARY_ADMIN_ID,
};
use store::{ChangeBus, ChangeNotice, EntityKind, EntityStore, MemoryStorage, SeedData};

struct Device {
    bus: ChangeBus,
    store: Arc<EntityStore>,
}

impl Device {
    async fn seeded() -> Self {
        let today = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let seed = SeedData::generate(today, &mut StdRng::seed_from_u64(3));
        let store = EntityStore::open(Arc::new(MemoryStorage::new()), Some(seed))
            .await
            .unwrap();
        Self {
            bus: ChangeBus::new(&BusConfig::default()),
            store: Arc::new(store),
        }
    }

    /// A new context (window) on this device
    fn open(&self) -> CareState {
        let db = CareDb::connect(self.store.clone(), &self.bus, ServiceConfig::immediate());
        CareState::for_db(Arc::new(db))
    }
}

fn new_task(title: &str) -> NewTask {
    let at = Utc.with_ymd_and_hms(2026, 3, 10, 6, 0, 0).unwrap();
    NewTask::new(title, "e1", PRIMARY_ADMIN_ID, at, TaskPriority::Medium, TaskType::Meal)
}

async fn signed_in(device: &Device, identifier: &str, password: &str) -> CareState {
    let mut state = device.open();
    state.mount().await.unwrap();
    state.login(identifier, password).await.unwrap();
    state
}

#[tokio::test]
async fn test_mount_signed_out_loads_nothing() {
    let device = Device::seeded().await;
    let mut state = device.open();

    state.mount().await.unwrap();

    assert!(!state.is_authenticated());
    assert!(!state.loading());
    assert!(state.tasks().is_empty());
    assert_eq!(state.theme(), Theme::Light);
}

#[tokio::test]
async fn test_login_loads_sorted_collections() {
    let device = Device::seeded().await;
    let state = signed_in(&device, "admin", "admin").await;

    assert_eq!(state.current_user().unwrap().id, PRIMARY_ADMIN_ID);
    assert!(!state.loading());
    assert_eq!(state.users().len(), 4);
    assert_eq!(state.elderly_profiles().len(), 3);
    assert!(!state.tasks().is_empty());
    assert!(state
        .tasks()
        .windows(2)
        .all(|pair| pair[0].scheduled_at <= pair[1].scheduled_at));
}

#[tokio::test]
async fn test_mount_restores_existing_session() {
    let device = Device::seeded().await;
    signed_in(&device, "mariana", "123").await;

    let mut second_window = device.open();
    second_window.mount().await.unwrap();
    assert_eq!(second_window.current_user().unwrap().id, "u_mariana");
    assert!(!second_window.tasks().is_empty());
}

#[tokio::test]
async fn test_failed_login_keeps_state_signed_out() {
    let device = Device::seeded().await;
    let mut state = device.open();

    let err = state.login("admin", "nope").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!state.is_authenticated());
    assert!(!state.loading());
}

#[tokio::test]
async fn test_signup_signs_in_as_member() {
    let device = Device::seeded().await;
    let mut state = device.open();

    let user = state.signup("Rita", "rita@familia.com", "pw").await.unwrap();
    assert_eq!(user.role, UserRole::Member);
    assert_eq!(state.current_user(), Some(&user));
    assert_eq!(state.users().len(), 5);
}

#[tokio::test]
async fn test_logout_clears_user_and_tasks() {
    let device = Device::seeded().await;
    let mut state = signed_in(&device, "admin", "admin").await;

    state.logout().await.unwrap();
    assert!(!state.is_authenticated());
    assert!(state.tasks().is_empty());

    let mut reopened = device.open();
    reopened.mount().await.unwrap();
    assert!(!reopened.is_authenticated());
}

#[tokio::test]
async fn test_create_task_refreshes_cache() {
    let device = Device::seeded().await;
    let mut state = signed_in(&device, "admin", "admin").await;
    let before = state.tasks().len();

    let task = state.create_task(new_task("Chá de camomila")).await.unwrap();
    assert_eq!(state.tasks().len(), before + 1);
    assert_eq!(state.task(&task.id), Some(&task));
}

#[tokio::test]
async fn test_toggle_assignment_takes_and_releases() {
    let device = Device::seeded().await;
    let mut state = signed_in(&device, "carlos", "123").await;
    let task = state.create_task(new_task("Levar ao médico")).await.unwrap();

    let taken = state.toggle_assignment(&task.id).await.unwrap();
    assert_eq!(taken.assigned_to_id.as_deref(), Some("u2"));
    assert!(state.task(&task.id).unwrap().is_assigned_to("u2"));

    let released = state.toggle_assignment(&task.id).await.unwrap();
    assert_eq!(released.assigned_to_id, None);
}

#[tokio::test]
async fn test_toggle_completion_respects_assignee() {
    let device = Device::seeded().await;
    let mut state = signed_in(&device, "carlos", "123").await;
    let task = state.create_task(new_task("Banho")).await.unwrap();
    state.assign_task(&task.id, Some("u4".to_string())).await.unwrap();

    let err = state.toggle_completion(&task.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(state.task(&task.id).unwrap().status, TaskStatus::Pending);

    state.assign_task(&task.id, None).await.unwrap();
    let err = state.toggle_completion(&task.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    state.toggle_assignment(&task.id).await.unwrap();
    let done = state.toggle_completion(&task.id).await.unwrap();
    assert_eq!(done.status, TaskStatus::Completed);
    assert!(done.completed_at.is_some());

    let reopened = state.toggle_completion(&task.id).await.unwrap();
    assert_eq!(reopened.status, TaskStatus::Pending);
    assert_eq!(reopened.completed_at, None);
}

#[tokio::test]
async fn test_member_cannot_manage_roster() {
    let device = Device::seeded().await;
    let mut state = signed_in(&device, "carlos", "123").await;

    let err = state.delete_user("u4").await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(state.user("u4").is_some());

    let err = state.delete_profile("e1").await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(state.elderly_profile("e1").is_some());
}

#[tokio::test]
async fn test_admin_cannot_change_self_or_primary_admin() {
    let device = Device::seeded().await;
    let mut admin = signed_in(&device, "admin", "admin").await;
    admin.update_user_role("u2", UserRole::Admin).await.unwrap();

    let mut carlos = signed_in(&device, "carlos", "123").await;
    assert!(carlos.current_user().unwrap().is_admin());

    let err = carlos
        .update_user_role(PRIMARY_ADMIN_ID, UserRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = carlos.delete_user("u2").await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_admin_deletes_profile_with_tasks() {
    let device = Device::seeded().await;
    let mut state = signed_in(&device, "admin", "admin").await;

    state.delete_profile("e2").await.unwrap();
    assert!(state.elderly_profile("e2").is_none());
    assert!(state.tasks().iter().all(|t| t.elderly_id != "e2"));

    state.load_all().await.unwrap();
    assert!(state.tasks().iter().all(|t| t.elderly_id != "e2"));
}

#[tokio::test]
async fn test_admin_deletes_user_and_tasks_are_unassigned() {
    let device = Device::seeded().await;
    let mut state = signed_in(&device, "admin", "admin").await;
    let count = state.tasks().len();

    state.delete_user("u4").await.unwrap();
    assert!(state.user("u4").is_none());
    assert_eq!(state.tasks().len(), count);
    assert!(state.tasks().iter().all(|t| !t.is_assigned_to("u4")));
}

#[tokio::test]
async fn test_create_profile_refreshes_profiles() {
    let device = Device::seeded().await;
    let mut state = signed_in(&device, "admin", "admin").await;

    let profile = state
        .create_profile(NewElderlyProfile {
            id: None,
            name: "Tia Lurdes".to_string(),
            gender: Gender::Female,
            avatar_url: None,
            conditions: domain::parse_conditions("Catarata, Osteoporose"),
            notes: String::new(),
        })
        .await
        .unwrap();

    assert_eq!(state.elderly_profiles().len(), 4);
    assert_eq!(state.elderly_profile(&profile.id).unwrap().conditions.len(), 2);
}

#[tokio::test]
async fn test_theme_toggle_persists() {
    let device = Device::seeded().await;
    let mut state = device.open();
    state.mount().await.unwrap();

    assert_eq!(state.toggle_theme().await.unwrap(), Theme::Dark);

    let mut other = device.open();
    other.mount().await.unwrap();
    assert_eq!(other.theme(), Theme::Dark);
}

#[tokio::test]
async fn test_other_window_reloads_on_change() {
    let device = Device::seeded().await;
    let mut writer = signed_in(&device, "admin", "admin").await;
    let mut reader = signed_in(&device, "admin", "admin").await;
    // Drop notices produced while the windows signed in
    reader.process_notifications().await.unwrap();

    let task = writer.create_task(new_task("Nova tarefa")).await.unwrap();
    assert!(reader.task(&task.id).is_none());

    let notice = reader.next_change().await.unwrap();
    assert_eq!(notice, Some(ChangeNotice::Updated(EntityKind::Tasks)));
    assert_eq!(reader.task(&task.id), Some(&task));

    // The writer never hears its own change
    assert!(!writer.process_notifications().await.unwrap());
}

#[tokio::test]
async fn test_signed_out_window_ignores_changes() {
    let device = Device::seeded().await;
    let mut writer = signed_in(&device, "admin", "admin").await;
    let mut idle = device.open();

    writer.create_task(new_task("Outra tarefa")).await.unwrap();

    assert!(!idle.process_notifications().await.unwrap());
    assert!(idle.tasks().is_empty());
}
