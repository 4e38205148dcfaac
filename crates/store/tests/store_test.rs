//! Store integration tests over shared storage.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_test::assert_ok;

use common::BusConfig;
use domain::{ElderlyProfile, Task, User};
use store::{
    ChangeBus, ChangeNotice, EntityKind, EntityStore, FileStorage, KeyValueStorage, MemoryStorage,
    SeedData,
};

fn seed() -> SeedData {
    let today = Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap();
    SeedData::generate(today, &mut StdRng::seed_from_u64(42))
}

#[tokio::test]
async fn test_open_seeds_only_absent_slots() {
    let storage = MemoryStorage::new();
    assert_ok!(
        storage
            .set(EntityKind::Profiles.storage_key(), "[]".to_string())
            .await
    );

    let store = EntityStore::open(Arc::new(storage), Some(seed())).await.unwrap();

    assert_eq!(store.read::<User>().await.unwrap().len(), 4);
    assert!(store.read::<ElderlyProfile>().await.unwrap().is_empty());
    assert!(!store.read::<Task>().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reopen_does_not_reseed() {
    let storage = MemoryStorage::new();
    let first = EntityStore::open(Arc::new(storage.clone()), Some(seed())).await.unwrap();
    first.write::<Task>(&[]).await.unwrap();

    let second = EntityStore::open(Arc::new(storage), Some(seed())).await.unwrap();
    assert!(second.read::<Task>().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_file_storage_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();

    let store = EntityStore::open(Arc::new(FileStorage::open(dir.path()).await.unwrap()), Some(seed()))
        .await
        .unwrap();
    store.set_session("u2").await.unwrap();
    store.set_theme("dark").await.unwrap();

    let reopened = EntityStore::new(Arc::new(FileStorage::open(dir.path()).await.unwrap()));
    assert_eq!(reopened.session().await.unwrap(), Some("u2".to_string()));
    assert_eq!(reopened.theme().await.unwrap(), Some("dark".to_string()));
    assert_eq!(
        reopened.read::<User>().await.unwrap(),
        store.read::<User>().await.unwrap()
    );
}

#[tokio::test]
async fn test_reset_reseeds_and_signs_out() {
    let store = EntityStore::open(Arc::new(MemoryStorage::new()), Some(seed()))
        .await
        .unwrap();
    store.write::<User>(&[]).await.unwrap();
    store.set_session("admin_user").await.unwrap();

    let fresh = seed();
    store.reset(Some(&fresh)).await.unwrap();

    assert_eq!(store.session().await.unwrap(), None);
    assert_eq!(store.read::<User>().await.unwrap(), fresh.users);
}

#[tokio::test]
async fn test_write_in_one_context_is_announced_to_another() {
    let storage = MemoryStorage::new();
    let bus = ChangeBus::new(&BusConfig::default());

    let writer_store = EntityStore::new(Arc::new(storage.clone()));
    let writer = bus.connect();
    let reader_store = EntityStore::new(Arc::new(storage));
    let mut reader = bus.connect().subscribe();

    let users = seed().users;
    writer_store.write(&users).await.unwrap();
    writer.publish(EntityKind::Users);

    assert_eq!(
        reader.recv().await,
        Some(ChangeNotice::Updated(EntityKind::Users))
    );
    assert_eq!(reader_store.read::<User>().await.unwrap(), users);
}
