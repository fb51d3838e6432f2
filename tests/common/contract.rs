//! Behaviour every `KeyedRepository` must show, whatever the backing store.

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;

use r4gmi_users::{Fields, KeyedRepository, NewUser, RecordId, RepositoryError, Table, User};

/// Read model of the `items` table: nullable non-text columns and custom
/// id/created-at column names.
#[derive(Debug, Clone, PartialEq, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub item_id: RecordId,
    pub label: Option<String>,
    pub qty: Option<i64>,
    pub due: Option<DateTime<Utc>>,
    pub inserted_at: DateTime<Utc>,
}

pub fn items_table() -> Table {
    Table::new("items").with_id_column("item_id").with_created_at_column("inserted_at")
}

fn user_fields(name: &str) -> Fields {
    NewUser::new(name, format!("{}@example.com", name.to_lowercase())).unwrap().to_fields()
}

pub async fn added_record_reads_back<R: KeyedRepository<Record = User>>(repo: &R) {
    let id = repo.add_one(user_fields("Alice")).await.unwrap();

    let user = repo.find_one_by_id(id).await.unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
}

pub async fn ids_are_unique_and_increasing<R: KeyedRepository<Record = User>>(repo: &R) {
    let mut ids = Vec::new();
    for name in ["A", "B", "C", "D"] {
        ids.push(repo.add_one(user_fields(name)).await.unwrap());
    }

    assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids not increasing: {:?}", ids);
}

pub async fn find_all_is_newest_first<R: KeyedRepository<Record = User>>(repo: &R) {
    for name in ["One", "Two", "Three", "Four", "Five"] {
        repo.add_one(user_fields(name)).await.unwrap();
    }

    let users = repo.find_all().await.unwrap();
    assert_eq!(users.len(), 5);
    assert!(users.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Five", "Four", "Three", "Two", "One"]);
}

pub async fn find_all_on_empty_store_is_empty<R: KeyedRepository<Record = User>>(repo: &R) {
    assert!(repo.find_all().await.unwrap().is_empty());
}

pub async fn unknown_id_is_not_found<R: KeyedRepository<Record = User>>(repo: &R) {
    let id = repo.add_one(user_fields("Alice")).await.unwrap();
    let missing: RecordId = id + 1000;

    let err = repo.find_one_by_id(missing).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(i) if i == missing));
}

pub async fn update_sets_fields_and_keeps_identity<R: KeyedRepository<Record = User>>(repo: &R) {
    let id = repo.add_one(user_fields("Alice")).await.unwrap();
    let before = repo.find_one_by_id(id).await.unwrap();

    let mut data = Fields::new();
    data.insert("name".into(), json!("Alicia"));
    repo.update(id, data).await.unwrap();

    let after = repo.find_one_by_id(id).await.unwrap();
    assert_eq!(after.name, "Alicia");
    assert_eq!(after.email, before.email);
    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
}

pub async fn update_of_missing_id_is_a_silent_no_op<R: KeyedRepository<Record = User>>(repo: &R) {
    let id = repo.add_one(user_fields("Alice")).await.unwrap();
    let before = repo.find_all().await.unwrap();

    let mut data = Fields::new();
    data.insert("name".into(), json!("Ghost"));
    repo.update(id + 1000, data).await.unwrap();

    assert_eq!(repo.find_all().await.unwrap(), before);
}

pub async fn empty_update_changes_nothing<R: KeyedRepository<Record = User>>(repo: &R) {
    let id = repo.add_one(user_fields("Alice")).await.unwrap();
    let before = repo.find_one_by_id(id).await.unwrap();

    repo.update(id, Fields::new()).await.unwrap();

    assert_eq!(repo.find_one_by_id(id).await.unwrap(), before);
}

pub async fn store_assigned_columns_are_not_writable<R: KeyedRepository<Record = User>>(repo: &R) {
    let id = repo.add_one(user_fields("Alice")).await.unwrap();
    let before = repo.find_one_by_id(id).await.unwrap();

    let mut data = Fields::new();
    data.insert("created_at".into(), json!("2000-01-01T00:00:00Z"));
    let err = repo.update(id, data.clone()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ImmutableField(ref c) if c == "created_at"));

    let mut insert = user_fields("Bob");
    insert.extend(data);
    assert!(matches!(repo.add_one(insert).await, Err(RepositoryError::ImmutableField(_))));

    assert_eq!(repo.find_one_by_id(id).await.unwrap(), before);
    assert_eq!(repo.find_all().await.unwrap().len(), 1);
}

pub async fn typed_columns_round_trip<R: KeyedRepository<Record = Item>>(repo: &R) {
    let mut data = Fields::new();
    data.insert("label".into(), json!("bolts"));
    data.insert("qty".into(), json!(null));
    data.insert("due".into(), json!(null));
    let id = repo.add_one(data).await.unwrap();

    let created = repo.find_one_by_id(id).await.unwrap();
    assert_eq!(created.item_id, id);
    assert_eq!(created.label.as_deref(), Some("bolts"));
    assert_eq!(created.qty, None);
    assert_eq!(created.due, None);

    let mut data = Fields::new();
    data.insert("qty".into(), json!(12));
    data.insert("due".into(), json!("2030-01-01T00:00:00Z"));
    repo.update(id, data).await.unwrap();

    let updated = repo.find_one_by_id(id).await.unwrap();
    assert_eq!(updated.qty, Some(12));
    assert_eq!(updated.due, Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()));
    assert_eq!(updated.label, created.label);
    assert_eq!(updated.inserted_at, created.inserted_at);

    let mut data = Fields::new();
    data.insert("qty".into(), json!(null));
    repo.update(id, data).await.unwrap();

    let cleared = repo.find_one_by_id(id).await.unwrap();
    assert_eq!(cleared.qty, None);
    assert_eq!(cleared.due, updated.due);
}

pub async fn empty_mapping_inserts_defaults<R: KeyedRepository<Record = Item>>(repo: &R) {
    let first = repo.add_one(Fields::new()).await.unwrap();
    let second = repo.add_one(Fields::new()).await.unwrap();
    assert!(first < second);

    let item = repo.find_one_by_id(second).await.unwrap();
    assert_eq!(item.item_id, second);
    assert_eq!((item.label, item.qty, item.due), (None, None, None));

    let ids: Vec<_> = repo.find_all().await.unwrap().iter().map(|i| i.item_id).collect();
    assert_eq!(ids, vec![second, first]);
}

pub async fn custom_store_assigned_columns_are_not_writable<R: KeyedRepository<Record = Item>>(repo: &R) {
    let id = repo.add_one(Fields::new()).await.unwrap();

    let mut data = Fields::new();
    data.insert("item_id".into(), json!(id + 1));
    let err = repo.update(id, data).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ImmutableField(ref c) if c == "item_id"));

    let mut data = Fields::new();
    data.insert("inserted_at".into(), json!("2000-01-01T00:00:00Z"));
    assert!(matches!(repo.add_one(data).await, Err(RepositoryError::ImmutableField(ref c)) if c == "inserted_at"));

    assert_eq!(repo.find_all().await.unwrap().len(), 1);
}
