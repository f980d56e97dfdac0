//! Integration tests for the training store.
//!
//! Exercises the store service and db layer against in-memory SQLite.

use std::sync::Arc;

use serde_json::{json, Value};

use trainstore::db::{self, CreateProject, DbPool};
use trainstore::limits::{FixedLimits, StoreLimits};
use trainstore::models::{ItemRange, ProjectType};
use trainstore::services::TrainingStore;
use trainstore::validation::MAX_AUDIO_POINTS;
use trainstore::{Error, Result};

// ============================================================================
// Test Setup Helpers
// ============================================================================

/// Create a test database with the schema applied
async fn setup_test_db() -> DbPool {
    let pool = db::init_pool(":memory:")
        .await
        .expect("Failed to create test database");
    db::initialize_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    pool
}

/// Store backed by default limits
fn default_store(pool: &DbPool) -> TrainingStore {
    TrainingStore::new(pool.clone(), Arc::new(FixedLimits(StoreLimits::default())))
}

fn sound_project(user_id: &str, class_id: &str) -> CreateProject {
    CreateProject {
        user_id: user_id.to_string(),
        class_id: class_id.to_string(),
        project_type: ProjectType::Sounds,
        name: "demo project".to_string(),
        language: "en".to_string(),
        fields: vec![],
        crowd_sourced: false,
    }
}

/// A plausible audio payload of the given length
fn samples(len: usize) -> Value {
    Value::Array((0..len).map(|i| json!((i as f64) * 0.001)).collect())
}

// ============================================================================
// Project CRUD
// ============================================================================

#[tokio::test]
async fn test_project_crud() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;
    assert!(!project.id.is_empty());
    assert_eq!(project.type_tag(), Some(ProjectType::Sounds));
    assert_eq!(project.user_id, "student-1");
    assert!(!project.is_crowd_sourced());

    let fetched = store.get_project(&project.id).await?;
    assert_eq!(fetched.id, project.id);
    assert_eq!(fetched.name, "demo project");

    store
        .delete_entire_project("student-1", "class-1", &project.id)
        .await?;
    assert!(matches!(
        store.get_project(&project.id).await,
        Err(Error::NotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn test_project_lookup_is_scoped_to_owner() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    // Another student (or another class) cannot address the project
    assert!(matches!(
        db::get_project_owned(&pool, "student-2", "class-1", &project.id).await,
        Err(Error::NotFound)
    ));
    assert!(matches!(
        db::get_project_owned(&pool, "student-1", "class-2", &project.id).await,
        Err(Error::NotFound)
    ));
    assert!(db::get_project_owned(&pool, "student-1", "class-1", &project.id)
        .await
        .is_ok());

    // Deleting through the wrong scope fails and leaves the project alone
    assert!(matches!(
        store
            .delete_entire_project("student-2", "class-1", &project.id)
            .await,
        Err(Error::NotFound)
    ));
    assert!(store.get_project(&project.id).await.is_ok());

    Ok(())
}

// ============================================================================
// Labels
// ============================================================================

#[tokio::test]
async fn test_add_label_is_idempotent() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    let labels = store
        .add_label("student-1", "class-1", &project.id, "first")
        .await?;
    assert_eq!(labels, vec!["first".to_string()]);

    let labels = store
        .add_label("student-1", "class-1", &project.id, "second")
        .await?;
    assert_eq!(labels, vec!["first".to_string(), "second".to_string()]);

    // Re-adding must not duplicate
    let labels = store
        .add_label("student-1", "class-1", &project.id, "first")
        .await?;
    assert_eq!(labels, vec!["first".to_string(), "second".to_string()]);

    // Unknown project
    assert!(matches!(
        store
            .add_label("student-1", "class-1", "no-such-project", "first")
            .await,
        Err(Error::NotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn test_label_counts_include_unused_labels() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    for label in ["first", "second", "third", "fourth"] {
        store
            .add_label("student-1", "class-1", &project.id, label)
            .await?;
    }

    for (label, count) in [("first", 3), ("second", 2), ("third", 1)] {
        for _ in 0..count {
            store
                .store_sound_training(&project.id, Some(&samples(100)), label)
                .await?;
        }
    }

    let counts = store.label_counts(&project.id).await?;
    assert_eq!(counts.len(), 4);
    assert_eq!(counts["first"], 3);
    assert_eq!(counts["second"], 2);
    assert_eq!(counts["third"], 1);
    assert_eq!(counts["fourth"], 0);

    Ok(())
}

#[tokio::test]
async fn test_label_counts_ignore_unregistered_labels() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    // No labels registered at all: empty map even with data stored
    store
        .store_sound_training(&project.id, Some(&samples(50)), "mystery")
        .await?;
    let counts = store.label_counts(&project.id).await?;
    assert!(counts.is_empty());

    // A registered label is counted; the unregistered one stays invisible
    store
        .add_label("student-1", "class-1", &project.id, "known")
        .await?;
    store
        .store_sound_training(&project.id, Some(&samples(50)), "known")
        .await?;

    let counts = store.label_counts(&project.id).await?;
    assert_eq!(counts.len(), 1);
    assert_eq!(counts["known"], 1);

    // The unregistered example still counts toward the project total
    assert_eq!(store.count_training(&project.id).await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_label_counts_require_existing_project() {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    assert!(matches!(
        store.label_counts("no-such-project").await,
        Err(Error::NotFound)
    ));
}

// ============================================================================
// Storing training examples
// ============================================================================

#[tokio::test]
async fn test_store_and_get_round_trip() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    let payload = samples(500);
    let stored = store
        .store_sound_training(&project.id, Some(&payload), "fruit")
        .await?;
    assert_eq!(stored.label, "fruit");
    assert_eq!(stored.audio_data.len(), 500);

    let (examples, total) = store.get_sound_training(&project.id, None).await?;
    assert_eq!(total, 1);
    assert_eq!(examples.len(), 1);
    assert_eq!(examples[0].id, stored.id);
    assert_eq!(examples[0].label, "fruit");
    assert_eq!(examples[0].audio_data, stored.audio_data);

    assert_eq!(store.count_training(&project.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_store_training_requires_existing_project() {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let result = store
        .store_sound_training("no-such-project", Some(&samples(10)), "label")
        .await;
    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_validation_rejects_bad_payloads_without_persisting() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    assert!(matches!(
        store.store_sound_training(&project.id, None, "x").await,
        Err(Error::MissingData)
    ));
    assert!(matches!(
        store
            .store_sound_training(&project.id, Some(&json!([])), "x")
            .await,
        Err(Error::EmptyData)
    ));
    assert!(matches!(
        store
            .store_sound_training(&project.id, Some(&json!([1, 2, " "])), "x")
            .await,
        Err(Error::InvalidData)
    ));
    assert!(matches!(
        store
            .store_sound_training(&project.id, Some(&samples(MAX_AUDIO_POINTS + 1)), "x")
            .await,
        Err(Error::TooLong)
    ));

    // Nothing was persisted for any rejected submission
    assert_eq!(store.count_training(&project.id).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_maximum_length_payload_is_accepted() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    let stored = store
        .store_sound_training(&project.id, Some(&samples(MAX_AUDIO_POINTS)), "big")
        .await?;
    assert_eq!(stored.audio_data.len(), MAX_AUDIO_POINTS);
    assert_eq!(store.count_training(&project.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_limit_is_enforced_per_project() -> Result<()> {
    let pool = setup_test_db().await;
    let store = TrainingStore::new(
        pool.clone(),
        Arc::new(FixedLimits(StoreLimits {
            sound_training_items_per_project: 2,
            ..StoreLimits::default()
        })),
    );

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    store
        .store_sound_training(&project.id, Some(&samples(20)), "label")
        .await?;
    store
        .store_sound_training(&project.id, Some(&samples(20)), "label")
        .await?;

    let third = store
        .store_sound_training(&project.id, Some(&samples(20)), "label")
        .await;
    assert!(matches!(third, Err(Error::LimitExceeded)));

    // The rejected submission was not persisted
    assert_eq!(store.count_training(&project.id).await?, 2);

    // A different project under the same limits is unaffected
    let other = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;
    store
        .store_sound_training(&other.id, Some(&samples(20)), "label")
        .await?;
    assert_eq!(store.count_training(&other.id).await?, 1);

    Ok(())
}

// ============================================================================
// Listing and pagination
// ============================================================================

#[tokio::test]
async fn test_listing_preserves_insertion_order() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    let mut ids = Vec::new();
    for i in 0..6 {
        let stored = store
            .store_sound_training(&project.id, Some(&samples(10)), &format!("label-{}", i % 2))
            .await?;
        ids.push(stored.id);
    }

    let (examples, total) = store.get_sound_training(&project.id, None).await?;
    assert_eq!(total, 6);
    let listed: Vec<String> = examples.into_iter().map(|e| e.id).collect();
    assert_eq!(listed, ids);

    Ok(())
}

#[tokio::test]
async fn test_pagination_slices_and_clamps() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    for i in 0..20 {
        store
            .store_sound_training(&project.id, Some(&samples(10)), &format!("label-{}", i % 4))
            .await?;
    }

    let range = ItemRange::parse("items=0-9")?;
    let (page, total) = store.get_sound_training(&project.id, Some(range)).await?;
    assert_eq!(page.len(), 10);
    assert_eq!(total, 20);
    assert_eq!(range.content_range(total), "items 0-9/20");

    let tail = ItemRange::parse("items=15-30")?;
    let (page, total) = store.get_sound_training(&project.id, Some(tail)).await?;
    assert_eq!(page.len(), 5);
    assert_eq!(tail.content_range(total), "items 15-19/20");

    // A range entirely beyond the data yields an empty slice
    let beyond = ItemRange::parse("items=40-49")?;
    let (page, _) = store.get_sound_training(&project.id, Some(beyond)).await?;
    assert!(page.is_empty());

    Ok(())
}

// ============================================================================
// Deleting training examples
// ============================================================================

#[tokio::test]
async fn test_delete_training_is_scoped_to_project() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project_a = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;
    let project_b = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    let kept = store
        .store_sound_training(&project_a.id, Some(&samples(10)), "label")
        .await?;

    // Deleting through the wrong project id fails and leaves the row intact
    assert!(matches!(
        store.delete_sound_training(&project_b.id, &kept.id).await,
        Err(Error::NotFound)
    ));
    assert!(matches!(
        store
            .delete_sound_training("no-such-project", &kept.id)
            .await,
        Err(Error::NotFound)
    ));
    assert_eq!(store.count_training(&project_a.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_delete_training_removes_exactly_one_example() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    let first = store
        .store_sound_training(&project.id, Some(&samples(10)), "label")
        .await?;
    let second = store
        .store_sound_training(&project.id, Some(&samples(10)), "label")
        .await?;

    store.delete_sound_training(&project.id, &second.id).await?;

    let (examples, total) = store.get_sound_training(&project.id, None).await?;
    assert_eq!(total, 1);
    assert_eq!(examples[0].id, first.id);
    assert_eq!(examples[0].audio_data, first.audio_data);

    // Deleting the same example again is NotFound
    assert!(matches!(
        store.delete_sound_training(&project.id, &second.id).await,
        Err(Error::NotFound)
    ));

    Ok(())
}

// ============================================================================
// Cascading deletes
// ============================================================================

#[tokio::test]
async fn test_delete_project_cascades() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let project = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;

    for label in ["animal", "vegetable", "mineral"] {
        store
            .add_label("student-1", "class-1", &project.id, label)
            .await?;
    }
    store
        .store_sound_training(&project.id, Some(&samples(10)), "vegetable")
        .await?;
    store
        .store_sound_training(&project.id, Some(&samples(10)), "animal")
        .await?;
    store
        .store_sound_training(&project.id, Some(&samples(10)), "animal")
        .await?;

    store
        .delete_entire_project("student-1", "class-1", &project.id)
        .await?;

    assert!(matches!(
        store.get_project(&project.id).await,
        Err(Error::NotFound)
    ));
    assert_eq!(store.count_training(&project.id).await?, 0);
    assert!(db::list_labels(&pool, &project.id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_delete_entire_user_cascades() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let mine_1 = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;
    let mine_2 = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;
    let theirs = store
        .store_project(sound_project("student-2", "class-1"))
        .await?;

    for project in [&mine_1, &mine_2, &theirs] {
        store
            .store_sound_training(&project.id, Some(&samples(10)), "label")
            .await?;
    }

    store.delete_entire_user("student-1", "class-1").await?;

    assert!(matches!(
        store.get_project(&mine_1.id).await,
        Err(Error::NotFound)
    ));
    assert!(matches!(
        store.get_project(&mine_2.id).await,
        Err(Error::NotFound)
    ));
    assert_eq!(store.count_training(&mine_1.id).await?, 0);

    // Other students in the class keep their projects
    assert!(store.get_project(&theirs.id).await.is_ok());
    assert_eq!(store.count_training(&theirs.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_delete_class_resources_cascades() -> Result<()> {
    let pool = setup_test_db().await;
    let store = default_store(&pool);

    let in_class = store
        .store_project(sound_project("student-1", "class-1"))
        .await?;
    let other_class = store
        .store_project(sound_project("student-9", "class-2"))
        .await?;

    store
        .store_sound_training(&in_class.id, Some(&samples(10)), "label")
        .await?;
    store
        .store_sound_training(&other_class.id, Some(&samples(10)), "label")
        .await?;

    store.delete_class_resources("class-1").await?;

    assert!(matches!(
        store.get_project(&in_class.id).await,
        Err(Error::NotFound)
    ));
    assert_eq!(store.count_training(&in_class.id).await?, 0);

    assert!(store.get_project(&other_class.id).await.is_ok());
    assert_eq!(store.count_training(&other_class.id).await?, 1);

    Ok(())
}
