use std::collections::HashSet;
use std::sync::Arc;

use jiff::Timestamp;
use stellar_core::{CreateParams, NewUrlRecord, Registry, RegistryError, Repository, ShortId};
use stellar_generator::{RandomGenerator, SeqGenerator};
use stellar_registry::{AllocatorSettings, UrlRegistry};
use stellar_storage::InMemoryRepository;

type TestRegistry = UrlRegistry<InMemoryRepository, RandomGenerator>;

fn registry() -> Arc<TestRegistry> {
    Arc::new(
        UrlRegistry::new(
            InMemoryRepository::new(),
            RandomGenerator::new(),
            AllocatorSettings::default(),
        )
        .unwrap(),
    )
}

#[tokio::test]
async fn create_then_resolve_round_trip() {
    let registry = registry();

    let created = registry
        .create(CreateParams::new("https://example.com/page"))
        .await
        .unwrap();
    let resolved = registry.resolve(&created.short_id).await.unwrap();

    assert_eq!(resolved.original_url, "https://example.com/page");
    assert_eq!(resolved.click_count, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_accesses_are_all_counted() {
    let registry = registry();
    let created = registry
        .create(CreateParams::new("https://example.com").with_alias("popular"))
        .await
        .unwrap();

    // Some accesses before the burst, so the prior count is non-zero.
    for _ in 0..5 {
        registry.record_access(&created.short_id).await.unwrap();
    }

    const N: u64 = 500;
    let mut handles = Vec::new();
    for _ in 0..N {
        let registry = Arc::clone(&registry);
        let short_id = created.short_id.clone();
        handles.push(tokio::spawn(async move {
            registry.record_access(&short_id).await.unwrap()
        }));
    }

    let mut seen_counts = HashSet::new();
    for handle in handles {
        let record = handle.await.unwrap();
        assert!(record.created_at <= record.last_accessed_at);
        seen_counts.insert(record.click_count);
    }

    let record = registry.resolve(&created.short_id).await.unwrap();
    assert_eq!(record.click_count, 5 + N);
    // Every access observed a distinct post-increment value.
    assert_eq!(seen_counts.len() as u64, N);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_creates_with_same_alias_have_one_winner() {
    let registry = registry();

    let mut handles = Vec::new();
    for i in 0..32 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            registry
                .create(
                    CreateParams::new(format!("https://example{i}.com")).with_alias("contested"),
                )
                .await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(record) => winners.push(record),
            Err(err) => assert!(matches!(err, RegistryError::AliasTaken(_)), "{err}"),
        }
    }

    assert_eq!(winners.len(), 1);
    let stored = registry
        .resolve(&ShortId::new("contested").unwrap())
        .await
        .unwrap();
    assert_eq!(stored, winners[0]);
    assert_eq!(registry.repository().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_generated_ids_are_unique() {
    let registry = registry();

    let mut handles = Vec::new();
    for i in 0..200 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            registry
                .create(CreateParams::new(format!("https://example.com/{i}")))
                .await
                .unwrap()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let record = handle.await.unwrap();
        assert_eq!(record.short_id.as_str().len(), 6);
        ids.insert(record.short_id);
    }

    assert_eq!(ids.len(), 200);
    assert_eq!(registry.repository().len(), 200);
}

#[tokio::test]
async fn dense_keyspace_grows_to_longer_ids() {
    let settings = AllocatorSettings::builder()
        .length(4)
        .max_attempts_per_length(2)
        .max_length(8)
        .build();
    let registry = UrlRegistry::new(InMemoryRepository::new(), SeqGenerator::new(), settings)
        .unwrap();

    // Occupy the first ids the sequential generator will propose.
    for taken in ["aaaa", "aaab"] {
        registry
            .repository()
            .insert(NewUrlRecord {
                original_url: "https://taken.example".to_string(),
                short_id: ShortId::new(taken).unwrap(),
                created_at: Timestamp::now(),
            })
            .await
            .unwrap();
    }

    let record = registry
        .create(CreateParams::new("https://example.com/next"))
        .await
        .unwrap();
    assert_eq!(record.short_id.as_str(), "aaaac");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let registry = registry();
    let missing = ShortId::new("never-created").unwrap();

    assert!(matches!(
        registry.resolve(&missing).await,
        Err(RegistryError::NotFound(_))
    ));
    assert!(matches!(
        registry.record_access(&missing).await,
        Err(RegistryError::NotFound(_))
    ));
}
