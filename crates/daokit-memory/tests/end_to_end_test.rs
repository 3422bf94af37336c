//! End-to-end flow: registries, factory and the in-memory DAO together.

mod common;

use common::User;
use daokit_config::{producer, ConfigLoader};
use daokit_core::{Context, DaoError};
use daokit_dao::{CreateRequest, ReadRequest, SharedDao};
use daokit_factory::{DaoFactory, Registries, SingletonDaoFactory};
use daokit_filter::{Expression, Filter};
use daokit_memory::{MemoryConfig, MemoryDao};
use std::fs;
use std::sync::Arc;

type UserFactory = SingletonDaoFactory<String, User, Filter>;

fn registries_with_memory_dao(name: &str) -> (Registries, Arc<MemoryDao<User>>) {
    let registries = Registries::new();
    registries
        .register_producer(name, producer(|_| MemoryConfig::new(10)))
        .unwrap();

    let dao = Arc::new(MemoryDao::<User>::new());
    let shared: SharedDao<String, User, Filter> = dao.clone();
    registries.register_shared_dao(name, shared).unwrap();
    (registries, dao)
}

#[tokio::test]
async fn test_make_create_and_read_back() {
    let (registries, memory) = registries_with_memory_dao("mem");
    let factory: UserFactory = registries.factory();
    let ctx = Context::background();

    let dao = factory.make(&ctx, "mem").await.unwrap();
    assert_eq!(memory.configure_calls(), 1);
    assert_eq!(memory.settings(), Some(MemoryConfig::new(10)));

    let created = dao
        .create(&ctx, CreateRequest::new(User::new("Yev", 30)))
        .await
        .unwrap();
    let key = created.data.and_then(|user| user.id).expect("key assigned");

    let read = dao
        .read(
            &ctx,
            ReadRequest::filtered(Filter::new().field("id", Expression::eq(key))),
        )
        .await
        .unwrap();
    assert_eq!(read.data[0].name, "Yev");

    let again = factory.make(&ctx, "mem").await.unwrap();
    assert!(Arc::ptr_eq(&dao, &again));
    assert_eq!(memory.configure_calls(), 1);

    dao.close().await.unwrap();
}

#[tokio::test]
async fn test_missing_then_existing_name() {
    let (registries, memory) = registries_with_memory_dao("mem");
    let factory: UserFactory = registries.factory();
    let ctx = Context::background();

    let err = factory.make(&ctx, "missing").await.err().unwrap();
    assert!(matches!(err, DaoError::NotFound { .. }));
    assert!(!factory.is_cached().await);
    assert_eq!(memory.configure_calls(), 0);

    factory.make(&ctx, "mem").await.unwrap();
    assert_eq!(factory.bound_name().await.as_deref(), Some("mem"));
    assert_eq!(memory.configure_calls(), 1);
}

#[tokio::test]
async fn test_config_from_files() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("default.toml"), "[mem]\nmax_batch_size = 3\n").unwrap();
    let loader = ConfigLoader::new(dir.path())
        .with_env_prefix("DAOKIT_E2E_FILES")
        .with_environment("test");

    let registries = Registries::new();
    registries
        .register_producer("mem", loader.producer::<MemoryConfig>("mem"))
        .unwrap();
    registries.register_dao("mem", MemoryDao::<User>::new()).unwrap();

    let factory: UserFactory = registries.factory();
    let dao = factory.make(&Context::background(), "mem").await.unwrap();

    let batch: Vec<_> = (0..4).map(|i| User::new("bulk", i)).collect();
    let err = dao
        .bulk_create(
            &Context::background(),
            daokit_dao::BulkCreateRequest::new(batch),
        )
        .await
        .err()
        .unwrap();
    assert!(matches!(err, DaoError::Validation(_)));
}
