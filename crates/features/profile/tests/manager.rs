use mqf_domain::{ConfigModel, ErrorKind, RegistryPath};
use mqf_profile::record::{ATTR_JVM_OPTS, ATTR_MINIMUM_INSTANCES, broker_pid};
use mqf_profile::{ProfileManager, ProfileStore, RegistryProfileStore};
use mqf_registry::{MemoryRegistry, Registry};
use std::sync::Arc;

fn setup() -> (MemoryRegistry, Arc<RegistryProfileStore>, ProfileManager) {
    let registry = MemoryRegistry::new();
    let store = Arc::new(RegistryProfileStore::new(Arc::new(registry.clone())));
    let manager = ProfileManager::new(store.clone(), "1.0");
    (registry, store, manager)
}

#[tokio::test]
async fn profile_defaults_to_broker_name_and_default_version() {
    let (registry, store, manager) = setup();
    let cfg = ConfigModel::builder("mq-east").build().unwrap();

    let handle = manager.create_or_update(&cfg).await.unwrap();
    assert_eq!(handle.id, "mq-east");
    assert_eq!(handle.version_scope, "1.0");

    assert!(registry.exists(&RegistryPath::version("1.0").render()).await.unwrap());
    let record = store.get_profile("1.0", "mq-east").await.unwrap().expect("profile stored");
    assert_eq!(
        record.broker_settings("mq-east").and_then(|s| s.get("broker-name")).map(String::as_str),
        Some("mq-east")
    );
}

#[tokio::test]
async fn create_or_update_is_idempotent() {
    let (registry, _store, manager) = setup();
    let cfg = ConfigModel::builder("mq1")
        .profile("mq-group")
        .group("east")
        .jvm_opts("-Xmx512m")
        .minimum_instances(2)
        .property("persistence=kahadb")
        .build()
        .unwrap();

    let first = manager.create_or_update(&cfg).await.unwrap();
    let snapshot = registry.read(&RegistryPath::profile("1.0", "mq-group").render()).await.unwrap();
    let second = manager.create_or_update(&cfg).await.unwrap();
    let again = registry.read(&RegistryPath::profile("1.0", "mq-group").render()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(snapshot, again);
}

#[tokio::test]
async fn update_merges_without_erasing_absent_keys() {
    let (_registry, store, manager) = setup();
    let first = ConfigModel::builder("mq1")
        .data_directory("/data/a")
        .property("a=1")
        .jvm_opts("-Xmx1g")
        .build()
        .unwrap();
    manager.create_or_update(&first).await.unwrap();

    let second = ConfigModel::builder("mq1")
        .property("a=2")
        .property("b=3")
        .minimum_instances(3)
        .build()
        .unwrap();
    manager.create_or_update(&second).await.unwrap();

    let record = store.get_profile("1.0", "mq1").await.unwrap().unwrap();
    let broker = &record.configurations[&broker_pid("mq1")];
    assert_eq!(broker["data"], "/data/a");
    assert_eq!(broker["a"], "2");
    assert_eq!(broker["b"], "3");
    assert_eq!(record.attributes[ATTR_JVM_OPTS], "-Xmx1g");
    assert_eq!(record.attributes[ATTR_MINIMUM_INSTANCES], "3");
}

#[tokio::test]
async fn missing_parent_is_invalid_and_writes_nothing() {
    let (registry, _store, manager) = setup();
    let cfg = ConfigModel::builder("mq1").parent_profile("mq-replicated").build().unwrap();

    let err = manager.create_or_update(&cfg).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    assert_eq!(registry.len(), 0);
}

#[tokio::test]
async fn existing_parent_is_linked_once() {
    let (_registry, store, manager) = setup();
    store.create_version("1.0").await.unwrap();
    store.create_profile("1.0", "mq-base", None).await.unwrap();

    let cfg = ConfigModel::builder("mq1").parent_profile("mq-base").build().unwrap();
    manager.create_or_update(&cfg).await.unwrap();
    manager.create_or_update(&cfg).await.unwrap();

    let record = store.get_profile("1.0", "mq1").await.unwrap().unwrap();
    assert_eq!(record.parents, vec!["mq-base".to_owned()]);
}

#[tokio::test]
async fn unknown_non_default_version_is_invalid() {
    let (_registry, _store, manager) = setup();
    let cfg = ConfigModel::builder("mq1").version("2.0").build().unwrap();
    let err = manager.create_or_update(&cfg).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
}

#[tokio::test]
async fn explicit_existing_version_is_used() {
    let (_registry, store, manager) = setup();
    store.create_version("1.1").await.unwrap();
    let cfg = ConfigModel::builder("mq1").version("1.1").build().unwrap();

    let handle = manager.create_or_update(&cfg).await.unwrap();
    assert_eq!(handle.version_scope, "1.1");
    assert!(store.get_profile("1.0", "mq1").await.unwrap().is_none());
}

#[tokio::test]
async fn new_version_copies_parent_profiles() {
    let (_registry, store, manager) = setup();
    let cfg = ConfigModel::builder("mq1").group("east").build().unwrap();
    manager.create_or_update(&cfg).await.unwrap();

    manager.create_version("1.1", Some("1.0")).await.unwrap();

    let copied = store.get_profile("1.1", "mq1").await.unwrap().expect("profile copied");
    let original = store.get_profile("1.0", "mq1").await.unwrap().unwrap();
    assert_eq!(copied, original);
    assert_eq!(store.list_profiles("1.1").await.unwrap(), vec!["mq1".to_owned()]);
}

#[tokio::test]
async fn version_create_rejects_duplicates_and_missing_parents() {
    let (_registry, _store, manager) = setup();
    manager.create_version("2.0", None).await.unwrap();

    let dup = manager.create_version("2.0", None).await.unwrap_err();
    assert_eq!(dup.kind(), ErrorKind::InvalidConfig);

    let orphan = manager.create_version("2.1", Some("9.9")).await.unwrap_err();
    assert_eq!(orphan.kind(), ErrorKind::InvalidConfig);

    let bad = manager.create_version("2/2", None).await.unwrap_err();
    assert_eq!(bad.kind(), ErrorKind::InvalidConfig);
}
