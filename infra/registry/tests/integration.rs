use mqf_registry::*;
use std::sync::Arc;
use tempfile::TempDir;

async fn open(temp: &TempDir, compression: Compression) -> FsRegistry {
    FsRegistry::builder()
        .root(temp.path().join("registry"))
        .compression(compression)
        .connect()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_malformed_paths_rejected() {
    let temp = TempDir::new().unwrap();
    let registry = open(&temp, Compression::None).await;

    assert!(registry.resolve("relative/node").is_err());
    assert!(registry.resolve("/fabric/../etc").is_err());
    assert!(matches!(
        registry.write("/fabric/.data", "x").await,
        Err(RegistryError::InvalidPath { .. })
    ));
}

#[tokio::test]
async fn test_write_read_roundtrip_compressed() {
    let temp = TempDir::new().unwrap();
    let registry = open(&temp, Compression::Lz4).await;

    let payload = "x".repeat(4096);
    registry.write("/fabric/configs/versions/1.0/profiles/p", &payload).await.unwrap();
    assert_eq!(
        registry.read("/fabric/configs/versions/1.0/profiles/p").await.unwrap(),
        Some(payload)
    );
    assert_eq!(
        registry.read("/fabric/configs/versions/1.0").await.unwrap().as_deref(),
        Some(""),
        "implicit ancestors exist without data"
    );
    assert_eq!(registry.read("/fabric/missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_overwrite_keeps_last_value() {
    let temp = TempDir::new().unwrap();
    let registry = open(&temp, Compression::None).await;

    registry.write("/fabric/configs/default-version", "1.0").await.unwrap();
    registry.write("/fabric/configs/default-version", "1.1").await.unwrap();
    assert_eq!(
        registry.read("/fabric/configs/default-version").await.unwrap().as_deref(),
        Some("1.1")
    );
}

#[tokio::test]
async fn test_delete_is_recursive_and_idempotent() {
    let temp = TempDir::new().unwrap();
    let registry = open(&temp, Compression::None).await;

    registry.write("/fabric/registry/containers/config/c1/ip", "10.0.0.1").await.unwrap();
    registry.write("/fabric/registry/containers/config/c2", "").await.unwrap();

    assert!(registry.delete("/fabric/registry/containers/config/c1").await.unwrap());
    assert!(!registry.exists("/fabric/registry/containers/config/c1/ip").await.unwrap());
    assert!(!registry.delete("/fabric/registry/containers/config/c1").await.unwrap());
    assert_eq!(
        registry.children("/fabric/registry/containers/config").await.unwrap(),
        vec!["c2".to_owned()]
    );
}

#[tokio::test]
async fn test_tree_survives_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let registry = open(&temp, Compression::Lz4).await;
        registry.write("/fabric/configs/containers/c1", "1.0").await.unwrap();
    }

    let registry = open(&temp, Compression::Lz4).await;
    assert_eq!(registry.read("/fabric/configs/containers/c1").await.unwrap().as_deref(), Some("1.0"));
}

#[tokio::test]
async fn test_stale_tmp_files_purged_on_connect() {
    let temp = TempDir::new().unwrap();
    let node = temp.path().join("registry").join("fabric");
    std::fs::create_dir_all(&node).unwrap();
    let stale = node.join(".data.mqftmp.7");
    std::fs::write(&stale, b"partial").unwrap();

    let past = std::time::SystemTime::now() - std::time::Duration::from_secs(600);
    std::fs::File::options().write(true).open(&stale).unwrap().set_modified(past).unwrap();

    let registry = open(&temp, Compression::None).await;
    assert!(!stale.exists());
    assert!(registry.exists("/fabric").await.unwrap(), "node directories are kept");
}

#[tokio::test]
async fn test_backends_agree_through_trait_object() {
    let temp = TempDir::new().unwrap();
    let backends: Vec<Arc<dyn Registry>> =
        vec![Arc::new(MemoryRegistry::new()), Arc::new(open(&temp, Compression::None).await)];

    for registry in backends {
        registry.write("/fabric/configs/versions/1.0/containers/c1", "mq-a").await.unwrap();
        registry.write("/fabric/configs/versions/1.1/containers/c1", "mq-a").await.unwrap();
        assert_eq!(
            registry.children("/fabric/configs/versions").await.unwrap(),
            vec!["1.0".to_owned(), "1.1".to_owned()]
        );
        assert!(registry.delete("/fabric/configs/versions/1.1/containers/c1").await.unwrap());
        assert!(registry.exists("/fabric/configs/versions/1.1").await.unwrap());
        assert!(registry.delete("/").await.is_err());
    }
}

#[tokio::test]
async fn test_missing_root_is_unavailable() {
    let temp = TempDir::new().unwrap();
    let registry = open(&temp, Compression::None).await;
    registry.write("/fabric/configs/default-version", "1.0").await.unwrap();

    std::fs::remove_dir_all(temp.path().join("registry")).unwrap();

    assert!(matches!(
        registry.exists("/fabric/configs/default-version").await,
        Err(RegistryError::Unavailable { .. })
    ));
    assert!(matches!(
        registry.write("/fabric/configs/default-version", "1.1").await,
        Err(RegistryError::Unavailable { .. })
    ));
    assert!(matches!(registry.children("/").await, Err(RegistryError::Unavailable { .. })));
    assert!(!temp.path().join("registry").exists());
}

#[tokio::test]
async fn test_failed_swap_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let registry = open(&temp, Compression::None).await;
    registry.write("/fabric/node", "v1").await.unwrap();

    // A directory in place of the data file makes the final rename fail.
    let dir = registry.resolve("/fabric/node").unwrap();
    std::fs::remove_file(dir.join(".data")).unwrap();
    std::fs::create_dir(dir.join(".data")).unwrap();
    std::fs::write(dir.join(".data").join("blocker"), "x").unwrap();

    assert!(matches!(
        registry.write("/fabric/node", "v2").await,
        Err(RegistryError::Io { .. })
    ));
    let leftovers: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .flatten()
        .filter(|e| e.file_name() != ".data")
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}
