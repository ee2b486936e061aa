use mqf_domain::ConfigModel;
use mqf_profile::record::broker_pid;
use mqf_profile::{ProfileManager, ProfileStore, RegistryProfileStore};
use mqf_registry::MemoryRegistry;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Last writer wins per key; keys only in the first run survive.
    #[test]
    fn merged_properties_follow_last_writer(
        first in proptest::collection::btree_map("[a-z]{1,4}", "[a-z0-9]{0,4}", 0..6),
        second in proptest::collection::btree_map("[a-z]{1,4}", "[a-z0-9]{0,4}", 0..6),
    ) {
        let record = runtime().block_on(async {
            let store = Arc::new(RegistryProfileStore::new(Arc::new(MemoryRegistry::new())));
            let manager = ProfileManager::new(store.clone(), "1.0");
            for props in [&first, &second] {
                let cfg = ConfigModel::builder("mq1")
                    .properties(props.iter().map(|(k, v)| format!("{k}={v}")))
                    .build()
                    .unwrap();
                manager.create_or_update(&cfg).await.unwrap();
            }
            store.get_profile("1.0", "mq1").await.unwrap().unwrap()
        });

        let mut expected: BTreeMap<String, String> = first.clone();
        expected.extend(second.clone());
        let broker = &record.configurations[&broker_pid("mq1")];
        for (key, value) in &expected {
            if key != "broker-name" {
                prop_assert_eq!(broker.get(key), Some(value));
            }
        }
    }
}
