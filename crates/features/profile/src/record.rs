//! Stored shape of a profile.

use mqf_domain::ConfigModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// PID prefix of the broker server configuration inside a profile.
pub const BROKER_PID_PREFIX: &str = "mq.fabric.server-";

pub const ATTR_JVM_OPTS: &str = "jvm-opts";
pub const ATTR_MINIMUM_INSTANCES: &str = "minimum-instances";

/// Key/value configuration grouped by PID.
pub type Configurations = BTreeMap<String, BTreeMap<String, String>>;

/// A profile as persisted in the registry (JSON).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRecord {
    pub parents: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub configurations: Configurations,
}

impl ProfileRecord {
    #[must_use]
    pub fn with_parent(parent: Option<&str>) -> Self {
        Self { parents: parent.map(str::to_owned).into_iter().collect(), ..Self::default() }
    }

    /// The broker configuration, if present.
    #[must_use]
    pub fn broker_settings(&self, broker_name: &str) -> Option<&BTreeMap<String, String>> {
        self.configurations.get(&broker_pid(broker_name))
    }
}

#[must_use]
pub fn broker_pid(broker_name: &str) -> String {
    format!("{BROKER_PID_PREFIX}{broker_name}")
}

/// Broker PID entries for every field set in `cfg`, properties last.
#[must_use]
pub fn broker_properties(cfg: &ConfigModel) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    out.insert("broker-name".to_owned(), cfg.broker_name().to_owned());

    let optional = [
        ("config", cfg.config_url()),
        ("data", cfg.data_directory()),
        ("group", cfg.group()),
        ("network", cfg.networks()),
        ("network.userName", cfg.networks_username()),
        ("network.password", cfg.networks_password()),
    ];
    for (key, value) in optional.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))) {
        out.insert(key.to_owned(), value.to_owned());
    }
    if let Some(replicas) = cfg.replicas() {
        out.insert("replicas".to_owned(), replicas.to_string());
    }
    for (key, value) in cfg.properties() {
        out.insert(key.clone(), value.clone());
    }
    out
}

/// Profile attributes for every attribute-backed field set in `cfg`.
#[must_use]
pub fn broker_attributes(cfg: &ConfigModel) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    if let Some(opts) = cfg.jvm_opts() {
        out.insert(ATTR_JVM_OPTS.to_owned(), opts.to_owned());
    }
    if let Some(min) = cfg.minimum_instances() {
        out.insert(ATTR_MINIMUM_INSTANCES.to_owned(), min.to_string());
    }
    out
}
