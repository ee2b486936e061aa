use async_trait::async_trait;
use mqf::domain::config::{FabricSettings, RegistryBackend};
use mqf::domain::{
    ConfigModel, ContainerCreationRequest, ContainerMetadata, ErrorKind, RegistryPath,
};
use mqf::kernel::ports::{FleetClient, FleetError, Prompt, PromptError};
use mqf::registry::{MemoryRegistry, Registry};
use mqf::{Fabric, SessionCache, SessionCredentialStore};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Rejects the first attempt of every flaky target, whatever its credentials.
#[derive(Debug, Default)]
struct FlakyFleet {
    flaky: Vec<String>,
    all_flaky: bool,
    rejected: Mutex<HashSet<String>>,
}

#[async_trait]
impl FleetClient for FlakyFleet {
    async fn create_containers(
        &self,
        request: &ContainerCreationRequest,
    ) -> Result<Vec<ContainerMetadata>, FleetError> {
        let name = request.name().to_owned();
        let flaky = self.all_flaky || self.flaky.contains(&name);
        if flaky && self.rejected.lock().unwrap().insert(name.clone()) {
            return Err(FleetError::authentication("session expired"));
        }
        Ok(vec![ContainerMetadata::created(name)])
    }

    async fn stop_and_remove(&self, _container_id: &str) -> Result<(), FleetError> {
        Ok(())
    }

    fn current_container_name(&self) -> String {
        "root".to_owned()
    }
}

#[derive(Debug, Default)]
struct QueuePrompt {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl QueuePrompt {
    fn new(answers: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().map(|a| (*a).to_owned()).collect()),
            asked: Mutex::default(),
        })
    }

    fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompt for QueuePrompt {
    async fn read_line(&self, text: &str, _mask_input: bool) -> Result<String, PromptError> {
        self.asked.lock().unwrap().push(text.to_owned());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PromptError::Closed { message: "eof".into(), context: None })
    }
}

fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| (*s).to_owned()).collect()
}

#[tokio::test]
async fn end_to_end_retry_on_one_target() {
    let sessions = SessionCache::default();
    let prompt = QueuePrompt::new(&["admin", "admin"]);
    let fleet = Arc::new(FlakyFleet { flaky: names(&["c2"]), ..FlakyFleet::default() });
    let fabric = Fabric::builder()
        .fleet(fleet)
        .prompt(prompt.clone())
        .sessions(sessions.clone())
        .build()
        .await
        .unwrap();

    let cfg = ConfigModel::builder("mq1").create_csv("c1,c2").build().unwrap();
    let result = fabric.provision(&cfg).await.unwrap();

    assert_eq!(result.profile_id, "mq1");
    assert_eq!(result.created, names(&["c1", "c2"]));
    assert!(result.failures.is_empty());
    // One credential acquisition: login then password.
    assert_eq!(prompt.asked(), names(&["Jmx Login for root: ", "Jmx Password for root: "]));

    let session = sessions.open(fabric.session_id());
    assert_eq!(session.retrieve_username().await.unwrap().as_deref(), Some("admin"));
    assert_eq!(session.retrieve_password().await.unwrap().as_deref(), Some("admin"));
}

#[tokio::test]
async fn every_target_failing_once_needs_one_acquisition() {
    let prompt = QueuePrompt::new(&["admin", "admin"]);
    let fleet = Arc::new(FlakyFleet { all_flaky: true, ..FlakyFleet::default() });
    let fabric = Fabric::builder().fleet(fleet).prompt(prompt.clone()).build().await.unwrap();

    let cfg = ConfigModel::builder("mq1").create_csv("c1,c2,c3").build().unwrap();
    let result = fabric.provision(&cfg).await.unwrap();

    assert_eq!(result.created, names(&["c1", "c2", "c3"]));
    assert_eq!(prompt.asked().len(), 2);
}

#[tokio::test]
async fn defaults_resolve_profile_and_version() {
    let fabric = Fabric::builder().prompt(QueuePrompt::new(&[])).build().await.unwrap();
    assert_eq!(fabric.default_version(), "1.0");

    let cfg = ConfigModel::builder("orders").build().unwrap();
    let result = fabric.provision(&cfg).await.unwrap();

    assert_eq!(result.profile_id, "orders");
    let profile = RegistryPath::profile("1.0", "orders").render();
    assert!(fabric.registry().exists(&profile).await.unwrap());
}

#[tokio::test]
async fn registry_default_version_wins_over_settings() {
    let registry = MemoryRegistry::new();
    registry.write(&RegistryPath::DefaultVersion.render(), "2.0").await.unwrap();
    registry.write(&RegistryPath::version("2.0").render(), "").await.unwrap();

    let fabric = Fabric::builder()
        .registry(Arc::new(registry.clone()))
        .prompt(QueuePrompt::new(&[]))
        .build()
        .await
        .unwrap();
    assert_eq!(fabric.default_version(), "2.0");

    let cfg = ConfigModel::builder("orders").build().unwrap();
    fabric.provision(&cfg).await.unwrap();
    assert!(registry.exists(&RegistryPath::profile("2.0", "orders").render()).await.unwrap());
}

#[tokio::test]
async fn local_fleet_on_disk_provision_and_destroy() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = FabricSettings::default();
    settings.registry.backend = RegistryBackend::Fs;
    settings.registry.root = dir.path().join("registry");
    settings.registry.compression = true;
    settings.fleet.management_username = Some("admin".to_owned());
    settings.fleet.management_password = Some("admin".to_owned());

    let prompt = QueuePrompt::new(&["admin", "admin"]);
    let fabric =
        Fabric::builder().settings(settings).prompt(prompt.clone()).build().await.unwrap();

    let cfg = ConfigModel::builder("mq1").create_csv("c1,c2").build().unwrap();
    let result = fabric.provision(&cfg).await.unwrap();
    assert_eq!(result.created, names(&["c1", "c2"]));
    assert_eq!(prompt.asked().len(), 2);

    let report = fabric.destroy_everywhere("c1").await.unwrap();
    assert!(report.is_clean(), "{:?}", report.failures);
    assert!(report.stop_failure.is_none());
    for path in RegistryPath::container_bindings("c1", &["1.0"]) {
        assert!(!fabric.registry().exists(&path.render()).await.unwrap(), "{path}");
    }
    let c2 = RegistryPath::container("c2").render();
    assert!(fabric.registry().exists(&c2).await.unwrap());
}

#[tokio::test]
async fn shared_session_skips_the_prompt_in_later_commands() {
    let registry: Arc<dyn Registry> = Arc::new(MemoryRegistry::new());
    let sessions = SessionCache::default();
    let mut settings = FabricSettings::default();
    settings.fleet.management_username = Some("admin".to_owned());
    settings.fleet.management_password = Some("s3cret".to_owned());

    let first_prompt = QueuePrompt::new(&["admin", "s3cret"]);
    let first = Fabric::builder()
        .settings(settings.clone())
        .registry(Arc::clone(&registry))
        .sessions(sessions.clone())
        .prompt(first_prompt.clone())
        .build()
        .await
        .unwrap();
    let cfg = ConfigModel::builder("mq1").create_csv("c1").build().unwrap();
    assert!(first.provision(&cfg).await.unwrap().is_success());

    let second_prompt = QueuePrompt::new(&[]);
    let second = Fabric::builder()
        .settings(settings)
        .registry(registry)
        .sessions(sessions)
        .session_id(first.session_id())
        .prompt(second_prompt.clone())
        .build()
        .await
        .unwrap();
    let cfg = ConfigModel::builder("mq1").create_csv("c2").build().unwrap();
    assert!(second.provision(&cfg).await.unwrap().is_success());

    assert_eq!(first_prompt.asked().len(), 2);
    assert!(second_prompt.asked().is_empty());
}

#[tokio::test]
async fn version_create_through_the_facade() {
    let fabric = Fabric::builder().prompt(QueuePrompt::new(&[])).build().await.unwrap();
    let cfg = ConfigModel::builder("mq1").build().unwrap();
    fabric.provision(&cfg).await.unwrap();

    fabric.create_version("1.1", Some("1.0")).await.unwrap();

    let copied = RegistryPath::profile("1.1", "mq1").render();
    assert!(fabric.registry().exists(&copied).await.unwrap());
    let err = fabric.create_version("1.1", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
}

#[tokio::test]
async fn building_without_a_prompt_is_invalid() {
    let err = Fabric::builder().build().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
}
