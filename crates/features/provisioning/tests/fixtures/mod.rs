use async_trait::async_trait;
use mqf_domain::{ContainerCreationRequest, ContainerMetadata, Credentials};
use mqf_kernel::ports::{FleetClient, FleetError, Prompt, PromptError};
use mqf_profile::{ProfileManager, RegistryProfileStore};
use mqf_provisioning::{ProvisioningOrchestrator, ProvisioningOrchestratorBuilder};
use mqf_registry::MemoryRegistry;
use mqf_session::{SessionCache, SessionHandle};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fleet fake driven by per-target rules; records every creation attempt.
#[derive(Debug, Default)]
pub struct ScriptedFleet {
    /// Child requests must carry exactly this pair.
    pub accepted: Option<Credentials>,
    /// Every request fails authentication.
    pub reject_all: bool,
    pub fail: Vec<String>,
    pub bad_metadata: Vec<String>,
    pub stall: Vec<String>,
    pub calls: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedFleet {
    pub fn accepting(username: &str, password: &str) -> Self {
        Self { accepted: Some(Credentials::new(username, password)), ..Self::default() }
    }

    /// `(container, username)` for every attempt, in call order.
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attempts_for(&self, name: &str) -> usize {
        self.calls().iter().filter(|(n, _)| n == name).count()
    }
}

#[async_trait]
impl FleetClient for ScriptedFleet {
    async fn create_containers(
        &self,
        request: &ContainerCreationRequest,
    ) -> Result<Vec<ContainerMetadata>, FleetError> {
        let name = request.name().to_owned();
        self.calls
            .lock()
            .unwrap()
            .push((name.clone(), request.credentials().map(|c| c.username().to_owned())));

        if self.stall.contains(&name) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.reject_all {
            return Err(FleetError::authentication("rejected"));
        }
        if let Some(expected) = &self.accepted {
            if request.credentials() != Some(expected) {
                return Err(FleetError::authentication("bad management credentials"));
            }
        }
        if self.fail.contains(&name) {
            return Err(FleetError::creation("disk full"));
        }
        if self.bad_metadata.contains(&name) {
            return Ok(vec![ContainerMetadata::failed(name, "jvm exited")]);
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

/// Prompt fake answering from a queue; closed once the queue is empty.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<(String, bool)>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| (*a).to_owned()).collect()),
            asked: Mutex::default(),
        }
    }

    /// `(prompt text, masked)` for every question asked.
    pub fn asked(&self) -> Vec<(String, bool)> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn read_line(&self, text: &str, mask_input: bool) -> Result<String, PromptError> {
        self.asked.lock().unwrap().push((text.to_owned(), mask_input));
        self.answers.lock().unwrap().pop_front().ok_or_else(|| PromptError::Closed {
            message: "no more input".into(),
            context: None,
        })
    }
}

pub struct Harness {
    pub registry: MemoryRegistry,
    pub session: SessionHandle,
    pub fleet: Arc<ScriptedFleet>,
    pub prompt: Arc<ScriptedPrompt>,
    pub orchestrator: ProvisioningOrchestrator,
}

pub fn harness(fleet: ScriptedFleet, prompt: ScriptedPrompt) -> Harness {
    harness_with(fleet, prompt, |builder| builder)
}

pub fn harness_with(
    fleet: ScriptedFleet,
    prompt: ScriptedPrompt,
    configure: impl FnOnce(ProvisioningOrchestratorBuilder) -> ProvisioningOrchestratorBuilder,
) -> Harness {
    let registry = MemoryRegistry::new();
    let session = SessionCache::builder().capacity(8).build().open("test-session");
    let fleet = Arc::new(fleet);
    let prompt = Arc::new(prompt);

    let store = Arc::new(RegistryProfileStore::new(Arc::new(registry.clone())));
    let builder = ProvisioningOrchestrator::builder()
        .profiles(ProfileManager::new(store, "1.0"))
        .registry(Arc::new(registry.clone()))
        .fleet(fleet.clone())
        .session(Arc::new(session.clone()))
        .prompt(prompt.clone())
        .timeout(Duration::from_millis(200));
    let orchestrator = configure(builder).build().unwrap();

    Harness { registry, session, fleet, prompt, orchestrator }
}

pub fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| (*s).to_owned()).collect()
}
