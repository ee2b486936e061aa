use crate::error::ProvisioningError;
use mqf_domain::{ConfigModel, Credentials};
use mqf_kernel::ports::{Prompt, PromptError};
use mqf_session::SessionCredentialStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug)]
enum Acquisition {
    Pending,
    Resolved(Credentials),
    /// The prompt already failed in this run; it is not asked again.
    Failed(String),
}

/// Management credentials for one provisioning run.
///
/// Fresh credentials are acquired at most once per run behind a single lock, so
/// concurrent requests that all hit an authentication failure share one prompt.
#[derive(Debug)]
pub struct CredentialResolver {
    username: Option<String>,
    password: Option<String>,
    parent: String,
    session: Arc<dyn SessionCredentialStore>,
    prompt: Arc<dyn Prompt>,
    state: Mutex<Acquisition>,
}

impl CredentialResolver {
    /// `parent` is the container whose management interface is asked to create children.
    pub fn new(
        cfg: &ConfigModel,
        parent: impl Into<String>,
        session: Arc<dyn SessionCredentialStore>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        Self {
            username: cfg.username().map(str::to_owned),
            password: cfg.password().map(str::to_owned),
            parent: parent.into(),
            session,
            prompt,
            state: Mutex::new(Acquisition::Pending),
        }
    }

    /// Credentials to try first: the explicit pair, then what this run already
    /// acquired, then the session's pair.
    ///
    /// # Errors
    /// Returns [`ProvisioningError::Session`] when the session store cannot be read.
    pub async fn current(&self) -> Result<Option<Credentials>, ProvisioningError> {
        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            return Ok(Some(Credentials::new(user.clone(), pass.clone())));
        }
        if let Acquisition::Resolved(creds) = &*self.state.lock().await {
            return Ok(Some(creds.clone()));
        }
        let user = self.session.retrieve_username().await?;
        let pass = self.session.retrieve_password().await?;
        Ok(match (user, pass) {
            (Some(user), Some(pass)) => Some(Credentials::new(user, pass)),
            _ => None,
        })
    }

    /// Credentials for a retry after an authentication failure.
    ///
    /// Explicit halves are used as given; only the missing halves are prompted
    /// for, and only on the first call of the run. Later calls return the same
    /// pair (or the same failure).
    ///
    /// # Errors
    /// Returns [`ProvisioningError::Prompt`] when input cannot be read, or an
    /// authentication-kind error on later calls after such a failure.
    pub async fn acquire(&self) -> Result<Credentials, ProvisioningError> {
        let mut state = self.state.lock().await;
        match &*state {
            Acquisition::Resolved(creds) => return Ok(creds.clone()),
            Acquisition::Failed(reason) => {
                return Err(PromptError::Closed {
                    message: reason.clone().into(),
                    context: Some("credentials were not acquired earlier in this run".into()),
                }
                .into());
            },
            Acquisition::Pending => {},
        }

        match self.ask().await {
            Ok(creds) => {
                info!(parent = %self.parent, user = creds.username(), "Management credentials acquired");
                *state = Acquisition::Resolved(creds.clone());
                Ok(creds)
            },
            Err(e) => {
                warn!(parent = %self.parent, error = %e, "Credential prompt failed");
                *state = Acquisition::Failed(e.to_string());
                Err(e)
            },
        }
    }

    async fn ask(&self) -> Result<Credentials, ProvisioningError> {
        let username = match &self.username {
            Some(user) => user.clone(),
            None => {
                let text = format!("Jmx Login for {}: ", self.parent);
                self.prompt.read_line(&text, false).await?.trim().to_owned()
            },
        };
        let password = match &self.password {
            Some(pass) => pass.clone(),
            None => {
                let text = format!("Jmx Password for {}: ", self.parent);
                self.prompt.read_line(&text, true).await?
            },
        };
        Ok(Credentials::new(username, password))
    }

    /// Saves `creds` in the session so later commands do not prompt.
    ///
    /// A failing session store is logged and otherwise ignored.
    pub async fn persist(&self, creds: &Credentials) {
        match self.session.store(creds.username(), creds.password()).await {
            Ok(()) => debug!(user = creds.username(), "Credentials stored in session"),
            Err(e) => warn!(error = %e, "Failed to store credentials in session"),
        }
    }
}
