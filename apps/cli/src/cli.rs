use clap::{ArgAction, Args, Parser, Subcommand};
use mqf::domain::{ConfigModel, DomainError};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mqf", about = "Provision and decommission managed message brokers", version)]
pub(crate) struct Cli {
    /// Settings file (TOML); `mqf.toml` in the working directory when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Raise log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,

    /// Print results as JSON.
    #[arg(long)]
    pub(crate) json: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Create or update a broker profile, then assign and create containers.
    MqCreate(MqCreateArgs),
    /// Stop a container and remove every registry entry that names it.
    ContainerDelete(ContainerDeleteArgs),
    /// Create a version scope.
    VersionCreate(VersionCreateArgs),
    /// Read commands from stdin, sharing one credential session.
    Shell,
}

#[derive(Debug, Args)]
pub(crate) struct MqCreateArgs {
    /// Broker name.
    pub(crate) name: String,

    /// Profile name; defaults to the broker name.
    #[arg(long)]
    pub(crate) profile: Option<String>,

    #[arg(long)]
    pub(crate) parent_profile: Option<String>,

    /// Broker property, repeatable.
    #[arg(short = 'D', long = "property", value_name = "KEY=VALUE")]
    pub(crate) properties: Vec<String>,

    /// Broker configuration URL.
    #[arg(long)]
    pub(crate) config_url: Option<String>,

    /// Data directory.
    #[arg(long)]
    pub(crate) data: Option<String>,

    #[arg(long)]
    pub(crate) group: Option<String>,

    /// Comma separated broker groups to network with.
    #[arg(long)]
    pub(crate) networks: Option<String>,

    #[arg(long)]
    pub(crate) networks_username: Option<String>,

    #[arg(long)]
    pub(crate) networks_password: Option<String>,

    /// Version scope; the fabric default when omitted.
    #[arg(long)]
    pub(crate) version: Option<String>,

    /// Comma separated containers to create.
    #[arg(long, value_name = "NAMES")]
    pub(crate) create_container: Option<String>,

    /// Comma separated existing containers to assign the profile to.
    #[arg(long, value_name = "NAMES")]
    pub(crate) assign_container: Option<String>,

    #[arg(long)]
    pub(crate) jmx_user: Option<String>,

    #[arg(long)]
    pub(crate) jmx_password: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub(crate) jvm_opts: Option<String>,

    #[arg(long)]
    pub(crate) minimum_instances: Option<u32>,

    #[arg(long)]
    pub(crate) replicas: Option<u32>,
}

impl MqCreateArgs {
    pub(crate) fn to_config(&self) -> Result<ConfigModel, DomainError> {
        let mut builder = ConfigModel::builder(self.name.clone()).properties(self.properties.iter());

        if let Some(v) = &self.profile {
            builder = builder.profile(v);
        }
        if let Some(v) = &self.parent_profile {
            builder = builder.parent_profile(v);
        }
        if let Some(v) = &self.config_url {
            builder = builder.config_url(v);
        }
        if let Some(v) = &self.data {
            builder = builder.data_directory(v);
        }
        if let Some(v) = &self.group {
            builder = builder.group(v);
        }
        if let Some(v) = &self.networks {
            builder = builder.networks(v);
        }
        if let Some(v) = &self.networks_username {
            builder = builder.networks_username(v);
        }
        if let Some(v) = &self.networks_password {
            builder = builder.networks_password(v);
        }
        if let Some(v) = &self.version {
            builder = builder.version(v);
        }
        if let Some(v) = &self.create_container {
            builder = builder.create_csv(v);
        }
        if let Some(v) = &self.assign_container {
            builder = builder.assign_csv(v);
        }
        if let Some(v) = &self.jmx_user {
            builder = builder.username(v);
        }
        if let Some(v) = &self.jmx_password {
            builder = builder.password(v);
        }
        if let Some(v) = &self.jvm_opts {
            builder = builder.jvm_opts(v);
        }
        if let Some(v) = self.minimum_instances {
            builder = builder.minimum_instances(v);
        }
        if let Some(v) = self.replicas {
            builder = builder.replicas(v);
        }
        builder.build()
    }
}

#[derive(Debug, Args)]
pub(crate) struct ContainerDeleteArgs {
    /// Container id.
    pub(crate) id: String,

    /// Version scopes to sweep, repeatable; every known version when omitted.
    #[arg(long = "version", value_name = "VERSION")]
    pub(crate) versions: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct VersionCreateArgs {
    pub(crate) version: String,

    /// Version whose profiles are copied.
    #[arg(long)]
    pub(crate) parent: Option<String>,
}
