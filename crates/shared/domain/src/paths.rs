//! Registry path layout.
//!
//! Every node the provisioning core reads or writes is named here so that the
//! profile store, the fleet and the decommission sweep agree on one layout.

use std::fmt;

pub const CONFIGS_ROOT: &str = "/fabric/configs";
pub const VERSIONS_ROOT: &str = "/fabric/configs/versions";
pub const DEFAULT_VERSION: &str = "/fabric/configs/default-version";

/// A typed registry location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistryPath {
    /// Holds the id of the fleet's default version.
    DefaultVersion,
    /// Root node of a version scope.
    Version { version: String },
    /// Profile record inside a version scope.
    Profile { version: String, profile: String },
    /// Space separated profile ids bound to a container in one version.
    ConfigVersionsContainer { version: String, container: String },
    /// The version a container runs.
    ConfigContainer { container: String },
    /// Container record.
    Container { container: String },
    /// Domain memberships.
    ContainerDomains { container: String },
    /// Provisioning-state record.
    ContainerProvision { container: String },
}

impl RegistryPath {
    pub fn version(version: impl Into<String>) -> Self {
        Self::Version { version: version.into() }
    }

    pub fn profile(version: impl Into<String>, profile: impl Into<String>) -> Self {
        Self::Profile { version: version.into(), profile: profile.into() }
    }

    pub fn version_binding(version: impl Into<String>, container: impl Into<String>) -> Self {
        Self::ConfigVersionsContainer { version: version.into(), container: container.into() }
    }

    pub fn version_pointer(container: impl Into<String>) -> Self {
        Self::ConfigContainer { container: container.into() }
    }

    pub fn container(container: impl Into<String>) -> Self {
        Self::Container { container: container.into() }
    }

    pub fn domains(container: impl Into<String>) -> Self {
        Self::ContainerDomains { container: container.into() }
    }

    pub fn provision(container: impl Into<String>) -> Self {
        Self::ContainerProvision { container: container.into() }
    }

    /// Every sub-tree that references `container`, version bindings first.
    #[must_use]
    pub fn container_bindings<S: AsRef<str>>(container: &str, versions: &[S]) -> Vec<Self> {
        let mut paths: Vec<Self> =
            versions.iter().map(|v| Self::version_binding(v.as_ref(), container)).collect();
        paths.push(Self::container(container));
        paths.push(Self::domains(container));
        paths.push(Self::provision(container));
        paths.push(Self::version_pointer(container));
        paths
    }

    /// Renders the absolute `/`-separated path.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RegistryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultVersion => f.write_str(DEFAULT_VERSION),
            Self::Version { version } => write!(f, "{VERSIONS_ROOT}/{version}"),
            Self::Profile { version, profile } => {
                write!(f, "{VERSIONS_ROOT}/{version}/profiles/{profile}")
            },
            Self::ConfigVersionsContainer { version, container } => {
                write!(f, "{VERSIONS_ROOT}/{version}/containers/{container}")
            },
            Self::ConfigContainer { container } => {
                write!(f, "{CONFIGS_ROOT}/containers/{container}")
            },
            Self::Container { container } => {
                write!(f, "/fabric/registry/containers/config/{container}")
            },
            Self::ContainerDomains { container } => {
                write!(f, "/fabric/registry/containers/domains/{container}")
            },
            Self::ContainerProvision { container } => {
                write!(f, "/fabric/registry/containers/provision/{container}")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_layout() {
        assert_eq!(
            RegistryPath::profile("1.0", "mq-a").render(),
            "/fabric/configs/versions/1.0/profiles/mq-a"
        );
        assert_eq!(
            RegistryPath::version_binding("1.1", "c1").render(),
            "/fabric/configs/versions/1.1/containers/c1"
        );
        assert_eq!(
            RegistryPath::provision("c1").render(),
            "/fabric/registry/containers/provision/c1"
        );
    }

    #[test]
    fn container_bindings_cover_every_sub_tree() {
        let paths = RegistryPath::container_bindings("c1", &["1.0", "1.1"]);
        assert_eq!(paths.len(), 6);
        assert_eq!(paths[0], RegistryPath::version_binding("1.0", "c1"));
        assert!(paths.contains(&RegistryPath::version_pointer("c1")));
    }
}
