use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A settings file with an fs registry, so state survives between invocations.
#[derive(Debug)]
pub struct Workspace {
    pub dir: TempDir,
    pub config: PathBuf,
}

impl Workspace {
    pub fn new(management: Option<(&str, &str)>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("mqf.toml");

        let mut settings = format!(
            "[registry]\nbackend = \"fs\"\nroot = '{}'\n\n[log]\nlevel = \"warn\"\n\n[fleet]\n",
            dir.path().join("registry").display()
        );
        if let Some((user, password)) = management {
            settings.push_str(&format!(
                "management_username = \"{user}\"\nmanagement_password = \"{password}\"\n"
            ));
        }
        fs::write(&config, settings).unwrap();

        Self { dir, config }
    }

    pub fn mqf(&self) -> Command {
        let mut cmd = Command::cargo_bin("mqf").unwrap();
        cmd.arg("--config").arg(&self.config).env_remove("RUST_LOG");
        cmd
    }
}
