use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;

/// How a command ended, worst wins across a shell session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Outcome {
    Clean,
    /// Some targets failed; the rest were applied.
    Partial,
}

impl Outcome {
    pub(crate) fn exit_code(self) -> ExitCode {
        match self {
            Self::Clean => ExitCode::SUCCESS,
            Self::Partial => ExitCode::from(2),
        }
    }
}

/// Command results on stdout, human-readable or JSON.
#[derive(Debug)]
pub(crate) struct Output {
    json: bool,
}

impl Output {
    pub(crate) const fn new(json: bool) -> Self {
        Self { json }
    }

    pub(crate) const fn is_json(&self) -> bool {
        self.json
    }

    pub(crate) fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text.as_ref())?;
        stdout.flush()
    }

    pub(crate) fn json<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.line(rendered)
    }

    /// Diagnostics and shell chatter go to stderr.
    pub(crate) fn note(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{}", text.as_ref())
    }

    pub(crate) fn shell_prompt(&mut self) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "mqf> ")?;
        stderr.flush()
    }
}
