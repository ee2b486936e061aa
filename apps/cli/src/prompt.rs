use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use mqf::kernel::ports::{Prompt, PromptError};
use std::io::{self, IsTerminal, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::debug;

/// Interactive prompt on the process console.
///
/// One stdin reader is shared between credential prompts and the shell loop so
/// buffered input is never lost between the two.
#[derive(Debug)]
pub(crate) struct ConsolePrompt {
    input: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsolePrompt {
    pub(crate) fn new() -> Self {
        Self { input: Mutex::new(BufReader::new(tokio::io::stdin()).lines()) }
    }

    /// Next stdin line, `None` at end of input.
    pub(crate) async fn next_line(&self) -> io::Result<Option<String>> {
        self.input.lock().await.next_line().await
    }
}

#[async_trait]
impl Prompt for ConsolePrompt {
    async fn read_line(&self, text: &str, mask_input: bool) -> Result<String, PromptError> {
        {
            let mut stderr = io::stderr().lock();
            write!(stderr, "{text}")?;
            stderr.flush()?;
        }

        if mask_input && io::stdin().is_terminal() {
            debug!("Reading masked input from the terminal");
            let secret = tokio::task::spawn_blocking(read_masked)
                .await
                .map_err(io::Error::other)??;
            return Ok(secret);
        }

        match self.next_line().await? {
            Some(line) => Ok(line.trim_end_matches('\r').to_owned()),
            None => Err(PromptError::Closed { message: "end of input".into(), context: None }),
        }
    }
}

fn read_masked() -> io::Result<String> {
    terminal::enable_raw_mode()?;
    let secret = collect_secret();
    terminal::disable_raw_mode()?;
    writeln!(io::stderr())?;
    secret
}

fn collect_secret() -> io::Result<String> {
    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event::read()? else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Backspace => {
                secret.pop();
            },
            KeyCode::Char('c' | 'd') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"));
            },
            KeyCode::Esc => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"));
            },
            KeyCode::Char(c) => secret.push(c),
            _ => {},
        }
    }
}
