use crate::cli::Command;
use crate::commands;
use crate::output::{Outcome, Output};
use crate::prompt::ConsolePrompt;
use clap::Parser;
use mqf::Fabric;
use tracing::{info, warn};

/// One shell input line.
#[derive(Debug, Parser)]
#[command(name = "mqf", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

/// Reads commands from stdin until `exit` or end of input.
///
/// Every command shares the fabric and its credential session, so credentials
/// typed once are reused by later commands.
pub(crate) async fn run(fabric: &Fabric, input: &ConsolePrompt, out: &mut Output) -> anyhow::Result<Outcome> {
    info!(session = fabric.session_id(), "Shell started");
    out.note(format!("Session {}. Type 'help' for commands, 'exit' to leave.", fabric.session_id()))?;

    let mut worst = Outcome::Clean;
    loop {
        out.shell_prompt()?;
        let Some(line) = input.next_line().await? else { break };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        let Some(words) = shlex::split(line) else {
            out.note("Error: unbalanced quotes")?;
            continue;
        };
        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                out.note(e.render().to_string())?;
                continue;
            },
        };
        match commands::execute(fabric, &parsed.command, out).await {
            Ok(outcome) => worst = worst.max(outcome),
            Err(e) => {
                warn!(error = %e, "Command failed");
                out.note(format!("Error: {e:#}"))?;
                worst = Outcome::Partial;
            },
        }
    }

    info!("Shell finished");
    Ok(worst)
}
