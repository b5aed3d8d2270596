use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use crate::config::ProxyConfig;
use crate::conversation::ReducedPrompt;

pub mod exec;
pub mod template;

use exec::{run_shell, CommandOutcome};

/// Temporary file carrying the system prompt for templates that take it by
/// path. The file is removed when this value goes out of scope; `remove`
/// reports the failure instead of swallowing it.
pub struct SystemPromptFile {
    file: NamedTempFile,
}

impl SystemPromptFile {
    pub fn new(system_prompt: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("cli-proxy-system-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(system_prompt.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn remove(self) -> io::Result<()> {
        self.file.close()
    }
}

/// One request's trip through the pipeline: stage the system prompt file
/// when the template calls for it, render the command, run it, clean up.
pub async fn execute(config: &ProxyConfig, reduced: &ReducedPrompt) -> CommandOutcome {
    let system = reduced.system_prompt.as_deref();

    let system_file = match (config.template.wants_system_file(), system) {
        (true, Some(text)) => match SystemPromptFile::new(text) {
            Ok(file) => Some(file),
            Err(err) => {
                error!(error = %err, "failed to stage system prompt file");
                return CommandOutcome::LaunchFailed(format!(
                    "failed to stage system prompt file: {err}"
                ));
            }
        },
        _ => None,
    };

    let command = config.template.render(
        &reduced.user_prompt,
        system,
        system_file.as_ref().map(|f| f.path()),
    );

    if config.debug {
        info!(command = %command, "executing CLI command");
    }

    let outcome = run_shell(&command).await;

    match &outcome {
        CommandOutcome::Completed(result) if result.exit_code != 0 => {
            error!(
                code = result.exit_code,
                stderr = %result.stderr,
                "CLI command exited non-zero"
            );
        }
        CommandOutcome::LaunchFailed(reason) => {
            error!(error = %reason, "failed to launch CLI command");
        }
        _ => {}
    }

    if let Some(file) = system_file {
        if let Err(err) = file.remove() {
            warn!(error = %err, "failed to remove system prompt file");
        }
    }

    outcome
}
