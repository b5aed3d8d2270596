use tokio::process::Command;

/// Captured output of a command that ran to completion, successfully or not.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// What became of one command invocation. A non-zero exit is still
/// `Completed` — the tool ran and said something; only a failure to start
/// it at all lands in `LaunchFailed`.
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    Completed(ExecutionResult),
    LaunchFailed(String),
}

impl CommandOutcome {
    /// Flatten every outcome into response text. Tool failures become
    /// readable error content rather than wire-level errors, so protocol
    /// clients always receive a well-formed completion.
    pub fn into_content(self) -> String {
        match self {
            CommandOutcome::Completed(result) if result.exit_code == 0 => {
                result.stdout.trim().to_string()
            }
            CommandOutcome::Completed(result) => {
                format!("Error executing CLI agent:\n{}", result.stderr)
            }
            CommandOutcome::LaunchFailed(reason) => format!("Proxy Error: {reason}"),
        }
    }
}

/// Run a fully rendered command line through the shell. Templates may use
/// pipes, redirection, or env expansion, so the line goes to `sh -c`
/// rather than an argv array. Blocks for as long as the child runs; no
/// timeout is applied and no cancellation is propagated.
pub async fn run_shell(command: &str) -> CommandOutcome {
    let output = match Command::new("sh").arg("-c").arg(command).output().await {
        Ok(output) => output,
        Err(err) => return CommandOutcome::LaunchFailed(err.to_string()),
    };

    CommandOutcome::Completed(ExecutionResult {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        // None means the child was killed by a signal.
        exit_code: output.status.code().unwrap_or(-1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let outcome = run_shell("echo hi").await;
        let CommandOutcome::Completed(result) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "hi\n");
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn nonzero_exit_is_reported_not_raised() {
        let outcome = run_shell("echo oops >&2; exit 3").await;
        let CommandOutcome::Completed(result) = &outcome else {
            panic!("expected completion");
        };
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stderr, "oops\n");

        let content = outcome.into_content();
        assert!(content.starts_with("Error executing CLI agent:\n"));
        assert!(content.contains("oops"));
    }

    #[tokio::test]
    async fn quoted_metacharacters_do_not_execute() {
        use crate::command::template::CommandTemplate;

        let template = CommandTemplate::parse("echo {prompt}").unwrap();
        let command = template.render("`rm -rf /`; echo hi", None, None);
        let content = run_shell(&command).await.into_content();
        // The embedded command substitution and chained echo print as
        // literal text instead of running.
        assert_eq!(content, "`rm -rf /`; echo hi");
    }

    #[test]
    fn launch_failure_becomes_proxy_error() {
        let content = CommandOutcome::LaunchFailed("no shell".into()).into_content();
        assert_eq!(content, "Proxy Error: no shell");
    }

    #[test]
    fn success_content_is_trimmed_stdout() {
        let outcome = CommandOutcome::Completed(ExecutionResult {
            stdout: "  answer \n".into(),
            stderr: String::new(),
            exit_code: 0,
        });
        assert_eq!(outcome.into_content(), "answer");
    }
}
