//! Helpers for running the `git` and `gh` binaries.

mod error;

pub use error::CommandError;

use bstr::ByteSlice;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs `program` with `args` and returns its standard output with
/// surrounding whitespace removed.
///
/// The child runs in `working_dir`, or the current directory when `None`.
///
/// # Errors
///
/// Returns [`CommandError::Unavailable`] if the program cannot be spawned and
/// [`CommandError::Failed`] if it exits unsuccessfully.
pub async fn run_command(
    program: &str,
    args: &[&str],
    working_dir: Option<&Path>,
) -> Result<Vec<u8>, CommandError> {
    let command_line = format!("{program} {}", args.join(" "));
    debug!(command = %command_line, "Running command");

    let mut command = Command::new(program);
    if let Some(dir) = working_dir {
        command.current_dir(dir);
    }

    let output = command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| CommandError::Unavailable {
            program: program.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(CommandError::Failed {
            command: command_line,
            code: output.status.code(),
            stderr: output.stderr.trim().to_str_lossy().into_owned(),
        });
    }

    Ok(output.stdout.trim().to_vec())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn can_capture_trimmed_stdout() {
        let stdout = run_command("sh", &["-c", "printf '  hello world \\n\\n'"], None)
            .await
            .unwrap();

        assert_eq!(stdout, b"hello world");
    }

    #[tokio::test]
    async fn failed_command_keeps_exit_code_and_stderr() {
        let error = run_command("sh", &["-c", "echo 'no such remote' >&2; exit 3"], None)
            .await
            .unwrap_err();

        assert_eq!(error.exit_code(), Some(3));
        match error {
            CommandError::Failed { stderr, .. } => assert_eq!(stderr, "no such remote"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let error = run_command("pr-graph-test-missing-binary", &[], None)
            .await
            .unwrap_err();

        assert!(matches!(error, CommandError::Unavailable { .. }));
        assert_eq!(error.exit_code(), None);
    }

    #[tokio::test]
    async fn runs_in_given_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "").unwrap();

        let stdout = run_command("ls", &[], Some(temp.path())).await.unwrap();

        assert_eq!(stdout, b"marker.txt");
    }
}
