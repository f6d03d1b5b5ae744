//! Process execution for external parser tools.
//!
//! Code is handed to the tool on stdin; the exit status decides success and the
//! captured output carries whatever the tool reported. Both an async flavor
//! (tokio) and a blocking flavor (std) are provided, since one backend is
//! allowed to suspend and the other is not.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::thread;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Result of executing a tool.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Standard output from the tool.
    pub stdout: String,
    /// Standard error from the tool.
    pub stderr: String,
    /// Exit code (-1 when terminated by a signal).
    pub exit_code: i32,
    /// Whether the tool executed successfully (exit code 0).
    pub success: bool,
}

impl ToolOutput {
    fn from_output(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            success: output.status.success(),
        }
    }

    /// The text a failing tool reported: stderr, or stdout when stderr is empty.
    pub fn failure_text(&self) -> String {
        let text = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };
        if text.is_empty() {
            format!("Tool exited with code {}", self.exit_code)
        } else {
            text.to_string()
        }
    }
}

/// Error during tool execution.
#[derive(Debug, Clone, Error)]
pub enum ExecutorError {
    /// Tool binary not found in PATH.
    #[error("Tool '{tool}' not found in PATH")]
    ToolNotFound { tool: String },
    /// Tool ran but could not be used.
    #[error("Tool '{tool}' failed: {message}")]
    ExecutionFailed { tool: String, message: String },
    /// I/O error during execution.
    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Locate `tool` the way a shell would: paths are taken as-is, bare names are
/// searched on PATH.
pub fn resolve_tool(tool: &str) -> Result<PathBuf, ExecutorError> {
    if tool.is_empty() {
        return Err(ExecutorError::ExecutionFailed {
            tool: "unknown".to_string(),
            message: "Empty command".to_string(),
        });
    }

    let candidate = Path::new(tool);
    if candidate.components().count() > 1 {
        return if candidate.is_file() {
            Ok(candidate.to_path_buf())
        } else {
            Err(ExecutorError::ToolNotFound { tool: tool.to_string() })
        };
    }

    let path_var = std::env::var_os("PATH").unwrap_or_default();
    for dir in std::env::split_paths(&path_var) {
        let full = dir.join(tool);
        if full.is_file() {
            return Ok(full);
        }
        #[cfg(windows)]
        {
            let exe = full.with_extension("exe");
            if exe.is_file() {
                return Ok(exe);
            }
        }
    }

    Err(ExecutorError::ToolNotFound { tool: tool.to_string() })
}

/// Run `program args..` with `input` on stdin, without blocking the runtime.
pub async fn run_async(program: &Path, args: &[String], input: &str) -> Result<ToolOutput, ExecutorError> {
    let mut child = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| spawn_error(program, e))?;

    // Feed stdin while the output is drained so a chatty tool cannot deadlock on a full pipe
    let stdin = child.stdin.take();
    let write_input = async move {
        match stdin {
            Some(mut stdin) => stdin.write_all(input.as_bytes()).await,
            None => Ok(()),
        }
    };
    let (written, output) = tokio::join!(write_input, child.wait_with_output());

    let output = output.map_err(|e| ExecutorError::IoError {
        message: format!("Failed to wait for '{}': {e}", program.display()),
    })?;
    // The tool may exit before reading all of its input; its output still counts
    if let Err(e) = written {
        log::debug!("Tool '{}' closed stdin early: {e}", program.display());
    }

    Ok(ToolOutput::from_output(output))
}

/// Blocking counterpart of [`run_async`].
pub fn run_blocking(program: &Path, args: &[String], input: &str) -> Result<ToolOutput, ExecutorError> {
    let mut child = std::process::Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(program, e))?;

    // Feed stdin from its own thread so a chatty tool cannot deadlock on a full pipe
    let writer = child.stdin.take().map(|mut stdin| {
        let input = input.to_string();
        thread::spawn(move || stdin.write_all(input.as_bytes()))
    });

    let output = child.wait_with_output().map_err(|e| ExecutorError::IoError {
        message: format!("Failed to wait for '{}': {e}", program.display()),
    })?;

    if let Some(writer) = writer {
        match writer.join() {
            Ok(Ok(())) => {}
            // The tool may exit before reading all of its input; its output still counts
            Ok(Err(e)) => log::debug!("Tool '{}' closed stdin early: {e}", program.display()),
            Err(_) => {
                return Err(ExecutorError::IoError {
                    message: "Input writer thread panicked".to_string(),
                });
            }
        }
    }

    Ok(ToolOutput::from_output(output))
}

fn spawn_error(program: &Path, e: std::io::Error) -> ExecutorError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ExecutorError::ToolNotFound {
            tool: program.display().to_string(),
        }
    } else {
        ExecutorError::IoError {
            message: format!("Failed to spawn '{}': {e}", program.display()),
        }
    }
}
