//! Clipboard access through the platform's command-line tools.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use promptbook_core::PromptBookError;
use promptbook_core::clipboard::Clipboard;
use promptbook_core::error::Result;

/// One clipboard helper program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ClipboardCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Writes text by piping it into the first available helper program.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    candidates: Vec<ClipboardCommand>,
}

impl SystemClipboard {
    /// Helpers for the current platform, most specific first.
    pub fn new() -> Self {
        Self {
            candidates: Self::platform_candidates(),
        }
    }

    /// Uses exactly the given helpers.
    pub fn with_commands(candidates: Vec<ClipboardCommand>) -> Self {
        Self { candidates }
    }

    fn platform_candidates() -> Vec<ClipboardCommand> {
        if cfg!(target_os = "macos") {
            vec![ClipboardCommand::new("pbcopy", &[])]
        } else if cfg!(windows) {
            vec![ClipboardCommand::new("clip", &[])]
        } else {
            let mut candidates = Vec::new();
            if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                candidates.push(ClipboardCommand::new("wl-copy", &[]));
            }
            candidates.push(ClipboardCommand::new("xclip", &["-selection", "clipboard"]));
            candidates.push(ClipboardCommand::new("xsel", &["--clipboard", "--input"]));
            candidates
        }
    }

    async fn pipe_into(command: &ClipboardCommand, text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // Dropping stdin closes the pipe so the helper sees EOF.
        }

        Ok(child.wait().await?.success())
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut failures = Vec::new();

        for command in &self.candidates {
            match Self::pipe_into(command, text).await {
                Ok(true) => {
                    tracing::debug!("Copied {} bytes via {}", text.len(), command.program);
                    return Ok(());
                }
                Ok(false) => failures.push(format!("{} exited with an error", command.program)),
                Err(e) => failures.push(format!("{}: {}", command.program, e)),
            }
        }

        Err(PromptBookError::clipboard(if failures.is_empty() {
            "No clipboard helper configured".to_string()
        } else {
            failures.join("; ")
        }))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_working_helper_wins() {
        let clipboard = SystemClipboard::with_commands(vec![
            ClipboardCommand::new("promptbook-no-such-helper", &[]),
            ClipboardCommand::new("cat", &[]),
        ]);

        clipboard.write_text("hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_all_helpers_failing_is_clipboard_error() {
        let clipboard = SystemClipboard::with_commands(vec![
            ClipboardCommand::new("promptbook-no-such-helper", &[]),
            ClipboardCommand::new("false", &[]),
        ]);

        let err = clipboard.write_text("hello").await.unwrap_err();
        assert!(err.is_clipboard());
        assert!(err.to_string().contains("false"));
    }

    #[tokio::test]
    async fn test_no_helpers() {
        let clipboard = SystemClipboard::with_commands(Vec::new());
        assert!(clipboard.write_text("x").await.unwrap_err().is_clipboard());
    }
}
