//! Native text prompts for collecting holdings.
//!
//! [`TextPrompt`] is the capability the UI depends on; the platform
//! implementations shell out to the OS dialog helper. Prompts block until
//! the user answers, so callers run them off the async runtime.

use std::ffi::OsStr;
use std::process::{Command, Output};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::PromptMode;
use crate::{BtcBarError, Result};

/// Marker preceding the entered text in `osascript` dialog output.
const TEXT_RETURNED_MARKER: &str = "text returned:";

/// Something that can ask the user for a line of text.
pub trait TextPrompt: Send + Sync {
    /// Shows `message` with `default_answer` prefilled.
    ///
    /// Returns `Ok(None)` if the user cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`BtcBarError::Prompt`] if the dialog could not be shown.
    fn prompt_for_text(&self, message: &str, default_answer: &str) -> Result<Option<String>>;
}

/// macOS `display dialog` through `osascript`.
#[derive(Clone, Debug, Default)]
pub struct AppleScriptPrompt;

impl TextPrompt for AppleScriptPrompt {
    fn prompt_for_text(&self, message: &str, default_answer: &str) -> Result<Option<String>> {
        let script = format!(
            "display dialog \"{}\" default answer \"{}\" with title \"btcbar\"",
            escape_applescript(message),
            escape_applescript(default_answer),
        );

        let output = run_dialog(Command::new("osascript").arg("-e").arg(&script))?;
        if !output.status.success() {
            debug!(status = ?output.status, "Dialog cancelled");
            return Ok(None);
        }

        Ok(parse_dialog_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// GTK entry dialog through `zenity`.
#[derive(Clone, Debug, Default)]
pub struct ZenityPrompt;

impl TextPrompt for ZenityPrompt {
    fn prompt_for_text(&self, message: &str, default_answer: &str) -> Result<Option<String>> {
        let output = run_dialog(
            Command::new("zenity")
                .arg("--entry")
                .arg("--title=btcbar")
                .arg(format!("--text={message}"))
                .arg(format!("--entry-text={default_answer}")),
        )?;

        if !output.status.success() {
            debug!(status = ?output.status, "Dialog cancelled");
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
    }
}

/// Runs a dialog helper, mapping a failed launch to [`BtcBarError::Prompt`].
fn run_dialog(command: &mut Command) -> Result<Output> {
    command.output().map_err(|e| {
        let program = command.get_program().to_string_lossy().into_owned();
        warn!(program, "Failed to launch dialog: {e}");
        BtcBarError::Prompt(format!("cannot run {program}: {e}"))
    })
}

/// Extracts the entered text from `osascript` dialog output such as
/// `button returned:OK, text returned:0.5`.
pub fn parse_dialog_output(output: &str) -> Option<String> {
    let (_, rest) = output.split_once(TEXT_RETURNED_MARKER)?;
    Some(rest.trim().to_string())
}

/// Escapes backslashes and quotes for an AppleScript string literal.
fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Whether an executable named `binary` exists in one of the `PATH`
/// entries in `path`.
fn found_on_path(binary: &str, path: &OsStr) -> bool {
    std::env::split_paths(path).any(|dir| dir.join(binary).is_file())
}

fn on_path(binary: &str) -> bool {
    std::env::var_os("PATH").is_some_and(|path| found_on_path(binary, &path))
}

fn has_display() -> bool {
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|v| !v.is_empty()))
}

/// Returns this platform's dialog without checking that it can run.
fn platform_prompt() -> Option<Arc<dyn TextPrompt>> {
    if cfg!(target_os = "macos") {
        Some(Arc::new(AppleScriptPrompt))
    } else if cfg!(target_os = "linux") {
        Some(Arc::new(ZenityPrompt))
    } else {
        None
    }
}

/// Returns this platform's dialog only if its helper is installed and,
/// on Linux, a graphical session is present.
fn available_prompt() -> Option<Arc<dyn TextPrompt>> {
    if cfg!(target_os = "macos") && on_path("osascript") {
        return Some(Arc::new(AppleScriptPrompt));
    }
    if cfg!(target_os = "linux") && has_display() && on_path("zenity") {
        return Some(Arc::new(ZenityPrompt));
    }

    debug!("No usable native dialog, using terminal input");
    None
}

/// Picks the prompt implementation for `mode`.
///
/// `None` means holdings are entered in the terminal UI. A native prompt
/// that later fails to launch also falls back to terminal input.
pub fn select_prompt(mode: PromptMode) -> Option<Arc<dyn TextPrompt>> {
    match mode {
        PromptMode::Terminal => None,
        PromptMode::Auto => available_prompt(),
        PromptMode::Native => {
            let prompt = platform_prompt();
            if prompt.is_none() {
                warn!("No native prompt on this platform, using terminal input");
            }
            prompt
        }
    }
}
