//! Optional device capabilities (haptic feedback, clipboard).
//!
//! Callers never check for support themselves: they hold a [`Capabilities`]
//! bundle whose members fall back to no-ops when the host has nothing to
//! offer.

use crate::error::Result;
use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Haptics
// ---------------------------------------------------------------------------

/// Vibration patterns, in milliseconds (on, off, on, ...).
pub mod pulse {
    pub const TAP: &[u32] = &[20];
    pub const TOGGLE: &[u32] = &[30];
    pub const CONFIRM: &[u32] = &[50];
    pub const REMOVE: &[u32] = &[100];
    pub const CLEAR_ALL: &[u32] = &[100, 50, 100];
}

pub trait Haptics: Send + Sync {
    fn pulse(&self, pattern: &[u32]);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&self, _pattern: &[u32]) {}
}

/// Records pulses to the trace log; useful on hosts without a vibration motor.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHaptics;

impl Haptics for TracingHaptics {
    fn pulse(&self, pattern: &[u32]) {
        tracing::debug!(?pattern, "haptic pulse");
    }
}

// ---------------------------------------------------------------------------
// Clipboard
// ---------------------------------------------------------------------------

pub trait Clipboard: Send + Sync {
    /// Copy `text`. Returns `Ok(false)` when no clipboard is available.
    fn copy(&self, text: &str) -> Result<bool>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn copy(&self, _text: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Pipes text into a platform clipboard tool (`pbcopy`, `wl-copy`, `xclip`, `clip`).
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: PathBuf,
    args: Vec<String>,
}

const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("clip", &[]),
];

impl CommandClipboard {
    pub fn detect() -> Option<Self> {
        CLIPBOARD_TOOLS.iter().find_map(|(name, args)| {
            which::which(name).ok().map(|program| Self {
                program,
                args: args.iter().map(|a| a.to_string()).collect(),
            })
        })
    }
}

impl Clipboard for CommandClipboard {
    fn copy(&self, text: &str) -> Result<bool> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        // Reap the child even when the write failed.
        let status = child.wait()?;
        written?;
        Ok(status.success())
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Capabilities {
    pub haptics: Arc<dyn Haptics>,
    pub clipboard: Arc<dyn Clipboard>,
}

impl Capabilities {
    /// Every capability disabled.
    pub fn none() -> Self {
        Self {
            haptics: Arc::new(NoHaptics),
            clipboard: Arc::new(NoClipboard),
        }
    }

    /// Probe the host: clipboard tools on PATH, haptics to the trace log.
    pub fn detect() -> Self {
        let clipboard: Arc<dyn Clipboard> = match CommandClipboard::detect() {
            Some(c) => Arc::new(c),
            None => Arc::new(NoClipboard),
        };
        Self {
            haptics: Arc::new(TracingHaptics),
            clipboard,
        }
    }

    pub fn with_haptics(mut self, haptics: Arc<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_clipboard_reports_unsupported() {
        assert!(!NoClipboard.copy("text").unwrap());
    }

    #[test]
    fn none_is_silent() {
        let caps = Capabilities::none();
        caps.haptics.pulse(pulse::CLEAR_ALL);
        assert!(!caps.clipboard.copy("x").unwrap());
    }

    #[test]
    fn recording_haptics_captures_patterns() {
        let rec = Arc::new(testing::RecordingHaptics::default());
        let caps = Capabilities::none().with_haptics(rec.clone());
        caps.haptics.pulse(pulse::CONFIRM);
        assert_eq!(*rec.pulses.lock().unwrap(), vec![vec![50]]);
    }

    #[cfg(unix)]
    #[test]
    fn clipboard_tool_that_exits_early_is_an_error() {
        let clipboard = CommandClipboard {
            program: PathBuf::from("true"),
            args: Vec::new(),
        };
        let text = "x".repeat(1 << 20);
        assert!(clipboard.copy(&text).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn clipboard_tool_that_reads_input_succeeds() {
        let clipboard = CommandClipboard {
            program: PathBuf::from("cat"),
            args: Vec::new(),
        };
        assert!(clipboard.copy("4-3-3").unwrap());
    }
}
