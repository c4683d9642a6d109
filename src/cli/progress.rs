//! Progress reporting for the histopack CLI
//!
//! Provides adaptive progress feedback that works correctly in:
//! - TTY mode: Animated spinners and progress bars
//! - Non-TTY mode: Simple line-by-line output
//! - Robot mode: JSON progress events to stderr
//! - Quiet mode: No output
//!
//! Handles are `Sync`, so a sweep can tick one bar from rayon workers.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

// ============================================================================
// Progress Mode Detection
// ============================================================================

/// Progress output mode based on terminal capabilities and user preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// TTY mode: animated spinners and progress bars
    Tty,
    /// Non-TTY mode: simple line-by-line output to stderr
    NonTty,
    /// Robot mode: JSON progress events to stderr
    Robot,
    /// Quiet mode: no progress output
    Quiet,
}

impl ProgressMode {
    /// Detect the appropriate progress mode based on environment
    #[must_use]
    pub fn detect(robot_mode: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if robot_mode {
            Self::Robot
        } else if std::io::stderr().is_terminal() {
            Self::Tty
        } else {
            Self::NonTty
        }
    }
}

// ============================================================================
// Progress Events (Robot Mode)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressEventType {
    SpinnerStart,
    SpinnerComplete,
    SpinnerError,
    ProgressStart,
    ProgressUpdate,
    ProgressComplete,
    ProgressError,
}

/// JSON progress event for robot mode
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub event: ProgressEventType,
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: String,
}

impl ProgressEvent {
    fn new(event: ProgressEventType, operation: &str) -> Self {
        Self {
            event_type: "progress",
            event,
            operation: operation.to_string(),
            current: None,
            total: None,
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    const fn with_progress(mut self, current: u64, total: Option<u64>) -> Self {
        self.current = Some(current);
        self.total = total;
        self
    }

    fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            eprintln!("{json}");
        }
    }
}

// ============================================================================
// Progress Reporter
// ============================================================================

/// Creates spinners and bars suited to the current output context.
pub struct ProgressReporter {
    mode: ProgressMode,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(robot_mode: bool, quiet: bool) -> Self {
        Self {
            mode: ProgressMode::detect(robot_mode, quiet),
        }
    }

    #[must_use]
    pub const fn with_mode(mode: ProgressMode) -> Self {
        Self { mode }
    }

    /// Create a spinner for indeterminate operations
    pub fn spinner(&self, msg: &str) -> ProgressHandle {
        match self.mode {
            ProgressMode::Quiet => ProgressHandle::Noop,

            ProgressMode::Robot => {
                ProgressEvent::new(ProgressEventType::SpinnerStart, msg).emit();
                ProgressHandle::Robot {
                    operation: msg.to_string(),
                    is_spinner: true,
                    total: None,
                    position: AtomicU64::new(0),
                }
            }

            ProgressMode::NonTty => {
                eprintln!("[histopack] {msg}...");
                ProgressHandle::NonTty
            }

            ProgressMode::Tty => {
                let pb = ProgressBar::new_spinner();
                let style = ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner());
                pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
                pb.set_message(msg.to_string());
                pb.enable_steady_tick(Duration::from_millis(100));
                ProgressHandle::Tty(pb)
            }
        }
    }

    /// Create a progress bar for determinate operations
    pub fn progress(&self, total: u64, msg: &str) -> ProgressHandle {
        match self.mode {
            ProgressMode::Quiet => ProgressHandle::Noop,

            ProgressMode::Robot => {
                ProgressEvent::new(ProgressEventType::ProgressStart, msg)
                    .with_progress(0, Some(total))
                    .emit();
                ProgressHandle::Robot {
                    operation: msg.to_string(),
                    is_spinner: false,
                    total: Some(total),
                    position: AtomicU64::new(0),
                }
            }

            ProgressMode::NonTty => {
                eprintln!("[histopack] {msg} (0/{total})");
                ProgressHandle::NonTty
            }

            ProgressMode::Tty => {
                let pb = ProgressBar::new(total);
                let style = ProgressStyle::default_bar()
                    .template("{spinner:.cyan} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar());
                pb.set_style(style.progress_chars("█▓▒░"));
                pb.set_message(msg.to_string());
                ProgressHandle::Tty(pb)
            }
        }
    }

    /// Log a warning (respects quiet mode)
    pub fn warn(&self, msg: &str) {
        match self.mode {
            ProgressMode::Quiet => {}
            ProgressMode::Robot => {
                if let Ok(json) = serde_json::to_string(&warning_event(msg)) {
                    eprintln!("{json}");
                }
            }
            ProgressMode::NonTty | ProgressMode::Tty => {
                eprintln!("[histopack] WARN: {msg}");
            }
        }
    }
}

fn warning_event(msg: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "warning",
        "message": msg,
        "timestamp": Utc::now().to_rfc3339(),
    })
}

// ============================================================================
// Progress Handle
// ============================================================================

/// Handle for updating or finishing a progress indicator
pub enum ProgressHandle {
    /// TTY mode: wraps an indicatif ProgressBar
    Tty(ProgressBar),

    /// Non-TTY mode: start and finish lines only
    NonTty,

    /// Robot mode: JSON events
    Robot {
        operation: String,
        is_spinner: bool,
        total: Option<u64>,
        position: AtomicU64,
    },

    /// Quiet mode: no-op
    Noop,
}

impl ProgressHandle {
    /// Increment the progress by a given amount
    pub fn inc(&self, delta: u64) {
        match self {
            Self::Tty(pb) => pb.inc(delta),
            Self::Robot {
                operation,
                total,
                position,
                ..
            } => {
                let current = position.fetch_add(delta, Ordering::Relaxed) + delta;
                ProgressEvent::new(ProgressEventType::ProgressUpdate, operation)
                    .with_progress(current, *total)
                    .emit();
            }
            Self::NonTty | Self::Noop => {}
        }
    }

    /// Finish with a success message
    pub fn finish_with_message(&self, msg: &str) {
        match self {
            Self::Tty(pb) => pb.finish_with_message(format!("✓ {msg}")),
            Self::Robot {
                operation,
                is_spinner,
                ..
            } => {
                let event_type = if *is_spinner {
                    ProgressEventType::SpinnerComplete
                } else {
                    ProgressEventType::ProgressComplete
                };
                ProgressEvent::new(event_type, operation)
                    .with_message(msg)
                    .emit();
            }
            Self::NonTty => eprintln!("[histopack] ✓ {msg}"),
            Self::Noop => {}
        }
    }

    /// Finish without a message, clearing any spinner
    pub fn finish(&self) {
        match self {
            Self::Tty(pb) => pb.finish_and_clear(),
            Self::Robot {
                operation,
                is_spinner,
                ..
            } => {
                let event_type = if *is_spinner {
                    ProgressEventType::SpinnerComplete
                } else {
                    ProgressEventType::ProgressComplete
                };
                ProgressEvent::new(event_type, operation).emit();
            }
            Self::NonTty | Self::Noop => {}
        }
    }

    /// Abandon with an error message
    pub fn abandon_with_message(&self, msg: &str) {
        match self {
            Self::Tty(pb) => pb.abandon_with_message(format!("✗ {msg}")),
            Self::Robot {
                operation,
                is_spinner,
                ..
            } => {
                let event_type = if *is_spinner {
                    ProgressEventType::SpinnerError
                } else {
                    ProgressEventType::ProgressError
                };
                ProgressEvent::new(event_type, operation)
                    .with_message(msg)
                    .emit();
            }
            Self::NonTty => eprintln!("[histopack] ✗ ERROR: {msg}"),
            Self::Noop => {}
        }
    }

    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}
