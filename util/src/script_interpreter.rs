//! # Input script interpreter module
//!
//! This module provides an interpreter for timed input scripts, allowing operator inputs, mode
//! changes and simulated sensor readings to be replayed into the control executable.
//!
//! A script is a list of `<time_s>: <json event>;` entries, for example:
//!
//! ```text
//! 0.0: {"type": "MODE", "mode": "Teleop"};
//! 1.5: {"type": "PRESS", "controller": "Driver", "button": "X"};
//! 4.0: {"type": "RELEASE", "controller": "Driver", "button": "X"};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use ctrl_if::event::{EventParseError, ExecEvent};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An event which is scripted to occur at a specific time.
struct ScriptedEvent {
    /// The time the event is supposed to be delivered at
    exec_time_s: f64,

    event: ExecEvent,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending_events` to
/// acquire a list of events that need delivering.
pub struct ScriptInterpreter {
    script_path: Option<PathBuf>,
    events: VecDeque<ScriptedEvent>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script timestamps must not decrease, found {1} s after {0} s")]
    OutOfOrder(f64, f64),

    #[error("Script contains an invalid event at {0} s: {1}")]
    InvalidEvent(f64, EventParseError),
}

pub enum PendingEvents {
    None,
    Some(Vec<ExecEvent>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = PathBuf::from(script_path.as_ref());

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        let script = fs::read_to_string(&path).map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_script(&script)?;
        si.script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {
        let mut queue: VecDeque<ScriptedEvent> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(|e| ScriptError::InvalidTimestamp(e.to_string()))?;

        for cap in re.captures_iter(script) {
            let (time_str, payload) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue,
            };

            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(last) = queue.back() {
                if exec_time_s < last.exec_time_s {
                    return Err(ScriptError::OutOfOrder(last.exec_time_s, exec_time_s));
                }
            }

            let event = ExecEvent::from_json(payload)
                .map_err(|e| ScriptError::InvalidEvent(exec_time_s, e))?;

            queue.push_back(ScriptedEvent { exec_time_s, event });
        }

        if queue.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(ScriptInterpreter {
            script_path: None,
            events: queue,
        })
    }

    /// Return the events which are due at `current_time_s`, in script order.
    pub fn get_pending_events(&mut self, current_time_s: f64) -> PendingEvents {
        // If the queue is empty the script is over
        if self.events.is_empty() {
            return PendingEvents::EndOfScript;
        }

        let mut due = vec![];

        while let Some(front) = self.events.front() {
            if front.exec_time_s > current_time_s {
                break;
            }
            if let Some(e) = self.events.pop_front() {
                due.push(e.event);
            }
        }

        if due.is_empty() {
            PendingEvents::None
        } else {
            PendingEvents::Some(due)
        }
    }

    /// Get the number of events remaining in the script
    pub fn get_num_events(&self) -> usize {
        self.events.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.events.back() {
            Some(c) => c.exec_time_s,
            None => 0f64,
        }
    }

    pub fn script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }
}
