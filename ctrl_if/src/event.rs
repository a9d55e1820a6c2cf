//! # Exec event module
//!
//! An exec event is a single change to the inputs of the control executable: a button edge, an
//! axis movement, a mode change, or a sensor reading from a simulated mechanism. Events are
//! delivered as JSON, for example from a timed input script:
//!
//! ```text
//! {"type": "PRESS", "controller": "Driver", "button": "X"}
//! {"type": "AXIS", "controller": "Driver", "axis": "LeftY", "value": 0.5}
//! {"type": "MODE", "mode": "Teleop"}
//! {"type": "GAME_PIECE", "present": true}
//! {"type": "ALGAE", "present": false}
//! ```

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use serde_json::{self, Value};
use thiserror::Error;

use crate::{
    input::{Axis, Button, ControllerId, OperatorInput},
    mode::RobotMode,
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// An input to the control executable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ExecEvent {
    Press {
        controller: ControllerId,
        button: Button,
    },
    Release {
        controller: ControllerId,
        button: Button,
    },
    Axis {
        controller: ControllerId,
        axis: Axis,
        value: f64,
    },
    Mode(RobotMode),
    GamePiece {
        present: bool,
    },
    Algae {
        present: bool,
    },
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("Event contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Event has an invalid type ({0})")]
    InvalidType(String),

    #[error("Event of type {0} is missing or has an invalid field \"{1}\"")]
    InvalidField(String, &'static str),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ExecEvent {
    /// Parse a new event from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, EventParseError> {
        let val: Value = serde_json::from_str(json_str).map_err(EventParseError::InvalidJson)?;

        let event_type = match val["type"].as_str() {
            Some(s) => s.to_string(),
            None => {
                return Err(EventParseError::InvalidType(String::from(
                    "Expected \"type\" to be a string",
                )))
            }
        };

        match event_type.as_str() {
            "PRESS" => Ok(ExecEvent::Press {
                controller: field(&val, &event_type, "controller")?,
                button: field(&val, &event_type, "button")?,
            }),
            "RELEASE" => Ok(ExecEvent::Release {
                controller: field(&val, &event_type, "controller")?,
                button: field(&val, &event_type, "button")?,
            }),
            "AXIS" => Ok(ExecEvent::Axis {
                controller: field(&val, &event_type, "controller")?,
                axis: field(&val, &event_type, "axis")?,
                value: field(&val, &event_type, "value")?,
            }),
            "MODE" => Ok(ExecEvent::Mode(field(&val, &event_type, "mode")?)),
            "GAME_PIECE" => Ok(ExecEvent::GamePiece {
                present: field(&val, &event_type, "present")?,
            }),
            "ALGAE" => Ok(ExecEvent::Algae {
                present: field(&val, &event_type, "present")?,
            }),
            _ => Err(EventParseError::InvalidType(format!(
                "{} is not a recognised event type",
                event_type
            ))),
        }
    }

    /// Apply an operator input event to the given input state.
    ///
    /// Returns `false` if the event is not an operator input event (mode and sensor events must
    /// be handled by the caller).
    pub fn apply_to_input(&self, input: &mut OperatorInput) -> bool {
        match *self {
            ExecEvent::Press { controller, button } => {
                input.controller_mut(controller).set_button(button, true)
            }
            ExecEvent::Release { controller, button } => {
                input.controller_mut(controller).set_button(button, false)
            }
            ExecEvent::Axis {
                controller,
                axis,
                value,
            } => input.controller_mut(controller).set_axis(axis, value),
            _ => return false,
        }

        true
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Deserialise a single named field of an event payload.
fn field<T>(val: &Value, event_type: &str, name: &'static str) -> Result<T, EventParseError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(val[name].clone())
        .map_err(|_| EventParseError::InvalidField(event_type.to_string(), name))
}
