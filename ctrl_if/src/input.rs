//! # Operator input module
//!
//! Models the two operator controllers (driver and manipulator) as a set of held buttons and a
//! set of analog axis values. The state is sampled once per cycle by the triggers bound to it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The state of a single controller.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ControllerState {
    /// Buttons currently held down
    buttons: BTreeSet<Button>,

    /// Current axis values, in the range [-1, 1]. Missing axes read as zero.
    axes: BTreeMap<Axis, f64>,
}

/// The state of all operator controllers.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct OperatorInput {
    pub driver: ControllerState,
    pub manipulator: ControllerState,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Identifies one of the operator controllers.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ControllerId {
    Driver,
    Manipulator,
}

/// Digital controls on a controller. The POV hat is modelled as four buttons.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    Back,
    Start,
    PovUp,
    PovDown,
    PovLeft,
    PovRight,
}

/// Analog controls on a controller.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ControllerState {
    /// Returns true if the button is held down.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons.contains(&button)
    }

    /// Returns the value of the axis, or zero if it has never been set.
    pub fn axis(&self, axis: Axis) -> f64 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    /// Set an axis value, clamped into [-1, 1].
    pub fn set_axis(&mut self, axis: Axis, value: f64) {
        self.axes.insert(axis, value.max(-1.0).min(1.0));
    }

    /// Release every button and zero every axis.
    pub fn clear(&mut self) {
        self.buttons.clear();
        self.axes.clear();
    }
}

impl OperatorInput {
    pub fn controller(&self, id: ControllerId) -> &ControllerState {
        match id {
            ControllerId::Driver => &self.driver,
            ControllerId::Manipulator => &self.manipulator,
        }
    }

    pub fn controller_mut(&mut self, id: ControllerId) -> &mut ControllerState {
        match id {
            ControllerId::Driver => &mut self.driver,
            ControllerId::Manipulator => &mut self.manipulator,
        }
    }

    /// Returns true if the button on the given controller is held down.
    pub fn is_pressed(&self, id: ControllerId, button: Button) -> bool {
        self.controller(id).is_pressed(button)
    }
}
