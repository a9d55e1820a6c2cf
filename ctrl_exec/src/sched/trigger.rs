//! # Triggers
//!
//! A trigger is a boolean condition over the world, sampled once per cycle. The value is compared
//! with the previous sample to produce an [`Edge`], and each binding maps edges to a response on
//! the actions it launches.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use super::{action::ActionFactory, ActionId};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct Trigger<W> {
    name: String,
    condition: Box<dyn Fn(&W) -> bool>,

    /// Value of the condition at the last sample, `false` before the first.
    previous: bool,

    pub(crate) bindings: Vec<Binding<W>>,
}

pub(crate) struct Binding<W> {
    pub(crate) kind: BindingKind,
    pub(crate) factory: ActionFactory<W>,

    /// The instance most recently launched by this binding.
    pub(crate) instance: Option<ActionId>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Change in a trigger's value between two consecutive samples.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Edge {
    Rising,
    Falling,
    SteadyTrue,
    SteadyFalse,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BindingKind {
    /// Start the action when the condition becomes true.
    OnTrue,

    /// Start the action when the condition becomes false.
    OnFalse,

    /// Start the action when the condition becomes true, interrupt it when it becomes false.
    WhileTrue,

    /// Start the action when the condition becomes false, interrupt it when it becomes true.
    WhileFalse,

    /// Start the action when the condition becomes true, or interrupt it if it is running.
    ToggleOnTrue,
}

/// What the scheduler should do with a binding's action this cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Response {
    Start,
    Stop,
    Toggle,
    Nothing,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Edge {
    pub fn detect(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => Edge::Rising,
            (true, false) => Edge::Falling,
            (true, true) => Edge::SteadyTrue,
            (false, false) => Edge::SteadyFalse,
        }
    }
}

impl BindingKind {
    pub(crate) fn response(&self, edge: Edge) -> Response {
        match (self, edge) {
            (BindingKind::OnTrue, Edge::Rising) => Response::Start,
            (BindingKind::OnFalse, Edge::Falling) => Response::Start,
            (BindingKind::WhileTrue, Edge::Rising) => Response::Start,
            (BindingKind::WhileTrue, Edge::Falling) => Response::Stop,
            (BindingKind::WhileFalse, Edge::Falling) => Response::Start,
            (BindingKind::WhileFalse, Edge::Rising) => Response::Stop,
            (BindingKind::ToggleOnTrue, Edge::Rising) => Response::Toggle,
            _ => Response::Nothing,
        }
    }
}

impl<W: 'static> Trigger<W> {
    pub fn new<F>(name: &str, condition: F) -> Self
    where
        F: Fn(&W) -> bool + 'static,
    {
        Self {
            name: name.to_string(),
            condition: Box::new(condition),
            previous: false,
            bindings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bind(mut self, kind: BindingKind, factory: ActionFactory<W>) -> Self {
        self.bindings.push(Binding {
            kind,
            factory,
            instance: None,
        });
        self
    }

    pub fn on_true(self, factory: ActionFactory<W>) -> Self {
        self.bind(BindingKind::OnTrue, factory)
    }

    pub fn on_false(self, factory: ActionFactory<W>) -> Self {
        self.bind(BindingKind::OnFalse, factory)
    }

    pub fn while_true(self, factory: ActionFactory<W>) -> Self {
        self.bind(BindingKind::WhileTrue, factory)
    }

    pub fn while_false(self, factory: ActionFactory<W>) -> Self {
        self.bind(BindingKind::WhileFalse, factory)
    }

    pub fn toggle_on_true(self, factory: ActionFactory<W>) -> Self {
        self.bind(BindingKind::ToggleOnTrue, factory)
    }

    /// Evaluate the condition and return the edge relative to the previous sample.
    pub(crate) fn sample(&mut self, world: &W) -> Edge {
        let current = (self.condition)(world);
        let edge = Edge::detect(self.previous, current);
        self.previous = current;
        edge
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_edge_detect() {
        assert_eq!(Edge::detect(false, true), Edge::Rising);
        assert_eq!(Edge::detect(true, false), Edge::Falling);
        assert_eq!(Edge::detect(true, true), Edge::SteadyTrue);
        assert_eq!(Edge::detect(false, false), Edge::SteadyFalse);
    }

    #[test]
    fn test_binding_responses() {
        assert_eq!(BindingKind::OnTrue.response(Edge::Rising), Response::Start);
        assert_eq!(BindingKind::OnTrue.response(Edge::SteadyTrue), Response::Nothing);
        assert_eq!(BindingKind::OnFalse.response(Edge::Falling), Response::Start);
        assert_eq!(BindingKind::WhileTrue.response(Edge::Falling), Response::Stop);
        assert_eq!(BindingKind::WhileFalse.response(Edge::Falling), Response::Start);
        assert_eq!(BindingKind::WhileFalse.response(Edge::Rising), Response::Stop);
        assert_eq!(BindingKind::ToggleOnTrue.response(Edge::Rising), Response::Toggle);
        assert_eq!(BindingKind::ToggleOnTrue.response(Edge::Falling), Response::Nothing);
    }

    #[test]
    fn test_sample_starts_low() {
        let mut trigger: Trigger<bool> = Trigger::new("flag", |w| *w);

        // Already true on the first sample gives a rising edge
        assert_eq!(trigger.sample(&true), Edge::Rising);
        assert_eq!(trigger.sample(&true), Edge::SteadyTrue);
        assert_eq!(trigger.sample(&false), Edge::Falling);
        assert_eq!(trigger.sample(&false), Edge::SteadyFalse);
    }
}
