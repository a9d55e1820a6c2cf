//! # Actions
//!
//! An [`Action`] is a schedulable, interruptible unit of work which declares the resources it
//! needs. The kind of an action is a tagged variant: a leaf wrapping user behaviour behind the
//! [`Leaf`] trait, or one of the composites ([`Sequence`], [`Parallel`], [`Repeat`]) or an
//! interrupt group. The scheduler drives every action through
//! `Scheduled -> Running -> {Finished | Interrupted}`; an action never schedules itself and a
//! terminal instance is never run again.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{error::Error, fmt::Display, rc::Rc};

use super::{
    composite::{Parallel, ParallelMode, Repeat, Sequence},
    resource::ResourceSet,
};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Behaviour of a leaf action.
///
/// A leaf holds only the data it was constructed with; everything else is read from or written to
/// the world passed into each call. None of these functions may block.
pub trait Leaf<W> {
    /// Called once, on the first step after the action is scheduled.
    fn init(&mut self, _world: &mut W) {}

    /// Called once per cycle while the action is running.
    fn execute(&mut self, world: &mut W);

    /// Completion predicate, evaluated after `execute` each cycle.
    fn is_finished(&self, _world: &W) -> bool {
        false
    }

    /// Called exactly once when the action leaves the running state. `interrupted` is true if
    /// the action was cancelled or displaced rather than finishing on its own.
    fn end(&mut self, _world: &mut W, _interrupted: bool) {}
}

/// Worlds which can report the current time, needed by time based actions.
pub trait WorldClock {
    /// Current time in seconds. Must not decrease.
    fn time_s(&self) -> f64;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Unique identifier of a scheduled action instance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ActionId(pub(crate) u64);

pub struct Action<W> {
    name: String,
    state: ActionState,
    kind: ActionKind<W>,
}

/// Builds fresh action instances from the current world.
///
/// Bindings and default actions hold factories rather than instances, so that every start
/// constructs a new action and anything it derives from the world (for example an alignment
/// target) is recomputed.
pub struct ActionFactory<W> {
    name: String,
    make: Rc<dyn Fn(&W) -> BuildResult<W>>,
}

/// Wait for a duration of world time.
struct Wait {
    duration_s: f64,
    start_s: f64,
}

/// Leaf built from a closure.
struct FnLeaf<W> {
    body: Box<dyn FnMut(&mut W)>,
    once: bool,
    ran: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

pub type BuildResult<W> = Result<Action<W>, Box<dyn Error>>;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ActionState {
    Scheduled,
    Running,
    Finished,
    Interrupted,
}

pub enum ActionKind<W> {
    Leaf {
        requirements: ResourceSet,
        body: Box<dyn Leaf<W>>,
    },
    Sequence(Sequence<W>),
    Parallel(Parallel<W>),
    Repeat(Repeat<W>),

    /// Claims the resources and finishes on its first step, displacing their owners.
    InterruptGroup(ResourceSet),
}

/// How far an interrupt caused by a resource conflict reached into an action.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Cascade {
    /// The action did not require any of the conflicting resources.
    Untouched,

    /// Only some children were interrupted, the action keeps running.
    Partial,

    /// The whole action was interrupted.
    Whole,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ActionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionState::Finished | ActionState::Interrupted)
    }
}

impl<W: 'static> Action<W> {
    fn from_kind(name: &str, kind: ActionKind<W>) -> Self {
        Self {
            name: name.to_string(),
            state: ActionState::Scheduled,
            kind,
        }
    }

    /// A leaf action with the given behaviour.
    pub fn leaf<L>(name: &str, requirements: ResourceSet, body: L) -> Self
    where
        L: Leaf<W> + 'static,
    {
        Self::from_kind(
            name,
            ActionKind::Leaf {
                requirements,
                body: Box::new(body),
            },
        )
    }

    /// Runs the closure once and finishes.
    pub fn instant<F>(name: &str, requirements: ResourceSet, body: F) -> Self
    where
        F: FnMut(&mut W) + 'static,
    {
        Self::leaf(
            name,
            requirements,
            FnLeaf {
                body: Box::new(body),
                once: true,
                ran: false,
            },
        )
    }

    /// Runs the closure every cycle, never finishing on its own.
    pub fn run<F>(name: &str, requirements: ResourceSet, body: F) -> Self
    where
        F: FnMut(&mut W) + 'static,
    {
        Self::leaf(
            name,
            requirements,
            FnLeaf {
                body: Box::new(body),
                once: false,
                ran: false,
            },
        )
    }

    /// Runs the children one after the other.
    pub fn sequence(children: Vec<Action<W>>) -> Self {
        Self::from_kind("Sequence", ActionKind::Sequence(Sequence::new(children)))
    }

    /// Runs the children together until any one of them finishes.
    pub fn race(children: Vec<Action<W>>) -> Self {
        Self::from_kind(
            "Race",
            ActionKind::Parallel(Parallel::new(children, ParallelMode::Race)),
        )
    }

    /// Runs the children together until all of them have finished.
    pub fn parallel(children: Vec<Action<W>>) -> Self {
        Self::from_kind(
            "Parallel",
            ActionKind::Parallel(Parallel::new(children, ParallelMode::All)),
        )
    }

    /// Runs a fresh action from `make` each time the previous one finishes. Never finishes on its
    /// own.
    pub fn repeat<F>(make: F) -> Self
    where
        F: Fn() -> Action<W> + 'static,
    {
        let repeat = Repeat::new(Rc::new(make));
        let name = format!("Repeat({})", repeat.inner_name());
        Self::from_kind(&name, ActionKind::Repeat(repeat))
    }

    /// Claims the resources, displacing whatever owns them, and finishes immediately.
    pub fn interrupt_group(requirements: ResourceSet) -> Self {
        Self::from_kind("InterruptGroup", ActionKind::InterruptGroup(requirements))
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn kind(&self) -> &ActionKind<W> {
        &self.kind
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The resources this action needs right now: for composites the union of the currently
    /// active children's requirements.
    pub fn requirements(&self) -> ResourceSet {
        match &self.kind {
            ActionKind::Leaf { requirements, .. } => requirements.clone(),
            ActionKind::Sequence(seq) => seq.requirements(),
            ActionKind::Parallel(par) => par.requirements(),
            ActionKind::Repeat(rep) => rep.requirements(),
            ActionKind::InterruptGroup(requirements) => requirements.clone(),
        }
    }

    /// Advance the action by one cycle, starting it first if it has not run yet.
    pub(crate) fn step(&mut self, world: &mut W) {
        if self.state.is_terminal() {
            return;
        }

        let starting = self.state == ActionState::Scheduled;
        self.state = ActionState::Running;

        match &mut self.kind {
            ActionKind::Leaf { body, .. } => {
                if starting {
                    body.init(world);
                }
                body.execute(world);
            }
            ActionKind::Sequence(seq) => seq.step(world),
            ActionKind::Parallel(par) => par.step(world),
            ActionKind::Repeat(rep) => rep.step(world),
            ActionKind::InterruptGroup(_) => (),
        }
    }

    /// Evaluate the completion predicate of a running action. If it holds the action moves to
    /// `Finished` and a leaf's end handler runs with `interrupted = false`.
    pub(crate) fn poll_finished(&mut self, world: &mut W) -> bool {
        match self.state {
            ActionState::Running => (),
            ActionState::Finished => return true,
            _ => return false,
        }

        let done = match &mut self.kind {
            ActionKind::Leaf { body, .. } => {
                if body.is_finished(world) {
                    body.end(world, false);
                    true
                } else {
                    false
                }
            }
            ActionKind::Sequence(seq) => seq.is_done(),
            ActionKind::Parallel(par) => par.is_done(),
            ActionKind::Repeat(_) => false,
            ActionKind::InterruptGroup(_) => true,
        };

        if done {
            self.state = ActionState::Finished;
        }

        done
    }

    /// Interrupt the action. A running leaf gets its end handler with `interrupted = true`, a
    /// composite interrupts its active children. An action which never started is marked
    /// interrupted without running any handler.
    pub(crate) fn interrupt(&mut self, world: &mut W) {
        match self.state {
            ActionState::Scheduled => self.state = ActionState::Interrupted,
            ActionState::Running => {
                match &mut self.kind {
                    ActionKind::Leaf { body, .. } => body.end(world, true),
                    ActionKind::Sequence(seq) => seq.interrupt(world),
                    ActionKind::Parallel(par) => par.interrupt(world),
                    ActionKind::Repeat(rep) => rep.interrupt(world),
                    ActionKind::InterruptGroup(_) => (),
                }
                self.state = ActionState::Interrupted;
            }
            ActionState::Finished | ActionState::Interrupted => (),
        }
    }

    /// Interrupt only the parts of this action which need any of the `conflicts` resources.
    pub(crate) fn interrupt_conflicting(&mut self, conflicts: &ResourceSet, world: &mut W) -> Cascade {
        if self.is_terminal() || self.requirements().is_disjoint(conflicts) {
            return Cascade::Untouched;
        }

        let cascade = match &mut self.kind {
            ActionKind::Leaf { .. } | ActionKind::InterruptGroup(_) => Cascade::Whole,
            ActionKind::Sequence(seq) => seq.interrupt_conflicting(conflicts, world),
            ActionKind::Parallel(par) => par.interrupt_conflicting(conflicts, world),
            ActionKind::Repeat(rep) => rep.interrupt_conflicting(conflicts, world),
        };

        if cascade == Cascade::Whole {
            self.interrupt(world);
        }

        cascade
    }
}

impl<W: WorldClock + 'static> Action<W> {
    /// Finishes once `duration_s` of world time has passed since its first step.
    pub fn wait(duration_s: f64) -> Self {
        Self::leaf(
            &format!("Wait({:.2} s)", duration_s),
            ResourceSet::new(),
            Wait {
                duration_s,
                start_s: 0.0,
            },
        )
    }
}

impl<W> Display for Action<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{:?}]", self.name, self.state)
    }
}

impl Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl<W: 'static> ActionFactory<W> {
    /// A factory which may fail to build, for example when the world lacks data the action needs.
    pub fn new<F>(name: &str, make: F) -> Self
    where
        F: Fn(&W) -> BuildResult<W> + 'static,
    {
        Self {
            name: name.to_string(),
            make: Rc::new(make),
        }
    }

    /// A factory which always builds.
    pub fn infallible<F>(name: &str, make: F) -> Self
    where
        F: Fn() -> Action<W> + 'static,
    {
        Self::new(name, move |_| Ok(make()))
    }

    pub fn build(&self, world: &W) -> BuildResult<W> {
        (self.make)(world)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<W> Clone for ActionFactory<W> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            make: Rc::clone(&self.make),
        }
    }
}

impl<W: WorldClock> Leaf<W> for Wait {
    fn init(&mut self, world: &mut W) {
        self.start_s = world.time_s();
    }

    fn execute(&mut self, _world: &mut W) {}

    fn is_finished(&self, world: &W) -> bool {
        world.time_s() - self.start_s >= self.duration_s
    }
}

impl<W> Leaf<W> for FnLeaf<W> {
    fn execute(&mut self, world: &mut W) {
        (self.body)(world);
        self.ran = true;
    }

    fn is_finished(&self, _world: &W) -> bool {
        self.once && self.ran
    }
}
