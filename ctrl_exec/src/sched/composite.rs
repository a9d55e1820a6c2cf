//! # Composite actions
//!
//! Children of a composite are stepped cooperatively by the composite itself. A child that is
//! not yet active stays `Scheduled`; it is started on the composite's next step, after the
//! scheduler has claimed its resources.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::rc::Rc;

use super::{
    action::{Action, Cascade},
    resource::ResourceSet,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Runs children one at a time, in order.
pub struct Sequence<W> {
    children: Vec<Action<W>>,

    /// Index of the active child. Equal to the number of children once the sequence is done.
    index: usize,
}

/// Runs children together.
pub struct Parallel<W> {
    children: Vec<Action<W>>,
    mode: ParallelMode,
    done: bool,
}

/// Restarts a fresh instance of an action every time it finishes.
pub struct Repeat<W> {
    make: Rc<dyn Fn() -> Action<W>>,
    current: Box<Action<W>>,

    /// Number of fresh instances built after the first one.
    restarts: u64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ParallelMode {
    /// Finish when any child finishes, interrupting the rest.
    Race,

    /// Finish when every child has finished.
    All,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<W: 'static> Sequence<W> {
    pub(crate) fn new(children: Vec<Action<W>>) -> Self {
        Self { children, index: 0 }
    }

    /// The active child, if the sequence has not finished yet.
    pub fn active(&self) -> Option<&Action<W>> {
        self.children.get(self.index)
    }

    pub(crate) fn requirements(&self) -> ResourceSet {
        self.active()
            .map(|c| c.requirements())
            .unwrap_or_default()
    }

    pub(crate) fn step(&mut self, world: &mut W) {
        if let Some(child) = self.children.get_mut(self.index) {
            child.step(world);
            if child.poll_finished(world) {
                self.index += 1;
            }
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.index >= self.children.len()
    }

    pub(crate) fn interrupt(&mut self, world: &mut W) {
        if let Some(child) = self.children.get_mut(self.index) {
            child.interrupt(world);
        }
    }

    pub(crate) fn interrupt_conflicting(&mut self, conflicts: &ResourceSet, world: &mut W) -> Cascade {
        match self.children.get_mut(self.index) {
            Some(child) => child.interrupt_conflicting(conflicts, world),
            None => Cascade::Untouched,
        }
    }
}

impl<W: 'static> Parallel<W> {
    pub(crate) fn new(children: Vec<Action<W>>, mode: ParallelMode) -> Self {
        Self {
            children,
            mode,
            done: false,
        }
    }

    fn has_active_children(&self) -> bool {
        self.children.iter().any(|c| !c.is_terminal())
    }

    pub(crate) fn requirements(&self) -> ResourceSet {
        self.children
            .iter()
            .filter(|c| !c.is_terminal())
            .flat_map(|c| c.requirements())
            .collect()
    }

    pub(crate) fn step(&mut self, world: &mut W) {
        let mut any_finished = false;

        for child in self.children.iter_mut().filter(|c| !c.is_terminal()) {
            child.step(world);
            if child.poll_finished(world) {
                any_finished = true;
            }
        }

        match self.mode {
            ParallelMode::Race => {
                if any_finished || self.children.is_empty() {
                    self.interrupt(world);
                    self.done = true;
                }
            }
            ParallelMode::All => {
                if !self.has_active_children() {
                    self.done = true;
                }
            }
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn interrupt(&mut self, world: &mut W) {
        for child in self.children.iter_mut() {
            child.interrupt(world);
        }
    }

    /// Retire only the children needing a conflicting resource. If that leaves no active child
    /// the whole composite is interrupted.
    pub(crate) fn interrupt_conflicting(&mut self, conflicts: &ResourceSet, world: &mut W) -> Cascade {
        let mut touched = false;

        for child in self.children.iter_mut() {
            if child.interrupt_conflicting(conflicts, world) != Cascade::Untouched {
                touched = true;
            }
        }

        if !self.has_active_children() {
            Cascade::Whole
        } else if touched {
            Cascade::Partial
        } else {
            Cascade::Untouched
        }
    }
}

impl<W: 'static> Repeat<W> {
    pub(crate) fn new(make: Rc<dyn Fn() -> Action<W>>) -> Self {
        let current = Box::new(make());
        Self {
            make,
            current,
            restarts: 0,
        }
    }

    pub fn inner_name(&self) -> &str {
        self.current.name()
    }

    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    pub(crate) fn requirements(&self) -> ResourceSet {
        self.current.requirements()
    }

    pub(crate) fn step(&mut self, world: &mut W) {
        self.current.step(world);

        // Finished instances are never reused
        if self.current.poll_finished(world) {
            self.current = Box::new((self.make)());
            self.restarts += 1;
        }
    }

    pub(crate) fn interrupt(&mut self, world: &mut W) {
        self.current.interrupt(world);
    }

    pub(crate) fn interrupt_conflicting(&mut self, conflicts: &ResourceSet, world: &mut W) -> Cascade {
        self.current.interrupt_conflicting(conflicts, world)
    }
}
