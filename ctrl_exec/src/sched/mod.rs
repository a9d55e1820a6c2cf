//! # Scheduler
//!
//! The scheduler binds triggers to actions and enforces that every resource is owned by at most
//! one running action. Each call to [`Scheduler::tick`] performs one control cycle, in order:
//!
//! 1. Sample every trigger and compute its edge.
//! 2. Dispatch each binding's response to that edge, scheduling or interrupting actions.
//! 3. Step every running action once, claiming or releasing resources as composites advance.
//! 4. Sweep finished actions and release their resources.
//! 5. Schedule the default action of every idle resource.
//!
//! Scheduling an action interrupts the current owners of any resource it requires. A composite
//! owner is only interrupted as far as needed: a parallel group retires just the children using
//! the contested resources and keeps the rest running.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod action;
mod composite;
mod resource;
mod trigger;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    collections::{BTreeMap, BTreeSet},
    error::Error,
    mem,
};

use log::{debug, info, warn};

pub use action::{
    Action, ActionFactory, ActionId, ActionKind, ActionState, BuildResult, Leaf, WorldClock,
};
pub use composite::{Parallel, ParallelMode, Repeat, Sequence};
pub use resource::{ResourceId, ResourceRegistry, ResourceSet};
pub use trigger::{BindingKind, Edge, Trigger};

use action::Cascade;
use trigger::{Binding, Response};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct Scheduler<W> {
    registry: ResourceRegistry,

    /// Every live action, keyed by id. Ids are issued in increasing order so iteration follows
    /// scheduling order.
    actions: BTreeMap<ActionId, Action<W>>,

    triggers: Vec<Trigger<W>>,
    defaults: BTreeMap<ResourceId, DefaultAction<W>>,

    next_id: u64,
    cycle: u64,

    /// Events accumulated since the last tick.
    report: CycleReport,
}

struct DefaultAction<W> {
    factory: ActionFactory<W>,
    instance: Option<ActionId>,
}

/// Identifies an action in a [`CycleReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub id: ActionId,
    pub name: String,
}

/// An action factory which failed to build an action.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildFailure {
    pub factory: String,
    pub reason: String,
}

/// Everything the scheduler did during one cycle, including changes requested through the
/// scheduler's API since the previous cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub scheduled: Vec<ActionRecord>,
    pub finished: Vec<ActionRecord>,
    pub interrupted: Vec<ActionRecord>,
    pub build_failures: Vec<BuildFailure>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SchedError {
    #[error("Resource {0} is not registered with the scheduler")]
    UnknownResource(ResourceId),

    #[error("The default action for {resource} must require exactly that resource, found {required}")]
    InvalidDefault { resource: String, required: String },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CycleReport {
    /// True if nothing happened during the cycle.
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
            && self.finished.is_empty()
            && self.interrupted.is_empty()
            && self.build_failures.is_empty()
    }
}

impl<W: 'static> Default for Scheduler<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: 'static> Scheduler<W> {
    pub fn new() -> Self {
        Self {
            registry: ResourceRegistry::new(),
            actions: BTreeMap::new(),
            triggers: Vec::new(),
            defaults: BTreeMap::new(),
            next_id: 0,
            cycle: 0,
            report: CycleReport::default(),
        }
    }

    // ---- CONFIGURATION ----

    pub fn register_resource(&mut self, name: &str) -> ResourceId {
        let id = self.registry.register(name);
        debug!("Registered resource {} as {}", name, id);
        id
    }

    /// Set the action run whenever the resource is idle. Replaces any previous default; a running
    /// instance of the old default is left to be displaced normally.
    pub fn set_default_action(
        &mut self,
        resource: ResourceId,
        factory: ActionFactory<W>,
    ) -> Result<(), SchedError> {
        if !self.registry.is_registered(resource) {
            return Err(SchedError::UnknownResource(resource));
        }

        debug!(
            "Default action for {} set to {}",
            self.registry.name(resource).unwrap_or_default(),
            factory.name()
        );

        self.defaults.insert(
            resource,
            DefaultAction {
                factory,
                instance: None,
            },
        );

        Ok(())
    }

    pub fn add_trigger(&mut self, trigger: Trigger<W>) {
        debug!(
            "Added trigger {} with {} binding(s)",
            trigger.name(),
            trigger.bindings.len()
        );
        self.triggers.push(trigger);
    }

    // ---- QUERIES ----

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Number of completed cycles.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn is_running(&self, id: ActionId) -> bool {
        self.actions.contains_key(&id)
    }

    pub fn owner_of(&self, resource: ResourceId) -> Option<ActionId> {
        self.registry.owner(resource)
    }

    pub fn action(&self, id: ActionId) -> Option<&Action<W>> {
        self.actions.get(&id)
    }

    /// Every live action in scheduling order.
    pub fn running(&self) -> impl Iterator<Item = (ActionId, &Action<W>)> {
        self.actions.iter().map(|(id, a)| (*id, a))
    }

    pub fn num_running(&self) -> usize {
        self.actions.len()
    }

    // ---- CONTROL ----

    /// Schedule an action, interrupting the owners of any resource it requires. The action is
    /// first stepped on the next tick.
    pub fn schedule(&mut self, action: Action<W>, world: &mut W) -> ActionId {
        self.install(action, world)
    }

    /// Build an action from the factory and schedule it. A build failure is recorded in the
    /// next cycle report and returned, nothing is scheduled.
    pub fn schedule_from(
        &mut self,
        factory: &ActionFactory<W>,
        world: &mut W,
    ) -> Result<ActionId, Box<dyn Error>> {
        match factory.build(world) {
            Ok(action) => Ok(self.install(action, world)),
            Err(e) => {
                self.record_build_failure(factory.name(), e.to_string());
                Err(e)
            }
        }
    }

    /// Interrupt a running action. Returns false if the action was not running.
    pub fn cancel(&mut self, id: ActionId, world: &mut W) -> bool {
        match self.actions.remove(&id) {
            Some(mut action) => {
                action.interrupt(world);
                self.retire_interrupted(id, &action);
                true
            }
            None => false,
        }
    }

    /// Interrupt every running action.
    pub fn cancel_all(&mut self, world: &mut W) {
        let ids: Vec<ActionId> = self.actions.keys().copied().collect();

        for id in ids {
            self.cancel(id, world);
        }
    }

    /// Run one control cycle.
    pub fn tick(&mut self, world: &mut W) -> CycleReport {
        // ---- TRIGGER SAMPLING ----

        let mut triggers = mem::take(&mut self.triggers);
        let edges: Vec<Edge> = triggers.iter_mut().map(|t| t.sample(world)).collect();

        // ---- BINDING DISPATCH ----

        for (trigger, edge) in triggers.iter_mut().zip(edges) {
            for binding in trigger.bindings.iter_mut() {
                self.dispatch(binding, edge, world);
            }
        }

        self.triggers = triggers;

        // ---- STEP ----

        let ids: Vec<ActionId> = self.actions.keys().copied().collect();

        for id in ids {
            // Actions interrupted earlier in this cycle are no longer in the map
            if let Some(mut action) = self.actions.remove(&id) {
                action.step(world);
                self.actions.insert(id, action);
                self.reconcile(id, world);
            }
        }

        // ---- COMPLETION SWEEP ----

        let ids: Vec<ActionId> = self.actions.keys().copied().collect();

        for id in ids {
            let finished = match self.actions.get_mut(&id) {
                Some(action) => action.poll_finished(world),
                None => false,
            };

            if finished {
                if let Some(action) = self.actions.remove(&id) {
                    self.registry.release_all(id);
                    debug!("Finished {} {}", id, action.name());
                    self.report.finished.push(ActionRecord::new(id, &action));
                }
            }
        }

        // ---- DEFAULT RE-ARM ----

        self.rearm_defaults(world);

        let mut report = mem::take(&mut self.report);
        report.cycle = self.cycle;
        self.cycle += 1;

        report
    }

    // ---- INTERNALS ----

    fn dispatch(&mut self, binding: &mut Binding<W>, edge: Edge, world: &mut W) {
        let running = binding
            .instance
            .map(|id| self.is_running(id))
            .unwrap_or(false);

        let start = match (binding.kind.response(edge), running) {
            (Response::Start, false) | (Response::Toggle, false) => true,
            (Response::Stop, true) | (Response::Toggle, true) => {
                if let Some(id) = binding.instance.take() {
                    self.cancel(id, world);
                }
                false
            }
            _ => false,
        };

        if start {
            binding.instance = self.schedule_from(&binding.factory, world).ok();
        }
    }

    /// Allocate an id for the action, displace the owners of its resources and claim them.
    fn install(&mut self, action: Action<W>, world: &mut W) -> ActionId {
        let id = ActionId(self.next_id);
        self.next_id += 1;

        let required = action.requirements();
        self.resolve_conflicts(id, &required, world);

        for r in required.iter() {
            self.registry.claim(*r, id);
        }

        debug!(
            "Scheduled {} {} requiring {}",
            id,
            action.name(),
            self.registry.describe(&required)
        );
        self.report.scheduled.push(ActionRecord::new(id, &action));
        self.actions.insert(id, action);

        id
    }

    /// Interrupt every owner of `required` other than `claimant`, as deeply as needed to free
    /// those resources.
    fn resolve_conflicts(&mut self, claimant: ActionId, required: &ResourceSet, world: &mut W) {
        let owners: BTreeSet<ActionId> = required
            .iter()
            .filter_map(|r| self.registry.owner(*r))
            .filter(|o| *o != claimant)
            .collect();

        for owner in owners {
            let cascade = match self.actions.get_mut(&owner) {
                Some(action) => action.interrupt_conflicting(required, world),
                None => {
                    self.registry.release_all(owner);
                    continue;
                }
            };

            match cascade {
                Cascade::Whole => {
                    if let Some(action) = self.actions.remove(&owner) {
                        self.retire_interrupted(owner, &action);
                    }
                }
                Cascade::Partial | Cascade::Untouched => {
                    let still_required = self
                        .actions
                        .get(&owner)
                        .map(|a| a.requirements())
                        .unwrap_or_default();

                    if cascade == Cascade::Partial {
                        info!(
                            "Partially interrupted {} to free {}",
                            owner,
                            self.registry.describe(required)
                        );
                    }

                    self.registry.release_unrequired(owner, &still_required);
                }
            }
        }
    }

    /// Bring the ownership map in line with the current requirements of an action after it has
    /// stepped.
    fn reconcile(&mut self, id: ActionId, world: &mut W) {
        let required = match self.actions.get(&id) {
            Some(action) => action.requirements(),
            None => return,
        };

        self.registry.release_unrequired(id, &required);

        let missing: ResourceSet = required
            .iter()
            .filter(|r| self.registry.owner(**r) != Some(id))
            .copied()
            .collect();

        if missing.is_empty() {
            return;
        }

        self.resolve_conflicts(id, &missing, world);

        for r in missing.iter() {
            self.registry.claim(*r, id);
        }

        debug!("{} claimed {}", id, self.registry.describe(&missing));
    }

    fn rearm_defaults(&mut self, world: &mut W) {
        let resources: Vec<ResourceId> = self.defaults.keys().copied().collect();

        for resource in resources {
            if self.registry.owner(resource).is_some() {
                continue;
            }

            let factory = match self.defaults.get(&resource) {
                Some(default) => {
                    let running = default
                        .instance
                        .map(|id| self.actions.contains_key(&id))
                        .unwrap_or(false);
                    if running {
                        continue;
                    }
                    default.factory.clone()
                }
                None => continue,
            };

            let action = match factory.build(world) {
                Ok(a) => a,
                Err(e) => {
                    self.record_build_failure(factory.name(), e.to_string());
                    continue;
                }
            };

            let required = action.requirements();
            if required.len() != 1 || !required.contains(&resource) {
                let err = SchedError::InvalidDefault {
                    resource: self
                        .registry
                        .name(resource)
                        .unwrap_or_default()
                        .to_string(),
                    required: self.registry.describe(&required),
                };
                self.record_build_failure(factory.name(), err.to_string());
                continue;
            }

            let id = self.install(action, world);

            if let Some(default) = self.defaults.get_mut(&resource) {
                default.instance = Some(id);
            }
        }
    }

    fn retire_interrupted(&mut self, id: ActionId, action: &Action<W>) {
        self.registry.release_all(id);
        info!("Interrupted {} {}", id, action.name());
        self.report.interrupted.push(ActionRecord::new(id, action));
    }

    fn record_build_failure(&mut self, factory: &str, reason: String) {
        warn!("Could not build {}: {}", factory, reason);
        self.report.build_failures.push(BuildFailure {
            factory: factory.to_string(),
            reason,
        });
    }
}

impl ActionRecord {
    fn new<W: 'static>(id: ActionId, action: &Action<W>) -> Self {
        Self {
            id,
            name: action.name().to_string(),
        }
    }
}
