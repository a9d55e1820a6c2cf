//! # Resource registry
//!
//! Resources are the logical physical subsystems of the robot (drivetrain, status lights,
//! rollers). The registry names them and records which running action owns each one. Only the
//! [`Scheduler`](super::Scheduler) mutates the ownership map.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use super::ActionId;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Opaque identifier of a resource, issued by [`ResourceRegistry::register`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ResourceId(usize);

/// A set of resources required by an action.
pub type ResourceSet = BTreeSet<ResourceId>;

/// Names every resource and tracks the current owner of each.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    names: Vec<String>,
    owners: BTreeMap<ResourceId, ActionId>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new resource with the given name.
    pub fn register(&mut self, name: &str) -> ResourceId {
        self.names.push(name.to_string());
        ResourceId(self.names.len() - 1)
    }

    /// Returns true if the id was issued by this registry.
    pub fn is_registered(&self, id: ResourceId) -> bool {
        id.0 < self.names.len()
    }

    pub fn name(&self, id: ResourceId) -> Option<&str> {
        self.names.get(id.0).map(|s| s.as_str())
    }

    /// All registered resources, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = ResourceId> {
        (0..self.names.len()).map(ResourceId)
    }

    /// The set of every registered resource.
    pub fn all(&self) -> ResourceSet {
        self.ids().collect()
    }

    /// The action currently owning the resource, if any.
    pub fn owner(&self, id: ResourceId) -> Option<ActionId> {
        self.owners.get(&id).copied()
    }

    /// Format a resource set using the registered names.
    pub fn describe(&self, set: &ResourceSet) -> String {
        let names: Vec<&str> = set
            .iter()
            .map(|r| self.name(*r).unwrap_or("<unregistered>"))
            .collect();

        format!("{{{}}}", names.join(", "))
    }

    /// Install `owner` as the owner of the resource, returning the previous owner.
    pub(crate) fn claim(&mut self, id: ResourceId, owner: ActionId) -> Option<ActionId> {
        self.owners.insert(id, owner)
    }

    /// Release every resource held by `owner`.
    pub(crate) fn release_all(&mut self, owner: ActionId) {
        self.owners.retain(|_, o| *o != owner);
    }

    /// Release the resources held by `owner` which are not in `required`.
    pub(crate) fn release_unrequired(&mut self, owner: ActionId, required: &ResourceSet) {
        self.owners
            .retain(|r, o| *o != owner || required.contains(r));
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_claim_and_release() {
        let mut reg = ResourceRegistry::new();
        let drive = reg.register("drivetrain");
        let leds = reg.register("status_leds");

        assert_eq!(reg.name(leds), Some("status_leds"));
        assert_eq!(reg.owner(drive), None);

        assert_eq!(reg.claim(drive, ActionId(1)), None);
        assert_eq!(reg.claim(leds, ActionId(1)), None);
        assert_eq!(reg.owner(drive), Some(ActionId(1)));
        assert_eq!(reg.owner(leds), Some(ActionId(1)));

        // Takeover returns the previous owner
        assert_eq!(reg.claim(leds, ActionId(2)), Some(ActionId(1)));

        let mut keep = ResourceSet::new();
        keep.insert(leds);
        reg.release_unrequired(ActionId(1), &keep);
        assert_eq!(reg.owner(drive), None);
        assert_eq!(reg.owner(leds), Some(ActionId(2)));

        reg.release_all(ActionId(2));
        assert_eq!(reg.owner(leds), None);
        assert_eq!(reg.describe(&reg.all()), "{drivetrain, status_leds}");
    }
}
