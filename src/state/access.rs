//! Capability checks delegated to whatever owns users and roles.

use std::collections::HashSet;

use crate::state::catalog::Capability;

/// Opaque predicate answering whether a session may use a capability.
pub trait CapabilityGate: Send + Sync {
    /// Return true when `capability` is granted to a session holding `grants`.
    fn is_granted(&self, grants: &HashSet<Capability>, capability: Capability) -> bool;
}

/// Gate that trusts the capabilities attached to the session when it was opened.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionGrants;

impl CapabilityGate for SessionGrants {
    fn is_granted(&self, grants: &HashSet<Capability>, capability: Capability) -> bool {
        grants.contains(&capability)
    }
}
