//! Acting agents and how they pay for pastes.

use std::fmt;

use bitcode::{Decode, Encode};

/// Identity of the operator issuing a capture or paste. Pasted cells are
/// attributed to this agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether pastes by an agent are charged against resource pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostMode {
    /// Materials must be secured from pools before anything is placed.
    #[default]
    Charged,
    /// Unlimited-resource mode. Resolution is skipped; planning still runs.
    Exempt,
}
