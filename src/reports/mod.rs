/*!
Reports for the context.
*/

use crate::context::ContextState;

/// High-level reports regarding a saturation.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The empty clause was derived: the clause set is unsatisfiable.
    Proof,

    /// The clause set is saturated under a complete strategy: satisfiable.
    Satisfiable,

    /// The clause set is saturated, though completeness was lost along the way: no verdict.
    GaveUp,

    /// A budget was exhausted.
    ResourceOut,

    /// The deadline passed.
    Timeout,

    /// No saturation has finished, for some reason.
    Unknown,
}

impl From<&ContextState> for Report {
    fn from(state: &ContextState) -> Self {
        match state {
            ContextState::Configuration
            | ContextState::Input
            | ContextState::Saturating => Self::Unknown,
            ContextState::Proof(_) => Self::Proof,
            ContextState::Satisfiable => Self::Satisfiable,
            ContextState::GaveUp => Self::GaveUp,
            ContextState::ResourceOut(_) => Self::ResourceOut,
            ContextState::Timeout => Self::Timeout,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Proof => write!(f, "Proof"),
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::GaveUp => write!(f, "GaveUp"),
            Self::ResourceOut => write!(f, "ResourceOut"),
            Self::Timeout => write!(f, "Timeout"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
