use std::str::FromStr;

/// Variant pseudo-grounding substitutions for the propositional abstraction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum GroundingMode {
    /// Map every variable to a canonical fresh constant of its sort.
    PseudoVariable = 0,

    /// Map every variable to the most frequent constant of its sort.
    MostFrequentConstant,

    /// Map every variable to the most frequent constant occurring in conjecture clauses, falling back to the global choice.
    ConjectureConstant,
}

impl GroundingMode {
    /// The minimum GroundingMode type.
    pub const MIN: GroundingMode = GroundingMode::PseudoVariable;

    /// The maximum GroundingMode type.
    pub const MAX: GroundingMode = GroundingMode::ConjectureConstant;
}

impl std::fmt::Display for GroundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PseudoVariable => write!(f, "PseudoVariable"),
            Self::MostFrequentConstant => write!(f, "MostFrequentConstant"),
            Self::ConjectureConstant => write!(f, "ConjectureConstant"),
        }
    }
}

impl FromStr for GroundingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PseudoVariable" => Ok(Self::PseudoVariable),

            "MostFrequentConstant" => Ok(Self::MostFrequentConstant),

            "ConjectureConstant" => Ok(Self::ConjectureConstant),

            _unknown_string => Err(()),
        }
    }
}
