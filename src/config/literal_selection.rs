use std::str::FromStr;

/// Variant literal selection functions.
///
/// Selection restricts which literals of a clause may take part in generating inferences: with a non-empty selection only selected (negative) literals are overlapped into, which prunes the search while preserving completeness.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum LiteralSelection {
    /// Select nothing; inferences are restricted by maximality alone.
    NoSelection = 0,

    /// Select one negative literal of minimal weight, ties broken towards the smaller symbol precedence.
    SmallestNegative,

    /// Select every negative literal, in Horn clauses only.
    AllNegativeInHorn,

    /// Select one negative literal whose top symbol has the largest arity.
    LargestArityNegative,
}

impl LiteralSelection {
    /// The minimum LiteralSelection type.
    pub const MIN: LiteralSelection = LiteralSelection::NoSelection;

    /// The maximum LiteralSelection type.
    pub const MAX: LiteralSelection = LiteralSelection::LargestArityNegative;
}

impl std::fmt::Display for LiteralSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSelection => write!(f, "NoSelection"),
            Self::SmallestNegative => write!(f, "SmallestNegative"),
            Self::AllNegativeInHorn => write!(f, "AllNegativeInHorn"),
            Self::LargestArityNegative => write!(f, "LargestArityNegative"),
        }
    }
}

impl FromStr for LiteralSelection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NoSelection" => Ok(Self::NoSelection),

            "SmallestNegative" => Ok(Self::SmallestNegative),

            "AllNegativeInHorn" => Ok(Self::AllNegativeInHorn),

            "LargestArityNegative" => Ok(Self::LargestArityNegative),

            _unknown_string => Err(()),
        }
    }
}
