use std::str::FromStr;

/// Variant constructions of a paramodulant.
///
/// The side conditions of ordered paramodulation are identical across the variants; they differ only in how many occurrences of the overlapped subterm are replaced when the conclusion is built.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum ParamodVariant {
    /// Replace the overlapped occurrence alone.
    Plain = 0,

    /// Replace every occurrence of the overlapped subterm in the into-clause.
    Simultaneous,

    /// Replace every occurrence of the instantiated subterm in the instantiated into-clause, including occurrences arising only through instantiation.
    SuperSimultaneous,
}

impl ParamodVariant {
    /// The minimum ParamodVariant type.
    pub const MIN: ParamodVariant = ParamodVariant::Plain;

    /// The maximum ParamodVariant type.
    pub const MAX: ParamodVariant = ParamodVariant::SuperSimultaneous;
}

impl std::fmt::Display for ParamodVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "Plain"),
            Self::Simultaneous => write!(f, "Simultaneous"),
            Self::SuperSimultaneous => write!(f, "SuperSimultaneous"),
        }
    }
}

impl FromStr for ParamodVariant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Plain" => Ok(Self::Plain),

            "Simultaneous" => Ok(Self::Simultaneous),

            "SuperSimultaneous" => Ok(Self::SuperSimultaneous),

            _unknown_string => Err(()),
        }
    }
}
