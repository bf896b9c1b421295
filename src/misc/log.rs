/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library and/or fixing issues.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to the [term bank](crate::structures::term)
    pub const TERM_BANK: &str = "term_bank";

    /// Logs related to the [ordering](crate::ordering)
    pub const ORDERING: &str = "ordering";

    /// Logs related to [rewriting](crate::procedures::rewriting)
    pub const REWRITING: &str = "rewriting";

    /// Logs related to [subsumption](crate::procedures::subsumption)
    pub const SUBSUMPTION: &str = "subsumption";

    /// Logs related to [paramodulation](crate::procedures::paramod)
    pub const PARAMOD: &str = "paramod";

    /// Logs related to the [saturation loop](crate::procedures::saturation)
    pub const SATURATION: &str = "saturation";

    /// Logs related to [clause sets](crate::db)
    pub const CLAUSE_SET: &str = "clause_set";

    /// Logs related to [splitting](crate::procedures::splitting)
    pub const SPLITTING: &str = "splitting";

    /// Logs related to [grounding](crate::procedures::grounding) and the SAT collaborator
    pub const GROUNDING: &str = "grounding";

    /// Logs related to [derivations](crate::derivation)
    pub const DERIVATION: &str = "derivation";

    /// Logs related to parsing
    pub const PARSE: &str = "parse";
}
