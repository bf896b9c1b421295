use std::time::Duration;

/// Counts for various things which count, roughly.
#[derive(Default)]
pub struct Counters {
    /// Clauses picked by the given-clause loop.
    pub processed: usize,

    /// Picked clauses which survived forward contraction.
    pub proc_non_trivial: usize,

    /// Clauses generated by inferences.
    pub generated: usize,

    /// Literals over all generated clauses.
    pub generated_literals: usize,

    /// Paramodulants generated.
    pub paramod: usize,

    /// Equality factors generated.
    pub factor: usize,

    /// Equality resolvents generated.
    pub resolvents: usize,

    /// Clauses deleted by forward subsumption.
    pub forward_subsumed: usize,

    /// Clauses deleted by backward subsumption.
    pub backward_subsumed: usize,

    /// Clauses returned to unprocessed by backward rewriting.
    pub backward_rewritten: usize,

    /// Clauses simplified against unit clauses.
    pub unit_simplified: usize,

    /// Tautologies discarded.
    pub tautologies: usize,

    /// Clauses discarded for other redundancy reasons (copies, trivial simplifications).
    pub other_redundant: usize,

    /// Non-redundant clauses deleted under storage pressure; nonzero means completeness was given up.
    pub non_redundant_deleted: usize,

    /// Propositional abstraction checks run.
    pub sat_checks: usize,

    /// Iterations of the saturation loop.
    pub iterations: usize,

    /// The time taken during a saturation.
    pub time: Duration,
}
