use crate::{
    config::Config,
    context::{queues::ClauseQueues, ContextState, Counters},
    db::{ClauseId, ClauseSet, ClauseStore, SetKey},
    ordering::Ocb,
    procedures::grounding::SatCollaborator,
    reports::Report,
    structures::{signature::Signature, term::{Date, TermBank}},
};

use crate::builder::FormulaSet;

/// A generic context, parameterised to a source of randomness.
///
/// Requires a source of [rng](rand::Rng) which (also) implements [Default](std::default::Default).
///
/// The context is the proof state of a saturation: it owns the signature, the term bank, the clause store, the unprocessed set, the four processed sets, the temporary store, and the strategy.
/// All mutation during a saturation goes through the context, one step at a time --- there is no concurrent owner.
pub struct GenericContext<R: rand::Rng + std::default::Default> {
    /// The configuration of a context.
    pub config: Config,

    /// Counters related to a context/saturation.
    pub counters: Counters,

    /// The state of the context.
    pub state: ContextState,

    /// The function symbol table.
    pub signature: Signature,

    /// The term bank.
    pub terms: TermBank,

    /// The order control block, built when saturation begins.
    pub ocb: Option<Ocb>,

    /// The clause store.
    pub store: ClauseStore,

    /// Clauses awaiting processing.
    pub unprocessed: ClauseSet,

    /// Processed positive unit rules.
    pub pos_rules: ClauseSet,

    /// Processed positive unit equations which could not be oriented.
    pub pos_eqns: ClauseSet,

    /// Processed negative unit clauses.
    pub neg_units: ClauseSet,

    /// Processed clauses with more than one literal.
    pub non_units: ClauseSet,

    /// Freshly generated clauses awaiting absorption into unprocessed.
    pub tmp_store: Vec<ClauseId>,

    /// Archived input formulas, for derivation citation.
    pub formulas: FormulaSet,

    /// The heuristic clause queues.
    pub queues: ClauseQueues,

    /// The date of the youngest demodulator accepted into the processed sets.
    pub demod_date: Date,

    /// False once an incompleteness-introducing step has fired; saturation then no longer implies satisfiability.
    pub complete: bool,

    /// True once AC handling has been activated by an observed AC axiom set.
    pub ac_active: bool,

    /// AC axiom sightings per symbol: (commutativity seen, associativity seen).
    pub ac_seen: std::collections::HashMap<crate::structures::term::FunCode, (bool, bool)>,

    /// Empty clauses found, in discovery order.
    pub empty_clauses: Vec<ClauseId>,

    /// The external SAT collaborator for the propositional abstraction, if one is installed.
    pub sat_collaborator: Option<Box<dyn SatCollaborator>>,

    /// The source of rng.
    pub rng: R,
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// A report on the state of the context.
    pub fn report(&self) -> Report {
        Report::from(&self.state)
    }

    /// A count of clauses over the four processed sets.
    pub fn processed_count(&self) -> usize {
        self.pos_rules.len() + self.pos_eqns.len() + self.neg_units.len() + self.non_units.len()
    }

    /// A count of clauses over every set.
    pub fn total_clause_count(&self) -> usize {
        self.processed_count() + self.unprocessed.len() + self.tmp_store.len()
    }

    /// A rough storage figure: literals over every set plus term nodes.
    pub fn storage_estimate(&self) -> u64 {
        let literals = self.unprocessed.literal_count()
            + self.pos_rules.literal_count()
            + self.pos_eqns.literal_count()
            + self.neg_units.literal_count()
            + self.non_units.literal_count();
        (literals * 16 + self.terms.node_count() * 8) as u64
    }

    /// The processed set a clause belongs to, from its shape: rules, unorientable positive units, negative units, or non-units.
    pub fn classify(&self, id: ClauseId) -> SetKey {
        let clause = self.store.get(id);
        if clause.is_demodulator() {
            if clause.literals[0].is_oriented() {
                SetKey::PosRules
            } else {
                SetKey::PosEqns
            }
        } else if clause.is_unit() {
            SetKey::NegUnits
        } else {
            SetKey::NonUnits
        }
    }

    /// Marks every clause-held term and sweeps the term bank.
    pub fn collect_term_garbage(&mut self) -> usize {
        self.store.gc_mark_terms(&mut self.terms);
        self.terms.gc_sweep()
    }
}
