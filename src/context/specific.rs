use rand::SeedableRng;

use crate::{
    builder::FormulaSet,
    config::Config,
    context::{queues::ClauseQueues, ContextState, Counters, GenericContext},
    db::{ClauseSet, ClauseStore, SetKey},
    generic::random::MinimalPCG32,
    structures::{signature::Signature, term::TermBank},
};

/// A context which uses [MinimalPCG32] as a source of randomness.
pub type Context = GenericContext<MinimalPCG32>;

impl Context {
    /// Creates a context from some given configuration.
    pub fn from_config(config: Config) -> Self {
        let signature = Signature::new();
        let terms = TermBank::new(&signature);

        Self {
            config,

            counters: Counters::default(),
            state: ContextState::Configuration,

            signature,
            terms,
            ocb: None,

            store: ClauseStore::new(),
            unprocessed: ClauseSet::new(SetKey::Unprocessed).with_fv_index(),
            pos_rules: ClauseSet::new(SetKey::PosRules).with_demod_index(),
            pos_eqns: ClauseSet::new(SetKey::PosEqns).with_demod_index(),
            neg_units: ClauseSet::new(SetKey::NegUnits).with_fv_index(),
            non_units: ClauseSet::new(SetKey::NonUnits).with_fv_index(),
            tmp_store: Vec::default(),

            formulas: FormulaSet::default(),
            queues: ClauseQueues::new(),

            demod_date: 0,
            complete: true,
            ac_active: false,
            ac_seen: std::collections::HashMap::default(),
            empty_clauses: Vec::default(),

            sat_collaborator: None,

            rng: MinimalPCG32::from_seed(0_u64.to_le_bytes()),
        }
    }
}
