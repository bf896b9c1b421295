/*!
Configuration of a context --- the strategy record of a saturation.

All configuration for a context is contained within the context.
Options use the [ConfigOption] wrapper, which records a name and bounds beside the value; the enumerated strategies (selection, paramodulation construction, grounding) have their own modules.

A strategy is fixed once saturation begins: the ordering, the selection function and the paramodulation variant are read when the control block is built and never revised mid-run.
*/

mod config_option;
pub use config_option::ConfigOption;

mod literal_selection;
pub use literal_selection::LiteralSelection;

mod paramod;
pub use paramod::ParamodVariant;

mod grounding;
pub use grounding::GroundingMode;

use std::str::FromStr;

use crate::{context::ContextState, structures::term::RewriteLevel};

/// The forward demodulation level: how far a picked clause is rewritten before processing.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum ForwardDemod {
    /// No forward rewriting.
    None = 0,

    /// Rewriting with oriented rules only.
    Rules,

    /// Rewriting with rules and instance-orientable equations.
    Full,
}

impl ForwardDemod {
    /// The minimum ForwardDemod type.
    pub const MIN: ForwardDemod = ForwardDemod::None;

    /// The maximum ForwardDemod type.
    pub const MAX: ForwardDemod = ForwardDemod::Full;

    /// The rewrite level to run at, if any.
    pub fn level(self) -> Option<RewriteLevel> {
        match self {
            Self::None => None,
            Self::Rules => Some(RewriteLevel::Rules),
            Self::Full => Some(RewriteLevel::Full),
        }
    }
}

impl std::fmt::Display for ForwardDemod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Rules => write!(f, "Rules"),
            Self::Full => write!(f, "Full"),
        }
    }
}

impl FromStr for ForwardDemod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(Self::None),

            "Rules" => Ok(Self::Rules),

            "Full" => Ok(Self::Full),

            _unknown_string => Err(()),
        }
    }
}

/// The clause splitting policy.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum SplitPolicy {
    /// Never split.
    None = 0,

    /// Split clauses into variable-disjoint components, linked through fresh split predicates.
    Components,
}

impl SplitPolicy {
    /// The minimum SplitPolicy type.
    pub const MIN: SplitPolicy = SplitPolicy::None;

    /// The maximum SplitPolicy type.
    pub const MAX: SplitPolicy = SplitPolicy::Components;
}

impl std::fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Components => write!(f, "Components"),
        }
    }
}

/// A budget of the saturation loop; exhaustion of any ends the run with a resource-out report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Budget {
    /// Processing steps taken.
    Steps,

    /// Clauses in the processed sets.
    Processed,

    /// Clauses in the unprocessed set.
    Unprocessed,

    /// Clauses in all sets.
    Total,

    /// Clauses generated.
    Generated,

    /// Nodes in the term bank.
    TermNodes,

    /// Answers (empty clauses) found.
    Answers,
}

impl std::fmt::Display for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Steps => write!(f, "steps"),
            Self::Processed => write!(f, "processed clauses"),
            Self::Unprocessed => write!(f, "unprocessed clauses"),
            Self::Total => write!(f, "total clauses"),
            Self::Generated => write!(f, "generated clauses"),
            Self::TermNodes => write!(f, "term nodes"),
            Self::Answers => write!(f, "answers"),
        }
    }
}

/// The primary configuration structure.
#[derive(Clone)]
pub struct Config {
    /// The literal selection function.
    pub literal_selection: ConfigOption<LiteralSelection>,

    /// The paramodulant construction.
    pub paramod_variant: ConfigOption<ParamodVariant>,

    /// Watch for AC axioms and handle AC-redundancy when they appear.
    pub ac_handling: ConfigOption<bool>,

    /// Apply destructive equality resolution to literals `X ≠ t`.
    pub destructive_er: ConfigOption<bool>,

    /// The clause splitting policy.
    pub split_clauses: ConfigOption<SplitPolicy>,

    /// The forward demodulation level.
    pub forward_demod: ConfigOption<ForwardDemod>,

    /// Bound on LPO recursion depth.
    pub lpo_recursion_limit: ConfigOption<usize>,

    /// Bound on negative literals for the ground-completion tautology test; larger clauses fall back to the cheap check.
    pub tautology_check_max_neg: ConfigOption<usize>,

    /// Symbol names from least to greatest, overriding the generated precedence.
    pub precedence: Vec<String>,

    /// The heuristic weight of a function symbol occurrence.
    pub fun_weight: ConfigOption<i64>,

    /// The heuristic weight of a variable occurrence.
    pub var_weight: ConfigOption<i64>,

    /// Weight-channel picks per age-channel pick of the given-clause heuristic.
    pub pick_given_ratio: ConfigOption<u32>,

    /// The probability of choosing the pick channel at random instead of by ratio.
    pub random_channel_bias: ConfigOption<f64>,

    /// Storage growth beyond which unprocessed copies are deleted.
    pub filter_copies_limit: ConfigOption<u64>,

    /// Storage growth beyond which a full forward-contraction sweep over unprocessed runs.
    pub filter_limit: ConfigOption<u64>,

    /// Unprocessed growth beyond which evaluations are recomputed.
    pub reweight_limit: ConfigOption<u64>,

    /// Storage beyond which the worst unprocessed clauses are deleted, losing completeness.
    pub delete_bad_limit: ConfigOption<u64>,

    /// Bound on processing steps.
    pub step_limit: ConfigOption<u64>,

    /// Bound on processed clauses.
    pub processed_limit: ConfigOption<u64>,

    /// Bound on unprocessed clauses.
    pub unprocessed_limit: ConfigOption<u64>,

    /// Bound on clauses in all sets.
    pub total_limit: ConfigOption<u64>,

    /// Bound on generated clauses.
    pub generated_limit: ConfigOption<u64>,

    /// Bound on term bank nodes.
    pub term_node_limit: ConfigOption<u64>,

    /// Bound on answers; saturation for a single refutation stops at one.
    pub answer_limit: ConfigOption<u64>,

    /// The wall-clock limit for a saturation.
    pub time_limit: ConfigOption<std::time::Duration>,

    /// Processing steps between propositional abstraction checks; zero disables the checks.
    pub sat_check_interval: ConfigOption<u64>,

    /// The pseudo-grounding substitution for the propositional abstraction.
    pub grounding: ConfigOption<GroundingMode>,
}

impl Default for Config {
    /// The default strategy is (roughly) configured for quick, deterministic results on a library of tests.
    fn default() -> Self {
        Config {
            literal_selection: ConfigOption {
                name: "literal_selection",
                min: LiteralSelection::MIN,
                max: LiteralSelection::MAX,
                max_state: ContextState::Configuration,
                value: LiteralSelection::SmallestNegative,
            },

            paramod_variant: ConfigOption {
                name: "paramod_variant",
                min: ParamodVariant::MIN,
                max: ParamodVariant::MAX,
                max_state: ContextState::Configuration,
                value: ParamodVariant::Simultaneous,
            },

            ac_handling: ConfigOption {
                name: "ac_handling",
                min: false,
                max: true,
                max_state: ContextState::Configuration,
                value: true,
            },

            destructive_er: ConfigOption {
                name: "destructive_er",
                min: false,
                max: true,
                max_state: ContextState::Configuration,
                value: true,
            },

            split_clauses: ConfigOption {
                name: "split_clauses",
                min: SplitPolicy::MIN,
                max: SplitPolicy::MAX,
                max_state: ContextState::Configuration,
                value: SplitPolicy::None,
            },

            forward_demod: ConfigOption {
                name: "forward_demod",
                min: ForwardDemod::MIN,
                max: ForwardDemod::MAX,
                max_state: ContextState::Configuration,
                value: ForwardDemod::Full,
            },

            lpo_recursion_limit: ConfigOption {
                name: "lpo_recursion_limit",
                min: 16,
                max: usize::MAX,
                max_state: ContextState::Configuration,
                value: 1000,
            },

            tautology_check_max_neg: ConfigOption {
                name: "tautology_check_max_neg",
                min: 0,
                max: usize::MAX,
                max_state: ContextState::Configuration,
                value: 8,
            },

            precedence: Vec::default(),

            fun_weight: ConfigOption {
                name: "fun_weight",
                min: 1,
                max: i64::MAX,
                max_state: ContextState::Configuration,
                value: 2,
            },

            var_weight: ConfigOption {
                name: "var_weight",
                min: 1,
                max: i64::MAX,
                max_state: ContextState::Configuration,
                value: 1,
            },

            pick_given_ratio: ConfigOption {
                name: "pick_given_ratio",
                min: 0,
                max: u32::MAX,
                max_state: ContextState::Configuration,
                value: 5,
            },

            random_channel_bias: ConfigOption {
                name: "random_channel_bias",
                min: 0.0,
                max: 1.0,
                max_state: ContextState::Configuration,
                value: 0.0,
            },

            filter_copies_limit: ConfigOption {
                name: "filter_copies_limit",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: 4_000_000,
            },

            filter_limit: ConfigOption {
                name: "filter_limit",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: 8_000_000,
            },

            reweight_limit: ConfigOption {
                name: "reweight_limit",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: 30_000,
            },

            delete_bad_limit: ConfigOption {
                name: "delete_bad_limit",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: u64::MAX,
            },

            step_limit: ConfigOption {
                name: "step_limit",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: u64::MAX,
            },

            processed_limit: ConfigOption {
                name: "processed_limit",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: u64::MAX,
            },

            unprocessed_limit: ConfigOption {
                name: "unprocessed_limit",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: u64::MAX,
            },

            total_limit: ConfigOption {
                name: "total_limit",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: u64::MAX,
            },

            generated_limit: ConfigOption {
                name: "generated_limit",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: u64::MAX,
            },

            term_node_limit: ConfigOption {
                name: "term_node_limit",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: u64::MAX,
            },

            answer_limit: ConfigOption {
                name: "answer_limit",
                min: 1,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: 1,
            },

            time_limit: ConfigOption {
                name: "time_limit",
                min: std::time::Duration::from_secs(0),
                max: std::time::Duration::MAX,
                max_state: ContextState::Configuration,
                value: std::time::Duration::from_secs(0),
            },

            sat_check_interval: ConfigOption {
                name: "sat_check_interval",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: 0,
            },

            grounding: ConfigOption {
                name: "grounding",
                min: GroundingMode::MIN,
                max: GroundingMode::MAX,
                max_state: ContextState::Configuration,
                value: GroundingMode::MostFrequentConstant,
            },
        }
    }
}
