/*!
The context --- to which clauses are added and within which a saturation takes place.

Strictly, a [GenericContext] and a [Context].

The generic context is designed to be generic over various parameters, though for the moment this is limited to the source of randomness.
Still, this helps distinguish generic context methods against those intended for external use or a particular application.
In particular, [from_config](Context::from_config) is implemented for a context rather than a generic context to avoid requiring a source of randomness to be supplied alongside a config.

# Example

```rust
# use egret_prover::config::Config;
# use egret_prover::context::Context;
# use egret_prover::reports::Report;
let mut ctx = Context::from_config(Config::default());

let problem = "
cnf(left_identity, axiom, (mult(e,X)=X)).
cnf(goal, negated_conjecture, (mult(e,a)!=a)).
";

ctx.read_problem(problem.as_bytes()).unwrap();
assert_eq!(ctx.saturate().unwrap(), Report::Proof);
```
*/

mod counters;
pub use counters::Counters;
mod generic;
pub use generic::GenericContext;
pub mod queues;
mod specific;
pub use specific::Context;

use crate::{config::Budget, db::ClauseId};

/// The state of a context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextState {
    /// The context allows for configuration.
    Configuration,

    /// The context allows input.
    Input,

    /// A saturation is under way.
    Saturating,

    /// The empty clause has been derived.
    Proof(ClauseId),

    /// The clause set is saturated under a complete strategy: the input is satisfiable.
    Satisfiable,

    /// The clause set is saturated, though completeness was lost along the way.
    GaveUp,

    /// A budget was exhausted.
    ResourceOut(Budget),

    /// The deadline passed.
    Timeout,
}

impl std::fmt::Display for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Input => write!(f, "Input"),
            Self::Saturating => write!(f, "Saturating"),
            Self::Proof(_) => write!(f, "Proof"),
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::GaveUp => write!(f, "GaveUp"),
            Self::ResourceOut(_) => write!(f, "ResourceOut"),
            Self::Timeout => write!(f, "Timeout"),
        }
    }
}
