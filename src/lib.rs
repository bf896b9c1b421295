/*!
A library for saturation-based equational theorem proving in clausal first-order logic.

egret_prover is a library for searching for refutations of first-order clause sets with equality, using a given-clause superposition loop over maximally shared terms, with support for proof extraction.

egret_prover is developed to help researchers, developers, or anyone curious, to investigate saturation provers, whether as a novice or through implementing novel ideas.

Some guiding principles of egret_prover are (see [below](#guiding-principles) for further details):
- [Modularity](#modularity).
- Documentation, of both implementation and theory.
- [Proofs](#proofs).
- [Simple efficiency](#simple-efficiency).

# Orientation

The library is designed around the core structure of a [context].

Clauses may be added through the TPTP-style [problem reader](crate::context::GenericContext::read_problem) or [programmatically](crate::context::GenericContext::add_clause).

Internally, and at a high level, a saturation is viewed in terms of manipulation of, and relationships between, a handful of structures which instantiate core theoretical objects.
Notably:
- Terms live in a [term bank](structures::term) which guarantees maximal sharing, so structural equality of terms is identity of ids.
- A [reduction ordering](ordering) orients equations and restricts inferences.
- Clauses move between an unprocessed set and four processed sets held in [clause databases](db), simplifying one another as they go.
- Every clause carries a [derivation](derivation), from which a proof object falls out once the empty clause is found.

Useful starting points, then, may be:
- The high-level [saturation procedure](crate::procedures::saturation) to inspect the dynamics of a run.
- The [database module](crate::db) to inspect the data considered during a run.
- The [structures] to familiarise yourself with the abstract elements of a saturation and their representation (terms, literals, clauses, etc.)
- The [configuration](crate::config) to see what strategies are supported.

If you're in search of problems to feed the prover, consider:
- The TPTP problem library at [tptp.org](https://www.tptp.org)
- The problems distributed with provers such as [E](https://eprover.org) or Vampire

# Examples

+ Prove that in a group, the left identity is a right identity.

```rust
# use egret_prover::{config::Config, context::Context, reports::Report};
let mut ctx = Context::from_config(Config::default());

let problem = "
cnf(left_identity, axiom, (mult(e,X)=X)).
cnf(left_inverse, axiom, (mult(inv(X),X)=e)).
cnf(associativity, axiom, (mult(mult(X,Y),Z)=mult(X,mult(Y,Z)))).
cnf(goal, negated_conjecture, (mult(a,e)!=a)).
";

ctx.read_problem(problem.as_bytes()).unwrap();
assert_eq!(ctx.saturate().unwrap(), Report::Proof);
```

+ A saturated set without the empty clause is satisfiable (under a complete strategy).

```rust
# use egret_prover::{config::Config, context::Context, reports::Report};
let mut ctx = Context::from_config(Config::default());

ctx.read_problem("cnf(only, axiom, p(a)).".as_bytes()).unwrap();
assert_eq!(ctx.saturate().unwrap(), Report::Satisfiable);
```

# Guiding principles

## Modularity

  + A prover is built of many interconnected parts, but where possible (and reasonable) interaction between parts happens through documented access points. For example:
    - Clauses are stored in a [clause store](db::store), and are accessed through ids.
      Clause sets record ids; the clause records its owning set; the two views are kept consistent by the set api.
    - The inference rules are factored into a collection of [procedures], each reading premises and returning conclusions, with the [saturation loop](procedures::saturation) alone mutating the global state.
    - Use of external crates is limited to crates which help support modularity, such as [log](https://docs.rs/log/latest/log/) and [rand](https://docs.rs/rand/latest/rand/).

## Proofs

+ Every clause carries a [derivation stack](derivation), and simplifications record the clauses they rely on, so a refutation is always accompanied by a checkable derivation of the empty clause from the input.

+ Deleted clauses stay resolvable in the [clause store](db::store) for exactly this purpose --- deletion is never silent from the proof's viewpoint.

## Simple efficiency

The prover is efficient in most operations, and known inefficiencies are often noted.
Still, while compromises are made for the sake of efficiency, overall the library is written using mostly simple Rust.
  + Sharing makes structural equality an id comparison, and hash-consing happens once per term, on insertion.
  + Rewriting is kept incremental through normal-form dates, so a term is revisited only when the demodulator set has grown past it.
  + Candidate retrieval for subsumption and demodulation goes through indices; the expensive checks run on a narrowed field.

# Logs

To help diagnose issues (somewhat) detailed calls to [log!](log) are made, and a variety of targets are defined in order to help narrow output to relevant parts of the library.
As logging is only built on request, and further can be requested by level, logs are verbose.

The targets are listed in [misc::log].

For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
- Logs related to [rewriting](crate::procedures::rewriting) can be filtered with `RUST_LOG=rewriting …` or,
- Logs of the saturation loop without per-inference details can be found with `RUST_LOG=saturation=info …`
*/

#![allow(clippy::collapsible_else_if)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::single_match)]

pub mod builder;
pub mod procedures;

pub mod config;
pub mod context;
pub mod structures;
pub mod types;

pub mod generic;

pub mod reports;

pub mod db;

pub mod derivation;
pub mod ordering;

pub mod misc;
