//! Key structures, such as terms, literals, and clauses.
//!
//! The elements of the clausal language are layered:
//!
//! - A [signature](signature) fixes the function symbols of the language.
//! - [Terms](term) are built from signature symbols and variables, and are always held in a [term bank](term::TermBank) which guarantees maximal sharing.
//! - [Equational literals](eqn) pair two terms with a sign.
//!   A non-equational atom *P(…)* is encoded as the equation *P(…) = $true*, so a single literal representation covers the whole language.
//! - [Clauses](clause) are disjunctions of literals, together with bookkeeping for the saturation loop (properties, evaluation, derivation).
//! - [Substitutions](subst) map variables to terms, and carry the unification and matching algorithms.

pub mod clause;
pub mod eqn;
pub mod signature;
pub mod subst;
pub mod term;
