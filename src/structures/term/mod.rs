/*!
Terms, held as nodes of a maximally shared DAG.

Every term of interest to the saturation core lives in a [TermBank].
The bank hands out [TermId]s, and two structurally equal terms inserted into the same bank receive the same id.
As a consequence, structural equality of shared terms is id equality, and all higher structures (literals, clauses, indices) store ids rather than term trees.

A term node carries its function code (negative codes are variables), argument ids, weight, variable count and flag bits.
Rewrite bookkeeping --- the pair of normal-form dates and the replacement pointer of a rewritten node --- is kept by the bank beside the nodes, so shared nodes themselves are never mutated.

# Example

```rust
# use egret_prover::structures::signature::Signature;
# use egret_prover::structures::term::TermBank;
let mut sig = Signature::new();
let f = sig.insert("f", 1).unwrap();
let a = sig.insert("a", 0).unwrap();

let mut bank = TermBank::new(&sig);

let term_a = bank.insert(a, vec![]).unwrap();
let once = bank.insert(f, vec![term_a]).unwrap();
let again = bank.insert(f, vec![term_a]).unwrap();

// Maximal sharing: the same structure is the same node.
assert_eq!(once, again);
assert!(bank.term(once).is_ground());
```
*/

mod bank;
pub use bank::{RewriteTarget, TermBank};

use crate::structures::signature::Signature;

/// The id of a term node within a [TermBank].
pub type TermId = u32;

/// A function code: positive codes index the signature, negative codes are variables.
pub type FunCode = i64;

/// A sort (type) marker.
///
/// The core is essentially single-sorted; the sort is carried so variable banks and pseudo-grounding can distinguish sorts fed in by a typed front end.
pub type Sort = u32;

/// The sort of individuals.
pub const SORT_INDIVIDUAL: Sort = 0;

/// A monotone timestamp for rewrite bookkeeping.
pub type Date = u64;

/// The weight of a variable node.
pub const DEFAULT_VWEIGHT: u32 = 1;

/// The weight contributed by a function symbol node.
pub const DEFAULT_FWEIGHT: u32 = 2;

/// The rewrite levels at which normal-form dates are tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RewriteLevel {
    /// Rewriting with oriented positive unit equations (rules) only.
    Rules = 0,

    /// Rewriting with rules and (instance-orientable) equations.
    Full = 1,
}

impl RewriteLevel {
    /// The index of the level in a normal-form date pair.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The minimum rewrite level.
    pub const MIN: RewriteLevel = RewriteLevel::Rules;

    /// The maximum rewrite level.
    pub const MAX: RewriteLevel = RewriteLevel::Full;
}

impl std::fmt::Display for RewriteLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rules => write!(f, "Rules"),
            Self::Full => write!(f, "Full"),
        }
    }
}

bitflags::bitflags! {
    /// Per-node flag bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TermProps: u32 {
        /// The node is owned by a term bank.
        const SHARED = 1 << 0;

        /// The node contains no variables.
        const GROUND = 1 << 1;

        /// The node has been rewritten; the bank holds its replacement.
        const REWRITTEN = 1 << 2;

        /// The position needs to be tried for paramodulation.
        const POTENTIAL_PARAMOD = 1 << 3;

        /// A meta-variable generated by term top operations and the like.
        const SPECIAL_VAR = 1 << 4;

        /// An original predicate position morphed into a term.
        const PRED_POS = 1 << 5;

        /// Mark bit for the garbage collector.
        const GC_MARK = 1 << 6;
    }
}

/// A term node.
///
/// Nodes are created exclusively through a [TermBank], which guarantees the invariants: argument ids refer to nodes of the same bank, equal structure is equal id, the weight is the recursive symbol-weight sum, and the ground flag matches a variable count of zero.
#[derive(Clone, Debug)]
pub struct Term {
    /// The top function code; negative for variables.
    pub f_code: FunCode,

    /// The sort of the term.
    pub sort: Sort,

    /// Argument ids; empty for variables and constants.
    pub args: Vec<TermId>,

    /// The recursive symbol-weight sum.
    pub weight: u32,

    /// A count of variable occurrences.
    pub var_count: u32,

    /// Monotone insertion counter within the owning bank.
    pub entry_no: u64,

    /// Flag bits.
    pub props: TermProps,
}

impl Term {
    /// True if the node is a variable.
    pub fn is_var(&self) -> bool {
        self.f_code < 0
    }

    /// True if the node contains no variables.
    pub fn is_ground(&self) -> bool {
        self.var_count == 0
    }

    /// True if the node is a constant (a function symbol with no arguments).
    pub fn is_const(&self) -> bool {
        self.f_code > 0 && self.args.is_empty()
    }

    /// The arity of the node.
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// Displays a term of a bank against a signature.
///
/// Variables print as `X<code>`; function terms by signature name.
pub struct TermView<'a> {
    /// The bank holding the term.
    pub bank: &'a TermBank,

    /// The signature naming function codes.
    pub sig: &'a Signature,

    /// The term to display.
    pub term: TermId,
}

impl std::fmt::Display for TermView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.bank.term(self.term);
        if node.is_var() {
            return write!(f, "X{}", -node.f_code);
        }
        write!(f, "{}", self.sig.name(node.f_code))?;
        if !node.args.is_empty() {
            write!(f, "(")?;
            for (index, &arg) in node.args.iter().enumerate() {
                if index > 0 {
                    write!(f, ",")?;
                }
                write!(
                    f,
                    "{}",
                    TermView {
                        bank: self.bank,
                        sig: self.sig,
                        term: arg
                    }
                )?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
