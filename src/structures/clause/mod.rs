/*!
Clauses --- multisets of literals, interpreted as disjunctions.

A clause owns its literal list together with the bookkeeping the saturation loop relies on: literal counts, property bits, a creation stamp, a normal-form date, the heuristic evaluation, the key of the owning clause set, and the [derivation stack](crate::derivation).

Stored clauses are kept normalized:

- no duplicate literals,
- literals sorted positive-then-negative with a deterministic structural tie-breaker, so clause equality is a linear scan,
- no trivially false literals (these are cut during contraction),
- and no clause holding a trivially true literal is ever stored --- such clauses are tautologies and are discarded before insertion.

The empty clause --- a clause with no literals --- is falsum, the goal of the whole exercise.
*/

use crate::{
    db::{ClauseId, SetKey},
    derivation::DerivationStep,
    ordering::Ocb,
    structures::{
        eqn::{Eqn, EqnView},
        signature::Signature,
        term::{Date, TermBank, TermId},
    },
    types::err::{self},
};

use std::collections::HashMap;

bitflags::bitflags! {
    /// Per-clause flag bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ClauseProps: u32 {
        /// The clause was part of the input.
        const INITIAL = 1 << 0;

        /// The clause stems from the (negated) conjecture.
        const CONJECTURE = 1 << 1;

        /// The clause has been processed by the given-clause loop.
        const PROCESSED = 1 << 2;

        /// The clause has been deleted; it survives only for proof reconstruction.
        const DEAD = 1 << 3;

        /// The clause belongs to the set-of-support.
        const IN_SOS = 1 << 4;

        /// Literal selection has been computed for the clause.
        const SELECTION_DONE = 1 << 5;
    }
}

/// A clause.
#[derive(Clone, Debug)]
pub struct Clause {
    /// The identity of the clause within its store.
    pub id: ClauseId,

    /// The literal list.
    pub literals: Vec<Eqn>,

    /// A count of positive literals.
    pub pos_count: u32,

    /// A count of negative literals.
    pub neg_count: u32,

    /// Flag bits.
    pub props: ClauseProps,

    /// The clause is known to be in normal form with respect to the demodulators at this date.
    pub date: Date,

    /// Stamp of the processing step the clause was created at.
    pub create_date: u64,

    /// The set holding the clause, while the clause is a member of one.
    pub set: Option<SetKey>,

    /// The heuristic evaluation; lower is better.
    pub evaluation: i64,

    /// How the clause came to be.
    pub derivation: Vec<DerivationStep>,
}

impl Clause {
    /// A clause over `literals` with identity `id`.
    ///
    /// Counts are computed; normalization is the caller's concern (see [normalize](Clause::normalize)).
    pub fn new(id: ClauseId, literals: Vec<Eqn>) -> Self {
        let mut clause = Clause {
            id,
            literals,
            pos_count: 0,
            neg_count: 0,
            props: ClauseProps::empty(),
            date: 0,
            create_date: 0,
            set: None,
            evaluation: 0,
            derivation: Vec::default(),
        };
        clause.recount();
        clause
    }

    /// Recomputes the literal counts.
    pub fn recount(&mut self) {
        self.pos_count = self.literals.iter().filter(|l| l.is_positive()).count() as u32;
        self.neg_count = self.literals.len() as u32 - self.pos_count;
    }

    /// A count of literals.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// True if the clause is the empty clause.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// True if the clause has exactly one literal.
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// True if the clause is a positive unit equation, i.e. a candidate demodulator.
    pub fn is_demodulator(&self) -> bool {
        self.pos_count == 1 && self.neg_count == 0
    }

    /// True if every literal is negative.
    pub fn is_negative(&self) -> bool {
        self.pos_count == 0
    }

    /// True if the clause has at most one positive literal.
    pub fn is_horn(&self) -> bool {
        self.pos_count <= 1
    }

    /// True if the clause was part of the input.
    pub fn is_initial(&self) -> bool {
        self.props.contains(ClauseProps::INITIAL)
    }

    /// True if the clause stems from the negated conjecture.
    pub fn is_conjecture(&self) -> bool {
        self.props.contains(ClauseProps::CONJECTURE)
    }

    /// True if the clause has been processed.
    pub fn is_processed(&self) -> bool {
        self.props.contains(ClauseProps::PROCESSED)
    }

    /// True if the clause has been deleted.
    pub fn is_dead(&self) -> bool {
        self.props.contains(ClauseProps::DEAD)
    }

    /// Appends a derivation step.
    pub fn push_derivation(&mut self, step: DerivationStep) {
        self.derivation.push(step);
    }

    /// True if some literal is selected.
    pub fn has_selection(&self) -> bool {
        self.literals.iter().any(|l| l.is_selected())
    }

    /// Normalizes the literal list: duplicates are removed and literals sorted positive-then-negative under the structural tie-breaker.
    pub fn normalize(&mut self, bank: &TermBank) {
        let mut kept: Vec<Eqn> = Vec::with_capacity(self.literals.len());
        for literal in self.literals.drain(..) {
            if !kept.iter().any(|k| k.literal_equal(&literal)) {
                kept.push(literal);
            }
        }
        kept.sort_by_key(|l| l.sort_key(bank));
        self.literals = kept;
        self.recount();
    }

    /// Removes trivially false literals (`s ≠ s`).
    /// Returns the number removed.
    pub fn remove_false_literals(&mut self) -> usize {
        let before = self.literals.len();
        self.literals.retain(|l| !(l.is_negative() && l.is_trivial()));
        let removed = before - self.literals.len();
        if removed > 0 {
            self.recount();
        }
        removed
    }

    /// The cheap tautology test: a trivially true literal, or a resolvable pair.
    pub fn is_trivial_tautology(&self) -> bool {
        for (index, literal) in self.literals.iter().enumerate() {
            if literal.is_positive() && literal.is_trivial() {
                return true;
            }
            for other in &self.literals[index + 1..] {
                if literal.resolvable(other) {
                    return true;
                }
            }
        }
        false
    }

    /// True if the two clauses hold equal literal lists.
    ///
    /// Linear, relying on the normalized literal order.
    pub fn literals_equal(&self, other: &Clause) -> bool {
        self.literals.len() == other.literals.len()
            && self
                .literals
                .iter()
                .zip(other.literals.iter())
                .all(|(a, b)| a.literal_equal(b))
    }

    /// The structural weight of the clause.
    pub fn weight(&self, bank: &TermBank) -> u32 {
        self.literals.iter().map(|l| l.weight(bank)).sum()
    }

    /// The heuristic weight of the clause under the control block's symbol weights.
    pub fn heuristic_weight(&self, ocb: &Ocb, bank: &TermBank) -> i64 {
        self.literals
            .iter()
            .map(|l| ocb.term_weight(bank, l.lhs) + ocb.term_weight(bank, l.rhs))
            .sum()
    }

    /// The distinct variables of the clause, in first-occurrence order.
    pub fn variables(&self, bank: &TermBank) -> Vec<TermId> {
        let mut out = Vec::default();
        for literal in &self.literals {
            bank.variables_of(literal.lhs, &mut out);
            bank.variables_of(literal.rhs, &mut out);
        }
        out
    }

    /// A copy of the literal list with every variable replaced by a fresh one, for variable-disjoint inference premises.
    pub fn disjoint_literals(&self, bank: &mut TermBank) -> Result<Vec<Eqn>, err::TermBankError> {
        let mut map = HashMap::default();
        let mut literals = Vec::with_capacity(self.literals.len());
        for literal in &self.literals {
            let lhs = bank.rename_vars(literal.lhs, &mut map)?;
            let rhs = bank.rename_vars(literal.rhs, &mut map)?;
            let mut copy = Eqn::new(bank, lhs, rhs, literal.is_positive());
            copy.props |= literal.props
                & (crate::structures::eqn::EqnProps::ORIENTED
                    | crate::structures::eqn::EqnProps::MAXIMAL
                    | crate::structures::eqn::EqnProps::STRICTLY_MAXIMAL
                    | crate::structures::eqn::EqnProps::SELECTED);
            literals.push(copy);
        }
        Ok(literals)
    }

    /// Renames the variables of the clause to canonical indices in traversal order.
    pub fn normalize_variables(&mut self, bank: &mut TermBank) -> Result<(), err::TermBankError> {
        let variables = self.variables(bank);
        let mut map: HashMap<TermId, TermId> = HashMap::default();
        for (index, var) in variables.into_iter().enumerate() {
            let sort = bank.term(var).sort;
            let canonical = bank.variable(-1 - index as i64, sort);
            map.insert(var, canonical);
        }
        // Every variable of the clause is mapped, so no fresh variables are minted here.
        for literal in &mut self.literals {
            literal.lhs = bank.rename_vars(literal.lhs, &mut map)?;
            literal.rhs = bank.rename_vars(literal.rhs, &mut map)?;
        }
        Ok(())
    }
}

/// Displays a clause of a bank against a signature, literals joined by `|`.
pub struct ClauseView<'a> {
    /// The bank holding the terms.
    pub bank: &'a TermBank,

    /// The signature naming function codes.
    pub sig: &'a Signature,

    /// The clause to display.
    pub clause: &'a Clause,
}

impl std::fmt::Display for ClauseView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.clause.is_empty() {
            return write!(f, "$false");
        }
        for (index, literal) in self.clause.literals.iter().enumerate() {
            if index > 0 {
                write!(f, "|")?;
            }
            write!(
                f,
                "{}",
                EqnView {
                    bank: self.bank,
                    sig: self.sig,
                    eqn: literal
                }
            )?;
        }
        Ok(())
    }
}
