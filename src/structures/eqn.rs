/*!
Equational literals.

A literal is a pair of (shared) terms with a sign.
A non-equational atom *P(…)* is held as the equation *P(…) = $true* and flagged as non-equational, so one representation serves resolution-style and equational reasoning alike.

Several per-literal facts are cached as flags:

- *oriented* --- the left side is known to be at least as great as the right side under the current ordering.
- *maximal* / *strictly maximal* --- the literal's standing within its clause under the literal ordering.
- *selected* --- the literal was chosen by the selection function.

The caches are valid only while the underlying ordering and substitution are unchanged; code which instantiates or reorders literals clears them.
*/

use crate::{
    ordering::{multiset_compare, CompareResult, Ocb},
    structures::{
        signature::Signature,
        subst::{Deref, Subst},
        term::{TermBank, TermId, TermView},
    },
    types::err::{self},
};

bitflags::bitflags! {
    /// Per-literal flag bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EqnProps: u32 {
        /// The literal is positive.
        const POSITIVE = 1 << 0;

        /// The right side is not `$true`.
        const EQUATIONAL = 1 << 1;

        /// The left side is known to be at least as great as the right side.
        const ORIENTED = 1 << 2;

        /// No other literal in the clause is greater.
        const MAXIMAL = 1 << 3;

        /// No other literal in the clause is greater or equal.
        const STRICTLY_MAXIMAL = 1 << 4;

        /// Chosen by the literal selection function.
        const SELECTED = 1 << 5;

        /// Marks literals stemming from the from-clause when building a paramodulant.
        const FROM_CLAUSE = 1 << 6;
    }
}

/// An equational literal.
#[derive(Clone, Debug)]
pub struct Eqn {
    /// The left term.
    pub lhs: TermId,

    /// The right term; `$true` for a non-equational atom.
    pub rhs: TermId,

    /// Flag bits.
    pub props: EqnProps,
}

impl Eqn {
    /// A literal `lhs = rhs` (or `lhs ≠ rhs`), flagged equational when the right side is not `$true`.
    pub fn new(bank: &TermBank, lhs: TermId, rhs: TermId, positive: bool) -> Self {
        let mut props = EqnProps::empty();
        if positive {
            props |= EqnProps::POSITIVE;
        }
        if rhs != bank.true_term {
            props |= EqnProps::EQUATIONAL;
        }
        Eqn { lhs, rhs, props }
    }

    /// True if the literal is positive.
    pub fn is_positive(&self) -> bool {
        self.props.contains(EqnProps::POSITIVE)
    }

    /// True if the literal is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_positive()
    }

    /// True if the literal is a proper equation, i.e. the right side is not `$true`.
    pub fn is_equational(&self) -> bool {
        self.props.contains(EqnProps::EQUATIONAL)
    }

    /// True if `lhs ≥ rhs` is cached.
    pub fn is_oriented(&self) -> bool {
        self.props.contains(EqnProps::ORIENTED)
    }

    /// True if the maximality cache says no other literal in the clause is greater.
    pub fn is_maximal(&self) -> bool {
        self.props.contains(EqnProps::MAXIMAL)
    }

    /// True if the maximality cache says no other literal in the clause is greater or equal.
    pub fn is_strictly_maximal(&self) -> bool {
        self.props.contains(EqnProps::STRICTLY_MAXIMAL)
    }

    /// True if the literal is selected.
    pub fn is_selected(&self) -> bool {
        self.props.contains(EqnProps::SELECTED)
    }

    /// True if both sides are the same node.
    pub fn is_trivial(&self) -> bool {
        self.lhs == self.rhs
    }

    /// Exchanges the sides, dropping the orientation cache.
    pub fn swap_sides(&mut self) {
        std::mem::swap(&mut self.lhs, &mut self.rhs);
        self.props -= EqnProps::ORIENTED;
    }

    /// Orients the literal: after the call the left side is the greater side whenever the sides are comparable, and the oriented flag caches the outcome.
    pub fn orient(&mut self, ocb: &Ocb, bank: &TermBank) {
        let subst = Subst::new();
        match ocb.compare(bank, &subst, self.lhs, Deref::Never, self.rhs, Deref::Never) {
            CompareResult::Greater | CompareResult::Equal => {
                self.props |= EqnProps::ORIENTED;
            }
            CompareResult::Lesser => {
                std::mem::swap(&mut self.lhs, &mut self.rhs);
                self.props |= EqnProps::ORIENTED;
            }
            CompareResult::Uncomparable => {
                self.props -= EqnProps::ORIENTED;
            }
        }
    }

    /// Drops every cache which depends on the ordering or the clause context.
    pub fn clear_caches(&mut self) {
        self.props -= EqnProps::ORIENTED
            | EqnProps::MAXIMAL
            | EqnProps::STRICTLY_MAXIMAL
            | EqnProps::SELECTED;
    }

    /// The sides instantiated by `subst`, as a fresh literal with caches cleared.
    pub fn instantiate(
        &self,
        bank: &mut TermBank,
        subst: &Subst,
    ) -> Result<Eqn, err::TermBankError> {
        let lhs = subst.apply(bank, self.lhs)?;
        let rhs = subst.apply(bank, self.rhs)?;
        let mut eqn = Eqn::new(bank, lhs, rhs, self.is_positive());
        eqn.props |= self.props & EqnProps::FROM_CLAUSE;
        Ok(eqn)
    }

    /// True if the two literals have equal atoms, i.e. equal sides up to the symmetry of equality.
    pub fn same_atom(&self, other: &Eqn) -> bool {
        (self.lhs == other.lhs && self.rhs == other.rhs)
            || (self.is_equational()
                && other.is_equational()
                && self.lhs == other.rhs
                && self.rhs == other.lhs)
    }

    /// True if the two literals are equal: equal atoms with equal signs.
    pub fn literal_equal(&self, other: &Eqn) -> bool {
        self.is_positive() == other.is_positive() && self.same_atom(other)
    }

    /// True if the two literals resolve: equal atoms with opposite signs.
    pub fn resolvable(&self, other: &Eqn) -> bool {
        self.is_positive() != other.is_positive() && self.same_atom(other)
    }

    /// The structural weight of the literal.
    pub fn weight(&self, bank: &TermBank) -> u32 {
        bank.term(self.lhs).weight + bank.term(self.rhs).weight
    }

    /// The term multiset encoding the literal for the literal ordering: `{s, t}` when positive, `{s, s, t, t}` when negative.
    pub fn term_multiset(&self) -> Vec<TermId> {
        if self.is_positive() {
            vec![self.lhs, self.rhs]
        } else {
            vec![self.lhs, self.lhs, self.rhs, self.rhs]
        }
    }

    /// A deterministic key for the clause-internal literal order: positive before negative, then by entry numbers.
    pub fn sort_key(&self, bank: &TermBank) -> (bool, u64, u64) {
        (
            self.is_negative(),
            bank.term(self.lhs).entry_no,
            bank.term(self.rhs).entry_no,
        )
    }
}

/// Compares two literals under the literal ordering: the multiset extension of the term ordering over the literal encodings.
#[allow(clippy::too_many_arguments)]
pub fn eqn_compare(
    ocb: &Ocb,
    bank: &TermBank,
    subst: &Subst,
    a: &Eqn,
    deref_a: Deref,
    b: &Eqn,
    deref_b: Deref,
) -> CompareResult {
    multiset_compare(
        ocb,
        bank,
        subst,
        &a.term_multiset(),
        deref_a,
        &b.term_multiset(),
        deref_b,
    )
}

/// Recomputes the maximality caches for a literal list.
pub fn mark_maximality(ocb: &Ocb, bank: &TermBank, lits: &mut [Eqn]) {
    let subst = Subst::new();
    let count = lits.len();

    for index in 0..count {
        let mut maximal = true;
        let mut strictly = true;

        for other in 0..count {
            if other == index {
                continue;
            }
            match eqn_compare(
                ocb,
                bank,
                &subst,
                &lits[other],
                Deref::Never,
                &lits[index],
                Deref::Never,
            ) {
                CompareResult::Greater => {
                    maximal = false;
                    strictly = false;
                    break;
                }
                CompareResult::Equal => strictly = false,
                _ => {}
            }
        }

        lits[index].props -= EqnProps::MAXIMAL | EqnProps::STRICTLY_MAXIMAL;
        if maximal {
            lits[index].props |= EqnProps::MAXIMAL;
        }
        if maximal && strictly {
            lits[index].props |= EqnProps::STRICTLY_MAXIMAL;
        }
    }
}

/// True if the literal at `index` is maximal (strictly, if asked) in `lits` under `subst`.
///
/// Used for inference side conditions, where maximality must be rechecked after unification.
pub fn maximal_under(
    ocb: &Ocb,
    bank: &TermBank,
    subst: &Subst,
    lits: &[Eqn],
    index: usize,
    strict: bool,
) -> bool {
    for other in 0..lits.len() {
        if other == index {
            continue;
        }
        match eqn_compare(
            ocb,
            bank,
            subst,
            &lits[other],
            Deref::Always,
            &lits[index],
            Deref::Always,
        ) {
            CompareResult::Greater => return false,
            CompareResult::Equal if strict => return false,
            _ => {}
        }
    }
    true
}

/// Displays a literal of a bank against a signature, in TPTP style.
pub struct EqnView<'a> {
    /// The bank holding the sides.
    pub bank: &'a TermBank,

    /// The signature naming function codes.
    pub sig: &'a Signature,

    /// The literal to display.
    pub eqn: &'a Eqn,
}

impl std::fmt::Display for EqnView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lhs = TermView {
            bank: self.bank,
            sig: self.sig,
            term: self.eqn.lhs,
        };
        if !self.eqn.is_equational() {
            if self.eqn.is_negative() {
                write!(f, "~{lhs}")
            } else {
                write!(f, "{lhs}")
            }
        } else {
            let rhs = TermView {
                bank: self.bank,
                sig: self.sig,
                term: self.eqn.rhs,
            };
            if self.eqn.is_negative() {
                write!(f, "{lhs}!={rhs}")
            } else {
                write!(f, "{lhs}={rhs}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Signature, TermBank, Ocb) {
        let mut sig = Signature::new();
        sig.insert("f", 1).unwrap();
        sig.insert("a", 0).unwrap();
        sig.insert("p", 1).unwrap();
        sig.refresh_alpha_ranks();
        let bank = TermBank::new(&sig);
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);
        (sig, bank, ocb)
    }

    #[test]
    fn orientation_swaps_the_lesser_side_left() {
        let (sig, mut bank, ocb) = setup();
        let f = sig.code_of("f").unwrap();
        let a = sig.code_of("a").unwrap();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_fa = bank.insert(f, vec![t_a]).unwrap();

        let mut eqn = Eqn::new(&bank, t_a, t_fa, true);
        eqn.orient(&ocb, &bank);

        assert!(eqn.is_oriented());
        assert_eq!(eqn.lhs, t_fa);
        assert_eq!(eqn.rhs, t_a);
    }

    #[test]
    fn atoms_encode_against_true() {
        let (sig, mut bank, _ocb) = setup();
        let p = sig.code_of("p").unwrap();
        let a = sig.code_of("a").unwrap();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_pa = bank.insert(p, vec![t_a]).unwrap();

        let pos = Eqn::new(&bank, t_pa, bank.true_term, true);
        let neg = Eqn::new(&bank, t_pa, bank.true_term, false);

        assert!(!pos.is_equational());
        assert!(pos.resolvable(&neg));
        assert!(!pos.resolvable(&pos));
        assert_eq!(format!("{}", EqnView { bank: &bank, sig: &sig, eqn: &neg }), "~p(a)");
    }

    #[test]
    fn negative_literals_outweigh_positive_twins() {
        let (sig, mut bank, ocb) = setup();
        let a = sig.code_of("a").unwrap();
        let f = sig.code_of("f").unwrap();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_fa = bank.insert(f, vec![t_a]).unwrap();

        let pos = Eqn::new(&bank, t_fa, t_a, true);
        let neg = Eqn::new(&bank, t_fa, t_a, false);
        let subst = Subst::new();

        assert_eq!(
            eqn_compare(&ocb, &bank, &subst, &neg, Deref::Never, &pos, Deref::Never),
            CompareResult::Greater
        );
    }

    #[test]
    fn maximality_marks_the_greatest_literal() {
        let (sig, mut bank, ocb) = setup();
        let a = sig.code_of("a").unwrap();
        let f = sig.code_of("f").unwrap();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_fa = bank.insert(f, vec![t_a]).unwrap();
        let t_ffa = bank.insert(f, vec![t_fa]).unwrap();

        let mut lits = vec![
            Eqn::new(&bank, t_fa, t_a, true),
            Eqn::new(&bank, t_ffa, t_a, true),
        ];
        mark_maximality(&ocb, &bank, &mut lits);

        assert!(!lits[0].is_maximal());
        assert!(lits[1].is_maximal());
        assert!(lits[1].is_strictly_maximal());
    }
}
