/*!
Propositional abstraction --- pseudo-grounding and the SAT collaborator seam.

First-order clauses are mapped to propositional clauses by substituting a canonical representative term for every variable (per sort) and reading each resulting ground atom as a propositional letter.
The abstraction is sound for unsatisfiability: the propositional image is entailed by the first-order set, so an unsatisfiable image proves the set unsatisfiable, and the unsatisfiable core names first-order parents which together imply the empty clause.
A satisfiable or unknown verdict says nothing, and the saturation continues.

The SAT solver itself is an external collaborator behind the [SatCollaborator] trait.
The wire format is a vector of signed literal codes per clause, zero-terminated.
*/

use std::collections::HashMap;

use crate::{
    config::GroundingMode,
    db::{ClauseId, ClauseStore},
    misc::log::targets::{self},
    structures::{
        clause::ClauseProps,
        signature::Signature,
        subst::Subst,
        term::{Sort, TermBank, TermId, SORT_INDIVIDUAL},
    },
    types::err::{self},
};

/// A propositional clause bound for the collaborator.
#[derive(Clone, Debug)]
pub struct SatClause {
    /// Signed literal codes, zero-terminated.
    pub lits: Vec<i32>,

    /// The first-order parent.
    pub parent: ClauseId,
}

/// The collaborator's verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SatVerdict {
    /// The propositional image is satisfiable; nothing follows.
    Satisfiable,

    /// The image is unsatisfiable; the indices name an unsatisfiable core.
    Unsatisfiable(Vec<usize>),

    /// No verdict.
    Unknown,
}

/// An external SAT solver.
pub trait SatCollaborator {
    /// Checks the satisfiability of a propositional clause set.
    fn check(&mut self, clauses: &[SatClause]) -> SatVerdict;
}

/// The pseudo-grounding translation state.
#[derive(Default)]
pub struct Grounding {
    /// Atom codes, keyed by the (side-ordered) ground equation.
    atoms: HashMap<(TermId, TermId), i32>,

    /// Representative terms per sort.
    representatives: HashMap<Sort, TermId>,
}

impl Grounding {
    /// Prepares a grounding under `mode` over the clauses of `ids`.
    pub fn prepare(
        mode: GroundingMode,
        bank: &mut TermBank,
        sig: &mut Signature,
        store: &ClauseStore,
        ids: &[ClauseId],
    ) -> Result<Self, err::TermBankError> {
        let mut grounding = Grounding::default();

        let representative = match mode {
            GroundingMode::PseudoVariable => {
                let code = sig.fresh_skolem(0);
                bank.insert(code, vec![])?
            }
            GroundingMode::MostFrequentConstant => {
                match most_frequent_constant(bank, store, ids, false) {
                    Some(constant) => constant,
                    None => {
                        let code = sig.fresh_skolem(0);
                        bank.insert(code, vec![])?
                    }
                }
            }
            GroundingMode::ConjectureConstant => {
                match most_frequent_constant(bank, store, ids, true)
                    .or(most_frequent_constant(bank, store, ids, false))
                {
                    Some(constant) => constant,
                    None => {
                        let code = sig.fresh_skolem(0);
                        bank.insert(code, vec![])?
                    }
                }
            }
        };
        grounding.representatives.insert(SORT_INDIVIDUAL, representative);

        Ok(grounding)
    }

    /// Translates `ids` into propositional clauses.
    ///
    /// Clauses grounding to tautologies are dropped --- they constrain nothing.
    pub fn translate(
        &mut self,
        bank: &mut TermBank,
        store: &ClauseStore,
        ids: &[ClauseId],
    ) -> Result<Vec<SatClause>, err::TermBankError> {
        let mut out = Vec::with_capacity(ids.len());

        'clauses: for &id in ids {
            let clause = store.get(id);
            let mut subst = Subst::new();
            let mut variables = Vec::default();
            for lit in &clause.literals {
                bank.variables_of(lit.lhs, &mut variables);
                bank.variables_of(lit.rhs, &mut variables);
            }
            for var in variables {
                let sort = bank.term(var).sort;
                let representative = self.representatives[&sort];
                subst.bind(var, representative);
            }

            let mut lits: Vec<i32> = Vec::with_capacity(clause.len() + 1);
            for lit in &clause.literals {
                let lhs = subst.apply(bank, lit.lhs)?;
                let rhs = subst.apply(bank, lit.rhs)?;
                let key = if lhs <= rhs { (lhs, rhs) } else { (rhs, lhs) };

                let next_code = self.atoms.len() as i32 + 1;
                let code = *self.atoms.entry(key).or_insert(next_code);
                let signed = if lit.is_positive() { code } else { -code };

                if lits.contains(&-signed) {
                    // Ground tautology.
                    continue 'clauses;
                }
                if !lits.contains(&signed) {
                    lits.push(signed);
                }
            }

            lits.push(0);
            out.push(SatClause { lits, parent: id });
        }

        log::debug!(target: targets::GROUNDING, "Grounded {} clauses over {} atoms", out.len(), self.atoms.len());
        Ok(out)
    }
}

/// The most frequent constant over the given clauses, conjecture clauses only when asked.
fn most_frequent_constant(
    bank: &TermBank,
    store: &ClauseStore,
    ids: &[ClauseId],
    conjecture_only: bool,
) -> Option<TermId> {
    let mut counts: HashMap<TermId, usize> = HashMap::default();

    for &id in ids {
        let clause = store.get(id);
        if conjecture_only && !clause.props.contains(ClauseProps::CONJECTURE) {
            continue;
        }
        for lit in &clause.literals {
            count_constants(bank, lit.lhs, &mut counts);
            count_constants(bank, lit.rhs, &mut counts);
        }
    }

    counts
        .into_iter()
        .max_by_key(|&(term, count)| (count, std::cmp::Reverse(term)))
        .map(|(term, _)| term)
}

fn count_constants(bank: &TermBank, term: TermId, counts: &mut HashMap<TermId, usize>) {
    let node = bank.term(term);
    if node.is_var() {
        return;
    }
    if node.is_const() {
        *counts.entry(term).or_default() += 1;
        return;
    }
    for &arg in &node.args {
        count_constants(bank, arg, counts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::eqn::Eqn;
    use crate::structures::term::SORT_INDIVIDUAL;

    #[test]
    fn grounding_identifies_atoms_up_to_the_representative() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_px = bank.insert(p, vec![x]).unwrap();
        let t_pa = bank.insert(p, vec![t_a]).unwrap();

        // p(X) and ~p(a) ground to a complementary pair under the constant a.
        let one = store.fresh(vec![Eqn::new(&bank, t_px, bank.true_term, true)]);
        let two = store.fresh(vec![Eqn::new(&bank, t_pa, bank.true_term, false)]);
        let ids = vec![one, two];

        let mut grounding = Grounding::prepare(
            GroundingMode::MostFrequentConstant,
            &mut bank,
            &mut sig,
            &store,
            &ids,
        )
        .unwrap();
        let clauses = grounding.translate(&mut bank, &store, &ids).unwrap();

        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].lits, vec![1, 0]);
        assert_eq!(clauses[1].lits, vec![-1, 0]);
        assert_eq!(clauses[0].parent, one);
        assert_eq!(clauses[1].parent, two);
    }

    #[test]
    fn ground_tautologies_are_dropped() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let y = bank.variable(-2, SORT_INDIVIDUAL);
        let _constant_pool = bank.insert(a, vec![]).unwrap();
        let t_px = bank.insert(p, vec![x]).unwrap();
        let t_py = bank.insert(p, vec![y]).unwrap();

        // p(X) | ~p(Y) is no tautology, though its grounding is.
        let id = store.fresh(vec![
            Eqn::new(&bank, t_px, bank.true_term, true),
            Eqn::new(&bank, t_py, bank.true_term, false),
        ]);
        let ids = vec![id];

        let mut grounding = Grounding::prepare(
            GroundingMode::MostFrequentConstant,
            &mut bank,
            &mut sig,
            &store,
            &ids,
        )
        .unwrap();
        let clauses = grounding.translate(&mut bank, &store, &ids).unwrap();
        assert!(clauses.is_empty());
    }
}
