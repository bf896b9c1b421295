/*!
Ordered paramodulation.

Given a *from* clause with a positive equational literal `l = r` and an *into* clause with a literal holding a non-variable subterm `t`, a paramodulant replaces `t` by `rσ` under the most general unifier σ of `l` and `t` --- subject to the ordering side conditions which make superposition complete:

- `rσ` must not be greater than `lσ` (the equation is used left to right on its instance),
- the from-literal must be strictly maximal in the instantiated from-clause, and the from-clause must have no selected literals,
- the into-literal must be eligible: selected, or (strictly, when positive) maximal in the instantiated into-clause,
- for an unoriented into-literal, the overlapped side must not be smaller than its partner under σ.

The three construction variants --- plain, simultaneous, super-simultaneous --- share the side conditions and differ only in how many occurrences of the overlapped subterm are replaced.

Premises are made variable-disjoint by copying the from-clause with fresh variables; each overlap attempt backtracks the shared substitution, so one copy serves the whole premise pair.
*/

use crate::{
    config::ParamodVariant,
    db::{ClauseId, ClauseStore},
    derivation::DerivationStep,
    misc::log::targets::{self},
    ordering::Ocb,
    structures::{
        eqn::{maximal_under, Eqn},
        subst::{unify, Deref, Subst},
        term::{TermBank, TermId},
    },
    types::err::{self},
};

/// A generated clause body together with its derivation step.
pub struct Generated {
    /// The literals of the conclusion.
    pub literals: Vec<Eqn>,

    /// The derivation step recording the inference.
    pub step: DerivationStep,
}

/// Computes every paramodulant from `from_id` into `into_id`, appending conclusions to `results`.
pub fn paramodulants(
    ocb: &Ocb,
    bank: &mut TermBank,
    store: &ClauseStore,
    variant: ParamodVariant,
    from_id: ClauseId,
    into_id: ClauseId,
    results: &mut Vec<Generated>,
) -> Result<(), err::TermBankError> {
    let from_clause = store.get(from_id);
    if from_clause.has_selection() || from_clause.pos_count == 0 {
        return Ok(());
    }

    let from_lits = from_clause.disjoint_literals(bank)?;
    let into_lits = store.get(into_id).literals.clone();
    let into_selected = into_lits.iter().any(|lit| lit.is_selected());

    for f_index in 0..from_lits.len() {
        let f_lit = from_lits[f_index].clone();
        if !f_lit.is_positive() || !f_lit.is_maximal() {
            continue;
        }

        let f_sides: Vec<(TermId, TermId)> = if f_lit.is_oriented() {
            vec![(f_lit.lhs, f_lit.rhs)]
        } else {
            vec![(f_lit.lhs, f_lit.rhs), (f_lit.rhs, f_lit.lhs)]
        };

        for (f_side, f_other) in f_sides {
            if bank.term(f_side).is_var() {
                continue;
            }

            for i_index in 0..into_lits.len() {
                let i_lit = into_lits[i_index].clone();
                let eligible = if into_selected {
                    i_lit.is_selected()
                } else {
                    i_lit.is_maximal()
                };
                if !eligible {
                    continue;
                }

                let i_sides: Vec<bool> = if i_lit.is_oriented() {
                    vec![true]
                } else {
                    vec![true, false]
                };

                for on_lhs in i_sides {
                    let i_side = if on_lhs { i_lit.lhs } else { i_lit.rhs };
                    let i_other = if on_lhs { i_lit.rhs } else { i_lit.lhs };

                    for (path, subterm) in bank.positions_of(i_side) {
                        if bank.term(subterm).is_var() {
                            continue;
                        }
                        if !fingerprints_unify(bank, f_side, subterm) {
                            continue;
                        }

                        let mut subst = Subst::new();
                        if !unify(bank, &mut subst, f_side, subterm) {
                            continue;
                        }

                        if !overlap_admissible(
                            ocb, bank, &subst, &from_lits, f_index, f_side, f_other, &into_lits,
                            i_index, i_side, i_other, into_selected,
                        ) {
                            continue;
                        }

                        let literals = construct(
                            variant, bank, &subst, &from_lits, f_index, f_other, &into_lits,
                            i_index, on_lhs, &path, subterm,
                        )?;

                        log::trace!(target: targets::PARAMOD, "Overlap of {from_id} into {into_id} at literal {i_index}");
                        let step = match variant {
                            ParamodVariant::Plain => DerivationStep::Paramod {
                                from: from_id,
                                into: into_id,
                            },
                            ParamodVariant::Simultaneous | ParamodVariant::SuperSimultaneous => {
                                DerivationStep::SimParamod {
                                    from: from_id,
                                    into: into_id,
                                }
                            }
                        };
                        results.push(Generated { literals, step });
                    }
                }
            }
        }
    }

    Ok(())
}

/// A fingerprint test on a candidate overlap position: the top symbols, and the top
/// symbols one level down, must be pairwise unifiable.
///
/// A cheap filter in front of full unification; the empty substitution is assumed.
fn fingerprints_unify(bank: &TermBank, s: TermId, t: TermId) -> bool {
    let s_node = bank.term(s);
    let t_node = bank.term(t);
    if s_node.is_var() || t_node.is_var() {
        return true;
    }
    if s_node.f_code != t_node.f_code {
        return false;
    }
    s_node
        .args
        .iter()
        .zip(t_node.args.iter())
        .all(|(&s_arg, &t_arg)| {
            let s_arg = bank.term(s_arg);
            let t_arg = bank.term(t_arg);
            s_arg.is_var() || t_arg.is_var() || s_arg.f_code == t_arg.f_code
        })
}

/// The ordering side conditions, checked under the unifier.
#[allow(clippy::too_many_arguments)]
fn overlap_admissible(
    ocb: &Ocb,
    bank: &TermBank,
    subst: &Subst,
    from_lits: &[Eqn],
    f_index: usize,
    f_side: TermId,
    f_other: TermId,
    into_lits: &[Eqn],
    i_index: usize,
    i_side: TermId,
    i_other: TermId,
    into_selected: bool,
) -> bool {
    // The instantiated equation must still run the right way.
    if !from_lits[f_index].is_oriented()
        && ocb.greater(bank, subst, f_other, Deref::Always, f_side, Deref::Always)
    {
        return false;
    }

    // The overlapped side must remain the large side of its literal.
    if !into_lits[i_index].is_oriented()
        && ocb.greater(bank, subst, i_other, Deref::Always, i_side, Deref::Always)
    {
        return false;
    }

    // The from-literal must be strictly maximal in its instantiated clause.
    if !maximal_under(ocb, bank, subst, from_lits, f_index, true) {
        return false;
    }

    // The into-literal keeps its standing: selected literals need nothing further,
    // positive literals must stay strictly maximal, negative ones maximal.
    if !into_selected {
        let strict = into_lits[i_index].is_positive();
        if !maximal_under(ocb, bank, subst, into_lits, i_index, strict) {
            return false;
        }
    }

    true
}

/// Builds the conclusion literals for one admissible overlap.
#[allow(clippy::too_many_arguments)]
fn construct(
    variant: ParamodVariant,
    bank: &mut TermBank,
    subst: &Subst,
    from_lits: &[Eqn],
    f_index: usize,
    f_other: TermId,
    into_lits: &[Eqn],
    i_index: usize,
    on_lhs: bool,
    path: &[u32],
    subterm: TermId,
) -> Result<Vec<Eqn>, err::TermBankError> {
    let mut literals: Vec<Eqn> = Vec::with_capacity(from_lits.len() + into_lits.len() - 1);

    match variant {
        ParamodVariant::Plain => {
            // Replace at the overlap position alone, then instantiate.
            let i_lit = &into_lits[i_index];
            let side = if on_lhs { i_lit.lhs } else { i_lit.rhs };
            let replaced = bank.replace_at(side, path, f_other)?;
            let rewritten = if on_lhs {
                Eqn::new(bank, replaced, i_lit.rhs, i_lit.is_positive())
            } else {
                Eqn::new(bank, i_lit.lhs, replaced, i_lit.is_positive())
            };
            literals.push(rewritten.instantiate(bank, subst)?);

            for (index, lit) in into_lits.iter().enumerate() {
                if index != i_index {
                    literals.push(lit.instantiate(bank, subst)?);
                }
            }
        }

        ParamodVariant::Simultaneous => {
            // Replace every occurrence of the overlapped subterm across the into-clause, then instantiate.
            for lit in into_lits.iter() {
                let lhs = bank.replace_all(lit.lhs, subterm, f_other)?;
                let rhs = bank.replace_all(lit.rhs, subterm, f_other)?;
                let replaced = Eqn::new(bank, lhs, rhs, lit.is_positive());
                literals.push(replaced.instantiate(bank, subst)?);
            }
        }

        ParamodVariant::SuperSimultaneous => {
            // Instantiate first, then replace every occurrence of the instantiated subterm,
            // catching occurrences which appear only through instantiation.
            let subterm_inst = subst.apply(bank, subterm)?;
            let other_inst = subst.apply(bank, f_other)?;
            for lit in into_lits.iter() {
                let inst = lit.instantiate(bank, subst)?;
                let lhs = bank.replace_all(inst.lhs, subterm_inst, other_inst)?;
                let rhs = bank.replace_all(inst.rhs, subterm_inst, other_inst)?;
                literals.push(Eqn::new(bank, lhs, rhs, lit.is_positive()));
            }
        }
    }

    for (index, lit) in from_lits.iter().enumerate() {
        if index != f_index {
            literals.push(lit.instantiate(bank, subst)?);
        }
    }

    Ok(literals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{
        clause::Clause,
        eqn::mark_maximality,
        signature::Signature,
        term::SORT_INDIVIDUAL,
    };

    fn prepared_clause(
        store: &mut ClauseStore,
        ocb: &Ocb,
        bank: &TermBank,
        literals: Vec<Eqn>,
    ) -> ClauseId {
        let id = store.fresh(literals);
        let clause = store.get_mut(id);
        let mut lits = std::mem::take(&mut clause.literals);
        for lit in lits.iter_mut() {
            lit.orient(ocb, bank);
        }
        mark_maximality(ocb, bank, &mut lits);
        store.get_mut(id).literals = lits;
        store.get_mut(id).recount();
        id
    }

    #[test]
    fn unit_equations_overlap_into_atoms() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 1).unwrap();
        let f = sig.insert("f", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        let b = sig.insert("b", 0).unwrap();
        sig.refresh_alpha_ranks();

        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);

        // from: f(X) = a.  into: p(f(b)).
        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_fx = bank.insert(f, vec![x]).unwrap();
        let t_a = bank.insert(a, vec![]).unwrap();
        let from = prepared_clause(
            &mut store,
            &ocb,
            &bank,
            vec![Eqn::new(&bank, t_fx, t_a, true)],
        );

        let t_b = bank.insert(b, vec![]).unwrap();
        let t_fb = bank.insert(f, vec![t_b]).unwrap();
        let t_pfb = bank.insert(p, vec![t_fb]).unwrap();
        let into = prepared_clause(
            &mut store,
            &ocb,
            &bank,
            vec![Eqn::new(&bank, t_pfb, bank.true_term, true)],
        );

        let mut results = Vec::default();
        paramodulants(
            &ocb,
            &mut bank,
            &store,
            ParamodVariant::Plain,
            from,
            into,
            &mut results,
        )
        .unwrap();

        // One overlap: at f(b), giving p(a).
        assert_eq!(results.len(), 1);
        let t_pa = bank.insert(p, vec![t_a]).unwrap();
        assert_eq!(results[0].literals.len(), 1);
        assert_eq!(results[0].literals[0].lhs, t_pa);
        assert!(matches!(
            results[0].step,
            DerivationStep::Paramod { from: f_id, into: i_id } if f_id == from && i_id == into
        ));
    }

    #[test]
    fn simultaneous_construction_rewrites_every_occurrence() {
        let mut sig = Signature::new();
        let q = sig.insert("q", 2).unwrap();
        let f = sig.insert("f", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        let b = sig.insert("b", 0).unwrap();
        sig.refresh_alpha_ranks();

        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);

        // from: f(b) = a.  into: q(f(b), f(b)).
        let t_b = bank.insert(b, vec![]).unwrap();
        let t_fb = bank.insert(f, vec![t_b]).unwrap();
        let t_a = bank.insert(a, vec![]).unwrap();
        let from = prepared_clause(
            &mut store,
            &ocb,
            &bank,
            vec![Eqn::new(&bank, t_fb, t_a, true)],
        );

        let t_q = bank.insert(q, vec![t_fb, t_fb]).unwrap();
        let into = prepared_clause(
            &mut store,
            &ocb,
            &bank,
            vec![Eqn::new(&bank, t_q, bank.true_term, true)],
        );

        let mut plain = Vec::default();
        paramodulants(&ocb, &mut bank, &store, ParamodVariant::Plain, from, into, &mut plain)
            .unwrap();
        // Two positions, each rewritten separately.
        assert_eq!(plain.len(), 2);
        let t_qab = bank.insert(q, vec![t_a, t_fb]).unwrap();
        let t_qba = bank.insert(q, vec![t_fb, t_a]).unwrap();
        let plain_results: Vec<TermId> = plain.iter().map(|g| g.literals[0].lhs).collect();
        assert!(plain_results.contains(&t_qab));
        assert!(plain_results.contains(&t_qba));

        let mut sim = Vec::default();
        paramodulants(
            &ocb,
            &mut bank,
            &store,
            ParamodVariant::Simultaneous,
            from,
            into,
            &mut sim,
        )
        .unwrap();
        // Both occurrences rewritten in each conclusion.
        let t_qaa = bank.insert(q, vec![t_a, t_a]).unwrap();
        assert!(sim.iter().all(|g| g.literals[0].lhs == t_qaa));
    }

    #[test]
    fn selection_blocks_the_from_role() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 1).unwrap();
        let f = sig.insert("f", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        sig.refresh_alpha_ranks();

        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_fx = bank.insert(f, vec![x]).unwrap();
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_px = bank.insert(p, vec![x]).unwrap();

        // from: f(X)=a | ~p(X), with the negative literal selected.
        let eq = Eqn::new(&bank, t_fx, t_a, true);
        let mut neg = Eqn::new(&bank, t_px, bank.true_term, false);
        neg.props |= crate::structures::eqn::EqnProps::SELECTED;
        let from = prepared_clause(&mut store, &ocb, &bank, vec![eq, neg]);

        let t_fa = bank.insert(f, vec![t_a]).unwrap();
        let t_pfa = bank.insert(p, vec![t_fa]).unwrap();
        let into = prepared_clause(
            &mut store,
            &ocb,
            &bank,
            vec![Eqn::new(&bank, t_pfa, bank.true_term, true)],
        );

        let mut results = Vec::default();
        paramodulants(&ocb, &mut bank, &store, ParamodVariant::Plain, from, into, &mut results)
            .unwrap();
        assert!(results.is_empty());
    }
}
