/*!
Equality factoring, equality resolution, and destructive equality resolution.

- *Equality factoring*: from `s = t ∨ u = v ∨ R` with σ unifying `s` and `u`, when `sσ` is maximal and `tσ` is not above `sσ`, infer `(s = t ∨ t ≠ v ∨ R)σ`.
- *Equality resolution*: from `s ≠ t ∨ R` with σ = mgu(s, t), when the literal is eligible, infer `Rσ`.
- *Destructive equality resolution*: a literal `X ≠ t` with `X` not in `t` is resolved by binding `X` to `t`; unlike the generating rule this replaces the clause, and is applied during contraction.
*/

use crate::{
    db::{ClauseId, ClauseStore},
    derivation::DerivationStep,
    ordering::Ocb,
    procedures::paramod::Generated,
    structures::{
        eqn::{maximal_under, Eqn},
        subst::{unify, Deref, Subst},
        term::{TermBank, TermId},
    },
    types::err::{self},
};

/// Computes every equality resolvent of `id`, appending conclusions to `results`.
pub fn equality_resolvents(
    ocb: &Ocb,
    bank: &mut TermBank,
    store: &ClauseStore,
    id: ClauseId,
    results: &mut Vec<Generated>,
) -> Result<(), err::TermBankError> {
    let lits = store.get(id).literals.clone();
    let selected = lits.iter().any(|lit| lit.is_selected());

    for index in 0..lits.len() {
        let lit = &lits[index];
        if !lit.is_negative() {
            continue;
        }
        let eligible = if selected {
            lit.is_selected()
        } else {
            lit.is_maximal()
        };
        if !eligible {
            continue;
        }

        let mut subst = Subst::new();
        if !unify(bank, &mut subst, lit.lhs, lit.rhs) {
            continue;
        }
        if !selected && !maximal_under(ocb, bank, &subst, &lits, index, false) {
            continue;
        }

        let mut literals = Vec::with_capacity(lits.len() - 1);
        for (other, lit) in lits.iter().enumerate() {
            if other != index {
                literals.push(lit.instantiate(bank, &subst)?);
            }
        }

        results.push(Generated {
            literals,
            step: DerivationStep::EqRes(id),
        });
    }

    Ok(())
}

/// Computes every equality factor of `id`, appending conclusions to `results`.
pub fn equality_factors(
    ocb: &Ocb,
    bank: &mut TermBank,
    store: &ClauseStore,
    id: ClauseId,
    results: &mut Vec<Generated>,
) -> Result<(), err::TermBankError> {
    let clause = store.get(id);
    if clause.has_selection() || clause.pos_count < 2 {
        return Ok(());
    }
    let lits = clause.literals.clone();

    for index in 0..lits.len() {
        let lit = &lits[index];
        if !lit.is_positive() || !lit.is_maximal() {
            continue;
        }

        let sides: Vec<(TermId, TermId)> = if lit.is_oriented() {
            vec![(lit.lhs, lit.rhs)]
        } else {
            vec![(lit.lhs, lit.rhs), (lit.rhs, lit.lhs)]
        };

        for partner_index in 0..lits.len() {
            if partner_index == index || !lits[partner_index].is_positive() {
                continue;
            }
            let partner = &lits[partner_index];
            let partner_sides: Vec<(TermId, TermId)> = if partner.is_oriented() {
                vec![(partner.lhs, partner.rhs)]
            } else {
                vec![(partner.lhs, partner.rhs), (partner.rhs, partner.lhs)]
            };

            for &(s, t) in &sides {
                for &(u, v) in &partner_sides {
                    let mut subst = Subst::new();
                    if !unify(bank, &mut subst, s, u) {
                        continue;
                    }
                    // sσ maximal, and tσ not above it.
                    if ocb.greater(bank, &subst, t, Deref::Always, s, Deref::Always) {
                        continue;
                    }
                    if !maximal_under(ocb, bank, &subst, &lits, index, false) {
                        continue;
                    }

                    // (s = t) ∨ (t ≠ v) ∨ rest, the partner literal replaced.
                    let mut literals = Vec::with_capacity(lits.len());
                    let residue = Eqn::new(bank, t, v, false);
                    literals.push(residue.instantiate(bank, &subst)?);
                    for (other, lit) in lits.iter().enumerate() {
                        if other != partner_index {
                            literals.push(lit.instantiate(bank, &subst)?);
                        }
                    }

                    results.push(Generated {
                        literals,
                        step: DerivationStep::EqFactor(id),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Applies destructive equality resolution to `lits`, to fixpoint.
///
/// Returns the number of literals resolved away; nonzero means the clause was replaced by an instance of itself.
pub fn destructive_equality_resolution(
    bank: &mut TermBank,
    lits: &mut Vec<Eqn>,
) -> Result<usize, err::TermBankError> {
    let mut resolved = 0;

    loop {
        let mut target = None;
        for (index, lit) in lits.iter().enumerate() {
            if !lit.is_negative() {
                continue;
            }
            let (var, term) = if bank.term(lit.lhs).is_var() {
                (lit.lhs, lit.rhs)
            } else if bank.term(lit.rhs).is_var() {
                (lit.rhs, lit.lhs)
            } else {
                continue;
            };
            if var == term || bank.contains(term, var) {
                continue;
            }
            target = Some((index, var, term));
            break;
        }

        let Some((index, var, term)) = target else {
            return Ok(resolved);
        };

        let mut subst = Subst::new();
        subst.bind(var, term);
        lits.remove(index);
        for lit in lits.iter_mut() {
            *lit = lit.instantiate(bank, &subst)?;
        }
        resolved += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{clause::Clause, eqn::mark_maximality, signature::Signature, term::SORT_INDIVIDUAL};

    fn prepared(store: &mut ClauseStore, ocb: &Ocb, bank: &TermBank, literals: Vec<Eqn>) -> ClauseId {
        let id = store.fresh(literals);
        let mut lits = std::mem::take(&mut store.get_mut(id).literals);
        for lit in lits.iter_mut() {
            lit.orient(ocb, bank);
        }
        mark_maximality(ocb, bank, &mut lits);
        store.get_mut(id).literals = lits;
        store.get_mut(id).recount();
        id
    }

    #[test]
    fn resolvable_disequations_resolve() {
        let mut sig = Signature::new();
        let f = sig.insert("f", 1).unwrap();
        let p = sig.insert("p", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        sig.refresh_alpha_ranks();

        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);

        // f(X) != f(a) | p(X) resolves to p(a).
        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_fx = bank.insert(f, vec![x]).unwrap();
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_fa = bank.insert(f, vec![t_a]).unwrap();
        let t_px = bank.insert(p, vec![x]).unwrap();

        let id = prepared(
            &mut store,
            &ocb,
            &bank,
            vec![
                Eqn::new(&bank, t_fx, t_fa, false),
                Eqn::new(&bank, t_px, bank.true_term, true),
            ],
        );

        let mut results = Vec::default();
        equality_resolvents(&ocb, &mut bank, &store, id, &mut results).unwrap();

        assert_eq!(results.len(), 1);
        let t_pa = bank.insert(p, vec![t_a]).unwrap();
        assert_eq!(results[0].literals.len(), 1);
        assert_eq!(results[0].literals[0].lhs, t_pa);
    }

    #[test]
    fn factoring_merges_unifiable_equations() {
        let mut sig = Signature::new();
        let f = sig.insert("f", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        let b = sig.insert("b", 0).unwrap();
        sig.refresh_alpha_ranks();

        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);

        // f(X) = a | f(b) = X factors with σ = {X → b}.
        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_fx = bank.insert(f, vec![x]).unwrap();
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_b = bank.insert(b, vec![]).unwrap();
        let t_fb = bank.insert(f, vec![t_b]).unwrap();

        let id = prepared(
            &mut store,
            &ocb,
            &bank,
            vec![
                Eqn::new(&bank, t_fx, t_a, true),
                Eqn::new(&bank, t_fb, x, true),
            ],
        );

        let mut results = Vec::default();
        equality_factors(&ocb, &mut bank, &store, id, &mut results).unwrap();

        assert!(!results.is_empty());
        // Every factor holds a fresh negative residue literal.
        for generated in &results {
            assert!(generated.literals.iter().any(|l| l.is_negative()));
            assert!(matches!(generated.step, DerivationStep::EqFactor(parent) if parent == id));
        }
    }

    #[test]
    fn destructive_resolution_binds_free_variables() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        sig.refresh_alpha_ranks();

        let mut bank = TermBank::new(&sig);

        // X != a | p(X) becomes p(a).
        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_px = bank.insert(p, vec![x]).unwrap();

        let mut lits = vec![
            Eqn::new(&bank, x, t_a, false),
            Eqn::new(&bank, t_px, bank.true_term, true),
        ];
        let resolved = destructive_equality_resolution(&mut bank, &mut lits).unwrap();

        assert_eq!(resolved, 1);
        let t_pa = bank.insert(p, vec![t_a]).unwrap();
        assert_eq!(lits.len(), 1);
        assert_eq!(lits[0].lhs, t_pa);

        // An occurs-check violation stays put.
        let t_pfx = {
            let f = sig.insert("f", 1).unwrap();
            let t_fx = bank.insert(f, vec![x]).unwrap();
            bank.insert(p, vec![t_fx]).unwrap()
        };
        let t_fx = bank.term(t_pfx).args[0];
        let mut lits = vec![Eqn::new(&bank, x, t_fx, false)];
        assert_eq!(destructive_equality_resolution(&mut bank, &mut lits).unwrap(), 0);
        assert_eq!(lits.len(), 1);
    }
}
