/*!
Clause splitting.

A clause whose literals fall into variable-disjoint components carries independent subproblems.
Under the components policy such a clause is replaced by a chain of smaller clauses linked through fresh propositional split predicates:

```none
C₁ ∨ C₂ ∨ … ∨ Cₖ   ⟹   C₁ ∨ sp₁,  ¬sp₁ ∨ C₂ ∨ sp₂,  …,  ¬spₖ₋₁ ∨ Cₖ
```

The chain is satisfiability-equivalent to the original, and each piece records its origin through a split derivation step, so proofs citing pieces resolve back to the parent.
Ground literals are variable-disjoint from everything; they gather into components of their own.
*/

use crate::{
    db::{ClauseId, ClauseStore},
    derivation::DerivationStep,
    misc::log::targets::{self},
    procedures::paramod::Generated,
    structures::{eqn::Eqn, signature::Signature, term::{TermBank, TermId}},
    types::err::{self},
};

/// Splits the literals of `id` into variable-disjoint components, if there are at least two.
///
/// Conclusions land in `results`; the caller retires the parent clause.
pub fn split_components(
    bank: &mut TermBank,
    sig: &mut Signature,
    store: &ClauseStore,
    id: ClauseId,
    results: &mut Vec<Generated>,
) -> Result<bool, err::TermBankError> {
    let lits = &store.get(id).literals;
    if lits.len() < 2 {
        return Ok(false);
    }

    let components = variable_components(bank, lits);
    let distinct = {
        let mut seen: Vec<usize> = components.clone();
        seen.sort_unstable();
        seen.dedup();
        seen
    };
    if distinct.len() < 2 {
        return Ok(false);
    }

    log::debug!(target: targets::SPLITTING, "Splitting {id} into {} components", distinct.len());

    let mut carried: Option<TermId> = None;
    for (piece, &component) in distinct.iter().enumerate() {
        let mut literals: Vec<Eqn> = Vec::default();

        // ¬spᵢ₋₁ links back to the previous piece.
        if let Some(previous) = carried {
            literals.push(Eqn::new(bank, previous, bank.true_term, false));
        }

        for (index, lit) in lits.iter().enumerate() {
            if components[index] == component {
                literals.push(lit.clone());
            }
        }

        // spᵢ links forward, except from the last piece.
        if piece + 1 < distinct.len() {
            let code = sig.fresh_split_predicate();
            let atom = bank.insert(code, vec![])?;
            literals.push(Eqn::new(bank, atom, bank.true_term, true));
            carried = Some(atom);
        }

        results.push(Generated {
            literals,
            step: DerivationStep::SplitEquiv(id),
        });
    }

    Ok(true)
}

/// Assigns each literal a component representative under shared-variable reachability.
fn variable_components(bank: &TermBank, lits: &[Eqn]) -> Vec<usize> {
    let mut component: Vec<usize> = (0..lits.len()).collect();
    let variables: Vec<Vec<TermId>> = lits
        .iter()
        .map(|lit| {
            let mut vars = Vec::default();
            bank.variables_of(lit.lhs, &mut vars);
            bank.variables_of(lit.rhs, &mut vars);
            vars
        })
        .collect();

    // Fixpoint union: small literal counts make anything cleverer pointless.
    loop {
        let mut changed = false;
        for a in 0..lits.len() {
            for b in (a + 1)..lits.len() {
                if component[a] == component[b] {
                    continue;
                }
                if variables[a].iter().any(|var| variables[b].contains(var)) {
                    let merged = component[a].min(component[b]);
                    let (from_a, from_b) = (component[a], component[b]);
                    for entry in component.iter_mut() {
                        if *entry == from_a || *entry == from_b {
                            *entry = merged;
                        }
                    }
                    changed = true;
                }
            }
        }
        if !changed {
            return component;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::term::SORT_INDIVIDUAL;

    #[test]
    fn disjoint_components_split_with_linking_predicates() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 1).unwrap();
        let q = sig.insert("q", 1).unwrap();
        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();

        // p(X) | q(Y): two components.
        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let y = bank.variable(-2, SORT_INDIVIDUAL);
        let t_px = bank.insert(p, vec![x]).unwrap();
        let t_qy = bank.insert(q, vec![y]).unwrap();

        let id = store.fresh(vec![
            Eqn::new(&bank, t_px, bank.true_term, true),
            Eqn::new(&bank, t_qy, bank.true_term, true),
        ]);

        let mut results = Vec::default();
        assert!(split_components(&mut bank, &mut sig, &store, id, &mut results).unwrap());

        assert_eq!(results.len(), 2);
        // First piece: p(X) | sp.  Second piece: ~sp | q(Y).
        assert_eq!(results[0].literals.len(), 2);
        assert_eq!(results[1].literals.len(), 2);
        assert!(results[0].literals[1].is_positive());
        assert!(results[1].literals[0].is_negative());
        assert_eq!(results[0].literals[1].lhs, results[1].literals[0].lhs);
    }

    #[test]
    fn shared_variables_block_the_split() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 1).unwrap();
        let q = sig.insert("q", 1).unwrap();
        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_px = bank.insert(p, vec![x]).unwrap();
        let t_qx = bank.insert(q, vec![x]).unwrap();

        let id = store.fresh(vec![
            Eqn::new(&bank, t_px, bank.true_term, true),
            Eqn::new(&bank, t_qx, bank.true_term, true),
        ]);

        let mut results = Vec::default();
        assert!(!split_components(&mut bank, &mut sig, &store, id, &mut results).unwrap());
        assert!(results.is_empty());
    }
}
