/*!
The equational tautology test, by ground completion.

A clause `N₁ ∨ … ∨ Nₖ ∨ P₁ ∨ … ∨ Pₘ` (negatives first) is a tautology iff the positive part is entailed by the negated negative part, i.e. iff some `Pᵢ` holds in every model of the equations `{N₁, …, Nₖ}` read positively.
Treating the variables as constants, the equations form a ground system: complete it (orienting by a simple size-lexicographic comparison, which is total on pseudo-ground terms), then reduce each positive literal to normal form.
A positive literal reducing to `l = l` proves the clause tautological.

The test is capped at a configurable count of negative literals; beyond the cap the cheap syntactic check is the fallback.
Failure to show tautology is absorbed silently --- the test is a filter, never a verdict of freshness.
*/

use crate::{
    ordering::{ground_compare, CompareResult},
    structures::{clause::Clause, term::{TermBank, TermId}},
    types::err::{self},
};

/// A ground rewrite rule, oriented max side first.
type GroundRule = (TermId, TermId);

/// True if `clause` is certainly a tautology; false if this cannot be shown at the accepted expense.
pub fn is_tautology(
    bank: &mut TermBank,
    clause: &Clause,
    max_neg: usize,
) -> Result<bool, err::TermBankError> {
    if clause.is_trivial_tautology() {
        return Ok(true);
    }
    if clause.pos_count == 0 || clause.neg_count == 0 {
        return Ok(false);
    }
    if clause.neg_count as usize > max_neg {
        // Emergency exit for large clauses.
        return Ok(false);
    }

    // The negative literals, read positively, as a rewrite system to complete.
    let mut unprocessed: Vec<GroundRule> = clause
        .literals
        .iter()
        .filter(|lit| lit.is_negative())
        .map(|lit| (lit.lhs, lit.rhs))
        .collect();
    let mut system: Vec<GroundRule> = Vec::default();

    while let Some((lhs, rhs)) = unprocessed.pop() {
        let lhs = ground_normal_form(bank, lhs, &system)?;
        let rhs = ground_normal_form(bank, rhs, &system)?;
        if lhs == rhs {
            continue;
        }
        let rule = orient_ground(bank, lhs, rhs);

        // Rules the fresh rule reaches go back for renormalization.
        let single = vec![rule];
        let mut index = 0;
        while index < system.len() {
            let (l, r) = system[index];
            let l_nf = ground_normal_form(bank, l, &single)?;
            let r_nf = ground_normal_form(bank, r, &single)?;
            if l_nf != l || r_nf != r {
                unprocessed.push(system.swap_remove(index));
            } else {
                index += 1;
            }
        }

        system.push(rule);
    }

    // Reduce each positive literal; reflexivity proves the clause tautological.
    for lit in clause.literals.iter().filter(|lit| lit.is_positive()) {
        let lhs = ground_normal_form(bank, lit.lhs, &system)?;
        let rhs = ground_normal_form(bank, lit.rhs, &system)?;
        if lhs == rhs {
            return Ok(true);
        }
    }

    Ok(false)
}

fn orient_ground(bank: &TermBank, lhs: TermId, rhs: TermId) -> GroundRule {
    match ground_compare(bank, lhs, rhs) {
        CompareResult::Lesser => (rhs, lhs),
        _ => (lhs, rhs),
    }
}

/// The normal form of `term` under a system of pseudo-ground rules, innermost first.
fn ground_normal_form(
    bank: &mut TermBank,
    term: TermId,
    system: &[GroundRule],
) -> Result<TermId, err::TermBankError> {
    let mut current = term;
    'outer: loop {
        let node = bank.term(current);
        if !node.is_var() && !node.args.is_empty() {
            let f_code = node.f_code;
            let args = node.args.clone();
            let mut new_args = Vec::with_capacity(args.len());
            for arg in args {
                new_args.push(ground_normal_form(bank, arg, system)?);
            }
            current = bank.insert(f_code, new_args)?;
        }

        for &(lhs, rhs) in system {
            if lhs == current {
                current = rhs;
                continue 'outer;
            }
        }
        return Ok(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{eqn::Eqn, signature::Signature};

    #[test]
    fn chained_equalities_are_tautological() {
        let mut sig = Signature::new();
        let a = sig.insert("a", 0).unwrap();
        let b = sig.insert("b", 0).unwrap();
        let c = sig.insert("c", 0).unwrap();
        let mut bank = TermBank::new(&sig);

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_b = bank.insert(b, vec![]).unwrap();
        let t_c = bank.insert(c, vec![]).unwrap();

        // a=c | a!=b | b!=c: the negatives complete to {b→a, c→a} and the
        // positive literal reduces to reflexivity.
        let clause = Clause::new(
            0,
            vec![
                Eqn::new(&bank, t_a, t_c, true),
                Eqn::new(&bank, t_a, t_b, false),
                Eqn::new(&bank, t_b, t_c, false),
            ],
        );
        assert!(!clause.is_trivial_tautology());
        assert!(is_tautology(&mut bank, &clause, 8).unwrap());
    }

    #[test]
    fn satisfiable_clauses_pass() {
        let mut sig = Signature::new();
        let a = sig.insert("a", 0).unwrap();
        let b = sig.insert("b", 0).unwrap();
        let c = sig.insert("c", 0).unwrap();
        let mut bank = TermBank::new(&sig);

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_b = bank.insert(b, vec![]).unwrap();
        let t_c = bank.insert(c, vec![]).unwrap();

        // a=b | a!=c is no tautology.
        let clause = Clause::new(
            0,
            vec![
                Eqn::new(&bank, t_a, t_b, true),
                Eqn::new(&bank, t_a, t_c, false),
            ],
        );
        assert!(!is_tautology(&mut bank, &clause, 8).unwrap());
    }

    #[test]
    fn the_cap_falls_back_to_the_cheap_check() {
        let mut sig = Signature::new();
        let a = sig.insert("a", 0).unwrap();
        let b = sig.insert("b", 0).unwrap();
        let c = sig.insert("c", 0).unwrap();
        let mut bank = TermBank::new(&sig);

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_b = bank.insert(b, vec![]).unwrap();
        let t_c = bank.insert(c, vec![]).unwrap();

        let clause = Clause::new(
            0,
            vec![
                Eqn::new(&bank, t_a, t_c, true),
                Eqn::new(&bank, t_a, t_b, false),
                Eqn::new(&bank, t_b, t_c, false),
            ],
        );
        // With the cap below the negative count the expensive test is skipped.
        assert!(!is_tautology(&mut bank, &clause, 0).unwrap());
    }
}
