/*!
Subsumption --- the redundancy of instances.

Clause `C` subsumes clause `D` when some substitution σ maps the literals of `C` injectively onto literals of `D` (multiset matching: two literals of `C` may not share a target).
A subsumed clause carries no information its subsumer lacks, and is deleted.

Candidate pairs come from the [feature vector index](crate::db::fv_index); the check here completes the job with backtracking literal matching.
Unit clauses get dedicated entry points, used both for unit subsumption and for the simplify-reflect literal cuts.
*/

use crate::{
    structures::{
        clause::Clause,
        eqn::Eqn,
        subst::{matches, Subst},
        term::TermBank,
    },
};

/// True if `subsumer` subsumes `subsumed`.
pub fn subsumes(bank: &TermBank, subsumer: &Clause, subsumed: &Clause) -> bool {
    if subsumer.len() > subsumed.len()
        || subsumer.pos_count > subsumed.pos_count
        || subsumer.neg_count > subsumed.neg_count
    {
        return false;
    }

    let mut subst = Subst::new();
    let mut used = vec![false; subsumed.literals.len()];
    subsume_from(bank, &mut subst, &subsumer.literals, 0, &subsumed.literals, &mut used)
}

fn subsume_from(
    bank: &TermBank,
    subst: &mut Subst,
    subsumer: &[Eqn],
    index: usize,
    subsumed: &[Eqn],
    used: &mut [bool],
) -> bool {
    let Some(literal) = subsumer.get(index) else {
        return true;
    };

    for (target_index, target) in subsumed.iter().enumerate() {
        if used[target_index] || literal.is_positive() != target.is_positive() {
            continue;
        }

        // Both orientations of an equation are alternatives in the search.
        for flipped in [false, true] {
            if flipped && !(literal.is_equational() && target.is_equational()) {
                continue;
            }
            let mark = subst.mark();
            if literal_match(bank, subst, literal, target, flipped) {
                used[target_index] = true;
                if subsume_from(bank, subst, subsumer, index + 1, subsumed, used) {
                    return true;
                }
                used[target_index] = false;
            }
            subst.backtrack_to(mark);
        }
    }

    false
}

/// Attempts to match the sides of `literal` onto `target`, exchanged when `flipped`.
/// Bindings survive on success; the caller is responsible for backtracking.
fn literal_match(
    bank: &TermBank,
    subst: &mut Subst,
    literal: &Eqn,
    target: &Eqn,
    flipped: bool,
) -> bool {
    let (first, second) = if flipped {
        (target.rhs, target.lhs)
    } else {
        (target.lhs, target.rhs)
    };
    matches(bank, subst, literal.lhs, first) && matches(bank, subst, literal.rhs, second)
}

/// True if the unit literal `unit` has an instance with the same atom as `literal`, signs disregarded.
pub fn unit_matches_atom(bank: &TermBank, unit: &Eqn, literal: &Eqn) -> bool {
    let mut subst = Subst::new();

    let mark = subst.mark();
    if literal_match(bank, &mut subst, unit, literal, false) {
        return true;
    }
    subst.backtrack_to(mark);

    unit.is_equational()
        && literal.is_equational()
        && literal_match(bank, &mut subst, unit, literal, true)
}

/// True if the unit clause holding `unit` subsumes a clause containing `literal`: same sign, atom an instance.
pub fn unit_subsumes_literal(bank: &TermBank, unit: &Eqn, literal: &Eqn) -> bool {
    unit.is_positive() == literal.is_positive() && unit_matches_atom(bank, unit, literal)
}

/// True if the unit literal `unit` cuts `literal`: opposite signs, atom an instance.
///
/// A cut literal is false in every model of the unit, and is removed by simplify-reflect.
pub fn unit_cuts_literal(bank: &TermBank, unit: &Eqn, literal: &Eqn) -> bool {
    unit.is_positive() != literal.is_positive() && unit_matches_atom(bank, unit, literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{signature::Signature, term::SORT_INDIVIDUAL};

    struct Fixture {
        bank: TermBank,
        p: i64,
        q: i64,
        a: i64,
        b: i64,
    }

    fn setup() -> Fixture {
        let mut sig = Signature::new();
        let p = sig.insert("p", 1).unwrap();
        let q = sig.insert("q", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        let b = sig.insert("b", 0).unwrap();
        let bank = TermBank::new(&sig);
        Fixture { bank, p, q, a, b }
    }

    #[test]
    fn instances_are_subsumed() {
        let Fixture { mut bank, p, q, a, .. } = setup();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_px = bank.insert(p, vec![x]).unwrap();
        let t_pa = bank.insert(p, vec![t_a]).unwrap();
        let t_qa = bank.insert(q, vec![t_a]).unwrap();

        // p(X) subsumes p(a) | q(a).
        let general = Clause::new(0, vec![Eqn::new(&bank, t_px, bank.true_term, true)]);
        let instance = Clause::new(
            1,
            vec![
                Eqn::new(&bank, t_pa, bank.true_term, true),
                Eqn::new(&bank, t_qa, bank.true_term, true),
            ],
        );

        assert!(subsumes(&bank, &general, &instance));
        assert!(!subsumes(&bank, &instance, &general));
    }

    #[test]
    fn multiset_matching_is_injective() {
        let Fixture { mut bank, p, a, b, .. } = setup();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let y = bank.variable(-2, SORT_INDIVIDUAL);
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_b = bank.insert(b, vec![]).unwrap();
        let t_px = bank.insert(p, vec![x]).unwrap();
        let t_py = bank.insert(p, vec![y]).unwrap();
        let t_pa = bank.insert(p, vec![t_a]).unwrap();
        let t_pb = bank.insert(p, vec![t_b]).unwrap();

        // p(X) | p(Y) maps onto p(a) | p(b), but not onto the unit p(a):
        // the two literals may not share a target.
        let doubled = Clause::new(
            0,
            vec![
                Eqn::new(&bank, t_px, bank.true_term, true),
                Eqn::new(&bank, t_py, bank.true_term, true),
            ],
        );
        let two = Clause::new(
            1,
            vec![
                Eqn::new(&bank, t_pa, bank.true_term, true),
                Eqn::new(&bank, t_pb, bank.true_term, true),
            ],
        );
        let one = Clause::new(2, vec![Eqn::new(&bank, t_pa, bank.true_term, true)]);

        assert!(subsumes(&bank, &doubled, &two));
        assert!(!subsumes(&bank, &doubled, &one));
    }

    #[test]
    fn equations_match_up_to_symmetry() {
        let Fixture { mut bank, a, b, .. } = setup();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_b = bank.insert(b, vec![]).unwrap();

        let ab = Clause::new(0, vec![Eqn::new(&bank, t_a, t_b, true)]);
        let ba = Clause::new(1, vec![Eqn::new(&bank, t_b, t_a, true)]);

        assert!(subsumes(&bank, &ab, &ba));
        assert!(subsumes(&bank, &ba, &ab));
    }

    #[test]
    fn unit_cuts_recognise_opposite_instances() {
        let Fixture { mut bank, p, a, .. } = setup();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_px = bank.insert(p, vec![x]).unwrap();
        let t_pa = bank.insert(p, vec![t_a]).unwrap();

        let unit = Eqn::new(&bank, t_px, bank.true_term, true);
        let neg_instance = Eqn::new(&bank, t_pa, bank.true_term, false);
        let pos_instance = Eqn::new(&bank, t_pa, bank.true_term, true);

        assert!(unit_cuts_literal(&bank, &unit, &neg_instance));
        assert!(!unit_cuts_literal(&bank, &unit, &pos_instance));
        assert!(unit_subsumes_literal(&bank, &unit, &pos_instance));
    }
}
