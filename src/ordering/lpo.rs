/*!
The lexicographic path ordering, by the LPO₄ scheme.

`s = f(s₁,…,sₘ) >LPO g(t₁,…,tₙ) = t` iff

- `f > g` and `s >LPO tⱼ` for every `j` (the *majo* case), or
- `f = g`, the argument tuples compare lexicographically greater, and `s >LPO tⱼ` for every remaining `j` (the *lex_ma* case), or
- some `sᵢ ≥LPO t` (the *alpha* case).

Variables: `s >LPO x` iff `x` occurs in `s` and `s ≠ x`; a variable is never greater than anything else.

The mutual recursion is bounded by the control block's recursion limit.
A bounded-out comparison reports *not greater* --- together with the symmetric call this surfaces as [Uncomparable](super::CompareResult::Uncomparable), which is sound though may lose completeness for the call.
*/

use crate::{
    ordering::{struct_equal, CompareResult, Ocb},
    structures::{
        subst::{Deref, Subst},
        term::{TermBank, TermId},
    },
};

/// True if `s` is strictly greater than `t`.
#[allow(clippy::too_many_arguments)]
pub(super) fn lpo_greater(
    ocb: &Ocb,
    bank: &TermBank,
    subst: &Subst,
    s: TermId,
    deref_s: Deref,
    t: TermId,
    deref_t: Deref,
    depth: usize,
) -> bool {
    if depth > ocb.recursion_limit() {
        ocb.note_depth_overflow();
        return false;
    }

    let (s, deref_s) = subst.deref(bank, s, deref_s);
    let (t, deref_t) = subst.deref(bank, t, deref_t);

    let s_node = bank.term(s);
    if s_node.is_var() {
        return false;
    }

    if bank.term(t).is_var() {
        return occurs_deref(bank, subst, t, s, deref_s);
    }

    match ocb.fun_compare(s_node.f_code, bank.term(t).f_code) {
        CompareResult::Greater => majo(ocb, bank, subst, s, deref_s, t, deref_t, 0, depth),
        CompareResult::Equal => lex_ma(ocb, bank, subst, s, deref_s, t, deref_t, 0, depth),
        _ => alpha(ocb, bank, subst, s, deref_s, 0, t, deref_t, depth),
    }
}

/// The alpha case: some argument `sᵢ` of `s`, from `pos` on, satisfies `sᵢ ≥ t`.
#[allow(clippy::too_many_arguments)]
fn alpha(
    ocb: &Ocb,
    bank: &TermBank,
    subst: &Subst,
    s: TermId,
    deref_s: Deref,
    pos: usize,
    t: TermId,
    deref_t: Deref,
    depth: usize,
) -> bool {
    let args = &bank.term(s).args;
    args[pos..].iter().any(|&arg| {
        struct_equal(bank, subst, arg, deref_s, t, deref_t)
            || lpo_greater(ocb, bank, subst, arg, deref_s, t, deref_t, depth + 1)
    })
}

/// The majorisation case: `s > tᵢ` for every argument of `t` from `pos` on.
#[allow(clippy::too_many_arguments)]
fn majo(
    ocb: &Ocb,
    bank: &TermBank,
    subst: &Subst,
    s: TermId,
    deref_s: Deref,
    t: TermId,
    deref_t: Deref,
    pos: usize,
    depth: usize,
) -> bool {
    let args = &bank.term(t).args;
    args[pos..]
        .iter()
        .all(|&arg| lpo_greater(ocb, bank, subst, s, deref_s, arg, deref_t, depth + 1))
}

/// The combined lexicographic and alpha case for equal top symbols.
#[allow(clippy::too_many_arguments)]
fn lex_ma(
    ocb: &Ocb,
    bank: &TermBank,
    subst: &Subst,
    s: TermId,
    deref_s: Deref,
    t: TermId,
    deref_t: Deref,
    pos: usize,
    depth: usize,
) -> bool {
    let s_arity = bank.term(s).args.len();

    for index in pos..s_arity {
        let s_arg = bank.term(s).args[index];
        let t_arg = bank.term(t).args[index];

        if struct_equal(bank, subst, s_arg, deref_s, t_arg, deref_t) {
            continue;
        }
        if lpo_greater(ocb, bank, subst, s_arg, deref_s, t_arg, deref_t, depth + 1) {
            return majo(ocb, bank, subst, s, deref_s, t, deref_t, index + 1, depth);
        }
        return alpha(ocb, bank, subst, s, deref_s, index + 1, t, deref_t, depth);
    }

    false
}

/// True if the variable `var` occurs in `term` under the substitution.
fn occurs_deref(bank: &TermBank, subst: &Subst, var: TermId, term: TermId, deref: Deref) -> bool {
    let (term, deref) = subst.deref(bank, term, deref);
    if term == var {
        return true;
    }
    bank.term(term)
        .args
        .iter()
        .any(|&arg| occurs_deref(bank, subst, var, arg, deref))
}

#[cfg(test)]
mod tests {
    use crate::{
        ordering::{CompareResult, Ocb},
        structures::{
            signature::Signature,
            subst::{Deref, Subst},
            term::{TermBank, SORT_INDIVIDUAL},
        },
    };

    struct Fixture {
        bank: TermBank,
        ocb: Ocb,
        f: i64,
        g: i64,
        a: i64,
        e: i64,
    }

    fn setup() -> Fixture {
        let mut sig = Signature::new();
        let f = sig.insert("mult", 2).unwrap();
        let g = sig.insert("inv", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        let e = sig.insert("e", 0).unwrap();
        sig.refresh_alpha_ranks();

        let bank = TermBank::new(&sig);
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);
        Fixture { bank, ocb, f, g, a, e }
    }

    #[test]
    fn subterms_are_smaller() {
        let Fixture { mut bank, ocb, f, g, a, .. } = setup();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_ia = bank.insert(g, vec![t_a]).unwrap();
        let t = bank.insert(f, vec![t_ia, t_a]).unwrap();
        let subst = Subst::new();

        for sub in [t_a, t_ia] {
            assert!(ocb.greater(&bank, &subst, t, Deref::Never, sub, Deref::Never));
            assert!(!ocb.greater(&bank, &subst, sub, Deref::Never, t, Deref::Never));
        }
    }

    #[test]
    fn variables_compare_by_occurrence() {
        let Fixture { mut bank, ocb, f, a, .. } = setup();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let y = bank.variable(-2, SORT_INDIVIDUAL);
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_fxa = bank.insert(f, vec![x, t_a]).unwrap();
        let subst = Subst::new();

        assert!(ocb.greater(&bank, &subst, t_fxa, Deref::Never, x, Deref::Never));
        assert!(!ocb.greater(&bank, &subst, t_fxa, Deref::Never, y, Deref::Never));
        assert!(!ocb.greater(&bank, &subst, x, Deref::Never, t_fxa, Deref::Never));
        assert_eq!(
            ocb.compare(&bank, &subst, t_fxa, Deref::Never, y, Deref::Never),
            CompareResult::Uncomparable
        );
    }

    #[test]
    fn group_axiom_orientations() {
        let Fixture { mut bank, ocb, f, g, e, .. } = setup();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_e = bank.insert(e, vec![]).unwrap();
        let subst = Subst::new();

        // mult(e, x) > x
        let lhs = bank.insert(f, vec![t_e, x]).unwrap();
        assert!(ocb.greater(&bank, &subst, lhs, Deref::Never, x, Deref::Never));

        // mult(inv(x), x) > e
        let t_ix = bank.insert(g, vec![x]).unwrap();
        let lhs = bank.insert(f, vec![t_ix, x]).unwrap();
        assert!(ocb.greater(&bank, &subst, lhs, Deref::Never, t_e, Deref::Never));
    }

    #[test]
    fn comparison_under_substitution() {
        let Fixture { mut bank, ocb, g, a, .. } = setup();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_ga = bank.insert(g, vec![t_a]).unwrap();
        let t_gx = bank.insert(g, vec![x]).unwrap();

        let mut subst = Subst::new();
        subst.bind(x, t_ga);

        // g(x) with x ↦ g(a) is g(g(a)) > g(a).
        assert!(ocb.greater(&bank, &subst, t_gx, Deref::Always, t_ga, Deref::Never));
        assert_eq!(
            ocb.compare(&bank, &subst, t_gx, Deref::Always, t_ga, Deref::Always),
            CompareResult::Greater
        );
        // Without dereferencing the variable blocks the comparison.
        assert_eq!(
            ocb.compare(&bank, &subst, t_gx, Deref::Never, t_ga, Deref::Never),
            CompareResult::Uncomparable
        );
    }

    #[test]
    fn stability_under_substitution_sample() {
        let Fixture { mut bank, ocb, f, g, a, .. } = setup();

        // mult(inv(x), x) > inv(x); instantiate x ↦ inv(a) and recheck.
        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_ix = bank.insert(g, vec![x]).unwrap();
        let lhs = bank.insert(f, vec![t_ix, x]).unwrap();
        let subst = Subst::new();
        assert!(ocb.greater(&bank, &subst, lhs, Deref::Never, t_ix, Deref::Never));

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_ia = bank.insert(g, vec![t_a]).unwrap();
        let mut subst = Subst::new();
        subst.bind(x, t_ia);
        assert!(ocb.greater(&bank, &subst, lhs, Deref::Always, t_ix, Deref::Always));
    }
}
