/*!
Rewriting --- demodulation of terms and literals.

Demodulators are the positive unit equations of the processed sets: oriented equations (rules) always rewrite left to right, unorientable equations rewrite whichever way the instantiated sides compare.
Either way every step replaces a term by a strictly smaller one, so normalization terminates.

Work is avoided twice over:

- *Normal-form dates.* A term whose normal-form date at the requested level is no older than the demodulator set needs no examination; normalizing stamps the result with the current date.
- *Replacement pointers.* A term the bank has already seen rewritten is chased to its replacement before anything else.
*/

use crate::{
    db::{ClauseId, ClauseSet, ClauseStore},
    misc::log::targets::{self},
    ordering::Ocb,
    structures::{
        eqn::Eqn,
        subst::{matches, Deref, Subst},
        term::{Date, RewriteLevel, TermBank, TermId},
    },
    types::err::{self},
};

use crate::structures::term::RewriteTarget;

/// Normalizes `term` under the demodulators of `rules` and (at the full level) `eqns`.
///
/// Demodulators used are appended to `used`, in application order.
#[allow(clippy::too_many_arguments)]
pub fn rewrite_term(
    ocb: &Ocb,
    bank: &mut TermBank,
    store: &ClauseStore,
    rules: &ClauseSet,
    eqns: &ClauseSet,
    term: TermId,
    level: RewriteLevel,
    date: Date,
    used: &mut Vec<ClauseId>,
) -> Result<TermId, err::TermBankError> {
    let mut current = bank.follow_rewrites(term);

    if bank.nf_date(current, level) >= date {
        return Ok(current);
    }

    loop {
        // Arguments first: innermost normalization.
        let node = bank.term(current);
        if !node.is_var() && !node.args.is_empty() {
            let f_code = node.f_code;
            let args = node.args.clone();
            let mut new_args = Vec::with_capacity(args.len());
            for arg in args {
                new_args.push(rewrite_term(
                    ocb, bank, store, rules, eqns, arg, level, date, used,
                )?);
            }
            current = bank.insert(f_code, new_args)?;
        }

        match rewrite_at_top(ocb, bank, store, rules, eqns, current, level)? {
            None => break,
            Some((next, demod)) => {
                log::trace!(target: targets::REWRITING, "Rewrote {current} to {next} with {demod}");
                bank.set_rewrite(current, RewriteTarget { replacement: next, demod });
                used.push(demod);
                current = next;
            }
        }
    }

    bank.set_nf_date(current, level, date);
    Ok(current)
}

/// One rewrite step at the top of `term`, if some demodulator applies.
fn rewrite_at_top(
    ocb: &Ocb,
    bank: &mut TermBank,
    store: &ClauseStore,
    rules: &ClauseSet,
    eqns: &ClauseSet,
    term: TermId,
    level: RewriteLevel,
) -> Result<Option<(TermId, ClauseId)>, err::TermBankError> {
    if bank.term(term).is_var() {
        return Ok(None);
    }

    // Rules apply unconditionally: orientation is stable under instantiation.
    for entry in rules.demod_candidates(bank, term) {
        let mut subst = Subst::new();
        let other = other_side(store, entry.clause, entry.side);
        if matches(bank, &mut subst, entry.side, term) {
            let replacement = subst.apply(bank, other)?;
            return Ok(Some((replacement, entry.clause)));
        }
    }

    if level == RewriteLevel::Full {
        // Unorientable equations apply only when the instance is oriented.
        for entry in eqns.demod_candidates(bank, term) {
            let mut subst = Subst::new();
            let other = other_side(store, entry.clause, entry.side);
            if matches(bank, &mut subst, entry.side, term)
                && ocb.greater(bank, &subst, entry.side, Deref::Always, other, Deref::Always)
            {
                let replacement = subst.apply(bank, other)?;
                return Ok(Some((replacement, entry.clause)));
            }
        }
    }

    Ok(None)
}

fn other_side(store: &ClauseStore, clause: ClauseId, side: TermId) -> TermId {
    let literal = &store.get(clause).literals[0];
    if literal.lhs == side {
        literal.rhs
    } else {
        literal.lhs
    }
}

/// Normalizes every literal of `lits`, clearing ordering caches on any literal changed.
///
/// Returns the demodulators used over the whole list.
#[allow(clippy::too_many_arguments)]
pub fn rewrite_literals(
    ocb: &Ocb,
    bank: &mut TermBank,
    store: &ClauseStore,
    rules: &ClauseSet,
    eqns: &ClauseSet,
    lits: &mut [Eqn],
    level: RewriteLevel,
    date: Date,
) -> Result<Vec<ClauseId>, err::TermBankError> {
    let mut used = Vec::default();

    for lit in lits.iter_mut() {
        let lhs = rewrite_term(ocb, bank, store, rules, eqns, lit.lhs, level, date, &mut used)?;
        let rhs = rewrite_term(ocb, bank, store, rules, eqns, lit.rhs, level, date, &mut used)?;
        if lhs != lit.lhs || rhs != lit.rhs {
            lit.lhs = lhs;
            lit.rhs = rhs;
            lit.clear_caches();
        }
    }

    Ok(used)
}

/// True if some subterm of `term` is rewritable by the unit equation of `demod`.
///
/// Used by backward simplification to find processed clauses a fresh demodulator reaches.
pub fn term_is_rewritable(
    ocb: &Ocb,
    bank: &TermBank,
    store: &ClauseStore,
    demod: ClauseId,
    term: TermId,
) -> bool {
    let literal = &store.get(demod).literals[0];
    let sides: Vec<(TermId, TermId)> = if literal.is_oriented() {
        vec![(literal.lhs, literal.rhs)]
    } else {
        vec![(literal.lhs, literal.rhs), (literal.rhs, literal.lhs)]
    };

    let mut stack = vec![term];
    while let Some(current) = stack.pop() {
        let node = bank.term(current);
        if node.is_var() {
            continue;
        }
        for &(side, other) in &sides {
            let mut subst = Subst::new();
            if matches(bank, &mut subst, side, current)
                && (literal.is_oriented()
                    || ocb.greater(bank, &subst, side, Deref::Always, other, Deref::Always))
            {
                return true;
            }
        }
        stack.extend(node.args.iter().copied());
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::SetKey,
        structures::{signature::Signature, term::SORT_INDIVIDUAL},
    };

    #[test]
    fn demodulation_rewrites_under_a_rule() {
        let mut sig = Signature::new();
        let f = sig.insert("f", 1).unwrap();
        let g = sig.insert("g", 1).unwrap();
        let h = sig.insert("h", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        sig.refresh_alpha_ranks();

        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);

        // Demodulator: f(g(X)) = h(X).
        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_gx = bank.insert(g, vec![x]).unwrap();
        let t_fgx = bank.insert(f, vec![t_gx]).unwrap();
        let t_hx = bank.insert(h, vec![x]).unwrap();

        let mut demod_lit = Eqn::new(&bank, t_fgx, t_hx, true);
        demod_lit.orient(&ocb, &bank);
        assert!(demod_lit.is_oriented());
        assert_eq!(demod_lit.lhs, t_fgx);

        let demod = store.fresh(vec![demod_lit]);
        let mut rules = ClauseSet::new(SetKey::PosRules).with_demod_index();
        let eqns = ClauseSet::new(SetKey::PosEqns).with_demod_index();
        rules.insert(&mut store, &bank, demod);
        rules.date = 1;

        // f(g(a)) normalizes to h(a).
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_ga = bank.insert(g, vec![t_a]).unwrap();
        let t_fga = bank.insert(f, vec![t_ga]).unwrap();
        let t_ha = bank.insert(h, vec![t_a]).unwrap();

        let mut used = Vec::default();
        let nf = rewrite_term(
            &ocb, &mut bank, &store, &rules, &eqns, t_fga, RewriteLevel::Full, 1, &mut used,
        )
        .unwrap();

        assert_eq!(nf, t_ha);
        assert_eq!(used, vec![demod]);
        assert!(bank.rewrite_target(t_fga).is_some());

        // The result is stamped: a second pass is a no-op without consulting the index.
        let mut again = Vec::default();
        let nf_again = rewrite_term(
            &ocb, &mut bank, &store, &rules, &eqns, nf, RewriteLevel::Full, 1, &mut again,
        )
        .unwrap();
        assert_eq!(nf_again, nf);
        assert!(again.is_empty());

        assert!(term_is_rewritable(&ocb, &bank, &store, demod, t_fga));
        assert!(!term_is_rewritable(&ocb, &bank, &store, demod, t_ha));
    }

    #[test]
    fn rewriting_is_strictly_decreasing() {
        let mut sig = Signature::new();
        let f = sig.insert("f", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        sig.refresh_alpha_ranks();

        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);

        // f(X) = X, applied to f(f(a)).
        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let t_fx = bank.insert(f, vec![x]).unwrap();
        let mut lit = Eqn::new(&bank, t_fx, x, true);
        lit.orient(&ocb, &bank);
        let demod = store.fresh(vec![lit]);

        let mut rules = ClauseSet::new(SetKey::PosRules).with_demod_index();
        let eqns = ClauseSet::new(SetKey::PosEqns).with_demod_index();
        rules.insert(&mut store, &bank, demod);

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_fa = bank.insert(f, vec![t_a]).unwrap();
        let t_ffa = bank.insert(f, vec![t_fa]).unwrap();

        let mut used = Vec::default();
        let nf = rewrite_term(
            &ocb, &mut bank, &store, &rules, &eqns, t_ffa, RewriteLevel::Rules, 1, &mut used,
        )
        .unwrap();

        assert_eq!(nf, t_a);
        assert_eq!(used.len(), 2);
        let subst = Subst::new();
        assert!(ocb.greater(&bank, &subst, t_ffa, Deref::Never, nf, Deref::Never));
    }
}
