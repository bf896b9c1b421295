/*!
Substitutions, unification, and matching.

A [Subst] binds variable nodes to term nodes.
Bindings are recorded on a trail, so a failed unification (or an exhausted search branch) backtracks to an earlier [mark](Subst::mark) without rebuilding the substitution.

Comparisons and traversals may work *under* a substitution without materializing it, through an explicit dereference mode:

- [Deref::Never] --- bindings are ignored.
- [Deref::Once] --- a variable is chased through at most one binding.
- [Deref::Always] --- bindings are chased to the end.

Materializing σ(t) as a shared term is [apply](Subst::apply).
*/

use std::collections::HashMap;

use crate::{
    structures::term::{TermBank, TermId},
    types::err::{self},
};

/// How far to chase variable bindings when traversing a term under a substitution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deref {
    /// Ignore bindings.
    Never,

    /// Chase at most one binding, then stop.
    Once,

    /// Chase bindings to the end.
    Always,
}

impl Deref {
    /// The mode to continue with after one dereference step.
    fn step(self) -> Deref {
        match self {
            Deref::Never => Deref::Never,
            Deref::Once => Deref::Never,
            Deref::Always => Deref::Always,
        }
    }
}

/// A substitution with a backtrack trail.
#[derive(Debug, Default)]
pub struct Subst {
    /// Bindings from variable nodes to term nodes.
    bindings: HashMap<TermId, TermId>,

    /// The trail of bound variables, for backtracking.
    trail: Vec<TermId>,
}

impl Subst {
    /// A fresh, empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// A mark of the current trail position, for later backtracking.
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Undoes every binding made after `mark`.
    pub fn backtrack_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let var = self.trail.pop().expect("! Trail underflow");
            self.bindings.remove(&var);
        }
    }

    /// Binds `var` to `term`.
    ///
    /// The caller ensures `var` is an unbound variable node.
    pub fn bind(&mut self, var: TermId, term: TermId) {
        debug_assert!(!self.bindings.contains_key(&var));
        self.bindings.insert(var, term);
        self.trail.push(var);
    }

    /// The binding of `var`, if bound.
    pub fn binding(&self, var: TermId) -> Option<TermId> {
        self.bindings.get(&var).copied()
    }

    /// Dereferences `term` following `mode`, returning the node reached and the mode to continue under.
    pub fn deref(&self, bank: &TermBank, term: TermId, mode: Deref) -> (TermId, Deref) {
        let mut current = term;
        let mut mode = mode;
        while mode != Deref::Never && bank.term(current).is_var() {
            match self.bindings.get(&current) {
                None => break,
                Some(&bound) => {
                    current = bound;
                    mode = mode.step();
                }
            }
        }
        (current, mode)
    }

    /// Materializes σ(term) as a shared term, chasing bindings to the end.
    pub fn apply(&self, bank: &mut TermBank, term: TermId) -> Result<TermId, err::TermBankError> {
        if self.is_empty() {
            return Ok(term);
        }
        self.apply_deref(bank, term, Deref::Always)
    }

    fn apply_deref(
        &self,
        bank: &mut TermBank,
        term: TermId,
        mode: Deref,
    ) -> Result<TermId, err::TermBankError> {
        let (term, mode) = self.deref(bank, term, mode);
        let node = bank.term(term);
        if node.is_var() || node.var_count == 0 {
            return Ok(term);
        }
        let f_code = node.f_code;
        let args = node.args.clone();
        let mut new_args = Vec::with_capacity(args.len());
        for arg in args {
            new_args.push(self.apply_deref(bank, arg, mode)?);
        }
        bank.insert(f_code, new_args)
    }

    /// True if `var` occurs in `term` under the substitution.
    fn occurs(&self, bank: &TermBank, var: TermId, term: TermId) -> bool {
        let (term, _) = self.deref(bank, term, Deref::Always);
        if term == var {
            return true;
        }
        bank.term(term)
            .args
            .iter()
            .any(|&arg| self.occurs(bank, var, arg))
    }
}

/// Extends `subst` to a most general unifier of `s` and `t`.
///
/// On failure the substitution is restored to its state at entry.
pub fn unify(bank: &TermBank, subst: &mut Subst, s: TermId, t: TermId) -> bool {
    let mark = subst.mark();
    if unify_walk(bank, subst, s, t) {
        true
    } else {
        subst.backtrack_to(mark);
        false
    }
}

fn unify_walk(bank: &TermBank, subst: &mut Subst, s: TermId, t: TermId) -> bool {
    let mut worklist = vec![(s, t)];

    while let Some((s, t)) = worklist.pop() {
        let (s, _) = subst.deref(bank, s, Deref::Always);
        let (t, _) = subst.deref(bank, t, Deref::Always);

        if s == t {
            continue;
        }

        let s_node = bank.term(s);
        let t_node = bank.term(t);

        if s_node.is_var() {
            if subst.occurs(bank, s, t) {
                return false;
            }
            subst.bind(s, t);
            continue;
        }

        if t_node.is_var() {
            if subst.occurs(bank, t, s) {
                return false;
            }
            subst.bind(t, s);
            continue;
        }

        if s_node.f_code != t_node.f_code {
            return false;
        }
        debug_assert_eq!(s_node.args.len(), t_node.args.len());

        for (&s_arg, &t_arg) in s_node.args.iter().zip(t_node.args.iter()) {
            worklist.push((s_arg, t_arg));
        }
    }

    true
}

/// Extends `subst` to match `pattern` onto `target`: σ(pattern) = target, with `target` taken literally.
///
/// On failure the substitution is restored to its state at entry.
pub fn matches(bank: &TermBank, subst: &mut Subst, pattern: TermId, target: TermId) -> bool {
    let mark = subst.mark();
    if matches_walk(bank, subst, pattern, target) {
        true
    } else {
        subst.backtrack_to(mark);
        false
    }
}

fn matches_walk(bank: &TermBank, subst: &mut Subst, pattern: TermId, target: TermId) -> bool {
    let mut worklist = vec![(pattern, target)];

    while let Some((pattern, target)) = worklist.pop() {
        let p_node = bank.term(pattern);

        if p_node.is_var() {
            match subst.binding(pattern) {
                Some(bound) => {
                    if bound != target {
                        return false;
                    }
                }
                None => subst.bind(pattern, target),
            }
            continue;
        }

        let t_node = bank.term(target);
        if t_node.is_var() || p_node.f_code != t_node.f_code {
            return false;
        }

        for (&p_arg, &t_arg) in p_node.args.iter().zip(t_node.args.iter()) {
            worklist.push((p_arg, t_arg));
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{signature::Signature, term::SORT_INDIVIDUAL};

    fn setup() -> (TermBank, TermId, TermId, TermId, TermId, TermId) {
        let mut sig = Signature::new();
        let f = sig.insert("f", 2).unwrap();
        let g = sig.insert("g", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();

        let mut bank = TermBank::new(&sig);
        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let y = bank.variable(-2, SORT_INDIVIDUAL);
        let t_a = bank.insert(a, vec![]).unwrap();
        let t_ga = bank.insert(g, vec![t_a]).unwrap();
        let t_fx = bank.insert(f, vec![x, t_ga]).unwrap();

        (bank, x, y, t_a, t_ga, t_fx)
    }

    #[test]
    fn unify_binds_variables() {
        let (mut bank, x, y, t_a, t_ga, _) = setup();
        let f = 6; // code registered for f in setup

        let s = bank.insert(f, vec![x, t_ga]).unwrap();
        let t = bank.insert(f, vec![t_a, y]).unwrap();

        let mut subst = Subst::new();
        assert!(unify(&bank, &mut subst, s, t));
        assert_eq!(subst.binding(x), Some(t_a));
        assert_eq!(subst.binding(y), Some(t_ga));

        let s_inst = subst.apply(&mut bank, s).unwrap();
        let t_inst = subst.apply(&mut bank, t).unwrap();
        assert_eq!(s_inst, t_inst);
    }

    #[test]
    fn occurs_check_blocks_cyclic_unifiers() {
        let (bank, x, _y, _t_a, t_ga, _t_fx) = setup();
        // t_ga does not contain x, though f(x, g(a)) at argument one…
        let mut subst = Subst::new();
        assert!(unify(&bank, &mut subst, x, t_ga));

        let (mut bank, x, _y, _t_a, _t_ga, t_fx) = setup();
        let gx = bank.insert(7, vec![x]).unwrap();
        let mut subst = Subst::new();
        assert!(!unify(&bank, &mut subst, x, gx));
        assert!(subst.is_empty());
        assert!(bank.term(t_fx).var_count == 1);
    }

    #[test]
    fn matching_is_one_way() {
        let (mut bank, x, _y, t_a, t_ga, _) = setup();
        let f = 6;

        let pattern = bank.insert(f, vec![x, x]).unwrap();
        let target = bank.insert(f, vec![t_ga, t_ga]).unwrap();
        let mismatch = bank.insert(f, vec![t_ga, t_a]).unwrap();

        let mut subst = Subst::new();
        assert!(matches(&bank, &mut subst, pattern, target));
        assert_eq!(subst.binding(x), Some(t_ga));

        let mut subst = Subst::new();
        assert!(!matches(&bank, &mut subst, pattern, mismatch));

        // A variable target never matches a function pattern.
        let mut subst = Subst::new();
        assert!(!matches(&bank, &mut subst, target, pattern));
    }

    #[test]
    fn backtracking_restores_bindings() {
        let (bank, x, y, t_a, t_ga, _) = setup();

        let mut subst = Subst::new();
        subst.bind(x, t_a);
        let mark = subst.mark();
        subst.bind(y, t_ga);

        subst.backtrack_to(mark);
        assert_eq!(subst.binding(x), Some(t_a));
        assert_eq!(subst.binding(y), None);
    }
}
