/*!
The ordering control block --- a reduction ordering over shared terms.

The ordering is used to orient equations, to restrict which literals may paramodulate, and to guarantee rewriting terminates.
The concrete instance is a lexicographic path ordering parameterized by a total precedence on function symbols; the precedence (and the symbol weights used by the clause evaluation heuristic) are fixed when the control block is built and immutable thereafter.

Comparisons may be made under a pending [substitution](crate::structures::subst) through the dereference modes, without materializing the substitution.

Soundness note: the LPO implementation bounds its recursion depth (the LPO₄ scheme).
A comparison which hits the bound reports [Uncomparable](CompareResult::Uncomparable) --- never wrong, though possibly weaker than the true ordering --- and the event is counted on the control block.
*/

mod lpo;

use std::cell::Cell;

use crate::structures::{
    signature::{Signature, SymbolProps},
    subst::{Deref, Subst},
    term::{FunCode, TermBank, TermId},
};

/// The result of comparing two terms (or literals) under an ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareResult {
    /// The first is strictly greater.
    Greater,

    /// The first is strictly smaller.
    Lesser,

    /// The two are equal.
    Equal,

    /// Neither is greater, and the two are not equal.
    Uncomparable,
}

impl CompareResult {
    /// The result with the argument roles exchanged.
    pub fn flip(self) -> CompareResult {
        match self {
            Self::Greater => Self::Lesser,
            Self::Lesser => Self::Greater,
            other => other,
        }
    }
}

/// The order control block.
pub struct Ocb {
    /// Precedence rank per function code; a higher rank is a greater symbol.
    precedence: Vec<u32>,

    /// Heuristic weight per function code.
    weights: Vec<i64>,

    /// Heuristic weight of a variable occurrence.
    var_weight: i64,

    /// Bound on LPO recursion depth.
    recursion_limit: usize,

    /// A count of comparisons cut short by the recursion bound.
    depth_overflows: Cell<u64>,
}

impl Ocb {
    /// Builds a control block over `sig`.
    ///
    /// The default precedence ranks symbols by arity with the alphabetic rank as tie-breaker, keeping the reserved symbols minimal so predicates orient towards `$true`.
    /// `precedence_override` lists symbol names from least to greatest; named symbols outrank every unnamed one.
    pub fn new(
        sig: &Signature,
        precedence_override: &[String],
        fun_weight: i64,
        var_weight: i64,
        recursion_limit: usize,
    ) -> Self {
        let count = sig.count() + 1;

        let mut order: Vec<FunCode> = sig.codes().collect();
        order.sort_by_key(|&code| {
            let symbol = sig.symbol(code);
            let reserved = symbol.props.contains(SymbolProps::INTERPRETED)
                || symbol.props.contains(SymbolProps::SPECIAL);
            let named = precedence_override
                .iter()
                .position(|name| name == &symbol.name);
            (
                named.is_some(),
                named,
                !reserved,
                symbol.arity,
                symbol.alpha_rank,
            )
        });

        let mut precedence = vec![0; count];
        for (rank, code) in order.into_iter().enumerate() {
            precedence[code as usize] = rank as u32;
        }

        Ocb {
            precedence,
            weights: vec![fun_weight; count],
            var_weight,
            recursion_limit,
            depth_overflows: Cell::new(0),
        }
    }

    /// Compares two function codes by precedence.
    pub fn fun_compare(&self, f: FunCode, g: FunCode) -> CompareResult {
        if f == g {
            return CompareResult::Equal;
        }
        match self.precedence[f as usize].cmp(&self.precedence[g as usize]) {
            std::cmp::Ordering::Greater => CompareResult::Greater,
            std::cmp::Ordering::Less => CompareResult::Lesser,
            // The precedence is total over distinct codes.
            std::cmp::Ordering::Equal => CompareResult::Uncomparable,
        }
    }

    /// The precedence rank of a symbol; a higher rank is a greater symbol.
    pub fn precedence_rank(&self, f: FunCode) -> u32 {
        self.precedence[f as usize]
    }

    /// The heuristic weight of a symbol.
    pub fn symbol_weight(&self, f: FunCode) -> i64 {
        if f < 0 {
            self.var_weight
        } else {
            self.weights[f as usize]
        }
    }

    /// The heuristic weight of a variable occurrence.
    pub fn var_weight(&self) -> i64 {
        self.var_weight
    }

    /// The bound on LPO recursion depth.
    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    pub(crate) fn note_depth_overflow(&self) {
        self.depth_overflows.set(self.depth_overflows.get() + 1);
    }

    /// A count of comparisons cut short by the recursion bound.
    pub fn depth_overflows(&self) -> u64 {
        self.depth_overflows.get()
    }

    /// The heuristic weight of a term: the weight sum over symbol and variable occurrences.
    pub fn term_weight(&self, bank: &TermBank, term: TermId) -> i64 {
        let node = bank.term(term);
        if node.is_var() {
            return self.var_weight;
        }
        let mut weight = self.weights[node.f_code as usize];
        for &arg in &node.args {
            weight += self.term_weight(bank, arg);
        }
        weight
    }

    /// True if `s` is strictly greater than `t` under the LPO, comparing under `subst` with the given dereference modes.
    pub fn greater(
        &self,
        bank: &TermBank,
        subst: &Subst,
        s: TermId,
        deref_s: Deref,
        t: TermId,
        deref_t: Deref,
    ) -> bool {
        lpo::lpo_greater(self, bank, subst, s, deref_s, t, deref_t, 0)
    }

    /// Compares `s` and `t` under the LPO.
    pub fn compare(
        &self,
        bank: &TermBank,
        subst: &Subst,
        s: TermId,
        deref_s: Deref,
        t: TermId,
        deref_t: Deref,
    ) -> CompareResult {
        if struct_equal(bank, subst, s, deref_s, t, deref_t) {
            CompareResult::Equal
        } else if self.greater(bank, subst, s, deref_s, t, deref_t) {
            CompareResult::Greater
        } else if self.greater(bank, subst, t, deref_t, s, deref_s) {
            CompareResult::Lesser
        } else {
            CompareResult::Uncomparable
        }
    }
}

/// Structural equality of two terms under a substitution.
///
/// With no bindings in play shared terms are equal exactly when their ids are equal.
pub fn struct_equal(
    bank: &TermBank,
    subst: &Subst,
    s: TermId,
    deref_s: Deref,
    t: TermId,
    deref_t: Deref,
) -> bool {
    let (s, deref_s) = subst.deref(bank, s, deref_s);
    let (t, deref_t) = subst.deref(bank, t, deref_t);

    if s == t && (deref_s == deref_t || bank.term(s).var_count == 0) {
        return true;
    }
    if deref_s == Deref::Never && deref_t == Deref::Never {
        return s == t;
    }

    let s_node = bank.term(s);
    let t_node = bank.term(t);
    if s_node.f_code != t_node.f_code || s_node.args.len() != t_node.args.len() {
        return false;
    }
    s_node
        .args
        .iter()
        .zip(t_node.args.iter())
        .all(|(&s_arg, &t_arg)| struct_equal(bank, subst, s_arg, deref_s, t_arg, deref_t))
}

/// A total comparison on ground terms by weight, then top symbol, then arity, then arguments lexicographically.
///
/// Used to orient the ground rewrite rules of the tautology test; cheaper than the LPO and total on ground terms.
pub fn ground_compare(bank: &TermBank, s: TermId, t: TermId) -> CompareResult {
    if s == t {
        return CompareResult::Equal;
    }

    let mut stack = vec![(s, t)];
    while let Some((s, t)) = stack.pop() {
        if s == t {
            continue;
        }
        let s_node = bank.term(s);
        let t_node = bank.term(t);

        if s_node.weight != t_node.weight {
            return if s_node.weight > t_node.weight {
                CompareResult::Greater
            } else {
                CompareResult::Lesser
            };
        }
        if s_node.f_code != t_node.f_code {
            return if s_node.f_code > t_node.f_code {
                CompareResult::Greater
            } else {
                CompareResult::Lesser
            };
        }
        if s_node.args.len() != t_node.args.len() {
            return if s_node.args.len() > t_node.args.len() {
                CompareResult::Greater
            } else {
                CompareResult::Lesser
            };
        }
        for (&s_arg, &t_arg) in s_node.args.iter().zip(t_node.args.iter()).rev() {
            stack.push((s_arg, t_arg));
        }
    }

    CompareResult::Equal
}

/// The multiset extension of the term ordering, for small multisets.
///
/// Used for comparing literals: a positive literal *s = t* is the multiset *{s, t}*, a negative literal the multiset *{s, s, t, t}*.
pub fn multiset_compare(
    ocb: &Ocb,
    bank: &TermBank,
    subst: &Subst,
    a: &[TermId],
    deref_a: Deref,
    b: &[TermId],
    deref_b: Deref,
) -> CompareResult {
    let mut a: Vec<TermId> = a.to_vec();
    let mut b: Vec<TermId> = b.to_vec();

    // Remove equal pairs.
    let mut index = 0;
    while index < a.len() {
        let mut removed = false;
        for b_index in 0..b.len() {
            if struct_equal(bank, subst, a[index], deref_a, b[b_index], deref_b) {
                a.swap_remove(index);
                b.swap_remove(b_index);
                removed = true;
                break;
            }
        }
        if !removed {
            index += 1;
        }
    }

    match (a.is_empty(), b.is_empty()) {
        (true, true) => return CompareResult::Equal,
        (true, false) => return CompareResult::Lesser,
        (false, true) => return CompareResult::Greater,
        (false, false) => {}
    }

    let dominates = |xs: &[TermId], dx: Deref, ys: &[TermId], dy: Deref| {
        ys.iter().all(|&y| {
            xs.iter()
                .any(|&x| ocb.greater(bank, subst, x, dx, y, dy))
        })
    };

    if dominates(&a, deref_a, &b, deref_b) {
        CompareResult::Greater
    } else if dominates(&b, deref_b, &a, deref_a) {
        CompareResult::Lesser
    } else {
        CompareResult::Uncomparable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Signature, TermBank, Ocb) {
        let mut sig = Signature::new();
        sig.insert("f", 2).unwrap();
        sig.insert("g", 1).unwrap();
        sig.insert("a", 0).unwrap();
        sig.insert("b", 0).unwrap();
        sig.refresh_alpha_ranks();

        let bank = TermBank::new(&sig);
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);
        (sig, bank, ocb)
    }

    #[test]
    fn precedence_is_total() {
        let (sig, _bank, ocb) = setup();
        let f = sig.code_of("f").unwrap();
        let g = sig.code_of("g").unwrap();
        let a = sig.code_of("a").unwrap();

        assert_eq!(ocb.fun_compare(f, f), CompareResult::Equal);
        assert_eq!(ocb.fun_compare(f, g), CompareResult::Greater);
        assert_eq!(ocb.fun_compare(a, g), CompareResult::Lesser);
        assert_eq!(ocb.fun_compare(g, a), ocb.fun_compare(a, g).flip());
    }

    #[test]
    fn ground_compare_is_total_on_distinct_terms() {
        let (sig, mut bank, _ocb) = setup();
        let g = sig.code_of("g").unwrap();
        let a = sig.code_of("a").unwrap();
        let b = sig.code_of("b").unwrap();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_b = bank.insert(b, vec![]).unwrap();
        let t_ga = bank.insert(g, vec![t_a]).unwrap();

        assert_eq!(ground_compare(&bank, t_a, t_a), CompareResult::Equal);
        assert_eq!(ground_compare(&bank, t_ga, t_a), CompareResult::Greater);
        assert_ne!(ground_compare(&bank, t_a, t_b), CompareResult::Equal);
        assert_eq!(
            ground_compare(&bank, t_a, t_b),
            ground_compare(&bank, t_b, t_a).flip()
        );
    }

    #[test]
    fn multisets_compare_by_domination() {
        let (sig, mut bank, ocb) = setup();
        let g = sig.code_of("g").unwrap();
        let a = sig.code_of("a").unwrap();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_ga = bank.insert(g, vec![t_a]).unwrap();
        let subst = Subst::new();

        assert_eq!(
            multiset_compare(
                &ocb,
                &bank,
                &subst,
                &[t_ga, t_a],
                Deref::Never,
                &[t_a, t_a],
                Deref::Never
            ),
            CompareResult::Greater
        );
        assert_eq!(
            multiset_compare(
                &ocb,
                &bank,
                &subst,
                &[t_a, t_ga],
                Deref::Never,
                &[t_ga, t_a],
                Deref::Never
            ),
            CompareResult::Equal
        );
    }
}
