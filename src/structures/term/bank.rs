/*!
The term bank --- owner of all shared term nodes.

Sharing is arranged through a hash table keyed on `(f_code, argument ids)`.
Insertion is bottom-up: arguments are inserted before the enclosing term, so by the time a key is formed every argument is already shared.
On a miss a fresh cell is allocated, its weight and variable count computed from the (shared) arguments, and a monotone entry number assigned.

Variables are owned by the variable bank, a map from `(code, sort)` to the unique variable node, together with a floor counter used to mint fresh variables for variable-disjoint clause copies.

Unreferenced nodes are reclaimed by a mark-and-sweep garbage collection.
Callers mark every root (clause sets, archived clauses, anything else holding ids across the collection) and sweep; swept slots are reused by later insertions.
*/

use std::collections::HashMap;

use crate::{
    db::ClauseId,
    misc::log::targets::{self},
    structures::{
        signature::Signature,
        term::{
            Date, FunCode, RewriteLevel, Sort, Term, TermId, TermProps, DEFAULT_FWEIGHT,
            DEFAULT_VWEIGHT, SORT_INDIVIDUAL,
        },
    },
    types::err::{self},
};

/// The replacement of a rewritten node.
#[derive(Clone, Copy, Debug)]
pub struct RewriteTarget {
    /// The node the rewritten node was replaced by.
    pub replacement: TermId,

    /// The demodulator used.
    pub demod: ClauseId,
}

/// The term bank struct.
pub struct TermBank {
    /// Cells, indexed by [TermId]; `None` marks a swept slot.
    cells: Vec<Option<Term>>,

    /// Swept slots available for reuse.
    free: Vec<TermId>,

    /// The sharing table for function terms.
    shared: HashMap<(FunCode, Vec<TermId>), TermId>,

    /// The variable bank.
    vars: HashMap<(FunCode, Sort), TermId>,

    /// The most negative variable code handed out, for minting fresh variables.
    var_floor: FunCode,

    /// Monotone insertion counter.
    entry_count: u64,

    /// Normal-form dates, one pair per slot (rules-only, full).
    nf_dates: Vec<[Date; 2]>,

    /// Replacements of rewritten nodes.
    rewrites: HashMap<TermId, RewriteTarget>,

    /// The node `$true`.
    pub true_term: TermId,

    /// The node `$false`.
    pub false_term: TermId,
}

impl TermBank {
    /// A fresh bank over `sig`, with the `$true` and `$false` nodes inserted.
    pub fn new(sig: &Signature) -> Self {
        let mut bank = TermBank {
            cells: Vec::default(),
            free: Vec::default(),
            shared: HashMap::default(),
            vars: HashMap::default(),
            var_floor: 0,
            entry_count: 0,
            nf_dates: Vec::default(),
            rewrites: HashMap::default(),
            true_term: 0,
            false_term: 0,
        };

        // Insertion of nullary terms cannot fail on a fresh bank.
        bank.true_term = bank.insert(sig.true_code, vec![]).expect("! Fresh bank");
        bank.false_term = bank.insert(sig.false_code, vec![]).expect("! Fresh bank");

        bank
    }

    /// The node for `id`.
    ///
    /// # Panics
    /// If `id` does not refer to a live node of this bank.
    pub fn term(&self, id: TermId) -> &Term {
        self.cells[id as usize].as_ref().expect("! Dangling term id")
    }

    fn term_mut(&mut self, id: TermId) -> &mut Term {
        self.cells[id as usize].as_mut().expect("! Dangling term id")
    }

    /// Sets a property on the node for `id`.
    pub fn set_prop(&mut self, id: TermId, prop: TermProps) {
        self.term_mut(id).props |= prop;
    }

    /// Clears a property on the node for `id`.
    pub fn clear_prop(&mut self, id: TermId, prop: TermProps) {
        self.term_mut(id).props -= prop;
    }

    /// A count of live nodes.
    pub fn node_count(&self) -> usize {
        self.cells.len() - self.free.len()
    }

    fn allocate(&mut self, term: Term) -> Result<TermId, err::TermBankError> {
        match self.free.pop() {
            Some(id) => {
                self.cells[id as usize] = Some(term);
                self.nf_dates[id as usize] = [0, 0];
                Ok(id)
            }
            None => {
                if self.cells.len() >= TermId::MAX as usize {
                    return Err(err::TermBankError::Exhausted);
                }
                let id = self.cells.len() as TermId;
                self.cells.push(Some(term));
                self.nf_dates.push([0, 0]);
                Ok(id)
            }
        }
    }

    /// Inserts the function term `f_code(args…)`, sharing structure with all existing nodes.
    ///
    /// Arguments must already be nodes of this bank.
    pub fn insert(&mut self, f_code: FunCode, args: Vec<TermId>) -> Result<TermId, err::TermBankError> {
        debug_assert!(f_code > 0, "Variables are inserted through the variable bank");

        if let Some(&id) = self.shared.get(&(f_code, args.clone())) {
            return Ok(id);
        }

        let mut weight = DEFAULT_FWEIGHT;
        let mut var_count = 0;
        for &arg in &args {
            let node = self.term(arg);
            weight += node.weight;
            var_count += node.var_count;
        }

        let mut props = TermProps::SHARED;
        if var_count == 0 {
            props |= TermProps::GROUND;
        }

        self.entry_count += 1;
        let term = Term {
            f_code,
            sort: SORT_INDIVIDUAL,
            args: args.clone(),
            weight,
            var_count,
            entry_no: self.entry_count,
            props,
        };

        let id = self.allocate(term)?;
        self.shared.insert((f_code, args), id);
        Ok(id)
    }

    /// The unique variable node for `(code, sort)`.
    pub fn variable(&mut self, code: FunCode, sort: Sort) -> TermId {
        debug_assert!(code < 0, "Variable codes are negative");

        if let Some(&id) = self.vars.get(&(code, sort)) {
            return id;
        }

        self.entry_count += 1;
        self.var_floor = self.var_floor.min(code);
        let term = Term {
            f_code: code,
            sort,
            args: vec![],
            weight: DEFAULT_VWEIGHT,
            var_count: 1,
            entry_no: self.entry_count,
            props: TermProps::SHARED,
        };

        // Variable allocation mirrors function terms, though the id space is in practice never exhausted by variables alone.
        let id = self.allocate(term).expect("! Variable bank full");
        self.vars.insert((code, sort), id);
        id
    }

    /// A variable node with a code below every code handed out so far.
    pub fn fresh_variable(&mut self, sort: Sort) -> TermId {
        let code = self.var_floor - 1;
        self.variable(code, sort)
    }

    /// The subterm of `id` at `path`, if the path exists.
    ///
    /// A path is a sequence of argument indicies; the empty path is the term itself.
    pub fn subterm_at(&self, id: TermId, path: &[u32]) -> Option<TermId> {
        let mut current = id;
        for &step in path {
            current = *self.term(current).args.get(step as usize)?;
        }
        Some(current)
    }

    /// Rebuilds the minimal spine of `id` with the subterm at `path` replaced by `with`.
    pub fn replace_at(
        &mut self,
        id: TermId,
        path: &[u32],
        with: TermId,
    ) -> Result<TermId, err::TermBankError> {
        match path.split_first() {
            None => Ok(with),
            Some((&step, rest)) => {
                let node = self.term(id);
                let f_code = node.f_code;
                let args = node.args.clone();
                debug_assert!((step as usize) < args.len());

                let replaced = self.replace_at(args[step as usize], rest, with)?;
                let mut new_args = args;
                new_args[step as usize] = replaced;
                self.insert(f_code, new_args)
            }
        }
    }

    /// Rebuilds `id` with every occurrence of `from` replaced by `to`.
    pub fn replace_all(
        &mut self,
        id: TermId,
        from: TermId,
        to: TermId,
    ) -> Result<TermId, err::TermBankError> {
        if id == from {
            return Ok(to);
        }
        let node = self.term(id);
        if node.is_var() || !self.contains(id, from) {
            return Ok(id);
        }
        let f_code = node.f_code;
        let args = node.args.clone();
        let mut new_args = Vec::with_capacity(args.len());
        for arg in args {
            new_args.push(self.replace_all(arg, from, to)?);
        }
        self.insert(f_code, new_args)
    }

    /// True if `needle` occurs in `haystack` (including at the top).
    pub fn contains(&self, haystack: TermId, needle: TermId) -> bool {
        if haystack == needle {
            return true;
        }
        self.term(haystack)
            .args
            .iter()
            .any(|&arg| self.contains(arg, needle))
    }

    /// Collects the distinct variables of `id` in first-occurrence order.
    pub fn variables_of(&self, id: TermId, out: &mut Vec<TermId>) {
        let node = self.term(id);
        if node.var_count == 0 {
            return;
        }
        if node.is_var() {
            if !out.contains(&id) {
                out.push(id);
            }
            return;
        }
        for &arg in &node.args {
            self.variables_of(arg, out);
        }
    }

    /// Every position of `id` paired with the subterm at the position, in preorder.
    pub fn positions_of(&self, id: TermId) -> Vec<(Vec<u32>, TermId)> {
        let mut out = Vec::default();
        let mut stack = vec![(Vec::default(), id)];
        while let Some((path, term)) = stack.pop() {
            for (index, &arg) in self.term(term).args.iter().enumerate().rev() {
                let mut arg_path = path.clone();
                arg_path.push(index as u32);
                stack.push((arg_path, arg));
            }
            out.push((path, term));
        }
        out
    }

    /// Rebuilds `id` with variables replaced per `map`, minting a fresh variable for every unmapped variable met.
    pub fn rename_vars(
        &mut self,
        id: TermId,
        map: &mut HashMap<TermId, TermId>,
    ) -> Result<TermId, err::TermBankError> {
        let node = self.term(id);
        if node.is_var() {
            if let Some(&to) = map.get(&id) {
                return Ok(to);
            }
            let sort = node.sort;
            let fresh = self.fresh_variable(sort);
            map.insert(id, fresh);
            return Ok(fresh);
        }
        if node.var_count == 0 {
            return Ok(id);
        }
        let f_code = node.f_code;
        let args = node.args.clone();
        let mut new_args = Vec::with_capacity(args.len());
        for arg in args {
            new_args.push(self.rename_vars(arg, map)?);
        }
        self.insert(f_code, new_args)
    }
}

/// Rewrite bookkeeping.
impl TermBank {
    /// The normal-form date of `id` at `level`.
    pub fn nf_date(&self, id: TermId, level: RewriteLevel) -> Date {
        self.nf_dates[id as usize][level.index()]
    }

    /// Raises the normal-form date of `id` at `level` to `date`.
    ///
    /// Dates are monotone: a lower date never overwrites a higher one.
    /// A normal form under the full system is a normal form under rules alone, so setting the full date raises the rule date too.
    pub fn set_nf_date(&mut self, id: TermId, level: RewriteLevel, date: Date) {
        let dates = &mut self.nf_dates[id as usize];
        dates[RewriteLevel::Rules.index()] = dates[RewriteLevel::Rules.index()].max(date);
        if level == RewriteLevel::Full {
            dates[RewriteLevel::Full.index()] = dates[RewriteLevel::Full.index()].max(date);
        }
    }

    /// Records that `id` has been rewritten to `target.replacement`.
    pub fn set_rewrite(&mut self, id: TermId, target: RewriteTarget) {
        debug_assert!(id != target.replacement);
        self.set_prop(id, TermProps::REWRITTEN);
        self.rewrites.insert(id, target);
    }

    /// The recorded replacement of `id`, if the node has been rewritten.
    pub fn rewrite_target(&self, id: TermId) -> Option<&RewriteTarget> {
        self.rewrites.get(&id)
    }

    /// Follows the rewrite chain from `id` to its end.
    ///
    /// Rewriting is strictly decreasing under the ordering, so chains cannot cycle.
    pub fn follow_rewrites(&self, id: TermId) -> TermId {
        let mut current = id;
        while let Some(target) = self.rewrites.get(&current) {
            current = target.replacement;
        }
        current
    }
}

/// Garbage collection.
impl TermBank {
    /// Marks `id`, its subterms, and any rewrite targets reachable from them.
    pub fn gc_mark(&mut self, id: TermId) {
        let mut worklist = vec![id];
        while let Some(current) = worklist.pop() {
            let node = self.term(current);
            if node.props.contains(TermProps::GC_MARK) {
                continue;
            }
            worklist.extend(node.args.iter().copied());
            if let Some(target) = self.rewrites.get(&current) {
                worklist.push(target.replacement);
            }
            self.set_prop(current, TermProps::GC_MARK);
        }
    }

    /// Sweeps every unmarked node, clearing marks on survivors.
    /// Returns the number of nodes reclaimed.
    ///
    /// The built-in nodes and all variables survive unconditionally: variables are cheap, and fresh-variable minting relies on the bank retaining them.
    pub fn gc_sweep(&mut self) -> usize {
        self.gc_mark(self.true_term);
        self.gc_mark(self.false_term);
        let variables: Vec<TermId> = self.vars.values().copied().collect();
        for id in variables {
            self.set_prop(id, TermProps::GC_MARK);
        }

        let mut swept = 0;
        for index in 0..self.cells.len() {
            let Some(node) = &self.cells[index] else {
                continue;
            };
            let id = index as TermId;
            if node.props.contains(TermProps::GC_MARK) {
                self.clear_prop(id, TermProps::GC_MARK);
            } else {
                self.shared.remove(&(node.f_code, node.args.clone()));
                self.rewrites.remove(&id);
                self.cells[index] = None;
                self.nf_dates[index] = [0, 0];
                self.free.push(id);
                swept += 1;
            }
        }

        log::debug!(target: targets::TERM_BANK, "GC reclaimed {swept} nodes, {} live", self.node_count());
        swept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Signature, TermBank, FunCode, FunCode, FunCode) {
        let mut sig = Signature::new();
        let f = sig.insert("f", 2).unwrap();
        let g = sig.insert("g", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        let bank = TermBank::new(&sig);
        (sig, bank, f, g, a)
    }

    #[test]
    fn sharing_is_maximal() {
        let (_sig, mut bank, f, g, a) = setup();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_ga = bank.insert(g, vec![t_a]).unwrap();
        let t_f = bank.insert(f, vec![t_ga, t_a]).unwrap();

        // Inserting the same structure twice gives the same node.
        let t_a2 = bank.insert(a, vec![]).unwrap();
        let t_ga2 = bank.insert(g, vec![t_a2]).unwrap();
        let t_f2 = bank.insert(f, vec![t_ga2, t_a2]).unwrap();

        assert_eq!(t_f, t_f2);
        assert_eq!(bank.term(t_f).weight, 2 + 2 + 2 + 2 + 2);
        assert!(bank.term(t_f).is_ground());
    }

    #[test]
    fn variables_are_unique_per_code() {
        let (_sig, mut bank, f, _g, a) = setup();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let x_again = bank.variable(-1, SORT_INDIVIDUAL);
        assert_eq!(x, x_again);

        let y = bank.fresh_variable(SORT_INDIVIDUAL);
        assert_ne!(x, y);

        let t_a = bank.insert(a, vec![]).unwrap();
        let t = bank.insert(f, vec![x, t_a]).unwrap();
        assert_eq!(bank.term(t).var_count, 1);
        assert!(!bank.term(t).is_ground());
    }

    #[test]
    fn replacement_rebuilds_the_spine() {
        let (_sig, mut bank, f, g, a) = setup();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_ga = bank.insert(g, vec![t_a]).unwrap();
        let t = bank.insert(f, vec![t_ga, t_a]).unwrap();

        let x = bank.variable(-1, SORT_INDIVIDUAL);
        let replaced = bank.replace_at(t, &[0, 0], x).unwrap();

        assert_eq!(bank.subterm_at(replaced, &[0, 0]), Some(x));
        assert_eq!(bank.subterm_at(replaced, &[1]), Some(t_a));
    }

    #[test]
    fn sweep_reclaims_unreachable_nodes() {
        let (_sig, mut bank, _f, g, a) = setup();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_ga = bank.insert(g, vec![t_a]).unwrap();
        let t_gga = bank.insert(g, vec![t_ga]).unwrap();

        let before = bank.node_count();
        bank.gc_mark(t_ga);
        let swept = bank.gc_sweep();

        assert_eq!(swept, 1);
        assert_eq!(bank.node_count(), before - 1);

        // The swept node may be rebuilt, reusing the slot.
        let rebuilt = bank.insert(g, vec![t_ga]).unwrap();
        assert_eq!(rebuilt, t_gga);
        assert_eq!(bank.term(rebuilt).args, vec![t_ga]);
    }

    #[test]
    fn nf_dates_are_monotone() {
        let (_sig, mut bank, _f, g, a) = setup();

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_ga = bank.insert(g, vec![t_a]).unwrap();

        bank.set_nf_date(t_ga, RewriteLevel::Full, 4);
        bank.set_nf_date(t_ga, RewriteLevel::Rules, 2);

        assert_eq!(bank.nf_date(t_ga, RewriteLevel::Rules), 4);
        assert_eq!(bank.nf_date(t_ga, RewriteLevel::Full), 4);
    }
}
