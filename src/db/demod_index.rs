/*!
The demodulator index --- a discrimination tree over the maximal sides of positive unit equations.

Patterns are flattened to preorder symbol strings with variables as wildcards.
Retrieval walks a query term and the tree together: a symbol edge must match the query symbol exactly, while a wildcard edge skips the whole query subterm under the cursor.
The retrieved entries are candidate *generalizations* of the query term; the caller completes the job with a real matching attempt.
*/

use std::collections::HashMap;

use crate::{
    db::ClauseId,
    structures::term::{FunCode, TermBank, TermId},
};

/// The wildcard standing for any variable in a flattened pattern.
const WILDCARD: FunCode = 0;

/// A pattern entry: the indexed side together with its owning clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemodEntry {
    /// The demodulator clause.
    pub clause: ClauseId,

    /// The indexed side of its equation.
    pub side: TermId,
}

#[derive(Default)]
struct DtNode {
    children: HashMap<FunCode, usize>,
    entries: Vec<DemodEntry>,
}

/// The discrimination tree struct.
pub struct DemodIndex {
    nodes: Vec<DtNode>,
    entry_count: usize,
}

impl Default for DemodIndex {
    fn default() -> Self {
        DemodIndex {
            nodes: vec![DtNode::default()],
            entry_count: 0,
        }
    }
}

fn flatten(bank: &TermBank, term: TermId, out: &mut Vec<FunCode>) {
    let node = bank.term(term);
    if node.is_var() {
        out.push(WILDCARD);
        return;
    }
    out.push(node.f_code);
    for &arg in &node.args {
        flatten(bank, arg, out);
    }
}

impl DemodIndex {
    /// Indexes `side` of the demodulator `clause`.
    pub fn insert(&mut self, bank: &TermBank, clause: ClauseId, side: TermId) {
        let mut string = Vec::default();
        flatten(bank, side, &mut string);

        let mut node = 0;
        for symbol in string {
            node = match self.nodes[node].children.get(&symbol) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(DtNode::default());
                    self.nodes[node].children.insert(symbol, child);
                    child
                }
            };
        }
        self.nodes[node].entries.push(DemodEntry { clause, side });
        self.entry_count += 1;
    }

    /// Removes `side` of `clause` from the index.
    pub fn remove(&mut self, bank: &TermBank, clause: ClauseId, side: TermId) {
        let mut string = Vec::default();
        flatten(bank, side, &mut string);

        let mut node = 0;
        for symbol in string {
            match self.nodes[node].children.get(&symbol) {
                Some(&child) => node = child,
                None => return,
            }
        }
        let before = self.nodes[node].entries.len();
        self.nodes[node]
            .entries
            .retain(|entry| !(entry.clause == clause && entry.side == side));
        self.entry_count -= before - self.nodes[node].entries.len();
    }

    /// A count of indexed entries.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Entries whose patterns may generalize `query`.
    pub fn candidates(&self, bank: &TermBank, query: TermId) -> Vec<DemodEntry> {
        let mut out = Vec::default();
        self.walk(bank, 0, &mut vec![query], &mut out);
        out
    }

    /// Walks the tree and the query in step.
    /// `pending` holds the query subterms still to be consumed, topmost next.
    fn walk(
        &self,
        bank: &TermBank,
        node: usize,
        pending: &mut Vec<TermId>,
        out: &mut Vec<DemodEntry>,
    ) {
        let Some(current) = pending.pop() else {
            out.extend(self.nodes[node].entries.iter().copied());
            return;
        };

        // A wildcard edge consumes the subterm whole.
        if let Some(&child) = self.nodes[node].children.get(&WILDCARD) {
            self.walk(bank, child, pending, out);
        }

        let term = bank.term(current);
        if !term.is_var() {
            if let Some(&child) = self.nodes[node].children.get(&term.f_code) {
                for &arg in term.args.iter().rev() {
                    pending.push(arg);
                }
                self.walk(bank, child, pending, out);
                for _ in &term.args {
                    pending.pop();
                }
            }
        }

        pending.push(current);
    }
}
