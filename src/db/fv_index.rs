/*!
The feature vector index, for subsumption candidate retrieval.

A clause is summarized by a fixed-width vector of small features: its positive and negative literal counts followed by bucketed occurrence counts of function symbols in positive and negative literals.
Features are *compatible with subsumption*: if clause `C` subsumes clause `D` then every feature of `C` is less than or equal to the corresponding feature of `D`.

The index is a trie over feature vectors.
Retrieval for forward subsumption descends only edges less than or equal to the query feature (candidate subsumers); retrieval for backward subsumption descends only edges greater than or equal (candidate subsumed clauses).
Candidates still require a full subsumption check --- the index only prunes.
*/

use std::collections::BTreeMap;

use crate::{
    db::ClauseId,
    structures::{clause::Clause, term::{TermBank, TermId}},
};

/// The number of symbol-occurrence buckets per polarity.
const FEATURE_BUCKETS: usize = 7;

/// The width of every feature vector.
pub const FEATURE_WIDTH: usize = 2 + 2 * FEATURE_BUCKETS;

/// The feature vector of `clause`.
pub fn feature_vector(bank: &TermBank, clause: &Clause) -> Vec<u16> {
    let mut features = vec![0u16; FEATURE_WIDTH];
    features[0] = clause.pos_count.min(u16::MAX as u32) as u16;
    features[1] = clause.neg_count.min(u16::MAX as u32) as u16;

    for literal in &clause.literals {
        let base = if literal.is_positive() {
            2
        } else {
            2 + FEATURE_BUCKETS
        };
        count_occurrences(bank, literal.lhs, &mut features[base..base + FEATURE_BUCKETS]);
        count_occurrences(bank, literal.rhs, &mut features[base..base + FEATURE_BUCKETS]);
    }

    features
}

fn count_occurrences(bank: &TermBank, term: TermId, buckets: &mut [u16]) {
    let node = bank.term(term);
    if node.is_var() {
        return;
    }
    let bucket = (node.f_code as usize) % FEATURE_BUCKETS;
    buckets[bucket] = buckets[bucket].saturating_add(1);
    for &arg in &node.args {
        count_occurrences(bank, arg, buckets);
    }
}

#[derive(Default)]
struct FvNode {
    children: BTreeMap<u16, usize>,
    entries: Vec<ClauseId>,
}

/// The feature vector index struct.
pub struct FvIndex {
    nodes: Vec<FvNode>,
}

impl Default for FvIndex {
    fn default() -> Self {
        FvIndex {
            nodes: vec![FvNode::default()],
        }
    }
}

impl FvIndex {
    /// Inserts `id` under `features`.
    pub fn insert(&mut self, features: &[u16], id: ClauseId) {
        let mut node = 0;
        for &feature in features {
            node = match self.nodes[node].children.get(&feature) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(FvNode::default());
                    self.nodes[node].children.insert(feature, child);
                    child
                }
            };
        }
        self.nodes[node].entries.push(id);
    }

    /// Removes `id` from under `features`.
    pub fn remove(&mut self, features: &[u16], id: ClauseId) {
        let mut node = 0;
        for &feature in features {
            match self.nodes[node].children.get(&feature) {
                Some(&child) => node = child,
                None => return,
            }
        }
        self.nodes[node].entries.retain(|&entry| entry != id);
    }

    /// Clause ids whose features are pointwise less than or equal to `features` --- candidates for subsuming the query clause.
    pub fn subsuming_candidates(&self, features: &[u16]) -> Vec<ClauseId> {
        let mut out = Vec::default();
        self.collect(0, features, true, &mut out);
        out
    }

    /// Clause ids whose features are pointwise greater than or equal to `features` --- candidates for being subsumed by the query clause.
    pub fn subsumed_candidates(&self, features: &[u16]) -> Vec<ClauseId> {
        let mut out = Vec::default();
        self.collect(0, features, false, &mut out);
        out
    }

    fn collect(&self, node: usize, features: &[u16], below: bool, out: &mut Vec<ClauseId>) {
        match features.split_first() {
            None => out.extend(self.nodes[node].entries.iter().copied()),
            Some((&feature, rest)) => {
                for (&edge, &child) in &self.nodes[node].children {
                    let admissible = if below { edge <= feature } else { edge >= feature };
                    if admissible {
                        self.collect(child, rest, below, out);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{eqn::Eqn, signature::Signature};

    #[test]
    fn feature_retrieval_bounds_candidates() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 1).unwrap();
        let q = sig.insert("q", 1).unwrap();
        let a = sig.insert("a", 0).unwrap();
        let mut bank = TermBank::new(&sig);

        let t_a = bank.insert(a, vec![]).unwrap();
        let t_pa = bank.insert(p, vec![t_a]).unwrap();
        let t_qa = bank.insert(q, vec![t_a]).unwrap();

        // unit: p(a).  wide: p(a) | q(a).
        let unit = Clause::new(0, vec![Eqn::new(&bank, t_pa, bank.true_term, true)]);
        let wide = Clause::new(
            1,
            vec![
                Eqn::new(&bank, t_pa, bank.true_term, true),
                Eqn::new(&bank, t_qa, bank.true_term, true),
            ],
        );

        let unit_fv = feature_vector(&bank, &unit);
        let wide_fv = feature_vector(&bank, &wide);

        let mut index = FvIndex::default();
        index.insert(&unit_fv, 0);
        index.insert(&wide_fv, 1);

        // The unit is a candidate subsumer of the wide clause, not conversely.
        assert!(index.subsuming_candidates(&wide_fv).contains(&0));
        assert!(!index.subsuming_candidates(&unit_fv).contains(&1));
        assert!(index.subsumed_candidates(&unit_fv).contains(&1));

        index.remove(&unit_fv, 0);
        assert!(!index.subsuming_candidates(&wide_fv).contains(&0));
    }
}
