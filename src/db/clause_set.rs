/*!
Clause sets --- the working sets of the given-clause loop.

A set records its members in id order (ids are handed out monotonically, so id order is insertion order for freshly created clauses).
Each member clause records the [SetKey](crate::db::SetKey) of its owning set; insertion and extraction keep the two views consistent, and a clause is a member of at most one set at a time.

A set may carry auxiliary indices, built on demand:

- a [feature vector index](crate::db::fv_index) for subsumption candidate retrieval,
- a [demodulator index](crate::db::demod_index) over the maximal sides of positive unit equations.

Indices reflect the current membership: both are updated on every insert and extract.
*/

use std::collections::BTreeSet;

use crate::{
    db::{
        demod_index::{DemodEntry, DemodIndex},
        fv_index::{feature_vector, FvIndex},
        store::ClauseStore,
        ClauseId, SetKey,
    },
    misc::log::targets::{self},
    structures::term::{Date, TermBank, TermId},
};

/// A clause set.
pub struct ClauseSet {
    /// The key naming this set.
    key: SetKey,

    /// Members in id order.
    members: BTreeSet<ClauseId>,

    /// A count of literals over all members.
    literal_count: usize,

    /// The date of the youngest demodulator inserted into the set.
    pub date: Date,

    /// The subsumption index, if the set carries one.
    fv_index: Option<FvIndex>,

    /// The demodulator index, if the set carries one.
    demod_index: Option<DemodIndex>,
}

impl ClauseSet {
    /// A fresh set named by `key`, with no indices.
    pub fn new(key: SetKey) -> Self {
        ClauseSet {
            key,
            members: BTreeSet::default(),
            literal_count: 0,
            date: 0,
            fv_index: None,
            demod_index: None,
        }
    }

    /// Attaches a feature vector index.
    pub fn with_fv_index(mut self) -> Self {
        self.fv_index = Some(FvIndex::default());
        self
    }

    /// Attaches a demodulator index.
    pub fn with_demod_index(mut self) -> Self {
        self.demod_index = Some(DemodIndex::default());
        self
    }

    /// The key naming this set.
    pub fn key(&self) -> SetKey {
        self.key
    }

    /// A count of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A count of literals over all members.
    pub fn literal_count(&self) -> usize {
        self.literal_count
    }

    /// True if `id` is a member.
    pub fn contains(&self, id: ClauseId) -> bool {
        self.members.contains(&id)
    }

    /// Members in id order.
    pub fn iter(&self) -> impl Iterator<Item = ClauseId> + '_ {
        self.members.iter().copied()
    }

    /// Members collected into a vector, for iteration while the set is mutated.
    pub fn member_vec(&self) -> Vec<ClauseId> {
        self.members.iter().copied().collect()
    }

    /// The member with the smallest id.
    pub fn first(&self) -> Option<ClauseId> {
        self.members.first().copied()
    }

    /// Inserts `id`.
    ///
    /// The clause must not be a member of any set.
    pub fn insert(&mut self, store: &mut ClauseStore, bank: &TermBank, id: ClauseId) {
        let clause = store.get_mut(id);
        debug_assert!(clause.set.is_none(), "Clause already owned by a set");
        clause.set = Some(self.key);

        let clause = store.get(id);
        self.literal_count += clause.len();

        if let Some(fv) = &mut self.fv_index {
            fv.insert(&feature_vector(bank, clause), id);
        }
        if let Some(demod) = &mut self.demod_index {
            if clause.is_demodulator() {
                for side in demod_sides(store, id) {
                    demod.insert(bank, id, side);
                }
            }
        }

        let inserted = self.members.insert(id);
        debug_assert!(inserted);
    }

    /// Extracts `id`, clearing its membership record.
    pub fn extract(&mut self, store: &mut ClauseStore, bank: &TermBank, id: ClauseId) {
        let removed = self.members.remove(&id);
        if !removed {
            log::warn!(target: targets::CLAUSE_SET, "Extraction of non-member {id} from {}", self.key);
            return;
        }

        let clause = store.get(id);
        self.literal_count -= clause.len();

        if let Some(fv) = &mut self.fv_index {
            fv.remove(&feature_vector(bank, clause), id);
        }
        if let Some(demod) = &mut self.demod_index {
            if clause.is_demodulator() {
                for side in demod_sides(store, id) {
                    demod.remove(bank, id, side);
                }
            }
        }

        store.get_mut(id).set = None;
    }

    /// Candidate subsumers of `id` among the members, via the feature vector index.
    pub fn subsuming_candidates(&self, store: &ClauseStore, bank: &TermBank, id: ClauseId) -> Vec<ClauseId> {
        match &self.fv_index {
            Some(fv) => fv.subsuming_candidates(&feature_vector(bank, store.get(id))),
            None => self.member_vec(),
        }
    }

    /// Candidates for being subsumed by `id` among the members, via the feature vector index.
    pub fn subsumed_candidates(&self, store: &ClauseStore, bank: &TermBank, id: ClauseId) -> Vec<ClauseId> {
        match &self.fv_index {
            Some(fv) => fv.subsumed_candidates(&feature_vector(bank, store.get(id))),
            None => self.member_vec(),
        }
    }

    /// Candidate demodulator entries generalizing `query`, via the demodulator index.
    pub fn demod_candidates(&self, bank: &TermBank, query: TermId) -> Vec<DemodEntry> {
        match &self.demod_index {
            Some(demod) => demod.candidates(bank, query),
            None => Vec::default(),
        }
    }
}

/// The sides of a demodulator to index: the maximal side of an oriented equation, both sides otherwise.
fn demod_sides(store: &ClauseStore, id: ClauseId) -> Vec<TermId> {
    let literal = &store.get(id).literals[0];
    if literal.is_oriented() {
        vec![literal.lhs]
    } else {
        vec![literal.lhs, literal.rhs]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{eqn::Eqn, signature::Signature};

    #[test]
    fn membership_and_backpointers_stay_consistent() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 0).unwrap();
        let mut bank = TermBank::new(&sig);
        let mut store = ClauseStore::new();

        let t_p = bank.insert(p, vec![]).unwrap();
        let literal = Eqn::new(&bank, t_p, bank.true_term, true);
        let id = store.fresh(vec![literal]);

        let mut set = ClauseSet::new(SetKey::Unprocessed);
        set.insert(&mut store, &bank, id);

        assert!(set.contains(id));
        assert_eq!(store.get(id).set, Some(SetKey::Unprocessed));
        assert_eq!(set.literal_count(), 1);

        set.extract(&mut store, &bank, id);
        assert!(!set.contains(id));
        assert_eq!(store.get(id).set, None);
        assert_eq!(set.literal_count(), 0);
    }
}
