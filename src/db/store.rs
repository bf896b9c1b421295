/*!
The clause store --- owner of every clause created during a run.

Clauses are allocated through the store and identified by [ClauseId].
A clause is never dropped from the store: killed clauses are flagged dead and unlinked from their set, but their literal lists and derivation stacks remain, so every premise referenced from a surviving derivation stays resolvable for proof extraction.
*/

use crate::{
    db::ClauseId,
    structures::{clause::Clause, eqn::Eqn, term::TermBank},
};

/// The clause store struct.
#[derive(Default)]
pub struct ClauseStore {
    /// Every clause ever created, indexed by id.
    clauses: Vec<Clause>,
}

impl ClauseStore {
    /// A fresh, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a clause over `literals`, returning its id.
    pub fn fresh(&mut self, literals: Vec<Eqn>) -> ClauseId {
        let id = self.clauses.len() as ClauseId;
        self.clauses.push(Clause::new(id, literals));
        id
    }

    /// The clause for `id`.
    ///
    /// # Panics
    /// If `id` was not handed out by this store.
    pub fn get(&self, id: ClauseId) -> &Clause {
        &self.clauses[id as usize]
    }

    /// The clause for `id`, if the id is known.
    pub fn try_get(&self, id: ClauseId) -> Option<&Clause> {
        self.clauses.get(id as usize)
    }

    /// Mutable access to the clause for `id`.
    pub fn get_mut(&mut self, id: ClauseId) -> &mut Clause {
        &mut self.clauses[id as usize]
    }

    /// A count of every clause ever created.
    pub fn count(&self) -> usize {
        self.clauses.len()
    }

    /// An iterator over every clause ever created, dead or alive.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Marks the terms of every clause as garbage collection roots.
    ///
    /// Dead clauses root their terms too: their literals may still be printed when a derivation cites them.
    pub fn gc_mark_terms(&self, bank: &mut TermBank) {
        for clause in &self.clauses {
            for literal in &clause.literals {
                bank.gc_mark(literal.lhs);
                bank.gc_mark(literal.rhs);
            }
        }
    }
}
