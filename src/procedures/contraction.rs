/*!
Contraction --- the simplification discipline of the given-clause loop.

*Forward* contraction simplifies one clause against the processed sets: demodulation, AC-redundancy cuts, destructive equality resolution, simplify-reflect literal cuts against unit clauses, triviality and tautology checks, and forward subsumption.
Every simplification which keeps the clause alive appends a derivation step; a deletion needs none, being justified by the surviving subsumer.

*Backward* contraction turns the tables: a freshly processed clause simplifies the processed sets.
Clauses it reaches --- rewritable by it as a demodulator, or cuttable against it as a unit --- are returned to the unprocessed set to be re-simplified when next picked; clauses it subsumes are deleted.
Affected clauses are collected into worklists first, so no set is mutated while under iteration.
*/

use crate::{
    context::GenericContext,
    db::{ClauseId, SetKey},
    derivation::DerivationStep,
    misc::log::targets::{self},
    procedures::{
        ac::ac_redundant_literal,
        factoring::destructive_equality_resolution,
        rewriting::{rewrite_literals, term_is_rewritable},
        subsumption::{subsumes, unit_cuts_literal, unit_subsumes_literal},
        tautology::is_tautology,
    },
    structures::clause::ClauseProps,
    types::err::ErrorKind,
};

/// Why forward contraction retired a clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retirement {
    /// The clause is a tautology.
    Tautology,

    /// The clause is subsumed by a processed clause.
    Subsumed,
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Forward-contracts `id` against the processed sets.
    ///
    /// Returns `None` if the clause survives (possibly simplified, possibly empty), or the reason it was retired.
    /// The clause must not be a member of any set.
    pub fn forward_contract(&mut self, id: ClauseId) -> Result<Option<Retirement>, ErrorKind> {
        debug_assert!(self.store.get(id).set.is_none());

        let mut steps: Vec<DerivationStep> = Vec::default();
        let mut lits = std::mem::take(&mut self.store.get_mut(id).literals);

        // Demodulation.
        if let Some(level) = self.config.forward_demod.value.level() {
            let ocb = self.ocb.as_ref().expect("! Ordering unset");
            let used = rewrite_literals(
                ocb,
                &mut self.terms,
                &self.store,
                &self.pos_rules,
                &self.pos_eqns,
                &mut lits,
                level,
                self.demod_date,
            )?;
            for demod in used {
                let step = DerivationStep::Rewrite(demod);
                if !steps.contains(&step) {
                    steps.push(step);
                }
            }
        }

        // Trivially false literals.
        lits.retain(|lit| !(lit.is_negative() && lit.is_trivial()));

        // AC-redundant literals. Units are kept: the AC axioms themselves stay live.
        if self.ac_active && lits.len() > 1 {
            let mut kept = Vec::with_capacity(lits.len());
            let mut cut = false;
            let mut tautological = false;
            for lit in lits.drain(..) {
                if ac_redundant_literal(&mut self.terms, &self.signature, &lit)? {
                    if lit.is_positive() {
                        tautological = true;
                        break;
                    }
                    cut = true;
                    continue;
                }
                kept.push(lit);
            }
            if tautological {
                self.store.get_mut(id).literals = kept;
                return Ok(self.retire(id, steps, Retirement::Tautology));
            }
            if cut {
                steps.push(DerivationStep::AcRes);
            }
            lits = kept;
        }

        // Destructive equality resolution.
        if self.config.destructive_er.value {
            let resolved = destructive_equality_resolution(&mut self.terms, &mut lits)?;
            if resolved > 0 {
                steps.push(DerivationStep::DesEqRes);
            }
        }

        // Simplify-reflect against processed units: cuts and unit subsumption.
        let pos_units: Vec<ClauseId> = self.pos_rules.iter().chain(self.pos_eqns.iter()).collect();
        let neg_units: Vec<ClauseId> = self.neg_units.iter().collect();

        let mut index = 0;
        'literal: while index < lits.len() {
            let lit = &lits[index];
            let (same_sign, opposite) = if lit.is_positive() {
                (pos_units.as_slice(), neg_units.as_slice())
            } else {
                (neg_units.as_slice(), pos_units.as_slice())
            };

            for &unit_id in same_sign {
                if unit_id == id {
                    continue;
                }
                let unit = &self.store.get(unit_id).literals[0];
                if unit_subsumes_literal(&self.terms, unit, lit) {
                    self.store.get_mut(id).literals = lits;
                    self.counters.forward_subsumed += 1;
                    return Ok(self.retire(id, steps, Retirement::Subsumed));
                }
            }

            for &unit_id in opposite {
                if unit_id == id {
                    continue;
                }
                let unit = &self.store.get(unit_id).literals[0];
                if unit_cuts_literal(&self.terms, unit, lit) {
                    lits.remove(index);
                    steps.push(DerivationStep::SR(unit_id));
                    self.counters.unit_simplified += 1;
                    continue 'literal;
                }
            }

            index += 1;
        }

        // Normalize and run the tautology tests.
        self.store.get_mut(id).literals = lits;
        for step in steps {
            self.store.get_mut(id).push_derivation(step);
        }
        self.store.get_mut(id).normalize(&self.terms);

        let clause = self.store.get(id);
        if clause.is_empty() {
            return Ok(None);
        }
        if clause.is_trivial_tautology()
            || is_tautology(&mut self.terms, self.store.get(id), self.config.tautology_check_max_neg.value)?
        {
            return Ok(self.retire(id, Vec::default(), Retirement::Tautology));
        }

        // Forward subsumption against the processed non-units and negative units.
        let mut candidates = self
            .non_units
            .subsuming_candidates(&self.store, &self.terms, id);
        candidates.extend(self.neg_units.subsuming_candidates(&self.store, &self.terms, id));
        for candidate in candidates {
            if candidate == id {
                continue;
            }
            if subsumes(&self.terms, self.store.get(candidate), self.store.get(id)) {
                self.counters.forward_subsumed += 1;
                return Ok(self.retire(id, Vec::default(), Retirement::Subsumed));
            }
        }

        Ok(None)
    }

    /// Marks `id` dead, keeping any simplification steps already earned.
    fn retire(
        &mut self,
        id: ClauseId,
        steps: Vec<DerivationStep>,
        reason: Retirement,
    ) -> Option<Retirement> {
        if reason == Retirement::Tautology {
            self.counters.tautologies += 1;
        }
        let clause = self.store.get_mut(id);
        for step in steps {
            clause.push_derivation(step);
        }
        clause.props |= ClauseProps::DEAD;
        log::trace!(target: targets::SATURATION, "Retired {id}: {reason:?}");
        Some(reason)
    }

    /// Backward-simplifies the processed sets with the freshly processed `id`.
    ///
    /// The clause must not (yet) be a member of a processed set.
    pub fn backward_simplify(&mut self, id: ClauseId) -> Result<(), ErrorKind> {
        self.backward_rewrite(id)?;
        self.backward_subsume(id);
        self.backward_unit_cut(id);
        Ok(())
    }

    /// Returns processed clauses rewritable by the demodulator `id` to the unprocessed set.
    fn backward_rewrite(&mut self, id: ClauseId) -> Result<(), ErrorKind> {
        if !self.store.get(id).is_demodulator() {
            return Ok(());
        }
        let ocb = self.ocb.as_ref().expect("! Ordering unset");

        let mut worklist: Vec<(SetKey, ClauseId)> = Vec::default();
        for key in [SetKey::PosRules, SetKey::PosEqns, SetKey::NegUnits, SetKey::NonUnits] {
            let members = self.processed_set(key).member_vec();
            for member in members {
                if member == id {
                    continue;
                }
                let rewritable = self.store.get(member).literals.iter().any(|lit| {
                    term_is_rewritable(ocb, &self.terms, &self.store, id, lit.lhs)
                        || term_is_rewritable(ocb, &self.terms, &self.store, id, lit.rhs)
                });
                if rewritable {
                    worklist.push((key, member));
                }
            }
        }

        for (key, member) in worklist {
            self.remove_from_processed(key, member);
            self.counters.backward_rewritten += 1;
            self.insert_unprocessed(member);
        }
        Ok(())
    }

    /// Deletes processed clauses subsumed by `id`.
    fn backward_subsume(&mut self, id: ClauseId) {
        let mut victims: Vec<(SetKey, ClauseId)> = Vec::default();

        for candidate in self.non_units.subsumed_candidates(&self.store, &self.terms, id) {
            victims.push((SetKey::NonUnits, candidate));
        }
        for candidate in self.neg_units.subsumed_candidates(&self.store, &self.terms, id) {
            victims.push((SetKey::NegUnits, candidate));
        }
        // The positive unit sets carry no feature index; they are small and scanned.
        if self.store.get(id).is_demodulator() {
            for key in [SetKey::PosRules, SetKey::PosEqns] {
                for member in self.processed_set(key).member_vec() {
                    victims.push((key, member));
                }
            }
        }

        for (key, victim) in victims {
            if victim == id || !self.processed_set(key).contains(victim) {
                continue;
            }
            if subsumes(&self.terms, self.store.get(id), self.store.get(victim)) {
                self.remove_from_processed(key, victim);
                self.store.get_mut(victim).props |= ClauseProps::DEAD;
                self.counters.backward_subsumed += 1;
                log::trace!(target: targets::SUBSUMPTION, "Backward subsumed {victim} by {id}");
            }
        }
    }

    /// Returns processed clauses with a literal cut by the unit `id` to the unprocessed set.
    fn backward_unit_cut(&mut self, id: ClauseId) {
        if !self.store.get(id).is_unit() {
            return;
        }

        let mut worklist: Vec<(SetKey, ClauseId)> = Vec::default();
        for key in [SetKey::PosRules, SetKey::PosEqns, SetKey::NegUnits, SetKey::NonUnits] {
            for member in self.processed_set(key).member_vec() {
                if member == id {
                    continue;
                }
                let unit = &self.store.get(id).literals[0];
                let cut = self
                    .store
                    .get(member)
                    .literals
                    .iter()
                    .any(|lit| unit_cuts_literal(&self.terms, unit, lit));
                if cut {
                    worklist.push((key, member));
                }
            }
        }

        for (key, member) in worklist {
            self.remove_from_processed(key, member);
            self.counters.unit_simplified += 1;
            self.insert_unprocessed(member);
        }
    }

    /// The processed set for `key`.
    fn processed_set(&self, key: SetKey) -> &crate::db::ClauseSet {
        match key {
            SetKey::PosRules => &self.pos_rules,
            SetKey::PosEqns => &self.pos_eqns,
            SetKey::NegUnits => &self.neg_units,
            SetKey::NonUnits => &self.non_units,
            _ => unreachable!("! Not a processed set: {key}"),
        }
    }

    /// Extracts `member` from the processed set for `key`.
    fn remove_from_processed(&mut self, key: SetKey, member: ClauseId) {
        let (store, terms) = (&mut self.store, &self.terms);
        match key {
            SetKey::PosRules => self.pos_rules.extract(store, terms, member),
            SetKey::PosEqns => self.pos_eqns.extract(store, terms, member),
            SetKey::NegUnits => self.neg_units.extract(store, terms, member),
            SetKey::NonUnits => self.non_units.extract(store, terms, member),
            _ => unreachable!("! Not a processed set: {key}"),
        }
        self.store.get_mut(member).props -= ClauseProps::PROCESSED;
    }

    /// Inserts `id` into the unprocessed set, evaluating and enqueuing it.
    pub fn insert_unprocessed(&mut self, id: ClauseId) {
        let ocb = self.ocb.as_ref().expect("! Ordering unset");
        let evaluation = self.store.get(id).heuristic_weight(ocb, &self.terms);
        self.store.get_mut(id).evaluation = evaluation;
        self.unprocessed.insert(&mut self.store, &self.terms, id);
        self.queues.enqueue(id, evaluation);
    }
}
