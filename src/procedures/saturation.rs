/*!
The saturation loop.

The given-clause algorithm, Otter/DISCOUNT style: pick a clause from the unprocessed set, simplify it against the processed clauses, simplify the processed clauses against it, file it into the processed set matching its shape, generate every inference between it and the processed sets, and absorb the conclusions back into the unprocessed set --- until the empty clause turns up, the unprocessed set runs dry, or a budget gives out.

Roughly, the loop is as diagrammed:

```none
          +--------+
  +-----> |  pick  | ------------------> saturated, if unprocessed is empty
  |       +--------+
  |           |
  |           ⌄
  |  +------------------+
  |  | forward contract | -------------> proof, if the clause is empty
  |  +------------------+
  |           |
  |           ⌄
  |  +-------------------+     +----------+     +---------+
  |  | backward simplify |---->| classify |---->| generate|
  |  +-------------------+     +----------+     +---------+
  |                                                  |
  |       +--------+                                 |
  +-------| absorb | <-------------------------------+
          +--------+
```

Between iterations the loop polls the wall-clock deadline and the budgets, and runs periodic maintenance: copy deletion, a forward-contraction sweep over the unprocessed set, reweighting, deletion of the worst clauses under storage pressure (marking completeness lost), and term bank garbage collection.
All simplifications are sound-with-derivation, so a budget stop leaves the state queryable and every surviving derivation resolvable.
*/

use std::collections::HashMap;

use crate::{
    config::Budget,
    context::{ContextState, GenericContext},
    db::{ClauseId, SetKey},
    misc::log::targets::{self},
    ordering::Ocb,
    procedures::{
        ac::{ac_redundant_literal, scan_ac_axiom, AcAxiom},
        grounding::{Grounding, SatVerdict},
        selection::select_literals,
        splitting::split_components,
    },
    reports::Report,
    structures::{clause::ClauseProps, eqn::mark_maximality},
    types::err::ErrorKind,
};

use crate::config::SplitPolicy;

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Saturates the clause set, returning the report.
    ///
    /// The strategy is frozen on the first call: the precedence is generated, the order control block built, and the unprocessed clauses evaluated.
    pub fn saturate(&mut self) -> Result<Report, ErrorKind> {
        match self.state {
            ContextState::Configuration | ContextState::Input => self.init_saturation(),
            ContextState::Saturating => {}
            _ => return Ok(self.report()),
        }

        let timer = std::time::Instant::now();
        let mut filter_base = self.storage_estimate();
        let mut filter_copies_base = filter_base;
        let mut reweight_base = self.unprocessed.len() as u64;

        'saturation: loop {
            self.counters.iterations += 1;
            self.counters.time = timer.elapsed();

            let time_limit = self.config.time_limit.value;
            if !time_limit.is_zero() && self.counters.time > time_limit {
                self.state = ContextState::Timeout;
                break 'saturation;
            }

            if let Some(budget) = self.breached_budget() {
                log::info!(target: targets::SATURATION, "Out of budget: {budget}");
                self.state = ContextState::ResourceOut(budget);
                break 'saturation;
            }

            let ratio = self.config.pick_given_ratio.value;
            let bias = self.config.random_channel_bias.value;
            let Some(given) = self.queues.pick(&self.unprocessed, ratio, bias, &mut self.rng)
            else {
                // Exhaustion after a proof (possible under a multi-answer limit) stays a proof.
                if self.empty_clauses.is_empty() {
                    self.state = if self.complete {
                        ContextState::Satisfiable
                    } else {
                        ContextState::GaveUp
                    };
                }
                break 'saturation;
            };

            if let Some(empty) = self.process_clause(given)? {
                self.empty_clauses.push(empty);
                self.state = ContextState::Proof(empty);
                if self.empty_clauses.len() as u64 >= self.config.answer_limit.value {
                    break 'saturation;
                }
            }

            // Periodic maintenance.
            let mut storage = self.storage_estimate();
            filter_copies_base = filter_copies_base.min(storage);
            if storage - filter_copies_base > self.config.filter_copies_limit.value {
                let deleted = self.delete_unprocessed_copies();
                log::info!(target: targets::SATURATION, "Deleted {deleted} clause copies");
                self.counters.other_redundant += deleted;
                storage = self.storage_estimate();
                filter_copies_base = storage;
            }

            filter_base = filter_base.min(storage);
            if storage - filter_base > self.config.filter_limit.value {
                if let Some(empty) = self.forward_contract_unprocessed()? {
                    self.empty_clauses.push(empty);
                    self.state = ContextState::Proof(empty);
                    break 'saturation;
                }
                storage = self.storage_estimate();
                filter_base = storage;
            }

            reweight_base = reweight_base.min(self.unprocessed.len() as u64);
            if self.unprocessed.len() as u64 - reweight_base > self.config.reweight_limit.value {
                self.reweight_unprocessed();
                reweight_base = self.unprocessed.len() as u64;
            }

            if storage > self.config.delete_bad_limit.value {
                let victims = self.unprocessed.len() / 2;
                let deleted = self.delete_bad_clauses(victims);
                log::info!(target: targets::SATURATION, "Deleted {deleted} bad clauses (completeness lost)");
                self.counters.non_redundant_deleted += deleted;
                self.complete = false;
                self.collect_term_garbage();
            }

            let interval = self.config.sat_check_interval.value;
            if interval > 0 && self.counters.iterations as u64 % interval == 0 {
                if let Some(empty) = self.propositional_check()? {
                    self.empty_clauses.push(empty);
                    self.state = ContextState::Proof(empty);
                    break 'saturation;
                }
            }
        }

        Ok(self.report())
    }

    /// Freezes the strategy: alphabetic ranks, the order control block, and the initial queue evaluations.
    fn init_saturation(&mut self) {
        self.signature.refresh_alpha_ranks();
        self.ocb = Some(Ocb::new(
            &self.signature,
            &self.config.precedence,
            self.config.fun_weight.value,
            self.config.var_weight.value,
            self.config.lpo_recursion_limit.value,
        ));
        self.state = ContextState::Saturating;

        for id in self.unprocessed.member_vec() {
            let ocb = self.ocb.as_ref().expect("! Ordering unset");
            let evaluation = self.store.get(id).heuristic_weight(ocb, &self.terms);
            self.store.get_mut(id).evaluation = evaluation;
            self.queues.enqueue(id, evaluation);
        }
    }

    /// The first budget breached, if any.
    fn breached_budget(&self) -> Option<Budget> {
        let config = &self.config;
        if self.counters.processed as u64 >= config.step_limit.value {
            return Some(Budget::Steps);
        }
        if self.processed_count() as u64 >= config.processed_limit.value {
            return Some(Budget::Processed);
        }
        if self.unprocessed.len() as u64 >= config.unprocessed_limit.value {
            return Some(Budget::Unprocessed);
        }
        if self.total_clause_count() as u64 >= config.total_limit.value {
            return Some(Budget::Total);
        }
        if self.counters.generated as u64 >= config.generated_limit.value {
            return Some(Budget::Generated);
        }
        if self.terms.node_count() as u64 >= config.term_node_limit.value {
            return Some(Budget::TermNodes);
        }
        None
    }

    /// One iteration of the given-clause algorithm over `given`.
    ///
    /// Returns the empty clause if one was derived.
    fn process_clause(&mut self, given: ClauseId) -> Result<Option<ClauseId>, ErrorKind> {
        log::debug!(target: targets::SATURATION, "Given clause {given}");
        self.unprocessed.extract(&mut self.store, &self.terms, given);
        self.counters.processed += 1;
        self.store.get_mut(given).props |= ClauseProps::PROCESSED;

        if self.forward_contract(given)?.is_some() {
            return Ok(None);
        }
        if self.store.get(given).is_empty() {
            return Ok(Some(given));
        }
        self.counters.proc_non_trivial += 1;

        self.check_ac_status(given)?;

        if self.config.split_clauses.value == SplitPolicy::Components {
            let mut pieces = Vec::default();
            if split_components(&mut self.terms, &mut self.signature, &self.store, given, &mut pieces)? {
                for piece in pieces {
                    let id = self.store.fresh(piece.literals);
                    let clause = self.store.get_mut(id);
                    clause.push_derivation(piece.step);
                    clause.create_date = self.counters.proc_non_trivial as u64;
                    clause.normalize(&self.terms);
                    self.counters.generated += 1;
                    self.tmp_store.push(id);
                }
                self.store.get_mut(given).props |= ClauseProps::DEAD;
                return self.absorb_temporaries();
            }
        }

        self.backward_simplify(given)?;

        // Orient, select, and cache maximality, then file the clause by shape.
        {
            let ocb = self.ocb.as_ref().expect("! Ordering unset");
            let mut lits = std::mem::take(&mut self.store.get_mut(given).literals);
            for lit in lits.iter_mut() {
                lit.orient(ocb, &self.terms);
            }
            select_literals(
                self.config.literal_selection.value,
                ocb,
                &self.terms,
                &self.signature,
                &mut lits,
            );
            mark_maximality(ocb, &self.terms, &mut lits);
            self.store.get_mut(given).literals = lits;
        }
        self.store.get_mut(given).date = self.demod_date;

        match self.classify(given) {
            SetKey::PosRules => {
                self.demod_date += 1;
                self.pos_rules.date = self.demod_date;
                self.pos_rules.insert(&mut self.store, &self.terms, given);
            }
            SetKey::PosEqns => {
                self.demod_date += 1;
                self.pos_eqns.date = self.demod_date;
                self.pos_eqns.insert(&mut self.store, &self.terms, given);
            }
            SetKey::NegUnits => self.neg_units.insert(&mut self.store, &self.terms, given),
            _ => self.non_units.insert(&mut self.store, &self.terms, given),
        }

        self.generate_inferences(given)?;
        self.absorb_temporaries()
    }

    /// Drains the temporary store into unprocessed, forward-contracting each clause.
    fn absorb_temporaries(&mut self) -> Result<Option<ClauseId>, ErrorKind> {
        while let Some(id) = self.tmp_store.pop() {
            if self.forward_contract(id)?.is_some() {
                continue;
            }
            if self.store.get(id).is_empty() {
                return Ok(Some(id));
            }
            self.insert_unprocessed(id);
        }
        Ok(None)
    }

    /// Watches for AC axioms; on completing a symbol's axiom set, flips AC handling live and sends affected processed clauses back for revalidation.
    fn check_ac_status(&mut self, given: ClauseId) -> Result<(), ErrorKind> {
        if !self.config.ac_handling.value {
            return Ok(());
        }
        let Some((code, axiom)) = scan_ac_axiom(&self.terms, &self.store.get(given).literals)
        else {
            return Ok(());
        };

        let seen = self.ac_seen.entry(code).or_insert((false, false));
        match axiom {
            AcAxiom::Commutativity => seen.0 = true,
            AcAxiom::Associativity => seen.1 = true,
        }
        if !(seen.0 && seen.1) || self.signature.is_ac(code) {
            return Ok(());
        }

        self.signature.set_ac(code);
        self.ac_active = true;
        log::info!(target: targets::SATURATION, "AC handling enabled for {}", self.signature.name(code));

        // Conservative revalidation: clauses holding an AC-redundant literal go back to unprocessed.
        let mut worklist: Vec<(SetKey, ClauseId)> = Vec::default();
        for key in [SetKey::PosRules, SetKey::PosEqns, SetKey::NegUnits, SetKey::NonUnits] {
            let members = match key {
                SetKey::PosRules => self.pos_rules.member_vec(),
                SetKey::PosEqns => self.pos_eqns.member_vec(),
                SetKey::NegUnits => self.neg_units.member_vec(),
                _ => self.non_units.member_vec(),
            };
            for member in members {
                if self.store.get(member).is_unit() {
                    continue;
                }
                let lits = self.store.get(member).literals.clone();
                for lit in &lits {
                    if ac_redundant_literal(&mut self.terms, &self.signature, lit)? {
                        worklist.push((key, member));
                        break;
                    }
                }
            }
        }
        for (key, member) in worklist {
            match key {
                SetKey::PosRules => self.pos_rules.extract(&mut self.store, &self.terms, member),
                SetKey::PosEqns => self.pos_eqns.extract(&mut self.store, &self.terms, member),
                SetKey::NegUnits => self.neg_units.extract(&mut self.store, &self.terms, member),
                _ => self.non_units.extract(&mut self.store, &self.terms, member),
            }
            self.store.get_mut(member).props -= ClauseProps::PROCESSED;
            self.insert_unprocessed(member);
        }
        Ok(())
    }

    /// Deletes duplicate unprocessed clauses, up to variable renaming.
    fn delete_unprocessed_copies(&mut self) -> usize {
        let mut seen: HashMap<Vec<i64>, ClauseId> = HashMap::default();
        let mut copies: Vec<ClauseId> = Vec::default();

        for id in self.unprocessed.member_vec() {
            let signature = self.canonical_signature(id);
            if seen.contains_key(&signature) {
                copies.push(id);
            } else {
                seen.insert(signature, id);
            }
        }

        let deleted = copies.len();
        for id in copies {
            self.unprocessed.extract(&mut self.store, &self.terms, id);
            self.store.get_mut(id).props |= ClauseProps::DEAD;
        }
        deleted
    }

    /// A canonical serialization of a clause: signs and preorder symbol strings, variables numbered by first occurrence.
    fn canonical_signature(&self, id: ClauseId) -> Vec<i64> {
        let mut out: Vec<i64> = Vec::default();
        let mut renaming: HashMap<crate::structures::term::TermId, i64> = HashMap::default();

        fn serialize(
            ctx_terms: &crate::structures::term::TermBank,
            term: crate::structures::term::TermId,
            renaming: &mut HashMap<crate::structures::term::TermId, i64>,
            out: &mut Vec<i64>,
        ) {
            let node = ctx_terms.term(term);
            if node.is_var() {
                let next = -(renaming.len() as i64) - 1;
                let code: i64 = *renaming.entry(term).or_insert(next);
                out.push(code);
                return;
            }
            out.push(node.f_code);
            for &arg in &node.args {
                serialize(ctx_terms, arg, renaming, out);
            }
        }

        for lit in &self.store.get(id).literals {
            out.push(if lit.is_positive() { 1 } else { 0 });
            serialize(&self.terms, lit.lhs, &mut renaming, &mut out);
            serialize(&self.terms, lit.rhs, &mut renaming, &mut out);
        }
        out
    }

    /// A full forward-contraction sweep over the unprocessed set.
    fn forward_contract_unprocessed(&mut self) -> Result<Option<ClauseId>, ErrorKind> {
        for id in self.unprocessed.member_vec() {
            self.unprocessed.extract(&mut self.store, &self.terms, id);
            if self.forward_contract(id)?.is_some() {
                self.counters.other_redundant += 1;
                continue;
            }
            if self.store.get(id).is_empty() {
                return Ok(Some(id));
            }
            self.insert_unprocessed(id);
        }
        Ok(None)
    }

    /// Recomputes the evaluation of every unprocessed clause and rebuilds the queues.
    fn reweight_unprocessed(&mut self) {
        log::info!(target: targets::SATURATION, "Reweighting unprocessed clauses");
        self.queues.clear();
        for id in self.unprocessed.member_vec() {
            let ocb = self.ocb.as_ref().expect("! Ordering unset");
            let evaluation = self.store.get(id).heuristic_weight(ocb, &self.terms);
            self.store.get_mut(id).evaluation = evaluation;
            self.queues.enqueue(id, evaluation);
        }
    }

    /// Deletes the `count` worst unprocessed clauses by evaluation.
    fn delete_bad_clauses(&mut self, count: usize) -> usize {
        let mut members = self.unprocessed.member_vec();
        members.sort_by_key(|&id| std::cmp::Reverse(self.store.get(id).evaluation));
        members.truncate(count);

        for &id in &members {
            self.unprocessed.extract(&mut self.store, &self.terms, id);
            self.store.get_mut(id).props |= ClauseProps::DEAD;
        }
        members.len()
    }

    /// Submits the propositional abstraction of the live clauses to the SAT collaborator.
    ///
    /// An unsatisfiable verdict yields the empty clause, derived from the core's parents.
    pub fn propositional_check(&mut self) -> Result<Option<ClauseId>, ErrorKind> {
        if self.sat_collaborator.is_none() {
            return Ok(None);
        }

        let mut ids: Vec<ClauseId> = self.unprocessed.member_vec();
        ids.extend(self.pos_rules.iter());
        ids.extend(self.pos_eqns.iter());
        ids.extend(self.neg_units.iter());
        ids.extend(self.non_units.iter());

        let mut grounding = Grounding::prepare(
            self.config.grounding.value,
            &mut self.terms,
            &mut self.signature,
            &self.store,
            &ids,
        )?;
        let clauses = grounding.translate(&mut self.terms, &self.store, &ids)?;
        self.counters.sat_checks += 1;

        let collaborator = self.sat_collaborator.as_mut().expect("! Collaborator checked");
        match collaborator.check(&clauses) {
            SatVerdict::Satisfiable | SatVerdict::Unknown => Ok(None),

            SatVerdict::Unsatisfiable(core) => {
                log::info!(target: targets::GROUNDING, "Unsatisfiable core of {} clauses", core.len());
                let empty = self.store.fresh(Vec::default());
                let mut parents: Vec<ClauseId> = Vec::default();
                for index in core {
                    if let Some(sat_clause) = clauses.get(index) {
                        if !parents.contains(&sat_clause.parent) {
                            parents.push(sat_clause.parent);
                        }
                    }
                }
                for parent in parents {
                    self.store
                        .get_mut(empty)
                        .push_derivation(crate::derivation::DerivationStep::GroundSat(parent));
                }
                Ok(Some(empty))
            }
        }
    }
}
