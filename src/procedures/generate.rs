/*!
Generation --- applying the generating inferences to the given clause.

Equality factoring and equality resolution work on the given clause alone; paramodulation overlaps the given clause with every processed clause, in both directions.
A purely negative given clause holds no equation to paramodulate from, and is never overlapped with the negative units --- no inference between two such clauses exists.

Conclusions become clauses of the store, stamped, recorded, and pushed onto the temporary store for absorption.
*/

use crate::{
    context::GenericContext,
    db::{ClauseId, SetKey},
    misc::log::targets::{self},
    procedures::{
        factoring::{equality_factors, equality_resolvents},
        paramod::{paramodulants, Generated},
    },
    types::err::ErrorKind,
};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Applies all generating inferences between `given` and the processed sets.
    pub fn generate_inferences(&mut self, given: ClauseId) -> Result<(), ErrorKind> {
        let ocb = self.ocb.as_ref().expect("! Ordering unset");
        let variant = self.config.paramod_variant.value;
        let mut generated: Vec<Generated> = Vec::default();

        equality_factors(ocb, &mut self.terms, &self.store, given, &mut generated)?;
        let factors = generated.len();
        self.counters.factor += factors;

        equality_resolvents(ocb, &mut self.terms, &self.store, given, &mut generated)?;
        self.counters.resolvents += generated.len() - factors;

        let before_paramod = generated.len();
        let negative_given = self.store.get(given).is_negative();
        for key in [SetKey::PosRules, SetKey::PosEqns, SetKey::NegUnits, SetKey::NonUnits] {
            if key == SetKey::NegUnits && negative_given {
                // No overlap exists between purely negative clauses.
                continue;
            }
            let partners: Vec<ClauseId> = match key {
                SetKey::PosRules => self.pos_rules.member_vec(),
                SetKey::PosEqns => self.pos_eqns.member_vec(),
                SetKey::NegUnits => self.neg_units.member_vec(),
                SetKey::NonUnits => self.non_units.member_vec(),
                _ => unreachable!(),
            };

            for partner in partners {
                paramodulants(ocb, &mut self.terms, &self.store, variant, given, partner, &mut generated)?;
                if partner != given {
                    paramodulants(ocb, &mut self.terms, &self.store, variant, partner, given, &mut generated)?;
                }
            }
        }
        self.counters.paramod += generated.len() - before_paramod;

        log::debug!(target: targets::SATURATION, "Generated {} clauses from {given}", generated.len());
        for conclusion in generated {
            let id = self.store.fresh(conclusion.literals);
            let clause = self.store.get_mut(id);
            clause.push_derivation(conclusion.step);
            clause.create_date = self.counters.proc_non_trivial as u64;
            clause.normalize(&self.terms);
            clause.remove_false_literals();

            self.counters.generated += 1;
            self.counters.generated_literals += self.store.get(id).len();
            self.tmp_store.push(id);
        }

        Ok(())
    }
}
