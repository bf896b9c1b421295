/*!
Building a proof state from problem input.

The [scanner and parser](tptp) turn text into plain syntax trees; the builder turns those into signature entries, shared terms, and clauses of the unprocessed set.
Formulas are not clausified here --- clausification belongs to an external producer --- though formula entries are archived so derivations may cite them.

Input errors leave the context unmutated from the caller's viewpoint: the offending entry is rejected before any clause of it is inserted.

# Example

```rust
# use egret_prover::config::Config;
# use egret_prover::context::Context;
let mut ctx = Context::from_config(Config::default());

let problem = "
% Two clauses, one trivial.
cnf(ax, axiom, (p(a) | ~q(X))).
cnf(taut, axiom, (X=X)).
";

ctx.read_problem(problem.as_bytes()).unwrap();
// The tautology never enters the clause sets.
assert_eq!(ctx.unprocessed.len(), 1);
```
*/

mod tptp;

use std::collections::HashMap;
use std::io::BufRead;

use tptp::{Entry, ParsedLiteral, ParsedTerm, Scanner};

use crate::{
    context::{ContextState, GenericContext},
    db::{ClauseId, FormulaId},
    misc::log::targets::{self},
    structures::{
        clause::ClauseProps,
        eqn::Eqn,
        term::{TermId, SORT_INDIVIDUAL},
    },
    types::err::{self, ErrorKind},
};

/// An archived input formula.
#[derive(Clone, Debug)]
pub struct Formula {
    /// The id of the formula.
    pub id: FormulaId,

    /// The entry language (`fof` or `tff`).
    pub language: String,

    /// The entry name.
    pub name: String,

    /// The TPTP role.
    pub role: String,

    /// The body, verbatim.
    pub text: String,
}

/// The archive of input formulas.
#[derive(Default)]
pub struct FormulaSet {
    entries: Vec<Formula>,
}

impl FormulaSet {
    /// Archives a formula, returning its id.
    pub fn add(&mut self, language: String, name: String, role: String, text: String) -> FormulaId {
        let id = self.entries.len() as FormulaId;
        self.entries.push(Formula { id, language, name, role, text });
        id
    }

    /// The formula for `id`.
    ///
    /// # Panics
    /// If `id` was not handed out by this archive.
    pub fn get(&self, id: FormulaId) -> &Formula {
        &self.entries[id as usize]
    }

    /// A count of archived formulas.
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

/// The outcome of adding a clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseOk {
    /// The clause was added to the unprocessed set.
    Added(ClauseId),

    /// The clause was recognised as a tautology and discarded.
    Tautology,
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Reads a problem --- clause entries, formula entries, and legacy bare lists --- into the context.
    ///
    /// ```rust
    /// # use egret_prover::config::Config;
    /// # use egret_prover::context::Context;
    /// let mut ctx = Context::from_config(Config::default());
    /// ctx.read_problem("cnf(a, axiom, p(c)).".as_bytes()).unwrap();
    /// ```
    pub fn read_problem(&mut self, mut reader: impl BufRead) -> Result<(), ErrorKind> {
        match self.state {
            ContextState::Configuration | ContextState::Input => {}
            _ => return Err(ErrorKind::from(err::StateError::SaturationStarted)),
        }

        let mut input = String::default();
        if reader.read_to_string(&mut input).is_err() {
            return Err(ErrorKind::from(err::ParseError::UnexpectedEnd));
        }

        let mut scanner = Scanner::new(&input);
        let mut clause_count = 0;
        while let Some(entry) = scanner.next_entry()? {
            match entry {
                Entry::Formula { language, name, role, text } => {
                    self.formulas.add(language, name, role, text);
                }

                Entry::Clause { name: _, role, literals } => {
                    let conjecture = role == "negated_conjecture";
                    self.add_parsed_clause(&literals, conjecture)?;
                    clause_count += 1;
                }
            }
        }

        log::info!(target: targets::PARSE, "Read {clause_count} clauses, {} formulas", self.formulas.count());
        self.state = ContextState::Input;
        Ok(())
    }

    /// Adds a parsed clause: symbols are registered, terms shared, built-in truth literals resolved, and the clause inserted unless trivially tautological.
    fn add_parsed_clause(
        &mut self,
        parsed: &[ParsedLiteral],
        conjecture: bool,
    ) -> Result<ClauseOk, ErrorKind> {
        let mut variables: HashMap<String, TermId> = HashMap::default();
        let mut literals: Vec<Eqn> = Vec::with_capacity(parsed.len());

        for literal in parsed {
            let lhs = self.build_term(&literal.lhs, &mut variables)?;
            let rhs = match &literal.rhs {
                Some(rhs) => self.build_term(rhs, &mut variables)?,
                None => {
                    // A plain atom: mark the top symbol as a predicate.
                    if let ParsedTerm::Fun(name, _) = &literal.lhs {
                        if let Some(code) = self.signature.code_of(name) {
                            self.signature.set_predicate(code);
                        }
                    }
                    self.terms.true_term
                }
            };

            // Truth constants simplify away at once.
            if rhs == self.terms.true_term {
                if lhs == self.terms.true_term {
                    if literal.positive {
                        return Ok(ClauseOk::Tautology);
                    }
                    continue;
                }
                if lhs == self.terms.false_term {
                    if literal.positive {
                        continue;
                    }
                    return Ok(ClauseOk::Tautology);
                }
            }

            literals.push(Eqn::new(&self.terms, lhs, rhs, literal.positive));
        }

        self.add_clause(literals, conjecture)
    }

    /// Adds a clause over already-shared literals to the unprocessed set.
    ///
    /// The clause is normalized first, and discarded (with a [Tautology](ClauseOk::Tautology) outcome) if trivially tautological --- tautologies never become members of a clause set.
    pub fn add_clause(
        &mut self,
        literals: Vec<Eqn>,
        conjecture: bool,
    ) -> Result<ClauseOk, ErrorKind> {
        let id = self.store.fresh(literals);
        {
            let clause = self.store.get_mut(id);
            clause.props |= ClauseProps::INITIAL;
            if conjecture {
                clause.props |= ClauseProps::CONJECTURE | ClauseProps::IN_SOS;
            }
        }
        self.store.get_mut(id).normalize(&self.terms);
        self.store.get_mut(id).remove_false_literals();

        if self.store.get(id).is_trivial_tautology() {
            self.store.get_mut(id).props |= ClauseProps::DEAD;
            return Ok(ClauseOk::Tautology);
        }

        // Before saturation the queues are built wholesale; afterwards each
        // arrival is enqueued as it lands.
        match self.ocb.as_ref() {
            None => self.unprocessed.insert(&mut self.store, &self.terms, id),
            Some(_) => self.insert_unprocessed(id),
        }
        Ok(ClauseOk::Added(id))
    }

    fn build_term(
        &mut self,
        parsed: &ParsedTerm,
        variables: &mut HashMap<String, TermId>,
    ) -> Result<TermId, ErrorKind> {
        match parsed {
            ParsedTerm::Var(name) => match variables.get(name) {
                Some(&id) => Ok(id),
                None => {
                    let id = self.terms.fresh_variable(SORT_INDIVIDUAL);
                    variables.insert(name.clone(), id);
                    Ok(id)
                }
            },

            ParsedTerm::Fun(name, args) => {
                let code = self.signature.insert(name, args.len())?;
                let mut arg_ids = Vec::with_capacity(args.len());
                for arg in args {
                    arg_ids.push(self.build_term(arg, variables)?);
                }
                Ok(self.terms.insert(code, arg_ids)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::context::Context;

    #[test]
    fn reading_registers_symbols_and_shares_terms() {
        let mut ctx = Context::from_config(Config::default());
        ctx.read_problem("cnf(one, axiom, (p(f(a)) | p(f(a)))).".as_bytes())
            .unwrap();

        assert_eq!(ctx.unprocessed.len(), 1);
        let id = ctx.unprocessed.first().unwrap();
        // The duplicate literal is removed on normalization.
        assert_eq!(ctx.store.get(id).len(), 1);
        assert!(ctx.signature.code_of("p").is_some());
        assert!(ctx.signature.is_predicate(ctx.signature.code_of("p").unwrap()));
    }

    #[test]
    fn arity_conflicts_surface_as_errors() {
        let mut ctx = Context::from_config(Config::default());
        let result = ctx.read_problem("cnf(one, axiom, (p(a) | p(a,a))).".as_bytes());
        assert!(matches!(
            result,
            Err(ErrorKind::Signature(err::SignatureError::ArityConflict { .. }))
        ));
    }

    #[test]
    fn truth_constants_simplify_at_once() {
        let mut ctx = Context::from_config(Config::default());
        ctx.read_problem(
            "cnf(a, axiom, ($false | p(a))).\ncnf(b, axiom, ($true | q(a))).".as_bytes(),
        )
        .unwrap();

        // The $false literal is dropped; the $true clause is a tautology.
        assert_eq!(ctx.unprocessed.len(), 1);
        let id = ctx.unprocessed.first().unwrap();
        assert_eq!(ctx.store.get(id).len(), 1);
    }

    #[test]
    fn conjecture_roles_are_flagged() {
        let mut ctx = Context::from_config(Config::default());
        ctx.read_problem("cnf(goal, negated_conjecture, ~p(a)).".as_bytes())
            .unwrap();

        let id = ctx.unprocessed.first().unwrap();
        assert!(ctx.store.get(id).is_conjecture());
        assert!(ctx.store.get(id).is_initial());
    }
}
