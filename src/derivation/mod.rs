/*!
Derivations --- how each clause came to be.

Every clause carries a *derivation stack*: a sequence of [steps](DerivationStep), each an operation code with typed references to its premises.
A generating inference pushes one step naming its parents; each simplification appends a step naming the side premise (the simplified clause itself is the implicit main premise).

After a refutation (or for any set of roots) a [Derivation] is computed: the premise closure is gathered breadth-first, ordered topologically so premises precede conclusions, and renumbered in dependency order.
Premise cycles are impossible --- every premise of a clause predates it.

Printing emits one record per node:

```none
cnf(c_7, plain, (X1=e|~p(X1)), inference(paramod, [status(thm)], [c_3, c_4])).
```
*/

use std::collections::{HashMap, HashSet};
use std::io::Write;

use crate::{
    builder::FormulaSet,
    db::{store::ClauseStore, ClauseId, FormulaId},
    misc::log::targets::{self},
    structures::{clause::ClauseView, signature::Signature, term::TermBank},
    types::err::{self},
};

/// A reference to a premise of a derivation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Premise {
    /// A clause premise.
    Clause(ClauseId),

    /// An archived formula premise.
    Formula(FormulaId),
}

/// A single derivation step.
///
/// Simplifying steps leave the owning clause implicit and reference only the side premise.
/// Generating steps carry every parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DerivationStep {
    /// The clause quotes an input clause.
    CnfQuote(ClauseId),

    /// The clause quotes (the clausification of) an archived formula.
    FofQuote(FormulaId),

    /// Rewriting with a demodulator.
    Rewrite(ClauseId),

    /// Unfolding with a definition.
    ApplyDef(FormulaId),

    /// Contextual simplify-reflect with a non-unit clause.
    ContextSR(ClauseId),

    /// Destructive equality resolution.
    DesEqRes,

    /// Simplify-reflect (literal cut) with a unit clause.
    SR(ClauseId),

    /// Deletion of a literal redundant under AC theory.
    AcRes,

    /// Condensation.
    Condense,

    /// Ordered paramodulation, plain construction.
    Paramod {
        /// The clause the equation came from.
        from: ClauseId,
        /// The clause paramodulated into.
        into: ClauseId,
    },

    /// Ordered paramodulation, simultaneous construction.
    SimParamod {
        /// The clause the equation came from.
        from: ClauseId,
        /// The clause paramodulated into.
        into: ClauseId,
    },

    /// Ordered factoring.
    OrderedFactor(ClauseId),

    /// Equality factoring.
    EqFactor(ClauseId),

    /// Equality resolution.
    EqRes(ClauseId),

    /// One half of a clause split.
    SplitEquiv(ClauseId),

    /// Introduction of a definition (e.g. a split predicate).
    IntroDef,

    /// Membership in an unsatisfiable core reported by the SAT collaborator.
    GroundSat(ClauseId),
}

impl DerivationStep {
    /// The rule name printed for the step.
    pub fn rule_name(&self) -> &'static str {
        match self {
            Self::CnfQuote(_) => "cnf_quote",
            Self::FofQuote(_) => "fof_quote",
            Self::Rewrite(_) => "rw",
            Self::ApplyDef(_) => "apply_def",
            Self::ContextSR(_) => "csr",
            Self::DesEqRes => "destructive_er",
            Self::SR(_) => "sr",
            Self::AcRes => "ac_res",
            Self::Condense => "condense",
            Self::Paramod { .. } => "pm",
            Self::SimParamod { .. } => "spm",
            Self::OrderedFactor(_) => "of",
            Self::EqFactor(_) => "ef",
            Self::EqRes(_) => "er",
            Self::SplitEquiv(_) => "esplit",
            Self::IntroDef => "intro_def",
            Self::GroundSat(_) => "ground_sat",
        }
    }

    /// The premises referenced by the step.
    pub fn premises(&self) -> Vec<Premise> {
        match *self {
            Self::CnfQuote(id)
            | Self::Rewrite(id)
            | Self::ContextSR(id)
            | Self::SR(id)
            | Self::OrderedFactor(id)
            | Self::EqFactor(id)
            | Self::EqRes(id)
            | Self::SplitEquiv(id)
            | Self::GroundSat(id) => vec![Premise::Clause(id)],

            Self::FofQuote(id) | Self::ApplyDef(id) => vec![Premise::Formula(id)],

            Self::Paramod { from, into } | Self::SimParamod { from, into } => {
                vec![Premise::Clause(from), Premise::Clause(into)]
            }

            Self::DesEqRes | Self::AcRes | Self::Condense | Self::IntroDef => vec![],
        }
    }
}

/// A node of a computed derivation.
#[derive(Clone, Copy, Debug)]
pub enum DerivationNode {
    /// A clause, with its renumbered name.
    Clause {
        /// The clause.
        id: ClauseId,
        /// The number assigned in dependency order.
        number: usize,
    },

    /// An archived formula.
    Formula {
        /// The formula.
        id: FormulaId,
    },
}

/// A derivation: the premise closure of a set of roots in dependency order.
pub struct Derivation {
    /// Nodes, topologically ordered with premises first.
    pub nodes: Vec<DerivationNode>,

    /// Clause renumbering.
    numbers: HashMap<ClauseId, usize>,
}

impl Derivation {
    /// Computes the derivation of `roots`.
    pub fn compute(
        store: &ClauseStore,
        roots: &[ClauseId],
    ) -> Result<Derivation, err::DerivationError> {
        // Gather the premise closure breadth-first.
        let mut queue: Vec<ClauseId> = roots.to_vec();
        let mut reached: HashSet<ClauseId> = roots.iter().copied().collect();
        let mut formulas: Vec<FormulaId> = Vec::default();
        let mut formula_seen: HashSet<FormulaId> = HashSet::default();

        let mut cursor = 0;
        while cursor < queue.len() {
            let id = queue[cursor];
            cursor += 1;

            let clause = store
                .try_get(id)
                .ok_or(err::DerivationError::MissingPremise)?;

            for step in &clause.derivation {
                for premise in step.premises() {
                    match premise {
                        Premise::Clause(parent) => {
                            if reached.insert(parent) {
                                queue.push(parent);
                            }
                        }
                        Premise::Formula(formula) => {
                            if formula_seen.insert(formula) {
                                formulas.push(formula);
                            }
                        }
                    }
                }
            }
        }

        // Order topologically: a postorder walk places premises before conclusions.
        let mut ordered: Vec<ClauseId> = Vec::with_capacity(queue.len());
        let mut done: HashSet<ClauseId> = HashSet::default();

        for &root in roots {
            let mut stack: Vec<(ClauseId, bool)> = vec![(root, false)];
            while let Some((id, expanded)) = stack.pop() {
                if done.contains(&id) {
                    continue;
                }
                if expanded {
                    done.insert(id);
                    ordered.push(id);
                    continue;
                }
                stack.push((id, true));
                let clause = store
                    .try_get(id)
                    .ok_or(err::DerivationError::MissingPremise)?;
                for step in &clause.derivation {
                    for premise in step.premises() {
                        if let Premise::Clause(parent) = premise {
                            if !done.contains(&parent) {
                                stack.push((parent, false));
                            }
                        }
                    }
                }
            }
        }

        let mut nodes: Vec<DerivationNode> =
            formulas.into_iter().map(|id| DerivationNode::Formula { id }).collect();

        let mut numbers = HashMap::default();
        for (number, id) in ordered.iter().enumerate() {
            numbers.insert(*id, number + 1);
            nodes.push(DerivationNode::Clause { id: *id, number: number + 1 });
        }

        log::debug!(target: targets::DERIVATION, "Derivation of {} roots has {} nodes", roots.len(), nodes.len());
        Ok(Derivation { nodes, numbers })
    }

    /// The number assigned to a clause, if the clause is part of the derivation.
    pub fn number_of(&self, id: ClauseId) -> Option<usize> {
        self.numbers.get(&id).copied()
    }

    /// Prints the derivation, one record per node.
    pub fn print(
        &self,
        out: &mut impl Write,
        store: &ClauseStore,
        formulas: &FormulaSet,
        bank: &TermBank,
        sig: &Signature,
    ) -> std::io::Result<()> {
        for node in &self.nodes {
            match *node {
                DerivationNode::Formula { id } => {
                    let formula = formulas.get(id);
                    writeln!(out, "{}({}, {}, {}).", formula.language, formula.name, formula.role, formula.text)?;
                }

                DerivationNode::Clause { id, number } => {
                    let clause = store.get(id);
                    let role = if clause.is_conjecture() {
                        "negated_conjecture"
                    } else if clause.is_initial() {
                        "axiom"
                    } else {
                        "plain"
                    };

                    write!(
                        out,
                        "cnf(c_{number}, {role}, ({})",
                        ClauseView { bank, sig, clause }
                    )?;

                    if let Some(inference) = self.inference_term(clause, formulas) {
                        write!(out, ", {inference}")?;
                    }

                    writeln!(out, ").")?;
                }
            }
        }
        Ok(())
    }

    fn inference_term(
        &self,
        clause: &crate::structures::clause::Clause,
        formulas: &FormulaSet,
    ) -> Option<String> {
        let first = clause.derivation.first()?;
        let rule = first.rule_name();

        let mut parents: Vec<String> = Vec::default();
        for step in &clause.derivation {
            for premise in step.premises() {
                let name = match premise {
                    Premise::Clause(parent) => match self.number_of(parent) {
                        Some(number) => format!("c_{number}"),
                        None => format!("c_unknown_{parent}"),
                    },
                    Premise::Formula(formula) => formulas.get(formula).name.clone(),
                };
                if !parents.contains(&name) {
                    parents.push(name);
                }
            }
        }

        Some(format!(
            "inference({rule}, [status(thm)], [{}])",
            parents.join(", ")
        ))
    }
}
