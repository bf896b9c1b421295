/*!
Handling of associative-commutative symbols.

The saturation loop watches processed clauses for unit instances of the AC axioms:

- commutativity, `f(X, Y) = f(Y, X)`,
- associativity, `f(f(X, Y), Z) = f(X, f(Y, Z))`.

Once both have been seen for a symbol the symbol's AC status is set on the signature and AC handling goes live: literals equating AC-equal terms are redundant --- a positive one makes its clause a tautology, a negative one is deleted from its clause.
AC-equality is decided through a normal form which flattens nested applications of the symbol and sorts the arguments.

Activation mid-run interacts with cached literal orderings conservatively: affected processed clauses are returned to the unprocessed set for revalidation rather than patched in place.
*/

use crate::{
    structures::{
        eqn::Eqn,
        signature::Signature,
        term::{FunCode, TermBank, TermId},
    },
    types::err::{self},
};

/// Scans a clause for an AC axiom instance, returning the symbol if the clause is one.
///
/// Only unit positive equations qualify.
pub fn scan_ac_axiom(bank: &TermBank, lits: &[Eqn]) -> Option<(FunCode, AcAxiom)> {
    let [lit] = lits else {
        return None;
    };
    if !lit.is_positive() || !lit.is_equational() {
        return None;
    }

    if let Some(code) = commutativity(bank, lit.lhs, lit.rhs) {
        return Some((code, AcAxiom::Commutativity));
    }
    if let Some(code) = associativity(bank, lit.lhs, lit.rhs).or(associativity(bank, lit.rhs, lit.lhs)) {
        return Some((code, AcAxiom::Associativity));
    }
    None
}

/// The AC axiom kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcAxiom {
    /// `f(X, Y) = f(Y, X)`.
    Commutativity,

    /// `f(f(X, Y), Z) = f(X, f(Y, Z))`.
    Associativity,
}

/// Recognises `f(X, Y) = f(Y, X)` with distinct variables.
fn commutativity(bank: &TermBank, lhs: TermId, rhs: TermId) -> Option<FunCode> {
    let l = bank.term(lhs);
    let r = bank.term(rhs);
    if l.is_var() || r.is_var() || l.f_code != r.f_code || l.args.len() != 2 {
        return None;
    }
    let [a, b] = l.args[..] else { return None };
    if !bank.term(a).is_var() || !bank.term(b).is_var() || a == b {
        return None;
    }
    if r.args == vec![b, a] {
        Some(l.f_code)
    } else {
        None
    }
}

/// Recognises `f(f(X, Y), Z) = f(X, f(Y, Z))` with distinct variables.
fn associativity(bank: &TermBank, lhs: TermId, rhs: TermId) -> Option<FunCode> {
    let l = bank.term(lhs);
    let r = bank.term(rhs);
    if l.is_var() || r.is_var() || l.f_code != r.f_code || l.args.len() != 2 {
        return None;
    }
    let code = l.f_code;

    // lhs = f(f(X, Y), Z)
    let inner_l = bank.term(l.args[0]);
    if inner_l.is_var() || inner_l.f_code != code {
        return None;
    }
    let (x, y, z) = (inner_l.args[0], inner_l.args[1], l.args[1]);

    // rhs = f(X, f(Y, Z))
    let inner_r = bank.term(r.args[1]);
    if inner_r.is_var() || inner_r.f_code != code {
        return None;
    }
    if r.args[0] != x || inner_r.args[0] != y || inner_r.args[1] != z {
        return None;
    }

    let distinct_vars = [x, y, z];
    if distinct_vars.iter().all(|&v| bank.term(v).is_var())
        && x != y
        && y != z
        && x != z
    {
        Some(code)
    } else {
        None
    }
}

/// The AC normal form of `term`: arguments normalized, nested applications of AC symbols flattened, and argument lists of AC symbols sorted and rebuilt right-nested.
pub fn ac_normal_form(
    bank: &mut TermBank,
    sig: &Signature,
    term: TermId,
) -> Result<TermId, err::TermBankError> {
    let node = bank.term(term);
    if node.is_var() || node.args.is_empty() {
        return Ok(term);
    }
    let f_code = node.f_code;
    let args = node.args.clone();

    let mut normal_args = Vec::with_capacity(args.len());
    for arg in args {
        normal_args.push(ac_normal_form(bank, sig, arg)?);
    }

    if !sig.is_ac(f_code) {
        return bank.insert(f_code, normal_args);
    }

    // Flatten nested applications, sort, and rebuild right-nested.
    let mut flat = Vec::default();
    let mut stack: Vec<TermId> = normal_args.into_iter().rev().collect();
    while let Some(arg) = stack.pop() {
        let arg_node = bank.term(arg);
        if !arg_node.is_var() && arg_node.f_code == f_code {
            for &inner in arg_node.args.iter().rev() {
                stack.push(inner);
            }
        } else {
            flat.push(arg);
        }
    }
    flat.sort_unstable();

    let mut rebuilt = flat.pop().expect("! AC symbol without arguments");
    while let Some(arg) = flat.pop() {
        rebuilt = bank.insert(f_code, vec![arg, rebuilt])?;
    }
    Ok(rebuilt)
}

/// True if the sides of `lit` are equal modulo the AC theory of the signature's AC symbols.
pub fn ac_redundant_literal(
    bank: &mut TermBank,
    sig: &Signature,
    lit: &Eqn,
) -> Result<bool, err::TermBankError> {
    if lit.lhs == lit.rhs {
        return Ok(true);
    }
    let lhs = ac_normal_form(bank, sig, lit.lhs)?;
    let rhs = ac_normal_form(bank, sig, lit.rhs)?;
    Ok(lhs == rhs)
}
