/*!
The signature --- a table of function symbols.

Symbols are identified by a [FunCode]: a positive integer index into the table.
Negative codes are reserved for variables, and code 0 is unused.

A handful of codes are reserved for built-in symbols when a signature is created: `$true`, `$false`, equality, disjunction and negation.
The latter three exist so formulas may be encoded as terms at the seam to a clausifier; the saturation core itself only ever builds equations over `$true`.

The signature grows when Skolem symbols or split predicates are minted mid-saturation.
It never shrinks.
*/

use std::collections::HashMap;

use crate::{
    structures::term::{FunCode, Sort, SORT_INDIVIDUAL},
    types::err::{self},
};

bitflags::bitflags! {
    /// Per-symbol flag bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SymbolProps: u32 {
        /// The symbol is a predicate, i.e. occurs only as the left side of an equation with `$true`.
        const PREDICATE = 1 << 0;

        /// The symbol is known to be associative and commutative.
        const AC = 1 << 1;

        /// The symbol has a fixed interpretation (e.g. `$true`).
        const INTERPRETED = 1 << 2;

        /// The symbol is a distinct object: two distinct objects are never equal.
        const DISTINCT = 1 << 3;

        /// The symbol is reserved by the library (built-ins, Skolem symbols, split predicates).
        const SPECIAL = 1 << 4;
    }
}

/// A single symbol of the signature.
#[derive(Clone, Debug)]
pub struct Symbol {
    /// The print name.
    pub name: String,

    /// The number of arguments the symbol takes.
    pub arity: usize,

    /// The sort of a term with this symbol at the top.
    pub sort: Sort,

    /// Flag bits.
    pub props: SymbolProps,

    /// Rank of the name in alphabetic order over the signature, used as an ordering tie-breaker.
    ///
    /// Valid after a call to [refresh_alpha_ranks](Signature::refresh_alpha_ranks).
    pub alpha_rank: u32,
}

/// The signature struct.
pub struct Signature {
    /// Symbols, indexed by [FunCode] (the entry at index 0 is a placeholder).
    symbols: Vec<Symbol>,

    /// Names to codes.
    by_name: HashMap<String, FunCode>,

    /// A counter for minted Skolem symbols.
    skolem_count: u64,

    /// A counter for minted split predicates.
    split_count: u64,

    /// The code of `$true`.
    pub true_code: FunCode,

    /// The code of `$false`.
    pub false_code: FunCode,

    /// The code of the equality predicate.
    pub eq_code: FunCode,

    /// The code of disjunction, for the term encoding of formulas.
    pub or_code: FunCode,

    /// The code of negation, for the term encoding of formulas.
    pub not_code: FunCode,
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}

impl Signature {
    /// A fresh signature with the built-in symbols reserved.
    pub fn new() -> Self {
        let mut sig = Signature {
            symbols: vec![Symbol {
                name: String::default(),
                arity: 0,
                sort: SORT_INDIVIDUAL,
                props: SymbolProps::empty(),
                alpha_rank: 0,
            }],
            by_name: HashMap::default(),
            skolem_count: 0,
            split_count: 0,
            true_code: 0,
            false_code: 0,
            eq_code: 0,
            or_code: 0,
            not_code: 0,
        };

        let builtin = SymbolProps::PREDICATE | SymbolProps::INTERPRETED | SymbolProps::SPECIAL;

        sig.true_code = sig.reserve("$true", 0, builtin);
        sig.false_code = sig.reserve("$false", 0, builtin);
        sig.eq_code = sig.reserve("=", 2, builtin);
        sig.or_code = sig.reserve("|", 2, SymbolProps::SPECIAL);
        sig.not_code = sig.reserve("~", 1, SymbolProps::SPECIAL);

        sig
    }

    fn reserve(&mut self, name: &str, arity: usize, props: SymbolProps) -> FunCode {
        let code = self.symbols.len() as FunCode;
        self.symbols.push(Symbol {
            name: name.to_owned(),
            arity,
            sort: SORT_INDIVIDUAL,
            props,
            alpha_rank: 0,
        });
        self.by_name.insert(name.to_owned(), code);
        code
    }

    /// Inserts `name` with `arity`, or returns the existing code.
    ///
    /// An [ArityConflict](err::SignatureError::ArityConflict) error is returned if the name is registered with a different arity.
    pub fn insert(&mut self, name: &str, arity: usize) -> Result<FunCode, err::SignatureError> {
        if let Some(&code) = self.by_name.get(name) {
            let registered = self.symbols[code as usize].arity;
            if registered != arity {
                return Err(err::SignatureError::ArityConflict {
                    name: name.to_owned(),
                    registered,
                    used: arity,
                });
            }
            return Ok(code);
        }

        if self.symbols.len() >= FunCode::MAX as usize {
            return Err(err::SignatureError::Exhausted);
        }

        Ok(self.reserve(name, arity, SymbolProps::empty()))
    }

    /// The code registered for `name`, if any.
    pub fn code_of(&self, name: &str) -> Option<FunCode> {
        self.by_name.get(name).copied()
    }

    /// The symbol entry for `code`.
    ///
    /// # Panics
    /// If `code` is not a registered function code.
    pub fn symbol(&self, code: FunCode) -> &Symbol {
        &self.symbols[code as usize]
    }

    /// The arity of `code`.
    pub fn arity(&self, code: FunCode) -> usize {
        self.symbols[code as usize].arity
    }

    /// The print name of `code`.
    pub fn name(&self, code: FunCode) -> &str {
        &self.symbols[code as usize].name
    }

    /// Marks `code` as a predicate symbol.
    pub fn set_predicate(&mut self, code: FunCode) {
        self.symbols[code as usize].props |= SymbolProps::PREDICATE;
    }

    /// True if `code` is a predicate symbol.
    pub fn is_predicate(&self, code: FunCode) -> bool {
        self.symbols[code as usize].props.contains(SymbolProps::PREDICATE)
    }

    /// Marks `code` as associative-commutative.
    pub fn set_ac(&mut self, code: FunCode) {
        self.symbols[code as usize].props |= SymbolProps::AC;
    }

    /// True if `code` is marked associative-commutative.
    pub fn is_ac(&self, code: FunCode) -> bool {
        self.symbols[code as usize].props.contains(SymbolProps::AC)
    }

    /// A count of registered symbols.
    pub fn count(&self) -> usize {
        self.symbols.len() - 1
    }

    /// An iterator over registered codes.
    pub fn codes(&self) -> impl Iterator<Item = FunCode> + '_ {
        (1..self.symbols.len()).map(|index| index as FunCode)
    }

    /// Mints a fresh Skolem symbol of the given arity.
    pub fn fresh_skolem(&mut self, arity: usize) -> FunCode {
        loop {
            self.skolem_count += 1;
            let name = format!("esk{}_{arity}", self.skolem_count);
            if !self.by_name.contains_key(&name) {
                return self.reserve(&name, arity, SymbolProps::SPECIAL);
            }
        }
    }

    /// Mints a fresh propositional split predicate.
    pub fn fresh_split_predicate(&mut self) -> FunCode {
        loop {
            self.split_count += 1;
            let name = format!("epred{}_0", self.split_count);
            if !self.by_name.contains_key(&name) {
                return self.reserve(
                    &name,
                    0,
                    SymbolProps::PREDICATE | SymbolProps::SPECIAL,
                );
            }
        }
    }

    /// Recomputes the alphabetic rank of every symbol.
    ///
    /// Called once the input problem has been read, before ordering generation.
    pub fn refresh_alpha_ranks(&mut self) {
        let mut order: Vec<usize> = (1..self.symbols.len()).collect();
        order.sort_by(|&a, &b| self.symbols[a].name.cmp(&self.symbols[b].name));
        for (rank, index) in order.into_iter().enumerate() {
            self.symbols[index].alpha_rank = rank as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_reserved() {
        let sig = Signature::new();

        assert_eq!(sig.code_of("$true"), Some(sig.true_code));
        assert_eq!(sig.code_of("="), Some(sig.eq_code));
        assert_eq!(sig.arity(sig.eq_code), 2);
        assert!(sig.is_predicate(sig.true_code));
    }

    #[test]
    fn arity_conflicts_are_errors() {
        let mut sig = Signature::new();

        let f = sig.insert("f", 2).expect("registration failed");
        assert_eq!(sig.insert("f", 2), Ok(f));
        assert!(matches!(
            sig.insert("f", 3),
            Err(err::SignatureError::ArityConflict { .. })
        ));
    }

    #[test]
    fn minted_symbols_are_fresh() {
        let mut sig = Signature::new();

        let sk_a = sig.fresh_skolem(1);
        let sk_b = sig.fresh_skolem(1);
        assert_ne!(sk_a, sk_b);

        let sp = sig.fresh_split_predicate();
        assert!(sig.is_predicate(sp));
        assert_eq!(sig.arity(sp), 0);
    }

    #[test]
    fn alpha_ranks_follow_names() {
        let mut sig = Signature::new();

        let b = sig.insert("b", 0).expect("registration failed");
        let a = sig.insert("a", 0).expect("registration failed");
        sig.refresh_alpha_ranks();

        assert!(sig.symbol(a).alpha_rank < sig.symbol(b).alpha_rank);
    }
}
