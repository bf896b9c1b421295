/*!
The scanner and parser for problem input.

Three entry forms are recognised:

- `cnf(name, role, (lit | … | lit)).` --- a clause, parsed in full.
- `fof(name, role, …).` and `tff(name, role, …).` --- formulas; the body is captured verbatim and archived, clausification being the business of an external producer.
- `(lit | … | lit).` --- the legacy bare-list clause form, treated as an axiom.

`%` starts a comment running to the end of the line.
Parsing touches no prover state: the parser produces plain syntax trees, and the [builder](super) turns them into signature entries and shared terms afterwards.
*/

use crate::types::err::{self};

/// A parsed term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParsedTerm {
    /// A variable (an upper-case name).
    Var(String),

    /// A function term.
    Fun(String, Vec<ParsedTerm>),
}

/// A parsed literal.
#[derive(Clone, Debug)]
pub(crate) struct ParsedLiteral {
    /// The sign.
    pub positive: bool,

    /// The left side, or the whole atom.
    pub lhs: ParsedTerm,

    /// The right side, for equational literals.
    pub rhs: Option<ParsedTerm>,
}

/// A parsed entry.
#[derive(Clone, Debug)]
pub(crate) enum Entry {
    /// A clause.
    Clause {
        /// The entry name.
        name: String,
        /// The TPTP role.
        role: String,
        /// The literals.
        literals: Vec<ParsedLiteral>,
    },

    /// A formula, body unexamined.
    Formula {
        /// The entry language (`fof` or `tff`).
        language: String,
        /// The entry name.
        name: String,
        /// The TPTP role.
        role: String,
        /// The body, verbatim.
        text: String,
    },
}

/// The scanner struct.
pub(crate) struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Scanner {
    pub(crate) fn new(input: &str) -> Self {
        Scanner {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('%') => {
                    while let Some(c) = self.advance() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), err::ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some(c) if c == wanted => {
                self.advance();
                Ok(())
            }
            Some(_) => Err(err::ParseError::MissingDelimiter(wanted, self.line)),
            None => Err(err::ParseError::UnexpectedEnd),
        }
    }

    fn eat(&mut self, wanted: char) -> bool {
        self.skip_trivia();
        if self.peek() == Some(wanted) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// A name: alphanumerics and underscores, optionally led by `$`, or a `'`-quoted string.
    fn name(&mut self) -> Result<String, err::ParseError> {
        self.skip_trivia();
        let mut out = String::default();

        if self.peek() == Some('\'') {
            self.advance();
            while let Some(c) = self.advance() {
                if c == '\'' {
                    return Ok(out);
                }
                out.push(c);
            }
            return Err(err::ParseError::UnexpectedEnd);
        }

        if self.peek() == Some('$') {
            out.push('$');
            self.advance();
        }
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                out.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if out.is_empty() || out == "$" {
            return Err(err::ParseError::MissingName(self.line));
        }
        Ok(out)
    }

    fn parse_term(&mut self) -> Result<ParsedTerm, err::ParseError> {
        let name = self.name()?;
        let leading = name.chars().next().expect("! Empty name");

        if leading.is_uppercase() {
            return Ok(ParsedTerm::Var(name));
        }

        let mut args = Vec::default();
        if self.eat('(') {
            loop {
                args.push(self.parse_term()?);
                if self.eat(',') {
                    continue;
                }
                self.expect(')')?;
                break;
            }
        }
        Ok(ParsedTerm::Fun(name, args))
    }

    fn parse_literal(&mut self) -> Result<ParsedLiteral, err::ParseError> {
        let mut positive = true;
        while self.eat('~') {
            positive = !positive;
        }

        let lhs = self.parse_term()?;

        self.skip_trivia();
        let rhs = if self.eat('=') {
            Some(self.parse_term()?)
        } else if self.peek() == Some('!') {
            self.advance();
            self.expect('=')?;
            positive = !positive;
            Some(self.parse_term()?)
        } else {
            None
        };

        Ok(ParsedLiteral { positive, lhs, rhs })
    }

    /// A parenthesized or bare disjunction of literals.
    fn parse_clause_body(&mut self) -> Result<Vec<ParsedLiteral>, err::ParseError> {
        let wrapped = self.eat('(');
        let mut literals = vec![self.parse_literal()?];
        while self.eat('|') {
            literals.push(self.parse_literal()?);
        }
        if wrapped {
            self.expect(')')?;
        }
        Ok(literals)
    }

    /// The body of a formula entry, captured verbatim up to the closing parenthesis of the entry.
    fn capture_formula_body(&mut self) -> Result<String, err::ParseError> {
        let mut depth: usize = 0;
        let mut out = String::default();
        self.skip_trivia();
        loop {
            match self.peek() {
                None => return Err(err::ParseError::UnexpectedEnd),
                Some('(') => {
                    depth += 1;
                    out.push('(');
                    self.advance();
                }
                Some(')') => {
                    if depth == 0 {
                        return Ok(out.trim().to_owned());
                    }
                    depth -= 1;
                    out.push(')');
                    self.advance();
                }
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
            }
        }
    }

    /// The next entry, if any input remains.
    pub(crate) fn next_entry(&mut self) -> Result<Option<Entry>, err::ParseError> {
        self.skip_trivia();
        let Some(leading) = self.peek() else {
            return Ok(None);
        };

        // The legacy bare-list form.
        if leading == '(' {
            let literals = self.parse_clause_body()?;
            self.expect('.')?;
            return Ok(Some(Entry::Clause {
                name: String::default(),
                role: "axiom".to_owned(),
                literals,
            }));
        }

        let language = self.name()?;
        match language.as_str() {
            "cnf" => {
                self.expect('(')?;
                let name = self.name()?;
                self.expect(',')?;
                let role = self.name()?;
                self.expect(',')?;
                let literals = self.parse_clause_body()?;
                self.expect(')')?;
                self.expect('.')?;
                Ok(Some(Entry::Clause { name, role, literals }))
            }

            "fof" | "tff" => {
                self.expect('(')?;
                let name = self.name()?;
                self.expect(',')?;
                let role = self.name()?;
                self.expect(',')?;
                let text = self.capture_formula_body()?;
                self.expect(')')?;
                self.expect('.')?;
                Ok(Some(Entry::Formula { language, name, role, text }))
            }

            other => Err(err::ParseError::UnknownEntry(other.to_owned(), self.line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_entries_parse() {
        let mut scanner = Scanner::new(
            "% a comment\ncnf(ax1, axiom, (mult(X,e)=X | ~p(X))).\ncnf(g, negated_conjecture, mult(a,e)!=a).",
        );

        let Some(Entry::Clause { name, role, literals }) = scanner.next_entry().unwrap() else {
            panic!("Expected a clause");
        };
        assert_eq!(name, "ax1");
        assert_eq!(role, "axiom");
        assert_eq!(literals.len(), 2);
        assert!(literals[0].positive);
        assert!(literals[0].rhs.is_some());
        assert!(!literals[1].positive);
        assert!(literals[1].rhs.is_none());

        let Some(Entry::Clause { role, literals, .. }) = scanner.next_entry().unwrap() else {
            panic!("Expected a clause");
        };
        assert_eq!(role, "negated_conjecture");
        assert!(!literals[0].positive);

        assert!(scanner.next_entry().unwrap().is_none());
    }

    #[test]
    fn formula_entries_are_archived_verbatim() {
        let mut scanner = Scanner::new("fof(f1, axiom, ! [X] : (p(X) => q(X))).");

        let Some(Entry::Formula { language, name, text, .. }) = scanner.next_entry().unwrap() else {
            panic!("Expected a formula");
        };
        assert_eq!(language, "fof");
        assert_eq!(name, "f1");
        assert_eq!(text, "! [X] : (p(X) => q(X))");
    }

    #[test]
    fn legacy_bare_lists_parse_as_axioms() {
        let mut scanner = Scanner::new("(p(a) | ~q(b)).");

        let Some(Entry::Clause { role, literals, .. }) = scanner.next_entry().unwrap() else {
            panic!("Expected a clause");
        };
        assert_eq!(role, "axiom");
        assert_eq!(literals.len(), 2);
    }

    #[test]
    fn malformed_input_is_an_error() {
        let mut scanner = Scanner::new("cnf(broken, axiom, (p(a)).");
        assert!(scanner.next_entry().is_err());

        let mut scanner = Scanner::new("thf(x, axiom, p).");
        assert!(matches!(
            scanner.next_entry(),
            Err(err::ParseError::UnknownEntry(_, _))
        ));
    }
}
