/*!
Error types used in the library.

- Most of these are very unlikely to occur during use.
- Some of these are external --- e.g. a parse error is returned when a problem file is malformed, and in this case no part of the proof state has been mutated.
- Budget exhaustion is *not* an error --- the saturation loop reports it through a [Report](crate::reports::Report).

Names of the error enums --- for the most part --- overlap with corresponding structs.
*/
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

/// A union of varied error kinds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An error related to parsing.
    Parse(ParseError),

    /// An error in the term bank.
    TermBank(TermBankError),

    /// An error in the signature.
    Signature(SignatureError),

    /// An error related to the state of the context.
    State(StateError),

    /// An error during derivation extraction.
    Derivation(DerivationError),
}

/// Errors in the term bank.
///
/// These are hard faults: if one occurs the term bank can no longer be trusted to hand out fresh cells.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TermBankError {
    /// All term ids have been used and a garbage collection failed to reclaim any.
    Exhausted,
}

impl From<TermBankError> for ErrorKind {
    fn from(e: TermBankError) -> Self {
        ErrorKind::TermBank(e)
    }
}

/// Errors in the signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SignatureError {
    /// A symbol was used with two different arities.
    ArityConflict {
        /// The name of the symbol.
        name: String,
        /// The arity the symbol was registered with.
        registered: usize,
        /// The arity the symbol was used with.
        used: usize,
    },

    /// All function codes have been used.
    Exhausted,
}

impl From<SignatureError> for ErrorKind {
    fn from(e: SignatureError) -> Self {
        ErrorKind::Signature(e)
    }
}

/// Errors during parsing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The input ended where some token was required.
    UnexpectedEnd,

    /// An unexpected character at a line.
    Unexpected(char, usize),

    /// A required delimiter was not found at a line.
    MissingDelimiter(char, usize),

    /// Something other than a clause or formula entry point.
    UnknownEntry(String, usize),

    /// A name was expected at a line.
    MissingName(usize),

    /// An empty clause body, where at least `$false` was required.
    EmptyClauseBody(usize),
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

/// Errors due to the state of the context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateError {
    /// The attempted action requires the context to accept input, though saturation has begun.
    SaturationStarted,

    /// The attempted action requires a finished saturation.
    NoVerdict,
}

impl From<StateError> for ErrorKind {
    fn from(e: StateError) -> Self {
        ErrorKind::State(e)
    }
}

/// Errors during derivation extraction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DerivationError {
    /// A premise referenced by some derivation stack could not be found, not even in the archive.
    MissingPremise,
}

impl From<DerivationError> for ErrorKind {
    fn from(e: DerivationError) -> Self {
        ErrorKind::Derivation(e)
    }
}
