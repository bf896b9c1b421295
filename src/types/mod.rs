//! Types used across the library, e.g. errors.

pub mod err;
