use crate::context::ContextState;

/// A configuration option: a value together with its name, bounds, and the latest context state at which revising the value is supported.
#[derive(Clone)]
pub struct ConfigOption<T> {
    pub name: &'static str,
    pub min: T,
    pub max: T,
    pub max_state: ContextState,
    pub value: T,
}
