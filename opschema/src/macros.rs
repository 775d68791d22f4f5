//! Declarative schema registration.

/// Registers an operator schema, recording the call site as its origin.
///
/// The name may be an identifier or a string literal. Without a registry
/// argument the global registry is used.
///
/// ```
/// use opschema::{operator_schema, SchemaRegistry};
///
/// let registry = SchemaRegistry::new();
/// operator_schema!(in registry, Add, |s| s.num_inputs(2).num_outputs(1));
/// operator_schema!(in registry, "Sum", |s| s.num_inputs_between(1, 8).num_outputs(1));
///
/// assert_eq!(registry.names(), vec!["Add", "Sum"]);
/// ```
///
/// # Panics
///
/// Panics if the name is already registered.
#[macro_export]
macro_rules! operator_schema {
    (in $registry:expr, $name:ident, $configure:expr) => {
        $registry.new_schema(stringify!($name), file!(), line!(), $configure)
    };
    (in $registry:expr, $name:literal, $configure:expr) => {
        $registry.new_schema($name, file!(), line!(), $configure)
    };
    ($name:ident, $configure:expr) => {
        $crate::new_schema(stringify!($name), file!(), line!(), $configure)
    };
    ($name:literal, $configure:expr) => {
        $crate::new_schema($name, file!(), line!(), $configure)
    };
}
