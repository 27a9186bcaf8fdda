//! Entity definition helpers

pub mod macros;
