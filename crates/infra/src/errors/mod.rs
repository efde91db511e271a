//! Infrastructure error types

mod conversions;

pub use conversions::InfraError;
