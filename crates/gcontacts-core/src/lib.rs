//! Core types: contact fields, resource names, tracing setup

pub mod contact;
pub mod tracing;

pub use contact::{ContactFields, ResourceName, ResourceNameError, PEOPLE_PREFIX};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
