#![deny(missing_docs)]

//! # Canon Core
//!
//! Turns a declarative REST contract into a canonical, backend-neutral model:
//! names normalized, ambiguous responses split, array payloads wrapped, every
//! request classified into a shape with its argument lists derived, and the
//! type table pruned to what the requests can reach.

/// Shared error types.
pub mod error;

/// Contract data model and loading.
pub mod contract;

/// Name normalization helpers.
pub mod names;

/// Versioned table of name-literal special cases.
pub mod exceptions;

/// Internal-request filtering, nested-type marker removal, marshaling
/// exclusions and type substitution.
pub mod sanitizer;

/// Response splitting and array wrapper synthesis.
pub mod legalizer;

/// Shape classification.
pub mod classifier;

/// Argument list derivation.
pub mod arguments;

/// Dead-type elimination.
pub mod reachability;

/// Stage orchestration.
pub mod pipeline;

pub use classifier::{classification_table, classify, ShapeRule};
pub use contract::{
    Action, Argument, ArgumentLists, Classification, Contract, Element, HttpVerb,
    MarshalExclusion, Operation, Param, PayloadType, Request, Requirement, Resource,
    ResourceArgKind, ResourceKind, ResponseCode, Shape, TypeDef, TypeTable,
};
pub use error::{AppError, AppResult, ErrorKind};
pub use exceptions::{ExceptionTable, PayloadMatcher, SplitRule};
pub use pipeline::{canonicalize, canonicalize_with, CanonicalModel, PipelineConfig};
