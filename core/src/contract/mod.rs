#![deny(missing_docs)]

//! # Contract Module
//!
//! - **models**: Request, param, response and type-table definitions.
//! - **resources**: The resource table.
//! - **loader**: JSON/YAML loading and structural validation.

pub mod loader;
pub mod models;
pub mod resources;

pub use models::{
    Action, Argument, ArgumentLists, Classification, Contract, Element, HttpVerb,
    MarshalExclusion, Operation, Param, PayloadType, Request, Requirement, ResourceKind,
    ResponseCode, Shape, TypeDef, TypeTable,
};
pub use resources::{Resource, ResourceArgKind};
