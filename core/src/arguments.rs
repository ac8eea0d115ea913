#![deny(missing_docs)]

//! # Argument Derivation
//!
//! Turns a classified request into the argument lists backends generate
//! constructors and setters from:
//!
//! - **path**: bucket, object and resource identifiers.
//! - **constructor**: path arguments, required query params, then synthetic
//!   arguments implied by the request's shape.
//! - **optional**: optional params, each optional `UUID` expanded into a
//!   `UUID` and a `String` overload.
//! - **query_params**: required params in declaration order.
//!
//! The `Operation` param is a routing discriminant and never becomes an argument.

use crate::classifier::classify;
use crate::contract::{
    Argument, ArgumentLists, Param, Request, Requirement, ResourceArgKind, ResourceKind, Shape,
};
use crate::error::{AppError, AppResult};
use crate::exceptions::ExceptionTable;
use crate::names::strip_path;

const OPERATION_PARAM: &str = "Operation";
const VOID: &str = "void";
const UUID: &str = "UUID";
const STRING: &str = "String";

/// The single path argument derived from the request's resource.
///
/// Fails with `UnsupportedResource` for singleton and notification resources
/// and with `MalformedContract` when the request states no resource.
pub fn resource_argument(request: &Request) -> AppResult<Argument> {
    let resource = request.resource.ok_or_else(|| {
        AppError::malformed(&request.name, "a resource argument needs a resource")
    })?;
    let unsupported = || AppError::UnsupportedResource {
        request: request.name.clone(),
        resource: resource.contract_id(),
    };
    if request.resource_kind == Some(ResourceKind::Singleton) {
        return Err(unsupported());
    }
    let camel = resource.camel_name();
    match resource.arg_kind() {
        ResourceArgKind::Id => Ok(Argument::new(format!("{}Id", camel), UUID)),
        ResourceArgKind::Named => Ok(Argument::new(format!("{}Name", camel), STRING)),
        ResourceArgKind::Generic => Ok(Argument::new(camel, STRING)),
        ResourceArgKind::Notification | ResourceArgKind::Singleton => Err(unsupported()),
    }
}

/// Whether the request's resource identifier belongs in its path.
fn has_resource_in_path(request: &Request) -> bool {
    request.include_in_path
        && request.resource_kind == Some(ResourceKind::NonSingleton)
        && request.resource.is_some_and(|r| {
            !matches!(
                r.arg_kind(),
                ResourceArgKind::Notification | ResourceArgKind::Singleton
            )
        })
}

/// Bucket name, object name and resource identifier, in that order.
pub fn path_arguments(request: &Request) -> AppResult<Vec<Argument>> {
    let mut args = Vec::new();
    if request.bucket_requirement == Requirement::Required {
        args.push(Argument::new("BucketName", STRING));
    }
    if request.object_requirement == Requirement::Required {
        args.push(Argument::new("ObjectName", STRING));
    }
    if has_resource_in_path(request) {
        let arg = resource_argument(request)?;
        if !args.iter().any(|a| a.name == arg.name) {
            args.push(arg);
        }
    }
    Ok(args)
}

/// Applies the exception table's param type overrides.
pub fn downgrade_params(params: &[Param], exceptions: &ExceptionTable) -> Vec<Param> {
    params
        .iter()
        .map(|p| {
            if exceptions.is_string_param(&p.name) {
                Param {
                    ty: STRING.to_string(),
                    ..p.clone()
                }
            } else {
                p.clone()
            }
        })
        .collect()
}

fn is_operation(param: &Param) -> bool {
    param.name.eq_ignore_ascii_case(OPERATION_PARAM)
}

fn to_argument(param: &Param) -> Argument {
    Argument::new(param.name.clone(), strip_path(&param.ty))
}

/// Required params as arguments, `Operation` excluded, in declaration order.
pub fn query_params(request: &Request, exceptions: &ExceptionTable) -> Vec<Argument> {
    downgrade_params(&request.required_params, exceptions)
        .iter()
        .filter(|p| !is_operation(p))
        .map(to_argument)
        .collect()
}

/// Arguments implied by the shape rather than stated by the contract.
pub fn synthetic_arguments(request: &Request, shape: Shape) -> Vec<Argument> {
    match shape {
        Shape::BulkPut | Shape::ObjectsPayloadWithSize => {
            vec![Argument::new("Objects", "PutObjectList")]
        }
        Shape::BulkGet | Shape::BulkVerify | Shape::ObjectsPayloadWithLengthOffset => {
            vec![Argument::new("Objects", "GetObjectList")]
        }
        Shape::ObjectsPayloadSimple => vec![Argument::new("Objects", "ObjectList")],
        Shape::MultiFileDelete => vec![Argument::new("Objects", "DeleteObjectList")],
        Shape::CompleteMultipartUpload => vec![Argument::new("Parts", "PartList")],
        Shape::IdsPayload => vec![Argument::new("Ids", "IdList")],
        Shape::StringPayload | Shape::BulkReplicate => {
            vec![Argument::new("RequestPayload", STRING)]
        }
        Shape::CreateObject | Shape::StreamPayload => vec![Argument::new("Size", "long")],
        Shape::NotificationGet | Shape::NotificationDelete if request.include_in_path => {
            vec![Argument::new("NotificationId", UUID)]
        }
        _ => Vec::new(),
    }
}

/// Path arguments, required non-void query params, then synthetic arguments.
///
/// Value-less `void` flags stay in `query_params` only.
pub fn constructor_arguments(
    request: &Request,
    shape: Shape,
    exceptions: &ExceptionTable,
) -> AppResult<Vec<Argument>> {
    let mut args = path_arguments(request)?;
    let required = query_params(request, exceptions)
        .into_iter()
        .filter(|a| !a.ty.eq_ignore_ascii_case(VOID));
    for arg in required.chain(synthetic_arguments(request, shape)) {
        if !args.iter().any(|a| a.name == arg.name) {
            args.push(arg);
        }
    }
    Ok(args)
}

/// Expands an optional `UUID` argument into `[X: UUID, X: String]`.
pub fn expand_uuid(arg: Argument) -> Vec<Argument> {
    if arg.ty.eq_ignore_ascii_case(UUID) {
        let text = Argument::new(arg.name.clone(), STRING);
        vec![arg, text]
    } else {
        vec![arg]
    }
}

/// Optional params as arguments, with UUID dual-overload expansion.
pub fn optional_arguments(request: &Request, exceptions: &ExceptionTable) -> Vec<Argument> {
    downgrade_params(&request.optional_params, exceptions)
        .iter()
        .filter(|p| !is_operation(p))
        .map(to_argument)
        .flat_map(expand_uuid)
        .collect()
}

/// Fields a backend declares on the request type.
///
/// Constructor then optional arguments, without UUID overloads. Bulk shapes
/// leave the arguments of their shared base out.
pub fn class_variables(
    request: &Request,
    shape: Shape,
    constructor: &[Argument],
    exceptions: &ExceptionTable,
) -> Vec<Argument> {
    let optional = downgrade_params(&request.optional_params, exceptions);
    let mut vars: Vec<Argument> = Vec::new();
    let candidates = constructor
        .iter()
        .cloned()
        .chain(optional.iter().filter(|p| !is_operation(p)).map(to_argument));
    for arg in candidates {
        if shape.is_bulk() && exceptions.is_bulk_inherited(&arg.name) {
            continue;
        }
        if !vars.iter().any(|v| v.name == arg.name) {
            vars.push(arg);
        }
    }
    vars
}

/// Derives every argument list of `request`.
///
/// Uses the assigned shape, classifying on the fly if none is assigned.
pub fn derive_arguments(
    request: &Request,
    exceptions: &ExceptionTable,
) -> AppResult<ArgumentLists> {
    let shape = request.shape.unwrap_or_else(|| classify(request));
    let path = path_arguments(request)?;
    let constructor = constructor_arguments(request, shape, exceptions)?;
    let class_variables = class_variables(request, shape, &constructor, exceptions);
    Ok(ArgumentLists {
        path,
        constructor,
        optional: optional_arguments(request, exceptions),
        query_params: query_params(request, exceptions),
        class_variables,
    })
}

/// Returns a copy of `request` with its argument lists assigned.
pub fn derive_request(request: &Request, exceptions: &ExceptionTable) -> AppResult<Request> {
    let arguments = derive_arguments(request, exceptions)?;
    Ok(Request {
        arguments: Some(arguments),
        ..request.clone()
    })
}
