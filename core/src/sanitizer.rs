#![deny(missing_docs)]

//! # Contract Sanitizer
//!
//! Passes that run before name normalization:
//!
//! - dropping internal requests;
//! - collapsing nested-type markers (`Outer$Inner`) in every type reference;
//! - applying element marshaling exclusions;
//! - substituting types listed in the exception table's type map.

use crate::contract::{Classification, Contract, MarshalExclusion, Request, TypeDef, TypeTable};
use crate::error::{AppError, AppResult};
use crate::exceptions::ExceptionTable;
use crate::names::remove_nested_marker;

/// Drops `SpectraInternal` requests unless `generate_internal` is set.
pub fn remove_internal_requests(contract: &Contract, generate_internal: bool) -> Contract {
    if generate_internal {
        return contract.clone();
    }
    let requests: Vec<Request> = contract
        .requests
        .iter()
        .filter(|r| r.classification != Classification::SpectraInternal)
        .cloned()
        .collect();
    let dropped = contract.requests.len() - requests.len();
    if dropped > 0 {
        tracing::debug!(dropped, "removed internal requests");
    }
    Contract {
        requests,
        types: contract.types.clone(),
    }
}

/// Rewrites every type name containing `$` to its nested name.
///
/// Identical definitions that collapse onto one name are merged. Different
/// definitions doing so fail with `TypeRenamingConflict`.
pub fn remove_nested_type_markers(contract: &Contract) -> AppResult<Contract> {
    let mut types = TypeTable::new();
    for def in contract.types.values() {
        let renamed = rename_type(def);
        match types.get(&renamed.name) {
            Some(existing) if existing != &renamed => {
                return Err(AppError::TypeRenamingConflict {
                    type_name: renamed.name,
                });
            }
            Some(_) => {}
            None => {
                types.insert(renamed.name.clone(), renamed);
            }
        }
    }

    let requests = contract.requests.iter().map(rename_request).collect();
    Ok(Contract { requests, types })
}

/// Drops elements excluded from marshaling altogether and marks elements
/// omitted when null as nullable.
pub fn apply_marshal_exclusions(contract: &Contract) -> Contract {
    let mut out = contract.clone();
    for def in out.types.values_mut() {
        let before = def.elements.len();
        def.elements.retain(|e| e.exclude_from_marshaler != Some(MarshalExclusion::Always));
        if def.elements.len() != before {
            tracing::debug!(
                type_name = %def.name,
                dropped = before - def.elements.len(),
                "dropped elements excluded from marshaling"
            );
        }
        for element in &mut def.elements {
            if element.exclude_from_marshaler == Some(MarshalExclusion::ValueIsNull) {
                element.nullable = true;
            }
        }
    }
    out
}

/// Replaces every type reference listed in the exception table's type map.
///
/// Params, payloads and elements are rewritten. The mapped-away definitions
/// stay in the table until pruning.
pub fn remap_types(contract: &Contract, exceptions: &ExceptionTable) -> Contract {
    if exceptions.type_map.is_empty() {
        return contract.clone();
    }
    let remap = |name: &str| -> String {
        exceptions
            .mapped_type(name)
            .map(str::to_string)
            .unwrap_or_else(|| name.to_string())
    };
    let types = contract
        .types
        .iter()
        .map(|(key, def)| (key.clone(), retype_type(def, &remap, false)))
        .collect();
    let requests = contract
        .requests
        .iter()
        .map(|r| retype_request(r, &remap))
        .collect();
    Contract { requests, types }
}

fn rename_type(def: &TypeDef) -> TypeDef {
    retype_type(def, &remove_nested_marker, true)
}

fn rename_request(request: &Request) -> Request {
    retype_request(request, &remove_nested_marker)
}

fn retype_type(def: &TypeDef, f: &impl Fn(&str) -> String, rename_self: bool) -> TypeDef {
    let mut out = def.clone();
    if rename_self {
        out.name = f(&def.name);
    }
    for element in &mut out.elements {
        element.ty = f(&element.ty);
        element.component_type = element.component_type.as_deref().map(f);
    }
    out
}

fn retype_request(request: &Request, f: &impl Fn(&str) -> String) -> Request {
    let mut out = request.clone();
    for param in out
        .required_params
        .iter_mut()
        .chain(out.optional_params.iter_mut())
    {
        param.ty = f(&param.ty);
    }
    for code in &mut out.response_codes {
        for payload in &mut code.payloads {
            payload.ty = f(&payload.ty);
            payload.component_type = payload.component_type.as_deref().map(f);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Element, HttpVerb, Param, PayloadType, ResponseCode};
    use crate::error::ErrorKind;

    fn contract_with(types: Vec<TypeDef>, requests: Vec<Request>) -> Contract {
        Contract {
            requests,
            types: types.into_iter().map(|t| (t.name.clone(), t)).collect(),
        }
    }

    #[test]
    fn test_remove_internal_requests() {
        let contract = contract_with(
            vec![],
            vec![
                Request::new("a.Public", HttpVerb::Get, Classification::SpectraStyle),
                Request::new("a.Hidden", HttpVerb::Get, Classification::SpectraInternal),
            ],
        );
        let kept = remove_internal_requests(&contract, false);
        assert_eq!(kept.requests.len(), 1);
        assert_eq!(kept.requests[0].name, "a.Public");

        let all = remove_internal_requests(&contract, true);
        assert_eq!(all.requests.len(), 2);
    }

    #[test]
    fn test_nested_markers_rewritten_everywhere() {
        let mut req = Request::new("a.GetJob", HttpVerb::Get, Classification::SpectraStyle);
        req.optional_params.push(Param::new("Priority", "a.Job$Priority"));
        req.response_codes.push(ResponseCode {
            code: 200,
            payloads: vec![PayloadType::array_of("a.Job$Chunk")],
        });
        let contract = contract_with(
            vec![
                TypeDef::enumeration("a.Job$Priority", ["HIGH"]),
                TypeDef::structure("a.Job", vec![Element::array_of("Chunks", "a.Job$Chunk")]),
                TypeDef::structure("a.Job$Chunk", vec![]),
            ],
            vec![req],
        );

        let out = remove_nested_type_markers(&contract).unwrap();
        let keys: Vec<&str> = out.types.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a.Priority", "a.Job", "a.Chunk"]);
        assert_eq!(
            out.types["a.Job"].elements[0].component_type.as_deref(),
            Some("a.Chunk")
        );
        assert_eq!(out.requests[0].optional_params[0].ty, "a.Priority");
        assert_eq!(
            out.requests[0].response_codes[0].payloads[0]
                .component_type
                .as_deref(),
            Some("a.Chunk")
        );
    }

    #[test]
    fn test_nested_marker_conflict() {
        let contract = contract_with(
            vec![
                TypeDef::enumeration("a.Job$State", ["A"]),
                TypeDef::enumeration("a.Tape$State", ["B"]),
            ],
            vec![],
        );
        let err = remove_nested_type_markers(&contract).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeRenamingConflict);
        assert!(err.to_string().contains("a.State"));
    }

    #[test]
    fn test_identical_nested_types_merge() {
        let contract = contract_with(
            vec![
                TypeDef::enumeration("a.Job$State", ["A"]),
                TypeDef::enumeration("a.Tape$State", ["A"]),
            ],
            vec![],
        );
        let out = remove_nested_type_markers(&contract).unwrap();
        assert_eq!(out.types.len(), 1);
    }

    #[test]
    fn test_marshal_exclusions() {
        let mut secret = Element::new("Secret", "String");
        secret.exclude_from_marshaler = Some(MarshalExclusion::Always);
        let mut owner = Element::new("Owner", "String");
        owner.exclude_from_marshaler = Some(MarshalExclusion::ValueIsNull);
        let contract = contract_with(
            vec![TypeDef::structure(
                "a.User",
                vec![Element::new("Id", "UUID"), secret, owner],
            )],
            vec![],
        );

        let out = apply_marshal_exclusions(&contract);
        let elements = &out.types["a.User"].elements;
        let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Owner"]);
        assert!(!elements[0].nullable);
        assert!(elements[1].nullable);
    }

    #[test]
    fn test_remap_types_everywhere() {
        let mut req = Request::new("a.GetTapes", HttpVerb::Get, Classification::SpectraStyle);
        req.optional_params.push(Param::new("Type", "a.tape.TapeType"));
        req.response_codes.push(ResponseCode {
            code: 200,
            payloads: vec![PayloadType::array_of("a.tape.TapeType")],
        });
        let contract = contract_with(
            vec![
                TypeDef::structure(
                    "a.tape.Tape",
                    vec![
                        Element::new("Type", "a.tape.TapeType"),
                        Element::array_of("History", "a.tape.TapeType"),
                        Element::new("State", "a.tape.TapeState"),
                    ],
                ),
                TypeDef::enumeration("a.tape.TapeType", ["LTO5"]),
            ],
            vec![req],
        );

        let out = remap_types(&contract, &ExceptionTable::default());
        assert_eq!(out.requests[0].optional_params[0].ty, "java.lang.String");
        assert_eq!(
            out.requests[0].response_codes[0].payloads[0],
            PayloadType::array_of("java.lang.String")
        );
        let tape = &out.types["a.tape.Tape"];
        assert_eq!(tape.elements[0].ty, "java.lang.String");
        assert_eq!(
            tape.elements[1].component_type.as_deref(),
            Some("java.lang.String")
        );
        assert_eq!(tape.elements[2].ty, "a.tape.TapeState");
        assert!(out.types.contains_key("a.tape.TapeType"));

        assert_eq!(remap_types(&contract, &ExceptionTable::empty()), contract);
    }
}
