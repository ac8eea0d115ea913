#![deny(missing_docs)]

//! # Canonicalization Pipeline
//!
//! Runs every stage in order over an immutable contract:
//!
//! 1. Validate the contract structure.
//! 2. Sanitize: drop internal requests, collapse nested-type markers, apply
//!    marshaling exclusions, substitute mapped types.
//! 3. Normalize request names.
//! 4. Legalize response types (split, wrap arrays), then reject canonical
//!    name collisions.
//! 5. Classify.
//! 6. Derive arguments.
//! 7. Verify that every type the requests reach is in the type table.
//! 8. Prune unreachable types.
//!
//! Any stage error aborts the run; there is no partial output.

use serde::{Deserialize, Serialize};

use crate::arguments::derive_request;
use crate::classifier::classify_request;
use crate::contract::{Contract, Request, TypeDef, TypeTable};
use crate::error::{AppError, AppResult};
use crate::exceptions::ExceptionTable;
use crate::legalizer::legalize;
use crate::names::{check_unique_names, normalize_request};
use crate::reachability::{is_primitive, prune_types, reachable_types, request_references};
use crate::sanitizer::{
    apply_marshal_exclusions, remap_types, remove_internal_requests, remove_nested_type_markers,
};

/// Pipeline settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Keep `SpectraInternal` requests.
    pub generate_internal: bool,
    /// Name-literal special cases.
    pub exceptions: ExceptionTable,
}

/// Pipeline output: classified, argument-resolved requests and the pruned type table.
///
/// Backends treat it as read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalModel {
    /// Requests in contract order, split variants adjacent.
    pub requests: Vec<Request>,
    /// Reachable types in contract order, synthetic wrappers last.
    pub types: TypeTable,
}

impl CanonicalModel {
    /// Struct types.
    pub fn structs(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values().filter(|t| !t.is_enum())
    }

    /// Enum types.
    pub fn enums(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values().filter(|t| t.is_enum())
    }

    /// Looks up a request by canonical name.
    pub fn request(&self, name: &str) -> Option<&Request> {
        self.requests.iter().find(|r| r.name == name)
    }
}

/// Runs the pipeline with default settings.
pub fn canonicalize(contract: &Contract) -> AppResult<CanonicalModel> {
    canonicalize_with(contract, &PipelineConfig::default())
}

/// Runs the pipeline.
pub fn canonicalize_with(
    contract: &Contract,
    config: &PipelineConfig,
) -> AppResult<CanonicalModel> {
    tracing::debug!(
        requests = contract.requests.len(),
        types = contract.types.len(),
        "canonicalizing contract"
    );

    contract.validate()?;

    let filtered = remove_internal_requests(contract, config.generate_internal);
    let unnested = remove_nested_type_markers(&filtered)?;
    let sanitized = remap_types(&apply_marshal_exclusions(&unnested), &config.exceptions);

    let normalized: Vec<Request> = sanitized.requests.iter().map(normalize_request).collect();

    let (legalized, extended_types) =
        legalize(&normalized, &sanitized.types, &config.exceptions)?;
    check_unique_names(&legalized)?;

    let requests = legalized
        .iter()
        .map(classify_request)
        .map(|r| derive_request(&r, &config.exceptions))
        .collect::<AppResult<Vec<Request>>>()?;

    verify_integrity(&requests, &extended_types)?;
    let types = prune_types(&requests, &extended_types);

    tracing::info!(requests = requests.len(), types = types.len(), "canonical model ready");
    Ok(CanonicalModel { requests, types })
}

/// Fails with `UnresolvedType` when a request, or a type reachable from the
/// requests, references a non-primitive name missing from `types`.
///
/// The error names the first such reference, requests before types.
pub fn verify_integrity(requests: &[Request], types: &TypeTable) -> AppResult<()> {
    let unresolved = |type_name: &str, referenced_by: &str| AppError::UnresolvedType {
        type_name: type_name.to_string(),
        referenced_by: referenced_by.to_string(),
    };

    for request in requests {
        if let Some(missing) = request_references(request)
            .into_iter()
            .find(|name| !types.contains_key(name))
        {
            return Err(unresolved(&missing, &request.name));
        }
    }

    let seeds = requests.iter().flat_map(request_references).collect();
    for name in reachable_types(seeds, types) {
        let Some(def) = types.get(&name) else {
            continue;
        };
        let missing = def
            .elements
            .iter()
            .flat_map(|e| [Some(e.ty.as_str()), e.component_type.as_deref()])
            .flatten()
            .find(|n| !is_primitive(n) && !types.contains_key(*n));
        if let Some(missing) = missing {
            return Err(unresolved(missing, &def.name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{
        Classification, Element, HttpVerb, MarshalExclusion, PayloadType, ResponseCode, Shape,
    };
    use crate::error::ErrorKind;

    fn returning(name: &str, ty: &str) -> Request {
        let mut r = Request::new(name, HttpVerb::Get, Classification::AmazonStyle);
        r.response_codes.push(ResponseCode {
            code: 200,
            payloads: vec![PayloadType::new(ty)],
        });
        r
    }

    #[test]
    fn test_internal_requests_dropped_by_default() {
        let mut hidden = returning("a.HiddenRequestHandler", "null");
        hidden.classification = Classification::SpectraInternal;
        let contract = Contract {
            requests: vec![returning("a.GetServiceRequestHandler", "null"), hidden],
            types: TypeTable::new(),
        };

        let model = canonicalize(&contract).unwrap();
        assert_eq!(model.requests.len(), 1);
        assert_eq!(model.requests[0].name, "GetServiceRequest");
        assert_eq!(model.requests[0].shape, Some(Shape::Basic));
        assert!(model.requests[0].arguments.is_some());

        let config = PipelineConfig {
            generate_internal: true,
            ..PipelineConfig::default()
        };
        assert_eq!(canonicalize_with(&contract, &config).unwrap().requests.len(), 2);
    }

    fn table(defs: Vec<TypeDef>) -> TypeTable {
        defs.into_iter().map(|t| (t.name.clone(), t)).collect()
    }

    #[test]
    fn test_verify_integrity_flags_dangling_references() {
        let requests = vec![returning("GetTapeRequest", "a.Tape")];

        let err = verify_integrity(&requests, &TypeTable::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedType);
        assert_eq!(
            err.to_string(),
            "Type 'a.Tape' referenced by 'GetTapeRequest' is not in the type table"
        );

        let types = table(vec![TypeDef::structure(
            "a.Tape",
            vec![Element::new("Id", "java.util.UUID"), Element::new("State", "a.TapeState")],
        )]);
        let err = verify_integrity(&requests, &types).unwrap_err();
        assert!(err.to_string().contains("'a.TapeState' referenced by 'a.Tape'"));

        let mut types = types;
        types.insert("a.TapeState".into(), TypeDef::enumeration("a.TapeState", ["NORMAL"]));
        types.insert(
            "a.Orphan".into(),
            TypeDef::structure("a.Orphan", vec![Element::new("Ghost", "a.Ghost")]),
        );
        assert!(verify_integrity(&requests, &types).is_ok());
    }

    #[test]
    fn test_dangling_reference_aborts_pipeline() {
        let contract = Contract {
            requests: vec![returning("a.GetTapeRequestHandler", "a.Tape")],
            types: table(vec![TypeDef::structure(
                "a.Tape",
                vec![Element::array_of("Drives", "a.TapeDrive")],
            )]),
        };
        let err = canonicalize(&contract).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedType);
        assert!(err.to_string().contains("a.TapeDrive"));
    }

    #[test]
    fn test_validates_contracts_built_in_code() {
        let mut both = TypeDef::structure("a.A", vec![Element::new("b", "a.B")]);
        both.enum_constants.push("X".into());
        let contract = Contract {
            requests: vec![returning("a.GetARequestHandler", "a.A")],
            types: table(vec![both, TypeDef::structure("a.B", vec![])]),
        };
        let err = canonicalize(&contract).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedContract);
        assert!(err.to_string().contains("'a.A'"));
    }

    #[test]
    fn test_colliding_canonical_names_abort() {
        let contract = Contract {
            requests: vec![
                returning("a.GetFooRequestHandler", "null"),
                returning("b.GetFooRequestHandler", "null"),
            ],
            types: TypeTable::new(),
        };
        let err = canonicalize(&contract).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestNameConflict);
        assert!(err.to_string().contains("'GetFooRequest'"));
    }

    #[test]
    fn test_sanitize_stage_applies_exclusions_and_type_map() {
        let mut secret = Element::new("Secret", "String");
        secret.exclude_from_marshaler = Some(MarshalExclusion::Always);
        let contract = Contract {
            requests: vec![returning("a.GetTapeRequestHandler", "a.Tape")],
            types: table(vec![
                TypeDef::structure("a.Tape", vec![Element::new("Type", "a.TapeType"), secret]),
                TypeDef::enumeration("a.TapeType", ["LTO6"]),
            ]),
        };
        let model = canonicalize(&contract).unwrap();
        assert_eq!(
            model.types["a.Tape"].elements,
            vec![Element::new("Type", "java.lang.String")]
        );
        assert!(!model.types.contains_key("a.TapeType"));
    }

    #[test]
    fn test_structs_and_enums() {
        let model = CanonicalModel {
            requests: vec![],
            types: [
                TypeDef::structure("S", vec![Element::new("e", "E")]),
                TypeDef::enumeration("E", ["X"]),
            ]
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect(),
        };
        assert_eq!(model.structs().count(), 1);
        assert_eq!(model.enums().next().map(|t| t.name.as_str()), Some("E"));
        assert!(model.request("nope").is_none());
    }
}
