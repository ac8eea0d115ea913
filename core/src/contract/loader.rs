#![deny(missing_docs)]

//! # Contract Loading
//!
//! Deserializes an already-parsed contract from JSON or YAML and checks the
//! structural rules every later stage relies on. Resource identifiers outside
//! the resource table are reported against the request that carries them.

use std::collections::HashSet;

use serde_json::Value;

use crate::contract::models::{Contract, Element};
use crate::contract::resources::Resource;
use crate::error::{AppError, AppResult};

impl Contract {
    /// Parses a JSON contract and validates it.
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| AppError::Parse(format!("Failed to parse contract JSON: {}", e)))?;
        Self::from_document(document, "JSON")
    }

    /// Parses a YAML contract and validates it.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let document: Value = serde_yaml::from_str(content)
            .map_err(|e| AppError::Parse(format!("Failed to parse contract YAML: {}", e)))?;
        Self::from_document(document, "YAML")
    }

    fn from_document(document: Value, format: &str) -> AppResult<Self> {
        check_resources(&document)?;
        let contract: Contract = serde_json::from_value(document).map_err(|e| {
            AppError::Parse(format!("Failed to parse contract {}: {}", format, e))
        })?;
        contract.validate()?;
        Ok(contract)
    }

    /// Checks structural rules:
    /// - request names are non-empty and unique;
    /// - every type-table key matches the type's own name;
    /// - a type is a struct or an enum, never both;
    /// - an element has a component type iff it is array-typed.
    pub fn validate(&self) -> AppResult<()> {
        let mut seen = HashSet::new();
        for request in &self.requests {
            if request.name.trim().is_empty() {
                return Err(AppError::malformed("<request>", "request has an empty name"));
            }
            if !seen.insert(request.name.as_str()) {
                return Err(AppError::malformed(
                    &request.name,
                    "request name is declared twice",
                ));
            }
            for param in request.required_params.iter().chain(&request.optional_params) {
                if param.name.is_empty() || param.ty.is_empty() {
                    return Err(AppError::malformed(
                        &request.name,
                        "param is missing a name or a type",
                    ));
                }
            }
        }

        for (key, def) in &self.types {
            if key != &def.name {
                return Err(AppError::malformed(
                    key,
                    format!("type table key does not match type name '{}'", def.name),
                ));
            }
            if !def.elements.is_empty() && !def.enum_constants.is_empty() {
                return Err(AppError::malformed(
                    key,
                    "type declares both elements and enum constants",
                ));
            }
            for element in &def.elements {
                check_element(key, element)?;
            }
        }
        Ok(())
    }
}

/// Rejects resource identifiers outside the resource table, naming the request.
fn check_resources(document: &Value) -> AppResult<()> {
    let Some(requests) = document.get("requests").and_then(Value::as_array) else {
        return Ok(());
    };
    for request in requests {
        let Some(id) = request.get("resource").and_then(Value::as_str) else {
            continue;
        };
        if Resource::from_contract_id(id).is_none() {
            let name = request
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("<request>");
            return Err(AppError::malformed(name, format!("unknown resource '{}'", id)));
        }
    }
    Ok(())
}

fn check_element(type_name: &str, element: &Element) -> AppResult<()> {
    let is_array = element.ty == "array";
    match (&element.component_type, is_array) {
        (None, true) => Err(AppError::malformed(
            type_name,
            format!("array element '{}' has no component type", element.name),
        )),
        (Some(_), false) => Err(AppError::malformed(
            type_name,
            format!(
                "element '{}' has a component type but is not an array",
                element.name
            ),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
requests:
  - name: com.example.GetBucketsRequestHandler
    http_verb: GET
    classification: AmazonStyle
    response_codes:
      - code: 200
        payloads:
          - type: com.example.ListAllMyBucketsResult
types:
  com.example.ListAllMyBucketsResult:
    name: com.example.ListAllMyBucketsResult
    elements:
      - name: Buckets
        type: array
        component_type: com.example.BucketDetails
"#;
        let contract = Contract::from_yaml_str(yaml).unwrap();
        assert_eq!(contract.requests.len(), 1);
        assert_eq!(contract.types.len(), 1);
        assert_eq!(contract.requests[0].response_codes[0].code, 200);
    }

    #[test]
    fn test_unknown_resource_is_malformed() {
        let json = r#"{"requests":[{"name":"a.GetThingRequestHandler","http_verb":"GET","classification":"SpectraStyle","resource":"NOPE"}]}"#;
        let err = Contract::from_json_str(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedContract);
        assert_eq!(
            err.to_string(),
            "Malformed contract at 'a.GetThingRequestHandler': unknown resource 'NOPE'"
        );

        let yaml = "requests:\n  - name: a.PutThingRequestHandler\n    http_verb: PUT\n    classification: SpectraStyle\n    resource: TAPE_THING\n";
        let err = Contract::from_yaml_str(yaml).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedContract);
        assert!(err.to_string().contains("a.PutThingRequestHandler"));
        assert!(err.to_string().contains("TAPE_THING"));
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = Contract::from_json_str("{\"requests\": [").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        let err = Contract::from_json_str(r#"{"requests":[{"name":"X"}]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_rejects_struct_and_enum() {
        let json = r#"{"types":{"T":{"name":"T","elements":[{"name":"a","type":"int"}],"enum_constants":["A"]}}}"#;
        let err = Contract::from_json_str(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedContract);
        assert!(err.to_string().contains("'T'"));
    }

    #[test]
    fn test_rejects_key_mismatch() {
        let json = r#"{"types":{"T":{"name":"U"}}}"#;
        let err = Contract::from_json_str(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedContract);
    }

    #[test]
    fn test_rejects_array_without_component() {
        let json = r#"{"types":{"T":{"name":"T","elements":[{"name":"a","type":"array"}]}}}"#;
        let err = Contract::from_json_str(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedContract);
    }

    #[test]
    fn test_rejects_duplicate_request() {
        let json = r#"{"requests":[
            {"name":"X","http_verb":"GET","classification":"AmazonStyle"},
            {"name":"X","http_verb":"PUT","classification":"AmazonStyle"}]}"#;
        let err = Contract::from_json_str(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedContract);
    }
}
