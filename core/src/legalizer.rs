#![deny(missing_docs)]

//! # Response Type Legalization
//!
//! A response code with two payloads models two views of one endpoint (a
//! simple view and a detailed view gated by a flag). Such requests are split
//! into two requests using the split registry. Array payloads are then
//! replaced with references to synthesized `<Component>List` wrapper types.
//!
//! A wrapper marshals as a `Data` root holding one plural-named array element
//! whose items keep the component's own element name.
//!
//! After this stage every response code carries at most one payload.

use crate::contract::{Element, PayloadType, Request, ResponseCode, TypeDef, TypeTable};
use crate::error::{AppError, AppResult};
use crate::exceptions::{ExceptionTable, SplitRule};
use crate::names::{insert_namespace, namespace_request, pluralize, registry_key, strip_path};

/// Suffix of synthesized array wrapper types.
pub const WRAPPER_SUFFIX: &str = "List";

/// Root element name of synthesized array wrapper types.
pub const WRAPPER_ROOT: &str = "Data";

/// True iff any response code carries more than one payload.
pub fn is_ambiguous(request: &Request) -> bool {
    request.response_codes.iter().any(|c| c.payloads.len() > 1)
}

/// Splits a registered ambiguous request into its simple and detailed variants.
///
/// Returns `[simple, detailed]`. Fails with `UnsupportedSplit` when the request
/// has no registry entry and with `MalformedContract` when the contract no
/// longer matches the entry.
pub fn split(request: &Request, exceptions: &ExceptionTable) -> AppResult<[Request; 2]> {
    let key = registry_key(request.source_name());
    let rule = exceptions
        .split_rule(key)
        .ok_or_else(|| AppError::UnsupportedSplit {
            request: request.name.clone(),
        })?;

    let code = request
        .response_codes
        .iter()
        .find(|c| c.code == rule.code)
        .ok_or_else(|| {
            AppError::malformed(
                &request.name,
                format!("registered split expects response code {}", rule.code),
            )
        })?;
    if code.payloads.len() != 2 {
        return Err(AppError::malformed(
            &request.name,
            format!(
                "response code {} must carry exactly two payloads to split, found {}",
                rule.code,
                code.payloads.len()
            ),
        ));
    }
    if let Some(other) = request
        .response_codes
        .iter()
        .find(|c| c.code != rule.code && c.payloads.len() > 1)
    {
        return Err(AppError::malformed(
            &request.name,
            format!(
                "response code {} is ambiguous but not covered by the split",
                other.code
            ),
        ));
    }

    let simple_payload = find_payload(request, code, rule, true)?;
    let detailed_payload = find_payload(request, code, rule, false)?;

    let flag_idx = request
        .optional_params
        .iter()
        .position(|p| p.name.eq_ignore_ascii_case(&rule.flag_param))
        .ok_or_else(|| {
            AppError::malformed(
                &request.name,
                format!("split flag '{}' is not an optional param", rule.flag_param),
            )
        })?;

    let mut simple = request.clone();
    simple.optional_params.remove(flag_idx);
    simple.response_codes = with_payload(&request.response_codes, rule.code, simple_payload);

    let mut detailed = request.clone();
    let flag = detailed.optional_params.remove(flag_idx);
    detailed.required_params.push(flag);
    detailed.response_codes = with_payload(&request.response_codes, rule.code, detailed_payload);
    detailed.name = namespace_request(
        &insert_namespace(key, &rule.name_token),
        request.classification,
    );
    if !request.contract_name.is_empty() {
        detailed.contract_name = insert_namespace(&request.contract_name, &rule.name_token);
    }

    tracing::debug!(
        request = %request.name,
        detailed = %detailed.name,
        "split ambiguous request"
    );
    Ok([simple, detailed])
}

fn find_payload(
    request: &Request,
    code: &ResponseCode,
    rule: &SplitRule,
    simple: bool,
) -> AppResult<PayloadType> {
    let matcher = if simple { &rule.simple } else { &rule.detailed };
    code.payloads
        .iter()
        .find(|p| matcher.matches(p))
        .cloned()
        .ok_or_else(|| {
            AppError::malformed(
                &request.name,
                format!(
                    "response code {} no longer carries the registered {} payload '{}'",
                    code.code,
                    if simple { "simple" } else { "detailed" },
                    matcher.ty
                ),
            )
        })
}

fn with_payload(codes: &[ResponseCode], code: u16, payload: PayloadType) -> Vec<ResponseCode> {
    codes
        .iter()
        .map(|c| {
            if c.code == code {
                ResponseCode {
                    code: c.code,
                    payloads: vec![payload.clone()],
                }
            } else {
                c.clone()
            }
        })
        .collect()
}

/// Name of the wrapper type synthesized for an array of `component`.
pub fn wrapper_name(component: &str) -> String {
    format!("{}{}", component, WRAPPER_SUFFIX)
}

/// Builds the wrapper for an array payload, or `None` for plain payloads.
///
/// The wrapper has a single `array` element named after the pluralized,
/// stripped component. Each item marshals under the component's own root
/// name when it has one, else under the stripped component name. Components
/// listed as unrooted in `exceptions` yield a wrapper without a root element.
pub fn synthesize_array_wrapper(
    payload: &PayloadType,
    types: &TypeTable,
    exceptions: &ExceptionTable,
) -> Option<TypeDef> {
    let component = payload.component_type.as_deref()?;
    let stripped = strip_path(component);
    let (root, item_name) = match exceptions.unrooted_element_name(component) {
        Some(item) => ("", item.to_string()),
        None => (WRAPPER_ROOT, item_marshal_name(component, types)),
    };
    let element = Element::array_of(pluralize(stripped), component).marshaled_as(item_name);
    Some(TypeDef::structure(wrapper_name(component), vec![element]).marshaled_as(root))
}

fn item_marshal_name(component: &str, types: &TypeTable) -> String {
    match types.get(component) {
        Some(def) if !def.name_to_marshal.is_empty() && def.name_to_marshal != WRAPPER_ROOT => {
            def.name_to_marshal.clone()
        }
        _ => strip_path(component).to_string(),
    }
}

/// Registers `wrapper` in `types`, deduplicating by name.
///
/// A different definition already registered under that name is a
/// `DuplicateSyntheticType` error.
pub fn register_wrapper(types: &mut TypeTable, wrapper: TypeDef) -> AppResult<()> {
    match types.get(&wrapper.name) {
        Some(existing) if existing != &wrapper => Err(AppError::DuplicateSyntheticType {
            type_name: wrapper.name,
        }),
        Some(_) => Ok(()),
        None => {
            types.insert(wrapper.name.clone(), wrapper);
            Ok(())
        }
    }
}

/// Replaces every array payload of `request` with a reference to its wrapper,
/// registering the wrappers in `types`.
pub fn wrap_array_payloads(
    request: &Request,
    types: &mut TypeTable,
    exceptions: &ExceptionTable,
) -> AppResult<Request> {
    let mut out = request.clone();
    for code in &mut out.response_codes {
        for payload in &mut code.payloads {
            if let Some(wrapper) = synthesize_array_wrapper(payload, types, exceptions) {
                *payload = PayloadType::new(wrapper.name.clone());
                register_wrapper(types, wrapper)?;
            }
        }
    }
    Ok(out)
}

/// Checks that no response code carries more than one payload.
pub fn verify_single_payloads(request: &Request) -> AppResult<()> {
    match request.response_codes.iter().find(|c| c.payloads.len() > 1) {
        Some(code) => Err(AppError::malformed(
            &request.name,
            format!(
                "response code {} carries {} payloads after legalization",
                code.code,
                code.payloads.len()
            ),
        )),
        None => Ok(()),
    }
}

/// Runs the whole stage over all requests.
///
/// Returns the legalized requests, in input order with split variants
/// adjacent, and the type table extended with wrapper types.
pub fn legalize(
    requests: &[Request],
    types: &TypeTable,
    exceptions: &ExceptionTable,
) -> AppResult<(Vec<Request>, TypeTable)> {
    let mut table = types.clone();
    let mut out = Vec::with_capacity(requests.len());

    for request in requests {
        if request.response_codes.is_empty() {
            tracing::warn!(request = %request.name, "request has no response codes");
        }
        let variants = if is_ambiguous(request) {
            split(request, exceptions)?.to_vec()
        } else {
            vec![request.clone()]
        };
        for variant in variants {
            let wrapped = wrap_array_payloads(&variant, &mut table, exceptions)?;
            verify_single_payloads(&wrapped)?;
            out.push(wrapped);
        }
    }

    let synthesized = table.len() - types.len();
    tracing::info!(requests = out.len(), synthesized, "legalized response types");
    Ok((out, table))
}
