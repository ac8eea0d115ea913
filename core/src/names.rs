#![deny(missing_docs)]

//! # Name Normalization
//!
//! Pure helpers that turn qualified handler names from the contract into
//! canonical request and type names.

use indexmap::IndexMap;

use crate::contract::{Classification, Request};
use crate::error::{AppError, AppResult};

/// Suffix carried by every request handler name in the contract.
pub const HANDLER_SUFFIX: &str = "Handler";

/// Token inserted into vendor-extension request names.
pub const SPECTRA_NAMESPACE: &str = "SpectraS3";

const REQUEST_MARKER: &str = "Request";

/// Returns the substring after the last `.`, or the input if it has none.
///
/// # Examples
///
/// `com.spectralogic.Tape` -> `Tape`
pub fn strip_path(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Removes a trailing `Handler`, if present.
pub fn strip_handler_suffix(name: &str) -> &str {
    name.strip_suffix(HANDLER_SUFFIX).unwrap_or(name)
}

/// Inserts `token` immediately before the first `Request` in `name`.
///
/// No-op when `Request` is absent or already directly preceded by `token`.
pub fn insert_namespace(name: &str, token: &str) -> String {
    match name.find(REQUEST_MARKER) {
        Some(idx) if !name[..idx].ends_with(token) => {
            format!("{}{}{}", &name[..idx], token, &name[idx..])
        }
        _ => name.to_string(),
    }
}

/// Namespaces a request name according to its classification.
///
/// Only vendor-extension requests gain the `SpectraS3` token.
pub fn namespace_request(name: &str, classification: Classification) -> String {
    match classification {
        Classification::SpectraStyle => insert_namespace(name, SPECTRA_NAMESPACE),
        _ => name.to_string(),
    }
}

/// Canonical request name: path stripped, handler suffix removed, namespaced.
pub fn canonical_name(request: &Request) -> String {
    let base = strip_handler_suffix(strip_path(&request.name));
    namespace_request(base, request.classification)
}

/// Key used by the split registry: path stripped, handler suffix removed.
pub fn registry_key(name: &str) -> &str {
    strip_handler_suffix(strip_path(name))
}

/// Removes nested-type markers: `a.b.Outer$Inner` -> `a.b.Inner`.
pub fn remove_nested_marker(name: &str) -> String {
    match name.rfind('$') {
        Some(dollar) => {
            let prefix = match name[..dollar].rfind('.') {
                Some(dot) => &name[..=dot],
                None => "",
            };
            format!("{}{}", prefix, &name[dollar + 1..])
        }
        None => name.to_string(),
    }
}

/// Returns a copy of `request` renamed to its canonical name.
///
/// The contract name is kept so later stages can consult the exception table.
pub fn normalize_request(request: &Request) -> Request {
    let mut renamed = request.clone();
    if renamed.contract_name.is_empty() {
        renamed.contract_name = request.name.clone();
    }
    renamed.name = canonical_name(request);
    renamed
}

/// English plural of a singular type name: `Tape` -> `Tapes`,
/// `BucketAcl` -> `BucketAcls`, `Policy` -> `Policies`, `Box` -> `Boxes`.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix(['y', 'Y']) {
        let before = stem.chars().last().map(|c| c.to_ascii_lowercase());
        if before.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}

/// Fails with `RequestNameConflict` when two requests share a canonical name.
///
/// Distinct contract handlers can collide once their package is stripped, and
/// a split's detailed variant can land on a name the contract already uses.
pub fn check_unique_names(requests: &[Request]) -> AppResult<()> {
    let mut seen: IndexMap<&str, &str> = IndexMap::new();
    for request in requests {
        if let Some(first) = seen.insert(request.name.as_str(), request.source_name()) {
            return Err(AppError::RequestNameConflict {
                request_name: request.name.clone(),
                first: first.to_string(),
                second: request.source_name().to_string(),
            });
        }
    }
    Ok(())
}
