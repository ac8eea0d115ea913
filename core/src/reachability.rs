#![deny(missing_docs)]

//! # Type Reachability
//!
//! Dead-type elimination. The reachable set is seeded with every
//! non-primitive type a surviving request mentions, then closed over struct
//! elements with a worklist until no new name appears. The type table is
//! restricted to that set, keeping table order.

use std::collections::VecDeque;

use indexmap::IndexSet;

use crate::contract::{Request, TypeTable};
use crate::names::strip_path;

/// Type names that never refer to the type table. Compared after path stripping.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "void", "null", "boolean", "Boolean", "int", "Integer", "long", "Long", "double", "Double",
    "float", "Float", "short", "byte", "char", "String", "UUID", "Date", "array", "Object",
];

/// Whether `name` is a primitive rather than a type-table reference.
pub fn is_primitive(name: &str) -> bool {
    name.is_empty() || PRIMITIVE_TYPES.contains(&strip_path(name))
}

/// Non-primitive type names a request references, in first-seen order.
pub fn request_references(request: &Request) -> IndexSet<String> {
    let params = request
        .required_params
        .iter()
        .chain(&request.optional_params)
        .map(|p| Some(p.ty.as_str()));
    let payloads = request
        .response_codes
        .iter()
        .flat_map(|c| &c.payloads)
        .flat_map(|p| [Some(p.ty.as_str()), p.component_type.as_deref()]);

    params
        .chain(payloads)
        .flatten()
        .filter(|name| !is_primitive(name))
        .map(str::to_string)
        .collect()
}

/// Closes `seeds` over the type table.
///
/// Struct elements contribute their type and component type; enums
/// contribute nothing. Names missing from the table stay in the result and
/// are logged.
pub fn reachable_types(seeds: IndexSet<String>, types: &TypeTable) -> IndexSet<String> {
    let mut reached = IndexSet::new();
    let mut worklist: VecDeque<String> = VecDeque::new();
    for seed in seeds {
        if reached.insert(seed.clone()) {
            worklist.push_back(seed);
        }
    }

    while let Some(name) = worklist.pop_front() {
        let Some(def) = types.get(&name) else {
            tracing::warn!(type_name = %name, "reachable type is not in the type table");
            continue;
        };
        let referenced = def
            .elements
            .iter()
            .flat_map(|e| [Some(e.ty.as_str()), e.component_type.as_deref()])
            .flatten()
            .filter(|n| !is_primitive(n));
        for next in referenced {
            if !reached.contains(next) {
                reached.insert(next.to_string());
                worklist.push_back(next.to_string());
            }
        }
    }
    reached
}

/// Restricts `types` to what `requests` can reach, in table order.
pub fn prune_types(requests: &[Request], types: &TypeTable) -> TypeTable {
    let seeds: IndexSet<String> = requests.iter().flat_map(request_references).collect();
    let reached = reachable_types(seeds, types);
    let pruned: TypeTable = types
        .iter()
        .filter(|(name, _)| reached.contains(name.as_str()))
        .map(|(name, def)| (name.clone(), def.clone()))
        .collect();
    tracing::info!(
        kept = pruned.len(),
        removed = types.len() - pruned.len(),
        "pruned unreachable types"
    );
    pruned
}
