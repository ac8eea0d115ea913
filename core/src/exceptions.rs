#![deny(missing_docs)]

//! # Exception Table
//!
//! Every name-literal special case of the pipeline lives here, keyed by
//! request name, so that a contract change which stops matching an entry can
//! be detected instead of silently ignored.

use indexmap::{IndexMap, IndexSet};

use crate::contract::PayloadType;
use crate::names::strip_path;

/// Revision of the built-in table. Bump when an entry changes.
pub const EXCEPTION_TABLE_VERSION: u32 = 1;

/// Matches a payload by path-stripped type and component names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadMatcher {
    /// Stripped type name.
    pub ty: String,
    /// Stripped component name, for array payloads.
    pub component_type: Option<String>,
}

impl PayloadMatcher {
    /// Matches a plain payload type.
    pub fn named(ty: &str) -> Self {
        Self {
            ty: ty.to_string(),
            component_type: None,
        }
    }

    /// Matches an array-of-component payload.
    pub fn array_of(component: &str) -> Self {
        Self {
            ty: "array".to_string(),
            component_type: Some(component.to_string()),
        }
    }

    /// Whether `payload` is the one this matcher describes.
    pub fn matches(&self, payload: &PayloadType) -> bool {
        if strip_path(&payload.ty) != self.ty {
            return false;
        }
        match (&self.component_type, &payload.component_type) {
            (Some(expected), Some(actual)) => strip_path(actual) == expected,
            (None, None) => true,
            _ => false,
        }
    }
}

/// How one ambiguous-by-design request is split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRule {
    /// Token inserted into the detailed variant's name.
    pub name_token: String,
    /// Optional flag param that selects the detailed view.
    pub flag_param: String,
    /// The response code carrying two payloads.
    pub code: u16,
    /// Payload kept by the simple variant.
    pub simple: PayloadMatcher,
    /// Payload kept by the detailed variant.
    pub detailed: PayloadMatcher,
}

impl SplitRule {
    /// The `FullDetails` rule shared by every built-in entry.
    pub fn full_details(simple: PayloadMatcher, detailed: PayloadMatcher) -> Self {
        Self {
            name_token: "FullDetails".to_string(),
            flag_param: "FullDetails".to_string(),
            code: 200,
            simple,
            detailed,
        }
    }
}

/// The versioned table of name-literal special cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTable {
    /// Table revision.
    pub version: u32,
    /// Split registry, keyed by path-stripped, handler-stripped request name.
    pub splits: IndexMap<String, SplitRule>,
    /// Params always typed `String`, regardless of the contract.
    pub string_params: IndexSet<String>,
    /// Arguments bulk requests inherit from their shared base.
    pub bulk_base_arguments: IndexSet<String>,
    /// Further arguments bulk requests never declare themselves.
    pub bulk_excluded_arguments: IndexSet<String>,
    /// Type substitutions, keyed by path-stripped type name.
    pub type_map: IndexMap<String, String>,
    /// Array components whose wrapper has no root element, keyed by
    /// path-stripped component name, with the marshaled element name.
    pub unrooted_array_components: IndexMap<String, String>,
}

impl Default for ExceptionTable {
    fn default() -> Self {
        let mut splits = IndexMap::new();
        splits.insert(
            "GetPhysicalPlacementForObjectsRequest".to_string(),
            SplitRule::full_details(
                PayloadMatcher::named("PhysicalPlacementApiBean"),
                PayloadMatcher::named("BlobApiBeansContainer"),
            ),
        );
        splits.insert(
            "VerifyPhysicalPlacementForObjectsRequest".to_string(),
            SplitRule::full_details(
                PayloadMatcher::named("PhysicalPlacementApiBean"),
                PayloadMatcher::named("BlobApiBeansContainer"),
            ),
        );
        splits.insert(
            "GetTapePartitionRequest".to_string(),
            SplitRule::full_details(
                PayloadMatcher::named("TapePartition"),
                PayloadMatcher::named("DetailedTapePartition"),
            ),
        );
        splits.insert(
            "GetTapeRequest".to_string(),
            SplitRule::full_details(
                PayloadMatcher::named("Tape"),
                PayloadMatcher::named("TapeApiBean"),
            ),
        );

        Self {
            version: EXCEPTION_TABLE_VERSION,
            splits,
            string_params: ["BucketId"].into_iter().map(String::from).collect(),
            bulk_base_arguments: ["Priority", "WriteOptimization", "BucketName", "Objects"]
                .into_iter()
                .map(String::from)
                .collect(),
            bulk_excluded_arguments: ["MaxUploadSize"].into_iter().map(String::from).collect(),
            type_map: [("TapeType".to_string(), "java.lang.String".to_string())]
                .into_iter()
                .collect(),
            unrooted_array_components: [("NamedDetailedTape".to_string(), "Tape".to_string())]
                .into_iter()
                .collect(),
        }
    }
}

impl ExceptionTable {
    /// An empty table. Useful for contracts with no special cases.
    pub fn empty() -> Self {
        Self {
            version: EXCEPTION_TABLE_VERSION,
            splits: IndexMap::new(),
            string_params: IndexSet::new(),
            bulk_base_arguments: IndexSet::new(),
            bulk_excluded_arguments: IndexSet::new(),
            type_map: IndexMap::new(),
            unrooted_array_components: IndexMap::new(),
        }
    }

    /// Adds or replaces a split rule.
    pub fn with_split(mut self, key: impl Into<String>, rule: SplitRule) -> Self {
        self.splits.insert(key.into(), rule);
        self
    }

    /// Looks up the split rule for a registry key.
    pub fn split_rule(&self, key: &str) -> Option<&SplitRule> {
        self.splits.get(key)
    }

    /// Whether `param_name` is always downgraded to `String`. Case-insensitive.
    pub fn is_string_param(&self, param_name: &str) -> bool {
        self.string_params
            .iter()
            .any(|p| p.eq_ignore_ascii_case(param_name))
    }

    /// Whether a bulk request leaves `arg_name` to its shared base. Case-insensitive.
    pub fn is_bulk_inherited(&self, arg_name: &str) -> bool {
        self.bulk_base_arguments
            .iter()
            .chain(&self.bulk_excluded_arguments)
            .any(|a| a.eq_ignore_ascii_case(arg_name))
    }

    /// Adds or replaces a type substitution.
    pub fn with_type_mapping(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.type_map.insert(from.into(), to.into());
        self
    }

    /// The substitute for `type_name`, looked up by its stripped name.
    pub fn mapped_type(&self, type_name: &str) -> Option<&str> {
        self.type_map.get(strip_path(type_name)).map(String::as_str)
    }

    /// Marshaled element name for an unrooted array of `component`.
    pub fn unrooted_element_name(&self, component: &str) -> Option<&str> {
        self.unrooted_array_components
            .get(strip_path(component))
            .map(String::as_str)
    }
}
