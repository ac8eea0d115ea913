#![deny(missing_docs)]

//! # Contract Models
//!
//! Intermediate representation of a REST contract: requests, params, response
//! codes and the name-keyed type table. The same structs carry the canonical
//! output, with `shape` and `arguments` filled in by the later stages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::contract::resources::Resource;

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// HEAD
    Head,
}

/// Request family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// S3-compatible requests.
    AmazonStyle,
    /// Vendor extension requests. Their names are namespaced.
    SpectraStyle,
    /// Internal requests, dropped unless explicitly requested.
    SpectraInternal,
}

/// Whether a bucket or object name is part of the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    /// Must be supplied.
    Required,
    /// Must not be supplied.
    NotAllowed,
    /// Not stated by the contract.
    #[default]
    Unspecified,
}

/// Action performed on the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Delete many at once.
    BulkDelete,
    /// Modify many at once.
    BulkModify,
    /// Create.
    Create,
    /// Delete.
    Delete,
    /// List.
    List,
    /// Modify.
    Modify,
    /// Show one.
    Show,
}

/// Whether the resource is addressed as one global instance or by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    /// One global instance.
    Singleton,
    /// Addressed by identifier.
    NonSingleton,
}

/// Secondary operation discriminant carried by the `Operation` query param.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Operation {
    Allocate,
    CancelEject,
    CancelFormat,
    CancelImport,
    CancelOnline,
    Compact,
    Deallocate,
    Eject,
    Format,
    GetPhysicalPlacement,
    Import,
    MarkAsFailed,
    Online,
    Quiesce,
    StartBulkGet,
    StartBulkPut,
    StartBulkStage,
    StartBulkVerify,
    Verify,
    VerifyPhysicalPlacement,
    VerifySafeToStartBulkPut,
}

/// A query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name, e.g. "PageLength".
    pub name: String,
    /// Primitive, `void`, or a type-table name.
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether the parameter accepts null.
    #[serde(default)]
    pub nullable: bool,
}

impl Param {
    /// Creates a non-nullable parameter.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            nullable: false,
        }
    }
}

/// A response payload type.
///
/// `component_type` is present iff the payload denotes "array of component".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadType {
    /// The type name. `null` means the response has no body.
    #[serde(rename = "type")]
    pub ty: String,
    /// Array component, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
}

impl PayloadType {
    /// A plain payload.
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            component_type: None,
        }
    }

    /// An array-of-component payload.
    pub fn array_of(component: impl Into<String>) -> Self {
        Self {
            ty: "array".into(),
            component_type: Some(component.into()),
        }
    }

    /// Whether this payload stands for an empty body.
    pub fn is_null(&self) -> bool {
        self.component_type.is_none() && self.ty == "null"
    }
}

/// One HTTP status code with its payload types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseCode {
    /// HTTP status.
    pub code: u16,
    /// Payload types. More than one marks an ambiguous response.
    #[serde(default)]
    pub payloads: Vec<PayloadType>,
}

impl ResponseCode {
    /// Codes of 300 and above describe error bodies.
    pub fn is_error(&self) -> bool {
        self.code >= 300
    }
}

/// Structural shape of a request, assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Shape {
    Basic,
    HeadBucket,
    HeadObject,
    GetObject,
    CreateObject,
    StreamPayload,
    CompleteMultipartUpload,
    MultiFileDelete,
    NotificationCreate,
    NotificationGet,
    NotificationDelete,
    BulkReplicate,
    BulkPut,
    BulkGet,
    BulkVerify,
    ObjectsPayloadWithSize,
    ObjectsPayloadWithLengthOffset,
    ObjectsPayloadSimple,
    IdsPayload,
    StringPayload,
    AllocateJobChunk,
    JobChunksReady,
    PaginatedListing,
}

impl Shape {
    /// Bulk shapes inherit part of their arguments from a shared base.
    pub fn is_bulk(self) -> bool {
        matches!(
            self,
            Shape::BulkPut | Shape::BulkGet | Shape::BulkReplicate | Shape::BulkVerify
        )
    }
}

/// A derived argument: a name and a path-stripped type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// Path-stripped type name.
    #[serde(rename = "type")]
    pub ty: String,
}

impl Argument {
    /// Creates an argument.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// The argument lists backends generate constructors and setters from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentLists {
    /// Path-derived arguments.
    pub path: Vec<Argument>,
    /// Constructor arguments: path, required query params, synthetic arguments.
    pub constructor: Vec<Argument>,
    /// Optional arguments, with UUID dual overloads expanded.
    pub optional: Vec<Argument>,
    /// Required query parameters in declaration order.
    pub query_params: Vec<Argument>,
    /// Fields a backend declares on the request type.
    pub class_variables: Vec<Argument>,
}

/// A request as described by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Current name. Qualified in the contract, canonical after normalization.
    pub name: String,
    /// Name as it appeared in the contract. Filled in by normalization.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contract_name: String,
    /// HTTP verb.
    pub http_verb: HttpVerb,
    /// Request family.
    pub classification: Classification,
    /// Bucket requirement.
    #[serde(default)]
    pub bucket_requirement: Requirement,
    /// Object requirement.
    #[serde(default)]
    pub object_requirement: Requirement,
    /// Action, when stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    /// Resource, when stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
    /// Resource kind, when stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_kind: Option<ResourceKind>,
    /// Operation, when stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    /// Whether the resource identifier appears in the path.
    #[serde(default)]
    pub include_in_path: bool,
    /// Response codes in declaration order.
    #[serde(default)]
    pub response_codes: Vec<ResponseCode>,
    /// Required query params in declaration order.
    #[serde(default)]
    pub required_params: Vec<Param>,
    /// Optional query params in declaration order.
    #[serde(default)]
    pub optional_params: Vec<Param>,
    /// Assigned by the classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    /// Assigned by the argument deriver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<ArgumentLists>,
}

impl Request {
    /// Creates a request with no resource information or params.
    pub fn new(
        name: impl Into<String>,
        http_verb: HttpVerb,
        classification: Classification,
    ) -> Self {
        Self {
            name: name.into(),
            contract_name: String::new(),
            http_verb,
            classification,
            bucket_requirement: Requirement::Unspecified,
            object_requirement: Requirement::Unspecified,
            action: None,
            resource: None,
            resource_kind: None,
            operation: None,
            include_in_path: false,
            response_codes: Vec::new(),
            required_params: Vec::new(),
            optional_params: Vec::new(),
            shape: None,
            arguments: None,
        }
    }

    /// Name used for registry lookups: the contract name if known, else the current name.
    pub fn source_name(&self) -> &str {
        if self.contract_name.is_empty() {
            &self.name
        } else {
            &self.contract_name
        }
    }
}

/// A struct element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element name.
    pub name: String,
    /// Element type. `array` when `component_type` is set.
    #[serde(rename = "type")]
    pub ty: String,
    /// Array component, only for array-typed elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    /// Whether the element may be absent.
    #[serde(default)]
    pub nullable: bool,
    /// Marshaling exclusion declared on the element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_from_marshaler: Option<MarshalExclusion>,
    /// Name written when marshaling, when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marshaled_name: Option<String>,
}

/// When an element is left out of the marshaled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarshalExclusion {
    /// Never marshaled.
    Always,
    /// Omitted when the value is null.
    ValueIsNull,
}

impl Element {
    /// Creates a scalar element.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            component_type: None,
            nullable: false,
            exclude_from_marshaler: None,
            marshaled_name: None,
        }
    }

    /// Creates an array element.
    pub fn array_of(name: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            component_type: Some(component.into()),
            ..Self::new(name, "array")
        }
    }

    /// Sets the marshaled name.
    pub fn marshaled_as(mut self, name: impl Into<String>) -> Self {
        self.marshaled_name = Some(name.into());
        self
    }
}

/// A type-table entry: a struct (elements) or an enum (constants), never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Type name, matching its key in the type table.
    pub name: String,
    /// Root element name used when marshaling. Empty for unrooted types.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_to_marshal: String,
    /// Struct elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<Element>,
    /// Enum constants.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_constants: Vec<String>,
}

impl TypeDef {
    /// Creates a struct type.
    pub fn structure(name: impl Into<String>, elements: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            name_to_marshal: String::new(),
            elements,
            enum_constants: Vec::new(),
        }
    }

    /// Creates an enum type.
    pub fn enumeration<S: Into<String>>(
        name: impl Into<String>,
        constants: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            name_to_marshal: String::new(),
            elements: Vec::new(),
            enum_constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the root element name used when marshaling.
    pub fn marshaled_as(mut self, name: impl Into<String>) -> Self {
        self.name_to_marshal = name.into();
        self
    }

    /// Enums are types with constants.
    pub fn is_enum(&self) -> bool {
        !self.enum_constants.is_empty()
    }
}

/// Name-keyed type table in contract order.
pub type TypeTable = IndexMap<String, TypeDef>;

/// The full input contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Requests in contract order.
    #[serde(default)]
    pub requests: Vec<Request>,
    /// Type table in contract order.
    #[serde(default)]
    pub types: TypeTable,
}
