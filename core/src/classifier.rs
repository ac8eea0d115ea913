#![deny(missing_docs)]

//! # Request Classification
//!
//! Infers each request's structural [`Shape`] from its verb, family,
//! resource, action, operation and the presence of specific named params.
//!
//! Classification is a single ordered table of `(shape, predicate)` rows.
//! The first row whose predicate holds wins; no match yields `Shape::Basic`.
//! Refinements (e.g. `BulkReplicate` over `BulkPut`) are listed first.
//!
//! Predicates are total: a request missing a field they inspect simply does
//! not match.

use crate::contract::{
    Action, Classification, HttpVerb, Operation, Param, Request, Requirement, Resource,
    ResourceKind, Shape,
};
use crate::names::strip_path;

/// A structural predicate over a request.
pub type Predicate = fn(&Request) -> bool;

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct ShapeRule {
    /// Shape assigned on match.
    pub shape: Shape,
    /// Match condition.
    pub predicate: Predicate,
}

#[rustfmt::skip]
const SHAPE_TABLE: &[ShapeRule] = &[
    ShapeRule { shape: Shape::HeadBucket, predicate: is_head_bucket },
    ShapeRule { shape: Shape::HeadObject, predicate: is_head_object },
    ShapeRule { shape: Shape::GetObject, predicate: is_get_object },
    ShapeRule { shape: Shape::CreateObject, predicate: is_create_object },
    ShapeRule { shape: Shape::StreamPayload, predicate: is_multipart_part_upload },
    ShapeRule { shape: Shape::CompleteMultipartUpload, predicate: is_complete_multipart_upload },
    ShapeRule { shape: Shape::MultiFileDelete, predicate: is_multi_file_delete },
    ShapeRule { shape: Shape::NotificationCreate, predicate: is_create_notification },
    ShapeRule { shape: Shape::NotificationGet, predicate: is_get_notification },
    ShapeRule { shape: Shape::NotificationDelete, predicate: is_delete_notification },
    ShapeRule { shape: Shape::BulkReplicate, predicate: is_bulk_replicate },
    ShapeRule { shape: Shape::BulkPut, predicate: is_bulk_put },
    ShapeRule { shape: Shape::BulkGet, predicate: is_bulk_get },
    ShapeRule { shape: Shape::BulkVerify, predicate: is_bulk_verify },
    ShapeRule { shape: Shape::ObjectsPayloadWithSize, predicate: is_verify_safe_to_put },
    ShapeRule { shape: Shape::ObjectsPayloadWithLengthOffset, predicate: is_bulk_stage },
    ShapeRule { shape: Shape::ObjectsPayloadSimple, predicate: has_simple_objects_payload },
    ShapeRule { shape: Shape::IdsPayload, predicate: has_ids_payload },
    ShapeRule { shape: Shape::StringPayload, predicate: has_string_payload },
    ShapeRule { shape: Shape::AllocateJobChunk, predicate: is_allocate_job_chunk },
    ShapeRule { shape: Shape::JobChunksReady, predicate: is_get_job_chunks_ready },
    ShapeRule { shape: Shape::PaginatedListing, predicate: is_paginated_listing },
];

/// The ordered classification table.
pub fn classification_table() -> &'static [ShapeRule] {
    SHAPE_TABLE
}

/// Classifies with an arbitrary table. First match wins, else `Basic`.
pub fn classify_with(table: &[ShapeRule], request: &Request) -> Shape {
    table
        .iter()
        .find(|rule| (rule.predicate)(request))
        .map_or(Shape::Basic, |rule| rule.shape)
}

/// Classifies a request with the built-in table.
pub fn classify(request: &Request) -> Shape {
    classify_with(SHAPE_TABLE, request)
}

/// Returns a copy of `request` with its shape assigned.
pub fn classify_request(request: &Request) -> Request {
    let shape = classify(request);
    tracing::debug!(request = %request.name, ?shape, "classified");
    Request {
        shape: Some(shape),
        ..request.clone()
    }
}

/// True if `params` holds a param of this name and stripped type, ignoring case.
pub fn has_param(params: &[Param], name: &str, ty: &str) -> bool {
    params.iter().any(|p| {
        p.name.eq_ignore_ascii_case(name) && strip_path(&p.ty).eq_ignore_ascii_case(ty)
    })
}

/// True if `params` holds a param of this name, ignoring case.
pub fn has_param_named(params: &[Param], name: &str) -> bool {
    params.iter().any(|p| p.name.eq_ignore_ascii_case(name))
}

/// How a notification request interacts with its registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Registers or updates a notification.
    Create,
    /// Reads one or all registrations.
    Get,
    /// Removes a registration.
    Delete,
}

/// Maps a notification request's action onto its kind.
///
/// `None` for non-notification requests or requests with no action.
pub fn notification_kind(request: &Request) -> Option<NotificationKind> {
    if !is_notification(request) {
        return None;
    }
    match request.action? {
        Action::Create | Action::Modify | Action::BulkModify => Some(NotificationKind::Create),
        Action::Delete | Action::BulkDelete => Some(NotificationKind::Delete),
        Action::List | Action::Show => Some(NotificationKind::Get),
    }
}

/// True if the request targets a notification registration resource.
pub fn is_notification(request: &Request) -> bool {
    request.resource.is_some_and(Resource::is_notification)
}

fn both_required(request: &Request) -> bool {
    request.bucket_requirement == Requirement::Required
        && request.object_requirement == Requirement::Required
}

fn is_head_bucket(request: &Request) -> bool {
    request.classification == Classification::AmazonStyle
        && request.http_verb == HttpVerb::Head
        && request.bucket_requirement == Requirement::Required
        && request.object_requirement == Requirement::NotAllowed
}

fn is_head_object(request: &Request) -> bool {
    request.classification == Classification::AmazonStyle
        && request.http_verb == HttpVerb::Head
        && both_required(request)
}

fn is_get_object(request: &Request) -> bool {
    let amazon = request.classification == Classification::AmazonStyle
        && request.http_verb == HttpVerb::Get
        && both_required(request)
        && !has_param(&request.required_params, "UploadId", "UUID");
    let spectra = request.classification == Classification::SpectraStyle
        && request.action == Some(Action::Show)
        && request.resource == Some(Resource::Object)
        && request.resource_kind == Some(ResourceKind::NonSingleton);
    amazon || spectra
}

fn is_create_object(request: &Request) -> bool {
    request.http_verb == HttpVerb::Put
        && both_required(request)
        && !has_param(&request.required_params, "PartNumber", "int")
}

fn is_multipart_part_upload(request: &Request) -> bool {
    request.http_verb == HttpVerb::Put
        && both_required(request)
        && has_param(&request.required_params, "PartNumber", "int")
}

fn is_complete_multipart_upload(request: &Request) -> bool {
    request.classification == Classification::AmazonStyle
        && request.http_verb == HttpVerb::Post
        && both_required(request)
        && has_param(&request.required_params, "UploadId", "UUID")
}

fn is_multi_file_delete(request: &Request) -> bool {
    request.http_verb == HttpVerb::Post
        && request.object_requirement == Requirement::NotAllowed
        && has_param(&request.required_params, "Delete", "void")
}

fn is_create_notification(request: &Request) -> bool {
    notification_kind(request) == Some(NotificationKind::Create)
}

fn is_get_notification(request: &Request) -> bool {
    notification_kind(request) == Some(NotificationKind::Get)
}

fn is_delete_notification(request: &Request) -> bool {
    notification_kind(request) == Some(NotificationKind::Delete)
}

fn is_bulk_replicate(request: &Request) -> bool {
    request.operation == Some(Operation::StartBulkPut)
        && has_param(&request.required_params, "Replicate", "void")
}

fn is_bulk_put(request: &Request) -> bool {
    request.operation == Some(Operation::StartBulkPut)
        && !has_param(&request.required_params, "Replicate", "void")
}

fn is_bulk_get(request: &Request) -> bool {
    request.operation == Some(Operation::StartBulkGet)
}

fn is_bulk_verify(request: &Request) -> bool {
    request.operation == Some(Operation::StartBulkVerify)
}

fn is_verify_safe_to_put(request: &Request) -> bool {
    request.operation == Some(Operation::VerifySafeToStartBulkPut)
}

fn is_bulk_stage(request: &Request) -> bool {
    request.operation == Some(Operation::StartBulkStage)
}

fn has_simple_objects_payload(request: &Request) -> bool {
    match request.operation {
        Some(Operation::GetPhysicalPlacement | Operation::VerifyPhysicalPlacement) => true,
        Some(Operation::Eject) => has_param(&request.required_params, "Blobs", "void"),
        _ => false,
    }
}

fn has_ids_payload(request: &Request) -> bool {
    request.classification == Classification::SpectraStyle
        && matches!(request.action, Some(Action::BulkDelete | Action::BulkModify))
        && request.resource.is_some_and(Resource::is_suspect_blob)
}

fn has_string_payload(request: &Request) -> bool {
    request.classification == Classification::SpectraStyle
        && request.http_verb == HttpVerb::Get
        && request.action == Some(Action::List)
        && request.resource == Some(Resource::BlobPersistence)
}

fn is_allocate_job_chunk(request: &Request) -> bool {
    request.classification == Classification::SpectraStyle
        && request.http_verb == HttpVerb::Put
        && request.action == Some(Action::Modify)
        && request.resource == Some(Resource::JobChunk)
        && request.operation == Some(Operation::Allocate)
}

fn is_get_job_chunks_ready(request: &Request) -> bool {
    request.classification == Classification::SpectraStyle
        && request.http_verb == HttpVerb::Get
        && request.action == Some(Action::List)
        && request.resource == Some(Resource::JobChunk)
}

fn is_paginated_listing(request: &Request) -> bool {
    request.classification == Classification::SpectraStyle
        && request.action == Some(Action::List)
        && has_param_named(&request.optional_params, "PageLength")
        && has_param_named(&request.optional_params, "PageOffset")
}
