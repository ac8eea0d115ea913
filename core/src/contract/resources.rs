#![deny(missing_docs)]

//! # Resource Table
//!
//! The closed set of contract resources and the authoritative mapping from a
//! resource to the kind of path argument it produces.

use serde::{Deserialize, Serialize};

/// A contract resource. Serialized in SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Resource {
    ActiveJob,
    AzureTarget,
    BeansRetriever,
    BlobPersistence,
    BlobStoreTask,
    Bucket,
    BucketAcl,
    CacheFilesystem,
    CacheState,
    CanceledJob,
    CapacitySummary,
    CompletedJob,
    DataPath,
    DataPathBackend,
    DataPersistenceRule,
    DataPolicy,
    DataPolicyAcl,
    DataReplicationRule,
    DegradedBucket,
    DegradedDataPersistenceRule,
    DegradedDataReplicationRule,
    Ds3Target,
    Ds3TargetReadPreference,
    Ds3TargetUserMapping,
    Folder,
    GenericDaoNotificationRegistration,
    Group,
    GroupMember,
    HeapDump,
    InstanceIdentifier,
    Job,
    JobChunk,
    JobCompletedNotificationRegistration,
    JobCreatedNotificationRegistration,
    Node,
    Object,
    ObjectCachedNotificationRegistration,
    ObjectLostNotificationRegistration,
    ObjectPersistedNotificationRegistration,
    Pool,
    PoolEnvironment,
    PoolFailure,
    PoolFailureNotificationRegistration,
    PoolPartition,
    S3Target,
    StorageDomain,
    StorageDomainFailure,
    StorageDomainFailureNotificationRegistration,
    StorageDomainMember,
    SuspectBlobAzureTarget,
    SuspectBlobDs3Target,
    SuspectBlobPool,
    SuspectBlobS3Target,
    SuspectBlobTape,
    SystemFailure,
    SystemFailureNotificationRegistration,
    SystemHealth,
    SystemInformation,
    Tape,
    TapeDensityDirective,
    TapeDrive,
    TapeEnvironment,
    TapeFailure,
    TapeFailureNotificationRegistration,
    TapeLibrary,
    TapePartition,
    TapePartitionFailure,
    TapePartitionFailureNotificationRegistration,
    User,
}

/// How a resource is addressed in a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceArgKind {
    /// `<Resource>Id: UUID`.
    Id,
    /// `<Resource>Name: String`.
    Named,
    /// A notification registration; addressed by `NotificationId` instead.
    Notification,
    /// One global instance; never in the path.
    Singleton,
    /// `<Resource>: String`.
    Generic,
}

impl Resource {
    /// Looks up the resource in the resource table.
    pub fn arg_kind(self) -> ResourceArgKind {
        use Resource::*;
        match self {
            ActiveJob | Job | JobChunk | Tape | TapeDrive | TapeLibrary | User => {
                ResourceArgKind::Id
            }
            Bucket | Object => ResourceArgKind::Named,
            GenericDaoNotificationRegistration
            | JobCompletedNotificationRegistration
            | JobCreatedNotificationRegistration
            | ObjectCachedNotificationRegistration
            | ObjectLostNotificationRegistration
            | ObjectPersistedNotificationRegistration
            | PoolFailureNotificationRegistration
            | StorageDomainFailureNotificationRegistration
            | SystemFailureNotificationRegistration
            | TapeFailureNotificationRegistration
            | TapePartitionFailureNotificationRegistration => ResourceArgKind::Notification,
            CapacitySummary | DataPath | DataPathBackend | PoolEnvironment | SystemHealth
            | SystemInformation | TapeEnvironment => ResourceArgKind::Singleton,
            _ => ResourceArgKind::Generic,
        }
    }

    /// Whether this is a notification registration resource.
    pub fn is_notification(self) -> bool {
        self.arg_kind() == ResourceArgKind::Notification
    }

    /// Whether this is one of the suspect-blob resources.
    pub fn is_suspect_blob(self) -> bool {
        matches!(
            self,
            Resource::SuspectBlobAzureTarget
                | Resource::SuspectBlobDs3Target
                | Resource::SuspectBlobPool
                | Resource::SuspectBlobS3Target
                | Resource::SuspectBlobTape
        )
    }

    /// The contract identifier, e.g. `TAPE_DRIVE`.
    pub fn contract_id(self) -> String {
        // Unit variants serialize to a plain string.
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Parses a contract identifier. `None` for identifiers outside the table.
    pub fn from_contract_id(id: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(id.to_string())).ok()
    }

    /// UpperCamel form of the contract identifier, e.g. `TapeDrive`.
    pub fn camel_name(self) -> String {
        self.contract_id()
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let lower = w.to_ascii_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect()
    }
}
