//! Tracked remote operations
//!
//! An [`Operation`] is the registry's view of one call travelling through the
//! retry layer. It is created on the first attempt, patched on every retry and
//! dropped from the registry as soon as it reaches a terminal status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_domain_status_conversions;

/// Opaque identifier of a tracked operation.
///
/// UUID v7, so ids sort in creation order.
pub type OperationId = Uuid;

/// Generate a fresh operation id.
pub fn new_operation_id() -> OperationId {
    Uuid::now_v7()
}

/// What an operation does to the backend. Classification only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Read,
    Write,
    Delete,
    Update,
}

impl_domain_status_conversions!(OperationKind {
    Read => "read",
    Write => "write",
    Delete => "delete",
    Update => "update",
});

/// Lifecycle state of an operation.
///
/// `Pending → (Retrying)* → Success | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Pending,
    Retrying,
    Success,
    Failed,
}

impl_domain_status_conversions!(OperationStatus {
    Pending => "pending",
    Retrying => "retrying",
    Success => "success",
    Failed => "failed",
});

impl OperationStatus {
    /// `Success` and `Failed` end the lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// One tracked attempt (with retries) at a unit of remote work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    pub kind: OperationKind,
    pub endpoint: String,
    pub created_at: DateTime<Utc>,
    pub status: OperationStatus,
    pub retry_count: u32,
    pub last_error: Option<String>,
}

impl Operation {
    /// New record in `Pending` state stamped with the current time.
    pub fn new(id: OperationId, kind: OperationKind, endpoint: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            endpoint: endpoint.into(),
            created_at: Utc::now(),
            status: OperationStatus::Pending,
            retry_count: 0,
            last_error: None,
        }
    }

    /// Apply a partial update in place. Unset fields are left untouched.
    pub fn apply(&mut self, patch: &OperationPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(retry_count) = patch.retry_count {
            self.retry_count = retry_count;
        }
        if let Some(error) = &patch.last_error {
            self.last_error = Some(error.clone());
        }
    }
}

/// Partial update for an [`Operation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationPatch {
    pub status: Option<OperationStatus>,
    pub retry_count: Option<u32>,
    pub last_error: Option<String>,
}

impl OperationPatch {
    pub fn status(status: OperationStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.last_error = Some(error.into());
        self
    }
}
