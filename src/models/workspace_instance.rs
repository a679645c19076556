use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use time::OffsetDateTime;
use uuid::Uuid;

/// Lifecycle phase of a workspace instance as reported by the orchestrator.
/// An instance that is still `preparing` has not claimed cluster capacity and
/// does not count against the parallel-workspace cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "workspace_phase")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkspacePhase {
    Preparing,
    Building,
    Pending,
    Creating,
    Initializing,
    Running,
    Interrupted,
    Stopping,
    Stopped,
}

impl WorkspacePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspacePhase::Preparing => "preparing",
            WorkspacePhase::Building => "building",
            WorkspacePhase::Pending => "pending",
            WorkspacePhase::Creating => "creating",
            WorkspacePhase::Initializing => "initializing",
            WorkspacePhase::Running => "running",
            WorkspacePhase::Interrupted => "interrupted",
            WorkspacePhase::Stopping => "stopping",
            WorkspacePhase::Stopped => "stopped",
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, WorkspacePhase::Stopped)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkspaceInstance {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub owner_id: Uuid,
    pub phase: WorkspacePhase,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
