//! Notification fan-out for submission, withdrawal, and admin-action events.
//!
//! - [`service`]: best-effort creation of notification documents
//! - [`recipients`]: resolution of the admin recipient set

pub mod recipients;
pub mod service;

pub use recipients::{FixedRecipientResolver, RecipientResolver, RoleRecipientResolver};
pub use service::NotificationService;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Notification kinds written by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A user submitted work (sent to every admin)
    UserSubmission,
    /// A user requested a withdrawal (sent to every admin)
    WithdrawalRequest,
    /// An admin approved the user's task
    TaskApproved,
    /// An admin rejected the user's task
    TaskRejected,
    /// An admin approved the user's withdrawal
    WithdrawalApproved,
    /// An admin rejected the user's withdrawal
    WithdrawalRejected,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserSubmission => write!(f, "user_submission"),
            Self::WithdrawalRequest => write!(f, "withdrawal_request"),
            Self::TaskApproved => write!(f, "task_approved"),
            Self::TaskRejected => write!(f, "task_rejected"),
            Self::WithdrawalApproved => write!(f, "withdrawal_approved"),
            Self::WithdrawalRejected => write!(f, "withdrawal_rejected"),
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_submission" => Ok(Self::UserSubmission),
            "withdrawal_request" => Ok(Self::WithdrawalRequest),
            "task_approved" => Ok(Self::TaskApproved),
            "task_rejected" => Ok(Self::TaskRejected),
            "withdrawal_approved" => Ok(Self::WithdrawalApproved),
            "withdrawal_rejected" => Ok(Self::WithdrawalRejected),
            _ => Err(format!("Unknown notification kind: {}", s)),
        }
    }
}

/// The admin-action kinds accepted by
/// [`NotificationService::notify_user_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserActionKind {
    TaskApproved,
    TaskRejected,
    WithdrawalApproved,
    WithdrawalRejected,
}

impl From<UserActionKind> for NotificationKind {
    fn from(kind: UserActionKind) -> Self {
        match kind {
            UserActionKind::TaskApproved => Self::TaskApproved,
            UserActionKind::TaskRejected => Self::TaskRejected,
            UserActionKind::WithdrawalApproved => Self::WithdrawalApproved,
            UserActionKind::WithdrawalRejected => Self::WithdrawalRejected,
        }
    }
}

/// Raw submission fields carried in the notification payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionData {
    pub user_id: String,
    pub user_name: String,
    pub platform: String,
    pub description: String,
    pub amount: Decimal,
}

/// Raw withdrawal fields carried in the notification payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalData {
    pub user_id: String,
    pub user_name: String,
    pub amount: Decimal,
    pub bank_account: String,
}

/// A notification document as persisted to the store.
///
/// `read` starts false and is flipped later by the UI marking-as-read flow,
/// outside this service. `created_at` is assigned here at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Recipient user id
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_data: Option<SubmissionData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal_data: Option<WithdrawalData>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
