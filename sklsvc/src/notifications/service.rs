//! Best-effort notification creation.
//!
//! Every operation here runs as a side effect of a primary business action
//! (submission, withdrawal, approval). Failures are logged and swallowed so
//! the primary action never appears failed because a notification write did.
//! Callers depend on that: none of these methods returns an error.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::task::JoinSet;

use crate::notifications::recipients::RecipientResolver;
use crate::notifications::{Notification, NotificationKind, SubmissionData, UserActionKind, WithdrawalData};
use crate::store::{DocumentStore, NOTIFICATIONS_COLLECTION};

pub struct NotificationService {
    store: Arc<dyn DocumentStore>,
    recipients: Arc<dyn RecipientResolver>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn DocumentStore>, recipients: Arc<dyn RecipientResolver>) -> Self {
        Self { store, recipients }
    }

    /// Notify every admin that a user submitted work.
    pub async fn notify_submission(&self, user_id: &str, user_name: &str, platform: &str, description: &str, amount: Decimal) {
        let data = SubmissionData {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            platform: platform.to_string(),
            description: description.to_string(),
            amount,
        };

        let build = |admin_id: String| Notification {
            user_id: admin_id,
            kind: NotificationKind::UserSubmission,
            title: format!("New Work Submission from {user_name}"),
            message: format!("{user_name} submitted work on {platform}. Description: {description}. Amount: ৳{amount}"),
            amount: Some(amount),
            submission_data: Some(data.clone()),
            withdrawal_data: None,
            read: false,
            created_at: Utc::now(),
        };

        self.fan_out_to_admins("submission", build).await;
    }

    /// Notify every admin that a user requested a withdrawal.
    pub async fn notify_withdrawal(&self, user_id: &str, user_name: &str, amount: Decimal, bank_account: &str) {
        let data = WithdrawalData {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            amount,
            bank_account: bank_account.to_string(),
        };

        let build = |admin_id: String| Notification {
            user_id: admin_id,
            kind: NotificationKind::WithdrawalRequest,
            title: format!("New Withdrawal Request from {user_name}"),
            message: format!("{user_name} requested withdrawal of ৳{amount} to account {bank_account}"),
            amount: Some(amount),
            submission_data: None,
            withdrawal_data: Some(data.clone()),
            read: false,
            created_at: Utc::now(),
        };

        self.fan_out_to_admins("withdrawal", build).await;
    }

    /// Notify a single user about an admin action on their task or withdrawal.
    /// No recipient resolution; the caller supplies the target, title, and message.
    pub async fn notify_user_action(&self, user_id: &str, kind: UserActionKind, title: &str, message: &str, amount: Option<Decimal>) {
        let kind: NotificationKind = kind.into();
        let notification = Notification {
            user_id: user_id.to_string(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            amount,
            submission_data: None,
            withdrawal_data: None,
            read: false,
            created_at: Utc::now(),
        };

        if let Err(e) = self.create(&notification).await {
            tracing::warn!(user_id = %user_id, kind = %kind, error = %e, "Failed to create user action notification");
        }
    }

    /// Resolve the admin set and write one notification per admin.
    ///
    /// Writes are launched together and joined as a batch: latency is bound by
    /// the slowest write, and a failed write never affects its siblings or the
    /// caller. Partial success is possible and visible only in the warn logs.
    async fn fan_out_to_admins<F>(&self, event: &str, build: F)
    where
        F: Fn(String) -> Notification,
    {
        let admin_ids = match self.recipients.admin_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(event, error = %e, "Failed to resolve admin recipients, dropping notifications");
                return;
            }
        };

        if admin_ids.is_empty() {
            tracing::debug!(event, "No admin recipients, nothing to notify");
            return;
        }

        let total = admin_ids.len();
        let mut writes: JoinSet<(String, anyhow::Result<String>)> = JoinSet::new();

        for admin_id in admin_ids {
            let store = Arc::clone(&self.store);
            let notification = build(admin_id.clone());
            writes.spawn(async move {
                let result: anyhow::Result<String> = async {
                    let document = serde_json::to_value(&notification)?;
                    let id = store.insert(NOTIFICATIONS_COLLECTION, &document).await?;
                    Ok(id)
                }
                .await;
                (admin_id, result)
            });
        }

        let mut delivered = 0usize;
        while let Some(joined) = writes.join_next().await {
            match joined {
                Ok((_, Ok(_))) => delivered += 1,
                Ok((admin_id, Err(e))) => {
                    tracing::warn!(event, admin_id = %admin_id, error = %e, "Failed to create admin notification");
                }
                Err(e) => {
                    tracing::warn!(event, error = %e, "Notification write task panicked");
                }
            }
        }

        tracing::debug!(event, delivered, total, "Admin notification fan-out settled");
    }

    async fn create(&self, notification: &Notification) -> anyhow::Result<String> {
        let document = serde_json::to_value(notification)?;
        Ok(self.store.insert(NOTIFICATIONS_COLLECTION, &document).await?)
    }
}
