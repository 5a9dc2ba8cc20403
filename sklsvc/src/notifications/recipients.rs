//! Recipient resolution for admin fan-out.
//!
//! The fan-out operations need "every admin" as a recipient set. That lookup
//! is behind a trait so tests and alternative deployments can substitute a
//! fixed set instead of the document store's role query.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::store::{DocumentStore, USERS_COLLECTION};

/// Resolves the set of user ids that receive admin notifications.
#[async_trait]
pub trait RecipientResolver: Send + Sync {
    async fn admin_ids(&self) -> anyhow::Result<Vec<String>>;
}

/// Resolver backed by the document store: every user whose `role` field
/// equals `"admin"`.
pub struct RoleRecipientResolver {
    store: Arc<dyn DocumentStore>,
}

impl RoleRecipientResolver {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RecipientResolver for RoleRecipientResolver {
    async fn admin_ids(&self) -> anyhow::Result<Vec<String>> {
        let admins = self.store.query_eq(USERS_COLLECTION, "role", &json!("admin")).await?;
        Ok(admins.into_iter().map(|doc| doc.id).collect())
    }
}

/// Resolver with a fixed recipient set, for tests and single-tenant setups.
pub struct FixedRecipientResolver {
    ids: Vec<String>,
}

impl FixedRecipientResolver {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }
}

#[async_trait]
impl RecipientResolver for FixedRecipientResolver {
    async fn admin_ids(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.ids.clone())
    }
}
