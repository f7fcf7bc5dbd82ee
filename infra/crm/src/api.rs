use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dormant_domain::model::ResourceDescriptor;
use dormant_vault::Credential;
use std::fmt::Debug;

use crate::endpoint::OrgEndpoint;
use crate::error::CrmError;

/// The two CRM calls the scanner depends on.
///
/// Implementations are shared read-only across concurrent scan units.
#[async_trait]
pub trait CrmApi: Debug + Send + Sync {
    /// Lists every object the credential can see, custom or not.
    async fn list_resources(
        &self,
        credential: &Credential,
        endpoint: &OrgEndpoint,
    ) -> Result<Vec<ResourceDescriptor>, CrmError>;

    /// Returns `true` when at least one record of `resource` was modified at or
    /// after `since`.
    async fn has_recent_activity(
        &self,
        credential: &Credential,
        endpoint: &OrgEndpoint,
        resource: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, CrmError>;
}
