use axum::extract::FromRef;
use dormant_crm::{CrmApi, EndpointPolicy};
use dormant_domain::config::ApiConfig;
use dormant_vault::TokenVault;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

use super::health;

#[dormant_derive::dormant_error]
pub enum ApiStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub vault: TokenVault,
    pub crm: Arc<dyn CrmApi>,
    pub endpoint_policy: EndpointPolicy,
}

/// Shared, cheaply clonable request state.
#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<ApiState> for ApiConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.config.clone()
    }
}

#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    vault: Option<TokenVault>,
    crm: Option<Arc<dyn CrmApi>>,
}

impl ApiStateBuilder {
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn vault(mut self, vault: TokenVault) -> Self {
        self.vault = Some(vault);
        self
    }

    #[must_use]
    pub fn crm(mut self, crm: Arc<dyn CrmApi>) -> Self {
        self.crm = Some(crm);
        self
    }

    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let config = self.config.ok_or_else(|| ApiStateError::Validation {
            message: "ApiConfig not provided".into(),
            context: None,
        })?;
        let vault = self.vault.ok_or_else(|| ApiStateError::Validation {
            message: "TokenVault not provided".into(),
            context: None,
        })?;
        let crm = self.crm.ok_or_else(|| ApiStateError::Validation {
            message: "CRM client not provided".into(),
            context: None,
        })?;
        let endpoint_policy = EndpointPolicy::from(&config.crm);

        health::mark_started();

        Ok(ApiState { inner: Arc::new(ApiStateInner { config, vault, crm, endpoint_policy }) })
    }
}
