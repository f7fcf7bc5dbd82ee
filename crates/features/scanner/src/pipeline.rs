use chrono::{DateTime, TimeDelta, Utc};
use dormant_crm::{CrmApi, EndpointPolicy, OrgEndpoint};
use dormant_domain::config::ApiConfig;
use dormant_domain::model::ScanResult;
use dormant_vault::{Credential, TokenVault};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::enumerate::list_candidate_resources;
use crate::error::ScanError;
use crate::model::InactiveObjectsRequest;
use crate::scanner::{ScanOptions, Scanner};

/// Request-independent settings of the pipeline.
#[derive(Debug, Clone)]
struct Settings {
    allow_plain_tokens: bool,
    default_window_days: u32,
    max_window_days: u32,
    custom_suffixes: Arc<[String]>,
    request_timeout: Duration,
}

/// Validated request parameters.
struct Params<'a> {
    token: &'a str,
    encrypted: bool,
    endpoint: OrgEndpoint,
    window_days: u32,
    since: DateTime<Utc>,
}

/// Entry point of one scan: token → credential → enumeration → scan → aggregate.
///
/// Everything it needs (key, CRM client, limits) is passed in at construction.
#[derive(Debug, Clone)]
pub struct Pipeline {
    vault: TokenVault,
    crm: Arc<dyn CrmApi>,
    scanner: Scanner,
    policy: EndpointPolicy,
    settings: Settings,
}

impl Pipeline {
    pub fn new(
        vault: TokenVault,
        crm: Arc<dyn CrmApi>,
        policy: EndpointPolicy,
        config: &ApiConfig,
    ) -> Result<Self, ScanError> {
        let scanner = &config.scanner;
        let settings = Settings {
            allow_plain_tokens: config.security.allow_plain_tokens,
            default_window_days: scanner.default_window_days,
            max_window_days: scanner.max_window_days,
            custom_suffixes: scanner.custom_suffixes.iter().map(|s| s.trim().to_owned()).collect(),
            request_timeout: scanner.request_timeout(),
        };
        let options = ScanOptions::try_from(scanner)?;

        Ok(Self { vault, scanner: Scanner::new(Arc::clone(&crm), options), crm, policy, settings })
    }

    /// Runs the whole scan under the request deadline.
    ///
    /// On expiry every in-flight query is abandoned and nothing partial is returned.
    pub async fn run(&self, request: &InactiveObjectsRequest) -> Result<ScanResult, ScanError> {
        let params = self.params(request)?;
        let credential = Arc::new(self.credential(params.token, params.encrypted)?);

        info!(org = %params.endpoint, window_days = params.window_days, "Scan requested");

        tokio::time::timeout(
            self.settings.request_timeout,
            self.execute(&credential, &params.endpoint, params.since),
        )
        .await
        .map_err(|_| ScanError::Timeout {
            message: format!("exceeded {}s", self.settings.request_timeout.as_secs()).into(),
            context: Some(params.endpoint.to_string().into()),
        })?
    }

    async fn execute(
        &self,
        credential: &Arc<Credential>,
        endpoint: &OrgEndpoint,
        since: DateTime<Utc>,
    ) -> Result<ScanResult, ScanError> {
        let candidates = list_candidate_resources(
            self.crm.as_ref(),
            credential,
            endpoint,
            &self.settings.custom_suffixes[..],
        )
        .await?;

        let outcomes = self.scanner.scan(credential, endpoint, &candidates, since).await;
        Ok(aggregate(&outcomes))
    }

    fn params<'a>(&self, request: &'a InactiveObjectsRequest) -> Result<Params<'a>, ScanError> {
        let token = required(request.token.as_deref(), "token")?;
        let instance_url = required(request.instance_url.as_deref(), "instance_url")?;

        let endpoint = OrgEndpoint::parse(instance_url, &self.policy).map_err(|e| {
            ScanError::InvalidParameter {
                message: format!("instance_url: {e}").into(),
                context: None,
            }
        })?;

        let window_days = request.days.unwrap_or(self.settings.default_window_days);
        if !(1..=self.settings.max_window_days).contains(&window_days) {
            return Err(ScanError::InvalidParameter {
                message: format!("days must be within 1..={}", self.settings.max_window_days)
                    .into(),
                context: None,
            });
        }

        let since = TimeDelta::try_days(i64::from(window_days))
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| ScanError::InvalidParameter {
                message: format!("days: a {window_days} day window is outside the supported date range")
                    .into(),
                context: None,
            })?;

        Ok(Params {
            token,
            encrypted: request.encrypted.unwrap_or(true),
            endpoint,
            window_days,
            since,
        })
    }

    fn credential(&self, token: &str, encrypted: bool) -> Result<Credential, ScanError> {
        let credential = if encrypted {
            self.vault.open(token).inspect_err(|e| debug!(error = %e, "Token rejected"))?
        } else if self.settings.allow_plain_tokens {
            Credential::new(token.trim())
        } else {
            return Err(ScanError::InvalidCredential {
                message: "plain tokens are disabled".into(),
                context: None,
            });
        };

        if credential.is_empty() {
            return Err(ScanError::InvalidCredential {
                message: "credential is empty".into(),
                context: None,
            });
        }
        Ok(credential)
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ScanError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ScanError::InvalidParameter {
            message: format!("missing parameter: {name}").into(),
            context: None,
        }),
    }
}

#[cfg(feature = "server")]
impl TryFrom<&dormant_kernel::server::ApiState> for Pipeline {
    type Error = ScanError;

    fn try_from(state: &dormant_kernel::server::ApiState) -> Result<Self, Self::Error> {
        Self::new(
            state.vault.clone(),
            Arc::clone(&state.crm),
            state.endpoint_policy.clone(),
            &state.config,
        )
    }
}
