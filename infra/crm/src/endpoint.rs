use dormant_domain::config::CrmConfig;
use dormant_domain::constants::SALESFORCE_HOST_SUFFIXES;
use std::fmt;
use url::Url;

use crate::error::CrmError;

/// Which org base URLs the service is willing to send a credential to.
///
/// Hosts are matched against an allow-list of suffixes; an empty list admits nothing.
#[derive(Debug, Clone)]
pub struct EndpointPolicy {
    allow_insecure_http: bool,
    allowed_host_suffixes: Vec<String>,
}

impl EndpointPolicy {
    #[must_use]
    pub fn new(allow_insecure_http: bool, allowed_host_suffixes: Vec<String>) -> Self {
        let allowed_host_suffixes =
            allowed_host_suffixes.into_iter().map(|s| s.trim().to_ascii_lowercase()).collect();
        Self { allow_insecure_http, allowed_host_suffixes }
    }

    fn permits_scheme(&self, scheme: &str) -> bool {
        scheme == "https" || (self.allow_insecure_http && scheme == "http")
    }

    fn permits_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.allowed_host_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && host.ends_with(suffix.as_str()))
    }
}

impl Default for EndpointPolicy {
    fn default() -> Self {
        Self::new(false, SALESFORCE_HOST_SUFFIXES.map(str::to_owned).to_vec())
    }
}

impl From<&CrmConfig> for EndpointPolicy {
    fn from(config: &CrmConfig) -> Self {
        Self::new(config.allow_insecure_http, config.allowed_host_suffixes.clone())
    }
}

/// A validated org base URL, reduced to its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgEndpoint {
    base: Url,
}

impl OrgEndpoint {
    /// Parses and validates a caller-supplied instance URL.
    ///
    /// Path, query and fragment are discarded; embedded user info is rejected.
    pub fn parse(raw: &str, policy: &EndpointPolicy) -> Result<Self, CrmError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(invalid("instance URL is empty"));
        }

        let mut base = Url::parse(raw).map_err(|e| CrmError::InvalidEndpoint {
            message: e.to_string().into(),
            context: Some("instance_url".into()),
        })?;

        if !policy.permits_scheme(base.scheme()) {
            return Err(invalid(format!("scheme `{}` is not allowed", base.scheme())));
        }
        if !base.username().is_empty() || base.password().is_some() {
            return Err(invalid("credentials must not be embedded in the instance URL"));
        }
        let Some(host) = base.host_str() else {
            return Err(invalid("instance URL has no host"));
        };
        if !policy.permits_host(host) {
            return Err(invalid(format!("host `{host}` is not an allowed org domain")));
        }

        base.set_path("/");
        base.set_query(None);
        base.set_fragment(None);

        Ok(Self { base })
    }

    /// Resolves a REST path (without leading slash) against the org origin.
    pub(crate) fn join(&self, path: &str) -> Result<Url, CrmError> {
        self.base.join(path).map_err(|e| CrmError::InvalidEndpoint {
            message: e.to_string().into(),
            context: Some(path.to_owned().into()),
        })
    }

}

impl fmt::Display for OrgEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str().trim_end_matches('/'))
    }
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> CrmError {
    CrmError::InvalidEndpoint { message: message.into(), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> EndpointPolicy {
        EndpointPolicy::new(false, vec![".my.salesforce.com".into()])
    }

    #[test]
    fn reduces_to_origin() {
        let endpoint =
            OrgEndpoint::parse("https://acme.my.salesforce.com/lightning/page?x=1#top", &strict())
                .unwrap();
        assert_eq!(endpoint.to_string(), "https://acme.my.salesforce.com");
        assert_eq!(
            endpoint.join("services/data/v59.0/sobjects").unwrap().as_str(),
            "https://acme.my.salesforce.com/services/data/v59.0/sobjects"
        );
    }

    #[test]
    fn enforces_scheme_and_host() {
        assert!(OrgEndpoint::parse("http://acme.my.salesforce.com", &strict()).is_err());
        assert!(OrgEndpoint::parse("https://evil.example.com", &strict()).is_err());
        assert!(OrgEndpoint::parse("https://ACME.MY.SALESFORCE.COM", &strict()).is_ok());
        assert!(OrgEndpoint::parse("not a url", &strict()).is_err());
        assert!(OrgEndpoint::parse("  ", &strict()).is_err());
    }

    #[test]
    fn rejects_embedded_credentials() {
        let err = OrgEndpoint::parse("https://user:pw@acme.my.salesforce.com", &strict());
        assert!(matches!(err, Err(CrmError::InvalidEndpoint { .. })));
    }

    #[test]
    fn insecure_policy_allows_listed_local_http() {
        let policy = EndpointPolicy::new(true, vec!["127.0.0.1".into()]);
        assert!(OrgEndpoint::parse("http://127.0.0.1:8080", &policy).is_ok());
        assert!(OrgEndpoint::parse("http://10.0.0.1:8080", &policy).is_err());
    }

    #[test]
    fn default_config_only_reaches_salesforce() {
        let policy = EndpointPolicy::from(&CrmConfig::default());

        assert!(OrgEndpoint::parse("https://acme.my.salesforce.com", &policy).is_ok());
        assert!(OrgEndpoint::parse("https://login.salesforce.com", &policy).is_ok());
        assert!(OrgEndpoint::parse("https://attacker.example.com", &policy).is_err());
        assert!(OrgEndpoint::parse("https://169.254.169.254", &policy).is_err());
        assert!(OrgEndpoint::parse("https://evilsalesforce.com", &policy).is_err());
        assert!(OrgEndpoint::parse("https://acme.my.salesforce.com", &EndpointPolicy::default()).is_ok());
    }

    #[test]
    fn empty_allow_list_admits_no_host() {
        let policy = EndpointPolicy::new(false, Vec::new());
        assert!(OrgEndpoint::parse("https://acme.my.salesforce.com", &policy).is_err());
    }
}
