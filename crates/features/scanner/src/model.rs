use dormant_derive::api_model;
use dormant_domain::model::ScanResult;

/// Query string (GET) or JSON body (POST) of an inactive-objects scan.
#[api_model]
#[derive(Default, Clone)]
pub struct InactiveObjectsRequest {
    /// Encrypted token, or the raw bearer token when `encrypted` is `false`
    pub token: Option<String>,
    /// Org base URL, e.g. `https://acme.my.salesforce.com`
    pub instance_url: Option<String>,
    /// Activity window in days; defaults to the configured window
    pub days: Option<u32>,
    /// Whether `token` is encrypted; defaults to `true`
    pub encrypted: Option<bool>,
}

/// Custom objects without a record modified inside the window, in listing order.
#[api_model]
#[derive(Default, Clone, PartialEq, Eq)]
pub struct InactiveObjectsResponse {
    pub inactive_objects: Vec<String>,
}

impl From<ScanResult> for InactiveObjectsResponse {
    fn from(result: ScanResult) -> Self {
        Self { inactive_objects: result.inactive_objects }
    }
}
