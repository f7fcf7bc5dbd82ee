/// Name suffix the CRM gives to user-defined objects.
pub const CUSTOM_OBJECT_SUFFIX: &str = "__c";

/// REST API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "59.0";

/// Org domains a credential may be sent to when none are configured.
pub const SALESFORCE_HOST_SUFFIXES: [&str; 2] = [".my.salesforce.com", ".salesforce.com"];

/// Longest activity window an operator may configure (about a century).
pub const MAX_WINDOW_DAYS_LIMIT: u32 = 36_500;

/// Existence queries in flight per scan when none is configured.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Bound for one existence query when none is configured.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// Trailing activity window used when a request does not name one.
pub const DEFAULT_WINDOW_DAYS: u32 = 90;

/// Uniform body text for every token-stage failure.
pub const INVALID_CREDENTIAL: &str = "invalid credential";

/// OpenAPI tag for service endpoints.
pub const SYSTEM_TAG: &str = "System";

/// OpenAPI tag for scan endpoints.
pub const SCANNER_TAG: &str = "Scanner";
