//! CRM collaborator for the activity scanner.
//!
//! The scanner only needs two calls, captured by [`CrmApi`]:
//!
//! - an object listing (`GET /services/data/vXX.X/sobjects`), and
//! - a per-object existence check
//!   (`SELECT Id FROM <object> WHERE LastModifiedDate >= <since> LIMIT 1`).
//!
//! [`SalesforceClient`] implements both over the Salesforce REST API with a pooled
//! [`reqwest::Client`]. Every call authenticates with the request's bearer
//! [`Credential`](dormant_vault::Credential), which is never logged.
//!
//! Org base URLs are validated up front by [`OrgEndpoint::parse`] against an
//! [`EndpointPolicy`] (scheme and host allow-list), and object names are checked
//! by [`soql::validate_object_name`] before they are placed into a query.

mod api;
mod endpoint;
mod error;
mod salesforce;
pub mod soql;

pub use api::CrmApi;
pub use endpoint::{EndpointPolicy, OrgEndpoint};
pub use error::{CrmError, CrmErrorExt};
pub use salesforce::{SalesforceClient, SalesforceClientBuilder};
