#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dormant_crm::{CrmApi, CrmError, EndpointPolicy, OrgEndpoint};
use dormant_domain::model::ResourceDescriptor;
use dormant_vault::{Credential, TokenVault};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// NIST SP 800-38A AES-256 key.
pub const KEY: [u8; 32] = [
    0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe, 0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d, 0x77, 0x81,
    0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7, 0x2d, 0x98, 0x10, 0xa3, 0x09, 0x14, 0xdf, 0xf4,
];

pub const SESSION: &str = "00Dxx0000001gPL!AQ4AQ.session";

pub fn vault() -> TokenVault {
    TokenVault::new(KEY)
}

pub fn endpoint() -> OrgEndpoint {
    OrgEndpoint::parse("https://acme.my.salesforce.com", &EndpointPolicy::default())
        .expect("endpoint")
}

/// How the fake org answers an existence query for one object.
#[derive(Debug, Clone)]
pub enum Reply {
    Records(u64),
    Fail(&'static str),
    Panic,
}

#[derive(Debug, Clone)]
pub struct Behavior {
    pub reply: Reply,
    pub delay: Duration,
}

/// In-memory stand-in for the CRM with per-object replies and call accounting.
#[derive(Debug, Default)]
pub struct FakeCrm {
    listing: Vec<ResourceDescriptor>,
    listing_error: Option<&'static str>,
    behaviors: HashMap<String, Behavior>,
    default_delay: Duration,
    pub list_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl FakeCrm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(mut self, name: &str, custom: bool, reply: Reply) -> Self {
        self.listing.push(ResourceDescriptor::new(name, custom));
        self.behaviors.insert(name.to_owned(), Behavior { reply, delay: Duration::ZERO });
        self
    }

    pub fn delayed(mut self, name: &str, delay: Duration) -> Self {
        if let Some(behavior) = self.behaviors.get_mut(name) {
            behavior.delay = delay;
        }
        self
    }

    pub fn default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn failing_listing(mut self, message: &'static str) -> Self {
        self.listing_error = Some(message);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn descriptors(&self) -> Vec<ResourceDescriptor> {
        self.listing.clone()
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CrmApi for FakeCrm {
    async fn list_resources(
        &self,
        _credential: &Credential,
        _endpoint: &OrgEndpoint,
    ) -> Result<Vec<ResourceDescriptor>, CrmError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match self.listing_error {
            Some(message) => {
                Err(CrmError::Status { status: 401, message: message.into(), context: None })
            }
            None => Ok(self.listing.clone()),
        }
    }

    async fn has_recent_activity(
        &self,
        credential: &Credential,
        _endpoint: &OrgEndpoint,
        resource: &str,
        _since: DateTime<Utc>,
    ) -> Result<bool, CrmError> {
        assert_eq!(credential.expose(), SESSION, "units must share the request credential");
        self.query_calls.fetch_add(1, Ordering::SeqCst);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let behavior = self.behaviors.get(resource).cloned().unwrap_or(Behavior {
            reply: Reply::Records(0),
            delay: Duration::ZERO,
        });
        let delay = if behavior.delay.is_zero() { self.default_delay } else { behavior.delay };
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match behavior.reply {
            Reply::Records(n) => Ok(n > 0),
            Reply::Fail(message) => {
                Err(CrmError::Status { status: 403, message: message.into(), context: None })
            }
            Reply::Panic => panic!("simulated unit panic for {resource}"),
        }
    }
}
