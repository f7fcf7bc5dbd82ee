use dormant_crm::{CrmApi, OrgEndpoint};
use dormant_domain::model::ResourceDescriptor;
use dormant_vault::Credential;
use tracing::debug;

use crate::error::{ScanError, ScanErrorExt};

/// Keeps custom objects carrying one of `suffixes`, preserving listing order and
/// dropping repeated names.
pub fn filter_candidates<S: AsRef<str>>(
    resources: Vec<ResourceDescriptor>,
    suffixes: &[S],
) -> Vec<ResourceDescriptor> {
    let mut seen = fxhash::FxHashSet::default();
    resources
        .into_iter()
        .filter(|r| r.is_candidate(suffixes))
        .filter(|r| seen.insert(r.name.clone()))
        .collect()
}

/// Lists the org's objects and reduces them to scan candidates.
///
/// Any failure of the listing call is fatal to the request.
pub async fn list_candidate_resources<S: AsRef<str> + Sync>(
    crm: &dyn CrmApi,
    credential: &Credential,
    endpoint: &OrgEndpoint,
    suffixes: &[S],
) -> Result<Vec<ResourceDescriptor>, ScanError> {
    let listed = crm.list_resources(credential, endpoint).await.context("object listing")?;
    let total = listed.len();
    let candidates = filter_candidates(listed, suffixes);

    debug!(org = %endpoint, total, candidates = candidates.len(), "Enumerated candidate objects");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_drops_standard_objects() {
        let listed = vec![
            ResourceDescriptor::new("Account", false),
            ResourceDescriptor::new("Case__c", true),
            ResourceDescriptor::new("Shipment__x", true),
            ResourceDescriptor::new("Account__c", true),
            ResourceDescriptor::new("Case__c", true),
            ResourceDescriptor::new("Legacy__c", false),
        ];

        let names: Vec<_> =
            filter_candidates(listed, &["__c"]).into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["Case__c", "Account__c"]);
    }

    #[test]
    fn honours_extra_suffixes() {
        let listed = vec![
            ResourceDescriptor::new("Case__c", true),
            ResourceDescriptor::new("Shipment__x", true),
        ];
        assert_eq!(filter_candidates(listed, &["__c", "__x"]).len(), 2);
    }
}
