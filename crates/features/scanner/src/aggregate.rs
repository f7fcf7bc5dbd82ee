use dormant_domain::model::{ActivityOutcome, ScanResult};

/// Collects inactive resource names in the order of `outcomes`.
///
/// `Errored` outcomes are unknown, not inactive, and are left out together with
/// active ones.
#[must_use]
pub fn aggregate(outcomes: &[ActivityOutcome]) -> ScanResult {
    outcomes.iter().filter(|o| o.is_inactive()).map(|o| o.resource.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dormant_domain::model::{ActivityState, FailureReason};

    #[test]
    fn keeps_only_inactive_in_given_order() {
        let outcomes = [
            ActivityOutcome::new("Zeta__c", ActivityState::Inactive),
            ActivityOutcome::new("Alpha__c", ActivityState::Active),
            ActivityOutcome::errored("Beta__c", FailureReason::Timeout),
            ActivityOutcome::errored("Gamma__c", FailureReason::Query("INVALID_TYPE".into())),
            ActivityOutcome::new("Delta__c", ActivityState::Inactive),
        ];

        assert_eq!(aggregate(&outcomes).inactive_objects, ["Zeta__c", "Delta__c"]);
    }

    #[test]
    fn empty_input_gives_empty_result() {
        assert!(aggregate(&[]).is_empty());
    }
}
