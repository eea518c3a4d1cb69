use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::{
    assessment::{Assessment, EligibilityEvaluator},
    case::models::{
        ConsumptionProfile, CustomerCase, InstallationProfile, InstallationType, SiteProfile,
    },
    export::ExportRecord,
};

/// Installation fields as currently entered
#[derive(Debug, Clone, PartialEq)]
pub struct InstallationDraft {
    pub types: BTreeSet<InstallationType>,
    /// `None` while the field is blank or not a valid rating
    pub rated_power_kw: Option<f64>,
    pub controllable: bool,
    pub commissioning: Option<NaiveDate>,
}

impl InstallationDraft {
    /// Form defaults: no type selected, 0 kW, controllable, commissioning today
    pub fn new(today: NaiveDate) -> Self {
        Self {
            types: BTreeSet::new(),
            rated_power_kw: Some(0.0),
            controllable: true,
            commissioning: Some(today),
        }
    }

    /// Toggle a type in the selection; returns whether it is now selected
    pub fn toggle_type(&mut self, installation_type: InstallationType) -> bool {
        if self.types.remove(&installation_type) {
            false
        } else {
            self.types.insert(installation_type);
            true
        }
    }

    pub fn to_profile(&self) -> Option<InstallationProfile> {
        if self.types.is_empty() {
            return None;
        }
        InstallationProfile::new(
            self.types.iter().copied(),
            self.rated_power_kw?,
            self.controllable,
            self.commissioning?,
        )
        .ok()
    }
}

/// Yearly readings as currently entered, oldest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumptionDraft {
    pub entries: [Option<u64>; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub enum SiteDraft {
    Installation(InstallationDraft),
    Consumption(ConsumptionDraft),
}

/// One customer case from entry to export.
///
/// Owns the submitted customer data and the draft of the active branch only;
/// switching the branch discards the other branch's draft.
#[derive(Debug, Clone)]
pub struct CaseSession {
    customer: Option<CustomerCase>,
    site: SiteDraft,
    today: NaiveDate,
    zero_reading_is_unset: bool,
}

impl CaseSession {
    pub fn new(today: NaiveDate, zero_reading_is_unset: bool) -> Self {
        Self {
            customer: None,
            site: SiteDraft::Installation(InstallationDraft::new(today)),
            today,
            zero_reading_is_unset,
        }
    }

    /// Store the entry form; a later submission replaces the earlier one
    pub fn submit_customer(&mut self, customer: CustomerCase) {
        info!(
            "Customer data saved for {}, meter {}",
            customer.display_name(),
            customer.meter_id
        );
        self.customer = Some(customer);
    }

    pub fn customer(&self) -> Option<&CustomerCase> {
        self.customer.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.customer.is_some()
    }

    pub fn has_installation(&self) -> bool {
        matches!(self.site, SiteDraft::Installation(_))
    }

    pub fn set_has_installation(&mut self, has_installation: bool) {
        if has_installation == self.has_installation() {
            return;
        }
        debug!("Switching branch, installation present: {}", has_installation);
        self.site = if has_installation {
            SiteDraft::Installation(InstallationDraft::new(self.today))
        } else {
            SiteDraft::Consumption(ConsumptionDraft::default())
        };
    }

    pub fn site(&self) -> &SiteDraft {
        &self.site
    }

    pub fn installation_mut(&mut self) -> Option<&mut InstallationDraft> {
        match &mut self.site {
            SiteDraft::Installation(draft) => Some(draft),
            SiteDraft::Consumption(_) => None,
        }
    }

    pub fn consumption_mut(&mut self) -> Option<&mut ConsumptionDraft> {
        match &mut self.site {
            SiteDraft::Consumption(draft) => Some(draft),
            SiteDraft::Installation(_) => None,
        }
    }

    /// Complete profile of the active branch, if all required fields are set
    pub fn profile(&self) -> Option<SiteProfile> {
        match &self.site {
            SiteDraft::Installation(draft) => draft.to_profile().map(SiteProfile::Installation),
            SiteDraft::Consumption(draft) => {
                let profile =
                    ConsumptionProfile::from_entries(draft.entries, self.zero_reading_is_unset);
                profile.is_complete().then_some(SiteProfile::Consumption(profile))
            }
        }
    }

    pub fn assess(&self, evaluator: &EligibilityEvaluator) -> Option<Assessment> {
        self.profile().and_then(|profile| evaluator.evaluate(&profile))
    }

    /// Only a submitted case with a verdict can be exported
    pub fn export_record(&self, evaluator: &EligibilityEvaluator) -> Option<ExportRecord> {
        let customer = self.customer.as_ref()?;
        let assessment = self.assess(evaluator)?;
        Some(ExportRecord::new(customer, assessment.verdict))
    }

    /// Discard the current case and start over
    pub fn reset(&mut self) {
        *self = CaseSession::new(self.today, self.zero_reading_is_unset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::Verdict;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn anna() -> CustomerCase {
        CustomerCase::new("Anna", "Muster", "Teststr. 1", "123456")
    }

    #[test]
    fn test_new_session_defaults() {
        let session = CaseSession::new(today(), true);
        assert!(session.has_installation());
        assert!(!session.is_submitted());
        match session.site() {
            SiteDraft::Installation(draft) => {
                assert!(draft.types.is_empty());
                assert!(draft.controllable);
                assert_eq!(draft.commissioning, Some(today()));
            }
            SiteDraft::Consumption(_) => panic!("expected installation branch"),
        }
    }

    #[test]
    fn test_installation_requires_type_selection() {
        let evaluator = EligibilityEvaluator::default();
        let mut session = CaseSession::new(today(), true);
        assert!(session.assess(&evaluator).is_none());

        let draft = session.installation_mut().unwrap();
        assert!(draft.toggle_type(InstallationType::Wallbox));
        draft.rated_power_kw = Some(11.0);

        let assessment = session.assess(&evaluator).unwrap();
        assert_eq!(assessment.verdict, Verdict::NoInvoiceRequired);
        assert_eq!(assessment.cls_deadline, NaiveDate::from_ymd_opt(2025, 12, 31));

        session.installation_mut().unwrap().commissioning = None;
        assert!(session.assess(&evaluator).is_none());
        session.installation_mut().unwrap().commissioning = Some(today());

        let draft = session.installation_mut().unwrap();
        assert!(!draft.toggle_type(InstallationType::Wallbox));
        assert!(session.assess(&evaluator).is_none());
    }

    #[test]
    fn test_switching_branch_discards_other_draft() {
        let mut session = CaseSession::new(today(), true);
        session.installation_mut().unwrap().toggle_type(InstallationType::Pv);

        session.set_has_installation(false);
        assert!(session.installation_mut().is_none());
        session.consumption_mut().unwrap().entries = [Some(1), Some(2), Some(3)];

        session.set_has_installation(true);
        match session.site() {
            SiteDraft::Installation(draft) => assert!(draft.types.is_empty()),
            SiteDraft::Consumption(_) => panic!("expected installation branch"),
        }
    }

    #[test]
    fn test_export_needs_submission_and_verdict() {
        let evaluator = EligibilityEvaluator::default();
        let mut session = CaseSession::new(today(), true);
        session.set_has_installation(false);
        session.consumption_mut().unwrap().entries = [Some(4000), Some(5000), Some(6000)];

        // Verdict but no submitted customer
        assert!(session.assess(&evaluator).is_some());
        assert!(session.export_record(&evaluator).is_none());

        session.submit_customer(anna());
        let record = session.export_record(&evaluator).unwrap();
        assert_eq!(
            record.values(),
            ["Anna", "Muster", "Teststr. 1", "123456", "30 EUR Rechnung"]
        );
    }

    #[test]
    fn test_zero_reading_suppresses_export() {
        let evaluator = EligibilityEvaluator::default();
        let mut session = CaseSession::new(today(), true);
        session.submit_customer(anna());
        session.set_has_installation(false);
        session.consumption_mut().unwrap().entries = [Some(7000), Some(0), Some(7000)];

        assert!(session.profile().is_none());
        assert!(session.assess(&evaluator).is_none());
        assert!(session.export_record(&evaluator).is_none());
    }

    #[test]
    fn test_zero_reading_counts_when_policy_disabled() {
        let evaluator = EligibilityEvaluator::default();
        let mut session = CaseSession::new(today(), false);
        session.set_has_installation(false);
        session.consumption_mut().unwrap().entries = [Some(9000), Some(0), Some(9000)];

        assert_eq!(session.assess(&evaluator).unwrap().verdict, Verdict::NoInstallationRequired);
    }

    #[test]
    fn test_resubmission_replaces_customer() {
        let mut session = CaseSession::new(today(), true);
        session.submit_customer(anna());
        session.submit_customer(CustomerCase::new("Ben", "Beispiel", "Hauptstr. 5", "999"));
        assert_eq!(session.customer().unwrap().meter_id, "999");

        session.reset();
        assert!(!session.is_submitted());
    }
}
