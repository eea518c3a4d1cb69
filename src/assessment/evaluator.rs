use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    assessment::rules::{
        first_match, ConsumptionFacts, InstallationFacts, Rule, Severity, Thresholds, Verdict,
        CONSUMPTION_RULES, INSTALLATION_RULES,
    },
    case::{ConsumptionProfile, InstallationProfile, SiteProfile},
};

/// Result of evaluating one case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub verdict: Verdict,
    pub rule_id: &'static str,
    pub severity: Severity,
    pub explanation: String,
    /// Installation path only: date by which the MSB must provision the CLS module
    pub cls_deadline: Option<NaiveDate>,
    /// Consumption path only: mean of the three yearly readings
    pub average_kwh: Option<f64>,
}

impl Assessment {
    fn from_rule<F>(rule: &Rule<F>, thresholds: &Thresholds) -> Self {
        Self {
            verdict: rule.verdict,
            rule_id: rule.id,
            severity: rule.severity,
            explanation: (rule.explanation)(thresholds),
            cls_deadline: None,
            average_kwh: None,
        }
    }

    /// Mean consumption as displayed, truncated to whole kWh
    pub fn average_kwh_truncated(&self) -> Option<u64> {
        self.average_kwh.map(|kwh| kwh.trunc() as u64)
    }
}

/// Maps a site profile to a verdict. Pure: no I/O and no clock.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    thresholds: Thresholds,
}

impl EligibilityEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Evaluate the active branch. `None` means a required field is missing.
    pub fn evaluate(&self, profile: &SiteProfile) -> Option<Assessment> {
        match profile {
            SiteProfile::Installation(installation) => self.evaluate_installation(installation),
            SiteProfile::Consumption(consumption) => self.evaluate_consumption(consumption),
        }
    }

    pub fn evaluate_installation(&self, profile: &InstallationProfile) -> Option<Assessment> {
        if !profile.is_complete() {
            debug!("Installation profile incomplete, no verdict");
            return None;
        }

        let facts = InstallationFacts {
            rated_power_kw: profile.rated_power_kw,
            controllable: profile.controllable,
        };
        let Some(rule) = first_match(INSTALLATION_RULES, &facts, &self.thresholds) else {
            warn!("No installation rule matched {:?}", facts);
            return None;
        };
        debug!(
            "Rule {} matched: {} kW, controllable={}",
            rule.id, facts.rated_power_kw, facts.controllable
        );

        let mut assessment = Assessment::from_rule(rule, &self.thresholds);
        assessment.cls_deadline = self.cls_deadline(profile.commissioning);
        Some(assessment)
    }

    pub fn evaluate_consumption(&self, profile: &ConsumptionProfile) -> Option<Assessment> {
        let Some(mean_kwh) = profile.mean_kwh() else {
            debug!("Consumption readings incomplete, no verdict");
            return None;
        };

        let facts = ConsumptionFacts { mean_kwh };
        let Some(rule) = first_match(CONSUMPTION_RULES, &facts, &self.thresholds) else {
            warn!("No consumption rule matched {:?}", facts);
            return None;
        };
        debug!("Rule {} matched: mean {:.2} kWh", rule.id, mean_kwh);

        let mut assessment = Assessment::from_rule(rule, &self.thresholds);
        assessment.average_kwh = Some(mean_kwh);
        Some(assessment)
    }

    /// Commissioning date plus the statutory provisioning window
    pub fn cls_deadline(&self, commissioning: NaiveDate) -> Option<NaiveDate> {
        commissioning.checked_add_days(Days::new(u64::from(self.thresholds.cls_deadline_days)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::InstallationType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn installation(kw: f64, controllable: bool) -> SiteProfile {
        SiteProfile::Installation(
            InstallationProfile::new([InstallationType::Pv], kw, controllable, date(2024, 1, 1))
                .unwrap(),
        )
    }

    fn consumption(readings: [u64; 3]) -> SiteProfile {
        SiteProfile::Consumption(ConsumptionProfile::new(readings.map(Some)))
    }

    fn verdict(profile: &SiteProfile) -> Verdict {
        EligibilityEvaluator::default().evaluate(profile).unwrap().verdict
    }

    #[test]
    fn test_low_power_always_requires_fee() {
        for kw in [0.0, 1.5, 4.2] {
            assert_eq!(verdict(&installation(kw, true)), Verdict::FeeRequired);
            assert_eq!(verdict(&installation(kw, false)), Verdict::FeeRequired);
        }
    }

    #[test]
    fn test_mid_power_depends_on_controllability() {
        for kw in [4.21, 11.0, 30.0] {
            assert_eq!(verdict(&installation(kw, true)), Verdict::NoInvoiceRequired);
            assert_eq!(verdict(&installation(kw, false)), Verdict::FeeRequired);
        }
    }

    #[test]
    fn test_high_power_needs_grid_operator_review() {
        for kw in [30.001, 99.0] {
            assert_eq!(verdict(&installation(kw, true)), Verdict::GridOperatorReview);
            assert_eq!(verdict(&installation(kw, false)), Verdict::GridOperatorReview);
        }
    }

    #[test]
    fn test_deadline_is_730_days_after_commissioning() {
        let assessment = EligibilityEvaluator::default()
            .evaluate(&installation(10.0, true))
            .unwrap();
        assert_eq!(assessment.cls_deadline, Some(date(2025, 12, 31)));
        assert_eq!(assessment.average_kwh, None);

        // Deadline is reported for every bracket
        let high = EligibilityEvaluator::default()
            .evaluate(&installation(50.0, false))
            .unwrap();
        assert_eq!(high.cls_deadline, Some(date(2025, 12, 31)));
    }

    #[test]
    fn test_deadline_across_non_leap_years() {
        let evaluator = EligibilityEvaluator::default();
        assert_eq!(evaluator.cls_deadline(date(2025, 3, 1)), Some(date(2027, 3, 1)));
    }

    #[test]
    fn test_installation_without_types_has_no_verdict() {
        let profile = SiteProfile::Installation(
            InstallationProfile::new([], 10.0, true, date(2024, 1, 1)).unwrap(),
        );
        assert_eq!(EligibilityEvaluator::default().evaluate(&profile), None);
    }

    #[test]
    fn test_consumption_threshold_is_inclusive() {
        assert_eq!(verdict(&consumption([6000, 6000, 6000])), Verdict::NoInstallationRequired);
        assert_eq!(verdict(&consumption([5999, 6000, 6000])), Verdict::FeeRequired);
        assert_eq!(verdict(&consumption([9000, 3000, 6000])), Verdict::NoInstallationRequired);
        assert_eq!(verdict(&consumption([1000, 2000, 3000])), Verdict::FeeRequired);
    }

    #[test]
    fn test_consumption_reports_mean() {
        let assessment = EligibilityEvaluator::default()
            .evaluate(&consumption([5000, 5000, 5001]))
            .unwrap();
        assert_eq!(assessment.average_kwh_truncated(), Some(5000));
        assert!(assessment.average_kwh.unwrap() > 5000.0);
        assert_eq!(assessment.cls_deadline, None);
        assert_eq!(assessment.rule_id, "low-consumption");
        assert_eq!(assessment.severity, Severity::Error);
    }

    #[test]
    fn test_missing_reading_has_no_verdict() {
        let profile = SiteProfile::Consumption(ConsumptionProfile::from_entries(
            [Some(8000), Some(0), Some(8000)],
            true,
        ));
        assert_eq!(EligibilityEvaluator::default().evaluate(&profile), None);
    }

    #[test]
    fn test_custom_thresholds() {
        let evaluator = EligibilityEvaluator::new(Thresholds {
            consumption_min_kwh: 4000.0,
            cls_deadline_days: 365,
            ..Thresholds::default()
        });
        let verdict = evaluator.evaluate(&consumption([4000, 4000, 4000])).unwrap().verdict;
        assert_eq!(verdict, Verdict::NoInstallationRequired);
        assert_eq!(evaluator.cls_deadline(date(2024, 1, 1)), Some(date(2024, 12, 31)));
    }
}
