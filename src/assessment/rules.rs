//! Decision tables for the §14a check.
//!
//! Each path has an ordered table of rules. Tables are evaluated top-down and
//! the first rule whose condition holds decides the verdict. Thresholds are
//! passed in rather than hard-coded so the tables follow configuration.

use serde::{Deserialize, Serialize};

use crate::{config::RulesConfig, utils::format_decimal};

/// Outcome of one case. The label is the literal written to the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    FeeRequired,
    NoInvoiceRequired,
    GridOperatorReview,
    NoInstallationRequired,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::FeeRequired => "30 EUR Rechnung",
            Verdict::NoInvoiceRequired => "Kein Rechnungserfordernis",
            Verdict::GridOperatorReview => "Über 30 kW – Netzprüfung erforderlich",
            Verdict::NoInstallationRequired => "Kein Einbau erforderlich",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How prominently a verdict is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub fee_max_kw: f64,
    pub controllable_max_kw: f64,
    pub consumption_min_kwh: f64,
    pub cls_deadline_days: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds::from(&RulesConfig::default())
    }
}

impl From<&RulesConfig> for Thresholds {
    fn from(rules: &RulesConfig) -> Self {
        Self {
            fee_max_kw: rules.fee_max_kw,
            controllable_max_kw: rules.controllable_max_kw,
            consumption_min_kwh: rules.consumption_min_kwh,
            cls_deadline_days: rules.cls_deadline_days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstallationFacts {
    pub rated_power_kw: f64,
    pub controllable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumptionFacts {
    pub mean_kwh: f64,
}

/// One row of a decision table
pub struct Rule<F> {
    pub id: &'static str,
    pub verdict: Verdict,
    pub severity: Severity,
    pub condition: fn(&F, &Thresholds) -> bool,
    pub criterion: fn(&Thresholds) -> String,
    pub explanation: fn(&Thresholds) -> String,
}

impl<F> Rule<F> {
    pub fn matches(&self, facts: &F, thresholds: &Thresholds) -> bool {
        (self.condition)(facts, thresholds)
    }
}

impl<F> std::fmt::Debug for Rule<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("verdict", &self.verdict)
            .finish()
    }
}

/// First rule of `table` whose condition holds
pub fn first_match<'a, F>(
    table: &'a [Rule<F>],
    facts: &F,
    thresholds: &Thresholds,
) -> Option<&'a Rule<F>> {
    table.iter().find(|rule| rule.matches(facts, thresholds))
}

pub static INSTALLATION_RULES: &[Rule<InstallationFacts>] = &[
    Rule {
        id: "low-power",
        verdict: Verdict::FeeRequired,
        severity: Severity::Warning,
        condition: low_power,
        criterion: low_power_criterion,
        explanation: low_power_explanation,
    },
    Rule {
        id: "controllable-mid-power",
        verdict: Verdict::NoInvoiceRequired,
        severity: Severity::Success,
        condition: controllable_mid_power,
        criterion: controllable_mid_power_criterion,
        explanation: controllable_mid_power_explanation,
    },
    Rule {
        id: "uncontrollable-mid-power",
        verdict: Verdict::FeeRequired,
        severity: Severity::Warning,
        condition: uncontrollable_mid_power,
        criterion: uncontrollable_mid_power_criterion,
        explanation: uncontrollable_mid_power_explanation,
    },
    Rule {
        id: "high-power",
        verdict: Verdict::GridOperatorReview,
        severity: Severity::Error,
        condition: high_power,
        criterion: high_power_criterion,
        explanation: high_power_explanation,
    },
];

pub static CONSUMPTION_RULES: &[Rule<ConsumptionFacts>] = &[
    Rule {
        id: "high-consumption",
        verdict: Verdict::NoInstallationRequired,
        severity: Severity::Success,
        condition: high_consumption,
        criterion: high_consumption_criterion,
        explanation: high_consumption_explanation,
    },
    Rule {
        id: "low-consumption",
        verdict: Verdict::FeeRequired,
        severity: Severity::Error,
        condition: low_consumption,
        criterion: low_consumption_criterion,
        explanation: low_consumption_explanation,
    },
];

fn in_mid_bracket(facts: &InstallationFacts, t: &Thresholds) -> bool {
    facts.rated_power_kw > t.fee_max_kw && facts.rated_power_kw <= t.controllable_max_kw
}

fn low_power(facts: &InstallationFacts, t: &Thresholds) -> bool {
    facts.rated_power_kw <= t.fee_max_kw
}

fn low_power_criterion(t: &Thresholds) -> String {
    format!("P ≤ {} kW", format_decimal(t.fee_max_kw))
}

fn low_power_explanation(t: &Thresholds) -> String {
    format!(
        "Leistung ≤ {} kW – Rechnung über 30 EUR erforderlich.",
        format_decimal(t.fee_max_kw)
    )
}

fn controllable_mid_power(facts: &InstallationFacts, t: &Thresholds) -> bool {
    in_mid_bracket(facts, t) && facts.controllable
}

fn controllable_mid_power_criterion(t: &Thresholds) -> String {
    format!(
        "{} kW < P ≤ {} kW, steuerbar",
        format_decimal(t.fee_max_kw),
        format_decimal(t.controllable_max_kw)
    )
}

fn controllable_mid_power_explanation(t: &Thresholds) -> String {
    format!(
        "Kein Rechnungserfordernis – steuerbare Anlage unter {} kW.",
        format_decimal(t.controllable_max_kw)
    )
}

fn uncontrollable_mid_power(facts: &InstallationFacts, t: &Thresholds) -> bool {
    in_mid_bracket(facts, t) && !facts.controllable
}

fn uncontrollable_mid_power_criterion(t: &Thresholds) -> String {
    format!(
        "{} kW < P ≤ {} kW, nicht steuerbar",
        format_decimal(t.fee_max_kw),
        format_decimal(t.controllable_max_kw)
    )
}

fn uncontrollable_mid_power_explanation(_t: &Thresholds) -> String {
    "Anlage nicht steuerbar – 30 EUR Rechnung erforderlich.".to_string()
}

fn high_power(facts: &InstallationFacts, t: &Thresholds) -> bool {
    facts.rated_power_kw > t.controllable_max_kw
}

fn high_power_criterion(t: &Thresholds) -> String {
    format!("P > {} kW", format_decimal(t.controllable_max_kw))
}

fn high_power_explanation(t: &Thresholds) -> String {
    format!(
        "Leistung > {} kW – bitte Rücksprache mit Netzbetreiber halten!",
        format_decimal(t.controllable_max_kw)
    )
}

fn high_consumption(facts: &ConsumptionFacts, t: &Thresholds) -> bool {
    facts.mean_kwh >= t.consumption_min_kwh
}

fn high_consumption_criterion(t: &Thresholds) -> String {
    format!("Ø Verbrauch ≥ {} kWh", format_decimal(t.consumption_min_kwh))
}

fn high_consumption_explanation(_t: &Thresholds) -> String {
    "Kein Einbau erforderlich – Verbrauch ausreichend hoch.".to_string()
}

fn low_consumption(facts: &ConsumptionFacts, t: &Thresholds) -> bool {
    facts.mean_kwh < t.consumption_min_kwh
}

fn low_consumption_criterion(t: &Thresholds) -> String {
    format!("Ø Verbrauch < {} kWh", format_decimal(t.consumption_min_kwh))
}

fn low_consumption_explanation(t: &Thresholds) -> String {
    format!(
        "Verbrauch unter {} kWh – Rechnung über 30 EUR erforderlich.",
        format_decimal(t.consumption_min_kwh)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power(kw: f64, controllable: bool) -> InstallationFacts {
        InstallationFacts {
            rated_power_kw: kw,
            controllable,
        }
    }

    #[test]
    fn test_installation_predicates_are_disjoint() {
        let t = Thresholds::default();
        for kw in [0.0, 4.2, 4.21, 15.0, 30.0, 30.01, 250.0] {
            for controllable in [true, false] {
                let facts = power(kw, controllable);
                let hits = INSTALLATION_RULES
                    .iter()
                    .filter(|rule| rule.matches(&facts, &t))
                    .count();
                assert_eq!(hits, 1, "{} kW, controllable={}", kw, controllable);
            }
        }
    }

    #[test]
    fn test_consumption_predicates_are_disjoint() {
        let t = Thresholds::default();
        for mean in [0.0, 5999.99, 6000.0, 12000.0] {
            let facts = ConsumptionFacts { mean_kwh: mean };
            let hits = CONSUMPTION_RULES
                .iter()
                .filter(|rule| rule.matches(&facts, &t))
                .count();
            assert_eq!(hits, 1, "mean {}", mean);
        }
    }

    #[test]
    fn test_first_match_boundaries() {
        let t = Thresholds::default();
        let id = |kw, c| first_match(INSTALLATION_RULES, &power(kw, c), &t).unwrap().id;

        assert_eq!(id(4.2, true), "low-power");
        assert_eq!(id(4.3, true), "controllable-mid-power");
        assert_eq!(id(30.0, true), "controllable-mid-power");
        assert_eq!(id(30.0, false), "uncontrollable-mid-power");
        assert_eq!(id(30.1, true), "high-power");
    }

    #[test]
    fn test_thresholds_follow_config() {
        let t = Thresholds {
            fee_max_kw: 7.0,
            ..Thresholds::default()
        };
        let rule = first_match(INSTALLATION_RULES, &power(5.0, true), &t).unwrap();
        assert_eq!(rule.verdict, Verdict::FeeRequired);
        assert_eq!(
            (rule.explanation)(&t),
            "Leistung ≤ 7 kW – Rechnung über 30 EUR erforderlich."
        );
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::FeeRequired.to_string(), "30 EUR Rechnung");
        assert_eq!(Verdict::NoInvoiceRequired.label(), "Kein Rechnungserfordernis");
        assert_eq!(
            Verdict::GridOperatorReview.label(),
            "Über 30 kW – Netzprüfung erforderlich"
        );
        assert_eq!(Verdict::NoInstallationRequired.label(), "Kein Einbau erforderlich");
    }

    #[test]
    fn test_criteria_render_thresholds() {
        let t = Thresholds::default();
        let criteria: Vec<String> = INSTALLATION_RULES.iter().map(|r| (r.criterion)(&t)).collect();
        assert_eq!(criteria[0], "P ≤ 4,2 kW");
        assert_eq!(criteria[3], "P > 30 kW");
        assert_eq!((CONSUMPTION_RULES[0].criterion)(&t), "Ø Verbrauch ≥ 6000 kWh");
    }
}
