pub mod evaluator;
pub mod rules;

pub use evaluator::{Assessment, EligibilityEvaluator};
pub use rules::{
    ConsumptionFacts, InstallationFacts, Rule, Severity, Thresholds, Verdict,
    CONSUMPTION_RULES, INSTALLATION_RULES,
};
