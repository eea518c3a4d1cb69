use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{CheckError, Result};

/// Labels of the three yearly readings, oldest first
pub const READING_LABELS: [&str; 3] = ["Vor 3 Jahren", "Vor 2 Jahren", "Letztes Jahr"];

/// Customer identification captured by the entry form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCase {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub meter_id: String,
}

impl CustomerCase {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        meter_id: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            meter_id: meter_id.into(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Controllable device kinds offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InstallationType {
    Pv,
    Wallbox,
    Storage,
    PvWithStorage,
    HeatPump,
}

impl InstallationType {
    pub const ALL: [InstallationType; 5] = [
        InstallationType::Pv,
        InstallationType::Wallbox,
        InstallationType::Storage,
        InstallationType::PvWithStorage,
        InstallationType::HeatPump,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InstallationType::Pv => "PV-Anlage",
            InstallationType::Wallbox => "Wallbox",
            InstallationType::Storage => "Stromspeicher",
            InstallationType::PvWithStorage => "PV + Speicher",
            InstallationType::HeatPump => "Wärmepumpe",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            InstallationType::Pv => "pv",
            InstallationType::Wallbox => "wallbox",
            InstallationType::Storage => "storage",
            InstallationType::PvWithStorage => "pv-storage",
            InstallationType::HeatPump => "heat-pump",
        }
    }
}

impl std::fmt::Display for InstallationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for InstallationType {
    type Err = CheckError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        InstallationType::ALL
            .into_iter()
            .find(|t| t.slug() == needle || t.label().to_lowercase() == needle)
            .ok_or_else(|| {
                let known: Vec<_> = InstallationType::ALL.iter().map(|t| t.slug()).collect();
                CheckError::invalid_input(
                    "installation type",
                    format!("unknown type '{}', expected one of {}", s.trim(), known.join(", ")),
                )
            })
    }
}

/// Installation branch: present only when the site has a controllable installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationProfile {
    pub types: BTreeSet<InstallationType>,
    pub rated_power_kw: f64,
    pub controllable: bool,
    pub commissioning: NaiveDate,
}

impl InstallationProfile {
    pub fn new(
        types: impl IntoIterator<Item = InstallationType>,
        rated_power_kw: f64,
        controllable: bool,
        commissioning: NaiveDate,
    ) -> Result<Self> {
        if !rated_power_kw.is_finite() || rated_power_kw < 0.0 {
            return Err(CheckError::invalid_input(
                "rated power",
                format!("{} kW is not a valid rating", rated_power_kw),
            ));
        }
        Ok(Self {
            types: types.into_iter().collect(),
            rated_power_kw,
            controllable,
            commissioning,
        })
    }

    /// A rating without any selected installation type is not assessable
    pub fn is_complete(&self) -> bool {
        !self.types.is_empty() && self.rated_power_kw.is_finite() && self.rated_power_kw >= 0.0
    }
}

/// Consumption branch: three yearly readings, each explicitly present or not
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionProfile {
    readings: [Option<u64>; 3],
}

impl ConsumptionProfile {
    pub fn new(readings: [Option<u64>; 3]) -> Self {
        Self { readings }
    }

    /// Build from form entries. With `zero_is_unset` an entered 0 counts as
    /// "not entered".
    pub fn from_entries(entries: [Option<u64>; 3], zero_is_unset: bool) -> Self {
        let readings = entries.map(|entry| entry.filter(|kwh| !(zero_is_unset && *kwh == 0)));
        Self { readings }
    }

    pub fn readings(&self) -> [Option<u64>; 3] {
        self.readings
    }

    pub fn complete_readings(&self) -> Option<[u64; 3]> {
        match self.readings {
            [Some(a), Some(b), Some(c)] => Some([a, b, c]),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete_readings().is_some()
    }

    /// Arithmetic mean in kWh, real division
    pub fn mean_kwh(&self) -> Option<f64> {
        self.complete_readings()
            .map(|readings| readings.iter().map(|kwh| *kwh as f64).sum::<f64>() / 3.0)
    }
}

/// The active branch of a case; the other branch is absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "branch", rename_all = "snake_case")]
pub enum SiteProfile {
    Installation(InstallationProfile),
    Consumption(ConsumptionProfile),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installation_type_parsing() {
        assert_eq!("pv".parse::<InstallationType>().unwrap(), InstallationType::Pv);
        assert_eq!("Wärmepumpe".parse::<InstallationType>().unwrap(), InstallationType::HeatPump);
        assert_eq!("PV + Speicher".parse::<InstallationType>().unwrap(), InstallationType::PvWithStorage);
        assert_eq!(" Heat-Pump ".parse::<InstallationType>().unwrap(), InstallationType::HeatPump);
        assert!("windmill".parse::<InstallationType>().is_err());
    }

    #[test]
    fn test_installation_profile_rejects_negative_power() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(InstallationProfile::new([InstallationType::Pv], -0.1, true, date).is_err());
        assert!(InstallationProfile::new([InstallationType::Pv], f64::NAN, true, date).is_err());
    }

    #[test]
    fn test_installation_profile_requires_types() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let empty = InstallationProfile::new([], 10.0, true, date).unwrap();
        assert!(!empty.is_complete());

        let wallbox = InstallationProfile::new([InstallationType::Wallbox], 0.0, false, date).unwrap();
        assert!(wallbox.is_complete());
    }

    #[test]
    fn test_consumption_mean_uses_real_division() {
        let profile = ConsumptionProfile::new([Some(6000), Some(6000), Some(6001)]);
        let mean = profile.mean_kwh().unwrap();
        assert!(mean > 6000.0 && mean < 6001.0);
    }

    #[test]
    fn test_consumption_missing_reading_has_no_mean() {
        let profile = ConsumptionProfile::new([Some(7000), None, Some(7000)]);
        assert!(!profile.is_complete());
        assert_eq!(profile.mean_kwh(), None);
    }

    #[test]
    fn test_zero_entry_policy() {
        let entries = [Some(7000), Some(0), Some(7000)];

        let legacy = ConsumptionProfile::from_entries(entries, true);
        assert_eq!(legacy.readings(), [Some(7000), None, Some(7000)]);
        assert!(!legacy.is_complete());

        let explicit = ConsumptionProfile::from_entries(entries, false);
        assert_eq!(explicit.complete_readings(), Some([7000, 0, 7000]));
    }
}
