use serde::Serialize;

use crate::{assessment::Verdict, case::CustomerCase};

/// Header row of the exported sheet
pub const HEADERS: [&str; 5] = ["Vorname", "Nachname", "Adresse", "Zählernummer", "Ergebnis"];

/// Flattened single-row projection of a submitted case and its verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    #[serde(rename = "Vorname")]
    pub first_name: String,
    #[serde(rename = "Nachname")]
    pub last_name: String,
    #[serde(rename = "Adresse")]
    pub address: String,
    #[serde(rename = "Zählernummer")]
    pub meter_id: String,
    #[serde(rename = "Ergebnis")]
    pub result: String,
}

impl ExportRecord {
    pub fn new(customer: &CustomerCase, verdict: Verdict) -> Self {
        Self {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            address: customer.address.clone(),
            meter_id: customer.meter_id.clone(),
            result: verdict.label().to_string(),
        }
    }

    /// Cell values in header order
    pub fn values(&self) -> [&str; 5] {
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.address.as_str(),
            self.meter_id.as_str(),
            self.result.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_verdict_label() {
        let customer = CustomerCase::new("Anna", "Muster", "Teststr. 1", "123456");
        let record = ExportRecord::new(&customer, Verdict::FeeRequired);
        assert_eq!(
            record.values(),
            ["Anna", "Muster", "Teststr. 1", "123456", "30 EUR Rechnung"]
        );
    }
}
