//! Soil report history records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::soil::SoilSample;

/// A submission waiting to be persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewReport {
    #[serde(default)]
    pub farmer_name: String,
    #[serde(flatten)]
    pub sample: SoilSample,
}

impl NewReport {
    pub fn new(farmer_name: impl Into<String>, sample: SoilSample) -> Self {
        Self {
            farmer_name: farmer_name.into(),
            sample,
        }
    }
}

/// A persisted soil report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRecord {
    pub id: i64,
    pub farmer_name: String,
    #[serde(flatten)]
    pub sample: SoilSample,
    pub created_at: DateTime<Utc>,
}

/// Flat row used for tabular history export
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub id: i64,
    pub farmer: String,
    pub ph: String,
    pub nitrogen: &'static str,
    pub phosphorus: &'static str,
    pub potassium: &'static str,
    pub organic_carbon: &'static str,
    pub created_at: String,
}

impl From<&ReportRecord> for ReportRow {
    fn from(record: &ReportRecord) -> Self {
        ReportRow {
            id: record.id,
            farmer: record.farmer_name.clone(),
            ph: record.sample.ph_level.to_string(),
            nitrogen: record.sample.nitrogen.as_str(),
            phosphorus: record.sample.phosphorus.as_str(),
            potassium: record.sample.potassium.as_str(),
            organic_carbon: record.sample.organic_carbon.as_str(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}
