use serde::{Deserialize, Serialize};

use crate::intake::dto::IntakeTable;

/// Per-serving amount of one nutrient. `name` is the join key against the intake table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    pub unit: String,
    pub amount: f64,
}

/// Food as fetched from the catalog; copied by value into each log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: String,
    pub name: String,
    pub serving_size: String,
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// One consumed-vs-goal bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientProgress {
    pub name: String,
    pub unit: String,
    pub consumed: f64,
    pub recommended: f64,
    pub percent: f64,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub date: String,
    pub consumed: Vec<Nutrient>,
    pub goals: IntakeTable,
    pub progress: Vec<NutrientProgress>,
}
