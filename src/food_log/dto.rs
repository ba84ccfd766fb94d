use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};

use crate::nutrients::dto::Food;

/// Sync state of a locally logged entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
    Failed,
}

/// Meal slot, serialized as 1 (breakfast), 2 (lunch) or 3 (dinner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl TryFrom<u8> for MealType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Breakfast),
            2 => Ok(Self::Lunch),
            3 => Ok(Self::Dinner),
            other => Err(format!("unknown meal type {other}, expected 1, 2 or 3")),
        }
    }
}

impl From<MealType> for u8 {
    fn from(value: MealType) -> Self {
        match value {
            MealType::Breakfast => 1,
            MealType::Lunch => 2,
            MealType::Dinner => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogEntry {
    pub local_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Absent on records written without a food; such entries are kept but
    /// count for nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<Food>,
    pub quantity: f64,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_meal_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_food_entry_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
}

/// Request body for logging a food.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntryRequest {
    pub food: Food,
    pub quantity: f64,
    #[serde(default)]
    pub meal_type: Option<MealType>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
}

/// Request body for a sync-status transition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncUpdateRequest {
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub server_id: Option<i64>,
    #[serde(default)]
    pub server_meal_id: Option<i64>,
    #[serde(default)]
    pub server_food_entry_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

impl DayQuery {
    /// Requested calendar day (`YYYY-MM-DD`), today in UTC when absent.
    pub fn day(&self) -> Result<Date, time::error::Parse> {
        match self.date.as_deref() {
            Some(raw) => Date::parse(raw, &format_description!("[year]-[month]-[day]")),
            None => Ok(OffsetDateTime::now_utc().date()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn meal_type_is_a_number_on_the_wire() {
        assert_eq!(serde_json::to_string(&MealType::Dinner).unwrap(), "3");
        assert_eq!(serde_json::from_str::<MealType>("1").unwrap(), MealType::Breakfast);
        assert!(serde_json::from_str::<MealType>("4").is_err());
    }

    #[test]
    fn entry_uses_camel_case_and_rfc3339() {
        let json = serde_json::json!({
            "localId": "l-1",
            "timestamp": "2026-10-18T07:45:00Z",
            "food": { "id": "f", "name": "Oats", "servingSize": "40 g" },
            "quantity": 2,
            "syncStatus": "synced",
            "mealType": 1
        });
        let entry: FoodLogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(entry.sync_status, SyncStatus::Synced);
        assert_eq!(entry.timestamp.date(), date!(2026-10-18));
        assert!(entry.food.as_ref().unwrap().nutrients.is_empty());

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["food"]["servingSize"], "40 g");
        assert!(back.get("serverId").is_none());
    }

    #[test]
    fn entry_without_food_still_reads_and_writes() {
        let json = serde_json::json!({
            "localId": "l-2",
            "timestamp": "2026-10-18T07:45:00Z",
            "quantity": 1
        });
        let entry: FoodLogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(entry.food, None);
        assert!(serde_json::to_value(&entry).unwrap().get("food").is_none());
    }

    #[test]
    fn day_query_parses_iso_dates() {
        let q = DayQuery {
            date: Some("2026-02-28".into()),
        };
        assert_eq!(q.day().unwrap(), date!(2026-02-28));

        let bad = DayQuery {
            date: Some("28/02/2026".into()),
        };
        assert!(bad.day().is_err());
    }
}
