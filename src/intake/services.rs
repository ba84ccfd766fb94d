use tracing::debug;

use crate::intake::dto::{IntakeTable, NutrientGoal};
use crate::profile::dto::{Profile, RawProfile, Sex};

pub const CALORIES: &str = "Calories";
pub const PROTEIN: &str = "Protein";
pub const CARBOHYDRATE: &str = "Carbohydrate";
pub const FAT: &str = "Fat";

/// Static defaults. Entries other than the four macros are never derived.
pub fn base_table() -> IntakeTable {
    [
        NutrientGoal::new(CALORIES, 2000.0, "kcal"),
        NutrientGoal::new(PROTEIN, 50.0, "g"),
        NutrientGoal::new(CARBOHYDRATE, 300.0, "g"),
        NutrientGoal::new(FAT, 70.0, "g"),
        NutrientGoal::new("Fiber", 25.0, "g"),
        NutrientGoal::new("Calcium", 1000.0, "mg"),
        NutrientGoal::new("Iron", 18.0, "mg"),
    ]
    .into_iter()
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MacroTargets {
    calories: f64,
    carbohydrate: f64,
    protein: f64,
    fat: f64,
}

const fn targets(calories: f64, carbohydrate: f64, protein: f64, fat: f64) -> MacroTargets {
    MacroTargets {
        calories,
        carbohydrate,
        protein,
        fat,
    }
}

/// Decision table keyed by sex and age bracket. Anything under 30 (negative
/// input included) is the first bracket; 60 and over has no bracket.
fn bracket(sex: Sex, age: i64) -> Option<MacroTargets> {
    match (sex, age) {
        (Sex::Male, i64::MIN..=29) => Some(targets(2530.0, 380.0, 95.0, 70.0)),
        (Sex::Male, 30..=59) => Some(targets(2420.0, 363.0, 91.0, 67.0)),
        (Sex::Female, i64::MIN..=29) => Some(targets(1930.0, 290.0, 73.0, 54.0)),
        (Sex::Female, 30..=59) => Some(targets(1870.0, 281.0, 70.0, 52.0)),
        _ => None,
    }
}

/// Derives the RDI table for a validated profile; `None` yields the defaults.
pub fn recommended_intake(profile: Option<&Profile>) -> IntakeTable {
    let mut table = base_table();
    let Some(profile) = profile else {
        return table;
    };
    if !(profile.weight_kg.is_finite() && profile.weight_kg > 0.0) {
        return table;
    }

    if let Some(t) = bracket(profile.sex, profile.age) {
        table.set_amount(CALORIES, t.calories);
        table.set_amount(PROTEIN, t.protein);
        table.set_amount(CARBOHYDRATE, t.carbohydrate);
        table.set_amount(FAT, t.fat);
    }
    table
}

/// Parses a user-entered profile and falls back to the defaults when it does
/// not validate.
pub fn goals_for_raw(raw: Option<&RawProfile>) -> IntakeTable {
    match raw.map(Profile::parse) {
        None => recommended_intake(None),
        Some(Ok(profile)) => recommended_intake(Some(&profile)),
        Some(Err(e)) => {
            debug!(error = %e, "profile did not validate; using default intake");
            recommended_intake(None)
        }
    }
}
