use std::collections::HashMap;

use crate::food_log::dto::FoodLogEntry;
use crate::intake::dto::IntakeTable;
use crate::nutrients::dto::{Nutrient, NutrientProgress};

/// Sums `amount * quantity` per nutrient name across all entries.
///
/// Output keeps the order in which each name first appears and takes the unit
/// from that first occurrence. Entries without a food or without nutrients
/// contribute nothing.
pub fn aggregate(entries: &[FoodLogEntry]) -> Vec<Nutrient> {
    let mut totals: Vec<Nutrient> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let Some(food) = &entry.food else {
            continue;
        };
        for nutrient in &food.nutrients {
            let amount = nutrient.amount * entry.quantity;
            match index.get(nutrient.name.as_str()) {
                Some(&i) => totals[i].amount += amount,
                None => {
                    index.insert(nutrient.name.as_str(), totals.len());
                    totals.push(Nutrient {
                        name: nutrient.name.clone(),
                        unit: nutrient.unit.clone(),
                        amount,
                    });
                }
            }
        }
    }

    totals
}

/// Pairs consumed totals with goals: one row per goal, then one row per
/// consumed nutrient the table has no goal for.
pub fn progress(consumed: &[Nutrient], goals: &IntakeTable) -> Vec<NutrientProgress> {
    let mut rows: Vec<NutrientProgress> = goals
        .goals()
        .map(|goal| {
            let eaten = consumed
                .iter()
                .find(|n| n.name == goal.name)
                .map(|n| n.amount)
                .unwrap_or(0.0);
            row(&goal.name, &goal.unit, eaten, goal.amount)
        })
        .collect();

    rows.extend(
        consumed
            .iter()
            .filter(|n| !goals.contains(&n.name))
            .map(|n| row(&n.name, &n.unit, n.amount, 0.0)),
    );

    rows
}

fn row(name: &str, unit: &str, consumed: f64, recommended: f64) -> NutrientProgress {
    NutrientProgress {
        name: name.to_string(),
        unit: unit.to_string(),
        consumed,
        recommended,
        percent: percent_of(consumed, recommended),
    }
}

fn percent_of(consumed: f64, recommended: f64) -> f64 {
    if recommended > 0.0 && consumed.is_finite() {
        consumed / recommended * 100.0
    } else {
        0.0
    }
}
