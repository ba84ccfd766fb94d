use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Recommended daily amount for one nutrient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientGoal {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl NutrientGoal {
    pub fn new(name: &str, amount: f64, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            amount,
            unit: unit.to_string(),
        }
    }
}

/// RDI table keyed by nutrient name. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntakeTable(BTreeMap<String, NutrientGoal>);

impl IntakeTable {
    pub fn insert(&mut self, goal: NutrientGoal) {
        self.0.insert(goal.name.clone(), goal);
    }

    pub fn get(&self, name: &str) -> Option<&NutrientGoal> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Overwrites the amount of an existing goal; unknown names are ignored.
    pub fn set_amount(&mut self, name: &str, amount: f64) {
        if let Some(goal) = self.0.get_mut(name) {
            goal.amount = amount;
        }
    }

    pub fn goals(&self) -> impl Iterator<Item = &NutrientGoal> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<NutrientGoal> for IntakeTable {
    fn from_iter<I: IntoIterator<Item = NutrientGoal>>(iter: I) -> Self {
        let mut table = Self::default();
        for goal in iter {
            table.insert(goal);
        }
        table
    }
}
