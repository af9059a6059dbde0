use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::error::{PlanError, Result};
use crate::models::{FoodCategory, FoodEntry};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Administrative access to the nutrition table.
///
/// Plan generation only uses `get` and `list`. Writers take `&mut self`, so a
/// single owner serializes every edit.
pub trait FoodRepository {
    fn get(&self, id: &str) -> Option<&FoodEntry>;

    /// All foods, ordered by id.
    fn list(&self) -> Vec<&FoodEntry>;

    /// Insert or replace a food. Returns the previous entry if one existed.
    fn upsert(&mut self, food: FoodEntry) -> Result<Option<FoodEntry>>;

    /// Remove a food by id.
    fn delete(&mut self, id: &str) -> Result<FoodEntry>;

    /// Look up a food, failing loudly when it is absent.
    fn require(&self, id: &str) -> Result<&FoodEntry> {
        self.get(id)
            .ok_or_else(|| PlanError::FoodNotFound(id.to_string()))
    }
}

/// In-memory nutrition table keyed by lowercase id.
#[derive(Debug, Clone, Default)]
pub struct FoodTable {
    foods: HashMap<String, FoodEntry>,
}

impl FoodTable {
    /// Build a table, rejecting invalid entries and duplicate ids.
    pub fn new(foods: Vec<FoodEntry>) -> Result<Self> {
        let mut map = HashMap::new();
        for food in foods {
            if !food.is_valid() {
                return Err(PlanError::IntegrityViolation(format!(
                    "food '{}' has negative or empty values",
                    food.id
                )));
            }
            let key = food.key();
            if map.insert(key, food).is_some() {
                return Err(PlanError::IntegrityViolation(
                    "duplicate food id in nutrition table".to_string(),
                ));
            }
        }
        Ok(Self { foods: map })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.foods.contains_key(&id.to_lowercase())
    }

    /// Foods with the given category tag, ordered by id.
    pub fn by_category(&self, category: FoodCategory) -> Vec<&FoodEntry> {
        let mut foods: Vec<&FoodEntry> = self
            .foods
            .values()
            .filter(|f| f.category == category)
            .collect();
        foods.sort_by(|a, b| a.id.cmp(&b.id));
        foods
    }

    /// Closest foods to a query by id or name, best first (at most five).
    pub fn suggest(&self, query: &str) -> Vec<&FoodEntry> {
        let query = query.to_lowercase();
        let mut candidates: Vec<(&FoodEntry, f64)> = self
            .foods
            .values()
            .map(|f| {
                let score = jaro_winkler(&f.id, &query).max(jaro_winkler(&f.name.to_lowercase(), &query));
                (f, score)
            })
            .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        candidates.into_iter().take(5).map(|(f, _)| f).collect()
    }

    /// Convert to a list of foods for serialization, ordered by id.
    pub fn to_foods(&self) -> Vec<FoodEntry> {
        self.list().into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

impl FoodRepository for FoodTable {
    fn get(&self, id: &str) -> Option<&FoodEntry> {
        self.foods.get(&id.to_lowercase())
    }

    fn list(&self) -> Vec<&FoodEntry> {
        let mut foods: Vec<&FoodEntry> = self.foods.values().collect();
        foods.sort_by(|a, b| a.id.cmp(&b.id));
        foods
    }

    fn upsert(&mut self, food: FoodEntry) -> Result<Option<FoodEntry>> {
        if !food.is_valid() {
            return Err(PlanError::InvalidInput(format!(
                "food '{}' has negative or empty values",
                food.id
            )));
        }
        Ok(self.foods.insert(food.key(), food))
    }

    fn delete(&mut self, id: &str) -> Result<FoodEntry> {
        self.foods
            .remove(&id.to_lowercase())
            .ok_or_else(|| PlanError::FoodNotFound(id.to_string()))
    }
}
