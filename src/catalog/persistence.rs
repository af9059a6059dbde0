use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::{PlanError, Result};
use crate::models::{Basis, FoodCategory, FoodEntry};

/// Load and validate a catalog from a JSON file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let content = fs::read_to_string(path)?;
    Catalog::from_json(&content)
}

/// Save a catalog to a JSON file.
///
/// Writes a sibling temp file and renames it over the target, so readers see
/// either the old or the new table.
pub fn save_catalog<P: AsRef<Path>>(path: P, catalog: &Catalog) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(&catalog.to_data())?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, json)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// One row of a food import CSV.
///
/// `unit` empty means per-100g values. `measures` is `name=grams` pairs
/// separated by `;`.
#[derive(Debug, Deserialize)]
struct FoodCsvRow {
    id: String,
    name: String,
    #[serde(default)]
    unit: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    #[serde(default)]
    fiber: f64,
    category: String,
    #[serde(default)]
    measures: String,
}

fn parse_measures(id: &str, raw: &str) -> Result<BTreeMap<String, f64>> {
    let mut measures = BTreeMap::new();
    for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, grams) = pair.split_once('=').ok_or_else(|| {
            PlanError::InvalidInput(format!("food '{}': bad measure '{}'", id, pair))
        })?;
        let grams: f64 = grams.trim().parse().map_err(|_| {
            PlanError::InvalidInput(format!("food '{}': bad grams in '{}'", id, pair))
        })?;
        measures.insert(name.trim().to_string(), grams);
    }
    Ok(measures)
}

impl FoodCsvRow {
    fn into_entry(self) -> Result<FoodEntry> {
        let category = FoodCategory::parse(&self.category).ok_or_else(|| {
            PlanError::InvalidInput(format!(
                "food '{}': unknown category '{}'",
                self.id, self.category
            ))
        })?;
        let basis = if self.unit.trim().is_empty() {
            Basis::Per100g
        } else {
            Basis::PerUnit {
                unit: self.unit.trim().to_string(),
            }
        };
        let household_measures = parse_measures(&self.id, &self.measures)?;
        Ok(FoodEntry {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            basis,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
            category,
            household_measures,
        })
    }
}

/// Read food entries from a CSV file with a header row.
pub fn import_foods_csv<P: AsRef<Path>>(path: P) -> Result<Vec<FoodEntry>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut foods = Vec::new();
    for row in reader.deserialize::<FoodCsvRow>() {
        foods.push(row?.into_entry()?);
    }
    Ok(foods)
}
