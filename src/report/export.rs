use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::PlanRecord;

/// Write every plan line item to a CSV file, one row per item.
pub fn write_items_csv(record: &PlanRecord, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "slot",
        "time",
        "food_id",
        "name",
        "quantity",
        "unit",
        "calories",
        "protein",
        "carbs",
        "fat",
        "fiber",
    ])?;

    for slot in &record.slots {
        for item in &slot.items {
            wtr.write_record([
                slot.kind.label().to_string(),
                slot.time.clone(),
                item.food_id.clone(),
                item.name.clone(),
                format!("{}", item.quantity),
                item.unit.clone(),
                format!("{:.2}", item.calories),
                format!("{:.2}", item.protein),
                format!("{:.2}", item.carbs),
                format!("{:.2}", item.fat),
                format!("{:.2}", item.fiber),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write the full plan record as pretty JSON.
pub fn write_record_json(record: &PlanRecord, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(record)?.as_bytes())?;
    Ok(())
}
