//! CSV writers for the two finished tables

use crate::crawler::Harvest;
use crate::HarvestError;
use std::path::Path;

/// File name of the exported code registry
pub const CODES_FILE: &str = "atc_codes.csv";

/// File name of the exported dose registry
pub const DOSES_FILE: &str = "atc_ddd.csv";

/// Writes both tables into the output directory
///
/// The tables are consumed read-only; absent dose fields serialize as empty
/// cells.
///
/// # Arguments
///
/// * `harvest` - The finished tables
/// * `out_dir` - Directory the CSV files are written into (created if needed)
pub fn write_tables(harvest: &Harvest, out_dir: &Path) -> Result<(), HarvestError> {
    std::fs::create_dir_all(out_dir)?;
    write_code_table(harvest, &out_dir.join(CODES_FILE))?;
    write_dose_table(harvest, &out_dir.join(DOSES_FILE))?;
    Ok(())
}

fn write_code_table(harvest: &Harvest, path: &Path) -> Result<(), HarvestError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["atc_code", "atc_name"])?;

    for record in &harvest.codes {
        writer.write_record([record.code.as_str(), record.name.as_deref().unwrap_or("")])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_dose_table(harvest: &Harvest, path: &Path) -> Result<(), HarvestError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "source_code",
        "atc_code",
        "atc_name",
        "ddd",
        "unit",
        "adm_route",
        "note",
    ])?;

    for record in &harvest.doses {
        writer.write_record([
            record.source_code.as_str(),
            record.code.as_str(),
            record.name.as_deref().unwrap_or(""),
            record.dose_value.as_deref().unwrap_or(""),
            record.unit.as_deref().unwrap_or(""),
            record.route.as_deref().unwrap_or(""),
            record.note.as_deref().unwrap_or(""),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
