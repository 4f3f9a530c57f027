//! Accumulation and final assembly of the output tables

use crate::model::{CodeRecord, DoseRecord};
use std::collections::HashSet;

/// Collects per-node extraction results over the course of a run
#[derive(Debug, Default)]
pub struct Accumulator {
    codes: Vec<CodeRecord>,
    doses: Vec<DoseRecord>,
}

impl Accumulator {
    pub fn add_code(&mut self, record: CodeRecord) {
        self.codes.push(record);
    }

    pub fn add_dose(&mut self, record: DoseRecord) {
        self.doses.push(record);
    }

    /// Assembles the two finished tables
    ///
    /// Deduplicates the code table by code with the first occurrence winning
    /// (breadth-first order makes that the shallowest sighting), uppercases
    /// codes in both tables, and coalesces absent names to the empty string
    /// in the code table only. Absent dose fields stay absent; there they
    /// mean "not assigned by the source" rather than missing data.
    pub fn finish(self) -> Harvest {
        let mut seen = HashSet::new();
        let mut codes = Vec::new();
        for record in self.codes {
            let code = record.code.to_uppercase();
            if seen.insert(code.clone()) {
                codes.push(CodeRecord {
                    code,
                    name: Some(record.name.unwrap_or_default()),
                });
            }
        }

        let doses = self
            .doses
            .into_iter()
            .map(|mut record| {
                record.source_code = record.source_code.to_uppercase();
                record.code = record.code.to_uppercase();
                record
            })
            .collect();

        Harvest { codes, doses }
    }
}

/// The two finished output tables of a run
#[derive(Debug, Default)]
pub struct Harvest {
    /// Code registry: unique codes with their names
    pub codes: Vec<CodeRecord>,

    /// Dose registry: one entry per extracted dosage row
    pub doses: Vec<DoseRecord>,
}
