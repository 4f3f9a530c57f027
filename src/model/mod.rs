//! Record types for the two output tables

/// A single entry in the code registry
///
/// Codes are hierarchical by construction: a child code always carries its
/// parent code as a string prefix (`D01` → `D01AA` → `D01AA01`). The name is
/// absent while a record is in flight (e.g. a leaf page that yielded no
/// parseable rows); the accumulator coalesces absent names to the empty
/// string when the final table is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRecord {
    pub code: String,
    pub name: Option<String>,
}

/// A dosage row as parsed from a leaf-page table, before provenance is known
///
/// Optional fields are free text; absence means "not assigned by the source",
/// which is expected and not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoseRow {
    pub code: String,
    pub name: Option<String>,
    pub dose_value: Option<String>,
    pub unit: Option<String>,
    pub route: Option<String>,
    pub note: Option<String>,
}

impl DoseRow {
    /// Tags this row with the code of the page it was extracted from
    pub fn into_record(self, source_code: &str) -> DoseRecord {
        DoseRecord {
            source_code: source_code.to_string(),
            code: self.code,
            name: self.name,
            dose_value: self.dose_value,
            unit: self.unit,
            route: self.route,
            note: self.note,
        }
    }
}

/// A single entry in the dose registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseRecord {
    /// The code of the page whose table produced this row
    pub source_code: String,
    pub code: String,
    pub name: Option<String>,
    pub dose_value: Option<String>,
    pub unit: Option<String>,
    pub route: Option<String>,
    pub note: Option<String>,
}

/// Maps a code's length to its hierarchy level
///
/// Lengths 1, 3, 4, 5 and 7 map to levels 1 through 5. Any other length is an
/// anomaly and carries no level.
pub fn code_level(code: &str) -> Option<u8> {
    match code.len() {
        1 => Some(1),
        3 => Some(2),
        4 => Some(3),
        5 => Some(4),
        7 => Some(5),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_level_mapping() {
        assert_eq!(code_level("D"), Some(1));
        assert_eq!(code_level("D01"), Some(2));
        assert_eq!(code_level("D01A"), Some(3));
        assert_eq!(code_level("D01AA"), Some(4));
        assert_eq!(code_level("D01AA01"), Some(5));
    }

    #[test]
    fn test_code_level_anomalies() {
        assert_eq!(code_level(""), None);
        assert_eq!(code_level("D0"), None);
        assert_eq!(code_level("D01AA0"), None);
        assert_eq!(code_level("D01AA01X"), None);
    }

    #[test]
    fn test_dose_row_into_record() {
        let row = DoseRow {
            code: "D01AA01".to_string(),
            name: Some("nystatin".to_string()),
            dose_value: Some("1".to_string()),
            unit: Some("g".to_string()),
            route: Some("O".to_string()),
            note: None,
        };

        let record = row.into_record("D01AA");
        assert_eq!(record.source_code, "D01AA");
        assert_eq!(record.code, "D01AA01");
        assert_eq!(record.name.as_deref(), Some("nystatin"));
        assert_eq!(record.note, None);
    }
}
