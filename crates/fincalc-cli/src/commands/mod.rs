pub mod depreciation;
pub mod discount;
pub mod salary;
pub mod student_loan;
pub mod tax;

use fincalc_core::tax::brackets::FilingStatus;

/// Shared filing-status parser for inline flags.
pub fn parse_filing_status(s: &str) -> Result<FilingStatus, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "single" => Ok(FilingStatus::Single),
        "married" | "married-joint" => Ok(FilingStatus::MarriedJoint),
        "head" | "head-of-household" => Ok(FilingStatus::HeadOfHousehold),
        other => Err(format!(
            "Unknown filing status '{}'. Use: single, married, head",
            other
        )
        .into()),
    }
}
