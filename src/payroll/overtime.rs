use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CANADA_OVERTIME_THRESHOLD, OVERTIME_MULTIPLIER, STANDARD_OVERTIME_THRESHOLD, STANDARD_THRESHOLD_PROVINCES,
};

use super::{money::round_cents, Region};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeBreakdown {
    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,
    pub regular_pay: Decimal,
    pub overtime_pay: Decimal,
    pub gross_pay: Decimal,
}

pub fn overtime_threshold(region: Region, province: &str) -> Decimal {
    match region {
        Region::Ca if !STANDARD_THRESHOLD_PROVINCES.contains(&province) => CANADA_OVERTIME_THRESHOLD,
        _ => STANDARD_OVERTIME_THRESHOLD,
    }
}

/// Splits worked hours into regular and overtime and prices both.
///
/// Inputs are expected to be non-negative; validation is the caller's job.
/// `gross_pay` is the sum of the already rounded regular and overtime pay, so
/// the breakdown always adds up to the cent.
pub fn compute_overtime_gross(
    hours_worked: Decimal,
    hourly_rate: Decimal,
    region: Region,
    province: &str,
) -> OvertimeBreakdown {
    let hours_worked = round_cents(hours_worked);
    let threshold = overtime_threshold(region, province);

    let regular_hours = hours_worked.min(threshold);
    let overtime_hours = (hours_worked - threshold).max(Decimal::ZERO);

    let regular_pay = round_cents(regular_hours * hourly_rate);
    let overtime_pay = round_cents(overtime_hours * hourly_rate * OVERTIME_MULTIPLIER);

    OvertimeBreakdown {
        regular_hours: round_cents(regular_hours),
        overtime_hours: round_cents(overtime_hours),
        regular_pay,
        overtime_pay,
        gross_pay: round_cents(regular_pay + overtime_pay),
    }
}
