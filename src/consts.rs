use rust_decimal::Decimal;

/// Weekly hours after which overtime applies, outside of the Canadian default
pub const STANDARD_OVERTIME_THRESHOLD: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// Weekly hours after which overtime applies in Canada, except Quebec and Manitoba
pub const CANADA_OVERTIME_THRESHOLD: Decimal = Decimal::from_parts(44, 0, 0, false, 0);

/// Provinces that keep the 40 hours threshold even in the `ca` region
pub const STANDARD_THRESHOLD_PROVINCES: [&str; 2] = ["QC", "MB"];

/// Time and a half
pub const OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

pub const DEFAULT_TAX_YEAR: i32 = 2025;

/// Annual Basic Personal Amount used for the 2025 tax year
pub const DEFAULT_BPA_ANNUAL: Decimal = Decimal::from_parts(15000, 0, 0, false, 0);

pub const DEFAULT_CANADA_PROVINCE: &str = "ON";
pub const DEFAULT_QUEBEC_PROVINCE: &str = "QC";

pub const DEFAULT_VACATION_PERCENT: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

/// Saskatchewan grants three weeks of vacation pay (3 / 52)
pub const SASKATCHEWAN_VACATION_PERCENT: Decimal = Decimal::from_parts(577, 0, 0, false, 2);

/// Largest rate, hour count or amount a draft may carry, the capacity of a `numeric(12, 2)` column
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);
