use chrono::NaiveDate;

/// First and last day of a calendar year
pub fn year_range(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let start_of_year = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end_of_year = NaiveDate::from_ymd_opt(year, 12, 31)?;

    Some((start_of_year, end_of_year))
}

pub fn export_filename(employee: &str, start: NaiveDate, end: NaiveDate, extension: &str) -> String {
    let employee = employee
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect::<String>();

    format!("payroll_{employee}_{start}_{end}.{extension}")
}
