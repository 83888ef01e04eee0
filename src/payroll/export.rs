use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PayrollComputed, PayrollDraft, PayrollError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportColumn {
    EmployeeName,
    StartDate,
    EndDate,
    Region,
    Province,
    PayFrequency,
    HoursWorked,
    RegularHours,
    OvertimeHours,
    Rate,
    RegularPay,
    OvertimePay,
    VacationPercent,
    VacationPay,
    IncludeVacationInGross,
    Bonus,
    Commission,
    Tip,
    GrossPay,
    FederalTaxAmount,
    ProvincialTaxAmount,
    StateTaxAmount,
    CppAmount,
    QppAmount,
    EiAmount,
    RqapAmount,
    FicaAmount,
    MedicareAmount,
    TaxAmount,
    RetirementAmount,
    RetirementEmployer,
    Deduction,
    TotalDeductions,
    NetPay,
}

impl ExportColumn {
    pub const ALL: [ExportColumn; 34] = [
        ExportColumn::EmployeeName,
        ExportColumn::StartDate,
        ExportColumn::EndDate,
        ExportColumn::Region,
        ExportColumn::Province,
        ExportColumn::PayFrequency,
        ExportColumn::HoursWorked,
        ExportColumn::RegularHours,
        ExportColumn::OvertimeHours,
        ExportColumn::Rate,
        ExportColumn::RegularPay,
        ExportColumn::OvertimePay,
        ExportColumn::VacationPercent,
        ExportColumn::VacationPay,
        ExportColumn::IncludeVacationInGross,
        ExportColumn::Bonus,
        ExportColumn::Commission,
        ExportColumn::Tip,
        ExportColumn::GrossPay,
        ExportColumn::FederalTaxAmount,
        ExportColumn::ProvincialTaxAmount,
        ExportColumn::StateTaxAmount,
        ExportColumn::CppAmount,
        ExportColumn::QppAmount,
        ExportColumn::EiAmount,
        ExportColumn::RqapAmount,
        ExportColumn::FicaAmount,
        ExportColumn::MedicareAmount,
        ExportColumn::TaxAmount,
        ExportColumn::RetirementAmount,
        ExportColumn::RetirementEmployer,
        ExportColumn::Deduction,
        ExportColumn::TotalDeductions,
        ExportColumn::NetPay,
    ];

    /// Columns every export carries, whatever the user picked
    pub const REQUIRED: [ExportColumn; 3] = [
        ExportColumn::EmployeeName,
        ExportColumn::IncludeVacationInGross,
        ExportColumn::RetirementAmount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportColumn::EmployeeName => "employee_name",
            ExportColumn::StartDate => "start_date",
            ExportColumn::EndDate => "end_date",
            ExportColumn::Region => "region",
            ExportColumn::Province => "province",
            ExportColumn::PayFrequency => "pay_frequency",
            ExportColumn::HoursWorked => "hours_worked",
            ExportColumn::RegularHours => "regular_hours",
            ExportColumn::OvertimeHours => "overtime_hours",
            ExportColumn::Rate => "rate",
            ExportColumn::RegularPay => "regular_pay",
            ExportColumn::OvertimePay => "overtime_pay",
            ExportColumn::VacationPercent => "vacation_percent",
            ExportColumn::VacationPay => "vacation_pay",
            ExportColumn::IncludeVacationInGross => "include_vacation_in_gross",
            ExportColumn::Bonus => "bonus",
            ExportColumn::Commission => "commission",
            ExportColumn::Tip => "tip",
            ExportColumn::GrossPay => "gross_pay",
            ExportColumn::FederalTaxAmount => "federal_tax_amount",
            ExportColumn::ProvincialTaxAmount => "provincial_tax_amount",
            ExportColumn::StateTaxAmount => "state_tax_amount",
            ExportColumn::CppAmount => "cpp_amount",
            ExportColumn::QppAmount => "qpp_amount",
            ExportColumn::EiAmount => "ei_amount",
            ExportColumn::RqapAmount => "rqap_amount",
            ExportColumn::FicaAmount => "fica_amount",
            ExportColumn::MedicareAmount => "medicare_amount",
            ExportColumn::TaxAmount => "tax_amount",
            ExportColumn::RetirementAmount => "retirement_amount",
            ExportColumn::RetirementEmployer => "retirement_employer",
            ExportColumn::Deduction => "deduction",
            ExportColumn::TotalDeductions => "total_deductions",
            ExportColumn::NetPay => "net_pay",
        }
    }

    /// Parses a comma separated selection and adds the required columns.
    ///
    /// An empty or missing selection exports everything. Order is kept,
    /// duplicates are dropped, required columns not picked go last.
    pub fn selection(columns: Option<&str>) -> Result<Vec<ExportColumn>, PayrollError> {
        let picked = columns
            .map(|c| c.split(',').map(str::trim).filter(|c| !c.is_empty()).collect::<Vec<_>>())
            .unwrap_or_default();

        if picked.is_empty() {
            return Ok(Self::ALL.to_vec());
        }

        let mut selection = Vec::with_capacity(picked.len() + Self::REQUIRED.len());
        for name in picked {
            let column = name.parse::<ExportColumn>()?;
            if !selection.contains(&column) {
                selection.push(column);
            }
        }

        for column in Self::REQUIRED {
            if !selection.contains(&column) {
                selection.push(column);
            }
        }

        Ok(selection)
    }
}

impl FromStr for ExportColumn {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PayrollError::UnknownColumn(s.to_string()))
    }
}

/// One finalized payroll, as it appears in a spreadsheet export
#[derive(Debug, Clone)]
pub struct ExportRow {
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub draft: PayrollDraft,
    pub computed: PayrollComputed,
}

impl ExportRow {
    pub fn value(&self, column: ExportColumn) -> String {
        let draft = &self.draft;
        let computed = &self.computed;

        let amount = |v: Option<Decimal>| v.map(|v| v.to_string()).unwrap_or_default();

        match column {
            ExportColumn::EmployeeName => self.employee_name.clone(),
            ExportColumn::StartDate => self.start_date.to_string(),
            ExportColumn::EndDate => self.end_date.to_string(),
            ExportColumn::Region => draft.region.to_string(),
            ExportColumn::Province => draft.jurisdiction(),
            ExportColumn::PayFrequency => draft.frequency().to_string(),
            ExportColumn::HoursWorked => amount(draft.hours_worked),
            ExportColumn::RegularHours => computed.regular_hours.to_string(),
            ExportColumn::OvertimeHours => computed.overtime_hours.to_string(),
            ExportColumn::Rate => amount(draft.rate),
            ExportColumn::RegularPay => computed.regular_pay.to_string(),
            ExportColumn::OvertimePay => computed.overtime_pay.to_string(),
            ExportColumn::VacationPercent => computed.vacation_percent.to_string(),
            ExportColumn::VacationPay => computed.vacation_pay.to_string(),
            ExportColumn::IncludeVacationInGross => computed.include_vacation_in_gross.to_string(),
            ExportColumn::Bonus => amount(draft.earnings.bonus),
            ExportColumn::Commission => amount(draft.earnings.commission),
            ExportColumn::Tip => amount(draft.earnings.tip),
            ExportColumn::GrossPay => computed.gross_pay.to_string(),
            ExportColumn::FederalTaxAmount => amount(draft.deductions.federal_tax_amount),
            ExportColumn::ProvincialTaxAmount => amount(draft.deductions.provincial_tax_amount),
            ExportColumn::StateTaxAmount => amount(draft.deductions.state_tax_amount),
            ExportColumn::CppAmount => amount(draft.deductions.cpp_amount),
            ExportColumn::QppAmount => amount(draft.deductions.qpp_amount),
            ExportColumn::EiAmount => amount(draft.deductions.ei_amount),
            ExportColumn::RqapAmount => amount(draft.deductions.rqap_amount),
            ExportColumn::FicaAmount => amount(draft.deductions.fica_amount),
            ExportColumn::MedicareAmount => amount(draft.deductions.medicare_amount),
            ExportColumn::TaxAmount => computed.tax_amount.to_string(),
            ExportColumn::RetirementAmount => computed.retirement_amount.to_string(),
            ExportColumn::RetirementEmployer => computed.employer_retirement_match.to_string(),
            ExportColumn::Deduction => amount(draft.deductions.deduction),
            ExportColumn::TotalDeductions => computed.total_deductions.to_string(),
            ExportColumn::NetPay => computed.net_pay.to_string(),
        }
    }
}

pub fn render_csv(columns: &[ExportColumn], rows: &[ExportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);

    lines.push(
        columns
            .iter()
            .map(|c| csv_escape(c.as_str()))
            .collect::<Vec<_>>()
            .join(","),
    );

    for row in rows {
        lines.push(
            columns
                .iter()
                .map(|c| csv_escape(&row.value(*c)))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    let mut csv = lines.join("\r\n");
    csv.push_str("\r\n");
    csv
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
