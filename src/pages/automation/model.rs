use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::payroll::PayrollDraft;

use super::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum ExportFormat {
    #[default]
    Csv,
    Pdf,
    Xlsx,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct FinalizeRequest {
    #[serde(flatten)]
    pub(super) draft: PayrollDraft,
    #[serde(default)]
    pub(super) format: Option<ExportFormat>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct ExportQuery {
    pub(super) recruiter_id: Option<Uuid>,
    pub(super) start_date: NaiveDate,
    pub(super) end_date: NaiveDate,
    pub(super) format: Option<ExportFormat>,
    pub(super) columns: Option<String>,
}

impl TryFrom<finalized_payroll::Model> for ExportRow {
    type Error = serde_json::Error;

    fn try_from(payroll: finalized_payroll::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_name: payroll.employee_name,
            start_date: payroll.start_date,
            end_date: payroll.end_date,
            draft: serde_json::from_value(payroll.draft)?,
            computed: serde_json::from_value(payroll.computed)?,
        })
    }
}
