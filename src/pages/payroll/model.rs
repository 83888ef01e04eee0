use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payroll::PayrollDraft;

use super::*;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CalculateRequest {
    #[serde(default)]
    pub(super) revision: u64,
    #[serde(flatten)]
    pub(super) draft: PayrollDraft,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct YtdQuery {
    pub(super) recruiter_id: Uuid,
    pub(super) year: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct YtdTotals {
    pub(super) recruiter_id: Uuid,
    pub(super) year: i32,
    pub(super) payrolls: usize,
    pub(super) hours_worked: Decimal,
    pub(super) gross_pay: Decimal,
    pub(super) vacation_pay: Decimal,
    pub(super) tax_amount: Decimal,
    pub(super) total_deductions: Decimal,
    pub(super) net_pay: Decimal,
}
