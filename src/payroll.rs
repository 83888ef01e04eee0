//! Payroll preview computation.
//!
//! Everything in here is pure: a [`PayrollDraft`] goes in, a
//! [`PayrollComputed`] comes out. Money is carried as [`rust_decimal::Decimal`]
//! rounded to cents at every step.

use thiserror::Error;

mod bpa;
mod deductions;
mod draft;
mod export;
mod money;
mod netpay;
mod overtime;
mod region;
mod session;

pub use bpa::{prorate_bpa, TaxConstants};
pub use deductions::{percent_to_amount, sum_deductions, DeductionKind};
pub use draft::{DeductionRates, Deductions, Earnings, PayrollDraft};
pub use export::{render_csv, ExportColumn, ExportRow};
pub use money::round_cents;
pub use netpay::{compose_net_pay, PayrollComputed};
pub use overtime::{compute_overtime_gross, overtime_threshold, OvertimeBreakdown};
pub use region::{PayFrequency, Region};
pub use session::{Calculation, DraftSession, Reconciliation};

#[derive(Debug, Error, PartialEq)]
pub enum PayrollError {
    #[error("`{field}` must not be negative")]
    Negative { field: &'static str },

    #[error("`{field}` must not exceed 9999999999.99")]
    TooLarge { field: &'static str },

    #[error("`{field}` must be between 0 and 100")]
    PercentOutOfRange { field: &'static str },

    #[error("unknown region `{0}`")]
    UnknownRegion(String),

    #[error("unknown pay frequency `{0}`")]
    UnknownPayFrequency(String),

    #[error("unknown export column `{0}`")]
    UnknownColumn(String),
}
