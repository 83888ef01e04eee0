use actix_web::{get, post, web, Responder};
use chrono::{Datelike as _, Local};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info};

use crate::{
    auth::Manager,
    entity::{finalized_payroll, prelude::*},
    pages::ApiError,
    payroll::{compose_net_pay, round_cents, Calculation, TaxConstants},
    utils,
};

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(calculate)
        .service(get_ytd);
}

/// Authoritative recomputation of a draft.
///
/// The request's `revision` is echoed back untouched so the caller can drop
/// answers that arrive after newer edits.
#[post("/calculate")]
async fn calculate(manager: Manager, constants: web::Data<TaxConstants>, payload: web::Json<CalculateRequest>) -> Result<impl Responder, ApiError> {
    let CalculateRequest { revision, mut draft } = payload.into_inner();

    draft.resolve_defaults();
    let computed = compose_net_pay(&draft, &constants)?;

    debug!(manager = %manager.id, revision, net_pay = %computed.net_pay, "calculated payroll preview");

    Ok(web::Json(Calculation { revision, draft, computed }))
}

#[get("/ytd")]
async fn get_ytd(db: web::Data<DatabaseConnection>, _manager: Manager, query: web::Query<YtdQuery>) -> Result<impl Responder, ApiError> {
    let year = query.year.unwrap_or_else(|| Local::now().year());
    let Some((start_of_year, end_of_year)) = utils::year_range(year) else {
        return Err(ApiError::BadRequest("invalid year"));
    };

    let payrolls = FinalizedPayroll::find()
        .filter(finalized_payroll::Column::EmployeeId.eq(query.recruiter_id))
        .filter(finalized_payroll::Column::EndDate.between(start_of_year, end_of_year))
        .order_by_asc(finalized_payroll::Column::EndDate)
        .all(db.as_ref()).await?;

    info!(recruiter = %query.recruiter_id, year, payrolls = payrolls.len(), "computed year to date totals");

    let total = |field: fn(&finalized_payroll::Model) -> Decimal| {
        round_cents(payrolls.iter().map(field).sum())
    };

    Ok(web::Json(YtdTotals {
        recruiter_id: query.recruiter_id,
        year,
        payrolls: payrolls.len(),
        hours_worked: total(|p| p.hours_worked),
        gross_pay: total(|p| p.gross_pay),
        vacation_pay: total(|p| p.vacation_pay),
        tax_amount: total(|p| p.tax_amount),
        total_deductions: total(|p| p.total_deductions),
        net_pay: total(|p| p.net_pay),
    }))
}
