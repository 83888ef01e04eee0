use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{
    compute_overtime_gross, deductions::percent_to_amount, money::round_cents, sum_deductions, PayrollDraft,
    PayrollError, TaxConstants,
};

/// Every intermediate figure of a preview, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollComputed {
    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,
    pub regular_pay: Decimal,
    pub overtime_pay: Decimal,
    pub gross_before_vacation: Decimal,

    pub vacation_percent: Decimal,
    pub vacation_pay: Decimal,
    pub include_vacation_in_gross: bool,

    pub extra_earnings: Decimal,
    pub gross_pay: Decimal,

    pub bpa: Decimal,
    pub taxable_wages: Decimal,

    pub retirement_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,

    pub employer_retirement_match: Decimal,
}

pub fn compose_net_pay(draft: &PayrollDraft, constants: &TaxConstants) -> Result<PayrollComputed, PayrollError> {
    draft.validate()?;

    let region = draft.region;
    let jurisdiction = draft.jurisdiction();

    let breakdown = compute_overtime_gross(
        draft.hours_worked.unwrap_or_default(),
        draft.rate.unwrap_or_default(),
        region,
        &jurisdiction,
    );
    let gross_before_vacation = breakdown.gross_pay;

    let vacation_percent = draft.vacation_percent_or_default();
    let vacation_pay = percent_to_amount(gross_before_vacation, vacation_percent);
    let include_vacation_in_gross = draft.includes_vacation_in_gross();

    let extra_earnings = round_cents(draft.earnings.items().into_iter().filter_map(|(_, v)| v).sum());

    let included_vacation = if include_vacation_in_gross { vacation_pay } else { Decimal::ZERO };
    let gross_pay = round_cents(gross_before_vacation + included_vacation + extra_earnings);

    let bpa = constants.bpa(region, draft.frequency());
    let taxable_wages = round_cents((gross_pay - bpa).max(Decimal::ZERO));

    // An explicit amount wins over the retirement / RRSP rate
    let retirement_amount = draft.deductions.retirement_amount.map(round_cents).unwrap_or_else(|| {
        percent_to_amount(gross_before_vacation, draft.rates.retirement_rate(region).unwrap_or_default())
    });

    let total_deductions = sum_deductions(draft.deductions.items().into_iter().map(|(field, v)| match field {
        "retirement_amount" => Some(retirement_amount),
        _ => v,
    }));

    let tax_amount = sum_deductions([
        draft.deductions.federal_tax_amount,
        draft.deductions.provincial_tax_amount,
        draft.deductions.state_tax_amount,
    ]);

    let net_pay = gross_pay - total_deductions;

    trace!(%region, %jurisdiction, %gross_pay, %total_deductions, %net_pay, "composed net pay");

    Ok(PayrollComputed {
        regular_hours: breakdown.regular_hours,
        overtime_hours: breakdown.overtime_hours,
        regular_pay: breakdown.regular_pay,
        overtime_pay: breakdown.overtime_pay,
        gross_before_vacation,
        vacation_percent,
        vacation_pay,
        include_vacation_in_gross,
        extra_earnings,
        gross_pay,
        bpa,
        taxable_wages,
        retirement_amount,
        tax_amount,
        total_deductions,
        net_pay,
        employer_retirement_match: round_cents(draft.retirement_employer.unwrap_or_default()),
    })
}
