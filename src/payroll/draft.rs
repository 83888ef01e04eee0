use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::MAX_AMOUNT;

use super::{
    compose_net_pay, deductions::percent_to_amount, money::optional_amount, region::normalize_jurisdiction,
    DeductionKind, PayFrequency, PayrollError, Region, TaxConstants,
};

/// Manager-entered payroll inputs for one employee and period.
///
/// Every numeric field is optional. A missing value is treated as zero when
/// totals are computed, but a malformed one is rejected while deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollDraft {
    pub recruiter_id: Option<Uuid>,
    pub employee_name: Option<String>,

    pub region: Region,
    pub province: Option<String>,
    pub state: Option<String>,
    pub pay_frequency: Option<PayFrequency>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[serde(deserialize_with = "optional_amount")]
    pub rate: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub hours_worked: Option<Decimal>,

    #[serde(deserialize_with = "optional_amount")]
    pub vacation_percent: Option<Decimal>,
    pub include_vacation_in_gross: Option<bool>,

    #[serde(flatten)]
    pub earnings: Earnings,
    #[serde(flatten)]
    pub deductions: Deductions,
    #[serde(flatten)]
    pub rates: DeductionRates,

    /// Employer-side retirement match, shown on the payslip but never deducted
    #[serde(deserialize_with = "optional_amount")]
    pub retirement_employer: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Earnings {
    #[serde(deserialize_with = "optional_amount")]
    pub bonus: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub tip: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub commission: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub travel_allowance: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub parental_insurance: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub family_bonus: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub tax_credit: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub shift_premium: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub parental_top_up: Option<Decimal>,
}

impl Earnings {
    pub fn items(&self) -> [(&'static str, Option<Decimal>); 9] {
        [
            ("bonus", self.bonus),
            ("tip", self.tip),
            ("commission", self.commission),
            ("travel_allowance", self.travel_allowance),
            ("parental_insurance", self.parental_insurance),
            ("family_bonus", self.family_bonus),
            ("tax_credit", self.tax_credit),
            ("shift_premium", self.shift_premium),
            ("parental_top_up", self.parental_top_up),
        ]
    }
}

/// Dollar amounts withheld from pay. These, not the percentages, drive totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deductions {
    #[serde(deserialize_with = "optional_amount")]
    pub federal_tax_amount: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub provincial_tax_amount: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub state_tax_amount: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub cpp_amount: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub qpp_amount: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub ei_amount: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub rqap_amount: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub fica_amount: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub medicare_amount: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub retirement_amount: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub medical_insurance: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub dental_insurance: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub life_insurance: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub deduction: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub union_dues: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub garnishment: Option<Decimal>,
}

impl Deductions {
    pub fn items(&self) -> [(&'static str, Option<Decimal>); 16] {
        [
            ("federal_tax_amount", self.federal_tax_amount),
            ("provincial_tax_amount", self.provincial_tax_amount),
            ("state_tax_amount", self.state_tax_amount),
            ("cpp_amount", self.cpp_amount),
            ("qpp_amount", self.qpp_amount),
            ("ei_amount", self.ei_amount),
            ("rqap_amount", self.rqap_amount),
            ("fica_amount", self.fica_amount),
            ("medicare_amount", self.medicare_amount),
            ("retirement_amount", self.retirement_amount),
            ("medical_insurance", self.medical_insurance),
            ("dental_insurance", self.dental_insurance),
            ("life_insurance", self.life_insurance),
            ("deduction", self.deduction),
            ("union_dues", self.union_dues),
            ("garnishment", self.garnishment),
        ]
    }

    pub fn amount_mut(&mut self, kind: DeductionKind) -> &mut Option<Decimal> {
        match kind {
            DeductionKind::FederalTax => &mut self.federal_tax_amount,
            DeductionKind::ProvincialTax => &mut self.provincial_tax_amount,
            DeductionKind::StateTax => &mut self.state_tax_amount,
            DeductionKind::Cpp => &mut self.cpp_amount,
            DeductionKind::Qpp => &mut self.qpp_amount,
            DeductionKind::Ei => &mut self.ei_amount,
            DeductionKind::Rqap => &mut self.rqap_amount,
            DeductionKind::Fica => &mut self.fica_amount,
            DeductionKind::Medicare => &mut self.medicare_amount,
        }
    }
}

/// Percentages shown next to deduction amounts. Informational, except that
/// editing one re-derives its amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionRates {
    #[serde(deserialize_with = "optional_amount")]
    pub federal_tax_percent: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub provincial_tax_percent: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub state_tax_percent: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub cpp_percent: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub qpp_percent: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub ei_percent: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub rqap_percent: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub fica_percent: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub medicare_percent: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub retirement_percent: Option<Decimal>,
    #[serde(deserialize_with = "optional_amount")]
    pub rrsp_percent: Option<Decimal>,
}

impl DeductionRates {
    pub fn items(&self) -> [(&'static str, Option<Decimal>); 11] {
        [
            ("federal_tax_percent", self.federal_tax_percent),
            ("provincial_tax_percent", self.provincial_tax_percent),
            ("state_tax_percent", self.state_tax_percent),
            ("cpp_percent", self.cpp_percent),
            ("qpp_percent", self.qpp_percent),
            ("ei_percent", self.ei_percent),
            ("rqap_percent", self.rqap_percent),
            ("fica_percent", self.fica_percent),
            ("medicare_percent", self.medicare_percent),
            ("retirement_percent", self.retirement_percent),
            ("rrsp_percent", self.rrsp_percent),
        ]
    }

    pub fn percent_mut(&mut self, kind: DeductionKind) -> &mut Option<Decimal> {
        match kind {
            DeductionKind::FederalTax => &mut self.federal_tax_percent,
            DeductionKind::ProvincialTax => &mut self.provincial_tax_percent,
            DeductionKind::StateTax => &mut self.state_tax_percent,
            DeductionKind::Cpp => &mut self.cpp_percent,
            DeductionKind::Qpp => &mut self.qpp_percent,
            DeductionKind::Ei => &mut self.ei_percent,
            DeductionKind::Rqap => &mut self.rqap_percent,
            DeductionKind::Fica => &mut self.fica_percent,
            DeductionKind::Medicare => &mut self.medicare_percent,
        }
    }

    /// US payroll uses a 401(k)-style retirement rate, Canada an RRSP rate
    pub fn retirement_rate(&self, region: Region) -> Option<Decimal> {
        match region {
            Region::Us => self.retirement_percent,
            _ => self.rrsp_percent,
        }
    }
}

impl PayrollDraft {
    /// Province for Canada, state for the US, falling back to the region default
    pub fn jurisdiction(&self) -> String {
        normalize_jurisdiction(self.province.as_deref())
            .or_else(|| normalize_jurisdiction(self.state.as_deref()))
            .or_else(|| self.region.default_jurisdiction().map(str::to_string))
            .unwrap_or_default()
    }

    pub fn frequency(&self) -> PayFrequency {
        self.pay_frequency.unwrap_or_default()
    }

    pub fn vacation_percent_or_default(&self) -> Decimal {
        self.vacation_percent
            .unwrap_or_else(|| self.region.default_vacation_percent(&self.jurisdiction()))
    }

    pub fn includes_vacation_in_gross(&self) -> bool {
        self.include_vacation_in_gross
            .unwrap_or_else(|| self.region.vacation_included_by_default())
    }

    /// Writes every implied default into the draft so that it reads the same
    /// without knowing the jurisdiction rules
    pub fn resolve_defaults(&mut self) {
        let jurisdiction = Some(self.jurisdiction()).filter(|j| !j.is_empty());
        match self.region {
            Region::Us => {
                self.state = jurisdiction;
                self.province = None;
            },
            _ => self.province = jurisdiction,
        }

        self.vacation_percent = Some(self.vacation_percent_or_default());
        self.include_vacation_in_gross = Some(self.includes_vacation_in_gross());
        self.pay_frequency = Some(self.frequency());
        self.employee_name = self.employee_name.take()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
    }

    pub fn validate(&self) -> Result<(), PayrollError> {
        let amounts = [("rate", self.rate), ("hours_worked", self.hours_worked), ("retirement_employer", self.retirement_employer)]
            .into_iter()
            .chain(self.earnings.items())
            .chain(self.deductions.items());

        for (field, value) in amounts {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                return Err(PayrollError::Negative { field });
            }

            if value.is_some_and(|v| v > MAX_AMOUNT) {
                return Err(PayrollError::TooLarge { field });
            }
        }

        let percents = [("vacation_percent", self.vacation_percent)]
            .into_iter()
            .chain(self.rates.items());

        for (field, value) in percents {
            if value.is_some_and(|v| v < Decimal::ZERO || v > Decimal::ONE_HUNDRED) {
                return Err(PayrollError::PercentOutOfRange { field });
            }
        }

        Ok(())
    }

    /// Records a percentage edit and derives the matching dollar amount.
    ///
    /// Income taxes are taken from taxable wages (gross minus the per-period
    /// BPA, floored at zero), everything else from gross. Nothing is written
    /// unless the whole edit succeeds.
    pub fn apply_percent(
        &mut self,
        kind: DeductionKind,
        percent: Decimal,
        constants: &TaxConstants,
    ) -> Result<Decimal, PayrollError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(PayrollError::PercentOutOfRange { field: kind.percent_field() });
        }

        let computed = compose_net_pay(self, constants)?;
        let base = if kind.is_income_tax() {
            computed.taxable_wages
        } else {
            computed.gross_pay
        };

        let amount = percent_to_amount(base, percent);
        *self.rates.percent_mut(kind) = Some(percent);
        *self.deductions.amount_mut(kind) = Some(amount);

        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn ontario_draft() -> PayrollDraft {
        PayrollDraft {
            region: Region::Ca,
            province: Some("ON".to_string()),
            rate: Some(dec!(25)),
            hours_worked: Some(dec!(40)),
            vacation_percent: Some(dec!(4)),
            include_vacation_in_gross: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_deserialize_form_payload() {
        let draft: PayrollDraft = serde_json::from_str(r#"{
            "recruiter_id": "00000000-0000-0000-0000-000000000007",
            "employee_name": "Jane Doe",
            "region": "ca",
            "province": "on",
            "pay_frequency": "biweekly",
            "start_date": "2025-03-01",
            "end_date": "2025-03-14",
            "rate": "21.50",
            "hours_worked": 80,
            "vacation_percent": "",
            "bonus": 100,
            "cpp_amount": "95.12",
            "rrsp_percent": 2
        }"#).unwrap();

        assert_eq!(draft.employee_name.as_deref(), Some("Jane Doe"));
        assert_eq!(draft.jurisdiction(), "ON");
        assert_eq!(draft.frequency(), PayFrequency::Biweekly);
        assert_eq!(draft.start_date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(draft.rate, Some(dec!(21.50)));
        assert_eq!(draft.hours_worked, Some(dec!(80)));
        assert_eq!(draft.vacation_percent, None);
        assert_eq!(draft.earnings.bonus, Some(dec!(100)));
        assert_eq!(draft.deductions.cpp_amount, Some(dec!(95.12)));
        assert_eq!(draft.rates.rrsp_percent, Some(dec!(2)));
    }

    #[test]
    fn test_deserialize_rejects_malformed_numbers() {
        let res = serde_json::from_str::<PayrollDraft>(r#"{ "rate": "twenty" }"#);
        assert!(res.is_err());

        let res = serde_json::from_str::<PayrollDraft>(r#"{ "cpp_amount": "1,000" }"#);
        assert!(res.is_err());

        let err = serde_json::from_str::<PayrollDraft>(r#"{ "pay_frequency": "daily" }"#).unwrap_err();
        assert!(err.to_string().contains("unknown pay frequency `daily`"));

        let draft = serde_json::from_str::<PayrollDraft>(r#"{ "region": "QC", "pay_frequency": "Monthly" }"#).unwrap();
        assert_eq!(draft.region, Region::Qc);
        assert_eq!(draft.frequency(), PayFrequency::Monthly);
    }

    #[test]
    fn test_defaults() {
        let draft = PayrollDraft::default();
        assert_eq!(draft.jurisdiction(), "ON");
        assert_eq!(draft.frequency(), PayFrequency::Weekly);
        assert_eq!(draft.vacation_percent_or_default(), dec!(4));
        assert!(draft.includes_vacation_in_gross());

        let draft = PayrollDraft {
            region: Region::Us,
            state: Some("ny".to_string()),
            ..Default::default()
        };
        assert_eq!(draft.jurisdiction(), "NY");
        assert_eq!(draft.vacation_percent_or_default(), Decimal::ZERO);
        assert!(!draft.includes_vacation_in_gross());
    }

    #[test]
    fn test_resolve_defaults() {
        let mut draft = PayrollDraft {
            region: Region::Ca,
            province: Some("sk".to_string()),
            employee_name: Some("  ".to_string()),
            ..Default::default()
        };
        draft.resolve_defaults();

        assert_eq!(draft.province.as_deref(), Some("SK"));
        assert_eq!(draft.vacation_percent, Some(dec!(5.77)));
        assert_eq!(draft.include_vacation_in_gross, Some(true));
        assert_eq!(draft.pay_frequency, Some(PayFrequency::Weekly));
        assert_eq!(draft.employee_name, None);

        let mut draft = PayrollDraft {
            region: Region::Us,
            province: Some("tx".to_string()),
            include_vacation_in_gross: Some(true),
            pay_frequency: Some(PayFrequency::Monthly),
            ..Default::default()
        };
        draft.resolve_defaults();

        assert_eq!(draft.province, None);
        assert_eq!(draft.state.as_deref(), Some("TX"));
        assert_eq!(draft.vacation_percent, Some(Decimal::ZERO));
        assert_eq!(draft.include_vacation_in_gross, Some(true));
        assert_eq!(draft.pay_frequency, Some(PayFrequency::Monthly));
    }

    #[test]
    fn test_validate() {
        assert_eq!(ontario_draft().validate(), Ok(()));

        let mut draft = ontario_draft();
        draft.hours_worked = Some(dec!(-1));
        assert_eq!(draft.validate(), Err(PayrollError::Negative { field: "hours_worked" }));

        let mut draft = ontario_draft();
        draft.deductions.garnishment = Some(dec!(-0.01));
        assert_eq!(draft.validate(), Err(PayrollError::Negative { field: "garnishment" }));

        let mut draft = ontario_draft();
        draft.rate = Some(dec!(10000000000));
        assert_eq!(draft.validate(), Err(PayrollError::TooLarge { field: "rate" }));

        let mut draft = ontario_draft();
        draft.deductions.union_dues = Some(dec!(9999999999.99));
        assert_eq!(draft.validate(), Ok(()));

        let mut draft = ontario_draft();
        draft.rates.ei_percent = Some(dec!(100.5));
        assert_eq!(draft.validate(), Err(PayrollError::PercentOutOfRange { field: "ei_percent" }));
    }

    #[test]
    fn test_apply_percent_uses_taxable_wages_for_income_tax() {
        let constants = TaxConstants::default();
        let mut draft = ontario_draft();

        // gross = 1000 + 40 vacation, weekly BPA = 288.46
        let amount = draft.apply_percent(DeductionKind::FederalTax, dec!(15), &constants).unwrap();

        assert_eq!(amount, dec!(112.73));
        assert_eq!(draft.rates.federal_tax_percent, Some(dec!(15)));
        assert_eq!(draft.deductions.federal_tax_amount, Some(dec!(112.73)));
    }

    #[test]
    fn test_apply_percent_uses_gross_for_other_deductions() {
        let constants = TaxConstants::default();
        let mut draft = ontario_draft();

        let amount = draft.apply_percent(DeductionKind::Cpp, dec!(5.95), &constants).unwrap();

        assert_eq!(amount, dec!(61.88));
        assert_eq!(draft.deductions.cpp_amount, Some(dec!(61.88)));
    }

    #[test]
    fn test_apply_percent_leaves_draft_on_error() {
        let constants = TaxConstants::default();
        let mut draft = ontario_draft();
        let before = draft.clone();

        let res = draft.apply_percent(DeductionKind::Ei, dec!(101), &constants);

        assert_eq!(res, Err(PayrollError::PercentOutOfRange { field: "ei_percent" }));
        assert_eq!(draft, before);
    }

    #[test]
    fn test_taxable_wages_floor_at_zero() {
        let constants = TaxConstants::default();
        let mut draft = ontario_draft();
        draft.hours_worked = Some(dec!(5));

        let amount = draft.apply_percent(DeductionKind::ProvincialTax, dec!(5.05), &constants).unwrap();
        assert_eq!(amount, Decimal::ZERO);
    }
}
