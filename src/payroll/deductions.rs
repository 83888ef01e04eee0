use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::round_cents;

/// Deductions that can be entered as a percentage of pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    FederalTax,
    ProvincialTax,
    StateTax,
    Cpp,
    Qpp,
    Ei,
    Rqap,
    Fica,
    Medicare,
}

impl DeductionKind {
    /// Income taxes are levied on taxable wages (gross less the BPA); every
    /// other deduction uses raw gross
    pub fn is_income_tax(&self) -> bool {
        matches!(self, DeductionKind::FederalTax | DeductionKind::ProvincialTax | DeductionKind::StateTax)
    }

    pub fn percent_field(&self) -> &'static str {
        match self {
            DeductionKind::FederalTax => "federal_tax_percent",
            DeductionKind::ProvincialTax => "provincial_tax_percent",
            DeductionKind::StateTax => "state_tax_percent",
            DeductionKind::Cpp => "cpp_percent",
            DeductionKind::Qpp => "qpp_percent",
            DeductionKind::Ei => "ei_percent",
            DeductionKind::Rqap => "rqap_percent",
            DeductionKind::Fica => "fica_percent",
            DeductionKind::Medicare => "medicare_percent",
        }
    }
}

/// Adds up deduction amounts, a missing item counts as zero
pub fn sum_deductions<I>(items: I) -> Decimal
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    round_cents(items.into_iter().flatten().sum())
}

pub fn percent_to_amount(base: Decimal, percent: Decimal) -> Decimal {
    round_cents(base * percent / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_sum_deductions() {
        assert_eq!(sum_deductions(Vec::<Option<Decimal>>::new()), Decimal::ZERO);
        assert_eq!(sum_deductions([None, None]), Decimal::ZERO);
        assert_eq!(sum_deductions([Some(dec!(120.15)), None, Some(dec!(33.30)), Some(dec!(0.05))]), dec!(153.50));
    }

    #[test]
    fn test_percent_to_amount() {
        assert_eq!(percent_to_amount(dec!(1060), dec!(5.95)), dec!(63.07));
        assert_eq!(percent_to_amount(dec!(1000), dec!(4)), dec!(40.00));
        assert_eq!(percent_to_amount(dec!(1234.56), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_to_amount(Decimal::ZERO, dec!(15)), Decimal::ZERO);
    }

    #[test]
    fn test_income_tax_kinds() {
        assert!(DeductionKind::FederalTax.is_income_tax());
        assert!(DeductionKind::StateTax.is_income_tax());
        assert!(!DeductionKind::Cpp.is_income_tax());
        assert!(!DeductionKind::Medicare.is_income_tax());
    }
}
