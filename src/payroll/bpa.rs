use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::consts::{DEFAULT_BPA_ANNUAL, DEFAULT_TAX_YEAR};

use super::{money::round_cents, PayFrequency, Region};

/// Jurisdiction constants that change from one tax year to the next.
///
/// Only the Basic Personal Amount lives here for now. Regions without an
/// entry for the active year get no exemption.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxConstants {
    tax_year: i32,
    bpa_annual: HashMap<(i32, Region), Decimal>,
}

impl TaxConstants {
    pub fn new(tax_year: i32) -> Self {
        Self {
            tax_year,
            bpa_annual: HashMap::new(),
        }
    }

    pub fn with_bpa(mut self, tax_year: i32, region: Region, annual: Decimal) -> Self {
        self.bpa_annual.insert((tax_year, region), annual);
        self
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub fn bpa_annual(&self, region: Region) -> Option<Decimal> {
        self.bpa_annual.get(&(self.tax_year, region)).copied()
    }

    /// Per-period BPA for `region` at the active tax year
    pub fn bpa(&self, region: Region, frequency: PayFrequency) -> Decimal {
        self.bpa_annual(region)
            .map(|annual| prorate_bpa(annual, frequency))
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for TaxConstants {
    fn default() -> Self {
        Self::new(DEFAULT_TAX_YEAR)
            .with_bpa(DEFAULT_TAX_YEAR, Region::Ca, DEFAULT_BPA_ANNUAL)
            .with_bpa(DEFAULT_TAX_YEAR, Region::Qc, DEFAULT_BPA_ANNUAL)
    }
}

pub fn prorate_bpa(annual: Decimal, frequency: PayFrequency) -> Decimal {
    round_cents(annual / Decimal::from(frequency.periods_per_year()))
}
