use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CANADA_PROVINCE, DEFAULT_QUEBEC_PROVINCE, DEFAULT_VACATION_PERCENT, SASKATCHEWAN_VACATION_PERCENT,
};

use super::PayrollError;

/// Parsed case-insensitively through [`FromStr`], both from strings and JSON
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Region {
    #[default]
    Ca,
    Qc,
    Us,
    Other,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Ca => "ca",
            Region::Qc => "qc",
            Region::Us => "us",
            Region::Other => "other",
        }
    }

    /// Province assumed when a draft carries none
    pub fn default_jurisdiction(&self) -> Option<&'static str> {
        match self {
            Region::Ca => Some(DEFAULT_CANADA_PROVINCE),
            Region::Qc => Some(DEFAULT_QUEBEC_PROVINCE),
            Region::Us | Region::Other => None,
        }
    }

    pub fn default_vacation_percent(&self, jurisdiction: &str) -> Decimal {
        match self {
            Region::Ca if jurisdiction == "SK" => SASKATCHEWAN_VACATION_PERCENT,
            Region::Ca | Region::Qc => DEFAULT_VACATION_PERCENT,
            Region::Us | Region::Other => Decimal::ZERO,
        }
    }

    pub fn vacation_included_by_default(&self) -> bool {
        matches!(self, Region::Ca | Region::Qc)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ca" => Ok(Region::Ca),
            "qc" => Ok(Region::Qc),
            "us" => Ok(Region::Us),
            "other" => Ok(Region::Other),
            _ => Err(PayrollError::UnknownRegion(s.to_string())),
        }
    }
}

impl TryFrom<String> for Region {
    type Error = PayrollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum PayFrequency {
    #[default]
    Weekly,
    Biweekly,
    SemiMonthly,
    Monthly,
}

impl PayFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PayFrequency::Weekly => 52,
            PayFrequency::Biweekly => 26,
            PayFrequency::SemiMonthly => 24,
            PayFrequency::Monthly => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayFrequency::Weekly => "weekly",
            PayFrequency::Biweekly => "biweekly",
            PayFrequency::SemiMonthly => "semi-monthly",
            PayFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayFrequency {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(PayFrequency::Weekly),
            "biweekly" => Ok(PayFrequency::Biweekly),
            "semi-monthly" | "semimonthly" => Ok(PayFrequency::SemiMonthly),
            "monthly" => Ok(PayFrequency::Monthly),
            _ => Err(PayrollError::UnknownPayFrequency(s.to_string())),
        }
    }
}

impl TryFrom<String> for PayFrequency {
    type Error = PayrollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Upper-cases a province or state code, treating blanks as missing
pub(crate) fn normalize_jurisdiction(code: Option<&str>) -> Option<String> {
    code.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_ascii_uppercase)
}
