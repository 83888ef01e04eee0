use std::{fmt, str::FromStr as _};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer, Unexpected, Visitor};

const CENT_PLACES: u32 = 2;

/// Rounds half away from zero and always keeps two decimal places, so `1060`
/// comes out as `1060.00`
pub fn round_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CENT_PLACES);

    rounded
}

/// Lenient input for optional numeric fields.
///
/// Accepts JSON numbers, numeric strings, `null` and the empty string (the
/// last two as `None`). Anything else, e.g. `"12abc"` or `true`, is an error
/// instead of quietly becoming zero.
pub(crate) fn optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(AmountVisitor)
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Option<Decimal>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number, a numeric string or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::invalid_value(Unexpected::Float(v), &self));
        }

        // Going through the shortest textual form keeps `0.1` as exactly 0.1
        Decimal::from_str(&v.to_string())
            .map(Some)
            .map_err(|_| E::invalid_value(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        Decimal::from_str(trimmed)
            .map(Some)
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Field {
        #[serde(default, deserialize_with = "optional_amount")]
        value: Option<Decimal>,
    }

    fn parse(json: &str) -> Result<Option<Decimal>, serde_json::Error> {
        serde_json::from_str::<Field>(json).map(|f| f.value)
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(dec!(1060)).to_string(), "1060.00");
        assert_eq!(round_cents(dec!(0.005)), dec!(0.01));
        assert_eq!(round_cents(dec!(2.344)), dec!(2.34));
        assert_eq!(round_cents(dec!(-0.005)), dec!(-0.01));
    }

    #[test]
    fn test_optional_amount_accepts_numbers_and_blanks() {
        assert_eq!(parse(r#"{ "value": 12.5 }"#).unwrap(), Some(dec!(12.5)));
        assert_eq!(parse(r#"{ "value": 0.1 }"#).unwrap(), Some(dec!(0.1)));
        assert_eq!(parse(r#"{ "value": 7 }"#).unwrap(), Some(dec!(7)));
        assert_eq!(parse(r#"{ "value": " 19.99 " }"#).unwrap(), Some(dec!(19.99)));
        assert_eq!(parse(r#"{ "value": "" }"#).unwrap(), None);
        assert_eq!(parse(r#"{ "value": null }"#).unwrap(), None);
        assert_eq!(parse(r#"{}"#).unwrap(), None);
    }

    #[test]
    fn test_optional_amount_rejects_garbage() {
        assert!(parse(r#"{ "value": "12abc" }"#).is_err());
        assert!(parse(r#"{ "value": true }"#).is_err());
        assert!(parse(r#"{ "value": [1] }"#).is_err());
    }
}
