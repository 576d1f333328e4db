use crate::core::errors::NexusError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::str::FromStr;
use utoipa::ToSchema;

/// Currency amounts settle at two decimal places.
pub const MINOR_UNIT_SCALE: u32 = 2;

pub const ONE_MINOR_UNIT: Decimal = Decimal::from_parts(1, 0, 0, false, MINOR_UNIT_SCALE);

/// Largest amount, balance or limit accepted from a client (one billion). Every sum and
/// product the service forms from bounded values stays far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest APR accepted, in percent.
pub const MAX_APR: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn sum_amounts<'a>(amounts: impl IntoIterator<Item = &'a Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount))
}

/// Rejects amounts whose magnitude is above [`MAX_AMOUNT`].
pub fn check_amount(field: &str, label: &str, value: Decimal) -> Result<(), NexusError> {
    if value.abs() > MAX_AMOUNT {
        return Err(NexusError::invalid_input(
            field,
            "Amount Too Large",
            format!("{} cannot exceed {}", label, MAX_AMOUNT),
        ));
    }
    Ok(())
}

pub fn check_apr(field: &str, label: &str, apr: Decimal) -> Result<(), NexusError> {
    if apr > MAX_APR {
        return Err(NexusError::invalid_input(
            field,
            "Invalid APR",
            format!("APR for {} cannot exceed {}%", label, MAX_APR),
        ));
    }
    Ok(())
}

/// Parses what a user typed into an amount field.
///
/// Currency symbols, thousands separators and spaces are ignored. Anything that
/// still fails to parse, or parses negative, becomes zero.
pub fn parse_amount_input(input: &str) -> Decimal {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_') && !c.is_whitespace())
        .collect();
    match Decimal::from_str(&cleaned) {
        Ok(value) if value > Decimal::ZERO => round_cents(value.min(MAX_AMOUNT)),
        _ => Decimal::ZERO,
    }
}

/// Amount as posted by a client: either a JSON number or the raw field text.
#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AmountInput {
    Number(Decimal),
    Text(String),
}

impl AmountInput {
    pub fn to_amount(&self) -> Decimal {
        match self {
            AmountInput::Number(value) => round_cents((*value).clamp(Decimal::ZERO, MAX_AMOUNT)),
            AmountInput::Text(text) => parse_amount_input(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_amount_input_accepts_plain_and_formatted_numbers() {
        assert_eq!(parse_amount_input("150"), d("150"));
        assert_eq!(parse_amount_input(" 1,250.50 "), d("1250.50"));
        assert_eq!(parse_amount_input("$42.10"), d("42.10"));
        assert_eq!(parse_amount_input("10.005"), d("10.01"));
    }

    #[test]
    fn test_parse_amount_input_coerces_bad_input_to_zero() {
        assert_eq!(parse_amount_input(""), Decimal::ZERO);
        assert_eq!(parse_amount_input("abc"), Decimal::ZERO);
        assert_eq!(parse_amount_input("-25"), Decimal::ZERO);
        assert_eq!(parse_amount_input("12abc"), Decimal::ZERO);
    }

    #[test]
    fn test_huge_input_is_clamped() {
        assert_eq!(parse_amount_input("79228162514264337593543950335"), MAX_AMOUNT);
        assert_eq!(AmountInput::Number(Decimal::MAX).to_amount(), MAX_AMOUNT);
        assert_eq!(sum_amounts(&[Decimal::MAX, Decimal::MAX]), Decimal::MAX);
    }

    #[test]
    fn test_check_amount_bounds_magnitude() {
        assert!(check_amount("amount", "Amount", MAX_AMOUNT).is_ok());
        assert!(check_amount("amount", "Amount", -MAX_AMOUNT).is_ok());
        assert!(matches!(
            check_amount("amount", "Amount", MAX_AMOUNT + Decimal::ONE),
            Err(NexusError::InvalidInput(field, _)) if field == "amount"
        ));
        assert!(check_apr("apr", "visa", d("1000.01")).is_err());
    }

    #[test]
    fn test_amount_input_from_json() {
        let number: AmountInput = serde_json::from_str("80.5").unwrap();
        assert_eq!(number.to_amount(), d("80.50"));
        let text: AmountInput = serde_json::from_str("\"oops\"").unwrap();
        assert_eq!(text.to_amount(), Decimal::ZERO);
        let negative: AmountInput = serde_json::from_str("-3").unwrap();
        assert_eq!(negative.to_amount(), Decimal::ZERO);
    }
}
