use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// For EUR/USD, 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Largest amount accepted anywhere, in either sign: 999,999,999,999.99.
///
/// Keeping amounts below 10^14 cents means every amount has an exact
/// decimal representation as a JSON `f64`.
pub const MAX_CENTS: Cents = 99_999_999_999_999;

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
///
/// More than two fractional digits is an error rather than a silent truncation.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, input) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (input, ""),
    };
    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimal_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => decimal_str.parse::<i64>().map_err(|_| ParseCentsError::InvalidFormat)? * 10,
        2 => decimal_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
        _ => return Err(ParseCentsError::TooPrecise),
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .filter(|c| *c <= MAX_CENTS)
        .ok_or(ParseCentsError::Overflow)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    TooPrecise,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::TooPrecise => write!(f, "more than two decimal places"),
            ParseCentsError::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

/// Serde adapter that stores cents as a plain JSON number of currency units.
///
/// Whole amounts are written as integers (`5`), anything else as a decimal (`12.5`),
/// so files written by hand or by older tools that only hold integers stay readable.
/// Reading rejects anything that is not a whole number of cents within
/// [`MAX_CENTS`](super::MAX_CENTS), so a loaded amount always writes back unchanged.
pub mod amount_serde {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use super::{Cents, MAX_CENTS};

    pub fn serialize<S>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if cents % 100 == 0 {
            serializer.serialize_i64(cents / 100)
        } else {
            serializer.serialize_f64(*cents as f64 / 100.0)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Cents, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl Visitor<'_> for AmountVisitor {
        type Value = Cents;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a numeric amount")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Cents, E> {
            v.checked_mul(100)
                .filter(|c| c.unsigned_abs() <= MAX_CENTS.unsigned_abs())
                .ok_or_else(|| E::custom(format!("amount {} is out of range", v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Cents, E> {
            i64::try_from(v)
                .map_err(|_| E::custom(format!("amount {} is out of range", v)))
                .and_then(|v| self.visit_i64(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Cents, E> {
            let cents = (v * 100.0).round();
            if !cents.is_finite() || cents.abs() > MAX_CENTS as f64 {
                return Err(E::custom(format!("amount {} is out of range", v)));
            }
            // Only an exact number of cents divides back to the same value
            if cents / 100.0 != v {
                return Err(E::custom(format!(
                    "amount {} has more than two decimal places",
                    v
                )));
            }
            Ok(cents as Cents)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(100), "1.00");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("50.00"), Ok(5000));
        assert_eq!(parse_cents("50"), Ok(5000));
        assert_eq!(parse_cents("12.34"), Ok(1234));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents("0.01"), Ok(1));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("-50.00"), Ok(-5000));
        assert_eq!(parse_cents("-.5"), Ok(-50));
        assert_eq!(parse_cents("999999999999.99"), Ok(MAX_CENTS));
    }

    #[test]
    fn test_parse_cents_rejects_extra_precision() {
        assert_eq!(parse_cents("100.999"), Err(ParseCentsError::TooPrecise));
        assert_eq!(parse_cents("12.345"), Err(ParseCentsError::TooPrecise));
        assert_eq!(parse_cents("0.004"), Err(ParseCentsError::TooPrecise));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents("12.34.56").is_err());
        assert!(parse_cents("").is_err());
        assert!(parse_cents("1e5").is_err());
        assert!(parse_cents("-").is_err());
        assert!(parse_cents("--5").is_err());
        assert!(parse_cents("-+5").is_err());
        assert_eq!(
            parse_cents("99999999999999999999"),
            Err(ParseCentsError::Overflow)
        );
        assert_eq!(
            parse_cents("1000000000000"),
            Err(ParseCentsError::Overflow)
        );
    }

    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct Wrapped {
        #[serde(with = "amount_serde")]
        amount: Cents,
    }

    #[test]
    fn test_amount_serde_writes_plain_numbers() {
        let whole = serde_json::to_string(&Wrapped { amount: 500 }).unwrap();
        assert_eq!(whole, r#"{"amount":5}"#);

        let fractional = serde_json::to_string(&Wrapped { amount: 1250 }).unwrap();
        assert_eq!(fractional, r#"{"amount":12.5}"#);
    }

    #[test]
    fn test_amount_serde_reads_integers_and_decimals() {
        let w: Wrapped = serde_json::from_str(r#"{"amount":20}"#).unwrap();
        assert_eq!(w.amount, 2000);

        let w: Wrapped = serde_json::from_str(r#"{"amount":-3.2}"#).unwrap();
        assert_eq!(w.amount, -320);

        let w: Wrapped = serde_json::from_str(r#"{"amount":12.34}"#).unwrap();
        assert_eq!(w.amount, 1234);
    }

    #[test]
    fn test_amount_serde_rejects_sub_cent_values() {
        for json in [r#"{"amount":10.999}"#, r#"{"amount":0.004}"#, r#"{"amount":-1.005}"#] {
            assert!(
                serde_json::from_str::<Wrapped>(json).is_err(),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_amount_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Wrapped>(r#"{"amount":1000000000000}"#).is_err());
        assert!(serde_json::from_str::<Wrapped>(r#"{"amount":-1e300}"#).is_err());
        assert!(serde_json::from_str::<Wrapped>(r#"{"amount":18446744073709551615}"#).is_err());

        let w: Wrapped = serde_json::from_str(r#"{"amount":999999999999.99}"#).unwrap();
        assert_eq!(w.amount, MAX_CENTS);
    }

    #[test]
    fn test_amount_serde_writes_back_what_it_reads() {
        for cents in [1, 29, -1005, 1234, MAX_CENTS, -MAX_CENTS] {
            let json = serde_json::to_string(&Wrapped { amount: cents }).unwrap();
            let back: Wrapped = serde_json::from_str(&json).unwrap();
            assert_eq!(back.amount, cents, "{json}");
        }
    }

    #[test]
    fn test_amount_serde_rejects_non_numbers() {
        assert!(serde_json::from_str::<Wrapped>(r#"{"amount":"20"}"#).is_err());
        assert!(serde_json::from_str::<Wrapped>(r#"{"amount":null}"#).is_err());
    }
}
