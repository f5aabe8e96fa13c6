//! Numeric literal classification.
//!
//! A numeric literal materializes as the narrowest kind that represents it
//! without loss: `Int32`, then `Int64`, then `Float64`, falling back to an
//! arbitrary-precision `Decimal`. The float/decimal split is asymmetric on
//! purpose — `Float64` is chosen only when converting the decimal to a
//! double and rendering it back round-trips exactly.

use bigdecimal::BigDecimal;

/// The outcome of classifying a numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericKind {
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Decimal(BigDecimal),
}

/// Classifies `literal` into the narrowest lossless numeric kind, or
/// `None` when it is not a number at all.
///
/// # Examples
///
/// ```rust
/// use collex::number::{classify, NumericKind};
///
/// assert_eq!(classify("2147483647"), Some(NumericKind::Int32(2147483647)));
/// assert_eq!(classify("2147483648"), Some(NumericKind::Int64(2147483648)));
/// assert_eq!(classify("1.5"), Some(NumericKind::Float64(1.5)));
/// assert!(matches!(
///     classify("0.1000000000000000000001"),
///     Some(NumericKind::Decimal(_))
/// ));
/// assert_eq!(classify("not a number"), None);
/// ```
#[must_use]
pub fn classify(literal: &str) -> Option<NumericKind> {
    if let Ok(n) = literal.parse::<i64>() {
        return Some(match i32::try_from(n) {
            Ok(i) => NumericKind::Int32(i),
            Err(_) => NumericKind::Int64(n),
        });
    }
    let dec = literal.parse::<BigDecimal>().ok()?;
    let Some(dbl) = literal.parse::<f64>().ok().filter(|d| d.is_finite()) else {
        return Some(NumericKind::Decimal(dec));
    };
    // The shortest decimal rendering of the double must parse back to an
    // equal BigDecimal for the narrowing to be lossless.
    match dbl.to_string().parse::<BigDecimal>() {
        Ok(back) if back == dec => Some(NumericKind::Float64(dbl)),
        _ => Some(NumericKind::Decimal(dec)),
    }
}
