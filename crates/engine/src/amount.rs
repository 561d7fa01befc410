use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{EngineError, ResultEngine};

/// Largest accepted magnitude in minor units: one trillion in major units.
///
/// Well below 2^46 major units, so every cent up to the bound is still
/// distinct as an `f64` on the wire.
pub const MAX_MINOR: i64 = 100_000_000_000_000;

/// Money amount represented as **integer cents**.
///
/// Every stored and aggregated value in the engine goes through this type,
/// so sums and averages never accumulate floating-point drift. On the wire
/// (JSON export, REST) it is a plain number with at most two decimals.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::from_minor(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Amount>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Converts a decimal number into cents.
    ///
    /// Rejects NaN/infinite values, values above [`MAX_MINOR`] and values
    /// with more than two decimals. A value has at most two decimals when the
    /// nearest cent converts back to exactly the same `f64`.
    pub fn from_f64(value: f64) -> ResultEngine<Self> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(
                "amount must be a finite number".to_string(),
            ));
        }

        let rounded = (value * 100.0).round();
        if rounded.abs() > MAX_MINOR as f64 {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }
        if rounded / 100.0 != value {
            return Err(EngineError::InvalidAmount("too many decimals".to_string()));
        }

        Ok(Self(rounded as i64))
    }

    /// Converts a decimal number into cents, rounding sub-cent digits up.
    ///
    /// Used for lower bounds, where `10.005` must not admit `10.00`.
    /// Magnitudes beyond [`MAX_MINOR`] are clamped to it.
    pub fn ceil_f64(value: f64) -> ResultEngine<Self> {
        Self::rounded_with(value, f64::ceil)
    }

    /// Like [`Amount::ceil_f64`] but rounding down, for upper bounds.
    pub fn floor_f64(value: f64) -> ResultEngine<Self> {
        Self::rounded_with(value, f64::floor)
    }

    fn rounded_with(value: f64, round: fn(f64) -> f64) -> ResultEngine<Self> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(
                "amount must be a finite number".to_string(),
            ));
        }
        if let Ok(exact) = Self::from_f64(value) {
            return Ok(exact);
        }
        let limit = MAX_MINOR as f64;
        Ok(Self(round(value * 100.0).clamp(-limit, limit) as i64))
    }

    /// Returns the amount as a decimal number (e.g. `12.34`).
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Sums the amounts, failing with `AmountOverflow` instead of wrapping.
    pub fn checked_sum<I>(amounts: I) -> ResultEngine<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, amount| {
                acc.checked_add(amount).ok_or_else(overflow)
            })
    }
}

/// Error for aggregates that left the `i64` range.
pub(crate) fn overflow() -> EngineError {
    EngineError::AmountOverflow("total exceeds the representable range".to_string())
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        f.pad(&format!("{sign}{units}.{cents:02}"))
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// The sign is kept: rejecting non-positive amounts is a validation
    /// concern, not a parsing one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("'{}' is not a number", s.trim()));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .filter(|v| *v <= MAX_MINOR)
            .ok_or_else(overflow)?;

        Ok(Amount(if negative { -total } else { total }))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Amount::from_f64(value).map_err(de::Error::custom)
    }
}
