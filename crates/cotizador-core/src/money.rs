//! # Money Module
//!
//! Provides the `Money` type and the locale-aware `CurrencyFormat`.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:   0.1 + 0.2 = 0.30000000000000004                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer centavos                                         │
//! │    "50000"    → Money(5_000_000)                                        │
//! │    "1500.5"   → Money(150_050)                                          │
//! │  Sums are exact; rounding only happens when formatting for display.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cotizador_core::money::{CurrencyFormat, Money};
//!
//! let cop = CurrencyFormat::colombian_peso();
//! let price = Money::parse("50000").unwrap();
//!
//! assert_eq!(cop.format(Some(price)), "$ 50.000");
//! assert_eq!(cop.format(None), "");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::error::{ValidationError, ValidationResult};

/// Largest amount accepted from user input: 999,999,999,999.99.
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999_999_999;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos).
///
/// ## Where Money is Used
/// ```text
/// valorDescripcion ("50000") ──► Money::parse ──► LineItem.value
///                                                     │
///                      LineItemStore::total ◄─────────┘
///                              │
///                              ▼
///                CurrencyFormat::format ──► "$ 50.000"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use cotizador_core::money::Money;
    ///
    /// let price = Money::from_cents(150_050); // 1.500,50
    /// assert_eq!(price.cents(), 150_050);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a user-entered amount.
    ///
    /// ## Accepted Input
    /// ```text
    /// "50000"      ✓   whole units
    /// " 1500.5 "   ✓   surrounding whitespace
    /// "0.99" "+5"  ✓   optional leading plus
    /// ".5" "5."    ✓   missing integer or fraction digits
    /// "1e3"        ✓   scientific notation (1000)
    /// "10.125"     ✓   rounded to centavos, half away from zero (10.13)
    /// "abc" "inf"  ✗   not a number
    /// "-5"         ✗   negative
    /// "50.000,00"  ✗   locale separators (the form delivers machine format)
    /// ```
    ///
    /// Blank input is not handled here: an absent value is decided by the
    /// caller before parsing.
    pub fn parse(input: &str) -> ValidationResult<Money> {
        let trimmed = input.trim();

        if trimmed.starts_with('-') {
            return Err(ValidationError::invalid_number(input, "must not be negative"));
        }
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let not_a_number = || ValidationError::invalid_number(input, "not a number");
        let too_large = || ValidationError::invalid_number(input, "amount is too large");
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());

        let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => {
                let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
                if digits.is_empty() || digits.len() > 6 || !all_digits(digits) {
                    return Err(not_a_number());
                }
                let exponent: i64 = exponent.parse().map_err(|_| not_a_number())?;
                (mantissa, exponent)
            }
            None => (unsigned, 0),
        };

        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(not_a_number());
        }

        // Significant digits, and how many of them sit before the centavo point.
        let digits = format!("{}{}", whole, fraction);
        let significant = digits.trim_start_matches('0');
        let leading_zeros = (digits.len() - significant.len()) as i64;
        let cent_point = whole.len() as i64 + exponent + 2 - leading_zeros;

        if significant.is_empty() {
            return Ok(Money::zero());
        }
        // The first significant digit is non-zero, so 19+ integer digits
        // of centavos is beyond any i64 amount.
        if cent_point > 18 {
            return Err(too_large());
        }

        let bytes = significant.as_bytes();
        let (integer, rounding_digit) = if cent_point <= 0 {
            let rounding = if cent_point == 0 { bytes[0] } else { b'0' };
            (0_i64, rounding)
        } else {
            let point = cent_point as usize;
            let mut integer = String::with_capacity(point);
            integer.push_str(&significant[..point.min(significant.len())]);
            integer.extend(std::iter::repeat('0').take(point.saturating_sub(significant.len())));
            let rounding = bytes.get(point).copied().unwrap_or(b'0');
            (integer.parse::<i64>().map_err(|_| too_large())?, rounding)
        };

        // Half away from zero; the amount is never negative here.
        let cents = if rounding_digit >= b'5' { integer + 1 } else { integer };
        if cents > MAX_AMOUNT_CENTS {
            return Err(too_large());
        }

        Ok(Money(cents))
    }
}

/// Debug-friendly rendering (`1500.50`). Use [`CurrencyFormat`] for anything
/// shown to a client.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Currency Format
// =============================================================================

/// Locale convention used to display money.
///
/// ## Colombian Peso (default)
/// ```text
/// Money(5_000_000) ──► "$" + " " + "50.000"        (0 decimals)
/// Money(150_050)   ──► "$" + " " + "1.501"          (rounded half away from zero)
/// None             ──► ""                           (price hidden)
/// ```
///
/// Formatting is a pure function of the settings and the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CurrencyFormat {
    /// Currency symbol placed before the digits.
    pub symbol: String,

    /// Text between symbol and digits.
    pub symbol_separator: String,

    /// Digit group separator (thousands).
    pub thousands_separator: char,

    /// Separator before the fraction digits.
    pub decimal_separator: char,

    /// Fraction digits displayed (0-2).
    pub decimals: u8,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat::colombian_peso()
    }
}

impl CurrencyFormat {
    /// es-CO / COP convention with whole pesos.
    pub fn colombian_peso() -> Self {
        CurrencyFormat {
            symbol: "$".to_string(),
            symbol_separator: " ".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
            decimals: 0,
        }
    }

    /// Formats an optional amount; `None` yields empty text.
    pub fn format(&self, amount: Option<Money>) -> String {
        match amount {
            Some(money) => self.format_money(money),
            None => String::new(),
        }
    }

    /// Formats an amount.
    ///
    /// ## Example
    /// ```rust
    /// use cotizador_core::money::{CurrencyFormat, Money};
    ///
    /// let cop = CurrencyFormat::colombian_peso();
    /// assert_eq!(cop.format_money(Money::from_units(1_234_567)), "$ 1.234.567");
    /// assert_eq!(cop.format_money(Money::zero()), "$ 0");
    /// ```
    pub fn format_money(&self, money: Money) -> String {
        let decimals = u32::from(self.decimals.min(2));
        let divisor = 10_i128.pow(2 - decimals);

        // Round half away from zero to the displayed precision
        let cents = i128::from(money.cents());
        let magnitude = cents.abs();
        let scaled = (magnitude + divisor / 2) / divisor;

        let unit = 10_i128.pow(decimals);
        let whole = scaled / unit;
        let fraction = scaled % unit;

        let mut out = String::new();
        if cents < 0 && scaled != 0 {
            out.push('-');
        }
        out.push_str(&self.symbol);
        out.push_str(&self.symbol_separator);
        out.push_str(&group_thousands(whole, self.thousands_separator));

        if decimals > 0 {
            out.push(self.decimal_separator);
            out.push_str(&format!("{:0width$}", fraction, width = decimals as usize));
        }

        out
    }
}

/// Inserts `separator` every three digits from the right.
fn group_thousands(value: i128, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
