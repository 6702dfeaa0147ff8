//! Exact number types used by the step engines.
//!
//! Every engine works on exact values: integers as `u64`, fractions as
//! reduced-on-demand `i64` pairs and decimals as fixed-point mantissas.
//! Floating point is only used when comparing an answer against a tolerance.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Names of the first place values, indexed from the units column.
const PLACE_NAMES: [&str; 10] = [
    "units",
    "tens",
    "hundreds",
    "thousands",
    "ten thousands",
    "hundred thousands",
    "millions",
    "ten millions",
    "hundred millions",
    "billions",
];

/// Returns the digits of `value`, least significant first.
///
/// Zero has a single digit.
///
/// # Examples
///
/// ```
/// use abacus_core::number::digits_lsb;
///
/// assert_eq!(digits_lsb(472), vec![2, 7, 4]);
/// assert_eq!(digits_lsb(0), vec![0]);
/// ```
#[must_use]
pub fn digits_lsb(mut value: u64) -> Vec<u8> {
    let mut digits = Vec::new();
    loop {
        digits.push(u8::try_from(value % 10).unwrap_or_default());
        value /= 10;
        if value == 0 {
            break;
        }
    }
    digits
}

/// Returns the number of decimal digits in `value`.
#[must_use]
pub fn digit_count(value: u64) -> usize {
    digits_lsb(value).len()
}

/// Returns the human name of a place value column (`0` = units).
#[must_use]
pub fn place_name(place_index: usize) -> String {
    PLACE_NAMES.get(place_index).map_or_else(
        || format!("10^{place_index} place"),
        |name| (*name).to_string(),
    )
}

/// Returns `10^exp`, or `None` when it does not fit in a `u64`.
#[must_use]
pub fn pow10(exp: usize) -> Option<u64> {
    u32::try_from(exp).ok().and_then(|e| 10u64.checked_pow(e))
}

/// Greatest common divisor (always non-negative, `gcd(0, 0) == 0`).
#[must_use]
pub const fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Least common multiple, or `None` on overflow.
#[must_use]
pub fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

// ============================================================================
// Fraction
// ============================================================================

/// A fraction with a signed numerator and a positive denominator.
///
/// Fractions are not reduced on construction: the tutor needs to show
/// unsimplified intermediate values such as `6/8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

impl Fraction {
    /// Creates a fraction, returning `None` for a zero denominator.
    ///
    /// A negative denominator moves its sign to the numerator.
    #[must_use]
    pub fn new(numerator: i64, denominator: i64) -> Option<Self> {
        match denominator.cmp(&0) {
            Ordering::Equal => None,
            Ordering::Greater => Some(Self {
                numerator,
                denominator,
            }),
            Ordering::Less => Some(Self {
                numerator: numerator.checked_neg()?,
                denominator: denominator.checked_neg()?,
            }),
        }
    }

    /// Creates the fraction `value/1`.
    #[must_use]
    pub const fn from_integer(value: i64) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }

    /// The numerator, carrying the sign.
    #[must_use]
    pub const fn numerator(&self) -> i64 {
        self.numerator
    }

    /// The denominator, always positive.
    #[must_use]
    pub const fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Divides numerator and denominator by their greatest common divisor.
    #[must_use]
    pub fn reduced(&self) -> Self {
        let divisor = gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs());
        if divisor <= 1 {
            return *self;
        }
        // divisor divides both values exactly and is at most |denominator|
        let divisor = i64::try_from(divisor).unwrap_or(1);
        Self {
            numerator: self.numerator / divisor,
            denominator: self.denominator / divisor,
        }
    }

    /// Returns `true` if the fraction cannot be simplified further.
    #[must_use]
    pub fn is_reduced(&self) -> bool {
        gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs()) <= 1
    }

    /// Compares two fractions as rational values.
    #[must_use]
    pub fn same_value(&self, other: &Self) -> bool {
        let lhs = i128::from(self.numerator) * i128::from(other.denominator);
        let rhs = i128::from(other.numerator) * i128::from(self.denominator);
        lhs == rhs
    }

    /// Renders the fraction, writing whole numbers without a denominator.
    ///
    /// # Examples
    ///
    /// ```
    /// use abacus_core::number::Fraction;
    ///
    /// assert_eq!(Fraction::new(8, 4).unwrap().reduced().display_simplified(), "2");
    /// assert_eq!(Fraction::new(5, 4).unwrap().display_simplified(), "5/4");
    /// ```
    #[must_use]
    pub fn display_simplified(&self) -> String {
        if self.denominator == 1 {
            self.numerator.to_string()
        } else {
            self.to_string()
        }
    }

    /// Parses `"n/d"`, `"n / d"` or a whole number.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some((num, den)) = text.split_once('/') {
            let numerator = num.trim().parse().ok()?;
            let denominator = den.trim().parse().ok()?;
            Self::new(numerator, denominator)
        } else {
            text.parse().ok().map(Self::from_integer)
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

// ============================================================================
// Decimal
// ============================================================================

/// Maximum number of decimal places kept when a division does not terminate.
pub const DIVISION_PLACES: u32 = 3;

/// An exact fixed-point decimal: `mantissa × 10^-scale`.
///
/// The scale records how many decimal places were written, so `2.50` keeps
/// scale 2 while still comparing equal in value to `2.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    /// Creates a decimal from its mantissa and number of decimal places.
    #[must_use]
    pub const fn new(mantissa: i128, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// Creates a decimal with no decimal places.
    #[must_use]
    pub fn from_integer(value: u64) -> Self {
        Self::new(i128::from(value), 0)
    }

    /// Parses `"12"`, `"2.5"`, `"-0.75"` or `"2,5"`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().replace(',', ".");
        let (negative, body) = text
            .strip_prefix('-')
            .map_or((false, text.as_str()), |rest| (true, rest));
        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }
        let digits = format!("{whole}{fraction}");
        let mantissa: i128 = digits.parse().ok()?;
        let scale = u32::try_from(fraction.len()).ok()?;
        Some(Self::new(if negative { -mantissa } else { mantissa }, scale))
    }

    /// The mantissa (all written digits without the point).
    #[must_use]
    pub const fn mantissa(&self) -> i128 {
        self.mantissa
    }

    /// Number of decimal places.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// Re-expresses the value with `scale` decimal places.
    ///
    /// Returns `None` if `scale` is smaller than the current one or the
    /// mantissa overflows.
    #[must_use]
    pub fn rescale(&self, scale: u32) -> Option<Self> {
        let extra = scale.checked_sub(self.scale)?;
        let factor = 10i128.checked_pow(extra)?;
        Some(Self::new(self.mantissa.checked_mul(factor)?, scale))
    }

    /// Exact sum.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let scale = self.scale.max(other.scale);
        let (a, b) = (self.rescale(scale)?, other.rescale(scale)?);
        Some(Self::new(a.mantissa.checked_add(b.mantissa)?, scale))
    }

    /// Exact difference.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        let scale = self.scale.max(other.scale);
        let (a, b) = (self.rescale(scale)?, other.rescale(scale)?);
        Some(Self::new(a.mantissa.checked_sub(b.mantissa)?, scale))
    }

    /// Exact product: mantissas multiply and decimal places add up.
    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        Some(Self::new(
            self.mantissa.checked_mul(other.mantissa)?,
            self.scale.checked_add(other.scale)?,
        ))
    }

    /// Quotient rounded half away from zero to [`DIVISION_PLACES`] places.
    ///
    /// Returns `None` for a zero divisor or on overflow.
    #[must_use]
    pub fn checked_div_rounded(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        // a/b = (ma * 10^sb) / (mb * 10^sa); scaled by 10^places before dividing
        let numerator = self
            .mantissa
            .checked_mul(10i128.checked_pow(other.scale.checked_add(DIVISION_PLACES)?)?)?;
        let denominator = other.mantissa.checked_mul(10i128.checked_pow(self.scale)?)?;
        let quotient = numerator / denominator;
        let remainder = numerator % denominator;
        let rounded = if remainder.unsigned_abs() * 2 >= denominator.unsigned_abs() {
            if (numerator < 0) == (denominator < 0) {
                quotient.checked_add(1)?
            } else {
                quotient.checked_sub(1)?
            }
        } else {
            quotient
        };
        Some(Self::new(rounded, DIVISION_PLACES))
    }

    /// Drops trailing zero decimal places (`2.50` becomes `2.5`, `5.0` becomes `5`).
    #[must_use]
    pub const fn normalized(&self) -> Self {
        let mut mantissa = self.mantissa;
        let mut scale = self.scale;
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        Self::new(mantissa, scale)
    }

    /// Compares two decimals by value regardless of scale.
    #[must_use]
    pub fn same_value(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }

    /// Approximate value, for tolerance comparisons only.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(i32::try_from(self.scale).unwrap_or(i32::MAX))
    }

    /// Orders two decimals by value.
    #[must_use]
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        match (self.rescale(scale), other.rescale(scale)) {
            (Some(a), Some(b)) => a.mantissa.cmp(&b.mantissa),
            _ => self.to_f64().total_cmp(&other.to_f64()),
        }
    }
}

impl fmt::Display for Decimal {
    /// Writes the value exactly as stored, with `.` as separator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = usize::try_from(self.scale).unwrap_or(usize::MAX);
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (whole, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{whole}.{fraction}")
    }
}
