#![no_std]

use core::cmp::Ordering;
use core::fmt;

use common_constants::{HALF_WAD, MAX_DEC_BIT_LEN, WAD, WAD_PRECISION};
use common_errors::LeverageError;
use multiversx_sc::api::ManagedTypeApi;
use multiversx_sc::types::{BigInt, BigUint, Sign};

/// Signed fixed point decimal with 18 fractional digits.
///
/// Every operation that can leave the representable range or divide by zero
/// returns a `LeverageError` instead of panicking. Rounding follows the usual
/// money-market conventions:
/// * `mul` / `quo` round half to even on the last digit
/// * `*_truncate` rounds toward zero
/// * `*_round_up` rounds away from zero for positive results
pub struct Dec<M: ManagedTypeApi> {
    raw: BigInt<M>,
}

fn wad<M: ManagedTypeApi>() -> BigInt<M> {
    BigInt::from(WAD as i64)
}

fn wad_squared<M: ManagedTypeApi>() -> BigInt<M> {
    let wad = wad::<M>();
    &wad * &wad
}

fn negate<M: ManagedTypeApi>(value: BigInt<M>) -> BigInt<M> {
    BigInt::zero() - value
}

fn is_zero_int<M: ManagedTypeApi>(value: &BigInt<M>) -> bool {
    value.sign() == Sign::NoSign
}

fn compare_int<M: ManagedTypeApi>(a: &BigInt<M>, b: &BigInt<M>) -> Ordering {
    match (a - b).sign() {
        Sign::Minus => Ordering::Less,
        Sign::NoSign => Ordering::Equal,
        Sign::Plus => Ordering::Greater,
    }
}

fn is_even<M: ManagedTypeApi>(value: &BigInt<M>) -> bool {
    is_zero_int(&(value % &BigInt::from(2i64)))
}

/// Removes the 18 fractional digits of a raw product, rounding half to even.
/// Negative inputs are rounded on their magnitude.
fn chop_and_round<M: ManagedTypeApi>(value: BigInt<M>) -> BigInt<M> {
    if value.sign() == Sign::Minus {
        return negate(chop_and_round(negate(value)));
    }

    let precision = wad::<M>();
    let quotient = &value / &precision;
    let remainder = &value % &precision;
    if is_zero_int(&remainder) {
        return quotient;
    }

    let half = BigInt::from(HALF_WAD as i64);
    match compare_int(&remainder, &half) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + BigInt::from(1i64),
        Ordering::Equal if is_even(&quotient) => quotient,
        Ordering::Equal => quotient + BigInt::from(1i64),
    }
}

/// Removes the 18 fractional digits, rounding up positive values and
/// truncating negative ones.
fn chop_and_round_up<M: ManagedTypeApi>(value: BigInt<M>) -> BigInt<M> {
    let precision = wad::<M>();
    if value.sign() == Sign::Minus {
        return negate(negate(value) / precision);
    }

    let quotient = &value / &precision;
    let remainder = &value % &precision;
    if is_zero_int(&remainder) {
        quotient
    } else {
        quotient + BigInt::from(1i64)
    }
}

impl<M: ManagedTypeApi> Dec<M> {
    fn checked(raw: BigInt<M>) -> Result<Self, LeverageError> {
        let bound = BigUint::<M>::from(2u64).pow(MAX_DEC_BIT_LEN);
        if raw.magnitude() >= bound {
            return Err(LeverageError::Overflow);
        }
        Ok(Dec { raw })
    }

    pub fn zero() -> Self {
        Dec {
            raw: BigInt::zero(),
        }
    }

    pub fn one() -> Self {
        Dec { raw: wad() }
    }

    /// Builds a decimal from its raw 18-decimal integer representation.
    pub fn from_raw_units(raw: BigInt<M>) -> Self {
        Dec { raw }
    }

    pub fn from_raw_u128(raw: u128) -> Self {
        Dec {
            raw: BigInt::from_biguint(Sign::Plus, BigUint::from(raw)),
        }
    }

    pub fn from_int(value: i64) -> Self {
        Dec {
            raw: BigInt::from(value) * wad(),
        }
    }

    pub fn from_big_int(value: &BigInt<M>) -> Result<Self, LeverageError> {
        Self::checked(value * &wad())
    }

    pub fn from_big_uint(value: &BigUint<M>) -> Result<Self, LeverageError> {
        Self::checked(BigInt::from_biguint(Sign::Plus, value.clone()) * wad())
    }

    /// `10^n` as a decimal.
    pub fn power_of_ten(n: u32) -> Result<Self, LeverageError> {
        Self::from_big_int(&BigInt::from(10i64).pow(n))
    }

    /// Parses `"-12.5"`, `"0.000000000000000001"` or `"7"`.
    /// More than 18 fractional digits are rejected.
    pub fn parse(input: &str) -> Result<Self, LeverageError> {
        let bytes = input.as_bytes();
        let (negative, digits) = match bytes.split_first() {
            Some((b'-', rest)) => (true, rest),
            _ => (false, bytes),
        };
        if digits.is_empty() {
            return Err(LeverageError::InvalidDecimal);
        }

        let (int_part, frac_part) = match digits.iter().position(|b| *b == b'.') {
            Some(dot) => (&digits[..dot], &digits[dot + 1..]),
            None => (digits, &digits[digits.len()..]),
        };
        if int_part.is_empty() || frac_part.len() > WAD_PRECISION {
            return Err(LeverageError::InvalidDecimal);
        }
        if digits.contains(&b'.') && frac_part.is_empty() {
            return Err(LeverageError::InvalidDecimal);
        }

        let ten = BigInt::<M>::from(10i64);
        let mut raw = BigInt::<M>::zero();
        for byte in int_part.iter().chain(frac_part.iter()) {
            if !byte.is_ascii_digit() {
                return Err(LeverageError::InvalidDecimal);
            }
            raw = &raw * &ten + BigInt::from((byte - b'0') as i64);
        }
        let missing = (WAD_PRECISION - frac_part.len()) as u32;
        raw = raw * ten.pow(missing);
        if negative {
            raw = negate(raw);
        }

        Self::checked(raw)
    }

    pub fn raw(&self) -> &BigInt<M> {
        &self.raw
    }

    pub fn into_raw(self) -> BigInt<M> {
        self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.raw.sign() == Sign::NoSign
    }

    pub fn is_positive(&self) -> bool {
        self.raw.sign() == Sign::Plus
    }

    pub fn is_negative(&self) -> bool {
        self.raw.sign() == Sign::Minus
    }

    pub fn neg(&self) -> Self {
        Dec {
            raw: negate(self.raw.clone()),
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, LeverageError> {
        Self::checked(&self.raw + &other.raw)
    }

    pub fn sub(&self, other: &Self) -> Result<Self, LeverageError> {
        Self::checked(&self.raw - &other.raw)
    }

    pub fn mul(&self, other: &Self) -> Result<Self, LeverageError> {
        Self::checked(chop_and_round(&self.raw * &other.raw))
    }

    pub fn mul_truncate(&self, other: &Self) -> Result<Self, LeverageError> {
        Self::checked((&self.raw * &other.raw) / wad())
    }

    pub fn mul_round_up(&self, other: &Self) -> Result<Self, LeverageError> {
        Self::checked(chop_and_round_up(&self.raw * &other.raw))
    }

    fn widened_quotient(&self, other: &Self) -> Result<BigInt<M>, LeverageError> {
        if other.is_zero() {
            return Err(LeverageError::DivisionByZero);
        }
        Ok((&self.raw * &wad_squared()) / other.raw.clone())
    }

    pub fn quo(&self, other: &Self) -> Result<Self, LeverageError> {
        let quotient = self.widened_quotient(other)?;
        Self::checked(chop_and_round(quotient))
    }

    pub fn quo_truncate(&self, other: &Self) -> Result<Self, LeverageError> {
        let quotient = self.widened_quotient(other)?;
        Self::checked(quotient / wad())
    }

    pub fn quo_round_up(&self, other: &Self) -> Result<Self, LeverageError> {
        let quotient = self.widened_quotient(other)?;
        Self::checked(chop_and_round_up(quotient))
    }

    /// Smallest integer not below the value, as a decimal.
    pub fn ceil(&self) -> Result<Self, LeverageError> {
        let precision = wad::<M>();
        let quotient = &self.raw / &precision;
        let remainder = &self.raw % &precision;
        if remainder.sign() != Sign::Plus {
            return Self::checked(quotient * precision);
        }
        Self::checked((quotient + BigInt::from(1i64)) * precision)
    }

    /// Integer part, rounding toward zero.
    pub fn truncate_int(&self) -> BigInt<M> {
        &self.raw / &wad()
    }

    /// Nearest integer, half to even.
    pub fn round_int(&self) -> BigInt<M> {
        chop_and_round(self.raw.clone())
    }

    /// Truncated integer part as an unsigned amount.
    pub fn truncate_uint(&self) -> Result<BigUint<M>, LeverageError> {
        if self.is_negative() {
            return Err(LeverageError::NegativeValue);
        }
        Ok(self.truncate_int().magnitude())
    }

    /// Rounded integer part as an unsigned amount.
    pub fn round_uint(&self) -> Result<BigUint<M>, LeverageError> {
        if self.is_negative() {
            return Err(LeverageError::NegativeValue);
        }
        Ok(self.round_int().magnitude())
    }

    /// Multiplies by `10^n`, dividing instead when `n` is negative.
    pub fn exponent(&self, n: i32) -> Result<Self, LeverageError> {
        match n.cmp(&0) {
            Ordering::Equal => Ok(self.clone()),
            Ordering::Less => self.quo(&Self::power_of_ten(n.unsigned_abs())?),
            Ordering::Greater => self.mul(&Self::power_of_ten(n.unsigned_abs())?),
        }
    }

    /// Smaller of the two values, by reference.
    pub fn min_of(&self, other: &Self) -> Self {
        if self <= other {
            self.clone()
        } else {
            other.clone()
        }
    }

    pub fn max_of(&self, other: &Self) -> Self {
        if self >= other {
            self.clone()
        } else {
            other.clone()
        }
    }
}

/// Linear interpolation through `(x_min, y_min)` and `(x_max, y_max)`.
///
/// # Arguments
/// - `x`: Point to evaluate
/// - `x_min`, `y_min`: First point of the line
/// - `x_max`, `y_max`: Second point of the line
///
/// # Returns
/// - `y_min + (x - x_min) * slope`, or `y_min` when both x bounds coincide
pub fn interpolate<M: ManagedTypeApi>(
    x: &Dec<M>,
    x_min: &Dec<M>,
    y_min: &Dec<M>,
    x_max: &Dec<M>,
    y_max: &Dec<M>,
) -> Result<Dec<M>, LeverageError> {
    if x_max == x_min {
        return Ok(y_min.clone());
    }
    let slope = y_max.sub(y_min)?.quo(&x_max.sub(x_min)?)?;
    y_min.add(&x.sub(x_min)?.mul(&slope)?)
}

impl<M: ManagedTypeApi> Clone for Dec<M> {
    fn clone(&self) -> Self {
        Dec {
            raw: self.raw.clone(),
        }
    }
}

impl<M: ManagedTypeApi> Ord for Dec<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_int(&self.raw, &other.raw)
    }
}

impl<M: ManagedTypeApi> PartialOrd for Dec<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M: ManagedTypeApi> PartialEq for Dec<M> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<M: ManagedTypeApi> Eq for Dec<M> {}

// Largest decimal magnitude is below 10^96, so six chunks of 18 digits cover the integer part.
const DISPLAY_CHUNKS: usize = 6;

impl<M: ManagedTypeApi> fmt::Display for Dec<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = BigUint::<M>::from(WAD);
        let magnitude = self.raw.magnitude();
        let fraction = (&magnitude % &precision).to_u64().ok_or(fmt::Error)?;
        let mut integer = &magnitude / &precision;

        let mut chunks = [0u64; DISPLAY_CHUNKS];
        let mut used = 0;
        while used < DISPLAY_CHUNKS {
            chunks[used] = (&integer % &precision).to_u64().ok_or(fmt::Error)?;
            integer = &integer / &precision;
            used += 1;
            if integer == BigUint::zero() {
                break;
            }
        }

        if self.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "{}", chunks[used - 1])?;
        for chunk in chunks[..used - 1].iter().rev() {
            write!(f, "{:018}", chunk)?;
        }
        write!(f, ".{:018}", fraction)
    }
}

impl<M: ManagedTypeApi> fmt::Debug for Dec<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({})", self)
    }
}
