//! Arbitrary-precision numbers, stored as their canonical decimal text.
//!
//! Like an `arbitrary_precision` JSON number, neither type does
//! arithmetic. They carry digits between encodings without loss and convert
//! to machine numbers on request.

use crate::error::{Error, ErrorCode, Result};
use core::fmt::{self, Debug, Display};
use core::str::FromStr;

/// Digits beyond which a decimal is refused when it is truncated to an
/// integer, so that `1e1000000000` cannot allocate a billion zeros.
const MAX_INTEGER_DIGITS: usize = 4096;

/// An integer of any size.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigInteger {
    n: Box<str>,
}

/// A decimal number of any size and precision.
///
/// The text is kept as written, `1.50` stays distinct from `1.5`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal {
    n: Box<str>,
}

impl BigInteger {
    /// The decimal digits, with a leading `-` for negative values.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.n
    }

    /// The value as `i64` if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.n.parse().ok()
    }

    /// The low 64 bits of the two's complement value, wrapping like an
    /// `as` cast from a wider integer.
    pub fn to_i64_wrapping(&self) -> i64 {
        let (negative, digits) = split_sign(&self.n);
        let mut value = 0i64;
        for digit in digits.bytes() {
            value = value
                .wrapping_mul(10)
                .wrapping_add(i64::from(digit - b'0'));
        }
        if negative {
            value.wrapping_neg()
        } else {
            value
        }
    }

    /// The nearest `f64`, infinite when out of range.
    pub fn to_f64(&self) -> f64 {
        self.n.parse().unwrap_or(f64::NAN)
    }

    /// Truncates a finite float towards zero.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let truncated = value.trunc();
        let text = if truncated == 0.0 {
            "0".to_owned()
        } else {
            format!("{:.0}", truncated)
        };
        Some(BigInteger { n: text.into() })
    }
}

impl BigDecimal {
    /// The number as written.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.n
    }

    /// The nearest `f64`, infinite when out of range.
    pub fn to_f64(&self) -> f64 {
        self.n.parse().unwrap_or(f64::NAN)
    }

    /// Drops the fractional part.
    ///
    /// Fails only when the integer would have more than a few thousand
    /// digits.
    pub fn to_big_integer(&self) -> Result<BigInteger> {
        let (negative, rest) = split_sign(&self.n);
        let (mantissa, exponent) = match rest.find(&['e', 'E'][..]) {
            Some(i) => match rest[i + 1..].parse::<i64>() {
                Ok(exponent) => (&rest[..i], exponent),
                Err(_) => return Err(out_of_range()),
            },
            None => (rest, 0),
        };
        let (int, frac) = match mantissa.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (mantissa, ""),
        };
        let point = (int.len() as i64).saturating_add(exponent);
        let mut digits = String::with_capacity(int.len() + frac.len());
        digits.push_str(int);
        digits.push_str(frac);
        let integer = if point <= 0 {
            String::new()
        } else if point as usize >= digits.len() {
            let zeros = point as usize - digits.len();
            if point as usize > MAX_INTEGER_DIGITS {
                return Err(out_of_range());
            }
            digits.extend(core::iter::repeat('0').take(zeros));
            digits
        } else {
            digits.truncate(point as usize);
            digits
        };
        let integer = integer.trim_start_matches('0');
        let n = if integer.is_empty() {
            "0".to_owned()
        } else if negative {
            format!("-{}", integer)
        } else {
            integer.to_owned()
        };
        Ok(BigInteger { n: n.into() })
    }

    /// The shortest decimal that reads back as `value`, for finite values.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let mut buffer = zmij::Buffer::new();
        Some(BigDecimal {
            n: buffer.format(value).into(),
        })
    }

    /// The shortest decimal that reads back as `value`, for finite values.
    pub fn from_f32(value: f32) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let mut buffer = zmij::Buffer::new();
        Some(BigDecimal {
            n: buffer.format(value).into(),
        })
    }
}

fn split_sign(n: &str) -> (bool, &str) {
    match n.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, n),
    }
}

#[cold]
fn out_of_range() -> Error {
    Error::data(ErrorCode::NumberOutOfRange)
}

#[cold]
fn invalid() -> Error {
    Error::data(ErrorCode::InvalidNumber)
}

/// Length of the JSON number grammar match at the start of `s`:
/// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
fn scan_number(s: &[u8]) -> Option<usize> {
    let mut i = 0;
    if s.first() == Some(&b'-') {
        i += 1;
    }
    match s.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while let Some(b'0'..=b'9') = s.get(i) {
                i += 1;
            }
        }
        _ => return None,
    }
    if s.get(i) == Some(&b'.') {
        i += 1;
        let start = i;
        while let Some(b'0'..=b'9') = s.get(i) {
            i += 1;
        }
        if i == start {
            return None;
        }
    }
    if let Some(b'e' | b'E') = s.get(i) {
        i += 1;
        if let Some(b'+' | b'-') = s.get(i) {
            i += 1;
        }
        let start = i;
        while let Some(b'0'..=b'9') = s.get(i) {
            i += 1;
        }
        if i == start {
            return None;
        }
    }
    Some(i)
}

impl FromStr for BigInteger {
    type Err = Error;

    /// Accepts `-?[0-9]+`. Leading zeros and negative zero are normalized
    /// away.
    fn from_str(s: &str) -> Result<Self> {
        let (negative, digits) = split_sign(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let digits = digits.trim_start_matches('0');
        let n = if digits.is_empty() {
            "0".to_owned()
        } else if negative {
            format!("-{}", digits)
        } else {
            digits.to_owned()
        };
        Ok(BigInteger { n: n.into() })
    }
}

impl FromStr for BigDecimal {
    type Err = Error;

    /// Accepts the JSON number grammar.
    fn from_str(s: &str) -> Result<Self> {
        match scan_number(s.as_bytes()) {
            Some(len) if len == s.len() => Ok(BigDecimal { n: s.into() }),
            _ => Err(invalid()),
        }
    }
}

macro_rules! from_integer {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for BigInteger {
                #[inline]
                fn from(i: $ty) -> Self {
                    let mut buffer = itoa::Buffer::new();
                    BigInteger { n: buffer.format(i).into() }
                }
            }

            impl From<$ty> for BigDecimal {
                #[inline]
                fn from(i: $ty) -> Self {
                    let mut buffer = itoa::Buffer::new();
                    BigDecimal { n: buffer.format(i).into() }
                }
            }
        )*
    };
}

from_integer! {
    i8 i16 i32 i64 i128 isize
    u8 u16 u32 u64 u128 usize
}

impl From<BigInteger> for BigDecimal {
    fn from(i: BigInteger) -> Self {
        BigDecimal { n: i.n }
    }
}

impl Display for BigInteger {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(&self.n)
    }
}

impl Debug for BigInteger {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "BigInteger({})", self.n)
    }
}

impl Display for BigDecimal {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(&self.n)
    }
}

impl Debug for BigDecimal {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "BigDecimal({})", self.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(s: &str) -> BigInteger {
        s.parse().unwrap()
    }

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn integer_normalization() {
        assert_eq!(int("007").as_str(), "7");
        assert_eq!(int("-0").as_str(), "0");
        assert_eq!(int("-00012").as_str(), "-12");
        assert!("".parse::<BigInteger>().is_err());
        assert!("1.5".parse::<BigInteger>().is_err());
        assert!("-".parse::<BigInteger>().is_err());
    }

    #[test]
    fn wrapping_matches_cast() {
        let big = int("18446744073709551617");
        assert_eq!(big.to_i64_wrapping(), 18446744073709551617u128 as i64);
        assert_eq!(int("-5").to_i64_wrapping(), -5);
        assert_eq!(int("9223372036854775808").to_i64(), None);
    }

    #[test]
    fn decimal_grammar() {
        for ok in ["0", "-1", "1.50", "1e10", "-2.5E-3", "123456789012345678901234567890"] {
            assert_eq!(dec(ok).as_str(), ok);
        }
        for bad in ["", "01", "1.", ".5", "1e", "+1", "NaN", "1 "] {
            assert!(bad.parse::<BigDecimal>().is_err(), "{}", bad);
        }
    }

    #[test]
    fn truncation() {
        assert_eq!(dec("12.99").to_big_integer().unwrap(), int("12"));
        assert_eq!(dec("-0.5").to_big_integer().unwrap(), int("0"));
        assert_eq!(dec("1.5e3").to_big_integer().unwrap(), int("1500"));
        assert_eq!(dec("-123e-2").to_big_integer().unwrap(), int("-1"));
        assert_eq!(dec("25e-5").to_big_integer().unwrap(), int("0"));
        assert!(dec("1e1000000").to_big_integer().is_err());
        assert_eq!(BigInteger::from_f64(-3.75).unwrap(), int("-3"));
        assert_eq!(BigInteger::from_f64(1e20).unwrap(), int("100000000000000000000"));
        assert!(BigInteger::from_f64(f64::NAN).is_none());
    }
}
