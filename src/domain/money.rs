use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Balances whose magnitude does not exceed this are treated as settled.
///
/// Half a minor currency unit: it absorbs residual rounding, nothing more.
pub const EPSILON: Money = Money(Decimal::from_parts(5, 0, 0, false, 1));

/// A monetary value in the project's single currency.
///
/// Wraps `rust_decimal::Decimal` so that splitting an expense and summing the
/// parts back together is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const ONE: Self = Self(Decimal::ONE);
    pub const ONE_HUNDRED: Self = Self(Decimal::ONE_HUNDRED);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn round_dp(self, dp: u32) -> Self {
        Self(self.0.round_dp(dp))
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        self.0.checked_mul(rhs.0).map(Self)
    }

    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.0.checked_div(rhs.0).map(Self)
    }

    /// Adds, clamping to the representable range on overflow.
    pub fn saturating_add(self, rhs: Self) -> Self {
        self.checked_add(rhs).unwrap_or_else(|| {
            tracing::warn!(
                lhs = %self,
                rhs = %rhs,
                "amount overflowed, clamped to the representable range"
            );
            Self(self.0.saturating_add(rhs.0))
        })
    }

    /// Subtracts, clamping to the representable range on overflow.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        self.checked_sub(rhs).unwrap_or_else(|| {
            tracing::warn!(
                lhs = %self,
                rhs = %rhs,
                "amount overflowed, clamped to the representable range"
            );
            Self(self.0.saturating_sub(rhs.0))
        })
    }

    /// Whether this amount is far enough from zero to be worth moving.
    pub fn is_significant(&self) -> bool {
        self.abs() > EPSILON
    }

    /// Coerces a float into money, mapping NaN and infinities to zero.
    pub fn from_f64_lossy(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        // Display yields the shortest round-tripping form, so 0.1 stays 0.1.
        Decimal::from_str(&value.to_string())
            .ok()
            .or_else(|| Decimal::from_f64(value))
            .map(Self)
            .unwrap_or_else(|| {
                tracing::warn!(value, "amount is out of range, treated as zero");
                Self::ZERO
            })
    }

    /// Parses user-entered text, mapping anything non-numeric to zero.
    pub fn parse_lossy(text: &str) -> Self {
        let text = text.trim();
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map(Self)
            .unwrap_or_else(|_| match text.parse::<f64>() {
                Ok(value) => Self::from_f64_lossy(value),
                Err(_) => Self::ZERO,
            })
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Money {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Div for Money {
    type Output = Self;
    fn div(self, rhs: Self) -> Self::Output {
        Self(self.0 / rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// Written back as a plain JSON number; whole amounts stay integers so that
// exported files look like the ones the ledger was loaded from.
impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = self.0.normalize();
        if value.fract().is_zero()
            && let Some(whole) = value.to_i64()
        {
            return serializer.serialize_i64(whole);
        }
        match value.to_f64() {
            Some(float) => serializer.serialize_f64(float),
            None => serializer.serialize_str(&value.to_string()),
        }
    }
}

struct LenientMoneyVisitor;

impl<'de> Visitor<'de> for LenientMoneyVisitor {
    type Value = Money;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number, a numeric string or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        Ok(Money(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Ok(Money::from_f64_lossy(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Ok(Money::parse_lossy(v))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

/// Never fails on a scalar: malformed amounts become zero.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientMoneyVisitor)
    }
}

/// Per-share rounding rule configured on a project.
///
/// Unrecognised rule strings are kept verbatim in `Other` so they survive an
/// export, and behave like `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoundingRule {
    #[default]
    None,
    Round10,
    Round100,
    Floor10,
    Floor100,
    Ceil10,
    Ceil100,
    Other(String),
}

impl RoundingRule {
    /// Rounds a single member's share according to this rule.
    pub fn apply(&self, value: Money) -> Money {
        let (unit, step): (i64, fn(Decimal) -> Decimal) = match self {
            RoundingRule::None | RoundingRule::Other(_) => return value,
            RoundingRule::Round10 => (10, round_half_up),
            RoundingRule::Round100 => (100, round_half_up),
            RoundingRule::Floor10 => (10, round_down),
            RoundingRule::Floor100 => (100, round_down),
            RoundingRule::Ceil10 => (10, round_up),
            RoundingRule::Ceil100 => (100, round_up),
        };
        let unit = Decimal::from(unit);
        step(value.0 / unit)
            .checked_mul(unit)
            .map(Money)
            .unwrap_or(value)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoundingRule::None => "NONE",
            RoundingRule::Round10 => "ROUND_10",
            RoundingRule::Round100 => "ROUND_100",
            RoundingRule::Floor10 => "FLOOR_10",
            RoundingRule::Floor100 => "FLOOR_100",
            RoundingRule::Ceil10 => "CEIL_10",
            RoundingRule::Ceil100 => "CEIL_100",
            RoundingRule::Other(raw) => raw,
        }
    }
}

/// Halves go toward positive infinity.
fn round_half_up(value: Decimal) -> Decimal {
    value
        .checked_add(Decimal::new(5, 1))
        .unwrap_or(value)
        .floor()
}

fn round_down(value: Decimal) -> Decimal {
    value.floor()
}

fn round_up(value: Decimal) -> Decimal {
    value.ceil()
}

impl From<String> for RoundingRule {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "NONE" => RoundingRule::None,
            "ROUND_10" => RoundingRule::Round10,
            "ROUND_100" => RoundingRule::Round100,
            "FLOOR_10" => RoundingRule::Floor10,
            "FLOOR_100" => RoundingRule::Floor100,
            "CEIL_10" => RoundingRule::Ceil10,
            "CEIL_100" => RoundingRule::Ceil100,
            _ => RoundingRule::Other(raw),
        }
    }
}

impl From<RoundingRule> for String {
    fn from(rule: RoundingRule) -> Self {
        match rule {
            RoundingRule::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RoundingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats an amount for display: whole units with thousands separators,
/// prefixed by the currency symbol (`¥1,200`, `¥-50`).
pub fn format_money(amount: Money, symbol: &str) -> String {
    let whole = round_half_up(amount.0);
    let digits = whole.abs().normalize().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if whole.is_sign_negative() && !whole.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{symbol}{sign}{grouped}")
}
