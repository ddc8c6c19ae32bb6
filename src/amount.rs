use std::fmt;

/// Fixed-point currency amount with 2 decimal places, stored in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 100;

    /// Out-of-range values saturate; use [`Amount::try_from_float`] to reject them.
    pub fn from_float(value: f64) -> Self {
        Amount((value * Self::SCALE as f64).round() as i64)
    }

    /// `None` when `value` is not finite or its minor units don't fit in an `i64`.
    pub fn try_from_float(value: f64) -> Option<Self> {
        let minor = (value * Self::SCALE as f64).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        (minor.is_finite() && minor >= i64::MIN as f64 && minor < i64::MAX as f64)
            .then_some(Amount(minor as i64))
    }

    pub fn from_minor(value: i64) -> Self {
        Amount(value)
    }

    pub fn from_whole(value: i64) -> Self {
        Amount(value * Self::SCALE)
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Round up to the next whole currency unit, saturating at the largest
    /// representable amount.
    pub fn ceil(&self) -> Self {
        let whole = self.0.div_euclid(Self::SCALE);
        let bump = i64::from(self.0.rem_euclid(Self::SCALE) != 0);
        Amount((whole + bump).saturating_mul(Self::SCALE))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / Self::SCALE;
        let frac = abs % Self::SCALE;
        write!(f, "{sign}{whole}.{frac:02}")
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::default(), |acc, amount| acc + amount)
    }
}
