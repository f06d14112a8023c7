//! Scalar value and reward primitives

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Estimated value of an action or a state
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(pub f64);

impl Value {
    pub const ZERO: Value = Value(0.0);

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Inverse of the value, ie. `1 / v`
    pub fn inverse(self) -> Value {
        Value(1.0 / self.0)
    }

    /// Convert a visit count into a value, typically to build a `1 / n` step size
    pub fn from_count(n: u64) -> Value {
        Value(n as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value(v)
    }
}

impl From<Value> for f64 {
    fn from(v: Value) -> Self {
        v.0
    }
}

impl From<Reward> for Value {
    fn from(r: Reward) -> Self {
        Value(r.0)
    }
}

impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        Value(self.0 + rhs.0)
    }
}

impl AddAssign for Value {
    fn add_assign(&mut self, rhs: Value) {
        self.0 += rhs.0;
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Value) -> Value {
        Value(self.0 - rhs.0)
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, rhs: Value) -> Value {
        Value(self.0 * rhs.0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reward signal returned by a transition
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reward(pub f64);

impl Reward {
    pub fn as_f64(self) -> f64 {
        self.0
    }

    pub fn to_value(self) -> Value {
        Value(self.0)
    }
}

impl From<f64> for Reward {
    fn from(r: f64) -> Self {
        Reward(r)
    }
}

impl From<Reward> for f64 {
    fn from(r: Reward) -> Self {
        r.0
    }
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
