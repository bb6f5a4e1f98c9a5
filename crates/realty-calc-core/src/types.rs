use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.065 = 6.5%). Never as percentages.
pub type Rate = Decimal;

/// A figure carried in the three scenario columns of the calculator:
/// pessimistic (`min`), optimistic (`max`) and their average (`avg`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinMaxAvg<T = Money> {
    pub min: T,
    pub max: T,
    pub avg: T,
}

impl<T> MinMaxAvg<T> {
    pub fn new(min: T, max: T, avg: T) -> Self {
        Self { min, max, avg }
    }

    /// Apply `f` to each column.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> MinMaxAvg<U> {
        MinMaxAvg {
            min: f(self.min),
            max: f(self.max),
            avg: f(self.avg),
        }
    }

    /// Combine two triples column by column.
    pub fn zip_with<U, V>(self, other: MinMaxAvg<U>, mut f: impl FnMut(T, U) -> V) -> MinMaxAvg<V> {
        MinMaxAvg {
            min: f(self.min, other.min),
            max: f(self.max, other.max),
            avg: f(self.avg, other.avg),
        }
    }
}

impl MinMaxAvg<Money> {
    /// Build from min/max with the average taken as their midpoint.
    pub fn from_range(min: Money, max: Money) -> Self {
        Self {
            min,
            max,
            avg: (min + max) / dec!(2),
        }
    }

    /// Column-wise sum, `None` if any column overflows.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self {
            min: self.min.checked_add(rhs.min)?,
            max: self.max.checked_add(rhs.max)?,
            avg: self.avg.checked_add(rhs.avg)?,
        })
    }

    pub fn splat(value: Money) -> Self {
        Self {
            min: value,
            max: value,
            avg: value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.min.is_zero() && self.max.is_zero() && self.avg.is_zero()
    }
}

impl std::ops::Add for MinMaxAvg<Money> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl std::ops::AddAssign for MinMaxAvg<Money> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
