//! Weighted averages and trailing means.

use std::collections::VecDeque;

use crate::error::{FaunaError, Result};

/// Weighted mean of two values.
///
/// Weights must be finite and non-negative, and must not both be zero.
pub fn average(a: f64, b: f64, weight_a: f64, weight_b: f64) -> Result<f64> {
    for weight in [weight_a, weight_b] {
        if !weight.is_finite() || weight < 0.0 {
            return Err(FaunaError::invalid(
                "average",
                format!("weight {weight} is not a finite non-negative number"),
            ));
        }
    }
    if weight_a + weight_b == 0.0 {
        return Err(FaunaError::invalid("average", "sum of weights is zero"));
    }
    Ok((a * weight_a + b * weight_b) / (weight_a + weight_b))
}

/// Mean over the most recent `count` values.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodAverage {
    count: usize,
    values: VecDeque<f64>,
}

impl PeriodAverage {
    pub fn new(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(FaunaError::invalid(
                "PeriodAverage::new",
                "period length must be at least one value",
            ));
        }
        Ok(Self {
            count,
            values: VecDeque::with_capacity(count),
        })
    }

    pub fn add_value(&mut self, value: f64) {
        if self.values.len() == self.count {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn get_average(&self) -> Result<f64> {
        if self.values.is_empty() {
            return Err(FaunaError::logic(
                "PeriodAverage::get_average() called before any value was added",
            ));
        }
        Ok(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average() {
        assert_eq!(average(1.0, 2.0, 1.0, 1.0).unwrap(), 1.5);
        assert_eq!(average(1.0, 2.0, 0.0, 1.0).unwrap(), 2.0);
        assert!(average(1.0, 2.0, 0.0, 0.0).is_err());
        assert!(average(1.0, 2.0, -1.0, 2.0).is_err());
        assert!(average(1.0, 2.0, f64::NAN, 2.0).is_err());
        assert!(average(1.0, 2.0, f64::INFINITY, 2.0).is_err());
    }

    #[test]
    fn test_period_average_window() {
        assert!(PeriodAverage::new(0).is_err());
        let mut avg = PeriodAverage::new(3).unwrap();
        assert!(avg.get_average().is_err());
        avg.add_value(1.0);
        assert_eq!(avg.get_average().unwrap(), 1.0);
        avg.add_value(2.0);
        avg.add_value(3.0);
        assert_eq!(avg.get_average().unwrap(), 2.0);
        // The oldest value drops out.
        avg.add_value(7.0);
        assert_eq!(avg.get_average().unwrap(), 4.0);
    }
}
