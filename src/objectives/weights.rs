//! Objective weight configuration.
//!
//! [`ObjectiveWeights`] holds the five weights that blend the sub-objective
//! scores into one fitness value. The weights must be non-negative and sum
//! to 1.0 ± 0.01, enforced at construction and never afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Weights for the five placement objectives.
///
/// # Examples
///
/// ```
/// use site_layout::ObjectiveWeights;
///
/// let weights = ObjectiveWeights::new(0.25, 0.20, 0.20, 0.20, 0.15).unwrap();
/// assert!((weights.sum() - 1.0).abs() < 0.01);
///
/// // Negative or badly scaled weights fail construction.
/// assert!(ObjectiveWeights::new(0.5, 0.5, 0.5, 0.5, 0.5).is_err());
/// assert!(ObjectiveWeights::new(-0.1, 0.4, 0.3, 0.2, 0.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    pub cut_fill: f64,
    pub accessibility: f64,
    pub road_length: f64,
    pub compactness: f64,
    pub slope_variance: f64,
}

impl ObjectiveWeights {
    /// Builds a weight vector, validating non-negativity and the sum.
    ///
    /// # Errors
    /// Returns [`Error::InvalidWeights`] when any weight is negative or the
    /// sum deviates from 1.0 by more than [`WEIGHT_SUM_TOLERANCE`].
    pub fn new(
        cut_fill: f64,
        accessibility: f64,
        road_length: f64,
        compactness: f64,
        slope_variance: f64,
    ) -> Result<Self> {
        let weights = Self {
            cut_fill,
            accessibility,
            road_length,
            compactness,
            slope_variance,
        };
        if weights.as_array().iter().any(|&w| w < 0.0) {
            return Err(Error::InvalidWeights(format!(
                "all weights must be non-negative, got {weights:?}"
            )));
        }
        let sum = weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidWeights(format!(
                "weights must sum to 1.0 ± {WEIGHT_SUM_TOLERANCE}, got {sum}"
            )));
        }
        Ok(weights)
    }

    /// Builds a weight vector by normalizing non-negative raw values.
    ///
    /// # Errors
    /// Returns [`Error::InvalidWeights`] when a value is negative or the
    /// raw sum is zero.
    pub fn normalized(
        cut_fill: f64,
        accessibility: f64,
        road_length: f64,
        compactness: f64,
        slope_variance: f64,
    ) -> Result<Self> {
        let sum = cut_fill + accessibility + road_length + compactness + slope_variance;
        if sum <= 0.0 {
            return Err(Error::InvalidWeights(
                "raw weights must have a positive sum".into(),
            ));
        }
        Self::new(
            cut_fill / sum,
            accessibility / sum,
            road_length / sum,
            compactness / sum,
            slope_variance / sum,
        )
    }

    /// Balanced default: 0.25 / 0.20 / 0.20 / 0.20 / 0.15.
    pub fn balanced() -> Self {
        Self {
            cut_fill: 0.25,
            accessibility: 0.20,
            road_length: 0.20,
            compactness: 0.20,
            slope_variance: 0.15,
        }
    }

    /// The weights in declaration order.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.cut_fill,
            self.accessibility,
            self.road_length,
            self.compactness,
            self.slope_variance,
        ]
    }

    /// Sum of all five weights.
    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self::balanced()
    }
}
