//! Immutable forecast inputs.
//!
//! Every type here is a plain value: constructed once, compared by value,
//! never mutated. The checked constructors enforce the invariants that the
//! math kernels assume.

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Omori-Utsu / Gutenberg-Richter parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelParameters {
    /// Productivity (log10 scale).
    pub a: f64,
    /// Gutenberg-Richter slope.
    pub b: f64,
    /// Omori time offset in days; must be positive.
    pub c: f64,
    /// Omori decay exponent.
    pub p: f64,
}

impl ModelParameters {
    /// Create a parameter set, rejecting non-finite values and `c <= 0`.
    pub fn new(a: f64, b: f64, c: f64, p: f64) -> Result<Self> {
        let params = Self { a, b, c, p };
        params.validate()?;
        Ok(params)
    }

    /// Check the hard invariants (finite values, `c > 0`).
    ///
    /// Plausibility bounds are advisory and live in the config validator.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.fields() {
            if !value.is_finite() {
                return Err(Error::invalid_input(
                    name,
                    format!("must be finite, got {}", value),
                ));
            }
        }
        if self.c <= 0.0 {
            return Err(Error::invalid_input(
                "c",
                format!("Omori time offset must be positive, got {}", self.c),
            ));
        }
        Ok(())
    }

    /// Named fields in declaration order.
    pub fn fields(&self) -> [(&'static str, f64); 4] {
        [("a", self.a), ("b", self.b), ("c", self.c), ("p", self.p)]
    }
}

impl fmt::Display for ModelParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a={}, b={}, c={}, p={}", self.a, self.b, self.c, self.p)
    }
}

/// Three strictly decreasing magnitude thresholds `m1 > m2 > m3`.
///
/// Deserialization goes through [`MagnitudeThresholds::new`], so a decoded
/// value always satisfies the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawThresholds")]
pub struct MagnitudeThresholds {
    m1: f64,
    m2: f64,
    m3: f64,
}

/// Unchecked wire form of [`MagnitudeThresholds`].
#[derive(Deserialize, JsonSchema)]
struct RawThresholds {
    m1: f64,
    m2: f64,
    m3: f64,
}

impl TryFrom<RawThresholds> for MagnitudeThresholds {
    type Error = Error;

    fn try_from(raw: RawThresholds) -> Result<Self> {
        Self::new(raw.m1, raw.m2, raw.m3)
    }
}

impl MagnitudeThresholds {
    /// Create thresholds, requiring finite values with `m1 > m2 > m3`.
    pub fn new(m1: f64, m2: f64, m3: f64) -> Result<Self> {
        let thresholds = Self { m1, m2, m3 };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Re-check ordering, e.g. after deserialization.
    pub fn validate(&self) -> Result<()> {
        let all_finite = self.m1.is_finite() && self.m2.is_finite() && self.m3.is_finite();
        if !all_finite || self.m1 <= self.m2 || self.m2 <= self.m3 {
            return Err(Error::ThresholdOrder {
                m1: self.m1,
                m2: self.m2,
                m3: self.m3,
            });
        }
        Ok(())
    }

    pub fn m1(&self) -> f64 {
        self.m1
    }

    pub fn m2(&self) -> f64 {
        self.m2
    }

    pub fn m3(&self) -> f64 {
        self.m3
    }

    /// Thresholds from highest to lowest.
    pub fn as_array(&self) -> [f64; 3] {
        [self.m1, self.m2, self.m3]
    }

    /// The three bands in display order: `M1+`, `M2-M1`, `M3-M2`.
    pub fn bands(&self) -> [MagnitudeBand; 3] {
        [
            MagnitudeBand::open(self.m1),
            MagnitudeBand::between(self.m2, self.m1),
            MagnitudeBand::between(self.m3, self.m2),
        ]
    }
}

impl TryFrom<[f64; 3]> for MagnitudeThresholds {
    type Error = Error;

    fn try_from(values: [f64; 3]) -> Result<Self> {
        Self::new(values[0], values[1], values[2])
    }
}

/// A half-open magnitude interval `[lower, upper)`; no upper bound for the top band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MagnitudeBand {
    pub lower: f64,
    pub upper: Option<f64>,
}

impl MagnitudeBand {
    /// Everything at or above `lower`.
    pub fn open(lower: f64) -> Self {
        Self { lower, upper: None }
    }

    /// `[lower, upper)`.
    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper: Some(upper),
        }
    }

    /// Short label such as `M5+` or `M4-5`.
    pub fn label(&self) -> String {
        match self.upper {
            None => format!("M{}+", self.lower),
            Some(upper) => format!("M{}-{}", self.lower, upper),
        }
    }
}

impl fmt::Display for MagnitudeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Forecast window in days since the main shock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawWindow")]
pub struct ForecastWindow {
    range_start: f64,
    duration: f64,
}

/// Unchecked wire form of [`ForecastWindow`].
#[derive(Deserialize, JsonSchema)]
struct RawWindow {
    range_start: f64,
    duration: f64,
}

impl TryFrom<RawWindow> for ForecastWindow {
    type Error = Error;

    fn try_from(raw: RawWindow) -> Result<Self> {
        Self::new(raw.range_start, raw.duration)
    }
}

impl ForecastWindow {
    /// Create a window; `range_start >= 0` and `duration > 0`, both finite.
    pub fn new(range_start: f64, duration: f64) -> Result<Self> {
        if !range_start.is_finite() || range_start < 0.0 {
            return Err(Error::invalid_input(
                "range_start",
                format!(
                    "forecast cannot start before the main shock, got {} days",
                    range_start
                ),
            ));
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(Error::invalid_input(
                "duration",
                format!("must be positive, got {}", duration),
            ));
        }
        Ok(Self {
            range_start,
            duration,
        })
    }

    pub fn range_start(&self) -> f64 {
        self.range_start
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn range_end(&self) -> f64 {
        self.range_start + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_reject_non_positive_c() {
        assert!(ModelParameters::new(-1.59, 1.03, 0.04, 1.07).is_ok());
        let err = ModelParameters::new(-1.59, 1.03, 0.0, 1.07).unwrap_err();
        assert!(err.to_string().contains("c"));
        assert!(ModelParameters::new(-1.59, 1.03, -0.1, 1.07).is_err());
    }

    #[test]
    fn test_parameters_reject_nan() {
        assert!(ModelParameters::new(f64::NAN, 1.0, 0.05, 1.1).is_err());
        assert!(ModelParameters::new(-2.0, 1.0, 0.05, f64::INFINITY).is_err());
    }

    #[test]
    fn test_thresholds_require_strict_order() {
        assert!(MagnitudeThresholds::new(5.0, 4.0, 3.0).is_ok());
        assert!(matches!(
            MagnitudeThresholds::new(5.0, 5.0, 3.0),
            Err(Error::ThresholdOrder { .. })
        ));
        assert!(MagnitudeThresholds::new(3.0, 4.0, 5.0).is_err());
        assert!(MagnitudeThresholds::new(5.0, f64::NAN, 3.0).is_err());
    }

    #[test]
    fn test_thresholds_try_from_array() {
        let t = MagnitudeThresholds::try_from([6.0, 5.0, 4.0]).unwrap();
        assert_eq!(t.as_array(), [6.0, 5.0, 4.0]);
        assert!(MagnitudeThresholds::try_from([4.0, 5.0, 6.0]).is_err());
    }

    #[test]
    fn test_band_labels() {
        let t = MagnitudeThresholds::new(5.0, 4.0, 3.0).unwrap();
        let labels: Vec<String> = t.bands().iter().map(|b| b.label()).collect();
        assert_eq!(labels, vec!["M5+", "M4-5", "M3-4"]);

        let half = MagnitudeBand::between(4.5, 5.5);
        assert_eq!(half.to_string(), "M4.5-5.5");
    }

    #[test]
    fn test_window_bounds() {
        let w = ForecastWindow::new(0.5, 7.0).unwrap();
        assert_eq!(w.range_end(), 7.5);
        assert!(ForecastWindow::new(0.0, 0.0).is_err());
        assert!(ForecastWindow::new(0.0, -1.0).is_err());
        assert!(ForecastWindow::new(-1.0, 1.0).is_err());
        assert!(ForecastWindow::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_thresholds_deserialize_through_constructor() {
        let t: MagnitudeThresholds =
            serde_json::from_str(r#"{"m1":6.0,"m2":5.0,"m3":4.0}"#).unwrap();
        assert_eq!(t.as_array(), [6.0, 5.0, 4.0]);

        let err = serde_json::from_str::<MagnitudeThresholds>(r#"{"m1":3,"m2":4,"m3":5}"#)
            .unwrap_err();
        assert!(err.to_string().contains("strictly decreasing"));
        assert!(serde_json::from_str::<MagnitudeThresholds>(r#"{"m1":5,"m2":5,"m3":3}"#).is_err());
    }

    #[test]
    fn test_window_deserialize_through_constructor() {
        let w: ForecastWindow =
            serde_json::from_str(r#"{"range_start":0.5,"duration":7.0}"#).unwrap();
        assert_eq!(w.range_end(), 7.5);

        let err = serde_json::from_str::<ForecastWindow>(r#"{"range_start":-1.0,"duration":-5.0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("range_start"));
        assert!(
            serde_json::from_str::<ForecastWindow>(r#"{"range_start":0.0,"duration":0.0}"#)
                .is_err()
        );
    }

    #[test]
    fn test_parameters_roundtrip_json() {
        let params = ModelParameters::new(-1.67, 0.91, 0.05, 1.08).unwrap();
        let json = serde_json::to_string(&params).unwrap();
        let back: ModelParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }
}
