//! # Coupled Monod kinetics
//!
//! Substrate-limited growth of heterotrophic biomass in a batch reactor. The
//! state is `[S, X]` and both components are integrated jointly:
//!
//! ```text
//! sigma(S) = S / (K_s + S)
//! dS/dt    = -(mu_max / Y) * sigma(S) * X
//! dX/dt    = (mu_max * sigma(S) - b) * X
//! ```
//!
//! As `S -> 0` growth vanishes and biomass decays at the rate `b`; as `S -> inf`
//! the specific growth rate caps at `mu_max`.
//!
//! `sigma` is undefined when `K_s + S <= 0`, which can only happen for negative
//! substrate. The rate law reports that branch as
//! [`ReactorError::DegenerateRateLaw`] instead of dividing.
use crate::Kinetics::rate_law::RateLaw;
use crate::ReactorsIVP::reactor_error::ReactorError;
use log::warn;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Kinetic parameters of the Monod model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonodParams {
    /// Maximum specific growth rate of heterotrophic microorganisms, 1/d
    pub mu_max: f64,
    /// Specific decay rate of heterotrophic microorganisms, 1/d
    pub b: f64,
    /// Half saturation constant, mg/L as COD
    pub k_s: f64,
    /// Yield constant, g COD / g COD
    pub y: f64,
}

impl Default for MonodParams {
    fn default() -> Self {
        Self {
            mu_max: 4.0,
            b: 0.2,
            k_s: 10.0,
            y: 0.63,
        }
    }
}

impl MonodParams {
    pub fn with_mu_max(&self, mu_max: f64) -> Self {
        Self {
            mu_max,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ReactorError> {
        for (name, value) in [
            ("mu_max", self.mu_max),
            ("b", self.b),
            ("k_s", self.k_s),
            ("y", self.y),
        ] {
            if !value.is_finite() {
                return Err(ReactorError::InvalidParameter(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        if self.y <= 0.0 {
            return Err(ReactorError::InvalidParameter(format!(
                "yield coefficient Y must be positive, got {}",
                self.y
            )));
        }
        if self.k_s < 0.0 {
            return Err(ReactorError::InvalidParameter(format!(
                "half saturation constant K_s must be non-negative, got {}",
                self.k_s
            )));
        }
        if self.mu_max <= 0.0 {
            warn!("mu_max = {} <= 0: biomass cannot grow", self.mu_max);
        }
        if self.b < 0.0 {
            warn!("b = {} < 0: decay term acts as growth", self.b);
        }
        Ok(())
    }
}

/// sigma(S) = S/(K_s + S). `None` when the denominator is not positive.
pub fn saturation(s: f64, k_s: f64) -> Option<f64> {
    let denominator = k_s + s;
    if denominator > 0.0 {
        Some(s / denominator)
    } else {
        None
    }
}

/// Returns (dS/dt, dX/dt)
pub fn monod_rates(s: f64, x: f64, t: f64, params: &MonodParams) -> Result<(f64, f64), ReactorError> {
    let sigma = saturation(s, params.k_s).ok_or_else(|| ReactorError::DegenerateRateLaw {
        t,
        reason: format!(
            "K_s + S = {} + {} is not positive",
            params.k_s, s
        ),
    })?;
    let ds_dt = -(params.mu_max / params.y) * sigma * x;
    let dx_dt = (params.mu_max * sigma - params.b) * x;
    if !ds_dt.is_finite() || !dx_dt.is_finite() {
        return Err(ReactorError::DegenerateRateLaw {
            t,
            reason: format!("non-finite derivative at S = {}, X = {}", s, x),
        });
    }
    Ok((ds_dt, dx_dt))
}

/// Joint rate law for the state [S, X]
#[derive(Debug, Clone, PartialEq)]
pub struct MonodKinetics {
    pub params: MonodParams,
}

impl MonodKinetics {
    pub fn new(params: MonodParams) -> Self {
        Self { params }
    }
}

impl RateLaw for MonodKinetics {
    fn arity(&self) -> usize {
        2
    }

    fn labels(&self) -> Vec<String> {
        vec!["S".to_string(), "X".to_string()]
    }

    fn derivative(&self, t: f64, y: &DVector<f64>) -> Result<DVector<f64>, ReactorError> {
        let (ds_dt, dx_dt) = monod_rates(y[0], y[1], t, &self.params)?;
        Ok(DVector::from_vec(vec![ds_dt, dx_dt]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_saturation_limits() {
        assert_eq!(saturation(0.0, 10.0), Some(0.0));
        assert_relative_eq!(saturation(10.0, 10.0).unwrap(), 0.5);
        assert!(saturation(1e12, 10.0).unwrap() > 0.999_999_999);
        assert_eq!(saturation(-10.0, 10.0), None);
        assert_eq!(saturation(-20.0, 10.0), None);
    }

    #[test]
    fn test_zero_substrate_is_pure_decay() {
        let params = MonodParams {
            b: 0.2,
            ..Default::default()
        };
        let (ds, dx) = monod_rates(0.0, 1000.0, 0.0, &params).unwrap();
        assert_eq!(ds, 0.0);
        assert_relative_eq!(dx, -200.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reference_point() {
        let params = MonodParams::default();
        let (ds, dx) = monod_rates(10000.0, 1000.0, 0.0, &params).unwrap();
        let sigma = 10000.0 / 10010.0;
        assert_relative_eq!(ds, -(4.0 / 0.63) * sigma * 1000.0, epsilon = 1e-9);
        assert_relative_eq!(dx, (4.0 * sigma - 0.2) * 1000.0, epsilon = 1e-9);
        assert!(ds < 0.0);
        assert!(dx > 0.0);
    }

    #[test]
    fn test_degenerate_branch_is_reported() {
        let law = MonodKinetics::new(MonodParams::default());
        let result = law.derivative(1.5, &DVector::from_vec(vec![-10.0, 1000.0]));
        match result {
            Err(ReactorError::DegenerateRateLaw { t, .. }) => assert_eq!(t, 1.5),
            other => panic!("expected degenerate rate law, got {:?}", other),
        }
    }

    #[test]
    fn test_validate() {
        assert!(MonodParams::default().validate().is_ok());
        assert!(MonodParams::default().with_mu_max(0.5).validate().is_ok());
        let bad_yield = MonodParams {
            y: 0.0,
            ..Default::default()
        };
        assert!(bad_yield.validate().is_err());
        let bad_ks = MonodParams {
            k_s: -1.0,
            ..Default::default()
        };
        assert!(bad_ks.validate().is_err());
    }

    #[test]
    fn test_with_mu_max_keeps_other_parameters() {
        let base = MonodParams::default();
        let changed = base.with_mu_max(0.5);
        assert_eq!(changed.mu_max, 0.5);
        assert_eq!(changed.b, base.b);
        assert_eq!(changed.k_s, base.k_s);
        assert_eq!(changed.y, base.y);
    }
}
