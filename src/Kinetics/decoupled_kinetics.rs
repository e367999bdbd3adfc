//! # Decoupled first-order kinetics
//!
//! Two independent first-order rate laws of a batch reactor:
//!
//! ```text
//! dC/dt = -k1 * C      substrate decay
//! dX/dt =  k2 * X      biomass growth
//! ```
//!
//! Each law is integrated as its own scalar problem. The intended directions
//! (decay, growth) assume `k1 > 0` and `k2 > 0`; the laws themselves do not check
//! the signs, a negative constant simply inverts the behavior.
//!
//! Closed-form solutions `C(t) = C_ini*exp(-k1*t)` and `X(t) = X_ini*exp(k2*t)`
//! are provided for verification of numerical trajectories.
use crate::Kinetics::rate_law::RateLaw;
use crate::ReactorsIVP::reactor_error::ReactorError;
use log::warn;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// dC/dt = -k1*C. Time is accepted for interface uniformity and unused.
pub fn substrate_decay_rate(c: f64, _t: f64, k1: f64) -> f64 {
    -k1 * c
}

/// dX/dt = k2*X. Time is accepted for interface uniformity and unused.
pub fn biomass_growth_rate(x: f64, _t: f64, k2: f64) -> f64 {
    k2 * x
}

/// Parameters and initial concentrations of the decoupled model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoupledParams {
    /// Initial COD in reactor, mg/L as COD
    pub c_ini: f64,
    /// Initial biomass in reactor, mg/L as COD
    pub x_ini: f64,
    /// Substrate decay rate constant, 1/d
    pub k1: f64,
    /// Biomass growth rate constant, 1/d
    pub k2: f64,
}

impl Default for DecoupledParams {
    fn default() -> Self {
        Self {
            c_ini: 10000.0,
            x_ini: 1000.0,
            k1: 2.0,
            k2: 0.2,
        }
    }
}

impl DecoupledParams {
    /// Rejects values that make the model undefined and warns about rate
    /// constants whose sign inverts the intended decay/growth direction.
    pub fn validate(&self) -> Result<(), ReactorError> {
        for (name, value) in [
            ("c_ini", self.c_ini),
            ("x_ini", self.x_ini),
            ("k1", self.k1),
            ("k2", self.k2),
        ] {
            if !value.is_finite() {
                return Err(ReactorError::InvalidParameter(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        if self.c_ini < 0.0 || self.x_ini < 0.0 {
            return Err(ReactorError::InvalidParameter(format!(
                "initial concentrations must be non-negative, got C = {}, X = {}",
                self.c_ini, self.x_ini
            )));
        }
        if self.k1 <= 0.0 {
            warn!("k1 = {} <= 0: substrate will not decay", self.k1);
        }
        if self.k2 <= 0.0 {
            warn!("k2 = {} <= 0: biomass will not grow", self.k2);
        }
        Ok(())
    }

    pub fn analytic_substrate(&self, t: f64) -> f64 {
        self.c_ini * (-self.k1 * t).exp()
    }

    pub fn analytic_biomass(&self, t: f64) -> f64 {
        self.x_ini * (self.k2 * t).exp()
    }

    pub fn substrate_law(&self) -> FirstOrderDecay {
        FirstOrderDecay { k1: self.k1 }
    }

    pub fn biomass_law(&self) -> FirstOrderGrowth {
        FirstOrderGrowth { k2: self.k2 }
    }
}

/// Scalar rate law dC/dt = -k1*C
#[derive(Debug, Clone, PartialEq)]
pub struct FirstOrderDecay {
    pub k1: f64,
}

impl RateLaw for FirstOrderDecay {
    fn arity(&self) -> usize {
        1
    }

    fn labels(&self) -> Vec<String> {
        vec!["C".to_string()]
    }

    fn derivative(&self, t: f64, y: &DVector<f64>) -> Result<DVector<f64>, ReactorError> {
        Ok(DVector::from_element(1, substrate_decay_rate(y[0], t, self.k1)))
    }
}

/// Scalar rate law dX/dt = k2*X
#[derive(Debug, Clone, PartialEq)]
pub struct FirstOrderGrowth {
    pub k2: f64,
}

impl RateLaw for FirstOrderGrowth {
    fn arity(&self) -> usize {
        1
    }

    fn labels(&self) -> Vec<String> {
        vec!["X".to_string()]
    }

    fn derivative(&self, t: f64, y: &DVector<f64>) -> Result<DVector<f64>, ReactorError> {
        Ok(DVector::from_element(1, biomass_growth_rate(y[0], t, self.k2)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rates_ignore_time() {
        assert_eq!(substrate_decay_rate(100.0, 0.0, 2.0), -200.0);
        assert_eq!(substrate_decay_rate(100.0, 7.5, 2.0), -200.0);
        assert_eq!(biomass_growth_rate(1000.0, 0.0, 0.2), 200.0);
        assert_eq!(biomass_growth_rate(1000.0, 3.0, 0.2), 200.0);
    }

    #[test]
    fn test_negative_constant_inverts_direction() {
        assert!(substrate_decay_rate(100.0, 0.0, -1.0) > 0.0);
        assert!(biomass_growth_rate(100.0, 0.0, -1.0) < 0.0);
    }

    #[test]
    fn test_analytic_solution() {
        let params = DecoupledParams::default();
        assert_relative_eq!(params.analytic_substrate(1.0), 1353.352832366127, epsilon = 1e-9);
        assert_relative_eq!(params.analytic_biomass(0.0), 1000.0);
        assert_relative_eq!(params.analytic_biomass(5.0), 1000.0 * 1.0_f64.exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_validate() {
        assert!(DecoupledParams::default().validate().is_ok());
        // sign inversion only warns
        let inverted = DecoupledParams {
            k1: -1.0,
            ..Default::default()
        };
        assert!(inverted.validate().is_ok());
        let negative = DecoupledParams {
            c_ini: -5.0,
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ReactorError::InvalidParameter(_))
        ));
        let nan = DecoupledParams {
            k2: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_laws_from_params() {
        let params = DecoupledParams::default();
        let y = DVector::from_vec(vec![10.0]);
        assert_eq!(params.substrate_law().derivative(0.0, &y).unwrap()[0], -20.0);
        assert_eq!(params.biomass_law().derivative(0.0, &y).unwrap()[0], 2.0);
        assert_eq!(params.substrate_law().labels(), vec!["C".to_string()]);
    }
}
