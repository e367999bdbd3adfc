//! # Rate law interface
//!
//! Every kinetic model of the crate is a pure map `(t, y) -> dy/dt`. The
//! [`RateLaw`] trait is the seam between the kinetic models and the integration
//! driver; [`KineticModel`] collects the concrete models behind a single type so
//! that tasks and configuration files can choose a model at runtime.
use crate::Kinetics::decoupled_kinetics::{FirstOrderDecay, FirstOrderGrowth};
use crate::Kinetics::monod_kinetics::MonodKinetics;
use crate::ReactorsIVP::reactor_error::ReactorError;
use enum_dispatch::enum_dispatch;
use nalgebra::DVector;

/// Right-hand side of an ODE system `dy/dt = f(t, y)`.
///
/// Implementations must be free of side effects: the same `(t, y)` always gives
/// the same derivative. A rate law evaluated outside of its mathematical domain
/// returns [`ReactorError::DegenerateRateLaw`].
#[enum_dispatch]
pub trait RateLaw {
    /// Number of state components the law operates on.
    fn arity(&self) -> usize;

    /// Labels of the state components, in state order.
    fn labels(&self) -> Vec<String>;

    fn derivative(&self, t: f64, y: &DVector<f64>) -> Result<DVector<f64>, ReactorError>;
}

/// Kinetic models available to the batch reactor tasks.
#[enum_dispatch(RateLaw)]
#[derive(Debug, Clone, PartialEq)]
pub enum KineticModel {
    FirstOrderDecay,
    FirstOrderGrowth,
    MonodKinetics,
}

impl KineticModel {
    pub fn name(&self) -> &'static str {
        match self {
            KineticModel::FirstOrderDecay(_) => "first-order substrate decay",
            KineticModel::FirstOrderGrowth(_) => "first-order biomass growth",
            KineticModel::MonodKinetics(_) => "Monod substrate-limited growth",
        }
    }
}
