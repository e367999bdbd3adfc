//! # Integration driver
//!
//! Advances a [`RateLaw`] over a [`TimeGrid`] and returns one state per grid point.
//!
//! ## Method
//! Dormand–Prince 5(4) from `ode_solvers` with dense output every grid step. The
//! solver runs in local time `t - start`, the rate law always sees absolute time.
//! - the grid points before the last one come from the continuous extension of the
//!   accepted steps
//! - the last grid point is the state of the final accepted step
//! - a rate law that fails inside a trial stage fills the stage with NaN, which the
//!   error estimate turns into a rejected step with a smaller `h`
//!
//! ## Failure
//! Every failure is reported as [`ReactorError::NumericalConvergence`] starting at
//! the time the solver stopped:
//! - step budget (`max_steps`) exhausted
//! - step size underflow, with the last rate law failure as the cause
//! - stiffness detected (only when `stiffness_test_interval` is set)
//! - wall-clock budget (`max_wall_time_secs`) exceeded
//!
//! No partial trajectory is ever returned.
//!
//! ## Example
//! ```rust, ignore
//! let law = FirstOrderDecay { k1: 2.0 };
//! let grid = TimeGrid::new(0.0, 5.0, 1001)?;
//! let traj = integrate(&law, &DVector::from_vec(vec![10000.0]), &grid, &SolverOptions::default())?;
//! ```
use crate::Kinetics::rate_law::RateLaw;
use crate::ReactorsIVP::reactor_error::ReactorError;
use crate::ReactorsIVP::time_grid::TimeGrid;
use crate::ReactorsIVP::trajectory::Trajectory;
use log::debug;
use nalgebra::DVector;
use ode_solvers::dop_shared::{IntegrationError, OutputType, System};
use ode_solvers::dopri5::Dopri5;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::time::Instant;

/// state vector type of the ode_solvers stepper
type SolverState = ode_solvers::DVector<f64>;

// step size controller of the stepper, Hairer's defaults
const SAFETY: f64 = 0.9;
const BETA: f64 = 0.04;
const FAC_MIN: f64 = 0.2;
const FAC_MAX: f64 = 10.0;

/// Accuracy and budget settings of the integration driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// relative tolerance
    pub rtol: f64,
    /// absolute tolerance
    pub atol: f64,
    /// first trial step; estimated from the rate law when `None`
    pub first_step: Option<f64>,
    /// upper bound of the internal step; the grid span when `None`
    pub max_step: Option<f64>,
    /// budget of attempted steps (accepted + rejected)
    pub max_steps: usize,
    /// accepted steps between two stiffness tests; no test when `None`
    pub stiffness_test_interval: Option<u32>,
    pub max_wall_time_secs: Option<f64>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-8,
            first_step: None,
            max_step: None,
            max_steps: 500_000,
            stiffness_test_interval: None,
            max_wall_time_secs: None,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<(), ReactorError> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(ReactorError::InvalidParameter(format!(
                "rtol must be finite and > 0, got {}",
                self.rtol
            )));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(ReactorError::InvalidParameter(format!(
                "atol must be finite and > 0, got {}",
                self.atol
            )));
        }
        if let Some(h) = self.first_step {
            if !h.is_finite() || h <= 0.0 {
                return Err(ReactorError::InvalidParameter(format!(
                    "first_step must be finite and > 0, got {}",
                    h
                )));
            }
        }
        if let Some(h) = self.max_step {
            if h.is_nan() || h <= 0.0 {
                return Err(ReactorError::InvalidParameter(format!(
                    "max_step must be > 0, got {}",
                    h
                )));
            }
        }
        if self.max_steps == 0 {
            return Err(ReactorError::InvalidParameter(
                "max_steps must be > 0".to_string(),
            ));
        }
        if self.stiffness_test_interval == Some(0) {
            return Err(ReactorError::InvalidParameter(
                "stiffness_test_interval must be > 0".to_string(),
            ));
        }
        if let Some(secs) = self.max_wall_time_secs {
            if secs.is_nan() || secs <= 0.0 {
                return Err(ReactorError::InvalidParameter(format!(
                    "max_wall_time_secs must be > 0, got {}",
                    secs
                )));
            }
        }
        Ok(())
    }
}

/// What the stepper callbacks saw during one run
#[derive(Default)]
struct RunRecord {
    /// most recent rate law failure in a trial stage
    failure: Option<ReactorError>,
    /// local time and state of the last accepted step
    last_accepted: Option<(f64, Vec<f64>)>,
    /// local time at which the wall-clock budget ran out
    timed_out_at: Option<f64>,
}

/// Adapts a [`RateLaw`] to the `ode_solvers` system interface
struct LawSystem<'a, R: RateLaw + ?Sized> {
    law: &'a R,
    t0: f64,
    record: &'a RefCell<RunRecord>,
    started: Instant,
    wall_time: Option<f64>,
}

impl<R: RateLaw + ?Sized> System<f64, SolverState> for LawSystem<'_, R> {
    fn system(&self, x: f64, y: &SolverState, dy: &mut SolverState) {
        let t = self.t0 + x;
        let state = DVector::from_column_slice(y.as_slice());
        match evaluate(self.law, t, &state) {
            Ok(rate) => dy.copy_from_slice(rate.as_slice()),
            Err(e) => {
                self.record.borrow_mut().failure = Some(e);
                dy.fill(f64::NAN);
            }
        }
    }

    fn solout(&mut self, x: f64, y: &SolverState, _dy: &SolverState) -> bool {
        let mut record = self.record.borrow_mut();
        record.last_accepted = Some((x, y.as_slice().to_vec()));
        match self.wall_time {
            Some(secs) if self.started.elapsed().as_secs_f64() > secs => {
                record.timed_out_at = Some(x);
                true
            }
            _ => false,
        }
    }
}

/// evaluates the rate law and checks the arity of the derivative
fn evaluate<R: RateLaw + ?Sized>(
    law: &R,
    t: f64,
    y: &DVector<f64>,
) -> Result<DVector<f64>, ReactorError> {
    let dy = law.derivative(t, y)?;
    if dy.len() != y.len() {
        return Err(ReactorError::ShapeMismatch {
            expected: y.len(),
            found: dy.len(),
        });
    }
    Ok(dy)
}

/// Maps a stepper failure to the error of the driver
fn stopped_at(
    e: IntegrationError,
    t0: f64,
    t_end: f64,
    opts: &SolverOptions,
    failure: Option<ReactorError>,
) -> ReactorError {
    let (x, what) = match e {
        IntegrationError::MaxNumStepReached { x, .. } => (
            x,
            format!("step budget of {} steps exhausted", opts.max_steps),
        ),
        IntegrationError::StepSizeUnderflow { x } => (x, "step size too small".to_string()),
        IntegrationError::StiffnessDetected { x } => (x, "stiffness detected".to_string()),
    };
    let reason = match failure {
        Some(shape @ ReactorError::ShapeMismatch { .. }) => return shape,
        Some(cause) => format!("{} after: {}", what, cause),
        None => what,
    };
    ReactorError::NumericalConvergence {
        t_start: t0 + x,
        t_end,
        reason,
    }
}

/// Integrates `law` from `y0` over `grid`.
///
/// The returned trajectory has exactly one state per grid point; its first state
/// equals `y0`.
pub fn integrate<R: RateLaw + ?Sized>(
    law: &R,
    y0: &DVector<f64>,
    grid: &TimeGrid,
    opts: &SolverOptions,
) -> Result<Trajectory, ReactorError> {
    opts.validate()?;
    if y0.len() != law.arity() {
        return Err(ReactorError::ShapeMismatch {
            expected: law.arity(),
            found: y0.len(),
        });
    }
    if y0.iter().any(|v| !v.is_finite()) {
        return Err(ReactorError::InvalidParameter(format!(
            "initial state must be finite, got {:?}",
            y0.as_slice()
        )));
    }

    let t0 = grid.start();
    let t_final = grid.end();
    match evaluate(law, t0, y0) {
        Ok(f0) if f0.iter().all(|v| v.is_finite()) => {}
        Ok(f0) => {
            return Err(ReactorError::NumericalConvergence {
                t_start: t0,
                t_end: t0,
                reason: format!("non-finite rate {:?} at the initial state", f0.as_slice()),
            });
        }
        Err(e @ ReactorError::DegenerateRateLaw { .. }) => {
            return Err(ReactorError::NumericalConvergence {
                t_start: t0,
                t_end: t0,
                reason: e.to_string(),
            });
        }
        Err(e) => return Err(e),
    }

    let span = t_final - t0;
    let h_max = opts.max_step.unwrap_or(span).min(span);
    // zero lets the stepper estimate the first step
    let h = opts.first_step.map_or(0.0, |h| h.min(h_max));
    let n_max = u32::try_from(opts.max_steps).unwrap_or(u32::MAX);
    let n_stiff = opts.stiffness_test_interval.unwrap_or(u32::MAX);

    let record = RefCell::new(RunRecord::default());
    let system = LawSystem {
        law,
        t0,
        record: &record,
        started: Instant::now(),
        wall_time: opts.max_wall_time_secs,
    };
    let mut stepper = Dopri5::from_param(
        system,
        0.0,
        span,
        grid.step(),
        SolverState::from_column_slice(y0.as_slice()),
        opts.rtol,
        opts.atol,
        SAFETY,
        BETA,
        FAC_MIN,
        FAC_MAX,
        h_max,
        h,
        n_max,
        n_stiff,
        OutputType::Dense,
    );
    let result = stepper.integrate();
    let record = std::mem::take(&mut *record.borrow_mut());
    let stats = match result {
        Ok(stats) => stats,
        Err(e) => return Err(stopped_at(e, t0, t_final, opts, record.failure)),
    };
    if let (Some(x), Some(secs)) = (record.timed_out_at, opts.max_wall_time_secs) {
        return Err(ReactorError::NumericalConvergence {
            t_start: t0 + x,
            t_end: t_final,
            reason: format!("wall-clock budget of {} s exceeded", secs),
        });
    }

    // dense samples sit on x0 + k*dx up to round-off of the accumulated dx
    let tolerance = 1e-6 * grid.step();
    let x_out = stepper.x_out();
    let y_out = stepper.y_out();
    let n = grid.n_points();
    let mut states = Vec::with_capacity(n);
    states.push(y0.clone());
    let mut cursor = 0;
    for i in 1..n - 1 {
        let x = grid.point(i) - t0;
        while cursor < x_out.len() && x_out[cursor] < x - tolerance {
            cursor += 1;
        }
        match (x_out.get(cursor), y_out.get(cursor)) {
            (Some(xs), Some(ys)) if (xs - x).abs() <= tolerance => {
                states.push(DVector::from_column_slice(ys.as_slice()));
            }
            _ => {
                return Err(ReactorError::NumericalConvergence {
                    t_start: grid.point(i),
                    t_end: t_final,
                    reason: "no dense output at grid point".to_string(),
                });
            }
        }
    }
    match record.last_accepted {
        Some((x, y)) if (x - span).abs() <= tolerance => states.push(DVector::from_vec(y)),
        last => {
            return Err(ReactorError::NumericalConvergence {
                t_start: last.map_or(t0, |(x, _)| t0 + x),
                t_end: t_final,
                reason: "integration stopped before the end of the grid".to_string(),
            });
        }
    }

    debug!(
        "integrated {} components over [{}, {}]: {} accepted, {} rejected steps, {} evaluations",
        y0.len(),
        t0,
        t_final,
        stats.accepted_steps,
        stats.rejected_steps,
        stats.num_eval
    );
    Ok(Trajectory::new(grid.points(), states, law.labels()))
}
