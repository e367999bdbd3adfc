/// Rate law trait shared by all kinetic models and the runtime-selectable
/// [`rate_law::KineticModel`] enum.
pub mod rate_law;
/// Two independent first-order laws of a batch reactor: substrate decay dC/dt = -k1*C and
/// biomass growth dX/dt = k2*X, with their closed-form solutions.
///
///  # Examples
/// ```
/// use BioBatch::Kinetics::decoupled_kinetics::{DecoupledParams, substrate_decay_rate};
/// let params = DecoupledParams::default();
/// assert_eq!(substrate_decay_rate(params.c_ini, 0.0, params.k1), -20000.0);
/// let c_at_one_day = params.analytic_substrate(1.0);
/// assert!((c_at_one_day - 1353.35).abs() < 0.01);
/// ```
pub mod decoupled_kinetics;
/// Monod substrate-limited growth of heterotrophic biomass:
/// dS/dt = -(mu_max/Y)*S/(K_s+S)*X, dX/dt = (mu_max*S/(K_s+S) - b)*X
///
///  # Examples
/// ```
/// use BioBatch::Kinetics::monod_kinetics::{MonodParams, monod_rates};
/// let params = MonodParams { b: 0.2, ..Default::default() };
/// let (ds_dt, dx_dt) = monod_rates(0.0, 1000.0, 0.0, &params).unwrap();
/// assert_eq!(ds_dt, 0.0);
/// assert!((dx_dt + 200.0).abs() < 1e-12);
/// ```
pub mod monod_kinetics;
