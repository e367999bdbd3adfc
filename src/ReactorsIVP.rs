/// Error type of the crate
pub mod reactor_error;
/// Evenly spaced time grid
pub mod time_grid;
/// Grid-aligned solution of one integration run
pub mod trajectory;
/// Adaptive Dormand–Prince integration driver with dense output at the grid points
pub mod ivp_solver;
/// Decoupled and Monod batch reactor tasks
///
///  # Examples
/// ```
/// use BioBatch::ReactorsIVP::batch_reactor::MonodBatchReactor;
/// let trajectory = MonodBatchReactor::default().solve().unwrap();
/// let s = trajectory.component_by_label("S").unwrap();
/// assert_eq!(s.len(), 1001);
/// assert!(s[1000] < s[0]);
/// ```
pub mod batch_reactor;
/// Parametric sweep over one kinetic parameter (maximum growth rate by default)
pub mod scenario_sweep;
