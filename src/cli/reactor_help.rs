pub const TASK_FILE_HELP: &str = "
TASK FILE (JSON). Every section is optional, missing fields take the defaults below.
Concentrations are mg/L as COD, rates 1/d, time d.

solver:
    rtol: 1e-8, atol: 1e-8          relative and absolute tolerance
    first_step: null                initial step, estimated when null
    max_step: null                  largest step, unbounded when null
    max_steps: 500000               accepted and rejected step budget
    stiffness_test_interval: null   steps between stiffness tests, no test when null
    max_wall_time_secs: null        wall clock budget of one integration

decoupled:                          dC/dt = -k1 C, dX/dt = k2 X
    params: { c_ini: 10000, x_ini: 1000, k1: 2, k2: 0.2 }
    grid: { start: 0, end: 5, n_points: 1001 }

monod:                              dS/dt = -mu_max S X / (Y (K_s + S))
    params: { mu_max: 4, b: 0.2, k_s: 10, y: 0.63 }
    s_ini: 10000, x_ini: 1000
    grid: { start: 0, end: 4, n_points: 1001 }

sweep:                              monod with mu_max replaced by each value
    base: { mu_max: 4, b: 0.2, k_s: 10, y: 0.63 }
    s_ini: 10000, x_ini: 1000
    grid: { start: 0, end: 4, n_points: 1001 }
    mu_max_values: [0.5, 1, 2, 4]
    parallel: true

output_dir: null                    directory for JSON export of the results
";
