use td_app::{AppError, ReportFormat, RunStatus, render_steps_csv, render_sweep};
use td_project::{RegimeDef, SimulationConfig, SweepDef};
use td_sim::{SimError, Termination};

/// Reference rig with a coarse step and a short sweep, to keep tests quick.
fn quick_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.time.dt_s = 0.05;
    config.sweep = SweepDef {
        start_m: 0.1,
        end_m: 0.3,
        step_m: 0.1,
    };
    config
}

#[test]
fn sweep_reports_every_length_in_order() {
    let report = td_app::run_sweep(&quick_config(), true).unwrap();
    let lengths: Vec<f64> = report.lengths.iter().map(|r| r.length_m).collect();
    assert_eq!(lengths.len(), 3);
    assert_eq!(lengths[0], 0.1);
    assert!((lengths[2] - 0.3).abs() < 1e-12);

    for row in &report.lengths {
        assert_eq!(row.status, RunStatus::Completed);
        assert_eq!(row.termination.as_deref(), Some("reached-floor"));
        assert!(row.drain_time_s.unwrap() > 0.0);
    }
    assert!(report.fastest().is_some());
}

#[test]
fn parallel_and_serial_sweeps_agree() {
    let config = quick_config();
    let parallel = td_app::run_sweep(&config, true).unwrap();
    let serial = td_app::run_sweep(&config, false).unwrap();
    assert_eq!(parallel, serial);
}

#[test]
fn failed_length_does_not_abort_sweep() {
    // Forced turbulent flow at dt = 0.05 s: 0.1 m drains in under 3000
    // steps, 0.8 m needs more than 5000.
    let mut config = quick_config();
    config.solver.regime = RegimeDef::Turbulent;
    config.time.max_steps = 4000;
    config.sweep = SweepDef {
        start_m: 0.1,
        end_m: 0.8,
        step_m: 0.7,
    };

    let report = td_app::run_sweep(&config, true).unwrap();
    assert_eq!(report.lengths.len(), 2);
    assert_eq!(report.lengths[0].status, RunStatus::Completed);
    assert_eq!(report.lengths[1].status, RunStatus::Failed);
    assert!(
        report.lengths[1]
            .error
            .as_deref()
            .unwrap()
            .contains("Step limit")
    );
    assert_eq!(report.failed_count(), 1);

    let csv = render_sweep(&report, ReportFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn invalid_config_fails_the_whole_sweep() {
    let mut config = quick_config();
    config.tank.floor_m = 0.2;
    let err = td_app::run_sweep(&config, false).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn tjoint_sweep_runs_both_variants() {
    let mut config = SimulationConfig::tjoint_rig();
    config.time.dt_s = 0.05;
    config.sweep = SweepDef {
        start_m: 0.2,
        end_m: 0.2,
        step_m: 0.1,
    };
    let tee = td_app::run_sweep(&config, false).unwrap();
    assert_eq!(tee.variant, "tjoint");

    if let Some(t) = config.tjoint.as_mut() {
        t.weighted = true;
    }
    let weighted = td_app::run_sweep(&config, false).unwrap();
    assert_eq!(weighted.variant, "tjoint-weighted");
    assert_eq!(weighted.lengths[0].status, RunStatus::Completed);
}

#[test]
fn simulate_length_records_steps() {
    let outcome = td_app::simulate_length(&quick_config(), 0.2, Some(100)).unwrap();
    assert_eq!(outcome.termination, Termination::ReachedFloor);
    let last = outcome.records.last().unwrap();
    assert_eq!(last.step, outcome.steps);

    let csv = render_steps_csv(&outcome.records);
    assert_eq!(csv.lines().count(), outcome.records.len() + 1);
    assert!(csv.starts_with("step,t_s,water_level_m,regime,"));
}

#[test]
fn zero_length_is_invalid_configuration() {
    let err = td_app::simulate_length(&quick_config(), 0.0, None).unwrap_err();
    assert!(
        matches!(
            err,
            AppError::Simulation(SimError::InvalidConfiguration { .. })
        ),
        "got {err:?}"
    );
}
