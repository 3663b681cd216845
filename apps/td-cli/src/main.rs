use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use td_app::{AppError, AppResult, ReportFormat};
use td_project::SimulationConfig;
use tracing::Level;

#[derive(Parser)]
#[command(name = "td-cli")]
#[command(about = "TankDrain CLI - drain time of a tank through a pipe", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drain the tank for every pipe length of the configured sweep
    Sweep {
        /// Configuration file (YAML or JSON); the reference rig if omitted
        config: Option<PathBuf>,
        /// Report format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Run lengths one after another instead of in parallel
        #[arg(long)]
        serial: bool,
    },
    /// Drain the tank through one pipe length and export per-step data as CSV
    Simulate {
        /// Configuration file (YAML or JSON); the reference rig if omitted
        config: Option<PathBuf>,
        /// Pipe length in metres
        #[arg(short, long)]
        length: f64,
        /// Record every N-th time step
        #[arg(long, default_value_t = 1)]
        record_every: usize,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        config: PathBuf,
    },
    /// Write a configuration file with the reference rig defaults
    InitConfig {
        /// Where to write the YAML file
        path: PathBuf,
        /// Fit the T-joint at the pipe outlet
        #[arg(long, conflicts_with = "laminar")]
        tjoint: bool,
        /// Laminar-only model swept in 1 cm steps
        #[arg(long)]
        laminar: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

impl From<Format> for ReportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Table => ReportFormat::Table,
            Format::Json => ReportFormat::Json,
            Format::Csv => ReportFormat::Csv,
        }
    }
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sweep {
            config,
            format,
            output,
            serial,
        } => cmd_sweep(config.as_deref(), format.into(), output.as_deref(), !serial),
        Commands::Simulate {
            config,
            length,
            record_every,
            output,
        } => cmd_simulate(config.as_deref(), length, record_every, output.as_deref()),
        Commands::Validate { config } => cmd_validate(&config),
        Commands::InitConfig {
            path,
            tjoint,
            laminar,
            force,
        } => cmd_init_config(&path, tjoint, laminar, force),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> AppResult<SimulationConfig> {
    match path {
        Some(path) => Ok(td_project::load(path)?),
        None => Ok(SimulationConfig::default()),
    }
}

fn write_output(output: Option<&Path>, content: &str) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, content).map_err(|e| AppError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        eprintln!("✓ Wrote {}", path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

fn cmd_sweep(
    config_path: Option<&Path>,
    format: ReportFormat,
    output: Option<&Path>,
    parallel: bool,
) -> AppResult<()> {
    let config = load_config(config_path)?;

    let start = Instant::now();
    let report = td_app::run_sweep(&config, parallel)?;
    tracing::info!(elapsed_s = start.elapsed().as_secs_f64(), "sweep timing");

    write_output(output, &td_app::render_sweep(&report, format)?)?;

    let failed = report.failed_count();
    if failed > 0 {
        eprintln!("{} of {} lengths failed", failed, report.lengths.len());
    }
    Ok(())
}

fn cmd_simulate(
    config_path: Option<&Path>,
    length: f64,
    record_every: usize,
    output: Option<&Path>,
) -> AppResult<()> {
    if record_every == 0 {
        return Err(AppError::InvalidInput(
            "--record-every must be at least 1".to_string(),
        ));
    }
    let config = load_config(config_path)?;
    let outcome = td_app::simulate_length(&config, length, Some(record_every))?;

    write_output(output, &td_app::render_steps_csv(&outcome.records))?;
    eprintln!(
        "✓ L = {} m drained in {:.3} s ({} steps, {})",
        length, outcome.drain_time_s, outcome.steps, outcome.termination
    );
    Ok(())
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = td_project::load(config_path)?;
    td_app::LengthSweep::from_def(&config.sweep)?;
    println!("✓ Configuration is valid");
    println!("  Name: {}", config.name);
    println!(
        "  Outlet: {}",
        if config.tjoint.is_some() { "t-joint" } else { "plain" }
    );
    println!(
        "  Sweep: {} m to {} m in steps of {} m",
        config.sweep.start_m, config.sweep.end_m, config.sweep.step_m
    );
    Ok(())
}

fn cmd_init_config(path: &Path, tjoint: bool, laminar: bool, force: bool) -> AppResult<()> {
    if path.exists() && !force {
        return Err(AppError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    let config = if tjoint {
        SimulationConfig::tjoint_rig()
    } else if laminar {
        SimulationConfig::laminar_rig()
    } else {
        SimulationConfig::default()
    };
    td_project::save_yaml(path, &config)?;
    println!("✓ Wrote {}", path.display());
    Ok(())
}
