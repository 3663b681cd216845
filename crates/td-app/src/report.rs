//! Sweep and per-step reports, rendered as text table, JSON or CSV.

use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;
use td_project::schema::RegimeDef;
use td_sim::{DrainOutcome, SimError, StepRecord};

use crate::error::{AppError, AppResult};

/// Outcome of one swept length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
}

impl RunStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// One row of a sweep report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthReport {
    pub length_m: f64,
    pub status: RunStatus,
    pub drain_time_s: Option<f64>,
    pub steps: Option<usize>,
    pub final_level_m: Option<f64>,
    pub termination: Option<String>,
    pub error: Option<String>,
}

impl LengthReport {
    pub fn completed(length_m: f64, outcome: &DrainOutcome) -> Self {
        Self {
            length_m,
            status: RunStatus::Completed,
            drain_time_s: Some(outcome.drain_time_s),
            steps: Some(outcome.steps),
            final_level_m: Some(outcome.final_level),
            termination: Some(outcome.termination.to_string()),
            error: None,
        }
    }

    pub fn failed(length_m: f64, err: &SimError) -> Self {
        Self {
            length_m,
            status: RunStatus::Failed,
            drain_time_s: None,
            steps: None,
            final_level_m: None,
            termination: None,
            error: Some(err.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == RunStatus::Failed
    }
}

/// Result of a whole sweep, rows in length order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub name: String,
    pub variant: String,
    pub regime: RegimeDef,
    pub lengths: Vec<LengthReport>,
}

impl SweepReport {
    /// Completed row with the shortest drain time.
    pub fn fastest(&self) -> Option<&LengthReport> {
        self.lengths
            .iter()
            .filter_map(|r| r.drain_time_s.map(|t| (t, r)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, r)| r)
    }

    pub fn failed_count(&self) -> usize {
        self.lengths.iter().filter(|r| r.is_failed()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(AppError::InvalidInput(format!(
                "unknown report format '{other}' (expected table, json or csv)"
            ))),
        }
    }
}

pub fn render_sweep(report: &SweepReport, format: ReportFormat) -> AppResult<String> {
    match format {
        ReportFormat::Table => Ok(render_table(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        ReportFormat::Csv => Ok(render_csv(report)),
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn render_table(report: &SweepReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}, {:?} regime)",
        report.name, report.variant, report.regime
    );
    let _ = writeln!(
        out,
        "{:>10}  {:<9}  {:>12}  {:>9}  {:>13}  {:<14}",
        "length_m", "status", "drain_time_s", "steps", "final_level_m", "termination"
    );
    for r in &report.lengths {
        let _ = write!(
            out,
            "{:>10.4}  {:<9}  {:>12}  {:>9}  {:>13}  {:<14}",
            r.length_m,
            r.status.as_str(),
            opt(r.drain_time_s.map(|t| format!("{t:.3}"))),
            opt(r.steps),
            opt(r.final_level_m.map(|l| format!("{l:.5}"))),
            opt(r.termination.as_deref()),
        );
        if let Some(e) = &r.error {
            let _ = write!(out, "  {e}");
        }
        out.push('\n');
    }
    if let Some(best) = report.fastest() {
        let _ = writeln!(
            out,
            "fastest: L = {:.4} m, {:.3} s",
            best.length_m,
            best.drain_time_s.unwrap_or(f64::NAN)
        );
    }
    let failed = report.failed_count();
    if failed > 0 {
        let _ = writeln!(out, "failed lengths: {failed}");
    }
    out
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_opt<T: ToString>(v: Option<T>) -> String {
    v.map_or_else(String::new, |v| v.to_string())
}

fn render_csv(report: &SweepReport) -> String {
    let mut csv =
        String::from("length_m,status,drain_time_s,steps,final_level_m,termination,error\n");
    for r in &report.lengths {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{}",
            r.length_m,
            r.status.as_str(),
            csv_opt(r.drain_time_s),
            csv_opt(r.steps),
            csv_opt(r.final_level_m),
            csv_opt(r.termination.as_deref()),
            r.error.as_deref().map(csv_field).unwrap_or_default(),
        );
    }
    csv
}

/// Per-step diagnostics of one run as CSV. Joint columns stay empty for a
/// plain pipe.
pub fn render_steps_csv(records: &[StepRecord]) -> String {
    let mut csv = String::from(
        "step,t_s,water_level_m,regime,velocity_m_s,friction_factor,reynolds,flow_rate_m3_s,\
         joint_velocity_m_s,joint_friction_factor,joint_reynolds,iterations\n",
    );
    for r in records {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            r.step,
            r.t,
            r.water_level,
            r.regime,
            r.pipe.velocity,
            r.pipe.friction_factor,
            r.pipe.reynolds,
            r.flow_rate,
            csv_opt(r.joint.map(|j| j.velocity)),
            csv_opt(r.joint.map(|j| j.friction_factor)),
            csv_opt(r.joint.map(|j| j.reynolds)),
            r.iterations,
        );
    }
    csv
}
