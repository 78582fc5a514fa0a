// src/experiment/mod.rs

//! The noise-comparison experiment: eight sequential die runs, their
//! metrics, and the chart/CSV artifacts.
//!
//! Run order is fixed: one noise-free baseline, three decoherence tiers,
//! three readout-fidelity tiers, one combined run. Every run shares the same
//! shot budget. The runs are strictly sequential and independent; a failure
//! in any one aborts the remainder and propagates.

pub mod report;

use crate::core::QdieError;
use crate::dice::stats::{MetricsRecord, evaluate};
use crate::dice::{DIE_FACES, DieRoller, FrequencyTable};
use crate::noise::{DecoherenceParams, NoiseSpec, ReadoutParams};
use self::report::PlotConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Gate duration assumed for the decoherence channels, typical of a
/// superconducting single-qubit gate.
const GATE_TIME: f64 = 200e-9;

/// Decoherence severity tiers: label, T1, T2 (seconds). The middle tier is
/// the representative one used in the final grid and the metrics table.
const DECOHERENCE_TIERS: [(&str, f64, f64); 3] = [
    ("Ruido Bajo (T1=30µs)", 30e-6, 15e-6),
    ("Ruido Medio (T1=10µs)", 10e-6, 5e-6),
    ("Ruido Alto (T1=1µs)", 1e-6, 0.5e-6),
];

/// Readout fidelity tiers: label and the shared p00 = p11 value.
const READOUT_TIERS: [(&str, f64); 3] = [
    ("Alta Fidelidad (99%)", 0.99),
    ("Media Fidelidad (95%)", 0.95),
    ("Baja Fidelidad (85%)", 0.85),
];

/// Index of the representative (mid-severity) tier within both tier arrays.
const MID_TIER: usize = 1;

/// Experiment parameters. All fields are plain values; there is no
/// process-wide configuration state.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    /// Shots per run, 10 000 by default.
    pub shots: usize,
    /// Directory receiving the chart and CSV artifacts.
    pub output_dir: PathBuf,
    /// Chart styling, passed explicitly to every render call.
    pub plot: PlotConfig,
    /// Optional simulator seed for reproducible experiments.
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            shots: 10_000,
            output_dir: PathBuf::from("resultados"),
            plot: PlotConfig::default(),
            seed: None,
        }
    }
}

/// One labelled run: the condition name and its decoded faces.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Condition label, also used in chart captions.
    pub label: String,
    /// Decoded faces, one per shot. Immutable once produced.
    pub faces: Vec<u8>,
}

impl ScenarioResult {
    /// Frequency table for this run's faces.
    pub fn frequencies(&self) -> Result<FrequencyTable, QdieError> {
        FrequencyTable::aggregate(&self.faces, DIE_FACES)
    }
}

/// Everything one experiment produced: all eight runs plus the metrics of
/// the representative subset. Owned by the driver's caller; nothing here
/// outlives the process except the exported files.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    /// Noise-free baseline.
    pub baseline: ScenarioResult,
    /// The three decoherence tiers, low to high severity.
    pub decoherence: Vec<ScenarioResult>,
    /// The three readout tiers, high to low fidelity.
    pub readout: Vec<ScenarioResult>,
    /// Combined decoherence + readout at mid severity.
    pub combined: ScenarioResult,
    /// Metrics for baseline, mid decoherence, mid readout and combined.
    pub metrics: Vec<MetricsRecord>,
}

/// Orchestrates the eight runs and the artifact exports.
pub struct ExperimentDriver {
    config: ExperimentConfig,
    roller: DieRoller,
    interrupt: Arc<AtomicBool>,
}

impl ExperimentDriver {
    /// Creates a driver for the given configuration.
    pub fn new(config: ExperimentConfig) -> Self {
        let roller = match config.seed {
            Some(seed) => DieRoller::from_seed(seed),
            None => DieRoller::new(),
        };
        Self {
            config,
            roller,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A handle the embedding program may set to request cancellation.
    /// The flag is checked between runs, never mid-run: a run in flight
    /// completes, then the driver aborts with `QdieError::Interrupted`.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    fn checkpoint(&self) -> Result<(), QdieError> {
        if self.interrupt.load(Ordering::Relaxed) {
            Err(QdieError::Interrupted)
        } else {
            Ok(())
        }
    }

    fn run_scenario(&mut self, label: &str, noise: &NoiseSpec) -> Result<ScenarioResult, QdieError> {
        self.checkpoint()?;
        let faces = self.roller.roll(noise, self.config.shots)?;
        Ok(ScenarioResult { label: label.to_string(), faces })
    }

    /// Executes all eight runs in order and computes the representative
    /// metrics. Prints progress; writes nothing to disk (see
    /// [`write_artifacts`](Self::write_artifacts)).
    pub fn run(&mut self) -> Result<ExperimentReport, QdieError> {
        let shots = self.config.shots;

        println!("[1/4] Baseline run ({} shots)...", shots);
        let baseline = self.run_scenario("Sin Ruido", &NoiseSpec::Ideal)?;

        println!("[2/4] Decoherence tiers...");
        let mut decoherence = Vec::with_capacity(DECOHERENCE_TIERS.len());
        for (label, t1, t2) in DECOHERENCE_TIERS {
            println!("  → {}: T1={:.1}µs, T2={:.1}µs", label, t1 * 1e6, t2 * 1e6);
            let params = DecoherenceParams::new(t1, t2, GATE_TIME)?;
            decoherence.push(self.run_scenario(label, &NoiseSpec::Decoherence(params))?);
        }

        println!("[3/4] Readout fidelity tiers...");
        let mut readout = Vec::with_capacity(READOUT_TIERS.len());
        for (label, fidelity) in READOUT_TIERS {
            println!("  → {}: p(0|0)=p(1|1)={}", label, fidelity);
            let params = ReadoutParams::new(fidelity, fidelity)?;
            readout.push(self.run_scenario(label, &NoiseSpec::Readout(params))?);
        }

        println!("[4/4] Combined noise run...");
        let (_, mid_t1, mid_t2) = DECOHERENCE_TIERS[MID_TIER];
        let (_, mid_fidelity) = READOUT_TIERS[MID_TIER];
        let combined_spec = NoiseSpec::Combined {
            decoherence: DecoherenceParams::new(mid_t1, mid_t2, GATE_TIME)?,
            readout: ReadoutParams::new(mid_fidelity, mid_fidelity)?,
        };
        let combined = self.run_scenario("Ambos Ruidos", &combined_spec)?;

        let metrics = vec![
            evaluate(&baseline.faces, DIE_FACES, "Sin Ruido")?,
            evaluate(&decoherence[MID_TIER].faces, DIE_FACES, "Decoherencia Media")?,
            evaluate(&readout[MID_TIER].faces, DIE_FACES, "Lectura Media (95%)")?,
            evaluate(&combined.faces, DIE_FACES, "Ambos Ruidos")?,
        ];

        Ok(ExperimentReport { baseline, decoherence, readout, combined, metrics })
    }

    /// Writes the four comparison charts and the metrics CSV into the
    /// configured output directory, creating it if absent and overwriting
    /// any previous run's files.
    pub fn write_artifacts(&self, report: &ExperimentReport) -> Result<(), QdieError> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        let dir = &self.config.output_dir;
        let plot = &self.config.plot;

        report::plot_single(
            &dir.join("1_sin_ruido.png"),
            "Dado Cuántico - Sin Ruido",
            &report.baseline.frequencies()?,
            plot,
        )?;

        let decoherence_panels = titled_tables(&report.decoherence)?;
        report::plot_row(&dir.join("2_decoherencia.png"), &decoherence_panels, plot)?;

        let readout_panels = titled_tables(&report.readout)?;
        report::plot_row(&dir.join("3_ruido_lectura.png"), &readout_panels, plot)?;

        let grid_scenarios = [
            &report.baseline,
            &report.decoherence[MID_TIER],
            &report.readout[MID_TIER],
            &report.combined,
        ];
        let mut grid_panels = Vec::with_capacity(grid_scenarios.len());
        for scenario in grid_scenarios {
            grid_panels.push((scenario.label.clone(), scenario.frequencies()?));
        }
        report::plot_grid(&dir.join("4_comparativa_final.png"), &grid_panels, plot)?;

        report::write_metrics_csv(&dir.join("metricas.csv"), &report.metrics)?;
        Ok(())
    }
}

fn titled_tables(scenarios: &[ScenarioResult]) -> Result<Vec<(String, FrequencyTable)>, QdieError> {
    scenarios
        .iter()
        .map(|s| Ok((format!("Dado Cuántico - {}", s.label), s.frequencies()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_flag_aborts_before_first_run() {
        let config = ExperimentConfig { shots: 10, seed: Some(1), ..Default::default() };
        let mut driver = ExperimentDriver::new(config);
        driver.interrupt_handle().store(true, Ordering::Relaxed);
        assert_eq!(driver.run().unwrap_err(), QdieError::Interrupted);
    }

    #[test]
    fn small_experiment_produces_all_runs_and_metrics() {
        let config = ExperimentConfig { shots: 200, seed: Some(9), ..Default::default() };
        let mut driver = ExperimentDriver::new(config);
        let report = driver.run().expect("experiment failed");
        assert_eq!(report.baseline.faces.len(), 200);
        assert_eq!(report.decoherence.len(), 3);
        assert_eq!(report.readout.len(), 3);
        assert_eq!(report.metrics.len(), 4);
        assert_eq!(report.metrics[0].label, "Sin Ruido");
    }
}
