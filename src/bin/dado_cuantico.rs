// src/bin/dado_cuantico.rs

//! Runs the full noise-comparison study of the 8-sided quantum die and
//! writes its charts and metrics CSV into `resultados/`.

use qdie::core::QdieError;
use qdie::experiment::report::print_summary;
use qdie::experiment::{ExperimentConfig, ExperimentDriver};
use std::process::ExitCode;

fn run() -> Result<(), QdieError> {
    let config = ExperimentConfig::default();
    let output_dir = config.output_dir.clone();
    let shots = config.shots;

    println!("=== Dado Cuántico de 8 Caras ===");
    println!("{} tiradas por configuración de ruido\n", shots);

    let mut driver = ExperimentDriver::new(config);
    let report = driver.run()?;
    driver.write_artifacts(&report)?;
    print_summary(&report.metrics);

    println!("Archivos generados en {}/:", output_dir.display());
    for name in [
        "1_sin_ruido.png",
        "2_decoherencia.png",
        "3_ruido_lectura.png",
        "4_comparativa_final.png",
        "metricas.csv",
    ] {
        println!("  - {}", name);
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(QdieError::Interrupted) => {
            eprintln!("\nExperimento interrumpido por el usuario.");
            // Conventional exit status for SIGINT-style cancellation.
            ExitCode::from(130)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
