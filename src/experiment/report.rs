// src/experiment/report.rs

//! Chart rendering and CSV export for experiment results.
//!
//! Three chart layouts share one panel renderer: a single frequency chart,
//! a 1x3 row comparing severity tiers, and the 2x2 final grid. Every panel
//! draws the per-face percentage bars plus a horizontal line at the uniform
//! expectation so deviation is visible at a glance.

use crate::core::QdieError;
use crate::dice::FrequencyTable;
use crate::dice::stats::MetricsRecord;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

const CSV_HEADER: &str =
    "Condición,Desviación Estándar (%),Max Desviación del 12.5% (%),Chi-cuadrado,p-value";

/// Chart styling, passed explicitly per call. No global plot state.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Width of one panel in pixels.
    pub panel_width: u32,
    /// Height of one panel in pixels.
    pub panel_height: u32,
    /// Upper bound of the percentage axis. 20% leaves headroom above the
    /// 12.5% uniform line while keeping noise-induced drift readable.
    pub y_max: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self { panel_width: 800, panel_height: 500, y_max: 20.0 }
    }
}

fn artifact_err<E: std::fmt::Display>(path: &Path, err: E) -> QdieError {
    QdieError::Artifact { message: format!("{}: {}", path.display(), err) }
}

/// Draws one frequency panel: titled bar chart with the uniform guide line.
fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    table: &FrequencyTable,
    config: &PlotConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let n_faces = table.n_faces() as f64;
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(0.5f64..(n_faces + 0.5), 0.0f64..config.y_max)?;

    chart
        .configure_mesh()
        .x_desc("Cara")
        .y_desc("Frecuencia (%)")
        .x_labels(table.n_faces())
        .x_label_formatter(&|x| format!("{}", x.round() as i64))
        .disable_x_mesh()
        .draw()?;

    chart.draw_series(table.iter().map(|(face, pct)| {
        let x = face as f64;
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, pct)], BLUE.mix(0.6).filled())
    }))?;

    let expected = table.uniform_expectation();
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.5, expected), (n_faces + 0.5, expected)],
            RED.stroke_width(2),
        )))?
        .label(format!("Uniforme ({:.1}%)", expected))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .border_style(BLACK.mix(0.4))
        .background_style(WHITE.mix(0.85))
        .draw()?;

    Ok(())
}

/// Renders a single frequency chart to `path`.
pub fn plot_single(
    path: &Path,
    title: &str,
    table: &FrequencyTable,
    config: &PlotConfig,
) -> Result<(), QdieError> {
    let root = BitMapBackend::new(path, (config.panel_width, config.panel_height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(|e| artifact_err(path, e))?;
    draw_panel(&root, title, table, config).map_err(|e| artifact_err(path, e))?;
    root.present().map_err(|e| artifact_err(path, e))?;
    Ok(())
}

/// Renders the panels side by side in one row.
pub fn plot_row(
    path: &Path,
    panels: &[(String, FrequencyTable)],
    config: &PlotConfig,
) -> Result<(), QdieError> {
    if panels.is_empty() {
        return Err(QdieError::Artifact {
            message: format!("{}: row chart needs at least one panel", path.display()),
        });
    }
    let width = config.panel_width * panels.len() as u32;
    let root = BitMapBackend::new(path, (width, config.panel_height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| artifact_err(path, e))?;
    let areas = root.split_evenly((1, panels.len()));
    for (area, (title, table)) in areas.iter().zip(panels) {
        draw_panel(area, title, table, config).map_err(|e| artifact_err(path, e))?;
    }
    root.present().map_err(|e| artifact_err(path, e))?;
    Ok(())
}

/// Renders four panels in a 2x2 grid.
pub fn plot_grid(
    path: &Path,
    panels: &[(String, FrequencyTable)],
    config: &PlotConfig,
) -> Result<(), QdieError> {
    if panels.len() != 4 {
        return Err(QdieError::Artifact {
            message: format!("comparison grid needs 4 panels, got {}", panels.len()),
        });
    }
    let root = BitMapBackend::new(
        path,
        (config.panel_width * 2, config.panel_height * 2),
    )
    .into_drawing_area();
    root.fill(&WHITE).map_err(|e| artifact_err(path, e))?;
    let areas = root.split_evenly((2, 2));
    for (area, (title, table)) in areas.iter().zip(panels) {
        draw_panel(area, title, table, config).map_err(|e| artifact_err(path, e))?;
    }
    root.present().map_err(|e| artifact_err(path, e))?;
    Ok(())
}

/// Writes the metrics table as CSV, overwriting any previous file.
///
/// Precision is fixed per column: 3 decimals for the dispersion columns,
/// 2 for the chi-square statistic, 4 for the p-value.
pub fn write_metrics_csv(path: &Path, records: &[MetricsRecord]) -> Result<(), QdieError> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", CSV_HEADER)?;
    for record in records {
        writeln!(
            file,
            "{},{:.3},{:.3},{:.2},{:.4}",
            record.label, record.std_dev, record.max_deviation, record.chi_square, record.p_value
        )?;
    }
    Ok(())
}

/// Reads a metrics CSV written by [`write_metrics_csv`].
pub fn read_metrics_csv(path: &Path) -> Result<Vec<MetricsRecord>, QdieError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    match lines.next().transpose()? {
        Some(header) if header == CSV_HEADER => {}
        _ => {
            return Err(QdieError::Artifact {
                message: format!("{}: missing or unrecognized CSV header", path.display()),
            });
        }
    }

    let mut records = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 5 {
            return Err(QdieError::Artifact {
                message: format!("{}: row {} has {} fields, expected 5", path.display(), i + 2, fields.len()),
            });
        }
        let parse = |field: &str, name: &str| -> Result<f64, QdieError> {
            field.trim().parse::<f64>().map_err(|e| QdieError::Artifact {
                message: format!("{}: row {} {}: {}", path.display(), i + 2, name, e),
            })
        };
        records.push(MetricsRecord {
            label: fields[0].to_string(),
            std_dev: parse(fields[1], "std_dev")?,
            max_deviation: parse(fields[2], "max_deviation")?,
            chi_square: parse(fields[3], "chi_square")?,
            p_value: parse(fields[4], "p_value")?,
        });
    }
    Ok(records)
}

/// Prints the metrics as an aligned console table.
pub fn print_summary(records: &[MetricsRecord]) {
    println!();
    println!(
        "{:<24} {:>12} {:>16} {:>14} {:>10}",
        "Condición", "Desv. Est.", "Max Desv. 12.5%", "Chi-cuadrado", "p-value"
    );
    println!("{}", "-".repeat(80));
    for r in records {
        println!(
            "{:<24} {:>11.3}% {:>15.3}% {:>14.2} {:>10.4}",
            r.label, r.std_dev, r.max_deviation, r.chi_square, r.p_value
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_records() -> Vec<MetricsRecord> {
        vec![
            MetricsRecord {
                label: "Sin Ruido".to_string(),
                std_dev: 0.312,
                max_deviation: 0.58,
                chi_square: 5.21,
                p_value: 0.6348,
            },
            MetricsRecord {
                label: "Ambos Ruidos".to_string(),
                std_dev: 4.105,
                max_deviation: 9.87,
                chi_square: 812.44,
                p_value: 0.0,
            },
        ]
    }

    fn temp_csv(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("qdie_report_{}_{}.csv", name, std::process::id()));
        path
    }

    #[test]
    fn csv_round_trips_at_written_precision() {
        let path = temp_csv("roundtrip");
        let records = sample_records();
        write_metrics_csv(&path, &records).unwrap();
        let back = read_metrics_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.len(), records.len());
        for (a, b) in records.iter().zip(&back) {
            assert_eq!(a.label, b.label);
            assert!((a.std_dev - b.std_dev).abs() < 5e-4);
            assert!((a.max_deviation - b.max_deviation).abs() < 5e-4);
            assert!((a.chi_square - b.chi_square).abs() < 5e-3);
            assert!((a.p_value - b.p_value).abs() < 5e-5);
        }
    }

    #[test]
    fn csv_with_wrong_header_is_rejected() {
        let path = temp_csv("badheader");
        std::fs::write(&path, "a,b,c\n1,2,3\n").unwrap();
        let result = read_metrics_csv(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(QdieError::Artifact { .. })));
    }

    #[test]
    fn grid_requires_exactly_four_panels() {
        let config = PlotConfig::default();
        let path = temp_csv("grid");
        let result = plot_grid(&path, &[], &config);
        assert!(matches!(result, Err(QdieError::Artifact { .. })));
    }
}
