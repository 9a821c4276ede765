use crate::data::LABELS;
use anyhow::{bail, Context, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

const IMG_DIMS: (u32, u32) = (1280, 960);

const FONT: &str = "sans-serif";
const TITLE_FONT_SIZE: i32 = 36;
const LABEL_FONT_SIZE: i32 = 22;

const MARGIN: i32 = 20;
const X_LABEL_AREA_SIZE: i32 = 60;
const Y_LABEL_AREA_SIZE: i32 = 90;

const TRAIN_COLOUR: RGBColor = BLUE;
const TEST_COLOUR: RGBColor = RED;

/// Heatmap colour ramp endpoint (matplotlib tab-blue)
const HEAT_COLOUR: RGBColor = RGBColor(31, 119, 180);

/// Which training curve a chart shows, selecting titles, axis labels and the
/// output file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Accuracy,
    Loss,
    LossVsLr,
}

impl MetricKind {
    fn title(&self) -> &'static str {
        match self {
            MetricKind::Accuracy => "Training and Test Accuracy",
            MetricKind::Loss => "Training and Test Loss",
            MetricKind::LossVsLr => "Training loss and Test loss with learning rate",
        }
    }

    fn x_label(&self) -> &'static str {
        match self {
            MetricKind::Accuracy | MetricKind::Loss => "Epoch",
            MetricKind::LossVsLr => "Learning rate",
        }
    }

    fn y_label(&self) -> &'static str {
        match self {
            MetricKind::Accuracy => "Accuracy (%)",
            MetricKind::Loss | MetricKind::LossVsLr => "Loss",
        }
    }

    fn file_name(&self, epochs: usize, lr: f64) -> String {
        match self {
            MetricKind::Accuracy => format!("Accuracy_epochs_{}_lr{}.png", epochs, lr),
            MetricKind::Loss => format!("Loss_epochs_{}_lr{}.png", epochs, lr),
            MetricKind::LossVsLr => format!("Loss_lr_{}{}.png", epochs, lr),
        }
    }
}

fn series_bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

/// Render a two-line train/test chart for one metric and persist it.
///
/// The file name is derived from the metric kind, the total epoch count and
/// the learning rate, into the caller's run directory.
pub fn plot_curves(
    x: &[f64],
    train: &[f64],
    test: &[f64],
    kind: MetricKind,
    epochs: usize,
    lr: f64,
    run_dir: &Path,
) -> Result<PathBuf> {
    if x.is_empty() || x.len() != train.len() || x.len() != test.len() {
        bail!(
            "Curve length mismatch: {} x, {} train, {} test",
            x.len(),
            train.len(),
            test.len()
        );
    }

    let path = run_dir.join(kind.file_name(epochs, lr));

    let (x_min, x_max) = series_bounds(x);
    let (train_min, train_max) = series_bounds(train);
    let (test_min, test_max) = series_bounds(test);
    let y_min = train_min.min(test_min);
    let y_max = train_max.max(test_max);
    // Pad a flat series so the range stays non-degenerate.
    let pad = ((y_max - y_min) * 0.05).max(1e-6);

    // The backend borrows `path`; keep the drawing scoped so the borrow ends
    // before the path is returned.
    {
        let root = BitMapBackend::new(&path, IMG_DIMS).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow::anyhow!("Failed to clear chart background: {}", e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(kind.title(), (FONT, TITLE_FONT_SIZE))
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA_SIZE)
            .y_label_area_size(Y_LABEL_AREA_SIZE)
            .build_cartesian_2d(x_min..x_max.max(x_min + 1e-6), (y_min - pad)..(y_max + pad))
            .map_err(|e| anyhow::anyhow!("Failed to build chart: {}", e))?;

        chart
            .configure_mesh()
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .axis_desc_style((FONT, LABEL_FONT_SIZE))
            .draw()
            .map_err(|e| anyhow::anyhow!("Failed to draw chart mesh: {}", e))?;

        chart
            .draw_series(LineSeries::new(
                x.iter().zip(train).map(|(&x, &y)| (x, y)),
                &TRAIN_COLOUR,
            ))
            .map_err(|e| anyhow::anyhow!("Failed to draw train series: {}", e))?
            .label("train")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TRAIN_COLOUR));

        chart
            .draw_series(LineSeries::new(
                x.iter().zip(test).map(|(&x, &y)| (x, y)),
                &TEST_COLOUR,
            ))
            .map_err(|e| anyhow::anyhow!("Failed to draw test series: {}", e))?
            .label("test")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TEST_COLOUR));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| anyhow::anyhow!("Failed to draw legend: {}", e))?;

        root.present()
            .with_context(|| format!("Failed to write chart to {:?}", path))?;
    }

    info!("Saved {:?} chart to {:?}", kind, path);
    Ok(path)
}

/// Render the percent-normalized confusion matrix as a heatmap with the
/// activity names on both axes.
pub fn plot_confusion_matrix(normalized: &[Vec<f64>], run_dir: &Path) -> Result<PathBuf> {
    let n = normalized.len();
    if n == 0 || normalized.iter().any(|row| row.len() != n) {
        bail!("Confusion matrix must be square and non-empty");
    }

    let path = run_dir.join("confusion_matrix.png");
    let max_value = normalized
        .iter()
        .flatten()
        .copied()
        .fold(0.0f64, f64::max)
        .max(1e-9);

    // The backend borrows `path`; keep the drawing scoped so the borrow ends
    // before the path is returned.
    {
        let root = BitMapBackend::new(&path, IMG_DIMS).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow::anyhow!("Failed to clear chart background: {}", e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Confusion matrix (normalised to % of total test data)",
                (FONT, TITLE_FONT_SIZE),
            )
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA_SIZE + 60)
            .y_label_area_size(Y_LABEL_AREA_SIZE + 90)
            .build_cartesian_2d(0.0..n as f64, 0.0..n as f64)
            .map_err(|e| anyhow::anyhow!("Failed to build chart: {}", e))?;

        let class_name = |index: f64| -> String {
            LABELS
                .get(index as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            // Cell centers carry the names; row 0 sits at the top.
            .x_label_formatter(&|v| class_name(*v))
            .y_label_formatter(&|v| class_name(n as f64 - 1.0 - *v))
            .x_desc("Predicted label")
            .y_desc("True label")
            .axis_desc_style((FONT, LABEL_FONT_SIZE))
            .draw()
            .map_err(|e| anyhow::anyhow!("Failed to draw chart mesh: {}", e))?;

        chart
            .draw_series(normalized.iter().enumerate().flat_map(|(row, values)| {
                values.iter().enumerate().map(move |(col, &value)| {
                    let t = value / max_value;
                    let lerp =
                        |from: u8, to: u8| (from as f64 + t * (to as f64 - from as f64)) as u8;
                    let colour = RGBColor(
                        lerp(255, HEAT_COLOUR.0),
                        lerp(255, HEAT_COLOUR.1),
                        lerp(255, HEAT_COLOUR.2),
                    );
                    let y = (n - 1 - row) as f64;
                    Rectangle::new(
                        [(col as f64, y), (col as f64 + 1.0, y + 1.0)],
                        colour.filled(),
                    )
                })
            }))
            .map_err(|e| anyhow::anyhow!("Failed to draw heatmap cells: {}", e))?;

        root.present()
            .with_context(|| format!("Failed to write chart to {:?}", path))?;
    }

    info!("Saved confusion matrix to {:?}", path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(
            MetricKind::Accuracy.file_name(650, 0.0015),
            "Accuracy_epochs_650_lr0.0015.png"
        );
        assert_eq!(
            MetricKind::Loss.file_name(650, 0.0015),
            "Loss_epochs_650_lr0.0015.png"
        );
        assert_eq!(
            MetricKind::LossVsLr.file_name(650, 0.0015),
            "Loss_lr_6500.0015.png"
        );
    }

    #[test]
    fn test_plot_curves_length_mismatch() {
        let dir = std::env::temp_dir();
        let result = plot_curves(
            &[1.0, 2.0],
            &[0.5],
            &[0.6, 0.7],
            MetricKind::Accuracy,
            2,
            0.001,
            &dir,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_plot_confusion_matrix_rejects_ragged() {
        let dir = std::env::temp_dir();
        assert!(plot_confusion_matrix(&[vec![1.0, 2.0], vec![3.0]], &dir).is_err());
    }

    #[test]
    fn test_plot_curves_writes_file() {
        let dir = std::env::temp_dir().join("harnet_plot_curves_test");
        std::fs::create_dir_all(&dir).unwrap();
        let x: Vec<f64> = (1..=5).map(|e| e as f64).collect();
        let train = vec![2.1, 1.7, 1.3, 1.0, 0.8];
        let test = vec![2.2, 1.9, 1.5, 1.2, 1.1];
        let path = plot_curves(&x, &train, &test, MetricKind::Loss, 5, 0.0015, &dir).unwrap();
        assert_eq!(path, dir.join("Loss_epochs_5_lr0.0015.png"));
        assert!(path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_plot_curves_single_point() {
        // A one-entry learning-rate sweep still produces a chart.
        let dir = std::env::temp_dir().join("harnet_plot_single_point_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = plot_curves(
            &[0.0015],
            &[0.42],
            &[0.57],
            MetricKind::LossVsLr,
            650,
            0.0015,
            &dir,
        )
        .unwrap();
        assert!(path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_plot_confusion_matrix_writes_file() {
        let dir = std::env::temp_dir().join("harnet_plot_confusion_test");
        std::fs::create_dir_all(&dir).unwrap();
        let normalized = vec![
            vec![40.0, 2.0, 0.0],
            vec![1.0, 35.0, 3.0],
            vec![0.0, 4.0, 15.0],
        ];
        let path = plot_confusion_matrix(&normalized, &dir).unwrap();
        assert_eq!(path, dir.join("confusion_matrix.png"));
        assert!(path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
