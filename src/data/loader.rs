use crate::data::{SignalTensor, INPUT_SIGNAL_TYPES};
use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Open a signal or label file, transparently decoding `.gz`.
fn open_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;

    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
    if gzipped {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Split one text row into whitespace-separated fields.
///
/// The source files pad columns with repeated blanks; `split_whitespace`
/// collapses them before parsing.
fn parse_row<T: std::str::FromStr>(line: &str, line_no: usize) -> Result<Vec<T>> {
    line.split_whitespace()
        .map(|field| {
            field
                .parse::<T>()
                .map_err(|_| anyhow::anyhow!("Malformed value {:?} on line {}", field, line_no))
        })
        .collect()
}

/// Parse one channel file into per-sample rows of equal timestep count.
fn parse_channel<R: Read>(reader: R) -> Result<Vec<Vec<f32>>> {
    let reader = BufReader::new(reader);
    let mut rows: Vec<Vec<f32>> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        let row = parse_row::<f32>(&line, idx + 1)?;
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                bail!(
                    "Inconsistent timestep count on line {}: expected {}, got {}",
                    idx + 1,
                    first.len(),
                    row.len()
                );
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        bail!("Signal file contains no rows");
    }
    Ok(rows)
}

/// Load one file per channel and reorder axes to (sample, timestep, channel).
///
/// Every channel must contribute the same number of rows, and every row the
/// same number of timesteps; anything else is an error.
pub fn load_signals(paths: &[PathBuf]) -> Result<SignalTensor> {
    if paths.is_empty() {
        bail!("No signal files given");
    }

    let mut channels: Vec<Vec<Vec<f32>>> = Vec::with_capacity(paths.len());
    for path in paths {
        let rows = parse_channel(open_reader(path)?)
            .with_context(|| format!("Failed to parse signal file {:?}", path))?;
        if let Some(first) = channels.first() {
            if rows.len() != first.len() {
                bail!(
                    "Channel {:?} has {} samples, expected {}",
                    path,
                    rows.len(),
                    first.len()
                );
            }
            if rows[0].len() != first[0].len() {
                bail!(
                    "Channel {:?} has {} timesteps, expected {}",
                    path,
                    rows[0].len(),
                    first[0].len()
                );
            }
        }
        debug!("Loaded channel {:?}: {} samples", path, rows.len());
        channels.push(rows);
    }

    let n_channels = channels.len();
    let n_samples = channels[0].len();
    let n_timesteps = channels[0][0].len();

    // Transpose (channel, sample, timestep) -> (sample, timestep, channel)
    let mut data = Vec::with_capacity(n_samples * n_timesteps * n_channels);
    for sample in 0..n_samples {
        for timestep in 0..n_timesteps {
            for channel in &channels {
                data.push(channel[sample][timestep]);
            }
        }
    }

    info!(
        "Loaded signals: {} samples x {} timesteps x {} channels",
        n_samples, n_timesteps, n_channels
    );
    SignalTensor::new(data, n_samples, n_timesteps, n_channels)
}

/// Parse a label reader: space-separated 1-based integers, one sample per row,
/// shifted to 0-based on load.
fn parse_labels<R: Read>(reader: R) -> Result<Vec<i64>> {
    let reader = BufReader::new(reader);
    let mut labels = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        for value in parse_row::<i64>(&line, idx + 1)? {
            labels.push(value - 1);
        }
    }

    if labels.is_empty() {
        bail!("Label file contains no rows");
    }
    Ok(labels)
}

/// Load a label file: source files are 1-based, in-memory labels 0-based.
pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<Vec<i64>> {
    let path = path.as_ref();
    let labels = parse_labels(open_reader(path)?)
        .with_context(|| format!("Failed to parse label file {:?}", path))?;
    info!("Loaded {} labels from {:?}", labels.len(), path);
    Ok(labels)
}

/// On-disk paths for one dataset split (`train` or `test`), UCI-HAR layout.
pub fn dataset_paths<P: AsRef<Path>>(base: P, split: &str) -> (Vec<PathBuf>, PathBuf) {
    let base = base.as_ref();
    let signals = INPUT_SIGNAL_TYPES
        .iter()
        .map(|signal| {
            base.join(split)
                .join("Inertial Signals")
                .join(format!("{}{}.txt", signal, split))
        })
        .collect();
    let labels = base.join(split).join(format!("y_{}.txt", split));
    (signals, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_channel_collapses_spaces() {
        let rows = parse_channel(Cursor::new("1.0  2.0   3.0\n 4.0 5.0 6.0 \n")).unwrap();
        assert_eq!(rows, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_parse_channel_ragged_rows() {
        assert!(parse_channel(Cursor::new("1.0 2.0\n3.0 4.0 5.0\n")).is_err());
    }

    #[test]
    fn test_parse_channel_malformed_value() {
        assert!(parse_channel(Cursor::new("1.0 oops\n")).is_err());
    }

    #[test]
    fn test_parse_labels_reindexes() {
        let labels = parse_labels(Cursor::new("1\n6\n3\n")).unwrap();
        assert_eq!(labels, vec![0, 5, 2]);
    }

    #[test]
    fn test_load_signals_transposed() {
        let dir = std::env::temp_dir().join("harnet_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let a = dir.join("chan_a.txt");
        let b = dir.join("chan_b.txt");
        std::fs::write(&a, "1 2\n3 4\n").unwrap();
        std::fs::write(&b, "5 6\n7 8\n").unwrap();

        let tensor = load_signals(&[a, b]).unwrap();
        assert_eq!(tensor.samples(), 2);
        assert_eq!(tensor.timesteps(), 2);
        assert_eq!(tensor.channels(), 2);
        // sample 0: t0 = (chan_a, chan_b) = (1, 5); t1 = (2, 6)
        assert_eq!(tensor.sample(0), &[1.0, 5.0, 2.0, 6.0]);
        assert_eq!(tensor.sample(1), &[3.0, 7.0, 4.0, 8.0]);
    }

    #[test]
    fn test_load_signals_channel_mismatch() {
        let dir = std::env::temp_dir().join("harnet_loader_mismatch");
        std::fs::create_dir_all(&dir).unwrap();
        let a = dir.join("chan_a.txt");
        let b = dir.join("chan_b.txt");
        std::fs::write(&a, "1 2\n3 4\n").unwrap();
        std::fs::write(&b, "5 6\n").unwrap();

        assert!(load_signals(&[a, b]).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_labels("/nonexistent/y_train.txt").is_err());
    }

    #[test]
    fn test_dataset_paths_layout() {
        let (signals, labels) = dataset_paths("/data", "train");
        assert_eq!(signals.len(), 9);
        assert_eq!(
            signals[0],
            PathBuf::from("/data/train/Inertial Signals/body_acc_x_train.txt")
        );
        assert_eq!(labels, PathBuf::from("/data/train/y_train.txt"));
    }
}
