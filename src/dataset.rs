//! Loading and preparing delimited digit datasets.
//!
//! Each row of a dataset file holds one labelled sample: the class label as
//! an integer, followed by the raw integer feature values (for MNIST-style
//! files, 28x28 pixel intensities from 0 to 255).

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;

/// One labelled sample, with its feature values already normalized.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sample {
    pub label: usize,
    pub pixels: Vec<f64>,
}

/// Loads samples from a comma-delimited file, rescaling the raw integer
/// values from `[raw_min, raw_max]` into `[out_min, out_max]`.
pub fn load_scaled<P: AsRef<Path>>(
    path: P,
    raw_min: i64,
    raw_max: i64,
    out_min: f64,
    out_max: f64,
) -> Result<Vec<Sample>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;

    let mut samples = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("failed to read row {} of {}", row, path.display()))?;
        let mut fields = record.iter().map(str::trim).filter(|s| !s.is_empty());

        let label = match fields.next() {
            Some(field) => field
                .parse::<usize>()
                .with_context(|| format!("bad label in row {}", row))?,
            None => continue,
        };

        let mut pixels = Vec::with_capacity(record.len().saturating_sub(1));
        for field in fields {
            let raw: i64 = field
                .parse()
                .with_context(|| format!("bad value {:?} in row {}", field, row))?;
            pixels.push(scale(raw, raw_min, raw_max, out_min, out_max));
        }

        samples.push(Sample { label, pixels });
    }
    Ok(samples)
}

/// Loads an MNIST-style CSV file, rescaling pixel values from `[0, 255]`
/// into `[0.01, 1.0]`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    load_scaled(path, 0, 255, 0.01, 1.0)
}

/// Converts a class label into an expected-output vector: `true_value` at
/// the label's position and `false_value` everywhere else.
pub fn one_hot(
    class: usize,
    classes: usize,
    false_value: f64,
    true_value: f64,
) -> Vec<f64> {
    (0..classes)
        .map(|i| if i == class { true_value } else { false_value })
        .collect()
}

/// Returns the index of the strongest output, i.e. the class the network as
/// a whole has detected. The first maximum wins; `None` for an empty vector.
pub fn predicted_class(output: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in output.iter().enumerate() {
        match best {
            Some((_, strongest)) if v <= strongest => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

fn scale(raw: i64, raw_min: i64, raw_max: i64, out_min: f64, out_max: f64) -> f64 {
    let t = (raw - raw_min) as f64 / (raw_max - raw_min) as f64;
    t * (out_max - out_min) + out_min
}
