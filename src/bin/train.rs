//! Trains a digit classifier on MNIST-style CSV data and reports accuracy.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::{SeedableRng, StdRng};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use unitnet::dataset::{self, Sample};
use unitnet::network::Network;
use unitnet::trainer::{Logging, StopCondition, Trainer};

/// 28x28 pixels per handwritten digit.
const INPUT_UNITS: usize = 28 * 28;
/// One output unit per decimal digit.
const CLASSES: usize = 10;

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train a feedforward digit classifier on MNIST-style CSV data")]
struct Args {
    /// Training samples: one CSV row per sample, label first.
    train: PathBuf,

    /// Test samples in the same format.
    test: PathBuf,

    /// Learning rate
    #[arg(long, default_value_t = 0.2)]
    alpha: f64,

    /// Number of hidden units
    #[arg(long, default_value_t = 100)]
    hidden: usize,

    /// Number of passes over the training set
    #[arg(long, default_value_t = 1)]
    epochs: usize,

    /// Random seed for weight initialization; defaults to the current time
    #[arg(long)]
    seed: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as usize)
            .unwrap_or(0)
    });
    let seed: &[_] = &[seed];
    let mut rng: StdRng = SeedableRng::from_seed(seed);

    let network =
        Network::new(&[INPUT_UNITS, args.hidden, CLASSES], &mut rng);

    println!("Training..");
    let training = load_examples(&args.train)?;
    let mut network = Trainer::new(network)
        .learning_rate(args.alpha)
        .logging(Logging::Samples(1000))
        .stop_condition(StopCondition::Iterations(args.epochs))
        .train(&training)
        .context("training failed")?;
    println!("Finished training with {} samples.", training.len());

    println!("Testing..");
    let test = load_samples(&args.test)?;
    let (pass, fail) = score(&mut network, &test);
    println!("Finished testing with {} samples.", test.len());

    println!("pass = {}", pass);
    println!("fail = {}", fail);
    println!(
        "Success rate: {:.1}%",
        100.0 * pass as f64 / (pass + fail) as f64
    );
    Ok(())
}

/// Loads a sample file and checks every sample against the network shape.
fn load_samples(path: &Path) -> Result<Vec<Sample>> {
    let samples = dataset::load(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    for (n, sample) in samples.iter().enumerate() {
        if sample.pixels.len() != INPUT_UNITS {
            bail!(
                "sample {} of {} has {} pixels, expected {}",
                n,
                path.display(),
                sample.pixels.len(),
                INPUT_UNITS
            );
        }
        if sample.label >= CLASSES {
            bail!("sample {} of {} has label {}", n, path.display(), sample.label);
        }
    }
    Ok(samples)
}

/// Loads a sample file and pairs every sample with its one-hot expected
/// output vector.
fn load_examples(path: &Path) -> Result<Vec<(Vec<f64>, Vec<f64>)>> {
    let samples = load_samples(path)?;
    Ok(samples
        .into_iter()
        .map(|sample| {
            let expected = dataset::one_hot(sample.label, CLASSES, 0.01, 0.99);
            (sample.pixels, expected)
        })
        .collect())
}

/// Queries the network with every sample and counts correct detections.
fn score(network: &mut Network, samples: &[Sample]) -> (usize, usize) {
    let mut pass = 0;
    let mut fail = 0;
    for sample in samples {
        network.query(&sample.pixels);
        match dataset::predicted_class(&network.output()) {
            Some(class) if class == sample.label => pass += 1,
            _ => fail += 1,
        }
    }
    (pass, fail)
}
