use anyhow::{Context, Result};
use burn::backend::Autodiff;
use burn::prelude::Backend;
use harnet::cli::{parse_args, setup_logging, Commands, EvaluateArgs, TrainArgs};
use harnet::config::{self, Preset};
use harnet::data::{loader, SignalDataset, LABELS};
use harnet::plot::{self, MetricKind};
use harnet::training::trainer::Trainer;
use harnet::{eval, DefaultBackend};
use tracing::{error, info};

type TrainBackend = Autodiff<DefaultBackend>;

fn main() {
    let cli = parse_args();

    setup_logging(cli.verbose);

    info!("{}", harnet::info());

    let result = match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Evaluate(args) => run_evaluate(args),
    };

    if let Err(e) = result {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_split(data: &std::path::Path, split: &str) -> Result<SignalDataset> {
    let (signal_paths, label_path) = loader::dataset_paths(data, split);
    let signals = loader::load_signals(&signal_paths)
        .with_context(|| format!("Failed to load {} signals", split))?;
    let labels = loader::load_labels(&label_path)
        .with_context(|| format!("Failed to load {} labels", split))?;
    SignalDataset::new(signals, labels)
}

fn run_train(args: TrainArgs) -> Result<()> {
    let preset = Preset::by_name(&args.preset)
        .with_context(|| format!("Known presets: {:?}", Preset::names()))?;
    info!("Selected preset {}: {}", preset.name, preset.diag);

    let epochs = if args.quick {
        5
    } else {
        args.epochs.unwrap_or(config::N_EPOCHS)
    };
    harnet::utils::validation::positive(epochs as i64, "epochs")?;

    harnet::utils::ensure_dir(&args.output)?;

    // Weight initialization is the only stochastic step; seed it once.
    TrainBackend::seed(args.seed);
    let device = <TrainBackend as Backend>::Device::default();

    info!("Loading data from {:?}", args.data);
    let train = load_split(&args.data, "train")?;
    let test = load_split(&args.data, "test")?;
    info!(
        "Loaded {} training and {} test windows",
        train.len(),
        test.len()
    );

    let trainer = Trainer::<TrainBackend>::new(&preset, device.clone()).with_epochs(epochs);
    let outcomes = trainer.train_all(&train, &test).context("Training failed")?;

    let mut final_losses: Vec<(f64, f64, f64)> = Vec::new();

    for outcome in &outcomes {
        let state = &outcome.run.state;
        let lr = outcome.run.learning_rate;
        let x = state.epoch_axis();

        // Accuracy chart is in percent, loss stays raw.
        let train_acc: Vec<f64> =
            state.train_accuracy_history.iter().map(|a| a * 100.0).collect();
        let test_acc: Vec<f64> =
            state.test_accuracy_history.iter().map(|a| a * 100.0).collect();

        plot::plot_curves(&x, &train_acc, &test_acc, MetricKind::Accuracy, epochs, lr, &args.output)?;
        plot::plot_curves(
            &x,
            &state.train_loss_history,
            &state.test_loss_history,
            MetricKind::Loss,
            epochs,
            lr,
            &args.output,
        )?;

        final_losses.push((
            lr,
            state.train_loss_history.last().copied().unwrap_or(0.0),
            state.test_loss_history.last().copied().unwrap_or(0.0),
        ));

        info!(
            "Run at lr {} finished in {}",
            lr,
            harnet::utils::format_duration(outcome.run.duration_secs)
        );

        let evaluation =
            eval::evaluate(&outcome.model, &test, config::N_CLASSES, &args.output, &device)?;
        eval::write_report(&evaluation, &preset, &args.output)?;
    }

    // Final train/test loss against learning rate, one point per run.
    let lrs: Vec<f64> = final_losses.iter().map(|(lr, _, _)| *lr).collect();
    let train_losses: Vec<f64> = final_losses.iter().map(|(_, t, _)| *t).collect();
    let test_losses: Vec<f64> = final_losses.iter().map(|(_, _, t)| *t).collect();
    let last_lr = lrs.last().copied().unwrap_or(0.0);
    plot::plot_curves(
        &lrs,
        &train_losses,
        &test_losses,
        MetricKind::LossVsLr,
        epochs,
        last_lr,
        &args.output,
    )?;

    info!("Charts and results written to {:?}", args.output);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    info!("Inspecting {} split under {:?}", args.split, args.data);

    let dataset = load_split(&args.data, &args.split)?;

    println!(
        "{} split: {} windows x {} timesteps x {} channels",
        args.split,
        dataset.len(),
        dataset.signals.timesteps(),
        dataset.signals.channels()
    );
    println!("Label distribution:");
    for (label, count) in dataset
        .label_distribution(config::N_CLASSES)
        .iter()
        .enumerate()
    {
        println!("  {:<20} {}", LABELS[label], count);
    }

    Ok(())
}
