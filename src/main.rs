// src/main.rs

use anyhow::Context;
use clap::Parser;
use indicatif::ProgressBar;
use star_power::cli::Args;
use star_power::sample::SampleFilter;
use star_power::{corpus, log_build_stats, score_corpus, FameConfig, HistoryIndex};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "star_power=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let start_time = Instant::now();

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("failed to size the worker pool")?;
    }

    // Parse sample bounds before the long-running phases
    let sample = args
        .sample
        .then(|| SampleFilter::new(&args.sample_start, &args.sample_end, args.country.as_str()))
        .transpose()?;

    let records = corpus::read_corpus(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    info!("Loaded {} records from {} in {:.2?}", records.len(), args.input.display(), start_time.elapsed());

    // History spans the whole corpus; the sample is only cut afterwards
    let config = FameConfig::from(&args);
    let build_start = Instant::now();
    let index = if args.partitions > 0 {
        let bar = ProgressBar::new(args.partitions as u64);
        bar.set_message("Building history");
        let index = HistoryIndex::build_parallel(&records, config, args.partitions, bar.clone());
        bar.finish_with_message("History built");
        index
    } else {
        HistoryIndex::build(&records, config)
    };
    log_build_stats(index.stats());
    info!("History index built in {:.2?}", build_start.elapsed());

    let score_start = Instant::now();
    let bar = ProgressBar::new(records.len() as u64);
    bar.set_message("Scoring movies");
    let mut scores = score_corpus(&index, &records, bar.clone());
    bar.finish_with_message("Scoring complete");
    info!("Scored {} movies in {:.2?}", scores.len(), score_start.elapsed());

    if let Some(filter) = &sample {
        scores.retain(|s| filter.admits(&records[s.position]));
        info!(
            "Analysis sample: {} movies ({} to {}, {})",
            scores.len(),
            filter.start,
            filter.end,
            filter.country
        );
    }

    let written = corpus::write_scored(&args.output, &records, &scores)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("Wrote {} rows to {}", written, args.output.display());
    info!("Total time: {:.2?}", start_time.elapsed());
    Ok(())
}
