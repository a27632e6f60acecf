// src/cli.rs

use crate::config::{DEFAULT_TOP_BILLED, DEFAULT_WINDOW_DAYS};
use crate::sample::{DEFAULT_COUNTRY, DEFAULT_SAMPLE_END, DEFAULT_SAMPLE_START};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Scores each movie by its lead actors' recent box office", long_about = None)]
pub struct Args {
    /// JSON Lines corpus with every known movie (unfiltered)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the scored records as JSON Lines
    #[arg(short, long)]
    pub output: PathBuf,

    /// Length of the lookback window, in days
    #[arg(long, env = "STAR_POWER_WINDOW_DAYS", default_value_t = DEFAULT_WINDOW_DAYS,
          value_parser = clap::value_parser!(i64).range(1..))]
    pub window_days: i64,

    /// How many top-billed actors count for each movie
    #[arg(long, env = "STAR_POWER_TOP_BILLED", default_value_t = DEFAULT_TOP_BILLED)]
    pub top_billed: usize,

    /// Build the index over this many partitions in parallel (0 = one sequential pass)
    #[arg(long, default_value_t = 0)]
    pub partitions: usize,

    /// Worker threads for building and scoring (0 = one per core)
    #[arg(long, env = "STAR_POWER_THREADS", default_value_t = 0)]
    pub threads: usize,

    /// Only write movies that belong to the analysis sample
    #[arg(long)]
    pub sample: bool,

    /// First release date of the analysis sample
    #[arg(long, default_value = DEFAULT_SAMPLE_START, requires = "sample")]
    pub sample_start: String,

    /// Last release date of the analysis sample
    #[arg(long, default_value = DEFAULT_SAMPLE_END, requires = "sample")]
    pub sample_end: String,

    /// Production country the analysis sample is restricted to
    #[arg(long, default_value = DEFAULT_COUNTRY, requires = "sample")]
    pub country: String,
}
