mod catalog;
mod error;
mod estimate;
mod ffmpeg;
mod processor;
mod schedule;
mod timestamp;

use crate::processor::ProcessOpts;
use crate::schedule::{
    ScheduleParams, DEFAULT_BUFFER, DEFAULT_SPEED_NO_SUB, DEFAULT_SPEED_WITH_SUB,
};

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(about = "Speed up a video wherever it shows no subtitles")]
struct Cli {
    #[arg(value_name = "INPUT", help = "The video file to read from.")]
    input: PathBuf,
    #[arg(value_name = "OUTPUT", help = "The video file to write to.")]
    output: PathBuf,
    #[arg(
        long,
        value_name = "FACTOR",
        default_value_t = DEFAULT_SPEED_NO_SUB,
        help = "Playback speed while no subtitle is shown."
    )]
    speed_no_sub: f64,
    #[arg(
        long,
        value_name = "FACTOR",
        default_value_t = DEFAULT_SPEED_WITH_SUB,
        help = "Playback speed while a subtitle is shown."
    )]
    speed_with_sub: f64,
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_BUFFER,
        help = "Extra time kept at subtitle speed before and after each subtitle."
    )]
    buffer: f64,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if !cli.input.exists() {
        return Err(anyhow!("Input file not found: '{}'", cli.input.display()));
    }

    let opts = ProcessOpts {
        params: ScheduleParams {
            buffer: cli.buffer,
            speed_no_sub: cli.speed_no_sub,
            speed_with_sub: cli.speed_with_sub,
        },
        input: cli.input,
        output: cli.output,
    };

    processor::process(&opts)
}
