use crate::catalog;
use crate::error::SubspeedError;
use crate::estimate;
use crate::ffmpeg;
use crate::schedule::{self, ScheduleParams, SpeedSegment};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

pub struct ProcessOpts {
    pub input: PathBuf,
    pub output: PathBuf,
    pub params: ScheduleParams,
}

/// Runs the full pipeline: probe the input, extract and parse its subtitle
/// track, schedule the speed segments, then render and concatenate them.
pub fn process(opts: &ProcessOpts) -> Result<()> {
    schedule::validate_params(&opts.params)?;
    validate_renderable(&opts.params)?;
    ffmpeg::ensure_installed()?;

    let media = ffmpeg::probe(&opts.input).context("Failed to probe input file")?;
    let total_duration = media.duration()?;
    info!("video duration: {:.1}s", total_duration);

    let catalog = match media.first_subtitle_stream() {
        Some(index) => {
            let raw = ffmpeg::extract_subtitles(&opts.input, index)
                .context("Failed to extract subtitle track")?;
            let catalog = catalog::build_catalog(&raw).context("Failed to parse subtitle track")?;
            info!("extracted {} subtitles from stream {}", catalog.len(), index);
            catalog
        }
        None => {
            info!(
                "no subtitle stream found, the whole video plays at {}x",
                opts.params.speed_no_sub
            );
            Vec::new()
        }
    };

    let segments = schedule::schedule(&catalog, &opts.params, total_duration)?;
    let est = estimate::estimate(&segments)?;
    info!(
        "{} segments, estimated output duration {:.1}s ({:.1}% saved)",
        segments.len(),
        est.output_duration,
        est.percent_saved
    );

    render(&opts.input, &opts.output, &segments)?;
    info!("completed, video saved to '{}'", opts.output.display());
    Ok(())
}

// schedule::validate_params only guarantees positive speeds; rendering also
// needs them inside the range atempo accepts, checked before any encoding.
fn validate_renderable(params: &ScheduleParams) -> Result<(), SubspeedError> {
    for speed in [params.speed_no_sub, params.speed_with_sub] {
        if !(ffmpeg::ATEMPO_MIN..=ffmpeg::ATEMPO_MAX).contains(&speed) {
            return Err(SubspeedError::InvalidParameter(format!(
                "speed {speed} is outside the atempo range {}..={}",
                ffmpeg::ATEMPO_MIN,
                ffmpeg::ATEMPO_MAX
            )));
        }
    }
    Ok(())
}

fn render(input: &Path, output: &Path, segments: &[SpeedSegment]) -> Result<()> {
    let workdir = tempfile::tempdir().context("Failed to create segment directory")?;

    let mut clips = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        let clip = workdir.path().join(format!("segment_{i:04}.mkv"));
        debug!("rendering segment {i}: {segment}");
        ffmpeg::render_segment(input, &clip, segment)
            .with_context(|| format!("Failed to render segment {i}"))?;
        clips.push(clip);
    }

    info!("concatenating {} clips", clips.len());
    ffmpeg::concat_segments(&clips, output).context("Failed to concatenate segments")?;
    Ok(())
}
