use crate::error::{Result, SubspeedError};
use crate::schedule::SpeedSegment;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::Deserialize;

// ffmpeg's atempo filter only accepts factors in this range
pub const ATEMPO_MIN: f64 = 0.5;
pub const ATEMPO_MAX: f64 = 100.0;

pub fn ensure_installed() -> Result<()> {
    for tool in ["ffmpeg", "ffprobe"] {
        which::which(tool).map_err(|_| SubspeedError::MissingTool(tool))?;
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    streams: Vec<Stream>,
    format: Format,
}

#[derive(Debug, Deserialize)]
struct Stream {
    index: usize,
    codec_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Format {
    duration: Option<String>,
}

impl MediaInfo {
    pub fn duration(&self) -> Result<f64> {
        let raw = self
            .format
            .duration
            .as_deref()
            .ok_or_else(|| SubspeedError::Probe("container reports no duration".to_string()))?;
        raw.parse()
            .map_err(|_| SubspeedError::Probe(format!("unparseable duration '{raw}'")))
    }

    pub fn first_subtitle_stream(&self) -> Option<usize> {
        self.streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("subtitle"))
            .map(|s| s.index)
    }
}

pub fn probe(input: &Path) -> Result<MediaInfo> {
    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_streams", "-show_format"])
        .arg(input)
        .output()
        .map_err(|source| SubspeedError::Spawn {
            tool: "ffprobe",
            source,
        })?;
    if !output.status.success() {
        return Err(tool_failure("ffprobe", &output));
    }
    serde_json::from_slice(&output.stdout).map_err(|err| SubspeedError::Probe(err.to_string()))
}

/// Demuxes one subtitle stream to SRT text via a scratch file.
pub fn extract_subtitles(input: &Path, stream_index: usize) -> Result<String> {
    let scratch = tempfile::Builder::new().suffix(".srt").tempfile()?;

    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(input)
        .args(["-map", &format!("0:{stream_index}")])
        .args(["-c:s", "srt"])
        .arg(scratch.path())
        .arg("-y")
        .output()
        .map_err(|source| SubspeedError::Spawn {
            tool: "ffmpeg",
            source,
        })?;
    if !output.status.success() {
        return Err(tool_failure("ffmpeg", &output));
    }

    let text = std::fs::read_to_string(scratch.path())?;
    // ffmpeg may emit a BOM depending on the source track
    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Re-encodes one segment of the input at the segment's speed.
pub fn render_segment(input: &Path, clip: &Path, segment: &SpeedSegment) -> Result<()> {
    let filter = format!(
        "[0:v]setpts={}*PTS[v];[0:a]atempo={}[a]",
        1.0 / segment.speed,
        segment.speed
    );

    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-i")
        .arg(input)
        .args(["-ss", &segment.start.to_string()])
        .args(["-t", &segment.duration().to_string()])
        .args(["-filter_complex", &filter])
        .args(["-map", "[v]", "-map", "[a]"])
        .args(["-c:v", "libx264", "-preset", "fast"])
        .args(["-c:a", "aac"]);
    if segment.has_subtitle {
        cmd.args(["-c:s", "copy"]);
    }

    let output = cmd
        .arg(clip)
        .arg("-y")
        .output()
        .map_err(|source| SubspeedError::Spawn {
            tool: "ffmpeg",
            source,
        })?;
    if !output.status.success() {
        return Err(tool_failure("ffmpeg", &output));
    }
    Ok(())
}

/// Concatenates the rendered clips, in order, with the concat demuxer.
pub fn concat_segments(clips: &[PathBuf], out: &Path) -> Result<()> {
    let mut list = tempfile::Builder::new().suffix(".txt").tempfile()?;
    for clip in clips {
        writeln!(list, "file '{}'", clip.display())?;
    }
    list.flush()?;

    let output = Command::new("ffmpeg")
        .args(["-f", "concat", "-safe", "0", "-i"])
        .arg(list.path())
        .args(["-c", "copy"])
        .arg(out)
        .arg("-y")
        .output()
        .map_err(|source| SubspeedError::Spawn {
            tool: "ffmpeg",
            source,
        })?;
    if !output.status.success() {
        return Err(tool_failure("ffmpeg", &output));
    }
    Ok(())
}

fn tool_failure(tool: &'static str, output: &Output) -> SubspeedError {
    SubspeedError::Tool {
        tool,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}
