use crate::error::{Result, SubspeedError};
use crate::timestamp::parse_timestamp;

const TIMING_SEPARATOR: &str = " --> ";
const MIN_BLOCK_LINES: usize = 3;

/// One caption's display window, in seconds from the start of the video.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleInterval {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Parses an SRT-family blob into intervals sorted ascending by start time.
///
/// Blocks that are too short or have no ` --> ` line are dropped silently,
/// so a truncated trailing block does not fail the whole track. A block that
/// does carry a timing line but whose timestamps will not parse is fatal.
pub fn build_catalog(raw: &str) -> Result<Vec<SubtitleInterval>> {
    let mut intervals = Vec::new();
    for block in blocks(raw) {
        if let Some(interval) = parse_block(&block)? {
            intervals.push(interval);
        }
    }
    // sort_by is stable, so equal start times keep their track order
    intervals.sort_by(|a, b| a.start.total_cmp(&b.start));
    Ok(intervals)
}

fn blocks(raw: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_block(lines: &[&str]) -> Result<Option<SubtitleInterval>> {
    if lines.len() < MIN_BLOCK_LINES {
        return Ok(None);
    }
    // lines[0] is the sequence number, which nothing downstream needs
    let timing = lines[1];
    let (start_str, end_str) = match timing.split_once(TIMING_SEPARATOR) {
        Some(split) => split,
        None => return Ok(None),
    };

    let start = parse_timestamp(start_str.trim())
        .map_err(|err| SubspeedError::SubtitleFormat(format!("bad timing line '{timing}': {err}")))?;
    let end = parse_timestamp(end_str.trim())
        .map_err(|err| SubspeedError::SubtitleFormat(format!("bad timing line '{timing}': {err}")))?;
    if end <= start {
        return Err(SubspeedError::SubtitleFormat(format!(
            "timing line '{timing}' ends before it starts"
        )));
    }

    Ok(Some(SubtitleInterval {
        start,
        end,
        text: lines[2..].join(" "),
    }))
}
