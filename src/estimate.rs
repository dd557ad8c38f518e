use crate::error::{Result, SubspeedError};
use crate::schedule::SpeedSegment;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub output_duration: f64,
    pub percent_saved: f64,
}

/// Computes the post-speed duration of a segment sequence and the percentage
/// of playback time saved relative to the original timeline.
pub fn estimate(segments: &[SpeedSegment]) -> Result<Estimate> {
    if segments.is_empty() {
        return Err(SubspeedError::InvalidParameter(
            "cannot estimate an empty segment sequence".to_string(),
        ));
    }

    let total_duration: f64 = segments.iter().map(SpeedSegment::duration).sum();
    if total_duration <= 0.0 {
        return Err(SubspeedError::InvalidParameter(
            "segment sequence spans no time".to_string(),
        ));
    }

    let output_duration: f64 = segments.iter().map(SpeedSegment::output_duration).sum();

    Ok(Estimate {
        output_duration,
        percent_saved: (1.0 - output_duration / total_duration) * 100.0,
    })
}
