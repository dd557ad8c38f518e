use crate::catalog::SubtitleInterval;
use crate::error::{Result, SubspeedError};

use std::fmt;

pub const DEFAULT_SPEED_NO_SUB: f64 = 2.0;
pub const DEFAULT_SPEED_WITH_SUB: f64 = 1.0;
pub const DEFAULT_BUFFER: f64 = 0.5;

/// One constant-speed interval of the output timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSegment {
    pub start: f64,
    pub end: f64,
    pub speed: f64,
    pub has_subtitle: bool,
}

impl SpeedSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn output_duration(&self) -> f64 {
        self.duration() / self.speed
    }
}

impl fmt::Display for SpeedSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}s - {:.3}s at {}x{}",
            self.start,
            self.end,
            self.speed,
            if self.has_subtitle { " (subtitled)" } else { "" }
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduleParams {
    pub buffer: f64,
    pub speed_no_sub: f64,
    pub speed_with_sub: f64,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_BUFFER,
            speed_no_sub: DEFAULT_SPEED_NO_SUB,
            speed_with_sub: DEFAULT_SPEED_WITH_SUB,
        }
    }
}

pub fn validate_params(params: &ScheduleParams) -> Result<()> {
    for speed in [params.speed_no_sub, params.speed_with_sub] {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(SubspeedError::InvalidParameter(format!(
                "speed must be greater than 0, got {speed}"
            )));
        }
    }
    if !params.buffer.is_finite() || params.buffer < 0.0 {
        return Err(SubspeedError::InvalidParameter(format!(
            "buffer cannot be negative, got {}",
            params.buffer
        )));
    }
    Ok(())
}

/// Partitions `[0, total_duration)` into speed segments. Each subtitle's
/// window is widened by the configured buffer and clamped to the timeline;
/// everything in between plays at the no-subtitle speed.
///
/// The result tiles the timeline exactly: the first segment starts at 0, the
/// last ends at `total_duration`, and each segment begins where the previous
/// one ends. Windows whose buffers touch or overlap are merged into a single
/// subtitled segment rather than emitted out of order.
pub fn schedule(
    catalog: &[SubtitleInterval],
    params: &ScheduleParams,
    total_duration: f64,
) -> Result<Vec<SpeedSegment>> {
    validate_params(params)?;
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(SubspeedError::InvalidParameter(format!(
            "duration must be greater than 0, got {total_duration}"
        )));
    }

    let mut segments: Vec<SpeedSegment> = Vec::new();
    let mut cursor = 0.0;

    for interval in catalog {
        let padded_start = (interval.start - params.buffer).max(0.0);
        let padded_end = (interval.end + params.buffer).min(total_duration);
        if padded_end <= padded_start {
            // the whole window sits at or beyond the end of the timeline
            continue;
        }

        if padded_start > cursor {
            segments.push(SpeedSegment {
                start: cursor,
                end: padded_start,
                speed: params.speed_no_sub,
                has_subtitle: false,
            });
            segments.push(SpeedSegment {
                start: padded_start,
                end: padded_end,
                speed: params.speed_with_sub,
                has_subtitle: true,
            });
            cursor = padded_end;
        } else if padded_end > cursor {
            match segments.last_mut() {
                // buffers touch or overlap the previous caption window:
                // extend it instead of emitting an out-of-order segment
                Some(last) if last.has_subtitle => {
                    last.end = padded_end;
                    cursor = padded_end;
                }
                _ => {
                    segments.push(SpeedSegment {
                        start: cursor,
                        end: padded_end,
                        speed: params.speed_with_sub,
                        has_subtitle: true,
                    });
                    cursor = padded_end;
                }
            }
        }
        // padded_end <= cursor: fully contained in the previous window
    }

    if cursor < total_duration {
        segments.push(SpeedSegment {
            start: cursor,
            end: total_duration,
            speed: params.speed_no_sub,
            has_subtitle: false,
        });
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(buffer: f64, speed_no_sub: f64, speed_with_sub: f64) -> ScheduleParams {
        ScheduleParams {
            buffer,
            speed_no_sub,
            speed_with_sub,
        }
    }

    fn interval(start: f64, end: f64) -> SubtitleInterval {
        SubtitleInterval {
            start,
            end,
            text: "x".to_string(),
        }
    }

    fn segment(start: f64, end: f64, speed: f64, has_subtitle: bool) -> SpeedSegment {
        SpeedSegment {
            start,
            end,
            speed,
            has_subtitle,
        }
    }

    #[test]
    fn empty_catalog_yields_single_segment() {
        let segments = schedule(&[], &params(0.5, 2.0, 1.0), 100.0).unwrap();

        assert_eq!(segments, vec![segment(0.0, 100.0, 2.0, false)]);
    }

    #[test]
    fn single_subtitle_without_clamping() {
        let catalog = [interval(10.0, 12.0)];

        let segments = schedule(&catalog, &params(0.5, 2.0, 1.0), 100.0).unwrap();

        assert_eq!(
            segments,
            vec![
                segment(0.0, 9.5, 2.0, false),
                segment(9.5, 12.5, 1.0, true),
                segment(12.5, 100.0, 2.0, false),
            ]
        );
    }

    #[test]
    fn zero_buffer_uses_raw_windows() {
        let catalog = [interval(10.0, 12.0)];

        let segments = schedule(&catalog, &params(0.0, 2.0, 1.0), 100.0).unwrap();

        assert_eq!(
            segments,
            vec![
                segment(0.0, 10.0, 2.0, false),
                segment(10.0, 12.0, 1.0, true),
                segment(12.0, 100.0, 2.0, false),
            ]
        );
    }

    #[test]
    fn padded_start_clamps_to_zero() {
        let catalog = [interval(0.0, 1.0)];

        let segments = schedule(&catalog, &params(0.5, 2.0, 1.0), 10.0).unwrap();

        // no leading no-subtitle segment: the padded window starts at 0
        assert_eq!(
            segments,
            vec![segment(0.0, 1.5, 1.0, true), segment(1.5, 10.0, 2.0, false)]
        );
    }

    #[test]
    fn padded_end_clamps_to_duration() {
        let catalog = [interval(90.0, 120.0)];

        let segments = schedule(&catalog, &params(0.5, 2.0, 1.0), 100.0).unwrap();

        assert_eq!(
            segments,
            vec![
                segment(0.0, 89.5, 2.0, false),
                segment(89.5, 100.0, 1.0, true),
            ]
        );
    }

    #[test]
    fn overlapping_buffers_merge_into_one_segment() {
        let catalog = [interval(10.0, 12.0), interval(12.5, 14.0)];

        let segments = schedule(&catalog, &params(1.0, 2.0, 1.0), 100.0).unwrap();

        assert_eq!(
            segments,
            vec![
                segment(0.0, 9.0, 2.0, false),
                segment(9.0, 15.0, 1.0, true),
                segment(15.0, 100.0, 2.0, false),
            ]
        );
    }

    #[test]
    fn contained_window_does_not_rewind_the_cursor() {
        let catalog = [interval(10.0, 20.0), interval(11.0, 12.0)];

        let segments = schedule(&catalog, &params(0.0, 2.0, 1.0), 100.0).unwrap();

        assert_eq!(
            segments,
            vec![
                segment(0.0, 10.0, 2.0, false),
                segment(10.0, 20.0, 1.0, true),
                segment(20.0, 100.0, 2.0, false),
            ]
        );
    }

    #[test]
    fn adjacent_windows_do_not_split() {
        let catalog = [interval(10.0, 12.0), interval(12.0, 14.0)];

        let segments = schedule(&catalog, &params(0.0, 2.0, 1.0), 100.0).unwrap();

        assert_eq!(
            segments,
            vec![
                segment(0.0, 10.0, 2.0, false),
                segment(10.0, 14.0, 1.0, true),
                segment(14.0, 100.0, 2.0, false),
            ]
        );
    }

    #[test]
    fn interval_beyond_duration_is_skipped() {
        let catalog = [interval(150.0, 160.0)];

        let segments = schedule(&catalog, &params(0.5, 2.0, 1.0), 100.0).unwrap();

        assert_eq!(segments, vec![segment(0.0, 100.0, 2.0, false)]);
    }

    #[test]
    fn coverage_invariant_holds_for_irregular_catalogs() {
        let catalog = [
            interval(0.2, 3.0),
            interval(2.8, 4.0),
            interval(10.0, 11.0),
            interval(10.1, 10.2),
            interval(95.0, 130.0),
        ];
        let duration = 100.0;

        let segments = schedule(&catalog, &params(0.7, 2.5, 1.0), duration).unwrap();

        assert_eq!(segments.first().unwrap().start, 0.0);
        assert_eq!(segments.last().unwrap().end, duration);
        for window in segments.windows(2) {
            assert_eq!(window[0].end, window[1].start);
            assert!(window[0].end > window[0].start);
        }
        for seg in &segments {
            let expected = if seg.has_subtitle { 1.0 } else { 2.5 };
            assert_eq!(seg.speed, expected);
        }
    }

    #[test]
    fn rejects_out_of_domain_parameters() {
        let bad = [
            (params(0.5, 0.0, 1.0), 100.0),
            (params(0.5, 2.0, -1.0), 100.0),
            (params(-0.1, 2.0, 1.0), 100.0),
            (params(0.5, 2.0, 1.0), 0.0),
            (params(0.5, 2.0, 1.0), -5.0),
        ];
        for (p, duration) in bad {
            let result = schedule(&[], &p, duration);
            assert!(matches!(result, Err(SubspeedError::InvalidParameter(_))));
        }
    }
}
