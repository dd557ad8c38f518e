use crate::error::{Result, SubspeedError};

use nom::bytes::complete::tag;
use nom::character::complete::{digit0, digit1, one_of};
use nom::combinator::{map_res, opt, recognize};
use nom::error::VerboseError;
use nom::sequence::pair;
use nom::IResult;

type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Converts an SRT-style `HH:MM:SS,mmm` token into seconds. The fractional
/// separator may be either `,` or `.`; hours and minutes are not
/// range-checked, so tracks running past 24:00:00 parse fine.
pub fn parse_timestamp(input: &str) -> Result<f64> {
    match timestamp(input) {
        Ok(("", seconds)) => Ok(seconds),
        _ => Err(SubspeedError::MalformedTimestamp(input.to_string())),
    }
}

fn timestamp(input: &str) -> Res<f64> {
    let (input, hours) = component(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = component(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, seconds) = seconds(input)?;

    Ok((input, hours * 3600.0 + minutes * 60.0 + seconds))
}

fn component(input: &str) -> Res<f64> {
    map_res(digit1, |s: &str| s.parse::<f64>())(input)
}

fn seconds(input: &str) -> Res<f64> {
    // The separator is usually `,`, but some tracks carry `.` instead.
    // Normalise before conversion so both forms mean the same thing.
    map_res(
        recognize(pair(digit1, opt(pair(one_of(",."), digit0)))),
        |s: &str| s.replace(',', ".").parse::<f64>(),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_parse_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let seconds = parse_timestamp(input).unwrap();

                assert!(
                    (seconds - expected).abs() < 1e-9,
                    "'{}' parsed to {}, expected {}",
                    input, seconds, expected
                );
            }
        )*
        }
    }

    test_parse_ts! {
        test_parse_ts_0: ("00:00:00,000", 0.0),
        test_parse_ts_1: ("00:00:00.000", 0.0),
        test_parse_ts_2: ("00:00:01,200", 1.2),
        test_parse_ts_3: ("00:00:01,", 1.0),
        test_parse_ts_4: ("01:02:03,456", 3723.456),
        test_parse_ts_5: ("01:02:03.456", 3723.456),
        test_parse_ts_6: ("1:2:3,5", 3723.5),
        test_parse_ts_7: ("00:00:59,999", 59.999),
        test_parse_ts_8: ("99:00:00,000", 356400.0),
    }

    macro_rules! test_reject_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let result = parse_timestamp($value);

                assert!(
                    matches!(result, Err(SubspeedError::MalformedTimestamp(_))),
                    "'{}' should have been rejected",
                    $value
                );
            }
        )*
        }
    }

    test_reject_ts! {
        test_reject_ts_empty: "",
        test_reject_ts_word: "bad",
        test_reject_ts_two_components: "00:01",
        test_reject_ts_four_components: "00:00:00:00",
        test_reject_ts_negative: "-1:00:00,000",
        test_reject_ts_trailing_garbage: "00:00:01,000x",
        test_reject_ts_inner_space: "00:00 :01,000",
        test_reject_ts_fractional_minutes: "00:1.5:00,000",
    }
}
