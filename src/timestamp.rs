//! The TIMESTAMP production: RFC 3339 with at most six fractional digits.
//!
//! https://datatracker.ietf.org/doc/html/rfc5424#section-6.2.3

use std::fmt::{self, Write};

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use crate::error::SyntaxError;
use crate::rfc5424::Cursor;
use crate::Error;

/// TIME-SECFRAC = "." 1*6DIGIT
const MAX_FRACTION_DIGITS: usize = 6;

/// How a timestamp is rendered when an entry is serialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimestampFormat {
    /// `2003-10-11T22:14:15.003000Z`, always six fractional digits and either
    /// `Z` or a numeric offset.
    #[default]
    Rfc3339,
    /// Seconds since the Unix epoch with millisecond precision,
    /// `1065910455.003`. Carries no offset.
    EpochSeconds,
}

// Reads `count` digits and checks `min..=max`; range failures point at the
// first digit of the field.
fn field(
    cursor: &mut Cursor<'_>,
    count: usize,
    min: u32,
    max: u32,
    expected: &'static str,
) -> Result<u32, SyntaxError> {
    let start = cursor.offset();
    let value = cursor.digits(count, expected)?;
    if value < min || value > max {
        return Err(cursor.error_at(start, expected));
    }

    Ok(value)
}

/// Parse the TIMESTAMP production at the cursor.
///
/// NILVALUE is handled by the caller.
pub(crate) fn parse_rfc3339(
    cursor: &mut Cursor<'_>,
) -> Result<DateTime<FixedOffset>, SyntaxError> {
    // FULL-DATE
    let year = field(cursor, 4, 0, 9999, "DATE-FULLYEAR")? as i32;
    cursor.expect(b'-', "'-'")?;
    let month = field(cursor, 2, 1, 12, "DATE-MONTH")?;
    cursor.expect(b'-', "'-'")?;
    let day_start = cursor.offset();
    let day = field(cursor, 2, 1, 31, "DATE-MDAY")?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| cursor.error_at(day_start, "DATE-MDAY within the month"))?;

    cursor.expect(b'T', "'T'")?;

    // PARTIAL-TIME
    let hour = field(cursor, 2, 0, 23, "TIME-HOUR")?;
    cursor.expect(b':', "':'")?;
    let minute = field(cursor, 2, 0, 59, "TIME-MINUTE")?;
    cursor.expect(b':', "':'")?;
    // 60 is a leap second
    let mut second = field(cursor, 2, 0, 60, "TIME-SECOND")?;

    let mut nanos = 0u32;
    if cursor.eat(b'.') {
        let mut count = 0;
        while let Some(ch) = cursor.peek().filter(u8::is_ascii_digit) {
            if count == MAX_FRACTION_DIGITS {
                return Err(cursor.error("time offset after at most 6 TIME-SECFRAC digits"));
            }

            nanos = nanos * 10 + (ch - b'0') as u32;
            count += 1;
            cursor.bump();
        }

        if count == 0 {
            return Err(cursor.error("TIME-SECFRAC digit"));
        }
        nanos *= 10u32.pow(9 - count as u32);
    }

    if second == 60 {
        // chrono keeps leap seconds as 59 with an overflowing fraction
        second = 59;
        nanos += 1_000_000_000;
    }

    // TIME-OFFSET = "Z" / TIME-NUMOFFSET
    let offset = match cursor.peek() {
        Some(b'Z') => {
            cursor.bump();
            0
        }
        Some(sign @ (b'+' | b'-')) => {
            cursor.bump();
            let hours = field(cursor, 2, 0, 23, "TIME-NUMOFFSET hours")? as i32;
            cursor.expect(b':', "':'")?;
            let minutes = field(cursor, 2, 0, 59, "TIME-NUMOFFSET minutes")? as i32;

            let seconds = hours * 3600 + minutes * 60;
            if sign == b'-' {
                -seconds
            } else {
                seconds
            }
        }
        _ => return Err(cursor.error("'Z' or time offset")),
    };

    let datetime = date
        .and_hms_nano_opt(hour, minute, second, nanos)
        .ok_or_else(|| cursor.error("valid PARTIAL-TIME"))?;
    let offset = FixedOffset::east_opt(offset).ok_or_else(|| cursor.error("TIME-OFFSET"))?;

    offset
        .from_local_datetime(&datetime)
        .single()
        .ok_or_else(|| cursor.error("TIME-OFFSET"))
}

/// Parse a single RFC 5424 TIMESTAMP value (not NILVALUE).
///
/// ```
/// let ts = syslog5424::parse_timestamp("2003-08-24T05:14:15.000003-07:00").unwrap();
/// assert_eq!(ts.timestamp_subsec_micros(), 3);
/// ```
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>, Error> {
    let mut cursor = Cursor::new(input);
    let timestamp = parse_rfc3339(&mut cursor)?;
    cursor.expect_end("end of timestamp")?;

    Ok(timestamp)
}

pub(crate) fn write_timestamp<W: Write>(
    w: &mut W,
    timestamp: &DateTime<FixedOffset>,
    format: TimestampFormat,
) -> fmt::Result {
    match format {
        TimestampFormat::Rfc3339 => {
            write!(w, "{}", timestamp.format("%Y-%m-%dT%H:%M:%S%.6f"))?;

            let offset = timestamp.offset().local_minus_utc();
            if offset == 0 {
                return w.write_char('Z');
            }

            let sign = if offset < 0 { '-' } else { '+' };
            let offset = offset.abs();
            write!(w, "{}{:02}:{:02}", sign, offset / 3600, offset % 3600 / 60)
        }
        TimestampFormat::EpochSeconds => {
            let millis = timestamp.timestamp_millis();
            if millis < 0 {
                w.write_char('-')?;
            }

            let millis = millis.unsigned_abs();
            write!(w, "{}.{:03}", millis / 1000, millis % 1000)
        }
    }
}

/// Render a timestamp the way [`SyslogEntry`](crate::SyslogEntry) does.
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>, format: TimestampFormat) -> String {
    let mut buf = String::with_capacity(32);
    // writing into a String cannot fail
    let _ = write_timestamp(&mut buf, timestamp, format);
    buf
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Timelike, Utc};

    use super::*;
    use crate::error::Found;

    fn syntax_error(input: &str) -> SyntaxError {
        match parse_timestamp(input) {
            Err(Error::Syntax(err)) => err,
            other => panic!("{input}: expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn timestamp() {
        let ts = parse_timestamp("2015-02-18T23:16:09Z").unwrap();
        assert_eq!(
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2015, 2, 18, 23, 16, 9)
                .unwrap(),
            ts
        );

        let edt = FixedOffset::east_opt(5 * 60 * 60).unwrap();
        let ts = parse_timestamp("2015-02-18T23:59:59.234567+05:00").unwrap();
        assert_eq!(
            edt.from_local_datetime(
                &NaiveDate::from_ymd_opt(2015, 2, 18)
                    .unwrap()
                    .and_hms_micro_opt(23, 59, 59, 234_567)
                    .unwrap()
            )
            .unwrap(),
            ts
        );
        assert_eq!(ts.offset().local_minus_utc(), 5 * 60 * 60);
    }

    #[test]
    fn compare() {
        // https://datatracker.ietf.org/doc/html/rfc3339#section-5.8
        for input in [
            "1985-04-12T23:20:50.52Z",
            "1996-12-19T16:39:57-08:00",
            "1990-12-31T23:59:59Z",
            "1990-12-31T15:59:59-08:00",
            "1937-01-01T12:00:27.87+00:20",
            "2003-10-11T22:14:15.003Z",
            "2003-08-24T05:14:15.000003-07:00",
        ] {
            let got = parse_timestamp(input).unwrap();
            let want = DateTime::parse_from_rfc3339(input).unwrap();
            assert_eq!(got, want, "input: {input}, want: {}", want.to_rfc3339());
            assert_eq!(got.offset(), want.offset());
        }
    }

    #[test]
    fn leap_second() {
        let ts = parse_timestamp("1990-12-31T23:59:60Z").unwrap();
        assert_eq!(ts.second(), 59);
        assert_eq!(ts.nanosecond(), 1_000_000_000);
        assert_eq!(
            format_timestamp(&ts, TimestampFormat::Rfc3339),
            "1990-12-31T23:59:60.000000Z"
        );
    }

    #[test]
    fn too_many_fraction_digits() {
        let err = syntax_error("2003-08-24T05:14:15.0000003+07:00");
        assert_eq!(err.position, 26);
        assert_eq!(err.found, Found::Char('3'));
    }

    #[test]
    fn malformed() {
        assert_eq!(syntax_error("2003-13-24T05:14:15Z").expected, "DATE-MONTH");
        assert_eq!(syntax_error("2003-02-30T05:14:15Z").expected, "DATE-MDAY within the month");
        assert_eq!(syntax_error("2003-02-3xT05:14:15Z").expected, "DATE-MDAY");
        assert_eq!(syntax_error("2003-02-03 05:14:15Z").expected, "'T'");
        assert_eq!(syntax_error("2003-02-03T24:14:15Z").expected, "TIME-HOUR");
        assert_eq!(syntax_error("2003-02-03T05:60:15Z").expected, "TIME-MINUTE");
        assert_eq!(syntax_error("2003-02-03T05:14:61Z").expected, "TIME-SECOND");
        assert_eq!(syntax_error("2003-02-03T05:14:15.Z").expected, "TIME-SECFRAC digit");
        assert_eq!(syntax_error("2003-02-03T05:14:15").expected, "'Z' or time offset");
        assert_eq!(syntax_error("2003-02-03T05:14:15+7:00").expected, "TIME-NUMOFFSET hours");
        assert_eq!(syntax_error("2003-02-03T05:14:15+07:60").expected, "TIME-NUMOFFSET minutes");
        assert_eq!(syntax_error("2003-02-03T05:14:15Zjunk").expected, "end of timestamp");

        let err = syntax_error("2003-02-03T05:14");
        assert_eq!(err.found, Found::EndOfInput);
        assert_eq!(err.position, 16);
    }

    #[test]
    fn render_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2003, 10, 11, 22, 14, 15).unwrap() + Duration::milliseconds(3);
        assert_eq!(
            format_timestamp(&ts.fixed_offset(), TimestampFormat::Rfc3339),
            "2003-10-11T22:14:15.003000Z"
        );

        let ts = parse_timestamp("2003-08-24T05:14:15.000003-07:00").unwrap();
        assert_eq!(
            format_timestamp(&ts, TimestampFormat::Rfc3339),
            "2003-08-24T05:14:15.000003-07:00"
        );

        let ts = parse_timestamp("2019-01-20T00:46:39+05:45").unwrap();
        assert_eq!(
            format_timestamp(&ts, TimestampFormat::Rfc3339),
            "2019-01-20T00:46:39.000000+05:45"
        );
    }

    #[test]
    fn render_epoch_seconds() {
        let ts = Utc.with_ymd_and_hms(2003, 10, 11, 22, 14, 15).unwrap() + Duration::milliseconds(3);
        assert_eq!(
            format_timestamp(&ts.fixed_offset(), TimestampFormat::EpochSeconds),
            "1065910455.003"
        );

        // the offset does not change the instant
        let ts = parse_timestamp("2003-10-12T00:14:15.003999+02:00").unwrap();
        assert_eq!(
            format_timestamp(&ts, TimestampFormat::EpochSeconds),
            "1065910455.003"
        );

        let ts = parse_timestamp("1969-12-31T23:59:58.750Z").unwrap();
        assert_eq!(format_timestamp(&ts, TimestampFormat::EpochSeconds), "-1.250");
    }
}
