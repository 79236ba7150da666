use crate::codec::CodecError;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Timelike};

/// A schedule_delivery_time or validity_period value.
///
/// On the wire both are 16-character ASCII strings (Section 7.1.1):
/// `YYMMDDhhmmsstnnp` for an absolute time, where `t` is tenths of a
/// second, `nn` counts quarter hours of UTC offset and `p` is `+` or `-`;
/// `YYMMDDhhmmss000R` for an interval relative to the SMSC's clock. An
/// absent value is the empty string (a lone NUL once framed as a C-octet
/// string).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SmppTime {
    Absolute(DateTime<FixedOffset>),
    Relative(Duration),
}

/// Relative validity beyond this is rejected (Section 7.1.1.1).
pub const MAX_VALIDITY_WEEKS: i64 = 63;

const SECONDS_PER_QUARTER_HOUR: i32 = 15 * 60;

impl SmppTime {
    /// Formats an optional time the way the Sm body carries it: the empty
    /// string when absent, 16 characters otherwise.
    pub fn format_field(value: Option<&SmppTime>) -> Result<String, CodecError> {
        match value {
            None => Ok(String::new()),
            Some(time) => time.to_smpp_string(),
        }
    }

    pub fn to_smpp_string(&self) -> Result<String, CodecError> {
        match self {
            SmppTime::Absolute(at) => {
                let tenths = at.nanosecond() / 100_000_000;
                let offset_seconds = at.offset().fix().local_minus_utc();
                let quarter_hours = offset_seconds.unsigned_abs() / SECONDS_PER_QUARTER_HOUR as u32;
                let sign = if offset_seconds < 0 { '-' } else { '+' };
                Ok(format!(
                    "{}{}{:02}{}",
                    at.format("%y%m%d%H%M%S"),
                    tenths,
                    quarter_hours,
                    sign
                ))
            }
            SmppTime::Relative(interval) => {
                if *interval > Duration::weeks(MAX_VALIDITY_WEEKS) {
                    return Err(CodecError::ValidityOutOfRange {
                        weeks: interval.num_weeks(),
                    });
                }
                if *interval < Duration::zero() {
                    return Err(CodecError::InvalidParameter {
                        field: "validity_period",
                        reason: "relative validity cannot be negative".into(),
                    });
                }
                // Interval fields use 365-day years and 30-day months.
                let total_days = interval.num_days();
                let years = total_days / 365;
                let months = total_days % 365 / 30;
                let days = total_days % 365 % 30;
                let day_seconds = interval.num_seconds() - total_days * 86_400;
                let hours = day_seconds / 3600;
                let minutes = day_seconds % 3600 / 60;
                let seconds = day_seconds % 60;
                Ok(format!(
                    "{years:02}{months:02}{days:02}{hours:02}{minutes:02}{seconds:02}000R"
                ))
            }
        }
    }

    /// Parses a time field; the empty string yields `None`.
    pub fn parse(text: &str) -> Result<Option<SmppTime>, CodecError> {
        if text.is_empty() {
            return Ok(None);
        }
        let bytes = text.as_bytes();
        if bytes.len() != 16 {
            return Err(invalid_time(format!(
                "expected 16 characters, got {}",
                bytes.len()
            )));
        }
        let year = two_digits(bytes, 0)?;
        let month = two_digits(bytes, 2)?;
        let day = two_digits(bytes, 4)?;
        let hour = two_digits(bytes, 6)?;
        let minute = two_digits(bytes, 8)?;
        let second = two_digits(bytes, 10)?;

        if bytes[15] == b'R' {
            let total_days = i64::from(year) * 365 + i64::from(month) * 30 + i64::from(day);
            let day_seconds =
                i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second);
            return Ok(Some(SmppTime::Relative(
                Duration::days(total_days) + Duration::seconds(day_seconds),
            )));
        }

        let tenths = digit(bytes, 12)?;
        let quarter_hours = two_digits(bytes, 13)?;
        let offset_seconds = match bytes[15] {
            b'+' => i32::from(quarter_hours) * SECONDS_PER_QUARTER_HOUR,
            b'-' => -i32::from(quarter_hours) * SECONDS_PER_QUARTER_HOUR,
            other => {
                return Err(invalid_time(format!(
                    "expected '+', '-' or 'R' as final character, got {:?}",
                    other as char
                )));
            }
        };
        let offset = FixedOffset::east_opt(offset_seconds)
            .ok_or_else(|| invalid_time(format!("offset of {quarter_hours} quarter hours is out of range")))?;

        // Two-digit years follow the POSIX %y convention so formatting the
        // parsed value reproduces the input.
        let full_year = if year >= 69 { 1900 + i32::from(year) } else { 2000 + i32::from(year) };
        let naive = NaiveDate::from_ymd_opt(full_year, u32::from(month), u32::from(day))
            .and_then(|date| {
                date.and_hms_micro_opt(
                    u32::from(hour),
                    u32::from(minute),
                    u32::from(second),
                    u32::from(tenths) * 100_000,
                )
            })
            .ok_or_else(|| invalid_time(format!("no such instant: {text}")))?;
        let at = naive
            .and_local_timezone(offset)
            .single()
            .ok_or_else(|| invalid_time(format!("ambiguous instant: {text}")))?;
        Ok(Some(SmppTime::Absolute(at)))
    }
}

fn invalid_time(reason: String) -> CodecError {
    CodecError::InvalidParameter {
        field: "smpp_time",
        reason,
    }
}

fn digit(bytes: &[u8], index: usize) -> Result<u8, CodecError> {
    let byte = bytes[index];
    if !byte.is_ascii_digit() {
        return Err(invalid_time(format!(
            "expected digit at position {index}, got {:?}",
            byte as char
        )));
    }
    Ok(byte - b'0')
}

fn two_digits(bytes: &[u8], index: usize) -> Result<u8, CodecError> {
    Ok(digit(bytes, index)? * 10 + digit(bytes, index + 1)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn absent_value_is_empty() {
        assert_eq!(SmppTime::format_field(None).unwrap(), "");
        assert_eq!(SmppTime::parse("").unwrap(), None);
    }

    #[test]
    fn absolute_without_offset_ends_in_zero_plus() {
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 12, 12, 30, 45)
            .unwrap();
        assert_eq!(
            SmppTime::Absolute(at).to_smpp_string().unwrap(),
            "240712123045000+"
        );
    }

    #[test]
    fn absolute_negative_offset_uses_magnitude() {
        // UTC-3:45 is 15 quarter hours west.
        let offset = FixedOffset::west_opt(3 * 3600 + 45 * 60).unwrap();
        let at = offset.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            SmppTime::Absolute(at).to_smpp_string().unwrap(),
            "240102030405015-"
        );
    }

    #[test]
    fn absolute_round_trip_with_tenths() {
        let text = "240712123045523+";
        let parsed = SmppTime::parse(text).unwrap().unwrap();
        assert_eq!(parsed.to_smpp_string().unwrap(), text);
        match parsed {
            SmppTime::Absolute(at) => {
                assert_eq!(at.nanosecond(), 500_000_000);
                assert_eq!(at.offset().local_minus_utc(), 23 * 900);
            }
            SmppTime::Relative(_) => panic!("expected absolute time"),
        }
    }

    #[test]
    fn relative_decomposition() {
        let interval = Duration::days(2) + Duration::hours(3) + Duration::minutes(4) + Duration::seconds(5);
        assert_eq!(
            SmppTime::Relative(interval).to_smpp_string().unwrap(),
            "000002030405000R"
        );
        assert_eq!(
            SmppTime::parse("000002030405000R").unwrap(),
            Some(SmppTime::Relative(interval))
        );
    }

    #[test]
    fn relative_uses_365_day_years_and_30_day_months() {
        let interval = Duration::days(400);
        // 400 days = 1 year + 1 month + 5 days under the wire decomposition.
        assert_eq!(
            SmppTime::Relative(interval).to_smpp_string().unwrap(),
            "010105000000000R"
        );
        assert_eq!(
            SmppTime::parse("010105000000000R").unwrap(),
            Some(SmppTime::Relative(interval))
        );
    }

    #[test]
    fn relative_beyond_63_weeks_is_rejected() {
        let result = SmppTime::Relative(Duration::weeks(63) + Duration::seconds(1)).to_smpp_string();
        assert!(matches!(result, Err(CodecError::ValidityOutOfRange { .. })));
        assert!(SmppTime::Relative(Duration::weeks(63)).to_smpp_string().is_ok());
    }

    #[test]
    fn malformed_fields_are_rejected() {
        assert!(SmppTime::parse("short").is_err());
        assert!(SmppTime::parse("2407121230450x0+").is_err());
        assert!(SmppTime::parse("240712123045000?").is_err());
        assert!(SmppTime::parse("241312123045000+").is_err()); // month 13
    }
}
