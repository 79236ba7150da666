use crate::codec::CodecError;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

const RECEIPT_DATE_FORMAT: &str = "%y%m%d%H%M";

/// A delivery receipt carried as free text in a deliver_sm short_message.
///
/// The format is SMSC-specific but almost universally follows Appendix B
/// of the protocol document: space-separated `key:value` tokens, with
/// `submit date` and `done date` as two-word keys and `Text` consuming the
/// remainder of the line. Keys outside the well-known set are kept verbatim
/// in `extra`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DeliveryReceipt {
    /// Message id the SMSC allocated at submission.
    pub id: Option<String>,
    /// Number of short messages originally submitted.
    pub sub: Option<u32>,
    /// Number of short messages delivered.
    pub dlvrd: Option<u32>,
    pub submit_date: Option<NaiveDateTime>,
    pub done_date: Option<NaiveDateTime>,
    /// Final message state, e.g. "DELIVRD".
    pub stat: Option<String>,
    /// Network or SMSC error code.
    pub err: Option<String>,
    /// First characters of the original message.
    pub text: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl DeliveryReceipt {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Parses receipt tokens out of a decoded short_message.
    pub fn parse(short_message: &str) -> Result<Self, CodecError> {
        let mut receipt = Self::default();
        let mut rest = short_message;
        while let Some(colon) = rest.find(':') {
            let key = rest[..colon].to_lowercase();
            rest = &rest[colon + 1..];
            // "text" swallows everything to the end of the line.
            let value = if key == "text" {
                let value = rest;
                rest = "";
                value
            } else {
                match rest.find(' ') {
                    Some(space) => {
                        let value = &rest[..space];
                        rest = &rest[space + 1..];
                        value
                    }
                    None => {
                        let value = rest;
                        rest = "";
                        value
                    }
                }
            };
            match key.as_str() {
                "id" => receipt.id = Some(value.to_string()),
                "sub" => receipt.sub = Some(parse_count("sub", value)?),
                "dlvrd" => receipt.dlvrd = Some(parse_count("dlvrd", value)?),
                "submit date" => receipt.submit_date = Some(parse_date("submit date", value)?),
                "done date" => receipt.done_date = Some(parse_date("done date", value)?),
                "stat" => receipt.stat = Some(value.to_string()),
                "err" => receipt.err = Some(value.to_string()),
                "text" => receipt.text = Some(value.to_string()),
                _ => {
                    receipt.extra.insert(key, value.to_string());
                }
            }
        }
        Ok(receipt)
    }

    /// Renders the receipt in the conventional short_message layout.
    pub fn to_short_message(&self) -> String {
        format!(
            "id:{} sub:{:03} dlvrd:{:03} submit date:{} done date:{} stat:{} err:{} Text:{:<20}",
            self.id.as_deref().unwrap_or(""),
            self.sub.unwrap_or(0),
            self.dlvrd.unwrap_or(0),
            self.submit_date
                .map(|date| date.format(RECEIPT_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            self.done_date
                .map(|date| date.format(RECEIPT_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            self.stat.as_deref().unwrap_or(""),
            self.err.as_deref().unwrap_or(""),
            self.text.as_deref().unwrap_or(""),
        )
    }
}

fn parse_count(key: &'static str, value: &str) -> Result<u32, CodecError> {
    value.parse().map_err(|_| CodecError::InvalidParameter {
        field: key,
        reason: format!("receipt field expects an integer, got {value:?}"),
    })
}

fn parse_date(key: &'static str, value: &str) -> Result<NaiveDateTime, CodecError> {
    NaiveDateTime::parse_from_str(value, RECEIPT_DATE_FORMAT).map_err(|_| {
        CodecError::InvalidParameter {
            field: key,
            reason: format!("receipt field expects YYMMDDhhmm, got {value:?}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn parses_the_conventional_layout() {
        let receipt = DeliveryReceipt::parse(
            "id:abc sub:001 dlvrd:001 submit date:2401011200 done date:2401011201 \
             stat:DELIVRD err:000 Text:hello",
        )
        .unwrap();
        assert_eq!(receipt.id.as_deref(), Some("abc"));
        assert_eq!(receipt.sub, Some(1));
        assert_eq!(receipt.dlvrd, Some(1));
        assert_eq!(receipt.submit_date, Some(date(2024, 1, 1, 12, 0)));
        assert_eq!(receipt.done_date, Some(date(2024, 1, 1, 12, 1)));
        assert_eq!(receipt.stat.as_deref(), Some("DELIVRD"));
        assert_eq!(receipt.err.as_deref(), Some("000"));
        assert_eq!(receipt.text.as_deref(), Some("hello"));
        assert!(receipt.extra.is_empty());
    }

    #[test]
    fn text_consumes_the_remainder_including_spaces() {
        let receipt = DeliveryReceipt::parse("id:1 Text:hello there: world").unwrap();
        assert_eq!(receipt.text.as_deref(), Some("hello there: world"));
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let receipt = DeliveryReceipt::parse("id:1 vendor:acme stat:EXPIRED").unwrap();
        assert_eq!(receipt.extra.get("vendor").map(String::as_str), Some("acme"));
        assert_eq!(receipt.stat.as_deref(), Some("EXPIRED"));
    }

    #[test]
    fn counts_must_be_integers() {
        assert!(DeliveryReceipt::parse("sub:many").is_err());
    }

    #[test]
    fn renders_with_padding() {
        let receipt = DeliveryReceipt {
            id: Some("abc".into()),
            sub: Some(1),
            dlvrd: Some(1),
            submit_date: Some(date(2024, 1, 1, 12, 0)),
            done_date: Some(date(2024, 1, 1, 12, 1)),
            stat: Some("DELIVRD".into()),
            err: Some("000".into()),
            text: Some("hello".into()),
            extra: BTreeMap::new(),
        };
        assert_eq!(
            receipt.to_short_message(),
            "id:abc sub:001 dlvrd:001 submit date:2401011200 done date:2401011201 \
             stat:DELIVRD err:000 Text:hello               "
        );
    }

    #[test]
    fn render_and_parse_are_inverse_up_to_text_padding() {
        let receipt = DeliveryReceipt {
            id: Some("xyz".into()),
            sub: Some(2),
            dlvrd: Some(2),
            submit_date: Some(date(2024, 6, 30, 23, 59)),
            done_date: Some(date(2024, 7, 1, 0, 1)),
            stat: Some("DELIVRD".into()),
            err: Some("000".into()),
            text: Some("a twenty char text..".into()),
            extra: BTreeMap::new(),
        };
        let parsed = DeliveryReceipt::parse(&receipt.to_short_message()).unwrap();
        assert_eq!(parsed, receipt);
    }
}
