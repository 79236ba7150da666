use crate::codec::{
    CodecError, PDU_HEADER_LENGTH, PduHeader, check_ascii, get_c_octet_string, pack_pdu,
    put_c_octet_string,
};
use crate::datatypes::{
    CommandId, CommandStatus, DeliveryReceipt, OptionalTag, OptionalValue, Sm,
};
use crate::encoding::CodecRegistry;
use bytes::{Bytes, BytesMut};
use std::io::Cursor;

/// esm_class value marking a PDU as a delivery receipt (Section 5.2.12).
const ESM_CLASS_DELIVERY_RECEIPT: u8 = 0b0000_0100;

/// deliver_sm (Section 4.6.1): the SMSC delivering a mobile-originated
/// message or a delivery receipt to the ESME.
///
/// When bits 5-2 of esm_class read 1 the short_message is a receipt; decode
/// parses it into `receipt` and, if the text lacks an `id`, recovers it
/// from the receipted_message_id TLV. Encoding a receipt-only message
/// synthesizes the conventional text form.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverSm {
    pub sequence_number: u32,
    pub sm: Sm,
    pub receipt: Option<DeliveryReceipt>,
    pub log_id: String,
    pub extra_data: String,
}

impl DeliverSm {
    pub fn new(
        mut sm: Sm,
        receipt: Option<DeliveryReceipt>,
        sequence_number: u32,
        log_id: impl Into<String>,
        extra_data: impl Into<String>,
    ) -> Result<Self, CodecError> {
        if let Some(receipt) = &receipt {
            sm.esm_class = ESM_CLASS_DELIVERY_RECEIPT;
            // The receipt must end up in the text; synthesize before the
            // one-text-source check so a receipt alone is enough.
            if sm.short_message.is_empty() && sm.message_payload.is_empty() {
                sm.short_message = receipt.to_short_message();
            }
        }
        sm.validate()?;
        Ok(Self {
            sequence_number,
            sm,
            receipt,
            log_id: log_id.into(),
            extra_data: extra_data.into(),
        })
    }

    /// True when esm_class marks this message as a delivery receipt.
    pub fn is_delivery_receipt(&self) -> bool {
        message_class(self.sm.esm_class) == 1
    }

    pub fn to_pdu(&self, codecs: &CodecRegistry) -> Result<Bytes, CodecError> {
        let body = self.sm.to_body(codecs)?;
        Ok(pack_pdu(
            CommandId::DeliverSm,
            CommandStatus::Ok,
            self.sequence_number,
            &body,
        ))
    }

    pub(crate) fn from_pdu(
        pdu: &[u8],
        header: &PduHeader,
        codecs: &CodecRegistry,
    ) -> Result<Self, CodecError> {
        let sm = Sm::from_body(pdu, header, codecs)?;

        let receipt = if message_class(sm.esm_class) == 1 {
            let mut receipt = DeliveryReceipt::parse(&sm.short_message)?;
            if receipt.id.is_none() {
                // Some SMSCs put the id only in the TLV.
                let tlv_id = sm.optional_params.iter().find_map(|param| {
                    match (&param.tag, &param.value) {
                        (OptionalTag::ReceiptedMessageId, OptionalValue::Str(id)) => {
                            Some(id.clone())
                        }
                        _ => None,
                    }
                });
                if let Some(id) = tlv_id {
                    tracing::debug!(%id, "receipt id recovered from receipted_message_id TLV");
                    receipt.id = Some(id);
                }
            }
            Some(receipt)
        } else {
            None
        };

        Ok(Self {
            sequence_number: header.sequence_number,
            sm,
            receipt,
            log_id: String::new(),
            extra_data: String::new(),
        })
    }
}

/// Bits 5-2 of esm_class: 0 for a plain message, 1 for a receipt.
fn message_class(esm_class: u8) -> u8 {
    (esm_class >> 2) & 0x0F
}

/// deliver_sm_resp (Section 4.6.2). The message_id field is unused and
/// normally empty.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverSmResp {
    pub sequence_number: u32,
    pub command_status: CommandStatus,
    pub message_id: String,
}

impl DeliverSmResp {
    pub fn new(sequence_number: u32, command_status: CommandStatus) -> Self {
        Self {
            sequence_number,
            command_status,
            message_id: String::new(),
        }
    }

    pub fn to_pdu(&self) -> Result<Bytes, CodecError> {
        check_ascii(&self.message_id, "message_id")?;
        let mut body = BytesMut::new();
        put_c_octet_string(&mut body, &self.message_id);
        Ok(pack_pdu(
            CommandId::DeliverSmResp,
            self.command_status,
            self.sequence_number,
            &body,
        ))
    }

    pub(crate) fn from_pdu(pdu: &[u8], header: &PduHeader) -> Result<Self, CodecError> {
        let mut buf = Cursor::new(pdu);
        buf.set_position(PDU_HEADER_LENGTH as u64);
        let message_id = get_c_octet_string(&mut buf, "message_id")?;
        Ok(Self {
            sequence_number: header.sequence_number,
            command_status: header.command_status,
            message_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_header;
    use crate::datatypes::PhoneNumber;

    fn sample_sm() -> Sm {
        Sm {
            short_message: "incoming".into(),
            source: PhoneNumber::international("41791112233").unwrap(),
            destination: PhoneNumber::international("41794445566").unwrap(),
            esm_class: 0,
            ..Sm::default()
        }
    }

    #[test]
    fn receipt_synthesizes_text_and_esm_class() {
        let receipt = DeliveryReceipt {
            id: Some("m1".into()),
            stat: Some("DELIVRD".into()),
            ..DeliveryReceipt::default()
        };
        let mut sm = sample_sm();
        sm.short_message = String::new();
        let deliver = DeliverSm::new(sm, Some(receipt), 3, "", "").unwrap();
        assert_eq!(deliver.sm.esm_class, ESM_CLASS_DELIVERY_RECEIPT);
        assert!(deliver.sm.short_message.starts_with("id:m1 sub:000"));
        assert!(deliver.is_delivery_receipt());
    }

    #[test]
    fn plain_message_has_no_receipt() {
        let codecs = CodecRegistry::default();
        let deliver = DeliverSm::new(sample_sm(), None, 4, "", "").unwrap();
        let pdu = deliver.to_pdu(&codecs).unwrap();
        let header = parse_header(&pdu).unwrap();
        let decoded = DeliverSm::from_pdu(&pdu, &header, &codecs).unwrap();
        assert_eq!(decoded.receipt, None);
        assert_eq!(decoded.sm.short_message, "incoming");
    }

    #[test]
    fn response_round_trip() {
        let resp = DeliverSmResp::new(11, CommandStatus::Ok);
        let pdu = resp.to_pdu().unwrap();
        let header = parse_header(&pdu).unwrap();
        assert_eq!(DeliverSmResp::from_pdu(&pdu, &header).unwrap(), resp);
    }
}
