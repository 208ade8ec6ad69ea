use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use serde::Serialize;

pub const ICMP_HEADER_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ICMPHeader {
    #[serde(rename = "type")]
    pub icmp_type: u8,
    #[serde(rename = "code")]
    pub icmp_code: u8,
    pub checksum: u16,
}

impl ICMPHeader {
    pub fn parse(data: &[u8]) -> DecodeResult<(Self, &[u8])> {
        if data.len() < ICMP_HEADER_LEN {
            return Err(DecodeError::ShortHeader {
                layer: "ICMP",
                needed: ICMP_HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut cursor = ByteCursor::new(data);
        let icmp_type = cursor.read_u8()?;
        let icmp_code = cursor.read_u8()?;
        let checksum = cursor.read_u16()?;

        Ok((
            Self {
                icmp_type,
                icmp_code,
                checksum,
            },
            cursor.rest(),
        ))
    }
}
