use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use serde::Serialize;

pub const UDP_HEADER_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UDPHeader {
    #[serde(rename = "src_port")]
    pub source_port: u16,
    #[serde(rename = "dst_port")]
    pub destination_port: u16,
    pub length: u16,
    pub checksum: u16,
}

impl UDPHeader {
    pub fn parse(data: &[u8]) -> DecodeResult<(Self, &[u8])> {
        if data.len() < UDP_HEADER_LEN {
            return Err(DecodeError::ShortHeader {
                layer: "UDP",
                needed: UDP_HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut cursor = ByteCursor::new(data);
        let source_port = cursor.read_u16()?;
        let destination_port = cursor.read_u16()?;
        let length = cursor.read_u16()?;
        let checksum = cursor.read_u16()?;

        Ok((
            Self {
                source_port,
                destination_port,
                length,
                checksum,
            },
            cursor.rest(),
        ))
    }
}
