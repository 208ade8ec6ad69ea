use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use serde::Serialize;

pub const TCP_HEADER_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TCPHeader {
    #[serde(rename = "src_port")]
    pub source_port: u16,
    #[serde(rename = "dst_port")]
    pub destination_port: u16,
    pub sequence_number: u32,
    pub acknowledgment_number: u32,
    pub data_offset: u8,
    pub flags: TCPFlags,
    pub window_size: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TCPFlags {
    pub ns: bool,
    pub cwr: bool,
    pub ece: bool,
    pub urg: bool,
    pub ack: bool,
    pub psh: bool,
    pub rst: bool,
    pub syn: bool,
    pub fin: bool,
}

impl TCPFlags {
    /// データオフセットを含む16ビットの下位9ビットから生成する
    pub fn from_bits(bits: u16) -> Self {
        Self {
            ns: bits & 0x100 != 0,
            cwr: bits & 0x80 != 0,
            ece: bits & 0x40 != 0,
            urg: bits & 0x20 != 0,
            ack: bits & 0x10 != 0,
            psh: bits & 0x08 != 0,
            rst: bits & 0x04 != 0,
            syn: bits & 0x02 != 0,
            fin: bits & 0x01 != 0,
        }
    }

    pub fn bits(&self) -> u16 {
        [self.fin, self.syn, self.rst, self.psh, self.ack, self.urg, self.ece, self.cwr, self.ns]
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &set)| if set { acc | (1 << i) } else { acc })
    }
}

impl TCPHeader {
    /// 固定20バイトのみ消費する。オプションはペイロード側に残る。
    pub fn parse(data: &[u8]) -> DecodeResult<(Self, &[u8])> {
        if data.len() < TCP_HEADER_LEN {
            return Err(DecodeError::ShortHeader {
                layer: "TCP",
                needed: TCP_HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut cursor = ByteCursor::new(data);
        let source_port = cursor.read_u16()?;
        let destination_port = cursor.read_u16()?;
        let sequence_number = cursor.read_u32()?;
        let acknowledgment_number = cursor.read_u32()?;
        let offset_and_flags = cursor.read_u16()?;
        let window_size = cursor.read_u16()?;
        let checksum = cursor.read_u16()?;
        let urgent_pointer = cursor.read_u16()?;

        Ok((
            Self {
                source_port,
                destination_port,
                sequence_number,
                acknowledgment_number,
                data_offset: (offset_and_flags >> 12) as u8,
                flags: TCPFlags::from_bits(offset_and_flags & 0x01ff),
                window_size,
                checksum,
                urgent_pointer,
            },
            cursor.rest(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syn_ack() -> Vec<u8> {
        vec![
            0x01, 0xbb, 0xc3, 0x50, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x20, 0x01, 0x80, 0x12,
            0xfa, 0xf0, 0x4d, 0x2a, 0x00, 0x00,
        ]
    }

    #[test]
    fn test_parse_fixed_header() {
        let mut data = syn_ack();
        // オプション(MSS)は読み飛ばさない
        data.extend_from_slice(&[0x02, 0x04, 0x05, 0xb4]);

        let (header, rest) = TCPHeader::parse(&data).unwrap();

        assert_eq!(header.source_port, 443);
        assert_eq!(header.destination_port, 50000);
        assert_eq!(header.sequence_number, 0x1000);
        assert_eq!(header.acknowledgment_number, 0x2001);
        assert_eq!(header.data_offset, 8);
        assert!(header.flags.syn && header.flags.ack);
        assert!(!header.flags.fin && !header.flags.rst);
        assert_eq!(header.flags.bits(), 0x012);
        assert_eq!(header.window_size, 0xfaf0);
        assert_eq!(header.checksum, 0x4d2a);
        assert_eq!(rest, &[0x02, 0x04, 0x05, 0xb4]);
    }

    #[test]
    fn test_flag_bits() {
        let flags = TCPFlags::from_bits(0x1ff);
        assert!(flags.ns && flags.cwr && flags.ece && flags.fin);
        assert_eq!(flags.bits(), 0x1ff);
        assert_eq!(TCPFlags::from_bits(0).bits(), 0);
    }

    #[test]
    fn test_short_header() {
        let data = syn_ack();
        assert!(matches!(
            TCPHeader::parse(&data[..19]),
            Err(DecodeError::ShortHeader { needed: 20, .. })
        ));
    }
}
