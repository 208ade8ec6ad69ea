use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use serde::Serialize;
use std::net::Ipv6Addr;

pub const IPV6_HEADER_LEN: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IPv6Header {
    pub version: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_length: u16,
    #[serde(rename = "next_layer")]
    pub next_header: u8,
    pub hop_limit: u8,
    #[serde(rename = "src_ip")]
    pub source: Ipv6Addr,
    #[serde(rename = "dst_ip")]
    pub destination: Ipv6Addr,
}

impl IPv6Header {
    pub fn parse(data: &[u8]) -> DecodeResult<(Self, &[u8])> {
        if data.len() < IPV6_HEADER_LEN {
            return Err(DecodeError::ShortHeader {
                layer: "IPv6",
                needed: IPV6_HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut cursor = ByteCursor::new(data);
        let first = cursor.read_u8()?;
        let second = cursor.read_u8()?;
        let flow_low = cursor.read_u16()?;

        let version = first >> 4;
        let traffic_class = ((first & 0x0f) << 4) | (second >> 4);
        let flow_label = ((second & 0x0f) as u32) << 16 | flow_low as u32;

        let payload_length = cursor.read_u16()?;
        let next_header = cursor.read_u8()?;
        let hop_limit = cursor.read_u8()?;
        let source = Ipv6Addr::from(cursor.read_bytes::<16>()?);
        let destination = Ipv6Addr::from(cursor.read_bytes::<16>()?);

        Ok((
            Self {
                version,
                traffic_class,
                flow_label,
                payload_length,
                next_header,
                hop_limit,
                source,
                destination,
            },
            cursor.rest(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: [u8; 16] = [
        0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x01,
    ];
    const DST: [u8; 16] = [
        0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x1b, 0x21, 0xff, 0xfe, 0x3c, 0x9d,
        0xf8,
    ];

    fn header_bytes(first_word: [u8; 4]) -> Vec<u8> {
        let mut data = first_word.to_vec();
        data.extend_from_slice(&[0x00, 0x20, 0x11, 0x40]);
        data.extend_from_slice(&SRC);
        data.extend_from_slice(&DST);
        data
    }

    #[test]
    fn test_parse_fields() {
        let mut data = header_bytes([0x6a, 0xbc, 0xde, 0xf1]);
        data.extend_from_slice(&[0x01, 0x02, 0x03]);

        let (header, rest) = IPv6Header::parse(&data).unwrap();

        assert_eq!(header.version, 6);
        assert_eq!(header.traffic_class, 0xab);
        assert_eq!(header.flow_label, 0xcdef1);
        assert_eq!(header.payload_length, 32);
        assert_eq!(header.next_header, 17);
        assert_eq!(header.hop_limit, 64);
        assert_eq!(header.source.to_string(), "2001:db8::1");
        assert_eq!(header.destination.to_string(), "fe80::21b:21ff:fe3c:9df8");
        assert_eq!(rest, &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_field_widths_and_address_text() {
        for first_word in [[0x6f, 0xff, 0xff, 0xff], [0x60, 0x00, 0x00, 0x00], [0x6f, 0x0f, 0x00, 0x01]] {
            let (header, _) = IPv6Header::parse(&header_bytes(first_word)).unwrap();

            assert!(header.flow_label <= 0xFFFFF);
            assert_eq!(
                header.source.to_string().parse::<Ipv6Addr>().unwrap().octets(),
                SRC
            );
            assert_eq!(
                header.destination.to_string().parse::<Ipv6Addr>().unwrap().octets(),
                DST
            );
        }
    }

    #[test]
    fn test_short_header() {
        let data = header_bytes([0x60, 0, 0, 0]);
        assert!(matches!(
            IPv6Header::parse(&data[..39]),
            Err(DecodeError::ShortHeader { needed: 40, actual: 39, .. })
        ));
    }
}
