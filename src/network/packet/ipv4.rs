use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use serde::Serialize;
use std::net::Ipv4Addr;

pub const IPV4_HEADER_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IPv4Header {
    pub version: u8,
    pub tos: u8,
    #[serde(rename = "total_len")]
    pub total_length: u16,
    #[serde(rename = "id")]
    pub identification: u16,
    pub flags: u8,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    #[serde(rename = "check_sum")]
    pub checksum: u16,
    #[serde(rename = "src_ip")]
    pub source: Ipv4Addr,
    #[serde(rename = "dst_ip")]
    pub destination: Ipv4Addr,
}

impl IPv4Header {
    /// 固定20バイトのみを解析する。オプションは読み飛ばさない。
    pub fn parse(data: &[u8]) -> DecodeResult<(Self, &[u8])> {
        if data.len() < IPV4_HEADER_LEN {
            return Err(DecodeError::ShortHeader {
                layer: "IPv4",
                needed: IPV4_HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut cursor = ByteCursor::new(data);
        let version = (cursor.read_u8()? & 0xf0) >> 4;
        let tos = cursor.read_u8()?;
        let total_length = cursor.read_u16()?;
        let identification = cursor.read_u16()?;
        // 既存の出力との互換のため、byte 6 の下位3ビットをフラグとする
        let flags = cursor.read_u8()? & 0x07;
        cursor.skip(1)?;
        let ttl = cursor.read_u8()?;
        let protocol = cursor.read_u8()?;
        let checksum = cursor.read_u16()?;
        let source = Ipv4Addr::from(cursor.read_bytes::<4>()?);
        let destination = Ipv4Addr::from(cursor.read_bytes::<4>()?);

        Ok((
            Self {
                version,
                tos,
                total_length,
                identification,
                flags,
                fragment_offset: 0,
                ttl,
                protocol,
                checksum,
                source,
                destination,
            },
            cursor.rest(),
        ))
    }
}
