use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use bytes::{Buf, BytesMut};
use serde::Serialize;

pub const ETHER_TYPE_IPV4: u16 = 0x0800;
pub const ETHER_TYPE_ARP: u16 = 0x0806;
pub const ETHER_TYPE_IEEE8021Q: u16 = 0x8100;
pub const ETHER_TYPE_IPV6: u16 = 0x86DD;
pub const ETHER_TYPE_LACP: u16 = 0x8809;

pub const ETHERNET_HEADER_LEN: usize = 14;
const VLAN_TAG_LEN: usize = 4;
const VLAN_ID_MASK: u16 = 0x0fff;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Datalink {
    #[serde(rename = "src_mac")]
    pub source_mac: String,
    #[serde(rename = "dst_mac")]
    pub destination_mac: String,
    #[serde(rename = "vlan_id")]
    pub vlan: u16,
    pub ether_type: u16,
}

impl Datalink {
    pub fn is_tagged(&self) -> bool {
        self.vlan != 0
    }

    // VLANタグのEtherTypeの場合、MACアドレスはまだ埋めない
    fn parse_ieee802(data: &[u8]) -> DecodeResult<Self> {
        let mut cursor = ByteCursor::new(data);
        let destination = cursor.read_bytes::<6>()?;
        let source = cursor.read_bytes::<6>()?;
        let ether_type = cursor.read_u16()?;

        let mut datalink = Self {
            ether_type,
            ..Default::default()
        };

        if ether_type != ETHER_TYPE_IEEE8021Q {
            datalink.destination_mac = format_mac(&destination);
            datalink.source_mac = format_mac(&source);
        }

        Ok(datalink)
    }
}

pub fn format_mac(mac: &[u8; 6]) -> String {
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}

/// イーサネットヘッダーを解析し、バッファをネットワーク層の先頭まで進める。
///
/// 802.1Qタグは1段のみ外す。二重タグの内側はEtherTypeとして扱われる。
pub(crate) fn decode(data: &mut BytesMut) -> DecodeResult<Datalink> {
    if data.len() < ETHERNET_HEADER_LEN {
        return Err(DecodeError::ShortHeader {
            layer: "Ethernet",
            needed: ETHERNET_HEADER_LEN,
            actual: data.len(),
        });
    }

    let mut datalink = Datalink::parse_ieee802(data)?;

    if datalink.ether_type == ETHER_TYPE_IEEE8021Q {
        if data.len() < ETHERNET_HEADER_LEN + VLAN_TAG_LEN {
            return Err(DecodeError::ShortHeader {
                layer: "802.1Q",
                needed: ETHERNET_HEADER_LEN + VLAN_TAG_LEN,
                actual: data.len(),
            });
        }

        let mut tag = ByteCursor::new(&data[ETHERNET_HEADER_LEN..]);
        let vlan = tag.read_u16()? & VLAN_ID_MASK;

        // MACアドレスをタグ分だけ後ろへずらし、タグを詰める
        data.copy_within(0..12, VLAN_TAG_LEN);
        data.advance(VLAN_TAG_LEN);

        datalink = Datalink::parse_ieee802(data)?;
        datalink.vlan = vlan;
    }

    data.advance(ETHERNET_HEADER_LEN);

    Ok(datalink)
}
