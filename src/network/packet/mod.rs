pub mod ethernet;
pub mod ipv4;
pub mod ipv6;
pub mod tcp;
pub mod udp;
pub mod icmp;

use crate::error::{DecodeError, DecodeResult};
use crate::network::packet::ethernet::{Datalink, ETHER_TYPE_IPV4, ETHER_TYPE_IPV6};
use crate::network::packet::icmp::ICMPHeader;
use crate::network::packet::ipv4::IPv4Header;
use crate::network::packet::ipv6::IPv6Header;
use crate::network::packet::tcp::TCPHeader;
use crate::network::packet::udp::UDPHeader;
use bytes::{Buf, BytesMut};
use serde::Serialize;

pub const IANA_PROTO_ICMP: u8 = 1;
pub const IANA_PROTO_TCP: u8 = 6;
pub const IANA_PROTO_UDP: u8 = 17;

/// 1回のデコードで使い捨てるパケット。`data` は未解析の残りのバイト列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Packet {
    #[serde(skip)]
    data: BytesMut,
    #[serde(rename = "l2")]
    pub datalink: Option<Datalink>,
    #[serde(rename = "l3")]
    pub network: Option<NetworkHeader>,
    #[serde(rename = "l4")]
    pub transport: Option<TransportHeader>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NetworkHeader {
    IPv4(IPv4Header),
    IPv6(IPv6Header),
}

impl NetworkHeader {
    pub fn protocol(&self) -> u8 {
        match self {
            NetworkHeader::IPv4(header) => header.protocol,
            NetworkHeader::IPv6(header) => header.next_header,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransportHeader {
    TCP(TCPHeader),
    UDP(UDPHeader),
    ICMP(ICMPHeader),
}

/// ネットワークヘッダーのプロトコル番号でトランスポート層を選ぶ
pub fn decode_transport<'a>(
    network: &NetworkHeader,
    data: &'a [u8],
) -> DecodeResult<(TransportHeader, &'a [u8])> {
    match network.protocol() {
        IANA_PROTO_ICMP => {
            let (icmp, rest) = ICMPHeader::parse(data)?;
            Ok((TransportHeader::ICMP(icmp), rest))
        }
        IANA_PROTO_TCP => {
            let (tcp, rest) = TCPHeader::parse(data)?;
            Ok((TransportHeader::TCP(tcp), rest))
        }
        IANA_PROTO_UDP => {
            let (udp, rest) = UDPHeader::parse(data)?;
            Ok((TransportHeader::UDP(udp), rest))
        }
        other => Err(DecodeError::UnknownTransportLayer(other)),
    }
}

impl Packet {
    pub fn new(frame: &[u8]) -> Self {
        Self {
            data: BytesMut::from(frame),
            datalink: None,
            network: None,
            transport: None,
        }
    }

    /// イーサネットフレームをL4まで解析する
    pub fn decode(frame: &[u8]) -> DecodeResult<Self> {
        let mut packet = Self::new(frame);

        packet.decode_ethernet()?;

        match packet.datalink.as_ref().map(|d| d.ether_type) {
            Some(ETHER_TYPE_IPV4) => packet.decode_ipv4()?,
            Some(ETHER_TYPE_IPV6) => packet.decode_ipv6()?,
            _ => {}
        }

        packet.decode_transport()?;

        Ok(packet)
    }

    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    pub fn decode_ethernet(&mut self) -> DecodeResult<()> {
        let datalink = ethernet::decode(&mut self.data)?;
        self.datalink = Some(datalink);
        Ok(())
    }

    pub fn decode_ipv4(&mut self) -> DecodeResult<()> {
        let (header, rest) = IPv4Header::parse(&self.data)?;
        let consumed = self.data.len() - rest.len();

        self.network = Some(NetworkHeader::IPv4(header));
        self.data.advance(consumed);
        Ok(())
    }

    pub fn decode_ipv6(&mut self) -> DecodeResult<()> {
        let (header, rest) = IPv6Header::parse(&self.data)?;
        let consumed = self.data.len() - rest.len();

        self.network = Some(NetworkHeader::IPv6(header));
        self.data.advance(consumed);
        Ok(())
    }

    pub fn decode_transport(&mut self) -> DecodeResult<()> {
        let network = self.network.as_ref().ok_or(DecodeError::UnknownNetworkLayer)?;
        let (header, rest) = decode_transport(network, &self.data)?;
        let consumed = self.data.len() - rest.len();

        self.transport = Some(header);
        self.data.advance(consumed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::packet::ethernet::ETHER_TYPE_ARP;

    fn ethernet(ether_type: u16) -> Vec<u8> {
        let mut data = vec![0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb];
        data.extend_from_slice(&ether_type.to_be_bytes());
        data
    }

    fn ipv4(protocol: u8) -> Vec<u8> {
        vec![
            0x45, 0x00, 0x00, 0x3c, 0x5c, 0x07, 0x00, 0x00, 0x7c, protocol, 0x48, 0xa0, 0xac, 0x10,
            0x20, 0xfe, 0xac, 0x10, 0x20, 0xf1,
        ]
    }

    fn ipv6(next_header: u8) -> Vec<u8> {
        let mut data = vec![0x60, 0x00, 0x00, 0x00, 0x00, 0x08, next_header, 0xff];
        data.extend_from_slice(&[0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01]);
        data.extend_from_slice(&[0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x02]);
        data
    }

    fn tcp() -> Vec<u8> {
        vec![
            0xc3, 0x50, 0x00, 0x50, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x50, 0x02,
            0x72, 0x10, 0x00, 0x00, 0x00, 0x00,
        ]
    }

    #[test]
    fn test_decode_ipv4_tcp_frame() {
        let mut frame = ethernet(ETHER_TYPE_IPV4);
        frame.extend(ipv4(IANA_PROTO_TCP));
        frame.extend(tcp());
        frame.extend_from_slice(b"GET /");

        let packet = Packet::decode(&frame).unwrap();

        assert_eq!(packet.datalink.as_ref().unwrap().ether_type, ETHER_TYPE_IPV4);
        match packet.network.as_ref().unwrap() {
            NetworkHeader::IPv4(header) => {
                assert_eq!(header.source.to_string(), "172.16.32.254");
                assert_eq!(header.destination.to_string(), "172.16.32.241");
            }
            other => panic!("unexpected network header: {:?}", other),
        }
        match packet.transport.as_ref().unwrap() {
            TransportHeader::TCP(header) => {
                assert_eq!(header.destination_port, 80);
                assert!(header.flags.syn);
            }
            other => panic!("unexpected transport header: {:?}", other),
        }
        assert_eq!(packet.payload(), b"GET /");
    }

    #[test]
    fn test_decode_vlan_ipv6_udp_frame() {
        let mut frame = ethernet(0x8100);
        frame.extend_from_slice(&[0x00, 0x64, 0x86, 0xdd]);
        frame.extend(ipv6(IANA_PROTO_UDP));
        frame.extend_from_slice(&[0x04, 0xd2, 0x16, 0x2e, 0x00, 0x08, 0x00, 0x00]);

        let packet = Packet::decode(&frame).unwrap();
        let datalink = packet.datalink.as_ref().unwrap();

        assert_eq!(datalink.vlan, 100);
        assert_eq!(datalink.source_mac, "66:77:88:99:aa:bb");
        assert!(matches!(packet.network, Some(NetworkHeader::IPv6(_))));
        assert!(matches!(
            packet.transport,
            Some(TransportHeader::UDP(UDPHeader { destination_port: 5678, .. }))
        ));
        assert!(packet.payload().is_empty());
    }

    #[test]
    fn test_transport_dispatch_consumes_fixed_spans() {
        for (protocol, span) in [(IANA_PROTO_ICMP, 4), (IANA_PROTO_TCP, 20), (IANA_PROTO_UDP, 8)] {
            let (network, _) = IPv4Header::parse(&ipv4(protocol)).unwrap();
            let network = NetworkHeader::IPv4(network);
            let data = vec![0x50u8; 32];

            let (_, rest) = decode_transport(&network, &data).unwrap();
            assert_eq!(rest.len(), data.len() - span);
        }
    }

    #[test]
    fn test_unknown_transport() {
        let mut packet = Packet::new(&[ipv4(99), vec![0u8; 20]].concat());
        packet.decode_ipv4().unwrap();

        assert_eq!(
            packet.decode_transport(),
            Err(DecodeError::UnknownTransportLayer(99))
        );
        assert!(packet.transport.is_none());
    }

    #[test]
    fn test_transport_without_network_layer() {
        let mut frame = ethernet(ETHER_TYPE_ARP);
        frame.extend_from_slice(&[0u8; 28]);

        assert_eq!(Packet::decode(&frame), Err(DecodeError::UnknownNetworkLayer));
    }

    #[test]
    fn test_short_transport() {
        let mut frame = ethernet(ETHER_TYPE_IPV4);
        frame.extend(ipv4(IANA_PROTO_TCP));
        frame.extend_from_slice(&tcp()[..12]);

        assert!(matches!(
            Packet::decode(&frame),
            Err(DecodeError::ShortHeader { layer: "TCP", .. })
        ));
    }

    #[test]
    fn test_decode_is_repeatable() {
        let mut frame = ethernet(ETHER_TYPE_IPV4);
        frame.extend(ipv4(IANA_PROTO_ICMP));
        frame.extend_from_slice(&[0x00, 0x00, 0xff, 0xff, 0x12, 0x34]);

        let first = Packet::decode(&frame).unwrap();
        let second = Packet::decode(&frame).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialize_names() {
        let mut frame = ethernet(ETHER_TYPE_IPV4);
        frame.extend(ipv4(IANA_PROTO_UDP));
        frame.extend_from_slice(&[0x00, 0x35, 0x00, 0x35, 0x00, 0x08, 0x00, 0x00]);

        let packet = Packet::decode(&frame).unwrap();
        let json = serde_json::to_value(&packet).unwrap();

        assert_eq!(json["l2"]["src_mac"], "66:77:88:99:aa:bb");
        assert_eq!(json["l3"]["IPv4"]["src_ip"], "172.16.32.254");
        assert_eq!(json["l4"]["UDP"]["dst_port"], 53);
    }
}
