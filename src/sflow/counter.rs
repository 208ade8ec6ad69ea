use crate::cursor::{BigEndianField, ByteCursor};
use crate::error::DecodeResult;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

// https://sflow.org/SFLOW-STRUCTS5.txt の counter_data 形式
pub const SF_GENERIC_INTERFACE_COUNTERS: u32 = 1;
pub const SF_ETHERNET_INTERFACE_COUNTERS: u32 = 2;
pub const SF_TOKEN_RING_INTERFACE_COUNTERS: u32 = 3;
pub const SF_100BASE_VG_INTERFACE_COUNTERS: u32 = 4;
pub const SF_VLAN_COUNTERS: u32 = 5;
pub const SF_PROCESSOR_COUNTERS: u32 = 1001;

/// 固定レイアウトのカウンター構造体を定義し、宣言順にフィールドを読む `decode` を生成する
macro_rules! counter_record {
    ($(#[$meta:meta])* $name:ident { $($field:ident: $ty:ty,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
        pub struct $name {
            $(pub $field: $ty,)+
        }

        impl $name {
            pub fn decode(cursor: &mut ByteCursor<'_>) -> DecodeResult<Self> {
                Ok(Self {
                    $($field: <$ty as BigEndianField>::read(cursor)?,)+
                })
            }
        }
    };
}

counter_record! {
    /// RFC 2233
    GenericInterfaceCounters {
        index: u32,
        if_type: u32,
        speed: u64,
        direction: u32,
        status: u32,
        in_octets: u64,
        in_unicast_packets: u32,
        in_multicast_packets: u32,
        in_broadcast_packets: u32,
        in_discards: u32,
        in_errors: u32,
        in_unknown_protocols: u32,
        out_octets: u64,
        out_unicast_packets: u32,
        out_multicast_packets: u32,
        out_broadcast_packets: u32,
        out_discards: u32,
        out_errors: u32,
        promiscuous_mode: u32,
    }
}

counter_record! {
    /// RFC 2358
    EthernetInterfaceCounters {
        alignment_errors: u32,
        fcs_errors: u32,
        single_collision_frames: u32,
        multiple_collision_frames: u32,
        sqe_test_errors: u32,
        deferred_transmissions: u32,
        late_collisions: u32,
        excessive_collisions: u32,
        internal_mac_transmit_errors: u32,
        carrier_sense_errors: u32,
        frame_too_longs: u32,
        internal_mac_receive_errors: u32,
        symbol_errors: u32,
    }
}

counter_record! {
    /// RFC 1748
    TokenRingCounters {
        line_errors: u32,
        burst_errors: u32,
        ac_errors: u32,
        abort_trans_errors: u32,
        internal_errors: u32,
        lost_frame_errors: u32,
        receive_congestions: u32,
        frame_copied_errors: u32,
        token_errors: u32,
        soft_errors: u32,
        hard_errors: u32,
        signal_loss: u32,
        transmit_beacons: u32,
        recoveries: u32,
        lobe_wires: u32,
        removes: u32,
        singles: u32,
        freq_errors: u32,
    }
}

counter_record! {
    /// RFC 2020
    VgCounters {
        in_high_priority_frames: u32,
        in_high_priority_octets: u64,
        in_norm_priority_frames: u32,
        in_norm_priority_octets: u64,
        in_ipm_errors: u32,
        in_oversize_frame_errors: u32,
        in_data_errors: u32,
        in_null_addressed_frames: u32,
        out_high_priority_frames: u32,
        out_high_priority_octets: u64,
        transition_into_trainings: u32,
        hc_in_high_priority_octets: u64,
        hc_in_norm_priority_octets: u64,
        hc_out_high_priority_octets: u64,
    }
}

counter_record! {
    VlanCounters {
        id: u32,
        octets: u64,
        unicast_packets: u32,
        multicast_packets: u32,
        broadcast_packets: u32,
        discards: u32,
    }
}

counter_record! {
    ProcessorCounters {
        cpu_5s: u32,
        cpu_1m: u32,
        cpu_5m: u32,
        total_memory: u64,
        free_memory: u64,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CounterKind {
    GenericInt,
    EthernetInt,
    TokenRingInt,
    SF100VgInt,
    VLAN,
    Processor,
}

impl CounterKind {
    pub fn from_format(format: u32) -> Option<Self> {
        match format {
            SF_GENERIC_INTERFACE_COUNTERS => Some(CounterKind::GenericInt),
            SF_ETHERNET_INTERFACE_COUNTERS => Some(CounterKind::EthernetInt),
            SF_TOKEN_RING_INTERFACE_COUNTERS => Some(CounterKind::TokenRingInt),
            SF_100BASE_VG_INTERFACE_COUNTERS => Some(CounterKind::SF100VgInt),
            SF_VLAN_COUNTERS => Some(CounterKind::VLAN),
            SF_PROCESSOR_COUNTERS => Some(CounterKind::Processor),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CounterKind::GenericInt => "GenericInt",
            CounterKind::EthernetInt => "EthernetInt",
            CounterKind::TokenRingInt => "TokenRingInt",
            CounterKind::SF100VgInt => "SF100VgInt",
            CounterKind::VLAN => "VLAN",
            CounterKind::Processor => "Processor",
        }
    }

    fn decode_record(&self, cursor: &mut ByteCursor<'_>) -> DecodeResult<CounterRecord> {
        Ok(match self {
            CounterKind::GenericInt => {
                CounterRecord::GenericInterface(GenericInterfaceCounters::decode(cursor)?)
            }
            CounterKind::EthernetInt => {
                CounterRecord::EthernetInterface(EthernetInterfaceCounters::decode(cursor)?)
            }
            CounterKind::TokenRingInt => CounterRecord::TokenRing(TokenRingCounters::decode(cursor)?),
            CounterKind::SF100VgInt => CounterRecord::Vg(VgCounters::decode(cursor)?),
            CounterKind::VLAN => CounterRecord::Vlan(VlanCounters::decode(cursor)?),
            CounterKind::Processor => CounterRecord::Processor(ProcessorCounters::decode(cursor)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CounterRecord {
    GenericInterface(GenericInterfaceCounters),
    EthernetInterface(EthernetInterfaceCounters),
    TokenRing(TokenRingCounters),
    Vg(VgCounters),
    Vlan(VlanCounters),
    Processor(ProcessorCounters),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterSample {
    pub sequence_number: u32,
    pub source_id_type: u32,
    pub source_id_index: u32,
    pub records_count: u32,
    pub records: BTreeMap<CounterKind, CounterRecord>,
}

impl CounterSample {
    /// counter_sample (format 2): 1バイトのソース種別と3バイトのインデックス
    pub fn decode(data: &[u8]) -> DecodeResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let sequence_number = cursor.read_u32()?;
        let source_id_type = cursor.read_u8()? as u32;
        let source_id_index = cursor.read_u24()?;

        Self::decode_records(&mut cursor, sequence_number, source_id_type, source_id_index)
    }

    /// counts_sample_expanded (format 4): ソース種別とインデックスがそれぞれ4バイト
    pub fn decode_expanded(data: &[u8]) -> DecodeResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let sequence_number = cursor.read_u32()?;
        let source_id_type = cursor.read_u32()?;
        let source_id_index = cursor.read_u32()?;

        Self::decode_records(&mut cursor, sequence_number, source_id_type, source_id_index)
    }

    fn decode_records(
        cursor: &mut ByteCursor<'_>,
        sequence_number: u32,
        source_id_type: u32,
        source_id_index: u32,
    ) -> DecodeResult<Self> {
        let records_count = cursor.read_u32()?;
        let mut records = BTreeMap::new();

        for _ in 0..records_count {
            let format = cursor.read_u32()?;
            let length = cursor.read_u32()?;

            match CounterKind::from_format(format) {
                // 宣言された長さとは照合しない。同じ種別は後勝ち
                Some(kind) => {
                    let record = kind.decode_record(cursor)?;
                    records.insert(kind, record);
                }
                None => {
                    debug!("不明なカウンター形式をスキップします: format={}, length={}", format, length);
                    cursor.skip(length as usize)?;
                }
            }
        }

        Ok(Self {
            sequence_number,
            source_id_type,
            source_id_index,
            records_count,
            records,
        })
    }

    pub fn record(&self, kind: CounterKind) -> Option<&CounterRecord> {
        self.records.get(&kind)
    }

    pub fn record_by_name(&self, name: &str) -> Option<&CounterRecord> {
        self.records
            .iter()
            .find(|(kind, _)| kind.name() == name)
            .map(|(_, record)| record)
    }
}
