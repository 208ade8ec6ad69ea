use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::sflow::counter::CounterSample;
use log::debug;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use thiserror::Error;

pub const SFLOW_VERSION: u32 = 5;

const AGENT_ADDRESS_IPV4: u32 = 1;
const AGENT_ADDRESS_IPV6: u32 = 2;

// https://sflow.org/SFLOW-DATAGRAM5.txt の sample_data 形式
pub const SAMPLE_FORMAT_FLOW: u32 = 1;
pub const SAMPLE_FORMAT_COUNTER: u32 = 2;
pub const SAMPLE_FORMAT_EXPANDED_FLOW: u32 = 3;
pub const SAMPLE_FORMAT_EXPANDED_COUNTER: u32 = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatagramError {
    #[error("未対応のsFlowバージョンです: {0}")]
    UnsupportedVersion(u32),

    #[error("不明なエージェントアドレス種別です: {0}")]
    UnknownAgentAddressType(u32),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Sample {
    Counter(CounterSample),
    ExpandedCounter(CounterSample),
    /// フローサンプルなど、ここでは解析しない形式
    Skipped { format: u32, length: u32 },
}

impl Sample {
    pub fn counters(&self) -> Option<&CounterSample> {
        match self {
            Sample::Counter(sample) | Sample::ExpandedCounter(sample) => Some(sample),
            Sample::Skipped { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Datagram {
    pub version: u32,
    pub agent_address: IpAddr,
    pub sub_agent_id: u32,
    pub sequence_number: u32,
    pub uptime: u32,
    pub samples_count: u32,
    pub samples: Vec<Sample>,
}

impl Datagram {
    pub fn decode(data: &[u8]) -> Result<Self, DatagramError> {
        let mut cursor = ByteCursor::new(data);

        let version = cursor.read_u32()?;
        if version != SFLOW_VERSION {
            return Err(DatagramError::UnsupportedVersion(version));
        }

        let agent_address = match cursor.read_u32()? {
            AGENT_ADDRESS_IPV4 => IpAddr::V4(Ipv4Addr::from(cursor.read_bytes::<4>()?)),
            AGENT_ADDRESS_IPV6 => IpAddr::V6(Ipv6Addr::from(cursor.read_bytes::<16>()?)),
            other => return Err(DatagramError::UnknownAgentAddressType(other)),
        };

        let sub_agent_id = cursor.read_u32()?;
        let sequence_number = cursor.read_u32()?;
        let uptime = cursor.read_u32()?;
        let samples_count = cursor.read_u32()?;

        let mut samples = Vec::new();
        for _ in 0..samples_count {
            let format = cursor.read_u32()?;
            let length = cursor.read_u32()?;
            // サンプル単位で切り出し、次のサンプルまで読み進まないようにする
            let body = cursor.read_slice(length as usize)?;

            let sample = match format {
                SAMPLE_FORMAT_COUNTER => Sample::Counter(CounterSample::decode(body)?),
                SAMPLE_FORMAT_EXPANDED_COUNTER => {
                    Sample::ExpandedCounter(CounterSample::decode_expanded(body)?)
                }
                _ => {
                    debug!("sFlowサンプルをスキップします: format={}, length={}", format, length);
                    Sample::Skipped { format, length }
                }
            };
            samples.push(sample);
        }

        Ok(Self {
            version,
            agent_address,
            sub_agent_id,
            sequence_number,
            uptime,
            samples_count,
            samples,
        })
    }

    pub fn counter_samples(&self) -> impl Iterator<Item = &CounterSample> {
        self.samples.iter().filter_map(Sample::counters)
    }
}
