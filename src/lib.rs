pub mod config;
pub mod cursor;
pub mod error;
pub mod network;
pub mod select_device;
pub mod setup_logger;
pub mod sflow;

pub use cursor::ByteCursor;
pub use error::{DecodeError, DecodeResult};
pub use network::packet::{decode_transport, NetworkHeader, Packet, TransportHeader};
pub use sflow::{CounterRecord, CounterSample, Datagram};
