pub mod counter;
pub mod datagram;
pub mod collector;

pub use collector::SflowCollector;
pub use counter::{CounterKind, CounterRecord, CounterSample};
pub use datagram::{Datagram, DatagramError, Sample};
