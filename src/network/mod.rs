pub mod packet;
pub mod capture;

pub use capture::PacketCapture;
