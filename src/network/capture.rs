use crate::error::InitProcessError;
use crate::network::packet::Packet;
use log::{debug, info, warn};
use pnet::datalink::{self, Channel, NetworkInterface};

pub struct PacketCapture {
    interface: NetworkInterface,
    buffer_size: usize,
}

impl PacketCapture {
    pub fn new(interface: NetworkInterface, buffer_size: usize) -> Self {
        Self {
            interface,
            buffer_size,
        }
    }

    /// 受信したフレームを解析し、成功したものだけを `on_packet` に渡す。
    /// ブロッキングで動くため、非同期側からは `spawn_blocking` で呼ぶこと。
    pub fn run<F>(&self, mut on_packet: F) -> Result<(), InitProcessError>
    where
        F: FnMut(Packet),
    {
        let config = datalink::Config {
            read_buffer_size: self.buffer_size,
            ..Default::default()
        };

        let mut rx = match datalink::channel(&self.interface, config) {
            Ok(Channel::Ethernet(_, rx)) => rx,
            Ok(_) => {
                return Err(InitProcessError::CaptureError(
                    "未サポートのチャネルタイプです".to_string(),
                ))
            }
            Err(e) => return Err(InitProcessError::CaptureError(e.to_string())),
        };

        info!("キャプチャを開始しました: {}", self.interface.name);

        loop {
            match rx.next() {
                Ok(frame) => match Packet::decode(frame) {
                    Ok(packet) => on_packet(packet),
                    Err(e) => debug!("フレームを破棄しました ({} バイト): {}", frame.len(), e),
                },
                Err(e) => warn!("パケットの読み取り中にエラーが発生しました: {}", e),
            }
        }
    }
}
