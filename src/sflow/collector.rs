use crate::config::app_config::SflowConfig;
use crate::error::InitProcessError;
use crate::sflow::counter::CounterSample;
use crate::sflow::datagram::{Datagram, DatagramError};
use log::{info, warn};
use std::net::SocketAddr;
use tokio::net::UdpSocket;

pub struct SflowCollector {
    socket: UdpSocket,
    buffer_size: usize,
}

impl SflowCollector {
    pub async fn bind(config: &SflowConfig) -> Result<Self, InitProcessError> {
        let socket = UdpSocket::bind(config.listen_addr)
            .await
            .map_err(|e| InitProcessError::CollectorError(format!("{}: {}", config.listen_addr, e)))?;

        Ok(Self {
            socket,
            buffer_size: config.buffer_size,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, InitProcessError> {
        self.socket
            .local_addr()
            .map_err(|e| InitProcessError::CollectorError(e.to_string()))
    }

    /// データグラムを1つ受信して解析する。ソケットのエラーだけを外側のエラーとして返す。
    pub async fn receive(
        &self,
        buf: &mut [u8],
    ) -> Result<(SocketAddr, Result<Datagram, DatagramError>), InitProcessError> {
        let (len, peer) = self
            .socket
            .recv_from(buf)
            .await
            .map_err(|e| InitProcessError::CollectorError(e.to_string()))?;

        Ok((peer, Datagram::decode(&buf[..len])))
    }

    pub async fn run<F>(&self, mut on_sample: F) -> Result<(), InitProcessError>
    where
        F: FnMut(SocketAddr, &CounterSample),
    {
        let mut buf = vec![0u8; self.buffer_size];
        info!("sFlowの受信を開始しました: {}", self.local_addr()?);

        loop {
            match self.receive(&mut buf).await {
                Ok((peer, Ok(datagram))) => {
                    for sample in datagram.counter_samples() {
                        on_sample(peer, sample);
                    }
                }
                Ok((peer, Err(e))) => warn!("{} からのデータグラムを破棄しました: {}", peer, e),
                Err(e) => warn!("データグラムの受信に失敗しました: {}", e),
            }
        }
    }
}
