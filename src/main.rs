use flow_decoder::config::AppConfig;
use flow_decoder::error::InitProcessError;
use flow_decoder::network::PacketCapture;
use flow_decoder::select_device::select_device;
use flow_decoder::setup_logger::setup_logger;
use flow_decoder::sflow::SflowCollector;
use log::{debug, error, info, warn};
use tokio::task;

#[tokio::main]
async fn main() -> Result<(), InitProcessError> {
    let config = AppConfig::from_env()?;
    setup_logger(&config.log)?;

    let mut tasks = Vec::new();

    // フレームのキャプチャと解析
    if config.capture.enabled {
        let interface = select_device(config.capture.interface.as_deref())?;
        info!("デバイスの選択に成功しました: {}", interface.name);

        let capture = PacketCapture::new(interface, config.capture.buffer_size);
        tasks.push(task::spawn_blocking(move || {
            capture.run(|packet| match serde_json::to_string(&packet) {
                Ok(json) => debug!("{}", json),
                Err(e) => warn!("パケットのシリアライズに失敗しました: {}", e),
            })
        }));
    }

    // sFlowカウンターサンプルの受信
    if config.sflow.enabled {
        let collector = SflowCollector::bind(&config.sflow).await?;
        tasks.push(task::spawn(async move {
            collector
                .run(|peer, sample| match serde_json::to_string(sample) {
                    Ok(json) => info!("{} {}", peer, json),
                    Err(e) => warn!("カウンターサンプルのシリアライズに失敗しました: {}", e),
                })
                .await
        }));
    }

    if tasks.is_empty() {
        warn!("キャプチャとsFlowの受信がどちらも無効です");
        return Ok(());
    }

    for handle in tasks {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("{}", e),
            Err(e) => error!("タスクが異常終了しました: {}", e),
        }
    }

    Ok(())
}
