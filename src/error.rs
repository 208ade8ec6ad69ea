use thiserror::Error;

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{layer}ヘッダーが短すぎます: 必要 {needed} バイト, 実際 {actual} バイト")]
    ShortHeader {
        layer: &'static str,
        needed: usize,
        actual: usize,
    },

    #[error("バッファが途中で終了しました: 必要 {needed} バイト, 残り {remaining} バイト")]
    Truncated { needed: usize, remaining: usize },

    #[error("不明なネットワーク層です")]
    UnknownNetworkLayer,

    #[error("不明なトランスポート層です: プロトコル番号 {0}")]
    UnknownTransportLayer(u8),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("環境変数の解析に失敗しました: {key}={value}")]
    Parse { key: String, value: String },
}

#[derive(Error, Debug)]
pub enum InitProcessError {
    #[error("ロガーのセットアップに失敗しました: {0}")]
    LoggerError(String),

    #[error("設定の読み込みに失敗しました: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("デバイス選択エラー: {0}")]
    DeviceSelectionError(String),

    #[error("パケットキャプチャエラー: {0}")]
    CaptureError(String),

    #[error("sFlowコレクターエラー: {0}")]
    CollectorError(String),
}
