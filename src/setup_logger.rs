use crate::config::app_config::LogConfig;
use crate::error::InitProcessError;
use env_logger::{Builder, Target};
use std::fs::File;
use std::io::{self, Write};

// ファイルと標準出力の両方へ書く
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        io::stdout().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stdout().flush()
    }
}

pub fn setup_logger(config: &LogConfig) -> Result<(), InitProcessError> {
    // ログファイルを開く
    let file = File::create(&config.file)
        .map_err(|e| InitProcessError::LoggerError(format!("{}: {}", config.file.display(), e)))?;

    Builder::new()
        .filter_level(config.level_filter())
        // タイムスタンプ付きのフォーマット
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .try_init()
        .map_err(|e| InitProcessError::LoggerError(e.to_string()))?;

    Ok(())
}
