//! tracingサブスクライバの初期化
//!
//! 設定でログファイルが指定されていればそこへ、なければstderrへ出力する。
//! 進捗表示（stdoutのprintln）とは分離している。

use crate::error::Result;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{filter::LevelFilter, fmt};

pub fn init(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let set_result = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let subscriber = fmt()
                .with_max_level(level)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        None => {
            let subscriber = fmt()
                .with_max_level(level)
                .with_target(false)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    if set_result.is_err() {
        tracing::warn!("tracingサブスクライバは設定済みのためスキップ");
    }

    Ok(())
}
