use clap::Parser;
use stocktag::{analyzer, cli, config, error, logging, processor, report, scanner};

use analyzer::{ApiClient, GeminiTransport};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use processor::BatchOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Process {
            directory,
            category,
            release,
            output,
            no_rename,
        } => {
            logging::init(config.log_file.as_deref(), cli.verbose)?;
            println!("🖼  stocktag - 画像タグ付けバッチ\n");

            // 1. 画像スキャン
            println!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_folder(&directory)?;
            println!("✔ {}枚の画像を検出\n", images.len());

            if images.is_empty() {
                return Err(error::StockTagError::NoImagesFound(
                    directory.display().to_string(),
                ));
            }

            // 2. 解析＋メタデータ派生＋リネーム
            println!("[2/3] AI解析・メタデータ生成中...{}", if no_rename { " (リネームなし)" } else { "" });
            let transport = GeminiTransport::new(&config)?;
            let client = ApiClient::new(transport, config.clone());
            let options = BatchOptions {
                category,
                releases: release,
                rename: !no_rename,
            };
            let rows = processor::process_images(&client, &config, &images, &options).await;
            println!("✔ 解析完了\n");

            // 3. CSVマニフェスト出力（ここだけ失敗が致命的）
            println!("[3/3] レポートを書き出し中...");
            let report_path = output.unwrap_or_else(|| {
                directory.join(format!(
                    "image_processing_report_{}.csv",
                    chrono::Local::now().format("%Y%m%d%H%M%S")
                ))
            });
            report::write_csv(&rows, &report_path)?;
            println!("✔ レポート出力: {}", report_path.display());

            let failed = rows.iter().filter(|r| !r.error.is_empty()).count();
            if failed > 0 {
                println!("\n⚠ {}件の画像でエラー（詳細はレポートのError列）", failed);
            }

            println!("\n✅ 完了");
        }

        Commands::Config {
            set_api_key,
            show,
            init,
        } => {
            let mut config = config;

            if init {
                config.save()?;
                println!("✔ 設定ファイルを作成: {}", Config::config_path()?.display());
            }

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.endpoint);
                println!("  最大試行回数: {}", config.max_attempts);
                println!("  バックオフ初期遅延: {}ms", config.initial_delay_ms);
                println!("  クールダウン: {}ms", config.cooldown_ms);
                println!("  タイトル上限: {}文字", config.title_max_len);
                println!("  ファイル名上限: {}文字", config.filename_max_len);
                println!("  キーワード上限: {}件", config.keyword_limit);
                println!(
                    "  APIキー: {}",
                    if config.get_api_key().is_ok() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}
