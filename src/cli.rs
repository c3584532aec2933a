use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stocktag")]
#[command(about = "AI画像解析によるストック素材のタグ付け・リネーム・CSVマニフェスト生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// フォルダ内の画像を解析・タグ付け・リネームしてCSVマニフェストを出力
    Process {
        /// 画像フォルダのパス
        #[arg(required = true)]
        directory: PathBuf,

        /// カテゴリコード（全行にそのまま転記）
        #[arg(short, long)]
        category: Option<String>,

        /// リリース名（複数指定可、全行にそのまま転記）
        #[arg(short, long)]
        release: Vec<String>,

        /// 出力CSVファイル（デフォルト: フォルダ内にタイムスタンプ付きで生成）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 新ファイル名を導出するだけで実際にはリネームしない
        #[arg(long)]
        no_rename: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定ファイルに保存
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// デフォルト設定ファイルを書き出す
        #[arg(long)]
        init: bool,
    },
}
