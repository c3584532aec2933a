use crate::error::{Result, StockTagError};
use crate::metadata::tables;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// 実行時設定
///
/// 起動時に一度だけロードし、以降は読み取り専用。
/// クライアント・派生処理には参照で渡す（グローバル状態は持たない）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// APIキー（環境変数が優先される）
    pub api_key: Option<String>,
    /// APIキーを読む環境変数名
    pub api_key_env: String,
    /// Gemini APIエンドポイント
    pub endpoint: String,
    /// モデルID
    pub model: String,
    /// 一時エラー時の最大試行回数
    pub max_attempts: u32,
    /// バックオフ初期遅延（ミリ秒、`initial * 2^n` で指数増加）
    pub initial_delay_ms: u64,
    /// 全試行後に入れる固定クールダウン（ミリ秒）
    pub cooldown_ms: u64,
    /// タイトルの最大文字数
    pub title_max_len: usize,
    /// ファイル名（拡張子込み）の最大文字数
    pub filename_max_len: usize,
    /// キーワード集合の最大件数
    pub keyword_limit: usize,
    /// タイトル先頭に付けるブランドプレフィックス
    pub brand_prefix: String,
    /// タイトル末尾に付けるCTAフレーズの候補
    pub call_to_action: Vec<String>,
    /// キーワードから除外する単語
    pub stop_words: BTreeSet<String>,
    /// 略語辞書（小文字キー → 短縮形）
    pub abbreviations: BTreeMap<String, String>,
    /// 同義語辞書（小文字キー → 言い換え候補、ヒット時は置換）
    pub synonyms: BTreeMap<String, Vec<String>>,
    /// ログ出力先（未指定ならstderr）
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: "GOOGLE_API_KEY".into(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            model: "gemini-2.0-flash-exp".into(),
            max_attempts: 3,
            initial_delay_ms: 2000,
            cooldown_ms: 1000,
            title_max_len: 200,
            filename_max_len: 200,
            keyword_limit: 25,
            brand_prefix: String::new(),
            call_to_action: tables::CALL_TO_ACTION.iter().map(|s| s.to_string()).collect(),
            stop_words: tables::STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            abbreviations: tables::ABBREVIATIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            synonyms: tables::SYNONYMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                .collect(),
            log_file: Some(PathBuf::from("image_processing.log")),
        }
    }
}

impl Config {
    /// 設定ファイルをロード。存在しなければデフォルト設定を返す
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| StockTagError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("stocktag").join("config.yaml"))
    }

    /// APIキーを取得（環境変数を優先）
    pub fn get_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(&self.api_key_env) {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        self.api_key
            .clone()
            .ok_or_else(|| StockTagError::MissingApiKey(self.api_key_env.clone()))
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}
