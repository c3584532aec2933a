//! 画像解析クライアント
//!
//! 1枚の画像＋固定プロンプトをリモートモデルに送り、構造化結果を得る。
//! - 一時エラーは指数バックオフ付きで上限回数までリトライ
//! - 全試行後に固定クールダウンを挿入（呼び出し側レート制限）
//! - 回復不能な失敗はプレースホルダ結果に縮退し、バッチを止めない

mod gemini;
mod prompt;
mod types;

pub use gemini::GeminiTransport;
pub use prompt::ANALYSIS_INSTRUCTION;
pub use types::AnalysisResult;

use crate::config::Config;
use crate::error::{Result, StockTagError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// トランスポート1往復の結果
#[derive(Debug)]
pub enum GenerateOutcome {
    /// 候補テキスト（全partsを連結済み）
    Text(String),
    /// コンテンツポリシーによるブロック（理由付き）
    Blocked(String),
    /// 候補ゼロ
    NoCandidates,
}

#[async_trait]
pub trait AnalysisTransport {
    async fn generate(
        &self,
        image: &[u8],
        media_type: &str,
        instruction: &str,
    ) -> Result<GenerateOutcome>;
}

/// リトライ・縮退ラッパ
pub struct ApiClient<T> {
    transport: T,
    config: Config,
}

impl<T: AnalysisTransport> ApiClient<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Self { transport, config }
    }

    /// 画像を解析する。失敗してもエラーは返さず、プレースホルダに縮退する
    ///
    /// 失敗時の優先順位:
    /// 1. ブロック → 即プレースホルダ（リトライなし）
    /// 2. 候補ゼロ → 即プレースホルダ（リトライなし）
    /// 3. JSONパース失敗 → 生テキストを保持したプレースホルダ（リトライなし）
    /// 4. 一時エラー → `initial * 2^n` の遅延でリトライ、上限でプレースホルダ
    /// 5. その他 → 即プレースホルダ
    pub async fn analyze(&self, image: &[u8], media_type: &str, origin: &Path) -> AnalysisResult {
        let mut failures = 0u32;

        loop {
            info!(path = %origin.display(), attempt = failures + 1, "解析リクエスト送信");
            let outcome = self
                .transport
                .generate(image, media_type, ANALYSIS_INSTRUCTION)
                .await;

            // 成否に関わらず毎試行後に固定クールダウン
            self.cooldown().await;

            match outcome {
                Ok(GenerateOutcome::Text(text)) => {
                    debug!(path = %origin.display(), response = %text, "生レスポンス");
                    return parse_analysis_response(&text, origin);
                }
                Ok(GenerateOutcome::Blocked(reason)) => {
                    error!(path = %origin.display(), reason = %reason, "プロンプトがブロックされた");
                    return AnalysisResult::placeholder();
                }
                Ok(GenerateOutcome::NoCandidates) => {
                    error!(path = %origin.display(), "候補ゼロのレスポンス");
                    return AnalysisResult::placeholder();
                }
                Err(StockTagError::ApiUnavailable(msg)) => {
                    failures += 1;
                    if failures >= self.config.max_attempts {
                        error!(
                            path = %origin.display(),
                            attempts = failures,
                            "リトライ上限に到達: {}", msg
                        );
                        return AnalysisResult::placeholder();
                    }
                    let delay = backoff_delay(self.config.initial_delay_ms, failures - 1);
                    warn!(
                        path = %origin.display(),
                        attempt = failures,
                        delay_ms = delay.as_millis() as u64,
                        "一時エラー、リトライ待機: {}", msg
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    error!(path = %origin.display(), "解析失敗: {}", err);
                    return AnalysisResult::placeholder();
                }
            }
        }
    }

    async fn cooldown(&self) {
        if self.config.cooldown_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.cooldown_ms)).await;
        }
    }
}

/// n回目の失敗後に待つ時間（nは0始まり、`initial * 2^n`）
pub fn backoff_delay(initial_ms: u64, failure_index: u32) -> Duration {
    Duration::from_millis(initial_ms.saturating_mul(1u64 << failure_index.min(16)))
}

/// レスポンス本文からAnalysisResultを得る
///
/// 先頭の```jsonと末尾の```があれば除去してからパースする。
/// パース失敗は決定的とみなしリトライせず、生テキストを
/// `persuasive_description` に保持したプレースホルダを返す。
pub fn parse_analysis_response(raw: &str, origin: &Path) -> AnalysisResult {
    let json_text = strip_code_fence(raw);

    match serde_json::from_str::<AnalysisResult>(json_text) {
        Ok(result) => {
            info!(path = %origin.display(), "解析成功");
            result
        }
        Err(e) => {
            error!(path = %origin.display(), text = %json_text, "レスポンスのJSONデコード失敗: {}", e);
            let mut fallback = AnalysisResult::placeholder();
            fallback.persuasive_description = raw.to_string();
            fallback
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let mut trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        trimmed = rest.trim_start();
    }
    if let Some(rest) = trimmed.strip_suffix("```") {
        trimmed = rest.trim_end();
    }
    trimmed
}
