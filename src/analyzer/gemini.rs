//! Gemini APIトランスポート
//!
//! generateContentエンドポイントへのHTTP呼び出し。
//! 429/5xxと通信エラーは一時エラー（`ApiUnavailable`）に分類し、
//! リトライ判断は呼び出し側（`ApiClient`）に委ねる。

use crate::config::Config;
use crate::error::{Result, StockTagError};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::StatusCode;
use serde_json::json;

use super::types::GenerateResponse;
use super::{AnalysisTransport, GenerateOutcome};

pub struct GeminiTransport {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.get_api_key()?,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl AnalysisTransport for GeminiTransport {
    async fn generate(
        &self,
        image: &[u8],
        media_type: &str,
        instruction: &str,
    ) -> Result<GenerateOutcome> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": media_type,
                            "data": base64::engine::general_purpose::STANDARD.encode(image)
                        }
                    },
                    { "text": instruction }
                ]
            }]
        });

        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| StockTagError::ApiUnavailable(format!("リクエスト送信失敗: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StockTagError::ApiUnavailable(format!("レスポンス読み込み失敗: {}", e)))?;

        if is_transient_status(status) {
            return Err(StockTagError::ApiUnavailable(format!(
                "status {}: {}",
                status, text
            )));
        }
        if !status.is_success() {
            return Err(StockTagError::ApiCall(format!("status {}: {}", status, text)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| StockTagError::ApiParse(format!("{} (body: {})", e, text)))?;

        if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
            return Ok(GenerateOutcome::Blocked(reason));
        }

        let Some(candidate) = parsed.candidates.first() else {
            return Ok(GenerateOutcome::NoCandidates);
        };

        let full_text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        Ok(GenerateOutcome::Text(full_text))
    }
}

/// クォータ枯渇・一時的なサービス不可をリトライ対象とみなす
fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
