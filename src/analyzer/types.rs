//! 解析結果とGemini APIレスポンスの型定義

use serde::{Deserialize, Serialize};

/// モデルから得た画像解析結果
///
/// 生成後は変更しない。派生処理（タイトル・キーワード等）の唯一の入力。
/// フィールド名は後期リビジョンの4リスト形式を正とし、
/// 旧形式（`key_styles` / `distinctive_elements`）はエイリアスで受ける。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub suggested_title: String,
    pub basic_description: String,
    pub persuasive_description: String,
    #[serde(alias = "key_styles")]
    pub stylistic_keywords: Vec<String>,
    #[serde(alias = "distinctive_elements")]
    pub descriptive_keywords: Vec<String>,
    pub conceptual_keywords: Vec<String>,
    pub seasonal_keywords: Vec<String>,
}

impl AnalysisResult {
    /// 解析不能時に代入する固定プレースホルダ
    pub fn placeholder() -> Self {
        Self {
            suggested_title: "Unprocessed Image".into(),
            basic_description: "A basic description of the image.".into(),
            persuasive_description: "A default description for images that cannot be analyzed."
                .into(),
            ..Default::default()
        }
    }
}

/// generateContentレスポンス（必要なフィールドのみ）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Content,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_result_aliases() {
        let json = r#"{
            "suggested_title": "Dark Knight",
            "key_styles": ["Fantasy", "Digital Art"],
            "distinctive_elements": ["Helmet", "Glowing eyes"]
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.suggested_title, "Dark Knight");
        assert_eq!(result.stylistic_keywords, vec!["Fantasy", "Digital Art"]);
        assert_eq!(result.descriptive_keywords, vec!["Helmet", "Glowing eyes"]);
        assert!(result.conceptual_keywords.is_empty());
    }

    #[test]
    fn test_analysis_result_canonical_fields() {
        let json = r#"{
            "stylistic_keywords": ["Minimalist"],
            "descriptive_keywords": ["Mountain"],
            "conceptual_keywords": ["Freedom"],
            "seasonal_keywords": ["Winter"]
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.conceptual_keywords, vec!["Freedom"]);
        assert_eq!(result.seasonal_keywords, vec!["Winter"]);
        assert_eq!(result.suggested_title, "");
    }

    #[test]
    fn test_placeholder_has_empty_lists() {
        let p = AnalysisResult::placeholder();
        assert_eq!(p.suggested_title, "Unprocessed Image");
        assert!(p.stylistic_keywords.is_empty());
        assert!(p.seasonal_keywords.is_empty());
    }

    #[test]
    fn test_generate_response_block_reason() {
        let json = r#"{"candidates": [], "promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }
}
