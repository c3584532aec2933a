//! 解析プロンプト生成
//!
//! 全画像に共通の固定指示文。レスポンスはJSONオブジェクト1つを要求する。

/// 画像解析用の固定プロンプト
pub const ANALYSIS_INSTRUCTION: &str = r#"Suggest a short, effective sales title for this image in English. Provide a basic description of the image. Describe the image for a client, highlighting its benefits and potential uses in English. List descriptive, conceptual, stylistic and seasonal keywords for the image in English. Provide the response strictly in JSON format.

Expected JSON Format:
{
  "suggested_title": "Short sales title",
  "basic_description": "A basic, plain description of the image",
  "persuasive_description": "Client-focused description highlighting benefits and uses",
  "descriptive_keywords": ["Element 1", "Element 2"],
  "conceptual_keywords": ["Concept 1", "Concept 2"],
  "stylistic_keywords": ["Style 1", "Style 2"],
  "seasonal_keywords": ["Season 1"]
}

If the image is abstract, describe the emotions and interpretations it may evoke."#;
