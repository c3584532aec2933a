//! メタデータ派生
//!
//! 解析結果（またはプレースホルダ）から以下を純粋に導出する:
//! - 販売タイトル（ブランドプレフィックス＋CTA付き、文字数上限つき）
//! - キーワード集合（同義語置換・ストップワード除去・件数上限つき)
//! - 用途タグ・対象者タグ（固定語彙とのマッチング）
//! - 簡潔な説明とリネーム用ファイル名
//!
//! I/Oは行わない。乱数（CTA選択）はシード注入可能。

pub mod tables;

use crate::analyzer::AnalysisResult;
use crate::config::Config;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"\W+").unwrap();
    static ref NON_FILENAME: Regex = Regex::new(r"[^A-Za-z0-9_]+").unwrap();
}

/// 派生処理のエントリポイント
///
/// 設定テーブルへの参照と、CTA選択用の乱数生成器を保持する。
pub struct MetadataBuilder<'a> {
    config: &'a Config,
    rng: fastrand::Rng,
}

impl<'a> MetadataBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            rng: fastrand::Rng::new(),
        }
    }

    /// テスト用: シード固定でCTA選択を決定的にする
    pub fn with_seed(config: &'a Config, seed: u64) -> Self {
        Self {
            config,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// 販売タイトルを生成する
    ///
    /// コア部分は suggested_title を最優先し、なければスタイル／要素
    /// キーワード、説明文、ファイル名の順でフォールバックする。
    /// ブランドプレフィックスとCTAフレーズは上限内に収まる間だけ付与し、
    /// 途中で上限に達したら直前の単語境界で切り詰める。
    pub fn title(&mut self, result: &AnalysisResult, file_name: &str) -> String {
        let max = self.config.title_max_len;

        let mut pieces: Vec<String> = Vec::new();
        if !self.config.brand_prefix.is_empty() {
            pieces.push(self.config.brand_prefix.clone());
        }
        pieces.push(self.title_core(result, file_name));
        if !self.config.call_to_action.is_empty() {
            let idx = self.rng.usize(..self.config.call_to_action.len());
            pieces.push(self.config.call_to_action[idx].clone());
        }

        let mut title = String::new();
        for piece in pieces {
            let candidate = if title.is_empty() {
                piece
            } else {
                format!("{} {}", title, piece)
            };
            if candidate.chars().count() <= max {
                title = candidate;
            } else {
                title = truncate_at_word_boundary(&candidate, max);
                break;
            }
        }
        title
    }

    fn title_core(&self, result: &AnalysisResult, file_name: &str) -> String {
        if !result.suggested_title.is_empty() {
            return result.suggested_title.clone();
        }

        let mut parts: Vec<String> = Vec::new();
        for list in [&result.stylistic_keywords, &result.descriptive_keywords] {
            if let Some(first) = list.first() {
                let cleaned = NON_WORD.replace_all(first, "").to_string();
                if !cleaned.is_empty() {
                    parts.push(cleaned);
                }
            }
        }
        if !parts.is_empty() {
            return capitalize(&parts.join(" "));
        }

        if !result.basic_description.is_empty() {
            return capitalize(&truncate_chars(&result.basic_description, 30));
        }

        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        format!("{} - Image", capitalize(&stem.replace('_', " ")))
    }

    /// キーワード集合を生成する
    ///
    /// 4つのキーワードリストとタイトル・説明文のトークンを統合し、
    /// 同義語辞書ヒットは候補で置換（元の語は残さない）、
    /// ストップワードを除外して上限件数まで返す。順序は辞書順で決定的。
    pub fn keywords(&self, result: &AnalysisResult, title: &str) -> Vec<String> {
        let mut pool: Vec<String> = Vec::new();
        for list in [
            &result.stylistic_keywords,
            &result.descriptive_keywords,
            &result.conceptual_keywords,
            &result.seasonal_keywords,
        ] {
            pool.extend(list.iter().filter(|s| !s.is_empty()).map(|s| s.to_lowercase()));
        }
        pool.extend(tokenize(&result.basic_description));
        pool.extend(tokenize(&result.persuasive_description));
        pool.extend(tokenize(title));

        let mut unique = BTreeSet::new();
        for word in pool {
            if self.config.stop_words.contains(&word) {
                continue;
            }
            match self.config.synonyms.get(&word) {
                Some(variants) => unique.extend(variants.iter().map(|v| v.to_lowercase())),
                None => {
                    unique.insert(word);
                }
            }
        }

        unique.into_iter().take(self.config.keyword_limit).collect()
    }

    /// 用途タグ（最大3件、該当なしは "Img"）
    pub fn use_cases(&self, result: &AnalysisResult) -> Vec<String> {
        self.match_vocab(result, tables::USE_CASE_VOCAB, "Img")
    }

    /// 対象者タグ（最大3件、該当なしは "Data"）
    pub fn target_audience(&self, result: &AnalysisResult) -> Vec<String> {
        self.match_vocab(result, tables::AUDIENCE_VOCAB, "Data")
    }

    fn match_vocab(&self, result: &AnalysisResult, vocab: &[&str], default: &str) -> Vec<String> {
        let keywords: Vec<String> = result
            .stylistic_keywords
            .iter()
            .chain(result.descriptive_keywords.iter())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect();

        let matched: Vec<String> = vocab
            .iter()
            .filter(|entry| {
                let lower = entry.to_lowercase();
                keywords.iter().any(|k| lower.contains(k.as_str()))
            })
            .map(|entry| self.abbreviate(entry, 4))
            .take(3)
            .collect();

        if matched.is_empty() {
            vec![default.to_string()]
        } else {
            matched
        }
    }

    /// ファイル名用の簡潔な説明（50文字以内、アンダースコア連結）
    pub fn concise_description(&self, result: &AnalysisResult) -> String {
        let mut parts: Vec<String> = Vec::new();
        parts.extend(
            result
                .suggested_title
                .to_lowercase()
                .split_whitespace()
                .take(2)
                .map(String::from),
        );
        if let Some(style) = result.stylistic_keywords.first() {
            parts.push(self.abbreviate(style, 4));
        }
        if let Some(elem) = result.descriptive_keywords.first() {
            parts.push(self.abbreviate(elem, 4));
        }
        parts.extend(
            result
                .basic_description
                .split_whitespace()
                .take(2)
                .map(|w| self.abbreviate(w, 3)),
        );

        truncate_chars(&parts.join("_"), 50)
    }

    /// リネーム先のファイル名（拡張子込み、上限・サニタイズ・フォールバック適用済み）
    ///
    /// 重複回避の連番付与はディレクトリを見る必要があるため
    /// 呼び出し側（processor::ensure_unique）で行う。
    pub fn new_filename(&self, result: &AnalysisResult, original_name: &str) -> String {
        let extension = Path::new(original_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let mut parts = vec![self.concise_description(result)];
        parts.extend(
            result
                .basic_description
                .to_lowercase()
                .split_whitespace()
                .take(2)
                .map(|w| self.abbreviate(w, 3)),
        );
        parts.extend(self.use_cases(result).into_iter().take(2));
        parts.extend(self.target_audience(result).into_iter().take(2));

        let joined = parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("_")
            .replace(' ', "_");
        let mut base = NON_FILENAME.replace_all(&joined, "").to_string();

        // base + "." + 拡張子 が上限を超えないように
        let budget = self
            .config
            .filename_max_len
            .saturating_sub(extension.len() + 1);
        base = truncate_chars(&base, budget);

        if base.is_empty() {
            // 全部落ちた場合は元名の略語化にフォールバック
            let stem = Path::new(original_name)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let abbreviated: String = stem
                .split('_')
                .take(3)
                .map(|w| self.abbreviate(w, 4))
                .collect();
            base = NON_FILENAME
                .replace_all(&format!("{}_Img_Data", abbreviated), "")
                .to_string();
            base = truncate_chars(&base, budget);
        }

        if extension.is_empty() {
            base
        } else {
            format!("{}.{}", base, extension)
        }
    }

    /// 略語辞書でのルックアップ。未登録語は先頭`fallback_len`文字を大文字化
    fn abbreviate(&self, word: &str, fallback_len: usize) -> String {
        let key = word.to_lowercase();
        if let Some(abbr) = self.config.abbreviations.get(&key) {
            return abbr.clone();
        }
        capitalize(&word.chars().take(fallback_len).collect::<String>())
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_string()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// 上限文字数で切り、直前の単語境界まで戻す（境界がなければそのまま切る）
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(idx) => cut[..idx].trim_end().to_string(),
        None => cut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::default()
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            suggested_title: "Dark Fantasy Knight".into(),
            basic_description: "A menacing knight with glowing eyes".into(),
            persuasive_description: "Perfect for advertising and commercial projects".into(),
            stylistic_keywords: vec!["Digital Art".into(), "Fantasy".into()],
            descriptive_keywords: vec!["Helmet".into(), "Horns".into()],
            conceptual_keywords: vec!["Power".into()],
            seasonal_keywords: vec![],
        }
    }

    // =============================================
    // タイトル生成
    // =============================================

    #[test]
    fn test_title_prefers_suggested() {
        let config = test_config();
        let mut builder = MetadataBuilder::with_seed(&config, 1);
        let title = builder.title(&sample_result(), "img.jpg");
        assert!(title.starts_with("Dark Fantasy Knight"));
        assert!(title.chars().count() <= config.title_max_len);
    }

    #[test]
    fn test_title_appends_cta_within_limit() {
        let config = test_config();
        let mut builder = MetadataBuilder::with_seed(&config, 1);
        let title = builder.title(&sample_result(), "img.jpg");
        // CTAフレーズのどれかが続く
        let has_cta = config
            .call_to_action
            .iter()
            .any(|cta| title.ends_with(cta.as_str()));
        assert!(has_cta, "title was: {}", title);
    }

    #[test]
    fn test_title_brand_prefix() {
        let mut config = test_config();
        config.brand_prefix = "ACME Studio".into();
        let mut builder = MetadataBuilder::with_seed(&config, 1);
        let title = builder.title(&sample_result(), "img.jpg");
        assert!(title.starts_with("ACME Studio Dark Fantasy Knight"));
    }

    #[test]
    fn test_title_from_keywords_when_no_suggested() {
        let config = test_config();
        let mut builder = MetadataBuilder::with_seed(&config, 1);
        let result = AnalysisResult {
            stylistic_keywords: vec!["Digital Art!".into()],
            descriptive_keywords: vec!["Glowing-Eyes".into()],
            ..Default::default()
        };
        let title = builder.title(&result, "img.jpg");
        // 非単語文字は除去されて連結される
        assert!(title.starts_with("DigitalArt GlowingEyes"), "title was: {}", title);
    }

    #[test]
    fn test_title_falls_back_to_description() {
        let config = test_config();
        let mut builder = MetadataBuilder::with_seed(&config, 1);
        let result = AnalysisResult {
            basic_description: "a quiet mountain lake at dawn with mist".into(),
            ..Default::default()
        };
        let title = builder.title(&result, "img.jpg");
        assert!(title.starts_with("A quiet mountain lake at dawn"));
    }

    #[test]
    fn test_title_filename_placeholder() {
        let config = test_config();
        let mut builder = MetadataBuilder::with_seed(&config, 1);
        let title = builder.title(&AnalysisResult::default(), "red_fox_03.jpg");
        assert!(title.starts_with("Red fox 03 - Image"), "title was: {}", title);
    }

    #[test]
    fn test_title_respects_cap_with_verbose_result() {
        let mut config = test_config();
        config.title_max_len = 40;
        let mut builder = MetadataBuilder::with_seed(&config, 1);
        let result = AnalysisResult {
            suggested_title: "An Extremely Long And Verbose Title That Goes On And On Forever"
                .into(),
            ..sample_result()
        };
        let title = builder.title(&result, "img.jpg");
        assert!(title.chars().count() <= 40, "title was: {}", title);
        // 単語の途中では切れない
        assert!(!title.ends_with(' '));
        assert!("An Extremely Long And Verbose Title That Goes On And On Forever"
            .starts_with(&title));
    }

    #[test]
    fn test_title_deterministic_with_seed() {
        let config = test_config();
        let t1 = MetadataBuilder::with_seed(&config, 42).title(&sample_result(), "img.jpg");
        let t2 = MetadataBuilder::with_seed(&config, 42).title(&sample_result(), "img.jpg");
        assert_eq!(t1, t2);
    }

    // =============================================
    // キーワード生成
    // =============================================

    #[test]
    fn test_keywords_deduplicated_and_capped() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let result = AnalysisResult {
            basic_description: (0..100)
                .map(|i| format!("word{}", i))
                .collect::<Vec<_>>()
                .join(" "),
            ..sample_result()
        };
        let keywords = builder.keywords(&result, "Some Title");
        assert!(keywords.len() <= config.keyword_limit);
        let unique: BTreeSet<_> = keywords.iter().collect();
        assert_eq!(unique.len(), keywords.len());
    }

    #[test]
    fn test_keywords_synonym_substitution() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let result = AnalysisResult {
            descriptive_keywords: vec!["helmet".into()],
            ..Default::default()
        };
        let keywords = builder.keywords(&result, "");
        // 元の語は残らず、同義語候補に置換される
        assert!(!keywords.contains(&"helmet".to_string()));
        assert!(keywords.contains(&"headgear".to_string()));
        assert!(keywords.contains(&"yelmo".to_string()));
    }

    #[test]
    fn test_keywords_stop_words_removed() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let result = AnalysisResult {
            basic_description: "the fox of the north and a raven".into(),
            ..Default::default()
        };
        let keywords = builder.keywords(&result, "");
        assert!(!keywords.contains(&"the".to_string()));
        assert!(!keywords.contains(&"of".to_string()));
        assert!(!keywords.contains(&"a".to_string()));
        assert!(keywords.contains(&"fox".to_string()));
        assert!(keywords.contains(&"raven".to_string()));
    }

    #[test]
    fn test_keywords_idempotent() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let result = sample_result();
        let k1 = builder.keywords(&result, "Title");
        let k2 = builder.keywords(&result, "Title");
        assert_eq!(k1, k2);
    }

    // =============================================
    // 用途・対象者
    // =============================================

    #[test]
    fn test_use_cases_matched_and_abbreviated() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let result = AnalysisResult {
            stylistic_keywords: vec!["Commercial".into(), "Marketing".into()],
            ..Default::default()
        };
        let cases = builder.use_cases(&result);
        assert!(cases.contains(&"Com".to_string()));
        assert!(cases.contains(&"Mkt".to_string()));
        assert!(cases.len() <= 3);
    }

    #[test]
    fn test_use_cases_default() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let cases = builder.use_cases(&AnalysisResult::default());
        assert_eq!(cases, vec!["Img".to_string()]);
    }

    #[test]
    fn test_target_audience_default() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let audience = builder.target_audience(&AnalysisResult::default());
        assert_eq!(audience, vec!["Data".to_string()]);
    }

    #[test]
    fn test_target_audience_matched() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let result = AnalysisResult {
            descriptive_keywords: vec!["designers".into()],
            ..Default::default()
        };
        let audience = builder.target_audience(&result);
        assert_eq!(audience, vec!["Des".to_string()]);
    }

    // =============================================
    // 簡潔説明・ファイル名
    // =============================================

    #[test]
    fn test_concise_description_abbreviates() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let desc = builder.concise_description(&sample_result());
        assert!(desc.chars().count() <= 50);
        assert!(desc.starts_with("dark_fantasy"), "desc was: {}", desc);
    }

    #[test]
    fn test_new_filename_sanitized_and_capped() {
        let mut config = test_config();
        config.filename_max_len = 60;
        let builder = MetadataBuilder::with_seed(&config, 1);
        let name = builder.new_filename(&sample_result(), "original photo (1).JPG");
        assert!(name.ends_with(".jpg"));
        assert!(name.chars().count() <= 60);
        let base = name.trim_end_matches(".jpg");
        assert!(base.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_new_filename_strips_symbols() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        // タイトルが記号のみでも残りの部品から組み立つ
        let result = AnalysisResult {
            suggested_title: "!!!".into(),
            ..Default::default()
        };
        let name = builder.new_filename(&result, "my_photo.png");
        assert!(name.ends_with(".png"));
        assert!(!name.starts_with('.'));
    }

    #[test]
    fn test_new_filename_default_tags_when_result_empty() {
        let mut config = test_config();
        config.abbreviations.clear();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let name = builder.new_filename(&AnalysisResult::default(), "fox_pic.png");
        // 空の解析結果でもデフォルトの "Img"/"Data" タグから組み立てられる
        assert!(name.ends_with(".png"));
        assert!(name.contains("Img"));
    }

    #[test]
    fn test_derivation_idempotent() {
        let config = test_config();
        let builder = MetadataBuilder::with_seed(&config, 1);
        let result = sample_result();
        assert_eq!(
            builder.concise_description(&result),
            builder.concise_description(&result)
        );
        assert_eq!(
            builder.new_filename(&result, "a.jpg"),
            builder.new_filename(&result, "a.jpg")
        );
        assert_eq!(builder.use_cases(&result), builder.use_cases(&result));
    }

    // =============================================
    // ヘルパー
    // =============================================

    #[test]
    fn test_truncate_at_word_boundary() {
        assert_eq!(truncate_at_word_boundary("short", 10), "short");
        assert_eq!(truncate_at_word_boundary("one two three", 9), "one two");
        assert_eq!(truncate_at_word_boundary("nospaceatall", 6), "nospac");
    }

    #[test]
    fn test_tokenize_trims_punctuation() {
        let tokens = tokenize("A bold, striking image.");
        assert_eq!(tokens, vec!["a", "bold", "striking", "image"]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("fox"), "Fox");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("red fox"), "Red fox");
    }
}
