//! バッチオーケストレータ
//!
//! 1画像ずつ 読み込み → 解析 → 派生 → リネーム → 記録 を直列に行う。
//! 個別画像の失敗はプレースホルダ行に縮退し、バッチ全体は止めない。

use crate::analyzer::{AnalysisResult, AnalysisTransport, ApiClient};
use crate::config::Config;
use crate::metadata::MetadataBuilder;
use crate::report::ReportRow;
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{error, info, warn};

/// バッチ全体に適用するオプション
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// マーケットプレイスのカテゴリコード（全行にそのまま転記）
    pub category: Option<String>,
    /// リリース名リスト（全行にそのまま転記）
    pub releases: Vec<String>,
    /// ファイルを実際にリネームするか
    pub rename: bool,
}

/// スキャン済み画像列を順に処理し、レポート行を返す
pub async fn process_images<T: AnalysisTransport>(
    client: &ApiClient<T>,
    config: &Config,
    images: &[ImageInfo],
    options: &BatchOptions,
) -> Vec<ReportRow> {
    let progress = ProgressBar::new(images.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("  [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut rows = Vec::with_capacity(images.len());

    for image in images {
        progress.set_message(image.file_name.clone());
        rows.push(process_image(client, config, image, options).await);
        progress.inc(1);
    }

    progress.finish_with_message("完了");
    rows
}

/// 1画像を処理する。失敗してもエラーは返さず、行に注記して返す
async fn process_image<T: AnalysisTransport>(
    client: &ApiClient<T>,
    config: &Config,
    image: &ImageInfo,
    options: &BatchOptions,
) -> ReportRow {
    info!(path = %image.path.display(), "画像を処理");

    let analysis = match std::fs::read(&image.path) {
        Ok(bytes) => client.analyze(&bytes, &image.media_type, &image.path).await,
        Err(e) => {
            error!(path = %image.path.display(), "画像読み込み失敗: {}", e);
            // 読めなかったファイルはリネームしない
            let no_rename = BatchOptions {
                rename: false,
                ..options.clone()
            };
            let row = build_row(config, image, &AnalysisResult::placeholder(), &no_rename);
            return ReportRow {
                error: format!("画像読み込み失敗: {}", e),
                ..row
            };
        }
    };

    build_row(config, image, &analysis, options)
}

fn build_row(
    config: &Config,
    image: &ImageInfo,
    analysis: &AnalysisResult,
    options: &BatchOptions,
) -> ReportRow {
    let mut builder = MetadataBuilder::new(config);

    let title = builder.title(analysis, &image.file_name);
    let keywords = builder.keywords(analysis, &title);
    let use_cases = builder.use_cases(analysis);
    let target_audience = builder.target_audience(analysis);
    let derived = builder.new_filename(analysis, &image.file_name);

    let parent = image.path.parent().unwrap_or_else(|| Path::new("."));
    let unique = ensure_unique(parent, &derived, &image.file_name);

    let (final_name, error) = if options.rename && unique != image.file_name {
        match std::fs::rename(&image.path, parent.join(&unique)) {
            Ok(()) => {
                info!(from = %image.file_name, to = %unique, "リネーム完了");
                (unique, String::new())
            }
            Err(e) => {
                warn!(path = %image.path.display(), "リネーム失敗: {}", e);
                (image.file_name.clone(), format!("リネーム失敗: {}", e))
            }
        }
    } else {
        (unique, String::new())
    };

    ReportRow {
        original_filename: image.file_name.clone(),
        filename: final_name,
        title,
        keywords: keywords.join(", "),
        category: options.category.clone().unwrap_or_default(),
        releases: options.releases.join(", "),
        use_cases: use_cases.join(", "),
        description: analysis.persuasive_description.clone(),
        target_audience: target_audience.join(", "),
        error,
    }
}

/// 同名ファイルが既にある場合、連番サフィックスで衝突を回避する
///
/// 元のファイル名自身との一致は衝突とみなさない（リネーム不要なだけ）。
pub fn ensure_unique(dir: &Path, candidate: &str, original_name: &str) -> String {
    if candidate == original_name || !dir.join(candidate).exists() {
        return candidate.to_string();
    }

    let path = Path::new(candidate);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| candidate.to_string());
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let numbered = if extension.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, extension)
        };
        if numbered == original_name || !dir.join(&numbered).exists() {
            return numbered;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_ensure_unique_no_collision() {
        let dir = tempfile::tempdir().unwrap();
        let name = ensure_unique(dir.path(), "fresh.jpg", "old.jpg");
        assert_eq!(name, "fresh.jpg");
    }

    #[test]
    fn test_ensure_unique_appends_counter() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("taken.jpg")).unwrap();

        let name = ensure_unique(dir.path(), "taken.jpg", "old.jpg");
        assert_eq!(name, "taken_1.jpg");
    }

    #[test]
    fn test_ensure_unique_increments_until_free() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("taken.jpg")).unwrap();
        File::create(dir.path().join("taken_1.jpg")).unwrap();
        File::create(dir.path().join("taken_2.jpg")).unwrap();

        let name = ensure_unique(dir.path(), "taken.jpg", "old.jpg");
        assert_eq!(name, "taken_3.jpg");
    }

    #[test]
    fn test_ensure_unique_same_as_original() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("same.jpg")).unwrap();

        // 自分自身の名前と同じ場合は衝突扱いしない
        let name = ensure_unique(dir.path(), "same.jpg", "same.jpg");
        assert_eq!(name, "same.jpg");
    }
}
