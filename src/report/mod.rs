//! CSVマニフェスト出力
//!
//! ストック素材マーケットプレイスへのアップロード用CSVを生成する。
//! クォートは最小限（カンマ・引用符・改行を含むフィールドのみ）。
//! レポート書き込み失敗はバッチ全体で唯一の致命的エラー。

use crate::error::{Result, StockTagError};
use std::path::Path;

/// バッチ1画像分の出力行。生成後は変更しない
#[derive(Debug, Clone, Default)]
pub struct ReportRow {
    pub original_filename: String,
    pub filename: String,
    pub title: String,
    /// カンマ連結済みキーワード
    pub keywords: String,
    pub category: String,
    pub releases: String,
    /// カンマ連結済み用途タグ
    pub use_cases: String,
    pub description: String,
    pub target_audience: String,
    pub error: String,
}

const HEADER: &[&str] = &[
    "Filename",
    "Title",
    "Keywords",
    "Category",
    "Releases",
    "Use Cases",
    "Original Filename",
    "Description",
    "Target Audience",
    "Error",
];

/// レポートをCSVとして書き出す
pub fn write_csv(rows: &[ReportRow], path: &Path) -> Result<()> {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(csv_line(HEADER.iter().map(|s| s.to_string())));

    for row in rows {
        lines.push(csv_line(
            [
                row.filename.clone(),
                row.title.clone(),
                row.keywords.clone(),
                row.category.clone(),
                row.releases.clone(),
                row.use_cases.clone(),
                row.original_filename.clone(),
                row.description.clone(),
                row.target_audience.clone(),
                row.error.clone(),
            ]
            .into_iter(),
        ));
    }

    let content = lines.join("\n") + "\n";
    std::fs::write(path, content)
        .map_err(|e| StockTagError::ReportWrite(format!("{}: {}", path.display(), e)))
}

fn csv_line(fields: impl Iterator<Item = String>) -> String {
    fields
        .map(|f| csv_field(&f))
        .collect::<Vec<_>>()
        .join(",")
}

/// 必要な場合のみクォートする
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
