use crate::error::{Result, StockTagError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    /// 拡張子から推定したメディアタイプ（image/png または image/jpeg）
    pub media_type: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// フォルダ配下の画像を再帰的に収集する
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(StockTagError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();
            if IMAGE_EXTENSIONS.iter().any(|&e| e == ext_str) {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();

                images.push(ImageInfo {
                    path: path.to_path_buf(),
                    file_name,
                    media_type: media_type_for(path),
                });
            }
        }
    }

    // パスでソート（処理順を決定的にする）
    images.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(images)
}

/// 拡張子からメディアタイプを推定（不明時はjpeg扱い）
pub fn media_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("image/jpeg")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn test_media_type_for() {
        assert_eq!(media_type_for(Path::new("a.png")), "image/png");
        assert_eq!(media_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(media_type_for(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(media_type_for(Path::new("noext")), "image/jpeg");
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(StockTagError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();

        File::create(dir.path().join("b.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("a.PNG")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("c.jpeg")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("readme.txt")).unwrap().write_all(b"text").unwrap();

        let result = scan_folder(dir.path()).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].file_name, "a.PNG");
        assert_eq!(result[1].file_name, "b.jpg");
        assert_eq!(result[2].file_name, "c.jpeg");
        assert_eq!(result[0].media_type, "image/png");
    }

    #[test]
    fn test_scan_folder_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();

        File::create(dir.path().join("top.jpg")).unwrap();
        File::create(sub.join("nested.png")).unwrap();

        let result = scan_folder(dir.path()).unwrap();
        assert_eq!(result.len(), 2);
    }
}
