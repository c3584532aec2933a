use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockTagError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。環境変数 {0} を設定するか `stocktag config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("API一時エラー（リトライ対象）: {0}")]
    ApiUnavailable(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML解析エラー: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("レポート書き込みエラー: {0}")]
    ReportWrite(String),
}

pub type Result<T> = std::result::Result<T, StockTagError>;
