#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("config error: {reason}")]
    Config { reason: String },

    #[error("parse error: {reason}")]
    Parse { reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
