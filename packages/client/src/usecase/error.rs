//! UseCase 層のエラー定義

use thiserror::Error;

use crate::infrastructure::transport::TransportError;

/// 送信エラー
///
/// どれもその送信試行に対して終端的で、再送はしない。
#[derive(Debug, Error)]
pub enum SendError {
    /// 接続がない、または Open 状態でない
    #[error("socket is not open")]
    NotOpen,

    /// フレームのエンコードに失敗
    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    /// 書き込みに失敗
    #[error(transparent)]
    Transport(#[from] TransportError),
}
