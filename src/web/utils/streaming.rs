use std::path::Path;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use tokio::fs::File as TokioFile;
use tokio_util::io::ReaderStream;

use super::errors::ServeError;
use crate::vfs::ContentKind;

const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// 未识别内容的下载类型
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// 原样流式传输整个文件
///
/// 不支持 Range，不做任何分块变换；写入失败时由传输层中止连接。
pub async fn stream_file(
    file: TokioFile,
    path: &Path,
    kind: &ContentKind,
) -> Result<Response, ServeError> {
    let metadata = file.metadata().await.map_err(|source| ServeError::Stat {
        path: path.to_path_buf(),
        source,
    })?;

    let content_type = if kind.is_unknown() {
        HeaderValue::from_static(FALLBACK_CONTENT_TYPE)
    } else {
        HeaderValue::from_str(kind.mime()).map_err(|e| ServeError::Render(e.to_string()))?
    };

    let stream = ReaderStream::with_capacity(file, STREAM_CHUNK_SIZE);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, metadata.len().to_string())
        .body(Body::from_stream(stream))
        .map_err(|e| ServeError::Render(e.to_string()))
}
