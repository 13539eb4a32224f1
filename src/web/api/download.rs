use axum::response::Response;

use crate::vfs::classify;
use crate::web::state::AppState;
use crate::web::utils::errors::{respond, HandlerKind, ServeError};
use crate::web::utils::streaming::stream_file;
use crate::web::DOWNLOAD_PREFIX;

/// 原始字节下载处理器
pub async fn serve(state: &AppState, request_path: &str) -> Response {
    respond(HandlerKind::Download, transfer(state, request_path).await)
}

/// 去掉下载前缀，得到逻辑路径
///
/// 前缀之后必须是路径段边界，`/_downloadx` 这类路径返回 None。
pub fn strip_download_prefix(request_path: &str) -> Option<&str> {
    let rest = request_path.strip_prefix(DOWNLOAD_PREFIX)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

async fn transfer(state: &AppState, request_path: &str) -> Result<Response, ServeError> {
    let logical = strip_download_prefix(request_path).ok_or(ServeError::OutsideRoot)?;
    // 第二个入口，独立做一次根目录限制
    let resolved = state.root.resolve(logical)?;

    let sniff_path = resolved.clone();
    let kind = tokio::task::spawn_blocking(move || {
        classify(&sniff_path).map_err(|source| ServeError::Classify {
            path: sniff_path,
            source,
        })
    })
    .await??;

    let file = tokio::fs::File::open(&resolved)
        .await
        .map_err(|source| ServeError::Unreadable {
            path: resolved.clone(),
            source,
        })?;

    stream_file(file, &resolved, &kind).await
}

#[cfg(test)]
mod tests {
    use super::strip_download_prefix;

    #[test]
    fn strips_prefix_on_segment_boundary() {
        assert_eq!(strip_download_prefix("/_download/a/b.mp4"), Some("/a/b.mp4"));
        assert_eq!(strip_download_prefix("/_download"), Some(""));
        assert_eq!(strip_download_prefix("/_download/"), Some("/"));
    }

    #[test]
    fn rejects_prefix_without_boundary() {
        assert_eq!(strip_download_prefix("/_downloadx/a.mp4"), None);
        assert_eq!(strip_download_prefix("/movies/a.mp4"), None);
    }
}
