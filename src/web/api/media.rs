use axum::{
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;

use crate::vfs::classify;
use crate::web::pages::render_media_page;
use crate::web::utils::errors::{respond, HandlerKind, ServeError, TYPE_HEADER};

/// 单文件请求处理器：返回播放页，并在响应头中附带嗅探诊断
pub async fn serve(file_path: PathBuf, request_path: &str) -> Response {
    respond(HandlerKind::File, render(file_path, request_path).await)
}

async fn render(file_path: PathBuf, request_path: &str) -> Result<Response, ServeError> {
    let kind = tokio::task::spawn_blocking(move || {
        classify(&file_path).map_err(|source| ServeError::Classify {
            path: file_path,
            source,
        })
    })
    .await??;

    let diagnostic =
        HeaderValue::from_str(&kind.to_string()).map_err(|e| ServeError::Render(e.to_string()))?;
    let mut response = render_media_page(&kind, request_path)?.into_response();
    response.headers_mut().insert(TYPE_HEADER, diagnostic);
    Ok(response)
}
