use std::io;
use std::path::PathBuf;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::vfs::OutsideRoot;

pub const HANDLER_HEADER: &str = "x-mediaweb-handler";
pub const TYPE_HEADER: &str = "x-mediaweb-type";

/// 实际处理请求的处理器，写入 `X-Mediaweb-Handler`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Dir,
    File,
    Download,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Dir => "dir",
            HandlerKind::File => "file",
            HandlerKind::Download => "download",
        }
    }
}

/// 请求处理过程中的错误，均在发现处直接转换为状态码与纯文本响应
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("outside allowed path")]
    OutsideRoot,
    #[error("open {}: {source}", .path.display())]
    NotFound { path: PathBuf, source: io::Error },
    #[error("open {}: {source}", .path.display())]
    Unreadable { path: PathBuf, source: io::Error },
    #[error("stat {}: {source}", .path.display())]
    Stat { path: PathBuf, source: io::Error },
    #[error("readdir {}: {source}", .path.display())]
    ReadDir { path: PathBuf, source: io::Error },
    #[error("classify {}: {source}", .path.display())]
    Classify { path: PathBuf, source: io::Error },
    #[error("render: {0}")]
    Render(String),
    #[error("worker task failed: {0}")]
    Task(String),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::OutsideRoot | ServeError::NotFound { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<OutsideRoot> for ServeError {
    fn from(_: OutsideRoot) -> Self {
        ServeError::OutsideRoot
    }
}

impl From<tokio::task::JoinError> for ServeError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServeError::Task(err.to_string())
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!("[Router] {} -> {}", self, status);
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{}\n", self),
        )
            .into_response()
    }
}

/// 统一收尾：错误转响应，并标记处理器
pub fn respond(handler: HandlerKind, result: Result<Response, ServeError>) -> Response {
    let mut response = result.unwrap_or_else(<ServeError as IntoResponse>::into_response);
    response.headers_mut().insert(
        HANDLER_HEADER,
        HeaderValue::from_static(handler.as_str()),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(ServeError::OutsideRoot.status(), StatusCode::BAD_REQUEST);
        let not_found = ServeError::NotFound {
            path: PathBuf::from("/srv/media/x"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(not_found.status(), StatusCode::BAD_REQUEST);
        let unreadable = ServeError::Unreadable {
            path: PathBuf::from("/srv/media/x"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(unreadable.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ServeError::Render("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn respond_tags_errors_with_handler() {
        let response = respond(HandlerKind::Download, Err(ServeError::OutsideRoot));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[HANDLER_HEADER], "download");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}
