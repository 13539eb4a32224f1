use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::api::{download, listing, media};
use super::state::AppState;
use super::utils::errors::ServeError;
use super::DOWNLOAD_PREFIX;

pub async fn root_handler(State(state): State<Arc<AppState>>) -> Response {
    dispatch(&state, "/").await
}

pub async fn path_handler(
    State(state): State<Arc<AppState>>,
    Path(path_param): Path<String>,
) -> Response {
    let request_path = if path_param.starts_with('/') {
        path_param
    } else {
        format!("/{}", path_param)
    };
    dispatch(&state, &request_path).await
}

/// 请求分发
///
/// 1. 以下载前缀开头 → 原始字节传输
/// 2. 否则在根目录内解析路径，越界返回 400
/// 3. 打开并 stat 目标：目录 → 列表页，文件 → 播放页
pub async fn dispatch(state: &AppState, request_path: &str) -> Response {
    if request_path.starts_with(DOWNLOAD_PREFIX) {
        return download::serve(state, request_path).await;
    }

    let resolved = match state.root.resolve(request_path) {
        Ok(path) => path,
        Err(e) => return ServeError::from(e).into_response(),
    };

    // 句柄覆盖整个处理过程，任何退出路径都会随作用域释放
    let file = match tokio::fs::File::open(&resolved).await {
        Ok(file) => file,
        Err(source) => {
            return ServeError::NotFound {
                path: resolved,
                source,
            }
            .into_response()
        }
    };
    let metadata = match file.metadata().await {
        Ok(metadata) => metadata,
        Err(source) => {
            return ServeError::Stat {
                path: resolved,
                source,
            }
            .into_response()
        }
    };

    let response = if metadata.is_dir() {
        listing::serve(state, resolved, request_path).await
    } else {
        media::serve(resolved, request_path).await
    };
    drop(file);
    response
}
