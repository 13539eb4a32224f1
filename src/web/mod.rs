pub mod api;
pub mod pages;
pub mod router;
pub mod state;
pub mod utils;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use self::state::AppState;

/// 原始字节下载的保留路径前缀
pub const DOWNLOAD_PREFIX: &str = "/_download";

/// 构建路由：所有路径进入同一个分发器
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(router::root_handler))
        .route("/*path", get(router::path_handler))
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
