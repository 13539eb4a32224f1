use axum::response::{IntoResponse, Response};
use std::path::{Path, PathBuf};

use crate::vfs::{classify, ServedRoot};
use crate::web::pages::{render_listing, DirEntry};
use crate::web::state::AppState;
use crate::web::utils::errors::{respond, HandlerKind, ServeError};

/// 目录请求处理器
pub async fn serve(state: &AppState, dir: PathBuf, request_path: &str) -> Response {
    respond(HandlerKind::Dir, render(state, dir, request_path).await)
}

async fn render(state: &AppState, dir: PathBuf, request_path: &str) -> Result<Response, ServeError> {
    let root = state.root.clone();
    let sort = state.sort_entries;
    let (dir, entries) = tokio::task::spawn_blocking(move || {
        let entries = read_entries(&root, &dir, sort)?;
        Ok::<_, ServeError>((dir, entries))
    })
    .await??;

    Ok(render_listing(&dir, &entries, request_path)?.into_response())
}

/// 枚举目录并逐项分类
///
/// 子目录直接标记为可导航；其余条目按内容嗅探，只有视频可导航。
/// 严格模式下经由符号链接指向根目录之外的条目不做 stat 与嗅探，只列出名称。
/// 任何一项分类失败都会中止整个列表，不返回部分结果。
pub fn read_entries(
    root: &ServedRoot,
    dir: &Path,
    sort: bool,
) -> Result<Vec<DirEntry>, ServeError> {
    let reader = std::fs::read_dir(dir).map_err(|source| ServeError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for item in reader {
        let item = item.map_err(|source| ServeError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = item.path();
        let name = item.file_name().to_string_lossy().into_owned();

        if root.escapes_via_symlink(&path) {
            entries.push(DirEntry::outside(name));
            continue;
        }

        // 跟随符号链接，按目标类型处理
        let metadata = std::fs::metadata(&path).map_err(|source| ServeError::Stat {
            path: path.clone(),
            source,
        })?;
        if metadata.is_dir() {
            entries.push(DirEntry::directory(name));
        } else {
            let kind = classify(&path).map_err(|source| ServeError::Classify { path, source })?;
            entries.push(DirEntry::file(name, &kind));
        }
    }

    if sort {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }
    Ok(entries)
}
