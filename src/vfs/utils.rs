use std::path::{Component, Path, PathBuf};

/// 纯词法的路径清理：去掉 `.`，按 `..` 回退一级，不访问文件系统，也不跟随符号链接。
/// 在根目录处的 `..` 保持在根目录。
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// 将请求路径拼接到根目录之后并清理
///
/// 请求路径开头的 `/` 不会替换根目录（与 `PathBuf::join` 的绝对路径语义不同）。
pub fn join_request_path(root: &Path, request_path: &str) -> PathBuf {
    let mut joined = root.to_path_buf();
    for comp in Path::new(request_path).components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => {}
            other => joined.push(other.as_os_str()),
        }
    }
    normalize_path(&joined)
}

/// 以 `/` 为根清理 URL 路径，用于生成链接；结果不带末尾斜杠（根路径除外）。
pub fn clean_request_path(path: &str) -> String {
    let mut parts = Vec::new();
    for part in path.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            parts.pop();
            continue;
        }
        parts.push(part);
    }
    let mut cleaned = String::from("/");
    cleaned.push_str(&parts.join("/"));
    cleaned
}
