mod classify;
mod utils;


use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;

pub use classify::{classify, ContentKind};
pub use utils::{clean_request_path, join_request_path, normalize_path};

/// 请求路径解析后落在服务根目录之外
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("outside allowed path")]
pub struct OutsideRoot;

/// 服务根目录
///
/// 职责：进程启动时确定、之后只读的目录，所有请求路径都必须被限制在其中。
/// 构造时会规范化（canonicalize）配置的目录，因此 `path()` 总是不含符号链接的绝对路径。
#[derive(Debug, Clone)]
pub struct ServedRoot {
    path: PathBuf,
    follow_symlinks: bool,
}

impl ServedRoot {
    /// 以严格模式创建：指向根目录之外的符号链接会被拒绝
    pub fn new(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::with_symlink_policy(dir, false)
    }

    pub fn with_symlink_policy(dir: impl AsRef<Path>, follow_symlinks: bool) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let path = std::fs::canonicalize(dir)
            .with_context(|| format!("Failed to resolve served root {:?}", dir))?;
        if !path.is_dir() {
            return Err(anyhow::anyhow!("Served root must be a directory: {:?}", path));
        }
        Ok(Self {
            path,
            follow_symlinks,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn follows_symlinks(&self) -> bool {
        self.follow_symlinks
    }

    /// 将不可信的请求路径解析为根目录内的绝对路径
    ///
    /// 1. 词法拼接并清理 `.`/`..`，按路径组件做前缀判断；越界时不触碰文件系统。
    /// 2. 严格模式下再对结果做 canonicalize，真实路径仍须位于根目录内。
    ///    目标不存在时返回词法结果，由调用方在打开文件时报告错误。
    pub fn resolve(&self, request_path: &str) -> Result<PathBuf, OutsideRoot> {
        let resolved = join_request_path(&self.path, request_path);
        if !resolved.starts_with(&self.path) {
            return Err(OutsideRoot);
        }
        if self.escapes_via_symlink(&resolved) {
            return Err(OutsideRoot);
        }
        Ok(resolved)
    }

    /// 严格模式下判断已存在的路径是否经由符号链接指向根目录之外
    ///
    /// 宽松模式总是返回 false；无法 canonicalize（目标不存在）时同样返回 false。
    pub fn escapes_via_symlink(&self, path: &Path) -> bool {
        if self.follow_symlinks {
            return false;
        }
        match std::fs::canonicalize(path) {
            Ok(real) if !real.starts_with(&self.path) => {
                tracing::debug!("[Vfs] Symlink escapes served root: {:?} -> {:?}", path, real);
                true
            }
            _ => false,
        }
    }
}
