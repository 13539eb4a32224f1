use crate::config::Settings;
use crate::vfs::ServedRoot;

/// Web 应用全局状态
///
/// 职责：启动时构造、之后只读，通过 Arc 注入到 Axum 的 Handler 中。
#[derive(Debug, Clone)]
pub struct AppState {
    pub root: ServedRoot,
    /// 目录列表是否按名称排序；关闭时保持文件系统枚举顺序
    pub sort_entries: bool,
}

impl AppState {
    pub fn new(root: ServedRoot) -> Self {
        Self {
            root,
            sort_entries: true,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let root = ServedRoot::with_symlink_policy(
            &settings.server.root,
            settings.confinement.follow_symlinks,
        )?;
        Ok(Self {
            root,
            sort_entries: settings.listing.sort_entries,
        })
    }
}
