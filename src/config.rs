use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// 应用配置总结构
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub listing: ListingSettings,
    pub confinement: ConfinementSettings,
}

/// 服务相关配置（监听地址、端口、服务根目录）
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// 对外提供浏览的目录，默认当前工作目录
    pub root: PathBuf,
}

/// 目录列表配置
#[derive(Debug, Deserialize, Clone)]
pub struct ListingSettings {
    /// 按名称排序；关闭后保持文件系统的枚举顺序
    pub sort_entries: bool,
}

/// 路径限制策略
#[derive(Debug, Deserialize, Clone)]
pub struct ConfinementSettings {
    /// 为 true 时只做词法前缀检查，根目录内指向外部的符号链接会被跟随
    pub follow_symlinks: bool,
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// 加载配置：支持默认值、可选配置文件、环境变量覆盖
    pub fn new() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let builder = Config::builder()
            // 默认值（代码内硬编码）
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 80)?
            .set_default("server.root", cwd.to_string_lossy().into_owned())?
            .set_default("listing.sort_entries", true)?
            .set_default("confinement.follow_symlinks", false)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("MEDIAWEB").separator("__"));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 命令行参数优先级最高
    pub fn apply_overrides(
        &mut self,
        dir: Option<PathBuf>,
        host_port: Option<&str>,
    ) -> anyhow::Result<()> {
        if let Some(dir) = dir {
            self.server.root = dir;
        }
        if let Some(host_port) = host_port {
            let (host, port) = parse_host_port(host_port)?;
            self.server.host = host;
            self.server.port = port;
        }
        Ok(())
    }
}

/// 解析 `host:port`，支持 `[::]:80` 形式
pub fn parse_host_port(raw: &str) -> anyhow::Result<(String, u16)> {
    let (host, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| anyhow::anyhow!("Invalid listen address (expected host:port): {}", raw))?;
    let port = port
        .parse::<u16>()
        .map_err(|e| anyhow::anyhow!("Invalid port in {}: {}", raw, e))?;
    let host = if host.is_empty() { "0.0.0.0" } else { host };
    Ok((host.to_string(), port))
}
