//! 后台服务管理
//!
//! 核心服务逻辑不感知服务状态；这里只为命令行提供 install/remove/status/start/stop。
//! Linux 上通过 systemd unit 文件和 `systemctl` 实现。

use anyhow::Context;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::config::Settings;

pub const SERVICE_NAME: &str = "mediaweb";
pub const SERVICE_DESCRIPTION: &str = "Web server for media files.";

const DEFAULT_UNIT_DIR: &str = "/etc/systemd/system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceAction {
    Install,
    Remove,
    Status,
    Start,
    Stop,
}

/// 后台服务控制能力
///
/// 每个操作成功时返回一段可读的状态描述。
pub trait ServiceController {
    /// 注册服务，`args` 会被持久化为服务启动参数
    fn install(&self, args: &[String]) -> anyhow::Result<String>;
    fn remove(&self) -> anyhow::Result<String>;
    fn status(&self) -> anyhow::Result<String>;
    fn start(&self) -> anyhow::Result<String>;
    fn stop(&self) -> anyhow::Result<String>;
}

pub fn perform(
    controller: &dyn ServiceController,
    action: ServiceAction,
    args: &[String],
) -> anyhow::Result<String> {
    info!("[Service] Performing {:?}", action);
    match action {
        ServiceAction::Install => controller.install(args),
        ServiceAction::Remove => controller.remove(),
        ServiceAction::Status => controller.status(),
        ServiceAction::Start => controller.start(),
        ServiceAction::Stop => controller.stop(),
    }
}

/// 安装服务时持久化的启动参数：规范化后的根目录与监听地址
pub fn install_args(settings: &Settings) -> anyhow::Result<Vec<String>> {
    let root = std::fs::canonicalize(&settings.server.root)
        .with_context(|| format!("Failed to resolve served root {:?}", settings.server.root))?;
    Ok(vec![
        "--dir".to_string(),
        root.to_string_lossy().into_owned(),
        "--host-port".to_string(),
        settings.server.bind_address(),
    ])
}

/// 基于 systemd 的实现
pub struct SystemdController {
    exec_path: PathBuf,
    unit_dir: PathBuf,
}

impl SystemdController {
    pub fn new() -> anyhow::Result<Self> {
        let exec_path = std::env::current_exe().context("Failed to locate current executable")?;
        Ok(Self::with_paths(exec_path, DEFAULT_UNIT_DIR))
    }

    pub fn with_paths(exec_path: impl Into<PathBuf>, unit_dir: impl Into<PathBuf>) -> Self {
        Self {
            exec_path: exec_path.into(),
            unit_dir: unit_dir.into(),
        }
    }

    pub fn unit_path(&self) -> PathBuf {
        self.unit_dir.join(format!("{}.service", SERVICE_NAME))
    }

    pub fn is_installed(&self) -> bool {
        self.unit_path().exists()
    }

    fn ensure_installed(&self) -> anyhow::Result<()> {
        if !self.is_installed() {
            return Err(anyhow::anyhow!("Service is not installed"));
        }
        Ok(())
    }

    fn systemctl(&self, args: &[&str]) -> anyhow::Result<String> {
        debug!("[Service] systemctl {}", args.join(" "));
        let output = Command::new("systemctl")
            .args(args)
            .output()
            .context("Failed to run systemctl")?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(anyhow::anyhow!(
                "systemctl {} failed ({}): {}",
                args.join(" "),
                output.status,
                if stderr.is_empty() { stdout } else { stderr }
            ));
        }
        Ok(stdout)
    }
}

impl ServiceController for SystemdController {
    fn install(&self, args: &[String]) -> anyhow::Result<String> {
        let unit_path = self.unit_path();
        if unit_path.exists() {
            return Err(anyhow::anyhow!("Service has already been installed"));
        }
        let unit = generate_unit_file(&self.exec_path, args);
        std::fs::write(&unit_path, unit)
            .with_context(|| format!("Failed to write unit file {:?}", unit_path))?;
        self.systemctl(&["daemon-reload"])?;
        let unit_name = format!("{}.service", SERVICE_NAME);
        self.systemctl(&["enable", unit_name.as_str()])?;
        Ok(format!("Install {}: OK", SERVICE_DESCRIPTION))
    }

    fn remove(&self) -> anyhow::Result<String> {
        self.ensure_installed()?;
        let unit_name = format!("{}.service", SERVICE_NAME);
        self.systemctl(&["disable", unit_name.as_str()])?;
        std::fs::remove_file(self.unit_path()).context("Failed to remove unit file")?;
        self.systemctl(&["daemon-reload"])?;
        Ok(format!("Removing {}: OK", SERVICE_DESCRIPTION))
    }

    fn status(&self) -> anyhow::Result<String> {
        self.ensure_installed()?;
        let unit_name = format!("{}.service", SERVICE_NAME);
        // `is-active` 在服务未运行时返回非零状态码，只取输出
        let output = Command::new("systemctl")
            .args(["is-active", unit_name.as_str()])
            .output()
            .context("Failed to run systemctl")?;
        let state = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(format!("Service ({}) is {}", SERVICE_NAME, state))
    }

    fn start(&self) -> anyhow::Result<String> {
        self.ensure_installed()?;
        let unit_name = format!("{}.service", SERVICE_NAME);
        self.systemctl(&["start", unit_name.as_str()])?;
        Ok(format!("Starting {}: OK", SERVICE_DESCRIPTION))
    }

    fn stop(&self) -> anyhow::Result<String> {
        self.ensure_installed()?;
        let unit_name = format!("{}.service", SERVICE_NAME);
        self.systemctl(&["stop", unit_name.as_str()])?;
        Ok(format!("Stopping {}: OK", SERVICE_DESCRIPTION))
    }
}

/// 生成 systemd unit 文件，启动参数逐个加引号写入 `ExecStart`
pub fn generate_unit_file(exec_path: &Path, args: &[String]) -> String {
    let mut exec_start = quote_unit_arg(&exec_path.to_string_lossy());
    for arg in args {
        exec_start.push(' ');
        exec_start.push_str(&quote_unit_arg(arg));
    }

    format!(
        r#"[Unit]
Description={description}
Requires=network.target
After=network.target

[Service]
Type=simple
ExecStart={exec_start}
Restart=on-failure

[Install]
WantedBy=multi-user.target
"#,
        description = SERVICE_DESCRIPTION,
        exec_start = exec_start,
    )
}

fn quote_unit_arg(arg: &str) -> String {
    let escaped = arg
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('%', "%%");
    format!("\"{}\"", escaped)
}
