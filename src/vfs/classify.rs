use std::fmt;
use std::path::Path;

/// 基于文件头魔数嗅探得到的内容类型
///
/// 未识别时 MIME 与扩展名均为空串。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentKind {
    mime: String,
    extension: String,
}

impl ContentKind {
    pub fn new(mime: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            extension: extension.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }

    /// 完整 MIME 值，如 `video/mp4`
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// 顶层类别，如 `video`
    pub fn top_level(&self) -> &str {
        self.mime
            .split_once('/')
            .map(|(top, _)| top)
            .unwrap_or(&self.mime)
    }

    pub fn subtype(&self) -> &str {
        self.mime
            .split_once('/')
            .map(|(_, sub)| sub)
            .unwrap_or("")
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// 列表页展示用的短标签
    pub fn label(&self) -> &str {
        if self.extension.is_empty() {
            "unknown"
        } else {
            &self.extension
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.mime.is_empty()
    }

    pub fn is_video(&self) -> bool {
        self.top_level() == "video"
    }
}

impl From<infer::Type> for ContentKind {
    fn from(kind: infer::Type) -> Self {
        Self::new(kind.mime_type(), kind.extension())
    }
}

/// 诊断格式，写入 `X-Mediaweb-Type` 响应头
impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{MIME:{{Type:{} Subtype:{} Value:{}}} Extension:{}}}",
            self.top_level(),
            self.subtype(),
            self.mime,
            self.label()
        )
    }
}

/// 读取文件开头若干字节并匹配签名表，不参考文件名与扩展名。
/// 只有 I/O 错误会向上传递，未匹配时返回 unknown。
pub fn classify(path: &Path) -> std::io::Result<ContentKind> {
    Ok(infer::get_from_path(path)?
        .map(ContentKind::from)
        .unwrap_or_default())
}

#[cfg(test)]
fn classify_bytes(buf: &[u8]) -> ContentKind {
    infer::get(buf).map(ContentKind::from).unwrap_or_default()
}
