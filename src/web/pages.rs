use std::fmt::Write as _;
use std::path::Path;

use axum::response::{Html, IntoResponse, Response};

use super::utils::errors::ServeError;
use super::utils::html::{encode_path, escape_html};
use super::DOWNLOAD_PREFIX;
use crate::vfs::{clean_request_path, ContentKind};

fn listing_head(title: &str) -> String {
    format!(
        r#"<html>
<head>
<title>{title}</title>
<style>
body {{
  font-size: xx-large;
}}
</style>
</head>
<body>
<ul>
"#
    )
}

const LISTING_TAIL: &str = "</ul>\n</body>\n</html>\n";

fn player_page(title: &str, src: &str, mime: &str) -> String {
    format!(
        r#"<html>
<head>
  <title>{title}</title>
  <link href="https://vjs.zencdn.net/6.4.0/video-js.css" rel="stylesheet">
</head>

<body>
  <video id="my-video" class="video-js" controls preload="auto" width="640" height="264"
  data-setup="{{}}">
    <source src="{src}" type='{mime}'>
    <p class="vjs-no-js">
      To view this video please enable JavaScript, and consider upgrading to a web browser that
      <a href="https://videojs.com/html5-video-support/" target="_blank">supports HTML5 video</a>
    </p>
  </video>

  <script src="https://vjs.zencdn.net/6.4.0/video.js"></script>
</body>
</html>
"#
    )
}

/// 渲染完成的 HTML 页面
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub html: String,
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        Html(self.html).into_response()
    }
}

/// 目录列表中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    /// 子目录与视频文件可点击进入
    pub navigable: bool,
    pub label: String,
}

impl DirEntry {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            navigable: true,
            label: "directory".to_string(),
        }
    }

    /// 指向根目录之外的符号链接：不可导航，类型不予探测
    pub fn outside(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            navigable: false,
            label: "unknown".to_string(),
        }
    }

    pub fn file(name: impl Into<String>, kind: &ContentKind) -> Self {
        Self {
            name: name.into(),
            navigable: kind.is_video(),
            label: kind.label().to_string(),
        }
    }
}

/// 目录列表页
///
/// 标题为目录的实际路径；链接为当前请求路径拼接条目名，保持在同一路由方案内。
pub fn render_listing(
    dir_path: &Path,
    entries: &[DirEntry],
    request_path: &str,
) -> Result<Page, ServeError> {
    let title = dir_path.display().to_string();
    let parent = clean_request_path(request_path);

    let mut html = listing_head(&escape_html(&title));
    for entry in entries {
        let display = escape_html(&join_display(&parent, &entry.name));
        let label = escape_html(&entry.label);
        let line = if entry.navigable {
            let href = encode_path(parent.split('/').chain([entry.name.as_str()]))?;
            format!(
                "<li><a href=\"{}\">{}</a> <small>{}</small></li>",
                escape_html(&href),
                display,
                label
            )
        } else {
            format!("<li>{} <small>{}</small></li>", display, label)
        };
        writeln!(html, "{}", line).map_err(|e| ServeError::Render(e.to_string()))?;
    }
    html.push_str(LISTING_TAIL);

    Ok(Page { title, html })
}

/// 播放器页面，`<source>` 指向下载前缀下的同一路径
///
/// 不按类别过滤：任何文件都会得到播放页，未识别时 `type` 为空串。
pub fn render_media_page(kind: &ContentKind, request_path: &str) -> Result<Page, ServeError> {
    let title = clean_request_path(request_path);
    let src = encode_path(DOWNLOAD_PREFIX.split('/').chain(title.split('/')))?;

    let html = player_page(
        &escape_html(&title),
        &escape_html(&src),
        &escape_html(kind.mime()),
    );

    Ok(Page { title, html })
}

fn join_display(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}
