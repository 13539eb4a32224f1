use std::io::{Read, Write};
use std::net::TcpStream;
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn pick_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind")
        .local_addr()
        .expect("addr")
        .port()
}

fn wait_for_listener(
    child: &mut Child,
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<(), String> {
    let deadline = Instant::now() + timeout;
    let addr = format!("{}:{}", host, port);
    while Instant::now() < deadline {
        if TcpStream::connect(&addr).is_ok() {
            return Ok(());
        }
        if let Ok(Some(status)) = child.try_wait() {
            let mut stderr = String::new();
            let mut stdout = String::new();
            if let Some(mut stderr_pipe) = child.stderr.take() {
                let _ = stderr_pipe.read_to_string(&mut stderr);
            }
            if let Some(mut stdout_pipe) = child.stdout.take() {
                let _ = stdout_pipe.read_to_string(&mut stdout);
            }
            return Err(format!(
                "server exited early ({}): stdout='{}' stderr='{}'",
                status,
                stdout.trim(),
                stderr.trim()
            ));
        }
        thread::sleep(Duration::from_millis(50));
    }
    let _ = child.kill();
    let _ = child.wait();
    let mut stderr = String::new();
    let mut stdout = String::new();
    if let Some(mut stderr_pipe) = child.stderr.take() {
        let _ = stderr_pipe.read_to_string(&mut stderr);
    }
    if let Some(mut stdout_pipe) = child.stdout.take() {
        let _ = stdout_pipe.read_to_string(&mut stdout);
    }
    Err(format!(
        "server not ready: stdout='{}' stderr='{}'",
        stdout.trim(),
        stderr.trim()
    ))
}

fn http_get(host: &str, port: u16, path: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(format!("{}:{}", host, port)).expect("connect");
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}:{}\r\nConnection: close\r\n\r\n",
        path, host, port
    );
    stream.write_all(request.as_bytes()).expect("write");
    stream.flush().expect("flush");

    let mut response = Vec::new();
    stream.read_to_end(&mut response).expect("read");
    response
}

/// 拆分为状态码、响应头文本与原始响应体
fn parse_response(response: &[u8]) -> (u16, String, Vec<u8>) {
    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .unwrap_or(response.len());
    let head = String::from_utf8_lossy(&response[..split]).to_string();
    let body = response.get(split + 4..).unwrap_or_default().to_vec();

    let status_code = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(0);

    (status_code, head.to_ascii_lowercase(), body)
}

struct ChildGuard {
    child: Child,
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

const MP4_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isom";

fn spawn_server() -> (ChildGuard, String, u16, tempfile::TempDir) {
    let port = pick_free_port();
    let host = "127.0.0.1";
    let temp_dir = tempdir().expect("tempdir");
    let media_dir = temp_dir.path().join("media");
    std::fs::create_dir_all(media_dir.join("movies")).expect("create media");
    std::fs::write(media_dir.join("notes.txt"), "plain notes").expect("write");
    std::fs::write(media_dir.join("clip.mp4"), MP4_BYTES).expect("write");

    let mut child = Command::new(env!("CARGO_BIN_EXE_mediaweb"))
        .current_dir(temp_dir.path())
        .arg("--dir")
        .arg(&media_dir)
        .arg("--host-port")
        .arg(format!("{}:{}", host, port))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");

    if let Err(message) =
        wait_for_listener(&mut child, host, port, Duration::from_secs(30))
    {
        let guard = ChildGuard { child };
        drop(guard);
        panic!("{}", message);
    }

    (ChildGuard { child }, host.to_string(), port, temp_dir)
}

fn e2e_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

#[test]
fn e2e_listing_smoke() {
    let _lock = e2e_lock();
    let (_guard, host, port, _temp_dir) = spawn_server();

    let response = http_get(&host, port, "/");
    let (status, headers, body) = parse_response(&response);
    assert_eq!(status, 200);
    assert!(headers.contains("x-mediaweb-handler: dir"));
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("<a href=\"/movies\">"));
    assert!(body.contains("<a href=\"/clip.mp4\">"));
    assert!(body.contains("<li>/notes.txt <small>unknown</small></li>"));
}

#[test]
fn e2e_player_and_download_smoke() {
    let _lock = e2e_lock();
    let (_guard, host, port, _temp_dir) = spawn_server();

    let response = http_get(&host, port, "/clip.mp4");
    let (status, headers, body) = parse_response(&response);
    assert_eq!(status, 200);
    assert!(headers.contains("x-mediaweb-handler: file"));
    assert!(String::from_utf8_lossy(&body).contains("src=\"/_download/clip.mp4\""));

    let response = http_get(&host, port, "/_download/clip.mp4");
    let (status, headers, body) = parse_response(&response);
    assert_eq!(status, 200);
    assert!(headers.contains("content-type: video/mp4"));
    assert_eq!(body, MP4_BYTES);
}

#[test]
fn e2e_escape_is_rejected() {
    let _lock = e2e_lock();
    let (_guard, host, port, _temp_dir) = spawn_server();

    let response = http_get(&host, port, "/../outside");
    let (status, _headers, body) = parse_response(&response);
    assert_eq!(status, 400);
    assert_eq!(String::from_utf8_lossy(&body), "outside allowed path\n");
}
