use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    hits: Arc<AtomicU64>,
}

impl ServerHandle {
    /// Requests answered so far.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server for tests.
///
/// `GET /missing` answers 404, `GET /slow` answers 200 after 50ms, every
/// other path answers 200.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let hits = Arc::new(AtomicU64::new(0));
    let server_hits = Arc::clone(&hits);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let hits = Arc::clone(&server_hits);
                    thread::spawn(move || handle_client(stream, &hits));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            hits,
        },
    ))
}

fn handle_client(mut stream: TcpStream, hits: &AtomicU64) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let mut buffer = [0u8; 1024];
    let Ok(read) = stream.read(&mut buffer) else {
        return;
    };
    let request = String::from_utf8_lossy(buffer.get(..read).unwrap_or_default());
    let response: &[u8] = if request.starts_with("GET /missing") {
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 7\r\nConnection: close\r\n\r\nmissing"
    } else {
        if request.starts_with("GET /slow") {
            thread::sleep(Duration::from_millis(50));
        }
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK"
    };
    hits.fetch_add(1, Ordering::SeqCst);
    if stream.write_all(response).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Run the `barrage` binary from `workdir` and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_barrage<I, S>(workdir: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = barrage_bin()?;
    Command::new(bin)
        .args(args)
        .current_dir(workdir)
        .env("BARRAGE_LOG", "error")
        .env("NO_COLOR", "1")
        .output()
        .map_err(|err| format!("run barrage failed: {}", err))
}

fn barrage_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_barrage").map_or_else(
        || Err("CARGO_BIN_EXE_barrage missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

/// Formats a failed run for an assertion message.
#[must_use]
pub fn describe(output: &Output) -> String {
    format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
