use crate::adapters::ToolSpec;
use crate::error::{ConvertError, Result};
use std::ffi::OsStr;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const SCRATCH_PREFIX: &str = "foiextract";

/// Writes `body` to a uniquely named scratch file in `work_dir`, runs `tool`
/// on it and returns the tool's stdout.
///
/// The scratch file is removed on every path out of this function. When both
/// the tool and the removal fail, the tool's error wins.
pub fn convert_via_scratch_file(
    tool: &ToolSpec,
    args: &[&str],
    body: &[u8],
    work_dir: &Path,
    keep_stderr: bool,
) -> Result<String> {
    std::fs::create_dir_all(work_dir).map_err(|e| ConvertError::temp_io(work_dir, e))?;

    let mut scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempfile_in(work_dir)
        .map_err(|e| ConvertError::temp_io(work_dir, e))?;
    let scratch_path = scratch.path().to_path_buf();

    scratch
        .write_all(body)
        .and_then(|_| scratch.flush())
        .and_then(|_| scratch.as_file().sync_all())
        .map_err(|e| ConvertError::temp_io(&scratch_path, e))?;

    let mut full_args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();
    full_args.push(scratch_path.as_os_str());

    let output = run_tool(tool, &full_args, work_dir, keep_stderr);
    let removed = scratch
        .close()
        .map_err(|e| ConvertError::temp_io(&scratch_path, e));

    let stdout = output?;
    removed?;
    Ok(stdout)
}

/// Runs `tool` with `args` in `work_dir`, bounded by the tool's timeout.
/// A non-zero exit is a failure; stdout is decoded lossily.
pub fn run_tool(
    tool: &ToolSpec,
    args: &[&OsStr],
    work_dir: &Path,
    keep_stderr: bool,
) -> Result<String> {
    let program = tool.program.display().to_string();
    debug!(
        "run {} {:?} timeout={:?} cwd={}",
        program,
        args,
        tool.timeout,
        work_dir.display()
    );

    let mut cmd = Command::new(&tool.program);
    cmd.args(args);
    cmd.current_dir(work_dir);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    spawn_in_own_group(&mut cmd);

    let mut child = cmd.spawn().map_err(|e| ConvertError::SubprocessFailure {
        program: program.clone(),
        detail: format!("spawn: {e}"),
    })?;

    let output = wait_with_timeout(&mut child, tool.timeout, &program)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ConvertError::SubprocessFailure {
            program,
            detail: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    if keep_stderr && !output.stderr.is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("{} stderr: {}", program, stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn wait_with_timeout(child: &mut Child, timeout: Duration, program: &str) -> Result<Output> {
    // Pipes are drained on their own threads so a chatty tool can't block on
    // a full buffer while we poll.
    let stdout_rx = drain(child.stdout.take());
    let stderr_rx = drain(child.stderr.take());
    let deadline = Instant::now() + timeout;

    let status = loop {
        let polled = child
            .try_wait()
            .map_err(|e| failure(program, format!("try_wait: {e}")))?;
        if let Some(status) = polled {
            break status;
        }
        if Instant::now() >= deadline {
            return Err(expire(child, timeout, program));
        }
        std::thread::sleep(Duration::from_millis(20));
    };

    // A descendant that inherited the pipes can hold them open after the
    // tool itself exits; the deadline still applies.
    let stdout = collect(&stdout_rx, child, deadline, timeout, program)?;
    let stderr = collect(&stderr_rx, child, deadline, timeout, program)?;
    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

fn collect(
    rx: &Receiver<std::io::Result<Vec<u8>>>,
    child: &mut Child,
    deadline: Instant,
    timeout: Duration,
    program: &str,
) -> Result<Vec<u8>> {
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(read) => read.map_err(|e| failure(program, format!("reading pipe: {e}"))),
        Err(RecvTimeoutError::Timeout) => Err(expire(child, timeout, program)),
        Err(RecvTimeoutError::Disconnected) => {
            Err(failure(program, "pipe reader thread panicked".to_string()))
        }
    }
}

fn expire(child: &mut Child, timeout: Duration, program: &str) -> ConvertError {
    warn!("{} timed out after {:?}; killing", program, timeout);
    kill_process_group(child);
    let _ = child.kill();
    let _ = child.wait();
    ConvertError::SubprocessTimeout {
        program: program.to_string(),
        timeout,
    }
}

#[cfg(unix)]
fn kill_process_group(child: &Child) {
    // The child leads its own group (see `spawn_in_own_group`).
    let pgid = child.id() as libc::pid_t;
    unsafe {
        libc::kill(-pgid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

#[cfg(unix)]
fn spawn_in_own_group(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn spawn_in_own_group(_cmd: &mut Command) {}

fn drain<R: Read + Send + 'static>(reader: Option<R>) -> Receiver<std::io::Result<Vec<u8>>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let read = match reader {
            Some(mut r) => r.read_to_end(&mut buf).map(|_| buf),
            None => Ok(buf),
        };
        let _ = tx.send(read);
    });
    rx
}

fn failure(program: &str, detail: String) -> ConvertError {
    ConvertError::SubprocessFailure {
        program: program.to_string(),
        detail,
    }
}
