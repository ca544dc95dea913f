//! Command runner backed by real child processes.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{CommandOutput, CommandRunner, CommandSpec, ExecError};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Output is still collected for this long after the process itself exits.
/// Descendants that inherited the pipes may hold them open indefinitely.
const EXIT_DRAIN_GRACE: Duration = Duration::from_secs(1);

const READ_CHUNK: usize = 8 * 1024;

/// Runs commands in a fixed working directory with a per-command time bound.
///
/// The bound covers the whole invocation, including collecting output. On
/// timeout the process is killed and whatever output arrived is kept.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    work_dir: PathBuf,
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(work_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            work_dir: work_dir.into(),
            timeout,
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn execute(&self, spec: &CommandSpec, started: Instant) -> Result<CommandOutput, ExecError> {
        let command = spec.to_string();
        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                command: command.clone(),
                source,
            })?;

        let (events, received) = mpsc::channel();
        let mut captured = Captured::default();
        if let Some(pipe) = child.stdout.take() {
            pump(pipe, Stream::Stdout, events.clone());
            captured.open += 1;
        }
        if let Some(pipe) = child.stderr.take() {
            pump(pipe, Stream::Stderr, events.clone());
            captured.open += 1;
        }
        drop(events);

        let deadline = started
            .checked_add(self.timeout)
            .unwrap_or_else(|| started + Duration::from_secs(u32::MAX as u64));
        let mut exit: Option<(ExitStatus, Instant)> = None;

        loop {
            if exit.is_none() {
                let polled = child.try_wait().map_err(|source| ExecError::Wait {
                    command: command.clone(),
                    source,
                })?;
                exit = polled.map(|status| (status, Instant::now()));
            }

            let limit = match exit {
                Some((status, _)) if captured.open == 0 => {
                    return Ok(captured.exited(status, started.elapsed()));
                }
                Some((_, exited_at)) => deadline.min(exited_at + EXIT_DRAIN_GRACE),
                None => deadline,
            };

            let now = Instant::now();
            if now >= limit {
                return Ok(match exit {
                    Some((status, _)) => {
                        warn!(%command, "process exited with its output pipes still open");
                        captured.exited(status, started.elapsed())
                    }
                    None => {
                        warn!(
                            %command,
                            timeout = ?self.timeout,
                            "command timed out, killing process"
                        );
                        terminate(&mut child, &command);
                        captured.timed_out(started.elapsed())
                    }
                });
            }

            let wait = (limit - now).min(POLL_INTERVAL);
            if captured.open == 0 {
                thread::sleep(wait);
                continue;
            }
            match received.recv_timeout(wait) {
                Ok(event) => {
                    if let Err(source) = captured.record(event) {
                        if exit.is_none() {
                            terminate(&mut child, &command);
                        }
                        return Err(ExecError::Output { command, source });
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => captured.open = 0,
            }
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> CommandOutput {
        let started = Instant::now();
        debug!(command = %spec, dir = %self.work_dir.display(), "running command");

        let output = match self.execute(spec, started) {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, "command could not be run");
                CommandOutput::from_error(&err, started.elapsed())
            }
        };

        debug!(
            command = %spec,
            success = output.success,
            exit_code = ?output.exit_code,
            timed_out = output.timed_out,
            elapsed_ms = output.elapsed.as_millis() as u64,
            "command finished"
        );
        output
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

enum PipeEvent {
    Data(Stream, Vec<u8>),
    Closed(io::Result<()>),
}

/// Output received so far and the number of pipes still open.
#[derive(Default)]
struct Captured {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    open: usize,
}

impl Captured {
    fn record(&mut self, event: PipeEvent) -> io::Result<()> {
        match event {
            PipeEvent::Data(Stream::Stdout, bytes) => self.stdout.extend_from_slice(&bytes),
            PipeEvent::Data(Stream::Stderr, bytes) => self.stderr.extend_from_slice(&bytes),
            PipeEvent::Closed(result) => {
                self.open = self.open.saturating_sub(1);
                result?;
            }
        }
        Ok(())
    }

    fn exited(self, status: ExitStatus, elapsed: Duration) -> CommandOutput {
        CommandOutput {
            success: status.success(),
            exit_code: status.code(),
            stdout: lossy(&self.stdout),
            stderr: lossy(&self.stderr),
            elapsed,
            timed_out: false,
        }
    }

    fn timed_out(self, elapsed: Duration) -> CommandOutput {
        let mut output = CommandOutput::timeout(elapsed);
        output.stdout = lossy(&self.stdout);
        let partial = lossy(&self.stderr);
        if !partial.trim().is_empty() {
            output.stderr = format!("{}\n{}", partial.trim_end(), output.stderr);
        }
        output
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Forward everything read from `pipe` until EOF. The thread ends on its own
/// once the runner stops listening and the pipe yields again.
fn pump<R: Read + Send + 'static>(mut pipe: R, stream: Stream, events: Sender<PipeEvent>) {
    thread::spawn(move || {
        let mut buf = vec![0u8; READ_CHUNK];
        let result = loop {
            match pipe.read(&mut buf) {
                Ok(0) => break Ok(()),
                Ok(n) => {
                    if events.send(PipeEvent::Data(stream, buf[..n].to_vec())).is_err() {
                        return;
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => break Err(err),
            }
        };
        events.send(PipeEvent::Closed(result)).ok();
    });
}

fn terminate(child: &mut Child, command: &str) {
    if let Err(err) = child.kill() {
        warn!(%command, error = %err, "failed to kill process");
    }
    match child.wait() {
        Ok(status) => debug!(%command, ?status, "killed process reaped"),
        Err(err) => warn!(%command, error = %err, "failed to reap killed process"),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn runner(timeout: Duration) -> SystemRunner {
        SystemRunner::new(std::env::temp_dir(), timeout)
    }

    #[test]
    fn test_run_success_captures_stdout() {
        let output = runner(Duration::from_secs(5)).run(&CommandSpec::new("echo").arg("hello"));

        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert!(output.stdout.contains("hello"));
        assert!(!output.timed_out);
    }

    #[test]
    fn test_run_captures_stderr_and_exit_code() {
        let spec = CommandSpec::new("sh").args(["-c", "echo oops >&2; exit 3"]);
        let output = runner(Duration::from_secs(5)).run(&spec);

        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
        assert!(output.stderr.contains("oops"));
    }

    #[test]
    fn test_run_not_found_is_failure() {
        let output =
            runner(Duration::from_secs(5)).run(&CommandSpec::new("nonexistent_command_12345"));

        assert!(!output.success);
        assert_eq!(output.exit_code, None);
        assert!(output.stderr.contains("failed to spawn"));
    }

    #[test]
    fn test_run_times_out() {
        let spec = CommandSpec::new("sleep").arg("5");
        let output = runner(Duration::from_millis(200)).run(&spec);

        assert!(!output.success);
        assert!(output.timed_out);
        assert!(output.elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_keeps_partial_output() {
        let spec = CommandSpec::new("sh").args(["-c", "echo partial; echo oops >&2; sleep 5"]);
        let output = runner(Duration::from_millis(500)).run(&spec);

        assert!(output.timed_out);
        assert!(output.stdout.contains("partial"), "{:?}", output.stdout);
        assert!(output.stderr.contains("oops"), "{:?}", output.stderr);
        assert!(output.stderr.contains("timed out"));
    }

    #[test]
    fn test_background_descendant_cannot_outlast_timeout() {
        let spec = CommandSpec::new("sh").args(["-c", "sleep 4 & echo started"]);
        let started = Instant::now();
        let output = runner(Duration::from_millis(500)).run(&spec);
        let took = started.elapsed();

        assert!(took < Duration::from_secs(2), "took {:?}", took);
        assert!(output.success);
        assert!(output.stdout.contains("started"));
    }

    #[test]
    fn test_exited_process_output_drain_is_bounded() {
        let spec = CommandSpec::new("sh").args(["-c", "sleep 4 & echo started"]);
        let started = Instant::now();
        let output = runner(Duration::from_secs(30)).run(&spec);
        let took = started.elapsed();

        assert!(took < Duration::from_secs(3), "took {:?}", took);
        assert!(output.success);
        assert!(!output.timed_out);
        assert_eq!(output.exit_code, Some(0));
    }

    #[test]
    fn test_run_uses_work_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path(), Duration::from_secs(5));
        let output = runner.run(&CommandSpec::new("pwd"));

        let reported = std::path::PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }
}
