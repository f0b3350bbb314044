//! Child process execution with line relay
//!
//! The child's stdout and stderr share one pipe, so lines reach the sink in
//! the order the child wrote them. Each line is handed over as soon as it is
//! read; nothing waits for the child to finish.

use std::io::{BufRead, BufReader, PipeReader};
use std::process::{Command, ExitStatus, Stdio};

use super::command::ToolCommand;
use super::JobError;

/// Run `command` to completion, feeding every output line to `on_line`
///
/// Returns the exit code. A child killed by signal `S` reports `-S`.
/// Blocks the calling thread; async callers go through `spawn_blocking`.
pub fn run_streaming<F>(command: &ToolCommand, mut on_line: F) -> Result<i32, JobError>
where
    F: FnMut(&str),
{
    let (reader, writer) = std::io::pipe().map_err(JobError::Pipe)?;

    // The Command owns the parent's copies of the write end; it must be
    // dropped before reading or EOF never arrives.
    let mut child = {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .stdin(Stdio::null())
            .stdout(writer.try_clone().map_err(JobError::Pipe)?)
            .stderr(writer);
        cmd.spawn().map_err(|source| JobError::Spawn {
            program: command.program().to_string_lossy().into_owned(),
            source,
        })?
    };

    let relayed = relay_lines(reader, &mut on_line);
    let status = child.wait().map_err(JobError::Wait)?;
    relayed.map_err(JobError::Output)?;

    Ok(exit_code(status))
}

fn relay_lines<F>(reader: PipeReader, on_line: &mut F) -> std::io::Result<()>
where
    F: FnMut(&str),
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        on_line(line.trim_end_matches(['\n', '\r']));
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
