//! Separation job execution
//!
//! One job = one working directory + one child process:
//! 1. Create the job directory under the work root
//! 2. Write the upload side-channel file
//! 3. Run the separation tool, relaying its output line by line
//! 4. Remove the directory (always)

pub mod command;
pub mod request;
pub mod runner;
pub mod workdir;

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

pub use command::ToolCommand;
pub use request::{JobSpec, ProjectId, RunRequest, ValidationError};
pub use workdir::{JobDir, JOB_DIR_PREFIX, UPLOAD_CONFIG_FILE};

/// Failures while setting up or running a job
///
/// A non-zero exit is not an error here; see [`JobOutcome::Failed`].
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Failed to create job directory: {0}")]
    WorkDir(#[source] std::io::Error),

    #[error("Failed to write r2_config.json: {0}")]
    UploadConfig(#[source] std::io::Error),

    #[error("Failed to create output pipe: {0}")]
    Pipe(#[source] std::io::Error),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read tool output: {0}")]
    Output(#[source] std::io::Error),

    #[error("Failed to wait for tool: {0}")]
    Wait(#[source] std::io::Error),
}

/// How the tool finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Failed { exit_code: i32 },
}

/// Run one job to completion
///
/// `on_line` receives each line of the tool's combined output as it is
/// produced. The job directory is gone when this returns, whatever the
/// result.
pub fn execute<F>(tool: &str, work_root: &Path, spec: &JobSpec, on_line: F) -> Result<JobOutcome, JobError>
where
    F: FnMut(&str),
{
    let dir = JobDir::create_in(work_root).map_err(JobError::WorkDir)?;

    let result = run_in(&dir, tool, spec, on_line);
    dir.close();

    match &result {
        Ok(JobOutcome::Completed) => info!("Job completed successfully"),
        Ok(JobOutcome::Failed { exit_code }) => error!(exit_code, "Job failed (exit {})", exit_code),
        Err(e) => error!("Job error: {}", e),
    }

    result
}

fn run_in<F>(dir: &JobDir, tool: &str, spec: &JobSpec, on_line: F) -> Result<JobOutcome, JobError>
where
    F: FnMut(&str),
{
    dir.write_upload_config(spec).map_err(JobError::UploadConfig)?;

    let command = ToolCommand::for_job(tool, spec, dir.path());
    info!("Running: {}", command);

    let exit_code = runner::run_streaming(&command, on_line)?;
    Ok(if exit_code == 0 {
        JobOutcome::Completed
    } else {
        JobOutcome::Failed { exit_code }
    })
}
