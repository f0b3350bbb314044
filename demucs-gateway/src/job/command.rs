//! Separation tool command line

use std::ffi::OsString;
use std::path::Path;

use super::request::JobSpec;

/// Program plus arguments for one tool invocation
///
/// Usage: `<tool> --audio-url <url> --output <dir> [--id-projet <id>] [--vram-gb <n>] [--all-stems]`
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Build the command line for a job writing into `output_dir`
    pub fn for_job(tool: &str, spec: &JobSpec, output_dir: &Path) -> Self {
        let mut args: Vec<OsString> = vec![
            "--audio-url".into(),
            spec.audio_url.as_str().into(),
            "--output".into(),
            output_dir.as_os_str().to_owned(),
        ];

        if let Some(id) = spec.id_projet.as_ref().filter(|id| !id.is_blank()) {
            args.push("--id-projet".into());
            args.push(id.to_string().into());
        }
        if let Some(vram_gb) = &spec.vram_gb {
            args.push("--vram-gb".into());
            args.push(vram_gb.as_str().into());
        }
        if spec.all_stems {
            args.push("--all-stems".into());
        }

        Self {
            program: tool.into(),
            args,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_args(program: OsString, args: Vec<OsString>) -> Self {
        Self { program, args }
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::request::ProjectId;

    fn spec() -> JobSpec {
        JobSpec {
            audio_url: "https://example.com/a.wav".to_string(),
            id_projet: None,
            upload_token: "tok".to_string(),
            worker_url: "https://worker".to_string(),
            vram_gb: None,
            all_stems: false,
        }
    }

    #[test]
    fn test_minimal_command() {
        let cmd = ToolCommand::for_job("demucs-separate", &spec(), Path::new("/tmp/job"));
        assert_eq!(
            cmd.to_string(),
            "demucs-separate --audio-url https://example.com/a.wav --output /tmp/job"
        );
    }

    #[test]
    fn test_all_optional_flags_in_order() {
        let mut spec = spec();
        spec.id_projet = Some(ProjectId::Text("p1".to_string()));
        spec.vram_gb = Some("7.5".to_string());
        spec.all_stems = true;

        let cmd = ToolCommand::for_job("/usr/local/bin/demucs-separate", &spec, Path::new("/w"));
        assert_eq!(
            cmd.to_string(),
            "/usr/local/bin/demucs-separate --audio-url https://example.com/a.wav --output /w \
             --id-projet p1 --vram-gb 7.5 --all-stems"
        );
    }

    #[test]
    fn test_blank_project_id_is_not_passed() {
        let mut spec = spec();
        spec.id_projet = Some(ProjectId::Text(String::new()));
        let cmd = ToolCommand::for_job("t", &spec, Path::new("/w"));
        assert!(!cmd.args().iter().any(|a| a == "--id-projet"));
    }

    #[test]
    fn test_vram_hint_passed_verbatim() {
        let mut spec = spec();
        spec.vram_gb = Some("16".to_string());
        let cmd = ToolCommand::for_job("t", &spec, Path::new("/w"));
        let args: Vec<_> = cmd.args().iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(&args[4..], ["--vram-gb", "16"]);
    }
}
