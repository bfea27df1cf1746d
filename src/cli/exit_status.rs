use std::process::ExitCode;

/// Exit status of a generation run.
///
/// Usage errors are reported by clap, which exits with status 2.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every file was generated.
    Success,
    /// The run was aborted by an error.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(1),
        }
    }
}
