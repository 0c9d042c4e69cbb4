// Error types shared by the commands.
//
// Every variant's Display text is the message the user sees, so the
// templates below are written for a terminal rather than for a log.

use std::path::PathBuf;
use thiserror::Error;

use crate::BINARY_NAME;

/// Problems with the effective configuration or the persisted user config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "\n\n    Welcome to Exercism!\n\n    To get started, you need to configure the tool with your API token.\n    Find your token at\n\n        {settings_url}\n\n    Then run the configure command:\n\n        {bin} configure --token=YOUR_TOKEN\n",
        bin = BINARY_NAME
    )]
    MissingToken { settings_url: String },

    #[error(
        "\n\n    Please re-run the configure command to define where\n    to download the exercises.\n\n        {bin} configure\n",
        bin = BINARY_NAME
    )]
    MissingWorkspace,

    #[error("could not determine a configuration directory; set EXERCISM_CONFIG_HOME")]
    NoConfigDir,

    #[error("failed to read user config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write user config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("user config {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while mapping input paths onto a single solution directory.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("\n\n    The file you are trying to submit cannot be found.\n\n        {}\n", path.display())]
    NotFound { path: PathBuf },

    #[error(
        "\n\n    You are submitting a directory, which is not currently supported.\n\n        {}\n\n    Please change into the directory and provide the path to the file(s) you wish to submit\n\n        {bin} submit FILENAME\n",
        path.display(),
        bin = BINARY_NAME
    )]
    IsDirectory { path: PathBuf },

    #[error(
        "\n\n    The file you are trying to submit is not inside your workspace.\n\n        {}\n\n    Your workspace is\n\n        {}\n",
        path.display(),
        workspace.display()
    )]
    NotInWorkspace { path: PathBuf, workspace: PathBuf },

    #[error(
        "\n\n    The exercise you are submitting doesn't have the necessary metadata.\n    Please see https://exercism.org/docs/using/solving-exercises/working-locally\n    for instructions on how to fix it.\n"
    )]
    MissingMetadata { path: PathBuf },

    #[error(
        "\n\n    You are submitting files belonging to different solutions.\n    Please submit the files for one solution at a time.\n"
    )]
    DifferentSolutions { expected: PathBuf, found: PathBuf },

    #[error("solution metadata {} is malformed: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed with {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("the configured token cannot be used in an HTTP header")]
    InvalidToken,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Top-level error returned by the commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(
        "\n\n    The solution you are submitting is not connected to your account.\n    Please re-download the exercise to make sure it has the data it needs.\n\n        {bin} download --exercise={exercise} --track={track}\n",
        bin = BINARY_NAME
    )]
    NotRequester { exercise: String, track: String },

    #[error("\n\n    No files found to submit.\n")]
    NoFiles,

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl CliError {
    /// Map error to a process exit code.
    ///
    /// Codes follow sysexits.h:
    /// - 65: bad input (paths, metadata, nothing to submit)
    /// - 69: API unavailable or rejected the request
    /// - 74: I/O error
    /// - 77: solution belongs to someone else
    /// - 78: configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 78,
            CliError::Workspace(WorkspaceError::Io { .. }) => 74,
            CliError::Workspace(_) | CliError::NoFiles => 65,
            CliError::NotRequester { .. } => 77,
            CliError::Io { .. } | CliError::Output(_) => 74,
            CliError::Api(_) => 69,
        }
    }
}
