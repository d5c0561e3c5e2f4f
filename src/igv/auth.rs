//! Credential fetching for remote (e.g. `gs://`) alignment files.
//!
//! Genome viewers load remote BAMs with a short-lived bearer token. The
//! token source is injected as a [`TokenProvider`] capability so descriptor
//! assembly never shells out directly, and so tests can substitute a fixed
//! token. The stock implementation, [`CommandTokenProvider`], runs an
//! external credential CLI synchronously, the way an analyst would at a
//! terminal.

use std::process::Command;

use log::{debug, warn};

use crate::error::ReviewError;

/// The stock credential command, for Google Cloud Storage hosted BAMs.
pub const DEFAULT_TOKEN_COMMAND: &str =
    "gcloud auth application-default print-access-token";

/// A source of short-lived access tokens for viewer track descriptors.
pub trait TokenProvider {
    fn fetch_token(&self) -> Result<String, ReviewError>;
}

/// What to do when the credential command fails or produces no token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenPolicy {
    /// Fail the track build with a descriptive error.
    #[default]
    Propagate,
    /// Proceed with an empty token, logging a warning. The viewer will
    /// surface the authorization failure itself when it loads the track.
    AllowEmpty,
}

/// Fetch a token by running an external command and reading its standard
/// output, optionally after an environment-setup command.
#[derive(Clone, Debug)]
pub struct CommandTokenProvider {
    access_token_command: String,
    set_env_command: Option<String>,
    policy: TokenPolicy,
}

impl Default for CommandTokenProvider {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_COMMAND)
    }
}

impl CommandTokenProvider {
    pub fn new(access_token_command: impl Into<String>) -> Self {
        Self {
            access_token_command: access_token_command.into(),
            set_env_command: None,
            policy: TokenPolicy::default(),
        }
    }

    /// Run `set_env_command` in the same shell before the token command,
    /// e.g. to select a cloud project or account.
    pub fn with_setup(mut self, set_env_command: impl Into<String>) -> Self {
        self.set_env_command = Some(set_env_command.into());
        self
    }

    pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn run(&self) -> Result<std::process::Output, ReviewError> {
        debug!("fetching access token via '{}'", self.access_token_command);
        let output = if let Some(setup) = &self.set_env_command {
            Command::new("bash")
                .arg("-c")
                .arg(format!("{}; {}", setup, self.access_token_command))
                .output()?
        } else {
            let mut parts = self.access_token_command.split_whitespace();
            let program = parts.next().ok_or_else(|| {
                ReviewError::TokenCommandFailed {
                    command: self.access_token_command.clone(),
                    status: "no command configured".to_string(),
                    stderr: String::new(),
                }
            })?;
            Command::new(program).args(parts).output()?
        };
        Ok(output)
    }
}

impl TokenProvider for CommandTokenProvider {
    fn fetch_token(&self) -> Result<String, ReviewError> {
        let output = self.run()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            match self.policy {
                TokenPolicy::Propagate => {
                    return Err(ReviewError::TokenCommandFailed {
                        command: self.access_token_command.clone(),
                        status: output.status.to_string(),
                        stderr,
                    })
                }
                TokenPolicy::AllowEmpty => {
                    warn!(
                        "token command '{}' failed ({}); continuing with an empty token",
                        self.access_token_command, output.status
                    );
                    return Ok(String::new());
                }
            }
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() && self.policy == TokenPolicy::Propagate {
            return Err(ReviewError::EmptyToken(self.access_token_command.clone()));
        }
        Ok(token)
    }
}

/// A fixed token, for tests and for sessions over local files where no
/// credential is needed.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenProvider(String);

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticTokenProvider {
    fn fetch_token(&self) -> Result<String, ReviewError> {
        Ok(self.0.clone())
    }
}
