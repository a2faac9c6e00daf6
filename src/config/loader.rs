use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::poll::PollPolicy;

/// Runtime tuning file (`cache-cleaner.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeFile {
    #[serde(default)]
    pub poll: Option<PollPolicy>,
}

/// Read the runtime config file into a string
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate the poll policy from TOML
pub fn parse_and_validate_policy(contents: &str) -> Result<PollPolicy, String> {
    let file = toml::from_str::<RuntimeFile>(contents)
        .map_err(|e| format!("Failed to parse runtime config: {}", e))?;

    let policy = file.poll.unwrap_or_default();
    validate_policy(&policy)?;
    Ok(policy)
}

fn validate_policy(policy: &PollPolicy) -> Result<(), String> {
    if policy.timeout_seconds == 0 {
        return Err("poll.timeout_seconds must be greater than zero".to_string());
    }
    if policy.settle_delay_ms > policy.timeout_seconds.saturating_mul(1000) {
        return Err("poll.settle_delay_ms must not exceed poll.timeout_seconds".to_string());
    }
    Ok(())
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            path = %path.display(),
            error = %error,
            "Failed to read runtime config file"
        );
    }
}

/// Load the poll policy from `path`, falling back to defaults on any problem.
pub fn load_poll_policy(path: Option<&Path>) -> PollPolicy {
    let Some(path) = path else {
        return PollPolicy::default();
    };

    let contents = match read_config_file(path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(path, &e);
            return PollPolicy::default();
        }
    };

    match parse_and_validate_policy(&contents) {
        Ok(policy) => {
            tracing::debug!(path = %path.display(), "Loaded poll policy");
            policy
        }
        Err(e) => {
            tracing::warn!("{}. Using default poll policy.", e);
            PollPolicy::default()
        }
    }
}
