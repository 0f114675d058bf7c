use crate::config::types::{CrawlerSettings, OutputSettings, Settings};
use crate::ConfigError;
use std::path::Path;
use tokio::sync::Semaphore;

/// Validates every value present in a settings file
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    validate_crawler_settings(&settings.crawler)?;
    validate_output_settings(&settings.output)?;
    Ok(())
}

/// Validates the `[crawler]` table
fn validate_crawler_settings(settings: &CrawlerSettings) -> Result<(), ConfigError> {
    if let Some(max_concurrent) = settings.max_concurrent {
        validate_max_concurrent(max_concurrent)?;
    }

    if let Some(percent) = settings.memory_threshold_percent {
        validate_memory_threshold(percent)?;
    }

    if let Some(interval) = settings.check_interval_ms {
        validate_check_interval(interval)?;
    }

    if let Some(timeout) = settings.page_timeout_secs {
        validate_page_timeout(timeout)?;
    }

    if let Some(user_agent) = &settings.user_agent {
        validate_user_agent(user_agent)?;
    }

    Ok(())
}

/// Validates the `[output]` table
fn validate_output_settings(settings: &OutputSettings) -> Result<(), ConfigError> {
    if let Some(path) = &settings.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the session ceiling and converts it to a permit count
///
/// # Returns
///
/// * `Ok(usize)` - The value, which is at least 1
/// * `Err(ConfigError::Validation)` - The value is zero, negative, or above
///   the semaphore permit limit
pub fn validate_max_concurrent(value: i64) -> Result<usize, ConfigError> {
    if value < 1 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent must be >= 1, got {}",
            value
        )));
    }

    match usize::try_from(value) {
        Ok(permits) if permits <= Semaphore::MAX_PERMITS => Ok(permits),
        _ => Err(ConfigError::Validation(format!(
            "max-concurrent must be <= {}, got {}",
            Semaphore::MAX_PERMITS,
            value
        ))),
    }
}

pub(crate) fn validate_memory_threshold(percent: f64) -> Result<(), ConfigError> {
    if !(percent > 0.0 && percent <= 100.0) {
        return Err(ConfigError::Validation(format!(
            "memory-threshold-percent must be in (0, 100], got {}",
            percent
        )));
    }
    Ok(())
}

pub(crate) fn validate_check_interval(interval_ms: u64) -> Result<(), ConfigError> {
    if interval_ms < 1 {
        return Err(ConfigError::Validation(
            "check-interval-ms must be >= 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_page_timeout(timeout_secs: u64) -> Result<(), ConfigError> {
    if timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "page-timeout-secs must be >= 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(char::is_control) {
        return Err(ConfigError::Validation(format!(
            "user-agent contains control characters: {:?}",
            user_agent
        )));
    }

    Ok(())
}

/// Checks that the digest can be written to `path` before crawling starts
///
/// The file itself is not created. The nearest existing ancestor must be a
/// writable directory; missing intermediate directories are created later by
/// the digest writer.
///
/// # Returns
///
/// * `Ok(())` - The path looks writable
/// * `Err(ConfigError::OutputPath)` - The path can't hold a digest file
pub fn validate_output_path(path: &Path) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::OutputPath {
        path: path.to_path_buf(),
        reason,
    };

    if path.as_os_str().is_empty() {
        return Err(invalid("path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(invalid("path is a directory".to_string()));
    }

    if let Ok(metadata) = std::fs::metadata(path) {
        if metadata.permissions().readonly() {
            return Err(invalid("file is read-only".to_string()));
        }
    }

    let mut ancestor = path.parent();
    while let Some(dir) = ancestor {
        // A bare file name has an empty parent: the current directory
        if dir.as_os_str().is_empty() {
            break;
        }

        if dir.exists() {
            if !dir.is_dir() {
                return Err(invalid(format!("{} is not a directory", dir.display())));
            }

            let metadata = std::fs::metadata(dir)
                .map_err(|e| invalid(format!("cannot inspect {}: {}", dir.display(), e)))?;
            if metadata.permissions().readonly() {
                return Err(invalid(format!("directory {} is read-only", dir.display())));
            }
            break;
        }

        ancestor = dir.parent();
    }

    Ok(())
}
