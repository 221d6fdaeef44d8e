//! Shared HTTP helpers: status mapping and bounded retry.

use std::time::Duration;

use parasync_core::SourceError;

/// Map a `ureq` failure onto the source error taxonomy.
///
/// `what` names the resource for `NotFound` messages (e.g. `project 4242`).
pub(crate) fn classify(err: ureq::Error, what: &str) -> SourceError {
    match err {
        ureq::Error::Status(status, resp) => {
            let message = resp.into_string().unwrap_or_default().trim().to_owned();
            match status {
                401 | 403 => SourceError::Auth { status, message },
                404 => SourceError::NotFound {
                    what: what.to_owned(),
                },
                _ => SourceError::Api { status, message },
            }
        }
        ureq::Error::Transport(t) => SourceError::Network(t.to_string()),
    }
}

/// Run `op`, retrying transient failures up to `max_retries` extra times.
///
/// Sleeps `delay * attempt` between attempts.
pub(crate) fn with_retry<T>(
    what: &str,
    max_retries: u32,
    delay: Duration,
    mut op: impl FnMut() -> Result<T, SourceError>,
) -> Result<T, SourceError> {
    let mut attempt = 0u32;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    "{what}: {err}; retrying ({attempt}/{max_retries})"
                );
                std::thread::sleep(delay * attempt);
            }
            Err(err) => return Err(err),
        }
    }
}
