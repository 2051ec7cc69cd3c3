//! Registry of known platform limitations tolerated by test suites.
//!
//! Some behaviors are broken or restricted on the remote platform itself
//! and will stay that way until fixed upstream. Rather than letting every
//! suite fail on them, the cases are registered here and suites route the
//! affected assertions through [`tolerate`]. The `QUIET_KNOWN_BUGS`
//! environment variable downgrades the log noise for registered cases.

use std::env;

use crate::repository::errors::RepositoryResult;

#[derive(Clone, Copy, Debug)]
pub struct KnownBug {
    pub key: &'static str,
    pub description: &'static str,
}

/// Cases expected to fail until fixed upstream.
pub const KNOWN_BUGS: &[KnownBug] = &[
    KnownBug {
        key: "offset-above-2000",
        description: "the platform rejects OFFSET values above 2000",
    },
    KnownBug {
        key: "count-with-order-by",
        description: "bare COUNT() combined with ORDER BY is rejected remotely",
    },
    KnownBug {
        key: "describe-picklist-defaults",
        description: "some orgs omit default picklist values from describe payloads",
    },
];

pub fn find(key: &str) -> Option<&'static KnownBug> {
    KNOWN_BUGS.iter().find(|bug| bug.key == key)
}

pub fn is_known(key: &str) -> bool {
    find(key).is_some()
}

/// Whether registered failures should be logged quietly.
pub fn quiet() -> bool {
    env::var("QUIET_KNOWN_BUGS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

/// Run a fallible case through the registry. A failure with a registered
/// key is logged and swallowed (`Ok(None)`); anything else propagates.
pub fn tolerate<T>(key: &str, result: RepositoryResult<T>) -> RepositoryResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match find(key) {
            Some(bug) => {
                if quiet() {
                    log::debug!("known bug {key}: {err} ({})", bug.description);
                } else {
                    log::warn!("known bug {key}: {err} ({})", bug.description);
                }
                Ok(None)
            }
            None => Err(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::errors::RepositoryError;

    #[test]
    fn registered_failures_are_swallowed() {
        let result: RepositoryResult<()> = Err(RepositoryError::Api {
            code: "NUMBER_OUTSIDE_VALID_RANGE".to_string(),
            message: "maximum OFFSET is 2000".to_string(),
        });
        assert!(matches!(tolerate("offset-above-2000", result), Ok(None)));
    }

    #[test]
    fn unregistered_failures_propagate() {
        let result: RepositoryResult<()> = Err(RepositoryError::NotFound);
        assert!(tolerate("no-such-key", result).is_err());
    }

    #[test]
    fn successes_pass_through() {
        assert!(matches!(
            tolerate("offset-above-2000", Ok(42)),
            Ok(Some(42))
        ));
    }
}
