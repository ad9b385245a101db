//! Session parameter validation against approved connection profiles.
//!
//! A session is acceptable only when one profile matches it in both
//! directions: every session value the profile also declares must agree, and
//! every value the profile declares (apart from its presentation fields) must
//! be supplied by the session.

use backend::{BackendError, Params, Result, TYPE_PARAM};
use tracing::debug;

use crate::config::ConnectionProfile;
use crate::TYPE_NAME;

/// Profile keys that only describe the profile and are never compared.
const METADATA_KEYS: &[&str] = &["label", "advanced"];

/// Check that `params` is an allowed instantiation of this backend type.
///
/// Profiles are examined in order and the first full match wins.
pub fn check_params(params: &Params, profiles: &[ConnectionProfile]) -> Result<()> {
    if params.get(TYPE_PARAM).map(String::as_str) != Some(TYPE_NAME) {
        return Err(BackendError::NotValid);
    }

    let matched = profiles
        .iter()
        .filter(|p| p.type_name() == Some(TYPE_NAME))
        .any(|p| forward_match(params, p) && reverse_match(params, p));

    if matched {
        Ok(())
    } else {
        Err(BackendError::NotValid)
    }
}

/// Every supplied value the profile also defines must be equal.
fn forward_match(params: &Params, profile: &ConnectionProfile) -> bool {
    for (param, value) in params {
        if let Some(expected) = profile.get(param) {
            if expected != value {
                debug!(
                    "[{}] Mismatch value {}, passed: {:?}, config: {:?}",
                    TYPE_NAME, param, value, expected
                );
                return false;
            }
        }
    }
    true
}

/// Every profile value, except metadata, must be supplied with the same value.
fn reverse_match(params: &Params, profile: &ConnectionProfile) -> bool {
    for (param, expected) in profile.params() {
        if METADATA_KEYS.contains(&param.as_str()) {
            continue;
        }
        let value = params.get(param);
        if value != Some(expected) {
            debug!(
                "[{}] Missing value {}, passed: {:?}, config: {:?}",
                TYPE_NAME, param, value, expected
            );
            return false;
        }
    }
    true
}
