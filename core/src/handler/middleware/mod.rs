pub mod org_user;
pub mod permission;

use crate::PreferencesApiError;

pub const UNAUTHORIZED_DETAIL: &str = "Unauthorized";
pub const PERMISSION_DENIED_DETAIL: &str = "unauthorized";

pub(crate) fn unauthenticated() -> PreferencesApiError {
    PreferencesApiError::Unauthorized(UNAUTHORIZED_DETAIL.to_string())
}

pub(crate) fn permission_denied() -> PreferencesApiError {
    PreferencesApiError::PermissionDenied(PERMISSION_DENIED_DETAIL.to_string())
}
