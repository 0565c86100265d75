pub mod middleware;
pub mod org_preferences;

/// Wraps the `Ok` value of a `PreferencesResult` in the `{"success": true, "res": ...}`
/// envelope and turns it into a `200` response.
///
/// # Example
/// ```ignore
/// ok_envelope!(api.get_preferences(&actor))
/// // expands to:
/// // Ok(HttpResponse::Ok().json(ApiResponse::ok(api.get_preferences(&actor)?)))
/// ```
#[macro_export]
macro_rules! ok_envelope {
    ($expr:expr) => {
        Ok(actix_web::HttpResponse::Ok().json($crate::types::ApiResponse::ok($expr?)))
    };
}
