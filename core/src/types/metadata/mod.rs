pub mod org;
pub mod org_plan;
pub mod org_preferences;
pub mod org_superset;
pub mod org_user;
pub mod services;
