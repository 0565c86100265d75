use crate::metadata::error::DatabaseError;
use crate::types::metadata::org_superset::OrgSuperset;

pub trait OrgSupersetService {
    fn get_by_org(&self, org_id: &str) -> Result<Option<OrgSuperset>, DatabaseError>;
    /// Creates or updates the org's row; the flag is `true` when a row was created.
    fn upsert(
        &self,
        org_id: &str,
        superset_version: &str,
    ) -> Result<(OrgSuperset, bool), DatabaseError>;
}
