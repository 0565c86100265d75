use crate::metadata::error::DatabaseError;
use crate::types::metadata::org_preferences::{
    NewOrgPreferencesDTO, OrgPreferences, OrgPreferencesUpdate,
};

pub trait OrgPreferencesService {
    fn get_by_org(&self, org_id: &str) -> Result<Option<OrgPreferences>, DatabaseError>;
    fn create(
        &self,
        org_id: &str,
        prefs: NewOrgPreferencesDTO,
    ) -> Result<OrgPreferences, DatabaseError>;
    fn update(
        &self,
        org_id: &str,
        update: OrgPreferencesUpdate,
    ) -> Result<OrgPreferences, DatabaseError>;
}
