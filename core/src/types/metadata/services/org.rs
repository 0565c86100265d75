use crate::metadata::error::DatabaseError;
use crate::types::metadata::org::{NewOrgDTO, Org};

pub trait OrgService {
    fn get_by_id(&self, id: &str) -> Result<Option<Org>, DatabaseError>;
    fn get_by_slug(&self, slug: &str) -> Result<Option<Org>, DatabaseError>;
    fn create(&self, org: NewOrgDTO) -> Result<Org, DatabaseError>;
}
