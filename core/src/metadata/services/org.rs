use crate::metadata::error::DatabaseError;
use crate::metadata::models::org::{DbNewOrg, DbOrg};
use crate::metadata::pool::DbPool;
use crate::metadata::schema::orgs;
use crate::metadata::utils::now_timestamp;
use crate::types::metadata::org::{NewOrgDTO, Org};
use crate::types::metadata::services::org::OrgService;
use diesel::ExpressionMethods;
use diesel::OptionalExtension;
use diesel::{QueryDsl, RunQueryDsl};
use uuid::Uuid;

pub struct OrgServiceImpl {
    db_pool: DbPool,
}

impl OrgServiceImpl {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

impl OrgService for OrgServiceImpl {
    fn get_by_id(&self, id: &str) -> Result<Option<Org>, DatabaseError> {
        let mut conn = self.db_pool.get()?;
        let org = DbOrg::all()
            .filter(orgs::id.eq(id))
            .first::<DbOrg>(&mut conn)
            .optional()?;

        Ok(org.map(Org::from))
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<Org>, DatabaseError> {
        let mut conn = self.db_pool.get()?;
        let org = DbOrg::all()
            .filter(orgs::slug.eq(slug))
            .first::<DbOrg>(&mut conn)
            .optional()?;

        Ok(org.map(Org::from))
    }

    fn create(&self, org: NewOrgDTO) -> Result<Org, DatabaseError> {
        if org.slug.trim().is_empty() {
            return Err(DatabaseError::InvalidArgument(
                "Org slug must not be empty".to_string(),
            ));
        }

        let mut conn = self.db_pool.get()?;
        let org_id = Uuid::new_v4().to_string();

        let db_new_org = DbNewOrg {
            id: org_id.clone(),
            name: org.name,
            slug: org.slug,
            r#type: org.r#type,
            created_at: now_timestamp(),
        };

        diesel::insert_into(orgs::table)
            .values(&db_new_org)
            .execute(&mut conn)
            .map_err(DatabaseError::from_insert)?;

        // SQLite gives nothing back from the insert, so read the row again
        let inserted = DbOrg::all()
            .filter(orgs::id.eq(org_id))
            .first::<DbOrg>(&mut conn)?;

        Ok(inserted.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::test_utils::setup_test_database;

    #[test]
    fn test_create_and_get_by_slug() {
        let db_pool = setup_test_database();
        let service = OrgServiceImpl::new(db_pool);

        let created = service
            .create(NewOrgDTO {
                name: "Acme NGO".to_string(),
                slug: "acme-ngo".to_string(),
                r#type: "client".to_string(),
            })
            .unwrap();

        let fetched = service.get_by_slug("acme-ngo").unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Acme NGO");
        assert_eq!(fetched.r#type, "client");

        let by_id = service.get_by_id(&created.id).unwrap().unwrap();
        assert_eq!(by_id.slug, "acme-ngo");
    }

    #[test]
    fn test_get_missing_org() {
        let db_pool = setup_test_database();
        let service = OrgServiceImpl::new(db_pool);

        assert!(service.get_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_slug_is_unique_violation() {
        let db_pool = setup_test_database();
        let service = OrgServiceImpl::new(db_pool);
        let dto = NewOrgDTO {
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            r#type: "client".to_string(),
        };

        service.create(dto.clone()).unwrap();
        let result = service.create(dto);
        assert!(matches!(result, Err(DatabaseError::UniqueViolation(_))));
    }
}
