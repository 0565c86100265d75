use crate::metadata::error::DatabaseError;
use crate::metadata::models::org_superset::{DbNewOrgSuperset, DbOrgSuperset};
use crate::metadata::pool::DbPool;
use crate::metadata::schema::org_supersets;
use crate::metadata::utils::now_timestamp;
use crate::types::metadata::org_superset::OrgSuperset;
use crate::types::metadata::services::org_superset::OrgSupersetService;
use diesel::Connection;
use diesel::ExpressionMethods;
use diesel::OptionalExtension;
use diesel::RunQueryDsl;
use uuid::Uuid;

pub struct OrgSupersetServiceImpl {
    db_pool: DbPool,
}

impl OrgSupersetServiceImpl {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

impl OrgSupersetService for OrgSupersetServiceImpl {
    fn get_by_org(&self, org_id: &str) -> Result<Option<OrgSuperset>, DatabaseError> {
        let mut conn = self.db_pool.get()?;
        let row = DbOrgSuperset::by_org(org_id)
            .first::<DbOrgSuperset>(&mut conn)
            .optional()?;

        Ok(row.map(OrgSuperset::from))
    }

    fn upsert(
        &self,
        org_id: &str,
        superset_version: &str,
    ) -> Result<(OrgSuperset, bool), DatabaseError> {
        let mut conn = self.db_pool.get()?;

        conn.transaction::<(OrgSuperset, bool), DatabaseError, _>(|conn| {
            let now = now_timestamp();

            // Skips an existing row so a concurrent first write falls through to the update
            let inserted = diesel::insert_into(org_supersets::table)
                .values(&DbNewOrgSuperset {
                    id: Uuid::new_v4().to_string(),
                    org_id: org_id.to_string(),
                    superset_version: superset_version.to_string(),
                    created_at: now.clone(),
                    updated_at: now.clone(),
                })
                .on_conflict(org_supersets::org_id)
                .do_nothing()
                .execute(conn)?;

            let created = inserted == 1;
            if !created {
                diesel::update(org_supersets::table)
                    .filter(org_supersets::org_id.eq(org_id))
                    .set((
                        org_supersets::superset_version.eq(superset_version),
                        org_supersets::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }

            let row = DbOrgSuperset::by_org(org_id).first::<DbOrgSuperset>(conn)?;
            Ok((row.into(), created))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::test_utils::{seed_org, setup_test_database};

    #[test]
    fn test_upsert_creates_then_updates() {
        let db_pool = setup_test_database();
        let org = seed_org(&db_pool, "acme");
        let service = OrgSupersetServiceImpl::new(db_pool);

        let (first, created) = service.upsert(&org.id, "1.0").unwrap();
        assert!(created);
        assert_eq!(first.superset_version, "1.0");

        let (second, created) = service.upsert(&org.id, "2.0").unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);

        let stored = service.get_by_org(&org.id).unwrap().unwrap();
        assert_eq!(stored.superset_version, "2.0");
    }

    #[test]
    fn test_rows_are_per_org() {
        let db_pool = setup_test_database();
        let acme = seed_org(&db_pool, "acme");
        let other = seed_org(&db_pool, "other");
        let service = OrgSupersetServiceImpl::new(db_pool);

        service.upsert(&acme.id, "3.1").unwrap();
        assert!(service.get_by_org(&other.id).unwrap().is_none());
    }

    #[test]
    fn test_upsert_over_row_written_by_another_request() {
        let db_pool = setup_test_database();
        let org = seed_org(&db_pool, "acme");

        // Row lands between this request's start and its write
        let now = now_timestamp();
        diesel::insert_into(org_supersets::table)
            .values(&DbNewOrgSuperset {
                id: Uuid::new_v4().to_string(),
                org_id: org.id.clone(),
                superset_version: "1.0".to_string(),
                created_at: now.clone(),
                updated_at: now,
            })
            .execute(&mut db_pool.get().unwrap())
            .unwrap();

        let service = OrgSupersetServiceImpl::new(db_pool);
        let (row, created) = service.upsert(&org.id, "2.0").unwrap();
        assert!(!created);
        assert_eq!(row.superset_version, "2.0");
    }
}
