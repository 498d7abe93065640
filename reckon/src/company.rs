pub use crate::schema::companies;
use crate::{essentials::*, Currency};

use chrono::{offset::Utc, DateTime};
use diesel::prelude::*;

/// Tenant root, owning bank accounts, processor accounts and stores
///
/// Companies are never removed from the table; `delete` stamps
/// `deleted_at` and every lookup excludes stamped rows.
#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[diesel(deserialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub plan: String,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Company {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        companies::table
            .find(id)
            .filter(companies::deleted_at.is_null())
            .select(Company::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Company", None))
    }

    pub fn find_by_name(conn: &mut Conn, name: &str) -> Result<Self> {
        companies::table
            .filter(companies::name.eq(name))
            .filter(companies::deleted_at.is_null())
            .select(Company::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Company", Some("name")))
    }

    pub fn all(conn: &mut Conn) -> Result<Vec<Self>> {
        Ok(companies::table
            .filter(companies::deleted_at.is_null())
            .order(companies::id.asc())
            .select(Company::as_select())
            .load(conn)?)
    }

    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        let now = Utc::now();
        diesel::update(&*self)
            .set(companies::deleted_at.eq(Some(now)))
            .execute(conn)?;
        self.deleted_at = Some(now);

        Ok(())
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = companies)]
pub struct NewCompany<'a> {
    pub name: &'a str,
    #[diesel(serialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub plan: &'a str,
}

impl<'a> NewCompany<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            currency: Currency::USD,
            plan: "standard",
        }
    }
}

impl NewCompany<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<Company> {
        Ok(diesel::insert_into(companies::table)
            .values(self)
            .returning(Company::as_returning())
            .get_result(conn)?)
    }
}
