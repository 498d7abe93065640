pub use crate::schema::stores;
use crate::{company::Company, essentials::*, result::ParseTypeError, Currency};

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    prelude::*,
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum StoreStatus {
    #[default]
    Active,
    Inactive,
}

use StoreStatus::*;

impl Display for StoreStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Active => f.write_str("Active"),
            Inactive => f.write_str("Inactive"),
        }
    }
}

impl FromStr for StoreStatus {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "active" => Ok(Active),
            "inactive" => Ok(Inactive),
            _ => Err(ParseTypeError("StoreStatus", value.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for StoreStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for StoreStatus {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?.parse()?)
    }
}

#[derive(Debug, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = stores)]
#[diesel(belongs_to(Company, foreign_key = company_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Store {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    #[diesel(deserialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub status: StoreStatus,
}

impl Store {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        stores::table
            .find(id)
            .select(Store::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Store", None))
    }

    pub fn find_by_name(conn: &mut Conn, company: &Company, name: &str) -> Result<Self> {
        stores::table
            .filter(stores::company_id.eq(company.id))
            .filter(stores::name.eq(name))
            .select(Store::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Store", Some("name")))
    }

    pub fn for_company(conn: &mut Conn, company_id: i64) -> Result<Vec<Self>> {
        Ok(stores::table
            .filter(stores::company_id.eq(company_id))
            .order(stores::id.asc())
            .select(Store::as_select())
            .load(conn)?)
    }

    /// The oldest store, the target of manual adjustments
    pub fn first_for_company(conn: &mut Conn, company_id: i64) -> Result<Option<Self>> {
        Ok(stores::table
            .filter(stores::company_id.eq(company_id))
            .order(stores::id.asc())
            .select(Store::as_select())
            .first(conn)
            .optional()?)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = stores)]
pub struct NewStore<'a> {
    pub company_id: i64,
    pub name: &'a str,
    #[diesel(serialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub status: StoreStatus,
}

impl<'a> NewStore<'a> {
    pub fn new(company: &Company, name: &'a str) -> Self {
        Self {
            company_id: company.id,
            name,
            currency: company.currency,
            status: StoreStatus::Active,
        }
    }
}

impl NewStore<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<Store> {
        Ok(diesel::insert_into(stores::table)
            .values(self)
            .returning(Store::as_returning())
            .get_result(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn create_then_find_by_name() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;

        let store = test::store(conn, &company, "Main Street")?;

        assert_eq!(store.id, Store::find_by_name(conn, &company, "Main Street")?.id);
        assert_eq!(StoreStatus::Active, Store::find(conn, store.id)?.status);

        Ok(())
    }

    #[test]
    fn first_for_company_is_oldest() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let other = test::company(conn, "Globex")?;

        assert!(Store::first_for_company(conn, company.id)?.is_none());

        let first = test::store(conn, &company, "Main Street")?;
        test::store(conn, &company, "Outlet")?;
        test::store(conn, &other, "Globex Plaza")?;

        assert_eq!(
            first.id,
            Store::first_for_company(conn, company.id)?.unwrap().id
        );

        Ok(())
    }
}
