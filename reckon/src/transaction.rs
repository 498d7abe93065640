pub use crate::schema::transactions;
use crate::{essentials::*, store::Store, Amount, Currency, Decimal};

use chrono::{offset::Utc, DateTime};
use diesel::dsl::count_star;
use diesel::prelude::*;

mod kind;
pub use kind::Kind;

mod status;
pub use status::Status;

/// A financial event on a store
///
/// Rows are never updated or deleted once written; corrections are new
/// adjustment rows superseding the old ones.
#[derive(Debug, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = transactions)]
#[diesel(belongs_to(Store, foreign_key = store_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Transaction {
    pub id: i64,
    pub store_id: i64,
    #[diesel(deserialize_as = crate::db::Decimal)]
    pub amount: Decimal,
    #[diesel(deserialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub kind: Kind,
    pub status: Status,
    pub details: String,
    pub is_adjustment: bool,
    pub adjustment_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn amount(&self) -> Amount {
        Amount(self.amount, self.currency)
    }

    /// The stored magnitude with the sign its kind implies
    pub fn signed_amount(&self) -> Decimal {
        if self.kind.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        transactions::table
            .find(id)
            .select(Transaction::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Transaction", None))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = transactions)]
pub struct NewTransaction<'a> {
    pub store_id: i64,
    #[diesel(serialize_as = crate::db::Decimal)]
    pub amount: Decimal,
    #[diesel(serialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub kind: Kind,
    pub status: Status,
    pub details: &'a str,
    pub is_adjustment: bool,
    pub adjustment_type: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl NewTransaction<'_> {
    pub fn new(store: &Store) -> Self {
        Self {
            store_id: store.id,
            amount: Decimal::ZERO,
            currency: store.currency,
            kind: Kind::default(),
            status: Status::Approved,
            details: "",
            is_adjustment: false,
            adjustment_type: None,
            created_at: Utc::now(),
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<Transaction> {
        Ok(diesel::insert_into(transactions::table)
            .values(self)
            .returning(Transaction::as_returning())
            .get_result(conn)?)
    }
}

#[derive(Default)]
pub struct QueryTransaction {
    pub store_id: Option<i64>,
    pub kind: Option<Kind>,
    pub status: Option<Status>,
    pub is_adjustment: Option<bool>,
    pub count: Option<i64>,
}

impl QueryTransaction {
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<Transaction>> {
        let Some(store_id) = self.store_id else {
            return Err(Error::Invalid("Missing store_id".to_owned()));
        };

        let mut query = transactions::table
            .into_boxed()
            .filter(transactions::store_id.eq(store_id))
            .order(transactions::id.asc());

        if let Some(kind) = self.kind {
            query = query.filter(transactions::kind.eq(kind));
        }
        if let Some(status) = self.status {
            query = query.filter(transactions::status.eq(status));
        }
        if let Some(is_adjustment) = self.is_adjustment {
            query = query.filter(transactions::is_adjustment.eq(is_adjustment));
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query.select(Transaction::as_select()).load(conn)?)
    }
}

/// Approved totals and row counts for one store, split by side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreTotals {
    pub credits: Decimal,
    pub credit_count: i64,
    pub debits: Decimal,
    pub debit_count: i64,
}

impl StoreTotals {
    pub fn balance(&self) -> Decimal {
        self.credits - self.debits
    }
}

pub fn approved_store_totals(conn: &mut Conn, store_id: i64) -> Result<StoreTotals> {
    let (credits, credit_count) = side_totals(conn, store_id, &Kind::CREDIT)?;
    let (debits, debit_count) = side_totals(conn, store_id, &Kind::DEBIT)?;

    Ok(StoreTotals {
        credits,
        credit_count,
        debits,
        debit_count,
    })
}

fn side_totals(conn: &mut Conn, store_id: i64, kinds: &[Kind]) -> Result<(Decimal, i64)> {
    let (total, count) = transactions::table
        .filter(transactions::store_id.eq(store_id))
        .filter(transactions::status.eq(Status::Approved))
        .filter(transactions::kind.eq_any(kinds.iter().copied()))
        .select((db::total(transactions::amount), count_star()))
        .first::<(db::Decimal, i64)>(conn)?;

    Ok((total.into(), count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn create_with_defaults() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let store = test::store(conn, &company, "Main Street")?;

        let transaction = NewTransaction {
            amount: Decimal::new(12_34, 2),
            details: "stationery",
            ..NewTransaction::new(&store)
        }
        .save(conn)?;

        assert_eq!(Kind::Expense, transaction.kind);
        assert_eq!(Status::Approved, transaction.status);
        assert_eq!(store.currency, transaction.currency);
        assert_eq!(Decimal::new(-12_34, 2), transaction.signed_amount());
        assert!(!transaction.is_adjustment);

        assert_eq!(
            transaction.id,
            Transaction::find(conn, transaction.id)?.id
        );

        Ok(())
    }

    #[test]
    fn query_filters() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let store = test::store(conn, &company, "Main Street")?;
        let other = test::store(conn, &company, "Outlet")?;

        test::transaction(conn, &store, Kind::Income, Decimal::new(200, 0))?;
        test::transaction(conn, &store, Kind::Expense, Decimal::new(50, 0))?;
        test::transaction(conn, &other, Kind::Income, Decimal::new(10, 0))?;
        NewTransaction {
            status: Status::Pending,
            ..NewTransaction::new(&store)
        }
        .save(conn)?;

        assert!(QueryTransaction::default().run(conn).is_err());

        let all = QueryTransaction {
            store_id: Some(store.id),
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(3, all.len());

        let income = QueryTransaction {
            store_id: Some(store.id),
            kind: Some(Kind::Income),
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(1, income.len());

        let pending = QueryTransaction {
            store_id: Some(store.id),
            status: Some(Status::Pending),
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(1, pending.len());

        Ok(())
    }

    #[test]
    fn totals_ignore_unapproved_rows() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let store = test::store(conn, &company, "Main Street")?;

        test::transaction(conn, &store, Kind::Income, Decimal::new(200, 0))?;
        test::transaction(conn, &store, Kind::Sales, Decimal::new(100, 0))?;
        test::transaction(conn, &store, Kind::Expense, Decimal::new(50, 0))?;
        for status in [Status::Pending, Status::Failed, Status::Cancelled] {
            NewTransaction {
                amount: Decimal::new(1_000, 0),
                kind: Kind::Income,
                status,
                ..NewTransaction::new(&store)
            }
            .save(conn)?;
        }

        let totals = approved_store_totals(conn, store.id)?;
        assert_eq!(Decimal::new(300, 0), totals.credits);
        assert_eq!(2, totals.credit_count);
        assert_eq!(Decimal::new(50, 0), totals.debits);
        assert_eq!(1, totals.debit_count);
        assert_eq!(Decimal::new(250, 0), totals.balance());

        Ok(())
    }

    #[test]
    fn totals_for_empty_store_are_zero() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let store = test::store(conn, &company, "Main Street")?;

        let totals = approved_store_totals(conn, store.id)?;
        assert_eq!(Decimal::ZERO, totals.balance());
        assert_eq!(0, totals.credit_count);
        assert_eq!(0, totals.debit_count);

        Ok(())
    }
}
