pub use crate::schema::bank_accounts;
use crate::{company::Company, essentials::*, Amount, Currency, Decimal};

use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = bank_accounts)]
#[diesel(belongs_to(Company, foreign_key = company_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BankAccount {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub bank_type: String,
    #[diesel(deserialize_as = crate::db::Currency)]
    pub currency: Currency,
    #[diesel(deserialize_as = crate::db::Decimal)]
    pub current_balance: Decimal,
    pub is_primary: bool,
    pub is_active: bool,
}

impl BankAccount {
    pub fn balance(&self) -> Amount {
        Amount(self.current_balance, self.currency)
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        bank_accounts::table
            .find(id)
            .select(BankAccount::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "BankAccount", None))
    }

    pub fn find_by_name(conn: &mut Conn, company: &Company, name: &str) -> Result<Self> {
        bank_accounts::table
            .filter(bank_accounts::company_id.eq(company.id))
            .filter(bank_accounts::name.eq(name))
            .select(BankAccount::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "BankAccount", Some("name")))
    }

    pub fn for_company(conn: &mut Conn, company_id: i64) -> Result<Vec<Self>> {
        Ok(bank_accounts::table
            .filter(bank_accounts::company_id.eq(company_id))
            .order(bank_accounts::id.asc())
            .select(BankAccount::as_select())
            .load(conn)?)
    }

    /// Credits the account with a single atomic increment
    pub fn deposit(&mut self, conn: &mut Conn, amount: Decimal, reason: &str) -> Result<()> {
        check_positive(amount)?;

        diesel::update(&*self)
            .set(
                bank_accounts::current_balance
                    .eq(bank_accounts::current_balance + db::Decimal::from(amount)),
            )
            .execute(conn)?;

        let before = self.current_balance;
        self.current_balance += amount;
        log::info!(
            "bank account {} ({}): balance {} -> {}: {}",
            self.id,
            self.name,
            before,
            self.current_balance,
            reason
        );

        Ok(())
    }

    /// Debits the account, refusing to drive the balance negative
    ///
    /// The guard and the decrement are one statement, so concurrent
    /// withdrawals cannot both pass the check.
    pub fn withdraw(&mut self, conn: &mut Conn, amount: Decimal, reason: &str) -> Result<()> {
        check_positive(amount)?;

        let updated = diesel::update(
            bank_accounts::table
                .filter(bank_accounts::id.eq(self.id))
                .filter(bank_accounts::current_balance.ge(db::Decimal::from(amount))),
        )
        .set(
            bank_accounts::current_balance
                .eq(bank_accounts::current_balance - db::Decimal::from(amount)),
        )
        .execute(conn)?;

        if updated == 0 {
            return Err(Error::InsufficientBalance {
                available: self.current_balance,
                requested: amount,
            });
        }

        let before = self.current_balance;
        self.current_balance -= amount;
        log::info!(
            "bank account {} ({}): balance {} -> {}: {}",
            self.id,
            self.name,
            before,
            self.current_balance,
            reason
        );

        Ok(())
    }

    /// Makes this the company's primary account, clearing any other
    pub fn set_primary(&mut self, conn: &mut Conn) -> Result<()> {
        conn.transaction(|conn| {
            diesel::update(
                bank_accounts::table.filter(bank_accounts::company_id.eq(self.company_id)),
            )
            .set(bank_accounts::is_primary.eq(false))
            .execute(conn)?;

            diesel::update(&*self)
                .set(bank_accounts::is_primary.eq(true))
                .execute(conn)?;

            Ok::<_, Error>(())
        })?;
        self.is_primary = true;

        Ok(())
    }
}

pub(crate) fn check_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Invalid(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(())
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bank_accounts)]
pub struct NewBankAccount<'a> {
    pub company_id: i64,
    pub name: &'a str,
    pub bank_type: &'a str,
    #[diesel(serialize_as = crate::db::Currency)]
    pub currency: Currency,
    #[diesel(serialize_as = crate::db::Decimal)]
    pub current_balance: Decimal,
    pub is_primary: bool,
    pub is_active: bool,
}

impl<'a> NewBankAccount<'a> {
    pub fn new(company: &Company, name: &'a str) -> Self {
        Self {
            company_id: company.id,
            name,
            bank_type: "checking",
            currency: company.currency,
            current_balance: Decimal::ZERO,
            is_primary: false,
            is_active: true,
        }
    }
}

impl NewBankAccount<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<BankAccount> {
        Ok(diesel::insert_into(bank_accounts::table)
            .values(self)
            .returning(BankAccount::as_returning())
            .get_result(conn)?)
    }
}
