pub use crate::schema::payment_processor_accounts;
use crate::{
    bank_account::check_positive, company::Company, essentials::*, result::ParseTypeError,
    Currency, Decimal,
};

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

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum ProcessorType {
    Stripe,
    Paypal,
    ShopifyPayments,
    Manual,
}

use ProcessorType::*;

impl Display for ProcessorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stripe => f.write_str("Stripe"),
            Paypal => f.write_str("PayPal"),
            ShopifyPayments => f.write_str("Shopify Payments"),
            Manual => f.write_str("Manual"),
        }
    }
}

impl FromStr for ProcessorType {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "stripe" => Ok(Stripe),
            "paypal" => Ok(Paypal),
            "shopify" | "shopify payments" | "shopify_payments" => Ok(ShopifyPayments),
            "manual" => Ok(Manual),
            _ => Err(ParseTypeError("ProcessorType", value.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for ProcessorType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for ProcessorType {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?.parse()?)
    }
}

/// Processor balances are split between withdrawable funds and funds the
/// processor has captured but not yet made available
#[derive(Debug, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = payment_processor_accounts)]
#[diesel(belongs_to(Company, foreign_key = company_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PaymentProcessorAccount {
    pub id: i64,
    pub company_id: i64,
    pub processor_type: ProcessorType,
    #[diesel(deserialize_as = crate::db::Currency)]
    pub currency: Currency,
    #[diesel(deserialize_as = crate::db::Decimal)]
    pub current_balance: Decimal,
    #[diesel(deserialize_as = crate::db::Decimal)]
    pub pending_balance: Decimal,
    pub is_active: bool,
}

impl PaymentProcessorAccount {
    pub fn total(&self) -> Decimal {
        self.current_balance + self.pending_balance
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        payment_processor_accounts::table
            .find(id)
            .select(PaymentProcessorAccount::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "PaymentProcessorAccount", None))
    }

    pub fn for_company(conn: &mut Conn, company_id: i64) -> Result<Vec<Self>> {
        Ok(payment_processor_accounts::table
            .filter(payment_processor_accounts::company_id.eq(company_id))
            .order(payment_processor_accounts::id.asc())
            .select(PaymentProcessorAccount::as_select())
            .load(conn)?)
    }

    pub fn active_for_company(conn: &mut Conn, company_id: i64) -> Result<Vec<Self>> {
        Ok(payment_processor_accounts::table
            .filter(payment_processor_accounts::company_id.eq(company_id))
            .filter(payment_processor_accounts::is_active.eq(true))
            .order(payment_processor_accounts::id.asc())
            .select(PaymentProcessorAccount::as_select())
            .load(conn)?)
    }

    /// Records funds captured by the processor but not yet available
    pub fn add_pending(&mut self, conn: &mut Conn, amount: Decimal, reason: &str) -> Result<()> {
        check_positive(amount)?;

        diesel::update(&*self)
            .set(
                payment_processor_accounts::pending_balance
                    .eq(payment_processor_accounts::pending_balance + db::Decimal::from(amount)),
            )
            .execute(conn)?;

        let before = self.pending_balance;
        self.pending_balance += amount;
        self.log_transition("pending", before, self.pending_balance, reason);

        Ok(())
    }

    /// Moves settled funds from pending to the withdrawable balance
    pub fn release_pending(
        &mut self,
        conn: &mut Conn,
        amount: Decimal,
        reason: &str,
    ) -> Result<()> {
        check_positive(amount)?;

        let updated = diesel::update(
            payment_processor_accounts::table
                .filter(payment_processor_accounts::id.eq(self.id))
                .filter(payment_processor_accounts::pending_balance.ge(db::Decimal::from(amount))),
        )
        .set((
            payment_processor_accounts::pending_balance
                .eq(payment_processor_accounts::pending_balance - db::Decimal::from(amount)),
            payment_processor_accounts::current_balance
                .eq(payment_processor_accounts::current_balance + db::Decimal::from(amount)),
        ))
        .execute(conn)?;

        if updated == 0 {
            return Err(Error::InsufficientBalance {
                available: self.pending_balance,
                requested: amount,
            });
        }

        let pending_before = self.pending_balance;
        let current_before = self.current_balance;
        self.pending_balance -= amount;
        self.current_balance += amount;
        self.log_transition("pending", pending_before, self.pending_balance, reason);
        self.log_transition("current", current_before, self.current_balance, reason);

        Ok(())
    }

    /// Credits the withdrawable balance directly
    pub fn add_current(&mut self, conn: &mut Conn, amount: Decimal, reason: &str) -> Result<()> {
        check_positive(amount)?;

        diesel::update(&*self)
            .set(
                payment_processor_accounts::current_balance
                    .eq(payment_processor_accounts::current_balance + db::Decimal::from(amount)),
            )
            .execute(conn)?;

        let before = self.current_balance;
        self.current_balance += amount;
        self.log_transition("current", before, self.current_balance, reason);

        Ok(())
    }

    /// Pays out from the withdrawable balance, never below zero
    pub fn withdraw_current(
        &mut self,
        conn: &mut Conn,
        amount: Decimal,
        reason: &str,
    ) -> Result<()> {
        check_positive(amount)?;

        let updated = diesel::update(
            payment_processor_accounts::table
                .filter(payment_processor_accounts::id.eq(self.id))
                .filter(payment_processor_accounts::current_balance.ge(db::Decimal::from(amount))),
        )
        .set(
            payment_processor_accounts::current_balance
                .eq(payment_processor_accounts::current_balance - db::Decimal::from(amount)),
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
        self.log_transition("current", before, self.current_balance, reason);

        Ok(())
    }

    fn log_transition(&self, balance: &str, before: Decimal, after: Decimal, reason: &str) {
        log::info!(
            "processor account {} ({}): {} balance {} -> {}: {}",
            self.id,
            self.processor_type,
            balance,
            before,
            after,
            reason
        );
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payment_processor_accounts)]
pub struct NewPaymentProcessorAccount {
    pub company_id: i64,
    pub processor_type: ProcessorType,
    #[diesel(serialize_as = crate::db::Currency)]
    pub currency: Currency,
    #[diesel(serialize_as = crate::db::Decimal)]
    pub current_balance: Decimal,
    #[diesel(serialize_as = crate::db::Decimal)]
    pub pending_balance: Decimal,
    pub is_active: bool,
}

impl NewPaymentProcessorAccount {
    pub fn new(company: &Company, processor_type: ProcessorType) -> Self {
        Self {
            company_id: company.id,
            processor_type,
            currency: company.currency,
            current_balance: Decimal::ZERO,
            pending_balance: Decimal::ZERO,
            is_active: true,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<PaymentProcessorAccount> {
        Ok(diesel::insert_into(payment_processor_accounts::table)
            .values(self)
            .returning(PaymentProcessorAccount::as_returning())
            .get_result(conn)?)
    }
}
