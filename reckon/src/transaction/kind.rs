use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

use crate::result::ParseTypeError;

use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};

/// Discriminates the sign of a transaction amount
///
/// Amounts are stored as magnitudes; Income and Sales add to a store's
/// balance, the other kinds subtract from it.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum Kind {
    Income,
    Sales,
    #[default]
    Expense,
    Personal,
    Business,
}

use Kind::*;

impl Kind {
    pub const CREDIT: [Kind; 2] = [Income, Sales];
    pub const DEBIT: [Kind; 3] = [Expense, Personal, Business];

    pub fn is_credit(&self) -> bool {
        matches!(self, Income | Sales)
    }

    pub fn is_debit(&self) -> bool {
        !self.is_credit()
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Income => f.write_str("Income"),
            Sales => f.write_str("Sales"),
            Expense => f.write_str("Expense"),
            Personal => f.write_str("Personal"),
            Business => f.write_str("Business"),
        }
    }
}

impl FromStr for Kind {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "income" => Ok(Income),
            "sales" => Ok(Sales),
            "expense" => Ok(Expense),
            "personal" => Ok(Personal),
            "business" => Ok(Business),
            _ => Err(ParseTypeError("Kind", value.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for Kind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Kind {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?.parse()?)
    }
}
