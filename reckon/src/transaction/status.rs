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

/// Only Approved rows count toward balance computations
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum Status {
    #[default]
    Pending,
    Approved,
    Failed,
    Cancelled,
}

use Status::*;

impl Status {
    pub fn is_approved(&self) -> bool {
        self == &Approved
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Pending => f.write_str("Pending"),
            Approved => f.write_str("Approved"),
            Failed => f.write_str("Failed"),
            Cancelled => f.write_str("Cancelled"),
        }
    }
}

impl FromStr for Status {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "pending" => Ok(Pending),
            "approved" => Ok(Approved),
            // spelling used by older imports
            "completed" => Ok(Approved),
            "failed" => Ok(Failed),
            "cancelled" => Ok(Cancelled),
            _ => Err(ParseTypeError("Status", value.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for Status {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Status {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?.parse()?)
    }
}
