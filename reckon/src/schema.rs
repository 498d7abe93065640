diesel::table! {
    use diesel::sql_types::*;

    companies (id) {
        id -> BigInt,
        name -> Text,
        currency -> Text,
        plan -> Text,
        deleted_at -> Nullable<TimestamptzSqlite>,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    bank_accounts (id) {
        id -> BigInt,
        company_id -> BigInt,
        name -> Text,
        bank_type -> Text,
        currency -> Text,
        current_balance -> BigInt,
        is_primary -> Bool,
        is_active -> Bool,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    payment_processor_accounts (id) {
        id -> BigInt,
        company_id -> BigInt,
        processor_type -> Text,
        currency -> Text,
        current_balance -> BigInt,
        pending_balance -> BigInt,
        is_active -> Bool,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    stores (id) {
        id -> BigInt,
        company_id -> BigInt,
        name -> Text,
        currency -> Text,
        status -> Text,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    transactions (id) {
        id -> BigInt,
        store_id -> BigInt,
        amount -> BigInt,
        currency -> Text,
        kind -> Text,
        status -> Text,
        details -> Text,
        is_adjustment -> Bool,
        adjustment_type -> Nullable<Text>,
        created_at -> TimestamptzSqlite,
    }
}

diesel::joinable!(bank_accounts -> companies (company_id));
diesel::joinable!(payment_processor_accounts -> companies (company_id));
diesel::joinable!(stores -> companies (company_id));
diesel::joinable!(transactions -> stores (store_id));

diesel::allow_tables_to_appear_in_same_query!(
    companies,
    bank_accounts,
    payment_processor_accounts,
    stores,
    transactions,
);
