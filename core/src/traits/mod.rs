mod param;
mod to_sql;
mod tuple;

pub use param::SQLParam;
pub use to_sql::ToSQL;
