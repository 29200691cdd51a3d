use sqlparser::dialect;
use sqlparser::dialect::Dialect;

use crate::normalizer::NormalizerOptions;

pub fn all_dialects() -> Vec<Box<dyn Dialect>> {
    vec![
        Box::new(dialect::GenericDialect {}),
        Box::new(dialect::MySqlDialect {}),
        Box::new(dialect::PostgreSqlDialect {}),
        Box::new(dialect::HiveDialect {}),
        Box::new(dialect::SQLiteDialect {}),
        Box::new(dialect::SnowflakeDialect {}),
        Box::new(dialect::RedshiftSqlDialect {}),
        Box::new(dialect::MsSqlDialect {}),
        Box::new(dialect::ClickHouseDialect {}),
        Box::new(dialect::BigQueryDialect {}),
        Box::new(dialect::AnsiDialect {}),
        Box::new(dialect::DuckDbDialect {}),
    ]
}

/// Configurations used for property checks: no stages, the defaults, every stage, and
/// the defaults plus one opt-in stage at a time.
pub fn all_options() -> Vec<NormalizerOptions> {
    let defaults = NormalizerOptions::new();
    vec![
        NormalizerOptions::none(),
        defaults,
        NormalizerOptions::semantic(),
        defaults.with_collapse_select_columns(true),
        defaults.with_normalize_join_syntax(true),
        defaults.with_remove_order_by_asc(true),
        defaults.with_sort_insert_columns(true),
        defaults.with_sort_update_columns(true),
        defaults.with_remove_returning_clause(true),
        defaults.with_remove_table_qualifiers(true),
    ]
}
