//! SQL dialects
//!
//! A dialect is a name plus a [`DialectOptions`] table of keywords, quoting
//! rules, operator spellings and capability flags. The renderer never
//! branches on the dialect name, only on these options.

mod default;
mod mysql;
mod postgres;
mod registry;
mod sqlite;

pub use default::DefaultDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use registry::{get_dialect, lookup_dialect, register_dialect, DialectWrapper};
pub use sqlite::SqliteDialect;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::builder::common::JoinType;
use crate::error::Result;
use crate::operator::{BooleanOperation, CompoundType, RangeOperation};

/// Database-specific SQL syntax
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Registry name of the dialect (e.g. "postgres", "mysql")
    fn name(&self) -> &str;

    /// Keywords, quoting rules and capability flags
    fn options(&self) -> &DialectOptions;

    /// Wraps an identifier segment in the dialect's quote character,
    /// doubling any embedded quote character.
    fn quote_identifier(&self, ident: &str) -> String {
        let quote = self.options().quote_char;
        let mut quoted = String::with_capacity(ident.len() + 2);
        quoted.push(quote);
        for ch in ident.chars() {
            if ch == quote {
                quoted.push(quote);
            }
            quoted.push(ch);
        }
        quoted.push(quote);
        quoted
    }

    /// Returns the placeholder for the 1-based argument ordinal.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL and SQLite use `?`
    fn placeholder(&self, ordinal: usize) -> String {
        let options = self.options();
        if options.include_placeholder_num {
            format!("{}{}", options.placeholder, ordinal)
        } else {
            options.placeholder.clone()
        }
    }
}

/// Rendering configuration of a dialect
///
/// Missing fields fall back to the defaults, so a custom dialect only needs
/// to spell out what differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectOptions {
    pub supports_returning: bool,
    pub supports_limit_on_update: bool,
    pub supports_order_by_on_update: bool,
    pub supports_limit_on_delete: bool,
    pub supports_order_by_on_delete: bool,
    pub supports_conflict_target: bool,
    pub supports_conflict_update_where: bool,
    pub supports_insert_ignore: bool,
    pub wrap_compounds_in_parens: bool,

    pub select_clause: String,
    pub distinct_fragment: String,
    pub from_fragment: String,
    pub where_fragment: String,
    pub group_by_fragment: String,
    pub having_fragment: String,
    pub order_by_fragment: String,
    pub limit_fragment: String,
    pub offset_fragment: String,
    pub returning_fragment: String,
    pub as_fragment: String,
    pub on_fragment: String,
    pub using_fragment: String,
    pub and_fragment: String,
    pub or_fragment: String,
    pub asc_fragment: String,
    pub desc_fragment: String,
    pub nulls_first_fragment: String,
    pub nulls_last_fragment: String,
    pub cast_fragment: String,

    pub insert_clause: String,
    pub insert_ignore_clause: String,
    pub default_values_fragment: String,
    pub values_fragment: String,
    pub conflict_fragment: String,
    pub conflict_do_nothing_fragment: String,
    pub conflict_do_update_fragment: String,
    pub update_clause: String,
    pub set_fragment: String,
    pub set_operator: String,
    pub update_separator: String,
    pub delete_clause: String,
    pub truncate_clause: String,
    pub cascade_fragment: String,
    pub restrict_fragment: String,
    pub identity_fragment: String,

    pub null_literal: String,
    pub true_literal: String,
    pub false_literal: String,
    pub all_literal: String,
    pub star: String,

    pub quote_char: char,
    pub string_quote: char,
    pub escaped_runes: BTreeMap<char, String>,
    pub placeholder: String,
    pub include_placeholder_num: bool,

    pub boolean_operator_lookup: BTreeMap<BooleanOperation, String>,
    pub range_operator_lookup: BTreeMap<RangeOperation, String>,
    pub join_type_lookup: BTreeMap<JoinType, String>,
    pub compound_lookup: BTreeMap<CompoundType, String>,
}

impl Default for DialectOptions {
    fn default() -> Self {
        let boolean_operator_lookup = BooleanOperation::ALL
            .iter()
            .map(|op| (*op, op.as_str().to_string()))
            .collect();

        let range_operator_lookup = [RangeOperation::Between, RangeOperation::NotBetween]
            .iter()
            .map(|op| (*op, op.as_str().to_string()))
            .collect();

        let join_type_lookup = [
            JoinType::Inner,
            JoinType::FullOuter,
            JoinType::RightOuter,
            JoinType::LeftOuter,
            JoinType::Full,
            JoinType::Right,
            JoinType::Left,
            JoinType::Natural,
            JoinType::NaturalLeft,
            JoinType::NaturalRight,
            JoinType::NaturalFull,
            JoinType::Cross,
        ]
        .iter()
        .map(|join| (*join, format!(" {} ", join)))
        .collect();

        let compound_lookup = [
            CompoundType::Union,
            CompoundType::UnionAll,
            CompoundType::Intersect,
            CompoundType::IntersectAll,
        ]
        .iter()
        .map(|kind| (*kind, format!(" {} ", kind)))
        .collect();

        Self {
            supports_returning: true,
            supports_limit_on_update: false,
            supports_order_by_on_update: false,
            supports_limit_on_delete: false,
            supports_order_by_on_delete: false,
            supports_conflict_target: true,
            supports_conflict_update_where: true,
            supports_insert_ignore: false,
            wrap_compounds_in_parens: true,

            select_clause: "SELECT".to_string(),
            distinct_fragment: "DISTINCT".to_string(),
            from_fragment: " FROM".to_string(),
            where_fragment: " WHERE ".to_string(),
            group_by_fragment: " GROUP BY ".to_string(),
            having_fragment: " HAVING ".to_string(),
            order_by_fragment: " ORDER BY ".to_string(),
            limit_fragment: " LIMIT ".to_string(),
            offset_fragment: " OFFSET ".to_string(),
            returning_fragment: " RETURNING ".to_string(),
            as_fragment: " AS ".to_string(),
            on_fragment: "ON ".to_string(),
            using_fragment: "USING ".to_string(),
            and_fragment: " AND ".to_string(),
            or_fragment: " OR ".to_string(),
            asc_fragment: " ASC".to_string(),
            desc_fragment: " DESC".to_string(),
            nulls_first_fragment: " NULLS FIRST".to_string(),
            nulls_last_fragment: " NULLS LAST".to_string(),
            cast_fragment: "CAST".to_string(),

            insert_clause: "INSERT INTO".to_string(),
            insert_ignore_clause: "INSERT IGNORE INTO".to_string(),
            default_values_fragment: " DEFAULT VALUES".to_string(),
            values_fragment: " VALUES ".to_string(),
            conflict_fragment: " ON CONFLICT".to_string(),
            conflict_do_nothing_fragment: " DO NOTHING".to_string(),
            conflict_do_update_fragment: " DO UPDATE SET ".to_string(),
            update_clause: "UPDATE".to_string(),
            set_fragment: " SET ".to_string(),
            set_operator: "=".to_string(),
            update_separator: ",".to_string(),
            delete_clause: "DELETE".to_string(),
            truncate_clause: "TRUNCATE".to_string(),
            cascade_fragment: " CASCADE".to_string(),
            restrict_fragment: " RESTRICT".to_string(),
            identity_fragment: " IDENTITY".to_string(),

            null_literal: "NULL".to_string(),
            true_literal: "TRUE".to_string(),
            false_literal: "FALSE".to_string(),
            all_literal: "ALL".to_string(),
            star: "*".to_string(),

            quote_char: '"',
            string_quote: '\'',
            escaped_runes: BTreeMap::from([('\'', "''".to_string())]),
            placeholder: "?".to_string(),
            include_placeholder_num: false,

            boolean_operator_lookup,
            range_operator_lookup,
            join_type_lookup,
            compound_lookup,
        }
    }
}

/// Dialect defined entirely by configuration
#[derive(Debug, Clone)]
pub struct CustomDialect {
    name: String,
    options: DialectOptions,
}

impl CustomDialect {
    pub fn new(name: impl Into<String>, options: DialectOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// Build a dialect from a JSON options document
    ///
    /// ```
    /// use sqlset_core::dialect::CustomDialect;
    ///
    /// let dialect = CustomDialect::from_json("oracle-ish", r#"{"supports_returning": false}"#).unwrap();
    /// ```
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self> {
        let options: DialectOptions = serde_json::from_str(json)?;
        Ok(Self::new(name, options))
    }
}

impl Dialect for CustomDialect {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &DialectOptions {
        &self.options
    }
}
