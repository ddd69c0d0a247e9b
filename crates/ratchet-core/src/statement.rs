//! Splitting migration content into individual SQL statements.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;
use std::fmt;

/// Strategy used to split a migration file into statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatementSplitter {
    /// Split on every `;`.
    ///
    /// A `;` inside a string literal or procedural body also splits, so such
    /// statements are not supported in this mode.
    #[default]
    Semicolon,

    /// Parse the content with `sqlparser` (DuckDB dialect) and execute each
    /// parsed statement as re-rendered by the parser.
    Parser,
}

impl fmt::Display for StatementSplitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementSplitter::Semicolon => write!(f, "semicolon"),
            StatementSplitter::Parser => write!(f, "parser"),
        }
    }
}

impl StatementSplitter {
    /// Split `sql` into trimmed, non-empty statements in source order
    pub fn split(&self, sql: &str) -> CoreResult<Vec<String>> {
        match self {
            StatementSplitter::Semicolon => Ok(split_on_semicolons(sql)),
            StatementSplitter::Parser => split_with_parser(sql),
        }
    }
}

/// Split on bare `;`, trimming each fragment and dropping empty ones.
pub fn split_on_semicolons(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_with_parser(sql: &str) -> CoreResult<Vec<String>> {
    let statements =
        Parser::parse_sql(&DuckDbDialect {}, sql).map_err(|e| CoreError::StatementParseError {
            message: e.to_string(),
        })?;
    Ok(statements.iter().map(|s| s.to_string()).collect())
}

#[cfg(test)]
#[path = "statement_test.rs"]
mod tests;
