use std::fmt;

use super::Literal;

/// Column part of an identifier
#[derive(Debug, Clone)]
pub enum IdentifierColumn {
    Name(String),
    /// Used for `*` so it is written bare instead of quoted
    Literal(Literal),
}

/// A schema/table/column reference, quoted segment by segment when rendered
#[derive(Debug, Clone, Default)]
pub struct Identifier {
    pub schema: Option<String>,
    pub table: Option<String>,
    pub column: Option<IdentifierColumn>,
}

impl Identifier {
    /// Parse a dotted reference.
    ///
    /// One part is a column, two are `table.column`, three are
    /// `schema.table.column`. A column part of `*` becomes a bare star.
    pub fn parse(text: &str) -> Self {
        let parts: Vec<&str> = text.split('.').collect();
        match parts.as_slice() {
            [schema, table, column] => Identifier {
                schema: Some((*schema).to_string()),
                table: Some((*table).to_string()),
                column: Some(column_part(column)),
            },
            [table, column] => Identifier {
                schema: None,
                table: Some((*table).to_string()),
                column: Some(column_part(column)),
            },
            _ => Identifier {
                schema: None,
                table: None,
                column: Some(column_part(text)),
            },
        }
    }

    pub fn column(name: impl Into<String>) -> Self {
        Identifier {
            column: Some(IdentifierColumn::Name(name.into())),
            ..Default::default()
        }
    }

    pub fn table(name: impl Into<String>) -> Self {
        Identifier {
            table: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn schema(name: impl Into<String>) -> Self {
        Identifier {
            schema: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column_part(&column.into()));
        self
    }

    /// Qualify with a bare `*` column, e.g. `"users".*`
    pub fn all(mut self) -> Self {
        self.column = Some(IdentifierColumn::Literal(Literal::star()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.schema.is_none() && self.table.is_none() && self.column.is_none()
    }
}

fn column_part(text: &str) -> IdentifierColumn {
    if text == "*" {
        IdentifierColumn::Literal(Literal::star())
    } else {
        IdentifierColumn::Name(text.to_string())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(schema) = &self.schema {
            parts.push(schema);
        }
        if let Some(table) = &self.table {
            parts.push(table);
        }
        match &self.column {
            Some(IdentifierColumn::Name(name)) => parts.push(name),
            Some(IdentifierColumn::Literal(lit)) => parts.push(&lit.sql),
            None => {}
        }
        write!(f, "{}", parts.join("."))
    }
}
