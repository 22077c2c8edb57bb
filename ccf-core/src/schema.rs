// Table schema definitions

use crate::data::DataType;
use crate::error::{CcfError, Result};
use std::collections::HashSet;

/// One column's declared name and element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    pub name: String,
    pub dtype: DataType,
}

/// An ordered list of column declarations, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSchema {
    columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnSchema>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if col.name.is_empty() {
                return Err(CcfError::SchemaMismatch(
                    "column name must be non-empty".to_string(),
                ));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(CcfError::SchemaMismatch(format!(
                    "duplicate column name: {}",
                    col.name
                )));
            }
        }
        Ok(TableSchema { columns })
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
