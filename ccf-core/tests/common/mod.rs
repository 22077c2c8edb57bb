// Test utilities and generators for ccf-core property-based testing

#![allow(dead_code)]

use ccf_core::{ColumnSchema, DataType, TableSchema};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;

pub fn arb_data_type() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::Int32),
        Just(DataType::Float64),
        Just(DataType::String),
    ]
}

pub fn arb_column_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// A schema of 1..5 columns with distinct names.
pub fn arb_schema() -> impl Strategy<Value = TableSchema> {
    prop::collection::vec((arb_column_name(), arb_data_type()), 1..5).prop_filter_map(
        "distinct column names",
        |pairs| {
            let mut seen = std::collections::HashSet::new();
            let mut columns = Vec::with_capacity(pairs.len());
            for (name, dtype) in pairs {
                if !seen.insert(name.clone()) {
                    return None;
                }
                columns.push(ColumnSchema { name, dtype });
            }
            TableSchema::new(columns).ok()
        },
    )
}

/// A text value consistent with `dtype`, occasionally null (empty string).
pub fn arb_value_for(dtype: DataType) -> BoxedStrategy<String> {
    let non_null = match dtype {
        DataType::Int32 => any::<i32>().prop_map(|n| n.to_string()).boxed(),
        DataType::Float64 => prop::num::f64::NORMAL.prop_map(|f| f.to_string()).boxed(),
        DataType::String => "[a-zA-Z0-9 ]{0,12}".boxed(),
    };
    prop_oneof![9 => non_null, 1 => Just(String::new())].boxed()
}

/// One row of text values matching `schema`, column by column.
pub fn arb_row_for(schema: &TableSchema) -> BoxedStrategy<Vec<String>> {
    schema
        .columns()
        .iter()
        .fold(Just(Vec::new()).boxed(), |acc, col| {
            (acc, arb_value_for(col.dtype))
                .prop_map(|(mut row, v)| {
                    row.push(v);
                    row
                })
                .boxed()
        })
}

/// `row_count` rows, each matching `schema` exactly.
pub fn arb_rows_for(schema: &TableSchema, row_count: usize) -> BoxedStrategy<Vec<Vec<String>>> {
    prop::collection::vec(arb_row_for(schema), row_count).boxed()
}
