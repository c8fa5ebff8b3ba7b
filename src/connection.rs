//! DuckDB connection wrapper with table loading and query execution.
//!
//! Query results come back as JSON values so callers can deserialize rows
//! straight into serde types.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;

use crate::error::{DrivewiseError, Result};

/// Wraps an in-memory DuckDB connection and tracks the tables loaded into it.
pub struct Connection {
    conn: DuckDbConnection,
    tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Open an in-memory DuckDB database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            tables: RefCell::new(HashSet::new()),
        })
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run.
        let executed = rows.as_ref().ok_or_else(|| {
            DrivewiseError::InvalidArgument(format!("Statement produced no result set: {}", sql))
        })?;
        let column_names: Vec<String> = executed
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, name) in column_names.iter().enumerate() {
                map.insert(name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }
        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        self.execute(sql, params)?
            .into_iter()
            .map(|row| {
                let value = serde_json::Value::Object(row.into_iter().collect());
                Ok(serde_json::from_value(value)?)
            })
            .collect()
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;
        match rows.next()? {
            Some(row) => Ok(Some(convert_value_ref(row.get_ref(0)?))),
            None => Ok(None),
        }
    }

    /// Create (or replace) an empty table with an explicit schema.
    ///
    /// `columns` are `(name, duckdb_type)` pairs.
    pub fn create_table(&self, table_name: &str, columns: &[(&str, &str)]) -> Result<()> {
        let defs: Vec<String> = columns
            .iter()
            .map(|(name, ty)| format!("\"{}\" {}", name, ty))
            .collect();
        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {} ({})",
            table_name,
            defs.join(", ")
        ))?;
        self.tables.borrow_mut().insert(table_name.to_string());
        Ok(())
    }

    /// Append the rows of a newline-delimited JSON file to a table created
    /// with [`create_table`](Self::create_table).
    ///
    /// The file is read with the same explicit column types, so no type
    /// sniffing happens and empty or all-null columns keep their schema.
    pub fn append_ndjson(
        &self,
        table_name: &str,
        columns: &[(&str, &str)],
        ndjson_path: &Path,
    ) -> Result<()> {
        if !self.has_table(table_name) {
            return Err(DrivewiseError::NotFound(format!(
                "Table {} has not been created",
                table_name
            )));
        }
        let path_fwd = ndjson_path.to_string_lossy().replace('\\', "/");
        let names: Vec<String> = columns.iter().map(|(n, _)| format!("\"{}\"", n)).collect();
        let types: Vec<String> = columns
            .iter()
            .map(|(n, ty)| format!("'{}': '{}'", n, ty))
            .collect();
        self.conn.execute_batch(&format!(
            "INSERT INTO {table} ({cols}) SELECT {cols} FROM read_json('{path}', \
             format='newline_delimited', columns={{{types}}})",
            table = table_name,
            cols = names.join(", "),
            path = path_fwd,
            types = types.join(", "),
        ))?;
        Ok(())
    }

    /// Check whether a table has been created through this wrapper.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.borrow().contains(name)
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    use serde_json::Value;

    match val {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => Value::Number(n.into()),
        ValueRef::SmallInt(n) => Value::Number(n.into()),
        ValueRef::Int(n) => Value::Number(n.into()),
        ValueRef::BigInt(n) => Value::Number(n.into()),
        ValueRef::UTinyInt(n) => Value::Number(n.into()),
        ValueRef::USmallInt(n) => Value::Number(n.into()),
        ValueRef::UInt(n) => Value::Number(n.into()),
        ValueRef::UBigInt(n) => Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => Value::Number(i.into()),
            Err(_) => Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        // Dates, lists and other nested types are not used by the community table.
        _ => Value::Null,
    }
}
