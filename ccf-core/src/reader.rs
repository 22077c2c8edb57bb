// Reader — parses the prefix and header directory, offers selective and
// whole-table reads (§4.5).

use crate::binary::{self, ColumnMeta};
use crate::column::decode_column;
use crate::compression;
use crate::data::{Cell, DataType};
use crate::error::{CcfError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::instrument;

/// Default ceiling on a single column's declared `uncompressed_size`
/// before the reader will allocate a buffer for it (§5).
pub const DEFAULT_MAX_UNCOMPRESSED_SIZE: u64 = 1 << 30; // 1 GiB

/// An opened, validated CCF file. Construction either fully succeeds
/// (`Ready`) or fails outright — there is no operation permitted on a
/// reader whose construction failed (§4.6).
pub struct CcfReader {
    path: std::path::PathBuf,
    num_rows: u64,
    columns: Vec<ColumnMeta>,
    max_uncompressed_size: u64,
}

impl CcfReader {
    /// Open `path`, validating the magic, version, and header directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_limit(path, DEFAULT_MAX_UNCOMPRESSED_SIZE)
    }

    /// Open `path` with a custom allocation ceiling for decompressed
    /// column buffers.
    #[instrument(skip(path))]
    pub fn open_with_limit<P: AsRef<Path>>(path: P, max_uncompressed_size: u64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;

        let prefix = binary::read_prefix(&mut file)?;
        let mut header_bytes = vec![0u8; prefix.header_size as usize];
        file.read_exact(&mut header_bytes)?;

        let mut cursor = &header_bytes[..];
        let mut columns = Vec::with_capacity(prefix.num_cols as usize);
        for _ in 0..prefix.num_cols {
            columns.push(ColumnMeta::read_from(&mut cursor)?);
        }

        Ok(CcfReader {
            path,
            num_rows: prefix.num_rows,
            columns,
            max_uncompressed_size,
        })
    }

    pub fn num_rows(&self) -> u64 {
        self.num_rows
    }

    /// `(index, name, type)` for every column, in file order.
    pub fn list_columns(&self) -> Vec<(usize, &str, DataType)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, m)| (i, m.name.as_str(), m.dtype))
            .collect()
    }

    /// Read one column by name (first match in declaration order),
    /// touching only the file prefix, the header directory, and that
    /// column's compressed byte range.
    #[instrument(skip(self), fields(column = name))]
    pub fn read_column(&self, name: &str) -> Result<Vec<Cell>> {
        let meta = self
            .columns
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| CcfError::UnknownColumn(name.to_string()))?;

        if meta.uncompressed_size > self.max_uncompressed_size {
            return Err(CcfError::OversizeAllocation {
                declared: meta.uncompressed_size,
                limit: self.max_uncompressed_size,
            });
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(meta.offset))?;
        let mut compressed = vec![0u8; meta.compressed_size as usize];
        file.read_exact(&mut compressed)?;

        let uncompressed = compression::decompress(&compressed, meta.uncompressed_size as usize)?;
        decode_column(&uncompressed, meta.dtype, self.num_rows as usize)
    }

    /// Read a set of columns (or all columns in file order if `columns`
    /// is `None`) and materialize them as text rows. Nulls render as the
    /// empty string.
    pub fn read_table(
        &self,
        columns: Option<&[String]>,
    ) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let names: Vec<String> = match columns {
            Some(cols) => cols.to_vec(),
            None => self.columns.iter().map(|m| m.name.clone()).collect(),
        };

        let mut per_column = Vec::with_capacity(names.len());
        for name in &names {
            per_column.push(self.read_column(name)?);
        }

        let mut rows = Vec::with_capacity(self.num_rows as usize);
        for i in 0..self.num_rows as usize {
            let row = per_column.iter().map(|col| col[i].render()).collect();
            rows.push(row);
        }

        Ok((names, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSchema, TableSchema};
    use crate::writer::CcfWriter;

    fn write_sample(path: &Path) {
        let schema = TableSchema::new(vec![
            ColumnSchema {
                name: "a".to_string(),
                dtype: DataType::Int32,
            },
            ColumnSchema {
                name: "b".to_string(),
                dtype: DataType::String,
            },
            ColumnSchema {
                name: "c".to_string(),
                dtype: DataType::Float64,
            },
        ])
        .unwrap();
        let rows = (0..1000)
            .map(|i| {
                vec![
                    i.to_string(),
                    format!("row-{}", i),
                    format!("{}.5", i),
                ]
            })
            .collect::<Vec<_>>();
        CcfWriter::write(path, &schema, &rows).unwrap();
    }

    #[test]
    fn s5_bad_magic_rejects_construction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ccf");
        std::fs::write(&path, b"NOTCCF\0garbage").unwrap();
        assert!(matches!(CcfReader::open(&path), Err(CcfError::BadMagic)));
    }

    #[test]
    fn unknown_column_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.ccf");
        write_sample(&path);
        let reader = CcfReader::open(&path).unwrap();
        assert!(matches!(
            reader.read_column("nope"),
            Err(CcfError::UnknownColumn(_))
        ));
    }

    #[test]
    fn selective_read_determinism() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.ccf");
        write_sample(&path);
        let reader = CcfReader::open(&path).unwrap();
        let first = reader.read_column("b").unwrap();
        let second = reader.read_column("b").unwrap();
        assert_eq!(first, second);

        let other_reader = CcfReader::open(&path).unwrap();
        let third = other_reader.read_column("b").unwrap();
        assert_eq!(first, third);
    }

    #[test]
    fn s4_selective_locality_does_not_touch_other_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.ccf");
        write_sample(&path);
        let reader = CcfReader::open(&path).unwrap();

        let b_meta = reader.columns.iter().find(|m| m.name == "b").unwrap();
        let c_meta = reader.columns.iter().find(|m| m.name == "c").unwrap();
        let b_range = b_meta.offset..b_meta.offset + b_meta.compressed_size;
        let c_range = c_meta.offset..c_meta.offset + c_meta.compressed_size;
        assert!(b_range.end <= c_range.start || c_range.end <= b_range.start);

        // Reading "c" must succeed without any dependency on "b"'s bytes.
        let _ = reader.read_column("c").unwrap();
    }

    #[test]
    fn offsets_partition_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.ccf");
        write_sample(&path);
        let reader = CcfReader::open(&path).unwrap();

        let mut sorted = reader.columns.clone();
        sorted.sort_by_key(|m| m.offset);
        let header_size_end = binary::PREFIX_SIZE
            + sorted
                .iter()
                .map(|m| ColumnMeta::directory_entry_len(&m.name))
                .sum::<u64>();
        assert_eq!(sorted[0].offset, header_size_end);
        for w in sorted.windows(2) {
            assert_eq!(w[1].offset, w[0].offset + w[0].compressed_size);
        }
    }

    #[test]
    fn oversize_allocation_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.ccf");
        write_sample(&path);
        let reader = CcfReader::open_with_limit(&path, 4).unwrap();
        assert!(matches!(
            reader.read_column("b"),
            Err(CcfError::OversizeAllocation { .. })
        ));
    }

    #[test]
    fn read_table_renders_nulls_as_empty_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nulls.ccf");
        let schema = TableSchema::new(vec![ColumnSchema {
            name: "name".to_string(),
            dtype: DataType::String,
        }])
        .unwrap();
        let rows = vec![
            vec!["alice".to_string()],
            vec!["".to_string()],
            vec!["bob".to_string()],
        ];
        CcfWriter::write(&path, &schema, &rows).unwrap();

        let reader = CcfReader::open(&path).unwrap();
        let (names, table_rows) = reader.read_table(None).unwrap();
        assert_eq!(names, vec!["name".to_string()]);
        assert_eq!(
            table_rows,
            vec![vec!["alice".to_string()], vec!["".to_string()], vec!["bob".to_string()]]
        );
    }
}
