// Writer — orchestrates column encoding and the two-pass header layout (§4.4).

use crate::binary::{self, ColumnMeta};
use crate::column::encode_column;
use crate::compression;
use crate::error::Result;
use crate::schema::TableSchema;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::instrument;

/// Writes a table to a CCF file in one atomic session.
///
/// `CcfWriter` is a one-shot pipeline: construct, encode all columns,
/// serialize, done. It holds no state across calls and is owned by a
/// single caller (§5).
pub struct CcfWriter;

impl CcfWriter {
    /// Write `rows` under `schema` to `path`.
    ///
    /// Rows shorter than the schema's column count are right-padded with
    /// empty strings (null); rows longer than it have excess cells
    /// ignored. On success the file at `path` is replaced atomically; on
    /// any failure no file is written or modified at `path`.
    #[instrument(skip(schema, rows), fields(num_cols = schema.len(), num_rows = rows.len()))]
    pub fn write<P: AsRef<Path>>(
        path: P,
        schema: &TableSchema,
        rows: &[Vec<String>],
    ) -> Result<()> {
        let path = path.as_ref();
        let num_rows = rows.len();
        let num_cols = schema.len();

        // Step 1: transpose rows into per-column value vectors, padding/truncating.
        let mut columns: Vec<Vec<String>> = (0..num_cols)
            .map(|_| Vec::with_capacity(num_rows))
            .collect();
        for row in rows {
            for (i, col) in columns.iter_mut().enumerate() {
                col.push(row.get(i).cloned().unwrap_or_default());
            }
        }

        // Step 2: encode + compress each column, in schema order.
        let mut blocks = Vec::with_capacity(num_cols);
        let mut metas = Vec::with_capacity(num_cols);
        for (col_schema, values) in schema.columns().iter().zip(columns.iter()) {
            let uncompressed = encode_column(col_schema.dtype, values)?;
            let compressed = compression::compress(&uncompressed)?;
            metas.push(ColumnMeta {
                name: col_schema.name.clone(),
                dtype: col_schema.dtype,
                offset: 0, // filled in during the offset pass below
                compressed_size: compressed.len() as u64,
                uncompressed_size: uncompressed.len() as u64,
            });
            blocks.push(compressed);
        }

        // Step 3: first header pass — header size depends only on name lengths.
        let header_size: u64 = schema
            .columns()
            .iter()
            .map(|c| ColumnMeta::directory_entry_len(&c.name))
            .sum();

        // Second pass: assign offsets in a single arithmetic sweep.
        let mut offset = binary::PREFIX_SIZE + header_size;
        for meta in &mut metas {
            meta.offset = offset;
            offset += meta.compressed_size;
        }

        // Step 4: serialize to a temp file, then rename into place atomically.
        let tmp_path = sibling_tmp_path(path);
        {
            let mut file = fs::File::create(&tmp_path)?;
            binary::write_prefix(&mut file, header_size as u32, num_rows as u64, num_cols as u16)?;
            for meta in &metas {
                meta.write_to(&mut file)?;
            }
            for block in &blocks {
                file.write_all(block)?;
            }
            file.flush()?;
        }
        fs::rename(&tmp_path, path)?;

        Ok(())
    }
}

fn sibling_tmp_path(path: &Path) -> std::path::PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.ccf-tmp", file_name))
}
