//! Fixed-schema CSV persistence of result rows.

use crate::error::{HarnessError, HarnessResult};
use crate::sweep::{CounterRow, PipelineRow};
use serde::Serialize;
use std::path::Path;

/// A result row with a fixed column layout.
///
/// `COLUMNS` must list the serialized fields in declaration order.
pub trait TableRow: Serialize {
    /// Header, in write order.
    const COLUMNS: &'static [&'static str];
}

impl TableRow for CounterRow {
    const COLUMNS: &'static [&'static str] =
        &["threads", "naive_ms", "mutex_ms", "sharded_ms", "atomic_ms"];
}

impl TableRow for PipelineRow {
    const COLUMNS: &'static [&'static str] = &["messages", "buffer", "pause_us", "time_ms"];
}

/// Write `rows` to `path` as CSV with a header, replacing any existing file.
///
/// The header is written even when `rows` is empty.
///
/// # Errors
///
/// Returns [`HarnessError::Persist`] if the file cannot be created or written.
pub fn write_table<T: TableRow>(rows: &[T], path: &Path) -> HarnessResult<()> {
    let persist = |source: csv::Error| HarnessError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(persist)?;

    writer.write_record(T::COLUMNS).map_err(persist)?;
    for row in rows {
        writer.serialize(row).map_err(persist)?;
    }
    writer.flush().map_err(|e| persist(csv::Error::from(e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_counter_table_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p1_times.csv");
        let rows = [
            CounterRow {
                threads: 1,
                naive_ms: 10.0,
                mutex_ms: 20.5,
                sharded_ms: 5.0,
                atomic_ms: 2.125,
            },
            CounterRow {
                threads: 8,
                naive_ms: 1.5,
                mutex_ms: 300.0,
                sharded_ms: 0.75,
                atomic_ms: 40.0,
            },
        ];

        write_table(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "threads,naive_ms,mutex_ms,sharded_ms,atomic_ms\n\
             1,10.0,20.5,5.0,2.125\n\
             8,1.5,300.0,0.75,40.0\n"
        );
    }

    #[test]
    fn test_pipeline_table_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p5_times.csv");
        let rows = [PipelineRow {
            messages: 20_000,
            buffer: 8,
            pause_us: 500,
            time_ms: 123.4567,
        }];

        write_table(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "messages,buffer,pause_us,time_ms\n20000,8,500,123.4567\n");
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_table::<PipelineRow>(&[], &path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "messages,buffer,pause_us,time_ms\n"
        );
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p5_times.csv");
        std::fs::write(&path, "stale,data\n1,2\n3,4\n5,6\n").unwrap();

        write_table::<PipelineRow>(&[], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
    }

    #[test]
    fn test_columns_match_serialized_header() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .serialize(CounterRow {
                threads: 1,
                naive_ms: 0.0,
                mutex_ms: 0.0,
                sharded_ms: 0.0,
                atomic_ms: 0.0,
            })
            .unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().next().unwrap(), CounterRow::COLUMNS.join(","));
    }

    #[test]
    fn test_missing_directory_is_persist_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("p1_times.csv");

        let err = write_table::<CounterRow>(&[], &path).unwrap_err();
        assert!(matches!(err, HarnessError::Persist { .. }));
    }
}
