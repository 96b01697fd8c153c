//! CSV export of the denormalized view.
//!
//! Writes one header line plus one data row per page to the destination file,
//! creating or truncating it. There is no atomic rename: an interrupted write
//! leaves a truncated file, matching the behavior of the original export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use diesel::result::Error as DieselError;

use crate::models::DenormalizedPage;

/// Column header line, in the fixed export order.
pub const CSV_HEADER: &str =
    "page_id,title,views,text,project_name,namespace_name,categories,edit_count,view_count,comment_count";

/// Export failure, classified for logs and exit status.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A referenced table or column does not exist.
    #[error("schema error: {0}")]
    Schema(String),

    /// The engine ran out of memory or disk while evaluating the query.
    #[error("resource exhaustion: {0}")]
    Resource(String),

    /// Destination path unwritable or storage failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other database failure.
    #[error("query error: {0}")]
    Query(#[from] DieselError),
}

impl ExportError {
    /// Short kind tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::Schema(_) => "schema",
            ExportError::Resource(_) => "resource",
            ExportError::Io(_) => "io",
            ExportError::Query(_) => "query",
        }
    }
}

/// Classify a database error into the export taxonomy.
///
/// Matches the message shapes of both backends: SQLite says "no such
/// table/column" and "database or disk is full", Postgres says "does not
/// exist" and "out of memory".
pub fn classify_db_error(e: DieselError) -> ExportError {
    let message = match &e {
        DieselError::DatabaseError(_, info) => info.message().to_string(),
        _ => return ExportError::Query(e),
    };
    let lowered = message.to_lowercase();

    if lowered.contains("no such table")
        || lowered.contains("no such column")
        || lowered.contains("does not exist")
        || lowered.contains("undefined table")
        || lowered.contains("undefined column")
    {
        return ExportError::Schema(message);
    }

    if lowered.contains("out of memory")
        || lowered.contains("database or disk is full")
        || lowered.contains("disk full")
        || lowered.contains("temporary file size exceeds")
    {
        return ExportError::Resource(message);
    }

    ExportError::Query(e)
}

/// Validate the destination before running the query: the parent directory
/// must exist and be writable. Checked by touching and removing a scratch
/// file, since permission bits alone don't answer "can this process write
/// here". The export file itself is not touched, so a failed validation
/// leaves any previous export intact.
pub fn validate_output_path(path: &Path) -> Result<(), ExportError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir()?,
    };

    if !parent.is_dir() {
        return Err(ExportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("output directory '{}' does not exist", parent.display()),
        )));
    }

    let probe = parent.join(format!(".pagexport-write-check-{}", std::process::id()));
    match File::create(&probe) {
        Ok(_) => {
            let _ = std::fs::remove_file(&probe);
            Ok(())
        }
        Err(e) => Err(ExportError::Io(std::io::Error::new(
            e.kind(),
            format!("output directory '{}' is not writable: {}", parent.display(), e),
        ))),
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Format one view row as a CSV line. Null text fields become empty fields.
fn csv_line(row: &DenormalizedPage) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{}",
        row.page_id,
        escape_csv(&row.title),
        row.views,
        escape_csv(&row.text),
        row.project_name.as_deref().map(escape_csv).unwrap_or_default(),
        row.namespace_name.as_deref().map(escape_csv).unwrap_or_default(),
        row.categories.as_deref().map(escape_csv).unwrap_or_default(),
        row.edit_count,
        row.view_count,
        row.comment_count,
    )
}

/// Write rows to the destination, creating or truncating the file.
///
/// Returns the number of data rows written. `on_row` is called after each
/// row for progress reporting.
pub fn write_csv<F>(
    path: &Path,
    rows: &[DenormalizedPage],
    mut on_row: F,
) -> Result<u64, ExportError>
where
    F: FnMut(u64),
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", CSV_HEADER)?;

    let mut written = 0u64;
    for row in rows {
        writeln!(writer, "{}", csv_line(row))?;
        written += 1;
        on_row(written);
    }

    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> DenormalizedPage {
        DenormalizedPage {
            page_id: 1,
            title: "A".to_string(),
            views: 5,
            text: "hello".to_string(),
            project_name: None,
            namespace_name: None,
            categories: Some("X; Y".to_string()),
            edit_count: 3,
            view_count: 0,
            comment_count: 1,
        }
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_csv_line_with_nulls() {
        let line = csv_line(&sample_row());
        assert_eq!(line, "1,A,5,hello,,,X; Y,3,0,1");
    }

    #[test]
    fn test_csv_line_quotes_text() {
        let mut row = sample_row();
        row.text = "hello, world".to_string();
        let line = csv_line(&row);
        assert_eq!(line, "1,A,5,\"hello, world\",,,X; Y,3,0,1");
    }

    #[test]
    fn test_write_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.csv");

        let written = write_csv(&path, &[sample_row()], |_| {}).unwrap();
        assert_eq!(written, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(lines.next(), Some("1,A,5,hello,,,X; Y,3,0,1"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_csv_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.csv");

        write_csv(&path, &[sample_row(), sample_row()], |_| {}).unwrap();
        write_csv(&path, &[sample_row()], |_| {}).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2); // header + one row
    }

    #[test]
    fn test_validate_output_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(&dir.path().join("out.csv")).is_ok());
        // The writability probe cleans up after itself
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let missing = dir.path().join("no-such-dir").join("out.csv");
        let err = validate_output_path(&missing).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_validate_output_path_rejects_file_as_parent() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let err = validate_output_path(&blocker.join("out.csv")).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_classify_db_error() {
        use crate::repository::util::to_diesel_error;

        let schema = classify_db_error(to_diesel_error("no such table: page"));
        assert_eq!(schema.kind(), "schema");

        let resource = classify_db_error(to_diesel_error("database or disk is full"));
        assert_eq!(resource.kind(), "resource");

        let other = classify_db_error(to_diesel_error("constraint failed"));
        assert_eq!(other.kind(), "query");

        let not_db = classify_db_error(DieselError::NotFound);
        assert_eq!(not_db.kind(), "query");
    }
}
