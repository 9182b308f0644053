//! Minimal CSV row encoding for run logs
//!
//! Fields containing a delimiter, quote or line break are quoted and inner
//! quotes doubled, as in RFC 4180. Rows end with `\r\n`.

use crate::{NormalizedPath, Result, io};

/// Encode a single row.
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        let field = field.as_ref();
        if field.contains([',', '"', '\n', '\r']) {
            line.push('"');
            line.push_str(&field.replace('"', "\"\""));
            line.push('"');
        } else {
            line.push_str(field);
        }
    }
    line.push_str("\r\n");
    line
}

/// Encode and atomically write all rows to `path`.
pub fn write_rows<S: AsRef<str>>(path: &NormalizedPath, rows: &[Vec<S>]) -> Result<()> {
    let content: String = rows.iter().map(|row| encode_row(row)).collect();
    io::write_text(path, &content)
}
