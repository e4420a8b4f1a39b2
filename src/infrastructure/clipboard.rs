use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(#[from] arboard::Error),
    #[error("clipboard text is not tabular: {0}")]
    Parse(#[from] csv::Error),
}

/// Access to the system clipboard.
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn get_text() -> Result<String, ClipboardError> {
        Ok(Clipboard::new()?.get_text()?)
    }

    pub fn set_text(text: &str) -> Result<(), ClipboardError> {
        Clipboard::new()?.set_text(text)?;
        Ok(())
    }
}

/// Splits tab-separated clipboard text into rows of values.
///
/// Rows may have different lengths; quoting follows the usual CSV rules.
pub fn parse_tsv(text: &str) -> Result<Vec<Vec<String>>, ClipboardError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tsv_block() {
        let rows = parse_tsv("a\tb\tc\n1\t2\n").unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                vec!["1".to_string(), "2".to_string()],
            ]
        );
    }

    #[test]
    fn test_parse_tsv_single_value() {
        assert_eq!(parse_tsv("hello").unwrap(), vec![vec!["hello".to_string()]]);
    }

    #[test]
    fn test_parse_tsv_quoted_tab() {
        let rows = parse_tsv("\"x\ty\"\tz").unwrap();
        assert_eq!(rows, vec![vec!["x\ty".to_string(), "z".to_string()]]);
    }

    #[test]
    fn test_parse_tsv_empty() {
        assert!(parse_tsv("").unwrap().is_empty());
    }
}
