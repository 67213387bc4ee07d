use thiserror::Error;

/// Represents hard failures that abort a parse.
///
/// Only file-level conditions are surfaced this way: failure to open or read
/// the source, an empty input, or an input whose encoding could not be
/// decoded at all. Everything recoverable (malformed lines, orphaned lines,
/// illegal continuations, suspect values) is reported through the
/// [`ErrorCollector`](crate::diagnostics::ErrorCollector) instead, and the
/// parse continues.
#[derive(Debug, Error)]
pub enum GedcomError {
    /// The input contained no GEDCOM lines at all.
    #[error("empty input: no GEDCOM lines found")]
    EmptyInput,

    /// An I/O error while opening or reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input bytes could not be decoded with any supported encoding.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A streaming handler asked for the parse to stop.
    ///
    /// The message is the handler's own failure text, surfaced verbatim.
    #[error("handler aborted parsing: {0}")]
    Handler(String),
}

#[cfg(test)]
mod tests {
    use super::GedcomError;

    #[test]
    fn test_empty_input_display() {
        let err = GedcomError::EmptyInput;
        assert_eq!(format!("{err}"), "empty input: no GEDCOM lines found");
    }

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err = GedcomError::Io(io_err);
        assert_eq!(format!("{err}"), "I/O error: File not found");
    }

    #[test]
    fn test_encoding_error_display() {
        let err = GedcomError::Encoding("odd number of UTF-16 bytes".to_string());
        assert_eq!(
            format!("{err}"),
            "encoding error: odd number of UTF-16 bytes"
        );
    }
}
