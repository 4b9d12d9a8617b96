//! Error types and handling for slimbuf

/// Result type alias for slimbuf operations
pub type Result<T> = std::result::Result<T, SlimError>;

/// Error types for pooled buffers, writers, readers and stream bridges
#[derive(Debug, thiserror::Error)]
pub enum SlimError {
    /// I/O failure reported by the stream behind a chunk bridge
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A value fell outside the range accepted by the callee
    #[error("Out of range: {parameter} = {value}, maximum is {max}")]
    OutOfRange {
        parameter: String,
        value: usize,
        max: usize,
    },

    /// A request is larger than a fixed capacity (stream chunk, swap buffer)
    #[error("Capacity exceeded: requested {requested}, capacity {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    /// The buffer or stream ended before enough bytes were available
    #[error("Unexpected end of {source_kind}: needed {needed} bytes, {available} available")]
    UnexpectedEnd {
        source_kind: &'static str,
        needed: usize,
        available: usize,
    },

    /// Operation not valid in the current mode (e.g. buffer-only member on a stream)
    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    /// Invalid parameters or configuration
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Text could not be encoded or decoded
    #[error("Encoding error: {message}")]
    Encoding { message: String },

    /// Region id was never allocated by this buffer
    #[error("Region not found: {id}")]
    RegionNotFound { id: u32 },
}

impl SlimError {
    /// Create an I/O error from a standard I/O error
    pub fn from_io(source: std::io::Error, context: &str) -> Self {
        Self::Io {
            message: format!("{}: {}", context, source),
            source: Some(source),
        }
    }

    /// Create an out of range error
    pub fn out_of_range(parameter: impl Into<String>, value: usize, max: usize) -> Self {
        Self::OutOfRange {
            parameter: parameter.into(),
            value,
            max,
        }
    }

    /// Create a capacity exceeded error
    pub fn capacity_exceeded(requested: usize, capacity: usize) -> Self {
        Self::CapacityExceeded {
            requested,
            capacity,
        }
    }

    /// Create an unexpected end error for a buffer
    pub fn end_of_buffer(needed: usize, available: usize) -> Self {
        Self::UnexpectedEnd {
            source_kind: "buffer",
            needed,
            available,
        }
    }

    /// Create an unexpected end error for a stream
    pub fn end_of_stream(needed: usize, available: usize) -> Self {
        Self::UnexpectedEnd {
            source_kind: "stream",
            needed,
            available,
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Create a region not found error
    pub fn region_not_found(id: u32) -> Self {
        Self::RegionNotFound { id }
    }

    /// True when the error reports running out of input
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::UnexpectedEnd { .. })
    }
}

impl From<std::io::Error> for SlimError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io(err, "I/O operation failed")
    }
}

impl From<std::str::Utf8Error> for SlimError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::encoding(format!("invalid UTF-8: {}", err))
    }
}

impl From<std::string::FromUtf16Error> for SlimError {
    fn from(err: std::string::FromUtf16Error) -> Self {
        Self::encoding(format!("invalid UTF-16: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SlimError::out_of_range("position", 11, 10);
        assert!(matches!(err, SlimError::OutOfRange { .. }));

        let err = SlimError::end_of_stream(4, 1);
        assert!(err.is_end_of_input());

        let err = SlimError::capacity_exceeded(2048, 1024);
        assert!(matches!(err, SlimError::CapacityExceeded { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = SlimError::out_of_range("position", 11, 10);
        let display = format!("{}", err);
        assert!(display.contains("Out of range"));
        assert!(display.contains("position"));

        let err = SlimError::end_of_buffer(8, 3);
        assert_eq!(
            err.to_string(),
            "Unexpected end of buffer: needed 8 bytes, 3 available"
        );
    }

    #[test]
    fn test_io_conversion_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: SlimError = io.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
