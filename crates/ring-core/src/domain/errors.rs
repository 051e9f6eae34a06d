pub type RingResult<T> = Result<T, RingError>;

/// What went wrong, independent of where it was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotNumeric,
    OutOfBounds,
    /// A name outside a fixed set, such as a particle species.
    UnknownName,
    InputCount,
    EmptyCollection,
    UnknownElementType,
    InvalidState,
    Engine,
    Config,
    Usage,
    Io,
}

impl ErrorKind {
    pub const fn category(self) -> ErrorCategory {
        match self {
            Self::NotNumeric
            | Self::OutOfBounds
            | Self::UnknownName
            | Self::InputCount
            | Self::Usage => {
                ErrorCategory::InputValidation
            }
            Self::EmptyCollection | Self::InvalidState => ErrorCategory::SessionState,
            Self::UnknownElementType | Self::Engine => ErrorCategory::Engine,
            Self::Config | Self::Io => ErrorCategory::IoSystem,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotNumeric => "NotNumeric",
            Self::OutOfBounds => "OutOfBounds",
            Self::UnknownName => "UnknownName",
            Self::InputCount => "InputCount",
            Self::EmptyCollection => "EmptyCollection",
            Self::UnknownElementType => "UnknownElementType",
            Self::InvalidState => "InvalidState",
            Self::Engine => "Engine",
            Self::Config => "Config",
            Self::Usage => "Usage",
            Self::Io => "Io",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InputValidation,
    SessionState,
    Engine,
    IoSystem,
}

impl ErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidation => 2,
            Self::SessionState => 3,
            Self::Engine => 4,
            Self::IoSystem => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidation => "InputValidationError",
            Self::SessionState => "SessionStateError",
            Self::Engine => "EngineError",
            Self::IoSystem => "IoSystemError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} [{placeholder}] {message}", .kind.category().as_str())]
pub struct RingError {
    kind: ErrorKind,
    placeholder: &'static str,
    message: String,
}

impl RingError {
    pub fn new(kind: ErrorKind, placeholder: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            placeholder,
            message: message.into(),
        }
    }

    pub fn not_numeric(raw: &str) -> Self {
        Self::new(
            ErrorKind::NotNumeric,
            "INPUT.NOT_NUMERIC",
            format!("'{}' must be numerical", raw.trim()),
        )
    }

    pub fn out_of_bounds(value: f64, lower: f64, upper: f64) -> Self {
        Self::new(
            ErrorKind::OutOfBounds,
            "INPUT.OUT_OF_BOUNDS",
            format!("{value:?} not in bounds [{lower:?}, {upper:?}]"),
        )
    }

    pub fn input_count(expected: usize, actual: usize) -> Self {
        Self::new(
            ErrorKind::InputCount,
            "INPUT.COUNT",
            format!("expected {expected} values, got {actual}"),
        )
    }

    pub fn empty_collection(target: &str) -> Self {
        Self::new(
            ErrorKind::EmptyCollection,
            "STATE.EMPTY",
            format!("{target} is already empty"),
        )
    }

    pub fn unknown_element_type(name: &str) -> Self {
        Self::new(
            ErrorKind::UnknownElementType,
            "ENGINE.UNKNOWN_ELEMENT",
            format!("no colour key for engine element type '{name}'"),
        )
    }

    pub fn invalid_state(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState, placeholder, message)
    }

    pub fn engine(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Engine, placeholder, message)
    }

    pub fn config(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, placeholder, message)
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub const fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.kind.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCategory, ErrorKind, RingError};

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (ErrorKind::NotNumeric, ErrorCategory::InputValidation, 2),
            (ErrorKind::OutOfBounds, ErrorCategory::InputValidation, 2),
            (ErrorKind::UnknownName, ErrorCategory::InputValidation, 2),
            (ErrorKind::InputCount, ErrorCategory::InputValidation, 2),
            (ErrorKind::EmptyCollection, ErrorCategory::SessionState, 3),
            (ErrorKind::InvalidState, ErrorCategory::SessionState, 3),
            (ErrorKind::UnknownElementType, ErrorCategory::Engine, 4),
            (ErrorKind::Engine, ErrorCategory::Engine, 4),
            (ErrorKind::Config, ErrorCategory::IoSystem, 5),
            (ErrorKind::Usage, ErrorCategory::InputValidation, 2),
            (ErrorKind::Io, ErrorCategory::IoSystem, 5),
        ];

        for (kind, category, exit_code) in cases {
            assert_eq!(kind.category(), category);
            assert_eq!(category.exit_code(), exit_code);
        }
    }

    #[test]
    fn display_and_diagnostic_lines_carry_placeholder() {
        let error = RingError::not_numeric(" abc ");

        assert_eq!(error.kind(), ErrorKind::NotNumeric);
        assert_eq!(
            error.to_string(),
            "InputValidationError [INPUT.NOT_NUMERIC] 'abc' must be numerical"
        );
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INPUT.NOT_NUMERIC] 'abc' must be numerical"
        );
    }

    #[test]
    fn out_of_bounds_message_uses_round_trippable_floats() {
        let error = RingError::out_of_bounds(5.0, 0.0, 1.0);
        assert_eq!(error.message(), "5.0 not in bounds [0.0, 1.0]");
        assert_eq!(error.exit_code(), 2);
    }
}
