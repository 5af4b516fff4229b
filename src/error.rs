//! When serializing, deserializing or coercing a shape goes wrong.

use crate::schema::ShapeType;
use std::error;
use std::fmt::{self, Debug, Display};
use std::io;
use std::result;

/// This type represents all possible errors that can occur when serializing,
/// deserializing or coercing shapes and documents.
pub struct Error {
    /// This `Box` allows us to keep the size of `Error` as small as possible. A
    /// larger `Error` type was substantially slower due to all the functions
    /// that pass around `Result<T, Error>`.
    err: Box<ErrorImpl>,
}

/// Alias for a `Result` with the error type `shape_serde::Error`.
pub type Result<T> = result::Result<T, Error>;

impl Error {
    /// One-based line number at which the error was detected.
    ///
    /// Zero when the error did not come from parsing wire input, for example a
    /// failed document coercion.
    pub fn line(&self) -> usize {
        self.err.line
    }

    /// One-based column number at which the error was detected.
    ///
    /// Zero when the error did not come from parsing wire input.
    pub fn column(&self) -> usize {
        self.err.column
    }

    /// Specifies the cause of this error.
    pub fn code(&self) -> &ErrorCode {
        &self.err.code
    }

    /// Categorizes the cause of this error.
    ///
    /// - `Category::TypeCoercion` - a value was requested as a kind it cannot
    ///   be converted to
    /// - `Category::Io` - failure to read or write bytes on an IO stream
    /// - `Category::Syntax` - input that is not syntactically valid
    /// - `Category::Data` - input or shapes that are semantically incorrect
    /// - `Category::Eof` - unexpected end of the input data
    pub fn classify(&self) -> Category {
        match self.err.code {
            ErrorCode::TypeCoercion { .. } | ErrorCode::InvalidType { .. } => {
                Category::TypeCoercion
            }
            ErrorCode::Message(_)
            | ErrorCode::InvalidBase64
            | ErrorCode::InvalidTimestamp(_)
            | ErrorCode::InvalidShapeId(_)
            | ErrorCode::UnknownMember { .. }
            | ErrorCode::SchemaMismatch(_)
            | ErrorCode::EmptyUnion(_)
            | ErrorCode::MultipleUnionValues(_) => Category::Data,
            ErrorCode::Io(_) => Category::Io,
            ErrorCode::EofWhileParsingList
            | ErrorCode::EofWhileParsingObject
            | ErrorCode::EofWhileParsingString
            | ErrorCode::EofWhileParsingValue => Category::Eof,
            ErrorCode::ExpectedColon
            | ErrorCode::ExpectedListCommaOrEnd
            | ErrorCode::ExpectedObjectCommaOrEnd
            | ErrorCode::ExpectedSomeIdent
            | ErrorCode::ExpectedSomeValue
            | ErrorCode::InvalidEscape
            | ErrorCode::InvalidNumber
            | ErrorCode::NumberOutOfRange
            | ErrorCode::InvalidUnicodeCodePoint
            | ErrorCode::ControlCharacterWhileParsingString
            | ErrorCode::KeyMustBeAString
            | ErrorCode::LoneLeadingSurrogateInHexEscape
            | ErrorCode::TrailingComma
            | ErrorCode::TrailingCharacters
            | ErrorCode::UnexpectedEndOfHexEscape
            | ErrorCode::RecursionLimitExceeded => Category::Syntax,
        }
    }

    /// Returns true if a value was requested as a kind that it cannot be
    /// coerced to.
    pub fn is_type_coercion(&self) -> bool {
        self.classify() == Category::TypeCoercion
    }

    /// Returns true for every failure that is not a type coercion: malformed
    /// input, IO failures, invalid shapes and schema mismatches.
    pub fn is_serialization(&self) -> bool {
        !self.is_type_coercion()
    }

    /// Returns true if this error was caused by a failure to read or write
    /// bytes on an IO stream.
    pub fn is_io(&self) -> bool {
        self.classify() == Category::Io
    }

    /// Returns true if this error was caused by input that was not
    /// syntactically valid.
    pub fn is_syntax(&self) -> bool {
        self.classify() == Category::Syntax
    }

    /// Returns true if this error was caused by input data or shapes that
    /// were semantically incorrect.
    pub fn is_data(&self) -> bool {
        self.classify() == Category::Data
    }

    /// Returns true if this error was caused by prematurely reaching the end of
    /// the input data.
    pub fn is_eof(&self) -> bool {
        self.classify() == Category::Eof
    }
}

/// Categorizes the cause of a `shape_serde::Error`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Category {
    /// A value was requested as a kind it cannot be converted to.
    TypeCoercion,

    /// The error was caused by a failure to read or write bytes on an IO
    /// stream.
    Io,

    /// The error was caused by input that was not syntactically valid.
    Syntax,

    /// The error was caused by input data or shapes that were semantically
    /// incorrect.
    Data,

    /// The error was caused by prematurely reaching the end of the input data.
    Eof,
}

#[allow(clippy::fallible_impl_from)]
impl From<Error> for io::Error {
    /// Convert a `shape_serde::Error` into an `io::Error`.
    ///
    /// Syntax, data and coercion errors are turned into `InvalidData` IO
    /// errors. EOF errors are turned into `UnexpectedEof` IO errors.
    fn from(j: Error) -> Self {
        if let ErrorCode::Io(err) = j.err.code {
            err
        } else {
            match j.classify() {
                Category::Io => unreachable!(),
                Category::Syntax | Category::Data | Category::TypeCoercion => {
                    io::Error::new(io::ErrorKind::InvalidData, j)
                }
                Category::Eof => io::Error::new(io::ErrorKind::UnexpectedEof, j),
            }
        }
    }
}

struct ErrorImpl {
    code: ErrorCode,
    line: usize,
    column: usize,
}

/// This type describes all possible errors that can occur when serializing,
/// deserializing or coercing shapes.
pub enum ErrorCode {
    /// Catchall for error messages
    Message(Box<str>),

    /// A document was asked for a kind it cannot be converted to.
    TypeCoercion {
        /// The kind that was requested.
        expected: ShapeType,
        /// The kind the document actually holds.
        actual: ShapeType,
    },

    /// The wire carried a different kind of value than the schema expects.
    InvalidType {
        /// The kind the schema asked for.
        expected: ShapeType,
        /// Description of the token found on the wire.
        found: &'static str,
    },

    /// Some IO error occurred while serializing or deserializing.
    Io(io::Error),

    /// A blob was not valid base64.
    InvalidBase64,

    /// A timestamp could not be parsed or represented.
    InvalidTimestamp(Box<str>),

    /// A shape id was not of the form `namespace#Name$member`.
    InvalidShapeId(Box<str>),

    /// A container that forbids unknown members received one.
    UnknownMember {
        /// The shape id of the container.
        container: Box<str>,
        /// The unrecognized field name.
        member: Box<str>,
    },

    /// A value could not be written against the schema it was redirected to.
    SchemaMismatch(Box<str>),

    /// A union was built without a value.
    EmptyUnion(Box<str>),

    /// A union was built with more than one value.
    MultipleUnionValues(Box<str>),

    /// EOF while parsing a list.
    EofWhileParsingList,

    /// EOF while parsing an object.
    EofWhileParsingObject,

    /// EOF while parsing a string.
    EofWhileParsingString,

    /// EOF while parsing a JSON value.
    EofWhileParsingValue,

    /// Expected this character to be a `':'`.
    ExpectedColon,

    /// Expected this character to be either a `','` or a `']'`.
    ExpectedListCommaOrEnd,

    /// Expected this character to be either a `','` or a `'}'`.
    ExpectedObjectCommaOrEnd,

    /// Expected to parse either a `true`, `false`, or a `null`.
    ExpectedSomeIdent,

    /// Expected this character to start a JSON value.
    ExpectedSomeValue,

    /// Invalid hex escape code.
    InvalidEscape,

    /// Invalid number.
    InvalidNumber,

    /// Number is bigger than the maximum value of its type.
    NumberOutOfRange,

    /// Invalid unicode code point.
    InvalidUnicodeCodePoint,

    /// Control character found while parsing a string.
    ControlCharacterWhileParsingString,

    /// Object key is not a string.
    KeyMustBeAString,

    /// Lone leading surrogate in hex escape.
    LoneLeadingSurrogateInHexEscape,

    /// JSON has a comma after the last value in an array or map.
    TrailingComma,

    /// JSON has non-whitespace trailing characters after the value.
    TrailingCharacters,

    /// Unexpected end of hex escape.
    UnexpectedEndOfHexEscape,

    /// Encountered nesting of JSON maps and arrays more than 128 layers deep.
    RecursionLimitExceeded,
}

impl Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Io(_) => f.debug_tuple("Io").finish(),
            error_code => Display::fmt(error_code, f),
        }
    }
}

impl PartialEq for ErrorCode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ErrorCode::Message(l0), ErrorCode::Message(r0)) => l0 == r0,
            (
                ErrorCode::TypeCoercion {
                    expected: l0,
                    actual: l1,
                },
                ErrorCode::TypeCoercion {
                    expected: r0,
                    actual: r1,
                },
            ) => l0 == r0 && l1 == r1,
            (
                ErrorCode::InvalidType {
                    expected: l0,
                    found: l1,
                },
                ErrorCode::InvalidType {
                    expected: r0,
                    found: r1,
                },
            ) => l0 == r0 && l1 == r1,
            (ErrorCode::InvalidTimestamp(l0), ErrorCode::InvalidTimestamp(r0))
            | (ErrorCode::InvalidShapeId(l0), ErrorCode::InvalidShapeId(r0))
            | (ErrorCode::SchemaMismatch(l0), ErrorCode::SchemaMismatch(r0))
            | (ErrorCode::EmptyUnion(l0), ErrorCode::EmptyUnion(r0))
            | (ErrorCode::MultipleUnionValues(l0), ErrorCode::MultipleUnionValues(r0)) => {
                l0 == r0
            }
            (
                ErrorCode::UnknownMember {
                    container: l0,
                    member: l1,
                },
                ErrorCode::UnknownMember {
                    container: r0,
                    member: r1,
                },
            ) => l0 == r0 && l1 == r1,
            (ErrorCode::Io(_), ErrorCode::Io(_)) => true,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl Error {
    #[cold]
    pub(crate) fn syntax(code: ErrorCode, line: usize, column: usize) -> Self {
        Error {
            err: Box::new(ErrorImpl { code, line, column }),
        }
    }

    /// An error without a position, for failures that are not tied to a
    /// location in wire input.
    #[cold]
    pub(crate) fn data(code: ErrorCode) -> Self {
        Error::syntax(code, 0, 0)
    }

    #[cold]
    pub(crate) fn io(error: io::Error) -> Self {
        Error::data(ErrorCode::Io(error))
    }

    /// Reports that a value of kind `actual` cannot be converted to `expected`.
    #[cold]
    pub fn type_coercion(expected: ShapeType, actual: ShapeType) -> Self {
        Error::data(ErrorCode::TypeCoercion { expected, actual })
    }

    /// Builds an error from a free-form message.
    ///
    /// Shape builders use this to report failures of their own, such as a
    /// missing member.
    #[cold]
    pub fn custom<T: Display>(msg: T) -> Self {
        Error::data(ErrorCode::Message(msg.to_string().into_boxed_str()))
    }

    #[cold]
    pub(crate) fn fix_position<F>(self, f: F) -> Self
    where
        F: FnOnce(ErrorCode) -> Error,
    {
        if self.err.line == 0 {
            f(self.err.code)
        } else {
            self
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorCode::Message(msg) => f.write_str(msg),
            ErrorCode::TypeCoercion { expected, actual } => {
                write!(f, "expected {} document, but found {}", expected, actual)
            }
            ErrorCode::InvalidType { expected, found } => {
                write!(f, "invalid type: {}, expected {}", found, expected)
            }
            ErrorCode::Io(err) => Display::fmt(err, f),
            ErrorCode::InvalidBase64 => f.write_str("invalid base64"),
            ErrorCode::InvalidTimestamp(msg) => write!(f, "invalid timestamp: {}", msg),
            ErrorCode::InvalidShapeId(id) => write!(f, "invalid shape id `{}`", id),
            ErrorCode::UnknownMember { container, member } => {
                write!(f, "unknown member `{}` of {}", member, container)
            }
            ErrorCode::SchemaMismatch(msg) => f.write_str(msg),
            ErrorCode::EmptyUnion(id) => write!(f, "no value set for union {}", id),
            ErrorCode::MultipleUnionValues(id) => {
                write!(f, "more than one value set for union {}", id)
            }
            ErrorCode::EofWhileParsingList => f.write_str("EOF while parsing a list"),
            ErrorCode::EofWhileParsingObject => f.write_str("EOF while parsing an object"),
            ErrorCode::EofWhileParsingString => f.write_str("EOF while parsing a string"),
            ErrorCode::EofWhileParsingValue => f.write_str("EOF while parsing a value"),
            ErrorCode::ExpectedColon => f.write_str("expected `:`"),
            ErrorCode::ExpectedListCommaOrEnd => f.write_str("expected `,` or `]`"),
            ErrorCode::ExpectedObjectCommaOrEnd => f.write_str("expected `,` or `}`"),
            ErrorCode::ExpectedSomeIdent => f.write_str("expected ident"),
            ErrorCode::ExpectedSomeValue => f.write_str("expected value"),
            ErrorCode::InvalidEscape => f.write_str("invalid escape"),
            ErrorCode::InvalidNumber => f.write_str("invalid number"),
            ErrorCode::NumberOutOfRange => f.write_str("number out of range"),
            ErrorCode::InvalidUnicodeCodePoint => f.write_str("invalid unicode code point"),
            ErrorCode::ControlCharacterWhileParsingString => {
                f.write_str("control character (\\u0000-\\u001F) found while parsing a string")
            }
            ErrorCode::KeyMustBeAString => f.write_str("key must be a string"),
            ErrorCode::LoneLeadingSurrogateInHexEscape => {
                f.write_str("lone leading surrogate in hex escape")
            }
            ErrorCode::TrailingComma => f.write_str("trailing comma"),
            ErrorCode::TrailingCharacters => f.write_str("trailing characters"),
            ErrorCode::UnexpectedEndOfHexEscape => f.write_str("unexpected end of hex escape"),
            ErrorCode::RecursionLimitExceeded => f.write_str("recursion limit exceeded"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.err.code {
            ErrorCode::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&*self.err, f)
    }
}

impl Display for ErrorImpl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.line == 0 {
            Display::fmt(&self.code, f)
        } else {
            write!(
                f,
                "{} at line {} column {}",
                self.code, self.line, self.column
            )
        }
    }
}

// Remove two layers of verbosity from the debug representation. Humans often
// end up seeing this representation because it is what unwrap() shows.
impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Error({:?}, line: {}, column: {})",
            self.err.code.to_string(),
            self.err.line,
            self.err.column
        )
    }
}

impl From<io::Error> for Error {
    #[cold]
    fn from(error: io::Error) -> Self {
        Error::io(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_is_not_serialization() {
        let err = Error::type_coercion(ShapeType::Integer, ShapeType::String);
        assert!(err.is_type_coercion());
        assert!(!err.is_serialization());
        assert_eq!(err.to_string(), "expected integer document, but found string");
    }

    #[test]
    fn position_in_display() {
        let err = Error::syntax(ErrorCode::ExpectedColon, 3, 7);
        assert!(err.is_syntax());
        assert!(err.is_serialization());
        assert_eq!(err.to_string(), "expected `:` at line 3 column 7");
        assert_eq!(
            format!("{:?}", err),
            "Error(\"expected `:`\", line: 3, column: 7)"
        );
    }

    #[test]
    fn io_errors_unwrap() {
        let err = Error::io(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(err.is_io());
        let io: io::Error = err.into();
        assert_eq!(io.kind(), io::ErrorKind::BrokenPipe);
    }
}
