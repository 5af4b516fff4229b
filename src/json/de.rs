use super::read::{IoRead, Read, SliceRead};
use super::settings::JsonSettings;
use crate::de::{ElementConsumer, EntryConsumer, ShapeDeserializer, StructMemberConsumer};
use crate::document::{special_float, BigDecimal, BigInteger, Document, Map, DISCRIMINATOR};
use crate::error::{Error, ErrorCode, Result};
use crate::schema::{Schema, ShapeType};
use crate::timestamp;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use std::io;

/// A structure that reads shapes out of JSON.
///
/// Every `read_*` call consumes exactly one JSON value. Call
/// [`finish`](ShapeDeserializer::finish) after the last read to reject
/// trailing characters.
pub struct JsonDeserializer<'s, R> {
    read: R,
    scratch: Vec<u8>,
    number: String,
    remaining_depth: u8,
    settings: &'s JsonSettings,
}

impl<'s, 'de, R> JsonDeserializer<'s, R>
where
    R: Read<'de>,
{
    /// Create a JSON deserializer from one of the possible shape_serde input
    /// sources.
    ///
    /// Typically it is more convenient to use one of these methods instead:
    ///
    ///   - JsonDeserializer::from_slice
    ///   - JsonDeserializer::from_reader
    pub fn new(read: R, settings: &'s JsonSettings) -> Self {
        JsonDeserializer {
            read,
            scratch: Vec::new(),
            number: String::new(),
            remaining_depth: 128,
            settings,
        }
    }
}

impl<'s, R> JsonDeserializer<'s, IoRead<R>>
where
    R: io::Read,
{
    /// Creates a JSON deserializer from an `io::Read`.
    ///
    /// Reader-based deserializers do not perform any buffering. Wrap
    /// unbuffered sources such as a `File` in a `BufReader`.
    pub fn from_reader(reader: R, settings: &'s JsonSettings) -> Self {
        JsonDeserializer::new(IoRead::new(reader), settings)
    }
}

impl<'s, 'a> JsonDeserializer<'s, SliceRead<'a>> {
    /// Creates a JSON deserializer from a `&[u8]`.
    pub fn from_slice(bytes: &'a [u8], settings: &'s JsonSettings) -> Self {
        JsonDeserializer::new(SliceRead::new(bytes), settings)
    }
}

enum Field<'a> {
    Member(&'a Schema),
    Discriminator,
    Unknown(String),
}

impl<'de, R: Read<'de>> JsonDeserializer<'_, R> {
    /// Checks that nothing but whitespace follows the last value read.
    fn end(&mut self) -> Result<()> {
        match tri!(self.parse_whitespace()) {
            Some(_) => Err(self.peek_error(ErrorCode::TrailingCharacters)),
            None => Ok(()),
        }
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        self.read.peek()
    }

    fn peek_or_null(&mut self) -> Result<u8> {
        Ok(tri!(self.peek()).unwrap_or(b'\x00'))
    }

    fn eat_char(&mut self) {
        self.read.discard();
    }

    fn next_char(&mut self) -> Result<Option<u8>> {
        self.read.next()
    }

    fn next_char_or_null(&mut self) -> Result<u8> {
        Ok(tri!(self.next_char()).unwrap_or(b'\x00'))
    }

    /// Error caused by a byte from next_char().
    #[cold]
    fn error(&self, reason: ErrorCode) -> Error {
        let position = self.read.position();
        Error::syntax(reason, position.line, position.column)
    }

    /// Error caused by a byte from peek().
    #[cold]
    fn peek_error(&self, reason: ErrorCode) -> Error {
        let position = self.read.peek_position();
        Error::syntax(reason, position.line, position.column)
    }

    /// Returns the first non-whitespace byte without consuming it, or `None` if
    /// EOF is encountered.
    fn parse_whitespace(&mut self) -> Result<Option<u8>> {
        loop {
            match tri!(self.peek()) {
                Some(b' ' | b'\n' | b'\t' | b'\r') => {
                    self.eat_char();
                }
                other => {
                    return Ok(other);
                }
            }
        }
    }

    /// Describes the value about to be read as the wrong kind for `expected`.
    #[cold]
    fn peek_invalid_type(&mut self, expected: ShapeType) -> Error {
        let found = match self.parse_whitespace() {
            Err(err) => return err,
            Ok(None) => return self.peek_error(ErrorCode::EofWhileParsingValue),
            Ok(Some(b'n')) => "null",
            Ok(Some(b't' | b'f')) => "boolean",
            Ok(Some(b'"')) => "string",
            Ok(Some(b'-' | b'0'..=b'9')) => "number",
            Ok(Some(b'[')) => "list",
            Ok(Some(b'{')) => "object",
            Ok(Some(_)) => return self.peek_error(ErrorCode::ExpectedSomeValue),
        };
        self.peek_error(ErrorCode::InvalidType { expected, found })
    }

    fn parse_ident(&mut self, ident: &[u8]) -> Result<()> {
        for expected in ident {
            match tri!(self.next_char()) {
                None => {
                    return Err(self.error(ErrorCode::EofWhileParsingValue));
                }
                Some(next) => {
                    if next != *expected {
                        return Err(self.error(ErrorCode::ExpectedSomeIdent));
                    }
                }
            }
        }
        Ok(())
    }

    fn parse_object_colon(&mut self) -> Result<()> {
        match tri!(self.parse_whitespace()) {
            Some(b':') => {
                self.eat_char();
                Ok(())
            }
            Some(_) => Err(self.peek_error(ErrorCode::ExpectedColon)),
            None => Err(self.peek_error(ErrorCode::EofWhileParsingObject)),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.remaining_depth -= 1;
        if self.remaining_depth == 0 {
            return Err(self.peek_error(ErrorCode::RecursionLimitExceeded));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.remaining_depth += 1;
    }

    /// Moves past the separator in front of the next list element. Returns
    /// false, having consumed the `]`, when the list is done.
    fn has_next_element(&mut self, first: &mut bool) -> Result<bool> {
        let peek = match tri!(self.parse_whitespace()) {
            Some(b']') => {
                self.eat_char();
                return Ok(false);
            }
            Some(b',') if !*first => {
                self.eat_char();
                tri!(self.parse_whitespace())
            }
            Some(b) => {
                if *first {
                    *first = false;
                    Some(b)
                } else {
                    return Err(self.peek_error(ErrorCode::ExpectedListCommaOrEnd));
                }
            }
            None => {
                return Err(self.peek_error(ErrorCode::EofWhileParsingList));
            }
        };

        match peek {
            Some(b']') => Err(self.peek_error(ErrorCode::TrailingComma)),
            Some(_) => Ok(true),
            None => Err(self.peek_error(ErrorCode::EofWhileParsingList)),
        }
    }

    /// Moves past the separator in front of the next object key, leaving the
    /// opening quote of the key to be read. Returns false, having consumed the
    /// `}`, when the object is done.
    fn has_next_key(&mut self, first: &mut bool) -> Result<bool> {
        let peek = match tri!(self.parse_whitespace()) {
            Some(b'}') => {
                self.eat_char();
                return Ok(false);
            }
            Some(b',') if !*first => {
                self.eat_char();
                tri!(self.parse_whitespace())
            }
            Some(b) => {
                if *first {
                    *first = false;
                    Some(b)
                } else {
                    return Err(self.peek_error(ErrorCode::ExpectedObjectCommaOrEnd));
                }
            }
            None => {
                return Err(self.peek_error(ErrorCode::EofWhileParsingObject));
            }
        };

        match peek {
            Some(b'"') => Ok(true),
            Some(b'}') => Err(self.peek_error(ErrorCode::TrailingComma)),
            Some(_) => Err(self.peek_error(ErrorCode::KeyMustBeAString)),
            None => Err(self.peek_error(ErrorCode::EofWhileParsingObject)),
        }
    }

    /// Reads an object key and the colon after it.
    fn parse_key(&mut self) -> Result<String> {
        self.eat_char();
        self.scratch.clear();
        let key = (*tri!(self.read.parse_str(&mut self.scratch))).to_owned();
        tri!(self.parse_object_colon());
        Ok(key)
    }

    /// Reads a string value, failing with an invalid type error for any other
    /// kind of value.
    fn parse_string(&mut self, expected: ShapeType) -> Result<String> {
        match tri!(self.parse_whitespace()) {
            Some(b'"') => {
                self.eat_char();
                self.scratch.clear();
                let s = tri!(self.read.parse_str(&mut self.scratch));
                Ok((*s).to_owned())
            }
            _ => Err(self.peek_invalid_type(expected)),
        }
    }

    /// Copies the number token at the cursor into `self.number`. Returns
    /// whether it has a fraction or an exponent.
    fn scan_number(&mut self) -> Result<bool> {
        self.number.clear();
        let mut decimal = false;

        if tri!(self.peek()) == Some(b'-') {
            self.eat_char();
            self.number.push('-');
        }

        match tri!(self.next_char_or_null()) {
            b'0' => {
                self.number.push('0');
                // There can be only one leading '0'.
                if let b'0'..=b'9' = tri!(self.peek_or_null()) {
                    return Err(self.peek_error(ErrorCode::InvalidNumber));
                }
            }
            c @ b'1'..=b'9' => {
                self.number.push(c as char);
                tri!(self.scan_digits());
            }
            _ => {
                return Err(self.error(ErrorCode::InvalidNumber));
            }
        }

        if tri!(self.peek_or_null()) == b'.' {
            decimal = true;
            self.eat_char();
            self.number.push('.');
            tri!(self.scan_required_digits());
        }

        if let b'e' | b'E' = tri!(self.peek_or_null()) {
            decimal = true;
            self.eat_char();
            self.number.push('e');
            if let c @ (b'+' | b'-') = tri!(self.peek_or_null()) {
                self.eat_char();
                self.number.push(c as char);
            }
            tri!(self.scan_required_digits());
        }

        Ok(decimal)
    }

    fn scan_digits(&mut self) -> Result<()> {
        while let c @ b'0'..=b'9' = tri!(self.peek_or_null()) {
            self.eat_char();
            self.number.push(c as char);
        }
        Ok(())
    }

    fn scan_required_digits(&mut self) -> Result<()> {
        match tri!(self.next_char_or_null()) {
            c @ b'0'..=b'9' => self.number.push(c as char),
            _ => return Err(self.error(ErrorCode::InvalidNumber)),
        }
        self.scan_digits()
    }

    /// Reads a number token, failing with an invalid type error for any other
    /// kind of value.
    fn parse_number(&mut self, expected: ShapeType) -> Result<bool> {
        match tri!(self.parse_whitespace()) {
            Some(b'-' | b'0'..=b'9') => self.scan_number(),
            _ => Err(self.peek_invalid_type(expected)),
        }
    }

    fn parse_integral(&mut self, expected: ShapeType) -> Result<i64> {
        if tri!(self.parse_number(expected)) {
            return Err(self.error(ErrorCode::InvalidType {
                expected,
                found: "fractional number",
            }));
        }
        match self.number.parse::<i64>() {
            Ok(n) => Ok(n),
            Err(_) => Err(self.error(ErrorCode::NumberOutOfRange)),
        }
    }

    fn narrow<T: TryFrom<i64>>(&self, n: i64) -> Result<T> {
        match T::try_from(n) {
            Ok(n) => Ok(n),
            Err(_) => Err(self.error(ErrorCode::NumberOutOfRange)),
        }
    }

    /// Reads a number, or one of the strings `"NaN"`, `"Infinity"` and
    /// `"-Infinity"`.
    fn parse_float(&mut self, expected: ShapeType) -> Result<f64> {
        match tri!(self.parse_whitespace()) {
            Some(b'-' | b'0'..=b'9') => {
                tri!(self.scan_number());
                match self.number.parse::<f64>() {
                    Ok(n) => Ok(n),
                    Err(_) => Err(self.error(ErrorCode::InvalidNumber)),
                }
            }
            Some(b'"') => {
                self.eat_char();
                self.scratch.clear();
                let s = tri!(self.read.parse_str(&mut self.scratch));
                match special_float(&s) {
                    Some(n) => Ok(n),
                    None => Err(self.error(ErrorCode::InvalidType {
                        expected,
                        found: "string",
                    })),
                }
            }
            _ => Err(self.peek_invalid_type(expected)),
        }
    }

    fn parse_document(&mut self) -> Result<Document> {
        let peek = match tri!(self.parse_whitespace()) {
            Some(b) => b,
            None => {
                return Err(self.peek_error(ErrorCode::EofWhileParsingValue));
            }
        };

        let value = match peek {
            b'n' => {
                self.eat_char();
                tri!(self.parse_ident(b"ull"));
                Document::Null
            }
            b't' => {
                self.eat_char();
                tri!(self.parse_ident(b"rue"));
                Document::Boolean(true)
            }
            b'f' => {
                self.eat_char();
                tri!(self.parse_ident(b"alse"));
                Document::Boolean(false)
            }
            b'-' | b'0'..=b'9' => tri!(self.parse_number_document()),
            b'"' => {
                self.eat_char();
                self.scratch.clear();
                let s = tri!(self.read.parse_str(&mut self.scratch));
                Document::String((*s).to_owned())
            }
            b'[' => {
                tri!(self.enter());
                self.eat_char();
                let mut items = Vec::new();
                let mut first = true;
                while tri!(self.has_next_element(&mut first)) {
                    items.push(tri!(self.parse_document()));
                }
                self.leave();
                Document::List(items)
            }
            b'{' => {
                tri!(self.enter());
                self.eat_char();
                let mut map = Map::new();
                let mut first = true;
                while tri!(self.has_next_key(&mut first)) {
                    let key = tri!(self.parse_key());
                    let value = tri!(self.parse_document());
                    map.insert(key, value);
                }
                self.leave();
                Document::Map(map)
            }
            _ => {
                return Err(self.peek_error(ErrorCode::ExpectedSomeValue));
            }
        };

        Ok(value)
    }

    /// Integers become the narrowest of integer, long and big integer that
    /// holds them. Anything with a fraction or exponent becomes a double.
    fn parse_number_document(&mut self) -> Result<Document> {
        if tri!(self.scan_number()) {
            return match self.number.parse::<f64>() {
                Ok(n) => Ok(Document::Double(n)),
                Err(_) => Err(self.error(ErrorCode::InvalidNumber)),
            };
        }
        match self.number.parse::<i64>() {
            Ok(n) => Ok(match i32::try_from(n) {
                Ok(n) => Document::Integer(n),
                Err(_) => Document::Long(n),
            }),
            Err(_) => self
                .number
                .parse::<BigInteger>()
                .map(Document::BigInteger)
                .map_err(|err| err.fix_position(|code| self.error(code))),
        }
    }

    fn ignore_value(&mut self) -> Result<()> {
        let peek = match tri!(self.parse_whitespace()) {
            Some(b) => b,
            None => {
                return Err(self.peek_error(ErrorCode::EofWhileParsingValue));
            }
        };

        match peek {
            b'n' => {
                self.eat_char();
                self.parse_ident(b"ull")
            }
            b't' => {
                self.eat_char();
                self.parse_ident(b"rue")
            }
            b'f' => {
                self.eat_char();
                self.parse_ident(b"alse")
            }
            b'-' | b'0'..=b'9' => self.scan_number().map(drop),
            b'"' => {
                self.eat_char();
                self.read.ignore_str()
            }
            b'[' => {
                tri!(self.enter());
                self.eat_char();
                let mut first = true;
                while tri!(self.has_next_element(&mut first)) {
                    tri!(self.ignore_value());
                }
                self.leave();
                Ok(())
            }
            b'{' => {
                tri!(self.enter());
                self.eat_char();
                let mut first = true;
                while tri!(self.has_next_key(&mut first)) {
                    self.eat_char();
                    tri!(self.read.ignore_str());
                    tri!(self.parse_object_colon());
                    tri!(self.ignore_value());
                }
                self.leave();
                Ok(())
            }
            _ => Err(self.peek_error(ErrorCode::ExpectedSomeValue)),
        }
    }

    fn expect_open(&mut self, open: u8, expected: ShapeType) -> Result<()> {
        if tri!(self.parse_whitespace()) != Some(open) {
            return Err(self.peek_invalid_type(expected));
        }
        tri!(self.enter());
        self.eat_char();
        Ok(())
    }
}

impl<'de, R: Read<'de>> ShapeDeserializer for JsonDeserializer<'_, R> {
    fn read_boolean(&mut self, _: &Schema) -> Result<bool> {
        match tri!(self.parse_whitespace()) {
            Some(b't') => {
                self.eat_char();
                tri!(self.parse_ident(b"rue"));
                Ok(true)
            }
            Some(b'f') => {
                self.eat_char();
                tri!(self.parse_ident(b"alse"));
                Ok(false)
            }
            _ => Err(self.peek_invalid_type(ShapeType::Boolean)),
        }
    }

    fn read_byte(&mut self, _: &Schema) -> Result<i8> {
        let n = tri!(self.parse_integral(ShapeType::Byte));
        self.narrow(n)
    }

    fn read_short(&mut self, _: &Schema) -> Result<i16> {
        let n = tri!(self.parse_integral(ShapeType::Short));
        self.narrow(n)
    }

    fn read_integer(&mut self, _: &Schema) -> Result<i32> {
        let n = tri!(self.parse_integral(ShapeType::Integer));
        self.narrow(n)
    }

    fn read_long(&mut self, _: &Schema) -> Result<i64> {
        self.parse_integral(ShapeType::Long)
    }

    fn read_float(&mut self, _: &Schema) -> Result<f32> {
        self.parse_float(ShapeType::Float).map(|n| n as f32)
    }

    fn read_double(&mut self, _: &Schema) -> Result<f64> {
        self.parse_float(ShapeType::Double)
    }

    fn read_big_integer(&mut self, _: &Schema) -> Result<BigInteger> {
        if tri!(self.parse_number(ShapeType::BigInteger)) {
            return Err(self.error(ErrorCode::InvalidType {
                expected: ShapeType::BigInteger,
                found: "fractional number",
            }));
        }
        self.number
            .parse::<BigInteger>()
            .map_err(|err| err.fix_position(|code| self.error(code)))
    }

    fn read_big_decimal(&mut self, _: &Schema) -> Result<BigDecimal> {
        tri!(self.parse_number(ShapeType::BigDecimal));
        self.number
            .parse::<BigDecimal>()
            .map_err(|err| err.fix_position(|code| self.error(code)))
    }

    fn read_string(&mut self, schema: &Schema) -> Result<String> {
        self.parse_string(schema.shape_type())
    }

    fn read_blob(&mut self, _: &Schema) -> Result<Vec<u8>> {
        match tri!(self.parse_whitespace()) {
            Some(b'"') => {
                self.eat_char();
                self.scratch.clear();
                let s = tri!(self.read.parse_str(&mut self.scratch));
                let decoded = base64::engine::general_purpose::STANDARD.decode(s.as_bytes());
                decoded.map_err(|_| self.error(ErrorCode::InvalidBase64))
            }
            _ => Err(self.peek_invalid_type(ShapeType::Blob)),
        }
    }

    fn read_timestamp(&mut self, schema: &Schema) -> Result<DateTime<Utc>> {
        let format = self.settings.timestamp_format_for(schema);
        let parsed = if format.is_numeric() {
            tri!(self.parse_number(ShapeType::Timestamp));
            match self.number.parse::<f64>() {
                Ok(seconds) => timestamp::from_epoch_seconds(seconds),
                Err(_) => Err(self.error(ErrorCode::InvalidNumber)),
            }
        } else {
            match tri!(self.parse_whitespace()) {
                Some(b'"') => {
                    self.eat_char();
                    self.scratch.clear();
                    let s = tri!(self.read.parse_str(&mut self.scratch));
                    format.parse_str(&s)
                }
                _ => return Err(self.peek_invalid_type(ShapeType::Timestamp)),
            }
        };
        parsed.map_err(|err| err.fix_position(|code| self.error(code)))
    }

    fn read_document(&mut self) -> Result<Document> {
        self.parse_document()
    }

    fn read_struct(&mut self, schema: &Schema, consumer: &mut dyn StructMemberConsumer) -> Result<()> {
        tri!(self.expect_open(b'{', schema.shape_type()));
        let settings = self.settings;
        let mapper = settings.field_mapper();
        let is_union = schema.shape_type() == ShapeType::Union;

        let mut first = true;
        while tri!(self.has_next_key(&mut first)) {
            self.eat_char();
            self.scratch.clear();
            let field = {
                let key = tri!(self.read.parse_str(&mut self.scratch));
                match mapper.field_to_member(schema, &key) {
                    Some(member) => Field::Member(member),
                    None if is_union && &*key == DISCRIMINATOR => Field::Discriminator,
                    None => Field::Unknown((*key).to_owned()),
                }
            };
            tri!(self.parse_object_colon());

            match field {
                Field::Member(member) => {
                    if tri!(self.parse_whitespace()) == Some(b'n') {
                        self.eat_char();
                        tri!(self.parse_ident(b"ull"));
                    } else {
                        tri!(consumer.accept(member, &mut *self));
                    }
                }
                Field::Discriminator => {
                    log::trace!("ignoring `{}` of union {}", DISCRIMINATOR, schema.id());
                    tri!(self.ignore_value());
                }
                Field::Unknown(name) => {
                    if is_union && settings.forbid_unknown_union_members() {
                        return Err(self.error(ErrorCode::UnknownMember {
                            container: schema.id().to_string().into_boxed_str(),
                            member: name.into_boxed_str(),
                        }));
                    }
                    log::trace!("skipping unknown member `{}` of {}", name, schema.id());
                    tri!(self.ignore_value());
                    tri!(consumer.unknown_member(&name));
                }
            }
        }

        self.leave();
        Ok(())
    }

    fn read_list(&mut self, _: &Schema, consumer: &mut ElementConsumer) -> Result<()> {
        tri!(self.expect_open(b'[', ShapeType::List));
        let mut first = true;
        while tri!(self.has_next_element(&mut first)) {
            tri!(consumer(&mut *self));
        }
        self.leave();
        Ok(())
    }

    fn read_string_map(&mut self, _: &Schema, consumer: &mut EntryConsumer) -> Result<()> {
        tri!(self.expect_open(b'{', ShapeType::Map));
        let mut first = true;
        while tri!(self.has_next_key(&mut first)) {
            let key = tri!(self.parse_key());
            tri!(consumer(key, &mut *self));
        }
        self.leave();
        Ok(())
    }

    fn is_null(&mut self) -> Result<bool> {
        Ok(tri!(self.parse_whitespace()) == Some(b'n'))
    }

    fn read_null(&mut self) -> Result<()> {
        match tri!(self.parse_whitespace()) {
            Some(b'n') => {
                self.eat_char();
                self.parse_ident(b"ull")
            }
            _ => Err(self.peek_invalid_type(ShapeType::Document)),
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(input: &str) -> Result<Document> {
        let settings = JsonSettings::default();
        let mut de = JsonDeserializer::from_slice(input.as_bytes(), &settings);
        let value = tri!(de.read_document());
        tri!(de.finish());
        Ok(value)
    }

    #[test]
    fn number_classification() {
        assert_eq!(document("7").unwrap(), Document::Integer(7));
        assert_eq!(document("-2147483649").unwrap(), Document::Long(-2147483649));
        assert_eq!(
            document("18446744073709551616").unwrap(),
            Document::BigInteger("18446744073709551616".parse().unwrap())
        );
        assert_eq!(document("1.5e1").unwrap(), Document::Double(15.0));
        assert_eq!(document("-0.0").unwrap(), Document::Double(-0.0));
    }

    #[test]
    fn malformed_numbers() {
        for input in ["01", "-", "1.", "1e", "1.e5", "+1", ".5"] {
            let err = document(input).unwrap_err();
            assert!(err.is_syntax(), "{}: {}", input, err);
        }
    }

    #[test]
    fn recursion_limit() {
        let deep = "[".repeat(200);
        let err = document(&deep).unwrap_err();
        assert_eq!(*err.code(), ErrorCode::RecursionLimitExceeded);

        let nested = format!("{}{}", "[".repeat(100), "]".repeat(100));
        assert!(document(&nested).is_ok());
    }

    #[test]
    fn separators() {
        assert_eq!(*document("[1,]").unwrap_err().code(), ErrorCode::TrailingComma);
        assert_eq!(*document(r#"{"a":1,}"#).unwrap_err().code(), ErrorCode::TrailingComma);
        assert_eq!(*document("[1 2]").unwrap_err().code(), ErrorCode::ExpectedListCommaOrEnd);
        assert_eq!(*document("{1:2}").unwrap_err().code(), ErrorCode::KeyMustBeAString);
        assert_eq!(*document(r#"{"a" 1}"#).unwrap_err().code(), ErrorCode::ExpectedColon);
        assert_eq!(*document("[1] x").unwrap_err().code(), ErrorCode::TrailingCharacters);
        assert_eq!(*document("[1").unwrap_err().code(), ErrorCode::EofWhileParsingList);
    }

    #[test]
    fn error_position() {
        let err = document("{\n  \"a\": trux\n}").unwrap_err();
        assert_eq!(*err.code(), ErrorCode::ExpectedSomeIdent);
        assert_eq!((err.line(), err.column()), (2, 11));
    }
}
