use crate::document::special_float_name;
use crate::error::{Error, Result};
use std::cmp;
use std::io;

/// Once the buffer holds more than this many bytes, it is handed to the sink
/// before it grows any further.
const FLUSH_THRESHOLD: usize = 1024;

const INITIAL_CAPACITY: usize = 256;

/// A growable output buffer in front of an `io::Write` sink.
///
/// Every write reserves what it needs up front, so the bytes of a single
/// token are never split across two calls to the sink.
pub struct JsonStream<W> {
    out: W,
    buf: Vec<u8>,
    escape_unicode: bool,
}

impl<W> JsonStream<W>
where
    W: io::Write,
{
    /// Buffers output for `out`. With `escape_unicode`, every non-ASCII code
    /// point in a string is written as `\uXXXX` escapes.
    pub fn new(out: W, escape_unicode: bool) -> Self {
        JsonStream {
            out,
            buf: Vec::with_capacity(INITIAL_CAPACITY),
            escape_unicode,
        }
    }

    fn ensure(&mut self, n: usize) -> Result<()> {
        if self.buf.len() > FLUSH_THRESHOLD {
            tri!(self.drain());
        }
        if self.buf.capacity() - self.buf.len() < n {
            self.buf.reserve_exact(cmp::max(self.buf.capacity(), n));
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        if !self.buf.is_empty() {
            tri!(self.out.write_all(&self.buf).map_err(Error::io));
            self.buf.clear();
        }
        Ok(())
    }

    /// Writes bytes as they are.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        tri!(self.ensure(bytes.len()));
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes a single byte as it is.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        tri!(self.ensure(1));
        self.buf.push(byte);
        Ok(())
    }

    /// Writes an integer in decimal.
    pub fn write_integer<I: itoa::Integer>(&mut self, value: I) -> Result<()> {
        let mut buffer = itoa::Buffer::new();
        self.write_raw(buffer.format(value).as_bytes())
    }

    /// Writes the shortest representation that reads back as `value`. NaN
    /// and the infinities are written as the strings `"NaN"`, `"Infinity"`
    /// and `"-Infinity"`.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        if let Some(name) = special_float_name(value) {
            return self.write_str(name);
        }
        let mut buffer = zmij::Buffer::new();
        self.write_raw(buffer.format(value).as_bytes())
    }

    /// Like [`write_f64`](Self::write_f64) at single precision.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        if let Some(name) = special_float_name(f64::from(value)) {
            return self.write_str(name);
        }
        let mut buffer = zmij::Buffer::new();
        self.write_raw(buffer.format(value).as_bytes())
    }

    /// Writes a quoted, escaped string.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        // Quotes, plus one byte per input byte when nothing needs escaping.
        tri!(self.ensure(bytes.len() + 2));
        self.buf.push(b'"');

        let mut start = 0;
        for (i, &byte) in bytes.iter().enumerate() {
            if (32..=126).contains(&byte) && byte != b'"' && byte != b'\\' {
                continue;
            }
            if byte >= 0x80 && !self.escape_unicode {
                continue;
            }
            if byte >= 0x80 && !is_char_boundary(byte) {
                // Continuation bytes were handled with their leading byte.
                continue;
            }
            tri!(self.write_raw(&bytes[start..i]));
            if byte < 0x80 {
                tri!(self.write_ascii_escape(byte));
                start = i + 1;
            } else {
                let len = utf8_width(byte);
                let ch = match value[i..].chars().next() {
                    Some(ch) => ch,
                    None => unreachable!(),
                };
                let mut units = [0; 2];
                for &unit in ch.encode_utf16(&mut units).iter() {
                    tri!(self.write_unicode_escape(unit));
                }
                start = i + len;
            }
        }
        tri!(self.write_raw(&bytes[start..]));
        self.write_byte(b'"')
    }

    /// Writes a quoted string from UTF-16 code units.
    ///
    /// Paired surrogates become one four byte UTF-8 sequence. A surrogate
    /// without its partner is not an error: it is written as its own three
    /// byte sequence, or as a single `\uXXXX` escape when Unicode escaping
    /// is on.
    pub fn write_utf16(&mut self, units: &[u16]) -> Result<()> {
        tri!(self.ensure(units.len() + 2));
        self.buf.push(b'"');
        let mut scratch = Vec::with_capacity(4);
        let mut i = 0;
        while i < units.len() {
            let unit = units[i];
            i += 1;
            if unit < 0x80 {
                let byte = unit as u8;
                if ESCAPE[byte as usize] == 0 {
                    tri!(self.write_byte(byte));
                } else {
                    tri!(self.write_ascii_escape(byte));
                }
                continue;
            }
            if self.escape_unicode {
                tri!(self.write_unicode_escape(unit));
                continue;
            }
            let mut codepoint = u32::from(unit);
            if (0xD800..=0xDBFF).contains(&unit) {
                if let Some(&low) = units.get(i) {
                    if (0xDC00..=0xDFFF).contains(&low) {
                        codepoint =
                            (((codepoint - 0xD800) << 10) | (u32::from(low) - 0xDC00)) + 0x1_0000;
                        i += 1;
                    }
                }
            }
            scratch.clear();
            push_wtf8_codepoint(codepoint, &mut scratch);
            tri!(self.write_raw(&scratch));
        }
        self.write_byte(b'"')
    }

    fn write_ascii_escape(&mut self, byte: u8) -> Result<()> {
        match ESCAPE[byte as usize] {
            0 => self.write_byte(byte),
            U => self.write_unicode_escape(u16::from(byte)),
            escape => self.write_raw(&[b'\\', escape]),
        }
    }

    fn write_unicode_escape(&mut self, unit: u16) -> Result<()> {
        static HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";
        self.write_raw(&[
            b'\\',
            b'u',
            HEX_DIGITS[(unit >> 12) as usize],
            HEX_DIGITS[((unit >> 8) & 0xF) as usize],
            HEX_DIGITS[((unit >> 4) & 0xF) as usize],
            HEX_DIGITS[(unit & 0xF) as usize],
        ])
    }

    /// Hands everything buffered to the sink and flushes it.
    pub fn flush(&mut self) -> Result<()> {
        tri!(self.drain());
        self.out.flush().map_err(Error::io)
    }

    /// Hands everything buffered to the sink and returns the sink.
    pub fn into_inner(mut self) -> Result<W> {
        tri!(self.drain());
        Ok(self.out)
    }
}

fn is_char_boundary(byte: u8) -> bool {
    // Not a UTF-8 continuation byte.
    (byte as i8) >= -0x40
}

fn utf8_width(leading: u8) -> usize {
    match leading {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

/// Appends the generalized UTF-8 encoding of `n`. Surrogate code points get
/// the three byte sequence they would have if they were scalar values.
pub(crate) fn push_wtf8_codepoint(n: u32, scratch: &mut Vec<u8>) {
    if n < 0x80 {
        scratch.push(n as u8);
    } else if n < 0x800 {
        scratch.extend_from_slice(&[
            (n >> 6 & 0b0001_1111) as u8 | 0b1100_0000,
            (n & 0b0011_1111) as u8 | 0b1000_0000,
        ]);
    } else if n < 0x1_0000 {
        scratch.extend_from_slice(&[
            (n >> 12 & 0b0000_1111) as u8 | 0b1110_0000,
            (n >> 6 & 0b0011_1111) as u8 | 0b1000_0000,
            (n & 0b0011_1111) as u8 | 0b1000_0000,
        ]);
    } else {
        scratch.extend_from_slice(&[
            (n >> 18 & 0b0000_0111) as u8 | 0b1111_0000,
            (n >> 12 & 0b0011_1111) as u8 | 0b1000_0000,
            (n >> 6 & 0b0011_1111) as u8 | 0b1000_0000,
            (n & 0b0011_1111) as u8 | 0b1000_0000,
        ]);
    }
}

const BB: u8 = b'b'; // \x08
const TT: u8 = b't'; // \x09
const NN: u8 = b'n'; // \x0A
const FF: u8 = b'f'; // \x0C
const RR: u8 = b'r'; // \x0D
const QU: u8 = b'"'; // \x22
const BS: u8 = b'\\'; // \x5C
const U: u8 = b'u'; // \x00...\x1F except the ones above

// Lookup table of escape sequences. A value of b'x' at index i means that byte
// i is escaped as "\x" in JSON. A value of 0 means that byte i is not escaped.
#[rustfmt::skip]
static ESCAPE: [u8; 128] = [
    //  1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    U,  U,  U,  U,  U,  U,  U,  U, BB, TT, NN,  U, FF, RR,  U,  U, // 0
    U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U, // 1
    0,  0, QU,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 2
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 3
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 4
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, BS,  0,  0,  0, // 5
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 6
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  U, // 7
];

#[cfg(test)]
mod tests {
    use super::*;

    fn written(escape_unicode: bool, f: impl FnOnce(&mut JsonStream<&mut Vec<u8>>)) -> Vec<u8> {
        let mut out = Vec::new();
        let mut stream = JsonStream::new(&mut out, escape_unicode);
        f(&mut stream);
        stream.flush().unwrap();
        drop(stream);
        out
    }

    #[test]
    fn escape_table() {
        let out = written(false, |s| s.write_str("a\"b\\c\u{8}\u{c}\n\r\t\u{1}\u{7f}").unwrap());
        assert_eq!(out, br#""a\"b\\c\b\f\n\r\t\u0001\u007f""#);
    }

    #[test]
    fn unicode_passthrough_and_escaping() {
        let out = written(false, |s| s.write_str("é🎉").unwrap());
        assert_eq!(out, "\"é🎉\"".as_bytes());

        let out = written(true, |s| s.write_str("é🎉!").unwrap());
        assert_eq!(out, br#""\u00e9\ud83c\udf89!""#);
    }

    #[test]
    fn utf16_surrogates() {
        let out = written(false, |s| s.write_utf16(&[0xD83C, 0xDF89]).unwrap());
        assert_eq!(out, b"\"\xF0\x9F\x8E\x89\"");

        let out = written(false, |s| s.write_utf16(&[0xD83C, b'x' as u16]).unwrap());
        assert_eq!(out, b"\"\xED\xA0\xBCx\"");

        let out = written(true, |s| s.write_utf16(&[0xD83C]).unwrap());
        assert_eq!(out, br#""\ud83c""#);
    }

    #[test]
    fn buffer_grows_and_drains() {
        let long = "x".repeat(5000);
        let out = written(false, |s| {
            for _ in 0..3 {
                s.write_str(&long).unwrap();
                s.write_byte(b',').unwrap();
            }
        });
        assert_eq!(out.len(), 3 * (5000 + 3));
        assert!(out.starts_with(b"\"xxx"));
        assert!(out.ends_with(b"x\","));
    }

    #[test]
    fn special_floats_are_strings() {
        let out = written(false, |s| {
            s.write_f64(f64::NAN).unwrap();
            s.write_f64(f64::NEG_INFINITY).unwrap();
            s.write_f32(f32::INFINITY).unwrap();
        });
        assert_eq!(out, br#""NaN""-Infinity""Infinity""#);
    }
}
