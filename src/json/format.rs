use super::write::JsonStream;
use crate::error::Result;
use std::io;

/// This trait abstracts away writing the JSON control characters, which allows
/// the user to optionally pretty print the JSON output.
pub trait Formatter {
    /// Called when writing a '{' or '['.
    fn open<W>(&mut self, writer: &mut JsonStream<W>, ch: u8) -> Result<()>
    where
        W: io::Write;

    /// Called before every element of a list and every key of an object.
    fn comma<W>(&mut self, writer: &mut JsonStream<W>, first: bool) -> Result<()>
    where
        W: io::Write;

    /// Called when writing a ':'.
    fn colon<W>(&mut self, writer: &mut JsonStream<W>) -> Result<()>
    where
        W: io::Write;

    /// Called when writing a '}' or ']'. `empty` is true when nothing was
    /// written since the matching `open`.
    fn close<W>(&mut self, writer: &mut JsonStream<W>, ch: u8, empty: bool) -> Result<()>
    where
        W: io::Write;
}

/// This structure compacts a JSON value with no extra whitespace.
#[derive(Clone, Debug, Default)]
pub struct CompactFormatter;

impl Formatter for CompactFormatter {
    fn open<W>(&mut self, writer: &mut JsonStream<W>, ch: u8) -> Result<()>
    where
        W: io::Write,
    {
        writer.write_byte(ch)
    }

    fn comma<W>(&mut self, writer: &mut JsonStream<W>, first: bool) -> Result<()>
    where
        W: io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_byte(b',')
        }
    }

    fn colon<W>(&mut self, writer: &mut JsonStream<W>) -> Result<()>
    where
        W: io::Write,
    {
        writer.write_byte(b':')
    }

    fn close<W>(&mut self, writer: &mut JsonStream<W>, ch: u8, _empty: bool) -> Result<()>
    where
        W: io::Write,
    {
        writer.write_byte(ch)
    }
}

/// This structure pretty prints a JSON value to make it human readable.
#[derive(Clone, Debug)]
pub struct PrettyFormatter<'a> {
    current_indent: usize,
    indent: &'a [u8],
}

impl<'a> PrettyFormatter<'a> {
    /// Construct a pretty printer formatter that defaults to using two spaces for indentation.
    pub fn new() -> Self {
        PrettyFormatter::with_indent(b"  ")
    }

    /// Construct a pretty printer formatter that uses the `indent` string for indentation.
    pub fn with_indent(indent: &'a [u8]) -> Self {
        PrettyFormatter {
            current_indent: 0,
            indent,
        }
    }
}

impl Default for PrettyFormatter<'_> {
    fn default() -> Self {
        PrettyFormatter::new()
    }
}

impl Formatter for PrettyFormatter<'_> {
    fn open<W>(&mut self, writer: &mut JsonStream<W>, ch: u8) -> Result<()>
    where
        W: io::Write,
    {
        self.current_indent += 1;
        writer.write_byte(ch)
    }

    fn comma<W>(&mut self, writer: &mut JsonStream<W>, first: bool) -> Result<()>
    where
        W: io::Write,
    {
        let separator: &[u8] = if first { b"\n" } else { b",\n" };
        tri!(writer.write_raw(separator));
        indent(writer, self.current_indent, self.indent)
    }

    fn colon<W>(&mut self, writer: &mut JsonStream<W>) -> Result<()>
    where
        W: io::Write,
    {
        writer.write_raw(b": ")
    }

    fn close<W>(&mut self, writer: &mut JsonStream<W>, ch: u8, empty: bool) -> Result<()>
    where
        W: io::Write,
    {
        self.current_indent -= 1;
        if !empty {
            tri!(writer.write_byte(b'\n'));
            tri!(indent(writer, self.current_indent, self.indent));
        }
        writer.write_byte(ch)
    }
}

fn indent<W>(wr: &mut JsonStream<W>, n: usize, s: &[u8]) -> Result<()>
where
    W: io::Write,
{
    for _ in 0..n {
        tri!(wr.write_raw(s));
    }
    Ok(())
}
