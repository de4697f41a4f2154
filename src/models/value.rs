//! Problem input/output values
//!
//! Every value type knows three things: how to show itself in a mismatch
//! diagnostic, how to serialize itself to the print stream and how to read
//! itself back from a custom test stream. The stream format is plain
//! whitespace-separated tokens.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Capabilities required from a problem's input and output types
pub trait ProblemValue: Sized + Default {
    /// Human-readable form used in mismatch diagnostics
    fn log(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Serialized form written to the print stream
    fn write_to(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Parse the serialized form
    fn read_from(input: &mut dyn BufRead) -> AppResult<Self>;
}

/// Read the next whitespace-delimited token.
///
/// Returns `Ok(None)` at end of stream.
pub fn read_token(input: &mut dyn BufRead) -> io::Result<Option<String>> {
    let mut token = Vec::new();
    loop {
        let buf = input.fill_buf()?;
        if buf.is_empty() {
            break;
        }

        let mut used = 0;
        let mut done = false;
        for &byte in buf {
            used += 1;
            if byte.is_ascii_whitespace() {
                if !token.is_empty() {
                    done = true;
                    break;
                }
            } else {
                token.push(byte);
            }
        }
        input.consume(used);
        if done {
            break;
        }
    }

    if token.is_empty() {
        return Ok(None);
    }
    String::from_utf8(token)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Read and parse the next token; `what` names the value for error messages
pub fn read_parsed<T: FromStr>(input: &mut dyn BufRead, what: &str) -> AppResult<T> {
    let token = read_token(input)?
        .ok_or_else(|| AppError::InvalidInput(format!("unexpected end of stream, expected {what}")))?;
    token
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("expected {what}, got '{token}'")))
}

/// Upper bound on elements reserved up front from a declared count
const MAX_PREALLOCATED_ITEMS: usize = 4096;

/// A single number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalarValue<T>(pub T);

impl<T> ProblemValue for ScalarValue<T>
where
    T: Display + FromStr + Default,
{
    fn log(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "{}", self.0)
    }

    fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "{}", self.0)
    }

    fn read_from(input: &mut dyn BufRead) -> AppResult<Self> {
        read_parsed(input, "scalar").map(ScalarValue)
    }
}

impl<T> From<T> for ScalarValue<T> {
    fn from(value: T) -> Self {
        ScalarValue(value)
    }
}

/// A sequence of numbers.
///
/// Logged as `{1, 2, -4}`; serialized as the element count followed by
/// one element per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayValue<T>(pub Vec<T>);

impl<T> Default for ArrayValue<T> {
    fn default() -> Self {
        ArrayValue(Vec::new())
    }
}

impl<T> ProblemValue for ArrayValue<T>
where
    T: Display + FromStr,
{
    fn log(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "{{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            write!(out, "{item}")?;
        }
        write!(out, "}}")
    }

    fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "{}", self.0.len())?;
        for item in &self.0 {
            write!(out, "\n{item}")?;
        }
        Ok(())
    }

    fn read_from(input: &mut dyn BufRead) -> AppResult<Self> {
        let count: usize = read_parsed(input, "element count")?;
        // The count is untrusted; a short stream fails below instead.
        let mut items = Vec::with_capacity(count.min(MAX_PREALLOCATED_ITEMS));
        for _ in 0..count {
            items.push(read_parsed(input, "array element")?);
        }
        Ok(ArrayValue(items))
    }
}

impl<T> From<Vec<T>> for ArrayValue<T> {
    fn from(items: Vec<T>) -> Self {
        ArrayValue(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged(value: &impl ProblemValue) -> String {
        let mut out = Vec::new();
        value.log(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn written(value: &impl ProblemValue) -> String {
        let mut out = Vec::new();
        value.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_array_log_format() {
        assert_eq!(logged(&ArrayValue(vec![1, 2, -4])), "{1, 2, -4}");
        assert_eq!(logged(&ArrayValue::<i32>(vec![])), "{}");
        assert_eq!(logged(&ScalarValue(-1i64)), "-1");
    }

    #[test]
    fn test_array_stream_format() {
        assert_eq!(written(&ArrayValue(vec![7, 8])), "2\n7\n8");
        assert_eq!(written(&ArrayValue::<i32>(vec![])), "0");

        let mut input = "3\n1\n  2\t-4\n".as_bytes();
        let parsed = ArrayValue::<i32>::read_from(&mut input).unwrap();
        assert_eq!(parsed, ArrayValue(vec![1, 2, -4]));
    }

    #[test]
    fn test_reads_consecutive_values() {
        let mut input = "2 5 6\n11".as_bytes();
        let array = ArrayValue::<i32>::read_from(&mut input).unwrap();
        let scalar = ScalarValue::<i64>::read_from(&mut input).unwrap();
        assert_eq!(array.0, vec![5, 6]);
        assert_eq!(scalar.0, 11);
        assert_eq!(read_token(&mut input).unwrap(), None);
    }

    #[test]
    fn test_rejects_malformed_input() {
        let mut input = "2 5 x".as_bytes();
        let err = ArrayValue::<i32>::read_from(&mut input).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref msg) if msg.contains("'x'")));

        let mut input = "3 1".as_bytes();
        let err = ArrayValue::<i32>::read_from(&mut input).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref msg) if msg.contains("end of stream")));

        let mut input = "".as_bytes();
        assert!(ScalarValue::<i64>::read_from(&mut input).is_err());
    }

    #[test]
    fn test_huge_count_is_an_error() {
        let mut input = "18446744073709551615 1".as_bytes();
        let err = ArrayValue::<i32>::read_from(&mut input).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref msg) if msg.contains("end of stream")));

        let mut input = "99999999999999999999 1".as_bytes();
        assert!(matches!(
            ArrayValue::<i32>::read_from(&mut input),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_default_without_element_default() {
        struct NoDefault;
        let empty: ArrayValue<NoDefault> = ArrayValue::default();
        assert!(empty.0.is_empty());
    }
}
