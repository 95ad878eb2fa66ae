//! Tokenizer for the RFC 5424 message grammar.
//!
//! ```text
//! SYSLOG-MSG      = HEADER SP STRUCTURED-DATA [SP MSG]
//! HEADER          = PRI VERSION SP TIMESTAMP SP HOSTNAME SP APP-NAME SP PROCID SP MSGID
//! STRUCTURED-DATA = NILVALUE / 1*SD-ELEMENT
//! SD-ELEMENT      = "[" SD-ID *(SP SD-PARAM) "]"
//! SD-PARAM        = PARAM-NAME "=" %d34 PARAM-VALUE %d34
//! MSG             = [BOM] *OCTET
//! ```
//!
//! Fields are matched left to right; the first production that does not match
//! aborts the parse with a [`SyntaxError`] pointing at the offending byte.

use crate::error::{Found, SyntaxError};
use crate::message::{RawElement, RawMessage, RawMsg};
use crate::priority::Priority;
use crate::structured_data::{is_sd_name_byte, SD_NAME_MAX_LEN};
use crate::timestamp::parse_rfc3339;
use crate::{BOM, NILVALUE};

pub const HOSTNAME_MAX_LEN: usize = 255;
pub const APP_NAME_MAX_LEN: usize = 48;
pub const PROCID_MAX_LEN: usize = 128;
pub const MSGID_MAX_LEN: usize = 32;

/// Parse position over the input. Slices and error positions are only ever
/// taken at ASCII bytes or at the end of input, which are char boundaries.
pub(crate) struct Cursor<'a> {
    buf: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a str) -> Self {
        Cursor { buf, offset: 0 }
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.buf.as_bytes().get(self.offset).copied()
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        self.offset += 1;
    }

    #[inline]
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.offset += 1;
            return true;
        }

        false
    }

    pub(crate) fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), SyntaxError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    pub(crate) fn expect_end(&self, expected: &'static str) -> Result<(), SyntaxError> {
        if self.offset == self.buf.len() {
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    /// Reads exactly `count` ASCII digits.
    pub(crate) fn digits(
        &mut self,
        count: usize,
        expected: &'static str,
    ) -> Result<u32, SyntaxError> {
        let mut value = 0u32;
        for _ in 0..count {
            match self.peek() {
                Some(ch) if ch.is_ascii_digit() => {
                    value = value * 10 + (ch - b'0') as u32;
                    self.offset += 1;
                }
                _ => return Err(self.error(expected)),
            }
        }

        Ok(value)
    }

    /// Advances while `pred` holds for the next byte.
    pub(crate) fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while matches!(self.peek(), Some(ch) if pred(ch)) {
            self.offset += 1;
        }
    }

    #[inline]
    pub(crate) fn slice(&self, start: usize) -> &'a str {
        &self.buf[start..self.offset]
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.buf[self.offset..]
    }

    pub(crate) fn error(&self, expected: &'static str) -> SyntaxError {
        self.error_at(self.offset, expected)
    }

    pub(crate) fn error_at(&self, position: usize, expected: &'static str) -> SyntaxError {
        let found = self
            .buf
            .get(position..)
            .and_then(|rest| rest.chars().next())
            .map_or(Found::EndOfInput, Found::Char);

        SyntaxError {
            position,
            expected,
            found,
        }
    }
}

#[inline]
fn is_print_us_ascii(ch: u8) -> bool {
    (33..=126).contains(&ch)
}

// PRI = "<" PRIVAL ">", PRIVAL = 1*3DIGIT
fn parse_pri(cursor: &mut Cursor<'_>) -> Result<Priority, SyntaxError> {
    cursor.expect(b'<', "'<'")?;

    let start = cursor.offset();
    cursor.skip_while(|ch| ch.is_ascii_digit());
    let digits = cursor.slice(start);
    if digits.is_empty() {
        return Err(cursor.error("PRIVAL digit"));
    }
    if digits.len() > 3 {
        return Err(cursor.error_at(start + 3, "'>'"));
    }

    let prival = digits
        .bytes()
        .fold(0u16, |acc, ch| acc * 10 + (ch - b'0') as u16);
    let priority = u8::try_from(prival)
        .ok()
        .and_then(|prival| Priority::try_from(prival).ok())
        .ok_or_else(|| cursor.error_at(start, "PRIVAL between 0 and 191"))?;

    cursor.expect(b'>', "'>'")?;

    Ok(priority)
}

// VERSION = NONZERO-DIGIT 0*2DIGIT
fn parse_version(cursor: &mut Cursor<'_>) -> Result<u16, SyntaxError> {
    let mut version = match cursor.peek() {
        Some(ch @ b'1'..=b'9') => (ch - b'0') as u16,
        _ => return Err(cursor.error("VERSION")),
    };
    cursor.bump();

    for _ in 0..2 {
        match cursor.peek() {
            Some(ch) if ch.is_ascii_digit() => {
                version = version * 10 + (ch - b'0') as u16;
                cursor.bump();
            }
            _ => break,
        }
    }

    Ok(version)
}

/// `NILVALUE / 1*max PRINTUSASCII`. A lone `-` is NILVALUE, a longer field
/// may start with a dash.
fn parse_header_field<'a>(
    cursor: &mut Cursor<'a>,
    max: usize,
    expected: &'static str,
) -> Result<Option<&'a str>, SyntaxError> {
    let start = cursor.offset();
    cursor.skip_while(is_print_us_ascii);

    let value = cursor.slice(start);
    if value.is_empty() {
        return Err(cursor.error(expected));
    }
    if value.len() > max {
        return Err(cursor.error_at(start + max, expected));
    }
    if value == NILVALUE {
        return Ok(None);
    }

    Ok(Some(value))
}

// SD-NAME = 1*32PRINTUSASCII except '=', SP, ']', %d34
fn parse_sd_name<'a>(
    cursor: &mut Cursor<'a>,
    expected: &'static str,
) -> Result<&'a str, SyntaxError> {
    let start = cursor.offset();
    cursor.skip_while(is_sd_name_byte);

    let name = cursor.slice(start);
    if name.is_empty() {
        return Err(cursor.error(expected));
    }
    if name.len() > SD_NAME_MAX_LEN {
        return Err(cursor.error_at(start + SD_NAME_MAX_LEN, expected));
    }

    Ok(name)
}

/// Everything up to the first unescaped `"`. The opening quote has already
/// been consumed; the closing one is consumed here. The value comes back
/// still escaped.
fn parse_param_value<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, SyntaxError> {
    let start = cursor.offset();

    loop {
        match cursor.peek() {
            None => return Err(cursor.error("closing '\"'")),
            Some(b'\\') => {
                cursor.bump();
                // the escaped byte is skipped as long as it is ASCII, a
                // non-ASCII byte never terminates the value anyway
                if matches!(cursor.peek(), Some(ch) if ch.is_ascii()) {
                    cursor.bump();
                }
            }
            Some(b'"') => {
                let value = cursor.slice(start);
                cursor.bump();
                return Ok(value);
            }
            Some(_) => cursor.bump(),
        }
    }
}

// example: [exampleSDID@32473 iut="3" eventSource="Application" eventID="1011"]
fn parse_sd_element<'a>(cursor: &mut Cursor<'a>) -> Result<RawElement<'a>, SyntaxError> {
    cursor.expect(b'[', "'['")?;
    let id = parse_sd_name(cursor, "SD-ID")?;

    // 4 is RawVec::MIN_NON_ZERO_CAP
    let mut params = Vec::with_capacity(4);
    loop {
        match cursor.peek() {
            Some(b']') => {
                cursor.bump();
                break;
            }
            Some(b' ') => {
                cursor.bump();
                let name = parse_sd_name(cursor, "PARAM-NAME")?;
                cursor.expect(b'=', "'='")?;
                cursor.expect(b'"', "'\"'")?;
                let value = parse_param_value(cursor)?;
                params.push((name, value));
            }
            _ => return Err(cursor.error("SP or ']'")),
        }
    }

    Ok(RawElement { id, params })
}

fn parse_structured_data<'a>(
    cursor: &mut Cursor<'a>,
) -> Result<Option<Vec<RawElement<'a>>>, SyntaxError> {
    match cursor.peek() {
        Some(b'-') => {
            cursor.bump();
            Ok(None)
        }
        Some(b'[') => {
            let mut elements = Vec::with_capacity(4);
            while cursor.peek() == Some(b'[') {
                elements.push(parse_sd_element(cursor)?);
            }

            Ok(Some(elements))
        }
        _ => Err(cursor.error("STRUCTURED-DATA")),
    }
}

fn parse_msg<'a>(cursor: &mut Cursor<'a>) -> Result<Option<RawMsg<'a>>, SyntaxError> {
    if cursor.peek().is_none() {
        return Ok(None);
    }
    cursor.expect(b' ', "SP or end of message")?;

    let rest = cursor.rest();
    let msg = match rest.strip_prefix(BOM) {
        Some(text) => RawMsg { bom: true, text },
        None => RawMsg {
            bom: false,
            text: rest,
        },
    };

    Ok(Some(msg))
}

/// Split one complete RFC 5424 message into its fields.
///
/// The whole input has to match; there is no partial result on failure.
///
/// # Example
///
/// ```
/// use syslog5424::rfc5424::parse_message;
///
/// let message = parse_message("<78>1 2016-01-15T00:04:01+00:00 host1 CROND 10391 - [meta sequenceId=\"29\"] some_message").unwrap();
///
/// assert_eq!(message.hostname, Some("host1"));
/// assert_eq!(message.structured_data.unwrap()[0].params, vec![("sequenceId", "29")]);
/// ```
pub fn parse_message(input: &str) -> Result<RawMessage<'_>, SyntaxError> {
    let mut cursor = Cursor::new(input);

    let priority = parse_pri(&mut cursor)?;
    let version = parse_version(&mut cursor)?;
    cursor.expect(b' ', "SP")?;

    let timestamp = if cursor.eat(b'-') {
        None
    } else {
        Some(parse_rfc3339(&mut cursor)?)
    };
    cursor.expect(b' ', "SP")?;

    let hostname = parse_header_field(&mut cursor, HOSTNAME_MAX_LEN, "HOSTNAME")?;
    cursor.expect(b' ', "SP")?;
    let app_name = parse_header_field(&mut cursor, APP_NAME_MAX_LEN, "APP-NAME")?;
    cursor.expect(b' ', "SP")?;
    let procid = parse_header_field(&mut cursor, PROCID_MAX_LEN, "PROCID")?;
    cursor.expect(b' ', "SP")?;
    let msgid = parse_header_field(&mut cursor, MSGID_MAX_LEN, "MSGID")?;
    cursor.expect(b' ', "SP")?;

    let structured_data = parse_structured_data(&mut cursor)?;
    let msg = parse_msg(&mut cursor)?;

    Ok(RawMessage {
        priority,
        version,
        timestamp,
        hostname,
        app_name,
        procid,
        msgid,
        structured_data,
        msg,
    })
}
