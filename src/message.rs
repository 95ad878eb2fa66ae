//! Borrowed view of a single syslog message, as produced by the tokenizer.

use chrono::{DateTime, FixedOffset};

use crate::Priority;

/// Every field of an RFC 5424 message, sliced out of the input.
///
/// NILVALUE fields are `None`. Nothing here is unescaped yet; turn it into a
/// [`SyslogEntry`](crate::SyslogEntry) for owned, decoded values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawMessage<'a> {
    pub priority: Priority,
    pub version: u16,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub hostname: Option<&'a str>,
    pub app_name: Option<&'a str>,
    pub procid: Option<&'a str>,
    pub msgid: Option<&'a str>,
    pub structured_data: Option<Vec<RawElement<'a>>>,
    pub msg: Option<RawMsg<'a>>,
}

/// One `[SD-ID PARAM-NAME="PARAM-VALUE" ...]` group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawElement<'a> {
    pub id: &'a str,
    // NOTE: param values are still escaped
    pub params: Vec<(&'a str, &'a str)>,
}

/// The MSG part, with the byte order mark split off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawMsg<'a> {
    pub bom: bool,
    pub text: &'a str,
}
