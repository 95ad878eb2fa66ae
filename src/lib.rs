//! Parser and serializer for [RFC 5424](https://tools.ietf.org/html/rfc5424) Syslog messages.
//! Not to be confused with the older [RFC 3164](https://tools.ietf.org/html/rfc3164) BSD Syslog
//! protocol, which many systems still emit.
//!
//! In particular, supports the Structured Data fields, with repeated parameter names kept in
//! order, and writes messages back out in their canonical form.
//!
//! Usually, you'll just call [`SyslogEntry::from_line`] with one complete message, or
//! [`rfc5424::parse_message`] for a borrowed, zero-copy view of the fields.
//!
//! # Example
//!
//! ```
//! use syslog5424::{SyslogEntry, TimestampFormat};
//!
//! let line = r#"<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut="3" eventSource="Application" eventID="1011"][examplePriority@32473 class="high"]"#;
//! let entry = SyslogEntry::from_line(line).unwrap();
//!
//! let sd = entry.structured_data().unwrap();
//! assert_eq!(sd.len(), 2);
//! assert_eq!(sd.elements()[0].get("eventSource").unwrap(), "Application");
//!
//! assert_eq!(
//!     entry.serialize(TimestampFormat::EpochSeconds),
//!     r#"<165>1 1065910455.003 mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut="3" eventSource="Application" eventID="1011"][examplePriority@32473 class="high"]"#
//! );
//! ```
//!
//! Framing (octet counting, TLS transport) is left to the caller; every function here works on
//! exactly one message.

mod entry;
mod error;
mod facility;
mod message;
pub mod multimap;
mod priority;
pub mod rfc5424;
mod severity;
mod structured_data;
mod timestamp;

pub use entry::{EntryDisplay, SyslogEntry, SyslogEntryBuilder, SYSLOG_VERSION};
pub use error::{Error, Found, Result, SyntaxError};
pub use facility::Facility;
pub use message::{RawElement, RawMessage, RawMsg};
pub use multimap::OrderedMultiMap;
pub use priority::{Priority, MAX_PRIVAL};
pub use severity::Severity;
pub use structured_data::{
    escape_param_value, unescape_param_value, SdElement, SdParam, SdValue, StructuredData,
    SD_NAME_MAX_LEN,
};
pub use timestamp::{format_timestamp, parse_timestamp, TimestampFormat};

/// NILVALUE, a field that is intentionally left out.
pub const NILVALUE: &str = "-";

/// The UTF-8 byte order mark that may start MSG.
pub const BOM: &str = "\u{feff}";
