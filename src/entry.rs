//! Owned, decoded syslog messages and their canonical text form.

use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, SubsecRound};

use crate::message::RawMessage;
use crate::rfc5424::{
    parse_message, APP_NAME_MAX_LEN, HOSTNAME_MAX_LEN, MSGID_MAX_LEN, PROCID_MAX_LEN,
};
use crate::timestamp::{write_timestamp, TimestampFormat};
use crate::{Error, Facility, Priority, Result, Severity, StructuredData, BOM, NILVALUE};

/// The only VERSION defined so far.
pub const SYSLOG_VERSION: u16 = 1;

/// A complete RFC 5424 message.
///
/// Built either by parsing a line with [`SyslogEntry::from_line`] or through
/// [`SyslogEntry::builder`]. NILVALUE fields are `None`.
///
/// ```
/// use syslog5424::SyslogEntry;
///
/// let line = "<34>1 2003-10-11T22:14:15.003Z mymachine.example.com su - ID47 - \u{feff}'su root' failed for lonvick on /dev/pts/8";
/// let entry = SyslogEntry::from_line(line).unwrap();
///
/// assert_eq!(entry.hostname(), Some("mymachine.example.com"));
/// assert_eq!(entry.msg(), Some("'su root' failed for lonvick on /dev/pts/8"));
/// assert_eq!(entry.to_string(), "<34>1 2003-10-11T22:14:15.003000Z mymachine.example.com su - ID47 - \u{feff}'su root' failed for lonvick on /dev/pts/8");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SyslogEntry {
    priority: Priority,
    version: u16,
    timestamp: Option<DateTime<FixedOffset>>,
    hostname: Option<String>,
    app_name: Option<String>,
    procid: Option<String>,
    msgid: Option<String>,
    structured_data: Option<StructuredData>,
    msg: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    bom: bool,
}

impl SyslogEntry {
    pub fn builder() -> SyslogEntryBuilder {
        SyslogEntryBuilder::default()
    }

    /// Parse one complete message.
    pub fn from_line(line: &str) -> Result<Self> {
        let raw = parse_message(line)?;
        Ok(raw.into())
    }

    /// Parse one complete message delivered as octets. The octets have to
    /// be UTF-8.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        Self::from_line(std::str::from_utf8(buf)?)
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn prival(&self) -> u8 {
        self.priority.value()
    }

    pub fn facility(&self) -> Facility {
        self.priority.facility()
    }

    pub fn severity(&self) -> Severity {
        self.priority.severity()
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        self.timestamp.as_ref()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    pub fn procid(&self) -> Option<&str> {
        self.procid.as_deref()
    }

    pub fn msgid(&self) -> Option<&str> {
        self.msgid.as_deref()
    }

    pub fn structured_data(&self) -> Option<&StructuredData> {
        self.structured_data.as_ref()
    }

    /// The message body without the byte order mark.
    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    /// Whether the body is written with a leading byte order mark.
    pub fn has_bom(&self) -> bool {
        self.bom
    }

    /// Wire form with the timestamp rendered as `format`.
    pub fn serialize(&self, format: TimestampFormat) -> String {
        self.display(format).to_string()
    }

    /// Like [`serialize`](Self::serialize) but without allocating.
    pub fn display(&self, format: TimestampFormat) -> EntryDisplay<'_> {
        EntryDisplay {
            entry: self,
            format,
        }
    }
}

impl From<RawMessage<'_>> for SyslogEntry {
    fn from(raw: RawMessage<'_>) -> Self {
        SyslogEntry {
            priority: raw.priority,
            version: raw.version,
            timestamp: raw.timestamp,
            hostname: raw.hostname.map(str::to_owned),
            app_name: raw.app_name.map(str::to_owned),
            procid: raw.procid.map(str::to_owned),
            msgid: raw.msgid.map(str::to_owned),
            structured_data: raw
                .structured_data
                .map(|elements| elements.iter().collect()),
            msg: raw.msg.map(|msg| msg.text.to_owned()),
            bom: raw.msg.is_some_and(|msg| msg.bom),
        }
    }
}

impl FromStr for SyslogEntry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_line(s)
    }
}

/// RFC 3339 timestamps; see [`SyslogEntry::display`] for the epoch form.
impl Display for SyslogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display(TimestampFormat::Rfc3339).fmt(f)
    }
}

/// Renders a [`SyslogEntry`] with a chosen [`TimestampFormat`].
#[derive(Clone, Copy, Debug)]
pub struct EntryDisplay<'a> {
    entry: &'a SyslogEntry,
    format: TimestampFormat,
}

impl Display for EntryDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry = self.entry;

        write!(f, "<{}>{} ", entry.priority, entry.version)?;
        match &entry.timestamp {
            Some(timestamp) => write_timestamp(f, timestamp, self.format)?,
            None => f.write_str(NILVALUE)?,
        }

        for field in [&entry.hostname, &entry.app_name, &entry.procid, &entry.msgid] {
            f.write_str(" ")?;
            f.write_str(field.as_deref().unwrap_or(NILVALUE))?;
        }

        match &entry.structured_data {
            Some(sd) => write!(f, " {sd}")?,
            None => write!(f, " {NILVALUE}")?,
        }

        if let Some(msg) = &entry.msg {
            f.write_str(" ")?;
            if entry.bom {
                f.write_str(BOM)?;
            }
            f.write_str(msg)?;
        }

        Ok(())
    }
}

fn header_field(field: &'static str, value: Option<String>, max: usize) -> Result<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value == NILVALUE {
        return Ok(None);
    }

    if value.is_empty() || value.len() > max || !value.bytes().all(|ch| (33..=126).contains(&ch)) {
        return Err(Error::InvalidHeaderField { field, value });
    }

    Ok(Some(value))
}

/// Field by field construction of a [`SyslogEntry`].
///
/// Every field is optional. The prival defaults to 14 (`USER.INFO`), the
/// version to 1 and everything else to NILVALUE. Values are checked in
/// [`build`](Self::build).
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use syslog5424::{SyslogEntry, TimestampFormat};
///
/// let entry = SyslogEntry::builder()
///     .timestamp(Utc.with_ymd_and_hms(2003, 10, 11, 22, 14, 15).unwrap() + Duration::milliseconds(3))
///     .build()
///     .unwrap();
///
/// assert_eq!(entry.to_string(), "<14>1 2003-10-11T22:14:15.003000Z - - - - -");
/// assert_eq!(entry.serialize(TimestampFormat::EpochSeconds), "<14>1 1065910455.003 - - - - -");
/// ```
#[derive(Clone, Debug, Default)]
pub struct SyslogEntryBuilder {
    prival: Option<u8>,
    version: Option<u16>,
    timestamp: Option<DateTime<FixedOffset>>,
    hostname: Option<String>,
    app_name: Option<String>,
    procid: Option<String>,
    msgid: Option<String>,
    structured_data: Option<StructuredData>,
    msg: Option<String>,
    bom: Option<bool>,
}

impl SyslogEntryBuilder {
    pub fn prival(mut self, prival: u8) -> Self {
        self.prival = Some(prival);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.prival = Some(priority.value());
        self
    }

    pub fn version(mut self, version: u16) -> Self {
        self.version = Some(version);
        self
    }

    /// Anything finer than microseconds is dropped. The offset has to be
    /// whole minutes.
    pub fn timestamp(mut self, timestamp: impl Into<DateTime<FixedOffset>>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn procid(mut self, procid: impl Into<String>) -> Self {
        self.procid = Some(procid.into());
        self
    }

    pub fn msgid(mut self, msgid: impl Into<String>) -> Self {
        self.msgid = Some(msgid.into());
        self
    }

    pub fn structured_data(mut self, structured_data: StructuredData) -> Self {
        self.structured_data = Some(structured_data);
        self
    }

    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    /// Whether to write a byte order mark in front of the message body.
    /// Defaults to true. Without a body there is no mark either, and a body
    /// that already starts with one keeps it.
    pub fn bom(mut self, bom: bool) -> Self {
        self.bom = Some(bom);
        self
    }

    pub fn build(self) -> Result<SyslogEntry> {
        let priority = match self.prival {
            Some(prival) => Priority::try_from(prival)?,
            None => Priority::default(),
        };

        let version = self.version.unwrap_or(SYSLOG_VERSION);
        if !(1..=999).contains(&version) {
            return Err(Error::InvalidVersion(version));
        }

        let timestamp = match self.timestamp {
            Some(timestamp) if !(0..=9999).contains(&timestamp.year()) => {
                return Err(Error::InvalidHeaderField {
                    field: "timestamp",
                    value: timestamp.to_rfc3339(),
                });
            }
            // TIME-NUMOFFSET has no seconds
            Some(timestamp) if timestamp.offset().local_minus_utc() % 60 != 0 => {
                return Err(Error::InvalidHeaderField {
                    field: "timestamp",
                    value: timestamp.to_rfc3339(),
                });
            }
            timestamp => timestamp.map(|timestamp| timestamp.trunc_subsecs(6)),
        };

        // A leading BOM in the body is the BOM flag, whatever `bom` says.
        let (msg, bom) = match self.msg {
            Some(msg) => match msg.strip_prefix(BOM) {
                Some(text) if !self.bom.unwrap_or(true) => (Some(text.to_owned()), true),
                _ => (Some(msg), self.bom.unwrap_or(true)),
            },
            None => (None, false),
        };

        Ok(SyslogEntry {
            priority,
            version,
            timestamp,
            hostname: header_field("hostname", self.hostname, HOSTNAME_MAX_LEN)?,
            app_name: header_field("app_name", self.app_name, APP_NAME_MAX_LEN)?,
            procid: header_field("procid", self.procid, PROCID_MAX_LEN)?,
            msgid: header_field("msgid", self.msgid, MSGID_MAX_LEN)?,
            structured_data: self.structured_data.filter(|sd| !sd.is_empty()),
            msg,
            bom,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::SdElement;

    fn timestamp() -> DateTime<FixedOffset> {
        (Utc.with_ymd_and_hms(2003, 10, 11, 22, 14, 15).unwrap() + Duration::milliseconds(3))
            .fixed_offset()
    }

    #[test]
    fn nil_fields() {
        let entry = SyslogEntry::builder().timestamp(timestamp()).build().unwrap();
        assert_eq!(entry.prival(), 14);
        assert_eq!(entry.facility(), Facility::USER);
        assert_eq!(entry.severity(), Severity::INFO);
        assert_eq!(entry.version(), 1);
        assert_eq!(entry.to_string(), "<14>1 2003-10-11T22:14:15.003000Z - - - - -");
    }

    #[test]
    fn float_timestamp() {
        let entry = SyslogEntry::builder().timestamp(timestamp()).build().unwrap();
        assert_eq!(
            entry.serialize(TimestampFormat::Rfc3339),
            "<14>1 2003-10-11T22:14:15.003000Z - - - - -"
        );
        assert_eq!(
            entry.serialize(TimestampFormat::EpochSeconds),
            "<14>1 1065910455.003 - - - - -"
        );
    }

    #[test]
    fn nil_timestamp_ignores_format() {
        let entry = SyslogEntry::builder().build().unwrap();
        assert_eq!(entry.serialize(TimestampFormat::EpochSeconds), "<14>1 - - - - - -");
        assert_eq!(entry.to_string(), "<14>1 - - - - - -");
    }

    #[test]
    fn full_entry() {
        let sd = StructuredData::new([SdElement::new(
            "exampleSDID@32473",
            [("iut", "3"), ("eventSource", "Application"), ("eventID", "1011")],
        )
        .unwrap()]);

        let entry = SyslogEntry::builder()
            .prival(165)
            .version(1)
            .timestamp(timestamp())
            .hostname("mymachine.example.com")
            .app_name("evntslog")
            .msgid("ID47")
            .structured_data(sd)
            .msg("An application event log entry...")
            .build()
            .unwrap();

        assert_eq!(
            entry.to_string(),
            "<165>1 2003-10-11T22:14:15.003000Z mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut=\"3\" eventSource=\"Application\" eventID=\"1011\"] \u{feff}An application event log entry..."
        );
    }

    #[test]
    fn without_bom() {
        let entry = SyslogEntry::builder()
            .procid("8710")
            .msg("%% It's time to make the do-nuts.")
            .bom(false)
            .build()
            .unwrap();
        assert_eq!(entry.to_string(), "<14>1 - - - 8710 - - %% It's time to make the do-nuts.");
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            SyslogEntry::builder().prival(192).build(),
            Err(Error::PrivalOutOfRange(192))
        );
        assert_eq!(
            SyslogEntry::builder().version(0).build(),
            Err(Error::InvalidVersion(0))
        );
        assert_eq!(
            SyslogEntry::builder().hostname("my host").build(),
            Err(Error::InvalidHeaderField {
                field: "hostname",
                value: "my host".to_string()
            })
        );
        assert!(SyslogEntry::builder().app_name("a".repeat(49)).build().is_err());
        assert!(SyslogEntry::builder().procid("").build().is_err());
        assert!(SyslogEntry::builder().msgid("m".repeat(33)).build().is_err());
        assert!(SyslogEntry::builder().msgid("m".repeat(32)).build().is_ok());
    }

    #[test]
    fn nilvalue_fields_are_nil() {
        let entry = SyslogEntry::builder().hostname("-").build().unwrap();
        assert_eq!(entry.hostname(), None);
    }

    #[test]
    fn empty_structured_data_is_nil() {
        let entry = SyslogEntry::builder()
            .structured_data(StructuredData::default())
            .build()
            .unwrap();
        assert!(entry.structured_data().is_none());
    }

    #[test]
    fn timestamp_is_truncated_to_micros() {
        let ts = timestamp() + Duration::nanoseconds(999);
        let entry = SyslogEntry::builder().timestamp(ts).build().unwrap();
        assert_eq!(entry.timestamp(), Some(&timestamp()));
    }

    #[test]
    fn no_bom_without_msg() {
        let entry = SyslogEntry::builder().hostname("host").build().unwrap();
        assert!(!entry.has_bom());

        let line = entry.to_string();
        assert_eq!(line, "<14>1 - host - - - -");
        assert_eq!(SyslogEntry::from_line(&line).unwrap(), entry);
    }

    #[test]
    fn leading_bom_in_msg() {
        let entry = SyslogEntry::builder()
            .msg("\u{feff}x")
            .bom(false)
            .build()
            .unwrap();
        assert_eq!(entry.msg(), Some("x"));
        assert!(entry.has_bom());
        assert_eq!(
            SyslogEntry::from_line(&entry.to_string()).unwrap(),
            entry
        );

        let entry = SyslogEntry::builder().msg("\u{feff}x").build().unwrap();
        assert_eq!(entry.msg(), Some("\u{feff}x"));
        assert_eq!(entry.to_string(), "<14>1 - - - - - - \u{feff}\u{feff}x");
        assert_eq!(
            SyslogEntry::from_line(&entry.to_string()).unwrap(),
            entry
        );
    }

    #[test]
    fn offset_with_seconds() {
        let ts = FixedOffset::east_opt(30)
            .unwrap()
            .with_ymd_and_hms(2003, 10, 11, 22, 14, 15)
            .unwrap();
        let err = SyslogEntry::builder().timestamp(ts).build().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidHeaderField {
                field: "timestamp",
                ..
            }
        ));

        let ts = FixedOffset::west_opt(5 * 3600 + 30 * 60)
            .unwrap()
            .with_ymd_and_hms(2003, 10, 11, 22, 14, 15)
            .unwrap();
        let entry = SyslogEntry::builder().timestamp(ts).build().unwrap();
        assert_eq!(entry.to_string(), "<14>1 2003-10-11T22:14:15.000000-05:30 - - - - -");
        assert_eq!(
            SyslogEntry::from_line(&entry.to_string()).unwrap(),
            entry
        );
    }

    #[test]
    fn from_bytes() {
        let entry = SyslogEntry::from_bytes(b"<13>1 - - - - - - hi").unwrap();
        assert_eq!(entry.msg(), Some("hi"));
        assert!(!entry.has_bom());

        let err = SyslogEntry::from_bytes(b"<13>1 - - - - - - \xff").unwrap_err();
        assert!(matches!(err, Error::Utf8(_)));
    }

    #[test]
    fn from_str() {
        let entry: SyslogEntry = "<78>1 2011-03-20T12:00:01+01:00 mymachine.example.com - 9778 - - (orion) CMD (/home/www/stats/pinger.py /home/www/stats/data/pinger.pickle)"
            .parse()
            .unwrap();
        assert_eq!(entry.timestamp().unwrap().year(), 2011);
        assert_eq!(entry.procid(), Some("9778"));
        assert_eq!(entry.app_name(), None);

        let err = "This is obviously invalid.".parse::<SyslogEntry>().unwrap_err();
        assert!(err.as_syntax().is_some());
    }
}
