use std::fmt::{self, Display};

use crate::Error;

/// Severity of a message, the low three bits of a prival.
///
/// Ordered by code, so `EMERG` sorts first and is the most severe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[allow(non_camel_case_types)]
pub enum Severity {
    EMERG = 0,
    ALERT = 1,
    CRIT = 2,
    ERR = 3,
    WARNING = 4,
    NOTICE = 5,
    INFO = 6,
    DEBUG = 7,
}

/// Indexed by code; every three bit value has an entry.
const SEVERITIES: [(Severity, &str); 8] = [
    (Severity::EMERG, "emerg"),
    (Severity::ALERT, "alert"),
    (Severity::CRIT, "crit"),
    (Severity::ERR, "err"),
    (Severity::WARNING, "warning"),
    (Severity::NOTICE, "notice"),
    (Severity::INFO, "info"),
    (Severity::DEBUG, "debug"),
];

impl Severity {
    /// Decode the low three bits of `prival`; the rest is ignored.
    pub(crate) fn from_prival(prival: u8) -> Self {
        SEVERITIES[usize::from(prival & 0x7)].0
    }

    /// Lowercase name, as used by syslog(3) and the serde form.
    pub fn as_str(self) -> &'static str {
        SEVERITIES[self as usize].1
    }

    /// True when `self` is `other` or more severe.
    pub fn is_at_least(self, other: Severity) -> bool {
        self <= other
    }
}

impl TryFrom<u8> for Severity {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if code > 7 {
            return Err(Error::BadSeverity(code));
        }

        Ok(Severity::from_prival(code))
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
