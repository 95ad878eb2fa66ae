//! The PRI part of a syslog header.

use std::fmt::{self, Display};

use crate::{Error, Facility, Severity};

/// Largest prival a header may carry, `LOCAL7 * 8 + DEBUG`.
pub const MAX_PRIVAL: u8 = 191;

/// A validated prival, `facility * 8 + severity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Priority(u8);

impl Priority {
    pub fn new(facility: Facility, severity: Severity) -> Self {
        Priority(((facility as u8) << 3) | severity as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn facility(self) -> Facility {
        match Facility::try_from(self.0 >> 3) {
            Ok(facility) => facility,
            // the prival was range checked on construction
            Err(_) => unreachable!("prival {} has no facility", self.0),
        }
    }

    pub fn severity(self) -> Severity {
        Severity::from_prival(self.0)
    }
}

/// `USER.INFO`, which is 14.
impl Default for Priority {
    fn default() -> Self {
        Priority::new(Facility::USER, Severity::INFO)
    }
}

impl TryFrom<u8> for Priority {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > MAX_PRIVAL {
            return Err(Error::PrivalOutOfRange(value));
        }

        Ok(Priority(value))
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
