//! Record data model
//!
//! Two shapes of the same DNS data meet here:
//!
//! - [`GroupedRecord`]: one record per (name, type), holding an ordered set
//!   of values. This is what zone management works with.
//! - [`FlatEntry`]: one backend entry per individual value, carrying the
//!   identifier the backend assigned to it.
//!
//! The [`crate::translate`] module converts between the two.

mod entry;
mod zone;

pub use entry::{EntryRef, FlatEntry};
pub use zone::{ChangeOp, Plan, Zone};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::qualify;

/// DNS record types this crate knows how to group and ungroup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Apex alias (CNAME-like, provider extension)
    Alias,
    /// Certificate authority authorization
    Caa,
    /// Canonical name
    Cname,
    /// Mail exchange
    Mx,
    /// Name server
    Ns,
    /// Pointer
    Ptr,
    /// Sender policy framework (legacy type)
    Spf,
    /// Service locator
    Srv,
    /// Text
    Txt,
}

impl RecordType {
    /// Every implemented record type
    pub const ALL: [RecordType; 11] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Alias,
        RecordType::Caa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Ptr,
        RecordType::Spf,
        RecordType::Srv,
        RecordType::Txt,
    ];

    /// The set of every implemented record type
    pub fn all() -> BTreeSet<RecordType> {
        Self::ALL.into_iter().collect()
    }

    /// Wire name of the type (upper case)
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Alias => "ALIAS",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Spf => "SPF",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }

    /// Whether a value of this type is itself a hostname
    pub fn is_hostname(&self) -> bool {
        matches!(
            self,
            RecordType::Alias | RecordType::Cname | RecordType::Ns | RecordType::Ptr
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnhandledType(s.to_string()))
    }
}

/// A single value of a grouped record
///
/// The variant is determined by the record type: see [`RecordValue::fits`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordValue {
    /// Opaque scalar (A, AAAA, TXT, SPF)
    Text(String),
    /// Hostname scalar (ALIAS, CNAME, NS, PTR)
    Host(String),
    /// MX preference and exchange host
    Mx {
        /// Lower is preferred
        preference: u16,
        /// Mail exchange host
        exchange: String,
    },
    /// SRV tuple
    Srv {
        /// Priority
        priority: u16,
        /// Weight among equal priorities
        weight: u16,
        /// Service port
        port: u16,
        /// Target host
        target: String,
    },
    /// CAA tuple
    Caa {
        /// Flags octet
        flags: u8,
        /// Property tag (issue, issuewild, iodef, ...)
        tag: String,
        /// Property value, unquoted
        value: String,
    },
}

impl RecordValue {
    /// Opaque scalar value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Hostname value
    pub fn host(value: impl Into<String>) -> Self {
        Self::Host(value.into())
    }

    /// MX value
    pub fn mx(preference: u16, exchange: impl Into<String>) -> Self {
        Self::Mx {
            preference,
            exchange: exchange.into(),
        }
    }

    /// SRV value
    pub fn srv(priority: u16, weight: u16, port: u16, target: impl Into<String>) -> Self {
        Self::Srv {
            priority,
            weight,
            port,
            target: target.into(),
        }
    }

    /// CAA value
    pub fn caa(flags: u8, tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Caa {
            flags,
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// Whether this value has the shape required by `rtype`
    pub fn fits(&self, rtype: RecordType) -> bool {
        match self {
            Self::Text(_) => matches!(
                rtype,
                RecordType::A | RecordType::Aaaa | RecordType::Txt | RecordType::Spf
            ),
            Self::Host(_) => rtype.is_hostname(),
            Self::Mx { .. } => rtype == RecordType::Mx,
            Self::Srv { .. } => rtype == RecordType::Srv,
            Self::Caa { .. } => rtype == RecordType::Caa,
        }
    }
}

/// Identity of a grouped record: zone, relative name and type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    /// Zone name with trailing dot
    pub zone: String,
    /// Relative name, empty for the apex
    pub name: String,
    /// Record type
    pub rtype: RecordType,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            qualify::entry_name(&self.name, &self.zone),
            self.rtype
        )
    }
}

/// One record per (name, type) with its full value set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupedRecord {
    zone: String,
    name: String,
    rtype: RecordType,
    ttl: u32,
    values: BTreeSet<RecordValue>,
}

impl GroupedRecord {
    /// Create a grouped record
    ///
    /// # Parameters
    ///
    /// - `zone`: owning zone, with or without trailing dot
    /// - `name`: name relative to the zone; empty string for the apex
    /// - `rtype`: record type
    /// - `ttl`: time-to-live shared by every value
    /// - `values`: the value set; duplicates collapse
    ///
    /// # Returns
    ///
    /// - `Err(Error::InvalidInput)`: a value does not fit `rtype`
    pub fn new(
        zone: &str,
        name: impl Into<String>,
        rtype: RecordType,
        ttl: u32,
        values: impl IntoIterator<Item = RecordValue>,
    ) -> Result<Self> {
        let values: BTreeSet<RecordValue> = values.into_iter().collect();

        if let Some(bad) = values.iter().find(|v| !v.fits(rtype)) {
            return Err(Error::invalid_input(format!(
                "value {:?} does not fit record type {}",
                bad, rtype
            )));
        }

        Ok(Self {
            zone: qualify::absolute_zone(zone),
            name: name.into(),
            rtype,
            ttl,
            values,
        })
    }

    /// Owning zone, with trailing dot
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Name relative to the zone; empty for the apex
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record type
    pub fn rtype(&self) -> RecordType {
        self.rtype
    }

    /// Time-to-live
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// The ordered value set
    pub fn values(&self) -> &BTreeSet<RecordValue> {
        &self.values
    }

    /// Fully qualified entry name as written to the backend
    pub fn fqdn(&self) -> String {
        qualify::entry_name(&self.name, &self.zone)
    }

    /// Identity key of this record
    pub fn key(&self) -> RecordKey {
        RecordKey {
            zone: self.zone.clone(),
            name: self.name.clone(),
            rtype: self.rtype,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_parse() {
        assert_eq!("A".parse::<RecordType>().unwrap(), RecordType::A);
        assert_eq!("aaaa".parse::<RecordType>().unwrap(), RecordType::Aaaa);
        assert_eq!(" CNAME".parse::<RecordType>().unwrap(), RecordType::Cname);
        assert!(matches!(
            "URL".parse::<RecordType>(),
            Err(Error::UnhandledType(t)) if t == "URL"
        ));
    }

    #[test]
    fn test_record_type_serde_names() {
        let json = serde_json::to_string(&RecordType::Aaaa).unwrap();
        assert_eq!(json, "\"AAAA\"");

        let parsed: RecordType = serde_json::from_str("\"SRV\"").unwrap();
        assert_eq!(parsed, RecordType::Srv);
    }

    #[test]
    fn test_value_shape_checked() {
        let ok = GroupedRecord::new(
            "example.com",
            "www",
            RecordType::Cname,
            300,
            [RecordValue::host("web.example.com.")],
        );
        assert!(ok.is_ok());

        let bad = GroupedRecord::new(
            "example.com",
            "www",
            RecordType::Mx,
            300,
            [RecordValue::text("1.2.3.4")],
        );
        assert!(matches!(bad, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_record_normalizes_zone_and_dedups() {
        let record = GroupedRecord::new(
            "example.com",
            "",
            RecordType::A,
            60,
            [RecordValue::text("1.1.1.1"), RecordValue::text("1.1.1.1")],
        )
        .unwrap();

        assert_eq!(record.zone(), "example.com.");
        assert_eq!(record.values().len(), 1);
        assert_eq!(record.fqdn(), "@.example.com.");
        assert_eq!(record.key().to_string(), "@.example.com. A");
    }
}
