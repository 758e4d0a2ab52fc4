//! Test doubles and fixtures for the contract tests
//!
//! `RecordingBackend` serves a fixed listing and records every call made to
//! it, so tests can assert the exact sequence of backend calls a populate
//! or apply produced.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zonebridge_core::traits::Backend;
use zonebridge_core::{
    BackendConfig, Error, FlatEntry, GroupedRecord, Provider, ProviderConfig, RecordType,
    RecordValue, Result,
};

pub const ZONE: &str = "blodapels.in.";

/// One call observed by the recording backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Authenticate,
    List,
    SetTtl(u32),
    Create {
        rtype: String,
        name: String,
        content: String,
    },
    Update {
        id: Option<String>,
        rtype: String,
        name: String,
        content: String,
    },
    Delete {
        id: Option<String>,
        rtype: String,
        name: String,
        content: String,
    },
}

impl Call {
    pub fn create(rtype: &str, name: &str, content: &str) -> Self {
        Call::Create {
            rtype: rtype.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    pub fn update(id: Option<&str>, rtype: &str, name: &str, content: &str) -> Self {
        Call::Update {
            id: id.map(str::to_string),
            rtype: rtype.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    pub fn delete(id: Option<&str>, rtype: &str, name: &str, content: &str) -> Self {
        Call::Delete {
            id: id.map(str::to_string),
            rtype: rtype.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Create { .. } | Call::Update { .. } | Call::Delete { .. }
        )
    }
}

/// How a scripted failure surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The backend answers "no"
    Reject,
    /// Transport-level error
    Transport,
}

/// A backend that lists fixed entries and records every call
#[derive(Clone, Default)]
pub struct RecordingBackend {
    entries: Arc<Mutex<Vec<FlatEntry>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    failures: Arc<Mutex<Vec<(String, Failure)>>>,
    fail_auth: Arc<Mutex<bool>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<FlatEntry>) -> Self {
        let backend = Self::new();
        backend.set_entries(entries);
        backend
    }

    pub fn set_entries(&self, entries: Vec<FlatEntry>) {
        *self.entries.lock().unwrap() = entries;
    }

    /// Fail any mutation whose content equals `content`
    pub fn fail_on(&self, content: &str, failure: Failure) {
        self.failures
            .lock()
            .unwrap()
            .push((content.to_string(), failure));
    }

    pub fn fail_authentication(&self) {
        *self.fail_auth.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Only create/update/delete calls, in order
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(Call::is_mutation)
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(*c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn outcome(&self, content: &str) -> Result<()> {
        let failures = self.failures.lock().unwrap();
        match failures.iter().find(|(c, _)| c == content) {
            Some((_, Failure::Reject)) => Err(Error::rejected(format!("refused {}", content))),
            Some((_, Failure::Transport)) => {
                Err(Error::backend("recording", "connection reset by peer"))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    async fn authenticate(&self) -> Result<()> {
        self.record(Call::Authenticate);
        if *self.fail_auth.lock().unwrap() {
            return Err(Error::auth("invalid token"));
        }
        Ok(())
    }

    async fn list_records(
        &self,
        rtype: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Result<Vec<FlatEntry>> {
        assert!(
            rtype.is_none() && name.is_none() && content.is_none(),
            "populate must list without filters"
        );
        self.record(Call::List);
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn create_record(&self, rtype: &str, name: &str, content: &str) -> Result<()> {
        self.record(Call::create(rtype, name, content));
        self.outcome(content)
    }

    async fn update_record(
        &self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: &str,
    ) -> Result<()> {
        self.record(Call::update(identifier, rtype, name, content));
        self.outcome(content)
    }

    async fn delete_record(
        &self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: &str,
    ) -> Result<()> {
        self.record(Call::delete(identifier, rtype, name, content));
        self.outcome(content)
    }

    fn set_ttl(&self, ttl: u32) {
        self.record(Call::SetTtl(ttl));
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

/// Provider with default settings over a recording backend
pub fn provider(backend: &RecordingBackend) -> Provider {
    provider_with(backend, ProviderConfig::new("unittests", BackendConfig::Memory))
}

pub fn provider_with(backend: &RecordingBackend, config: ProviderConfig) -> Provider {
    Provider::new(config, Box::new(backend.clone())).expect("valid provider config")
}

/// The listing of a small production zone, as a multi-provider API returns it
pub fn zone_entries() -> Vec<FlatEntry> {
    vec![
        FlatEntry::new("A", "@.blodapels.in", 10800, "192.0.184.38").with_id("@"),
        FlatEntry::new("MX", "@.blodapels.in", 10800, "10 spool.mail.example.com.").with_id("@"),
        FlatEntry::new("MX", "@.blodapels.in", 10800, "50 fb.mail.example.com.").with_id("@"),
        FlatEntry::new(
            "TXT",
            "@.blodapels.in",
            10800,
            "v=spf1 include:_mailcust.example.com ?all",
        )
        .with_id("@"),
        FlatEntry::new("CNAME", "webmail.blodapels.in", 10800, "webmail.example.com.")
            .with_id("webmail"),
        FlatEntry::new("CNAME", "www.blodapels.in", 10800, "webredir.vip.example.com.")
            .with_id("www"),
        FlatEntry::new("SRV", "_imap._tcp.blodapels.in", 10800, "0 0 0   .")
            .with_id("_imap._tcp"),
        FlatEntry::new("SRV", "_imaps._tcp.blodapels.in", 10800, "0 1 993 mail.example.com.")
            .with_id("_imaps._tcp"),
        FlatEntry::new("SRV", "_pop3._tcp.blodapels.in", 10800, "0 0 0   .")
            .with_id("_pop3._tcp"),
        FlatEntry::new("SRV", "_pop3s._tcp.blodapels.in", 10800, "10 1 995 mail.example.com.")
            .with_id("_pop3s._tcp"),
        FlatEntry::new(
            "SRV",
            "_submission._tcp.blodapels.in",
            10800,
            "0 1 465 mail.example.com.",
        )
        .with_id("_submission._tcp"),
        FlatEntry::new("URL", "@.id.example.com", 1800, "http://www.example.com/")
            .with_id("745514"),
        FlatEntry::new("CAA", "@.blodapels.in", 10800, "0 issue \";\"").with_id("@"),
        FlatEntry::new("CAA", "@.blodapels.in", 10800, "0 issuewild \"letsencrypt.org\"")
            .with_id("@"),
    ]
}

fn record(name: &str, rtype: RecordType, values: Vec<RecordValue>) -> GroupedRecord {
    GroupedRecord::new(ZONE, name, rtype, 10800, values).expect("fixture record")
}

/// The grouped records `zone_entries` aggregates to
pub fn zone_records() -> Vec<GroupedRecord> {
    let mail = "mail.example.com.";
    vec![
        record("", RecordType::A, vec![RecordValue::text("192.0.184.38")]),
        record(
            "",
            RecordType::Mx,
            vec![
                RecordValue::mx(10, "spool.mail.example.com."),
                RecordValue::mx(50, "fb.mail.example.com."),
            ],
        ),
        record(
            "",
            RecordType::Txt,
            vec![RecordValue::text("v=spf1 include:_mailcust.example.com ?all")],
        ),
        record(
            "webmail",
            RecordType::Cname,
            vec![RecordValue::host("webmail.example.com.")],
        ),
        record(
            "www",
            RecordType::Cname,
            vec![RecordValue::host("webredir.vip.example.com.")],
        ),
        record("_imap._tcp", RecordType::Srv, vec![RecordValue::srv(0, 0, 0, ".")]),
        record("_imaps._tcp", RecordType::Srv, vec![RecordValue::srv(0, 1, 993, mail)]),
        record("_pop3._tcp", RecordType::Srv, vec![RecordValue::srv(0, 0, 0, ".")]),
        record("_pop3s._tcp", RecordType::Srv, vec![RecordValue::srv(10, 1, 995, mail)]),
        record(
            "_submission._tcp",
            RecordType::Srv,
            vec![RecordValue::srv(0, 1, 465, mail)],
        ),
        record(
            "",
            RecordType::Caa,
            vec![
                RecordValue::caa(0, "issue", ";"),
                RecordValue::caa(0, "issuewild", "letsencrypt.org"),
            ],
        ),
    ]
}

const MANY: [&str; 5] = [
    "192.168.1.1",
    "192.168.1.2",
    "192.168.1.5",
    "192.168.2.4",
    "192.168.2.3",
];

/// Five entries of one A record; ids are distinct unless `shared_id`
pub fn many_entries(shared_id: bool) -> Vec<FlatEntry> {
    let ids = ["747789", "747790", "747793", "747794", "747795"];
    MANY.iter()
        .zip(ids)
        .map(|(ip, id)| {
            let id = if shared_id { "test-many" } else { id };
            FlatEntry::new("A", "test-many.blodapels.in", 1337, *ip).with_id(id)
        })
        .collect()
}

/// The record `many_entries` aggregates to
pub fn many_record() -> GroupedRecord {
    GroupedRecord::new(
        ZONE,
        "test-many",
        RecordType::A,
        1337,
        MANY.iter().map(|ip| RecordValue::text(*ip)),
    )
    .expect("fixture record")
}

/// The desired state for the many-values update scenarios
pub fn desired_many_record() -> GroupedRecord {
    GroupedRecord::new(
        ZONE,
        "test-many",
        RecordType::A,
        1337,
        [
            "192.168.1.1",
            "192.168.1.2",
            "192.168.1.3",
            "192.168.1.4",
            "192.168.1.5",
            "192.168.7.7",
        ]
        .map(RecordValue::text),
    )
    .expect("fixture record")
}
