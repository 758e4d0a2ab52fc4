//! Minimal embedding example for zonebridge-core
//!
//! Populates a zone from an in-memory backend, builds a plan the way a
//! zone-management framework would, and applies it. Set `ZONEBRIDGE_LOG`
//! to `debug` to see every listed entry.

use std::env;

use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use zonebridge_core::{
    BackendConfig, ChangeOp, FlatEntry, GroupedRecord, MemoryBackend, Plan, Provider,
    ProviderConfig, RecordType, RecordValue, Zone,
};

const ZONE: &str = "example.com.";

fn seed_entries() -> Vec<FlatEntry> {
    vec![
        FlatEntry::new("A", "@", 3600, "192.0.2.10"),
        FlatEntry::new("MX", "@", 3600, "10 mail"),
        FlatEntry::new("MX", "@", 3600, "20 backup.mail.example.net."),
        FlatEntry::new("TXT", "@", 3600, "v=spf1 mx; -all"),
        FlatEntry::new("A", "www.example.com", 300, "192.0.2.20"),
        FlatEntry::new("A", "www.example.com", 300, "192.0.2.21"),
        FlatEntry::new("URL", "go", 300, "https://www.example.com/"),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let level = match env::var("ZONEBRIDGE_LOG").as_deref() {
        Ok("trace") => Level::TRACE,
        Ok("debug") => Level::DEBUG,
        Ok("warn") => Level::WARN,
        Ok("error") => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let backend = MemoryBackend::new();
    backend.seed(seed_entries()).await;

    let config = ProviderConfig::new("embedded", BackendConfig::Memory);
    let mut provider = Provider::new(config, Box::new(backend.clone()))?;

    let mut zone = Zone::new(ZONE);
    let exists = provider.populate(&mut zone, false).await?;
    info!("Zone {} exists={} with {} records", zone.name(), exists, zone.len());

    for record in zone.records() {
        info!("  {} ttl={} values={:?}", record.key(), record.ttl(), record.values());
    }

    // Replace one www address, add a CNAME, drop the TXT record
    let mut changes = Vec::new();

    if let Some(www) = zone.get("www", RecordType::A) {
        let desired = GroupedRecord::new(
            ZONE,
            "www",
            RecordType::A,
            www.ttl(),
            [RecordValue::text("192.0.2.20"), RecordValue::text("192.0.2.22")],
        )?;
        changes.push(ChangeOp::Update {
            existing: www.clone(),
            new: desired,
        });
    }

    changes.push(ChangeOp::Create(GroupedRecord::new(
        ZONE,
        "blog",
        RecordType::Cname,
        600,
        [RecordValue::host("www.example.com.")],
    )?));

    if let Some(txt) = zone.get("", RecordType::Txt) {
        changes.push(ChangeOp::Delete(txt.clone()));
    }

    let plan = Plan::new(ZONE, changes);
    let applied = provider.apply(&plan).await?;
    info!("Applied {} changes", applied);

    for entry in backend.entries().await {
        info!(
            "  {} {} ttl={} \"{}\" id={}",
            entry.rtype,
            entry.name,
            entry.ttl,
            entry.content,
            entry.id.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
