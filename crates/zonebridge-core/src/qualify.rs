//! Name and hostname-value normalization against a zone
//!
//! Backends spell entry names in several ways: relative (`www`), the apex
//! marker (`@`), or fully qualified with or without the trailing dot
//! (`www.example.com`, `@.example.com.`). Grouped records always use a
//! relative name, with the empty string for the apex.

use crate::record::RecordValue;

/// Apex marker used by backends
pub const APEX: &str = "@";

/// Normalize a zone name so that it ends with exactly one dot
pub fn absolute_zone(zone: &str) -> String {
    let bare = zone.trim().trim_end_matches('.');
    format!("{}.", bare)
}

/// Reduce a backend entry name to a name relative to `zone`
///
/// A trailing zone suffix is stripped (with or without trailing dot, ASCII
/// case-insensitive). If what remains is the apex marker, or the name is the
/// zone itself, the result is the empty string. Names that do not carry the
/// suffix are taken as already relative.
pub fn relative_name(name: &str, zone: &str) -> String {
    let zone_bare = zone.trim().trim_end_matches('.');
    let name = name.trim().trim_end_matches('.');

    if name == APEX || name.eq_ignore_ascii_case(zone_bare) {
        return String::new();
    }

    if !zone_bare.is_empty() && name.len() > zone_bare.len() {
        let split = name.len() - zone_bare.len();
        if name.is_char_boundary(split) {
            let (head, tail) = name.split_at(split);
            if tail.eq_ignore_ascii_case(zone_bare)
                && let Some(head) = head.strip_suffix('.')
            {
                return if head == APEX {
                    String::new()
                } else {
                    head.to_string()
                };
            }
        }
    }

    name.to_string()
}

/// Build the backend entry name for a relative name
///
/// The apex is written as `@.<zone>.`, everything else as `<name>.<zone>.`.
pub fn entry_name(relative: &str, zone: &str) -> String {
    let zone = absolute_zone(zone);
    if relative.is_empty() {
        format!("{}.{}", APEX, zone)
    } else {
        format!("{}.{}", relative, zone)
    }
}

/// Qualify a hostname-shaped value
///
/// - ends with a dot: already fully qualified, unchanged
/// - contains a dot: an absolute name missing its trailing dot, which is
///   appended (out-of-zone targets stay out of zone)
/// - single label: relative to `zone`
pub fn qualify_host(value: &str, zone: &str) -> String {
    let value = value.trim();

    if value.ends_with('.') {
        value.to_string()
    } else if value.is_empty() {
        absolute_zone(zone)
    } else if value.contains('.') {
        format!("{}.", value)
    } else {
        format!("{}.{}", value, absolute_zone(zone))
    }
}

/// Qualify every hostname-shaped part of a decoded value
pub fn qualify_value(value: RecordValue, zone: &str) -> RecordValue {
    match value {
        RecordValue::Host(host) => RecordValue::Host(qualify_host(&host, zone)),
        RecordValue::Mx {
            preference,
            exchange,
        } => RecordValue::Mx {
            preference,
            exchange: qualify_host(&exchange, zone),
        },
        RecordValue::Srv {
            priority,
            weight,
            port,
            target,
        } => RecordValue::Srv {
            priority,
            weight,
            port,
            target: qualify_host(&target, zone),
        },
        other => other,
    }
}
