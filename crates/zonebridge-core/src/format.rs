//! Content formatting per record type
//!
//! Converts between a [`RecordValue`] and the content string of a backend
//! entry:
//!
//! | Type | Content |
//! |------|---------|
//! | MX | `<preference> <exchange>` |
//! | SRV | `<priority> <weight> <port> <target>` |
//! | CAA | `<flags> <tag> "<value>"` |
//! | TXT, SPF | text, `;` escaped as `\;` on decode |
//! | others | unchanged |
//!
//! Decoding splits shell-style on any run of whitespace, so `"0 0 0   ."` and
//! `"0 0 0 ."` decode to the same SRV value and encode back to the
//! single-spaced form.
//!
//! TXT escaping is one-way: decode escapes bare semicolons, encode writes
//! the value as is. A value read from the backend therefore goes back with
//! `\;` where the backend had `;`.

use crate::error::{Error, Result};
use crate::record::{RecordType, RecordValue};

/// Decode an entry's content into a value of type `rtype`
///
/// Hostname parts are returned as written; see [`crate::qualify`].
pub fn decode(rtype: RecordType, content: &str) -> Result<RecordValue> {
    match rtype {
        RecordType::A | RecordType::Aaaa => Ok(RecordValue::text(content.trim())),
        RecordType::Txt | RecordType::Spf => Ok(RecordValue::text(escape_semicolons(content))),
        RecordType::Alias | RecordType::Cname | RecordType::Ns | RecordType::Ptr => {
            let host = content.trim();
            if host.is_empty() {
                return Err(Error::invalid_content(rtype.as_str(), content, "empty hostname"));
            }
            Ok(RecordValue::host(host))
        }
        RecordType::Mx => {
            let [preference, exchange] = fields::<2>(rtype, content)?;
            Ok(RecordValue::mx(
                number(rtype, content, &preference)?,
                exchange,
            ))
        }
        RecordType::Srv => {
            let [priority, weight, port, target] = fields::<4>(rtype, content)?;
            Ok(RecordValue::srv(
                number(rtype, content, &priority)?,
                number(rtype, content, &weight)?,
                number(rtype, content, &port)?,
                target,
            ))
        }
        RecordType::Caa => {
            let [flags, tag, value] = fields::<3>(rtype, content)?;
            Ok(RecordValue::caa(number(rtype, content, &flags)?, tag, value))
        }
    }
}

/// Encode a value into entry content
pub fn encode(value: &RecordValue) -> String {
    match value {
        RecordValue::Text(text) => text.clone(),
        RecordValue::Host(host) => host.clone(),
        RecordValue::Mx {
            preference,
            exchange,
        } => format!("{} {}", preference, exchange),
        RecordValue::Srv {
            priority,
            weight,
            port,
            target,
        } => format!("{} {} {} {}", priority, weight, port, target),
        RecordValue::Caa { flags, tag, value } => {
            format!("{} {} \"{}\"", flags, tag, quote_escape(value))
        }
    }
}

/// Escape every semicolon not already preceded by a backslash
pub fn escape_semicolons(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut escaped = false;

    for c in content.chars() {
        if c == ';' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }

    out
}

fn quote_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Split content into exactly `N` fields
fn fields<const N: usize>(rtype: RecordType, content: &str) -> Result<[String; N]> {
    let tokens = shlex::split(content)
        .ok_or_else(|| Error::invalid_content(rtype.as_str(), content, "unbalanced quoting"))?;
    let found = tokens.len();

    tokens.try_into().map_err(|_| {
        Error::invalid_content(
            rtype.as_str(),
            content,
            format!("expected {} fields, found {}", N, found),
        )
    })
}

fn number<T: std::str::FromStr>(rtype: RecordType, content: &str, field: &str) -> Result<T> {
    field.parse().map_err(|_| {
        Error::invalid_content(rtype.as_str(), content, format!("\"{}\" is not a number", field))
    })
}
