//! Conversion between JSON values and XML-RPC values.

use std::collections::BTreeMap;
use std::fmt::Write;

use ejab_core::error::TransportError;
use iso8601::{Date, DateTime};
use serde_json::{Map, Number, Value};

/// Convert a JSON value into an XML-RPC value.
///
/// Integers that fit in 32 bits become `<int>`, wider ones `<i8>`; `null`
/// becomes `<nil/>`. Unsigned integers above `i64::MAX` have no XML-RPC
/// integer type and are rejected rather than rounded to a `<double>`.
pub(crate) fn to_xmlrpc(value: Value) -> Result<xmlrpc::Value, TransportError> {
    Ok(match value {
        Value::Null => xmlrpc::Value::Nil,
        Value::Bool(b) => xmlrpc::Value::Bool(b),
        Value::Number(n) => number_to_xmlrpc(&n)?,
        Value::String(s) => xmlrpc::Value::String(s),
        Value::Array(items) => xmlrpc::Value::Array(
            items
                .into_iter()
                .map(to_xmlrpc)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(map) => xmlrpc::Value::Struct(
            map.into_iter()
                .map(|(k, v)| Ok((k, to_xmlrpc(v)?)))
                .collect::<Result<BTreeMap<_, _>, TransportError>>()?,
        ),
    })
}

fn number_to_xmlrpc(n: &Number) -> Result<xmlrpc::Value, TransportError> {
    if let Some(i) = n.as_i64() {
        return Ok(match i32::try_from(i) {
            Ok(small) => xmlrpc::Value::Int(small),
            Err(_) => xmlrpc::Value::Int64(i),
        });
    }
    if n.is_u64() {
        return Err(TransportError::Encode {
            message: format!("integer {n} does not fit in a 64-bit XML-RPC integer"),
        });
    }
    n.as_f64()
        .map(xmlrpc::Value::Double)
        .ok_or_else(|| TransportError::Encode {
            message: format!("number {n} cannot be represented as a double"),
        })
}

/// Convert an XML-RPC value into a JSON value.
pub(crate) fn from_xmlrpc(value: xmlrpc::Value) -> Value {
    match value {
        xmlrpc::Value::Int(i) => Value::from(i),
        xmlrpc::Value::Int64(i) => Value::from(i),
        xmlrpc::Value::Bool(b) => Value::Bool(b),
        xmlrpc::Value::String(s) => Value::String(s),
        xmlrpc::Value::Double(d) => Number::from_f64(d).map_or(Value::Null, Value::Number),
        xmlrpc::Value::DateTime(dt) => Value::String(format_datetime(&dt)),
        xmlrpc::Value::Base64(bytes) => Value::from(bytes),
        xmlrpc::Value::Struct(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, from_xmlrpc(v)))
                .collect::<Map<_, _>>(),
        ),
        xmlrpc::Value::Array(items) => Value::Array(items.into_iter().map(from_xmlrpc).collect()),
        xmlrpc::Value::Nil => Value::Null,
    }
}

/// Render a `dateTime.iso8601` value in the basic format XML-RPC servers
/// send, e.g. `20240102T03:04:05`.
fn format_datetime(dt: &DateTime) -> String {
    let mut out = match dt.date {
        Date::YMD { year, month, day } => format!("{year:04}{month:02}{day:02}"),
        Date::Week { year, ww, d } => format!("{year:04}W{ww:02}{d}"),
        Date::Ordinal { year, ddd } => format!("{year:04}{ddd:03}"),
    };

    let time = &dt.time;
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "T{:02}:{:02}:{:02}",
        time.hour, time.minute, time.second
    );
    if time.millisecond > 0 {
        let _ = write!(out, ".{:03}", time.millisecond);
    }
    if time.tz_offset_hours != 0 || time.tz_offset_minutes != 0 {
        let sign = if time.tz_offset_hours < 0 || time.tz_offset_minutes < 0 {
            '-'
        } else {
            '+'
        };
        let _ = write!(
            out,
            "{sign}{:02}:{:02}",
            time.tz_offset_hours.abs(),
            time.tz_offset_minutes.abs()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encodes_arguments_struct() {
        let value = to_xmlrpc(json!({"user": "alice", "limit": 3, "force": true})).unwrap();
        let xmlrpc::Value::Struct(map) = value else {
            panic!("expected struct");
        };
        assert_eq!(map.get("user"), Some(&xmlrpc::Value::String("alice".into())));
        assert_eq!(map.get("limit"), Some(&xmlrpc::Value::Int(3)));
        assert_eq!(map.get("force"), Some(&xmlrpc::Value::Bool(true)));
    }

    #[test]
    fn wide_integers_use_i8() {
        assert_eq!(
            to_xmlrpc(json!(5_000_000_000_i64)).unwrap(),
            xmlrpc::Value::Int64(5_000_000_000)
        );
        assert_eq!(to_xmlrpc(json!(null)).unwrap(), xmlrpc::Value::Nil);
        assert_eq!(to_xmlrpc(json!(1.5)).unwrap(), xmlrpc::Value::Double(1.5));
    }

    #[test]
    fn integers_beyond_i64_are_rejected() {
        let err = to_xmlrpc(json!({"limit": u64::MAX})).unwrap_err();
        assert!(matches!(err, TransportError::Encode { .. }));
        assert!(err.to_string().contains(&u64::MAX.to_string()));
    }

    #[test]
    fn decodes_nested_reply() {
        let mut option = BTreeMap::new();
        option.insert("name".to_string(), xmlrpc::Value::String("title".into()));
        let reply = xmlrpc::Value::Struct(BTreeMap::from([(
            "options".to_string(),
            xmlrpc::Value::Array(vec![xmlrpc::Value::Struct(option), xmlrpc::Value::Int(0)]),
        )]));

        assert_eq!(
            from_xmlrpc(reply),
            json!({"options": [{"name": "title"}, 0]})
        );
    }

    #[test]
    fn decodes_datetime_as_iso8601() {
        let body = concat!(
            r#"<?xml version="1.0"?><methodResponse><params><param><value>"#,
            "<dateTime.iso8601>20240102T03:04:05</dateTime.iso8601>",
            "</value></param></params></methodResponse>",
        );
        let value = xmlrpc::Request::new("created_at")
            .call(crate::transport::BufferedReply(body.as_bytes().to_vec()))
            .unwrap();

        assert_eq!(from_xmlrpc(value), json!("20240102T03:04:05"));
    }

    #[test]
    fn datetime_keeps_fraction_and_offset() {
        let dt = iso8601::datetime("20160502T06:01:05.400-08:30").unwrap();
        assert_eq!(
            from_xmlrpc(xmlrpc::Value::DateTime(dt)),
            json!("20160502T06:01:05.400-08:30")
        );
    }

    #[test]
    fn non_finite_doubles_become_null() {
        assert_eq!(from_xmlrpc(xmlrpc::Value::Double(f64::NAN)), Value::Null);
        assert_eq!(from_xmlrpc(xmlrpc::Value::Double(1.5)), json!(1.5));
    }
}
