//! Conversion from directory records to [`NormalizedStation`].

use chrono::{DateTime, Utc};

use crate::domain::{NormalizedStation, PlugType};

use super::types::{AddressInfo, UpstreamStation};

/// Map one directory record into the canonical station shape.
///
/// Pure: no I/O, never fails. Connections without a connection type are
/// skipped, and missing operator contact details become `None`.
pub fn normalize_station(station: &UpstreamStation) -> NormalizedStation {
    let address = &station.address_info;

    let plug_types = station
        .connections
        .iter()
        .filter_map(|c| c.connection_type.as_ref())
        .map(|ct| PlugType {
            kind: ct.title.clone().unwrap_or_default(),
            speed_code: ct.id,
        })
        .collect();

    let (support_number, support_email) = match &station.operator_info {
        Some(op) => (
            non_empty(op.phone_primary_contact.as_deref()),
            non_empty(op.contact_email.as_deref()),
        ),
        None => (None, None),
    };

    let last_updated = station
        .data_provider
        .as_ref()
        .and_then(|p| p.date_last_imported.as_deref())
        .and_then(parse_timestamp);

    NormalizedStation {
        external_id: station.id,
        last_updated,
        name: address.title.clone().unwrap_or_default(),
        address: address.address_line1.clone().unwrap_or_default(),
        city_state_zip: city_state_zip(address),
        latitude: address.latitude,
        longitude: address.longitude,
        plug_types,
        support_number,
        support_email,
        operating_hours: non_empty(address.access_comments.as_deref()),
    }
}

/// Format "Town, State Postcode".
fn city_state_zip(address: &AddressInfo) -> String {
    format!(
        "{}, {} {}",
        address.town.as_deref().unwrap_or_default(),
        address.state_or_province.as_deref().unwrap_or_default(),
        address.postcode.as_deref().unwrap_or_default(),
    )
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// The directory emits RFC 3339 timestamps, sometimes without a zone.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
