//! Open Charge Map response DTOs.
//!
//! These map directly onto the `/v3/poi/` JSON. Fields are `Option`
//! liberally because the directory omits or nulls them freely.

use serde::Deserialize;

/// One point of interest (a charging station).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamStation {
    #[serde(rename = "ID")]
    pub id: i64,

    pub data_provider: Option<DataProvider>,

    pub address_info: AddressInfo,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub connections: Vec<Connection>,

    pub operator_info: Option<OperatorInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataProvider {
    /// ISO 8601 timestamp, e.g. "2023-01-05T01:12:00Z".
    pub date_last_imported: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddressInfo {
    pub title: Option<String>,
    pub address_line1: Option<String>,
    pub town: Option<String>,
    pub state_or_province: Option<String>,
    pub postcode: Option<String>,
    pub latitude: f64,
    pub longitude: f64,

    /// Free-text access notes, typically opening hours.
    pub access_comments: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Connection {
    pub connection_type: Option<ConnectionType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectionType {
    #[serde(rename = "ID")]
    pub id: i64,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperatorInfo {
    pub phone_primary_contact: Option<String>,
    pub contact_email: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_record() {
        let json = r#"{
            "ID": 101,
            "AddressInfo": { "Latitude": 37.7, "Longitude": -122.4 },
            "Connections": null
        }"#;
        let station: UpstreamStation = serde_json::from_str(json).unwrap();
        assert_eq!(station.id, 101);
        assert!(station.connections.is_empty());
        assert!(station.operator_info.is_none());
        assert!(station.data_provider.is_none());
    }

    #[test]
    fn ignores_unknown_fields() {
        let json = r#"{
            "ID": 5,
            "UUID": "abc",
            "NumberOfPoints": 4,
            "AddressInfo": {
                "Title": "Depot",
                "Latitude": 1.0,
                "Longitude": 2.0,
                "CountryID": 2
            },
            "Connections": [
                { "ConnectionType": { "ID": 25, "Title": "Type 2", "IsObsolete": false }, "PowerKW": 22 }
            ]
        }"#;
        let station: UpstreamStation = serde_json::from_str(json).unwrap();
        assert_eq!(station.connections.len(), 1);
        assert_eq!(
            station.connections[0].connection_type.as_ref().unwrap().id,
            25
        );
    }
}
