//! Shared test fixtures: directory records and a geocoder that knows them.

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::domain::Location;
use crate::geocode::MockGeocoder;
use crate::places::{MockPlaces, PlaceCategory};

/// Two stations in San Francisco's Mission Bay, as the directory returns them.
pub fn station_records() -> Vec<Value> {
    vec![
        json!({
            "ID": 187734,
            "UUID": "6B1B1B6E-2E0A-4C54-9C1A-0D1B7C2F6A11",
            "DataProvider": { "DateLastImported": "2023-01-05T01:12:00Z" },
            "AddressInfo": {
                "Title": "Mission Bay Garage",
                "AddressLine1": "450 Mission Bay Blvd",
                "Town": "San Francisco",
                "StateOrProvince": "CA",
                "Postcode": "94158",
                "Latitude": 37.7706,
                "Longitude": -122.3915,
                "AccessComments": "24/7"
            },
            "Connections": [
                { "ConnectionType": { "ID": 1, "Title": "Type 1 (J1772)" } },
                { "ConnectionType": { "ID": 32, "Title": "CCS (Type 1)" } }
            ],
            "OperatorInfo": {
                "PhonePrimaryContact": "1-888-758-4389",
                "ContactEmail": "support@example.com"
            }
        }),
        json!({
            "ID": 204511,
            "DataProvider": { "DateLastImported": "2023-03-18T09:00:00Z" },
            "AddressInfo": {
                "Title": "Dogpatch Street Charger",
                "AddressLine1": "901 Tennessee St",
                "Town": "San Francisco",
                "StateOrProvince": "CA",
                "Postcode": "94107",
                "Latitude": 37.7599,
                "Longitude": -122.3894
            },
            "Connections": [
                { "ConnectionType": { "ID": 25, "Title": "Type 2 (Socket Only)" } }
            ]
        }),
    ]
}

pub fn geocoder() -> MockGeocoder {
    MockGeocoder::new([
        ("94107", Location::new(37.7648, -122.3969).unwrap()),
        ("Oakland, CA", Location::new(37.8044, -122.2712).unwrap()),
    ])
}

pub fn places() -> MockPlaces {
    let mut results = HashMap::new();
    results.insert(
        PlaceCategory::Theater,
        vec![json!({ "name": "Alamo Drafthouse", "place_id": "t1" })],
    );
    results.insert(
        PlaceCategory::Restaurant,
        vec![
            json!({ "name": "Gott's Roadside", "place_id": "r1" }),
            json!({ "name": "Mission Rock Cafe", "place_id": "r2" }),
        ],
    );
    results.insert(PlaceCategory::Store, vec![]);
    MockPlaces::new(results)
}
