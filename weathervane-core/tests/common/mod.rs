//! OpenWeather-shaped payloads shared by the HTTP tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

/// 2024-05-01 00:00:00 UTC
pub const START: i64 = 1_714_521_600;

pub fn current_payload(name: &str, country: &str, main: &str, description: &str) -> Value {
    json!({
        "coord": { "lon": 28.95, "lat": 41.01 },
        "weather": [{ "id": 800, "main": main, "description": description, "icon": "01d" }],
        "main": {
            "temp": 21.3,
            "feels_like": 20.8,
            "temp_min": 20.0,
            "temp_max": 22.1,
            "pressure": 1016,
            "humidity": 48
        },
        "visibility": 10000,
        "wind": { "speed": 4.6, "deg": 30 },
        "dt": START,
        "sys": { "country": country, "sunrise": START + 10_800, "sunset": START + 61_200 },
        "timezone": 10800,
        "name": name,
        "cod": 200
    })
}

/// `slots` forecast entries, 3 hours apart, starting at [`START`].
pub fn forecast_payload(slots: i64, description: &str) -> Value {
    let list: Vec<Value> = (0..slots)
        .map(|slot| {
            let dt = START + slot * 10_800;
            let dt_txt = DateTime::<Utc>::from_timestamp(dt, 0)
                .unwrap()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string();
            json!({
                "dt": dt,
                "main": {
                    "temp": 14.5 + slot as f64 * 0.25,
                    "feels_like": 14.0,
                    "pressure": 1012,
                    "humidity": 60
                },
                "weather": [{ "main": "Clouds", "description": description }],
                "wind": { "speed": 3.4, "deg": 250 },
                "visibility": 10000,
                "dt_txt": dt_txt
            })
        })
        .collect();

    json!({ "cod": "200", "cnt": slots, "list": list, "city": { "name": "Istanbul", "country": "TR" } })
}
