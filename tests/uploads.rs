mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use common::{Canned, MockApi};
use serde_json::{json, Map, Value};
use waterspy::{
    upload_logger, upload_manual_groundwater_table, upload_subirrigation_data, LoggerMeasurement,
    OptionEntry, OptionTarget, Project, SubirriTimeseries, TimeSeries, WaterspyError,
    WatersyncClient,
};

fn client(mock: &MockApi) -> WatersyncClient {
    WatersyncClient::builder()
        .base_url(&mock.base_url)
        .project("delta")
        .token("secret-token")
        .build()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn hourly(values: &[f64]) -> TimeSeries {
    TimeSeries::from_pairs(
        values
            .iter()
            .enumerate()
            .map(|(hour, value)| (Utc.with_ymd_and_hms(2024, 3, 1, hour as u32, 0, 0).unwrap(), *value)),
    )
}

#[test]
fn test_manual_table_upload_fills_missing_comment() -> Result<(), WaterspyError> {
    let mock = MockApi::start(vec![Canned::json(201, json!([]))]);
    let table = polars::df!(
        "timestamp" => ["2024-01-05 09:30:00", "2024-02-05"],
        "depth" => [Some(1.25), None],
    )?;

    upload_manual_groundwater_table(&client(&mock), "PZ01", &table)?;

    let requests = mock.finish();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path(), "/api/groundwater/manualmeasurements/");
    assert_eq!(
        requests[0].json(),
        json!([
            {
                "timestamp": "2024-01-05T09:30:00+00:00",
                "depth": 1.25,
                "comment": null,
                "station": "PZ01"
            },
            {
                "timestamp": "2024-02-05T00:00:00+00:00",
                "depth": null,
                "comment": null,
                "station": "PZ01"
            }
        ])
    );
    Ok(())
}

#[test]
fn test_manual_table_upload_keeps_comments() -> Result<(), WaterspyError> {
    let mock = MockApi::start(vec![Canned::json(201, json!([]))]);
    let table = polars::df!(
        "timestamp" => ["2024-01-05"],
        "depth" => [0.8],
        "comment" => ["after pumping"],
    )?;

    upload_manual_groundwater_table(&client(&mock), "PZ02", &table)?;

    let requests = mock.finish();
    assert_eq!(requests[0].json()[0]["comment"], "after pumping");
    assert_eq!(requests[0].json()[0]["station"], "PZ02");
    Ok(())
}

#[test]
fn test_manual_table_upload_requires_depth() {
    let client = WatersyncClient::builder().base_url("http://127.0.0.1:9").build();
    let table = polars::df!("timestamp" => ["2024-01-05"]).unwrap();
    assert!(matches!(
        upload_manual_groundwater_table(&client, "PZ01", &table),
        Err(WaterspyError::Reshape(_))
    ));
}

#[test]
fn test_logger_records_upload_sends_metadata_as_params() -> Result<(), WaterspyError> {
    let mock = MockApi::start(vec![Canned::json(201, json!({"created": 2}))]);
    let measurement = LoggerMeasurement {
        timeseries: hourly(&[1012.5, 1013.0]),
        station: "PZ01".to_string(),
        logger: "AB123".to_string(),
        measurement_type: "pressure".to_string(),
        unit: "cmH2O".to_string(),
        logger_altitude: Some(-3.2),
    };

    measurement.upload(&client(&mock))?;

    let requests = mock.finish();
    assert_eq!(requests[0].path(), "/api/groundwater/loggerrecords/");
    let query = requests[0].query();
    for (key, value) in [
        ("station", "PZ01"),
        ("logger", "AB123"),
        ("measurement_type", "pressure"),
        ("unit", "cmH2O"),
        ("project", "delta"),
    ] {
        assert!(query.contains(&(key.to_string(), value.to_string())), "missing {key}");
    }
    assert_eq!(
        requests[0].json(),
        json!([
            {"timestamp": "2024-03-01T00:00:00+00:00", "value": 1012.5},
            {"timestamp": "2024-03-01T01:00:00+00:00", "value": 1013.0}
        ])
    );
    Ok(())
}

#[test]
fn test_subirrigation_upload_posts_flows() -> Result<(), WaterspyError> {
    let mock = MockApi::start(vec![Canned::json(201, json!({"created": 1}))]);
    let flows = SubirriTimeseries {
        timeseries: hourly(&[f64::NAN]),
        measurement_type: "flow".to_string(),
        logger: "FL77".to_string(),
        subirri_location: "SUB-North".to_string(),
        unit: "m3/h".to_string(),
    };

    upload_subirrigation_data(&client(&mock), &flows)?;

    let requests = mock.finish();
    assert_eq!(requests[0].path(), "/api/subirri/measurement/");
    let query = requests[0].query();
    assert!(query.contains(&("station".to_string(), "SUB-North".to_string())));
    assert!(query.contains(&("unit".to_string(), "m3/h".to_string())));
    assert_eq!(
        requests[0].json(),
        json!([{"timestamp": "2024-03-01T00:00:00+00:00", "value": null}])
    );
    Ok(())
}

#[test]
fn test_option_entry_posts_object_to_target() -> Result<(), WaterspyError> {
    let mock = MockApi::start(vec![Canned::json(201, json!({"id": 3}))]);
    let entry = OptionEntry::new(
        OptionTarget::LoggerModels,
        object(json!({"model": "Diver", "manufacturer": "Van Essen"})),
    );
    assert!(entry.missing_fields().is_empty());

    entry.upload(&client(&mock))?;

    let requests = mock.finish();
    assert_eq!(requests[0].path(), "/api/logger/models/");
    assert_eq!(requests[0].authorization.as_deref(), Some("Token secret-token"));
    assert_eq!(
        requests[0].json(),
        json!({"model": "Diver", "manufacturer": "Van Essen"})
    );
    Ok(())
}

#[test]
fn test_project_upload() -> Result<(), WaterspyError> {
    let mock = MockApi::start(vec![Canned::json(201, json!({"id": 1}))]);
    let project = Project {
        description: Some("Brackish seepage monitoring".to_string()),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        ..Project::new("Delta seepage")
    };

    project.upload(&client(&mock))?;

    let requests = mock.finish();
    assert_eq!(requests[0].path(), "/api/base/projects/");
    assert_eq!(
        requests[0].json(),
        json!({
            "name": "Delta seepage",
            "description": "Brackish seepage monitoring",
            "start_date": "2024-01-01"
        })
    );
    Ok(())
}

#[test]
fn test_upload_logger_registers_single_logger() -> Result<(), WaterspyError> {
    let mock = MockApi::start(vec![Canned::json(201, json!([{"id": 9}]))]);

    upload_logger()
        .client(&client(&mock))
        .serial_no("AB123")
        .logger_type("diver")
        .model(object(json!({"model": "TD-Diver", "manufacturer": "Van Essen"})))
        .owner(vec!["Deltares".to_string()])
        .measurement_types(vec!["pressure".to_string(), "temperature".to_string()])
        .available(true)
        .call()?;

    let requests = mock.finish();
    assert_eq!(requests[0].path(), "/api/logger/loggers/");
    assert_eq!(
        requests[0].json(),
        json!([{
            "identifier": "AB123",
            "type": "diver",
            "available": true,
            "owner": ["Deltares"],
            "measurement_type": ["pressure", "temperature"],
            "model": {"model": "TD-Diver", "manufacturer": "Van Essen"}
        }])
    );
    Ok(())
}
