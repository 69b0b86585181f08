//! Monitoring stations: wells, piezometers, gauges and meteorological posts.

use crate::api::error::ApiError;
use crate::api::response::WaterResponse;
use crate::client::WatersyncClient;
use crate::utils::round2;
use bon::bon;
use log::info;
use serde::{Deserialize, Serialize};

const STATION_ENDPOINT: &str = "base/station";

/// Category of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    Surfacewater,
    Groundwater,
    Meteorological,
    Wastewater,
    Other,
}

/// A location in the API's coordinate reference system.
///
/// Serialized as a GeoJSON point: `{"type": "Point", "coordinates": [x, y]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "GeoJson", from = "GeoJson")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum GeoJson {
    Point { coordinates: [f64; 2] },
}

impl From<Point> for GeoJson {
    fn from(point: Point) -> Self {
        GeoJson::Point {
            coordinates: [point.x, point.y],
        }
    }
}

impl From<GeoJson> for Point {
    fn from(geojson: GeoJson) -> Self {
        match geojson {
            GeoJson::Point { coordinates: [x, y] } => Point { x, y },
        }
    }
}

/// Construction details of a groundwater station.
///
/// Lengths are in metres and rounded to centimetres when the value is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStationDetail")]
pub struct StationDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    total_len: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    depth_mbgl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diameter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    technique: Option<String>,
}

#[derive(Deserialize)]
struct RawStationDetail {
    total_len: Option<f64>,
    height: Option<f64>,
    depth_mbgl: Option<f64>,
    filter_bottom: Option<f64>,
    filter_top: Option<f64>,
    diameter: Option<f64>,
    material: Option<String>,
    technique: Option<String>,
}

impl From<RawStationDetail> for StationDetail {
    fn from(raw: RawStationDetail) -> Self {
        StationDetail::builder()
            .maybe_total_len(raw.total_len)
            .maybe_height(raw.height)
            .maybe_depth_mbgl(raw.depth_mbgl)
            .maybe_filter_bottom(raw.filter_bottom)
            .maybe_filter_top(raw.filter_top)
            .maybe_diameter(raw.diameter)
            .maybe_material(raw.material)
            .maybe_technique(raw.technique)
            .build()
    }
}

#[bon]
impl StationDetail {
    #[builder]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        total_len: Option<f64>,
        height: Option<f64>,
        depth_mbgl: Option<f64>,
        filter_bottom: Option<f64>,
        filter_top: Option<f64>,
        diameter: Option<f64>,
        #[builder(into)] material: Option<String>,
        #[builder(into)] technique: Option<String>,
    ) -> Self {
        Self {
            total_len: total_len.map(round2),
            height: height.map(round2),
            depth_mbgl: depth_mbgl.map(round2),
            filter_bottom: filter_bottom.map(round2),
            filter_top: filter_top.map(round2),
            diameter: diameter.map(round2),
            material,
            technique,
        }
    }

    pub fn total_len(&self) -> Option<f64> {
        self.total_len
    }

    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn depth_mbgl(&self) -> Option<f64> {
        self.depth_mbgl
    }

    pub fn filter_bottom(&self) -> Option<f64> {
        self.filter_bottom
    }

    pub fn filter_top(&self) -> Option<f64> {
        self.filter_top
    }

    pub fn diameter(&self) -> Option<f64> {
        self.diameter
    }

    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    pub fn technique(&self) -> Option<&str> {
        self.technique.as_deref()
    }
}

/// A monitored location registered under the client's project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    #[serde(rename = "type")]
    pub station_type: StationType,
    pub geom: Point,
    pub altitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<StationDetail>,
}

#[bon]
impl Station {
    /// Creates a station.
    ///
    /// # Arguments
    ///
    /// * `.name(impl Into<String>)`: **Required.**
    /// * `.station_type(StationType)`: **Required.**
    /// * `.geom(Point)`: **Required.**
    /// * `.altitude(f64)`: **Required.** Ground level at the station.
    /// * `.description(...)`, `.institution(...)`, `.detail(StationDetail)`: Optional.
    #[builder]
    pub fn new(
        #[builder(into)] name: String,
        station_type: StationType,
        geom: Point,
        altitude: f64,
        #[builder(into)] description: Option<String>,
        #[builder(into)] institution: Option<String>,
        detail: Option<StationDetail>,
    ) -> Self {
        Self {
            name,
            station_type,
            geom,
            altitude,
            description,
            institution,
            detail,
        }
    }

    pub fn upload(&self, client: &WatersyncClient) -> Result<WaterResponse, ApiError> {
        let response = client
            .request(STATION_ENDPOINT)
            .with_data(serde_json::to_value(self)?)
            .post()?
            .error_for_failure()?;
        info!("Station {} saved!", self.name);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_rounds_lengths() {
        let detail = StationDetail::builder()
            .total_len(12.3456)
            .filter_top(-4.004)
            .material("PVC")
            .build();
        assert_eq!(detail.total_len(), Some(12.35));
        assert_eq!(detail.filter_top(), Some(-4.0));
        assert_eq!(detail.height(), None);
        assert_eq!(detail.material(), Some("PVC"));
    }

    #[test]
    fn test_detail_rounds_when_deserialized() -> Result<(), serde_json::Error> {
        let detail: StationDetail = serde_json::from_value(json!({"diameter": 0.0508}))?;
        assert_eq!(detail.diameter(), Some(0.05));
        Ok(())
    }

    #[test]
    fn test_station_payload() -> Result<(), serde_json::Error> {
        let station = Station::builder()
            .name("PZ01")
            .station_type(StationType::Groundwater)
            .geom(Point::new(155000.0, 463000.0))
            .altitude(2.5)
            .detail(StationDetail::builder().height(0.456).build())
            .build();

        assert_eq!(
            serde_json::to_value(&station)?,
            json!({
                "name": "PZ01",
                "type": "groundwater",
                "geom": {"type": "Point", "coordinates": [155000.0, 463000.0]},
                "altitude": 2.5,
                "detail": {"height": 0.46}
            })
        );
        Ok(())
    }

    #[test]
    fn test_station_reads_geojson() -> Result<(), serde_json::Error> {
        let station: Station = serde_json::from_value(json!({
            "name": "Meteo 1",
            "type": "meteorological",
            "geom": {"type": "Point", "coordinates": [1.0, 2.0]},
            "altitude": 0.0
        }))?;
        assert_eq!(station.geom, Point::new(1.0, 2.0));
        assert_eq!(station.station_type, StationType::Meteorological);
        assert!(station.detail.is_none());
        Ok(())
    }
}
