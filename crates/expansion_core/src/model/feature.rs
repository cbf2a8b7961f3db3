//! GeoJSON feature model.
//!
//! # Responsibility
//! - Represent decoded features with explicit coordinate geometries.
//! - Provide property accessors used by enrichment.
//!
//! # Invariants
//! - `type` tags are fixed (`Feature`, `FeatureCollection`) and round-trip.
//! - A `null` properties member is read back as an empty map.
//!
//! # See also
//! - RFC 7946 (GeoJSON)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One coordinate tuple: `[x, y]` plus optional extra dimensions.
pub type Position = Vec<f64>;

/// Feature property mapping.
pub type Properties = Map<String, Value>;

/// Type tag for [`FeatureCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    #[default]
    FeatureCollection,
}

/// Type tag for [`Feature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

/// GeoJSON geometry with explicit coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// Returns the GeoJSON `type` name of this geometry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point { .. } => "Point",
            Self::MultiPoint { .. } => "MultiPoint",
            Self::LineString { .. } => "LineString",
            Self::MultiLineString { .. } => "MultiLineString",
            Self::Polygon { .. } => "Polygon",
            Self::MultiPolygon { .. } => "MultiPolygon",
            Self::GeometryCollection { .. } => "GeometryCollection",
        }
    }
}

/// One geographic entity: geometry plus key/value properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Serialized as `type` to match GeoJSON naming.
    #[serde(rename = "type", default)]
    pub kind: FeatureType,
    /// Copied through from the source geometry when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
    /// `None` is written as `"geometry": null`.
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// Creates a feature without `id`/`bbox`.
    pub fn new(geometry: Option<Geometry>, properties: Properties) -> Self {
        Self {
            kind: FeatureType::Feature,
            id: None,
            bbox: None,
            properties,
            geometry,
        }
    }

    /// Returns a string property, or `None` when absent or not a string.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Inserts or overwrites one property.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }
}

/// Ordered sequence of features, the unit written to disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    pub kind: FeatureCollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{Feature, FeatureCollection, Geometry, Properties};
    use serde_json::json;

    #[test]
    fn feature_serializes_with_geojson_tags() {
        let mut properties = Properties::new();
        properties.insert("abbr".to_string(), json!("TX"));
        let feature = Feature::new(
            Some(Geometry::Point {
                coordinates: vec![1.0, 2.0],
            }),
            properties,
        );
        let collection = FeatureCollection::new(vec![feature]);

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {"abbr": "TX"},
                    "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}
                }]
            })
        );
    }

    #[test]
    fn null_geometry_is_written_as_null() {
        let feature = Feature::new(None, Properties::new());
        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["geometry"], serde_json::Value::Null);
        assert_eq!(value["properties"], json!({}));
    }

    #[test]
    fn null_properties_read_back_as_empty_map() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "properties": null,
            "geometry": null
        }))
        .unwrap();
        assert!(feature.properties.is_empty());
        assert!(feature.geometry.is_none());
    }

    #[test]
    fn property_str_ignores_non_string_values() {
        let mut feature = Feature::new(None, Properties::new());
        feature.set_property("abbr", 42);
        assert_eq!(feature.property_str("abbr"), None);

        feature.set_property("abbr", "NM");
        assert_eq!(feature.property_str("abbr"), Some("NM"));
    }
}
