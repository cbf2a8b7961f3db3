//! TopoJSON document model and conversion to GeoJSON features.
//!
//! # Responsibility
//! - Parse topology documents (`arcs`, `objects`, optional `transform`).
//! - Convert one named object into a `FeatureCollection`.
//!
//! # Invariants
//! - Output features follow the member order of the named object.
//! - Properties attached to a source geometry are copied unchanged; missing
//!   properties become an empty map.
//! - Malformed arc references surface as errors, never panics.
//!
//! # See also
//! - https://github.com/topojson/topojson-specification

mod decode;

use crate::model::feature::{Feature, FeatureCollection, Position, Properties};
use decode::ArcDecoder;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Conversion error for topology → feature decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Requested object name is not present in `objects`.
    ObjectNotFound(String),
    /// A geometry references an arc past the end of `arcs`.
    ArcOutOfRange { index: i64, arc_count: usize },
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ObjectNotFound(name) => write!(f, "topology object not found: `{name}`"),
            Self::ArcOutOfRange { index, arc_count } => write!(
                f,
                "arc index {index} is out of range for topology with {arc_count} arcs"
            ),
        }
    }
}

impl Error for ConvertError {}

/// Quantization transform applied to arc and point positions.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    /// Maps one quantized position to absolute coordinates.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        )
    }
}

/// Parsed TopoJSON document.
///
/// Only the members required for decoding are modeled; other members are
/// ignored during parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    pub arcs: Vec<Vec<Position>>,
    pub objects: BTreeMap<String, TopoGeometry>,
}

/// Geometry object stored inside a topology.
///
/// `shape` is `None` for `"type": null`, which decodes to a feature with a
/// `null` geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TopoGeometry {
    pub shape: Option<TopoShape>,
    pub id: Option<Value>,
    pub properties: Option<Properties>,
    pub bbox: Option<Vec<f64>>,
}

impl<'de> Deserialize<'de> for TopoGeometry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut members = Map::<String, Value>::deserialize(deserializer)?;
        let id = members.remove("id").filter(|id| !id.is_null());
        let properties = take_member::<Properties, D::Error>(&mut members, "properties")?;
        let bbox = take_member::<Vec<f64>, D::Error>(&mut members, "bbox")?;

        let shape = match members.get("type") {
            Some(Value::Null) => None,
            _ => Some(TopoShape::deserialize(Value::Object(members)).map_err(D::Error::custom)?),
        };

        Ok(Self {
            shape,
            id,
            properties,
            bbox,
        })
    }
}

fn take_member<T, E>(members: &mut Map<String, Value>, key: &str) -> Result<Option<T>, E>
where
    T: serde::de::DeserializeOwned,
    E: serde::de::Error,
{
    match members.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some).map_err(E::custom),
    }
}

/// Arc-indexed geometry shapes, tagged by `type`.
///
/// Negative arc indexes refer to arc `!index` traversed in reverse.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum TopoShape {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { arcs: Vec<i64> },
    MultiLineString { arcs: Vec<Vec<i64>> },
    Polygon { arcs: Vec<Vec<i64>> },
    MultiPolygon { arcs: Vec<Vec<Vec<i64>>> },
    GeometryCollection { geometries: Vec<TopoGeometry> },
}

impl Topology {
    /// Parses a topology document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Returns the names of all top-level objects in sorted order.
    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Returns how many features `to_feature_collection(name)` will produce.
    ///
    /// Returns `None` when the object does not exist.
    pub fn member_count(&self, object_name: &str) -> Option<usize> {
        self.objects.get(object_name).map(|object| match &object.shape {
            Some(TopoShape::GeometryCollection { geometries }) => geometries.len(),
            _ => 1,
        })
    }

    /// Converts one named object into a feature collection.
    ///
    /// A `GeometryCollection` object yields one feature per member geometry;
    /// any other object yields a single-feature collection.
    ///
    /// # Errors
    /// - `ObjectNotFound` when `object_name` is not a key of `objects`.
    /// - `ArcOutOfRange` when a geometry references a missing arc.
    pub fn to_feature_collection(&self, object_name: &str) -> ConvertResult<FeatureCollection> {
        let object = self
            .objects
            .get(object_name)
            .ok_or_else(|| ConvertError::ObjectNotFound(object_name.to_string()))?;
        let decoder = ArcDecoder::new(&self.arcs, self.transform.as_ref());

        let features = match &object.shape {
            Some(TopoShape::GeometryCollection { geometries }) => geometries
                .iter()
                .map(|geometry| to_feature(&decoder, geometry))
                .collect::<ConvertResult<Vec<_>>>()?,
            _ => vec![to_feature(&decoder, object)?],
        };

        Ok(FeatureCollection::new(features))
    }
}

/// Source of decoded features addressed by object name.
pub trait FeatureSource {
    fn features(&self, object_name: &str) -> ConvertResult<FeatureCollection>;
}

impl FeatureSource for Topology {
    fn features(&self, object_name: &str) -> ConvertResult<FeatureCollection> {
        self.to_feature_collection(object_name)
    }
}

fn to_feature(decoder: &ArcDecoder<'_>, source: &TopoGeometry) -> ConvertResult<Feature> {
    let geometry = source
        .shape
        .as_ref()
        .map(|shape| decoder.geometry(shape))
        .transpose()?;
    let mut feature = Feature::new(geometry, source.properties.clone().unwrap_or_default());
    feature.id = source.id.clone();
    feature.bbox = source.bbox.clone();
    Ok(feature)
}
