//! Geo shapes stored as documents.
//!
//! [GeoPoint] is stored as `{"lat": .., "lon": ..}`. [GeoJson] shapes follow
//! the GeoJSON layout, `{"type": .., "coordinates": ..}` for simple shapes and
//! `{"type": "geometrycollection", "geometries": [..]}` for collections. The
//! type name is written in lower case and read case-insensitively.

use std::fmt::{self, Display};

use crate::common::{
    StoreType, Value, GEO_JSON_COORDINATES, GEO_JSON_GEOMETRIES, GEO_JSON_TYPE, GEO_LAT, GEO_LON,
};
use crate::conversion::CustomConversion;
use crate::document::Document;
use crate::errors::{ErrorKind, MappingError, MappingResult};

fn geo_error(message: String) -> MappingError {
    log::error!("{}", message);
    MappingError::new(&message, ErrorKind::ConversionError)
}

/// A 2D coordinate (x, y). For geographic shapes x is the longitude and y the
/// latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn to_value(self) -> Value {
        Value::Array(vec![Value::F64(self.x), Value::F64(self.y)])
    }

    fn from_value(value: &Value) -> MappingResult<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| geo_error(format!("Expected a coordinate pair but got {}", value)))?;
        match items.as_slice() {
            [x, y, ..] => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => Ok(Coordinate::new(x, y)),
                _ => Err(geo_error(format!("Coordinate {} is not numeric", value))),
            },
            _ => Err(geo_error(format!(
                "Coordinate {} needs at least two values",
                value
            ))),
        }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A geographic point with validated latitude and longitude.
///
/// ```rust
/// use docmap::conversion::GeoPoint;
///
/// let point = GeoPoint::new(45.7806, 3.0875).unwrap();
/// assert_eq!(point.latitude(), 45.7806);
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting a latitude outside `-90..=90` or a
    /// longitude outside `-180..=180`.
    pub fn new(latitude: f64, longitude: f64) -> MappingResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            log::error!("Latitude {} is outside -90..90", latitude);
            return Err(MappingError::new(
                &format!("Latitude {} is outside -90..90", latitude),
                ErrorKind::ValidationError,
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            log::error!("Longitude {} is outside -180..180", longitude);
            return Err(MappingError::new(
                &format!("Longitude {} is outside -180..180", longitude),
                ErrorKind::ValidationError,
            ));
        }
        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn to_coordinate(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPoint({}, {})", self.latitude, self.longitude)
    }
}

crate::custom_convertible!(GeoPoint);

impl CustomConversion for GeoPoint {
    const STORE_TYPE: StoreType = StoreType::Document;

    fn to_store(&self) -> MappingResult<Value> {
        let mut doc = Document::new();
        doc.insert(GEO_LAT, self.latitude);
        doc.insert(GEO_LON, self.longitude);
        Ok(Value::Document(doc))
    }

    fn from_store(value: &Value) -> MappingResult<Self> {
        let doc = value
            .as_document()
            .ok_or_else(|| geo_error(format!("Expected a geo point document but got {}", value)))?;
        let lat = doc.get(GEO_LAT).and_then(Value::as_f64);
        let lon = doc.get(GEO_LON).and_then(Value::as_f64);
        match (lat, lon) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            _ => Err(geo_error(format!(
                "Geo point document {} needs numeric lat and lon",
                doc
            ))),
        }
    }
}

/// The GeoJSON shape family.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Point(Coordinate),
    MultiPoint(Vec<Coordinate>),
    LineString(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    /// Outer ring first, then holes.
    Polygon(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<Vec<Vec<Coordinate>>>),
    GeometryCollection(Vec<GeoJson>),
}

impl GeoJson {
    /// The lower-case type name written to the `type` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoJson::Point(_) => "point",
            GeoJson::MultiPoint(_) => "multipoint",
            GeoJson::LineString(_) => "linestring",
            GeoJson::MultiLineString(_) => "multilinestring",
            GeoJson::Polygon(_) => "polygon",
            GeoJson::MultiPolygon(_) => "multipolygon",
            GeoJson::GeometryCollection(_) => "geometrycollection",
        }
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(GEO_JSON_TYPE, self.type_name());
        match self {
            GeoJson::GeometryCollection(geometries) => {
                let geometries = geometries
                    .iter()
                    .map(|g| Value::Document(g.to_document()))
                    .collect::<Vec<_>>();
                doc.insert(GEO_JSON_GEOMETRIES, geometries);
            }
            GeoJson::Point(c) => doc.insert(GEO_JSON_COORDINATES, c.to_value()),
            GeoJson::MultiPoint(cs) | GeoJson::LineString(cs) => {
                doc.insert(GEO_JSON_COORDINATES, line(cs))
            }
            GeoJson::MultiLineString(lines) | GeoJson::Polygon(lines) => {
                doc.insert(GEO_JSON_COORDINATES, lines_value(lines))
            }
            GeoJson::MultiPolygon(polygons) => {
                let polygons = polygons.iter().map(|p| lines_value(p)).collect::<Vec<_>>();
                doc.insert(GEO_JSON_COORDINATES, polygons)
            }
        }
        doc
    }

    pub fn from_document(doc: &Document) -> MappingResult<Self> {
        let type_name = doc
            .get(GEO_JSON_TYPE)
            .and_then(Value::as_str)
            .ok_or_else(|| geo_error(format!("GeoJSON document {} has no type", doc)))?
            .to_ascii_lowercase();

        if type_name == "geometrycollection" {
            let geometries = doc
                .get(GEO_JSON_GEOMETRIES)
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    geo_error(format!("Geometry collection {} has no geometries", doc))
                })?;
            let geometries = geometries
                .iter()
                .map(|g| match g.as_document() {
                    Some(g) => GeoJson::from_document(g),
                    None => Err(geo_error(format!("Geometry {} is not a document", g))),
                })
                .collect::<MappingResult<Vec<_>>>()?;
            return Ok(GeoJson::GeometryCollection(geometries));
        }

        let coordinates = doc
            .get(GEO_JSON_COORDINATES)
            .ok_or_else(|| geo_error(format!("GeoJSON document {} has no coordinates", doc)))?;
        match type_name.as_str() {
            "point" => Coordinate::from_value(coordinates).map(GeoJson::Point),
            "multipoint" => read_line(coordinates).map(GeoJson::MultiPoint),
            "linestring" => read_line(coordinates).map(GeoJson::LineString),
            "multilinestring" => read_lines(coordinates).map(GeoJson::MultiLineString),
            "polygon" => read_lines(coordinates).map(GeoJson::Polygon),
            "multipolygon" => array(coordinates)?
                .iter()
                .map(read_lines)
                .collect::<MappingResult<Vec<_>>>()
                .map(GeoJson::MultiPolygon),
            other => Err(geo_error(format!("Unknown GeoJSON type {}", other))),
        }
    }
}

fn line(coordinates: &[Coordinate]) -> Value {
    Value::Array(coordinates.iter().map(|c| c.to_value()).collect())
}

fn lines_value(lines: &[Vec<Coordinate>]) -> Value {
    Value::Array(lines.iter().map(|l| line(l)).collect())
}

fn array(value: &Value) -> MappingResult<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| geo_error(format!("Expected coordinate array but got {}", value)))
}

fn read_line(value: &Value) -> MappingResult<Vec<Coordinate>> {
    array(value)?.iter().map(Coordinate::from_value).collect()
}

fn read_lines(value: &Value) -> MappingResult<Vec<Vec<Coordinate>>> {
    array(value)?.iter().map(read_line).collect()
}

impl Display for GeoJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_document())
    }
}

crate::custom_convertible!(GeoJson);

impl CustomConversion for GeoJson {
    const STORE_TYPE: StoreType = StoreType::Document;

    fn to_store(&self) -> MappingResult<Value> {
        Ok(Value::Document(self.to_document()))
    }

    fn from_store(value: &Value) -> MappingResult<Self> {
        match value.as_document() {
            Some(doc) => GeoJson::from_document(doc),
            None => Err(geo_error(format!(
                "Expected a GeoJSON document but got {}",
                value
            ))),
        }
    }
}
