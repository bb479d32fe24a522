use crate::model::{register_all, Venue};
use docmap::common::Value;
use docmap::conversion::{Coordinate, GeoJson, GeoPoint};
use docmap::doc;
use docmap::errors::ErrorKind;
use docmap::mapping::MappingConverter;
use docmap_int_test::test_util::{assert_error_kind, create_test_context, run_test};

#[test]
fn test_geo_point_and_shape_round_trip() {
    run_test(
        || create_test_context(register_all(MappingConverter::builder())),
        |ctx| {
            let converter = ctx.converter();
            let venue = Venue {
                name: "Place de Jaude".to_string(),
                location: Some(GeoPoint::new(45.7806, 3.0875)?),
                route: Some(GeoJson::LineString(vec![
                    Coordinate::new(0.0, 0.0),
                    Coordinate::new(1.0, 1.0),
                ])),
            };

            let document = converter.write_entity(&venue)?;
            assert_eq!(
                document.get("location").map(Value::to_json).as_deref(),
                Some(r#"{"lat":45.7806,"lon":3.0875}"#)
            );
            assert_eq!(
                document.get("route").map(Value::to_json).as_deref(),
                Some(r#"{"type":"linestring","coordinates":[[0,0],[1,1]]}"#)
            );
            // geo values are simple values and carry no type hint
            assert!(document.get("location._class").is_none());
            assert!(document.get("route._class").is_none());

            let restored: Venue = converter.read_entity(&document)?;
            assert_eq!(restored, venue);
            Ok(())
        },
    )
}

#[test]
fn test_geo_json_read_leniently() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = doc! {
        name: "Square",
        location: { lat: 48, lon: 2 },
        route: {
            type: "Polygon",
            coordinates: [[[0, 0], [4, 0], [4, 4], [0, 0]]],
        },
    };

    let venue: Venue = converter.read_entity(&document).unwrap();
    assert_eq!(venue.location, Some(GeoPoint::new(48.0, 2.0).unwrap()));
    assert_eq!(
        venue.route,
        Some(GeoJson::Polygon(vec![vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(4.0, 0.0),
            Coordinate::new(4.0, 4.0),
            Coordinate::new(0.0, 0.0),
        ]]))
    );
}

#[test]
fn test_invalid_latitude_is_rejected() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let mut document = doc! {
        name: "Nowhere",
        location: { lat: 123.4, lon: 0.0 },
    };
    document.set_id("v-1");

    let err = assert_error_kind(
        converter.read_entity::<Venue>(&document),
        ErrorKind::ValidationError,
    );
    assert_eq!(err.context().property.as_deref(), Some("location"));
}

#[test]
fn test_unknown_shape_fails() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = doc! {
        name: "Ring",
        route: { type: "circle", coordinates: [0, 0] },
    };

    assert_error_kind(
        converter.read_entity::<Venue>(&document),
        ErrorKind::ConversionError,
    );
}
