// src/spec.rs
//
// The construction-specification mapping and the textual reconstruction
// form. A `ShapeSpec` is the generic key/value surface; `classify` parses it
// into an explicit tagged request that the shape constructor dispatches on.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::{ColorValue, Rgb};
use crate::error::ShapeError;

/// Generic shape specification. Recognized keys mirror the constructor
/// arguments; which constructor runs is decided by [`classify`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_vertices: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<[f64; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angular_velocity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<BTreeMap<String, Rgb>>,
}

/// The geometric request encoded by a [`ShapeSpec`].
#[derive(Clone, Debug, PartialEq)]
pub enum SpecKind {
    Circle {
        center: DVec2,
        radius: f64,
        start_angle: f64,
    },
    RegularPolygon {
        center: DVec2,
        radius: f64,
        n_vertices: usize,
        start_angle: f64,
    },
    Rectangle {
        corners: [DVec2; 2],
    },
    Raw {
        vertices: Vec<DVec2>,
    },
}

/// Decides which constructor a spec addresses:
/// `center` + `radius` + `n_vertices` is a regular polygon, `center` +
/// `radius` alone a circle, two `vertices` an axis-aligned rectangle, three
/// or more a raw polygon. Anything else is an invalid spec.
pub fn classify(spec: &ShapeSpec) -> Result<SpecKind, ShapeError> {
    match (spec.center, spec.radius) {
        (Some(center), Some(radius)) => {
            let center = DVec2::from_array(center);
            let start_angle = spec.start_angle.unwrap_or(0.0);
            return Ok(match spec.n_vertices {
                Some(n_vertices) => SpecKind::RegularPolygon {
                    center,
                    radius,
                    n_vertices,
                    start_angle,
                },
                None => SpecKind::Circle {
                    center,
                    radius,
                    start_angle,
                },
            });
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ShapeError::InvalidSpec(
                "center and radius must be given together".to_string(),
            ));
        }
        (None, None) => {}
    }

    let Some(vertices) = &spec.vertices else {
        return Err(ShapeError::InvalidSpec(
            "expected either center/radius or vertices".to_string(),
        ));
    };
    let points: Vec<DVec2> = vertices.iter().map(|&p| DVec2::from_array(p)).collect();
    match points.len() {
        2 => Ok(SpecKind::Rectangle {
            corners: [points[0], points[1]],
        }),
        n if n >= 3 => Ok(SpecKind::Raw { vertices: points }),
        n => Err(ShapeError::InvalidSpec(format!(
            "vertices must name two rectangle corners or a full ring, got {n} points"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_and_radius_is_a_circle() {
        let spec = ShapeSpec {
            center: Some([0.0, 0.0]),
            radius: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(classify(&spec), Ok(SpecKind::Circle { .. })));
    }

    #[test]
    fn n_vertices_upgrades_to_regular_polygon() {
        let spec = ShapeSpec {
            center: Some([0.0, 0.0]),
            radius: Some(1.0),
            n_vertices: Some(10),
            ..Default::default()
        };
        assert!(matches!(
            classify(&spec),
            Ok(SpecKind::RegularPolygon { n_vertices: 10, .. })
        ));
    }

    #[test]
    fn two_vertices_are_rectangle_corners() {
        let spec = ShapeSpec {
            vertices: Some(vec![[-1.0, -1.0], [1.0, 1.0]]),
            ..Default::default()
        };
        assert!(matches!(classify(&spec), Ok(SpecKind::Rectangle { .. })));
    }

    #[test]
    fn missing_keys_are_an_error() {
        assert!(classify(&ShapeSpec::default()).is_err());

        let orphan_center = ShapeSpec {
            center: Some([0.0, 0.0]),
            ..Default::default()
        };
        assert!(classify(&orphan_center).is_err());

        let single_vertex = ShapeSpec {
            vertices: Some(vec![[0.0, 0.0]]),
            ..Default::default()
        };
        assert!(classify(&single_vertex).is_err());
    }

    #[test]
    fn color_field_accepts_names_and_triples() {
        let by_value: ShapeSpec = serde_json::from_str(r#"{"color": [120, 50, 12]}"#).unwrap();
        assert_eq!(by_value.color, Some(ColorValue::Value(Rgb(120, 50, 12))));

        let by_name: ShapeSpec = serde_json::from_str(r#"{"color": "secondary"}"#).unwrap();
        assert_eq!(
            by_name.color,
            Some(ColorValue::Name("secondary".to_string()))
        );
    }
}
