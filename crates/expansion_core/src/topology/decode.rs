//! Arc decoding and stitching.
//!
//! # Invariants
//! - With a transform, every arc is delta-decoded starting from `(0, 0)`.
//! - Consecutive arcs share their junction position; it is emitted once.
//! - Dimensions beyond `x`/`y` pass through unchanged.

use super::{ConvertError, ConvertResult, TopoShape, Transform};
use crate::model::feature::{Geometry, Position};

const MIN_LINE_POSITIONS: usize = 2;
const MIN_RING_POSITIONS: usize = 4;

/// Resolves arc references against a topology's decoded arcs.
pub(crate) struct ArcDecoder<'a> {
    arcs: Vec<Vec<Position>>,
    transform: Option<&'a Transform>,
}

impl<'a> ArcDecoder<'a> {
    pub(crate) fn new(arcs: &[Vec<Position>], transform: Option<&'a Transform>) -> Self {
        let arcs = arcs.iter().map(|arc| decode_arc(arc, transform)).collect();
        Self { arcs, transform }
    }

    pub(crate) fn geometry(&self, shape: &TopoShape) -> ConvertResult<Geometry> {
        let geometry = match shape {
            TopoShape::Point { coordinates } => Geometry::Point {
                coordinates: self.point(coordinates),
            },
            TopoShape::MultiPoint { coordinates } => Geometry::MultiPoint {
                coordinates: coordinates.iter().map(|p| self.point(p)).collect(),
            },
            TopoShape::LineString { arcs } => Geometry::LineString {
                coordinates: self.line(arcs)?,
            },
            TopoShape::MultiLineString { arcs } => Geometry::MultiLineString {
                coordinates: arcs
                    .iter()
                    .map(|line| self.line(line))
                    .collect::<ConvertResult<_>>()?,
            },
            TopoShape::Polygon { arcs } => Geometry::Polygon {
                coordinates: self.polygon(arcs)?,
            },
            TopoShape::MultiPolygon { arcs } => Geometry::MultiPolygon {
                coordinates: arcs
                    .iter()
                    .map(|polygon| self.polygon(polygon))
                    .collect::<ConvertResult<_>>()?,
            },
            // GeoJSON collections cannot hold null members; they are skipped.
            TopoShape::GeometryCollection { geometries } => Geometry::GeometryCollection {
                geometries: geometries
                    .iter()
                    .filter_map(|member| member.shape.as_ref())
                    .map(|shape| self.geometry(shape))
                    .collect::<ConvertResult<_>>()?,
            },
        };
        Ok(geometry)
    }

    // Points are quantized but never delta-encoded.
    fn point(&self, position: &Position) -> Position {
        match self.transform {
            Some(transform) => transform_position(
                position,
                transform,
                coordinate(position, 0),
                coordinate(position, 1),
            ),
            None => position.clone(),
        }
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> ConvertResult<Vec<Vec<Position>>> {
        rings.iter().map(|ring| self.ring(ring)).collect()
    }

    fn ring(&self, arcs: &[i64]) -> ConvertResult<Vec<Position>> {
        let mut points = self.line(arcs)?;
        pad_with_first(&mut points, MIN_RING_POSITIONS);
        Ok(points)
    }

    fn line(&self, arcs: &[i64]) -> ConvertResult<Vec<Position>> {
        let mut points = Vec::new();
        for &index in arcs {
            self.append_arc(index, &mut points)?;
        }
        pad_with_first(&mut points, MIN_LINE_POSITIONS);
        Ok(points)
    }

    fn append_arc(&self, index: i64, points: &mut Vec<Position>) -> ConvertResult<()> {
        let (slot, reversed) = if index < 0 {
            (!index, true)
        } else {
            (index, false)
        };
        let arc = usize::try_from(slot)
            .ok()
            .and_then(|slot| self.arcs.get(slot))
            .ok_or(ConvertError::ArcOutOfRange {
                index,
                arc_count: self.arcs.len(),
            })?;

        points.pop();
        let start = points.len();
        points.extend(arc.iter().cloned());
        if reversed {
            points[start..].reverse();
        }
        Ok(())
    }
}

fn decode_arc(arc: &[Position], transform: Option<&Transform>) -> Vec<Position> {
    let Some(transform) = transform else {
        return arc.to_vec();
    };

    let mut x = 0.0;
    let mut y = 0.0;
    arc.iter()
        .map(|delta| {
            x += coordinate(delta, 0);
            y += coordinate(delta, 1);
            transform_position(delta, transform, x, y)
        })
        .collect()
}

// `x`/`y` are absolute quantized values; extra dimensions come from `position`.
fn transform_position(position: &Position, transform: &Transform, x: f64, y: f64) -> Position {
    let (tx, ty) = transform.apply(x, y);
    let mut out = Vec::with_capacity(position.len().max(2));
    out.push(tx);
    out.push(ty);
    out.extend(position.iter().skip(2).copied());
    out
}

fn coordinate(position: &Position, axis: usize) -> f64 {
    position.get(axis).copied().unwrap_or(0.0)
}

fn pad_with_first(points: &mut Vec<Position>, min_len: usize) {
    let Some(first) = points.first().cloned() else {
        return;
    };
    while points.len() < min_len {
        points.push(first.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::ArcDecoder;
    use crate::model::feature::Geometry;
    use crate::topology::{ConvertError, TopoGeometry, TopoShape, Transform};

    fn arcs() -> Vec<Vec<Vec<f64>>> {
        vec![
            vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]],
            vec![vec![1.0, 1.0], vec![0.0, 1.0], vec![0.0, 0.0]],
        ]
    }

    #[test]
    fn stitches_arcs_without_duplicating_junctions() {
        let arcs = arcs();
        let decoder = ArcDecoder::new(&arcs, None);
        let geometry = decoder
            .geometry(&TopoShape::Polygon {
                arcs: vec![vec![0, 1]],
            })
            .unwrap();

        assert_eq!(
            geometry,
            Geometry::Polygon {
                coordinates: vec![vec![
                    vec![0.0, 0.0],
                    vec![1.0, 0.0],
                    vec![1.0, 1.0],
                    vec![0.0, 1.0],
                    vec![0.0, 0.0],
                ]]
            }
        );
    }

    #[test]
    fn negative_index_reverses_arc() {
        let arcs = arcs();
        let decoder = ArcDecoder::new(&arcs, None);
        let geometry = decoder
            .geometry(&TopoShape::LineString { arcs: vec![-1] })
            .unwrap();

        assert_eq!(
            geometry,
            Geometry::LineString {
                coordinates: vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 0.0]]
            }
        );
    }

    #[test]
    fn transform_delta_decodes_each_arc_from_origin() {
        let arcs = vec![
            vec![vec![2.0, 4.0], vec![1.0, -1.0], vec![-3.0, 0.0]],
            vec![vec![10.0, 10.0, 7.5]],
        ];
        let transform = Transform {
            scale: [0.5, 2.0],
            translate: [100.0, -10.0],
        };
        let decoder = ArcDecoder::new(&arcs, Some(&transform));
        let geometry = decoder
            .geometry(&TopoShape::MultiLineString {
                arcs: vec![vec![0], vec![1]],
            })
            .unwrap();

        assert_eq!(
            geometry,
            Geometry::MultiLineString {
                coordinates: vec![
                    vec![vec![101.0, -2.0], vec![101.5, -4.0], vec![100.0, -4.0]],
                    vec![vec![105.0, 10.0, 7.5], vec![105.0, 10.0, 7.5]],
                ]
            }
        );
    }

    #[test]
    fn points_are_transformed_without_delta_decoding() {
        let transform = Transform {
            scale: [1.0, 1.0],
            translate: [10.0, 20.0],
        };
        let decoder = ArcDecoder::new(&[], Some(&transform));
        let geometry = decoder
            .geometry(&TopoShape::MultiPoint {
                coordinates: vec![vec![1.0, 1.0], vec![1.0, 1.0]],
            })
            .unwrap();

        assert_eq!(
            geometry,
            Geometry::MultiPoint {
                coordinates: vec![vec![11.0, 21.0], vec![11.0, 21.0]]
            }
        );
    }

    #[test]
    fn short_rings_are_padded_to_four_positions() {
        let arcs = vec![vec![vec![3.0, 3.0], vec![4.0, 4.0]]];
        let decoder = ArcDecoder::new(&arcs, None);
        let geometry = decoder
            .geometry(&TopoShape::Polygon {
                arcs: vec![vec![0]],
            })
            .unwrap();

        let Geometry::Polygon { coordinates } = geometry else {
            panic!("expected polygon");
        };
        assert_eq!(coordinates[0].len(), 4);
        assert_eq!(coordinates[0][2], vec![3.0, 3.0]);
        assert_eq!(coordinates[0][3], vec![3.0, 3.0]);
    }

    #[test]
    fn nested_collection_skips_null_members() {
        let member = |shape| TopoGeometry {
            shape,
            id: None,
            properties: None,
            bbox: None,
        };
        let decoder = ArcDecoder::new(&[], None);
        let geometry = decoder
            .geometry(&TopoShape::GeometryCollection {
                geometries: vec![
                    member(None),
                    member(Some(TopoShape::Point {
                        coordinates: vec![1.0, 2.0],
                    })),
                ],
            })
            .unwrap();

        assert_eq!(
            geometry,
            Geometry::GeometryCollection {
                geometries: vec![Geometry::Point {
                    coordinates: vec![1.0, 2.0]
                }]
            }
        );
    }

    #[test]
    fn out_of_range_arc_is_an_error() {
        let arcs = arcs();
        let decoder = ArcDecoder::new(&arcs, None);
        let err = decoder
            .geometry(&TopoShape::LineString { arcs: vec![0, -3] })
            .unwrap_err();

        assert_eq!(
            err,
            ConvertError::ArcOutOfRange {
                index: -3,
                arc_count: 2
            }
        );
    }
}
