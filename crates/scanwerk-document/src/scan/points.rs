// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion between detected corners and the integer handle positions a UI
// lets the user drag.

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::{ClientPoint, Point, Quadrilateral};

/// Translates between [`Quadrilateral`] and client handle points.
///
/// Points travel in TL, TR, BR, BL order in both directions. Points coming
/// back from a client are untrusted and are fully re-validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointFormatConverter;

impl PointFormatConverter {
    /// Round each corner to the nearest pixel.
    ///
    /// Rounding is lossy: corners less than a pixel apart can land on the same
    /// handle, and a sliver can round to collinear handles, so
    /// [`from_client_format`](Self::from_client_format) rejects the result.
    /// Detected quads enclose a sizeable part of the frame and always survive
    /// the trip.
    pub fn to_client_format(quad: &Quadrilateral) -> [ClientPoint; 4] {
        quad.corners()
            .map(|p| ClientPoint::new(p.x.round() as i32, p.y.round() as i32))
    }

    /// Rebuild a quadrilateral from exactly four client points, in the order
    /// given.
    ///
    /// Fails with [`ScanwerkError::InvalidShape`] on the wrong number of
    /// points or any broken shape invariant.
    pub fn from_client_format(points: &[ClientPoint]) -> Result<Quadrilateral> {
        let corners: [ClientPoint; 4] = points.try_into().map_err(|_| {
            ScanwerkError::InvalidShape(format!("expected 4 corner points, got {}", points.len()))
        })?;
        Quadrilateral::from_corners(corners.map(|p| Point::new(p.x as f32, p.y as f32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn client(points: [(i32, i32); 4]) -> Vec<ClientPoint> {
        points.iter().map(|&(x, y)| ClientPoint::new(x, y)).collect()
    }

    fn invalid_shape_detail(points: &[ClientPoint]) -> String {
        match PointFormatConverter::from_client_format(points) {
            Err(ScanwerkError::InvalidShape(detail)) => detail,
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }

    #[test]
    fn rounds_to_nearest_pixel() {
        let quad = Quadrilateral::from_corners([
            Point::new(10.4, 9.6),
            Point::new(200.5, 12.2),
            Point::new(198.7, 150.49),
            Point::new(8.0, 149.5),
        ])
        .unwrap();
        let points = PointFormatConverter::to_client_format(&quad);
        assert_eq!(
            points,
            [
                ClientPoint::new(10, 10),
                ClientPoint::new(201, 12),
                ClientPoint::new(199, 150),
                ClientPoint::new(8, 150),
            ]
        );
    }

    #[test]
    fn keeps_client_order() {
        let points = client([(5, 5), (100, 8), (98, 80), (3, 77)]);
        let quad = PointFormatConverter::from_client_format(&points).unwrap();
        assert_eq!(PointFormatConverter::to_client_format(&quad).to_vec(), points);
    }

    #[test]
    fn rejects_wrong_point_count() {
        let detail = invalid_shape_detail(&client([(0, 0), (10, 0), (10, 10), (0, 10)])[..3]);
        assert!(detail.contains("got 3"));
        assert!(PointFormatConverter::from_client_format(&[]).is_err());
    }

    #[test]
    fn rejects_repeated_points() {
        let detail = invalid_shape_detail(&client([(0, 0), (10, 0), (10, 0), (0, 10)]));
        assert!(detail.contains("coincide"), "{detail}");
    }

    #[test]
    fn rejects_collinear_triples() {
        let detail = invalid_shape_detail(&client([(0, 0), (5, 0), (10, 0), (0, 10)]));
        assert!(detail.contains("collinear"), "{detail}");
    }

    #[test]
    fn rejects_self_intersection() {
        let detail = invalid_shape_detail(&client([(0, 0), (10, 10), (10, 0), (0, 10)]));
        assert!(detail.contains("cross"), "{detail}");
    }

    #[test]
    fn sub_pixel_quad_does_not_survive_rounding() {
        let quad = Quadrilateral::from_corners([
            Point::new(10.0, 10.0),
            Point::new(10.4, 10.0),
            Point::new(10.4, 10.4),
            Point::new(10.0, 10.4),
        ])
        .unwrap();
        let points = PointFormatConverter::to_client_format(&quad);
        assert_eq!(points, [ClientPoint::new(10, 10); 4]);
        let detail = invalid_shape_detail(&points);
        assert!(detail.contains("coincide"), "{detail}");
    }

    proptest! {
        /// Client points survive a trip through the quadrilateral unchanged.
        #[test]
        fn client_round_trip_is_stable(
            tl in (0i32..200, 0i32..200),
            tr in (400i32..600, 0i32..200),
            br in (400i32..600, 400i32..600),
            bl in (0i32..200, 400i32..600),
        ) {
            let points = client([tl, tr, br, bl]);
            let quad = PointFormatConverter::from_client_format(&points).unwrap();
            let once = PointFormatConverter::to_client_format(&quad);
            let again = PointFormatConverter::to_client_format(
                &PointFormatConverter::from_client_format(&once).unwrap(),
            );
            prop_assert_eq!(once.to_vec(), points);
            prop_assert_eq!(again, once);
        }
    }
}
