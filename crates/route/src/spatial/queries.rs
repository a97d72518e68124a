//! Geodesy utilities for distances, bearings and resampling.
//!
//! Uses the Haversine formula, which is accurate to well under a meter at the
//! step-level distances navigation deals with.

use geo::{Bearing, Distance, Haversine, InterpolatePoint, Point};

use crate::models::GeographicCoordinate;

/// Resampled points closer than this to the final vertex are merged with it.
const MERGE_TOLERANCE_M: f64 = 0.01;

/// Calculate Haversine distance between two coordinates in meters
pub fn haversine_distance(a: GeographicCoordinate, b: GeographicCoordinate) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b))
}

/// Initial bearing from `a` to `b` in degrees, normalized to `[0, 360)`.
pub fn bearing(a: GeographicCoordinate, b: GeographicCoordinate) -> f64 {
    Haversine.bearing(Point::from(a), Point::from(b)).rem_euclid(360.0)
}

/// Total length of a polyline in meters.
pub fn line_length(coordinates: &[GeographicCoordinate]) -> f64 {
    coordinates
        .windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .sum()
}

/// Point `meters` along the great circle from `a` towards `b`.
pub fn point_along(a: GeographicCoordinate, b: GeographicCoordinate, meters: f64) -> GeographicCoordinate {
    Haversine
        .point_at_distance_between(Point::from(a), Point::from(b), meters)
        .into()
}

/// Resample a polyline so consecutive points are `interval` meters apart
/// along the line.
///
/// The first and last vertices are always kept; interior vertices are not.
/// Returns an empty vector for an empty input or a non-positive interval.
pub fn resample_line(coordinates: &[GeographicCoordinate], interval: f64) -> Vec<GeographicCoordinate> {
    let (Some(&first), Some(&last)) = (coordinates.first(), coordinates.last()) else {
        return Vec::new();
    };
    if interval <= 0.0 || !interval.is_finite() {
        return Vec::new();
    }

    let mut points = vec![first];
    // Distance into the current segment at which the next sample sits.
    let mut next_at = interval;

    for pair in coordinates.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let length = haversine_distance(start, end);
        if length == 0.0 {
            continue;
        }

        while next_at <= length {
            points.push(point_along(start, end, next_at));
            next_at += interval;
        }
        next_at -= length;
    }

    let ends_at_last = points
        .last()
        .is_some_and(|point| haversine_distance(*point, last) < MERGE_TOLERANCE_M);
    if ends_at_last {
        if let Some(point) = points.last_mut() {
            *point = last;
        }
    } else {
        points.push(last);
    }

    points
}
