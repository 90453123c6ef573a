//! Perimeter fitting (spec §4.4): turn a joined edge chain into the
//! four-sided [`Perimeter`] bounding a candidate symbol.
//!
//! The chain's points are bucketed into an orientation histogram to
//! find the symbol's two dominant (near-perpendicular) edge
//! directions, partitioned into up to four sides by their signed
//! perpendicular distance from two separator lines through the
//! chain's centroid, each side's line fit by RANSAC, and adjacent
//! sides intersected into vertices. A two-side fallback handles
//! chains where only one pair of opposite sides was cleanly traced.

use dmtx_core::{line_intersection, perpendicular_distance, Line, Perimeter, Point};

use crate::segment::Chain;

fn centroid(points: &[Point]) -> Point {
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / points.len() as f64, sy / points.len() as f64)
}

/// Mirrored orientation histogram of a chain's segment directions,
/// folded into `[0, 180)` so that opposite-pointing segments of the
/// same edge land in the same bucket.
fn orientation_histogram(chain: &Chain, bucket_degrees: f64) -> Vec<f64> {
    let buckets = (180.0 / bucket_degrees).ceil() as usize;
    let mut hist = vec![0.0; buckets];
    for w in chain.points.windows(2) {
        let angle = (w[1].y - w[0].y).atan2(w[1].x - w[0].x).to_degrees();
        let folded = angle.rem_euclid(180.0);
        let bucket = ((folded / bucket_degrees) as usize).min(buckets - 1);
        hist[bucket] += 1.0;
    }
    hist
}

/// The two dominant, roughly-perpendicular directions (in degrees,
/// folded to `[0, 180)`) in `hist`.
fn dominant_directions(hist: &[f64], bucket_degrees: f64) -> (f64, f64) {
    let bucket_angle = |i: usize| (i as f64 + 0.5) * bucket_degrees;
    let (first, _) = hist
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .unwrap();
    let first_angle = bucket_angle(first);

    let (second, _) = hist
        .iter()
        .enumerate()
        .filter(|&(i, _)| {
            let d = (bucket_angle(i) - first_angle).abs();
            let d = d.min(180.0 - d);
            (50.0..130.0).contains(&d)
        })
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .unwrap_or((first, &0.0));
    let second_angle = if second == first {
        (first_angle + 90.0).rem_euclid(180.0)
    } else {
        bucket_angle(second)
    };

    (first_angle, second_angle)
}

fn direction_vector(angle_degrees: f64) -> Point {
    let rad = angle_degrees.to_radians();
    Point::new(rad.cos(), rad.sin())
}

/// Fit a line through `points` by RANSAC: repeatedly sample two
/// points, count inliers within `inlier_distance`, and keep the
/// sample with the most inliers.
fn ransac_line(points: &[Point], iterations: usize, inlier_distance: f64) -> Option<Line> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len();
    let mut best_line = Line::through(points[0], points[n - 1]);
    let mut best_inliers = 0usize;

    for i in 0..iterations.max(1) {
        let a = points[(i * 97) % n];
        let b = points[(i * 131 + 1) % n];
        if (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9 {
            continue;
        }
        let line = Line::through(a, b);
        let inliers = points
            .iter()
            .filter(|&&p| perpendicular_distance(p, line.origin, line.at(1.0)).abs() <= inlier_distance)
            .count();
        if inliers > best_inliers {
            best_inliers = inliers;
            best_line = line;
        }
    }
    Some(best_line)
}

fn perpendicular(direction: Point) -> Point {
    Point::new(-direction.y, direction.x)
}

/// Split `points` into up to four groups by the sign pair of their
/// signed perpendicular distance from two separator lines through
/// `center` along `dir0`/`dir1`.
fn partition_by_quadrant(points: &[Point], center: Point, dir0: Point, dir1: Point) -> [Vec<Point>; 4] {
    let l0 = Line {
        origin: center,
        direction: dir0,
    };
    let l1 = Line {
        origin: center,
        direction: dir1,
    };
    let mut groups: [Vec<Point>; 4] = Default::default();
    for &p in points {
        let d0 = perpendicular_distance(p, l0.origin, l0.at(1.0));
        let d1 = perpendicular_distance(p, l1.origin, l1.at(1.0));
        let idx = match (d0 >= 0.0, d1 >= 0.0) {
            (true, true) => 0,
            (true, false) => 1,
            (false, false) => 2,
            (false, true) => 3,
        };
        groups[idx].push(p);
    }
    groups
}

/// Two-side fallback: given only one reliable pair of (roughly
/// parallel) side lines, drop the perpendicular from the chain's
/// extremes along the other axis and interpolate the missing two
/// sides from those projections.
fn degenerate_fallback(points: &[Point], a: Line, b: Line) -> Option<Perimeter> {
    let perp = perpendicular(a.direction);
    let origin = centroid(points);
    let project = |p: Point| (p.x - origin.x) * perp.x + (p.y - origin.y) * perp.y;

    let (mut min_t, mut max_t) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_p, mut max_p) = (origin, origin);
    for &p in points {
        let t = project(p);
        if t < min_t {
            min_t = t;
            min_p = p;
        }
        if t > max_t {
            max_t = t;
            max_p = p;
        }
    }
    if !min_t.is_finite() || !max_t.is_finite() || (max_t - min_t).abs() < 1e-6 {
        return None;
    }

    let cross_min = Line {
        origin: min_p,
        direction: perp,
    };
    let cross_max = Line {
        origin: max_p,
        direction: perp,
    };

    let v0 = line_intersection(&a, &cross_min)?;
    let v1 = line_intersection(&a, &cross_max)?;
    let v2 = line_intersection(&b, &cross_max)?;
    let v3 = line_intersection(&b, &cross_min)?;
    Some(Perimeter::from_unordered([v0, v1, v2, v3]))
}

/// Fit a [`Perimeter`] to a joined edge chain. Returns `None` when the
/// chain carries too little orientation structure to support a
/// four-sided fit, even through the degenerate fallback.
pub fn fit_perimeter(
    chain: &Chain,
    bucket_degrees: f64,
    ransac_iterations: usize,
    inlier_distance: f64,
) -> Option<Perimeter> {
    let points = &chain.points;
    if points.len() < 8 {
        return None;
    }
    let center = centroid(points);
    let hist = orientation_histogram(chain, bucket_degrees);
    let (angle0, angle1) = dominant_directions(&hist, bucket_degrees);
    let dir0 = direction_vector(angle0);
    let dir1 = direction_vector(angle1);

    let groups = partition_by_quadrant(points, center, dir0, dir1);
    let lines: Vec<Option<Line>> = groups
        .iter()
        .map(|g| ransac_line(g, ransac_iterations, inlier_distance))
        .collect();

    let present = lines.iter().filter(|l| l.is_some()).count();
    if present == 4 {
        let l0 = lines[0]?;
        let l1 = lines[1]?;
        let l2 = lines[2]?;
        let l3 = lines[3]?;
        let v0 = line_intersection(&l0, &l1)?;
        let v1 = line_intersection(&l1, &l2)?;
        let v2 = line_intersection(&l2, &l3)?;
        let v3 = line_intersection(&l3, &l0)?;
        return Some(Perimeter::from_unordered([v0, v1, v2, v3]));
    }

    // Degenerate fallback: use the two most-populated groups' fitted
    // lines, treated as the pair of opposite sides.
    let mut by_size: Vec<(usize, &Line)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, l)| l.as_ref().map(|l| (groups[i].len(), l)))
        .collect();
    by_size.sort_by_key(|&(n, _)| std::cmp::Reverse(n));
    if by_size.len() < 2 {
        return None;
    }
    degenerate_fallback(points, *by_size[0].1, *by_size[1].1)
}

/// Validate a fitted perimeter's interior corner angles and
/// aspect-ratio against the square/rectangle shapes a real symbol can
/// take (spec §4.4).
pub fn validate_perimeter(
    perimeter: &Perimeter,
    corner_angle_range: (f64, f64),
    aspect_ratio_tolerance: f64,
    known_ratios: &[f64],
) -> bool {
    let angles_ok = perimeter
        .corner_angles()
        .iter()
        .all(|&a| a >= corner_angle_range.0 && a <= corner_angle_range.1);
    if !angles_ok {
        return false;
    }

    let (short, long) = perimeter.side_lengths();
    if short <= 1e-6 {
        return false;
    }
    let ratio = long / short;
    let near_square = (0.8..=1.2).contains(&ratio);
    let near_known = known_ratios
        .iter()
        .any(|&r| (ratio - r).abs() <= r * aspect_ratio_tolerance);
    near_square || near_known
}

/// Shrink every vertex of `perimeter` toward its centroid by `amount`
/// pixels, compensating for a net morphological dilate/erode pass
/// upstream (spec §4.4).
pub fn shrink_perimeter(perimeter: &Perimeter, amount: f64) -> Perimeter {
    if amount.abs() < 1e-9 {
        return *perimeter;
    }
    let center = perimeter.centroid();
    let pull = |p: Point| -> Point {
        let dx = center.x - p.x;
        let dy = center.y - p.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1e-9 {
            return p;
        }
        Point::new(p.x + dx / len * amount, p.y + dy / len * amount)
    };
    Perimeter {
        p0: pull(perimeter.p0),
        p1: pull(perimeter.p1),
        p2: pull(perimeter.p2),
        p3: pull(perimeter.p3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_chain() -> Chain {
        let mut points = Vec::new();
        for x in 0..=40 {
            points.push(Point::new(x as f64, 0.0));
        }
        for y in 0..=40 {
            points.push(Point::new(40.0, y as f64));
        }
        for x in (0..=40).rev() {
            points.push(Point::new(x as f64, 40.0));
        }
        for y in (0..=40).rev() {
            points.push(Point::new(0.0, y as f64));
        }
        Chain { points }
    }

    #[test]
    fn fits_a_clean_square_perimeter() {
        let chain = square_chain();
        let perimeter = fit_perimeter(&chain, 5.0, 200, 1.5).expect("perimeter fit");
        let (short, long) = perimeter.side_lengths();
        assert!((short - long).abs() / long < 0.2);
    }

    #[test]
    fn validate_accepts_a_square() {
        let perimeter = Perimeter::from_unordered([
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 40.0),
            Point::new(0.0, 40.0),
        ]);
        assert!(validate_perimeter(&perimeter, (70.0, 110.0), 0.1, &[2.0]));
    }

    #[test]
    fn validate_rejects_a_skewed_quadrilateral() {
        let perimeter = Perimeter::from_unordered([
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(55.0, 40.0),
            Point::new(-15.0, 40.0),
        ]);
        assert!(!validate_perimeter(&perimeter, (80.0, 100.0), 0.1, &[2.0]));
    }

    #[test]
    fn shrink_pulls_vertices_toward_centroid() {
        let perimeter = Perimeter::from_unordered([
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 40.0),
            Point::new(0.0, 40.0),
        ]);
        let shrunk = shrink_perimeter(&perimeter, 5.0);
        let (short_before, _) = perimeter.side_lengths();
        let (short_after, _) = shrunk.side_lengths();
        assert!(short_after < short_before);
    }
}
