//! Perimeter refinement (spec §4.5): nudge a fitted perimeter's sides
//! to hug the true symbol boundary rather than the first pass's
//! possibly under/over-shot edge chain.

use dmtx_core::{line_intersection, GrayImageView, Line, Perimeter, Point};

fn unit(v: Point) -> Point {
    let len = (v.x * v.x + v.y * v.y).sqrt();
    if len < 1e-9 {
        Point::new(0.0, 0.0)
    } else {
        Point::new(v.x / len, v.y / len)
    }
}

fn outward_normal(a: Point, b: Point, center: Point) -> Point {
    let dir = Point::new(b.x - a.x, b.y - a.y);
    let n = unit(Point::new(-dir.y, dir.x));
    let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    let to_mid = Point::new(mid.x - center.x, mid.y - center.y);
    if n.x * to_mid.x + n.y * to_mid.y >= 0.0 {
        n
    } else {
        Point::new(-n.x, -n.y)
    }
}

fn is_foreground(image: &GrayImageView<'_>, p: Point, threshold: f64) -> bool {
    dmtx_core::sample_bilinear(image, p.x as f32, p.y as f32) < threshold as f32
}

fn vertices_from_side_lines(lines: &[Line; 4]) -> Option<Perimeter> {
    let v0 = line_intersection(&lines[3], &lines[0])?;
    let v1 = line_intersection(&lines[0], &lines[1])?;
    let v2 = line_intersection(&lines[1], &lines[2])?;
    let v3 = line_intersection(&lines[2], &lines[3])?;
    Some(Perimeter::from_unordered([v0, v1, v2, v3]))
}

/// Walk each side outward from its midpoint along the outward normal,
/// as long as the probe stays off the foreground, up to
/// `max_extension_percent` of the side's own length. Recomposes the
/// perimeter from the four extended side lines.
pub fn expand_perimeter_sides(
    perimeter: &Perimeter,
    image: &GrayImageView<'_>,
    threshold: f64,
    max_extension_percent: f64,
) -> Perimeter {
    let verts = perimeter.vertices();
    let center = perimeter.centroid();
    let mut lines = [Line::through(verts[0], verts[1]); 4];

    for i in 0..4 {
        let a = verts[i];
        let b = verts[(i + 1) % 4];
        let side_len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let normal = outward_normal(a, b, center);
        let max_dist = side_len * max_extension_percent / 100.0;

        let mut dist = 0.0;
        let step = (side_len / 64.0).max(0.5);
        while dist + step <= max_dist {
            let probe = Point::new(mid.x + normal.x * (dist + step), mid.y + normal.y * (dist + step));
            if is_foreground(image, probe, threshold) {
                break;
            }
            dist += step;
        }

        let base = Line::through(a, b);
        lines[i] = Line {
            origin: Point::new(base.origin.x + normal.x * dist, base.origin.y + normal.y * dist),
            direction: base.direction,
        };
    }

    vertices_from_side_lines(&lines).unwrap_or(*perimeter)
}

/// Walk inward from the quarter and three-quarter points of each side
/// toward the centroid until the first foreground pixel, refit that
/// side's line through the two hit points, and recompose the
/// perimeter.
pub fn contract_perimeter_sides(
    perimeter: &Perimeter,
    image: &GrayImageView<'_>,
    threshold: f64,
    max_search_percent: f64,
) -> Perimeter {
    let verts = perimeter.vertices();
    let center = perimeter.centroid();
    let mut lines = [Line::through(verts[0], verts[1]); 4];

    for i in 0..4 {
        let a = verts[i];
        let b = verts[(i + 1) % 4];
        let side_len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        let outward = outward_normal(a, b, center);
        let inward = Point::new(-outward.x, -outward.y);
        let max_dist = side_len * max_search_percent / 100.0;
        let step = (side_len / 64.0).max(0.5);

        let walk_inward = |start: Point| -> Point {
            let mut dist = 0.0;
            let mut hit = start;
            while dist <= max_dist {
                let probe = Point::new(start.x + inward.x * dist, start.y + inward.y * dist);
                if is_foreground(image, probe, threshold) {
                    hit = probe;
                    break;
                }
                hit = probe;
                dist += step;
            }
            hit
        };

        let p_quarter = Point::new(a.x + (b.x - a.x) * 0.25, a.y + (b.y - a.y) * 0.25);
        let p_three_quarter = Point::new(a.x + (b.x - a.x) * 0.75, a.y + (b.y - a.y) * 0.75);
        let h0 = walk_inward(p_quarter);
        let h1 = walk_inward(p_three_quarter);

        lines[i] = if (h0.x - h1.x).abs() > 1e-6 || (h0.y - h1.y).abs() > 1e-6 {
            Line::through(h0, h1)
        } else {
            Line::through(a, b)
        };
    }

    vertices_from_side_lines(&lines).unwrap_or(*perimeter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_square(width: usize, height: usize, x0: usize, y0: usize, side: usize) -> Vec<u8> {
        let mut data = vec![255u8; width * height];
        for row in y0..y0 + side {
            for col in x0..x0 + side {
                data[row * width + col] = 0;
            }
        }
        data
    }

    #[test]
    fn expand_grows_an_undershot_perimeter() {
        let width = 60;
        let height = 60;
        let data = dark_square(width, height, 10, 10, 40);
        let image = GrayImageView {
            width,
            height,
            data: &data,
        };
        let undershot = Perimeter::from_unordered([
            Point::new(12.0, 12.0),
            Point::new(48.0, 12.0),
            Point::new(48.0, 48.0),
            Point::new(12.0, 48.0),
        ]);
        let expanded = expand_perimeter_sides(&undershot, &image, 128.0, 50.0);
        let (short_before, _) = undershot.side_lengths();
        let (short_after, _) = expanded.side_lengths();
        assert!(short_after >= short_before);
    }

    #[test]
    fn contract_shrinks_an_overshot_perimeter() {
        let width = 60;
        let height = 60;
        let data = dark_square(width, height, 10, 10, 40);
        let image = GrayImageView {
            width,
            height,
            data: &data,
        };
        let overshot = Perimeter::from_unordered([
            Point::new(0.0, 0.0),
            Point::new(59.0, 0.0),
            Point::new(59.0, 59.0),
            Point::new(0.0, 59.0),
        ]);
        let contracted = contract_perimeter_sides(&overshot, &image, 128.0, 80.0);
        let (short_before, _) = overshot.side_lengths();
        let (short_after, _) = contracted.side_lengths();
        assert!(short_after <= short_before);
    }
}
