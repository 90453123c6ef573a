//! Grid sampling (spec §4.7): map each module's cell centre through the
//! fitted perimeter into image space, sample a small window there, and
//! classify the module as on/off/damaged.

use dmtx_core::{sample_bilinear, GrayImageView, Perimeter};

use crate::grid::Grid;

/// Sample an oriented module grid of `dim_x` x `dim_y` cells from `image`
/// using bilinear interpolation at each cell centre, as mapped by
/// `perimeter`. `radius` (in fractional cell units) controls the
/// half-width of the averaging window used to decide on/off/damaged: a
/// module is "on" when more than half its sampled window is dark, and
/// "damaged" when the dark fraction falls in `(0.25, 0.75)`.
pub fn sample_grid(
    image: &GrayImageView<'_>,
    perimeter: &Perimeter,
    dim_x: usize,
    dim_y: usize,
    radius: f64,
) -> Grid {
    let mut grid = Grid::new(dim_x, dim_y);
    let steps = radius.max(0.0).round() as i32;
    let step_u = 1.0 / dim_x as f64 / (2.0 * radius.max(1.0));
    let step_v = 1.0 / dim_y as f64 / (2.0 * radius.max(1.0));

    for row in 0..dim_y {
        for col in 0..dim_x {
            let u = (col as f64 + 0.5) / dim_x as f64;
            let v = (row as f64 + 0.5) / dim_y as f64;

            let mut dark_count = 0.0;
            let mut sampled = 0.0;
            for dy in -steps..=steps {
                for dx in -steps..=steps {
                    let p = perimeter.sample(u + dx as f64 * step_u, v + dy as f64 * step_v);
                    let value = sample_bilinear(image, p.x as f32, p.y as f32);
                    sampled += 1.0;
                    if value < 128.0 {
                        dark_count += 1.0;
                    }
                }
            }

            let fraction = dark_count / sampled;
            grid.set(row, col, fraction > 0.5);
            grid.set_damaged(row, col, (0.25..0.75).contains(&fraction));
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmtx_core::Point;

    #[test]
    fn uniform_dark_image_samples_all_on() {
        let width = 40usize;
        let height = 40usize;
        let data = vec![0u8; width * height];
        let image = GrayImageView {
            width,
            height,
            data: &data,
        };
        let perimeter = Perimeter::from_unordered([
            Point::new(0.0, 0.0),
            Point::new(39.0, 0.0),
            Point::new(39.0, 39.0),
            Point::new(0.0, 39.0),
        ]);
        let grid = sample_grid(&image, &perimeter, 4, 4, 1.0);
        assert!(grid.occupancy.iter().all(|&on| on));
    }

    #[test]
    fn uniform_light_image_samples_all_off() {
        let width = 40usize;
        let height = 40usize;
        let data = vec![255u8; width * height];
        let image = GrayImageView {
            width,
            height,
            data: &data,
        };
        let perimeter = Perimeter::from_unordered([
            Point::new(0.0, 0.0),
            Point::new(39.0, 0.0),
            Point::new(39.0, 39.0),
            Point::new(0.0, 39.0),
        ]);
        let grid = sample_grid(&image, &perimeter, 4, 4, 1.0);
        assert!(grid.occupancy.iter().all(|&on| !on));
    }
}
