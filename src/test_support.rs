//! Surfaces shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::f64::consts::PI;
use std::sync::Once;

use crate::math::Point3;
use crate::Surface;

/// Routes `tracing` output to the test harness, honouring `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let env_filter = tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    });
}

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

fn flatten(points: &[Point3]) -> Vec<f64> {
    points.iter().flat_map(|q| [q.x, q.y, q.z]).collect()
}

/// Faces of `[0, 1]^3` as quads, counter-clockwise seen from outside.
/// Order: bottom, top, front, back, left, right.
fn cube_quads(offset: f64) -> [[Point3; 4]; 6] {
    let v = |x: f64, y: f64, z: f64| p(x + offset, y, z);
    [
        [v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 0.0, 0.0)],
        [v(0.0, 0.0, 1.0), v(1.0, 0.0, 1.0), v(1.0, 1.0, 1.0), v(0.0, 1.0, 1.0)],
        [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 0.0, 1.0), v(0.0, 0.0, 1.0)],
        [v(0.0, 1.0, 0.0), v(0.0, 1.0, 1.0), v(1.0, 1.0, 1.0), v(1.0, 1.0, 0.0)],
        [v(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0), v(0.0, 1.0, 1.0), v(0.0, 1.0, 0.0)],
        [v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 1.0, 1.0), v(1.0, 0.0, 1.0)],
    ]
}

fn triangles_with_offset(offset: f64) -> Vec<Vec<f64>> {
    cube_quads(offset)
        .iter()
        .flat_map(|q| [flatten(&[q[0], q[1], q[2]]), flatten(&[q[0], q[2], q[3]])])
        .collect()
}

/// Coordinates of the twelve outward-facing triangles of the unit cube.
/// Triangles `2n` and `2n + 1` cover face `n`.
pub fn cube_triangles() -> Vec<Vec<f64>> {
    triangles_with_offset(0.0)
}

/// The unit cube as twelve planar triangles.
pub fn unit_cube() -> Surface {
    init_tracing();
    let mut surface = Surface::new();
    for coords in cube_triangles() {
        surface.add_planar_triangle(&coords, None, None).unwrap();
    }
    surface
}

/// The unit cube without its top face.
pub fn open_box() -> Surface {
    let mut surface = Surface::new();
    for (n, coords) in cube_triangles().iter().enumerate() {
        if n / 2 != 1 {
            surface.add_planar_triangle(coords, None, None).unwrap();
        }
    }
    surface
}

/// The unit cube followed by a copy shifted three units along x.
pub fn two_cubes() -> Surface {
    let mut surface = unit_cube();
    for coords in triangles_with_offset(3.0) {
        surface.add_planar_triangle(&coords, None, None).unwrap();
    }
    surface
}

/// A flat patch with `P_ij = (i, j, z)`.
pub fn patch_coords(z: f64) -> Vec<f64> {
    let points: Vec<Point3> = (0..16)
        .map(|n| p(f64::from(n % 4), f64::from(n / 4), z))
        .collect();
    flatten(&points)
}

/// Bilinear patch over a quad with the quad's orientation.
fn quad_patch(q: &[Point3; 4]) -> Vec<f64> {
    let mut points = Vec::with_capacity(16);
    for j in 0..4 {
        for i in 0..4 {
            let (a, b) = (f64::from(i), f64::from(j));
            let w = [(3.0 - a) * (3.0 - b), a * (3.0 - b), a * b, (3.0 - a) * b];
            let mix = |axis: usize| {
                (w[0] * q[0][axis] + w[1] * q[1][axis] + w[2] * q[2][axis] + w[3] * q[3][axis])
                    / 9.0
            };
            points.push(p(mix(0), mix(1), mix(2)));
        }
    }
    flatten(&points)
}

/// The unit cube as six bilinear patches.
pub fn patch_cube() -> Surface {
    let mut surface = Surface::new();
    for quad in &cube_quads(0.0) {
        surface.add_cubic_patch(&quad_patch(quad), None, None).unwrap();
    }
    surface
}

/// A flat cubic triangle with corners `u` (`P300`), `v` (`P030`) and `w`
/// (`P003`), its control points evenly spaced.
pub fn flat_cubic_triangle(u: [f64; 3], v: [f64; 3], w: [f64; 3]) -> Vec<f64> {
    let mut coords = Vec::with_capacity(30);
    for i in 0..=3u32 {
        for j in 0..=(3 - i) {
            let k = 3 - i - j;
            for axis in 0..3 {
                let value = f64::from(i) * u[axis] + f64::from(j) * v[axis] + f64::from(k) * w[axis];
                coords.push(value / 3.0);
            }
        }
    }
    coords
}

/// Appends an eight-quad Möbius strip of planar triangles to `surface`.
pub fn mobius_strip(mut surface: Surface) -> Surface {
    const QUADS: usize = 8;
    let rungs: Vec<(Point3, Point3)> = (0..QUADS)
        .map(|k| {
            #[allow(clippy::cast_precision_loss)]
            let theta = 2.0 * PI * k as f64 / QUADS as f64;
            let phi = theta / 2.0;
            let center = p(3.0 * theta.cos(), 3.0 * theta.sin(), 0.0);
            let dir = p(phi.cos() * theta.cos(), phi.cos() * theta.sin(), phi.sin()).coords;
            (center + dir, center - dir)
        })
        .collect();
    for k in 0..QUADS {
        let (a0, b0) = rungs[k];
        // the last quad closes the strip with a half twist
        let (a1, b1) = if k + 1 == QUADS {
            (rungs[0].1, rungs[0].0)
        } else {
            rungs[k + 1]
        };
        for tri in [[a0, b0, b1], [a0, b1, a1]] {
            surface.add_planar_triangle(&flatten(&tri), None, None).unwrap();
        }
    }
    surface
}
