//! Polygon regions used for territory and water tests.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Coordinates;

/// Simple closed polygon. The closing edge from the last vertex back to the first is implied.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Coordinates>,
}

impl Polygon {
    pub fn new(vertices: Vec<Coordinates>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle spanned by two corners.
    pub fn rectangle(a: Coordinates, b: Coordinates) -> Self {
        Self::new(vec![
            Coordinates::new(a.x, a.y),
            Coordinates::new(b.x, a.y),
            Coordinates::new(b.x, b.y),
            Coordinates::new(a.x, b.y),
        ])
    }

    /// Even-odd ray casting containment test.
    pub fn contains(&self, point: Coordinates) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > point.y) != (vj.y > point.y) {
                let x_cross = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Whether any polygon in `polygons` contains `point`.
pub fn any_contains(polygons: &[Polygon], point: Coordinates) -> bool {
    polygons.iter().any(|p| p.contains(point))
}
