use serde::Serialize;

/// Axis-aligned rectangle with quarter-disk corners, in pixel space
///
/// `x`/`y` is the top-left pixel; `width`/`height` are pixel counts, so the
/// last covered column is `x + width - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub radius: u32,
}

impl RoundedRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32, radius: u32) -> Self {
        Self { x, y, width, height, radius }
    }

    /// Radius actually used, clamped so opposite corners never overlap
    pub fn effective_radius(&self) -> u32 {
        self.radius.min(self.width / 2).min(self.height / 2)
    }

    /// Whether the centre of pixel (`px`, `py`) lies inside the shape
    pub fn contains(&self, px: u32, py: u32) -> bool {
        if px < self.x || py < self.y {
            return false;
        }
        let (lx, ly) = (px - self.x, py - self.y);
        if lx >= self.width || ly >= self.height {
            return false;
        }

        let r = self.effective_radius();
        if r == 0 {
            return true;
        }

        let r = r as f64;
        let w = self.width as f64;
        let h = self.height as f64;
        let cx = lx as f64 + 0.5;
        let cy = ly as f64 + 0.5;

        // Nearest corner-circle centre, or inside the cross
        let ox = if cx < r {
            r
        } else if cx > w - r {
            w - r
        } else {
            return true;
        };
        let oy = if cy < r {
            r
        } else if cy > h - r {
            h - r
        } else {
            return true;
        };

        let dx = cx - ox;
        let dy = cy - oy;
        dx * dx + dy * dy <= r * r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_corners_without_radius() {
        let rect = RoundedRect::new(2, 3, 10, 5, 0);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(11, 7));
        assert!(!rect.contains(12, 7));
        assert!(!rect.contains(1, 3));
        assert!(!rect.contains(2, 8));
    }

    #[test]
    fn test_corner_tips_are_cut() {
        let rect = RoundedRect::new(0, 0, 100, 50, 10);
        assert!(!rect.contains(0, 0));
        assert!(!rect.contains(99, 0));
        assert!(!rect.contains(0, 49));
        assert!(!rect.contains(99, 49));
        // Edge midpoints and centre stay covered
        assert!(rect.contains(50, 0));
        assert!(rect.contains(0, 25));
        assert!(rect.contains(50, 25));
    }

    #[test]
    fn test_radius_clamped_to_half_side() {
        let rect = RoundedRect::new(0, 0, 20, 10, 50);
        assert_eq!(rect.effective_radius(), 5);
        // Fully rounded ends, middle row still reaches the sides
        assert!(rect.contains(0, 5));
        assert!(rect.contains(19, 5));
    }
}
