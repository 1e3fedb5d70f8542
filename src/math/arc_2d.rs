/// 2D arc/bulge math utilities.
///
/// Bulge convention (DXF): `bulge = tan(sweep_angle / 4)`.
/// - `bulge = 0`: straight line
/// - `bulge > 0`: counter-clockwise arc
/// - `bulge < 0`: clockwise arc
/// - `|bulge| = 1`: semicircle
use std::f64::consts::PI;

/// An arc in center-radius-angle form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc2 {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc2 {
    /// Evaluates a point on the arc at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> (f64, f64) {
        let angle = self.start_angle + self.sweep * t;
        (
            self.cx + self.radius * angle.cos(),
            self.cy + self.radius * angle.sin(),
        )
    }

    /// Number of chords needed so that no chord deviates from the arc by
    /// more than `tolerance` (sagitta bound).
    #[must_use]
    pub fn chord_count(&self, tolerance: f64) -> u32 {
        let abs_sweep = self.sweep.abs();
        if self.radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
            return 1;
        }
        // sagitta = r * (1 - cos(θ/2))  =>  θ = 2 * acos(1 - tolerance/r)
        let max_angle = if tolerance >= self.radius {
            PI
        } else {
            2.0 * (1.0 - tolerance / self.radius).acos()
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = (abs_sweep / max_angle).ceil() as u32;
        n.max(1)
    }
}

/// Converts a bulge-defined arc segment to center-radius-angle form.
///
/// Returns `None` for zero-length chords or a zero bulge.
#[must_use]
pub fn arc_from_bulge(x0: f64, y0: f64, x1: f64, y1: f64, bulge: f64) -> Option<Arc2> {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let chord_len = (dx * dx + dy * dy).sqrt();

    if chord_len < 1e-12 || bulge.abs() < 1e-12 {
        return None;
    }

    // Signed distance from chord midpoint to center, in half-chord units.
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let mx = (x0 + x1) * 0.5;
    let my = (y0 + y1) * 0.5;

    // Normal to chord; for positive bulge the center lies to its left.
    let nx = -dy / chord_len;
    let ny = dx / chord_len;

    let cx = mx + sagitta_ratio * (chord_len * 0.5) * nx;
    let cy = my + sagitta_ratio * (chord_len * 0.5) * ny;

    // r = d*(1+b²)/(4*|b|), from r = d/(2*sin(θ/2)) with θ = 4*atan(b)
    let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
    let start_angle = (y0 - cy).atan2(x0 - cx);
    let sweep = 4.0 * bulge.atan();

    Some(Arc2 {
        cx,
        cy,
        radius,
        start_angle,
        sweep,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn semicircle_from_unit_bulge() {
        let arc = arc_from_bulge(0.0, 0.0, 2.0, 0.0, 1.0).unwrap();
        assert_abs_diff_eq!(arc.cx, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.cy, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.radius, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.sweep, PI, epsilon = 1e-12);

        // CCW from (0,0) to (2,0) around (1,0) passes below the chord.
        let (mx, my) = arc.point_at(0.5);
        assert_abs_diff_eq!(mx, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(my, -1.0, epsilon = 1e-12);

        let (ex, ey) = arc.point_at(1.0);
        assert_abs_diff_eq!(ex, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ey, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_bulge_is_not_an_arc() {
        assert!(arc_from_bulge(0.0, 0.0, 1.0, 0.0, 0.0).is_none());
        assert!(arc_from_bulge(1.0, 1.0, 1.0, 1.0, 0.5).is_none());
    }

    #[test]
    fn chord_count_grows_with_tighter_tolerance() {
        let arc = arc_from_bulge(0.0, 0.0, 2.0, 0.0, 1.0).unwrap();
        let coarse = arc.chord_count(0.1);
        let fine = arc.chord_count(0.001);
        assert!(fine > coarse);
        assert!(coarse >= 2);
    }
}
