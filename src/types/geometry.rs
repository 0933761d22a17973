//! Poses and footprint polygons.

use std::f32::consts::TAU;

use glam::Vec2;

/// Number of vertices used to approximate a circular footprint.
const CIRCLE_FOOTPRINT_POINTS: usize = 16;

/// Robot pose in world coordinates (meters).
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Pose2 {
    pub position: Vec2,
    pub yaw: f32,
}

impl Pose2 {
    pub fn new(position: Vec2, yaw: f32) -> Self {
        Self { position, yaw }
    }

    pub fn from_xy_yaw(x: f32, y: f32, yaw: f32) -> Self {
        Self::new(Vec2::new(x, y), yaw)
    }
}

/// Footprint: closed polygon in meters.
///
/// Edges run from `points[i]` to `points[i + 1]`, plus the closing edge from the
/// last vertex back to the first. Vertex order and winding are kept as given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Footprint {
    pub points: Vec<Vec2>,
}

impl Footprint {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Rectangle centered on the origin, `length` along x and `width` along y.
    pub fn rectangle(length: f32, width: f32) -> Self {
        let hl = 0.5 * length;
        let hw = 0.5 * width;
        Self::new(vec![
            Vec2::new(hl, -hw),
            Vec2::new(hl, hw),
            Vec2::new(-hl, hw),
            Vec2::new(-hl, -hw),
        ])
    }

    /// Regular polygon approximating a circle of `radius` around the origin.
    pub fn from_radius(radius: f32) -> Self {
        let points = (0..CIRCLE_FOOTPRINT_POINTS)
            .map(|i| {
                let angle = i as f32 * TAU / CIRCLE_FOOTPRINT_POINTS as f32;
                Vec2::from_angle(angle) * radius
            })
            .collect();
        Self::new(points)
    }

    /// A footprint needs at least one edge to be scored.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Boundary edges, including the closing edge from the last vertex to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Place a footprint given relative to the origin at `pose`.
    ///
    /// Every vertex is rotated by `pose.yaw`, then translated by `pose.position`.
    pub fn project(&self, pose: Pose2) -> Footprint {
        let rotation = Vec2::from_angle(pose.yaw);
        let points = self
            .points
            .iter()
            .map(|p| pose.position + rotation.rotate(*p))
            .collect();
        Footprint { points }
    }

    /// Remove `robot_pose` from a footprint already placed at that pose.
    ///
    /// Every vertex is translated by `-robot_pose.position`, then rotated by
    /// `-robot_pose.yaw`. The result is expressed relative to (0, 0, 0).
    pub fn deorient(&self, robot_pose: Pose2) -> Footprint {
        let rotation = Vec2::from_angle(-robot_pose.yaw);
        let points = self
            .points
            .iter()
            .map(|p| rotation.rotate(*p - robot_pose.position))
            .collect();
        Footprint { points }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;

    use super::*;

    fn assert_points_eq(a: &[Vec2], b: &[Vec2]) {
        assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(b) {
            assert_relative_eq!(p.x, q.x, epsilon = 1e-4);
            assert_relative_eq!(p.y, q.y, epsilon = 1e-4);
        }
    }

    #[test]
    fn project_rotates_then_translates() {
        let footprint = Footprint::new(vec![Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]);
        let placed = footprint.project(Pose2::from_xy_yaw(10.0, 5.0, FRAC_PI_2));
        assert_points_eq(
            &placed.points,
            &[Vec2::new(10.0, 6.0), Vec2::new(9.0, 5.0)],
        );
    }

    #[test]
    fn deorient_translates_then_rotates() {
        let placed = Footprint::new(vec![Vec2::new(10.0, 6.0), Vec2::new(9.0, 5.0)]);
        let canonical = placed.deorient(Pose2::from_xy_yaw(10.0, 5.0, FRAC_PI_2));
        assert_points_eq(
            &canonical.points,
            &[Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        );
    }

    #[test]
    fn deorient_then_project_is_identity() {
        let footprint = Footprint::new(vec![
            Vec2::new(3.2, -1.0),
            Vec2::new(4.1, 0.5),
            Vec2::new(2.0, 2.5),
            Vec2::new(1.5, -0.3),
        ]);
        for pose in [
            Pose2::from_xy_yaw(0.0, 0.0, 0.0),
            Pose2::from_xy_yaw(3.0, 1.0, 0.7),
            Pose2::from_xy_yaw(-12.5, 40.0, -2.9),
            Pose2::from_xy_yaw(1.0, -1.0, PI),
        ] {
            let round_trip = footprint.deorient(pose).project(pose);
            assert_points_eq(&round_trip.points, &footprint.points);
        }
    }

    #[test]
    fn edges_include_closing_edge() {
        let footprint = Footprint::rectangle(2.0, 1.0);
        let edges: Vec<_> = footprint.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (footprint.points[3], footprint.points[0]));
    }

    #[test]
    fn two_point_footprint_has_two_edges() {
        let footprint = Footprint::new(vec![Vec2::ZERO, Vec2::X]);
        assert!(footprint.is_valid());
        assert_eq!(footprint.edges().count(), 2);
    }

    #[test]
    fn circle_footprint_lies_on_radius() {
        let footprint = Footprint::from_radius(0.3);
        assert_eq!(footprint.len(), 16);
        for p in &footprint.points {
            assert_relative_eq!(p.length(), 0.3, epsilon = 1e-5);
        }
    }
}
