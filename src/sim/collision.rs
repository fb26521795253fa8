//! Axis-aligned collision detection
//!
//! Targets and the projectile are both axis-aligned boxes. Overlap is strict
//! on both axes: boxes that only share an edge do not collide, so results at
//! exact boundaries never depend on float rounding direction.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::trajectory::TrajectorySample;

/// Axis-aligned box, origin at its minimum corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CollisionBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square box of side `size` centered on `center`
    pub fn centered(center: DVec2, size: f64) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    #[inline]
    pub fn min(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        DVec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> DVec2 {
        (self.min() + self.max()) / 2.0
    }

    /// Check if a point lies strictly inside the box
    pub fn contains_point(&self, point: DVec2) -> bool {
        point.cmpgt(self.min()).all() && point.cmplt(self.max()).all()
    }
}

/// True iff the boxes overlap with positive area.
///
/// `a.x < b.x + b.width && a.x + a.width > b.x`, and the same on y.
#[inline]
pub fn check_collision(a: &CollisionBox, b: &CollisionBox) -> bool {
    a.min().cmplt(b.max()).all() && a.max().cmpgt(b.min()).all()
}

/// First contact between a moving projectile and a set of targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Index of the sample that collided (0 = launch)
    pub step: u32,
    /// Index into the target slice
    pub target: usize,
    /// Projectile state at contact
    pub sample: TrajectorySample,
}

/// Walk samples in order and report the first one whose projectile box
/// overlaps a target. Ties on the same sample go to the lowest target index.
pub fn first_hit<I>(samples: I, projectile_size: f64, targets: &[CollisionBox]) -> Option<Hit>
where
    I: IntoIterator<Item = TrajectorySample>,
{
    if targets.is_empty() {
        return None;
    }
    samples.into_iter().zip(0u32..).find_map(|(sample, step)| {
        let projectile = CollisionBox::centered(sample.position(), projectile_size);
        targets
            .iter()
            .position(|t| check_collision(&projectile, t))
            .map(|target| Hit {
                step,
                target,
                sample,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64) -> CollisionBox {
        CollisionBox::new(x, y, 50.0, 50.0)
    }

    #[test]
    fn test_overlapping_boxes_collide() {
        assert!(check_collision(&square(100.0, 100.0), &square(120.0, 120.0)));
    }

    #[test]
    fn test_disjoint_boxes_miss() {
        assert!(!check_collision(&square(100.0, 100.0), &square(200.0, 200.0)));
    }

    #[test]
    fn test_shared_edge_is_not_collision() {
        let a = square(100.0, 100.0);
        assert!(!check_collision(&a, &square(150.0, 100.0)));
        assert!(!check_collision(&square(150.0, 100.0), &a));
        assert!(!check_collision(&a, &square(100.0, 150.0)));
        // Corner touch
        assert!(!check_collision(&a, &square(150.0, 150.0)));
    }

    #[test]
    fn test_overlap_on_one_axis_only() {
        let a = square(100.0, 100.0);
        assert!(!check_collision(&a, &square(120.0, 300.0)));
    }

    #[test]
    fn test_containment_collides() {
        let outer = CollisionBox::new(0.0, 0.0, 100.0, 100.0);
        let inner = CollisionBox::new(40.0, 40.0, 10.0, 10.0);
        assert!(check_collision(&outer, &inner));
        assert!(check_collision(&inner, &outer));
    }

    #[test]
    fn test_centered_box() {
        let b = CollisionBox::centered(DVec2::new(10.0, 20.0), 4.0);
        assert_eq!(b, CollisionBox::new(8.0, 18.0, 4.0, 4.0));
        assert_eq!(b.center(), DVec2::new(10.0, 20.0));
        assert!(b.contains_point(DVec2::new(10.0, 20.0)));
        assert!(!b.contains_point(DVec2::new(8.0, 20.0)));
    }

    #[test]
    fn test_first_hit_picks_earliest_sample() {
        let samples = (0..10).map(|i| TrajectorySample {
            x: i as f64 * 10.0,
            y: 0.0,
            vx: 10.0,
            vy: 0.0,
        });
        let targets = [
            CollisionBox::new(78.0, -5.0, 10.0, 10.0),
            CollisionBox::new(38.0, -5.0, 10.0, 10.0),
        ];
        let hit = first_hit(samples, 2.0, &targets).unwrap();
        assert_eq!(hit.step, 4);
        assert_eq!(hit.target, 1);
        assert_eq!(hit.sample.x, 40.0);
    }

    #[test]
    fn test_first_hit_none() {
        let samples = vec![TrajectorySample::default()];
        assert!(first_hit(samples.clone(), 2.0, &[]).is_none());
        let far = [CollisionBox::new(1000.0, 1000.0, 1.0, 1.0)];
        assert!(first_hit(samples, 2.0, &far).is_none());
    }
}
