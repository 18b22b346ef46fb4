//! Lane derivation and the mirror/random lane modifiers.

use crate::models::config::Modifiers;
use rand::Rng;

/// Lane for a feature starting at `start_secs`: centiseconds modulo lane count.
pub fn feature_lane(start_secs: f64, lane_count: usize) -> usize {
    ((start_secs * 100.0).floor() as i64).rem_euclid(lane_count as i64) as usize
}

/// Applies the lane modifiers to raw lanes.
#[derive(Debug, Clone, Copy)]
pub struct LaneAssigner {
    lane_count: usize,
    mirror: bool,
    random: bool,
}

impl LaneAssigner {
    pub fn new(lane_count: usize, modifiers: Modifiers) -> Self {
        Self {
            lane_count,
            mirror: modifiers.mirror,
            random: modifiers.random,
        }
    }

    /// Random overrides mirror: a mirrored uniform draw is still uniform.
    pub fn assign<R: Rng + ?Sized>(&self, lane: usize, rng: &mut R) -> usize {
        if self.random {
            rng.random_range(0..self.lane_count)
        } else if self.mirror {
            self.lane_count - 1 - lane
        } else {
            lane
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn feature_lane_uses_centiseconds() {
        assert_eq!(feature_lane(2.0, 4), 0);
        assert_eq!(feature_lane(2.25, 4), 1);
        assert_eq!(feature_lane(2.5, 6), 4);
    }

    #[test]
    fn mirror_reflects_lanes() {
        let mut rng = StdRng::seed_from_u64(1);
        let assigner = LaneAssigner::new(
            4,
            Modifiers {
                mirror: true,
                ..Default::default()
            },
        );
        assert_eq!(assigner.assign(0, &mut rng), 3);
        assert_eq!(assigner.assign(1, &mut rng), 2);
        assert_eq!(assigner.assign(3, &mut rng), 0);
    }

    #[test]
    fn random_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let assigner = LaneAssigner::new(
            6,
            Modifiers {
                random: true,
                ..Default::default()
            },
        );
        for _ in 0..200 {
            assert!(assigner.assign(0, &mut rng) < 6);
        }
    }
}
