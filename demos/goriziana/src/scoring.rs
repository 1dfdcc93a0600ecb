//! Pin-knockdown scoring for one shot.

use glam::{Quat, Vec3};

/// Tilt beyond which a pin counts as knocked over.
pub const PIN_DOWN_TILT: f32 = std::f32::consts::FRAC_PI_4;
/// Vertical drop below the spot that counts as down (fell off the table).
pub const PIN_DOWN_DROP: f32 = 0.3;
/// Horizontal slide away from the spot that counts as down.
pub const PIN_DOWN_SLIDE: f32 = 0.25;

pub const OUTER_PIN_POINTS: u32 = 2;
pub const CENTER_PIN_ALONE_POINTS: u32 = 10;
pub const CENTER_PIN_POINTS: u32 = 4;
pub const RED_BALL_BONUS: u32 = 3;
pub const MIN_FOUL_POINTS: u32 = 2;

/// Whether a pin at `pos`/`rot` has left its `spot`.
pub fn pin_is_down(spot: Vec3, pos: Vec3, rot: Quat) -> bool {
    let tilt = (rot * Vec3::Y).angle_between(Vec3::Y);
    let drop = spot.y - pos.y;
    let slide = Vec3::new(pos.x - spot.x, 0.0, pos.z - spot.z).length();
    tilt > PIN_DOWN_TILT || drop > PIN_DOWN_DROP || slide > PIN_DOWN_SLIDE
}

/// Points for a set of knocked pins. `down[i]` is pin `i`; `center` is the center pin index.
pub fn pin_points(down: &[bool], center: usize) -> u32 {
    let count = down.iter().filter(|d| **d).count();
    down.iter()
        .enumerate()
        .filter(|(_, d)| **d)
        .map(|(i, _)| {
            if i != center {
                OUTER_PIN_POINTS
            } else if count == 1 {
                CENTER_PIN_ALONE_POINTS
            } else {
                CENTER_PIN_POINTS
            }
        })
        .sum()
}

/// What the active ball can touch first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstHit {
    OpponentBall,
    RedBall,
    Pin,
}

/// Contacts recorded while a shot is rolling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotContacts {
    /// First ball or pin the active ball touched. Cushions do not count.
    pub first_hit: Option<FirstHit>,
    pub active_touched_pin: bool,
    pub opponent_hit: bool,
    /// The opponent ball touched the red ball after being hit.
    pub opponent_touched_red: bool,
}

impl ShotContacts {
    pub fn active_hit(&mut self, target: FirstHit) {
        if self.first_hit.is_none() {
            self.first_hit = Some(target);
        }
        match target {
            FirstHit::OpponentBall => self.opponent_hit = true,
            FirstHit::Pin => self.active_touched_pin = true,
            FirstHit::RedBall => {}
        }
    }

    pub fn opponent_hit_red(&mut self) {
        if self.opponent_hit {
            self.opponent_touched_red = true;
        }
    }

    pub fn is_foul(&self) -> bool {
        self.first_hit != Some(FirstHit::OpponentBall) || self.active_touched_pin
    }
}

/// Result of a settled shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotOutcome {
    pub foul: bool,
    pub pins_down: u32,
    /// Points for the knocked pins alone.
    pub pin_points: u32,
    /// Total awarded to `receiver`.
    pub points: u32,
    /// 0 or 1.
    pub receiver: usize,
}

/// Score a shot by `shooter` given its contacts and the knocked pins.
pub fn score_shot(shooter: usize, contacts: &ShotContacts, down: &[bool], center: usize) -> ShotOutcome {
    let pins_down = down.iter().filter(|d| **d).count() as u32;
    let pin_points = pin_points(down, center);
    let foul = contacts.is_foul();
    if foul {
        ShotOutcome {
            foul,
            pins_down,
            pin_points,
            points: pin_points.max(MIN_FOUL_POINTS),
            receiver: 1 - shooter,
        }
    } else {
        let bonus = if contacts.opponent_touched_red { RED_BALL_BONUS } else { 0 };
        ShotOutcome {
            foul,
            pins_down,
            pin_points,
            points: pin_points + bonus,
            receiver: shooter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: usize = 4;

    fn clean_hit() -> ShotContacts {
        let mut c = ShotContacts::default();
        c.active_hit(FirstHit::OpponentBall);
        c
    }

    #[test]
    fn standing_pin_is_up() {
        let spot = Vec3::new(0.7, 6.4, 0.0);
        assert!(!pin_is_down(spot, Vec3::new(0.7, 6.22, 0.01), Quat::from_rotation_x(0.1)));
    }

    #[test]
    fn tipped_dropped_or_slid_pin_is_down() {
        let spot = Vec3::new(0.0, 6.4, 0.0);
        assert!(pin_is_down(spot, spot, Quat::from_rotation_z(1.2)));
        assert!(pin_is_down(spot, spot - Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY));
        assert!(pin_is_down(spot, spot + Vec3::new(0.3, 0.0, 0.0), Quat::IDENTITY));
    }

    #[test]
    fn pin_values() {
        assert_eq!(pin_points(&[true, false, false, false, false], CENTER), 2);
        assert_eq!(pin_points(&[true, true, false, false, false], CENTER), 4);
        assert_eq!(pin_points(&[false, false, false, false, true], CENTER), 10);
        assert_eq!(pin_points(&[true, false, false, false, true], CENTER), 6);
        assert_eq!(pin_points(&[true; 5], CENTER), 12);
        assert_eq!(pin_points(&[false; 5], CENTER), 0);
    }

    #[test]
    fn valid_shot_scores_for_shooter() {
        let mut c = clean_hit();
        c.opponent_hit_red();
        let outcome = score_shot(0, &c, &[true, true, false, false, false], CENTER);
        assert!(!outcome.foul);
        assert_eq!(outcome.receiver, 0);
        assert_eq!(outcome.pins_down, 2);
        assert_eq!(outcome.points, 4 + RED_BALL_BONUS);
    }

    #[test]
    fn red_touch_before_hit_gives_no_bonus() {
        let mut c = ShotContacts::default();
        c.opponent_hit_red();
        c.active_hit(FirstHit::OpponentBall);
        assert!(!c.opponent_touched_red);
        let outcome = score_shot(1, &c, &[false; 5], CENTER);
        assert_eq!(outcome.points, 0);
        assert_eq!(outcome.receiver, 1);
    }

    #[test]
    fn missing_the_opponent_is_a_foul() {
        let c = ShotContacts::default();
        let outcome = score_shot(0, &c, &[false; 5], CENTER);
        assert!(outcome.foul);
        assert_eq!(outcome.receiver, 1);
        assert_eq!(outcome.points, MIN_FOUL_POINTS);
    }

    #[test]
    fn hitting_red_first_is_a_foul() {
        let mut c = ShotContacts::default();
        c.active_hit(FirstHit::RedBall);
        c.active_hit(FirstHit::OpponentBall);
        assert!(c.is_foul());
    }

    #[test]
    fn active_ball_touching_pin_gives_pins_to_opponent() {
        let mut c = clean_hit();
        c.active_hit(FirstHit::Pin);
        let outcome = score_shot(1, &c, &[false, false, false, false, true], CENTER);
        assert!(outcome.foul);
        assert_eq!(outcome.receiver, 0);
        assert_eq!(outcome.points, 10);
    }
}
