//! Table layout: slab, cushions, ball starts and the five pin spots.
//! All values are world units with Y up; the playing surface sits at y = 6.12.

use glam::{BVec3, Vec3};
use cue_engine::{BodyDesc, ColliderDesc, ColliderMaterial, Material};

pub const BALL_RADIUS: f32 = 0.5;
pub const BALL_MASS: f32 = 1.0;
pub const BALL_LINEAR_DAMPING: f32 = 0.3;
pub const BALL_ANGULAR_DAMPING: f32 = 0.4;
/// Player balls spin down faster than the red ball.
pub const PLAYER_BALL_ANGULAR_DAMPING: f32 = 2.0;

pub const PIN_HALF_HEIGHT: f32 = 0.2;
pub const PIN_RADIUS: f32 = 0.09;
/// The pin collider is lifted above the body origin so the pin stands on its base.
pub const PIN_COLLIDER_LIFT: f32 = 0.1;
pub const PIN_MASS: f32 = 0.1;
/// Stands in for rolling resistance, which the solver does not model.
pub const PIN_LINEAR_DAMPING: f32 = 1.0;
pub const PIN_ANGULAR_DAMPING: f32 = 2.0;
/// Visual pin mesh scale and shift.
pub const PIN_MODEL_SCALE: f32 = 0.027;
pub const PIN_MODEL_OFFSET: Vec3 = Vec3::new(0.0, -0.1, 0.0);

pub const SLAB_POS: Vec3 = Vec3::new(0.0, 6.02, 0.0);
pub const SLAB_HALF_EXTENTS: Vec3 = Vec3::new(12.3, 0.1, 5.5);

/// Visual table model transform.
pub const TABLE_MODEL_POS: Vec3 = Vec3::new(0.0, 0.0, -0.15);
pub const TABLE_MODEL_SCALE: f32 = 25.0;

/// The three balls, in the order players own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallKind {
    White,
    Yellow,
    Red,
}

impl BallKind {
    pub const ALL: [BallKind; 3] = [BallKind::White, BallKind::Yellow, BallKind::Red];

    pub fn index(self) -> usize {
        match self {
            BallKind::White => 0,
            BallKind::Yellow => 1,
            BallKind::Red => 2,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            BallKind::White => "white",
            BallKind::Yellow => "yellow",
            BallKind::Red => "red",
        }
    }

    pub fn start(self) -> Vec3 {
        match self {
            BallKind::White => Vec3::new(-5.5, 6.62, -2.2),
            BallKind::Yellow => Vec3::new(-5.5, 6.62, 2.2),
            BallKind::Red => Vec3::new(5.5, 6.62, 0.0),
        }
    }

    pub fn color(self) -> Vec3 {
        match self {
            BallKind::White => Vec3::new(1.0, 1.0, 1.0),
            BallKind::Yellow => Vec3::new(1.0, 0.85, 0.0),
            BallKind::Red => Vec3::new(0.85, 0.0, 0.0),
        }
    }

    /// The ball a player shoots with (player 0 = white, player 1 = yellow).
    pub fn of_player(player: usize) -> BallKind {
        if player == 0 {
            BallKind::White
        } else {
            BallKind::Yellow
        }
    }

    pub fn body_desc(self) -> BodyDesc {
        let angular_damping = if self == BallKind::Red {
            BALL_ANGULAR_DAMPING
        } else {
            PLAYER_BALL_ANGULAR_DAMPING
        };
        BodyDesc::dynamic(ColliderDesc::Ball { radius: BALL_RADIUS })
            .with_position(self.start())
            .with_enabled_translations(BVec3::new(true, false, true))
            .with_linear_damping(BALL_LINEAR_DAMPING)
            .with_angular_damping(angular_damping)
            .with_ccd(true)
    }

    pub fn material(self) -> Material {
        Material::new(self.color()).with_cook_torrance(0.3, 2.0, 0.7)
    }
}

pub fn ball_collider_material() -> ColliderMaterial {
    ColliderMaterial::new(0.7, 0.4).with_mass(BALL_MASS)
}

/// Pin spots: four outer pins in a cross, the center pin last.
pub const PIN_SPOTS: [Vec3; 5] = [
    Vec3::new(0.7, 6.4, 0.0),
    Vec3::new(0.0, 6.4, 0.7),
    Vec3::new(-0.7, 6.4, 0.0),
    Vec3::new(0.0, 6.4, -0.7),
    Vec3::new(0.0, 6.4, 0.0),
];

pub const CENTER_PIN: usize = 4;

pub fn pin_body_desc(spot: Vec3) -> BodyDesc {
    BodyDesc::dynamic(ColliderDesc::Cylinder {
        half_height: PIN_HALF_HEIGHT,
        radius: PIN_RADIUS,
    })
    .with_position(spot)
    .with_collider_offset(Vec3::new(0.0, PIN_COLLIDER_LIFT, 0.0))
    .with_linear_damping(PIN_LINEAR_DAMPING)
    .with_angular_damping(PIN_ANGULAR_DAMPING)
}

pub fn pin_collider_material() -> ColliderMaterial {
    ColliderMaterial::new(0.4, 0.0).with_mass(PIN_MASS)
}

pub fn pin_material() -> Material {
    Material::new(Vec3::new(0.95, 0.95, 0.9)).with_cook_torrance(0.4, 2.0, 0.7)
}

pub fn slab_body_desc() -> BodyDesc {
    BodyDesc::fixed(ColliderDesc::Cuboid { half_extents: SLAB_HALF_EXTENTS }).with_position(SLAB_POS)
}

pub fn slab_collider_material() -> ColliderMaterial {
    ColliderMaterial::new(0.6, 0.0)
}

pub fn table_material() -> Material {
    Material::new(Vec3::ONE)
        .with_cook_torrance(0.6, 4.0, 1.0)
        .textured(10.0)
}

/// Cushions as (center, half extents): two long sides, then the two short ends.
pub const CUSHIONS: [(Vec3, Vec3); 4] = [
    (Vec3::new(0.0, 6.8, 5.5), Vec3::new(12.3, 1.0, 0.1)),
    (Vec3::new(0.0, 6.8, -5.5), Vec3::new(12.3, 1.0, 0.1)),
    (Vec3::new(-12.13, 6.8, 0.0), Vec3::new(0.1, 1.0, 5.5)),
    (Vec3::new(12.2, 6.8, 0.0), Vec3::new(0.1, 1.0, 5.5)),
];

pub fn cushion_body_desc(center: Vec3, half_extents: Vec3) -> BodyDesc {
    BodyDesc::fixed(ColliderDesc::Cuboid { half_extents }).with_position(center)
}

pub fn cushion_collider_material() -> ColliderMaterial {
    ColliderMaterial::new(0.5, 0.7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balls_rest_on_the_slab() {
        let surface = SLAB_POS.y + SLAB_HALF_EXTENTS.y;
        for kind in BallKind::ALL {
            assert!((kind.start().y - BALL_RADIUS - surface).abs() < 1e-4);
        }
    }

    #[test]
    fn balls_start_inside_cushions() {
        for kind in BallKind::ALL {
            let p = kind.start();
            assert!(p.x.abs() < 12.0 && p.z.abs() < 5.4, "{:?} at {:?}", kind, p);
        }
    }

    #[test]
    fn player_balls() {
        assert_eq!(BallKind::of_player(0), BallKind::White);
        assert_eq!(BallKind::of_player(1), BallKind::Yellow);
        assert!(!BallKind::Red.body_desc().enabled_translations.y);
        assert!(
            BallKind::White.body_desc().angular_damping > BallKind::Red.body_desc().angular_damping
        );
    }

    #[test]
    fn pins_form_a_cross_around_the_center() {
        assert_eq!(PIN_SPOTS[CENTER_PIN], Vec3::new(0.0, 6.4, 0.0));
        for spot in &PIN_SPOTS[..CENTER_PIN] {
            let d = *spot - PIN_SPOTS[CENTER_PIN];
            assert!((d.length() - 0.7).abs() < 1e-6);
        }
    }

    #[test]
    fn materials() {
        assert!(table_material().textured);
        assert_eq!(ball_collider_material().mass, Some(1.0));
        assert_eq!(pin_collider_material().mass, Some(0.1));
        assert_eq!(cushion_collider_material().restitution, 0.7);
    }
}
