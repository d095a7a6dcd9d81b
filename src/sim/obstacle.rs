//! The closed set of course obstacles
//!
//! Only two obstacle shapes exist, so the shared capability is a tagged
//! enum with static dispatch rather than a trait object.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::ball::Ball;
use crate::sim::polygon::{Contact, PolygonObstacle};
use crate::sim::target::Target;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    /// Reflecting polygon wall.
    Polygon(PolygonObstacle),
    /// Absorbing goal disc.
    Goal(Target),
}

impl Obstacle {
    /// Collision query. `Some` carries the contact that
    /// [`Obstacle::collision_effect`] consumes.
    pub fn collision(&self, ball: &Ball) -> Option<Contact> {
        match self {
            Obstacle::Polygon(polygon) => polygon.collision(ball),
            Obstacle::Goal(target) => target.collision(ball).then(Contact::absorbing),
        }
    }

    /// New ball velocity for a contact produced by [`Obstacle::collision`].
    pub fn collision_effect(&self, ball: &Ball, contact: &Contact) -> DVec2 {
        match self {
            Obstacle::Polygon(polygon) => polygon.collision_effect(ball, contact),
            Obstacle::Goal(target) => target.collision_effect(ball),
        }
    }

    /// Containment test, used for start-point validation.
    pub fn inside(&self, point: DVec2) -> bool {
        match self {
            Obstacle::Polygon(polygon) => polygon.inside(point),
            Obstacle::Goal(target) => target.inside(point),
        }
    }
}
