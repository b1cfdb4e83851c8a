//! Write-back seam to the external rendering collaborator
//!
//! The simulation does not own presentation. Once per frame it hands every
//! visual object's derived transform to a `SceneSink`; what the sink does
//! with them (Three.js bridge, DOM, nothing) is not this crate's concern.
//! Collision never reads these transforms - they are derived output only.

use glam::Vec3;

use crate::sim::{CameraPose, Session};

/// Addresses a visual object in the external scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneObject {
    Player,
    /// Index into the level's platform table
    Platform(usize),
    /// Index into the level's obstacle table
    Obstacle(usize),
    /// Pickup id
    Pickup(u32),
}

/// One-way transform sink implemented by the shell
pub trait SceneSink {
    fn set_transform(&mut self, object: SceneObject, position: Vec3, yaw: f32);
    fn set_visible(&mut self, object: SceneObject, visible: bool);
    fn set_camera(&mut self, pose: CameraPose);
}

/// Discards everything. Used by tests and the headless native shell.
#[derive(Debug, Default)]
pub struct NullSink;

impl SceneSink for NullSink {
    fn set_transform(&mut self, _object: SceneObject, _position: Vec3, _yaw: f32) {}
    fn set_visible(&mut self, _object: SceneObject, _visible: bool) {}
    fn set_camera(&mut self, _pose: CameraPose) {}
}

/// Vertical bob amplitude for uncollected pickups
const PICKUP_BOB: f32 = 0.2;

/// Push the frame's derived transforms out to the sink: animated platform
/// offsets and yaw, blink visibility, obstacle spin and oscillation, pickup
/// bob, the player, and the smoothed camera pose.
pub fn sync(session: &Session, pose: CameraPose, sink: &mut impl SceneSink) {
    let t = session.anim_time;

    sink.set_transform(SceneObject::Player, session.player.position, 0.0);

    for (i, platform) in session.layout.platforms.iter().enumerate() {
        let object = SceneObject::Platform(i);
        sink.set_transform(
            object,
            platform.position + platform.visual_offset(t),
            platform.visual_yaw(t),
        );
        sink.set_visible(object, platform.visible_at(t));
    }

    for (i, obstacle) in session.layout.obstacles.iter().enumerate() {
        sink.set_transform(
            SceneObject::Obstacle(i),
            obstacle.animated_position(t),
            obstacle.visual_yaw(t),
        );
    }

    for pickup in &session.pickups {
        let object = SceneObject::Pickup(pickup.id);
        let bob = Vec3::new(0.0, (t * 2.0).sin() * PICKUP_BOB, 0.0);
        sink.set_transform(object, pickup.position + bob, t);
        sink.set_visible(object, !pickup.collected);
    }

    sink.set_camera(pose);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Level, OrbitCamera, Session};

    #[derive(Default)]
    struct RecordingSink {
        transforms: Vec<(SceneObject, Vec3, f32)>,
        visibility: Vec<(SceneObject, bool)>,
        camera: Option<CameraPose>,
    }

    impl SceneSink for RecordingSink {
        fn set_transform(&mut self, object: SceneObject, position: Vec3, yaw: f32) {
            self.transforms.push((object, position, yaw));
        }
        fn set_visible(&mut self, object: SceneObject, visible: bool) {
            self.visibility.push((object, visible));
        }
        fn set_camera(&mut self, pose: CameraPose) {
            self.camera = Some(pose);
        }
    }

    #[test]
    fn test_sync_covers_every_object() {
        let mut session = Session::new();
        session.start(Level::Hard);
        let mut camera = OrbitCamera::new();
        let pose = camera.update(session.player.position);

        let mut sink = RecordingSink::default();
        sync(&session, pose, &mut sink);

        let expected = 1 + session.layout.platforms.len()
            + session.layout.obstacles.len()
            + session.pickups.len();
        assert_eq!(sink.transforms.len(), expected);
        assert_eq!(sink.camera, Some(pose));
    }

    #[test]
    fn test_moving_platform_transform_animates() {
        let mut session = Session::new();
        session.start(Level::Medium);
        session.anim_time = 0.8;
        let moving_index = session
            .layout
            .platforms
            .iter()
            .position(|p| p.motion.is_some())
            .unwrap();

        let mut camera = OrbitCamera::new();
        let pose = camera.update(session.player.position);
        let mut sink = RecordingSink::default();
        sync(&session, pose, &mut sink);

        let (_, animated, _) = sink
            .transforms
            .iter()
            .find(|(o, _, _)| *o == SceneObject::Platform(moving_index))
            .unwrap();
        let logical = session.layout.platforms[moving_index].position;
        assert!((*animated - logical).length() > 0.0);
    }

    #[test]
    fn test_collected_pickup_hidden() {
        let mut session = Session::new();
        session.start(Level::Easy);
        session.pickups[0].collected = true;

        let mut camera = OrbitCamera::new();
        let pose = camera.update(session.player.position);
        let mut sink = RecordingSink::default();
        sync(&session, pose, &mut sink);

        let id = session.pickups[0].id;
        let (_, visible) = sink
            .visibility
            .iter()
            .find(|(o, _)| *o == SceneObject::Pickup(id))
            .unwrap();
        assert!(!*visible);
    }
}
