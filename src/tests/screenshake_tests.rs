#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::ScreenShake;
    use crate::screenshake::{trigger_screen_shake, update_screen_shake};
    use crate::tests::test_utils::create_test_world;

    #[test]
    fn test_default_screenshake() {
        let screenshake = ScreenShake::default();

        assert_eq!(screenshake.duration, 0.0);
        assert_eq!(screenshake.intensity, 0.0);
        assert_eq!(screenshake.current_offset, (0, 0));
        assert!(!screenshake.is_active);
    }

    #[test]
    fn test_trigger_screenshake() {
        let (mut world, _engine) = create_test_world();

        trigger_screen_shake(&mut world, 3.0, 0.75);

        let screenshake = world.resource::<ScreenShake>();
        assert_eq!(screenshake.duration, 0.75);
        assert_eq!(screenshake.intensity, 3.0);
        assert!(screenshake.is_active);
    }

    #[test]
    fn test_trigger_without_resource_is_noop() {
        let mut world = bevy_ecs::world::World::new();

        trigger_screen_shake(&mut world, 3.0, 0.75);

        assert!(!world.contains_resource::<ScreenShake>());
    }

    #[test]
    fn test_update_screenshake() {
        let (mut world, _engine) = create_test_world();
        world.insert_resource(ScreenShake {
            intensity: 5.0,
            duration: 1.0,
            current_offset: (0, 0),
            is_active: true,
        });

        update_screen_shake(&mut world, 0.1);

        let updated_shake = world.resource::<ScreenShake>();
        assert!((updated_shake.duration - 0.9).abs() < 1e-6);
        assert!(updated_shake.is_active);
        // Offsets stay within the intensity envelope
        assert!(updated_shake.current_offset.0.abs() <= 10);
        assert!(updated_shake.current_offset.1.abs() <= 5);
    }

    #[test]
    fn test_screenshake_expiration() {
        let (mut world, _engine) = create_test_world();
        world.insert_resource(ScreenShake {
            intensity: 5.0,
            duration: 0.05,
            current_offset: (3, 3),
            is_active: true,
        });

        update_screen_shake(&mut world, 0.1);

        let updated_shake = world.resource::<ScreenShake>();
        assert_eq!(updated_shake.duration, 0.0);
        assert_eq!(updated_shake.current_offset, (0, 0));
        assert!(!updated_shake.is_active);
        assert_eq!(updated_shake.intensity, 0.0);
    }
}
