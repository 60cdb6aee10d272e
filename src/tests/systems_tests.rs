#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::{Body, GameBox, GamePhase, GameState, Position, ScreenShake};
    use crate::outcome::ContactOutcome;
    use crate::physics::BodyHandle;
    use crate::spawn::spawn_box;
    use crate::systems::{effects_system, physics_system, sync_body_frames};
    use crate::tests::test_utils::create_test_world;

    #[test]
    fn test_physics_system_steps_engine() {
        let (mut world, engine) = create_test_world();

        let outcomes = physics_system(&mut world, 0.016);

        assert!(outcomes.is_empty());
        assert_eq!(engine.state().steps, 1);
    }

    #[test]
    fn test_physics_system_dispatches_contacts_in_order() {
        let (mut world, engine) = create_test_world();
        let first = spawn_box(&mut world, Position { x: 100.0, y: 50.0 });
        spawn_box(&mut world, Position { x: 150.0, y: 50.0 });
        spawn_box(&mut world, Position { x: 200.0, y: 50.0 });
        assert_eq!(first.id, 1);

        // Handles are handed out in spawn order by the scripted engine
        engine.push_contact_ended(BodyHandle(1));
        engine.push_contact_ended(BodyHandle(3));
        engine.push_contact_ended(BodyHandle(2));

        let outcomes = physics_system(&mut world, 0.016);

        assert_eq!(
            outcomes,
            vec![
                ContactOutcome::FirstBox,
                ContactOutcome::GameOver { culprit: 3 },
                ContactOutcome::Debounced,
            ]
        );
        assert_eq!(
            world.resource::<GameState>().phase,
            GamePhase::GameOverPending { culprit: 3 }
        );
    }

    #[test]
    fn test_physics_keeps_stepping_while_pending() {
        let (mut world, engine) = create_test_world();
        spawn_box(&mut world, Position { x: 100.0, y: 50.0 });
        spawn_box(&mut world, Position { x: 150.0, y: 50.0 });
        engine.push_contact_ended(BodyHandle(2));
        physics_system(&mut world, 0.016);

        physics_system(&mut world, 0.016);
        physics_system(&mut world, 0.016);

        assert_eq!(engine.state().steps, 3);
        assert_eq!(world.resource::<GameState>().losses, 1);
    }

    #[test]
    fn test_sync_body_frames_copies_engine_pose() {
        let (mut world, engine) = create_test_world();
        spawn_box(&mut world, Position { x: 100.0, y: 50.0 });

        {
            let mut state = engine.state();
            let frame = state.bodies.get_mut(&BodyHandle(1)).expect("body exists");
            frame.center = (123.0, 321.0);
            frame.angle = 0.5;
        }

        sync_body_frames(&mut world);

        let (_, body) = world
            .query::<(&GameBox, &Body)>()
            .single(&world);
        assert_eq!(body.frame.center, (123.0, 321.0));
        assert_eq!(body.frame.angle, 0.5);
    }

    #[test]
    fn test_effects_system_winds_down_shake() {
        let (mut world, _engine) = create_test_world();
        spawn_box(&mut world, Position { x: 100.0, y: 50.0 });
        spawn_box(&mut world, Position { x: 150.0, y: 50.0 });
        crate::outcome::on_boundary_contact(&mut world, BodyHandle(2));
        assert!(world.resource::<ScreenShake>().is_active);

        for _ in 0..60 {
            effects_system(&mut world, 0.016);
        }

        let shake = world.resource::<ScreenShake>();
        assert!(!shake.is_active);
        assert_eq!(shake.current_offset, (0, 0));
    }
}
