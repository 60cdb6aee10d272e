#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::Position;
    use crate::game::INFO_PANEL_WIDTH;
    use crate::physics::BodyHandle;
    use crate::tests::test_utils::create_test_app;
    use crate::ui::{self, dialog_area, rect_contains, split_layout, surface_area};
    use ratatui::{backend::TestBackend, layout::Rect, prelude::*};

    // Helper function to create a test terminal
    fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_split_layout() {
        let area = Rect::new(0, 0, 84, 32);
        let (playfield, info) = split_layout(area);

        assert_eq!(info.width, INFO_PANEL_WIDTH);
        assert_eq!(playfield.width, 84 - INFO_PANEL_WIDTH);
        assert_eq!(info.x, playfield.right());
    }

    #[test]
    fn test_surface_area_is_inside_border() {
        let inner = surface_area(Rect::new(0, 0, 84, 32));

        assert_eq!(inner, Rect::new(1, 1, 58, 30));
    }

    #[test]
    fn test_dialog_area_is_centered() {
        let dialog = dialog_area(Rect::new(0, 0, 80, 24));
        assert_eq!(dialog, Rect::new(25, 8, 30, 7));

        // Never larger than the screen
        let tiny = dialog_area(Rect::new(0, 0, 20, 5));
        assert_eq!(tiny, Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10, 5, 4, 2);

        assert!(rect_contains(rect, 10, 5));
        assert!(rect_contains(rect, 13, 6));
        assert!(!rect_contains(rect, 14, 5));
        assert!(!rect_contains(rect, 10, 7));
        assert!(!rect_contains(rect, 9, 5));
    }

    #[test]
    fn test_render_with_small_terminal() {
        let mut terminal = create_test_terminal(30, 10);
        let (mut app, _engine) = create_test_app();

        // This should show the warning screen and not crash
        terminal.draw(|f| ui::render(f, &mut app)).unwrap();

        assert!(buffer_text(&terminal).contains("Terminal too small!"));
    }

    #[test]
    fn test_render_draws_box_in_its_color() {
        let mut terminal = create_test_terminal(84, 32);
        let (mut app, _engine) = create_test_app();
        let game_box = app
            .tap(Position { x: 100.0, y: 50.0 })
            .expect("tap should spawn a box");

        terminal.draw(|f| ui::render(f, &mut app)).unwrap();

        // Column 12 is centered on x = 100 and row 4 on y = 72, inside every box size
        let inner = surface_area(Rect::new(0, 0, 84, 32));
        let cell = &terminal.backend().buffer()[(inner.x + 12, inner.y + 4)];
        assert_eq!(cell.symbol(), "█");
        assert_eq!(cell.fg, game_box.color.get_color());

        // Nothing drawn far away from it
        let empty = &terminal.backend().buffer()[(inner.x + 50, inner.y + 25)];
        assert_eq!(empty.symbol(), " ");
    }

    #[test]
    fn test_info_panel_shows_stats() {
        let mut terminal = create_test_terminal(84, 32);
        let (mut app, _engine) = create_test_app();
        app.tap(Position { x: 100.0, y: 50.0 });
        app.tap(Position { x: 300.0, y: 50.0 });

        terminal.draw(|f| ui::render(f, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Boxes: 2"));
        assert!(text.contains("Losses: 0"));
        assert!(text.contains("Sound: off"));
        assert!(!text.contains("You lose!"));
    }

    #[test]
    fn test_game_over_dialog_rendering() {
        let mut terminal = create_test_terminal(84, 32);
        let (mut app, engine) = create_test_app();
        app.tap(Position { x: 100.0, y: 50.0 });
        app.tap(Position { x: 300.0, y: 50.0 });
        engine.push_contact_ended(BodyHandle(2));
        app.on_tick(0.016);

        terminal.draw(|f| ui::render(f, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Game Over"));
        assert!(text.contains("You lose!"));
        assert!(text.contains("[ Ok ]"));
        assert!(text.contains("Losses: 1"));

        // Dismissing clears the dialog
        app.acknowledge();
        terminal.draw(|f| ui::render(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(!text.contains("You lose!"));
        assert!(text.contains("Boxes: 0"));
    }
}
