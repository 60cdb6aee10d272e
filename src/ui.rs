#![allow(
    // Allow the screen shake offset to be applied through signed casts, it is a handful of cells
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use crate::app::App;
use crate::components::{GameState, ScreenShake, Surface};
use crate::game::INFO_PANEL_WIDTH;
use crate::sound::AudioState;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

// Smallest surface, in cells, that still makes sense to play on
const MIN_SURFACE_WIDTH: u16 = 16;
const MIN_SURFACE_HEIGHT: u16 = 8;

const DIALOG_WIDTH: u16 = 30;
const DIALOG_HEIGHT: u16 = 7;

/// Splits the terminal into the play surface (with its border) and the info panel.
#[must_use]
pub fn split_layout(area: Rect) -> (Rect, Rect) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(INFO_PANEL_WIDTH)])
        .split(area);
    (layout[0], layout[1])
}

/// The cells boxes are drawn into, i.e. the play surface inside its border.
#[must_use]
pub fn surface_area(area: Rect) -> Rect {
    let (playfield, _) = split_layout(area);
    Block::default().borders(Borders::ALL).inner(playfield)
}

/// Where the game-over dialog is drawn.
#[must_use]
pub fn dialog_area(area: Rect) -> Rect {
    let width = DIALOG_WIDTH.min(area.width);
    let height = DIALOG_HEIGHT.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[must_use]
pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let inner = surface_area(area);

    if inner.width < MIN_SURFACE_WIDTH || inner.height < MIN_SURFACE_HEIGHT {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Falling Boxes"));
        f.render_widget(warning_text, area);
        return;
    }

    let (shake_x, shake_y) = app.world.resource::<ScreenShake>().current_offset;
    let (playfield, info) = split_layout(area);

    let shaken = Rect {
        x: (i32::from(playfield.x) + i32::from(shake_x)).max(0) as u16,
        y: (i32::from(playfield.y) + i32::from(shake_y)).max(0) as u16,
        ..playfield
    }
    .intersection(area);

    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(" FALLING BOXES ")
            .title_alignment(Alignment::Center),
        shaken,
    );
    render_boxes(f, app, Block::default().borders(Borders::ALL).inner(shaken));

    render_info(f, app, info);

    if app.is_game_over_pending() {
        render_game_over_dialog(f, area);
    }
}

// Fills every cell whose center lies inside a box
fn render_boxes(f: &mut Frame, app: &mut App, area: Rect) {
    let surface: Surface = app.surface();
    let boxes = app.get_render_boxes();

    for (frame, color) in boxes {
        let (min_x, min_y, max_x, max_y) = frame.aabb();
        let color = color.get_color();

        for row in surface.rows_between(min_y, max_y) {
            for column in surface.columns_between(min_x, max_x) {
                let (x, y) = surface.cell_center(column, row);
                if !frame.contains(x, y) {
                    continue;
                }

                let cell_x = area.x + column;
                let cell_y = area.y + row;
                if cell_x >= area.right() || cell_y >= area.bottom() {
                    continue;
                }

                if let Some(cell) = f.buffer_mut().cell_mut((cell_x, cell_y)) {
                    cell.set_symbol("█");
                    cell.set_fg(color);
                }
            }
        }
    }
}

fn render_info(f: &mut Frame, app: &mut App, area: Rect) {
    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(6), // Stats
            Constraint::Min(5),    // Controls
        ])
        .split(area);

    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let box_count = app.box_count();
    let game_state = app.world.resource::<GameState>();
    let audio_state = app.world.resource::<AudioState>();

    let sound = if audio_state.is_sound_enabled() {
        format!("{:.0}%", audio_state.get_volume() * 100.0)
    } else {
        "off".to_string()
    };

    let stats = format!(
        "Boxes: {box_count}\nBest: {}\nLosses: {}\nSound: {sound}",
        game_state.best_count.max(box_count),
        game_state.losses,
    );

    let stats_style = if game_state.is_game_over_pending() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    f.render_widget(
        Paragraph::new(stats)
            .style(stats_style)
            .wrap(Wrap { trim: true }),
        info_layout[1],
    );

    let controls = Paragraph::new(
        "Controls:\n\
        Click: Drop a box\n\
        Enter: Dismiss\n\
        M: Sound on/off\n\
        +/-: Volume\n\
        Q: Quit\n\
        ",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[2]);
}

fn render_game_over_dialog(f: &mut Frame, area: Rect) {
    let dialog = dialog_area(area);

    let text = Text::from(vec![
        Line::from(""),
        Line::from("You lose!"),
        Line::from(""),
        Line::from(Span::styled(
            "[ Ok ]",
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )),
    ]);

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red)),
    );

    f.render_widget(Clear, dialog);
    f.render_widget(paragraph, dialog);
}
