/// Per-frame draw requests: grid, marks, winning line, particles, UI text, game-over overlay
use super::board::{Cell, Player, GRID_SIZE};
use super::config::Config;
use super::controller::{GameController, Phase};
use super::input::InputMapper;
use super::rules::GameOutcome;
use crate::core::renderer::{Color, Point, Rect, Renderer};

const MARK_WIDTH: f32 = 8.0;
const WIN_LINE_WIDTH: f32 = 10.0;
const GLITCH_SHIFT: f32 = 4.0;

/// Draw one complete frame
pub fn render_frame(r: &mut dyn Renderer, game: &GameController, input: &InputMapper, config: &Config) {
    let shake = game.effects().shake_offset();

    r.clear(config.theme.background);
    render_grid(r, game, input, config, shake);
    render_marks(r, game, config, shake);
    render_winning_line(r, game, config, shake);
    render_particles(r, game);
    render_ui(r, game, input, config);
    if let Phase::GameOver(outcome) = game.phase() {
        render_game_over(r, &outcome, input, config);
    }
    r.present();
}

fn render_grid(
    r: &mut dyn Renderer,
    game: &GameController,
    input: &InputMapper,
    config: &Config,
    (dx, dy): (f32, f32),
) {
    let g = &config.geometry;
    let theme = &config.theme;

    if let Some((row, col)) = input.hover() {
        if game.board().at(row, col) == Cell::Empty && !game.is_over() {
            r.rect(g.cell_rect(row, col).offset(dx, dy), 0.0, theme.hover);
        }
    }

    let grid = g.grid_rect().offset(dx, dy);
    for i in 0..=GRID_SIZE {
        let step = i as f32 * g.cell_size;
        r.line(
            Point::new(grid.x + step, grid.y),
            Point::new(grid.x + step, grid.y + grid.h),
            g.line_width,
            theme.grid,
        );
        r.line(
            Point::new(grid.x, grid.y + step),
            Point::new(grid.x + grid.w, grid.y + step),
            g.line_width,
            theme.grid,
        );
    }
}

fn render_marks(r: &mut dyn Renderer, game: &GameController, config: &Config, (dx, dy): (f32, f32)) {
    let fx = game.effects();
    let theme = &config.theme;

    for (row, col, cell) in game.board().cells() {
        let Cell::Mark(player) = cell else { continue };
        let scale = fx.mark_scale(row, col);
        if scale <= 0.0 {
            continue;
        }
        let center = config.geometry.cell_center(row, col).offset(dx, dy);
        let size = config.geometry.mark_size * scale;
        let color = theme.mark_color(player);

        for layer in (1..=theme.glow_layers).rev() {
            let glow = color.with_alpha(70 / layer);
            draw_mark(r, player, center, size, MARK_WIDTH + layer as f32 * 6.0, glow);
        }
        if fx.is_glitching() {
            let shift = if fx.glitch() as u32 % 2 == 0 { GLITCH_SHIFT } else { -GLITCH_SHIFT };
            draw_mark(r, player, center.offset(shift, 0.0), size, MARK_WIDTH, theme.glitch.with_alpha(140));
        }
        draw_mark(r, player, center, size, MARK_WIDTH, color);
    }
}

fn draw_mark(r: &mut dyn Renderer, player: Player, center: Point, size: f32, width: f32, color: Color) {
    match player {
        Player::X => {
            r.line(center.offset(-size, -size), center.offset(size, size), width, color);
            r.line(center.offset(size, -size), center.offset(-size, size), width, color);
        }
        Player::O => r.circle(center, size, width, color),
    }
}

fn render_winning_line(r: &mut dyn Renderer, game: &GameController, config: &Config, (dx, dy): (f32, f32)) {
    let Some(sweep) = game.effects().sweep() else { return };
    let (start, end) = config.geometry.line_endpoints(&sweep.line);
    let start = start.offset(dx, dy);
    let end = start.lerp(end.offset(dx, dy), sweep.progress);

    for layer in (1..=config.theme.glow_layers).rev() {
        let glow = config.theme.win_line.with_alpha(80 / layer);
        r.line(start, end, WIN_LINE_WIDTH + layer as f32 * 8.0, glow);
    }
    r.line(start, end, WIN_LINE_WIDTH, config.theme.win_line);
}

fn render_particles(r: &mut dyn Renderer, game: &GameController) {
    for p in game.effects().particles() {
        let alpha = (255.0 * p.fade()) as u8;
        if alpha > 0 {
            r.circle(p.position, p.radius, 0.0, p.color.with_alpha(alpha));
        }
    }
}

fn render_ui(r: &mut dyn Renderer, game: &GameController, input: &InputMapper, config: &Config) {
    let g = &config.geometry;
    let theme = &config.theme;
    let mid = g.width / 2.0;

    r.text(&theme.title, Point::new(mid, 40.0), 48.0, theme.text);

    if let Some(player) = game.current_player() {
        r.text(
            &format!("Current Player: {}", player.symbol()),
            Point::new(mid, 90.0),
            36.0,
            theme.mark_color(player),
        );
    }

    let scores = game.scoreboard();
    let score_y = g.height - 45.0;
    r.text(&format!("X: {}", scores.wins_x), Point::new(g.width * 0.2, score_y), 36.0, theme.x_color);
    r.text(&format!("O: {}", scores.wins_o), Point::new(mid, score_y), 36.0, theme.o_color);
    r.text(&format!("Draws: {}", scores.draws), Point::new(g.width * 0.8, score_y), 36.0, theme.text);

    let help = input.keys().describe().join("  ");
    if !help.is_empty() {
        r.text(&help, Point::new(mid, g.height - 12.0), 18.0, theme.grid);
    }
}

fn render_game_over(r: &mut dyn Renderer, outcome: &GameOutcome, input: &InputMapper, config: &Config) {
    let g = &config.geometry;
    let theme = &config.theme;

    r.rect(Rect::new(0.0, 0.0, g.width, g.height), 0.0, theme.background.with_alpha(200));

    let (message, color) = match outcome {
        GameOutcome::Win(player, _) => (format!("Player {} Wins!", player.symbol()), theme.mark_color(*player)),
        _ => ("It's a Draw!".to_string(), theme.text),
    };
    r.text(&message, Point::new(g.width / 2.0, g.height / 2.0 - 50.0), 40.0, color);

    let button = g.restart_button();
    let hovered = input.pointer().is_some_and(|p| button.contains(p));
    let fill = if hovered { theme.button_hover } else { theme.button };
    r.rect(button, 10.0, fill);
    r.text("Play Again", button.center(), 30.0, theme.text);
}
