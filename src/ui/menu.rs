use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::Launcher;
use crate::games::GameId;
use crate::theme::Palette;

const BANNER: &str = r#"
  ▄▀█ █▀█ █▀▀ ▄▀█ █▀▄ █▀▀
  █▀█ █▀▄ █▄▄ █▀█ █▄▀ ██▄"#;

struct Tile {
    icon: &'static str,
    desc: &'static str,
    controls: &'static [(&'static str, &'static str)],
}

/// Entries per game on the high-score overlay.
const SHOWN_RANKS: usize = 5;

fn tile(id: GameId) -> Tile {
    match id {
        GameId::Snake => Tile {
            icon: "🐍",
            desc: "Eat, grow,\ndon't bite!",
            controls: &[("↑ ↓ ← → / WASD", "Steer"), ("P", "Pause"), ("R", "Restart")],
        },
        GameId::Pong => Tile {
            icon: "🏓",
            desc: "Beat the AI\nto the target",
            controls: &[("↑ ↓ / W S", "Move paddle"), ("P", "Pause"), ("R", "Restart")],
        },
        GameId::Breakout => Tile {
            icon: "🧱",
            desc: "Smash bricks\nwith the ball!",
            controls: &[("← → / A D", "Move paddle"), ("Space", "Launch ball"), ("P", "Pause"), ("R", "Restart")],
        },
        GameId::FlappyBird => Tile {
            icon: "🐦",
            desc: "Thread the\npipe gaps",
            controls: &[("Space / ↑", "Flap"), ("P", "Pause"), ("R", "Restart")],
        },
        GameId::SpaceShooter => Tile {
            icon: "🚀",
            desc: "Survive the\nenemy waves",
            controls: &[("← → / A D", "Move ship"), ("Space", "Fire"), ("P", "Pause"), ("R", "Restart")],
        },
    }
}

fn render_tile(frame: &mut Frame, area: Rect, id: GameId, selected: bool, palette: &Palette) {
    let t = tile(id);
    let (border_color, border_type) = if selected {
        (palette.projectile.color(), BorderType::Double)
    } else {
        (palette.muted(), BorderType::Rounded)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let name_color = if selected { palette.text.color() } else { palette.accent1.color() };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("[{}] ", id.index() + 1),
            Style::default().fg(palette.projectile.color()).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{} ", t.icon)),
        Span::styled(id.title(), Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];
    for line in t.desc.split('\n') {
        lines.push(Line::from(Span::styled(line, Style::default().fg(palette.muted()))));
    }
    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            Style::default().fg(palette.projectile.color()).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn key_lines(keys: &[(&str, &str)], palette: &Palette) -> Vec<Line<'static>> {
    keys.iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("    {key:<18}"), Style::default().fg(palette.accent1.color())),
                Span::styled(action.to_string(), Style::default().fg(palette.muted())),
            ])
        })
        .collect()
}

pub fn render_menu(frame: &mut Frame, area: Rect, launcher: &Launcher) {
    let palette = launcher.palette();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Banner
            Constraint::Length(7), // Tiles
            Constraint::Min(6),    // Controls
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(palette.accent2.color()).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(GameId::ALL.map(|_| Constraint::Ratio(1, GameId::ALL.len() as u32)))
        .split(chunks[1]);
    for (id, col) in GameId::ALL.iter().zip(cols.iter()) {
        render_tile(frame, *col, *id, *id == launcher.selected(), palette);
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);

    let heading = Style::default().fg(palette.projectile.color()).add_modifier(Modifier::BOLD);
    let mut nav = vec![Line::from(""), Line::from(Span::styled("  🔧 Menu", heading))];
    nav.extend(key_lines(
        &[
            ("← → / 1-5", "Select game"),
            ("Enter", "Play selected"),
            ("T", "Next theme"),
            ("H", "High scores"),
            ("Q", "Quit"),
        ],
        palette,
    ));
    nav.push(Line::from(""));
    nav.push(Line::from(Span::styled("  🎮 In game", heading)));
    nav.extend(key_lines(&[("P", "Pause / resume"), ("Esc", "Back to menu")], palette));
    let nav_panel = Paragraph::new(nav).block(panel(" ⌨ Controls ".into(), palette));
    frame.render_widget(nav_panel, ctrl_cols[0]);

    let selected = launcher.selected();
    let t = tile(selected);
    let mut game_lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {} {}", t.icon, selected.title()), heading)),
    ];
    let best = launcher.leaderboard().high_score(selected);
    game_lines.push(Line::from(Span::styled(
        format!("  Best: {best}"),
        Style::default().fg(palette.text.color()),
    )));
    game_lines.push(Line::from(""));
    game_lines.extend(key_lines(t.controls, palette));
    let game_panel = Paragraph::new(game_lines).block(panel(format!(" 🎮 {} ", selected.title()), palette));
    frame.render_widget(game_panel, ctrl_cols[1]);

    let mut footer = vec![Span::styled("  🎨 ", Style::default().fg(palette.muted()))];
    for (i, name) in launcher.themes().names().enumerate() {
        if i > 0 {
            footer.push(Span::raw(" "));
        }
        let swatch = launcher.themes().get(name).accent1;
        footer.push(Span::styled("■", Style::default().fg(swatch.color())));
        if name == palette.name {
            footer.push(Span::styled(
                format!("[{name}]"),
                Style::default().fg(palette.accent1.lighten(40).color()).add_modifier(Modifier::BOLD),
            ));
        } else {
            footer.push(Span::styled(name.to_string(), Style::default().fg(palette.muted())));
        }
    }
    footer.extend([
        Span::styled("  │  ", Style::default().fg(palette.muted())),
        Span::styled("H", Style::default().fg(palette.projectile.color()).add_modifier(Modifier::BOLD)),
        Span::styled(" High Scores", Style::default().fg(palette.muted())),
    ]);
    if let Some(notice) = launcher.notice() {
        footer.push(Span::styled("  │  ", Style::default().fg(palette.muted())));
        footer.push(Span::styled(notice.to_string(), Style::default().fg(palette.opponent.color())));
    }
    frame.render_widget(Paragraph::new(Line::from(footer)).alignment(Alignment::Center), chunks[3]);

    if launcher.show_leaderboard() {
        render_leaderboard(frame, area, launcher);
    }
}

fn panel(title: String, palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.accent1.color()))
        .title(title)
        .title_style(Style::default().fg(palette.accent2.color()).add_modifier(Modifier::BOLD))
}

fn render_leaderboard(frame: &mut Frame, area: Rect, launcher: &Launcher) {
    let palette = launcher.palette();
    let rect = super::centered(area, 72, 24);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(palette.projectile.color()))
        .title(" 🏆 High Scores ")
        .title_style(Style::default().fg(palette.projectile.color()).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(palette.background.color()));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let half = GameId::ALL.len().div_ceil(2);
    let (left, right) = GameId::ALL.split_at(half);
    frame.render_widget(Paragraph::new(board_lines(left, launcher, palette)), cols[0]);
    frame.render_widget(Paragraph::new(board_lines(right, launcher, palette)), cols[1]);

    let close = Line::from(vec![
        Span::styled("  Press ", Style::default().fg(palette.muted())),
        Span::styled("H", Style::default().fg(palette.projectile.color()).add_modifier(Modifier::BOLD)),
        Span::styled(" to close", Style::default().fg(palette.muted())),
    ]);
    frame.render_widget(Paragraph::new(close), rows[1]);
}

fn board_lines(ids: &[GameId], launcher: &Launcher, palette: &Palette) -> Vec<Line<'static>> {
    let medals = ["🥇", "🥈", "🥉"];
    let mut lines = Vec::new();
    for &id in ids {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", tile(id).icon)),
            Span::styled(id.title(), Style::default().fg(palette.accent1.color()).add_modifier(Modifier::BOLD)),
        ]));
        let top = launcher.leaderboard().top(id);
        if top.is_empty() {
            lines.push(Line::from(Span::styled("    No scores yet", Style::default().fg(palette.muted()))));
        }
        for (rank, entry) in top.iter().take(SHOWN_RANKS).enumerate() {
            let marker = match medals.get(rank) {
                Some(m) => format!("{m} "),
                None => format!("{:>2}.", rank + 1),
            };
            lines.push(Line::from(vec![
                Span::raw(format!("    {marker} ")),
                Span::styled(format!("{:<9} ", entry.label), Style::default().fg(palette.text.color())),
                Span::styled(
                    entry.score.to_string(),
                    Style::default().fg(palette.projectile.color()).add_modifier(Modifier::BOLD),
                ),
            ]));
        }
    }
    lines
}
