pub mod canvas;
pub mod header;
pub mod menu;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{Launcher, NameEntry, Outcome, Phase};
use crate::games::Game;
use crate::scores::MAX_LABEL_LEN;
use crate::theme::Palette;

/// Regions of a game's bordered panel.
pub struct GameLayout {
    pub status: Rect,
    pub field: Rect,
    pub help: Rect,
}

pub fn render(frame: &mut Frame, launcher: &Launcher) {
    let palette = launcher.palette();
    let full = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background.color())),
        full,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
        ])
        .split(full);

    header::render_header(frame, launcher, chunks[0]);

    match launcher.phase() {
        Phase::Menu => menu::render_menu(frame, chunks[1], launcher),
        Phase::Running(game) => game.render(frame, chunks[1], palette),
        Phase::Paused(game) => {
            game.render(frame, chunks[1], palette);
            render_paused(frame, chunks[1], palette);
        }
        Phase::GameOver(game, outcome) => {
            game.render(frame, chunks[1], palette);
            match outcome {
                Outcome::EnterName(entry) => render_name_entry(frame, full, game.as_ref(), entry, palette),
                _ => render_game_over(frame, chunks[1], launcher, game.as_ref(), outcome),
            }
        }
    }
}

/// Draw the bordered panel every game shares and split it into status, field, and help rows.
pub fn game_layout(frame: &mut Frame, area: Rect, title: &str, palette: &Palette) -> GameLayout {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.accent1.color()))
        .title(title.to_string())
        .title_style(Style::default().fg(palette.accent2.color()).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);

    GameLayout {
        status: chunks[0],
        field: chunks[1],
        help: chunks[2],
    }
}

pub fn status_bar(frame: &mut Frame, area: Rect, items: &[(String, Color)], palette: &Palette) {
    let mut spans = vec![Span::raw(" ")];
    for (i, (text, color)) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(palette.muted())));
        }
        spans.push(Span::styled(
            text.clone(),
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn help_bar(frame: &mut Frame, area: Rect, keys: &[(&str, &str)], palette: &Palette) {
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, action)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(palette.muted())));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(palette.accent1.color()).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {action}"), Style::default().fg(palette.muted())));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Centered rectangle clamped to `area`, for overlays.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(4));
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

fn overlay_block(title: String, palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(palette.accent2.color()))
        .title(title)
        .title_style(Style::default().fg(palette.accent2.color()).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(palette.background.color()))
}

fn render_paused(frame: &mut Frame, area: Rect, palette: &Palette) {
    let rect = centered(area, 30, 5);
    frame.render_widget(Clear, rect);
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("P", Style::default().fg(palette.accent1.color()).add_modifier(Modifier::BOLD)),
            Span::styled(" resume  ", Style::default().fg(palette.muted())),
            Span::styled("Esc", Style::default().fg(palette.accent1.color()).add_modifier(Modifier::BOLD)),
            Span::styled(" menu", Style::default().fg(palette.muted())),
        ]),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(overlay_block(" ⏸ PAUSED ".into(), palette));
    frame.render_widget(p, rect);
}

fn render_game_over(frame: &mut Frame, area: Rect, launcher: &Launcher, game: &dyn Game, outcome: &Outcome) {
    let palette = launcher.palette();
    let rect = centered(area, 40, 10);
    frame.render_widget(Clear, rect);

    let id = game.id();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Score: {}", game.score()),
            Style::default().fg(palette.projectile.color()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Best: {}", launcher.leaderboard().high_score(id)),
            Style::default().fg(palette.text.color()),
        )),
    ];
    if let Outcome::Ranked(rank) = outcome {
        lines.push(Line::from(Span::styled(
            format!("🏆 #{} on the {} board!", rank + 1, id.title()),
            Style::default().fg(palette.accent2.color()).add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(notice) = launcher.notice() {
        lines.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(palette.opponent.color()),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("R", Style::default().fg(palette.accent1.color()).add_modifier(Modifier::BOLD)),
        Span::styled(" play again  ", Style::default().fg(palette.muted())),
        Span::styled("Enter", Style::default().fg(palette.accent1.color()).add_modifier(Modifier::BOLD)),
        Span::styled(" menu", Style::default().fg(palette.muted())),
    ]));

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(overlay_block(" 💀 GAME OVER ".into(), palette));
    frame.render_widget(p, rect);
}

fn render_name_entry(frame: &mut Frame, area: Rect, game: &dyn Game, entry: &NameEntry, palette: &Palette) {
    let rect = centered(area, 44, 13);
    frame.render_widget(Clear, rect);

    let block = overlay_block(" 🏆 NEW HIGH SCORE! ".into(), palette);
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    // Typed chars, then underscores for what's left
    let typed = entry.buffer.chars().count();
    let display = format!("{}{}", entry.buffer, "_".repeat(MAX_LABEL_LEN.saturating_sub(typed)));
    let key = Style::default().fg(palette.accent1.color()).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(palette.muted());

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  🎮 "),
            Span::styled(game.id().title(), key),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  Score: {}", game.score()),
            Style::default().fg(palette.projectile.color()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("  Enter your name:", Style::default().fg(palette.text.color()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("    [ ", dim),
            Span::styled(display, Style::default().fg(palette.text.color()).add_modifier(Modifier::BOLD)),
            Span::styled(" ]", dim),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter", key),
            Span::styled(" confirm  ", dim),
            Span::styled("Esc", key),
            Span::styled(" skip", dim),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
