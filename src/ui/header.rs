use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::Launcher;
use crate::games::{GameId, GameState};

/// Menu plus one tab per game; the active game (or the menu) is highlighted.
pub fn render_header(frame: &mut Frame, launcher: &Launcher, area: Rect) {
    let palette = launcher.palette();
    let active = launcher.phase().game().map(|g| g.id());

    let mut titles = vec![Line::from(" Menu ")];
    titles.extend(GameId::ALL.iter().map(|id| Line::from(format!(" {} ", id.title()))));
    let selected = active.map_or(0, |id| id.index() + 1);

    let state = match launcher.state() {
        GameState::Paused => " ⏸ ",
        GameState::GameOver => " 💀 ",
        _ => "",
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent1.color()))
                .border_type(BorderType::Rounded)
                .title(format!(" 🕹 Arcade{state}"))
                .title_style(Style::default().fg(palette.accent2.color()).add_modifier(Modifier::BOLD)),
        )
        .select(selected)
        .style(Style::default().fg(palette.muted()))
        .highlight_style(Style::default().fg(palette.projectile.color()).add_modifier(Modifier::BOLD))
        .divider(Span::styled(" │ ", Style::default().fg(palette.muted())));

    frame.render_widget(tabs, area);
}
