//! Ratatui drawing for the installer screens.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use mm_installer_core::{AlertLevel, GateState, InstallerMode, Resolution, RunStatus};

use crate::app::{App, Screen};

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    frame.render_widget(Clear, frame.area());
    match app.screen {
        Screen::Welcome => draw_welcome(frame, app),
        Screen::Run => draw_run(frame, app),
    }
}

fn draw_welcome(frame: &mut Frame<'_>, app: &App) {
    // Header, body, footer; the body grows with the terminal.
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, layout[0]);

    // Gate status on the left, mode menu on the right.
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[1]);

    let status_block = Block::default().title("Status").borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(render_status(app))
            .block(status_block)
            .wrap(Wrap { trim: true }),
        body[0],
    );

    let menu_block = Block::default().title("Modes").borders(Borders::ALL);
    frame.render_widget(render_menu(app, body[1].width).block(menu_block), body[1]);

    draw_footer(
        frame,
        layout[2],
        &[("Enter", "select"), ("Up/Down", "move"), ("Q", "quit")],
    );
}

fn render_status(app: &App) -> Text<'static> {
    let mut lines = Vec::new();
    // Availability comes only from the one-shot status query.
    match app.gate.state() {
        GateState::Unqueried | GateState::Pending => {
            lines.push(Line::from(Span::styled(
                "Checking installation...",
                Style::default().fg(Color::Yellow),
            )));
        }
        GateState::Ready(status) => {
            lines.push(availability_line(
                app.locale.mode_label(InstallerMode::Install),
                status.can_install,
            ));
            lines.push(availability_line(
                app.locale.mode_label(InstallerMode::Update),
                status.can_update,
            ));
        }
        GateState::Failed(_) => {
            if let Some(failure) = app.status_failure() {
                lines.push(Line::from(Span::styled(
                    failure,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )));
            }
        }
    }

    if let Some(mode) = app.selecting {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Waiting for {}...", app.locale.mode_label(mode)),
            Style::default().fg(Color::Yellow),
        )));
    }

    if let Some(notice) = &app.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                "Rejected: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(notice.clone()),
        ]));
    }

    Text::from(lines)
}

fn availability_line(label: &str, available: bool) -> Line<'static> {
    let (tag, style) = if available {
        ("[ok]", Style::default().fg(Color::Green))
    } else {
        ("[--]", Style::default().fg(Color::Gray))
    };
    Line::from(vec![
        Span::styled(tag, style.add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::raw(label.to_string()),
    ])
}

fn render_menu(app: &App, width: u16) -> List<'static> {
    let inner_width = width.saturating_sub(2) as usize;
    let items = App::menu_items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let label = truncate_to_width(app.menu_label(*item), inner_width);
            // Cursor highlight wins; modes the gate did not offer are dimmed.
            let style = if index == app.menu_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if !app.menu_enabled(*item) {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(label, style)))
        })
        .collect::<Vec<_>>();
    List::new(items)
}

fn draw_run(frame: &mut Frame<'_>, app: &App) {
    // Header, phase summary, gauge, alert list, footer.
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, layout[0]);

    let orchestrator = &app.orchestrator;
    let state = orchestrator.state();
    let (status_label, status_color) = match orchestrator.status() {
        RunStatus::Running { .. } => ("In progress", Color::Yellow),
        RunStatus::Finished { .. } => ("Completed", Color::Green),
        RunStatus::Errored { .. } => ("Failed", Color::Red),
        RunStatus::Idle => ("Pending", Color::Gray),
    };
    let mode_label = orchestrator
        .mode()
        .map(|mode| app.locale.mode_label(mode).to_string())
        .unwrap_or_default();
    let inner_width = layout[1].width.saturating_sub(2) as usize;
    let status_lines = vec![
        Line::from(Span::styled(
            format!("{mode_label} - {status_label}"),
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(truncate_to_width(
            app.locale.phase(state.phase),
            inner_width,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(status_lines))
            .alignment(Alignment::Center)
            .block(Block::default().title("Progress").borders(Borders::ALL)),
        layout[1],
    );

    // Progress is phase-local; the gauge label carries the engine's detail text.
    let gauge_width = layout[2].width.saturating_sub(2) as usize;
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(state.percent())
        .label(truncate_to_width(
            &format!("{}% {}", state.percent(), state.detail),
            gauge_width,
        ));
    frame.render_widget(gauge, layout[2]);

    let alerts_block = Block::default()
        .title(format!("Alerts ({})", state.alerts.len()))
        .borders(Borders::ALL);
    frame.render_widget(render_alerts(app, layout[3].width).block(alerts_block), layout[3]);

    if orchestrator.is_running() {
        draw_footer(frame, layout[4], &[("Up/Down", "select alert"), ("D", "dismiss alert")]);
    } else {
        draw_footer(frame, layout[4], &[("Left/Right", "choose"), ("Enter", "confirm")]);
    }

    // Terminal outcomes float over the run screen so the last phase and
    // alerts stay visible behind the dialog.
    let resolution = app.resolution();
    if !matches!(resolution, Resolution::Pending) {
        draw_resolution(frame, app, &resolution);
    }
}

fn render_alerts(app: &App, width: u16) -> List<'static> {
    let inner_width = width.saturating_sub(2) as usize;
    let selected = app.selected_alert();
    let items = app
        .orchestrator
        .state()
        .alerts
        .iter()
        .map(|alert| {
            let (tag, style) = match alert.level {
                AlertLevel::Info => ("[info]", Style::default().fg(Color::Cyan)),
                AlertLevel::Warning => ("[warn]", Style::default().fg(Color::Yellow)),
            };
            let available = inner_width.saturating_sub(tag.len() + 1);
            let mut text_style = Style::default();
            if Some(alert.id) == selected {
                text_style = text_style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(Line::from(vec![
                Span::styled(tag, style.add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(truncate_to_width(&alert.text, available), text_style),
            ]))
        })
        .collect::<Vec<_>>();
    List::new(items)
}

fn draw_resolution(frame: &mut Frame<'_>, app: &App, resolution: &Resolution) {
    let area = centered_rect(60, 9, frame.area());
    // Red for a failed run, green for a finished one.
    let (title, color) = match resolution {
        Resolution::Errored { .. } => ("Failed", Color::Red),
        _ => ("Done", Color::Green),
    };
    let inner_width = area.width.saturating_sub(2) as usize;
    let mut lines = Vec::new();
    if let Some(text) = resolution.user_text() {
        for line in text.lines() {
            for wrapped in wrap_line(line, inner_width) {
                lines.push(Line::from(wrapped));
            }
        }
    }
    lines.push(Line::from(""));

    // One button per offered action; the selected one is filled.
    let selected = app.selected_action();
    let mut buttons = Vec::new();
    for action in resolution.actions() {
        let style = if Some(*action) == selected {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        buttons.push(Span::styled(
            format!("[ {} ]", app.locale.text(action.text_key())),
            style,
        ));
        buttons.push(Span::raw("  "));
    }
    lines.push(Line::from(buttons).alignment(Alignment::Center));

    // Clear first so the run screen does not bleed through the dialog.
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        ),
        area,
    );
}

fn draw_header(frame: &mut Frame<'_>, area: Rect) {
    let title = Paragraph::new(Line::from(vec![Span::styled(
        "Modpack Installer",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, keys: &[(&'static str, &'static str)]) {
    let mut spans = Vec::new();
    for (key, action) in keys {
        spans.push(Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(format!(" = {action}  ")));
    }
    let footer = Paragraph::new(Text::from(Line::from(spans)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.replace('\t', " ").split_whitespace() {
        if current.is_empty() {
            current = truncate_to_width(word, width);
        } else if current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
            current = truncate_to_width(word, width);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn truncate_to_width(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut out: String = text.chars().take(width - 3).collect();
    out.push_str("...");
    out
}
