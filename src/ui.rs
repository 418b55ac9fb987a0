use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::score::{self, Verdict};
use crate::session::Mode;
use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.session.mode() {
            Mode::Menu => render_menu(self, area, buf),
            Mode::Running | Mode::Paused | Mode::Review => render_test(self, area, buf),
            Mode::FullReview => render_full_review(self, area, buf),
        }

        // The modal draws last, over everything else.
        if self.session.gate().is_open() {
            render_gate(self, area, buf);
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(8),
            Constraint::Min(0),
        ])
        .split(area);

    let lines = vec![
        Line::from(Span::styled("proktor", bold().fg(Color::Cyan))),
        Line::from(""),
        Line::from(vec![
            Span::raw("test type:  "),
            Span::styled(app.menu.test_type.to_string(), bold().fg(Color::Green)),
            Span::styled("  (tab to change)", dim()),
        ]),
        Line::from(vec![
            Span::raw("timing:     "),
            Span::styled(app.menu.timing.to_string(), bold().fg(Color::Green)),
            Span::styled("  (t to change)", dim()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) begin  (esc) exit",
            dim().add_modifier(Modifier::ITALIC),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}

fn render_test(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(0),    // body
            Constraint::Length(2), // nav
            Constraint::Length(1), // key help
        ])
        .split(area);

    render_header(app, chunks[0], buf);

    if app.session.mode() == Mode::Paused {
        let paused = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Test Paused", bold().fg(Color::Yellow))),
            Line::from(Span::styled("press p to resume", dim())),
        ])
        .alignment(Alignment::Center);
        paused.render(chunks[1], buf);
    } else {
        render_question(app, chunks[1], buf);
    }

    render_nav(app, chunks[2], buf);
    render_key_help(app, chunks[3], buf);
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let Some(section) = session.current_section() else {
        return;
    };

    let mut left = vec![
        Span::styled(
            format!("Section {} of {}", session.section_idx() + 1, session.sections().len()),
            bold(),
        ),
        Span::raw("  "),
        Span::styled(section.kind.to_string(), dim()),
        Span::raw("  "),
        Span::raw(format!(
            "Q{}/{}",
            session.question_idx() + 1,
            section.len()
        )),
    ];

    if session.mode() == Mode::Review {
        let score = score::section_score(section, session.sheet(), session.section_idx());
        left.push(Span::raw("  "));
        left.push(Span::styled(
            format!("{}/{} Correct", score, section.len()),
            bold().fg(Color::Green),
        ));
        left.push(Span::styled("  REVIEW", bold().fg(Color::Magenta)));
    } else {
        let flagged = session.sheet().flagged_in_section(session.section_idx());
        if !flagged.is_empty() {
            left.push(Span::raw("  "));
            left.push(Span::styled(
                format!("flagged: {}", flagged.iter().join(", ")),
                Style::default().fg(Color::Yellow),
            ));
        }
    }

    let timer = session.timer();
    let right = if session.mode() == Mode::Review {
        Span::raw("")
    } else if timer.is_visible() {
        let style = if timer.low_time() {
            bold().fg(Color::Red)
        } else {
            bold()
        };
        Span::styled(format!("TIME {}", timer.format_remaining()), style)
    } else {
        Span::styled("TIME hidden", dim())
    };

    Paragraph::new(Line::from(left)).render(area, buf);
    Paragraph::new(Line::from(right))
        .alignment(Alignment::Right)
        .render(area, buf);
}

fn render_question(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let Some(question) = session.current_question() else {
        return;
    };

    let constraints = if app.view.context_hidden {
        [Constraint::Length(0), Constraint::Percentage(100)]
    } else {
        [Constraint::Percentage(45), Constraint::Percentage(55)]
    };
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    if !app.view.context_hidden {
        let mut context_lines: Vec<Line> = Vec::new();
        for block in question.context_blocks() {
            context_lines.push(Line::from(block.to_string()));
            context_lines.push(Line::from(""));
        }
        Paragraph::new(context_lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::RIGHT))
            .render(panes[0], buf);
    }

    let state = session.sheet().get(session.section_idx(), session.question_idx());
    let review = session.mode() == Mode::Review;

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(question.prompt.clone(), bold())),
        Line::from(""),
    ];

    if review {
        if let Some(state) = state {
            let (text, style) = match score::verdict(question.correct, state) {
                Verdict::Correct => ("CORRECT", bold().fg(Color::Green)),
                Verdict::Incorrect => ("INCORRECT", bold().fg(Color::Red)),
                Verdict::Skipped => ("UNANSWERED", bold().fg(Color::Yellow)),
            };
            lines.push(Line::from(Span::styled(text, style)));
            lines.push(Line::from(""));
        }
    }

    for (idx, option) in question.options.iter().enumerate() {
        let selected = state.and_then(|s| s.selected) == Some(idx);
        let eliminated = state.is_some_and(|s| s.is_eliminated(idx));
        let cursor = if !review && idx == app.view.option_cursor {
            "> "
        } else {
            "  "
        };

        let style = if review {
            // Only review mode may reveal the answer key.
            if idx == question.correct {
                bold().fg(Color::Green)
            } else if selected {
                bold().fg(Color::Red)
            } else if eliminated {
                dim().add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            }
        } else if selected {
            bold().fg(Color::Cyan)
        } else if eliminated {
            dim().add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default()
        };

        let marker = if selected { "●" } else { "○" };
        lines.push(Line::from(Span::styled(
            format!("{cursor}{marker} {}. {option}", score::option_letter(idx)),
            style,
        )));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(ratatui::widgets::Padding::horizontal(1)))
        .render(panes[1], buf);
}

fn render_nav(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let Some(section) = session.current_section() else {
        return;
    };
    let review = session.mode() == Mode::Review;

    let mut spans: Vec<Span> = Vec::new();
    for (idx, question) in section.questions.iter().enumerate() {
        let state = session.sheet().get(session.section_idx(), idx);
        let answered = state.and_then(|s| s.selected).is_some();
        let flagged = state.is_some_and(|s| s.flagged);

        let mut style = if review {
            let correct = state.and_then(|s| s.selected) == Some(question.correct);
            if correct {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            }
        } else if answered {
            Style::default().fg(Color::Cyan)
        } else {
            dim()
        };
        if idx == session.question_idx() {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        if flagged {
            style = style.add_modifier(Modifier::ITALIC).fg(Color::Yellow);
        }

        spans.push(Span::styled(format!("{:>2}", idx + 1), style));
        spans.push(Span::raw(" "));
    }

    Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::TOP))
        .render(area, buf);
}

fn render_key_help(app: &App, area: Rect, buf: &mut Buffer) {
    let help = match app.session.mode() {
        Mode::Running => {
            "←/→ move  ↑/↓ option  (enter) answer  (x) eliminate  (f) flag  (c) passage  (h) timer  (p) pause  (e) end section  (v) finish  (esc) quit"
        }
        Mode::Paused => "(p) resume  (v) finish  (esc) quit",
        Mode::Review => "←/→ move  (v) full review  (esc) quit",
        _ => "",
    };
    Paragraph::new(Span::styled(help, dim().add_modifier(Modifier::ITALIC)))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_full_review(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let report = score::full_report(session.sections(), session.sheet());

    let total_score: usize = report.iter().map(|s| s.score).sum();
    let total_questions: usize = report.iter().map(|s| s.total).sum();

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "Test Results",
        bold().fg(Color::Cyan),
    ))];
    if let Some(finished) = session.finished_at() {
        lines.push(Line::from(Span::styled(
            format!("completed {}", finished.format("%H:%M")),
            dim(),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("total {total_score}/{total_questions}"),
        bold(),
    )));
    lines.push(Line::from(""));

    for (s_idx, summary) in report.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!(
                "Section {} — {}: {}/{} ({}%)",
                s_idx + 1,
                summary.kind,
                summary.score,
                summary.total,
                summary.percent
            ),
            bold(),
        )));

        for row in &summary.rows {
            let answer_letter = row.selected.map(score::option_letter);
            let (text, color) = match row.verdict {
                Verdict::Correct => (
                    format!("Q{}: {}", row.number, answer_letter.unwrap_or('?')),
                    Color::Green,
                ),
                Verdict::Incorrect => (
                    format!(
                        "Q{}: {} (Correct: {})",
                        row.number,
                        answer_letter.unwrap_or('?'),
                        score::option_letter(row.correct)
                    ),
                    Color::Red,
                ),
                Verdict::Skipped => (
                    format!("Q{}: Skipped (Ans: {})", row.number, score::option_letter(row.correct)),
                    Color::Yellow,
                ),
            };
            lines.push(Line::from(Span::styled(
                format!("  {text}"),
                Style::default().fg(color),
            )));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "(v) question-by-question review  (esc) quit to menu",
        dim().add_modifier(Modifier::ITALIC),
    )));

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Full Review")
                .padding(ratatui::widgets::Padding::horizontal(1)),
        )
        .render(area, buf);
}

fn render_gate(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(prompt) = app.session.gate().current() else {
        return;
    };

    let width = (prompt.message.width() as u16 + 6)
        .clamp(30, area.width.saturating_sub(4).max(30));
    let modal = centered_rect(width, 7, area);
    Clear.render(modal, buf);

    // A forced prompt renders no cancellation control at all.
    let controls = if prompt.forced {
        "(enter) continue"
    } else {
        "(enter) confirm  (esc) cancel"
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::raw(prompt.message.clone())),
        Line::from(""),
        Line::from(Span::styled(controls, bold())),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(bold().fg(Color::Yellow))
                .title(prompt.title.clone())
                .title_alignment(Alignment::Center),
        )
        .render(modal, buf);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
