use chrono::Local;
use console_core::{AppViewModel, MessageStyle, MessageView, SectionClass, TemplateField, TemplateForm};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::layout::{self, AppLayout};
use crate::platform::input::{Focus, UiCursor};

const FOCUS_COLOR: Color = Color::Cyan;

pub fn draw(frame: &mut Frame<'_>, view: &AppViewModel, cursor: &UiCursor) {
    let input_lines = view.input.lines().count().max(1) as u16;
    let areas = layout::split(frame.area(), input_lines);

    draw_chats(frame, areas, view, cursor);
    draw_templates(frame, areas, view, cursor);
    draw_transcript(frame, areas.transcript, view, cursor);
    draw_input(frame, areas.input, view, cursor);
    draw_status(frame, areas.status, view);

    if let Some(form) = &view.template_form {
        draw_form(frame, form);
    }
    if let Some(prompt) = &view.confirmation {
        draw_dialog(frame, "Confirm", prompt, "[y] yes   [n] no", Color::Yellow);
    }
    if let Some(alert) = &view.alert {
        draw_dialog(frame, "Error", alert, "Enter to dismiss", Color::Red);
    }
}

fn pane(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block.border_style(Style::default().fg(FOCUS_COLOR))
    } else {
        block
    }
}

fn draw_chats(frame: &mut Frame<'_>, areas: AppLayout, view: &AppViewModel, cursor: &UiCursor) {
    let items: Vec<ListItem<'_>> = view
        .contexts
        .iter()
        .map(|row| {
            let marker = if row.selected { "● " } else { "  " };
            let style = if row.selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(row.label.clone(), style),
            ]))
        })
        .collect();

    let focused = cursor.focus == Focus::Chats;
    let list = List::new(items)
        .block(pane("Chats", focused))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if focused && !view.contexts.is_empty() {
        state.select(Some(cursor.chat_index));
    }
    frame.render_stateful_widget(list, areas.chats, &mut state);
}

fn draw_templates(
    frame: &mut Frame<'_>,
    areas: AppLayout,
    view: &AppViewModel,
    cursor: &UiCursor,
) {
    let items: Vec<ListItem<'_>> = if view.templates.is_empty() {
        vec![ListItem::new(Span::styled(
            "No templates",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        view.templates
            .iter()
            .map(|row| ListItem::new(row.name.clone()))
            .collect()
    };

    let focused = cursor.focus == Focus::Templates;
    let list = List::new(items)
        .block(pane("Templates", focused))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if focused && !view.templates.is_empty() {
        state.select(Some(cursor.template_index));
    }
    frame.render_stateful_widget(list, areas.templates, &mut state);
}

fn draw_transcript(frame: &mut Frame<'_>, area: Rect, view: &AppViewModel, cursor: &UiCursor) {
    let block = pane("Conversation", false);
    let inner = block.inner(area);
    let paragraph =
        Paragraph::new(Text::from(transcript_lines(&view.messages))).wrap(Wrap { trim: false });

    let total = wrapped_rows(&paragraph, inner.width);
    let max_scroll = total.saturating_sub(inner.height as usize);
    let offset = if view.display.auto_scroll {
        max_scroll
    } else {
        max_scroll.saturating_sub(cursor.scroll_back as usize)
    };

    let paragraph = paragraph
        .block(block)
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}

fn draw_input(frame: &mut Frame<'_>, area: Rect, view: &AppViewModel, cursor: &UiCursor) {
    let title = if view.paused {
        "Message (agent paused)"
    } else {
        "Message"
    };
    let paragraph = Paragraph::new(view.input.as_str())
        .block(pane(title, cursor.focus == Focus::Input))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame<'_>, area: Rect, view: &AppViewModel) {
    let mut spans = vec![if view.connected {
        Span::styled("● connected", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ disconnected", Style::default().fg(Color::Red))
    }];
    if view.paused {
        spans.push(Span::styled(" | paused", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::raw(format!(
        " | F2 scroll:{} F3 json:{} F4 thoughts:{}",
        on_off(view.display.auto_scroll),
        on_off(view.display.show_json),
        on_off(view.display.show_thoughts),
    )));
    if let Some(note) = &view.status_note {
        spans.push(Span::styled(
            format!(" | {note}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        format!(" | {}", Local::now().format("%H:%M:%S")),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn draw_form(frame: &mut Frame<'_>, form: &TemplateForm) {
    let mut lines = Vec::new();
    for field in TemplateField::ALL {
        let focused = field == form.focused;
        let label_style = if focused {
            Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));
        let value = form.draft.field(field);
        if value.is_empty() {
            lines.push(Line::from(Span::styled(
                if focused { "▏" } else { "-" },
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.extend(value.lines().map(|line| Line::from(format!("  {line}"))));
        }
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled(
        "Tab next field · Ctrl+S save · Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let height = lines.len() as u16 + 2;
    let area = layout::centered(frame.area(), 70, height);
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(Text::from(lines))
        .block(pane(form.title(), true))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_dialog(frame: &mut Frame<'_>, title: &str, body: &str, hint: &str, color: Color) {
    let lines = vec![
        Line::from(body.to_string()),
        Line::default(),
        Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let area = layout::centered(frame.area(), 50, 7);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn color_for(style: MessageStyle) -> Color {
    match style {
        MessageStyle::User => Color::Cyan,
        MessageStyle::Agent => Color::Blue,
        MessageStyle::Response => Color::Green,
        MessageStyle::Tool => Color::Yellow,
        MessageStyle::CodeExe => Color::Magenta,
        MessageStyle::Warning => Color::LightYellow,
        MessageStyle::Error => Color::Red,
        MessageStyle::Info => Color::Gray,
        MessageStyle::Util => Color::DarkGray,
        MessageStyle::Hint => Color::LightCyan,
        MessageStyle::Adhoc => Color::LightMagenta,
        MessageStyle::Default => Color::White,
    }
}

/// Flattens the visible messages into styled lines, one blank line between
/// messages.
pub fn transcript_lines(messages: &[MessageView]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in messages {
        let color = color_for(message.style);
        lines.push(Line::from(vec![
            Span::styled("▌", Style::default().fg(color)),
            Span::styled(
                format!(" {} · {}", message.sender.label(), message.kind),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]));

        for section in &message.sections {
            let style = match section.class {
                SectionClass::Heading => Style::default().add_modifier(Modifier::BOLD),
                SectionClass::Body => Style::default(),
                SectionClass::Json => Style::default().fg(Color::DarkGray),
                SectionClass::Thoughts => Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
                SectionClass::Kvp => Style::default().fg(Color::Gray),
            };
            if section.text.is_empty() && section.label.is_none() {
                continue;
            }
            if let Some(label) = &section.label {
                lines.push(Line::from(Span::styled(
                    format!("{label}:"),
                    Style::default().fg(color),
                )));
            }
            for text in section.text.lines() {
                lines.push(Line::from(Span::styled(format!("  {text}"), style)));
            }
        }
        lines.push(Line::default());
    }
    lines
}

/// Rows a borderless `paragraph` occupies at `width` columns, wrapped by
/// words exactly as it will be drawn.
fn wrapped_rows(paragraph: &Paragraph<'_>, width: u16) -> usize {
    paragraph.line_count(width)
}
