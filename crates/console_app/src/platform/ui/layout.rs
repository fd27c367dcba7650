use ratatui::layout::{Constraint, Direction, Layout, Rect};

const SIDEBAR_MIN: u16 = 18;
const SIDEBAR_MAX: u16 = 36;

/// Screen areas of the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub chats: Rect,
    pub templates: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub status: Rect,
}

/// Sidebar (chats over templates) on the left, transcript and message box on
/// the right, one status row at the bottom.
pub fn split(area: Rect, input_lines: u16) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let sidebar_width = (area.width / 4).clamp(SIDEBAR_MIN, SIDEBAR_MAX);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(20)])
        .split(rows[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(4)])
        .split(columns[0]);

    let max_input = columns[1].height.saturating_sub(5).max(3);
    let input_height = input_lines.saturating_add(2).clamp(3, max_input);
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(input_height)])
        .split(columns[1]);

    AppLayout {
        chats: sidebar[0],
        templates: sidebar[1],
        transcript: main[0],
        input: main[1],
        status: rows[1],
    }
}

/// Rectangle of `width_percent` of `area`'s width and `height` rows, centered.
pub fn centered(area: Rect, width_percent: u16, height: u16) -> Rect {
    let width = (area.width as u32 * width_percent.min(100) as u32 / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
