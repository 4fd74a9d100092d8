use ratatui::{prelude::*, widgets::*};

use crate::app::state::StatusKind;
use crate::models::{HttpMethod, ResponseBody};

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Simple JSON syntax highlighting, one `Line` per input line
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    text.lines().map(highlight_json_line).collect()
}

fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut chars = line.char_indices();

    let flush = |current: &mut String, spans: &mut Vec<Span<'static>>| {
        if current.is_empty() {
            return;
        }
        let word = std::mem::take(current);
        let trimmed = word.trim();
        let style = if matches!(trimmed, "true" | "false" | "null") {
            Style::default().fg(Color::Magenta)
        } else if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        spans.push(Span::styled(word, style));
    };

    while let Some((_, c)) = chars.next() {
        match c {
            '"' => {
                flush(&mut current, &mut spans);
                let mut literal = String::from('"');
                let mut end = line.len();
                let mut escaped = false;
                for (idx, sc) in chars.by_ref() {
                    literal.push(sc);
                    if escaped {
                        escaped = false;
                    } else if sc == '\\' {
                        escaped = true;
                    } else if sc == '"' {
                        end = idx + 1;
                        break;
                    }
                }
                let is_key = line[end..].trim_start().starts_with(':');
                let color = if is_key { Color::Cyan } else { Color::Green };
                spans.push(Span::styled(literal, Style::default().fg(color)));
            }
            '{' | '}' | '[' | ']' => {
                flush(&mut current, &mut spans);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
            }
            ':' | ',' => {
                flush(&mut current, &mut spans);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::White)));
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut spans);

    Line::from(spans)
}

/// Response body as display lines: highlighted JSON, or plain text
pub fn body_lines(body: &ResponseBody) -> Vec<Line<'static>> {
    match body {
        ResponseBody::Json(_) => highlight_json(&body.render()),
        ResponseBody::Text(text) => text.lines().map(|l| Line::raw(l.to_string())).collect(),
    }
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::PATCH => Color::Cyan,
        HttpMethod::DELETE => Color::Red,
    }
}

pub fn status_style(kind: StatusKind) -> Style {
    match kind {
        StatusKind::Info => Style::default().fg(Color::Green),
        StatusKind::Warning => Style::default().fg(Color::Yellow),
        StatusKind::Error => Style::default().fg(Color::Red).bold(),
    }
}

pub fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Terminal cursor for a bordered editor, kept inside the border
pub fn editor_cursor(area: Rect, row: usize, col: usize) -> Position {
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    let max_y = area.y.saturating_add(area.height.saturating_sub(2));
    let x = area.x.saturating_add(1).saturating_add(clamp_u16(col));
    let y = area.y.saturating_add(1).saturating_add(clamp_u16(row));
    Position::new(x.min(max_x), y.min(max_y))
}

/// Create a centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn colored(line: &Line, color: Color) -> Vec<String> {
        line.spans
            .iter()
            .filter(|s| s.style.fg == Some(color))
            .map(|s| s.content.to_string())
            .collect()
    }

    #[test]
    fn test_keys_and_values_colored_apart() {
        let lines = highlight_json(r#"  "name": "a: \"b\"", "n": -1.5, "ok": true"#);
        let line = &lines[0];
        assert_eq!(colored(line, Color::Cyan), vec![r#""name""#, r#""n""#, r#""ok""#]);
        assert_eq!(colored(line, Color::Green), vec![r#""a: \"b\"""#]);
        assert_eq!(colored(line, Color::Magenta), vec![" true"]);
        assert_eq!(colored(line, Color::Yellow), vec![" -1.5"]);
    }

    #[test]
    fn test_body_lines() {
        let json = ResponseBody::Json(json!({"a": [1]}));
        assert_eq!(body_lines(&json).len(), 5);
        let text = ResponseBody::Text("id,name\n1,ACME".into());
        assert_eq!(body_lines(&text).len(), 2);
    }

    #[test]
    fn test_colors() {
        assert_eq!(status_color(204), Color::Green);
        assert_eq!(status_color(503), Color::Magenta);
        assert_eq!(method_color(HttpMethod::DELETE), Color::Red);
    }

    #[test]
    fn test_editor_cursor_stays_inside_border() {
        let area = Rect::new(10, 5, 40, 12);
        assert_eq!(editor_cursor(area, 0, 0), Position::new(11, 6));
        assert_eq!(editor_cursor(area, 3, 7), Position::new(18, 9));
        assert_eq!(editor_cursor(area, 2, 200_000), Position::new(48, 8));
        assert_eq!(editor_cursor(area, 100_000, 0), Position::new(11, 15));
        assert_eq!(clamp_u16(70_000), u16::MAX);
    }

    #[test]
    fn test_centered_rect_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 70, area);
        assert_eq!(popup.width, 60);
        assert!(popup.x >= 20 && popup.y >= 7);
    }
}
