use terminal_size::{terminal_size, Width};

const HEADER_COLOR: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";
const MIN_COLUMN: usize = 3;

/// Usable terminal width; 80 when stdout is not a terminal.
pub fn terminal_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) if w > 4 => (w - 4) as usize,
        _ => 80,
    }
}

/// A plain text grid: header, rows and an optional footer line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    footer: Option<String>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { headers: headers.into_iter().map(Into::into).collect(), rows: Vec::new(), footer: None }
    }

    pub fn push(&mut self, row: Vec<String>) { self.rows.push(row); }

    pub fn with_footer<S: Into<String>>(mut self, footer: S) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn len(&self) -> usize { self.rows.len() }

    /// Column widths that fit in `max_width`, shrinking the widest column first.
    fn widths(&self, max_width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| visible_len(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(visible_len(cell));
            }
        }
        // "| " + cells joined by " | " + " |"
        let frame = 3 * widths.len() + 1;
        while widths.iter().sum::<usize>() + frame > max_width {
            let Some((idx, w)) = widths.iter().copied().enumerate().max_by_key(|(_, w)| *w) else { break };
            if w <= MIN_COLUMN {
                break;
            }
            widths[idx] = w - 1;
        }
        widths
    }

    /// Lines ready to print. `color` paints the header row.
    pub fn render(&self, max_width: usize, color: bool) -> Vec<String> {
        let widths = self.widths(max_width);
        let sep = separator(&widths);
        let mut out = Vec::with_capacity(self.rows.len() + 5);
        out.push(sep.clone());
        out.push(header_line(&self.headers, &widths, color));
        out.push(sep.clone());
        for row in &self.rows {
            out.push(row_line(row, &widths));
        }
        out.push(sep);
        if let Some(f) = &self.footer {
            out.push(truncate(f, max_width));
        }
        out
    }
}

fn separator(widths: &[usize]) -> String {
    let mut s = String::from("+");
    for w in widths {
        s.push_str(&"-".repeat(w + 2));
        s.push('+');
    }
    s
}

fn header_line(headers: &[String], widths: &[usize], color: bool) -> String {
    let mut s = String::from("|");
    for (i, w) in widths.iter().enumerate() {
        let text = truncate(headers.get(i).map(String::as_str).unwrap_or(""), *w);
        let pad = w.saturating_sub(visible_len(&text));
        if color {
            s.push_str(&format!(" {HEADER_COLOR}{text}{RESET}{} |", " ".repeat(pad)));
        } else {
            s.push_str(&format!(" {text}{} |", " ".repeat(pad)));
        }
    }
    s
}

fn row_line(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::from("|");
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let text = truncate(cell, *w);
        let pad = " ".repeat(w.saturating_sub(visible_len(&text)));
        if is_numeric_like(cell) {
            s.push_str(&format!(" {pad}{text} |"));
        } else {
            s.push_str(&format!(" {text}{pad} |"));
        }
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    if visible_len(s) <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "…".to_string();
    }
    s.chars().take(max - 1).collect::<String>() + "…"
}

/// Ids, years and counts go right-aligned.
fn is_numeric_like(s: &str) -> bool {
    let st = s.trim();
    !st.is_empty() && st.chars().any(|c| c.is_ascii_digit()) && st.chars().all(|c| c.is_ascii_digit() || ".,-".contains(c))
}

/// Character count ignoring ANSI CSI sequences.
fn visible_len(s: &str) -> usize {
    let mut count = 0;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        count += 1;
    }
    count
}
