use std::fmt::Write as _;

use super::{Element, Page, ReportDocument, Rgb, MARGIN_LEFT};

/// Millimetres covered by one character cell in the preview.
const MM_PER_CHAR: f64 = 2.0;
const HEADING_SIZE: f64 = 16.0;

enum Line<'a> {
    Runs(Vec<(usize, &'a str, f64)>),
    Rule(usize, usize),
}

impl ReportDocument {
    /// Plain-text preview of the document, one output line per row of text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (index, page) in self.pages.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "--- Page {} of {} ---", index + 1, self.pages.len());
            render_page(page, &mut out);
        }
        out
    }
}

fn column(x: f64) -> usize {
    ((x - MARGIN_LEFT).max(0.0) / MM_PER_CHAR).round() as usize
}

fn is_faint(color: Rgb) -> bool {
    color.0 > 230 && color.1 > 230 && color.2 > 230
}

fn render_page(page: &Page, out: &mut String) {
    let mut rows: Vec<(f64, Line<'_>)> = Vec::new();
    for element in &page.elements {
        match element {
            Element::Text(run) => {
                let entry = (column(run.x), run.text.as_str(), run.size);
                match rows
                    .iter_mut()
                    .find(|(y, line)| *y == run.y && matches!(line, Line::Runs(_)))
                {
                    Some((_, Line::Runs(runs))) => runs.push(entry),
                    _ => rows.push((run.y, Line::Runs(vec![entry]))),
                }
            }
            Element::Rule(rule) if !is_faint(rule.color) => {
                rows.push((rule.y1, Line::Rule(column(rule.x1), column(rule.x2))));
            }
            Element::Rule(_) => {}
        }
    }
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (_, line) in rows {
        match line {
            Line::Runs(mut runs) => {
                runs.sort_by_key(|(col, _, _)| *col);
                if runs.iter().any(|(_, _, size)| *size >= HEADING_SIZE) {
                    out.push('\n');
                }
                let mut text = String::new();
                for (col, run, _) in runs {
                    let width = text.chars().count();
                    if width < col {
                        text.push_str(&" ".repeat(col - width));
                    } else if width > 0 {
                        text.push(' ');
                    }
                    text.push_str(run);
                }
                out.push_str(text.trim_end());
                out.push('\n');
            }
            Line::Rule(start, end) => {
                out.push_str(&" ".repeat(start));
                out.push_str(&"-".repeat(end.saturating_sub(start)));
                out.push('\n');
            }
        }
    }
}
