//! Minimal PDF 1.4 serializer for [`ReportDocument`].
//!
//! Only what the report needs is emitted: one Helvetica font resource with
//! WinAnsi encoding, text runs and stroked rules. No timestamps are written,
//! so identical documents serialize to identical bytes.

use std::io::Write;

use super::{Element, ReportDocument, Rgb, Rule, TextRun, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::CoreError;

const POINTS_PER_MM: f64 = 72.0 / 25.4;
const RULE_WIDTH_PT: f64 = 0.57;
const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_ID: usize = 3;
const INFO_ID: usize = 4;
const FIRST_PAGE_ID: usize = 5;

/// Serializes `document` into PDF bytes.
pub fn render(document: &ReportDocument) -> Result<Vec<u8>, CoreError> {
    if document.pages.is_empty() {
        return Err(CoreError::Export("report has no pages".into()));
    }

    let mut writer = PdfWriter::default();
    writer.raw(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let page_ids: Vec<usize> = (0..document.pages.len())
        .map(|index| FIRST_PAGE_ID + index * 2)
        .collect();

    writer.object(
        CATALOG_ID,
        format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>").as_bytes(),
    )?;
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    writer.object(
        PAGES_ID,
        format!(
            "<< /Type /Pages /Kids [{kids}] /Count {} /MediaBox [0 0 {} {}] >>",
            page_ids.len(),
            number(PAGE_WIDTH_MM * POINTS_PER_MM),
            number(PAGE_HEIGHT_MM * POINTS_PER_MM),
        )
        .as_bytes(),
    )?;
    writer.object(
        FONT_ID,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    )?;
    let mut info = b"<< /Producer (PocketWise) /Title ".to_vec();
    info.extend(literal_string(&document.title));
    info.extend_from_slice(b" >>");
    writer.object(INFO_ID, &info)?;

    for (page, page_id) in document.pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        writer.object(
            *page_id,
            format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R /Resources << /Font << /F1 {FONT_ID} 0 R >> >> /Contents {content_id} 0 R >>"
            )
            .as_bytes(),
        )?;

        let mut content = Vec::new();
        for element in &page.elements {
            match element {
                Element::Text(run) => write_text(&mut content, run)?,
                Element::Rule(rule) => write_rule(&mut content, rule)?,
            }
        }
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend(content);
        stream.extend_from_slice(b"\nendstream");
        writer.object(content_id, &stream)?;
    }

    writer.finish(CATALOG_ID, INFO_ID)
}

#[derive(Default)]
struct PdfWriter {
    buffer: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    fn object(&mut self, id: usize, body: &[u8]) -> Result<(), CoreError> {
        self.offsets.push((id, self.buffer.len()));
        write!(self.buffer, "{id} 0 obj\n")?;
        self.buffer.extend_from_slice(body);
        self.buffer.extend_from_slice(b"\nendobj\n");
        Ok(())
    }

    fn finish(mut self, root: usize, info: usize) -> Result<Vec<u8>, CoreError> {
        self.offsets.sort_by_key(|(id, _)| *id);
        let size = self.offsets.len() + 1;
        let xref_offset = self.buffer.len();
        write!(self.buffer, "xref\n0 {size}\n0000000000 65535 f \n")?;
        for (_, offset) in &self.offsets {
            write!(self.buffer, "{offset:010} 00000 n \n")?;
        }
        write!(
            self.buffer,
            "trailer\n<< /Size {size} /Root {root} 0 R /Info {info} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        )?;
        Ok(self.buffer)
    }
}

fn to_points_x(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// PDF space grows upwards from the bottom edge.
fn to_points_y(mm: f64) -> f64 {
    (PAGE_HEIGHT_MM - mm) * POINTS_PER_MM
}

fn number(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn color(rgb: Rgb) -> String {
    format!(
        "{} {} {}",
        number(rgb.0 as f64 / 255.0),
        number(rgb.1 as f64 / 255.0),
        number(rgb.2 as f64 / 255.0)
    )
}

fn write_text(out: &mut Vec<u8>, run: &TextRun) -> Result<(), CoreError> {
    write!(
        out,
        "BT /F1 {} Tf {} rg {} {} Td ",
        number(run.size),
        color(run.color),
        number(to_points_x(run.x)),
        number(to_points_y(run.y)),
    )?;
    out.extend(literal_string(&run.text));
    out.extend_from_slice(b" Tj ET\n");
    Ok(())
}

fn write_rule(out: &mut Vec<u8>, rule: &Rule) -> Result<(), CoreError> {
    writeln!(
        out,
        "{} RG {} w {} {} m {} {} l S",
        color(rule.color),
        number(RULE_WIDTH_PT),
        number(to_points_x(rule.x1)),
        number(to_points_y(rule.y1)),
        number(to_points_x(rule.x2)),
        number(to_points_y(rule.y2)),
    )?;
    Ok(())
}

/// Encodes `text` as a PDF literal string in WinAnsi encoding.
fn literal_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for ch in text.chars() {
        let byte = win_ansi(ch);
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
    out
}

fn win_ansi(ch: char) -> u8 {
    match ch {
        '€' => 0x80,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        ' '..='~' => ch as u8,
        '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pocketwise_domain::{Ledger, NewTransaction};

    use super::*;
    use crate::report::{ReportGenerator, ReportSnapshot};

    fn document(count: u32) -> ReportDocument {
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let transactions = (0..count)
            .map(|i| {
                NewTransaction::expense(10.0, "Café", "Lunch (team)", date)
                    .into_transaction(i.to_string().into())
            })
            .collect();
        let ledger = Ledger {
            transactions,
            monthly_budget: 100.0,
        };
        ReportGenerator::default().generate(&ReportSnapshot::from_ledger(&ledger, date))
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn output_is_well_framed() {
        let bytes = render(&document(2)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(contains(&bytes, b"/Count 1"));
        assert!(contains(&bytes, b"(PocketWise Finance Report) Tj"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = render(&document(1)).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        let xref_at: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|line| line.parse().ok())
            .unwrap();
        assert!(bytes[xref_at..].starts_with(b"xref"));

        let entries: Vec<usize> = text[xref_at..]
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 6);
        for (index, offset) in entries.iter().enumerate() {
            let header = format!("{} 0 obj", index + 1);
            assert!(bytes[*offset..].starts_with(header.as_bytes()));
        }
    }

    #[test]
    fn escapes_and_encodes_text() {
        assert_eq!(literal_string("a(b)\\"), b"(a\\(b\\)\\\\)".to_vec());
        assert_eq!(literal_string("Café €"), b"(Caf\xE9 \x80)".to_vec());
        assert_eq!(literal_string("日本"), b"(??)".to_vec());
    }

    #[test]
    fn multi_page_documents_list_every_page() {
        let bytes = render(&document(20)).unwrap();
        assert!(contains(&bytes, b"/Count 2"));
        assert!(contains(&bytes, b"/Kids [5 0 R 7 0 R]"));
    }

    #[test]
    fn rendering_is_byte_identical() {
        let doc = document(5);
        assert_eq!(render(&doc).unwrap(), render(&doc).unwrap());
    }

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(number(12.0), "12");
        assert_eq!(number(0.5), "0.5");
        assert_eq!(number(-0.001), "0");
    }
}
