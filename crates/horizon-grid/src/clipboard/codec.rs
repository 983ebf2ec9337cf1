//! Text formats exchanged with spreadsheet applications.
//!
//! Copies are written twice: as tab-separated text and as an HTML table.
//! Pastes prefer the HTML table, which survives cells with embedded tabs and
//! newlines better, and fall back to the plain text.

use std::iter;
use std::sync::OnceLock;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use horizon_grid_core::logging::targets;
use regex::{Captures, Regex};

// ============================================================================
// Tab-separated text
// ============================================================================

/// Encode rows of cells as tab-separated text.
///
/// Cells containing a tab, a newline or a double quote are quoted, with
/// embedded quotes doubled. Absent cells encode as empty text.
///
/// # Errors
///
/// Fails only if the writer cannot flush into memory.
pub fn encode_tsv(rows: &[Vec<Option<String>>]) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Parse tab-separated text into rows of cells.
///
/// Carriage returns are dropped, as is one trailing newline. Blank lines
/// become rows with one empty cell. A cell that starts with a double quote
/// is read as a quoted cell: it may contain tabs and newlines, and `""`
/// stands for one quote. From an opening quote that is never closed on, the
/// text is read without quoting, so its tabs and newlines still separate
/// cells.
pub fn parse_text_plain(text: &str) -> Vec<Vec<String>> {
    let clean = text.replace('\r', "");
    let clean = clean.strip_suffix('\n').unwrap_or(&clean);

    let Some(open) = unterminated_quote(clean) else {
        return read_tsv(clean, true);
    };
    tracing::debug!(target: targets::CLIPBOARD, offset = open, "unterminated quote in pasted text");
    let rest = read_tsv(&clean[open..], false);
    if open == 0 {
        return rest;
    }
    let mut rows = read_tsv(&clean[..open - 1], true);
    let mut rest = rest.into_iter();
    if clean.as_bytes()[open - 1] == b'\t'
        && let (Some(last), Some(first)) = (rows.last_mut(), rest.next())
    {
        last.extend(first);
    }
    rows.extend(rest);
    rows
}

/// Read `text` with the csv reader, keeping blank lines as rows.
///
/// The reader skips empty lines. They are the newlines it consumed ahead of
/// each record, plus whatever follows the last one.
fn read_tsv(text: &str, quoting: bool) -> Vec<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .flexible(true)
        .quoting(quoting)
        .from_reader(text.as_bytes());

    let blank_rows = |count: usize| iter::repeat_with(|| vec![String::new()]).take(count);
    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    let mut start = 0;
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                tracing::warn!(target: targets::CLIPBOARD, %err, "stopped reading pasted text");
                break;
            }
        }
        let end = usize::try_from(reader.position().byte())
            .map_or(text.len(), |end| end.min(text.len()));
        let raw = text.get(start..end).unwrap_or_default();
        rows.extend(blank_rows(raw.len() - raw.trim_start_matches('\n').len()));
        rows.push(record.iter().map(str::to_string).collect());
        start = end;
    }

    let rest = text.get(start..).unwrap_or_default();
    rows.extend(blank_rows(rest.matches('\n').count()));
    if text.is_empty() || text.ends_with('\n') {
        rows.push(vec![String::new()]);
    }
    rows
}

/// Byte offset of the first opening quote that is never closed.
///
/// Only a quote at the start of a cell opens a quoted cell, and inside one
/// `""` is an escaped quote.
fn unterminated_quote(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    let mut cell_start = true;
    while i < bytes.len() {
        match bytes[i] {
            b'"' if cell_start => {
                let open = i;
                i += 1;
                loop {
                    match bytes.get(i) {
                        None => return Some(open),
                        Some(b'"') if bytes.get(i + 1) == Some(&b'"') => i += 2,
                        Some(b'"') => break,
                        Some(_) => i += 1,
                    }
                }
                cell_start = false;
            }
            b'\t' | b'\n' => cell_start = true,
            _ => cell_start = false,
        }
        i += 1;
    }
    None
}

// ============================================================================
// HTML tables
// ============================================================================

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Encode rows of cells as an HTML table. Newlines become `<br/>`.
pub fn encode_html(rows: &[Vec<Option<String>>]) -> String {
    let mut html = String::from("<table>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            let escaped = escape_html(cell.as_deref().unwrap_or(""));
            html.push_str(&escaped.replace("\r\n", "\n").replace('\n', "<br/>"));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

struct HtmlPatterns {
    table: Regex,
    row: Regex,
    cell: Regex,
    line_break: Regex,
    source_edge: Regex,
    source_newline: Regex,
    tag: Regex,
    entity: Regex,
}

fn patterns() -> &'static HtmlPatterns {
    static PATTERNS: OnceLock<HtmlPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("static pattern compiles");
        HtmlPatterns {
            table: compile(r"(?is)<table\b[^>]*>(.*?)</table\s*>"),
            row: compile(r"(?is)<tr\b[^>]*>(.*?)</tr\s*>"),
            cell: compile(r"(?is)<t[dh]\b[^>]*>(.*?)</t[dh]\s*>"),
            line_break: compile(r"(?i)<br\s*/?>"),
            source_edge: compile(r"\A[ \t]*[\r\n][ \t\r\n]*|[ \t\r\n]*[\r\n][ \t]*\z"),
            source_newline: compile(r"[ \t]*[\r\n][ \t\r\n]*"),
            tag: compile(r"<[^>]*>"),
            entity: compile(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);"),
        }
    })
}

/// Decode the common named entities and all numeric character references.
///
/// `&nbsp;` decodes to U+00A0. Unknown entities are left as they are.
pub fn decode_entities(text: &str) -> String {
    patterns()
        .entity
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            let hex = name.strip_prefix("#x").or(name.strip_prefix("#X"));
            let decoded = if let Some(hex) = hex {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Extract the first table of an HTML fragment as rows of cell text.
///
/// Returns `None` when the fragment contains no table with at least one
/// row.
pub fn parse_text_html(html: &str) -> Option<Vec<Vec<String>>> {
    let patterns = patterns();
    let table = patterns.table.captures(html)?;
    let rows: Vec<Vec<String>> = patterns
        .row
        .captures_iter(&table[1])
        .map(|row| {
            patterns
                .cell
                .captures_iter(&row[1])
                .map(|cell| cell_text(&cell[1]))
                .collect()
        })
        .collect();
    (!rows.is_empty()).then_some(rows)
}

/// Text of one cell.
///
/// Line breaks in the HTML source are formatting: they vanish at the edges
/// of the cell or of a `<br>` line and read as one space elsewhere. Other
/// spaces belong to the cell.
fn cell_text(inner: &str) -> String {
    let patterns = patterns();
    let lines: Vec<String> = patterns
        .line_break
        .split(inner)
        .map(|line| {
            let text = patterns.source_edge.replace_all(line, "");
            let text = patterns.source_newline.replace_all(&text, " ");
            patterns.tag.replace_all(&text, "").into_owned()
        })
        .collect();
    decode_entities(&lines.join("\n"))
}
