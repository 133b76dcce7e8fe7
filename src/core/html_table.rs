//! Locates the first `<table>` of an HTML document and flattens it into a
//! rectangular grid of strings with a single header row.

use crate::utils::error::{Result, SnapshotError};
use scraper::{ElementRef, Html};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Iterates the cells of column `index`, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[index].as_str())
    }
}

// Upper bounds from the HTML table model.
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

struct Cell {
    text: String,
    is_header: bool,
    colspan: usize,
    rowspan: usize,
}

struct Row {
    cells: Vec<Cell>,
}

impl Row {
    fn is_all_header(&self) -> bool {
        self.cells.iter().all(|c| c.is_header)
    }
}

pub fn parse_first_table(html: &str, source_url: &str) -> Result<RawTable> {
    let document = Html::parse_document(html);

    let table = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
        .ok_or_else(|| SnapshotError::NoTableError {
            url: source_url.to_string(),
        })?;

    table_to_raw(table)
}

fn table_to_raw(table: ElementRef<'_>) -> Result<RawTable> {
    let mut head = Vec::new();
    let mut body: Vec<Row> = Vec::new();
    let mut foot = Vec::new();

    for child in child_elements(table) {
        match child.value().name() {
            "thead" => head.extend(rows_of(child)),
            "tbody" => body.extend(rows_of(child)),
            "tfoot" => foot.extend(rows_of(child)),
            "tr" => body.extend(read_row(child)),
            _ => {}
        }
    }

    // Row groups are laid out separately so a rowspan never crosses from
    // the header into the body, or from the body into the footer.
    let leading_th = if head.is_empty() {
        body.iter().take_while(|row| row.is_all_header()).count()
    } else {
        0
    };

    let (mut header_rows, mut data) = if !head.is_empty() {
        (expand_spans(head), expand_spans(body))
    } else if leading_th > 0 {
        let rest = body.split_off(leading_th);
        (expand_spans(body), expand_spans(rest))
    } else {
        // No header markup: the first row names the columns.
        let mut grid = expand_spans(body);
        let rest = if grid.is_empty() { Vec::new() } else { grid.split_off(1) };
        (grid, rest)
    };
    data.extend(expand_spans(foot));

    if header_rows.is_empty() {
        if data.is_empty() {
            return Err(SnapshotError::ParseError {
                message: "the first table has no rows".to_string(),
            });
        }
        header_rows.push(data.remove(0));
    }

    let header_width = header_rows.iter().map(Vec::len).max().unwrap_or(0);
    let width = data.iter().map(Vec::len).max().unwrap_or(0).max(header_width);
    if header_width < width {
        tracing::warn!(
            "Header has {} columns but rows have up to {}; extra columns are unnamed",
            header_width,
            width
        );
    }

    for row in header_rows.iter_mut().chain(data.iter_mut()) {
        row.resize(width, String::new());
    }

    let header = dedupe_names(merge_header_rows(&header_rows, width));

    Ok(RawTable { header, rows: data })
}

fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children().filter_map(ElementRef::wrap)
}

fn rows_of(section: ElementRef<'_>) -> Vec<Row> {
    child_elements(section)
        .filter(|el| el.value().name() == "tr")
        .filter_map(read_row)
        .collect()
}

fn read_row(tr: ElementRef<'_>) -> Option<Row> {
    let cells: Vec<Cell> = child_elements(tr)
        .filter(|el| matches!(el.value().name(), "th" | "td"))
        .map(|el| Cell {
            text: cell_text(el),
            is_header: el.value().name() == "th",
            colspan: span(el, "colspan", MAX_COLSPAN),
            rowspan: span(el, "rowspan", MAX_ROWSPAN),
        })
        .collect();

    if cells.is_empty() {
        None
    } else {
        Some(Row { cells })
    }
}

fn cell_text(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn span(el: ElementRef<'_>, attr: &str, max: usize) -> usize {
    el.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(max))
}

/// Lays cells out on a grid, repeating `colspan` cells across columns and
/// carrying `rowspan` cells down into following rows.
fn expand_spans(rows: Vec<Row>) -> Vec<Vec<String>> {
    let mut carry: Vec<Option<(String, usize)>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for row in rows {
        let mut out = Vec::new();
        let mut cells = row.cells.into_iter();
        let mut col = 0;

        loop {
            if let Some(slot) = carry.get_mut(col) {
                if let Some((text, remaining)) = slot.take() {
                    out.push(text.clone());
                    if remaining > 1 {
                        *slot = Some((text, remaining - 1));
                    }
                    col += 1;
                    continue;
                }
            }

            if let Some(cell) = cells.next() {
                for _ in 0..cell.colspan {
                    if cell.rowspan > 1 {
                        if carry.len() <= col {
                            carry.resize(col + 1, None);
                        }
                        carry[col] = Some((cell.text.clone(), cell.rowspan - 1));
                    }
                    out.push(cell.text.clone());
                    col += 1;
                }
                continue;
            }

            // Nothing left in this row, but a rowspan further right still
            // needs its slot.
            if carry.iter().skip(col).any(Option::is_some) {
                out.push(String::new());
                col += 1;
                continue;
            }

            break;
        }

        grid.push(out);
    }

    grid
}

fn merge_header_rows(header_rows: &[Vec<String>], width: usize) -> Vec<String> {
    (0..width)
        .map(|col| {
            let mut parts: Vec<&str> = Vec::new();
            for row in header_rows {
                let part = row[col].as_str();
                if !part.is_empty() && !parts.contains(&part) {
                    parts.push(part);
                }
            }
            parts.join(" ")
        })
        .collect()
}

/// Blank names become `Unnamed: N`; repeats get `.1`, `.2`, ... suffixes.
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut used = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());

    for (index, name) in names.into_iter().enumerate() {
        let name = if name.is_empty() {
            format!("Unnamed: {}", index)
        } else {
            name
        };

        if used.insert(name.clone()) {
            out.push(name);
            continue;
        }

        let count = counts.entry(name.clone()).or_insert(0);
        loop {
            *count += 1;
            let candidate = format!("{}.{}", name, count);
            if used.insert(candidate.clone()) {
                out.push(candidate);
                break;
            }
        }
    }

    out
}
