//! Post-processing for LLM output: emphasis cleanup, emoji, per-day blocks
//! and cost-table parsing. Everything here is pure.

use fancy_regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Title of the block that precedes the first `### Day` heading.
pub const PREAMBLE_TITLE: &str = "Here is your personalised trip";

const DAY_MARKER: &str = "### Day";

/// Applied in order. Bullets first, then triple, double and single emphasis.
/// A bullet needs blank space after its stars and never spans a newline, so
/// `**Total**` at the start of a line stays text and blank lines survive.
static EMPHASIS_RULES: &[(&str, &str)] = &[
    (r"(?m)^[ \t]*\*+[ \t]+", "- "),
    (r"\*\*\*(.*?)\*\*\*", "$1"),
    (r"\*\*(.*?)\*\*", "$1"),
    (r"\*(.*?)\*", "$1"),
];

/// Keyword → emoji, applied in this order.
pub static EMOJI_MAP: &[(&str, &str)] = &[
    ("hiking", "🥾"),
    ("beach", "🏖️"),
    ("museum", "🏛️"),
    ("temple", "🛕"),
    ("castle", "🏰"),
    ("food", "🍜"),
    ("mountain", "⛰️"),
    ("shopping", "🛍️"),
    ("waterfall", "💧"),
    ("sunset", "🌇"),
    ("nature", "🌿"),
    ("road trip", "🚗"),
    ("trek", "🥾"),
    ("kayak", "🛶"),
    ("spa", "💆"),
    ("wine", "🍷"),
    ("boat", "⛵"),
    ("photography", "📸"),
];

/// Strip markdown emphasis markers. Leading `*` bullets become `- `,
/// `***x***`, `**x**` and `*x*` become `x`, and any stray `*` is dropped.
pub fn clean_asterisks(text: &str) -> String {
    static COMPILED: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
        EMPHASIS_RULES
            .iter()
            .filter_map(|(pattern, rep)| Regex::new(pattern).ok().map(|r| (r, *rep)))
            .collect()
    });

    let mut out = text.to_string();
    for (regex, rep) in COMPILED.iter() {
        out = regex.replace_all(&out, *rep).into_owned();
    }
    out.replace('*', "")
}

/// Prefix every activity keyword with its emoji. Matching is case-sensitive.
pub fn add_emojis(text: &str) -> String {
    EMOJI_MAP
        .iter()
        .fold(text.to_string(), |acc, (keyword, emoji)| {
            acc.replace(keyword, &format!("{emoji} {keyword}"))
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBlock {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<String>,
}

/// Split an itinerary on `### Day` headings.
///
/// Block 0 is the preamble. Blank blocks are skipped but still count, so
/// titles always match the position of the heading in the text.
pub fn split_days(text: &str) -> Vec<DayBlock> {
    text.split(DAY_MARKER)
        .enumerate()
        .filter_map(|(i, block)| {
            let block = block.trim();
            if block.is_empty() {
                return None;
            }
            let mut lines = block.lines();
            let first = lines.next().unwrap_or_default();

            let (title, subtitle) = if i == 0 {
                (PREAMBLE_TITLE.to_string(), heading_text(first))
            } else {
                (format!("Day {i}"), heading_text(strip_day_number(first)))
            };

            let items = lines
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(|l| clean_asterisks(strip_bullet(l)).trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();

            Some(DayBlock {
                title,
                subtitle,
                items,
            })
        })
        .collect()
}

fn heading_text(line: &str) -> String {
    clean_asterisks(line.trim().trim_start_matches('#'))
        .trim()
        .to_string()
}

/// " 2: Old Town" → "Old Town"
fn strip_day_number(line: &str) -> &str {
    line.trim_start()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches([':', '-', '.', '–', '—', ' '])
}

fn strip_bullet(line: &str) -> &str {
    match line.strip_prefix(['-', '*', '•']) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => line,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CostTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Text around the table, emphasis stripped.
    pub notes: Vec<String>,
}

impl CostTable {
    pub fn has_table(&self) -> bool {
        !self.headers.is_empty()
    }
}

/// Parse a pipe-delimited markdown table. Rows are padded or truncated to
/// the header width.
pub fn parse_cost_table(text: &str) -> CostTable {
    let mut table = CostTable::default();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("```") {
            continue;
        }
        if !line.starts_with('|') {
            let note = clean_asterisks(line).trim().to_string();
            if !note.is_empty() {
                table.notes.push(note);
            }
            continue;
        }

        let cells: Vec<String> = line
            .trim_matches('|')
            .split('|')
            .map(|c| clean_asterisks(c.trim()).trim().to_string())
            .collect();

        if is_separator_row(&cells) {
            continue;
        }
        if table.headers.is_empty() {
            table.headers = cells;
        } else {
            let mut row = cells;
            row.resize(table.headers.len(), String::new());
            table.rows.push(row);
        }
    }

    table
}

fn is_separator_row(cells: &[String]) -> bool {
    cells.iter().any(|c| !c.is_empty())
        && cells
            .iter()
            .all(|c| c.chars().all(|ch| matches!(ch, '-' | ':' | ' ')))
}

/// Uppercase the first letter of each alphabetic run and lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
