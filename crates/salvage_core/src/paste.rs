//! Best-effort extraction of salvage items from text copied out of a game
//! inventory window.
//!
//! Every non-blank line is offered to an ordered list of matchers. The first
//! matcher that recognises the line decides its name and quantity; more
//! constrained layouts come first so that a trailing price column is never
//! taken for the quantity. Lines nobody recognises are dropped silently.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::item::SalvageItem;

/// Line layouts understood by the parser, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasteFormat {
    /// `Name<TAB|2+ spaces>Qty<space>Group  Category  Volume  Price`
    MultiColumn,
    /// `Name Qty Something` with single spaces allowed before the quantity.
    TrailingColumns,
    /// `Name x120` or `Name x 120`.
    XShorthand,
    /// `Name<TAB|2+ spaces>Qty`
    WideTrailingNumber,
    /// `Name Qty`
    TrailingNumber,
}

impl PasteFormat {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::MultiColumn => "multi_column",
            Self::TrailingColumns => "trailing_columns",
            Self::XShorthand => "x_shorthand",
            Self::WideTrailingNumber => "wide_trailing_number",
            Self::TrailingNumber => "trailing_number",
        }
    }
}

impl fmt::Display for PasteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Help text listing the accepted layouts, for front ends that found nothing.
pub const SUPPORTED_FORMATS_HELP: &str = "No valid items found. Supported formats:\n\
\n\
  * inventory multi-column: Item Name    3    Salvaged Materials...\n\
  * x-separator: Item Name x123\n\
  * space/tab separated: Item Name  123";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawMatch<'a> {
    name: &'a str,
    quantity: &'a str,
}

type Matcher = for<'a> fn(&'a str) -> Option<RawMatch<'a>>;

const MATCHERS: [(PasteFormat, Matcher); 5] = [
    (PasteFormat::MultiColumn, match_multi_column),
    (PasteFormat::TrailingColumns, match_trailing_columns),
    (PasteFormat::XShorthand, match_x_shorthand),
    (PasteFormat::WideTrailingNumber, match_wide_trailing_number),
    (PasteFormat::TrailingNumber, match_trailing_number),
];

// `\s` is Unicode-aware so NBSP and em-space separators from copied
// windows count as whitespace; quantities stay ASCII `[0-9]`.
static MULTI_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(.+?)(?:\t+|\s{2,})([0-9]+)\s.+$"));
static TRAILING_COLUMNS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(.+?)\s+([0-9]+)\s+\S.+$"));
static X_SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^(.+?)\s+x\s*([0-9]+)$"));
static WIDE_TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(.+?)\s{2,}([0-9]+)$"));
static TRAILING_NUMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"^(.+?)\s+([0-9]+)$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("paste matcher patterns are valid")
}

fn capture_pair<'a>(re: &Regex, line: &'a str) -> Option<RawMatch<'a>> {
    let caps = re.captures(line)?;
    Some(RawMatch {
        name: caps.get(1)?.as_str(),
        quantity: caps.get(2)?.as_str(),
    })
}

fn match_multi_column(line: &str) -> Option<RawMatch<'_>> {
    capture_pair(&MULTI_COLUMN, line)
}

fn match_trailing_columns(line: &str) -> Option<RawMatch<'_>> {
    capture_pair(&TRAILING_COLUMNS, line)
}

fn match_x_shorthand(line: &str) -> Option<RawMatch<'_>> {
    capture_pair(&X_SHORTHAND, line)
}

fn match_wide_trailing_number(line: &str) -> Option<RawMatch<'_>> {
    capture_pair(&WIDE_TRAILING_NUMBER, line)
}

fn match_trailing_number(line: &str) -> Option<RawMatch<'_>> {
    capture_pair(&TRAILING_NUMBER, line)
}

/// Outcome of parsing a whole paste, with a tally of what was ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub items: Vec<SalvageItem>,
    pub formats: Vec<PasteFormat>,
    pub skipped_lines: usize,
}

impl ParseReport {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parses one line. Only the first matching layout is consulted: if its
/// quantity is zero or above [`SalvageItem::MAX_QUANTITY`], the line yields
/// nothing.
pub fn parse_line(line: &str) -> Option<(PasteFormat, SalvageItem)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (format, raw) = MATCHERS
        .iter()
        .find_map(|(format, matcher)| matcher(trimmed).map(|raw| (*format, raw)))?;

    let name = raw.name.trim();
    let quantity = raw.quantity.parse::<u32>().ok()?;
    if name.is_empty() || quantity == 0 || quantity > SalvageItem::MAX_QUANTITY {
        return None;
    }

    Some((
        format,
        SalvageItem {
            name: name.to_string(),
            quantity,
        },
    ))
}

/// Extracts every recognisable `(name, quantity)` row from `text`, in input
/// order. Duplicate names are kept as separate entries.
pub fn parse_inventory_text(text: &str) -> Vec<SalvageItem> {
    text.split('\n')
        .filter_map(parse_line)
        .map(|(_, item)| item)
        .collect()
}

/// Same items as [`parse_inventory_text`], plus the layout each row matched
/// and the number of non-blank lines that were dropped.
pub fn parse_inventory_report(text: &str) -> ParseReport {
    let mut report = ParseReport::default();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some((format, item)) => {
                report.formats.push(format);
                report.items.push(item);
            }
            None => report.skipped_lines += 1,
        }
    }
    report
}
