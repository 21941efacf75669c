//! CSV export and header-mapped import for categories.
//!
//! Export always writes the canonical header. Import maps columns by header
//! name (case-insensitive, with a few aliases), so column order and extra
//! columns do not matter. Quoted fields may contain commas, doubled quotes
//! and newlines.

use serde::Serialize;

use crate::error::CoreError;
use crate::slug::{generate_slug, validate_color, validate_name, validate_slug};

/// Canonical export columns, in order.
pub const CSV_COLUMNS: &[&str] = &[
    "name",
    "slug",
    "description",
    "color",
    "icon",
    "parent_slug",
    "sort_order",
    "is_active",
];

/// One category as it appears in a CSV file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCsvRow {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_slug: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// A data row that failed to parse; `line` is 1-based and counts the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvRowError {
    pub line: usize,
    pub message: String,
}

/// Parsed rows (with their source line) plus per-row errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCategoryCsv {
    pub rows: Vec<(usize, CategoryCsvRow)>,
    pub errors: Vec<CsvRowError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Slug,
    Description,
    Color,
    Icon,
    ParentSlug,
    SortOrder,
    IsActive,
}

fn column_for_header(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-'], "_");
    match normalized.as_str() {
        "name" | "title" => Some(Column::Name),
        "slug" => Some(Column::Slug),
        "description" => Some(Column::Description),
        "color" | "colour" => Some(Column::Color),
        "icon" => Some(Column::Icon),
        "parent_slug" | "parent" => Some(Column::ParentSlug),
        "sort_order" | "order" | "position" => Some(Column::SortOrder),
        "is_active" | "active" | "enabled" => Some(Column::IsActive),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Render categories as CSV text with the canonical header.
pub fn build_category_csv(rows: &[CategoryCsvRow]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_COLUMNS.join(","));
    out.push('\n');

    for row in rows {
        let fields = [
            csv_escape(&row.name),
            csv_escape(&row.slug),
            csv_escape(row.description.as_deref().unwrap_or("")),
            csv_escape(row.color.as_deref().unwrap_or("")),
            csv_escape(row.icon.as_deref().unwrap_or("")),
            csv_escape(row.parent_slug.as_deref().unwrap_or("")),
            row.sort_order.to_string(),
            row.is_active.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// Quote a field if it contains a delimiter, quote, newline or edge
/// whitespace. Quoted fields are read back verbatim.
pub fn csv_escape(value: &str) -> String {
    let needs_quotes = value.contains([',', '"', '\n', '\r'])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Parse category CSV text.
///
/// Fails as a whole only when the header is unusable (empty, no `name`
/// column, or a duplicated column). Individual bad rows are collected in
/// [`ParsedCategoryCsv::errors`] and skipped.
pub fn parse_category_csv(text: &str) -> Result<ParsedCategoryCsv, CoreError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = split_records(text).into_iter();

    let (_, header) = records
        .next()
        .ok_or_else(|| CoreError::validation("CSV is empty"))?;

    let mut mapping: Vec<Option<Column>> = Vec::with_capacity(header.len());
    for h in header.iter().map(|f| f.text.as_str()) {
        let col = column_for_header(h);
        if let Some(c) = col {
            if mapping.contains(&Some(c)) {
                return Err(CoreError::validation(format!(
                    "CSV header maps column '{}' more than once",
                    h.trim()
                )));
            }
        }
        mapping.push(col);
    }
    if !mapping.contains(&Some(Column::Name)) {
        return Err(CoreError::validation("CSV header must include a 'name' column"));
    }

    let mut parsed = ParsedCategoryCsv::default();

    for (line, values) in records {
        if values.iter().all(|v| !v.quoted && v.text.is_empty()) {
            continue;
        }
        match parse_row(&mapping, &values) {
            Ok(row) => parsed.rows.push((line, row)),
            Err(message) => parsed.errors.push(CsvRowError { line, message }),
        }
    }

    Ok(parsed)
}

fn parse_row(mapping: &[Option<Column>], values: &[CsvField]) -> Result<CategoryCsvRow, String> {
    let mut row = CategoryCsvRow {
        name: String::new(),
        slug: String::new(),
        description: None,
        color: None,
        icon: None,
        parent_slug: None,
        sort_order: 0,
        is_active: true,
    };

    for (i, col) in mapping.iter().enumerate() {
        let Some(col) = col else { continue };
        let field = values.get(i);
        let raw = field.map_or("", |f| f.text.trim());
        let opt = (!raw.is_empty()).then(|| raw.to_string());
        // Free text keeps quoted whitespace.
        let text = field
            .map(|f| f.text.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        match col {
            Column::Name => row.name = raw.to_string(),
            Column::Slug => row.slug = raw.to_string(),
            Column::Description => row.description = text,
            Column::Color => row.color = opt,
            Column::Icon => row.icon = text,
            Column::ParentSlug => row.parent_slug = opt,
            Column::SortOrder => {
                if !raw.is_empty() {
                    row.sort_order = raw
                        .parse()
                        .map_err(|_| format!("Invalid sort_order '{raw}'"))?;
                }
            }
            Column::IsActive => {
                if !raw.is_empty() {
                    row.is_active = parse_bool(raw)
                        .ok_or_else(|| format!("Invalid is_active value '{raw}'"))?;
                }
            }
        }
    }

    validate_name("name", &row.name).map_err(core_message)?;
    if row.slug.is_empty() {
        row.slug = generate_slug(&row.name);
    }
    validate_slug(&row.slug).map_err(core_message)?;
    validate_color(row.color.as_deref()).map_err(core_message)?;
    if row.parent_slug.as_deref() == Some(row.slug.as_str()) {
        return Err(format!("Category '{}' cannot be its own parent", row.slug));
    }

    Ok(row)
}

fn core_message(err: CoreError) -> String {
    match err {
        CoreError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// One parsed CSV field. Unquoted fields are trimmed; quoted fields keep
/// their content exactly.
#[derive(Debug, Clone, PartialEq)]
struct CsvField {
    text: String,
    quoted: bool,
}

impl CsvField {
    fn finish(text: String, quoted: bool) -> Self {
        if quoted {
            Self { text, quoted }
        } else {
            Self {
                text: text.trim().to_string(),
                quoted,
            }
        }
    }
}

/// Split CSV text into records, each tagged with its starting line number.
///
/// Whitespace around a quoted value (outside the quotes) is dropped.
fn split_records(text: &str) -> Vec<(usize, Vec<CsvField>)> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    current.push('\n');
                }
                _ => current.push(ch),
            }
            continue;
        }

        match ch {
            '"' if !quoted && current.trim().is_empty() => {
                current.clear();
                quoted = true;
                in_quotes = true;
            }
            ',' => {
                fields.push(CsvField::finish(std::mem::take(&mut current), quoted));
                quoted = false;
            }
            '\r' => {}
            '\n' => {
                fields.push(CsvField::finish(std::mem::take(&mut current), quoted));
                quoted = false;
                records.push((record_line, std::mem::take(&mut fields)));
                line += 1;
                record_line = line;
            }
            c if quoted && c.is_whitespace() => {}
            _ => current.push(ch),
        }
    }

    if !current.is_empty() || quoted || !fields.is_empty() {
        fields.push(CsvField::finish(current, quoted));
        records.push((record_line, fields));
    }

    records
}
