use serde::{Deserialize, Serialize};

/// A rectangular-ish block of spreadsheet values. Row 0 is the header when
/// the grid came from a whole-sheet read; trailing empty cells may be absent.
pub type Grid = Vec<Vec<CellValue>>;

/// One unformatted spreadsheet cell value.
///
/// The hosted spreadsheet API returns checkboxes as JSON booleans when read
/// with unformatted rendering, which is what makes the strict boolean
/// check in [`CellValue::is_checked`] possible.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Decode a cell from the JSON value the spreadsheet API returns.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Empty,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Empty),
            serde_json::Value::String(s) if s.is_empty() => Self::Empty,
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Encode for a `values` write.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Empty => serde_json::Value::String(String::new()),
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::json!(n),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// True only for a boolean `true`. `"TRUE"`, `1` and friends do not count.
    pub fn is_checked(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// Blank cells and whitespace-only text are empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display form of the value, trimmed. Whole numbers render without a
    /// fractional part.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

/// Cell at `col` of `row`, treating missing trailing cells as empty.
pub fn cell(row: &[CellValue], col: usize) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    row.get(col).unwrap_or(&EMPTY)
}

/// A folder, document or spreadsheet on the hosted platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: String,
    pub name: String,
    /// Browser link (`webViewLink`).
    pub url: String,
}
