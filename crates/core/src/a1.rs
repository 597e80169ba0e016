//! A1-notation helpers for spreadsheet ranges.

/// Column letters for a zero-based column index (`0` → `A`, `26` → `AA`).
pub fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Quote a sheet name for use in a range, doubling embedded quotes.
fn quote_sheet(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

/// Range covering a whole sheet, or the first sheet when `sheet` is `None`.
pub fn whole_sheet(sheet: Option<&str>) -> String {
    match sheet {
        Some(name) => quote_sheet(name),
        // Without a sheet name the API resolves ranges against the first sheet.
        None => "A:ZZZ".to_string(),
    }
}

/// Single-cell range for zero-based `row` / `col`.
pub fn cell_range(sheet: Option<&str>, row: usize, col: usize) -> String {
    let a1 = format!("{}{}", column_letters(col), row + 1);
    match sheet {
        Some(name) => format!("{}!{a1}", quote_sheet(name)),
        None => a1,
    }
}
