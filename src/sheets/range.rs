use crate::error::{AppError, Result};

/// A1 range covering `start_at_row` through `start_at_row + row_bound` of
/// `sheet_name`, starting at column A. The column bound is left to the
/// service, so the end of the range is a bare row number.
pub(crate) fn read_range(sheet_name: &str, start_at_row: u64, row_bound: u64) -> Result<String> {
    if start_at_row == 0 {
        return Err(AppError::InvalidRange(
            "rows are one-indexed, start_at_row must be at least 1".to_string(),
        ));
    }

    let end_row = start_at_row.checked_add(row_bound).ok_or_else(|| {
        AppError::InvalidRange(format!(
            "start_at_row {} plus row bound {} overflows",
            start_at_row, row_bound
        ))
    })?;

    Ok(format!("{}!A{}:{}", sheet_name, start_at_row, end_row))
}

/// A1 range of the column window rows are appended to
pub(crate) fn append_range(sheet_name: &str, columns: &str) -> String {
    format!("{}!{}", sheet_name, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ROW_BOUND;

    #[test]
    fn test_read_range_from_first_row() {
        assert_eq!(
            read_range("Sheet1", 1, DEFAULT_ROW_BOUND).unwrap(),
            "Sheet1!A1:10000001"
        );
    }

    #[test]
    fn test_read_range_bounds_follow_start() {
        for start in [2, 37, 999_999, 4_000_000_000] {
            let range = read_range("Sheet1", start, DEFAULT_ROW_BOUND).unwrap();
            assert_eq!(
                range,
                format!("Sheet1!A{}:{}", start, start + 10_000_000),
                "range for row {}",
                start
            );
        }
    }

    #[test]
    fn test_read_range_custom_bound() {
        assert_eq!(read_range("Log", 5, 10).unwrap(), "Log!A5:15");
    }

    #[test]
    fn test_read_range_rejects_zero() {
        assert!(matches!(
            read_range("Sheet1", 0, DEFAULT_ROW_BOUND),
            Err(AppError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_read_range_overflow() {
        assert!(matches!(
            read_range("Sheet1", u64::MAX, DEFAULT_ROW_BOUND),
            Err(AppError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_append_range() {
        assert_eq!(append_range("Sheet1", "A:B"), "Sheet1!A:B");
    }
}
