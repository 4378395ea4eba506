pub mod row;
pub mod spreadsheet;

pub use row::Row;
pub use spreadsheet::CreatedSpreadsheet;
