//! XLSX (Excel) workbook reading for table and chart assets.
//!
//! Only the first worksheet is read. Its first non-empty row becomes the
//! header row and every following non-empty row a data row.
//!
//! # Example
//!
//! ```no_run
//! let data = deckgen::xlsx::read_table("data.xlsx")?;
//! println!("{} rows x {} columns", data.row_count(), data.column_count());
//! # Ok::<(), deckgen::Error>(())
//! ```

mod reader;
mod shared_strings;

pub use reader::{read_table, WorkbookReader};
