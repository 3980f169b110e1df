use polars::prelude::*;
use std::io::Seek;
use std::path::Path;

mod error;
pub mod metadata;
pub mod normalize;
pub mod position;
pub mod query;
pub mod record;
pub mod table;

pub use error::Error;
pub use metadata::UniqueValues;
pub use normalize::Scale;
pub use position::{category_of, PositionCategory};
pub use query::{PlayerQuery, Selection};
pub use record::PlayerRecord;
pub use table::Table;

pub type Result<T> = std::result::Result<T, error::Error>;

/// Column names the dataset is expected to use.
pub mod columns {
    pub const PLAYER: &str = "Player";
    pub const SQUAD: &str = "Squad";
    pub const COMPETITION: &str = "Comp";
    pub const POSITION: &str = "Pos";
    pub const AGE: &str = "Age";
    pub const MINUTES: &str = "Min";

    pub const GOALS: &str = "Gls";
    pub const ASSISTS: &str = "Ast";

    /// Columns every table must carry.
    pub const REQUIRED: [&str; 6] = [PLAYER, SQUAD, COMPETITION, POSITION, AGE, MINUTES];
    pub(crate) const TEXT: [&str; 4] = [PLAYER, SQUAD, COMPETITION, POSITION];
    pub(crate) const NUMERIC: [&str; 2] = [AGE, MINUTES];
}

/// Reads a delimited file with a header row into a frame. Every record must
/// have exactly as many fields as the header.
pub fn load_csv<P: AsRef<Path>>(path: P, separator: u8) -> Result<DataFrame> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path)?;
    check_field_counts(&file, separator).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    file.rewind()?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|opts| opts.with_separator(separator))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source: source.into(),
        })?;
    Ok(df)
}

/// Polars pads short rows with nulls; the csv reader rejects any record whose
/// length differs from the header's.
fn check_field_counts(
    file: &std::fs::File,
    separator: u8,
) -> std::result::Result<(), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(true)
        .from_reader(file);
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {}
    Ok(())
}
