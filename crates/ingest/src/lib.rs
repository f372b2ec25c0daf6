//! Table ingestion — CSV/JSON/URL loading into typed row records, date-window
//! filtering, data-quality checks, and channel-name dictionary mapping.
//!
//! Schema validation happens once here, at the boundary: every loader checks
//! the source's header row against the record's required columns before any
//! row is deserialized. The engines downstream only ever see typed rows.

pub mod checks;
pub mod dates;
pub mod dictionary;
pub mod loader;

pub use checks::{check_no_variance, check_non_finite, NonFiniteReport};
pub use dates::{
    clamp_window, data_frequency, filter_by_date, missing_dates, parse_date, DataFrequency,
};
pub use dictionary::{ChannelDictionary, DictionaryRow};
pub use loader::{fetch_csv, fetch_json, load_json, read_csv};
