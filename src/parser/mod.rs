pub mod fixture;
pub mod record;

pub use fixture::{read_fixture, read_records, sanitize_nulls, scrub_sentinels, NULL_SENTINEL};
pub use record::{parse_record, ParsedRow, SqlValue};
