//! SQL generation module
//!
//! Builds `INSERT ... SELECT ... ON CONFLICT ...` statements that load raw
//! MDS records from a staging table into the normalized `status_changes` and
//! `trips` tables.
//!
//! Statements are plain strings. Table names and conflict clauses are
//! interpolated as given; callers are responsible for any escaping.

mod statements;

pub use statements::{
    insert_from, insert_status_changes_from, insert_trips_from, on_conflict_statement,
    ConflictActions, OnConflict,
};

#[cfg(test)]
mod tests;
