//! Precomputed lookup layer.
//!
//! Everything a search touches in its hot loop is resolved ahead of time:
//! per-hand-size action lists, the combo value of every nonempty <=5-card
//! subset of the universe, and the best value achievable by any
//! sub-selection of such a subset. Tables are built once per process (or
//! loaded from durable artifacts) and shared read-only with every task.

pub mod actions;
pub mod store;
pub mod tables;

pub use actions::{ActionSpace, MAX_HAND_SIZE};
pub use store::{StoreError, TableStore};
pub use tables::ComboTables;

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared one-time table build for unit tests across modules.

    use super::ComboTables;
    use std::sync::OnceLock;

    static TABLES: OnceLock<ComboTables> = OnceLock::new();

    pub(crate) fn tables() -> &'static ComboTables {
        TABLES.get_or_init(ComboTables::build)
    }
}
