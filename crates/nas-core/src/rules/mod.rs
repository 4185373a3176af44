//! # Business Rules
//!
//! Pure decision functions. Each takes the records it needs (and `now` or a
//! day when time matters) and returns a verdict or a typed error; the store
//! applies the result.
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────────┐
//! │ conflict     │ table slot equality, lodging interval overlap            │
//! │ stock        │ ok / low / out, reorder suggestions, movements           │
//! │ invoice      │ totals, numbering, search, summary                       │
//! │ no_show      │ grace-period eligibility                                 │
//! │ lifecycle    │ reservation state machine, order line lifecycle          │
//! │ navigation   │ role → visible sections, route guard                     │
//! │ occupancy    │ derived room status, occupancy rate, dashboard           │
//! └──────────────┴──────────────────────────────────────────────────────────┘
//! ```

pub mod conflict;
pub mod invoice;
pub mod lifecycle;
pub mod navigation;
pub mod no_show;
pub mod occupancy;
pub mod stock;
