//! # tabschema-validators — Validator Library & Registry
//!
//! Concrete validators for tabular fields and the static token registry
//! the schema compiler resolves DSL types and attributes through.
//!
//! ## Contract
//!
//! Every validator implements [`Validator`]:
//!
//! - `validate(field, row)` passes silently or records the offender in the
//!   validator's own accumulator and returns an error.
//! - `bad()` borrows the accumulator for reporting.
//! - `fail_count()` counts failed calls; `reset()` clears both.
//!
//! ## Validators
//!
//! | module       | behaviour                                               |
//! |--------------|---------------------------------------------------------|
//! | `cast`       | str, float, hex, uuid, date, timestamp, sized ints, len |
//! | `set`        | membership in a fixed value set                         |
//! | `unique`     | no repeats, optionally over a composite key             |
//! | `pattern`    | prefix-anchored or full regex match                     |
//! | `range`      | inclusive numeric range                                 |
//! | `presence`   | exactly empty / exactly non-empty                       |
//! | `permissive` | placeholders that never fail                            |
//!
//! ## Crate Policy
//!
//! - Depends only on `tabschema-core` internally.
//! - Registry lookups fail explicitly; there is no permissive default.

pub mod cast;
pub mod kind;
pub mod pattern;
pub mod permissive;
pub mod presence;
pub mod range;
pub mod registry;
pub mod set;
pub mod stringify;
pub mod unique;
pub mod validator;

pub use cast::{bytes_needed, Cast, CastValidator, IntWidth};
pub use kind::ValidatorKind;
pub use pattern::RegexValidator;
pub use permissive::{PermissiveValidator, Placeholder};
pub use presence::{EmptyValidator, NotEmptyValidator};
pub use range::RangeValidator;
pub use registry::{instantiate, lookup};
pub use set::{SetOrdering, SetValidator};
pub use stringify::{stringify_set, stringify_set_with};
pub use unique::UniqueValidator;
pub use validator::{Bad, Validator, ValidatorConfig, ValidatorState};
