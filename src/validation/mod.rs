//! Validation-based checks for user-supplied settings.
//!
//! Settings made of several fields (a floor range, a configuration file)
//! are checked with Stillwater's `Validation` so that ALL problems are
//! reported together instead of one at a time.
//!
//! # Example
//!
//! ```rust
//! use liftsim::validation::{validate_range, Bound, RangeViolation};
//!
//! let errors = validate_range("abc", "inf").unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert!(matches!(errors[0], RangeViolation::Unparsable { bound: Bound::Min, .. }));
//! assert!(matches!(errors[1], RangeViolation::NonFinite { bound: Bound::Max }));
//!
//! let range = validate_range("-20", "150").unwrap();
//! assert_eq!((range.min(), range.max()), (-20, 150));
//! ```

mod range;

pub use range::{validate_range, Bound, RangeViolation};
