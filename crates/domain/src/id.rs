//! Typed identifier newtypes backed by database-assigned integers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Access the raw row id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`User`](crate::user::User).
    UserId
);

define_id!(
    /// Unique identifier for an [`Area`](crate::area::Area).
    AreaId
);

define_id!(
    /// Unique identifier for an [`Axis`](crate::axis::Axis).
    AxisId
);

define_id!(
    /// Unique identifier for a [`SubAxis`](crate::axis::SubAxis).
    SubAxisId
);

define_id!(
    /// Unique identifier for a [`Goal`](crate::goal::Goal).
    GoalId
);

define_id!(
    /// Unique identifier for an [`Evidence`](crate::evidence::Evidence) record.
    EvidenceId
);

define_id!(
    /// Unique identifier for a [`QuarterGrade`](crate::grade::QuarterGrade).
    GradeId
);

define_id!(
    /// Unique identifier for a [`SubmissionWindow`](crate::submission_window::SubmissionWindow).
    WindowId
);
