//! Status and classification tags for deduction runs.
//!
//! These are plain tagged values. Any status may be replaced by any other;
//! no transition rules are enforced.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// All values, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Lowercase string form used in storage and JSON.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(Error::InvalidStatus(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

string_enum! {
    /// Lifecycle tag of a deduction plan.
    DeductionStatus {
        #[doc = "Configured but never started."]
        Inactive => "inactive",
        Running => "running",
        Finished => "finished",
        Error => "error",
    }
}

string_enum! {
    /// Health of a running deduction task.
    TaskState {
        Unknown => "unknown",
        Normal => "normal",
        Abnormal => "abnormal",
        /// The task has stopped.
        Terminal => "terminal",
    }
}

string_enum! {
    /// Kind of a task log message.
    TaskLogKind {
        Log => "log",
        Event => "event",
        /// Chart payload rendered by the front end.
        Echart => "echart",
    }
}

string_enum! {
    /// Severity of a task log message.
    TaskLogLevel {
        Info => "info",
        Warning => "warning",
        Error => "error",
        Critical => "critical",
    }
}

impl Default for DeductionStatus {
    fn default() -> Self {
        Self::Inactive
    }
}

impl Default for TaskState {
    fn default() -> Self {
        Self::Unknown
    }
}
