// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Error` struct and the `ErrorKind` enum, which are
//! used to represent errors that can occur in the library.

/// A macro for defining the `ErrorKind` enum, the `Display` implementation for
/// it, and the constructors for the `Error` struct.
macro_rules! ErrorKind {
    ($(
        ($kind:ident, $ctor:ident)
    ),*) => {
        /// The kind of error that occurred.
        #[derive(Clone, Debug, PartialEq)]
        pub(crate) enum ErrorKind {
            $(
                $kind,
            )*
        }

        impl std::fmt::Display for ErrorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$kind => write!(f, "{}", stringify!($kind)),
                    )*
                }
            }
        }

        /// Constructors for [`Error`].
        impl Error {
            $(
                #[doc = concat!(
                    "Creates a new [`Error`] with the `",
                    stringify!($kind),
                    "` kind and the given description."
                )]
                pub(crate) fn $ctor(desc: impl Into<String>) -> crate::Error {
                    Self {
                        kind: ErrorKind::$kind,
                        desc: desc.into(),
                    }
                }
            )*
        }
    };
}

ErrorKind!(
    (CombinatorialLimitExceeded, combinatorial_limit_exceeded),
    (DataIntegrity, data_integrity),
    (Internal, internal),
    (ProbabilityOverflow, probability_overflow)
);

/// An error that can occur while building a [Network][crate::Network] or
/// while deriving grid states and reinforcement combinations from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    desc: String,
}

impl Error {
    /// Returns the name of the error kind, e.g. `"DataIntegrity"`.
    pub fn kind_name(&self) -> String {
        self.kind.to_string()
    }

    /// Returns the description of the error.
    pub fn message(&self) -> &str {
        &self.desc
    }

    /// Returns true if the error only affects a single grid state, and the
    /// results for other states remain usable.
    pub fn is_state_local(&self) -> bool {
        self.kind == ErrorKind::CombinatorialLimitExceeded
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.desc)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::data_integrity("Branch 3 references unknown bus 9.");
        assert_eq!(
            err.to_string(),
            "DataIntegrity: Branch 3 references unknown bus 9."
        );
        assert_eq!(err.kind_name(), "DataIntegrity");
        assert_eq!(err.message(), "Branch 3 references unknown bus 9.");
        assert!(!err.is_state_local());

        let err = Error::combinatorial_limit_exceeded("too many");
        assert!(err.is_state_local());
        assert_eq!(err.to_string(), "CombinatorialLimitExceeded: too many");
    }
}
