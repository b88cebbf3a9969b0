//! Display/FromStr generation for the lifecycle enums used by the remote layer
//!
//! Operation kinds, operation statuses and health statuses all travel to the
//! monitoring view as lowercase labels and come back from config files or env
//! vars as free-form text. This macro keeps both directions in one place.
//!
//! # Example
//!
//! ```rust
//! use trackvault_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ExportState {
//!     Queued,
//!     Copying,
//!     Done,
//! }
//!
//! impl_domain_status_conversions!(ExportState {
//!     Queued => "queued",
//!     Copying => "copying",
//!     Done => "done",
//! });
//!
//! assert_eq!(ExportState::Copying.to_string(), "copying");
//! assert_eq!("DONE".parse::<ExportState>(), Ok(ExportState::Done));
//! ```

/// Implements `Display` and case-insensitive `FromStr` for a fieldless enum.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum ProbeState {
        Idle,
        Probing,
    }

    impl_domain_status_conversions!(ProbeState {
        Idle => "idle",
        Probing => "probing",
    });

    #[test]
    fn display_uses_lowercase_label() {
        assert_eq!(ProbeState::Idle.to_string(), "idle");
        assert_eq!(ProbeState::Probing.to_string(), "probing");
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(ProbeState::from_str("PROBING").unwrap(), ProbeState::Probing);
        assert_eq!(ProbeState::from_str(" Idle ").unwrap(), ProbeState::Idle);
    }

    #[test]
    fn parsing_rejects_unknown_labels() {
        let err = ProbeState::from_str("sleeping").unwrap_err();
        assert!(err.contains("Invalid ProbeState: sleeping"));
        assert!(ProbeState::from_str("").is_err());
    }
}
