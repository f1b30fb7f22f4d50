//! The closed set of HTTP verbs a pending call can use.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// HTTP verb selected for a queued call.
///
/// Maps one-to-one onto the client's request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Verb {
    /// All verbs, in declaration order.
    pub const ALL: [Self; 4] = [Self::Get, Self::Post, Self::Put, Self::Delete];

    /// Returns the upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Verb> for http::Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Self::GET,
            Verb::Post => Self::POST,
            Verb::Put => Self::PUT,
            Verb::Delete => Self::DELETE,
        }
    }
}

/// Error returned when a string names no known verb.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown HTTP verb '{0}': expected get, post, put, or delete")]
pub struct ParseVerbError(pub String);

impl FromStr for Verb {
    type Err = ParseVerbError;

    /// Parses a verb name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseVerbError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("get".parse::<Verb>(), Ok(Verb::Get));
        assert_eq!("POST".parse::<Verb>(), Ok(Verb::Post));
        assert_eq!(" Put ".parse::<Verb>(), Ok(Verb::Put));
        assert_eq!("delete".parse::<Verb>(), Ok(Verb::Delete));
    }

    #[test]
    fn rejects_unknown_verb() {
        let err = "patch".parse::<Verb>().unwrap_err();

        assert_eq!(err, ParseVerbError("patch".to_string()));
        assert!(err.to_string().contains("patch"));
    }

    #[test]
    fn maps_onto_http_methods() {
        for verb in Verb::ALL {
            let method: http::Method = verb.into();
            assert_eq!(method.as_str(), verb.as_str());
        }
    }

    #[test]
    fn display_matches_method_name() {
        assert_eq!(Verb::Delete.to_string(), "DELETE");
    }
}
