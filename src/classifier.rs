//! Mapping of the provider errors to retry relevant categories.
//!
//! The mapping is a table of rules, checked in order, so new provider messages can be
//! supported by adding a rule with [`Classifier::with_rule`].

use crate::codec::SUCCESS;
use crate::error::{Error, RemoteError};
use crate::OperationResult;
use std::borrow::Cow;

/// Category of a failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Transient,
    RateLimited,
    NotFound,
    QuotaExceeded,
    AuthFailed,
    Fatal,
}

impl ErrorClass {
    /// Only transient failures and rate limits are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient | Self::RateLimited)
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Transient => "transient",
            Self::RateLimited => "rate-limited",
            Self::NotFound => "not-found",
            Self::QuotaExceeded => "quota-exceeded",
            Self::AuthFailed => "auth-failed",
            Self::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// HTTP status code of the response
    Code(u16),
    /// Case insensitive substring of the provider message
    Message(Cow<'static, str>),
}

impl Pattern {
    pub fn message<M: Into<Cow<'static, str>>>(value: M) -> Self {
        Self::Message(value.into())
    }

    fn matches(&self, error: &RemoteError, message: &str) -> bool {
        match self {
            Self::Code(code) => error.code == Some(*code),
            Self::Message(pattern) => message.contains(pattern.to_lowercase().as_str()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub pattern: Pattern,
    pub class: ErrorClass,
}

impl Rule {
    pub fn code(code: u16, class: ErrorClass) -> Self {
        Self {
            pattern: Pattern::Code(code),
            class,
        }
    }

    pub fn message<M: Into<Cow<'static, str>>>(message: M, class: ErrorClass) -> Self {
        Self {
            pattern: Pattern::message(message),
            class,
        }
    }
}

const DEFAULT_CODES: &[(u16, ErrorClass)] = &[
    (401, ErrorClass::AuthFailed),
    (403, ErrorClass::AuthFailed),
    (404, ErrorClass::NotFound),
    (413, ErrorClass::QuotaExceeded),
    (429, ErrorClass::RateLimited),
    (509, ErrorClass::RateLimited),
    (500, ErrorClass::Transient),
    (502, ErrorClass::Transient),
    (503, ErrorClass::Transient),
    (504, ErrorClass::Transient),
];

const DEFAULT_MESSAGES: &[(&str, ErrorClass)] = &[
    ("flood detected", ErrorClass::RateLimited),
    ("rate limit", ErrorClass::RateLimited),
    ("too many requests", ErrorClass::RateLimited),
    ("not authenticated", ErrorClass::AuthFailed),
    ("invalid api key", ErrorClass::AuthFailed),
    ("bad credentials", ErrorClass::AuthFailed),
    ("forbidden", ErrorClass::AuthFailed),
    ("not found", ErrorClass::NotFound),
    ("does not exist", ErrorClass::NotFound),
    ("not exists", ErrorClass::NotFound),
    ("quota", ErrorClass::QuotaExceeded),
    ("not enough space", ErrorClass::QuotaExceeded),
    ("timeout", ErrorClass::Transient),
    ("timed out", ErrorClass::Transient),
    ("try again", ErrorClass::Transient),
    ("temporarily unavailable", ErrorClass::Transient),
    ("internal server error", ErrorClass::Transient),
    ("bad gateway", ErrorClass::Transient),
    ("service unavailable", ErrorClass::Transient),
];

#[derive(Clone, Debug)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        let rules = DEFAULT_CODES
            .iter()
            .map(|(code, class)| Rule::code(*code, *class))
            .chain(
                DEFAULT_MESSAGES
                    .iter()
                    .map(|(message, class)| Rule::message(*message, *class)),
            )
            .collect();
        Self { rules }
    }
}

impl Classifier {
    /// A classifier without any rule, classifying everything as [`ErrorClass::Fatal`]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Adds a rule checked before the existing ones
    pub fn set_rule(&mut self, rule: Rule) {
        self.rules.insert(0, rule);
    }

    /// Adds a rule checked before the existing ones
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.set_rule(rule);
        self
    }

    /// Classifies an error returned by the provider.
    ///
    /// Anything no rule matches is considered [`ErrorClass::Fatal`].
    pub fn classify(&self, error: &RemoteError) -> ErrorClass {
        let message = error.message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(error, &message))
            .map(|rule| rule.class)
            .unwrap_or(ErrorClass::Fatal)
    }

    /// Classifies the envelope of a mutating call, `None` when it reports a success
    pub fn inspect(&self, result: &OperationResult) -> Option<ErrorClass> {
        if result.status == SUCCESS {
            None
        } else {
            Some(self.classify(&RemoteError::new(
                result.status.as_str(),
                result.message.as_str(),
            )))
        }
    }

    /// Classifies any failure of an attempt, `None` when it was cancelled
    pub fn classify_error(&self, error: &Error) -> Option<ErrorClass> {
        match error {
            Error::Remote(inner) => Some(self.classify(inner)),
            Error::Transport(_) => Some(ErrorClass::Transient),
            Error::Decode(_) | Error::Encode(_) => Some(ErrorClass::Fatal),
            Error::Cancelled => None,
        }
    }
}
