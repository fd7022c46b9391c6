//! Tagged fault tree for transport and task failures.
//!
//! A [`Fault`] is an ownership-free view of what went wrong during an
//! attempt: a kind tag, a message, an optional cause chain, and, for
//! composite faults, the component sub-faults. The dispatch engine never
//! lets a fault escape to the caller; instead it searches the tree for the
//! most specific kind it understands and maps that onto a synthetic
//! response code.

use thiserror::Error;

use crate::model::ResponseCode;

/// What kind of failure a fault node describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A connection to the replica could not be established.
    Connect,
    /// The connection dropped while the request was being written.
    Send,
    /// The connection dropped while the response was being read.
    Receive,
    /// The attempt ran out of time.
    Timeout,
    /// The attempt was canceled.
    Canceled,
    /// The attempt's task panicked.
    TaskPanic,
    /// Several underlying faults combined; see [`Fault::parts`].
    Composite,
    /// Anything else.
    Other,
}

/// One node in a fault tree.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Fault {
    kind: FaultKind,
    message: String,
    #[source]
    cause: Option<Box<Fault>>,
    parts: Vec<Fault>,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
            parts: Vec::new(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Connect, message)
    }

    pub fn send(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Send, message)
    }

    pub fn receive(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Receive, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Timeout, message)
    }

    pub fn canceled(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Canceled, message)
    }

    pub fn task_panic(message: impl Into<String>) -> Self {
        Self::new(FaultKind::TaskPanic, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Other, message)
    }

    /// A fault combining several component faults.
    pub fn composite(message: impl Into<String>, parts: Vec<Fault>) -> Self {
        Self {
            kind: FaultKind::Composite,
            message: message.into(),
            cause: None,
            parts,
        }
    }

    /// Attaches an underlying cause, consuming and returning self.
    pub fn with_cause(mut self, cause: Fault) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&Fault> {
        self.cause.as_deref()
    }

    /// Component faults of a composite node; empty otherwise.
    pub fn parts(&self) -> &[Fault] {
        &self.parts
    }

    /// Finds the first node matching `predicate`.
    ///
    /// Walks the cause chain from this node down. A composite node is
    /// searched depth-first through its parts; if none of them matches, the
    /// search stops there; a composite's children are its whole story.
    pub fn find_first<F>(&self, predicate: F) -> Option<&Fault>
    where
        F: Fn(&Fault) -> bool,
    {
        self.find_first_inner(&predicate)
    }

    fn find_first_inner<'a>(&'a self, predicate: &dyn Fn(&Fault) -> bool) -> Option<&'a Fault> {
        let mut current = Some(self);
        while let Some(fault) = current {
            if predicate(fault) {
                return Some(fault);
            }
            if fault.kind == FaultKind::Composite {
                for part in &fault.parts {
                    if let Some(found) = part.find_first_inner(predicate) {
                        return Some(found);
                    }
                }
                return None;
            }
            current = fault.cause.as_deref();
        }
        None
    }

    /// True when any node in the tree matches `predicate`.
    pub fn has<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Fault) -> bool,
    {
        self.find_first(predicate).is_some()
    }

    /// Finds the first node of the given kind.
    pub fn find_kind(&self, kind: FaultKind) -> Option<&Fault> {
        self.find_first(|fault| fault.kind == kind)
    }

    /// The synthetic response code standing in for this fault.
    ///
    /// The tree is searched for the most specific kind in priority order;
    /// a fault with no recognizable node maps to `UnknownFailure`.
    pub fn response_code(&self) -> ResponseCode {
        if self.find_kind(FaultKind::Timeout).is_some() {
            ResponseCode::RequestTimeout
        } else if self.find_kind(FaultKind::Canceled).is_some() {
            ResponseCode::Canceled
        } else if self.find_kind(FaultKind::Connect).is_some() {
            ResponseCode::ConnectFailure
        } else if self.find_kind(FaultKind::Send).is_some() {
            ResponseCode::SendFailure
        } else if self.find_kind(FaultKind::Receive).is_some() {
            ResponseCode::ReceiveFailure
        } else {
            ResponseCode::UnknownFailure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_matches_root() {
        let fault = Fault::timeout("deadline elapsed");
        let found = fault.find_kind(FaultKind::Timeout);
        assert!(found.is_some());
        assert_eq!(found.map(Fault::message), Some("deadline elapsed"));
    }

    #[test]
    fn test_find_first_walks_cause_chain() {
        let fault = Fault::other("request failed")
            .with_cause(Fault::other("transport error").with_cause(Fault::connect("refused")));

        let found = fault.find_kind(FaultKind::Connect);
        assert_eq!(found.map(Fault::message), Some("refused"));
    }

    #[test]
    fn test_find_first_searches_composite_parts_depth_first() {
        let fault = Fault::composite(
            "2 attempts failed",
            vec![
                Fault::other("attempt 1").with_cause(Fault::receive("reset")),
                Fault::connect("refused"),
            ],
        );

        // The first part's chain is searched before the second part.
        let found = fault.find_first(|f| f.kind() != FaultKind::Composite && f.kind() != FaultKind::Other);
        assert_eq!(found.map(Fault::kind), Some(FaultKind::Receive));
    }

    #[test]
    fn test_find_first_stops_at_composite_without_match() {
        let fault = Fault::composite("all parts ok-ish", vec![Fault::other("nothing specific")])
            .with_cause(Fault::timeout("hidden behind composite"));

        // The composite's parts are its whole story; the cause behind it is
        // not searched.
        assert!(fault.find_kind(FaultKind::Timeout).is_none());
    }

    #[test]
    fn test_has_and_missing_kind() {
        let fault = Fault::send("broken pipe");
        assert!(fault.has(|f| f.kind() == FaultKind::Send));
        assert!(fault.find_kind(FaultKind::Timeout).is_none());
    }

    #[test]
    fn test_response_code_priority() {
        let fault = Fault::composite(
            "mixed",
            vec![Fault::connect("refused"), Fault::timeout("elapsed")],
        );
        // Timeout outranks connect failure even though connect appears first.
        assert_eq!(fault.response_code(), ResponseCode::RequestTimeout);

        assert_eq!(Fault::connect("x").response_code(), ResponseCode::ConnectFailure);
        assert_eq!(Fault::send("x").response_code(), ResponseCode::SendFailure);
        assert_eq!(Fault::receive("x").response_code(), ResponseCode::ReceiveFailure);
        assert_eq!(Fault::canceled("x").response_code(), ResponseCode::Canceled);
        assert_eq!(Fault::other("x").response_code(), ResponseCode::UnknownFailure);
        assert_eq!(Fault::task_panic("x").response_code(), ResponseCode::UnknownFailure);
    }

    #[test]
    fn test_source_chain_is_exposed() {
        use std::error::Error;

        let fault = Fault::other("outer").with_cause(Fault::connect("inner"));
        let source = fault.source().expect("cause should surface as source");
        assert_eq!(source.to_string(), "inner");
    }
}
