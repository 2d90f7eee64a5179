//! Path matching against the flat route table.
//!
//! # Responsibilities
//! - Compile absolute paths into literal / parameter segments
//! - Find the first entry matching a (method, path) pair exactly
//! - Pick the best NOT_FOUND fallback by longest matched prefix
//!
//! # Design Decisions
//! - No variable-length matching: segment counts must be equal
//! - First match in table order wins; declaration order is load-bearing
//! - Fallback ties on prefix length go to the shorter (more specific) pattern
//! - Linear scans; tables are small and built once

use crate::http::{Context, ParamValue};
use crate::routing::handler::BoxedHandler;
use crate::routing::route::Verb;
use crate::routing::router::FlatEntry;

/// One segment of a compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(raw.to_string()),
        }
    }

    /// Whether this pattern segment accepts `value`.
    fn accepts(&self, value: &str) -> bool {
        match self {
            Segment::Literal(literal) => literal == value,
            Segment::Param(_) => true,
        }
    }
}

/// A compiled absolute path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(Segment::parse)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Match every segment, binding parameters. `None` on any literal mismatch
    /// or a different segment count.
    pub fn captures(&self, path: &[&str]) -> Option<Context> {
        if self.segments.len() != path.len() {
            return None;
        }
        let mut context = Context::new();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    context.insert(name.clone(), ParamValue::parse(value));
                }
            }
        }
        Some(context)
    }

    /// Number of leading segments accepted before the first literal mismatch.
    ///
    /// Parameters count even past the end of `path`; a literal needs an
    /// equal segment.
    pub fn matched_prefix(&self, path: &[&str]) -> usize {
        self.segments
            .iter()
            .enumerate()
            .take_while(|(i, segment)| match path.get(*i) {
                Some(value) => segment.accepts(value),
                None => matches!(segment, Segment::Param(_)),
            })
            .count()
    }

    /// Whether every path this pattern can match is also matched by `self`.
    pub(crate) fn covers(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(mine, theirs)| match (mine, theirs) {
                (Segment::Param(_), _) => true,
                (Segment::Literal(a), Segment::Literal(b)) => a == b,
                (Segment::Literal(_), Segment::Param(_)) => false,
            })
    }

    /// Canonical text with every parameter renamed to `:match`.
    pub(crate) fn normalized(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(literal) => format!("/{}", literal),
                Segment::Param(_) => "/:match".to_string(),
            })
            .collect()
    }
}

struct Candidate {
    verb: Verb,
    pattern: PathPattern,
    handler: BoxedHandler,
}

impl Candidate {
    fn from_entry(entry: &FlatEntry) -> Self {
        Self {
            verb: entry.method,
            pattern: PathPattern::parse(&entry.path),
            handler: std::sync::Arc::clone(&entry.handler),
        }
    }
}

/// Exact-shape matcher over the non-fallback entries.
pub struct PathMatcher {
    candidates: Vec<Candidate>,
}

impl PathMatcher {
    pub fn new(entries: &[FlatEntry]) -> Self {
        Self {
            candidates: entries
                .iter()
                .filter(|entry| entry.method != Verb::NotFound)
                .map(Candidate::from_entry)
                .collect(),
        }
    }

    /// First entry answering `method` whose pattern matches `path` exactly.
    pub fn find(&self, method: &str, path: &[&str]) -> Option<(BoxedHandler, Context)> {
        self.candidates
            .iter()
            .filter(|candidate| candidate.verb.accepts(method))
            .find_map(|candidate| {
                candidate
                    .pattern
                    .captures(path)
                    .map(|context| (std::sync::Arc::clone(&candidate.handler), context))
            })
    }
}

/// Longest-prefix resolver over the NOT_FOUND entries.
pub struct NotFoundResolver {
    candidates: Vec<Candidate>,
}

impl NotFoundResolver {
    pub fn new(entries: &[FlatEntry]) -> Self {
        Self {
            candidates: entries
                .iter()
                .filter(|entry| entry.method == Verb::NotFound)
                .map(Candidate::from_entry)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Fallback whose scope shares the longest prefix with `path`.
    ///
    /// A candidate must match at least one segment unless it is scoped at
    /// the root. On equal prefixes the shorter pattern wins, then the
    /// earlier declaration.
    pub fn resolve(&self, path: &[&str]) -> Option<BoxedHandler> {
        let mut best: Option<(usize, usize, &Candidate)> = None;
        for candidate in &self.candidates {
            let count = candidate.pattern.matched_prefix(path);
            let len = candidate.pattern.len();
            if count == 0 && len > 0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_count, best_len, _)) => {
                    count > best_count || (count == best_count && len < best_len)
                }
            };
            if better {
                best = Some((count, len, candidate));
            }
        }
        best.map(|(_, _, candidate)| std::sync::Arc::clone(&candidate.handler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{IncomingRequest, ServerResponse};
    use crate::routing::handler::sync_handler_fn;

    fn entry(method: Verb, path: &str, body: &'static str) -> FlatEntry {
        FlatEntry {
            method,
            path: path.to_string(),
            handler: sync_handler_fn(move |_| ServerResponse::ok(body)),
        }
    }

    async fn body_of(handler: BoxedHandler) -> String {
        handler.handle(IncomingRequest::new("GET", "/")).await.text()
    }

    #[test]
    fn test_captures() {
        let pattern = PathPattern::parse("/user/:id/meh");
        let ctx = pattern.captures(&["user", "2", "meh"]).unwrap();
        assert_eq!(ctx.get("id"), Some(&ParamValue::Number(2)));

        let ctx = pattern.captures(&["user", "2a", "meh"]).unwrap();
        assert_eq!(ctx.get("id"), Some(&ParamValue::Text("2a".into())));

        assert!(pattern.captures(&["user", "2"]).is_none());
        assert!(pattern.captures(&["users", "2", "meh"]).is_none());
        assert!(PathPattern::parse("/").captures(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_matched_prefix() {
        let pattern = PathPattern::parse("/post/:id/comments");
        assert_eq!(pattern.matched_prefix(&["post", "1", "comments", "x"]), 3);
        assert_eq!(pattern.matched_prefix(&["post", "1", "likes"]), 2);
        assert_eq!(pattern.matched_prefix(&["post"]), 2);
        assert_eq!(pattern.matched_prefix(&["user"]), 0);
        assert_eq!(PathPattern::parse("/user/:id").matched_prefix(&["user"]), 2);
        assert_eq!(PathPattern::parse("/:a/:b").matched_prefix(&[]), 2);
    }

    #[test]
    fn test_covers_and_normalized() {
        let wide = PathPattern::parse("/user/:id");
        let narrow = PathPattern::parse("/user/test");
        assert!(wide.covers(&narrow));
        assert!(!narrow.covers(&wide));
        assert!(!wide.covers(&PathPattern::parse("/user")));
        assert_eq!(wide.normalized(), "/user/:match");
        assert_eq!(PathPattern::parse("/").normalized(), "/");
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let entries = vec![
            entry(Verb::Get, "/user/:id", "param"),
            entry(Verb::Get, "/user/test", "literal"),
        ];
        let matcher = PathMatcher::new(&entries);
        let (handler, ctx) = matcher.find("GET", &["user", "test"]).unwrap();
        assert_eq!(body_of(handler).await, "param");
        assert_eq!(ctx.get("id"), Some(&ParamValue::Text("test".into())));
    }

    #[tokio::test]
    async fn test_method_filter() {
        let entries = vec![
            entry(Verb::Post, "/post", "post"),
            entry(Verb::Get, "/post", "get"),
            entry(Verb::NotFound, "/", "fallback"),
        ];
        let matcher = PathMatcher::new(&entries);
        let (handler, _) = matcher.find("get", &["post"]).unwrap();
        assert_eq!(body_of(handler).await, "get");
        assert!(matcher.find("DELETE", &["post"]).is_none());
        // NOT_FOUND entries never match exactly.
        assert!(matcher.find("GET", &[]).is_none());
    }

    #[tokio::test]
    async fn test_not_found_longest_prefix() {
        let entries = vec![
            entry(Verb::NotFound, "/post", "post"),
            entry(Verb::NotFound, "/", "main"),
        ];
        let resolver = NotFoundResolver::new(&entries);
        let handler = resolver.resolve(&["post", "anything"]).unwrap();
        assert_eq!(body_of(handler).await, "post");
        let handler = resolver.resolve(&["users", "anything"]).unwrap();
        assert_eq!(body_of(handler).await, "main");
        let handler = resolver.resolve(&[]).unwrap();
        assert_eq!(body_of(handler).await, "main");
    }

    #[tokio::test]
    async fn test_not_found_tie_prefers_shorter_pattern() {
        let entries = vec![
            entry(Verb::NotFound, "/api/v1/deep", "deep"),
            entry(Verb::NotFound, "/api/v1", "v1"),
        ];
        let resolver = NotFoundResolver::new(&entries);
        // Both match two segments; the shorter pattern is preferred.
        let handler = resolver.resolve(&["api", "v1", "other"]).unwrap();
        assert_eq!(body_of(handler).await, "v1");
        let handler = resolver.resolve(&["api", "v1", "deep", "x"]).unwrap();
        assert_eq!(body_of(handler).await, "deep");
    }

    #[tokio::test]
    async fn test_not_found_trailing_params_extend_prefix() {
        let entries = vec![
            entry(Verb::NotFound, "/user/:id", "by-id"),
            entry(Verb::NotFound, "/user", "user"),
        ];
        let resolver = NotFoundResolver::new(&entries);
        let handler = resolver.resolve(&["user"]).unwrap();
        assert_eq!(body_of(handler).await, "by-id");
        let handler = resolver.resolve(&["user", "7", "extra"]).unwrap();
        assert_eq!(body_of(handler).await, "by-id");
    }

    #[test]
    fn test_not_found_requires_partial_match() {
        let entries = vec![entry(Verb::NotFound, "/post", "post")];
        let resolver = NotFoundResolver::new(&entries);
        assert!(resolver.resolve(&["users", "x"]).is_none());
        assert!(NotFoundResolver::new(&[]).resolve(&["a"]).is_none());
    }
}
