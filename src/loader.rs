//! Text to [`Node`] trees.
//!
//! Pulls events from `saphyr-parser` and assembles them bottom-up on an explicit
//! frame stack, so deeply nested input never recurses. Anchored nodes are kept per
//! document and cloned on alias, which is what hands the decoder an alias-free tree.
//! `%TAG` handles are expanded by the parser; tags are normalized here.

use std::borrow::Cow;

use log::trace;
use nohash_hasher::IntMap;
use saphyr_parser::{Event, Parser, ScalarStyle as ParserStyle, Span};

use crate::budget::BudgetEnforcer;
use crate::error::Error;
use crate::location::{location_from_span, Location};
use crate::node::{Node, ScalarStyle};
use crate::options::{AliasLimits, Options};
use crate::tags::normalize_tag;

/// One parsed document; `None` for an empty document (`---` with no content).
pub(crate) struct Document {
    pub(crate) root: Option<Node>,
    pub(crate) location: Location,
}

enum FrameKind {
    Seq(Vec<Node>),
    Map {
        entries: Vec<(Node, Node)>,
        pending_key: Option<Node>,
    },
}

struct Frame {
    kind: FrameKind,
    tag: Option<String>,
    anchor_id: usize,
    location: Location,
}

struct Anchored {
    node: Node,
    size: usize,
}

struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<Node>,
    doc_location: Location,
    anchors: IntMap<usize, Anchored>,
    per_anchor_expansions: IntMap<usize, usize>,
    total_expanded_nodes: usize,
    alias_limits: AliasLimits,
    documents: Vec<Document>,
}

impl TreeBuilder {
    fn new(alias_limits: AliasLimits) -> Self {
        Self {
            stack: Vec::with_capacity(64),
            root: None,
            doc_location: Location::UNKNOWN,
            anchors: IntMap::default(),
            per_anchor_expansions: IntMap::default(),
            total_expanded_nodes: 0,
            alias_limits,
            documents: Vec::new(),
        }
    }

    fn start_document(&mut self, location: Location) {
        self.anchors.clear();
        self.per_anchor_expansions.clear();
        self.stack.clear();
        self.root = None;
        self.doc_location = location;
    }

    fn end_document(&mut self) {
        self.documents.push(Document {
            root: self.root.take(),
            location: self.doc_location,
        });
    }

    fn open(&mut self, kind: FrameKind, tag: Option<String>, anchor_id: usize, location: Location) {
        self.stack.push(Frame {
            kind,
            tag,
            anchor_id,
            location,
        });
    }

    fn close(&mut self, location: Location) -> Result<(), Error> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| Error::msg("unbalanced collection end").with_location(location))?;
        let node = match frame.kind {
            FrameKind::Seq(items) => Node::Sequence {
                items,
                tag: frame.tag,
                location: frame.location,
            },
            FrameKind::Map {
                entries,
                pending_key,
            } => {
                if pending_key.is_some() {
                    return Err(Error::msg("mapping ended with a key but no value")
                        .with_location(location));
                }
                Node::Mapping {
                    entries,
                    tag: frame.tag,
                    location: frame.location,
                }
            }
        };
        self.complete(node, frame.anchor_id);
        Ok(())
    }

    /// Record an anchor (if any) and attach a finished node to its parent.
    fn complete(&mut self, node: Node, anchor_id: usize) {
        if anchor_id != 0 {
            let size = node_count(&node);
            self.anchors.insert(
                anchor_id,
                Anchored {
                    node: node.clone(),
                    size,
                },
            );
        }
        self.attach(node);
    }

    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame {
                kind: FrameKind::Seq(items),
                ..
            }) => items.push(node),
            Some(Frame {
                kind:
                    FrameKind::Map {
                        entries,
                        pending_key,
                    },
                ..
            }) => match pending_key.take() {
                None => *pending_key = Some(node),
                Some(key) => entries.push((key, node)),
            },
        }
    }

    fn alias(&mut self, anchor_id: usize, location: Location) -> Result<(), Error> {
        let anchored = self
            .anchors
            .get(&anchor_id)
            .ok_or(Error::UnknownAnchor {
                id: anchor_id,
                location,
            })?;

        let count = self
            .per_anchor_expansions
            .entry(anchor_id)
            .and_modify(|c| *c += 1)
            .or_insert(1);
        if *count > self.alias_limits.max_alias_expansions_per_anchor {
            return Err(Error::AliasLimit {
                msg: format!(
                    "alias expansion limit exceeded for anchor id {anchor_id}: {count} > {}",
                    self.alias_limits.max_alias_expansions_per_anchor
                ),
                location,
            });
        }

        self.total_expanded_nodes = self.total_expanded_nodes.saturating_add(anchored.size);
        if self.total_expanded_nodes > self.alias_limits.max_total_expanded_nodes {
            return Err(Error::AliasLimit {
                msg: format!(
                    "alias expansion limit exceeded: total_expanded_nodes={} > {}",
                    self.total_expanded_nodes, self.alias_limits.max_total_expanded_nodes
                ),
                location,
            });
        }

        trace!(
            "expanding alias to anchor {anchor_id} ({} nodes) at {location}",
            anchored.size
        );
        let node = anchored.node.clone();
        self.attach(node);
        Ok(())
    }
}

fn node_count(node: &Node) -> usize {
    match node {
        Node::Scalar { .. } => 1,
        Node::Sequence { items, .. } => 1 + items.iter().map(node_count).sum::<usize>(),
        Node::Mapping { entries, .. } => {
            1 + entries
                .iter()
                .map(|(k, v)| node_count(k) + node_count(v))
                .sum::<usize>()
        }
    }
}

/// The parser stands in a plain `~` for a document with no content. Its span covers
/// the neighbouring `---`/`...`/directive token (or nothing), never a written `~`.
fn is_implicit_empty(
    value: &str,
    style: ParserStyle,
    anchor_id: usize,
    tagged: bool,
    span: &Span,
) -> bool {
    value == "~" && style == ParserStyle::Plain && anchor_id == 0 && !tagged && span.len() != 1
}

fn scalar_style(style: ParserStyle) -> ScalarStyle {
    match style {
        ParserStyle::Plain => ScalarStyle::Plain,
        ParserStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        ParserStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        ParserStyle::Literal => ScalarStyle::Literal,
        ParserStyle::Folded => ScalarStyle::Folded,
    }
}

/// Parse every document of `input` into node trees.
pub(crate) fn load_documents(input: &str, options: &Options) -> Result<Vec<Document>, Error> {
    let mut parser = Parser::new_from_str(input);
    let mut budget = options.budget.clone().map(BudgetEnforcer::new);
    let mut builder = TreeBuilder::new(options.alias_limits);

    while let Some(item) = parser.next() {
        let (event, span) = item.map_err(Error::from_scan_error)?;
        let location = location_from_span(&span);

        if let Some(enforcer) = budget.as_mut() {
            enforcer.observe(&event).map_err(|breach| Error::Budget {
                breach,
                location,
            })?;
        }

        match event {
            Event::StreamStart | Event::StreamEnd | Event::Nothing => {}
            Event::DocumentStart(_) => builder.start_document(location),
            Event::DocumentEnd => builder.end_document(),
            Event::Scalar(value, style, anchor_id, tag) => {
                if builder.stack.is_empty()
                    && is_implicit_empty(&value, style, anchor_id, tag.is_some(), &span)
                {
                    trace!("empty document at {location}");
                    continue;
                }
                let text = match value {
                    Cow::Borrowed(v) => v.to_owned(),
                    Cow::Owned(v) => v,
                };
                let node = Node::Scalar {
                    text,
                    style: scalar_style(style),
                    tag: tag.map(|t| normalize_tag(&t.to_string())),
                    location,
                };
                builder.complete(node, anchor_id);
            }
            Event::SequenceStart(anchor_id, tag) => builder.open(
                FrameKind::Seq(Vec::new()),
                tag.map(|t| normalize_tag(&t.to_string())),
                anchor_id,
                location,
            ),
            Event::MappingStart(anchor_id, tag) => builder.open(
                FrameKind::Map {
                    entries: Vec::new(),
                    pending_key: None,
                },
                tag.map(|t| normalize_tag(&t.to_string())),
                anchor_id,
                location,
            ),
            Event::SequenceEnd | Event::MappingEnd => builder.close(location)?,
            Event::Alias(anchor_id) => builder.alias(anchor_id, location)?,
        }
    }

    if let Some(enforcer) = budget {
        let report = enforcer.finalize();
        if let Some(breach) = report.breached {
            return Err(Error::Budget {
                breach,
                location: Location::UNKNOWN,
            });
        }
    }

    Ok(builder.documents)
}

/// Load a single-document stream. An empty stream yields a null scalar.
pub(crate) fn load_single(input: &str, options: &Options) -> Result<Node, Error> {
    let mut found: Option<Node> = None;
    for doc in load_documents(input, options)? {
        let Some(root) = doc.root else { continue };
        if found.is_some() {
            return Err(Error::MultipleDocuments {
                location: doc.location,
            });
        }
        found = Some(root);
    }
    Ok(found.unwrap_or_else(|| Node::scalar("")))
}

/// Load every non-empty document of a stream.
pub(crate) fn load_all(input: &str, options: &Options) -> Result<Vec<Node>, Error> {
    Ok(load_documents(input, options)?
        .into_iter()
        .filter_map(|doc| doc.root)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(input: &str) -> Node {
        load_single(input, &Options::default()).expect("load")
    }

    #[test]
    fn aliases_are_expanded() {
        let root = load("base: &B [1, 2]\ncopy: *B\n");
        assert_eq!(root.get("base"), root.get("copy"));
        assert!(matches!(root.get("copy"), Some(Node::Sequence { items, .. }) if items.len() == 2));
    }

    #[test]
    fn tags_and_styles_are_kept() {
        let root = load("a: !!float '1'\nb: \"x\"\nc: |\n  text\n");
        match root.get("a") {
            Some(Node::Scalar { tag, style, .. }) => {
                assert_eq!(tag.as_deref(), Some("!!float"));
                assert_eq!(*style, ScalarStyle::SingleQuoted);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            root.get("c"),
            Some(Node::Scalar { style: ScalarStyle::Literal, .. })
        ));
    }

    #[test]
    fn empty_stream_is_null_scalar() {
        assert_eq!(load(""), Node::scalar(""));
        assert_eq!(load("# only a comment\n"), Node::scalar(""));
    }

    #[test]
    fn locations_are_one_based() {
        let root = load("a: 1\nb: 2\n");
        assert_eq!(root.get("b").map(Node::location), Some(Location::new(2, 4)));
    }

    #[test]
    fn second_document_is_rejected() {
        let err = load_single("--- 1\n--- 2\n", &Options::default()).expect_err("two docs");
        assert!(matches!(err, Error::MultipleDocuments { .. }));
        let all = load_all("--- 1\n--- 2\n", &Options::default()).expect("load_all");
        let texts: Vec<_> = all.iter().filter_map(Node::as_scalar_text).collect();
        assert_eq!(texts, ["1", "2"]);
    }

    #[test]
    fn empty_documents_are_skipped() {
        let docs = load_all("---\n---\n...\n", &Options::default()).expect("load_all");
        assert!(docs.is_empty());
        assert_eq!(load("---\n...\n"), Node::scalar(""));
        assert_eq!(load("a: 1\n---\n").get("a").and_then(Node::as_scalar_text), Some("1"));
    }

    #[test]
    fn written_tilde_is_content() {
        let docs = load_all("--- ~\n---\n", &Options::default()).expect("load_all");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].as_scalar_text(), Some("~"));
        let root = load("a:\n");
        assert_eq!(root.get("a").and_then(Node::as_scalar_text), Some("~"));
    }

    #[test]
    fn per_anchor_limit() {
        let mut options = Options::default();
        options.alias_limits.max_alias_expansions_per_anchor = 1;
        let err = load_single("a: &A 1\nb: *A\nc: *A\n", &options).expect_err("limit");
        assert!(matches!(err, Error::AliasLimit { .. }));
    }
}
