//! Resource budget for loading.
//!
//! Every raw parser event passes through a [`BudgetEnforcer`] before the loader
//! turns it into a node, so hostile input is stopped while it is still a stream.

use nohash_hasher::IntSet;
use saphyr_parser::{Event, Parser, ScanError};
use serde::{Deserialize, Serialize};

/// Upper bounds on what a single load may consume.
///
/// ```rust
/// use saphyr_decode::{from_str_with_options, Budget, Options, Target};
///
/// let mut options = Options::default();
/// options.budget = Some(Budget { max_nodes: 3, ..Budget::default() });
///
/// let err = from_str_with_options("[1, 2, 3, 4]", &Target::Dynamic, options).unwrap_err();
/// assert!(matches!(err, saphyr_decode::Error::Budget { .. }));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Parser events of any kind. Default 1,000,000.
    pub max_events: usize,
    /// `*alias` references. Default 50,000.
    pub max_aliases: usize,
    /// Distinct `&anchor` definitions. Default 50,000.
    pub max_anchors: usize,
    /// Open sequences and mappings at any one time. Default 2,000.
    pub max_depth: usize,
    /// Documents in the stream. Default 1,024.
    pub max_documents: usize,
    /// Scalars, sequences and mappings. Default 250,000.
    pub max_nodes: usize,
    /// Sum of scalar lengths in bytes. Default 64 MiB.
    pub max_total_scalar_bytes: usize,
    /// Reject streams that reference few anchors through many aliases. Default `true`.
    pub enforce_alias_anchor_ratio: bool,
    /// Alias count below which the ratio check is skipped. Default 100.
    pub alias_anchor_min_aliases: usize,
    /// Breach when `aliases > alias_anchor_ratio_multiplier * anchors`. Default 10.
    pub alias_anchor_ratio_multiplier: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_events: 1_000_000,
            max_aliases: 50_000,
            max_anchors: 50_000,
            max_depth: 2_000,
            max_documents: 1_024,
            max_nodes: 250_000,
            max_total_scalar_bytes: 64 * 1024 * 1024,
            enforce_alias_anchor_ratio: true,
            alias_anchor_min_aliases: 100,
            alias_anchor_ratio_multiplier: 10,
        }
    }
}

/// The limit that was exceeded, with the count that exceeded it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BudgetBreach {
    Events { events: usize },
    Aliases { aliases: usize },
    Anchors { anchors: usize },
    Depth { depth: usize },
    Documents { documents: usize },
    Nodes { nodes: usize },
    ScalarBytes { total_scalar_bytes: usize },
    AliasAnchorRatio { aliases: usize, anchors: usize },
    /// The parser closed a collection that was never opened.
    Unbalanced,
}

/// Counters collected during a scan.
#[derive(Clone, Debug, Default)]
pub struct BudgetReport {
    pub breached: Option<BudgetBreach>,
    pub events: usize,
    pub aliases: usize,
    pub anchors: usize,
    pub documents: usize,
    pub nodes: usize,
    /// Deepest nesting seen.
    pub max_depth: usize,
    pub total_scalar_bytes: usize,
}

/// Counts events against a [`Budget`].
#[derive(Debug)]
pub struct BudgetEnforcer {
    budget: Budget,
    report: BudgetReport,
    open: usize,
    anchor_ids: IntSet<usize>,
}

/// `Err(breach)` once `count` is past `limit`.
fn within(count: usize, limit: usize, breach: impl FnOnce(usize) -> BudgetBreach) -> Result<(), BudgetBreach> {
    if count > limit { Err(breach(count)) } else { Ok(()) }
}

impl BudgetEnforcer {
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            report: BudgetReport::default(),
            open: 0,
            anchor_ids: IntSet::default(),
        }
    }

    /// Account for one event.
    pub fn observe(&mut self, ev: &Event) -> Result<(), BudgetBreach> {
        let r = &mut self.report;
        r.events += 1;
        within(r.events, self.budget.max_events, |events| BudgetBreach::Events { events })?;

        match ev {
            Event::DocumentStart(_) => {
                r.documents += 1;
                within(r.documents, self.budget.max_documents, |documents| {
                    BudgetBreach::Documents { documents }
                })
            }
            Event::Alias(_) => {
                r.aliases += 1;
                within(r.aliases, self.budget.max_aliases, |aliases| {
                    BudgetBreach::Aliases { aliases }
                })
            }
            Event::Scalar(text, _, anchor_id, _) => {
                self.node()?;
                let r = &mut self.report;
                r.total_scalar_bytes = r.total_scalar_bytes.saturating_add(text.len());
                within(r.total_scalar_bytes, self.budget.max_total_scalar_bytes, |total_scalar_bytes| {
                    BudgetBreach::ScalarBytes { total_scalar_bytes }
                })?;
                self.anchor(*anchor_id)
            }
            Event::SequenceStart(anchor_id, _) | Event::MappingStart(anchor_id, _) => {
                self.node()?;
                self.open += 1;
                self.report.max_depth = self.report.max_depth.max(self.open);
                within(self.open, self.budget.max_depth, |depth| BudgetBreach::Depth { depth })?;
                self.anchor(*anchor_id)
            }
            Event::SequenceEnd | Event::MappingEnd => {
                self.open = self.open.checked_sub(1).ok_or(BudgetBreach::Unbalanced)?;
                Ok(())
            }
            Event::StreamStart | Event::StreamEnd | Event::DocumentEnd | Event::Nothing => Ok(()),
        }
    }

    fn node(&mut self) -> Result<(), BudgetBreach> {
        self.report.nodes += 1;
        within(self.report.nodes, self.budget.max_nodes, |nodes| BudgetBreach::Nodes { nodes })
    }

    /// Anchor id 0 means "no anchor".
    fn anchor(&mut self, id: usize) -> Result<(), BudgetBreach> {
        if id != 0 {
            self.anchor_ids.insert(id);
        }
        self.report.anchors = self.anchor_ids.len();
        within(self.report.anchors, self.budget.max_anchors, |anchors| {
            BudgetBreach::Anchors { anchors }
        })
    }

    /// Report for a scan that stopped at `breach`.
    pub fn into_report(mut self, breach: BudgetBreach) -> BudgetReport {
        self.report.breached = Some(breach);
        self.report
    }

    /// Report for a completed scan; applies the alias/anchor ratio check.
    pub fn finalize(mut self) -> BudgetReport {
        let b = &self.budget;
        let r = &mut self.report;
        let amplifying = r.anchors == 0 || r.aliases > b.alias_anchor_ratio_multiplier.saturating_mul(r.anchors);
        if b.enforce_alias_anchor_ratio && r.aliases >= b.alias_anchor_min_aliases && amplifying {
            r.breached = Some(BudgetBreach::AliasAnchorRatio {
                aliases: r.aliases,
                anchors: r.anchors,
            });
        }
        self.report
    }
}

/// Scan `input` against `budget` without building nodes.
///
/// The scan stops at the first breach; `report.breached` is `None` when the input fits.
pub fn check_yaml_budget(input: &str, budget: &Budget) -> Result<BudgetReport, ScanError> {
    let mut parser = Parser::new_from_str(input);
    let mut enforcer = BudgetEnforcer::new(budget.clone());
    while let Some(item) = parser.next() {
        let (ev, _) = item?;
        if let Err(breach) = enforcer.observe(&ev) {
            return Ok(enforcer.into_report(breach));
        }
    }
    Ok(enforcer.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(yaml: &str, budget: Budget) -> BudgetReport {
        check_yaml_budget(yaml, &budget).expect("scan")
    }

    #[test]
    fn small_document_fits() {
        let r = check("a: [1, 2, 3]\n", Budget::default());
        assert!(r.breached.is_none());
        assert_eq!(r.documents, 1);
        assert_eq!(r.nodes, 6);
        assert_eq!(r.max_depth, 2);
    }

    #[test]
    fn aliases_are_counted() {
        let r = check(
            "root: &A [1, 2]\na: *A\nb: *A\nc: *A\nd: *A\n",
            Budget { max_aliases: 3, ..Budget::default() },
        );
        assert_eq!(r.breached, Some(BudgetBreach::Aliases { aliases: 4 }));
    }

    #[test]
    fn nesting_is_counted() {
        let yaml = format!("{}{}", "[".repeat(40), "]".repeat(40));
        let r = check(&yaml, Budget { max_depth: 30, ..Budget::default() });
        assert_eq!(r.breached, Some(BudgetBreach::Depth { depth: 31 }));
    }

    #[test]
    fn anchors_are_counted() {
        let r = check(
            "a: &A 1\nb: &B 2\nc: &C 3\n",
            Budget { max_anchors: 2, ..Budget::default() },
        );
        assert_eq!(r.breached, Some(BudgetBreach::Anchors { anchors: 3 }));
    }

    #[test]
    fn documents_are_counted() {
        let r = check("--- 1\n--- 2\n", Budget { max_documents: 1, ..Budget::default() });
        assert_eq!(r.breached, Some(BudgetBreach::Documents { documents: 2 }));
    }

    #[test]
    fn scalar_bytes_are_counted() {
        let r = check("a: 0123456789\n", Budget { max_total_scalar_bytes: 8, ..Budget::default() });
        assert_eq!(r.breached, Some(BudgetBreach::ScalarBytes { total_scalar_bytes: 11 }));
    }

    #[test]
    fn alias_anchor_ratio_needs_enough_aliases() {
        let yaml = "root: &A [1]\na: *A\nb: *A\nc: *A\n";
        let mut budget = Budget {
            alias_anchor_min_aliases: 1,
            alias_anchor_ratio_multiplier: 2,
            ..Budget::default()
        };
        assert_eq!(
            check(yaml, budget.clone()).breached,
            Some(BudgetBreach::AliasAnchorRatio { aliases: 3, anchors: 1 })
        );

        budget.alias_anchor_min_aliases = 5;
        let r = check(yaml, budget);
        assert!(r.breached.is_none());
        assert_eq!(r.aliases, 3);
    }
}
