// 🔍 Deduplication Engine - Group equivalent bookmarks
// Two strategies: Exact Match (canonical URL), Fuzzy Match (same-domain title similarity)
//
// Grouping is single-threaded and order-dependent: records are processed in
// input order and the earliest-created group wins every tie.

use crate::canonical::{canonicalize, domain_of};
use crate::error::Result;
use crate::models::BookmarkRecord;
use crate::settings::DedupeSettings;
use crate::similarity::similarity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// MATCH STRATEGY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// First record of the group
    Founder,

    /// Same canonical URL as a record already in the group
    ExactMatch,

    /// Same domain, title similar to the group's first title
    FuzzyMatch { score: u8 },
}

// ============================================================================
// DEDUPE GROUP
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupeGroup {
    /// Canonical key of the founding record
    pub canonical_url: String,

    /// Host of `canonical_url` (empty for fallback keys)
    pub domain: String,

    /// Members in input order
    pub members: Vec<BookmarkRecord>,

    /// How each member joined, parallel to `members`
    pub strategies: Vec<MatchStrategy>,
}

impl DedupeGroup {
    fn new(canonical_url: String, domain: String, founder: BookmarkRecord) -> Self {
        DedupeGroup {
            canonical_url,
            domain,
            members: vec![founder],
            strategies: vec![MatchStrategy::Founder],
        }
    }

    fn push(&mut self, record: BookmarkRecord, strategy: MatchStrategy) {
        self.members.push(record);
        self.strategies.push(strategy);
    }

    /// Title every fuzzy candidate is compared against
    pub fn representative_title(&self) -> &str {
        &self.members[0].title
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn fuzzy_members(&self) -> usize {
        self.strategies
            .iter()
            .filter(|s| matches!(s, MatchStrategy::FuzzyMatch { .. }))
            .count()
    }
}

/// Result of a grouping pass
#[derive(Debug, Clone)]
pub struct GroupingOutcome {
    /// Groups in creation order
    pub groups: Vec<DedupeGroup>,

    /// Records that skipped fuzzy matching because the comparison budget ran out
    pub exact_only_records: usize,
}

// ============================================================================
// FUZZY BUDGET
// ============================================================================

struct FuzzyBudget {
    remaining: Option<usize>,
    warned: bool,
}

impl FuzzyBudget {
    fn new(limit: Option<usize>) -> Self {
        FuzzyBudget {
            remaining: limit,
            warned: false,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Spend one comparison; false once nothing is left
    fn consume(&mut self) -> bool {
        match self.remaining.as_mut() {
            None => true,
            Some(0) => false,
            Some(left) => {
                *left -= 1;
                true
            }
        }
    }

    fn warn_once(&mut self) {
        if !self.warned {
            self.warned = true;
            tracing::warn!(
                "fuzzy comparison budget exhausted, continuing with exact URL matching only"
            );
        }
    }
}

enum FuzzyScan {
    Matched { group: usize, score: u8 },
    NoMatch,
    BudgetExhausted,
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

pub struct DeduplicationEngine {
    settings: DedupeSettings,
}

impl DeduplicationEngine {
    /// Create engine, rejecting invalid settings up front
    pub fn new(settings: DedupeSettings) -> Result<Self> {
        settings.validate()?;
        Ok(DeduplicationEngine { settings })
    }

    /// Partition records into groups, in creation order
    pub fn group<I>(&self, records: I) -> Vec<DedupeGroup>
    where
        I: IntoIterator<Item = BookmarkRecord>,
    {
        self.group_with_stats(records).groups
    }

    pub fn group_with_stats<I>(&self, records: I) -> GroupingOutcome
    where
        I: IntoIterator<Item = BookmarkRecord>,
    {
        let mut groups: Vec<DedupeGroup> = Vec::new();
        // canonical key → group (fuzzy joiners register their key as an alias)
        let mut by_key: HashMap<String, usize> = HashMap::new();
        // domain → groups founded on that domain, in creation order
        let mut by_domain: HashMap<String, Vec<usize>> = HashMap::new();
        let mut budget = FuzzyBudget::new(self.settings.max_fuzzy_comparisons);
        let mut exact_only_records = 0;

        for record in records {
            let key = canonicalize(&record.url);

            // Strategy 1: Exact Match (always applied)
            if let Some(&idx) = by_key.get(&key) {
                groups[idx].push(record, MatchStrategy::ExactMatch);
                continue;
            }

            let domain = domain_of(&key);

            // Strategy 2: Fuzzy Match (same domain only)
            if self.settings.fuzzy_enabled && !domain.is_empty() {
                let candidates = by_domain.get(&domain).map(Vec::as_slice).unwrap_or(&[]);

                match self.scan_fuzzy(&groups, candidates, &record.title, &mut budget) {
                    FuzzyScan::Matched { group, score } => {
                        tracing::debug!(
                            "fuzzy merge ({}): {:?} ≈ {:?}",
                            score,
                            record.title,
                            groups[group].representative_title()
                        );
                        by_key.insert(key, group);
                        groups[group].push(record, MatchStrategy::FuzzyMatch { score });
                        continue;
                    }
                    FuzzyScan::NoMatch => {}
                    FuzzyScan::BudgetExhausted => {
                        budget.warn_once();
                        exact_only_records += 1;
                    }
                }
            }

            let idx = groups.len();
            by_key.insert(key.clone(), idx);
            by_domain.entry(domain.clone()).or_default().push(idx);
            groups.push(DedupeGroup::new(key, domain, record));
        }

        GroupingOutcome {
            groups,
            exact_only_records,
        }
    }

    /// First candidate (creation order) whose first title scores >= threshold
    fn scan_fuzzy(
        &self,
        groups: &[DedupeGroup],
        candidates: &[usize],
        title: &str,
        budget: &mut FuzzyBudget,
    ) -> FuzzyScan {
        if budget.is_exhausted() {
            return FuzzyScan::BudgetExhausted;
        }

        for &idx in candidates {
            if !budget.consume() {
                return FuzzyScan::BudgetExhausted;
            }

            let score = similarity(groups[idx].representative_title(), title);
            if score >= self.settings.threshold {
                return FuzzyScan::Matched { group: idx, score };
            }
        }

        FuzzyScan::NoMatch
    }
}

// ============================================================================
// TESTS
// ============================================================================
