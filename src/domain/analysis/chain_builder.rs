//! Chain Builder - assembles records into causal chains.

use std::collections::{btree_set, BTreeMap, BTreeSet, VecDeque};

use crate::domain::foundation::{ContextId, RecordId, RecordKind};
use crate::domain::record::{Record, RecordSnapshot};

use super::{AnalysisError, CausalChain, LinkFault};

/// Causal chain construction functions.
pub struct ChainBuilder;

impl ChainBuilder {
    /// Builds the chains of every context in the snapshot.
    ///
    /// # Algorithm
    /// Contexts are processed in ascending identifier order. Within each
    /// context every link is validated, the link graph is checked for cycles,
    /// then each Cause is expanded breadth-first (links in ascending order).
    /// Actions and Outcomes not reached from any Cause become orphan chains.
    ///
    /// # Errors
    /// The first fault of any context aborts the whole build. Use
    /// [`ChainBuilder::build_by_context`] to isolate faults per context.
    pub fn build_chains(snapshot: &RecordSnapshot) -> Result<Vec<CausalChain>, AnalysisError> {
        let mut chains = Vec::new();
        for context in snapshot.contexts() {
            chains.extend(Self::build_context(snapshot, &context)?);
        }
        Ok(chains)
    }

    /// Builds every context independently. A fault in one context never
    /// prevents the others from being built.
    pub fn build_by_context(
        snapshot: &RecordSnapshot,
    ) -> BTreeMap<ContextId, Result<Vec<CausalChain>, AnalysisError>> {
        snapshot
            .contexts()
            .into_iter()
            .map(|context| {
                let built = Self::build_context(snapshot, &context);
                (context, built)
            })
            .collect()
    }

    /// Builds the chains of one context, sorted by root identifier.
    ///
    /// # Edge Cases
    /// - Unknown or empty context: empty list
    /// - Diamond (two paths to one record): the record is collected once
    pub fn build_context(
        snapshot: &RecordSnapshot,
        context: &ContextId,
    ) -> Result<Vec<CausalChain>, AnalysisError> {
        let members: Vec<&Record> = snapshot.in_context(context).collect();

        Self::validate_links(snapshot, &members)?;
        Self::detect_cycles(snapshot, context, &members)?;

        let mut reached: BTreeSet<&RecordId> = BTreeSet::new();
        let mut chains = Vec::new();

        for &cause in members.iter().filter(|r| r.is_cause()) {
            let closure = reachable_from(snapshot, cause);
            reached.extend(closure.iter().map(|r| &r.id));
            chains.push(chain_from(cause, &closure));
        }

        let targeted: BTreeSet<&RecordId> = members.iter().flat_map(|r| r.links.iter()).collect();

        for &root in members
            .iter()
            .filter(|r| !r.is_cause())
            .filter(|r| !reached.contains(&r.id) && !targeted.contains(&r.id))
        {
            let closure = reachable_from(snapshot, root);
            chains.push(chain_from(root, &closure));
        }

        chains.sort_by(|a, b| a.root.cmp(&b.root));
        Ok(chains)
    }

    /// Rejects links to missing records, to other contexts, or in a direction
    /// [`RecordKind::can_link_to`] does not permit.
    fn validate_links(snapshot: &RecordSnapshot, members: &[&Record]) -> Result<(), AnalysisError> {
        for record in members {
            for target_id in &record.links {
                let fault = match snapshot.get(target_id) {
                    None => Some(LinkFault::MissingTarget),
                    Some(target) if target.context != record.context => {
                        Some(LinkFault::CrossContext {
                            target_context: target.context.clone(),
                        })
                    }
                    Some(target) if !record.kind.can_link_to(target.kind) => {
                        Some(LinkFault::InvalidDirection {
                            from: record.kind,
                            to: target.kind,
                        })
                    }
                    Some(_) => None,
                };

                if let Some(fault) = fault {
                    return Err(AnalysisError::MalformedLink {
                        context: record.context.clone(),
                        record: record.id.clone(),
                        target: target_id.clone(),
                        fault,
                    });
                }
            }
        }
        Ok(())
    }

    /// Depth-first search over every member. Reaching a record that is still
    /// on the current path is a cycle; the reported path starts and ends at
    /// that record.
    fn detect_cycles<'a>(
        snapshot: &'a RecordSnapshot,
        context: &ContextId,
        members: &[&'a Record],
    ) -> Result<(), AnalysisError> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            OnPath,
            Done,
        }

        let mut marks: BTreeMap<&'a RecordId, Mark> = BTreeMap::new();

        for &start in members {
            if marks.contains_key(&start.id) {
                continue;
            }

            let mut path: Vec<&'a RecordId> = vec![&start.id];
            let mut pending: Vec<btree_set::Iter<'a, RecordId>> = vec![start.links.iter()];
            marks.insert(&start.id, Mark::OnPath);

            loop {
                let next = match pending.last_mut() {
                    Some(links) => links.next(),
                    None => break,
                };

                match next {
                    Some(target) => match marks.get(target).copied() {
                        Some(Mark::OnPath) => {
                            let from = path.iter().position(|id| *id == target).unwrap_or(0);
                            let mut cycle: Vec<RecordId> =
                                path[from..].iter().map(|id| (*id).clone()).collect();
                            cycle.push(target.clone());
                            return Err(AnalysisError::CycleDetected {
                                context: context.clone(),
                                path: cycle,
                            });
                        }
                        Some(Mark::Done) => {}
                        None => {
                            if let Some(record) = snapshot.get(target) {
                                marks.insert(target, Mark::OnPath);
                                path.push(target);
                                pending.push(record.links.iter());
                            }
                        }
                    },
                    None => {
                        pending.pop();
                        if let Some(finished) = path.pop() {
                            marks.insert(finished, Mark::Done);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Breadth-first closure of `start`, links followed in ascending order.
///
/// `start` itself is not included. Each record appears once, in discovery
/// order. Links to unknown records are skipped; callers validate first.
pub(crate) fn reachable_from<'a>(snapshot: &'a RecordSnapshot, start: &'a Record) -> Vec<&'a Record> {
    let mut visited: BTreeSet<&RecordId> = BTreeSet::new();
    visited.insert(&start.id);

    let mut queue: VecDeque<&Record> = VecDeque::new();
    queue.push_back(start);

    let mut found = Vec::new();
    while let Some(current) = queue.pop_front() {
        for target_id in &current.links {
            if !visited.insert(target_id) {
                continue;
            }
            if let Some(target) = snapshot.get(target_id) {
                found.push(target);
                queue.push_back(target);
            }
        }
    }
    found
}

fn chain_from(root: &Record, closure: &[&Record]) -> CausalChain {
    let mut actions = Vec::new();
    let mut outcomes = Vec::new();

    match root.kind {
        RecordKind::Action => actions.push(root.id.clone()),
        RecordKind::Outcome => outcomes.push(root.id.clone()),
        RecordKind::Cause => {}
    }

    for record in closure {
        match record.kind {
            RecordKind::Action => actions.push(record.id.clone()),
            RecordKind::Outcome => outcomes.push(record.id.clone()),
            RecordKind::Cause => {}
        }
    }

    CausalChain::new(root.context.clone(), root.id.clone(), root.kind, actions, outcomes)
}
