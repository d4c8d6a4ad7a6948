//! Producer/consumer composition of indicators.
//!
//! Indicators live in an arena owned by the graph and are addressed by
//! [`IndicatorId`]. Edges are plain id pairs, so a consumer never owns its
//! producer and cycles can be checked before an edge exists.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, trace};

use quant_core::error::IndicatorError;
use quant_core::traits::{DataRecord, Indicator, UpdateOutcome};
use quant_core::types::DataPoint;

use crate::state::{Identity, WindowIndicator};

/// Handle to an indicator registered in an [`IndicatorGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndicatorId(usize);

impl IndicatorId {
    /// Position in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One indicator update performed during a dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    /// Indicator that was updated
    pub id: IndicatorId,
    /// What the update produced
    pub outcome: UpdateOutcome,
}

struct Node {
    indicator: Box<dyn Indicator>,
    /// Direct consumers in connection order
    consumers: Vec<IndicatorId>,
}

/// Acyclic graph of indicators feeding each other.
#[derive(Default)]
pub struct IndicatorGraph {
    nodes: Vec<Node>,
}

impl IndicatorGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an indicator and return its id.
    pub fn add<I: Indicator + 'static>(&mut self, indicator: I) -> IndicatorId {
        self.add_boxed(Box::new(indicator))
    }

    /// Register an already boxed indicator.
    pub fn add_boxed(&mut self, indicator: Box<dyn Indicator>) -> IndicatorId {
        let id = IndicatorId(self.nodes.len());
        debug!(id = %id, name = indicator.name(), "Registered indicator");
        self.nodes.push(Node {
            indicator,
            consumers: Vec::new(),
        });
        id
    }

    /// Register a pass-through entry point for a raw point stream.
    pub fn add_source(&mut self, name: impl Into<String>) -> IndicatorId {
        self.add(WindowIndicator::named(name, Identity))
    }

    /// Make `consumer` read `producer`'s output.
    ///
    /// Fails with `CycleDetected` if `producer` is reachable from `consumer`,
    /// including the self-edge case. Nothing is modified on failure.
    pub fn connect(
        &mut self,
        producer: IndicatorId,
        consumer: IndicatorId,
    ) -> Result<(), IndicatorError> {
        self.node(producer)?;
        self.node(consumer)?;

        if self.nodes[producer.0].consumers.contains(&consumer) {
            return Err(IndicatorError::DuplicateEdge {
                producer: self.label(producer),
                consumer: self.label(consumer),
            });
        }

        if self.reaches(consumer, producer) {
            return Err(IndicatorError::CycleDetected {
                producer: self.label(producer),
                consumer: self.label(consumer),
            });
        }

        debug!(
            producer = %self.label(producer),
            consumer = %self.label(consumer),
            "Connected indicators"
        );
        self.nodes[producer.0].consumers.push(consumer);
        Ok(())
    }

    /// Deliver `point` to `id` and propagate ready outputs downstream.
    ///
    /// Consumers are visited depth-first in connection order, and only when
    /// their producer is ready. Returns every update in the order it
    /// happened.
    ///
    /// The first failing update aborts the whole dispatch. Updates that
    /// already happened are kept, and consumers not yet visited (including
    /// later siblings of the failing one) do not receive the point. A
    /// consumer fed by producers on separate sources can fail this way when
    /// those sources disagree on time.
    pub fn dispatch(
        &mut self,
        id: IndicatorId,
        point: DataPoint,
    ) -> Result<Vec<Emission>, IndicatorError> {
        self.node(id)?;
        let mut emissions = Vec::new();
        self.dispatch_into(id, point, &mut emissions)?;
        Ok(emissions)
    }

    /// Dispatch the point carried by a record.
    pub fn dispatch_record<R: DataRecord>(
        &mut self,
        id: IndicatorId,
        record: &R,
    ) -> Result<Vec<Emission>, IndicatorError> {
        self.dispatch(id, record.data_point())
    }

    fn dispatch_into(
        &mut self,
        id: IndicatorId,
        point: DataPoint,
        emissions: &mut Vec<Emission>,
    ) -> Result<(), IndicatorError> {
        let outcome = self.nodes[id.0].indicator.update(point)?;
        trace!(id = %id, ready = outcome.is_ready, "Indicator updated");
        emissions.push(Emission { id, outcome });

        let Some(output) = outcome.ready_point() else {
            return Ok(());
        };

        for i in 0..self.nodes[id.0].consumers.len() {
            let consumer = self.nodes[id.0].consumers[i];
            self.dispatch_into(consumer, output, emissions)?;
        }
        Ok(())
    }

    /// Look up an indicator.
    pub fn get(&self, id: IndicatorId) -> Option<&dyn Indicator> {
        self.nodes.get(id.0).map(|n| n.indicator.as_ref())
    }

    /// Find the first indicator with the given name.
    pub fn find(&self, name: &str) -> Option<IndicatorId> {
        self.nodes
            .iter()
            .position(|n| n.indicator.name() == name)
            .map(IndicatorId)
    }

    /// Direct consumers of `id`, in connection order.
    pub fn consumers(&self, id: IndicatorId) -> &[IndicatorId] {
        self.nodes
            .get(id.0)
            .map(|n| n.consumers.as_slice())
            .unwrap_or(&[])
    }

    /// All ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = IndicatorId> {
        (0..self.nodes.len()).map(IndicatorId)
    }

    /// Number of registered indicators.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no indicators are registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids ordered so every producer precedes its consumers.
    ///
    /// Ties are broken by registration order.
    pub fn topological_order(&self) -> Vec<IndicatorId> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        for node in &self.nodes {
            for consumer in &node.consumers {
                in_degree[consumer.0] += 1;
            }
        }

        let mut ready: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(i) = ready.pop_front() {
            order.push(IndicatorId(i));
            for consumer in &self.nodes[i].consumers {
                in_degree[consumer.0] -= 1;
                if in_degree[consumer.0] == 0 {
                    ready.push_back(consumer.0);
                }
            }
        }

        order
    }

    /// Reset one indicator.
    pub fn reset(&mut self, id: IndicatorId) -> Result<(), IndicatorError> {
        self.node(id)?;
        self.nodes[id.0].indicator.reset();
        Ok(())
    }

    /// Reset every indicator.
    pub fn reset_all(&mut self) {
        for node in &mut self.nodes {
            node.indicator.reset();
        }
    }

    fn node(&self, id: IndicatorId) -> Result<&Node, IndicatorError> {
        self.nodes
            .get(id.0)
            .ok_or(IndicatorError::UnknownIndicator(id.0))
    }

    fn label(&self, id: IndicatorId) -> String {
        match self.nodes.get(id.0) {
            Some(node) => node.indicator.name().to_string(),
            None => id.to_string(),
        }
    }

    /// Whether `to` can be reached from `from` along consumer edges.
    fn reaches(&self, from: IndicatorId, to: IndicatorId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from.0];

        while let Some(i) = stack.pop() {
            if i == to.0 {
                return true;
            }
            if visited[i] {
                continue;
            }
            visited[i] = true;
            stack.extend(self.nodes[i].consumers.iter().map(|c| c.0));
        }
        false
    }
}

impl fmt::Debug for IndicatorGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (i, node) in self.nodes.iter().enumerate() {
            list.entry(&(i, node.indicator.name(), &node.consumers));
        }
        list.finish()
    }
}
