//! The ingestion boundary between raw lines and the indicator graph.
//!
//! Lines that fail to parse are skipped and reported here. They never reach
//! an indicator. Points older than what the graph has already accepted are
//! handled according to the subscription's [`StalePolicy`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, info, warn};

use quant_core::error::{DataError, IndicatorError, ParseError, QuantError};
use quant_core::traits::DataRecord;
use quant_core::types::{DataPoint, FeedKind, SourceLocator, SubscriptionConfig};
use quant_indicators::{Emission, IndicatorGraph, IndicatorId, Pipeline};

use crate::feed::{FileReplay, LineSource};
use crate::records::Record;

/// Most diagnostics kept in one report.
pub const MAX_DIAGNOSTICS: usize = 100;

/// What to do with a point older than the last one the graph accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Skip the point and count it
    #[default]
    Drop,
    /// Abort the run with the indicator error
    Fail,
}

/// Result of ingesting a single line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Empty or whitespace-only line
    Blank,
    /// The line did not parse
    Skipped(ParseError),
    /// The point was older than the graph's last accepted point
    Stale(DataPoint),
    /// The point's calendar day is outside the requested range
    OutOfRange(DataPoint),
    /// The record's point went through the graph
    Dispatched(Vec<Emission>),
}

/// A line that was not ingested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Where the line came from
    pub locator: String,
    /// 1-based line number within that source
    pub line_number: u64,
    /// The raw line
    pub line: String,
    /// Why it was skipped
    pub reason: String,
}

/// Counters for one or more ingestion runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    /// Subscription symbol
    pub symbol: String,
    /// Sources that were read
    pub sources: Vec<String>,
    /// Sources that could not be opened
    pub missing_sources: u64,
    /// Lines read, blank ones included
    pub lines: u64,
    /// Records dispatched into the graph
    pub records: u64,
    /// Indicator updates performed
    pub emissions: u64,
    /// Lines that failed to parse
    pub skipped: u64,
    /// Points dropped for being older than the graph's last point
    pub stale: u64,
    /// Points outside the requested days of a multi-day archive
    pub out_of_range: u64,
    /// First skipped or stale lines, up to `MAX_DIAGNOSTICS`
    pub diagnostics: Vec<Diagnostic>,
}

impl IngestReport {
    fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Default::default()
        }
    }

    fn note(&mut self, locator: &SourceLocator, line_number: u64, line: &str, reason: String) {
        if self.diagnostics.len() < MAX_DIAGNOSTICS {
            self.diagnostics.push(Diagnostic {
                locator: locator.to_string(),
                line_number,
                line: line.to_string(),
                reason,
            });
        }
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: IngestReport) {
        self.sources.extend(other.sources);
        self.missing_sources += other.missing_sources;
        self.lines += other.lines;
        self.records += other.records;
        self.emissions += other.emissions;
        self.skipped += other.skipped;
        self.stale += other.stale;
        self.out_of_range += other.out_of_range;

        let room = MAX_DIAGNOSTICS.saturating_sub(self.diagnostics.len());
        self.diagnostics
            .extend(other.diagnostics.into_iter().take(room));
    }

    /// Check if every line read became a record.
    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.stale == 0 && self.missing_sources == 0
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} sources ({} missing), {} lines, {} records, {} skipped, {} stale, {} out of range",
            self.symbol,
            self.sources.len(),
            self.missing_sources,
            self.lines,
            self.records,
            self.skipped,
            self.stale,
            self.out_of_range
        )
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Snapshot of one indicator after ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorValue {
    /// Indicator name
    pub name: String,
    /// Whether the warm-up period has been satisfied
    pub ready: bool,
    /// Distinct instants consumed
    pub samples: usize,
    /// Latest value, once ready
    pub value: Option<DataPoint>,
}

/// One symbol's stream bound to its indicator graph.
///
/// The feed kind is fixed at creation. Every ingestion method takes
/// `&mut self`, so backtest replay and live delivery into the same graph
/// cannot interleave.
pub struct Subscription<R: DataRecord = Record> {
    config: SubscriptionConfig,
    feed: FeedKind,
    graph: IndicatorGraph,
    entry: IndicatorId,
    policy: StalePolicy,
    _record: PhantomData<fn() -> R>,
}

impl<R: DataRecord> Subscription<R> {
    /// Bind `config` to a wired pipeline.
    pub fn new(config: SubscriptionConfig, feed: FeedKind, pipeline: Pipeline) -> Self {
        Self {
            config,
            feed,
            graph: pipeline.graph,
            entry: pipeline.source,
            policy: StalePolicy::default(),
            _record: PhantomData,
        }
    }

    /// Set how stale points are handled.
    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &SubscriptionConfig {
        &self.config
    }

    pub fn feed(&self) -> FeedKind {
        self.feed
    }

    pub fn graph(&self) -> &IndicatorGraph {
        &self.graph
    }

    /// Node receiving each record's point.
    pub fn entry(&self) -> IndicatorId {
        self.entry
    }

    /// Where this subscription's lines for `as_of` live.
    pub fn resolve_source(&self, as_of: NaiveDate) -> Result<SourceLocator, ParseError> {
        R::resolve_source(&self.config, as_of, self.feed)
    }

    /// Parse one line and push its point through the graph.
    ///
    /// Parse failures are returned as `LineOutcome::Skipped`, not as errors.
    /// A stale point is `LineOutcome::Stale` under `StalePolicy::Drop`.
    pub fn ingest_line(
        &mut self,
        line: &str,
        as_of: NaiveDate,
    ) -> Result<LineOutcome, IndicatorError> {
        self.ingest(line, as_of, None)
    }

    fn ingest(
        &mut self,
        line: &str,
        as_of: NaiveDate,
        days: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<LineOutcome, IndicatorError> {
        if line.trim().is_empty() {
            return Ok(LineOutcome::Blank);
        }

        let record = match R::parse(&self.config, line, as_of, self.feed) {
            Ok(record) => record,
            Err(e) => {
                warn!(symbol = %self.config.symbol, error = %e, "Skipping line");
                return Ok(LineOutcome::Skipped(e));
            }
        };

        let point = record.data_point();
        if let Some((from, to)) = days {
            let day = point.time.date_naive();
            if day < from || day > to {
                return Ok(LineOutcome::OutOfRange(point));
            }
        }

        match self.graph.dispatch(self.entry, point) {
            Ok(emissions) => Ok(LineOutcome::Dispatched(emissions)),
            Err(e @ IndicatorError::NonMonotonicTime { .. }) => match self.policy {
                StalePolicy::Drop => {
                    warn!(symbol = %self.config.symbol, error = %e, "Dropping stale point");
                    Ok(LineOutcome::Stale(point))
                }
                StalePolicy::Fail => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    /// Drain `source`, ingesting every line.
    pub async fn run<S>(&mut self, source: &mut S, as_of: NaiveDate) -> Result<IngestReport, QuantError>
    where
        S: LineSource + ?Sized,
    {
        self.drain(source, as_of, None).await
    }

    /// Like [`run`](Self::run), but points dated outside `from..=to` are
    /// counted as out of range and never reach the graph.
    pub async fn run_within<S>(
        &mut self,
        source: &mut S,
        as_of: NaiveDate,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<IngestReport, QuantError>
    where
        S: LineSource + ?Sized,
    {
        self.drain(source, as_of, Some((from, to))).await
    }

    async fn drain<S>(
        &mut self,
        source: &mut S,
        as_of: NaiveDate,
        days: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<IngestReport, QuantError>
    where
        S: LineSource + ?Sized,
    {
        let locator = source.locator().clone();
        let mut report = IngestReport::new(&self.config.symbol);
        report.sources.push(locator.to_string());
        debug!(symbol = %self.config.symbol, locator = %locator, "Ingesting source");

        while let Some(line) = source.next_line().await? {
            report.lines += 1;
            let line_number = report.lines;

            match self.ingest(&line, as_of, days)? {
                LineOutcome::Blank => {}
                LineOutcome::Skipped(e) => {
                    report.skipped += 1;
                    report.note(&locator, line_number, &line, e.to_string());
                }
                LineOutcome::Stale(point) => {
                    report.stale += 1;
                    report.note(&locator, line_number, &line, format!("stale point at {}", point.time));
                }
                LineOutcome::OutOfRange(_) => {
                    report.out_of_range += 1;
                }
                LineOutcome::Dispatched(emissions) => {
                    report.records += 1;
                    report.emissions += emissions.len() as u64;
                }
            }
        }

        Ok(report)
    }

    /// Replay archived days `from..=to` in order.
    ///
    /// Daily archives hold every bar in one file, which is read once; bars
    /// dated outside `from..=to` are counted in `out_of_range` and skipped.
    /// Days without an archive are counted as missing and skipped.
    pub async fn replay(&mut self, from: NaiveDate, to: NaiveDate) -> Result<IngestReport, QuantError> {
        if self.feed != FeedKind::Backtest {
            return Err(QuantError::Validation(format!(
                "{}: replay requires a backtest subscription",
                self.config.symbol
            )));
        }
        if from > to {
            return Err(QuantError::Validation(format!(
                "start date {} is after end date {}",
                from, to
            )));
        }

        let days: Vec<NaiveDate> = if self.config.resolution.is_intraday() {
            from.iter_days().take_while(|day| *day <= to).collect()
        } else {
            vec![from]
        };

        info!(symbol = %self.config.symbol, from = %from, to = %to, "Starting replay");
        let mut report = IngestReport::new(&self.config.symbol);

        for day in days {
            let locator = self.resolve_source(day)?;
            let mut source = match FileReplay::open(locator).await {
                Ok(source) => source,
                Err(DataError::SourceUnavailable { locator, reason }) => {
                    warn!(locator = %locator, reason = %reason, "Archive unavailable");
                    report.missing_sources += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            report.merge(self.run_within(&mut source, day, from, to).await?);
        }

        info!(summary = %report.summary(), "Replay finished");
        Ok(report)
    }

    /// Current state of every indicator, in registration order.
    pub fn values(&self) -> Vec<IndicatorValue> {
        self.graph
            .ids()
            .filter_map(|id| self.graph.get(id))
            .map(|indicator| IndicatorValue {
                name: indicator.name().to_string(),
                ready: indicator.is_ready(),
                samples: indicator.samples(),
                value: indicator.current(),
            })
            .collect()
    }

    /// Reset every indicator in the graph.
    pub fn reset(&mut self) {
        self.graph.reset_all();
    }
}

impl<R: DataRecord> fmt::Debug for Subscription<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("symbol", &self.config.symbol)
            .field("record", &R::KIND)
            .field("feed", &self.feed)
            .field("policy", &self.policy)
            .field("graph", &self.graph)
            .finish()
    }
}
