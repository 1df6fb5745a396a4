//! Dashboard state.
//!
//! `Dashboard` owns everything the views display: the last good set of
//! valid rows, the year summaries and chart series built from it, and the
//! last title breakdown together with the year it was computed for. It is
//! mutated only through `load`, `begin_selection`/`finish_selection` and
//! `select`.

use crate::analysis::{self, SelectionController, SelectionTicket};
use crate::models::{
    ChartPoint, Report, ReportMetadata, SelectionReport, SummarySort, TitleBreakdown, TitleSort,
    ValidRow, YearSummary,
};
use crate::source::{RecordSource, SourceError};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to a completed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The breakdown was replaced.
    Applied,
    /// A newer selection was started; the result was dropped.
    Superseded,
}

/// Rows to compute a selection's breakdown from.
pub type SelectionResult = Result<Arc<Vec<ValidRow>>, SourceError>;

/// A completed rows lookup, tagged with the selection it answers.
pub type SelectionRows = (SelectionTicket, SelectionResult);

pub struct Dashboard {
    source: RecordSource,
    refetch_on_select: bool,
    rows: Arc<Vec<ValidRow>>,
    rows_decoded: usize,
    summaries: Vec<YearSummary>,
    chart: Vec<ChartPoint>,
    breakdown: Option<SelectionReport>,
    selection: SelectionController,
    summary_sort: SummarySort,
    descending: bool,
    title_sort: Option<TitleSort>,
}

impl Dashboard {
    /// Create an empty dashboard. Nothing is fetched until [`load`](Self::load).
    ///
    /// With `refetch_on_select` every selection re-reads and re-validates
    /// the source; otherwise selections reuse the rows from the last load.
    pub fn new(source: RecordSource, refetch_on_select: bool) -> Self {
        Self {
            source,
            refetch_on_select,
            rows: Arc::new(Vec::new()),
            rows_decoded: 0,
            summaries: Vec::new(),
            chart: Vec::new(),
            breakdown: None,
            selection: SelectionController::new(),
            summary_sort: SummarySort::default(),
            descending: false,
            title_sort: None,
        }
    }

    pub fn source(&self) -> &RecordSource {
        &self.source
    }

    /// Fetch the source and rebuild the summaries.
    ///
    /// The breakdown of the selected year is recomputed from the new rows.
    /// On failure the previous summaries, chart, rows and breakdown are kept.
    pub async fn load(&mut self) -> Result<&[YearSummary], SourceError> {
        let raw = match self.source.fetch().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Keeping previous summaries, load failed: {}", e);
                return Err(e);
            }
        };

        let valid = analysis::validate(&raw);
        info!("{} of {} rows are valid", valid.len(), raw.len());

        self.rows_decoded = raw.len();
        self.rows = Arc::new(valid);
        self.rebuild_summaries();

        if let Some(year) = self.selected_year() {
            let breakdown = analysis::aggregate_titles_for_year(&self.rows, year);
            self.apply_breakdown(year, breakdown);
        }

        Ok(&self.summaries)
    }

    fn rebuild_summaries(&mut self) {
        let mut summaries = analysis::aggregate_by_year(&self.rows);
        self.chart = analysis::chart_series(&summaries);
        analysis::sort_summaries(&mut summaries, self.summary_sort, self.descending);
        self.summaries = summaries;
    }

    /// Year summaries in the current display order.
    pub fn summaries(&self) -> &[YearSummary] {
        &self.summaries
    }

    /// Jobs-per-year series, ascending by year.
    pub fn chart(&self) -> &[ChartPoint] {
        &self.chart
    }

    /// Titles of the last applied breakdown (empty before any selection).
    pub fn breakdown(&self) -> &[TitleBreakdown] {
        self.breakdown
            .as_ref()
            .map(|shown| shown.titles.as_slice())
            .unwrap_or_default()
    }

    /// The last applied breakdown and the year it belongs to.
    ///
    /// Lags behind [`selected_year`](Self::selected_year) while a selection
    /// is loading or after it failed.
    pub fn shown_selection(&self) -> Option<&SelectionReport> {
        self.breakdown.as_ref()
    }

    pub fn selected_year(&self) -> Option<u32> {
        self.selection.state().year()
    }

    pub fn set_summary_sort(&mut self, key: SummarySort, descending: bool) {
        self.summary_sort = key;
        self.descending = descending;
        analysis::sort_summaries(&mut self.summaries, key, descending);
    }

    pub fn set_title_sort(&mut self, key: Option<TitleSort>) {
        self.title_sort = key;
        if let (Some(key), Some(shown)) = (key, self.breakdown.as_mut()) {
            analysis::sort_breakdown(&mut shown.titles, key);
        }
    }

    /// Start a selection. Any selection still in flight becomes stale.
    pub fn begin_selection(&mut self, year: u32) -> SelectionTicket {
        self.selection.begin(year)
    }

    /// Rows to compute the breakdown of `ticket` from.
    ///
    /// The returned future does not borrow the dashboard, so several can be
    /// pending at once.
    pub fn selection_rows(
        &self,
        ticket: SelectionTicket,
    ) -> impl Future<Output = SelectionRows> + 'static {
        let refetch = self.refetch_on_select.then(|| self.source.clone());
        let cached = Arc::clone(&self.rows);

        async move {
            let rows = match refetch {
                Some(source) => source
                    .fetch()
                    .await
                    .map(|raw| Arc::new(analysis::validate(&raw))),
                None => Ok(cached),
            };
            (ticket, rows)
        }
    }

    /// Apply the rows for `ticket` if it is still the latest selection.
    ///
    /// Stale tickets are dropped whatever their result. A failed lookup for
    /// the latest ticket is returned as an error and leaves the previous
    /// breakdown in place, still labelled with its own year.
    pub fn finish_selection(
        &mut self,
        ticket: SelectionTicket,
        rows: SelectionResult,
    ) -> Result<SelectionOutcome, SourceError> {
        if !self.selection.is_current(&ticket) {
            debug!("Dropping stale selection for {}", ticket.year());
            return Ok(SelectionOutcome::Superseded);
        }

        let rows = rows?;
        match self.selection.complete(ticket, &rows) {
            Some(breakdown) => {
                self.apply_breakdown(ticket.year(), breakdown);
                Ok(SelectionOutcome::Applied)
            }
            None => Ok(SelectionOutcome::Superseded),
        }
    }

    fn apply_breakdown(&mut self, year: u32, mut breakdown: Vec<TitleBreakdown>) {
        if let Some(key) = self.title_sort {
            analysis::sort_breakdown(&mut breakdown, key);
        }
        info!("{} distinct job titles in {}", breakdown.len(), year);
        self.breakdown = Some(SelectionReport {
            year,
            titles: breakdown,
        });
    }

    /// Select `year` and wait for its breakdown.
    ///
    /// Without `refetch_on_select` this completes synchronously against
    /// the rows from the last load.
    pub async fn select(&mut self, year: u32) -> Result<&[TitleBreakdown], SourceError> {
        if !self.refetch_on_select {
            let breakdown = self.selection.select(&self.rows, year);
            self.apply_breakdown(year, breakdown);
            return Ok(self.breakdown());
        }

        let ticket = self.begin_selection(year);
        let (ticket, rows) = self.selection_rows(ticket).await;
        self.finish_selection(ticket, rows)?;
        Ok(self.breakdown())
    }

    /// Snapshot the current state for rendering.
    pub fn report(&self) -> Report {
        Report {
            metadata: ReportMetadata {
                source: self.source.location().to_string(),
                generated_at: Utc::now(),
                rows_decoded: self.rows_decoded,
                rows_valid: self.rows.len(),
            },
            summaries: self.summaries.clone(),
            chart: self.chart.clone(),
            selection: self.breakdown.clone(),
        }
    }
}
