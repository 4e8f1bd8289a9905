use crate::analytics::{SummaryStats, summarize};
use crate::camera::{DEFAULT_CAMERA_ID, camera_ids, filter_by_camera};
use crate::period::{PeriodWindow, filter_by_period};
use crate::record::{CameraId, CountRecord};
use crate::render::{ChartCanvas, ChartMode, ChartSpec, build_chart, redraw};
use crate::source::SourceError;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tracing::{debug, info, warn};

/// What the user is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub camera: CameraId,
    pub period: PeriodWindow,
    pub chart_mode: ChartMode,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            camera: DEFAULT_CAMERA_ID,
            period: PeriodWindow::Today,
            chart_mode: ChartMode::TimeSeries,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub selection: Selection,
    pub cameras: Vec<CameraId>,
    pub stats: SummaryStats,
    pub chart: ChartSpec,
    pub refreshed_at: OffsetDateTime,
}

impl DashboardView {
    pub fn has_data(&self) -> bool {
        self.stats.total_visitors > 0
    }
}

/// Generation stamp handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

impl RefreshTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Pure pipeline: camera filter, period filter, summary and chart.
pub fn build_view(
    records: &[CountRecord],
    selection: Selection,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> DashboardView {
    let local_now = now.to_offset(offset);
    let local_now = PrimitiveDateTime::new(local_now.date(), local_now.time());

    let for_camera = filter_by_camera(records, selection.camera);
    let filtered = filter_by_period(&for_camera, selection.period, local_now, offset);

    DashboardView {
        selection,
        cameras: camera_ids(records),
        stats: summarize(&filtered, offset),
        chart: build_chart(selection.chart_mode, &filtered, offset),
        refreshed_at: now,
    }
}

/// Owns the only mutable dashboard state: the selection, the latest record
/// list and the chart surface.
///
/// Tickets issued before the latest selection change are stale. Among the
/// rest, a result older than the one already applied is dropped too.
#[derive(Debug)]
pub struct DashboardState {
    selection: Selection,
    offset: UtcOffset,
    generation: u64,
    selection_generation: u64,
    applied_generation: u64,
    records: Vec<CountRecord>,
    canvas: ChartCanvas,
    view: Option<DashboardView>,
}

impl DashboardState {
    pub fn new(offset: UtcOffset) -> Self {
        Self {
            selection: Selection::default(),
            offset,
            generation: 0,
            selection_generation: 0,
            applied_generation: 0,
            records: Vec::new(),
            canvas: ChartCanvas::new(),
            view: None,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn records(&self) -> &[CountRecord] {
        &self.records
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn canvas(&self) -> &ChartCanvas {
        &self.canvas
    }

    /// Camera ids seen in the latest record list, first-seen order.
    pub fn cameras(&self) -> Vec<CameraId> {
        camera_ids(&self.records)
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// Whether a result fetched under `ticket` may still be applied.
    pub fn accepts(&self, ticket: RefreshTicket) -> bool {
        ticket.generation >= self.selection_generation
            && ticket.generation > self.applied_generation
    }

    fn begin_selection_refresh(&mut self) -> RefreshTicket {
        let ticket = self.begin_refresh();
        self.selection_generation = ticket.generation;
        ticket
    }

    pub fn select(
        &mut self,
        camera: Option<CameraId>,
        period: Option<PeriodWindow>,
    ) -> RefreshTicket {
        if let Some(camera) = camera {
            self.selection.camera = camera;
        }
        if let Some(period) = period {
            self.selection.period = period;
        }
        info!(
            camera = self.selection.camera,
            period = self.selection.period.name(),
            "Selection changed"
        );
        self.begin_selection_refresh()
    }

    pub fn next_chart(&mut self) -> RefreshTicket {
        self.selection.chart_mode = self.selection.chart_mode.next();
        debug!(chart_mode = %self.selection.chart_mode, "Chart mode advanced");
        self.begin_selection_refresh()
    }

    pub fn previous_chart(&mut self) -> RefreshTicket {
        self.selection.chart_mode = self.selection.chart_mode.previous();
        debug!(chart_mode = %self.selection.chart_mode, "Chart mode rewound");
        self.begin_selection_refresh()
    }

    /// Apply a finished fetch. Returns `false` when the ticket was superseded
    /// and the result was dropped; the view still follows the current
    /// selection, rebuilt from the cached records if needed.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<CountRecord>, SourceError>,
        now: OffsetDateTime,
    ) -> bool {
        if !self.accepts(ticket) {
            debug!(
                ticket = ticket.generation,
                applied = self.applied_generation,
                selection = self.selection_generation,
                "Dropping stale refresh result"
            );
            let outdated = self
                .view
                .as_ref()
                .is_some_and(|view| view.selection != self.selection);
            if outdated {
                self.recompute(now);
            }
            return false;
        }

        self.applied_generation = ticket.generation;

        self.records = match result {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "Failed to fetch person counts, showing no data");
                Vec::new()
            }
        };
        self.recompute(now);
        true
    }

    /// Rebuild the view from the cached records and redraw the canvas.
    pub fn recompute(&mut self, now: OffsetDateTime) -> &DashboardView {
        let view = build_view(&self.records, self.selection, now, self.offset);
        if !view.has_data() {
            debug!(camera = self.selection.camera, "No visitors in selected window");
        }
        redraw(&mut self.canvas, view.chart.clone());
        self.view.insert(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AgeBracket, Gender};
    use crate::record::RecordTime;
    use time::macros::{datetime, offset};

    fn sample_records() -> Vec<CountRecord> {
        vec![
            CountRecord {
                cctv_id: 1,
                timestamp: RecordTime::Local(datetime!(2025-02-18 08:15)),
                male_minor: 0,
                female_minor: 0,
                male_young_adult: 5,
                female_young_adult: 3,
                male_middle_aged: 0,
                female_middle_aged: 0,
            },
            CountRecord {
                cctv_id: 1,
                timestamp: RecordTime::Local(datetime!(2025-02-18 14:40)),
                male_minor: 10,
                female_minor: 0,
                male_young_adult: 0,
                female_young_adult: 0,
                male_middle_aged: 0,
                female_middle_aged: 0,
            },
            CountRecord {
                cctv_id: 2,
                timestamp: RecordTime::Local(datetime!(2025-02-17 10:00)),
                male_minor: 0,
                female_minor: 0,
                male_young_adult: 0,
                female_young_adult: 0,
                male_middle_aged: 4,
                female_middle_aged: 0,
            },
        ]
    }

    // 2025-02-18 18:00 at +09:00
    const NOW: OffsetDateTime = datetime!(2025-02-18 09:00 UTC);

    #[test]
    fn build_view_filters_camera_and_period() {
        let view = build_view(&sample_records(), Selection::default(), NOW, offset!(+9));

        assert_eq!(view.cameras, vec![1, 2]);
        assert_eq!(view.stats.total_visitors, 18);
        assert_eq!(view.stats.peak_time, "14:00 - 15:00");
        assert_eq!(view.stats.main_age_range, Some(AgeBracket::Minor));
        assert_eq!(view.stats.main_gender, Some(Gender::Male));
        assert!(matches!(view.chart, ChartSpec::Line(_)));
    }

    #[test]
    fn build_view_for_other_camera_and_day() {
        let selection = Selection {
            camera: 2,
            period: PeriodWindow::Yesterday,
            chart_mode: ChartMode::GenderRatio,
        };
        let view = build_view(&sample_records(), selection, NOW, offset!(+9));

        assert_eq!(view.stats.total_visitors, 4);
        assert_eq!(view.stats.main_age_range, Some(AgeBracket::MiddleAged));
        assert!(matches!(view.chart, ChartSpec::Pie(_)));
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut state = DashboardState::new(offset!(+9));
        let stale = state.begin_refresh();
        let fresh = state.select(Some(2), None);

        assert!(state.complete_refresh(fresh, Ok(sample_records()), NOW));
        assert!(!state.complete_refresh(stale, Ok(Vec::new()), NOW));

        assert_eq!(state.records().len(), 3);
        assert_eq!(state.view().map(|v| v.selection.camera), Some(2));
    }

    #[test]
    fn periodic_tick_does_not_discard_selection_fetch() {
        let mut state = DashboardState::new(offset!(+9));
        let initial = state.begin_refresh();
        state.complete_refresh(initial, Ok(sample_records()), NOW);

        let user = state.select(Some(2), None);
        let tick = state.begin_refresh();

        assert!(state.complete_refresh(user, Ok(sample_records()), NOW));
        assert_eq!(state.view().map(|v| v.selection.camera), Some(2));
        assert_eq!(state.view().map(|v| v.stats.total_visitors), Some(0));

        assert!(state.complete_refresh(tick, Ok(sample_records()), NOW));
        assert_eq!(state.view().map(|v| v.selection.camera), Some(2));
    }

    #[test]
    fn older_result_after_newer_tick_keeps_current_selection() {
        let mut state = DashboardState::new(offset!(+9));
        let initial = state.begin_refresh();
        state.complete_refresh(initial, Ok(sample_records()), NOW);

        let user = state.select(None, Some(PeriodWindow::Yesterday));
        let tick = state.begin_refresh();

        assert!(state.complete_refresh(tick, Ok(sample_records()), NOW));
        assert!(!state.complete_refresh(user, Ok(Vec::new()), NOW));

        let view = state.view().expect("view after refresh");
        assert_eq!(view.selection.period, PeriodWindow::Yesterday);
        assert_eq!(state.records().len(), 3);
    }

    #[test]
    fn dropped_result_rebuilds_view_for_current_selection() {
        let mut state = DashboardState::new(offset!(+9));
        let initial = state.begin_refresh();
        state.complete_refresh(initial, Ok(sample_records()), NOW);

        let first = state.select(Some(2), None);
        state.select(None, Some(PeriodWindow::Yesterday));

        assert!(!state.complete_refresh(first, Ok(Vec::new()), NOW));

        let view = state.view().expect("view after dropped refresh");
        assert_eq!(view.selection.camera, 2);
        assert_eq!(view.selection.period, PeriodWindow::Yesterday);
        assert_eq!(view.stats.total_visitors, 4);
        assert_eq!(state.records().len(), 3);
    }

    #[test]
    fn fetch_failure_degrades_to_empty_view() {
        let mut state = DashboardState::new(offset!(+9));
        let ticket = state.begin_refresh();
        state.complete_refresh(ticket, Ok(sample_records()), NOW);

        let ticket = state.begin_refresh();
        let applied = state.complete_refresh(
            ticket,
            Err(SourceError::Mock("offline".to_string())),
            NOW,
        );

        assert!(applied);
        let view = state.view().expect("view after failed refresh");
        assert_eq!(view.stats, SummaryStats::empty());
        assert!(!view.has_data());
        assert!(state.cameras().is_empty());
    }

    #[test]
    fn chart_changes_redraw_canvas() {
        let mut state = DashboardState::new(offset!(+9));

        let ticket = state.begin_refresh();
        state.complete_refresh(ticket, Ok(sample_records()), NOW);
        let ticket = state.next_chart();
        state.complete_refresh(ticket, Ok(sample_records()), NOW);

        assert_eq!(state.selection().chart_mode, ChartMode::GenderRatio);
        assert!(matches!(state.canvas().current(), Some(ChartSpec::Pie(_))));
        assert_eq!(state.canvas().redraws(), 2);
        assert_eq!(
            state.view().map(|v| v.selection.chart_mode),
            Some(ChartMode::GenderRatio)
        );

        let ticket = state.previous_chart();
        assert_eq!(ticket.generation(), 3);
        assert_eq!(state.selection().chart_mode, ChartMode::TimeSeries);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut state = DashboardState::new(offset!(+9));
        let ticket = state.begin_refresh();
        state.complete_refresh(ticket, Ok(sample_records()), NOW);

        let first = state.recompute(NOW).clone();
        let second = state.recompute(NOW).clone();
        assert_eq!(first, second);
    }
}
