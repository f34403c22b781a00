//! Time axis and date-range brush.
//!
//! The brush owns a [`TimeScale`] whose domain is fixed at construction and a
//! selection that only moves when the user finishes a drag. The default
//! selection is applied once, the first time the widget is mounted; later
//! mounts (re-renders) keep whatever the user picked.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use ccvis_utils::dates::{date_to_millis, format_date, format_display, millis_to_datetime};
use serde::Serialize;

/// Height of the brush SVG in pixels.
pub const BRUSH_HEIGHT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const MARGIN: Margin = Margin {
    top: 10.0,
    right: 20.0,
    bottom: 20.0,
    left: 20.0,
};

/// A closed date interval, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateInterval {
    /// Build an interval, swapping the bounds if they are reversed.
    pub fn new(a: NaiveDateTime, b: NaiveDateTime) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN))
    }

    /// Whether the calendar day `date` falls inside the interval.
    pub fn contains_date(&self, date: &NaiveDate) -> bool {
        self.start.date() <= *date && *date <= self.end.date()
    }
}

/// Linear map from a date domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (NaiveDate, NaiveDate),
    domain_millis: (i64, i64),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            domain: (start, end),
            domain_millis: (date_to_millis(&start), date_to_millis(&end)),
            range: (0.0, 1.0),
        }
    }

    pub fn with_range(mut self, r0: f64, r1: f64) -> Self {
        self.range = (r0, r1);
        self
    }

    pub fn domain(&self) -> (NaiveDate, NaiveDate) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// `interval` with both ends limited to the domain.
    pub fn clamp(&self, interval: DateInterval) -> DateInterval {
        let (start, end) = self.domain();
        let lo = start.and_time(NaiveTime::MIN);
        let hi = end.and_time(NaiveTime::MIN);
        DateInterval::new(interval.start.max(lo).min(hi), interval.end.max(lo).min(hi))
    }

    pub fn scale_datetime(&self, t: &NaiveDateTime) -> f64 {
        let (d0, d1) = self.domain_millis;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        let ms = t.and_utc().timestamp_millis();
        r0 + (ms - d0) as f64 / (d1 - d0) as f64 * (r1 - r0)
    }

    pub fn scale(&self, date: &NaiveDate) -> f64 {
        self.scale_datetime(&date.and_time(NaiveTime::MIN))
    }

    /// Pixel position back to a point in time (millisecond precision).
    pub fn invert(&self, px: f64) -> NaiveDateTime {
        let (d0, d1) = self.domain_millis;
        let (r0, r1) = self.range;
        let start = self.domain.0.and_time(NaiveTime::MIN);
        if r1 == r0 {
            return start;
        }
        let t = (px - r0) / (r1 - r0);
        let ms = d0 as f64 + t * (d1 - d0) as f64;
        millis_to_datetime(ms.round() as i64).unwrap_or(start)
    }

    /// January 1st of every `step_years`-th year inside the domain, with its pixel.
    pub fn ticks(&self, step_years: i32) -> Vec<(NaiveDate, f64)> {
        let step = step_years.max(1);
        let (start, end) = self.domain;
        let mut year = start.year();
        if NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|d| d < start) {
            year += 1;
        }
        // Align to multiples of the step, as a time axis does.
        year += (step - year.rem_euclid(step)) % step;

        let mut ticks = Vec::new();
        while let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) {
            if date > end {
                break;
            }
            ticks.push((date, self.scale(&date)));
            year += step;
        }
        ticks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushState {
    Uninitialized,
    Initialized,
    UserAdjusted,
}

type OnChange = Box<dyn FnMut(DateInterval)>;

/// Horizontal date-range brush over a fixed time domain.
pub struct TemporalBrush {
    scale: TimeScale,
    width: f64,
    default_selection: DateInterval,
    selection: Option<DateInterval>,
    state: BrushState,
    on_change: Option<OnChange>,
}

impl TemporalBrush {
    /// A default selection reaching past the domain is clamped to it.
    pub fn new(domain_start: NaiveDate, domain_end: NaiveDate, default_selection: DateInterval) -> Self {
        let scale = TimeScale::new(domain_start, domain_end);
        Self {
            default_selection: scale.clamp(default_selection),
            scale,
            width: 0.0,
            selection: None,
            state: BrushState::Uninitialized,
            on_change: None,
        }
    }

    /// Register the parent's callback. It receives every emitted interval.
    pub fn on_change(&mut self, callback: impl FnMut(DateInterval) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Lay the widget out at `width` pixels. The first mount applies the
    /// default selection and emits it; later mounts leave the selection alone.
    pub fn mount(&mut self, width: f64) {
        self.resize(width);
        if self.state == BrushState::Uninitialized {
            self.state = BrushState::Initialized;
            self.apply(self.default_selection);
        }
    }

    /// Re-range the scale for a new width. The selection is kept in dates.
    pub fn resize(&mut self, width: f64) {
        self.width = width;
        self.scale = self
            .scale
            .with_range(MARGIN.left, (width - MARGIN.right).max(MARGIN.left));
    }

    /// Handle the end of a drag from `p0` to `p1` (pixels).
    ///
    /// Returns `false` and changes nothing when the gesture collapses to an
    /// empty selection, such as a click without movement.
    pub fn drag_end(&mut self, p0: f64, p1: f64) -> bool {
        if self.state == BrushState::Uninitialized {
            log::debug!("brush: drag before mount ignored");
            return false;
        }
        let ((x0, _), (x1, _)) = self.extent();
        let a = p0.clamp(x0, x1);
        let b = p1.clamp(x0, x1);
        if a == b {
            return false;
        }
        let interval = DateInterval::new(
            self.scale.invert(a.min(b)),
            self.scale.invert(a.max(b)),
        );
        self.state = BrushState::UserAdjusted;
        self.apply(interval);
        true
    }

    /// Slide the current selection `dx` pixels, keeping its span and
    /// stopping at the edges of the brushable area. Returns `false` when
    /// nothing moved.
    pub fn move_by(&mut self, dx: f64) -> bool {
        if self.state == BrushState::Uninitialized {
            return false;
        }
        let Some((a, b)) = self.selection_pixels() else {
            return false;
        };
        let ((x0, _), (x1, _)) = self.extent();
        let shift = dx.max(x0 - a).min(x1 - b);
        if shift == 0.0 {
            return false;
        }
        let interval = DateInterval::new(self.scale.invert(a + shift), self.scale.invert(b + shift));
        self.state = BrushState::UserAdjusted;
        self.apply(interval);
        true
    }

    fn apply(&mut self, interval: DateInterval) {
        self.selection = Some(interval);
        log::debug!(
            "brush: selection {} .. {}",
            format_date(&interval.start.date()),
            format_date(&interval.end.date())
        );
        if let Some(callback) = self.on_change.as_mut() {
            callback(interval);
        }
    }

    pub fn state(&self) -> BrushState {
        self.state
    }

    pub fn scale(&self) -> &TimeScale {
        &self.scale
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn selection(&self) -> Option<DateInterval> {
        self.selection
    }

    /// Brushable area as `((x0, y0), (x1, y1))`.
    pub fn extent(&self) -> ((f64, f64), (f64, f64)) {
        let (x0, x1) = self.scale.range();
        ((x0, MARGIN.top), (x1, BRUSH_HEIGHT - MARGIN.bottom))
    }

    /// Pixel span of the current selection, for drawing the brush rectangle.
    pub fn selection_pixels(&self) -> Option<(f64, f64)> {
        self.selection.map(|s| {
            (
                self.scale.scale_datetime(&s.start),
                self.scale.scale_datetime(&s.end),
            )
        })
    }

    /// "DD-MM-YYYY" readouts for the start and end of the selection.
    pub fn labels(&self) -> (String, String) {
        let s = self.selection.unwrap_or(self.default_selection);
        (format_display(&s.start.date()), format_display(&s.end.date()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn brush_with_log() -> (TemporalBrush, Rc<RefCell<Vec<DateInterval>>>) {
        let domain = (ymd(1990, 1, 1), ymd(2025, 1, 1));
        let mut brush = TemporalBrush::new(
            domain.0,
            domain.1,
            DateInterval::from_dates(domain.0, domain.1),
        );
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = emitted.clone();
        brush.on_change(move |interval| sink.borrow_mut().push(interval));
        (brush, emitted)
    }

    #[test]
    fn scale_maps_domain_to_range() {
        let scale = TimeScale::new(ymd(1990, 1, 1), ymd(2025, 1, 1)).with_range(20.0, 620.0);
        assert_eq!(scale.scale(&ymd(1990, 1, 1)), 20.0);
        assert_eq!(scale.scale(&ymd(2025, 1, 1)), 620.0);
        assert_eq!(scale.invert(20.0), ymd(1990, 1, 1).and_time(NaiveTime::MIN));
        assert_eq!(scale.invert(620.0), ymd(2025, 1, 1).and_time(NaiveTime::MIN));
    }

    #[test]
    fn scale_invert_is_inverse_of_scale() {
        let scale = TimeScale::new(ymd(1990, 1, 1), ymd(2025, 1, 1)).with_range(20.0, 620.0);
        let date = ymd(2007, 7, 14);
        assert_eq!(scale.invert(scale.scale(&date)).date(), date);
    }

    #[test]
    fn ticks_fall_on_step_years() {
        let scale = TimeScale::new(ymd(1990, 1, 1), ymd(2025, 1, 1)).with_range(20.0, 620.0);
        let years: Vec<i32> = scale.ticks(5).iter().map(|(d, _)| d.year()).collect();
        assert_eq!(years, vec![1990, 1995, 2000, 2005, 2010, 2015, 2020, 2025]);

        let mid = TimeScale::new(ymd(1991, 6, 1), ymd(2001, 1, 1));
        let years: Vec<i32> = mid.ticks(5).iter().map(|(d, _)| d.year()).collect();
        assert_eq!(years, vec![1995, 2000]);
    }

    #[test]
    fn first_mount_applies_default_once() {
        let (mut brush, emitted) = brush_with_log();
        assert_eq!(brush.state(), BrushState::Uninitialized);
        assert_eq!(brush.selection(), None);

        brush.mount(640.0);
        assert_eq!(brush.state(), BrushState::Initialized);
        let default = DateInterval::from_dates(ymd(1990, 1, 1), ymd(2025, 1, 1));
        assert_eq!(brush.selection(), Some(default));
        assert_eq!(emitted.borrow().as_slice(), &[default]);

        brush.mount(640.0);
        assert_eq!(emitted.borrow().len(), 1);
    }

    #[test]
    fn default_outside_domain_is_clamped() {
        let mut brush = TemporalBrush::new(
            ymd(1990, 1, 1),
            ymd(2025, 1, 1),
            DateInterval::from_dates(ymd(1980, 1, 1), ymd(2030, 6, 1)),
        );
        brush.mount(640.0);
        let selection = brush.selection().unwrap();
        assert_eq!(selection.start.date(), ymd(1990, 1, 1));
        assert_eq!(selection.end.date(), ymd(2025, 1, 1));
        assert_eq!(brush.selection_pixels(), Some((20.0, 620.0)));
    }

    #[test]
    fn move_keeps_span_and_stops_at_edges() {
        let (mut brush, emitted) = brush_with_log();
        brush.mount(640.0);
        assert!(brush.drag_end(320.0, 420.0));

        assert!(brush.move_by(100.0));
        let (a, b) = brush.selection_pixels().unwrap();
        assert!((a - 420.0).abs() < 1e-3 && (b - 520.0).abs() < 1e-3);
        assert_eq!(brush.state(), BrushState::UserAdjusted);

        assert!(brush.move_by(1000.0));
        let (a, b) = brush.selection_pixels().unwrap();
        assert!((a - 520.0).abs() < 1e-3 && (b - 620.0).abs() < 1e-3);

        let before = emitted.borrow().len();
        assert!(!brush.move_by(50.0));
        assert_eq!(emitted.borrow().len(), before);
    }

    #[test]
    fn move_before_mount_is_ignored() {
        let (mut brush, emitted) = brush_with_log();
        assert!(!brush.move_by(10.0));
        assert!(emitted.borrow().is_empty());
    }

    #[test]
    fn drag_emits_inverted_bounds_in_order() {
        let (mut brush, emitted) = brush_with_log();
        brush.mount(640.0);

        assert!(brush.drag_end(400.0, 100.0));
        let expected = DateInterval {
            start: brush.scale().invert(100.0),
            end: brush.scale().invert(400.0),
        };
        assert_eq!(brush.selection(), Some(expected));
        assert_eq!(emitted.borrow().last(), Some(&expected));
        assert_eq!(brush.state(), BrushState::UserAdjusted);
    }

    #[test]
    fn click_without_drag_is_ignored() {
        let (mut brush, emitted) = brush_with_log();
        brush.mount(640.0);
        brush.drag_end(100.0, 300.0);
        let before = brush.selection();
        let count = emitted.borrow().len();

        assert!(!brush.drag_end(250.0, 250.0));
        assert_eq!(brush.selection(), before);
        assert_eq!(emitted.borrow().len(), count);
    }

    #[test]
    fn drag_collapsing_outside_extent_is_ignored() {
        let (mut brush, emitted) = brush_with_log();
        brush.mount(640.0);
        // Both ends clamp to the left edge.
        assert!(!brush.drag_end(-50.0, 5.0));
        assert_eq!(emitted.borrow().len(), 1);
    }

    #[test]
    fn remount_after_adjustment_keeps_user_selection() {
        let (mut brush, emitted) = brush_with_log();
        brush.mount(640.0);
        brush.drag_end(200.0, 300.0);
        let adjusted = brush.selection();

        brush.mount(640.0);
        assert_eq!(brush.selection(), adjusted);
        assert_eq!(brush.state(), BrushState::UserAdjusted);
        assert_eq!(emitted.borrow().len(), 2);
    }

    #[test]
    fn resize_keeps_dates_and_moves_pixels() {
        let (mut brush, _) = brush_with_log();
        brush.mount(640.0);
        brush.drag_end(120.0, 320.0);
        let selection = brush.selection();
        let (a, _) = brush.selection_pixels().unwrap();

        brush.resize(1240.0);
        assert_eq!(brush.selection(), selection);
        let (b, _) = brush.selection_pixels().unwrap();
        assert!(b > a);
    }

    #[test]
    fn drag_before_mount_is_ignored() {
        let (mut brush, emitted) = brush_with_log();
        assert!(!brush.drag_end(10.0, 200.0));
        assert!(emitted.borrow().is_empty());
    }

    #[test]
    fn labels_use_day_month_year() {
        let (mut brush, _) = brush_with_log();
        assert_eq!(brush.labels(), ("01-01-1990".to_string(), "01-01-2025".to_string()));
        brush.mount(640.0);
        brush.drag_end(20.0, 320.0);
        assert_eq!(brush.labels().0, "01-01-1990");
    }

    #[test]
    fn interval_contains_by_calendar_day() {
        let interval = DateInterval::new(
            ymd(2000, 1, 10).and_hms_opt(12, 0, 0).unwrap(),
            ymd(2000, 1, 1).and_time(NaiveTime::MIN),
        );
        assert_eq!(interval.start.date(), ymd(2000, 1, 1));
        assert!(interval.contains_date(&ymd(2000, 1, 10)));
        assert!(!interval.contains_date(&ymd(2000, 1, 11)));
    }
}
