//! Mark label placement under the track.
//!
//! The drag primitive keeps the whole thumb inside the track, so a thumb
//! at value `p` (normalized) sits at `p * width + half - p * 2 * half`
//! rather than at `p * width`. Labels use the same correction so they line
//! up with the thumb at both ends of the track.
//!
//! Placement runs in up to two passes. Labels are first laid out at their
//! natural size; if any neighbours end up closer than the minimum spacing,
//! they are re-measured shrink-to-fit and laid out again. If that still
//! collides, every label is hidden.
use std::sync::Arc;

use glissade_ui::{Px, PxSize};
use tracing::{debug, trace};

use super::{SliderError, value::percent};

/// A labelled tick at a fixed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    /// Position on the slider, in slider units.
    pub value: f64,
    /// Text shown under the track.
    pub label: String,
}

impl Mark {
    /// Creates a mark.
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Marks sorted by value, with no duplicates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkSet {
    marks: Vec<Mark>,
}

impl MarkSet {
    /// Sorts and validates marks.
    ///
    /// # Errors
    ///
    /// Returns [`SliderError::NonFiniteMark`] for `NaN`/infinite values and
    /// [`SliderError::DuplicateMark`] when two marks share a value.
    pub fn new(marks: impl IntoIterator<Item = Mark>) -> Result<Self, SliderError> {
        let mut marks: Vec<Mark> = marks.into_iter().collect();
        if marks.iter().any(|mark| !mark.value.is_finite()) {
            return Err(SliderError::NonFiniteMark);
        }
        marks.sort_by(|a, b| a.value.total_cmp(&b.value));
        if let Some(pair) = marks.windows(2).find(|pair| pair[0].value == pair[1].value) {
            return Err(SliderError::DuplicateMark(pair[0].value));
        }
        Ok(Self { marks })
    }

    /// Sorts and validates marks against a slider range.
    ///
    /// # Errors
    ///
    /// Everything [`MarkSet::new`] rejects, plus
    /// [`SliderError::MarkOutOfRange`].
    pub fn with_range(
        marks: impl IntoIterator<Item = Mark>,
        min: f64,
        max: f64,
    ) -> Result<Self, SliderError> {
        let set = Self::new(marks)?;
        set.validate_range(min, max)?;
        Ok(set)
    }

    /// Checks every mark against `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`SliderError::MarkOutOfRange`] for the first offending mark.
    pub fn validate_range(&self, min: f64, max: f64) -> Result<(), SliderError> {
        match self
            .marks
            .iter()
            .find(|mark| mark.value < min || mark.value > max)
        {
            Some(mark) => Err(SliderError::MarkOutOfRange {
                value: mark.value,
                min,
                max,
            }),
            None => Ok(()),
        }
    }

    /// Marks in ascending order.
    pub fn as_slice(&self) -> &[Mark] {
        &self.marks
    }

    /// Iterates marks in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.marks.iter()
    }

    /// Number of marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if there are no marks.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

impl<'a> IntoIterator for &'a MarkSet {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.marks.iter()
    }
}

/// How a label is sized when it is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelFit {
    /// Single line, natural width.
    Natural,
    /// Minimum intrinsic width; text may wrap.
    ShrinkToFit,
}

/// Reads rendered label sizes.
///
/// `index` is the mark's position in its [`MarkSet`]. Returning `None`
/// means the label has not been rendered yet; the layout pass is skipped.
pub trait MeasureLabel {
    /// Measures one label under the given fit.
    fn measure(&self, index: usize, mark: &Mark, fit: LabelFit) -> Option<PxSize>;
}

/// Pre-measured sizes of one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelMetrics {
    /// Size at natural width.
    pub natural: PxSize,
    /// Size at minimum intrinsic width.
    pub shrunk: PxSize,
}

impl LabelMetrics {
    /// Metrics for a label that cannot shrink.
    pub fn fixed(size: PxSize) -> Self {
        Self {
            natural: size,
            shrunk: size,
        }
    }
}

impl MeasureLabel for [LabelMetrics] {
    fn measure(&self, index: usize, _mark: &Mark, fit: LabelFit) -> Option<PxSize> {
        self.get(index).map(|metrics| match fit {
            LabelFit::Natural => metrics.natural,
            LabelFit::ShrinkToFit => metrics.shrunk,
        })
    }
}

impl MeasureLabel for Vec<LabelMetrics> {
    fn measure(&self, index: usize, mark: &Mark, fit: LabelFit) -> Option<PxSize> {
        self.as_slice().measure(index, mark, fit)
    }
}

/// Track geometry read from the host after layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometrySnapshot {
    /// Width of the track in pixels.
    pub track_width: Px,
    /// Half the thumb's width in pixels.
    pub thumb_half_width: Px,
}

impl GeometrySnapshot {
    /// Creates a snapshot.
    pub fn new(track_width: Px, thumb_half_width: Px) -> Self {
        Self {
            track_width,
            thumb_half_width,
        }
    }

    /// A zero-width track means the host has not laid it out yet.
    pub fn is_ready(&self) -> bool {
        self.track_width.0 > 0
    }
}

/// Offset that pulls a position inward by up to half a thumb at the ends.
///
/// Positive at the start of the track, zero in the middle, negative at the
/// end.
pub fn edge_smoothing(value_percent: f32, thumb_half_width: f32) -> f32 {
    thumb_half_width - value_percent * (thumb_half_width / 0.5)
}

/// Horizontal centre of the thumb for a normalized value.
pub fn thumb_center(value_percent: f32, geometry: GeometrySnapshot) -> f32 {
    let half = geometry.thumb_half_width.to_f32();
    value_percent * geometry.track_width.to_f32() + edge_smoothing(value_percent, half)
}

/// Normalized value under a pointer at `x`; the inverse of
/// [`thumb_center`]. `None` if the track is not wider than the thumb.
pub fn fraction_at(x: Px, geometry: GeometrySnapshot) -> Option<f32> {
    let half = geometry.thumb_half_width.to_f32();
    let travel = geometry.track_width.to_f32() - half * 2.0;
    if travel <= 0.0 {
        return None;
    }
    Some(((x.to_f32() - half) / travel).clamp(0.0, 1.0))
}

/// How the labels ended up being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkVisibility {
    /// Labels at natural size.
    #[default]
    Natural,
    /// Labels constrained to their minimum intrinsic width.
    Shrunk,
    /// Labels could not be placed without overlap and are all hidden.
    Hidden,
}

/// Final position of one label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkPlacement {
    /// Mark value.
    pub value: f64,
    /// Left edge relative to the track.
    pub left: Px,
    /// Rendered label size.
    pub size: PxSize,
}

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkLayout {
    /// Whether labels are shown, and at which size.
    pub visibility: MarkVisibility,
    /// One placement per mark, in ascending value order. Present even when
    /// hidden so ticks can still be drawn.
    pub placements: Vec<MarkPlacement>,
    /// Vertical space the marks row should reserve.
    pub reserved_height: Px,
}

impl MarkLayout {
    /// Returns `true` if labels should not be drawn.
    pub fn is_hidden(&self) -> bool {
        self.visibility == MarkVisibility::Hidden
    }

    /// Placements of labels that should be drawn.
    pub fn visible_labels(&self) -> &[MarkPlacement] {
        if self.is_hidden() {
            &[]
        } else {
            &self.placements
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    left: f32,
    size: PxSize,
}

fn measure_all<M>(marks: &MarkSet, measure: &M, fit: LabelFit) -> Option<Vec<PxSize>>
where
    M: MeasureLabel + ?Sized,
{
    marks
        .iter()
        .enumerate()
        .map(|(index, mark)| measure.measure(index, mark, fit))
        .collect()
}

fn place(
    marks: &MarkSet,
    sizes: &[PxSize],
    min: f64,
    max: f64,
    geometry: GeometrySnapshot,
) -> Vec<Slot> {
    let track = geometry.track_width.to_f32();
    marks
        .iter()
        .zip(sizes)
        .map(|(mark, size)| {
            let value_percent = percent(mark.value, min, max) as f32;
            let width = size.width.to_f32();
            let left = thumb_center(value_percent, geometry) - width / 2.0;
            let max_left = (track - width).max(0.0);
            Slot {
                left: left.clamp(0.0, max_left),
                size: *size,
            }
        })
        .collect()
}

fn collides(slots: &[Slot], min_spacing: Px) -> bool {
    let spacing = min_spacing.to_f32();
    slots.windows(2).any(|pair| {
        let right_edge = pair[0].left + pair[0].size.width.to_f32();
        pair[1].left - right_edge < spacing
    })
}

/// Lays out mark labels for one geometry.
///
/// Returns `None` if a label cannot be measured yet; callers keep their
/// previous layout in that case.
#[tracing::instrument(level = "trace", skip(marks, measure))]
pub fn layout_marks<M>(
    marks: &MarkSet,
    min: f64,
    max: f64,
    geometry: GeometrySnapshot,
    measure: &M,
    min_spacing: Px,
) -> Option<MarkLayout>
where
    M: MeasureLabel + ?Sized,
{
    if marks.is_empty() {
        return Some(MarkLayout::default());
    }

    let mut visibility = MarkVisibility::Natural;
    let mut sizes = measure_all(marks, measure, LabelFit::Natural)?;
    let mut slots = place(marks, &sizes, min, max, geometry);

    if collides(&slots, min_spacing) {
        debug!("Mark labels collide at natural width, shrinking to fit");
        visibility = MarkVisibility::Shrunk;
        sizes = measure_all(marks, measure, LabelFit::ShrinkToFit)?;
        slots = place(marks, &sizes, min, max, geometry);
        if collides(&slots, min_spacing) {
            debug!("Mark labels still collide after shrinking, hiding all labels");
            visibility = MarkVisibility::Hidden;
        }
    }

    let reserved_height = if visibility == MarkVisibility::Hidden {
        Px::ZERO
    } else {
        sizes.iter().map(|size| size.height).max().unwrap_or(Px::ZERO)
    };

    let placements = marks
        .iter()
        .zip(&slots)
        .map(|(mark, slot)| MarkPlacement {
            value: mark.value,
            left: Px::round_from_f32(slot.left),
            size: slot.size,
        })
        .collect();

    Some(MarkLayout {
        visibility,
        placements,
        reserved_height,
    })
}

#[derive(Debug, Clone)]
struct LayoutKey {
    // Owned, so the address stays unique while the key lives.
    marks: Arc<MarkSet>,
    geometry: GeometrySnapshot,
    min: u64,
    max: u64,
}

impl LayoutKey {
    fn new(marks: &Arc<MarkSet>, min: f64, max: f64, geometry: GeometrySnapshot) -> Self {
        Self {
            marks: Arc::clone(marks),
            geometry,
            min: min.to_bits(),
            max: max.to_bits(),
        }
    }

    fn matches(&self, marks: &Arc<MarkSet>, min: f64, max: f64, geometry: GeometrySnapshot) -> bool {
        Arc::ptr_eq(&self.marks, marks)
            && self.geometry == geometry
            && self.min == min.to_bits()
            && self.max == max.to_bits()
    }
}

/// Re-runs [`layout_marks`] only when its inputs change.
///
/// Inputs are keyed on mark set identity, track geometry and range, the
/// same keys a post-layout effect would depend on. The cache keeps the last
/// laid-out set alive until the key changes.
#[derive(Debug, Default)]
pub struct MarkLayoutCache {
    key: Option<LayoutKey>,
    layout: MarkLayout,
}

impl MarkLayoutCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent layout.
    pub fn layout(&self) -> &MarkLayout {
        &self.layout
    }

    /// Forces the next [`update`](Self::update) to recompute, e.g. after
    /// fonts finish loading.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// Drops the cached layout and any reserved height.
    pub fn clear(&mut self) {
        self.key = None;
        self.layout = MarkLayout::default();
    }

    /// Brings the layout up to date.
    ///
    /// Missing or empty marks clear the layout. Missing geometry or labels
    /// that cannot be measured leave the previous layout untouched.
    pub fn update<M>(
        &mut self,
        marks: Option<&Arc<MarkSet>>,
        min: f64,
        max: f64,
        geometry: Option<GeometrySnapshot>,
        measure: &M,
        min_spacing: Px,
    ) -> &MarkLayout
    where
        M: MeasureLabel + ?Sized,
    {
        let Some(marks) = marks.filter(|marks| !marks.is_empty()) else {
            self.clear();
            return &self.layout;
        };
        let Some(geometry) = geometry.filter(GeometrySnapshot::is_ready) else {
            trace!("Track geometry not available yet, skipping mark layout");
            return &self.layout;
        };

        if self
            .key
            .as_ref()
            .is_some_and(|key| key.matches(marks, min, max, geometry))
        {
            return &self.layout;
        }

        match layout_marks(marks, min, max, geometry, measure, min_spacing) {
            Some(layout) => {
                self.layout = layout;
                self.key = Some(LayoutKey::new(marks, min, max, geometry));
            }
            None => trace!("Mark labels not measured yet, keeping previous layout"),
        }
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACING: Px = Px(16);

    fn decade_marks() -> MarkSet {
        MarkSet::with_range(
            (0..=10).map(|i| Mark::new(f64::from(i * 10), format!("{}%", i * 10))),
            0.0,
            100.0,
        )
        .expect("decade marks are valid")
    }

    fn geometry(track: i32, half: i32) -> GeometrySnapshot {
        GeometrySnapshot::new(Px(track), Px(half))
    }

    #[test]
    fn construction_rejects_bad_marks() {
        assert_eq!(
            MarkSet::new([Mark::new(10.0, "a"), Mark::new(10.0, "b")]),
            Err(SliderError::DuplicateMark(10.0))
        );
        assert_eq!(
            MarkSet::new([Mark::new(f64::NAN, "a")]),
            Err(SliderError::NonFiniteMark)
        );
        assert_eq!(
            MarkSet::with_range([Mark::new(120.0, "too far")], 0.0, 100.0),
            Err(SliderError::MarkOutOfRange {
                value: 120.0,
                min: 0.0,
                max: 100.0
            })
        );
    }

    #[test]
    fn construction_sorts_marks() {
        let set = MarkSet::new([Mark::new(50.0, "mid"), Mark::new(0.0, "low")])
            .expect("marks are valid");
        let values: Vec<f64> = set.iter().map(|mark| mark.value).collect();
        assert_eq!(values, vec![0.0, 50.0]);
    }

    #[test]
    fn smoothing_is_symmetric_at_both_ends() {
        assert_eq!(edge_smoothing(0.0, 8.0), 8.0);
        assert_eq!(edge_smoothing(0.5, 8.0), 0.0);
        assert_eq!(edge_smoothing(1.0, 8.0), -8.0);

        let geo = geometry(300, 8);
        assert_eq!(thumb_center(0.0, geo), 8.0);
        assert_eq!(thumb_center(1.0, geo), 292.0);
    }

    #[test]
    fn pointer_fraction_inverts_thumb_center() {
        let geo = geometry(300, 8);
        assert_eq!(fraction_at(Px(8), geo), Some(0.0));
        assert_eq!(fraction_at(Px(150), geo), Some(0.5));
        assert_eq!(fraction_at(Px(400), geo), Some(1.0));
        assert_eq!(fraction_at(Px(5), geometry(16, 8)), None);
    }

    #[test]
    fn end_labels_follow_the_thumb() {
        let marks = MarkSet::with_range(
            [Mark::new(0.0, "min"), Mark::new(100.0, "max")],
            0.0,
            100.0,
        )
        .expect("marks are valid");
        let metrics = vec![LabelMetrics::fixed(PxSize::from([10, 14])); 2];
        let layout = layout_marks(&marks, 0.0, 100.0, geometry(300, 8), &metrics, SPACING);
        let layout = layout.expect("labels are measured");

        assert_eq!(layout.visibility, MarkVisibility::Natural);
        // 0 + 8 - 5 and 300 - 8 - 5
        assert_eq!(layout.placements[0].left, Px(3));
        assert_eq!(layout.placements[1].left, Px(287));
        assert_eq!(layout.reserved_height, Px(14));
    }

    #[test]
    fn wide_end_labels_clamp_to_the_track() {
        let marks = MarkSet::with_range(
            [Mark::new(0.0, "minimum"), Mark::new(100.0, "maximum")],
            0.0,
            100.0,
        )
        .expect("marks are valid");
        let metrics = vec![LabelMetrics::fixed(PxSize::from([60, 14])); 2];
        let layout = layout_marks(&marks, 0.0, 100.0, geometry(300, 8), &metrics, SPACING)
            .expect("labels are measured");
        assert_eq!(layout.placements[0].left, Px(0));
        assert_eq!(layout.placements[1].left, Px(240));
    }

    #[test]
    fn crowded_labels_shrink_before_hiding() {
        let marks = decade_marks();
        let metrics = vec![
            LabelMetrics {
                natural: PxSize::from([40, 16]),
                shrunk: PxSize::from([12, 32]),
            };
            11
        ];
        let layout = layout_marks(&marks, 0.0, 100.0, geometry(300, 8), &metrics, Px(4))
            .expect("labels are measured");
        assert_eq!(layout.visibility, MarkVisibility::Shrunk);
        assert_eq!(layout.reserved_height, Px(32));
        assert_eq!(layout.visible_labels().len(), 11);
    }

    #[test]
    fn unshrinkable_crowded_labels_are_all_hidden() {
        let marks = decade_marks();
        let metrics = vec![LabelMetrics::fixed(PxSize::from([40, 16])); 11];
        let layout = layout_marks(&marks, 0.0, 100.0, geometry(300, 8), &metrics, SPACING)
            .expect("labels are measured");

        assert_eq!(layout.visibility, MarkVisibility::Hidden);
        assert!(layout.visible_labels().is_empty());
        assert_eq!(layout.placements.len(), 11);
        assert_eq!(layout.reserved_height, Px::ZERO);
    }

    #[test]
    fn shown_labels_never_overlap() {
        let marks = decade_marks();
        let metrics = vec![
            LabelMetrics {
                natural: PxSize::from([40, 16]),
                shrunk: PxSize::from([24, 30]),
            };
            11
        ];
        for width in (100..=1200).step_by(50) {
            let layout = layout_marks(&marks, 0.0, 100.0, geometry(width, 8), &metrics, SPACING)
                .expect("labels are measured");
            let shown = layout.visible_labels();
            for pair in shown.windows(2) {
                let gap = pair[1].left.0 - (pair[0].left.0 + pair[0].size.width.0);
                // Rounding each left edge may cost a pixel on each side.
                assert!(gap >= SPACING.0 - 1, "width {width}: gap {gap}");
            }
        }
    }

    #[test]
    fn unmeasured_labels_skip_the_pass() {
        let marks = decade_marks();
        let metrics = vec![LabelMetrics::default(); 3];
        assert_eq!(
            layout_marks(&marks, 0.0, 100.0, geometry(300, 8), &metrics, SPACING),
            None
        );
    }

    #[test]
    fn cache_recomputes_only_on_key_change() {
        let marks = Arc::new(
            MarkSet::with_range([Mark::new(50.0, "half")], 0.0, 100.0).expect("marks are valid"),
        );
        let small = vec![LabelMetrics::fixed(PxSize::from([20, 10]))];
        let tall = vec![LabelMetrics::fixed(PxSize::from([20, 40]))];
        let mut cache = MarkLayoutCache::new();

        let first = cache
            .update(Some(&marks), 0.0, 100.0, Some(geometry(300, 8)), &small, SPACING)
            .clone();
        assert_eq!(first.reserved_height, Px(10));

        // Same key: the new measurements are not consulted.
        let same = cache.update(Some(&marks), 0.0, 100.0, Some(geometry(300, 8)), &tall, SPACING);
        assert_eq!(same.reserved_height, Px(10));

        let resized = cache.update(Some(&marks), 0.0, 100.0, Some(geometry(400, 8)), &tall, SPACING);
        assert_eq!(resized.reserved_height, Px(40));
    }

    #[test]
    fn cache_recomputes_for_a_replacement_set_of_equal_length() {
        let metrics = vec![LabelMetrics::fixed(PxSize::from([40, 12])); 2];
        let geo = Some(geometry(300, 8));
        let mut cache = MarkLayoutCache::new();

        let crowded = Arc::new(
            MarkSet::with_range([Mark::new(0.0, "0"), Mark::new(10.0, "10")], 0.0, 100.0)
                .expect("marks are valid"),
        );
        let first = cache.update(Some(&crowded), 0.0, 100.0, geo, &metrics, SPACING);
        assert_eq!(first.visibility, MarkVisibility::Hidden);
        drop(crowded);

        let spread = Arc::new(
            MarkSet::with_range([Mark::new(50.0, "50"), Mark::new(100.0, "100")], 0.0, 100.0)
                .expect("marks are valid"),
        );
        let next = cache.update(Some(&spread), 0.0, 100.0, geo, &metrics, SPACING);
        let values: Vec<f64> = next.placements.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![50.0, 100.0]);
        assert_eq!(next.visibility, MarkVisibility::Natural);
    }

    #[test]
    fn cache_waits_for_geometry_and_clears_on_empty_marks() {
        let marks = Arc::new(
            MarkSet::with_range([Mark::new(50.0, "half")], 0.0, 100.0).expect("marks are valid"),
        );
        let metrics = vec![LabelMetrics::fixed(PxSize::from([20, 10]))];
        let mut cache = MarkLayoutCache::new();

        let pending = cache.update(Some(&marks), 0.0, 100.0, None, &metrics, SPACING);
        assert!(pending.placements.is_empty());
        cache.update(Some(&marks), 0.0, 100.0, Some(geometry(0, 8)), &metrics, SPACING);
        assert!(cache.layout().placements.is_empty());

        cache.update(Some(&marks), 0.0, 100.0, Some(geometry(300, 8)), &metrics, SPACING);
        assert_eq!(cache.layout().reserved_height, Px(10));

        let empty = Arc::new(MarkSet::default());
        let cleared = cache.update(Some(&empty), 0.0, 100.0, Some(geometry(300, 8)), &metrics, SPACING);
        assert_eq!(cleared.reserved_height, Px::ZERO);
        assert!(cleared.placements.is_empty());
    }
}
