//! Headless components for glissade.
//!
//! # Usage
//!
//! Components here hold interaction state and compute geometry; drawing is
//! left to the host. Each render, build the component's args from your own
//! state, sync the component's state with them and route input events in.
//!
//! # Example
//!
//! ```
//! use glissade_components::slider::{
//!     SliderArgs, SliderState,
//!     marks::{GeometrySnapshot, LabelMetrics, Mark, MarkSet},
//! };
//! use glissade_ui::{Px, PxSize};
//!
//! let marks = MarkSet::new([Mark::new(0.0, "0°C"), Mark::new(100.0, "100°C")])?;
//! let args = SliderArgs::scalar(37.0, |_| {}).marks(marks);
//! let mut state = SliderState::new();
//! state.sync(&args)?;
//!
//! let metrics = vec![LabelMetrics::fixed(PxSize::new(Px(36), Px(14))); 2];
//! let geometry = GeometrySnapshot::new(Px(240), Px(10));
//! let layout = state.layout_marks(&args, Some(geometry), &metrics);
//! assert_eq!(layout.visible_labels().len(), 2);
//! # Ok::<(), glissade_components::slider::SliderError>(())
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod slider;
