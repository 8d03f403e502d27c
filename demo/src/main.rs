//! Scripted slider session.
//!
//! Drives a slider the way a host toolkit would: a drag burst, keyboard
//! steps, typing into the numeric field, a bounds change and mark layout at
//! a few track widths. Run with `RUST_LOG=glissade_components=trace` to see
//! the component's own logging.
use std::{sync::Arc, time::Duration};

use glissade_components::slider::{
    SliderArgs, SliderError, SliderState,
    marks::{GeometrySnapshot, LabelMetrics, Mark, MarkSet},
};
use glissade_ui::{
    Instant, KeyEvent, KeyboardState, Modifiers, NamedKey, Px, PxSize, set_scale_factor,
};
use parking_lot::Mutex;
use tracing::info;

/// Frame interval of the simulated host.
const FRAME: Duration = Duration::from_millis(16);

/// Host-owned value plus everything needed to rebuild args each frame.
struct Host {
    value: Arc<Mutex<f64>>,
    marks: Arc<MarkSet>,
    max: f64,
}

impl Host {
    fn args(&self) -> SliderArgs {
        let sink = Arc::clone(&self.value);
        SliderArgs::scalar(*self.value.lock(), move |next| {
            info!("on_change({next})");
            *sink.lock() = next;
        })
        .max(self.max)
        .step(0.5)
        .unit(" dB")
        .reset_value(50.0)
        .marks_shared(Arc::clone(&self.marks))
        .on_focus(|| info!("numeric field focused"))
        .on_blur(|| info!("numeric field blurred"))
    }
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("info,glissade_components=debug")
        {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("info"),
        },
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

fn main() -> Result<(), SliderError> {
    init_tracing();
    set_scale_factor(1.0);

    let marks = MarkSet::new((0..=10).map(|i| {
        let value = f64::from(i) * 10.0;
        Mark::new(value, format!("{value:.0} dB"))
    }))?;
    let mut host = Host {
        value: Arc::new(Mutex::new(20.0)),
        marks: Arc::new(marks),
        max: 100.0,
    };
    let mut state = SliderState::new();
    let mut now = Instant::now();

    // Drag burst: one value per frame, released after the last move.
    let args = host.args();
    state.sync(&args)?;
    state.pointer_down(&args);
    for step in 0..12 {
        let args = host.args();
        state.drag(&args, 20.0 + f64::from(step) * 3.3, now);
        state.tick(&args, now);
        now += FRAME;
    }
    info!(pending = ?state.pending(), "drag in flight");
    state.pointer_up(&host.args());
    info!(value = *host.value.lock(), "after release");

    // Keyboard: queued by the host, drained once per frame.
    let mut keyboard = KeyboardState::default();
    keyboard.push_event(KeyEvent::new(NamedKey::ArrowRight));
    keyboard.push_event(KeyEvent::with_modifiers(
        NamedKey::ArrowRight,
        Modifiers::SHIFT,
    ));
    keyboard.push_event(KeyEvent::new(NamedKey::Character('x')));
    for event in keyboard.take_events() {
        let args = host.args();
        state.sync(&args)?;
        let outcome = state.key(&args, &event);
        info!(key = ?event.key, ?outcome, "key");
    }

    // Typing: debounced per keystroke, committed on Enter.
    let args = host.args();
    state.sync(&args)?;
    state.input_focus(&args);
    for text in ["7", "72", "72.", "72.7"] {
        let args = host.args();
        state.input_change(&args, text, now);
        state.sync(&args)?;
        info!(text = state.input_text(), width = ?state.input_width(Px(480)), "typing");
        now += Duration::from_millis(80);
    }
    let args = host.args();
    state.key(&args, &KeyEvent::new(NamedKey::Enter));
    state.sync(&host.args())?;
    info!(text = state.input_text(), "after Enter");

    // Narrowing the range pulls the value back in once.
    host.max = 60.0;
    host.marks = Arc::new(MarkSet::with_range(
        host.marks.iter().filter(|mark| mark.value <= 60.0).cloned(),
        0.0,
        60.0,
    )?);
    state.sync(&host.args())?;
    state.sync(&host.args())?;
    info!(value = *host.value.lock(), "after bounds change");

    let args = host.args();
    if state.shows_reset(&args) {
        state.reset(&args);
    }
    let args = host.args();
    info!(text = %args.display_text(*host.value.lock()), "after reset");

    // Mark layout at a few widths, degrading as the track narrows.
    let metrics: Vec<LabelMetrics> = host
        .marks
        .iter()
        .map(|mark| LabelMetrics {
            natural: PxSize::new(Px(mark.label.len() as i32 * 7), Px(14)),
            shrunk: PxSize::new(Px(mark.label.len() as i32 * 4), Px(12)),
        })
        .collect();
    for width in [640, 280, 120] {
        let geometry = GeometrySnapshot::new(Px(width), Px(10));
        let layout = state.layout_marks(&args, Some(geometry), &metrics);
        info!(
            width,
            visibility = ?layout.visibility,
            labels = layout.visible_labels().len(),
            reserved = ?layout.reserved_height,
            "marks"
        );
    }

    let duration = state.transition_duration(&args);
    info!(?duration, "thumb transition");
    state.unmount();
    Ok(())
}
