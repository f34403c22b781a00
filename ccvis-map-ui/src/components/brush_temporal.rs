//! Date-range brush drawn as SVG over a yearly time axis.
//!
//! Pressing outside the selection draws a new one; pressing inside slides
//! it. Gesture handling lives here; selection semantics live in
//! [`ccvis_viz::brush::TemporalBrush`]. The brush is built once per component
//! instance, so re-renders and resizes never reset the user's selection.

use ccvis_viz::brush::{DateInterval, BRUSH_HEIGHT, MARGIN};
use ccvis_viz::config::BrushConfig;
use chrono::Datelike;
use dioxus::prelude::*;

/// Pointer gesture in progress, in SVG pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    /// Pressed outside the selection: draw a new one.
    Select { start: f64, pointer: f64 },
    /// Pressed inside the selection: slide it.
    Move { origin: f64, pointer: f64 },
}

impl Gesture {
    fn with_pointer(self, x: f64) -> Self {
        match self {
            Gesture::Select { start, .. } => Gesture::Select { start, pointer: x },
            Gesture::Move { origin, .. } => Gesture::Move { origin, pointer: x },
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct BrushTemporalProps {
    pub config: BrushConfig,
    /// Receives the default selection once, then every completed drag.
    pub on_change: EventHandler<DateInterval>,
}

#[component]
pub fn BrushTemporal(props: BrushTemporalProps) -> Element {
    let on_change = props.on_change;
    let tick_step = props.config.tick_step_years;
    let config = props.config.clone();
    let mut brush = use_signal(move || {
        let mut brush = config.build();
        brush.on_change(move |interval| on_change.call(interval));
        brush
    });
    let mut gesture: Signal<Option<Gesture>> = use_signal(|| None);

    let mut finish_gesture = move |x: f64| {
        let current = gesture();
        gesture.set(None);
        match current {
            Some(Gesture::Select { start, .. }) => {
                brush.write().drag_end(start, x);
            }
            Some(Gesture::Move { origin, .. }) => {
                brush.write().move_by(x - origin);
            }
            None => {}
        }
    };

    let current = brush.read();
    let width = current.width();
    let ((x0, y0), (x1, y1)) = current.extent();
    let band_height = y1 - y0;
    let axis_y = BRUSH_HEIGHT - MARGIN.bottom;
    let tick_end = axis_y + 6.0;
    let tick_label_y = axis_y + 16.0;
    let padding = MARGIN.left;
    let ticks: Vec<(i32, f64)> = current
        .scale()
        .ticks(tick_step)
        .into_iter()
        .map(|(date, px)| (date.year(), px))
        .collect();
    let (label_start, label_end) = current.labels();
    // (left, width) of the selection rectangle
    let selected = match gesture() {
        Some(Gesture::Select { start, pointer }) => {
            Some((start.min(pointer), (start - pointer).abs()))
        }
        Some(Gesture::Move { origin, pointer }) => current.selection_pixels().map(|(a, b)| {
            let shift = (pointer - origin).max(x0 - a).min(x1 - b);
            (a + shift, b - a)
        }),
        None => current.selection_pixels().map(|(a, b)| (a, b - a)),
    };
    drop(current);

    rsx! {
        div {
            style: "width: 100%; color: #fff; background: rgb(20,20,20); padding: 6px 0; font-size: 12px; user-select: none;",
            onmounted: move |evt: MountedEvent| async move {
                if let Ok(rect) = evt.get_client_rect().await {
                    brush.write().mount(rect.width());
                }
            },
            onresize: move |evt: Event<ResizeData>| {
                if let Ok(size) = evt.get_content_box_size() {
                    brush.write().mount(size.width);
                }
            },
            div {
                style: "padding: 0 {padding}px;",
                "fecha inicial: {label_start}"
                br {}
                "fecha final: {label_end}"
            }
            svg {
                width: "{width}",
                height: "{BRUSH_HEIGHT}",
                view_box: "0 0 {width} {BRUSH_HEIGHT}",
                line {
                    x1: "{x0}",
                    x2: "{x1}",
                    y1: "{axis_y}",
                    y2: "{axis_y}",
                    stroke: "#fff",
                }
                for (year, px) in ticks {
                    g {
                        key: "{year}",
                        line {
                            x1: "{px}",
                            x2: "{px}",
                            y1: "{axis_y}",
                            y2: "{tick_end}",
                            stroke: "#fff",
                        }
                        text {
                            x: "{px}",
                            y: "{tick_label_y}",
                            fill: "#fff",
                            style: "font-size: 10px; text-anchor: middle;",
                            "{year}"
                        }
                    }
                }
                if let Some((left, span)) = selected {
                    rect {
                        x: "{left}",
                        y: "{y0}",
                        width: "{span}",
                        height: "{band_height}",
                        fill: "rgba(255,255,255,0.3)",
                        stroke: "#fff",
                    }
                }
                // Topmost overlay so pointer coordinates are SVG coordinates.
                rect {
                    x: "0",
                    y: "0",
                    width: "{width}",
                    height: "{BRUSH_HEIGHT}",
                    fill: "transparent",
                    style: "cursor: crosshair;",
                    onmousedown: move |evt: MouseEvent| {
                        let x = evt.element_coordinates().x;
                        let inside = brush
                            .read()
                            .selection_pixels()
                            .is_some_and(|(a, b)| a < x && x < b);
                        gesture.set(Some(if inside {
                            Gesture::Move { origin: x, pointer: x }
                        } else {
                            Gesture::Select { start: x, pointer: x }
                        }));
                    },
                    onmousemove: move |evt: MouseEvent| {
                        if let Some(g) = gesture() {
                            gesture.set(Some(g.with_pointer(evt.element_coordinates().x)));
                        }
                    },
                    onmouseup: move |evt: MouseEvent| finish_gesture(evt.element_coordinates().x),
                    onmouseleave: move |evt: MouseEvent| finish_gesture(evt.element_coordinates().x),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gesture_tracks_pointer_and_keeps_anchor() {
        let select = Gesture::Select { start: 40.0, pointer: 40.0 }.with_pointer(90.0);
        assert_eq!(select, Gesture::Select { start: 40.0, pointer: 90.0 });
        let slide = Gesture::Move { origin: 300.0, pointer: 300.0 }.with_pointer(250.0);
        assert_eq!(slide, Gesture::Move { origin: 300.0, pointer: 250.0 });
    }
}
