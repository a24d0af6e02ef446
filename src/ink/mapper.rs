//! Raw device units to real units.
//!
//! Mapping is a pure function applied once per dot after its page is sealed.
//! It never runs inside the tracker, so the state machine stays unit-agnostic.

use super::{Dot, Page, RawDot, RawPage, RawStroke, Stroke};
use crate::format::ScaleTable;

/// Map one dot: coordinates times scale, pressure over its maximum.
pub fn map_dot(dot: &RawDot, scale: &ScaleTable) -> Dot {
    let pressure = if scale.pressure_max > 0.0 {
        (dot.pressure as f64 / scale.pressure_max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Dot {
        x: dot.x as f64 * scale.x_scale,
        y: dot.y as f64 * scale.y_scale,
        pressure,
        tilt: dot.tilt,
        timestamp: dot.timestamp,
    }
}

fn map_stroke(stroke: &RawStroke, scale_override: Option<&ScaleTable>) -> Stroke {
    let scale = scale_override.unwrap_or(&stroke.format.spec().scale);
    Stroke {
        start_time: stroke.start_time,
        end_time: stroke.end_time,
        dots: stroke.dots.iter().map(|dot| map_dot(dot, scale)).collect(),
    }
}

/// Map a sealed page. Each stroke uses the scale table of the format it was
/// recorded in unless `scale_override` is given.
pub fn map_page(page: &RawPage, scale_override: Option<&ScaleTable>) -> Page {
    Page {
        id: page.id,
        strokes: page
            .strokes
            .iter()
            .map(|stroke| map_stroke(stroke, scale_override))
            .collect(),
    }
}
