use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use whiteboard_shared::render::{stroke_path, CompositeOp, PathCommand, StrokeStyle};
use whiteboard_shared::Stroke;

const FALLBACK_SIZE: (u32, u32) = (800, 600);

/// Canvas size that fits the window below the title, with a small margin.
pub fn viewport_size() -> (u32, u32) {
    let Some(window) = web_sys::window() else {
        return FALLBACK_SIZE;
    };
    let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64());

    match (read(window.inner_width()), read(window.inner_height())) {
        (Some(w), Some(h)) if w > 40.0 && h > 150.0 => ((w - 40.0) as u32, (h - 150.0) as u32),
        _ => FALLBACK_SIZE,
    }
}

/// Redraws every stroke onto the canvas with the given element id, in arrival order.
pub fn paint(canvas_id: &str, strokes: &[Stroke]) -> Result<(), JsValue> {
    let Some(element) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(canvas_id))
    else {
        // Not mounted yet; the next change repaints.
        return Ok(());
    };

    let canvas: HtmlCanvasElement = element.dyn_into()?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;

    ctx.set_global_composite_operation(CompositeOp::SourceOver.as_canvas_str())?;
    ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");

    for stroke in strokes {
        draw_stroke(&ctx, stroke)?;
    }

    ctx.set_global_composite_operation(CompositeOp::SourceOver.as_canvas_str())
}

fn draw_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke) -> Result<(), JsValue> {
    let style = StrokeStyle::of(stroke);
    ctx.set_global_composite_operation(style.composite.as_canvas_str())?;
    ctx.set_stroke_style_str(style.color);
    ctx.set_line_width(style.width);

    ctx.begin_path();
    for command in stroke_path(stroke) {
        match command {
            PathCommand::MoveTo(p) => ctx.move_to(p.x, p.y),
            PathCommand::LineTo(p) => ctx.line_to(p.x, p.y),
            PathCommand::QuadTo { control, to } => {
                ctx.quadratic_curve_to(control.x, control.y, to.x, to.y)
            }
            PathCommand::CubicTo { c1, c2, to } => {
                ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y)
            }
        }
    }
    ctx.stroke();
    Ok(())
}
