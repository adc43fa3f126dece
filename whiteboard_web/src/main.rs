// The prelude brings all the essential Dioxus items into scope.
use dioxus::prelude::*;
use futures_util::future::{select, Either};
use futures_util::{SinkExt, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message as GlooWsMessage};
use gloo_timers::future::sleep;
use std::pin::pin;
use std::time::Duration;
use whiteboard_shared::shared_types::DEFAULT_PEN_WIDTH;
use whiteboard_shared::{DrawingSurface, Point, Tool, WsMessage};

mod canvas;

// Relay endpoint, overridable at build time.
const RELAY_URL: &str = match option_env!("WHITEBOARD_WS_URL") {
    Some(url) => url,
    None => "ws://localhost:5000/ws",
};
const RECONNECT_DELAY: Duration = Duration::from_secs(1);
const CANVAS_ID: &str = "whiteboard-canvas";
const DEFAULT_COLOR: &str = "#000000";

/// The main application component.
#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        main {
            class: "min-h-screen flex flex-col items-center bg-slate-100 font-sans",
            h1 {
                class: "text-4xl font-bold text-slate-800 tracking-wide py-5",
                "Collaborative Whiteboard"
            }
            Whiteboard {}
        }
    }
}

/// How a connection to the relay ended.
enum ChannelEnd {
    /// The socket failed; try again.
    Dropped,
    /// The component went away; stop for good.
    Closed,
}

/// Keeps a connection to the relay open for as long as the whiteboard lives.
///
/// Inbound frames go straight into `surface`. Outbound messages come from
/// `rx`. A message that fails to send is lost, and anything queued while
/// the socket was down is discarded before reconnecting.
async fn run_channel(mut rx: UnboundedReceiver<WsMessage>, mut surface: Signal<DrawingSurface>) {
    let mut first_attempt = true;
    loop {
        if !first_attempt {
            let dropped = discard_backlog(&mut rx);
            if dropped > 0 {
                log::warn!("Discarded {} message(s) queued while disconnected", dropped);
            }
        }
        first_attempt = false;

        match WebSocket::open(RELAY_URL) {
            Ok(ws) => {
                log::info!("Connected to server!");
                let (mut write, mut read) = ws.split();

                let inbound = async move {
                    while let Some(frame) = read.next().await {
                        match frame {
                            Ok(GlooWsMessage::Text(text)) => match WsMessage::from_frame(&text) {
                                Ok(message) => surface.write().apply_remote(message),
                                Err(e) => log::warn!("Ignoring frame from server: {}", e),
                            },
                            Ok(GlooWsMessage::Bytes(_)) => {}
                            Err(e) => {
                                log::warn!("WebSocket receive failed: {}", e);
                                break;
                            }
                        }
                    }
                };

                let outbound = async {
                    while let Some(message) = rx.next().await {
                        let frame = match message.to_frame() {
                            Ok(frame) => frame,
                            Err(e) => {
                                log::error!("Failed to encode {}: {}", message.kind(), e);
                                continue;
                            }
                        };
                        if write.send(GlooWsMessage::Text(frame)).await.is_err() {
                            log::error!("WebSocket connection closed. Cannot send message.");
                            return ChannelEnd::Dropped;
                        }
                    }
                    ChannelEnd::Closed
                };

                if let Either::Right((ChannelEnd::Closed, _)) =
                    select(pin!(inbound), pin!(outbound)).await
                {
                    return;
                }
                log::warn!("Disconnected from server!");
            }
            Err(e) => log::error!("Failed to connect to WebSocket: {:?}", e),
        }

        sleep(RECONNECT_DELAY).await;
    }
}

/// Drops every message already waiting in `rx` without blocking.
/// Returns how many were dropped.
fn discard_backlog<T>(rx: &mut UnboundedReceiver<T>) -> usize {
    let mut dropped = 0;
    while let Ok(Some(_)) = rx.try_next() {
        dropped += 1;
    }
    dropped
}

fn pointer(evt: &MouseEvent) -> Point {
    let p = evt.element_coordinates();
    Point::new(p.x, p.y)
}

fn end_gesture(mut surface: Signal<DrawingSurface>, channel: Coroutine<WsMessage>) {
    let outbound = surface.write().end_stroke();
    if let Some(message) = outbound {
        channel.send(message);
    }
}

fn tool_button_class(active: bool, accent: &str) -> String {
    if active {
        format!("px-5 py-2 rounded-lg font-bold text-white shadow {accent}")
    } else {
        "px-5 py-2 rounded-lg bg-slate-200 text-slate-700 hover:bg-slate-300".to_string()
    }
}

#[allow(non_snake_case)]
fn Whiteboard() -> Element {
    let mut surface = use_signal(DrawingSurface::new);
    let mut tool = use_signal(|| Tool::Pen);
    let mut color = use_signal(|| DEFAULT_COLOR.to_string());
    let mut stroke_width = use_signal(|| DEFAULT_PEN_WIDTH);
    let (width, height) = use_hook(canvas::viewport_size);

    let channel = use_coroutine(move |rx: UnboundedReceiver<WsMessage>| run_channel(rx, surface));

    // Repaint whenever the canvas state changes.
    use_effect(move || {
        if let Err(e) = canvas::paint(CANVAS_ID, surface.read().strokes()) {
            log::error!("Failed to paint canvas: {:?}", e);
        }
    });

    let pen_class = tool_button_class(tool() == Tool::Pen, "bg-blue-500");
    let eraser_class = tool_button_class(tool() == Tool::Eraser, "bg-red-500");

    rsx! {
        div {
            class: "absolute top-5 right-5 z-10 bg-white px-5 py-4 rounded-xl shadow-lg flex flex-wrap items-center gap-4",

            button { class: "{pen_class}", onclick: move |_| tool.set(Tool::Pen), "Pen" }
            button { class: "{eraser_class}", onclick: move |_| tool.set(Tool::Eraser), "Eraser" }

            input {
                r#type: "color",
                class: "w-11 h-11 p-1 rounded-lg border border-slate-300 cursor-pointer bg-transparent",
                value: "{color}",
                oninput: move |evt| color.set(evt.value()),
            }

            input {
                r#type: "range",
                class: "w-32 cursor-pointer",
                min: "1",
                max: "80",
                value: "{stroke_width}",
                title: "Stroke Width: {stroke_width}",
                oninput: move |evt| {
                    if let Ok(w) = evt.value().parse::<f64>() {
                        stroke_width.set(w);
                    }
                },
            }
            span { class: "text-sm text-slate-600", "{stroke_width}px" }

            button {
                class: "px-5 py-2 rounded-lg bg-slate-700 text-white hover:bg-slate-800",
                onclick: move |_| {
                    let message = surface.write().request_clear();
                    channel.send(message);
                },
                "Clear"
            }
        }

        div {
            class: "grow w-full my-5 bg-white rounded-xl shadow",
            canvas {
                id: CANVAS_ID,
                class: "rounded-xl",
                width: "{width}",
                height: "{height}",
                prevent_default: "onmousedown onmousemove",

                onmousedown: move |evt| {
                    let pending = surface.write().begin_stroke(
                        pointer(&evt),
                        tool(),
                        color(),
                        stroke_width(),
                    );
                    if let Some(message) = pending {
                        channel.send(message);
                    }
                },

                onmousemove: move |evt| {
                    // Skip the signal write entirely while the pointer just hovers.
                    if surface.peek().is_drawing() {
                        surface.write().extend_stroke(pointer(&evt));
                    }
                },

                onmouseup: move |_| end_gesture(surface, channel),
                onmouseleave: move |_| end_gesture(surface, channel),
            }
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    launch(App);
}
