use chrono::Local;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use futures_util::{SinkExt, StreamExt};
use spinners::{Spinner, Spinners};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use whiteboard_shared::{DrawingSurface, Point, Tool, WsMessage};

// The relay the CLI talks to unless told otherwise.
const DEFAULT_SERVER: &str = "http://localhost:5000";

/// A CLI for poking at a collaborative whiteboard relay.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the relay (e.g., http://localhost:5000)
    #[arg(long, global = true, env = "WHITEBOARD_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the relay is up.
    Health,
    /// Print every event the relay forwards to this client.
    Watch {
        /// Stop after this many events and print a summary table.
        #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        count: Option<usize>,
    },
    /// Send one straight stroke.
    /// Example: whiteboard draw --from 10,10 --to 10,50 --color '#ff0000'
    Draw {
        #[arg(long, value_parser = parse_point)]
        from: Point,
        #[arg(long, value_parser = parse_point)]
        to: Point,
        #[arg(long, default_value = "#000000")]
        color: String,
        #[arg(long, default_value_t = 5.0)]
        width: f64,
        #[arg(long, default_value = "pen")]
        tool: Tool,
    },
    /// Wipe every connected canvas.
    Clear,
}

/// One row of the `watch` summary.
#[derive(Debug)]
struct Seen {
    at: String,
    event: String,
    tool: String,
    color: String,
    width: String,
    points: String,
}

impl Seen {
    fn from_frame(frame: &str) -> Self {
        let at = Local::now().format("%H:%M:%S").to_string();
        match WsMessage::from_frame(frame) {
            Ok(WsMessage::Drawing(stroke)) => Seen {
                at,
                event: "drawing".into(),
                tool: stroke.tool.to_string(),
                color: stroke.color.clone(),
                width: stroke.effective_width().to_string(),
                points: stroke.point_count().to_string(),
            },
            Ok(WsMessage::ClearWhiteboard) => Seen {
                at,
                event: "clearWhiteboard".into(),
                ..Seen::blank()
            },
            Err(_) => Seen {
                at,
                event: "?".into(),
                ..Seen::blank()
            },
        }
    }

    fn blank() -> Self {
        Seen {
            at: String::new(),
            event: String::new(),
            tool: "-".into(),
            color: "-".into(),
            width: "-".into(),
            points: "-".into(),
        }
    }

    fn cells(&self) -> [&str; 6] {
        [
            &self.at,
            &self.event,
            &self.tool,
            &self.color,
            &self.width,
            &self.points,
        ]
    }
}

// Parses "x,y" into a point.
fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok(Point::new(x, y))
}

// Helper function to turn the server's HTTP base URL into its WebSocket endpoint.
fn ws_url(server: &str) -> Result<String, String> {
    let base = server.trim_end_matches('/');
    let rest = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return Err(format!("server URL must start with http:// or https://, got '{server}'"));
    };
    Ok(format!("{rest}/ws"))
}

/// Runs a gesture from `from` to `to` through a drawing surface and returns what it would send.
fn straight_stroke(from: Point, to: Point, tool: Tool, color: String, width: f64) -> Option<WsMessage> {
    let mut surface = DrawingSurface::new();
    surface.begin_stroke(from, tool, color, width);
    surface.extend_stroke(to);
    surface.end_stroke()
}

async fn send_once(server: &str, message: &WsMessage) -> Result<(), Box<dyn std::error::Error>> {
    let url = ws_url(server)?;
    let (mut ws, _) = connect_async(&url).await?;
    ws.send(Message::Text(message.to_frame()?.into())).await?;
    ws.close(None).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Health => {
            let mut sp = Spinner::new(Spinners::Dots9, "Checking relay...".into());

            match reqwest::get(&cli.server).await {
                Ok(res) if res.status().is_success() => {
                    let greeting = res.text().await?;
                    sp.stop_with_message(format!("✓ Relay is up: {greeting}"));
                }
                Ok(res) => {
                    sp.stop_with_message(format!("✗ Relay answered with status {}", res.status()));
                    std::process::exit(1);
                }
                Err(e) => {
                    sp.stop_with_message(format!("✗ Could not reach {}: {e}", cli.server));
                    std::process::exit(1);
                }
            }
        }
        Commands::Watch { count } => {
            let url = ws_url(&cli.server)?;
            let (ws, _) = connect_async(&url).await?;
            let (_write, mut read) = ws.split();
            println!("Watching {url} (Ctrl-C to stop)");

            let mut seen = Vec::new();
            while let Some(message) = read.next().await {
                let text = match message? {
                    Message::Text(text) => text,
                    Message::Close(_) => break,
                    _ => continue,
                };

                let row = Seen::from_frame(text.as_str());
                println!("{}", row.cells().join("  "));
                seen.push(row);

                if count.is_some_and(|limit| seen.len() >= limit) {
                    break;
                }
            }

            if count.is_some() {
                let mut table = Table::new();
                table.set_header(["Time", "Event", "Tool", "Color", "Width", "Points"]);
                for row in &seen {
                    table.add_row(row.cells());
                }
                println!("\n{table}");
            }
        }
        Commands::Draw {
            from,
            to,
            color,
            width,
            tool,
        } => {
            let message =
                straight_stroke(from, to, tool, color, width).ok_or("gesture produced no stroke")?;

            let mut sp = Spinner::new(Spinners::Dots9, "Sending stroke...".into());
            match send_once(&cli.server, &message).await {
                Ok(()) => sp.stop_with_message("✓ Stroke sent!".into()),
                Err(e) => {
                    sp.stop_with_message(format!("✗ Error: could not send stroke: {e}"));
                    std::process::exit(1);
                }
            }
        }
        Commands::Clear => {
            let mut sp = Spinner::new(Spinners::Dots9, "Clearing whiteboard...".into());
            match send_once(&cli.server, &WsMessage::ClearWhiteboard).await {
                Ok(()) => sp.stop_with_message("✓ Clear signal sent!".into()),
                Err(e) => {
                    sp.stop_with_message(format!("✗ Error: could not send clear: {e}"));
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_url_follows_the_http_scheme() {
        assert_eq!(ws_url("http://localhost:5000").unwrap(), "ws://localhost:5000/ws");
        assert_eq!(ws_url("https://board.example.com/").unwrap(), "wss://board.example.com/ws");
        assert!(ws_url("localhost:5000").is_err());
    }

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("10,50").unwrap(), Point::new(10.0, 50.0));
        assert_eq!(parse_point(" 1.5 , -2 ").unwrap(), Point::new(1.5, -2.0));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn straight_stroke_has_two_points() {
        let message = straight_stroke(
            Point::new(10.0, 10.0),
            Point::new(10.0, 50.0),
            Tool::Pen,
            "#ff0000".into(),
            5.0,
        );
        let Some(WsMessage::Drawing(stroke)) = message else {
            panic!("expected a drawing");
        };
        assert_eq!(stroke.points, vec![10.0, 10.0, 10.0, 50.0]);
        assert_eq!(stroke.color, "#ff0000");
        assert_eq!(stroke.stroke_width, 5.0);
    }

    #[test]
    fn summarises_frames() {
        let row = Seen::from_frame(r#"{"event":"clearWhiteboard"}"#);
        assert_eq!(row.event, "clearWhiteboard");
        assert_eq!(row.tool, "-");

        let row = Seen::from_frame(
            r##"{"event":"drawing","data":{"points":[0,0,1,1,2,2],"color":"#abcdef","tool":"eraser"}}"##,
        );
        assert_eq!(row.tool, "eraser");
        assert_eq!(row.width, "20");
        assert_eq!(row.points, "3");

        assert_eq!(Seen::from_frame("garbage").event, "?");
    }

    #[test]
    fn cli_parses_draw_arguments() {
        let cli = Cli::try_parse_from([
            "whiteboard", "draw", "--from", "1,2", "--to", "3,4", "--tool", "eraser",
        ])
        .unwrap();
        match cli.command {
            Commands::Draw { from, to, tool, width, .. } => {
                assert_eq!(from, Point::new(1.0, 2.0));
                assert_eq!(to, Point::new(3.0, 4.0));
                assert_eq!(tool, Tool::Eraser);
                assert_eq!(width, 5.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn zero_length_stroke_still_sends() {
        let point = Point::new(7.0, 7.0);
        let message = straight_stroke(point, point, Tool::Pen, "#000000".into(), 1.0)
            .ok_or("gesture produced no stroke");
        assert!(matches!(message, Ok(WsMessage::Drawing(ref stroke)) if stroke.point_count() == 2));
    }

    #[test]
    fn watch_count_must_be_positive() {
        assert!(Cli::try_parse_from(["whiteboard", "watch", "--count", "0"]).is_err());

        let cli = Cli::try_parse_from(["whiteboard", "watch", "--count", "1"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch { count: Some(1) }));

        let cli = Cli::try_parse_from(["whiteboard", "watch"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch { count: None }));
    }
}
