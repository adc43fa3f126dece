/// Static greeting served at `/`. Not part of the drawing protocol.
pub const GREETING: &str = "Hello from the server!";

/// Handler for the health/info endpoint.
pub async fn health() -> &'static str {
    GREETING
}
