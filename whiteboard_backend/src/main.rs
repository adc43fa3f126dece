use tokio::net::TcpListener;
use whiteboard_backend::{AppState, config::Config, error::ServerError, init_tracing, router, serve};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    init_tracing();

    let config = Config::from_env()?;
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let app = router(AppState::default(), &config);

    serve(listener, app).await
}
