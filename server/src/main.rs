#[tokio::main]
pub async fn main() {
    env_logger::init();

    let app = axum::Router::new()
        .fallback(axum::routing::get(|| async {
            "No route! Use /health or /solve"
        }))
        .route("/health", axum::routing::get(healthy))
        .route("/solve", axum::routing::post(solve));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    log::info!("server running on port 3000 (http://localhost:3000/health)");
    axum::serve(listener, app).await.unwrap();
}

pub async fn healthy() -> &'static str {
    "healthy"
}

pub async fn solve(
    axum::extract::Json(request): axum::extract::Json<serde_json::Value>,
) -> axum::response::Json<serde_json::Value> {
    log::info!("solving one day's instance");
    let output = server::solve_instance(request);
    axum::response::Json(output)
}
