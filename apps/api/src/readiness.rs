//! Readiness endpoint backed by a live database ping

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::server::{run_health_checks, HealthCheckFuture};
use database::postgres::DatabaseConnection;
use serde_json::Value;

async fn ready(
    State(db): State<DatabaseConnection>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];
    run_health_checks(checks).await
}

pub fn router(db: DatabaseConnection) -> Router {
    Router::new().route("/ready", get(ready)).with_state(db)
}
