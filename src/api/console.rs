use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use crate::actor::dispatcher::EngineHandle;
use crate::actor::error::Error;
use crate::api::model::{ApiRequest, ApiResponse, Method};

#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Engine(#[from] Error),
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Serves newline-delimited JSON requests from `reader`, writing one JSON
/// response line per request to `writer`. Returns when the input ends or the
/// engine goes away.
pub async fn serve<R, W>(reader: R, mut writer: W, engine: EngineHandle) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let session = Uuid::new_v4();
    tracing::info!("Console session {} started", session);

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (response, closed) = match serde_json::from_str::<ApiRequest>(line) {
            Ok(request) => {
                tracing::debug!("Session {} request {}: {}", session, request.id, request.method);
                match dispatch(&request, &engine).await {
                    Ok(result) => (ApiResponse::success(&request.id, result), false),
                    Err(e) => {
                        tracing::warn!("Request {} failed: {}", request.id, e);
                        let closed = matches!(
                            e,
                            RequestError::Engine(Error::Closed | Error::NoResponse)
                        );
                        (ApiResponse::failure(&request.id, e), closed)
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to parse message from {}: {}", session, e);
                (ApiResponse::failure("", e), false)
            }
        };

        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;

        if closed {
            tracing::warn!("Engine unavailable, closing session {}", session);
            break;
        }
    }

    tracing::info!("Console session {} ended", session);
    Ok(())
}

async fn dispatch(request: &ApiRequest, engine: &EngineHandle) -> Result<serde_json::Value, RequestError> {
    let method = Method::parse(request).map_err(RequestError::BadRequest)?;

    let value = match method {
        Method::Snapshot => serde_json::to_value(engine.snapshot().await?),
        Method::Catalog => serde_json::to_value(engine.catalog().await?),
        Method::Pause => serde_json::to_value(engine.pause().await?),
        Method::Resume => serde_json::to_value(engine.resume().await?),
        Method::Build(params) => {
            let site = engine.start_build(&params.blueprint).await?;
            Ok(json!({ "site": site }))
        }
        Method::Assign(params) => {
            engine.assign(params.site, params.character).await?;
            Ok(json!({ "site": params.site, "character": params.character }))
        }
        Method::Unassign(params) => {
            engine.unassign(params.site, params.character).await?;
            Ok(json!({ "site": params.site, "character": params.character }))
        }
        Method::Tick(params) => {
            let mut ran = 0;
            let mut completed = Vec::new();
            for _ in 0..params.count {
                match engine.tick().await? {
                    Some(report) => {
                        ran += 1;
                        completed.extend(report.completed);
                    }
                    None => break,
                }
            }
            let snapshot = engine.snapshot().await?;
            Ok(json!({ "ticks": ran, "time": snapshot.time, "completed": completed }))
        }
    };

    Ok(value?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::dispatcher::Dispatcher;
    use crate::config::SimConfig;

    async fn run(input: &str) -> Vec<serde_json::Value> {
        let engine = SimConfig::default().build_engine().unwrap();
        let mut dispatcher = Dispatcher::start(engine, None);
        let mut output = Vec::new();

        serve(input.as_bytes(), &mut output, dispatcher.handle())
            .await
            .unwrap();
        dispatcher.stop().await;

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_build_and_tick_session() {
        let responses = run(concat!(
            r#"{"id": "a", "method": "build", "params": {"blueprint": "Farm"}}"#,
            "\n\n",
            r#"{"id": "b", "method": "tick", "params": {"count": 3}}"#,
            "\n",
            r#"{"id": "c", "method": "snapshot"}"#,
            "\n",
        ))
        .await;

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["result"]["site"], 0);
        assert_eq!(responses[1]["result"]["ticks"], 3);
        assert_eq!(responses[1]["result"]["time"]["minute"], 3);
        assert_eq!(responses[2]["result"]["sites"][0]["workers"], serde_json::json!([0]));
        assert_eq!(responses[2]["result"]["characters"][0]["status"], "Assigned");
    }

    #[tokio::test]
    async fn test_errors_are_reported_per_request() {
        let responses = run(concat!(
            "garbage\n",
            r#"{"id": "x", "method": "fly"}"#,
            "\n",
            r#"{"id": "y", "method": "unassign", "params": {"site": 4, "character": 0}}"#,
            "\n",
            r#"{"id": "z", "method": "pause"}"#,
            "\n",
        ))
        .await;

        assert_eq!(responses[0]["ok"], false);
        assert_eq!(responses[1]["error"], "unknown method: fly");
        assert_eq!(responses[2]["error"], "unknown construction site: #4");
        assert_eq!(responses[3]["result"], "Paused");
    }
}
