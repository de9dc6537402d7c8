use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_size;

/// Middleware для логирования HTTP запросов: статус, метод, путь,
/// длительность и размер тела ответа
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Тело читается целиком, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                status = parts.status.as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "{} {} body read failed: {}",
                method,
                path,
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let status = parts.status.as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    if parts.status.is_success() {
        tracing::info!(status, elapsed_ms, size = %format_size(bytes.len()), "{} {}", method, path);
    } else {
        tracing::warn!(status, elapsed_ms, size = %format_size(bytes.len()), "{} {}", method, path);
    }

    Response::from_parts(parts, Body::from(bytes))
}
