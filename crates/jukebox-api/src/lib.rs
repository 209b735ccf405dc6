//! HTTP delivery surface for the jukebox acquisition core.
//!
//! The API is deliberately thin: it validates transport concerns, hands the
//! title to the acquisition core, and turns the core's typed outcome into a
//! stable HTTP response. Each failure kind maps to its own status code so
//! operators can tell bad input from a broken producer from a slow producer.

pub mod models;

mod error;

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context as TaskContext, Poll};
use std::time::Duration;

use async_stream::stream;
use axum::{
    Json, Router,
    body::Body,
    extract::{MatchedPath, Path as AxumPath, State},
    http::{HeaderMap, Request, StatusCode, header},
    response::{
        IntoResponse, Response,
        sse::{self, Sse},
    },
    routing::{get, post},
};
use futures_util::StreamExt;
use tokio::net::TcpListener;
use tokio_util::io::ReaderStream;
use tower::{Service, ServiceBuilder, layer::Layer};
use tower_http::trace::TraceLayer;
use tracing::{Span, error, info, warn};
use url::Url;

use jukebox_acquire::{AcquireError, TrackAcquirer};
use jukebox_config::Settings;
use jukebox_events::{Event as CoreEvent, EventBus, EventEnvelope, EventId};
use jukebox_telemetry::{Metrics, build_sha, set_request_context, with_request_context};

use models::{HealthComponent, HealthResponse, ProblemDetails, TrackRequestBody, TrackResponse};

pub use error::{ApiServerError, ApiServerResult};

const HEADER_REQUEST_ID: &str = "x-request-id";
const HEADER_LAST_EVENT_ID: &str = "last-event-id";
const HEADER_FORWARDED_PROTO: &str = "x-forwarded-proto";
const SSE_KEEP_ALIVE_SECS: u64 = 20;
const HEALTH_COMPONENT_LIBRARY: &str = "library_dir";

const PROBLEM_INTERNAL: &str = "https://jukebox.dev/problems/internal";
const PROBLEM_BAD_REQUEST: &str = "https://jukebox.dev/problems/bad-request";
const PROBLEM_NOT_FOUND: &str = "https://jukebox.dev/problems/not-found";
const PROBLEM_PRODUCER_FAILED: &str = "https://jukebox.dev/problems/producer-failed";
const PROBLEM_ACQUIRE_TIMEOUT: &str = "https://jukebox.dev/problems/acquire-timeout";
const PROBLEM_SERVICE_UNAVAILABLE: &str = "https://jukebox.dev/problems/service-unavailable";

/// HTTP server wrapping the acquisition core.
pub struct ApiServer {
    router: Router,
}

struct ApiState {
    acquirer: Arc<dyn TrackAcquirer>,
    library_dir: PathBuf,
    public_base_url: Option<String>,
    telemetry: Metrics,
    events: EventBus,
    health_status: Mutex<Vec<String>>,
}

impl ApiState {
    fn add_degraded_component(&self, component: &str) -> bool {
        let mut guard = self
            .health_status
            .lock()
            .expect("health status mutex poisoned");
        if guard.iter().any(|entry| entry == component) {
            return false;
        }
        guard.push(component.to_string());
        guard.sort();
        let snapshot = guard.clone();
        drop(guard);
        self.events
            .publish(CoreEvent::HealthChanged { degraded: snapshot });
        true
    }

    fn remove_degraded_component(&self, component: &str) -> bool {
        let mut guard = self
            .health_status
            .lock()
            .expect("health status mutex poisoned");
        let previous = guard.len();
        guard.retain(|entry| entry != component);
        if guard.len() == previous {
            return false;
        }
        let snapshot = guard.clone();
        drop(guard);
        self.events
            .publish(CoreEvent::HealthChanged { degraded: snapshot });
        true
    }

    fn current_health_degraded(&self) -> Vec<String> {
        self.health_status
            .lock()
            .expect("health status mutex poisoned")
            .clone()
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    kind: &'static str,
    title: &'static str,
    detail: Option<String>,
}

impl ApiError {
    const fn new(status: StatusCode, kind: &'static str, title: &'static str) -> Self {
        Self {
            status,
            kind,
            title,
            detail: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_INTERNAL,
            "internal server error",
        )
        .with_detail(message)
    }

    fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, PROBLEM_BAD_REQUEST, "bad request").with_detail(detail)
    }

    fn not_found(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            PROBLEM_NOT_FOUND,
            "resource not found",
        )
        .with_detail(detail)
    }

    fn producer_failed(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            PROBLEM_PRODUCER_FAILED,
            "producer command failed",
        )
        .with_detail(detail)
    }

    fn acquire_timeout(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            PROBLEM_ACQUIRE_TIMEOUT,
            "producer did not deliver in time",
        )
        .with_detail(detail)
    }

    fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            PROBLEM_SERVICE_UNAVAILABLE,
            "service unavailable",
        )
        .with_detail(detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Translate a core failure into its distinct, stable HTTP response.
fn map_acquire_error(err: &AcquireError) -> ApiError {
    match err {
        AcquireError::InvalidRequest => ApiError::bad_request("track title must not be empty"),
        AcquireError::CommandFailed { code } => ApiError::producer_failed(match code {
            Some(code) => format!("producer exited with code {code}"),
            None => "producer was terminated by a signal".to_string(),
        }),
        AcquireError::Timeout { waited } => ApiError::acquire_timeout(format!(
            "no track file appeared within {}s",
            waited.as_secs()
        )),
        AcquireError::DirectoryAccess { path, .. } => ApiError::internal(format!(
            "library directory '{}' is not usable",
            path.display()
        )),
        AcquireError::CommandParse { .. }
        | AcquireError::EmptyCommand { .. }
        | AcquireError::Spawn { .. } => {
            ApiError::internal("producer command is misconfigured or unavailable")
        }
    }
}

#[derive(Clone)]
struct HttpMetricsLayer {
    telemetry: Metrics,
}

impl HttpMetricsLayer {
    const fn new(telemetry: Metrics) -> Self {
        Self { telemetry }
    }
}

impl<S> Layer<S> for HttpMetricsLayer {
    type Service = HttpMetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpMetricsService {
            inner,
            telemetry: self.telemetry.clone(),
        }
    }
}

#[derive(Clone)]
struct HttpMetricsService<S> {
    inner: S,
    telemetry: Metrics,
}

impl<S, B> Service<Request<B>> for HttpMetricsService<S>
where
    S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let route = req.extensions().get::<MatchedPath>().map_or_else(
            || req.uri().path().to_string(),
            |matched| matched.as_str().to_string(),
        );
        let request_id = req
            .headers()
            .get(HEADER_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let telemetry = self.telemetry.clone();
        let fut = self.inner.call(req);

        Box::pin(async move {
            with_request_context(request_id, route.clone(), async move {
                let response = fut.await?;
                telemetry.inc_http_request(&route, response.status().as_u16());
                Ok(response)
            })
            .await
        })
    }
}

impl ApiServer {
    /// Construct the API server around the shared service dependencies.
    #[must_use]
    pub fn new(
        settings: &Settings,
        acquirer: Arc<dyn TrackAcquirer>,
        events: EventBus,
        telemetry: Metrics,
    ) -> Self {
        let state = Arc::new(ApiState {
            acquirer,
            library_dir: settings.acquire.library_dir.clone(),
            public_base_url: settings.http.public_base_url.clone(),
            telemetry: telemetry.clone(),
            events,
            health_status: Mutex::new(Vec::new()),
        });

        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(move |request: &Request<_>| {
                let method = request.method().clone();
                let uri_path = request.uri().path();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_string();

                let span = tracing::info_span!(
                    "http.request",
                    method = %method,
                    route = %uri_path,
                    request_id = tracing::field::Empty,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                );
                set_request_context(&span, request_id, uri_path.to_string());
                span
            })
            .on_request(|request: &Request<_>, span: &Span| {
                if let Some(matched) = request.extensions().get::<MatchedPath>() {
                    let request_id = request
                        .headers()
                        .get(HEADER_REQUEST_ID)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    set_request_context(span, request_id, matched.as_str().to_string());
                }
            })
            .on_response(|response: &Response, latency: Duration, span: &Span| {
                let status = response.status().as_u16();
                span.record("status_code", status);
                let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                span.record("latency_ms", latency_ms);
            });

        let layered = ServiceBuilder::new()
            .layer(jukebox_telemetry::propagate_request_id_layer())
            .layer(jukebox_telemetry::set_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));

        let router = Router::new()
            .route("/api/v1/tracks/request", post(request_track))
            .route("/tracks/{file_name}", get(stream_track))
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route("/v1/events", get(stream_events))
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    /// Bind the listener and serve until the connection loop ends.
    ///
    /// # Errors
    ///
    /// Returns an error when the address cannot be bound or the server loop
    /// terminates abnormally.
    pub async fn serve(self, addr: SocketAddr) -> ApiServerResult<()> {
        info!(addr = %addr, "starting API listener");
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }

    #[cfg(test)]
    fn into_router(self) -> Router {
        self.router
    }
}

async fn request_track(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(body): Json<TrackRequestBody>,
) -> Result<Json<TrackResponse>, ApiError> {
    let result = state
        .acquirer
        .acquire(&body.title)
        .await
        .map_err(|err| map_acquire_error(&err))?;

    let file_name = result
        .file_name()
        .ok_or_else(|| {
            error!(path = %result.path.display(), "acquired path has no usable file name");
            ApiError::internal("acquired file name is not representable")
        })?
        .to_string();

    let stream_url = build_stream_url(state.public_base_url.as_deref(), &headers, &file_name)?;
    info!(title = %result.title, file_name = %file_name, "track request satisfied");

    Ok(Json(TrackResponse {
        title: result.title,
        file_name,
        stream_url,
    }))
}

async fn stream_track(
    State(state): State<Arc<ApiState>>,
    AxumPath(file_name): AxumPath<String>,
) -> Result<Response, ApiError> {
    let resolved = resolve_library_path(&state.library_dir, &file_name).await?;

    let file = tokio::fs::File::open(&resolved)
        .await
        .map_err(|_| ApiError::not_found("track is not available"))?;
    let stream = ReaderStream::new(file);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&resolved))
        .body(Body::from_stream(stream))
        .map_err(|err| {
            error!(error = %err, "failed to build stream response");
            ApiError::internal("failed to build stream response")
        })
}

/// Resolve a client-supplied file name inside the library directory.
///
/// The joined path is canonicalized and must stay under the canonical library
/// root, so names like `..%2F..%2Fetc%2Fpasswd` or symlinked escapes resolve
/// to 404 rather than a file outside the library.
async fn resolve_library_path(library_dir: &Path, file_name: &str) -> Result<PathBuf, ApiError> {
    let root = tokio::fs::canonicalize(library_dir).await.map_err(|err| {
        warn!(error = %err, path = %library_dir.display(), "library directory unavailable");
        ApiError::service_unavailable("library directory is unavailable")
    })?;

    let resolved = tokio::fs::canonicalize(root.join(file_name))
        .await
        .map_err(|_| ApiError::not_found("track is not available"))?;

    if !resolved.starts_with(&root) {
        warn!(file_name = %file_name, "rejected path escaping the library directory");
        return Err(ApiError::not_found("track is not available"));
    }

    let metadata = tokio::fs::metadata(&resolved)
        .await
        .map_err(|_| ApiError::not_found("track is not available"))?;
    if !metadata.is_file() {
        return Err(ApiError::not_found("track is not available"));
    }

    Ok(resolved)
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

/// Build the absolute URL a client can stream the file from, preferring the
/// configured public base URL over request headers.
fn build_stream_url(
    base: Option<&str>,
    headers: &HeaderMap,
    file_name: &str,
) -> Result<String, ApiError> {
    let base = base.map_or_else(|| host_base_from_headers(headers), |b| Some(b.to_string()));
    let base = base.ok_or_else(|| {
        ApiError::internal("unable to determine the public base URL for stream links")
    })?;

    let mut url = Url::parse(&base)
        .map_err(|_| ApiError::internal("configured public base URL is not absolute"))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| ApiError::internal("configured public base URL cannot carry paths"))?;
        segments.pop_if_empty().push("tracks").push(file_name);
    }
    Ok(url.to_string())
}

fn host_base_from_headers(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let proto = headers
        .get(HEADER_FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    Some(format!("{proto}://{host}"))
}

async fn health(State(state): State<Arc<ApiState>>) -> Result<Json<HealthResponse>, ApiError> {
    let library_ok = tokio::fs::metadata(&state.library_dir)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);

    if library_ok {
        state.remove_degraded_component(HEALTH_COMPONENT_LIBRARY);
    } else {
        state.add_degraded_component(HEALTH_COMPONENT_LIBRARY);
        warn!(path = %state.library_dir.display(), "library directory failed the health probe");
    }

    let degraded = state.current_health_degraded();
    let status = if degraded.is_empty() { "ok" } else { "degraded" };
    let response = HealthResponse {
        status,
        library: HealthComponent {
            status: if library_ok { "ok" } else { "unavailable" },
            path: state.library_dir.display().to_string(),
        },
        degraded,
    };

    if library_ok {
        Ok(Json(response))
    } else {
        Err(ApiError::service_unavailable(
            "library directory is unavailable",
        ))
    }
}

async fn metrics(State(state): State<Arc<ApiState>>) -> Result<Response, ApiError> {
    match state.telemetry.render() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
            .body(Body::from(body))
            .map_err(|err| {
                error!(error = %err, "failed to build metrics response");
                ApiError::internal("failed to build metrics response")
            }),
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            Err(ApiError::internal("failed to render metrics"))
        }
    }
}

async fn stream_events(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Sse<impl futures_core::Stream<Item = Result<sse::Event, Infallible>> + Send> {
    let last_id = headers
        .get(HEADER_LAST_EVENT_ID)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<EventId>().ok());

    let stream = event_sse_stream(state.events.clone(), last_id);

    Sse::new(stream).keep_alive(
        sse::KeepAlive::new()
            .interval(Duration::from_secs(SSE_KEEP_ALIVE_SECS))
            .text("keep-alive"),
    )
}

fn event_replay_stream(
    bus: EventBus,
    since: Option<EventId>,
) -> impl futures_core::Stream<Item = EventEnvelope> + Send {
    stream! {
        let mut stream = bus.subscribe(since);
        while let Some(envelope) = stream.next().await {
            yield envelope;
        }
    }
}

fn event_sse_stream(
    bus: EventBus,
    since: Option<EventId>,
) -> impl futures_core::Stream<Item = Result<sse::Event, Infallible>> + Send {
    event_replay_stream(bus, since).filter_map(|envelope| async move {
        match serde_json::to_string(&envelope) {
            Ok(payload) => Some(Ok(sse::Event::default()
                .id(envelope.id.to_string())
                .event(envelope.event.kind())
                .data(payload))),
            Err(err) => {
                error!(error = %err, "failed to serialise SSE event payload");
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use jukebox_acquire::{AcquireResult, TrackResult};
    use std::time::Duration;
    use tower::ServiceExt;

    enum StubBehaviour {
        Succeed,
        Fail(fn() -> AcquireError),
    }

    struct StubAcquirer {
        behaviour: StubBehaviour,
        library_dir: PathBuf,
    }

    #[async_trait]
    impl TrackAcquirer for StubAcquirer {
        async fn acquire(&self, title: &str) -> AcquireResult<TrackResult> {
            match &self.behaviour {
                StubBehaviour::Succeed => {
                    let trimmed = title.trim();
                    if trimmed.is_empty() {
                        return Err(AcquireError::InvalidRequest);
                    }
                    Ok(TrackResult {
                        title: trimmed.to_string(),
                        path: self.library_dir.join("ready.mp3"),
                    })
                }
                StubBehaviour::Fail(make) => Err(make()),
            }
        }
    }

    fn router_with(dir: &Path, behaviour: StubBehaviour) -> Router {
        let mut settings = Settings::default();
        settings.acquire.library_dir = dir.to_path_buf();
        settings.http.public_base_url = Some("http://player.local".to_string());

        let acquirer = Arc::new(StubAcquirer {
            behaviour,
            library_dir: dir.to_path_buf(),
        });
        ApiServer::new(
            &settings,
            acquirer,
            EventBus::with_capacity(8),
            Metrics::new().expect("metrics"),
        )
        .into_router()
    }

    fn request_body(title: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/tracks/request")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!("{{\"title\":\"{title}\"}}")))
            .expect("request should build")
    }

    #[tokio::test]
    async fn a_successful_request_reports_the_stream_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let router = router_with(dir.path(), StubBehaviour::Succeed);

        let response = router
            .oneshot(request_body("Blue in Green"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let parsed: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(parsed["title"], "Blue in Green");
        assert_eq!(parsed["file_name"], "ready.mp3");
        assert_eq!(parsed["stream_url"], "http://player.local/tracks/ready.mp3");
    }

    #[tokio::test]
    async fn each_failure_kind_has_a_distinct_status() {
        let cases: Vec<(fn() -> AcquireError, StatusCode)> = vec![
            (
                || AcquireError::InvalidRequest,
                StatusCode::BAD_REQUEST,
            ),
            (
                || AcquireError::CommandFailed { code: Some(2) },
                StatusCode::BAD_GATEWAY,
            ),
            (
                || AcquireError::Timeout {
                    waited: Duration::from_secs(120),
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                || AcquireError::DirectoryAccess {
                    path: PathBuf::from("/missing"),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (make, expected) in cases {
            let dir = tempfile::tempdir().expect("tempdir");
            let router = router_with(dir.path(), StubBehaviour::Fail(make));
            let response = router
                .oneshot(request_body("anything"))
                .await
                .expect("response");
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn tracks_are_streamed_with_their_content_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("ready.mp3"), b"audio-bytes").expect("write");
        let router = router_with(dir.path(), StubBehaviour::Succeed);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/tracks/ready.mp3")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("audio/mpeg")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert_eq!(&body[..], b"audio-bytes");
    }

    #[tokio::test]
    async fn path_escapes_resolve_to_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let router = router_with(dir.path(), StubBehaviour::Succeed);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/tracks/..%2F..%2Fetc%2Fpasswd")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_the_library_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let router = router_with(dir.path(), StubBehaviour::Succeed);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn content_types_cover_the_default_allow_set() {
        assert_eq!(content_type_for(Path::new("a.mp3")), "audio/mpeg");
        assert_eq!(content_type_for(Path::new("a.M4A")), "audio/mp4");
        assert_eq!(content_type_for(Path::new("a.wav")), "audio/wav");
        assert_eq!(content_type_for(Path::new("a.flac")), "audio/flac");
        assert_eq!(
            content_type_for(Path::new("a.bin")),
            "application/octet-stream"
        );
    }

    #[test]
    fn stream_urls_fall_back_to_request_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "player.example.net".parse().expect("host"));
        headers.insert(
            HEADER_FORWARDED_PROTO,
            "https".parse().expect("proto"),
        );

        let url = build_stream_url(None, &headers, "song.mp3").expect("url");
        assert_eq!(url, "https://player.example.net/tracks/song.mp3");
    }

    #[test]
    fn stream_urls_prefer_the_configured_base() {
        let headers = HeaderMap::new();
        let url = build_stream_url(Some("http://public.example.org/base/"), &headers, "a.mp3")
            .expect("url");
        assert_eq!(url, "http://public.example.org/base/tracks/a.mp3");
    }

    #[test]
    fn stream_urls_encode_awkward_file_names() {
        let headers = HeaderMap::new();
        let url = build_stream_url(Some("http://h.example"), &headers, "my song.mp3")
            .expect("url");
        assert_eq!(url, "http://h.example/tracks/my%20song.mp3");
    }

    #[test]
    fn missing_host_header_is_an_internal_error() {
        let headers = HeaderMap::new();
        assert!(build_stream_url(None, &headers, "a.mp3").is_err());
    }
}
