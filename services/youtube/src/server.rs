//! HTTP front: routing, CORS, and the connection accept loop.

use crate::app::App;
use crate::cache::CacheStore;
use crate::error::HandlerError;
use crate::youtube_api::Upstream;
use eyre::Context;
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use http::{HeaderValue, Method, StatusCode, Uri};
use http_body_util::Full;
use hyper::body::{self, Bytes};
use hyper::service::service_fn;
use hyper::{Request, Response};
use serde::Serialize;
use std::borrow::Cow;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Routes one request.
///
/// Dispatch is on the path alone (any method other than `OPTIONS` reaches the handler), and
/// every response, errors included, carries `Access-Control-Allow-Origin: *`.
pub async fn handle<U, C>(app: &App<U, C>, method: &Method, uri: &Uri) -> Response<Full<Bytes>>
where
    U: Upstream,
    C: CacheStore,
{
    let mut response = if method == Method::OPTIONS {
        preflight()
    } else {
        let query = uri.query().unwrap_or("");
        let result = match uri.path() {
            "/lives" => {
                let page = query_param(query, "page")
                    .and_then(|p| leading_int(&p))
                    .unwrap_or(1);
                match app.live_page(page).await {
                    Ok(page) => json_response(&page),
                    Err(e) => Err(HandlerError::from(e)),
                }
            }
            "/video" => {
                let id = query_param(query, "id");
                match app.video_info(id.as_deref()).await {
                    Ok(info) => json_response(&info),
                    Err(e) => Err(e),
                }
            }
            _ => Ok(text_response(StatusCode::NOT_FOUND, "Not Found")),
        };
        result.unwrap_or_else(|e| error_response(uri, &e))
    };

    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// Accepts connections on `listener` until `shutdown` resolves.
///
/// Each connection is served on its own task; in-flight connections are not waited for.
pub async fn serve<U, C>(
    listener: TcpListener,
    app: Arc<App<U, C>>,
    shutdown: impl Future<Output = ()>,
) -> eyre::Result<()>
where
    U: Upstream,
    C: CacheStore,
{
    let addr = listener.local_addr().context("get local address")?;
    tracing::info!(%addr, "serving");

    let mut shutdown = std::pin::pin!(shutdown);
    loop {
        let (conn, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                    continue;
                }
            },
            () = &mut shutdown => {
                tracing::info!("shutting down");
                return Ok(());
            }
        };

        let app = Arc::clone(&app);
        tokio::spawn(async move {
            let conn = hyper_util::rt::TokioIo::new(conn);
            let service = service_fn(move |req: Request<body::Incoming>| {
                let app = Arc::clone(&app);
                async move {
                    // no route reads a request body
                    let (parts, _) = req.into_parts();
                    tracing::debug!(method = %parts.method, uri = %parts.uri, "request");
                    Ok::<_, Infallible>(handle(&app, &parts.method, &parts.uri).await)
                }
            });
            if let Err(e) = hyper::server::conn::http1::Builder::new()
                .serve_connection(conn, service)
                .await
            {
                tracing::debug!(%peer, error = %e, "connection ended with error");
            }
        });
    }
}

fn query_param<'q>(query: &'q str, name: &str) -> Option<Cow<'q, str>> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v)
}

/// Reads the integer at the start of `s`, ignoring whatever follows it.
///
/// Leading whitespace and one sign are accepted, so `" 2abc"` and `"2.5"` are both 2 and
/// `"-1"` is -1. Values past the range of `i64` saturate.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].bytes().fold(0i64, |acc, d| {
        acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
    });
    Some(if negative { -value } else { value })
}

fn preflight() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::default());
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    response
}

fn json_response<T: Serialize>(value: &T) -> Result<Response<Full<Bytes>>, HandlerError> {
    let body = serde_json::to_vec(value).context("serialize response body")?;
    let mut response = Response::new(Full::new(Bytes::from(body)));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(response)
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

fn error_response(uri: &Uri, e: &HandlerError) -> Response<Full<Bytes>> {
    match e {
        HandlerError::BadRequest(message) => text_response(e.status(), *message),
        HandlerError::NotFound => {
            let mut response = Response::new(Full::default());
            *response.status_mut() = e.status();
            response
        }
        HandlerError::Internal(report) => {
            tracing::error!(%uri, error = %format!("{report:#}"), "request failed");
            text_response(e.status(), "Internal Server Error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::LiveListSettings;
    use crate::youtube_api::mock::{self, MockUpstream};
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;

    fn app() -> App<MockUpstream, MemoryCache> {
        let mut upstream = MockUpstream::default();
        for i in 0..20 {
            upstream
                .search_results
                .push(mock::search_result(&format!("v{i}"), "UCa"));
        }
        upstream
            .videos
            .insert("live1".into(), mock::video("live1", "UCa", true));
        upstream.channels.insert("UCa".into(), mock::channel("UCa"));
        App::new(upstream, MemoryCache::new(), LiveListSettings::default())
    }

    async fn get(app: &App<MockUpstream, MemoryCache>, uri: &str) -> (StatusCode, Bytes) {
        let response = handle(app, &Method::GET, &uri.parse().unwrap()).await;
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("*"))
        );
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    fn json(body: &Bytes) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn preflight_headers() {
        let response = handle(&app(), &Method::OPTIONS, &"/anything".parse().unwrap()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "*");
    }

    #[tokio::test]
    async fn lives_pages() {
        let app = app();

        let (status, body) = get(&app, "/lives").await;
        assert_eq!(status, StatusCode::OK);
        let page = json(&body);
        assert_eq!(page["page"], 1);
        assert_eq!(page["perPage"], 8);
        assert_eq!(page["total"], 20);
        assert_eq!(page["totalPages"], 3);
        assert_eq!(page["items"][0]["videoId"], "v0");
        assert_eq!(page["items"][0]["channelIcon"], mock::icon_url("UCa"));

        let (_, body) = get(&app, "/lives?page=3").await;
        let page = json(&body);
        assert_eq!(page["page"], 3);
        assert_eq!(page["items"].as_array().map(Vec::len), Some(4));

        let (_, body) = get(&app, "/lives?page=nope").await;
        assert_eq!(json(&body)["page"], 1);

        assert_eq!(app.upstream().search_calls(), 1);
    }

    #[tokio::test]
    async fn video_statuses() {
        let app = app();

        let (status, body) = get(&app, "/video?id=live1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["isLive"], true);

        let (status, body) = get(&app, "/video?id=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "videoId required");

        let (status, _) = get(&app, "/video").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(&app, "/video?id=doesNotExist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn unknown_path() {
        let (status, body) = get(&app(), "/unknown-path").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found");
    }

    #[tokio::test]
    async fn upstream_failure_is_500() {
        let app = App::new(
            MockUpstream {
                search_results: vec![mock::search_result("v0", "UCa")],
                fail_channels: true,
                ..Default::default()
            },
            MemoryCache::new(),
            LiveListSettings::default(),
        );
        let (status, body) = get(&app, "/lives?page=1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error");
    }

    #[test]
    fn page_numbers_read_the_leading_integer() {
        assert_eq!(leading_int("2"), Some(2));
        assert_eq!(leading_int("2abc"), Some(2));
        assert_eq!(leading_int("2.5"), Some(2));
        assert_eq!(leading_int("  3"), Some(3));
        assert_eq!(leading_int("-1"), Some(-1));
        assert_eq!(leading_int("+4"), Some(4));
        assert_eq!(leading_int("99999999999999999999"), Some(i64::MAX));
        assert_eq!(leading_int("nope"), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int(""), None);
    }

    #[tokio::test]
    async fn page_with_trailing_garbage() {
        let app = app();
        let (_, body) = get(&app, "/lives?page=2abc").await;
        let page = json(&body);
        assert_eq!(page["page"], 2);
        assert_eq!(page["items"][0]["videoId"], "v8");

        let (_, body) = get(&app, "/lives?page=3.7").await;
        assert_eq!(json(&body)["page"], 3);
    }

    #[test]
    fn query_params_are_decoded() {
        assert_eq!(
            query_param("a=1&id=ab%2Dc&id=second", "id").as_deref(),
            Some("ab-c")
        );
        assert_eq!(query_param("", "id"), None);
    }
}
