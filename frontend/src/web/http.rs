//! Fetch transport
//!
//! Implements the core `HttpClient` on top of `gloo-net`, so every client in
//! `tutor` runs unchanged in the browser.

use async_trait::async_trait;
use gloo_net::http::{Method, RequestBuilder};
use tutor::request::{HttpBody, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use tutor::{ApiError, ApiResult};

/// Browser `fetch` transport. Stateless; a shared static instance is fine.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

pub static FETCH: FetchHttpClient = FetchHttpClient;

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = RequestBuilder::new(&req.url).method(to_method(req.method));
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(HttpBody::Text(text)) => builder.body(text),
            Some(HttpBody::Bytes(bytes)) => builder.body(js_sys::Uint8Array::from(bytes.as_slice())),
            None => builder.build(),
        }
        .map_err(|e| ApiError::RequestBuild(e.to_string()))?;

        // fetch only rejects when no response arrived at all (DNS, CORS, offline)
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
