use axum::{body::Body, http::Request, response::Response, Router};
use std::io::{Cursor, Write};
use tower::ServiceExt;

const BOUNDARY: &str = "appleverse-boundary";

fn with_token(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header("Authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub fn build_post_request(path: &str, token: Option<&str>, body: &str) -> Request<Body> {
    build_json_request("POST", path, token, body)
}

pub fn build_json_request(method: &str, path: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let builder = Request::builder()
        .uri(path)
        .method(method)
        .header("Content-Type", "application/json");
    with_token(builder, token)
        .body(Body::from(body.to_owned()))
        .unwrap()
}

pub fn build_get_request(path: &str, token: Option<&str>) -> Request<Body> {
    let builder = Request::builder().uri(path);
    with_token(builder, token).body(Body::empty()).unwrap()
}

/// Multipart form with `(field name, optional file name, content)` parts
pub fn build_multipart_request(
    path: &str,
    token: Option<&str>,
    parts: &[(&str, Option<&str>, &[u8])],
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        write!(body, "--{BOUNDARY}\r\n").unwrap();
        match file_name {
            Some(file_name) => write!(
                body,
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\r\n"
            ),
            None => write!(body, "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
        }
        .unwrap();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    write!(body, "--{BOUNDARY}--\r\n").unwrap();
    let builder = Request::builder()
        .uri(path)
        .method("POST")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    with_token(builder, token).body(Body::from(body)).unwrap()
}

pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn read_json(res: Response) -> serde_json::Value {
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
