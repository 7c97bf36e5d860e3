//! Shared fixtures for exo-web integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use exo_web::images::ImageStore;
use exo_web::selections::SelectionLog;
use exo_web::session::Session;
use exo_web::{build_router, AppState};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Image and output directories plus a router over them
pub struct TestApp {
    pub images: TempDir,
    pub output: TempDir,
    pub router: axum::Router,
}

impl TestApp {
    pub fn log_path(&self) -> PathBuf {
        self.output.path().join("selections.csv")
    }

    /// Data rows of the current log (header skipped)
    pub fn log_rows(&self) -> Vec<String> {
        read_rows(&self.log_path())
    }

    /// Every file in the output dir except the current log
    pub fn archives(&self) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = std::fs::read_dir(self.output.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p != &self.log_path())
            .collect();
        found.sort();
        found
    }
}

pub fn read_rows(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

/// Write a small solid-colour image in the format implied by `name`
pub fn write_image(dir: &Path, name: &str, colour: [u8; 3]) {
    let format = ImageFormat::from_path(name).expect("known image extension");
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(8, 6, Rgb(colour)));
    img.save_with_format(dir.join(name), format).unwrap();
}

/// App whose image directory holds TIFFs with the given names
pub fn setup_app(names: &[&str]) -> TestApp {
    let images = TempDir::new().unwrap();
    for (i, name) in names.iter().enumerate() {
        write_image(images.path(), name, [(i * 40) as u8, 80, 160]);
    }
    setup_app_in(images)
}

pub fn setup_app_in(images: TempDir) -> TestApp {
    let output = TempDir::new().unwrap();
    let log = SelectionLog::open(output.path(), "selections.csv").unwrap();
    let state = AppState::new(ImageStore::new(images.path()), Session::new(log));

    TestApp {
        router: build_router(state),
        images,
        output,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, form_encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

pub async fn extract_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).expect("Should parse JSON")
}

pub async fn extract_text(body: Body) -> String {
    String::from_utf8(body_bytes(body).await).expect("Should be UTF-8")
}

fn form_encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}
