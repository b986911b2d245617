//! Shared helpers for pipeline integration tests.

#![allow(dead_code)]

use std::time::Duration;

use hta_harvester::HarvestOptions;
use hta_pipeline::SummaryConfig;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a PDF with one page per entry of `pages`.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Harvest options pointing NICE at the mock server.
pub fn harvest_options(server: &MockServer) -> HarvestOptions {
    HarvestOptions::default()
        .with_uk_base_url(server.uri())
        .with_politeness_delay(Duration::ZERO)
        .with_timeout(Duration::from_secs(5))
}

/// Summary config pointing the completion client at the mock server.
pub fn summary_config(server: &MockServer) -> SummaryConfig {
    SummaryConfig::builder("test-key")
        .api_base_url(server.uri())
        .timeout_secs(5)
        .summary_timeout_secs(30)
        .build()
}

/// Serve a one-page guidance PDF at the NICE download template for `code`.
pub async fn mount_guidance(server: &MockServer, code: &str, text: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/guidance/{code}/download-pdf")))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(pdf_with_pages(&[text]), "application/pdf"),
        )
        .mount(server)
        .await;
}

/// Chat completion body with a single assistant message.
pub fn chat_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 420,
            "completion_tokens": 80,
            "total_tokens": 500
        }
    })
}
