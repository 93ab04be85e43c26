//! Integration tests for feecrawl using wiremock

use feecrawl::{
    BillingModel, CrawlOptions, Crawler, FeeRecord, FetchError, Fetcher, HttpFetcher,
    MunicipalityEntry, ParseError, PdfExtractor,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SAMPLE_HTML: &str = r#"<html><body>
<p>Timtaxa för livsmedelskontroll är 1200 kr.</p>
<p>Vi använder efterhandsdebitering.</p>
<p>Timtaxa för bygglov är 900 kr.</p>
</body></html>"#;

const SAMPLE_PDF_TEXT: &str = "Timtaxa för livsmedelskontroll 1300 kr. Forskottsdebitering.";

/// Treats response bodies as already-extracted PDF text
struct PlainTextPdf;

impl PdfExtractor for PlainTextPdf {
    fn extract_text(&self, content: &[u8]) -> Result<String, ParseError> {
        Ok(String::from_utf8_lossy(content).into_owned())
    }
}

fn crawler_with_text_pdfs() -> Crawler {
    Crawler::builder()
        .pdf_extractor(Arc::new(PlainTextPdf))
        .build()
        .unwrap()
}

/// Minimal one-page PDF with a single line of Helvetica text
fn one_page_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

async fn mount_html(server: &MockServer, at: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_html_page_facts() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/taxor", SAMPLE_HTML).await;

    let entries = vec![MunicipalityEntry::new(
        "Test",
        format!("{}/taxor", mock_server.uri()),
    )];
    let table = crawler_with_text_pdfs().run(&entries).await;

    assert_eq!(table.len(), 1);
    let row = &table.rows()[0];
    assert_eq!(row.municipality, "Test");
    assert_eq!(row.food_control_hourly_rate, Some(1200.0));
    assert_eq!(row.food_control_billing_model, Some(BillingModel::Efterhands));
    assert_eq!(row.building_permit_hourly_rate, Some(900.0));
}

#[tokio::test]
async fn test_direct_pdf_with_lopdf() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dokument/taxa.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(one_page_pdf("Timtaxa livsmedelskontroll 1300 kr. Forskottsdebitering."))
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let entries = vec![MunicipalityEntry::new(
        "PDFTest",
        format!("{}/dokument/taxa.pdf", mock_server.uri()),
    )];
    let table = Crawler::builder().build().unwrap().run(&entries).await;

    let row = &table.rows()[0];
    assert_eq!(row.food_control_hourly_rate, Some(1300.0));
    assert_eq!(row.food_control_billing_model, Some(BillingModel::Forskott));
    assert_eq!(row.building_permit_hourly_rate, None);
}

#[tokio::test]
async fn test_pdf_link_in_html() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/",
        r#"<html><body><a href="fees.pdf">Fees</a></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/fees.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_PDF_TEXT))
        .expect(1)
        .mount(&mock_server)
        .await;

    let entries = vec![MunicipalityEntry::new(
        "LinkPDF",
        format!("{}/", mock_server.uri()),
    )];
    let table = crawler_with_text_pdfs().run(&entries).await;

    let row = &table.rows()[0];
    assert_eq!(row.food_control_hourly_rate, Some(1300.0));
    assert_eq!(row.food_control_billing_model, Some(BillingModel::Forskott));
    assert_eq!(row.building_permit_hourly_rate, None);
}

#[tokio::test]
async fn test_linked_pdf_failure_keeps_page_facts() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/",
        r#"<p>Timtaxa för bygglov är 950 kr</p><a href="/borta.pdf">Gammal taxa</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/borta.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let entries = vec![MunicipalityEntry::new(
        "Delvis",
        format!("{}/", mock_server.uri()),
    )];
    let table = crawler_with_text_pdfs().run(&entries).await;

    let row = &table.rows()[0];
    assert_eq!(row.building_permit_hourly_rate, Some(950.0));
    assert_eq!(row.food_control_hourly_rate, None);
}

#[tokio::test]
async fn test_failed_municipality_does_not_stop_run() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/ok", SAMPLE_HTML).await;

    Mock::given(method("GET"))
        .and(path("/saknas"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let entries = MunicipalityEntry::from_mapping([
        ("Saknas", format!("{}/saknas", mock_server.uri())),
        ("Ok", format!("{}/ok", mock_server.uri())),
    ]);
    let table = crawler_with_text_pdfs().run(&entries).await;

    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0], FeeRecord::empty("Saknas"));
    assert_eq!(table.rows()[1].municipality, "Ok");
    assert_eq!(table.rows()[1].food_control_hourly_rate, Some(1200.0));

    let summary = table.summary();
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.building_permit_rates, 1);
}

#[tokio::test]
async fn test_rows_follow_input_order_under_concurrency() {
    let mock_server = MockServer::start().await;

    for (i, delay_ms) in [300u64, 10, 150, 0].into_iter().enumerate() {
        let html = format!("<p>Timtaxa för bygglov {}</p>", 1000 + i);
        Mock::given(method("GET"))
            .and(path(format!("/kommun{i}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(html, "text/html")
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&mock_server)
            .await;
    }

    let entries: Vec<_> = (0..4)
        .map(|i| MunicipalityEntry::new(format!("K{i}"), format!("{}/kommun{i}", mock_server.uri())))
        .collect();
    let crawler = Crawler::builder().concurrency(4).build().unwrap();
    let table = crawler.run(&entries).await;

    let names: Vec<&str> = table.rows().iter().map(|r| r.municipality.as_str()).collect();
    assert_eq!(names, vec!["K0", "K1", "K2", "K3"]);
    let rates: Vec<Option<f64>> = table
        .rows()
        .iter()
        .map(|r| r.building_permit_hourly_rate)
        .collect();
    assert_eq!(rates, vec![Some(1000.0), Some(1001.0), Some(1002.0), Some(1003.0)]);
}

#[tokio::test]
async fn test_request_timeout_yields_empty_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SAMPLE_HTML)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let crawler = Crawler::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let entries = vec![MunicipalityEntry::new(
        "Långsam",
        format!("{}/slow", mock_server.uri()),
    )];
    let table = crawler.run(&entries).await;

    assert_eq!(table.rows()[0], FeeRecord::empty("Långsam"));
}

#[tokio::test]
async fn test_http_fetcher_classifies_and_rejects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Taxa.PDF"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.5".to_vec()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fel"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&CrawlOptions::default()).unwrap();

    let result = fetcher
        .fetch(&format!("{}/Taxa.PDF", mock_server.uri()))
        .await;
    let document = assert_ok!(result);
    assert!(document.is_pdf);
    assert_eq!(&document.content[..], b"%PDF-1.5");

    let result = fetcher.fetch(&format!("{}/fel", mock_server.uri())).await;
    let err = assert_err!(result);
    assert!(matches!(err, FetchError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_html_declared_charset_is_decoded() {
    let mock_server = MockServer::start().await;
    let latin1: &[u8] =
        b"<html><body><p>Timtaxa f\xf6r livsmedelskontroll 1150 kr, f\xf6rhandsdebitering.</p></body></html>";

    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(latin1.to_vec(), "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/latin1", mock_server.uri());
    let fetcher = HttpFetcher::new(&CrawlOptions::default()).unwrap();
    let document = assert_ok!(fetcher.fetch(&url).await);
    assert!(!document.is_pdf);
    let body = std::str::from_utf8(&document.content).unwrap();
    assert!(body.contains("förhandsdebitering"));

    let table = crawler_with_text_pdfs()
        .run(&[MunicipalityEntry::new("Latin", url)])
        .await;
    let row = &table.rows()[0];
    assert_eq!(row.food_control_hourly_rate, Some(1150.0));
    assert_eq!(row.food_control_billing_model, Some(BillingModel::Forskott));
}
