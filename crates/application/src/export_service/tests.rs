use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docforge_core::{AppError, AppResult};
use docforge_domain::{BlockNode, DocumentAst, InlineNode};
use tokio_util::sync::CancellationToken;

use crate::document_ports::{DocumentSerializer, LogoFetcher, LogoImage, LogoSizing};

use super::{DocumentExportService, ExportOptions};

enum LogoBehavior {
    Bytes(Vec<u8>),
    Fail,
    Hang,
}

struct FakeLogoFetcher {
    behavior: LogoBehavior,
}

#[async_trait]
impl LogoFetcher for FakeLogoFetcher {
    async fn fetch_logo(&self, _logo_url: &str) -> AppResult<Vec<u8>> {
        match &self.behavior {
            LogoBehavior::Bytes(bytes) => Ok(bytes.clone()),
            LogoBehavior::Fail => Err(AppError::Unavailable("logo host down".to_owned())),
            LogoBehavior::Hang => std::future::pending().await,
        }
    }
}

#[derive(Default)]
struct RecordingSerializer {
    calls: AtomicUsize,
    logos: std::sync::Mutex<Vec<Option<LogoImage>>>,
    fail: bool,
}

impl DocumentSerializer for RecordingSerializer {
    fn file_extension(&self) -> &'static str {
        "docx"
    }

    fn content_type(&self) -> &'static str {
        "application/test"
    }

    fn serialize(&self, document: &DocumentAst, logo: Option<&LogoImage>) -> AppResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut logos) = self.logos.lock() {
            logos.push(logo.cloned());
        }
        if self.fail {
            return Err(AppError::Internal("packing failed".to_owned()));
        }
        Ok(document.plain_text().into_bytes())
    }
}

fn document() -> DocumentAst {
    DocumentAst::new(vec![BlockNode::paragraph(vec![InlineNode::text("body")])])
}

fn options(logo_url: Option<&str>) -> ExportOptions {
    ExportOptions {
        file_name: "Letter".to_owned(),
        logo_url: logo_url.map(str::to_owned),
        logo_sizing: LogoSizing::ProportionalHeight { height_pt: 70 },
    }
}

fn service(
    behavior: LogoBehavior,
    serializer: Arc<RecordingSerializer>,
) -> DocumentExportService {
    DocumentExportService::new(Arc::new(FakeLogoFetcher { behavior }), serializer)
}

fn recorded_logos(serializer: &RecordingSerializer) -> Vec<Option<LogoImage>> {
    serializer
        .logos
        .lock()
        .map(|logos| logos.clone())
        .unwrap_or_default()
}

#[tokio::test]
async fn export_embeds_fetched_logo_with_requested_sizing() {
    let serializer = Arc::new(RecordingSerializer::default());
    let service = service(LogoBehavior::Bytes(vec![1, 2, 3]), serializer.clone());

    let exported = service
        .export(&document(), &options(Some("https://cdn.test/logo.png")))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(exported.file_name, "Letter.docx");
    assert_eq!(exported.content_type, "application/test");
    assert_eq!(exported.bytes, b"body".to_vec());
    assert_eq!(
        recorded_logos(&serializer),
        vec![Some(LogoImage {
            bytes: vec![1, 2, 3],
            sizing: LogoSizing::ProportionalHeight { height_pt: 70 },
        })]
    );
}

#[tokio::test]
async fn failed_or_empty_logo_is_not_fatal() {
    for behavior in [LogoBehavior::Fail, LogoBehavior::Bytes(Vec::new())] {
        let serializer = Arc::new(RecordingSerializer::default());
        let service = service(behavior, serializer.clone());

        let exported = service
            .export(&document(), &options(Some("https://cdn.test/logo.png")))
            .await;

        assert!(exported.is_ok_and(|exported| !exported.bytes.is_empty()));
        assert_eq!(recorded_logos(&serializer), vec![None]);
    }
}

#[tokio::test]
async fn serialization_failure_is_propagated() {
    let serializer = Arc::new(RecordingSerializer {
        fail: true,
        ..RecordingSerializer::default()
    });
    let service = service(LogoBehavior::Fail, serializer.clone());

    let result = service.export(&document(), &options(None)).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert_eq!(serializer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancellation_discards_in_flight_export() {
    let serializer = Arc::new(RecordingSerializer::default());
    let service = service(LogoBehavior::Hang, serializer.clone());
    let token = CancellationToken::new();

    let cancel = token.clone();
    tokio::spawn(async move {
        cancel.cancel();
    });

    let result = service
        .export_cancellable(
            &document(),
            &options(Some("https://cdn.test/logo.png")),
            &token,
        )
        .await;

    assert!(matches!(result, Err(AppError::Cancelled(_))));
    assert_eq!(serializer.calls.load(Ordering::SeqCst), 0);
}
