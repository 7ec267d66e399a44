use uuid::Uuid;

use super::common::*;
use crate::export::ExportFormat;
use crate::store::StoreError;
use crate::workflows::documents::{integrity_hash, DocumentError, SignRequest};

#[tokio::test]
async fn saves_drafts_with_trimmed_title() {
    let h = harness();
    let draft = h
        .service
        .save_draft(submission("  ETP notebooks  "))
        .await
        .expect("draft saved");
    assert_eq!(draft.title, "ETP notebooks");
    assert_eq!(draft.status, "Rascunho");

    assert!(matches!(
        h.service.save_draft(submission(" ETP ")).await,
        Err(DocumentError::TitleTooShort)
    ));
    let mut empty = submission("Rascunho vazio");
    empty.generated_content = "\n".to_string();
    assert!(matches!(
        h.service.save_draft(empty).await,
        Err(DocumentError::EmptyContent)
    ));

    assert_eq!(h.service.drafts(None).await.expect("drafts listed").len(), 1);
    h.service.delete_draft(draft.id).await.expect("draft deleted");
    assert!(matches!(
        h.service.draft(draft.id).await,
        Err(DocumentError::Store(StoreError::NotFound))
    ));
}

#[tokio::test]
async fn exports_named_after_kind() {
    let h = harness();
    let draft = h
        .service
        .save_draft(submission("ETP notebooks"))
        .await
        .expect("draft saved");

    let pdf = h
        .service
        .export_draft(draft.id, ExportFormat::Pdf)
        .await
        .expect("pdf export");
    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert!(pdf.file_name.starts_with("etp_"));
    assert!(pdf.file_name.ends_with(".pdf"));

    let docx = h
        .service
        .export_draft(draft.id, ExportFormat::Docx)
        .await
        .expect("docx export");
    assert!(docx.bytes.starts_with(b"PK"));
    assert!(docx.file_name.ends_with(".docx"));
}

#[tokio::test]
async fn signing_seals_content_with_timestamped_digest() {
    let h = harness();
    let draft = h
        .service
        .save_draft(submission("ETP notebooks"))
        .await
        .expect("draft saved");
    let author = Uuid::new_v4();

    let signed = h
        .service
        .sign_draft(
            draft.id,
            SignRequest {
                author_id: author,
                gov_level: Some("ouro".to_string()),
                department: None,
            },
        )
        .await
        .expect("draft signed");

    assert_eq!(signed.status, "assinado_gov_br");
    assert_eq!(signed.department, "Controle Interno");
    assert_eq!(signed.author_id, author);
    assert_eq!(signed.integrity_hash.len(), 64);
    assert_eq!(
        signed.integrity_hash,
        integrity_hash(&draft.generated_content, signed.created_at.timestamp_millis())
    );
    assert!(signed.verify());

    let listed = h.service.signed_documents(None).await.expect("listed");
    assert_eq!(listed, vec![signed]);
}

#[test]
fn digest_covers_content_then_millis() {
    assert_eq!(
        integrity_hash("Parecer assinado", 1_700_000_000_000),
        "12960bf020749f7d8674124cba7f95775f561a1a918b4c95d0bd45fef6d5da55"
    );
}
