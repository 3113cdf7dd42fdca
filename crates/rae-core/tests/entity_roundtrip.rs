//! Serde roundtrip tests for all entity types.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rae_core::entities::*;
use rae_core::enums::*;

macro_rules! roundtrip {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(recovered, val, "serde roundtrip failed for {}", stringify!($ty));
        }
    };
}

roundtrip!(
    project_roundtrip,
    Project,
    Project {
        id: "p-1".into(),
        title: "Rénovation Immeuble".into(),
        client: "ABC Construction".into(),
        description: "Diagnostic avant rénovation".into(),
        status: ProjectStatus::InProgress,
        date: "12/05/2025".into(),
    }
);

roundtrip!(
    document_roundtrip,
    Document,
    Document {
        id: "d-1".into(),
        title: "Plan RDC".into(),
        project_id: None,
        document_type: Some("pdf".into()),
        created_at: Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap(),
        url: Some("https://files.example/plan.pdf".into()),
        cover_url: None,
        rapport: true,
    }
);

roundtrip!(
    template_section_roundtrip,
    TemplateSection,
    TemplateSection {
        id: "s-1".into(),
        template_rapport_id: "t-1".into(),
        title: "Inventaire".into(),
        instructions: "Lister les matériaux".into(),
        example: None,
        order_index: 2,
    }
);

roundtrip!(
    generated_part_roundtrip,
    GeneratedPart,
    GeneratedPart {
        id: "g-1".into(),
        project_id: "p-1".into(),
        template_rapport_part_id: Some("s-1".into()),
        template_part_title: "Inventaire".into(),
        content: "# Inventaire".into(),
        source_ids: vec!["d-1".into()],
        created_at: Utc.with_ymd_and_hms(2025, 5, 2, 9, 0, 0).unwrap(),
    }
);

#[test]
fn chat_message_omits_absent_sources() {
    let msg = ChatMessage {
        id: "msg-1".into(),
        sender: Sender::User,
        text: "hello".into(),
        time: "10:42".into(),
        source_documents: None,
    };
    let json = serde_json::to_value(&msg).unwrap();
    assert!(json.get("source_documents").is_none());
    assert_eq!(json["sender"], "user");
}

#[test]
fn document_rapport_flag_defaults_to_false() {
    let json = r#"{
        "id": "d-2",
        "title": "Photo",
        "project_id": "p-1",
        "document_type": null,
        "created_at": "2025-05-01T08:00:00Z",
        "url": null,
        "cover_url": null
    }"#;
    let doc: Document = serde_json::from_str(json).unwrap();
    assert!(!doc.rapport);
    assert_eq!(doc.date(), "01/05/2025");
}

#[test]
fn draft_status_defaults_to_draft() {
    let draft = ProjectDraft::new("Extension");
    assert_eq!(draft.effective_status(), ProjectStatus::Draft);

    let explicit = ProjectDraft {
        status: Some(ProjectStatus::Pending),
        ..ProjectDraft::new("Extension")
    };
    assert_eq!(explicit.effective_status(), ProjectStatus::Pending);
}

#[test]
fn report_search_blank_detection() {
    assert!(ReportSearch::default().is_empty());
    assert!(
        ReportSearch {
            report_name: "   ".into(),
            ..ReportSearch::default()
        }
        .is_empty()
    );
    assert!(
        !ReportSearch {
            client_name: "Vinci".into(),
            ..ReportSearch::default()
        }
        .is_empty()
    );
}
