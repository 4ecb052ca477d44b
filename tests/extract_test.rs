use takeoff::error::Error;
use takeoff::extract::{self, Category, DrawingImage, Unit};
use takeoff::provider::mock::{MockProvider, MockReply};

const ANALYSIS_REPLY: &str = r#"{
  "drawing_type": "interior elevation",
  "rooms": ["bathroom"],
  "items": [
    {
      "category": "flooring",
      "item_name": "floor tile",
      "material": "ceramic tile",
      "quantity": 20,
      "unit": "sqm",
      "location": "bathroom",
      "specifications": "60x60cm",
      "dimensions": "4m x 5m"
    },
    {
      "category": "fixtures",
      "item_name": "wall-mounted basin",
      "material": "porcelain",
      "quantity": 1,
      "unit": "pcs",
      "location": "bathroom"
    }
  ],
  "notes": "single elevation shown"
}"#;

fn sample_image() -> DrawingImage {
    DrawingImage {
        data: vec![0x89, 0x50, 0x4e, 0x47],
        media_type: "image/png".to_string(),
    }
}

#[tokio::test]
async fn analyze_parses_a_plain_json_reply() {
    let mock = MockProvider::new(vec![MockReply::text(ANALYSIS_REPLY)]);
    let analysis = extract::analyze(&mock, &sample_image()).await.unwrap();

    assert_eq!(analysis.drawing_type, "interior elevation");
    assert_eq!(analysis.rooms, vec!["bathroom".to_string()]);
    assert_eq!(analysis.items.len(), 2);

    let tile = &analysis.items[0];
    assert_eq!(tile.category, Category::Flooring);
    assert_eq!(tile.quantity, 20.0);
    assert_eq!(tile.unit, Unit::Sqm);
    assert_eq!(tile.specifications.as_deref(), Some("60x60cm"));

    let basin = &analysis.items[1];
    assert_eq!(basin.unit, Unit::Pcs);
    assert!(basin.specifications.is_none());
}

#[tokio::test]
async fn analyze_parses_a_fenced_reply_identically() {
    let fenced = format!("```json\n{ANALYSIS_REPLY}\n```");
    let mock = MockProvider::new(vec![MockReply::text(fenced)]);
    let analysis = extract::analyze(&mock, &sample_image()).await.unwrap();
    assert_eq!(analysis.items.len(), 2);
}

#[tokio::test]
async fn analyze_rejects_prose_around_the_json() {
    let mock = MockProvider::new(vec![MockReply::text(format!(
        "Here is what I found:\n{ANALYSIS_REPLY}"
    ))]);
    let err = extract::analyze(&mock, &sample_image()).await.unwrap_err();
    assert!(matches!(err, Error::Extraction(_)));
}

#[tokio::test]
async fn analyze_rejects_unknown_category() {
    let reply = r#"{
      "drawing_type": "plan",
      "items": [{
        "category": "plumbing",
        "item_name": "pipe",
        "material": "copper",
        "quantity": 3,
        "unit": "lm",
        "location": "wall"
      }]
    }"#;
    let mock = MockProvider::new(vec![MockReply::text(reply)]);
    let err = extract::analyze(&mock, &sample_image()).await.unwrap_err();
    assert!(matches!(err, Error::Extraction(_)));
}

#[tokio::test]
async fn analyze_maps_transport_failure_to_extraction_error() {
    let mock = MockProvider::new(vec![MockReply::fail("upstream down")]);
    let err = extract::analyze(&mock, &sample_image()).await.unwrap_err();
    match err {
        Error::Extraction(msg) => assert!(msg.contains("upstream down")),
        other => panic!("expected Extraction, got {other:?}"),
    }
}

#[tokio::test]
async fn analyze_sends_the_schema_demanding_prompt() {
    let mock = MockProvider::new(vec![MockReply::text(ANALYSIS_REPLY)]);
    extract::analyze(&mock, &sample_image()).await.unwrap();

    let prompts = mock.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Respond ONLY with a valid JSON object"));
    assert!(prompts[0].contains("DO NOT include any text outside the JSON"));
}
