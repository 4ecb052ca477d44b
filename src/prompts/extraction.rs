//! The drawing-analysis instruction sent alongside the image.

const ROLE: &str =
    "You are an expert architectural cost estimator analyzing interior elevation drawings.";

const TASK: &str = "Analyze this 2D interior drawing and extract ALL materials, fixtures, finishes, and components that would need to be purchased or installed.";

const FIELDS: &[&str] = &[
    "Item name/description",
    "Material type (e.g., ceramic tile, wooden panel, glass, metal fixture)",
    "Estimated quantity (area in sqm, linear meters, or units)",
    "Location/room",
    "Any specifications mentioned (dimensions, brand, model)",
];

/// The exact reply shape demanded from the model. Strict: the extractor
/// rejects anything that does not parse into this.
const SCHEMA: &str = r#"{
  "drawing_type": "interior elevation",
  "rooms": ["list of rooms identified"],
  "items": [
    {
      "category": "flooring|wall_finish|ceiling|fixtures|furniture|millwork|doors_windows",
      "item_name": "specific item name",
      "material": "material type",
      "quantity": number,
      "unit": "sqm|lm|units|pcs",
      "location": "room or area",
      "specifications": "any detailed specs",
      "dimensions": "width x height or area"
    }
  ],
  "notes": "any additional observations"
}"#;

const CLOSING: &str = "DO NOT include any text outside the JSON. Be thorough and identify every visible material and fixture.";

pub fn build_extraction_prompt() -> String {
    let fields = FIELDS
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{}. {}", i + 1, field))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{ROLE}\n\n{TASK}\n\nFor each item, identify:\n{fields}\n\nRespond ONLY with a valid JSON object in this exact format:\n{SCHEMA}\n\n{CLOSING}"
    )
}
