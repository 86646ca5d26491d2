//! Turning stored documents into text blocks.

use crate::error::ServerError;
use mongodb::bson::{Bson, Document};

/// Replace `_id` with a plain string: ObjectIds become their 24-char hex form,
/// strings stay as they are, anything else becomes its JSON text.
pub fn normalize_id(document: &mut Document) {
    let plain = match document.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s.clone(),
        Some(other) => other.clone().into_relaxed_extjson().to_string(),
        None => return,
    };
    document.insert("_id", plain);
}

/// Render one document as pretty-printed relaxed Extended JSON.
pub fn render_document(mut document: Document) -> Result<String, ServerError> {
    normalize_id(&mut document);
    let value = Bson::Document(document).into_relaxed_extjson();
    serde_json::to_string_pretty(&value)
        .map_err(|e| ServerError::internal(format!("Failed to render document: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};

    #[test]
    fn test_object_id_becomes_hex() {
        let oid = ObjectId::new();
        let mut document = doc! { "_id": oid, "symbol": "AAPL" };
        normalize_id(&mut document);
        assert_eq!(document.get_str("_id").unwrap(), oid.to_hex());
        // Field order is preserved
        assert_eq!(document.keys().next().map(String::as_str), Some("_id"));
    }

    #[test]
    fn test_non_string_ids() {
        let mut document = doc! { "_id": 42_i32 };
        normalize_id(&mut document);
        assert_eq!(document.get_str("_id").unwrap(), "42");

        let mut document = doc! { "_id": "AAPL-2024" };
        normalize_id(&mut document);
        assert_eq!(document.get_str("_id").unwrap(), "AAPL-2024");

        let mut document = doc! { "symbol": "MSFT" };
        normalize_id(&mut document);
        assert!(document.get("_id").is_none());
    }

    #[test]
    fn test_render_document() {
        let oid = ObjectId::new();
        let text = render_document(doc! {
            "_id": oid,
            "company": "Apple Inc.",
            "symbol": "AAPL",
            "financials": { "revenue": 383_285_000_000_i64, "eps": 6.13 },
        })
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["_id"], serde_json::json!(oid.to_hex()));
        assert_eq!(value["symbol"], "AAPL");
        assert_eq!(value["financials"]["revenue"], 383_285_000_000_i64);
        assert!(text.contains('\n'), "output should be pretty-printed");
    }
}
