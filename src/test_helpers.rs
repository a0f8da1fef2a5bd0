//! Document fixtures for unit tests

use serde_json::json;

use crate::content::Document;

/// A listing-shaped document, as returned when only title/subtitle/author are fetched
pub fn summary_document(uid: &str, title: &str) -> Document {
    serde_json::from_value(json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "post",
        "first_publication_date": "2021-03-15T19:25:28+0000",
        "data": {
            "title": title,
            "subtitle": format!("Subtitle of {}", title),
            "author": "Joseph Oliveira"
        }
    }))
    .unwrap()
}

/// A full post document with one paragraph per section
pub fn post_document(uid: &str, title: &str, sections: &[(&str, &str)]) -> Document {
    let content: Vec<_> = sections
        .iter()
        .map(|(heading, body)| {
            json!({
                "heading": heading,
                "body": [{"type": "paragraph", "text": body, "spans": []}]
            })
        })
        .collect();

    serde_json::from_value(json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "post",
        "first_publication_date": "2021-03-15T19:25:28+0000",
        "data": {
            "title": title,
            "subtitle": format!("Subtitle of {}", title),
            "author": "Joseph Oliveira",
            "banner": {"url": format!("https://images.prismic.io/{}.png", uid), "alt": null},
            "content": content
        }
    }))
    .unwrap()
}
