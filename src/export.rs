//! CSV dump of the whole items table for the admin /export command.

use crate::models::Item;

pub const EXPORT_FILE_NAME: &str = "items_export.csv";

/// Serialize items to CSV in memory, one row per item, header included.
pub fn items_to_csv(items: &[Item]) -> Result<Vec<u8>, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "id",
            "url",
            "title",
            "description",
            "tags",
            "added_by",
            "added_at",
            "file_id",
            "file_name",
            "file_type",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for item in items {
        writer
            .write_record([
                item.id.to_string().as_str(),
                item.url.as_deref().unwrap_or(""),
                &item.title,
                &item.description,
                &item.tags,
                item.added_by.map(|id| id.to_string()).unwrap_or_default().as_str(),
                &item.added_at.to_rfc3339(),
                item.file_id.as_deref().unwrap_or(""),
                item.file_name.as_deref().unwrap_or(""),
                item.file_type.as_deref().unwrap_or(""),
            ])
            .map_err(|e| format!("Failed to write CSV row: {}", e))?;
    }

    writer
        .into_inner()
        .map_err(|e| format!("Failed to finish CSV export: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_items_to_csv() {
        let items = vec![
            Item {
                id: 1,
                url: Some("https://example.com".to_string()),
                title: "has, comma".to_string(),
                description: String::new(),
                tags: "#a #b".to_string(),
                added_by: Some(42),
                added_at: Utc::now(),
                file_id: None,
                file_name: None,
                file_type: None,
            },
            Item {
                id: 2,
                url: None,
                title: "file".to_string(),
                description: String::new(),
                tags: String::new(),
                added_by: None,
                added_at: Utc::now(),
                file_id: Some("F".to_string()),
                file_name: Some("doc.pdf".to_string()),
                file_type: Some("application/pdf".to_string()),
            },
        ];

        let bytes = items_to_csv(&items).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,url,title"));
        assert!(lines[1].contains("\"has, comma\""));
        assert!(lines[2].contains("doc.pdf"));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let bytes = items_to_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
