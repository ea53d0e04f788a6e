//! Plain-text rendering of a memory document for context injection.

use crate::document::MemoryDocument;

/// Render the document the way a session-start hook injects it into
/// the model context. Empty sections are omitted.
pub fn render_document(doc: &MemoryDocument) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push("=== ENGRAM MEMORY ===".to_string());
    let last_updated = doc
        .last_updated
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "Unknown".to_string());
    out.push(format!("Last Updated: {}", last_updated));
    out.push(String::new());

    let context = doc.project_context.trim();
    if !context.is_empty() {
        out.push("PROJECT CONTEXT:".to_string());
        out.push(format!("  {}", context));
        out.push(String::new());
    }

    if !doc.active_tasks.is_empty() {
        out.push(format!("ACTIVE TASKS ({}):", doc.active_tasks.len()));
        for (i, task) in doc.active_tasks.iter().enumerate() {
            out.push(format!("  [{}] {}", i + 1, describe_task(task)));
        }
        out.push(String::new());
    }

    if !doc.technical_debt.is_empty() {
        out.push(format!("TECHNICAL DEBT ({} items):", doc.technical_debt.len()));
        for (i, debt) in doc.technical_debt.iter().enumerate() {
            out.push(format!("  [{}] {}", i + 1, describe_debt(debt)));
        }
        out.push(String::new());
    }

    if !doc.file_map.is_empty() {
        out.push("RECENTLY MODIFIED FILES:".to_string());
        // serde_json::Map iterates in key order, so paths come out sorted.
        for (path, info) in &doc.file_map {
            let last = info
                .get("last_modified")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown");
            let summary = info.get("summary").and_then(|v| v.as_str()).unwrap_or("");
            out.push(format!("  - {}", path));
            out.push(format!("    Last: {} | {}", last, summary));
        }
        out.push(String::new());
    }

    out.push("=== END MEMORY ===".to_string());
    out.join("\n")
}

fn describe_task(task: &serde_json::Value) -> String {
    match task {
        serde_json::Value::Object(obj) => {
            let desc = obj
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown task");
            let added = obj.get("added_at").and_then(|v| v.as_str()).unwrap_or("");
            format!("{} (Added: {})", desc, added)
        }
        other => value_text(other),
    }
}

fn describe_debt(debt: &serde_json::Value) -> String {
    match debt {
        serde_json::Value::Object(obj) => {
            let desc = obj
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown issue");
            let priority = obj.get("priority").and_then(|v| v.as_str()).unwrap_or("medium");
            format!("[{}] {}", priority.to_uppercase(), desc)
        }
        other => value_text(other),
    }
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
