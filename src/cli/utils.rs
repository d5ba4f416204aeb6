use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::menu::{MenuNode, Tree};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Indented outline of the tree, one node per line
pub fn render_tree(tree: &Tree) -> String {
    fn render(nodes: &[MenuNode], depth: usize, out: &mut String) {
        for node in nodes {
            let saved = match node.persisted_id {
                Some(id) => format!("id {}", id),
                None => "unsaved".to_string(),
            };
            let link = node.url.as_deref().map(|u| format!(" -> {}", u)).unwrap_or_default();
            out.push_str(&format!(
                "{}#{:<4} {}{} [{}]\n",
                "  ".repeat(depth),
                node.local_id,
                node.title,
                link,
                saved
            ));
            render(&node.children, depth + 1, out);
        }
    }

    let mut out = String::new();
    render(&tree.roots, 0, &mut out);
    out
}
