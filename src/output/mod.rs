//! Helpers for rendering command results for terminals and scripts

use crate::qr::ArtifactInfo;
use crate::state::FormSnapshot;
use serde_json::{Map, Value, json};
use std::path::Path;

/// Combined structured and human-readable representation of one run
#[derive(Debug, Clone)]
pub struct RenderedRun {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Everything a single CLI invocation produced
#[derive(Debug, Clone, Default)]
pub struct RunReport<'a> {
    /// Form state after generation
    pub snapshot: Option<&'a FormSnapshot>,
    /// Where the artifact was saved, if a download succeeded
    pub saved_to: Option<&'a Path>,
    /// Verification outcome, if one was requested
    pub verified: Option<&'a ArtifactInfo>,
    /// Failures worth showing the user
    pub errors: Vec<String>,
}

/// Render a run report into both JSON and human-readable forms.
pub fn render_run(report: &RunReport<'_>) -> RenderedRun {
    let mut root = Map::new();
    let mut human = Vec::new();

    if let Some(snapshot) = report.snapshot {
        root.insert("text".to_string(), Value::String(snapshot.text.clone()));
        root.insert(
            "reference".to_string(),
            snapshot
                .reference
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        root.insert("copied".to_string(), Value::Bool(snapshot.copied));

        match &snapshot.reference {
            Some(reference) => {
                human.push("QR code ready".to_string());
                human.push(format!("  Link: {}", snapshot.text));
                human.push(format!("  Image: {reference}"));
            }
            None => human.push("No QR code generated".to_string()),
        }
        if snapshot.copied {
            human.push("  Link copied to clipboard".to_string());
        }
    }

    if let Some(path) = report.saved_to {
        root.insert(
            "saved_to".to_string(),
            Value::String(path.display().to_string()),
        );
        human.push(format!("  Saved: {}", path.display()));
    }

    if let Some(info) = report.verified {
        root.insert("verified".to_string(), artifact_value(info));
        human.push(format!(
            "  Verified: {} {}x{} ({} bytes)",
            info.format, info.width, info.height, info.byte_length
        ));
    }

    if !report.errors.is_empty() {
        root.insert("errors".to_string(), json!(report.errors));
        for error in &report.errors {
            human.push(format!("  Error: {error}"));
        }
    }

    RenderedRun {
        json: Value::Object(root),
        human,
    }
}

fn artifact_value(info: &ArtifactInfo) -> Value {
    json!({
        "format": info.format,
        "width": info.width,
        "height": info.height,
        "byte_length": info.byte_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FormSnapshot {
        FormSnapshot {
            text: "https://example.com".to_string(),
            reference: Some("https://svc/?data=https%3A%2F%2Fexample.com".to_string()),
            busy: true,
            copied: false,
        }
    }

    #[test]
    fn test_render_generated_reference() {
        let snapshot = snapshot();
        let rendered = render_run(&RunReport {
            snapshot: Some(&snapshot),
            ..Default::default()
        });

        assert_eq!(rendered.json["text"], "https://example.com");
        assert_eq!(
            rendered.json["reference"],
            "https://svc/?data=https%3A%2F%2Fexample.com"
        );
        assert!(rendered.json.get("errors").is_none());
        assert_eq!(rendered.human[0], "QR code ready");
    }

    #[test]
    fn test_render_saved_verified_and_errors() {
        let snapshot = snapshot();
        let info = ArtifactInfo {
            format: "png".to_string(),
            width: 300,
            height: 300,
            byte_length: 1024,
        };
        let path = Path::new("out/qrcode.png");
        let rendered = render_run(&RunReport {
            snapshot: Some(&snapshot),
            saved_to: Some(path),
            verified: Some(&info),
            errors: vec!["Clipboard unavailable: no display".to_string()],
        });

        assert_eq!(rendered.json["saved_to"], "out/qrcode.png");
        assert_eq!(rendered.json["verified"]["width"], 300);
        assert_eq!(rendered.json["errors"][0], "Clipboard unavailable: no display");
        assert!(
            rendered
                .human
                .iter()
                .any(|line| line == "  Verified: png 300x300 (1024 bytes)")
        );
    }

    #[test]
    fn test_render_without_reference() {
        let snapshot = FormSnapshot {
            text: "   ".to_string(),
            reference: None,
            busy: false,
            copied: false,
        };
        let rendered = render_run(&RunReport {
            snapshot: Some(&snapshot),
            ..Default::default()
        });
        assert_eq!(rendered.json["reference"], Value::Null);
        assert_eq!(rendered.human, vec!["No QR code generated".to_string()]);
    }
}
