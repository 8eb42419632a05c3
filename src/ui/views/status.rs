use serde::Serialize;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// A database path, or why it could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Found { path: String },
    Missing { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub vault: String,
    pub state_file: String,
    pub watermark: i64,
    pub artifact_dir: String,
    pub artifacts: usize,
    pub annotation_db: SourceStatus,
    pub library_db: SourceStatus,
    pub staging_dir: Option<String>,
    pub config_file: Option<String>,
}

impl StatusView {
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("status"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

fn render_source(status: &SourceStatus, supports_color: bool, supports_unicode: bool) -> String {
    match status {
        SourceStatus::Found { path } => format!(
            "{} {}",
            Icon::Success.colored(supports_color, supports_unicode),
            path
        ),
        SourceStatus::Missing { message } => format!(
            "{} {}",
            Icon::Error.colored(supports_color, supports_unicode),
            ColoredText::error(message.as_str()).render(supports_color)
        ),
    }
}

pub fn render_status(view: &StatusView, supports_color: bool, supports_unicode: bool) -> String {
    let mut header = CommandHeader::new(Icon::Book, "Marginalia Status");
    header.add("Vault", view.vault.as_str());
    header.add("State file", view.state_file.as_str());
    header.add("Watermark", view.watermark.to_string());
    header.add(
        "Artifacts",
        format!("{} in {}", view.artifacts, view.artifact_dir),
    );
    header.add(
        "Annotations",
        render_source(&view.annotation_db, supports_color, supports_unicode),
    );
    header.add(
        "Library",
        render_source(&view.library_db, supports_color, supports_unicode),
    );
    if let Some(dir) = &view.staging_dir {
        header.add("Staging", dir.as_str());
    }
    header.add(
        "Config",
        view.config_file
            .clone()
            .unwrap_or_else(|| "(built-in defaults)".to_string()),
    );
    header.render(supports_color, supports_unicode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> StatusView {
        StatusView {
            vault: "/notes".into(),
            state_file: "/notes/marginalia_state.json".into(),
            watermark: 42,
            artifact_dir: "/notes/apple_books_sync".into(),
            artifacts: 3,
            annotation_db: SourceStatus::Found {
                path: "/books/AEAnnotation_v1.sqlite".into(),
            },
            library_db: SourceStatus::Missing {
                message: "no file matching 'BKLibrary-*.sqlite' in /books".into(),
            },
            staging_dir: None,
            config_file: None,
        }
    }

    #[test]
    fn renders_plain_status_block() {
        let out = render_status(&view(), false, false);
        assert_eq!(
            out,
            "[BOOKS] Marginalia Status\n\
             Vault: /notes\n\
             State file: /notes/marginalia_state.json\n\
             Watermark: 42\n\
             Artifacts: 3 in /notes/apple_books_sync\n\
             Annotations: [OK] /books/AEAnnotation_v1.sqlite\n\
             Library: [FAIL] no file matching 'BKLibrary-*.sqlite' in /books\n\
             Config: (built-in defaults)\n"
        );
    }

    #[test]
    fn json_is_tagged_with_command() {
        let value: serde_json::Value = serde_json::from_str(&view().to_json()).unwrap();
        assert_eq!(value["command"], "status");
        assert_eq!(value["watermark"], 42);
        assert_eq!(
            value["annotation_db"]["found"]["path"],
            "/books/AEAnnotation_v1.sqlite"
        );
    }
}
