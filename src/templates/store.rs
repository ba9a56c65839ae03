//! In-memory template store loaded from the templates folder.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::StartupError;
use crate::handler::data::DataBag;
use crate::templates::{RenderError, TemplateRenderer};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)\s*\}\}").unwrap()
});

/// Templates keyed by their `/`-separated path relative to the templates root.
#[derive(Debug, Default, Clone)]
pub struct TemplateStore {
    templates: HashMap<String, String>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every file ending with `ext` below `root`.
    pub fn load(root: &Path, ext: &str) -> Result<Self, StartupError> {
        let mut store = Self::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let name = template_name(relative);
            if !name.ends_with(ext) {
                continue;
            }
            let content = fs::read_to_string(path).map_err(|source| StartupError::TemplateLoad {
                path: path.to_path_buf(),
                source,
            })?;
            store.templates.insert(name, content);
        }
        tracing::info!(root = ?root, count = store.templates.len(), "Templates loaded");
        Ok(store)
    }

    /// Register a template under `name`.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.templates.insert(name.into(), content.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateRenderer for TemplateStore {
    fn render(&self, name: &str, data: &DataBag) -> Result<String, RenderError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| RenderError::UnknownTemplate(name.to_string()))?;

        let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
            data.lookup(&caps[1]).map(display_value).unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

/// `/`-joined form of a path relative to the templates root.
pub(crate) fn template_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => escape_html(s),
        other => escape_html(&other.to_string()),
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
