//! Static page discovery from a templates sub-folder.
//!
//! # Mapping
//! ```text
//! <folder>/a/              → page "a",   template "<folder>/a/index<ext>"
//! <folder>/a/b<ext>        → page "b" under "a", template "<folder>/a/b<ext>"
//! <folder>/a/index<ext>    → nothing, already served by "a"
//! <folder>/notes.txt       → nothing
//! <folder>/my page<ext>    → nothing, the name is not a plain path segment
//! ```

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::StartupError;
use crate::page::widget::Page;
use crate::templates::store::template_name;

impl Page {
    /// Attach one static page per directory and per template file found below
    /// `templates_path/folder`, mirroring the folder hierarchy.
    ///
    /// Entries are visited in lexical order so parents exist before children.
    pub fn add_static_pages_from_folder(
        &mut self,
        group_id: u64,
        folder: &str,
        templates_path: &Path,
        template_ext: &str,
    ) -> Result<(), StartupError> {
        let templates_path =
            templates_path
                .canonicalize()
                .map_err(|source| StartupError::TemplatesPath {
                    path: templates_path.to_path_buf(),
                    source,
                })?;
        let root = templates_path.join(folder);
        let index = format!("index{template_ext}");

        let mut added = 0usize;
        let entries = WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(routable_dir);
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let (Ok(inner), Ok(relative)) = (path.strip_prefix(&templates_path), path.strip_prefix(&root))
            else {
                continue;
            };
            let inner = template_name(inner);
            let relative = template_name(relative);

            if entry.file_type().is_dir() {
                let (parent, name) = self.extract_sub_page_from_path(&relative);
                parent.add_sub_page(Page::new_static(name, group_id, format!("{inner}/{index}")));
                added += 1;
            } else if let Some(stem) = relative.strip_suffix(template_ext) {
                let (parent, name) = self.extract_sub_page_from_path(stem);
                if name == "index" {
                    continue;
                }
                if !is_routable_name(name) {
                    tracing::warn!(template = %inner, "Skipping static page with unroutable name");
                    continue;
                }
                parent.add_sub_page(Page::new_static(name, group_id, inner));
                added += 1;
            }
        }
        tracing::info!(folder, group_id, pages = added, "Static pages discovered");
        Ok(())
    }
}

/// Whether `name` can be used verbatim as a route segment: no percent-encoding
/// needed and no route parameter or wildcard syntax.
fn is_routable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-._~!$&'()+,;=:@".contains(&b))
}

/// Prune directories whose name cannot become a page, with their content.
fn routable_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    let routable = entry.file_name().to_str().is_some_and(is_routable_name);
    if !routable {
        tracing::warn!(path = %entry.path().display(), "Skipping static pages folder with unroutable name");
    }
    routable
}
