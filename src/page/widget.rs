//! Pages and the widget capability.

use crate::page::static_widget::StaticWidget;
use crate::routing::Scope;

/// Capability every page must provide: register its handlers in a router scope
/// rooted at the page's path.
pub trait Widget: Send + Sync {
    fn load_into(&self, scope: &mut Scope<'_>);

    /// The static variant, the only one owning sub-pages.
    fn as_static(&self) -> Option<&StaticWidget> {
        None
    }

    fn as_static_mut(&mut self) -> Option<&mut StaticWidget> {
        None
    }
}

/// Named node of the site tree.
///
/// Built once at startup, read-only while serving.
pub struct Page {
    name: String,
    visible: bool,
    widget: Box<dyn Widget>,
}

impl Page {
    /// Page listed in navigation.
    pub fn new(name: impl Into<String>, widget: impl Widget + 'static) -> Self {
        Self {
            name: name.into(),
            visible: true,
            widget: Box::new(widget),
        }
    }

    /// Page reachable by URL but absent from navigation listings.
    pub fn hidden(name: impl Into<String>, widget: impl Widget + 'static) -> Self {
        Self {
            visible: false,
            ..Self::new(name, widget)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    /// Register this page's handlers, and its sub-pages', into `scope`.
    pub fn load_into(&self, scope: &mut Scope<'_>) {
        self.widget.load_into(scope);
    }

    /// Attach `page` below this one.
    ///
    /// Silently ignored when this page's widget cannot own sub-pages. A sibling
    /// with the same name keeps its place and `page` is dropped.
    pub fn add_sub_page(&mut self, page: Page) {
        let parent = self.name.clone();
        let Some(widget) = self.widget.as_static_mut() else {
            tracing::debug!(parent = %parent, page = %page.name, "Widget does not accept sub-pages");
            return;
        };
        if widget.sub_pages.iter().any(|sub| sub.name == page.name) {
            tracing::warn!(parent = %parent, page = %page.name, "Duplicate page name ignored");
            return;
        }
        widget.sub_pages.push(page);
    }

    /// Direct child named `name`.
    pub fn sub_page(&self, name: &str) -> Option<&Page> {
        if name.is_empty() {
            return None;
        }
        self.sub_pages().iter().find(|sub| sub.name == name)
    }

    pub fn sub_page_mut(&mut self, name: &str) -> Option<&mut Page> {
        if name.is_empty() {
            return None;
        }
        self.sub_pages_mut().iter_mut().find(|sub| sub.name == name)
    }

    /// Direct children, empty for widgets that cannot own any.
    pub fn sub_pages(&self) -> &[Page] {
        match self.widget.as_static() {
            Some(widget) => &widget.sub_pages,
            None => &[],
        }
    }

    fn sub_pages_mut(&mut self) -> &mut [Page] {
        match self.widget.as_static_mut() {
            Some(widget) => &mut widget.sub_pages,
            None => &mut [],
        }
    }

    /// Direct children shown in navigation listings.
    pub fn visible_sub_pages(&self) -> impl Iterator<Item = &Page> {
        self.sub_pages().iter().filter(|sub| sub.visible)
    }

    /// Walk `path` segment by segment while children match.
    ///
    /// Returns the deepest matched page and the last segment of `path`, whether
    /// or not that segment matched.
    pub fn extract_sub_page_from_path<'p>(&mut self, path: &'p str) -> (&mut Page, &'p str) {
        let (last, parents) = match path.rsplit_once('/') {
            Some((parents, last)) => (last, Some(parents)),
            None => (path, None),
        };

        let mut current = self;
        for name in parents.into_iter().flat_map(|p| p.split('/')) {
            let Some(index) = current.sub_pages().iter().position(|sub| sub.name == name) else {
                break;
            };
            current = &mut current.sub_pages_mut()[index];
        }
        (current, last)
    }
}
