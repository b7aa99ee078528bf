//! In-memory host world.

use dkit_core::{ElementId, GeometryProvider, Point, Rect, Size, Target, VisualWriter};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
struct FakeElement {
    rect: Rect,
    content: Rect,
    scroll: Point,
    detached: bool,
}

/// An in-memory [`GeometryProvider`] + [`VisualWriter`].
///
/// Tests build a viewport and elements, scroll them from the "host" side,
/// and assert on the translations, sizes, and scroll offsets the engine
/// writes back.
#[derive(Debug)]
pub struct FakeWorld {
    viewport: Size,
    viewport_content: Size,
    viewport_scroll: Point,
    elements: FxHashMap<ElementId, FakeElement>,
    translations: FxHashMap<ElementId, Point>,
    applied_sizes: FxHashMap<ElementId, Size>,
    scroll_writes: Vec<(Target, Point)>,
}

impl FakeWorld {
    /// A world whose viewport shows `viewport` out of `content`.
    #[must_use]
    pub fn new(viewport: Size, content: Size) -> Self {
        Self {
            viewport,
            viewport_content: content,
            viewport_scroll: Point::ZERO,
            elements: FxHashMap::default(),
            translations: FxHashMap::default(),
            applied_sizes: FxHashMap::default(),
            scroll_writes: Vec::new(),
        }
    }

    /// Add an element with a visible rect and a content rect (incl. overflow).
    pub fn insert_element(&mut self, id: ElementId, rect: Rect, content: Rect) {
        self.elements.insert(
            id,
            FakeElement {
                rect,
                content,
                scroll: Point::ZERO,
                detached: false,
            },
        );
    }

    /// Host-side scroll: move `target`'s offset without going through the
    /// engine.
    pub fn scroll(&mut self, target: Target, offset: Point) {
        match target {
            Target::Viewport => self.viewport_scroll = offset,
            Target::Element(id) => {
                if let Some(el) = self.elements.get_mut(&id) {
                    el.scroll = offset;
                }
            }
        }
    }

    /// Detach an element; its geometry queries turn absent.
    pub fn detach(&mut self, id: ElementId) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.detached = true;
        }
    }

    /// Re-attach a previously detached element.
    pub fn attach(&mut self, id: ElementId) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.detached = false;
        }
    }

    /// Resize the viewport.
    pub fn resize_viewport(&mut self, viewport: Size, content: Size) {
        self.viewport = viewport;
        self.viewport_content = content;
    }

    /// The last translation applied to `id`.
    #[must_use]
    pub fn translation_of(&self, id: ElementId) -> Option<Point> {
        self.translations.get(&id).copied()
    }

    /// The last size applied to `id`.
    #[must_use]
    pub fn applied_size_of(&self, id: ElementId) -> Option<Size> {
        self.applied_sizes.get(&id).copied()
    }

    /// Every scroll offset the engine wrote, in order.
    #[must_use]
    pub fn scroll_writes(&self) -> &[(Target, Point)] {
        &self.scroll_writes
    }

    fn element(&self, id: ElementId) -> Option<&FakeElement> {
        self.elements.get(&id).filter(|el| !el.detached)
    }
}

impl GeometryProvider for FakeWorld {
    fn rect_of(&self, target: Target) -> Option<Rect> {
        match target {
            Target::Viewport => Some(Rect::from_size(self.viewport)),
            Target::Element(id) => self.element(id).map(|el| el.rect),
        }
    }

    fn content_rect_of(&self, target: Target) -> Option<Rect> {
        match target {
            Target::Viewport => Some(Rect::from_size(self.viewport_content)),
            Target::Element(id) => self.element(id).map(|el| el.content),
        }
    }

    fn scroll_offset_of(&self, target: Target) -> Point {
        match target {
            Target::Viewport => self.viewport_scroll,
            Target::Element(id) => self.element(id).map(|el| el.scroll).unwrap_or_default(),
        }
    }
}

impl VisualWriter for FakeWorld {
    fn set_translation(&mut self, el: ElementId, offset: Point) {
        self.translations.insert(el, offset);
    }

    fn set_size(&mut self, el: ElementId, size: Size) {
        self.applied_sizes.insert(el, size);
        // Applied sizes feed back into geometry, like a real box resize.
        if let Some(element) = self.elements.get_mut(&el) {
            element.rect.width = size.width;
            element.rect.height = size.height;
        }
    }

    fn set_scroll_offset(&mut self, target: Target, offset: Point) {
        self.scroll(target, offset);
        self.scroll_writes.push((target, offset));
    }
}
