//! The page the scene reveals, and the state of the reveal.
//!
//! The animator never touches page elements directly. It talks to a
//! [`PageHost`], which exposes the five elements the scene knows about and
//! two operations on them: adding a class and setting an inline style.
//! [`Page`] is an in-memory host that records those changes and plays the
//! canvas fade-out that follows the reveal.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use tracing::debug;

/// Class added to the main content when it is revealed.
pub const VISIBLE_CLASS: &str = "visible";
/// Class that starts the canvas opacity fade.
pub const FADE_OUT_CLASS: &str = "fade-out";
/// CSS property whose transition end releases the render surface.
pub const OPACITY_PROPERTY: &str = "opacity";

/// Page elements the scene interacts with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    Main,
    BlueOverlay,
    EnterButton,
    Wrapper,
    /// The render surface itself.
    Canvas,
}

impl ElementId {
    pub const ALL: [ElementId; 5] = [
        ElementId::Main,
        ElementId::BlueOverlay,
        ElementId::EnterButton,
        ElementId::Wrapper,
        ElementId::Canvas,
    ];

    /// The element's identifier in the page.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::Main => "main",
            ElementId::BlueOverlay => "blue-overlay",
            ElementId::EnterButton => "enter-button",
            ElementId::Wrapper => "wrapper",
            ElementId::Canvas => "canvas",
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The page operations the scene relies on.
pub trait PageHost {
    fn add_class(&mut self, element: ElementId, class: &str);
    fn has_class(&self, element: ElementId, class: &str) -> bool;
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);
}

/// Where the page is in the reveal flow.
///
/// `Idle → Transitioning → Revealed`; each step happens at most once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealState {
    /// Waiting for a click on the sphere.
    #[default]
    Idle,
    /// The camera is zooming into the sphere.
    Transitioning,
    /// The zoom finished and the page content is shown.
    Revealed,
}

/// Show the page content behind the scene.
///
/// All five changes are applied in one call so the host never observes a
/// partially revealed page.
pub fn apply_reveal(host: &mut impl PageHost) {
    host.add_class(ElementId::Main, VISIBLE_CLASS);
    host.add_class(ElementId::Canvas, FADE_OUT_CLASS);
    host.set_style(ElementId::BlueOverlay, "opacity", "0");
    host.set_style(ElementId::EnterButton, "display", "none");
    host.set_style(ElementId::Wrapper, "pointerEvents", "auto");
}

/// Classes and inline styles of one element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementState {
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
}

/// In-memory page.
///
/// Besides recording classes and styles, the page runs the canvas's CSS
/// opacity transition: once the canvas gains [`FADE_OUT_CLASS`], its opacity
/// falls linearly to zero over `fade_duration` seconds of [`Page::tick`]
/// time, and the tick that completes it reports a transition end for
/// [`OPACITY_PROPERTY`].
#[derive(Clone, Debug)]
pub struct Page {
    elements: HashMap<ElementId, ElementState>,
    fade_duration: f32,
    fade_elapsed: Option<f32>,
    fade_reported: bool,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Page {
    pub fn new(fade_duration: f32) -> Self {
        Self {
            elements: ElementId::ALL
                .into_iter()
                .map(|id| (id, ElementState::default()))
                .collect(),
            fade_duration: fade_duration.max(0.0),
            fade_elapsed: None,
            fade_reported: false,
        }
    }

    pub fn element(&self, id: ElementId) -> &ElementState {
        // Every id is inserted by `new`.
        &self.elements[&id]
    }

    /// Inline style value of an element, if set.
    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.element(id).styles.get(property).map(String::as_str)
    }

    /// Current opacity of the canvas, from 1.0 down to 0.0 during the fade.
    pub fn canvas_opacity(&self) -> f32 {
        match self.fade_elapsed {
            None => 1.0,
            Some(_) if self.fade_duration <= 0.0 => 0.0,
            Some(elapsed) => (1.0 - elapsed / self.fade_duration).clamp(0.0, 1.0),
        }
    }

    /// Advance running transitions by `dt` seconds.
    ///
    /// Returns the property whose transition ended during this tick.
    pub fn tick(&mut self, dt: f32) -> Option<&'static str> {
        let elapsed = self.fade_elapsed.as_mut()?;
        *elapsed += dt.max(0.0);
        if self.fade_reported || self.canvas_opacity() > 0.0 {
            return None;
        }
        self.fade_reported = true;
        debug!("canvas opacity transition ended");
        Some(OPACITY_PROPERTY)
    }
}

impl PageHost for Page {
    fn add_class(&mut self, element: ElementId, class: &str) {
        let inserted = self
            .elements
            .entry(element)
            .or_default()
            .classes
            .insert(class.to_string());
        if inserted {
            debug!(%element, class, "class added");
        }
        if element == ElementId::Canvas && class == FADE_OUT_CLASS && self.fade_elapsed.is_none() {
            self.fade_elapsed = Some(0.0);
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|state| state.classes.contains(class))
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        debug!(%element, property, value, "style set");
        self.elements
            .entry(element)
            .or_default()
            .styles
            .insert(property.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_names() {
        let names: Vec<_> = ElementId::ALL.iter().map(ElementId::as_str).collect();
        assert_eq!(
            names,
            ["main", "blue-overlay", "enter-button", "wrapper", "canvas"]
        );
    }

    #[test]
    fn new_page_is_untouched() {
        let page = Page::default();
        for id in ElementId::ALL {
            assert_eq!(page.element(id), &ElementState::default());
        }
        assert_eq!(page.canvas_opacity(), 1.0);
    }

    #[test]
    fn reveal_applies_all_effects() {
        let mut page = Page::default();
        apply_reveal(&mut page);

        assert!(page.has_class(ElementId::Main, "visible"));
        assert!(page.has_class(ElementId::Canvas, "fade-out"));
        assert_eq!(page.style(ElementId::BlueOverlay, "opacity"), Some("0"));
        assert_eq!(page.style(ElementId::EnterButton, "display"), Some("none"));
        assert_eq!(page.style(ElementId::Wrapper, "pointerEvents"), Some("auto"));
    }

    #[test]
    fn no_fade_without_class() {
        let mut page = Page::new(1.0);
        assert_eq!(page.tick(5.0), None);
        assert_eq!(page.canvas_opacity(), 1.0);
    }

    #[test]
    fn fade_reports_transition_end_once() {
        let mut page = Page::new(1.0);
        page.add_class(ElementId::Canvas, FADE_OUT_CLASS);

        assert_eq!(page.tick(0.5), None);
        assert!((page.canvas_opacity() - 0.5).abs() < 1e-6);
        assert_eq!(page.tick(0.6), Some(OPACITY_PROPERTY));
        assert_eq!(page.canvas_opacity(), 0.0);
        assert_eq!(page.tick(1.0), None);
    }

    #[test]
    fn instant_fade_ends_on_first_tick() {
        let mut page = Page::new(0.0);
        page.add_class(ElementId::Canvas, FADE_OUT_CLASS);
        assert_eq!(page.tick(0.0), Some(OPACITY_PROPERTY));
    }

    #[test]
    fn repeated_class_does_not_restart_fade() {
        let mut page = Page::new(1.0);
        page.add_class(ElementId::Canvas, FADE_OUT_CLASS);
        page.tick(0.75);
        page.add_class(ElementId::Canvas, FADE_OUT_CLASS);
        assert!((page.canvas_opacity() - 0.25).abs() < 1e-6);
    }
}
