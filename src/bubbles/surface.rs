//! The rendering surface the scheduler draws on.

/// Everything a surface needs to show one bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleVisual {
    pub content: String,
    /// Horizontal offset as a percentage of the container width.
    pub position: f32,
    /// Seconds the bubble takes to float from below the container to above it.
    pub lifetime_secs: f32,
}

/// Something that can host bubble elements.
///
/// Removal of an element that is already gone must be a silent no-op.
pub trait RenderSurface {
    /// Where containers get attached. `Default` is the root of the surface.
    type Mount: Default + Clone;
    type Container: Copy + PartialEq + std::fmt::Debug;
    type Element: Copy + PartialEq + std::fmt::Debug;

    /// Create the bubble container on `mount`, replacing any previous one there.
    fn create_container(&mut self, mount: &Self::Mount) -> Self::Container;

    /// Show a bubble. It floats upward on a linear curve over its lifetime.
    fn create_element(&mut self, container: Self::Container, visual: &BubbleVisual) -> Self::Element;

    fn remove_element(&mut self, element: Self::Element);

    fn remove_all_elements(&mut self, container: Self::Container);

    fn remove_container(&mut self, container: Self::Container);
}
