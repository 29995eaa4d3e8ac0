//! The floating contextual toolbar.

use strum_macros::{Display, EnumString};
use voxel_dom::NodeId;

use crate::config::EditorConfig;

/// Size of the editor's viewport container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Container width.
    pub width: f32,
    /// Container height.
    pub height: f32,
}

/// An action offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ToolbarAction {
    /// Enter inline text editing.
    EditText,
    /// Open the image replace flow. Only offered for images.
    ChangeImage,
    /// Duplicate the target.
    Duplicate,
    /// Delete the target.
    Delete,
}

/// Transient toolbar state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolbarState {
    /// Whether the toolbar is shown.
    pub visible: bool,
    /// Left edge relative to the viewport container.
    pub x: f32,
    /// Top edge relative to the viewport container.
    pub y: f32,
    /// Element the actions apply to.
    pub target: Option<NodeId>,
    /// Tag name of the target.
    pub target_tag: String,
    /// Whether the target is an image.
    pub is_image: bool,
}

impl ToolbarState {
    /// Show the toolbar for `target` near `(x, y)`, clamped into `viewport`.
    ///
    /// The toolbar never crosses the right edge and never rises above
    /// `toolbar_min_top`.
    pub fn show(
        &mut self,
        target: NodeId,
        target_tag: &str,
        x: f32,
        y: f32,
        viewport: Viewport,
        config: &EditorConfig,
    ) {
        let max_x = (viewport.width - config.toolbar_width).max(0.0);
        self.visible = true;
        self.x = x.clamp(0.0, max_x);
        self.y = (y - config.toolbar_vertical_offset).max(config.toolbar_min_top);
        self.target = Some(target);
        self.target_tag = target_tag.to_string();
        self.is_image = target_tag == "img";
    }

    /// Hide and forget the target.
    pub fn hide(&mut self) {
        *self = Self::default();
    }

    /// Actions available for the current target.
    #[must_use]
    pub fn actions(&self) -> Vec<ToolbarAction> {
        if !self.visible {
            return Vec::new();
        }
        let mut actions = vec![ToolbarAction::EditText];
        if self.is_image {
            actions.push(ToolbarAction::ChangeImage);
        }
        actions.extend([ToolbarAction::Duplicate, ToolbarAction::Delete]);
        actions
    }
}
