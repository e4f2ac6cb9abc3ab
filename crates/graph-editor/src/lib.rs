//! `ce-graph-editor` — Interactive engine of the curve graph editor.
//!
//! Turns pointer and key events into edits of the timelines held by a
//! [`ce_app_state::EditorHistory`]:
//!
//! - **Coordinate mapping** ([`GraphSpace`]) between pointer, viewport and
//!   curve space
//! - **Visible value range** ([`get_y_bounds`]) fitted to the curves in view
//! - **Hit testing** ([`get_action_to_perform_on_mouse_down`])
//! - **Gestures** ([`GraphEditor`]): keyframe and control point drags,
//!   control point creation, rectangle selection, pan, zoom and view-bounds
//!   dragging, each committed as one undoable action
//!
//! # Usage
//!
//! ```rust
//! use ce_app_state::{ViewState, YBounds};
//! use ce_common::{Rect, Vec2};
//! use ce_graph_editor::{GraphEditor, KeyStates};
//! use ce_timeline::{Timeline, TimelineKeyframe};
//!
//! let timeline = Timeline::with_keyframes(
//!     "opacity",
//!     vec![TimelineKeyframe::new("1", 10, 0.0), TimelineKeyframe::new("2", 30, 5.0)],
//! );
//! let mut view = ViewState::new(100.0, Rect::new(0.0, 0.0, 232.0, 200.0));
//! view.y_bounds = Some(YBounds::new(10.0, -10.0));
//!
//! let mut editor = GraphEditor::new(vec![timeline], view, KeyStates::new());
//! // Keyframe "2" sits at (76, 50); drag it 10 frames to the right.
//! editor.mouse_down(Vec2::new(76.0, 50.0));
//! editor.mouse_move(Vec2::new(96.0, 50.0));
//! editor.advance(16.0);
//! editor.mouse_up();
//!
//! let moved = editor.history().current_primary().timeline("opacity").unwrap();
//! assert_eq!(moved.keyframe("2").unwrap().index, 40);
//! assert!(editor.undo());
//! ```

pub mod editor;
pub mod error;
pub mod input;
pub mod transform;
pub mod y_bounds;

pub use editor::GraphEditor;
pub use error::{EditorError, EditorResult};
pub use hit_test::{
    get_action_to_perform_on_mouse_down, view_bounds_bar_width, view_bounds_bar_x,
    view_bounds_handle_rect, MouseDownAction, ViewBoundsHandle,
};
pub use input::{InputState, Key, KeyStates};
pub use transform::GraphSpace;
pub use y_bounds::{get_y_bounds, timeline_y_bounds};
