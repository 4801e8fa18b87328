//! Form engine orchestration: option resolution, render derivation, and the
//! controller state machine.

pub mod controller;
pub mod options;
pub mod render;

pub use controller::{FormController, FormState, SubmitOutcome};
pub use options::{DependencyIndex, OptionCache, OptionResolver};
pub use render::{render_tree, RenderedNode};
