//! The stock widget set.

mod button;
mod check_box;
mod drop_down;
mod edit_box;
mod label;
mod panel;
mod splitter;
mod tree_view;

pub use button::Button;
pub use check_box::{CheckBox, CheckState};
pub use drop_down::DropDown;
pub use edit_box::EditBox;
pub use label::Label;
pub use panel::Panel;
pub use splitter::Splitter;
pub use tree_view::{TreeNode, TreeView, TreeViewCfg};
