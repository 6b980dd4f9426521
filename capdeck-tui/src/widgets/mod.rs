//! Components the showcase screens are built from

pub mod button_grid;
pub mod dialog;
pub mod modal;
pub mod picker_list;
pub mod status;
pub mod video;

pub use button_grid::{ButtonGrid, ButtonGridProps, GridButton};
pub use dialog::{NoticeDialog, NoticeDialogProps};
pub use modal::{open_overlay, Overlay};
pub use picker_list::{PickerList, PickerListProps};
pub use status::{StatusBar, StatusBarProps};
pub use video::{VideoPanel, VideoPanelProps};
