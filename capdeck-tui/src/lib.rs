//! Terminal front end for capdeck
//!
//! Capability providers that render into a ratatui screen instead of a phone:
//! audio sources are probed and tracked, haptics shake the border, notices
//! become banners and dialogs, the file picker is a modal list and scheduled
//! notifications fire on a timer.
//!
//! Providers never draw. They send [`UiRequest`]s through a [`UiBridge`] and
//! the [`Shell`] applies them on the event loop, which also routes key
//! presses through the [`Component`]s and turns them into dispatcher
//! triggers.
//!
//! ```ignore
//! let (bridge, mut ui_rx) = UiBridge::channel();
//! let caps = terminal_capabilities(&bridge, &config);
//! let dispatcher = Arc::new(Dispatcher::with_actions(caps.clone(), standard_actions(&config))?);
//! let mut shell = Shell::new(ShellContent::from_actions(dispatcher.actions()));
//!
//! while let Some(request) = ui_rx.recv().await {
//!     shell.apply(request, Instant::now());
//! }
//! ```

pub mod bridge;
pub mod component;
pub mod event;
pub mod providers;
pub mod shell;
pub mod testing;
pub mod theme;
pub mod widgets;

pub use bridge::{UiBridge, UiRequest};
pub use component::Component;
pub use event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
pub use providers::terminal_capabilities;
pub use shell::{Effect, Shell, ShellAction, ShellContent, ShellUpdate};
