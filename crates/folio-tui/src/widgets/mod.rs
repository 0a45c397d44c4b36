mod cursor;
mod loader;
mod nav_bar;
mod page;
mod status_bar;

pub use cursor::CursorWidget;
pub use loader::LoaderWidget;
pub use nav_bar::NavBarWidget;
pub use page::{marquee_window, PageWidget};
pub use status_bar::StatusBarWidget;
