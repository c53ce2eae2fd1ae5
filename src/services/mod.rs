// MiniBrowser services
// Services provide self-contained functionality: input resolution, settings,
// the new-tab page and its decorative image, download naming, viewer pages.

pub mod decorative_image;
pub mod download_naming;
pub mod internal_pages;
pub mod navigation_resolver;
pub mod placeholder_page;
pub mod settings_engine;
