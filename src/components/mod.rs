//! UI Components
//!
//! Reusable Leptos components.

mod blob_canvas;
mod board_tab_bar;
mod delete_confirm_button;
mod error_toast;
mod label_prompt;
mod migration_banner;
mod sign_in_form;
mod task_blob;

pub use blob_canvas::BlobCanvas;
pub use board_tab_bar::BoardTabBar;
pub use delete_confirm_button::ClearAllButton;
pub use error_toast::ErrorToast;
pub use label_prompt::LabelPromptView;
pub use migration_banner::MigrationBanner;
pub use sign_in_form::SignInForm;
pub use task_blob::TaskBlob;
