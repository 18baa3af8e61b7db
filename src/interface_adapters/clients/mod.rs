pub mod views;

pub use views::ViewsClient;
