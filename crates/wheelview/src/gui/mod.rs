pub mod app;
pub mod icons;
pub mod theme;
pub mod view;
