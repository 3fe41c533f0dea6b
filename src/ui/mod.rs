pub mod dialog;
pub mod hud;
