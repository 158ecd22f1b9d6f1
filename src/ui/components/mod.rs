pub mod cloze_area;
pub mod fetch_error;
pub mod menu;
pub mod progress_bar;
pub mod word_bank;
