pub mod controller;
pub mod exercise;
pub mod input;
pub mod result;
pub mod tokenizer;
pub mod word_bank;
