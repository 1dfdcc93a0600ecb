use wasm_bindgen::prelude::*;

pub mod game;
pub mod scoring;
pub mod table;

use game::GorizianaGame;

cue_web::export_game!(GorizianaGame, "goriziana");
