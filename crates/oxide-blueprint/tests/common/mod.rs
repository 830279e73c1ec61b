#![allow(dead_code)]

use oxide_blueprint::{Blueprint, Dialect, Grammar};

pub fn sqlite() -> Box<dyn Grammar> {
    Dialect::Sqlite.grammar()
}

pub fn postgres() -> Box<dyn Grammar> {
    Dialect::Postgres.grammar()
}

pub fn create(table: &str, configure: impl FnOnce(&mut Blueprint)) -> Blueprint {
    let mut bp = Blueprint::create(table);
    configure(&mut bp);
    bp
}

pub fn alter(table: &str, configure: impl FnOnce(&mut Blueprint)) -> Blueprint {
    let mut bp = Blueprint::alter(table);
    configure(&mut bp);
    bp
}

pub fn compile_alter(grammar: &dyn Grammar, bp: &Blueprint) -> Vec<String> {
    grammar
        .compile_alter(bp)
        .unwrap_or_else(|e| panic!("Failed to compile alter for {}: {e}", bp.table()))
}
