//! `sfetch parse <tokens>...` – show the accession each token resolves to.

use sfetch_core::accession::{self, Strategy};

pub fn run_parse(tokens: &[String]) {
    for token in tokens {
        match accession::extract_accession(token) {
            Ok(acc) => println!("{token}\t{acc}"),
            Err(_) if token.contains("://") => println!("{token}\tNotFound\t(url)"),
            Err(_) => println!(
                "{token}\tNotFound\t({})",
                Strategy::select(token).name()
            ),
        }
    }
}
