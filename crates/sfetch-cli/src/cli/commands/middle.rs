//! `sfetch middle <token>` – middle segment of a dash/slash-delimited token.

use sfetch_core::accession;

pub fn run_middle(token: &str) {
    println!("{}", accession::extract_middle_token(token));
}
