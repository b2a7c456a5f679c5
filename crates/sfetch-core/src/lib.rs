//! sfetch core: accession normalization and predicted-structure fetching
//! from AlphaFold DB and ESM Atlas.

pub mod accession;
pub mod checksum;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod naming;
pub mod retry;
pub mod scene;
pub mod source;
pub mod storage;
pub mod transport;
pub mod uniprot;

pub use accession::{extract_accession, extract_middle_token, Accession, AccessionError};
