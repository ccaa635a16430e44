//! Film corpus persistence
//!
//! The corpus is a JSON document of the form `{ "films": [ ... ] }`. It is
//! read once at startup as an optional prior corpus and written once at the
//! end of the run with the ranked films.

use crate::film::FilmCorpus;
use crate::CorpusError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Reads a corpus file
pub fn load_corpus(path: &Path) -> Result<FilmCorpus, CorpusError> {
    let file = File::open(path)?;
    let corpus = serde_json::from_reader(BufReader::new(file))?;
    Ok(corpus)
}

/// Reads the prior corpus, treating any failure as "no prior corpus"
///
/// A missing or unparseable file is logged and the crawl proceeds from the
/// root alone.
pub fn load_prior_corpus(path: Option<&Path>) -> Option<FilmCorpus> {
    let path = path?;

    match load_corpus(path) {
        Ok(corpus) => {
            tracing::info!(
                "Loaded {} films from prior corpus {}",
                corpus.len(),
                path.display()
            );
            Some(corpus)
        }
        Err(e) => {
            tracing::warn!("retrieve file failed: {}: {}", path.display(), e);
            None
        }
    }
}

/// Creates (or truncates) the output file
///
/// Called before the crawl starts so an unwritable destination aborts the
/// run before any page is fetched.
pub fn create_output(path: &Path) -> Result<BufWriter<File>, CorpusError> {
    Ok(BufWriter::new(File::create(path)?))
}

/// Serializes the corpus to `writer` and flushes it
pub fn write_corpus<W: Write>(mut writer: W, corpus: &FilmCorpus) -> Result<(), CorpusError> {
    serde_json::to_writer(&mut writer, corpus)?;
    writer.flush()?;
    Ok(())
}
