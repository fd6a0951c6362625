use std::fs;
use std::path::PathBuf;

use annotate::TaggedToken;

use crate::error::CorpusError;
use crate::id::{DocumentId, Query};
use crate::index::CorpusIndex;

/// Lazily produced, fallible items. A failed document becomes one `Err` item;
/// iteration carries on with the next document.
pub type Stream<'a, T> = Box<dyn Iterator<Item = Result<T, CorpusError>> + 'a>;

/// The shared reading ladder: documents, paragraphs, sentences, tagged
/// tokens and words, each derived lazily from the previous level.
///
/// Every operation resolves its query up front, so an invalid query or an
/// unreadable corpus root fails before any item is produced.
pub trait CorpusSource {
    type Doc;
    type Para;
    type Sent;

    fn index(&self) -> &CorpusIndex;

    fn docs(&self, query: &Query) -> Result<Stream<'_, Self::Doc>, CorpusError>;

    fn paras(&self, query: &Query) -> Result<Stream<'_, Self::Para>, CorpusError>;

    fn sents(&self, query: &Query) -> Result<Stream<'_, Self::Sent>, CorpusError>;

    fn tagged(&self, query: &Query) -> Result<Stream<'_, TaggedToken>, CorpusError>;

    fn words(&self, query: &Query) -> Result<Stream<'_, String>, CorpusError>;

    fn resolve(&self, query: &Query) -> Result<Vec<DocumentId>, CorpusError> {
        self.index().resolve(query)
    }

    fn abspath(&self, id: &DocumentId) -> PathBuf {
        self.index().abspath(id)
    }

    /// On-disk byte size of each resolved document.
    fn sizes(&self, query: &Query) -> Result<Stream<'_, (DocumentId, u64)>, CorpusError> {
        let ids = self.resolve(query)?;
        Ok(Box::new(ids.into_iter().map(move |id| {
            match fs::metadata(self.abspath(&id)) {
                Ok(meta) => Ok((id, meta.len())),
                Err(e) => Err(CorpusError::DocumentRead {
                    id,
                    reason: e.to_string(),
                }),
            }
        })))
    }
}

/// Expands every `Ok` item with `f` and forwards `Err` items untouched.
pub(crate) fn flat_map_ok<'a, T, U, I, F>(stream: Stream<'a, T>, mut f: F) -> Stream<'a, U>
where
    T: 'a,
    U: 'a,
    I: IntoIterator<Item = Result<U, CorpusError>>,
    I::IntoIter: 'a,
    F: FnMut(T) -> I + 'a,
{
    Box::new(stream.flat_map(move |item| -> Stream<'a, U> {
        match item {
            Ok(value) => Box::new(f(value).into_iter()),
            Err(err) => Box::new(std::iter::once(Err(err))),
        }
    }))
}

/// Wraps every value of an infallible expansion in `Ok`.
pub(crate) fn flatten_ok<'a, T, U, I, F>(stream: Stream<'a, T>, mut f: F) -> Stream<'a, U>
where
    T: 'a,
    U: 'a,
    I: IntoIterator<Item = U>,
    I::IntoIter: 'a,
    F: FnMut(T) -> I + 'a,
{
    flat_map_ok(stream, move |value| f(value).into_iter().map(Ok))
}
