use std::fs;

use annotate::{AnnotatedDocument, Annotator, Paragraph, Sentence, TaggedToken};
use extract::{CleanedHtml, ExtractError, TextExtractor};
use tracing::{debug, warn};

use crate::error::CorpusError;
use crate::id::{DocumentId, Query};
use crate::index::CorpusIndex;
use crate::source::{flat_map_ok, flatten_ok, CorpusSource, Stream};

/// Reads raw HTML documents and derives every level on the fly.
///
/// Documents that clean to nothing are logged as `extract_skip` and left out
/// of `html` and everything derived from it; `docs` and `sizes` still see
/// them.
#[derive(Debug, Clone)]
pub struct RawCorpusSource {
    index: CorpusIndex,
    extractor: TextExtractor,
    annotator: Annotator,
}

impl RawCorpusSource {
    pub fn new(index: CorpusIndex, extractor: TextExtractor, annotator: Annotator) -> Self {
        Self {
            index,
            extractor,
            annotator,
        }
    }

    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    /// Raw bytes of one document.
    pub fn read_bytes(&self, id: &DocumentId) -> Result<Vec<u8>, CorpusError> {
        if !id.is_contained() {
            return Err(CorpusError::DocumentRead {
                id: id.clone(),
                reason: "id points outside the corpus root".into(),
            });
        }
        fs::read(self.index.abspath(id)).map_err(|e| CorpusError::DocumentRead {
            id: id.clone(),
            reason: e.to_string(),
        })
    }

    /// Full text of one document. Invalid UTF-8 is a read failure.
    pub fn read(&self, id: &DocumentId) -> Result<String, CorpusError> {
        decode_utf8(id, self.read_bytes(id)?)
    }

    /// Cleans one document, attributing failures to `id`.
    pub fn clean(&self, id: &DocumentId, raw: &str) -> Result<CleanedHtml, CorpusError> {
        self.extractor.clean(raw).map_err(|e| unparseable(id, e))
    }

    /// Main-content markup of each parseable document.
    pub fn html(&self, query: &Query) -> Result<Stream<'_, CleanedHtml>, CorpusError> {
        let cleaned = self.html_with_ids(query)?;
        Ok(Box::new(cleaned.map(|item| item.map(|(_, html)| html))))
    }

    /// Paragraphs of each document as tagged sentences.
    pub fn tagged_paras(&self, query: &Query) -> Result<Stream<'_, Paragraph>, CorpusError> {
        let cleaned = self.html_with_ids(query)?;
        Ok(flat_map_ok(cleaned, move |(id, html)| {
            self.tag_paragraphs(id, &html)
        }))
    }

    /// Tagged sentences of each document in order.
    pub fn tagged_sents(&self, query: &Query) -> Result<Stream<'_, Sentence>, CorpusError> {
        Ok(flatten_ok(self.tagged_paras(query)?, |para| para))
    }

    /// Annotates a whole document held in memory.
    ///
    /// A document without extractable content annotates to an empty
    /// document, with the same `extract_skip` warning the streams log.
    pub fn annotate(&self, id: &DocumentId, raw: &str) -> Result<AnnotatedDocument, CorpusError> {
        match self.clean(id, raw) {
            Ok(html) => self.tag_paragraphs(id.clone(), &html).collect(),
            Err(err @ CorpusError::UnparseableDocument { .. }) => {
                warn!(doc_id = %id, error = %err, "extract_skip");
                Ok(AnnotatedDocument::default())
            }
            Err(err) => Err(err),
        }
    }

    fn docs_with_ids(
        &self,
        query: &Query,
    ) -> Result<Stream<'_, (DocumentId, String)>, CorpusError> {
        let ids = self.resolve(query)?;
        debug!(documents = ids.len(), "corpus_resolve");
        Ok(Box::new(ids.into_iter().map(move |id| {
            let _span = tracing::debug_span!("corpus.docs", doc_id = %id).entered();
            self.read(&id).map(|text| (id, text))
        })))
    }

    fn html_with_ids(
        &self,
        query: &Query,
    ) -> Result<Stream<'_, (DocumentId, CleanedHtml)>, CorpusError> {
        let docs = self.docs_with_ids(query)?;
        Ok(Box::new(docs.filter_map(move |item| match item {
            Ok((id, text)) => match self.clean(&id, &text) {
                Ok(html) => Some(Ok((id, html))),
                Err(err) => {
                    warn!(doc_id = %id, error = %err, "extract_skip");
                    None
                }
            },
            Err(err) => Some(Err(err)),
        })))
    }

    fn tag_paragraphs<'a>(
        &'a self,
        id: DocumentId,
        html: &CleanedHtml,
    ) -> impl Iterator<Item = Result<Paragraph, CorpusError>> + 'a {
        let extractor = &self.extractor;
        let annotator = &self.annotator;
        extractor.extract_paragraphs(html).map(move |para| {
            let sentences = extractor
                .split_sentences(&para)
                .into_iter()
                .map(|sent| extractor.split_tokens(&sent));
            annotator
                .tag_paragraph(sentences)
                .map_err(|source| CorpusError::Annotate {
                    id: id.clone(),
                    source,
                })
        })
    }
}

impl CorpusSource for RawCorpusSource {
    type Doc = String;
    type Para = String;
    type Sent = String;

    fn index(&self) -> &CorpusIndex {
        &self.index
    }

    fn docs(&self, query: &Query) -> Result<Stream<'_, String>, CorpusError> {
        let docs = self.docs_with_ids(query)?;
        Ok(Box::new(docs.map(|item| item.map(|(_, text)| text))))
    }

    fn paras(&self, query: &Query) -> Result<Stream<'_, String>, CorpusError> {
        let extractor = &self.extractor;
        Ok(flatten_ok(self.html(query)?, move |html| {
            extractor.extract_paragraphs(&html)
        }))
    }

    fn sents(&self, query: &Query) -> Result<Stream<'_, String>, CorpusError> {
        let extractor = &self.extractor;
        Ok(flatten_ok(self.paras(query)?, move |para| {
            extractor.split_sentences(&para)
        }))
    }

    fn tagged(&self, query: &Query) -> Result<Stream<'_, TaggedToken>, CorpusError> {
        Ok(flatten_ok(self.tagged_sents(query)?, |sent| sent))
    }

    fn words(&self, query: &Query) -> Result<Stream<'_, String>, CorpusError> {
        let extractor = &self.extractor;
        Ok(flatten_ok(self.sents(query)?, move |sent| {
            extractor.split_tokens(&sent)
        }))
    }
}

pub(crate) fn decode_utf8(id: &DocumentId, bytes: Vec<u8>) -> Result<String, CorpusError> {
    String::from_utf8(bytes).map_err(|e| CorpusError::DocumentRead {
        id: id.clone(),
        reason: format!("not valid UTF-8: {e}"),
    })
}

fn unparseable(id: &DocumentId, err: ExtractError) -> CorpusError {
    let reason = match err {
        ExtractError::Unparseable(reason) => reason,
        other => other.to_string(),
    };
    CorpusError::UnparseableDocument {
        id: id.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use annotate::LexiconTagger;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, body: &[u8]) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, body).expect("write");
    }

    fn source(dir: &TempDir) -> RawCorpusSource {
        RawCorpusSource::new(
            CorpusIndex::open(dir.path()).expect("index"),
            TextExtractor::default(),
            Annotator::new(Arc::new(LexiconTagger::new("rus"))),
        )
    }

    fn ok<T>(stream: Stream<'_, T>) -> Vec<T> {
        stream.map(|item| item.expect("item")).collect()
    }

    #[test]
    fn single_paragraph_ladder() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "A/doc1.txt", "<p>Он шел домой.</p>".as_bytes());
        let src = source(&dir);
        let q = Query::ids(["A/doc1.txt"]);

        assert_eq!(ok(src.paras(&q).expect("paras")), vec!["Он шел домой."]);
        assert_eq!(ok(src.sents(&q).expect("sents")), vec!["Он шел домой."]);
        assert_eq!(
            ok(src.words(&q).expect("words")),
            vec!["Он", "шел", "домой", "."]
        );
    }

    #[test]
    fn tagged_matches_words() {
        let dir = TempDir::new().expect("tempdir");
        write(
            &dir,
            "A/doc1.txt",
            "<h1>Заголовок</h1><p>Он шел домой. Было темно!</p><ul><li>раз, два</li></ul>"
                .as_bytes(),
        );
        let src = source(&dir);
        let q = Query::all();
        let words = ok(src.words(&q).expect("words"));
        let tagged = ok(src.tagged(&q).expect("tagged"));
        assert_eq!(words.len(), tagged.len());
        for (word, token) in words.iter().zip(&tagged) {
            assert_eq!(*word, token.token);
            assert!(!token.tag.is_empty());
        }
    }

    #[test]
    fn docs_yield_full_text_in_id_order() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "B/b.txt", b"<p>b</p>");
        write(&dir, "A/a.txt", b"<p>a</p>");
        let src = source(&dir);
        assert_eq!(
            ok(src.docs(&Query::all()).expect("docs")),
            vec!["<p>a</p>", "<p>b</p>"]
        );
    }

    #[test]
    fn unreadable_document_is_one_error_item() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "A/a.txt", b"<p>first</p>");
        write(&dir, "A/c.txt", b"<p>third</p>");
        let src = source(&dir);
        let q = Query::ids(["A/a.txt", "A/missing.txt", "A/c.txt"]);
        let items: Vec<_> = src.paras(&q).expect("paras").collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Ok("first".to_string()));
        assert!(matches!(
            &items[1],
            Err(CorpusError::DocumentRead { id, .. }) if id.as_str() == "A/missing.txt"
        ));
        assert_eq!(items[2], Ok("third".to_string()));
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "A/bad.txt", &[0x3c, 0x70, 0x3e, 0xff, 0xfe]);
        let src = source(&dir);
        let items: Vec<_> = src.docs(&Query::all()).expect("docs").collect();
        assert!(matches!(
            items.as_slice(),
            [Err(CorpusError::DocumentRead { .. })]
        ));
    }

    #[test]
    fn unparseable_documents_are_skipped() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "A/empty.txt", b"<script>var x = 1;</script>");
        write(&dir, "A/good.txt", b"<p>good</p>");
        let src = source(&dir);
        assert_eq!(ok(src.paras(&Query::all()).expect("paras")), vec!["good"]);
        assert_eq!(ok(src.html(&Query::all()).expect("html")).len(), 1);
        assert_eq!(ok(src.docs(&Query::all()).expect("docs")).len(), 2);

        let doc = src
            .annotate(&DocumentId::new("A/empty.txt"), "<script></script>")
            .expect("annotate");
        assert!(doc.is_empty());
    }

    #[test]
    fn sizes_report_bytes_on_disk() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "A/doc1.txt", b"<p>12345</p>");
        let src = source(&dir);
        assert_eq!(
            ok(src.sizes(&Query::all()).expect("sizes")),
            vec![(DocumentId::new("A/doc1.txt"), 12)]
        );
    }

    #[test]
    fn streams_are_lazy() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "A/a.txt", b"<p>a</p>");
        let src = source(&dir);
        let mut docs = src
            .docs(&Query::ids(["A/a.txt", "A/late.txt"]))
            .expect("docs");
        assert_eq!(docs.next(), Some(Ok("<p>a</p>".to_string())));
        write(&dir, "A/late.txt", b"<p>late</p>");
        assert_eq!(docs.next(), Some(Ok("<p>late</p>".to_string())));
    }
}
