use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::NormalizeError;

const RUSSIAN: &[&str] = &[
    "и", "в", "во", "не", "что", "он", "на", "я", "с", "со", "как", "а", "то", "все", "она",
    "так", "его", "но", "да", "ты", "к", "у", "же", "вы", "за", "бы", "по", "только", "ее",
    "мне", "было", "вот", "от", "меня", "еще", "нет", "о", "из", "ему", "теперь", "когда",
    "даже", "ну", "вдруг", "ли", "если", "уже", "или", "ни", "быть", "был", "него", "до",
    "вас", "нибудь", "опять", "уж", "вам", "ведь", "там", "потом", "себя", "ничего", "ей",
    "может", "они", "тут", "где", "есть", "надо", "ней", "для", "мы", "тебя", "их", "чем",
    "была", "сам", "чтоб", "без", "будто", "чего", "раз", "тоже", "себе", "под", "будет", "ж",
    "тогда", "кто", "этот", "того", "потому", "этого", "какой", "совсем", "ним", "здесь",
    "этом", "один", "почти", "мой", "тем", "чтобы", "нее", "сейчас", "были", "куда", "зачем",
    "всех", "никогда", "можно", "при", "наконец", "два", "об", "другой", "хоть", "после",
    "над", "больше", "тот", "через", "эти", "нас", "про", "всего", "них", "какая", "много",
    "разве", "три", "эту", "моя", "впрочем", "хорошо", "свою", "этой", "перед", "иногда",
    "лучше", "чуть", "том", "нельзя", "такой", "им", "более", "всегда", "конечно", "всю",
    "между",
];

const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "don't", "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
    "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn",
    "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn",
    "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Languages with a built-in stopword list.
pub const BUILTIN_LANGUAGES: [&str; 2] = ["russian", "english"];

/// Lowercase stopwords for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    language: String,
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn new<I, S>(language: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            language: language.into(),
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Built-in list for `language` (`russian` or `english`).
    pub fn builtin(language: &str) -> Result<Self, NormalizeError> {
        let words = match language.to_ascii_lowercase().as_str() {
            "russian" | "rus" | "ru" => RUSSIAN,
            "english" | "eng" | "en" => ENGLISH,
            _ => return Err(NormalizeError::UnknownLanguage(language.to_string())),
        };
        Ok(Self::new(language, words))
    }

    /// One word per line; blank lines and `#` comments are skipped.
    pub fn from_path(language: &str, path: impl AsRef<Path>) -> Result<Self, NormalizeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| NormalizeError::Resource {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(
            language,
            text.lines().filter(|line| !line.trim_start().starts_with('#')),
        ))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Case-insensitive membership.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_lists() {
        let ru = StopwordSet::builtin("russian").expect("russian");
        assert!(ru.contains("Он"));
        assert!(ru.contains("и"));
        assert!(!ru.contains("домой"));
        assert_eq!(ru.len(), RUSSIAN.len());

        let en = StopwordSet::builtin("english").expect("english");
        assert!(en.contains("The"));
        assert!(en.contains("don't"));
    }

    #[test]
    fn unknown_language() {
        assert_eq!(
            StopwordSet::builtin("klingon"),
            Err(NormalizeError::UnknownLanguage("klingon".into()))
        );
    }

    #[test]
    fn file_lists_and_extension() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "# custom\nФу\n\n  бар  ").expect("write");
        let mut set = StopwordSet::from_path("custom", file.path()).expect("load");
        assert_eq!(set.len(), 2);
        assert!(set.contains("фу"));
        assert!(set.contains("БАР"));
        set.extend(["Extra"]);
        assert!(set.contains("extra"));
    }
}
