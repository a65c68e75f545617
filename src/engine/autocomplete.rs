use crate::model::config::THEME_NAMES;
use crate::ops::store::TaskStore;

use super::registry::{CommandEngine, Vocabulary};

/// Outcome of a Tab press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    None,
    /// Replace the whole input line
    Replace(String),
    /// Several matches; show them and leave the input alone
    Candidates(Vec<String>),
}

impl CommandEngine {
    /// Complete the verb, or the verb's first argument from its vocabulary.
    /// A single token followed by whitespace completes an empty argument.
    pub fn complete(&self, input: &str, store: &TaskStore) -> Completion {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let trailing_space = input.ends_with(char::is_whitespace);

        match (tokens.as_slice(), trailing_space) {
            ([verb], false) => self.complete_verb(verb),
            ([verb], true) => self.complete_argument(verb, "", store),
            ([verb, partial], false) => self.complete_argument(verb, partial, store),
            _ => Completion::None,
        }
    }

    fn complete_verb(&self, partial: &str) -> Completion {
        let partial = partial.to_lowercase();
        let matches: Vec<String> = self
            .commands()
            .map(|c| c.name)
            .filter(|name| name.starts_with(&partial))
            .map(str::to_string)
            .collect();
        pick(matches, |only| format!("{} ", only))
    }

    fn complete_argument(&self, verb: &str, partial: &str, store: &TaskStore) -> Completion {
        let Some(spec) = self.lookup(verb) else {
            return Completion::None;
        };
        let vocabulary: Vec<String> = match spec.vocabulary {
            Vocabulary::None => return Completion::None,
            Vocabulary::Fixed(words) => words.iter().map(|w| w.to_string()).collect(),
            Vocabulary::Themes => THEME_NAMES.iter().map(|w| w.to_string()).collect(),
            Vocabulary::Tags => std::iter::once("tags".to_string())
                .chain(store.tags())
                .collect(),
        };
        let matches: Vec<String> = vocabulary
            .into_iter()
            .filter(|word| word.starts_with(partial))
            .collect();
        pick(matches, |only| format!("{} {}", spec.name, only))
    }
}

fn pick(mut matches: Vec<String>, replace: impl FnOnce(&str) -> String) -> Completion {
    match matches.len() {
        0 => Completion::None,
        1 => Completion::Replace(replace(&matches.remove(0))),
        _ => Completion::Candidates(matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(input: &str) -> Completion {
        CommandEngine::new().complete(input, &TaskStore::new())
    }

    #[test]
    fn unique_verb_prefix_is_completed_with_space() {
        assert_eq!(complete("ad"), Completion::Replace("add ".into()));
        assert_eq!(complete("ZEN"), Completion::Replace("zenfetch ".into()));
    }

    #[test]
    fn ambiguous_verb_prefix_lists_candidates() {
        assert_eq!(
            complete("s"),
            Completion::Candidates(vec!["sound".into(), "sync".into(), "stats".into()])
        );
    }

    #[test]
    fn no_match_and_empty_input() {
        assert_eq!(complete("xyz"), Completion::None);
        assert_eq!(complete(""), Completion::None);
        assert_eq!(complete("   "), Completion::None);
    }

    #[test]
    fn fixed_vocabularies() {
        assert_eq!(complete("rm d"), Completion::Replace("rm done".into()));
        assert_eq!(complete("sound o"), Completion::Candidates(vec!["on".into(), "off".into()]));
        assert_eq!(complete("notify of"), Completion::Replace("notify off".into()));
        assert_eq!(complete("memo c"), Completion::Replace("memo clear".into()));
    }

    #[test]
    fn verb_with_trailing_space_lists_whole_vocabulary() {
        assert_eq!(
            complete("rm "),
            Completion::Candidates(vec!["all".into(), "done".into()])
        );
        assert_eq!(
            complete("theme "),
            Completion::Candidates(vec!["green".into(), "amber".into(), "cyan".into()])
        );
    }

    #[test]
    fn list_completes_live_tags() {
        let mut store = TaskStore::new();
        store.add("call @mom; fix @home sink").unwrap();
        let engine = CommandEngine::new();
        assert_eq!(
            engine.complete("list @h", &store),
            Completion::Replace("list @home".into())
        );
        assert_eq!(
            engine.complete("list ", &store),
            Completion::Candidates(vec!["tags".into(), "@mom".into(), "@home".into()])
        );
        assert_eq!(engine.complete("list t", &store), Completion::Replace("list tags".into()));
    }

    #[test]
    fn verbs_without_vocabulary_and_long_input() {
        assert_eq!(complete("add bu"), Completion::None);
        assert_eq!(complete("rm done x"), Completion::None);
        assert_eq!(complete("nope x"), Completion::None);
    }
}
