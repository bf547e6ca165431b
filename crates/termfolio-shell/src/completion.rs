#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    None,
    Unique(String),
    Multiple(Vec<String>),
}

/// Case-insensitive prefix match of the whole input line against the
/// vocabulary. Matches keep vocabulary order.
pub fn complete(partial: &str, vocabulary: &[&str]) -> Completion {
    let prefix = partial.to_lowercase();
    let mut matches: Vec<String> = vocabulary
        .iter()
        .filter(|candidate| candidate.to_lowercase().starts_with(&prefix))
        .map(|candidate| candidate.to_string())
        .collect();
    match matches.len() {
        0 => Completion::None,
        1 => Completion::Unique(matches.remove(0)),
        _ => Completion::Multiple(matches),
    }
}
