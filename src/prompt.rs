//! Interactive collection of the search term and optional date bounds.

use std::io;

/// Prompting errors
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// A yes/no question got something other than `y` or `n`
    #[error("Invalid Choice: {0:?}")]
    InvalidChoice(String),

    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Something that can ask the user a question and return the typed line
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError>;
}

/// Prompter backed by the terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| PromptError::Io(io::Error::other(e)))
    }
}

/// Raw answers collected from the user, dates still in `YYYY-MM-DD` form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub term: String,
    pub after_date: Option<String>,
    pub before_date: Option<String>,
}

/// Parse a `y`/`n` answer (case-insensitive, surrounding whitespace ignored)
pub fn parse_choice(answer: &str) -> Result<bool, PromptError> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" => Ok(true),
        "n" => Ok(false),
        _ => Err(PromptError::InvalidChoice(answer.trim().to_string())),
    }
}

/// Ask for the search term, then the after and before dates.
///
/// The term is trimmed and lower-cased. An invalid yes/no answer aborts
/// the whole collection.
pub fn collect_request(prompter: &mut dyn Prompter) -> Result<SearchRequest, PromptError> {
    let term = prompter.ask("Enter the search term")?.trim().to_lowercase();
    let after_date = ask_date(prompter, "After")?;
    let before_date = ask_date(prompter, "Before")?;

    Ok(SearchRequest {
        term,
        after_date,
        before_date,
    })
}

fn ask_date(prompter: &mut dyn Prompter, which: &str) -> Result<Option<String>, PromptError> {
    let answer = prompter.ask(&format!(
        "Would you like to search for results {which} a certain date? (Enter Y or N)"
    ))?;
    if !parse_choice(&answer)? {
        return Ok(None);
    }

    let date = prompter.ask(&format!(
        "Enter the {} date in YYYY-MM-DD format",
        which.to_lowercase()
    ))?;
    Ok(Some(date.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert!(parse_choice("y").unwrap());
        assert!(parse_choice(" Y ").unwrap());
        assert!(!parse_choice("n").unwrap());
        assert!(!parse_choice("N").unwrap());
    }

    #[test]
    fn test_parse_choice_rejects_other_answers() {
        for answer in ["yes", "", "maybe", "1"] {
            let err = parse_choice(answer).unwrap_err();
            assert!(matches!(err, PromptError::InvalidChoice(_)), "{answer:?}");
        }
    }
}
