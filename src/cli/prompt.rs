//! Interactive terminal prompts for the browse command

use std::io::{self, Write};

use crate::app::{FilterCriteria, Gallery, PageState, RecordField, Selection};
use crate::errors::{AppError, Result};

/// A browse loop action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Next,
    Previous,
    Filters,
    Quit,
}

impl BrowseAction {
    /// Parse one line of user input
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "n" | "next" => Some(Self::Next),
            "p" | "prev" | "previous" => Some(Self::Previous),
            "f" | "filter" | "filters" => Some(Self::Filters),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Print `prompt` and read one line without its line ending; None on end of input
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush().map_err(AppError::Io)?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input).map_err(AppError::Io)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(strip_line_ending(&input).to_string()))
}

fn strip_line_ending(input: &str) -> &str {
    input.trim_end_matches(['\n', '\r'])
}

/// Search term from the keyword prompt, kept verbatim
///
/// Empty input keeps `current` and a lone `-` clears it.
fn parse_search_input(input: Option<String>, current: &str) -> String {
    match input {
        Some(input) if input.trim() == "-" => String::new(),
        Some(input) if !input.is_empty() => input,
        _ => current.to_string(),
    }
}

/// Ask for the next browse action, only offering moves that exist
///
/// End of input counts as quit.
pub fn prompt_action(page_state: &PageState) -> Result<BrowseAction> {
    let mut choices = Vec::new();
    if page_state.has_next() {
        choices.push("[n]ext");
    }
    if page_state.has_previous() {
        choices.push("[p]revious");
    }
    choices.push("[f]ilters");
    choices.push("[q]uit");
    let prompt = format!("{}: ", choices.join(", "));

    loop {
        let Some(input) = read_line(&prompt)? else {
            return Ok(BrowseAction::Quit);
        };

        match BrowseAction::parse(&input) {
            Some(action) => return Ok(action),
            None => println!("❌ Unknown action '{}'", input),
        }
    }
}

/// Numbered menu over a selector's options
///
/// An empty answer keeps `current`.
pub fn select_option(
    field: RecordField,
    options: &[Selection],
    current: &Selection,
) -> Result<Selection> {
    println!();
    let heading = match field {
        RecordField::Category => "📂 Categories:",
        RecordField::Client => "🏢 Clients:",
    };
    println!("{}", heading);
    for (i, option) in options.iter().enumerate() {
        let marker = if option == current { "*" } else { " " };
        println!(" {} {}. {}", marker, i + 1, option.label(field));
    }
    println!();

    loop {
        let prompt = format!("Select (1-{}, enter to keep): ", options.len());
        let Some(input) = read_line(&prompt)? else {
            return Ok(current.clone());
        };

        let input = input.trim();
        if input.is_empty() {
            return Ok(current.clone());
        }

        if let Ok(choice) = input.parse::<usize>() {
            if choice > 0 && choice <= options.len() {
                return Ok(options[choice - 1].clone());
            }
        }

        println!(
            "❌ Invalid choice. Please enter a number between 1 and {}",
            options.len()
        );
    }
}

/// Re-pick category, client and keyword
pub fn prompt_filters(gallery: &Gallery, current: &FilterCriteria) -> Result<FilterCriteria> {
    let selected_category = select_option(
        RecordField::Category,
        gallery.options(RecordField::Category),
        &current.selected_category,
    )?;
    let selected_client = select_option(
        RecordField::Client,
        gallery.options(RecordField::Client),
        &current.selected_client,
    )?;

    println!();
    let prompt = if current.search_term.is_empty() {
        "Search (title, description or keywords): ".to_string()
    } else {
        format!(
            "Search (title, description or keywords) ['-' clears '{}']: ",
            current.search_term
        )
    };
    let search_term = parse_search_input(read_line(&prompt)?, &current.search_term);

    Ok(FilterCriteria {
        selected_category,
        selected_client,
        search_term,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!(BrowseAction::parse("n"), Some(BrowseAction::Next));
        assert_eq!(BrowseAction::parse(" Previous "), Some(BrowseAction::Previous));
        assert_eq!(BrowseAction::parse("F"), Some(BrowseAction::Filters));
        assert_eq!(BrowseAction::parse("exit"), Some(BrowseAction::Quit));
        assert_eq!(BrowseAction::parse("x"), None);
        assert_eq!(BrowseAction::parse(""), None);
    }

    #[test]
    fn test_line_ending_stripped_only() {
        assert_eq!(strip_line_ending("  cat \r\n"), "  cat ");
        assert_eq!(strip_line_ending("n\n"), "n");
        assert_eq!(strip_line_ending(""), "");
    }

    #[test]
    fn test_search_input_keeps_surrounding_spaces() {
        assert_eq!(parse_search_input(Some(" cat ".to_string()), ""), " cat ");
        assert_eq!(parse_search_input(Some(String::new()), "dog"), "dog");
        assert_eq!(parse_search_input(None, "dog"), "dog");
        assert_eq!(parse_search_input(Some(" - ".to_string()), "dog"), "");
    }
}
