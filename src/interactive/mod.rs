//! Interactive prompts
//!
//! Fills in whatever a command was not given on the command line, using the
//! same validation rules as the non-interactive path.

use crate::core::{FormOptions, TicketDraft, ROLES};
use crate::error::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use std::io::BufRead;

/// Guided input for the ticket and user forms
pub struct InteractiveMode {
    theme: ColorfulTheme,
}

impl Default for InteractiveMode {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveMode {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Prompt for the missing fields of a ticket draft
    pub fn complete_ticket(&self, mut draft: TicketDraft, options: &FormOptions) -> Result<TicketDraft> {
        if !draft.has_title() {
            draft = draft.title(Some(self.input("Title", true)?));
        }
        if !draft.has_description() {
            println!("Description (press Enter twice when done)");
            draft = draft.description(Some(self.read_multiline()?));
        }
        if !draft.has_facility() {
            draft = draft.facility(Some(self.select("Facility", &options.facilities)?));
        }
        if !draft.has_category() {
            draft = draft.category(Some(self.select("Category", &options.categories)?));
        }
        Ok(draft)
    }

    /// Prompt for a text value
    pub fn input(&self, prompt: &str, required: bool) -> Result<String> {
        let input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(!required);
        let value = if required {
            input
                .validate_with(|value: &String| -> std::result::Result<(), &str> {
                    if value.trim().is_empty() {
                        Err("This field is required")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?
        } else {
            input.interact_text()?
        };
        Ok(value.trim().to_string())
    }

    /// Prompt for a hidden value
    pub fn password(&self, prompt: &str, confirm: bool) -> Result<String> {
        let mut password = Password::with_theme(&self.theme).with_prompt(prompt);
        if confirm {
            password = password.with_confirmation("Repeat password", "Passwords do not match");
        }
        Ok(password.interact()?)
    }

    /// Let the user pick one of `choices`
    pub fn select(&self, prompt: &str, choices: &[String]) -> Result<String> {
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(choices)
            .default(0)
            .interact()?;
        Ok(choices[selection].clone())
    }

    pub fn select_role(&self) -> Result<String> {
        let roles: Vec<String> = ROLES.iter().map(ToString::to_string).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Role")
            .items(&roles)
            .default(1)
            .interact()?;
        Ok(roles[selection].clone())
    }

    fn read_multiline(&self) -> Result<String> {
        read_until_blank_lines(std::io::stdin().lock())
    }
}

/// Read lines until two consecutive blank lines or end of input
fn read_until_blank_lines(reader: impl BufRead) -> Result<String> {
    let mut lines = Vec::new();
    let mut empty_lines = 0;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            empty_lines += 1;
            if empty_lines >= 2 {
                break;
            }
            lines.push(String::new());
        } else {
            empty_lines = 0;
            lines.push(line.trim_end().to_string());
        }
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_until_blank_lines() {
        let input = Cursor::new("first line\n\nsecond paragraph\n\n\nignored\n");
        let text = read_until_blank_lines(input).unwrap();
        assert_eq!(text, "first line\n\nsecond paragraph");
    }

    #[test]
    fn test_read_until_eof() {
        let text = read_until_blank_lines(Cursor::new("only line")).unwrap();
        assert_eq!(text, "only line");
        assert_eq!(read_until_blank_lines(Cursor::new("")).unwrap(), "");
    }
}
