//! Input validation for dashboard forms.

use crate::error::{Error, Result};

fn invalid(field: &'static str, message: impl Into<String>) -> Error {
    Error::Validation {
        field,
        message: message.into(),
    }
}

/// Validate a domain entered in the "Add Domain" form.
///
/// Accepts a single label of 3-63 characters (letters, digits, inner
/// hyphens) followed by an alphabetic TLD of at least two letters, e.g.
/// `example.com`. Scheme prefixes and subdomains are rejected.
pub fn validate_domain(input: &str) -> Result<&str> {
    let candidate = input.trim();
    if candidate.is_empty() {
        return Err(invalid("domain", "Please enter your domain"));
    }

    let (label, tld) = candidate
        .split_once('.')
        .ok_or_else(|| invalid("domain", "Please enter a valid domain name"))?;

    let label_ok = (3..=63).contains(&label.len())
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !label.starts_with('-')
        && !label.ends_with('-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    if label_ok && tld_ok {
        Ok(candidate)
    } else {
        Err(invalid("domain", "Please enter a valid domain name"))
    }
}

/// Validate a URL query parameter name (letters, digits, `_`, `-`).
pub fn validate_parameter_name(input: &str) -> Result<&str> {
    let candidate = input.trim();
    if candidate.is_empty() {
        return Err(invalid("parameter", "Please enter a parameter name"));
    }
    if !candidate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid(
            "parameter",
            "Only letters, numbers, underscores and hyphens are allowed",
        ));
    }
    Ok(candidate)
}

/// Split the team invite textarea into addresses, one per line.
pub fn parse_invite_emails(input: &str) -> Result<Vec<String>> {
    if input.contains(',') {
        return Err(invalid("emails", "Please enter one email per line"));
    }

    let emails: Vec<String> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if emails.is_empty() {
        return Err(invalid("emails", "Please enter at least one email address"));
    }

    for email in &emails {
        let well_formed = match email.split_once('@') {
            Some((local, host)) => {
                !local.is_empty()
                    && !host.is_empty()
                    && !host.contains('@')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !well_formed {
            return Err(invalid("emails", format!("not an email address: {}", email)));
        }
    }

    Ok(emails)
}
