pub struct FieldLimits {
    pub max_chars: usize,
    pub keep_newlines: bool,
}

pub struct TextRule {
    pub name: &'static str,
    pub validate: fn(&str, &FieldLimits) -> Result<(), String>,
}

/// Rules every free-text field goes through, in order. Input is the trimmed
/// text with control characters already removed.
pub fn text_rules() -> Vec<TextRule> {
    vec![
        TextRule {
            name: "not_empty",
            validate: |text, _| {
                if text.is_empty() {
                    Err("must not be empty".to_string())
                } else {
                    Ok(())
                }
            },
        },
        TextRule {
            name: "max_length",
            validate: |text, limits| {
                let len = text.chars().count();
                if len > limits.max_chars {
                    Err(format!(
                        "must be at most {} characters, got {}",
                        limits.max_chars, len
                    ))
                } else {
                    Ok(())
                }
            },
        },
        TextRule {
            name: "no_email",
            validate: |text, _| {
                if text.contains('@') {
                    Err("Please do not include personal information".to_string())
                } else {
                    Ok(())
                }
            },
        },
        TextRule {
            name: "no_phone_number",
            validate: |text, _| {
                if looks_like_phone_number(text) {
                    Err("Please do not include personal information".to_string())
                } else {
                    Ok(())
                }
            },
        },
    ]
}

pub fn find_rule_by_name<'a>(rules: &'a [TextRule], name: &str) -> Option<&'a TextRule> {
    rules.iter().find(|rule| rule.name == name)
}

/// Ten leading digits once spaces, dashes and parentheses are ignored.
pub fn looks_like_phone_number(text: &str) -> bool {
    let leading: Vec<char> = text
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .take(10)
        .collect();

    leading.len() == 10 && leading.iter().all(|c| c.is_ascii_digit())
}

/// Drops control characters. Newlines and tabs survive when the field allows
/// multi-line text.
pub fn strip_control_chars(text: &str, limits: &FieldLimits) -> String {
    text.chars()
        .filter(|c| !c.is_control() || (limits.keep_newlines && matches!(c, '\n' | '\t')))
        .collect()
}

/// Escapes HTML special characters so stored text is never interpreted as markup.
pub fn neutralize_markup(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}
