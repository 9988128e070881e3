//! `{NAME}` placeholder templates for input paths and output filenames.

use crate::error::{OceanError, OceanResult};

/// A path or filename template such as `"{DATE}/salinity_{DEPTH}.png"`.
///
/// Placeholders are `{NAME}`; `{{` and `}}` produce literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
}

impl Template {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Substitute placeholders. Unknown placeholders are an error.
    pub fn render(&self, values: &[(&str, &str)]) -> OceanResult<String> {
        let mut out = String::with_capacity(self.raw.len() + 16);
        let mut chars = self.raw.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => name.push(ch),
                            None => return Err(self.invalid("unterminated placeholder")),
                        }
                    }
                    let value = values
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| OceanError::UnknownPlaceholder {
                            template: self.raw.clone(),
                            placeholder: name.clone(),
                        })?;
                    out.push_str(value);
                }
                '}' => return Err(self.invalid("single '}' encountered")),
                _ => out.push(c),
            }
        }

        Ok(out)
    }

    /// Names of the placeholders used, in order of appearance.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut chars = self.raw.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '{' {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    continue;
                }
                let name: String = chars.by_ref().take_while(|&ch| ch != '}').collect();
                names.push(name);
            }
        }
        names
    }

    fn invalid(&self, message: &str) -> OceanError {
        OceanError::InvalidTemplate {
            template: self.raw.clone(),
            message: message.to_string(),
        }
    }
}

impl From<&str> for Template {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_placeholders() {
        let t = Template::new("salinity_{DATE}_{DEPTH}.png");
        let out = t.render(&[("DATE", "2021-01-01_0030"), ("DEPTH", "3")]).unwrap();
        assert_eq!(out, "salinity_2021-01-01_0030_3.png");
    }

    #[test]
    fn test_unused_values_are_ignored() {
        let t = Template::new("plain.png");
        assert_eq!(t.render(&[("DATE", "x")]).unwrap(), "plain.png");
    }

    #[test]
    fn test_escaped_braces() {
        let t = Template::new("{{{DATE}}}");
        assert_eq!(t.render(&[("DATE", "d")]).unwrap(), "{d}");
    }

    #[test]
    fn test_unknown_placeholder() {
        let t = Template::new("/data/{INSTANCE}/out");
        let err = t.render(&[("DATE", "20210101")]).unwrap_err();
        assert!(matches!(err, OceanError::UnknownPlaceholder { .. }));
    }

    #[test]
    fn test_unterminated_placeholder() {
        assert!(Template::new("{DATE").render(&[("DATE", "d")]).is_err());
    }

    #[test]
    fn test_placeholders() {
        let t = Template::new("/ens/{INSTANCE}/{DATE}/{{literal}}");
        assert_eq!(t.placeholders(), vec!["INSTANCE".to_string(), "DATE".to_string()]);
    }
}
