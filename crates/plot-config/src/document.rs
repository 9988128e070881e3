//! Case-insensitive view over an INI document.
//!
//! Keys are matched case-insensitively like Python's `configparser`.
//! Section names are matched case-insensitively as well, which
//! `configparser` does not do: `[Salinity]` satisfies a lookup of
//! `salinity`.

use std::collections::HashMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, ParseOption};
use ocean_common::Template;

use crate::error::{ConfigError, ConfigResult};

/// Parsed configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    sections: HashMap<String, HashMap<String, String>>,
    source: Option<PathBuf>,
}

/// Backslashes are kept literally so Windows paths survive.
fn parse_options() -> ParseOption {
    ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    }
}

impl ConfigDocument {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let ini =
            Ini::load_from_file_opt(path, parse_options()).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let mut doc = Self::from_ini(&ini);
        doc.source = Some(path.to_path_buf());
        Ok(doc)
    }

    pub fn parse(contents: &str) -> ConfigResult<Self> {
        let ini = Ini::load_from_str_opt(contents, parse_options())?;
        Ok(Self::from_ini(&ini))
    }

    fn from_ini(ini: &Ini) -> Self {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        for (name, props) in ini.iter() {
            // Keys before the first header land in the general section.
            let name = name.unwrap_or("").to_lowercase();
            let entry = sections.entry(name).or_default();
            for (key, value) in props.iter() {
                entry.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }
        Self {
            sections,
            source: None,
        }
    }

    /// Path the document was read from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(&name.to_lowercase())
    }

    /// A section that must exist.
    pub fn section<'a>(&'a self, name: &'a str) -> ConfigResult<Section<'a>> {
        match self.sections.get(&name.to_lowercase()) {
            Some(values) => Ok(Section {
                name,
                values: Some(values),
            }),
            None => Err(ConfigError::MissingSection(name.to_string())),
        }
    }

    /// A section whose keys are all optional; empty when absent.
    pub fn optional_section<'a>(&'a self, name: &'a str) -> Section<'a> {
        Section {
            name,
            values: self.sections.get(&name.to_lowercase()),
        }
    }
}

/// Typed accessors for one section.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    name: &'a str,
    values: Option<&'a HashMap<String, String>>,
}

impl<'a> Section<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    /// Raw value, `None` when absent or empty.
    pub fn opt_str(&self, key: &str) -> Option<&'a str> {
        self.values?
            .get(&key.to_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get_str(&self, key: &str) -> ConfigResult<&'a str> {
        self.opt_str(key).ok_or_else(|| ConfigError::MissingKey {
            section: self.name.to_string(),
            key: key.to_string(),
        })
    }

    pub fn get<T>(&self, key: &str) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.get_str(key)?;
        self.parse_value(key, raw)
    }

    pub fn get_or<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.opt_str(key) {
            Some(raw) => self.parse_value(key, raw),
            None => Ok(default),
        }
    }

    /// Boolean in `configparser` spelling: `1/yes/true/on`, `0/no/false/off`.
    pub fn get_bool_or(&self, key: &str, default: bool) -> ConfigResult<bool> {
        let Some(raw) = self.opt_str(key) else {
            return Ok(default);
        };
        match raw.to_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            _ => Err(self.invalid(key, raw, "expected a boolean")),
        }
    }

    pub fn get_path(&self, key: &str) -> ConfigResult<PathBuf> {
        self.get_str(key).map(PathBuf::from)
    }

    /// Template restricted to the given placeholders.
    pub fn get_template(&self, key: &str, allowed: &[&str]) -> ConfigResult<Template> {
        let raw = self.get_str(key)?;
        self.template_from(key, raw, allowed)
    }

    pub fn get_template_or(
        &self,
        key: &str,
        default: &str,
        allowed: &[&str],
    ) -> ConfigResult<Template> {
        let raw = self.opt_str(key).unwrap_or(default);
        self.template_from(key, raw, allowed)
    }

    fn template_from(&self, key: &str, raw: &str, allowed: &[&str]) -> ConfigResult<Template> {
        let template = Template::new(raw);
        if let Some(unknown) = template
            .placeholders()
            .into_iter()
            .find(|p| !allowed.contains(&p.as_str()))
        {
            return Err(self.invalid(
                key,
                raw,
                &format!("unknown placeholder {{{}}}, expected one of {:?}", unknown, allowed),
            ));
        }
        Ok(template)
    }

    fn parse_value<T>(&self, key: &str, raw: &str) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        raw.parse::<T>()
            .map_err(|e| self.invalid(key, raw, &e.to_string()))
    }

    pub fn invalid(&self, key: &str, value: &str, message: &str) -> ConfigError {
        ConfigError::InvalidValue {
            section: self.name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "[Default]
BasePath = /data/in
levels = 30
flag = Yes
empty =

[salinity]
outputName = salinity_{DATE}_{DEPTH}.png
";

    #[test]
    fn test_keys_are_case_insensitive() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        let section = doc.section("default").unwrap();
        assert_eq!(section.get_str("basepath").unwrap(), "/data/in");
        assert_eq!(section.get_str("BASEPATH").unwrap(), "/data/in");
        assert_eq!(section.get::<usize>("Levels").unwrap(), 30);
        assert!(section.get_bool_or("flag", false).unwrap());
    }

    #[test]
    fn test_section_names_are_case_insensitive() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert!(doc.section("Salinity").is_ok());
        assert!(doc.section("SALINITY").is_ok());
        assert_eq!(
            doc.section("DEFAULT").unwrap().get_str("basePath").unwrap(),
            "/data/in"
        );
    }

    #[test]
    fn test_missing_and_empty() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        let section = doc.section("default").unwrap();
        assert!(matches!(section.get_str("empty"), Err(ConfigError::MissingKey { .. })));
        assert_eq!(section.get_or("dpi", 300u32).unwrap(), 300);
        assert!(matches!(doc.section("postcardSsh"), Err(ConfigError::MissingSection(_))));
        assert!(doc.optional_section("postcardSsh").opt_str("anything").is_none());
    }

    #[test]
    fn test_invalid_number() {
        let doc = ConfigDocument::parse("[a]\nlevels = many\n").unwrap();
        let err = doc.section("a").unwrap().get::<usize>("levels").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_template_placeholders_checked() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        let section = doc.section("salinity").unwrap();
        assert!(section.get_template("outputName", &["DATE", "DEPTH"]).is_ok());
        assert!(section.get_template("outputName", &["DATE"]).is_err());
    }

    #[test]
    fn test_backslashes_preserved() {
        let doc = ConfigDocument::parse("[default]\nbasePath = C:\\data\\new\n").unwrap();
        assert_eq!(
            doc.section("default").unwrap().get_str("basePath").unwrap(),
            "C:\\data\\new"
        );
    }
}
